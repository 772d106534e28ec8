//! Filter bank benchmarks
//!
//! Measures the per-window cost of the Goertzel bank and of a full
//! pipeline pass, the dominant costs of real-time detection.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dtmf_detector::{DetectorConfig, DtmfDetector, DtmfTone, GoertzelAnalyzer, Window};

const SAMPLE_RATE: u32 = 8000;

fn tone_samples(tone: DtmfTone, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            0.5 * (2.0 * std::f32::consts::PI * tone.low_frequency() * t).sin()
                + 0.5 * (2.0 * std::f32::consts::PI * tone.high_frequency() * t).sin()
        })
        .collect()
}

fn bench_analyze_window(c: &mut Criterion) {
    let analyzer = GoertzelAnalyzer::new(SAMPLE_RATE, 205);
    let samples = tone_samples(DtmfTone::Five, 205);

    c.bench_function("goertzel_analyze_205", |b| {
        b.iter(|| analyzer.analyze(black_box(&Window::borrowed(&samples, 0))))
    });
}

fn bench_detect_one_second(c: &mut Criterion) {
    let detector = DtmfDetector::new(SAMPLE_RATE, DetectorConfig::default()).unwrap();
    let samples = tone_samples(DtmfTone::Eight, SAMPLE_RATE as usize);

    c.bench_function("detect_one_second", |b| {
        b.iter(|| detector.detect(black_box(&samples)))
    });
}

criterion_group!(benches, bench_analyze_window, bench_detect_one_second);
criterion_main!(benches);
