use std::hint::black_box;

use aci_audio::aci::compute_aci;
use aci_audio::fft::SpectrogramTransform;
use aci_core::config::{SpectrogramFlags, WindowSpec};
use aci_core::signal::AudioSignal;
use criterion::{Criterion, criterion_group, criterion_main};

fn one_minute_signal() -> AudioSignal {
    let sample_rate = 22050;
    let samples = (0..sample_rate * 60)
        .map(|n| {
            let t = f64::from(n) / f64::from(sample_rate);
            (t * 2200.0).sin() * (t * 0.5).sin() + 0.1 * (t * 7919.0).sin()
        })
        .collect();
    AudioSignal::new(samples, sample_rate).unwrap_or_else(|e| panic!("{e}"))
}

fn bench_spectrogram(c: &mut Criterion) {
    let signal = one_minute_signal();
    let mut transform =
        SpectrogramTransform::new(WindowSpec::default(), SpectrogramFlags::default())
            .unwrap_or_else(|e| panic!("{e}"));

    c.bench_function("spectrogram_1min_22k", |b| {
        b.iter(|| transform.compute(black_box(&signal)));
    });

    let Ok(spec) = transform.compute(&signal) else {
        return;
    };
    c.bench_function("aci_1min_22k_block10", |b| {
        b.iter(|| compute_aci(black_box(&spec), 10));
    });
}

criterion_group!(benches, bench_spectrogram);
criterion_main!(benches);
