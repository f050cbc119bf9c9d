//! Criterion benchmarks for the two render paths that matter: a full
//! from-scratch frame, and a panned frame where most pixels arrive by
//! overlap copy.

#[macro_use]
extern crate criterion;
extern crate num;
extern crate panbrot;

use criterion::Criterion;
use num::Complex;
use std::sync::Arc;

use panbrot::palette::preset;
use panbrot::{FrameRenderer, FrameSpec, MandelbrotEngine};

fn bench_spec(center: Complex<f64>) -> FrameSpec {
    let palette = Arc::new(preset("default").unwrap());
    FrameSpec::new(320, 240, center, 0.0078125, 250, palette).unwrap()
}

fn from_scratch(c: &mut Criterion) {
    c.bench_function("render 320x240 from scratch", |b| {
        let spec = bench_spec(Complex::new(-0.5, 0.0));
        b.iter(|| {
            let mut renderer = FrameRenderer::with_threads(MandelbrotEngine, 4);
            renderer.render(&spec).unwrap()
        })
    });
}

fn pan_with_reuse(c: &mut Criterion) {
    c.bench_function("render 320x240 pan by 16px", |b| {
        let scale = 0.0078125;
        let left = bench_spec(Complex::new(-0.5, 0.0));
        let right = bench_spec(Complex::new(-0.5 + 16.0 * scale, 0.0));
        let mut renderer = FrameRenderer::with_threads(MandelbrotEngine, 4);
        renderer.render(&left).unwrap();
        let mut flip = false;
        // Alternate between the two viewports so every iteration
        // reuses a 304-column overlap.
        b.iter(|| {
            flip = !flip;
            renderer
                .render(if flip { &right } else { &left })
                .unwrap()
        })
    });
}

criterion_group!(benches, from_scratch, pan_with_reuse);
criterion_main!(benches);
