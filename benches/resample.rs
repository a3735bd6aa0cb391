use criterion::{black_box, criterion_group, criterion_main, Criterion};
use imgkit::access::{Bilinear, NearestNeighbor};
use imgkit::imageops::{resample, resample_into};
use imgkit::math::px;
use imgkit::{Image, PixelRgba8};

pub fn bench_resample(c: &mut Criterion) {
    let src = Image::from_fn(px(1024), px(768), |x, y| {
        PixelRgba8::new([(x.get() % 256) as u8, (y.get() % 256) as u8, 64, 255])
    });

    c.bench_function("resample nearest up", |b| {
        b.iter(|| resample(black_box(&src), px(2048), px(1536), NearestNeighbor));
    });

    c.bench_function("resample bilinear up", |b| {
        b.iter(|| resample(black_box(&src), px(2048), px(1536), Bilinear));
    });

    c.bench_function("resample bilinear down", |b| {
        let mut dst = Image::empty();
        b.iter(|| resample_into(black_box(&src), px(320), px(240), Bilinear, &mut dst));
    });
}

criterion_group!(benches, bench_resample);
criterion_main!(benches);
