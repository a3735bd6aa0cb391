//! Resampling, geometric transformations and lazy expressions through the public API.

use imgkit::access::{Bilinear, ImageInterpolationMode, NearestNeighbor};
use imgkit::imageops::expr::{generate_expr, image_expr, ImageExpr};
use imgkit::imageops::{
    clone_region, convert_image, crop, dyn_resample, flip, flip_horizontal, flip_vertical,
    inject_channels, resample, rotate, rotate90, stack_images, transform_pixels, transpose,
    FlipDirection, Rotation,
};
use imgkit::math::{idx, px, BoundingBox, PixelLength};
use imgkit::{Image, ImageAccess, PixelBgra8, PixelRgb8, PixelRgba8, PixelY8, PixelYa8};
use quickcheck::quickcheck;

fn image3x3() -> Image<PixelY8> {
    let values = [10, 20, 30, 40, 50, 60, 70, 80, 90].map(|v| PixelY8::new([v]));
    Image::from_pixels(px(3), px(3), &values).unwrap()
}

fn rgb_image(w: u8, h: u8, seed: u8) -> Image<PixelRgb8> {
    let (w, h) = (PixelLength::new(i32::from(w % 9)), PixelLength::new(i32::from(h % 9)));
    Image::from_fn(w, h, |x, y| {
        let v = (x.get() * 13 + y.get() * 7) as u8;
        PixelRgb8::new([v ^ seed, v.wrapping_add(seed), seed])
    })
}

#[test]
fn nearest_upsampling_scenario() {
    let img = image3x3();
    let big = resample(&img, px(6), px(6), NearestNeighbor);
    for y in 0..6 {
        for x in 0..6 {
            assert_eq!(big.get_pixel(idx(x), idx(y)), img.get_pixel(idx(x / 2), idx(y / 2)));
        }
    }
}

#[test]
fn bilinear_downsampling_picks_source_positions() {
    let img = Image::from_fn(px(8), px(8), |x, y| PixelY8::new([(x.get() * 10 + y.get()) as u8]));
    let small = resample(&img, px(4), px(2), Bilinear);
    assert_eq!(small.dimensions(), (px(4), px(2)));
    // destination (x, y) reads source (2x, 4y) exactly
    assert_eq!(small.get_pixel(idx(3), idx(1))[0], 64);
}

#[test]
fn dynamic_resample_keeps_semantics() {
    let img = rgb_image(7, 5, 3);
    let dynamic = img.to_dyn_image();
    let out = dyn_resample(&dynamic.view(), px(3), px(9), ImageInterpolationMode::Bilinear).unwrap();
    assert_eq!(out.semantics(), dynamic.semantics());
    assert_eq!(out.into_image::<PixelRgb8>().unwrap(), resample(&img, px(3), px(9), Bilinear));
}

#[test]
fn rotations_compose() {
    let img = rgb_image(8, 5, 1);
    assert_eq!(rotate(&img, Rotation::Clockwise90), rotate90(&img));
    assert_eq!(
        rotate(&rotate90(&img), Rotation::Clockwise90),
        rotate(&img, Rotation::Clockwise180)
    );
    assert_eq!(rotate90(&img), flip_horizontal(&transpose(&img)));
}

#[test]
fn crop_then_transform() {
    let mut img = rgb_image(8, 8, 9);
    let bbox = BoundingBox::new(idx(2), idx(1), px(4), px(3));
    let region = clone_region(&img, &bbox);
    crop(&mut img, &bbox);
    assert_eq!(img, region);
    let red: Image<PixelY8> = transform_pixels(&img, |p| PixelY8::new([p[0]]));
    assert_eq!(red.get_pixel(idx(3), idx(2))[0], img.get_pixel(idx(3), idx(2))[0]);
}

#[test]
fn lazy_expressions_match_eager_ones() {
    let img = rgb_image(8, 6, 4);
    let bbox = BoundingBox::new(idx(1), idx(2), px(5), px(3));
    let lazy = image_expr(&img)
        .crop(bbox)
        .flip(FlipDirection::Vertical)
        .transpose()
        .evaluate();
    let eager = transpose(&flip(&clone_region(&img, &bbox), FlipDirection::Vertical));
    assert_eq!(lazy, eager);

    let gradient = generate_expr(px(4), px(3), |x, y| PixelY8::new([(x.get() + 4 * y.get()) as u8]));
    let mut dst = Image::empty();
    gradient.transform(|p| PixelY8::new([p[0] * 3])).evaluate_into(&mut dst);
    assert_eq!(dst.get_pixel(idx(3), idx(2))[0], 33);
}

quickcheck! {
    fn transpose_round_trip(w: u8, h: u8, seed: u8) -> bool {
        let img = rgb_image(w, h, seed);
        transpose(&transpose(&img)) == img
    }

    fn flip_round_trips(w: u8, h: u8, seed: u8) -> bool {
        let img = rgb_image(w, h, seed);
        flip_horizontal(&flip_horizontal(&img)) == img && flip_vertical(&flip_vertical(&img)) == img
    }

    fn resample_to_same_extent_copies(w: u8, h: u8, seed: u8) -> bool {
        let img = rgb_image(w, h, seed);
        resample(&img, img.width(), img.height(), Bilinear) == img
    }
}

#[test]
fn tiny_images_round_trip() {
    for (w, h) in [(0, 0), (1, 1), (0, 3), (1, 4)] {
        let img = rgb_image(w, h, 5);
        assert_eq!(transpose(&transpose(&img)), img);
        assert_eq!(flip_horizontal(&flip_horizontal(&img)), img);
        assert_eq!(flip_vertical(&flip_vertical(&img)), img);
    }
}

#[test]
fn alpha_plane_through_conversions() {
    let rgb = rgb_image(8, 7, 3);
    let gray: Image<PixelY8> = convert_image(&rgb);
    let rgba: Image<PixelRgba8> = stack_images(&rgb, &gray).unwrap();
    let back: Image<PixelRgb8> = convert_image(&rgba);
    assert_eq!(back, rgb);

    let bgra: Image<PixelBgra8> = convert_image(&rgba);
    let ya: Image<PixelYa8> = convert_image(&bgra);
    for y in ya.height().indices() {
        for (p, g) in ya.row(y).iter().zip(gray.row(y)) {
            assert_eq!(p.into_channels(), [g[0], g[0]]);
        }
    }

    let mut opaque = Image::from_pixel(rgb.width(), rgb.height(), PixelRgba8::new([0, 0, 0, 255]));
    inject_channels(&rotate90(&rotate90(&rotate90(&rotate90(&rgb)))), &mut opaque, 0).unwrap();
    assert_eq!(transform_pixels(&opaque, |p| PixelRgb8::new([p[0], p[1], p[2]])), rgb);
    assert!(opaque.rows().flatten().all(|p| p[3] == 255));
}
