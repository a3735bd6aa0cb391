//! End-to-end checks of border access, interpolation and separable convolution.

use approx::assert_abs_diff_eq;
use imgkit::access::{
    Bilinear, ImageBorderAccessor, ImageInterpolator, RelativeAccessor, Replicated, ZeroPadding,
};
use imgkit::imageops::{
    convolution_x, convolution_x_fixed, convolution_y, convolution_y_fixed, transpose,
};
use imgkit::kernel::{gaussian_kernel, gaussian_kernel_auto, integer_kernel, normalize, uniform_kernel, Kernel};
use imgkit::math::{idx, px, BoundingBox, PixelLength};
use imgkit::{formats, Image, ImageAccess, Pixel, PixelRgb8, PixelY8, PixelYf32};
use quickcheck::quickcheck;

fn image3x3() -> Image<PixelY8> {
    let values = [10, 20, 30, 40, 50, 60, 70, 80, 90].map(|v| PixelY8::new([v]));
    Image::from_pixels(px(3), px(3), &values).unwrap()
}

fn arbitrary_image(w: u8, h: u8, seed: &[u8]) -> Image<PixelY8> {
    let (w, h) = (PixelLength::new(i32::from(w % 12)), PixelLength::new(i32::from(h % 12)));
    Image::from_fn(w, h, |x, y| {
        let i = (y.get() * w.get() + x.get()) as usize;
        PixelY8::new([seed.get(i % seed.len().max(1)).copied().unwrap_or(0) ^ (i as u8).wrapping_mul(31)])
    })
}

#[test]
fn three_by_three_access() {
    let img = image3x3();
    assert_eq!(ImageBorderAccessor::<Replicated>::access(&img, idx(-1), idx(0))[0], 10);
    assert_eq!(ImageBorderAccessor::<ZeroPadding>::access(&img, idx(3), idx(0))[0], 0);
    let p = ImageInterpolator::<Bilinear>::interpolate(&img, 0.51, 0.0);
    assert_abs_diff_eq!(p[0], 15.1, epsilon = 1e-9);

    let relative = RelativeAccessor::new(&img, idx(2), idx(2));
    assert_eq!(relative.get::<Replicated>(idx(1), idx(-1))[0], 60);
    assert_eq!(relative.get::<ZeroPadding>(idx(1), idx(0))[0], 0);
}

#[test]
fn row_convolution_scenario() {
    let values = [30.0, 10.0, 80.0].map(|v| PixelYf32::new([v]));
    let img = Image::from_pixels(px(3), px(1), &values).unwrap();
    let kernel = normalize(&Kernel::new(vec![0.3, 0.5, 0.2]));
    let out = convolution_x(&img, &kernel, Replicated);
    assert_abs_diff_eq!(out.get_pixel(idx(0), idx(0))[0], 26.0, epsilon = 1e-5);
    assert_abs_diff_eq!(out.get_pixel(idx(1), idx(0))[0], 30.0, epsilon = 1e-5);
    assert_abs_diff_eq!(out.get_pixel(idx(2), idx(0))[0], 59.0, epsilon = 1e-5);
}

#[test]
fn constant_image_is_preserved() {
    let img = Image::from_pixel(px(23), px(17), PixelRgb8::new([200, 7, 91]));
    for kernel in [gaussian_kernel(2.0, 9), gaussian_kernel_auto(1.3, 31), uniform_kernel(5)] {
        let blurred = convolution_y(&convolution_x(&img, &kernel, Replicated), &kernel, Replicated);
        assert_eq!(blurred, img);

        let fixed = integer_kernel::<i32, 14, _, _>(&kernel);
        let blurred = convolution_y_fixed(&convolution_x_fixed(&img, &fixed, Replicated), &fixed, Replicated);
        for row in blurred.rows() {
            for p in row {
                for (&a, &b) in p.channels().iter().zip(img.get_pixel(idx(0), idx(0)).channels()) {
                    assert!(a.abs_diff(b) <= 1, "{a} vs {b}");
                }
            }
        }
    }
}

#[test]
fn zero_padding_darkens_edges() {
    let img = Image::from_pixel(px(8), px(8), PixelY8::new([100]));
    let out = convolution_x(&img, &uniform_kernel(3), ZeroPadding);
    assert_eq!(out.get_pixel(idx(0), idx(4))[0], 67);
    assert_eq!(out.get_pixel(idx(4), idx(4))[0], 100);
    assert_eq!(out.get_pixel(idx(7), idx(4))[0], 67);
}

#[test]
fn region_convolution_reads_outside_pixels_only_through_border_policy() {
    let img = Image::from_fn(px(12), px(10), |x, y| PixelY8::new([(x.get() * 20 + y.get()) as u8]));
    let bbox = BoundingBox::new(idx(3), idx(2), px(5), px(4));
    let kernel = gaussian_kernel(1.0, 5);
    let from_view = convolution_x(&img.sub_view(&bbox), &kernel, Replicated);
    let from_copy = convolution_x(&imgkit::imageops::clone(&img.sub_view(&bbox)), &kernel, Replicated);
    assert_eq!(from_view, from_copy);
}

#[test]
fn integer_kernel_fidelity() {
    for sigma in [0.5, 1.0, 2.5, 6.0] {
        let kernel = gaussian_kernel_auto(sigma, 101);
        let fixed = integer_kernel::<i32, 16, _, _>(&kernel);
        let slack = fixed.len() as i64;
        assert!((fixed.abs_sum() - (1 << 16)).abs() <= slack, "sigma {sigma}");
    }
}

#[test]
fn even_kernels_lean_right() {
    let values = [0, 100, 0, 0].map(|v| PixelY8::new([v]));
    let img = Image::from_pixels(px(4), px(1), &values).unwrap();
    let pair = Kernel::new(vec![0.5, 0.5]);
    assert_eq!(pair.offset(), 0);
    let out = convolution_x(&img, &pair, ZeroPadding);
    let row: Vec<u8> = out.row(idx(0)).iter().map(|p| p[0]).collect();
    assert_eq!(row, [50, 50, 0, 0]);

    let fixed = integer_kernel::<i32, 16, _, _>(&pair);
    assert_eq!(fixed.offset(), 0);
    assert_eq!(convolution_x_fixed(&img, &fixed, ZeroPadding), out);
    assert_eq!(convolution_y(&transpose(&img), &pair, ZeroPadding), transpose(&out));
}

#[test]
fn fixed_point_full_range_blur() {
    type PixelY32 = Pixel<u32, 1, formats::Y>;
    let img = Image::from_pixel(px(9), px(6), PixelY32::new([u32::MAX]));
    let fixed = integer_kernel::<u32, 32, _, _>(&Kernel::new(vec![0.25, 0.5, 0.25]));
    assert_eq!(fixed.as_slice(), &[1 << 30, 1 << 31, 1 << 30]);
    let blurred = convolution_y_fixed(&convolution_x_fixed(&img, &fixed, Replicated), &fixed, Replicated);
    assert_eq!(blurred, img);

    let edge = convolution_x_fixed(&img, &fixed, ZeroPadding);
    // (3 * 2^30 * (2^32 - 1) + 2^31) >> 32
    assert_eq!(edge.get_pixel(idx(0), idx(3))[0], (3 << 30) - 1);
    assert_eq!(edge.get_pixel(idx(4), idx(3))[0], u32::MAX);
}

#[test]
#[should_panic(expected = "outside the range of 16-bit")]
fn coefficient_too_large_for_its_type() {
    let _ = integer_kernel::<i16, 15, _, _>(&Kernel::new(vec![1.0]));
}

#[test]
#[should_panic(expected = "exceeds the maximum of 62")]
fn shift_too_large_for_the_accumulator() {
    let _ = integer_kernel::<u32, 64, _, _>(&uniform_kernel(3));
}

quickcheck! {
    fn column_pass_is_transposed_row_pass(w: u8, h: u8, seed: Vec<u8>, size: u8) -> bool {
        let img = arbitrary_image(w, h, &seed);
        let kernel = gaussian_kernel(1.2, usize::from(size % 9));
        convolution_y(&img, &kernel, Replicated)
            == transpose(&convolution_x(&transpose(&img), &kernel, Replicated))
            && convolution_y(&img, &kernel, ZeroPadding)
                == transpose(&convolution_x(&transpose(&img), &kernel, ZeroPadding))
    }

    fn fixed_point_tracks_float(w: u8, h: u8, seed: Vec<u8>, sigma: u8) -> bool {
        let img = arbitrary_image(w, h, &seed);
        let kernel = gaussian_kernel(0.5 + f64::from(sigma % 30) / 10.0, 7);
        let fixed = integer_kernel::<i16, 12, _, _>(&kernel);
        let float = convolution_y(&img, &kernel, Replicated);
        let integer = convolution_y_fixed(&img, &fixed, Replicated);
        float.dimensions() == integer.dimensions()
            && float.rows().zip(integer.rows()).all(|(a, b)| {
                a.iter().zip(b).all(|(p, q)| p[0].abs_diff(q[0]) <= 1)
            })
    }
}
