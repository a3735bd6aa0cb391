//! One-dimensional convolution kernels and their fixed-point counterparts.

use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use log::debug;
use num_traits::Float;

use crate::math::round_half_up;
use crate::traits::Sample;

/// 1/sqrt(2*pi)
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_677_9;

/// Tail samples below this fraction of the center sample end automatic size selection.
const GAUSSIAN_AUTO_THRESHOLD: f64 = 1e-3;

/// A 1-D convolution kernel.
///
/// The coefficients live in `C`, which is either a fixed size array or a `Vec`. The center tap is
/// at index `(len() - 1) / 2`, so even kernels have one more tap right of the center than left.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel<V, C = Vec<V>> {
    data: C,
    _value: PhantomData<V>,
}

/// A kernel whose size is known at compile time.
pub type FixedKernel<V, const K: usize> = Kernel<V, [V; K]>;

/// A kernel whose size is chosen at runtime.
pub type DynKernel<V> = Kernel<V, Vec<V>>;

impl<V: Copy, C: AsRef<[V]>> Kernel<V, C> {
    pub fn new(data: C) -> Self {
        Kernel {
            data,
            _value: PhantomData,
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[V] {
        self.data.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Offset of the center tap.
    #[inline]
    pub fn offset(&self) -> usize {
        self.len().saturating_sub(1) / 2
    }

    pub fn iter(&self) -> impl Iterator<Item = V> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn into_inner(self) -> C {
        self.data
    }
}

impl<V: Float, C: AsRef<[V]>> Kernel<V, C> {
    pub fn sum(&self) -> V {
        self.iter().fold(V::zero(), |acc, c| acc + c)
    }

    pub fn abs_sum(&self) -> V {
        self.iter().fold(V::zero(), |acc, c| acc + c.abs())
    }

    /// Converts to fixed point with `2^SHIFT` as the value of one.
    ///
    /// Each coefficient becomes `round_half_up(c * 2^SHIFT)`.
    pub fn to_integer<O: Sample, const SHIFT: u32>(&self) -> FixedPointKernel<O, SHIFT> {
        integer_kernel::<O, SHIFT, V, C>(self)
    }
}

impl<V: Float, C: AsRef<[V]> + AsMut<[V]>> Kernel<V, C> {
    /// Divides every coefficient by `sum`.
    pub fn normalize_by(&mut self, sum: V) {
        for c in self.data.as_mut() {
            *c = *c / sum;
        }
    }

    /// Scales the kernel so that the absolute values of its coefficients sum to one.
    ///
    /// A kernel of zeros is left unchanged.
    pub fn normalize(&mut self) {
        let abs_sum = self.abs_sum();
        if abs_sum > V::zero() {
            self.normalize_by(abs_sum);
        }
    }
}

impl<V: Copy> Default for Kernel<V, Vec<V>> {
    fn default() -> Self {
        Kernel::new(Vec::new())
    }
}

impl<V: Copy> From<Vec<V>> for DynKernel<V> {
    fn from(data: Vec<V>) -> Self {
        Kernel::new(data)
    }
}

impl<V: Copy, const K: usize> From<[V; K]> for FixedKernel<V, K> {
    fn from(data: [V; K]) -> Self {
        Kernel::new(data)
    }
}

impl<V: Copy, C: AsRef<[V]>> AsRef<[V]> for Kernel<V, C> {
    fn as_ref(&self) -> &[V] {
        self.as_slice()
    }
}

impl<V: Copy, C: AsRef<[V]>> Index<usize> for Kernel<V, C> {
    type Output = V;

    #[inline]
    fn index(&self, index: usize) -> &V {
        &self.as_slice()[index]
    }
}

impl<V: Copy, C: AsRef<[V]> + AsMut<[V]>> IndexMut<usize> for Kernel<V, C> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut V {
        &mut self.data.as_mut()[index]
    }
}

/// Returns a copy of `kernel` with `Σ|c| == 1`.
pub fn normalize<V: Float, C: AsRef<[V]> + AsMut<[V]> + Clone>(kernel: &Kernel<V, C>) -> Kernel<V, C> {
    let mut normalized = kernel.clone();
    normalized.normalize();
    normalized
}

fn gaussian_pdf(x: f64, sigma: f64) -> f64 {
    (INV_SQRT_2PI / sigma) * (-(x * x) / (2.0 * sigma * sigma)).exp()
}

/// Samples the density around the center of `coeffs` and normalizes by the sum of the samples.
fn fill_gaussian(coeffs: &mut [f64], sigma: f64) {
    let center = (coeffs.len() / 2) as f64;
    for (i, c) in coeffs.iter_mut().enumerate() {
        *c = gaussian_pdf(i as f64 - center, sigma);
    }
    let sum: f64 = coeffs.iter().sum();
    if sum > 0.0 {
        coeffs.iter_mut().for_each(|c| *c /= sum);
    }
}

/// A normalized Gaussian kernel of `size` taps.
///
/// Even sizes are increased by one so that the kernel has a center tap.
pub fn gaussian_kernel(sigma: f64, size: usize) -> DynKernel<f64> {
    let size = if size % 2 == 0 { size + 1 } else { size };
    let mut coeffs = vec![0.0; size];
    fill_gaussian(&mut coeffs, sigma);
    Kernel::new(coeffs)
}

/// A normalized Gaussian kernel of `K` taps.
///
/// # Panics
///
/// Panics if `K` is even.
pub fn gaussian_kernel_fixed<const K: usize>(sigma: f64) -> FixedKernel<f64, K> {
    assert!(K % 2 == 1, "Gaussian kernel size must be odd");
    let mut coeffs = [0.0; K];
    fill_gaussian(&mut coeffs, sigma);
    Kernel::new(coeffs)
}

/// A normalized Gaussian kernel covering `nr_std_devs` standard deviations on each side.
///
/// The radius is `ceil(sigma * nr_std_devs)`, at least one.
pub fn gaussian_kernel_range(sigma: f64, nr_std_devs: f64) -> DynKernel<f64> {
    let half_size = ((sigma * nr_std_devs).ceil() as usize).max(1);
    gaussian_kernel(sigma, 2 * half_size + 1)
}

/// A normalized Gaussian kernel whose size is chosen from `sigma`.
///
/// The radius grows until the outermost sample drops below a thousandth of the center sample,
/// or until the kernel reaches `max_size` taps.
pub fn gaussian_kernel_auto(sigma: f64, max_size: usize) -> DynKernel<f64> {
    let max_half_size = max_size.saturating_sub(1) / 2;
    let center = gaussian_pdf(0.0, sigma);
    let mut half_size = 1;
    while half_size < max_half_size
        && gaussian_pdf(half_size as f64, sigma) >= GAUSSIAN_AUTO_THRESHOLD * center
    {
        half_size += 1;
    }
    let half_size = half_size.min(max_half_size.max(1));
    debug!("gaussian kernel for sigma {sigma}: {} taps", 2 * half_size + 1);
    gaussian_kernel(sigma, 2 * half_size + 1)
}

/// A kernel of `size` taps equal to `1 / size`. Size zero gives an empty kernel.
pub fn uniform_kernel(size: usize) -> DynKernel<f64> {
    if size == 0 {
        return Kernel::default();
    }
    Kernel::new(vec![1.0 / size as f64; size])
}

/// A kernel of `K` taps equal to `1 / K`.
///
/// # Panics
///
/// Panics if `K` is zero.
pub fn uniform_kernel_fixed<const K: usize>() -> FixedKernel<f64, K> {
    assert!(K > 0, "Kernel size must be >0");
    Kernel::new([1.0 / K as f64; K])
}

/// A kernel of integral coefficients representing fractions of `2^SHIFT`.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPointKernel<O, const SHIFT: u32> {
    kernel: DynKernel<O>,
}

/// Largest supported shift. `2^SHIFT` and the rounding offset must fit in an `i64`.
pub const MAX_SHIFT: u32 = 62;

fn check_shift<O: Sample, const SHIFT: u32>() {
    assert!(
        O::IS_INTEGRAL,
        "fixed-point coefficients must be integral, got {}-bit {:?}",
        O::NR_BYTES * 8,
        O::SAMPLE_FORMAT
    );
    assert!(
        SHIFT <= MAX_SHIFT,
        "shift of {SHIFT} exceeds the maximum of {MAX_SHIFT} for {}-bit coefficients",
        O::NR_BYTES * 8
    );
}

impl<O: Sample, const SHIFT: u32> FixedPointKernel<O, SHIFT> {
    /// The fixed-point value of one.
    pub const SCALE: i64 = 1 << SHIFT;

    /// Wraps coefficients that are already scaled by `2^SHIFT`.
    ///
    /// Convolution accumulates in `i128`, which holds any sum of products of 32-bit coefficients
    /// and 64-bit samples.
    ///
    /// # Panics
    ///
    /// Panics if `O` is not an integer type or `SHIFT` exceeds [`MAX_SHIFT`].
    pub fn from_scaled(coeffs: Vec<O>) -> Self {
        check_shift::<O, SHIFT>();
        FixedPointKernel {
            kernel: Kernel::new(coeffs),
        }
    }

    pub fn kernel(&self) -> &DynKernel<O> {
        &self.kernel
    }

    pub fn as_slice(&self) -> &[O] {
        self.kernel.as_slice()
    }

    pub fn len(&self) -> usize {
        self.kernel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernel.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.kernel.offset()
    }

    /// The sum of the absolute values of the coefficients.
    pub fn abs_sum(&self) -> i64 {
        self.kernel.iter().map(|c| c.as_i64().abs()).sum()
    }

    /// Coefficients widened to the accumulator type.
    pub(crate) fn widened(&self) -> Vec<i64> {
        self.kernel.iter().map(Sample::as_i64).collect()
    }
}

/// Converts a floating point kernel to fixed point with `2^SHIFT` as the value of one.
///
/// Every coefficient becomes `round_half_up(c * 2^SHIFT)`.
///
/// # Panics
///
/// Panics if `O` is not an integer type, if `SHIFT` exceeds [`MAX_SHIFT`], or if a scaled
/// coefficient does not fit in `O`.
///
/// ```
/// use imgkit::kernel::{integer_kernel, Kernel};
///
/// let k = Kernel::new([0.25, 0.5, 0.25]);
/// let fixed = integer_kernel::<i16, 8, _, _>(&k);
/// assert_eq!(fixed.as_slice(), &[64, 128, 64]);
/// ```
pub fn integer_kernel<O, const SHIFT: u32, V, C>(kernel: &Kernel<V, C>) -> FixedPointKernel<O, SHIFT>
where
    O: Sample,
    V: Float,
    C: AsRef<[V]>,
{
    check_shift::<O, SHIFT>();
    let scale = (1i64 << SHIFT) as f64;
    let (min, max) = (O::min_value().as_f64(), O::max_value().as_f64());
    let coeffs = kernel
        .iter()
        .map(|c| {
            let c = c.to_f64().unwrap_or(0.0);
            let scaled = round_half_up(c * scale);
            assert!(
                (min..=max).contains(&scaled),
                "coefficient {c} scaled by 2^{SHIFT} is {scaled}, outside the range of {}-bit {:?} coefficients",
                O::NR_BYTES * 8,
                O::SAMPLE_FORMAT
            );
            O::from_f64_rounded(scaled)
        })
        .collect();
    FixedPointKernel::from_scaled(coeffs)
}
