use crate::error::{ImageError, ImageResult, LimitErrorKind};
use crate::math::{ByteCount, PixelLength};

/// Resource limits for image allocation.
///
/// Constructors taking a `Limits` check the requested extent against `max_image_width` and
/// `max_image_height`, and subtract the bytes they allocate from `max_alloc`. A single `Limits`
/// can therefore budget the total storage of several images.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[allow(missing_copy_implementations)]
#[non_exhaustive]
pub struct Limits {
    /// The maximum allowed image width. The default is no limit.
    pub max_image_width: Option<u32>,
    /// The maximum allowed image height. The default is no limit.
    pub max_image_height: Option<u32>,
    /// The maximum number of bytes that may still be allocated. The default is 512MiB.
    pub max_alloc: Option<u64>,
}

/// Add some reasonable limits.
///
/// **Note**: This is not equivalent to _not_ adding limits.
impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_image_width: None,
            max_image_height: None,
            max_alloc: Some(512 * 1024 * 1024),
        }
    }
}

impl Limits {
    /// Disable all limits.
    #[must_use]
    pub fn no_limits() -> Limits {
        Limits {
            max_image_width: None,
            max_image_height: None,
            max_alloc: None,
        }
    }

    /// This function checks the `max_image_width` and `max_image_height` limits given
    /// the image width and height.
    pub fn check_dimensions(&self, width: PixelLength, height: PixelLength) -> ImageResult<()> {
        let exceeds = |value: PixelLength, limit: Option<u32>| match limit {
            Some(max) => i64::from(value.get()) > i64::from(max),
            None => false,
        };
        if exceeds(width, self.max_image_width) || exceeds(height, self.max_image_height) {
            return Err(ImageError::limits(LimitErrorKind::DimensionError));
        }
        Ok(())
    }

    /// This function checks that the current limit allows for reserving the set amount
    /// of bytes, it then reduces the limit accordingly.
    pub fn reserve(&mut self, amount: u64) -> ImageResult<()> {
        if let Some(max_alloc) = self.max_alloc.as_mut() {
            if *max_alloc < amount {
                return Err(ImageError::limits(LimitErrorKind::InsufficientMemory));
            }

            *max_alloc -= amount;
        }

        Ok(())
    }

    /// This function acts identically to [`reserve`], but takes a [`ByteCount`].
    ///
    /// [`reserve`]: #method.reserve
    pub fn reserve_bytes(&mut self, amount: ByteCount) -> ImageResult<()> {
        match u64::try_from(amount.get()) {
            Ok(n) => self.reserve(n),
            Err(_) => Err(ImageError::limits(LimitErrorKind::InsufficientMemory)),
        }
    }

    /// This function increases the `max_alloc` limit with amount. Should only be used
    /// together with [`reserve`].
    ///
    /// [`reserve`]: #method.reserve
    pub fn free(&mut self, amount: u64) {
        if let Some(max_alloc) = self.max_alloc.as_mut() {
            *max_alloc = max_alloc.saturating_add(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::px;

    #[test]
    fn dimensions() {
        let mut limits = Limits::no_limits();
        assert!(limits.check_dimensions(px(100_000), px(100_000)).is_ok());
        limits.max_image_height = Some(10);
        assert!(limits.check_dimensions(px(100_000), px(10)).is_ok());
        assert!(matches!(
            limits.check_dimensions(px(1), px(11)),
            Err(ImageError::Limits {
                kind: LimitErrorKind::DimensionError
            })
        ));
    }

    #[test]
    fn reserve_and_free() {
        let mut limits = Limits {
            max_alloc: Some(100),
            ..Limits::no_limits()
        };
        assert!(limits.reserve(60).is_ok());
        assert!(limits.reserve(60).is_err());
        limits.free(20);
        assert!(limits.reserve_bytes(ByteCount::new(60)).is_ok());
        assert_eq!(limits.max_alloc, Some(0));
        assert!(limits.reserve_bytes(ByteCount::new(-1)).is_err());
    }
}
