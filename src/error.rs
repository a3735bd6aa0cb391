//! Contains detailed error representation.
//!
//! See the main [`ImageError`] which contains a variant for each specialized error type. Errors are
//! only produced at conversion boundaries, where the pixel layout of a runtime-typed image meets a
//! statically-typed algorithm, and when a caller-provided [`Limits`] would be exceeded. Geometry
//! violations inside the crate are programmer errors and panic instead.
//!
//! [`ImageError`]: enum.ImageError.html
//! [`Limits`]: crate::Limits

use core::fmt;
use snafu::prelude::*;

use crate::color::{PixelFormat, SampleFormat};

/// The generic error type for image operations.
///
/// This high level enum allows, by variant matching, a rough separation of concerns between
/// the caller, resource limits, and the set of pixel layouts the crate is able to dispatch on.
#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum ImageError {
    /// An error was encountered in input arguments.
    ///
    /// This is the case when a runtime-typed image is converted to a statically-typed one whose
    /// channel count, channel width or sample format does not match.
    #[snafu(display("invalid parameter: {kind}"))]
    Parameter { kind: ParameterErrorKind },

    /// Completing the operation would have required more resources than allowed.
    ///
    /// Errors of this type are limits set by the user or environment, *not* inherent in a specific
    /// operation that was executed.
    #[snafu(display("limits exceeded: {kind}"))]
    Limits { kind: LimitErrorKind },

    /// An operation can not be completed for the given runtime pixel layout.
    ///
    /// Algorithms on dynamic images dispatch onto a fixed set of element types and channel
    /// counts. Layouts outside that set are reported here.
    #[snafu(display("unsupported: {kind}"))]
    Unsupported { kind: UnsupportedErrorKind },
}

/// Details how a parameter is malformed.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParameterErrorKind {
    /// The dimensions passed are wrong.
    DimensionMismatch,
    /// The number of channels differs from the one requested.
    ChannelCountMismatch { expected: u16, actual: u16 },
    /// The width of a single channel in bytes differs from the one requested.
    BytesPerChannelMismatch { expected: u16, actual: u16 },
    /// The sample format differs from the one requested.
    SampleFormatMismatch {
        expected: SampleFormat,
        actual: SampleFormat,
    },
    /// The pixel format differs from the one requested.
    PixelFormatMismatch {
        expected: PixelFormat,
        actual: PixelFormat,
    },
    /// The pixel data is not sufficiently aligned for the requested element type.
    Misaligned { required: usize },
    /// A string describing the parameter.
    /// This is discouraged and is likely to get deprecated (but not removed).
    Generic(String),
}

/// Indicates the limit that prevented an operation from completing.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
#[allow(missing_copy_implementations)] // Might be non-Copy in the future.
pub enum LimitErrorKind {
    /// The resulting image exceed dimension limits in either direction.
    DimensionError,
    /// The operation would have performed an allocation larger than allowed.
    InsufficientMemory,
}

/// Details what feature is not supported.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnsupportedErrorKind {
    /// No typed pixel exists for this combination of sample format, channel width and count.
    PixelLayout {
        sample_format: SampleFormat,
        nr_channels: u16,
        nr_bytes_per_channel: u16,
    },
    /// Some feature specified by string.
    GenericFeature(String),
}

impl ImageError {
    pub(crate) fn parameter(kind: ParameterErrorKind) -> Self {
        ImageError::Parameter { kind }
    }

    pub(crate) fn limits(kind: LimitErrorKind) -> Self {
        ImageError::Limits { kind }
    }

    pub(crate) fn unsupported(kind: UnsupportedErrorKind) -> Self {
        ImageError::Unsupported { kind }
    }
}

impl fmt::Display for ParameterErrorKind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterErrorKind::DimensionMismatch => write!(
                fmt,
                "The image dimensions do not match the dimensions of the supplied data"
            ),
            ParameterErrorKind::ChannelCountMismatch { expected, actual } => {
                write!(fmt, "Expected {expected} channels, found {actual}")
            }
            ParameterErrorKind::BytesPerChannelMismatch { expected, actual } => {
                write!(fmt, "Expected {expected} bytes per channel, found {actual}")
            }
            ParameterErrorKind::SampleFormatMismatch { expected, actual } => {
                write!(fmt, "Expected sample format {expected:?}, found {actual:?}")
            }
            ParameterErrorKind::PixelFormatMismatch { expected, actual } => {
                write!(fmt, "Expected pixel format {expected:?}, found {actual:?}")
            }
            ParameterErrorKind::Misaligned { required } => {
                write!(fmt, "Pixel data is not aligned to {required} bytes")
            }
            ParameterErrorKind::Generic(message) => {
                write!(fmt, "The parameter is malformed: {message}")
            }
        }
    }
}

impl fmt::Display for LimitErrorKind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitErrorKind::DimensionError => write!(fmt, "Image size exceeds limit"),
            LimitErrorKind::InsufficientMemory => write!(fmt, "Memory limit exceeded"),
        }
    }
}

impl fmt::Display for UnsupportedErrorKind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedErrorKind::PixelLayout {
                sample_format,
                nr_channels,
                nr_bytes_per_channel,
            } => write!(
                fmt,
                "No pixel type for {nr_channels} channel(s) of {nr_bytes_per_channel} byte(s) ({sample_format:?})"
            ),
            UnsupportedErrorKind::GenericFeature(message) => {
                write!(fmt, "The feature {message} is not supported")
            }
        }
    }
}

/// Result of an image operation.
pub type ImageResult<T> = Result<T, ImageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[allow(dead_code)]
    // This will fail to compile if the size of this type is large.
    const ASSERT_SMALLISH: usize = [0][(mem::size_of::<ImageError>() >= 200) as usize];

    #[test]
    fn test_send_sync_stability() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<ImageError>();
    }

    #[test]
    fn display_mentions_the_mismatch() {
        let err = ImageError::parameter(ParameterErrorKind::ChannelCountMismatch {
            expected: 3,
            actual: 1,
        });
        assert_eq!(
            err.to_string(),
            "invalid parameter: Expected 3 channels, found 1"
        );
    }
}
