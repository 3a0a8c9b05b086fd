//! Error types for the `deslide` crate.
//!
//! This module defines [`DeslideError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry rich context to aid debugging,
//! including file paths, frame dimensions, and upstream error messages.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `deslide` operations.
///
/// Every public method that can fail returns `Result<T, DeslideError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site. All errors are fatal: the extraction
/// pipeline stops at the first one rather than skipping past it, so frame
/// numbering and slide boundaries always reflect exactly what was decoded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeslideError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The video stream reports no usable frame rate or frame count.
    ///
    /// Slide extraction needs both to resolve a sampling stride, so a source
    /// that reports zero for either is rejected at open time.
    #[error("Video stream at {path} is degenerate: {reason}")]
    DegenerateSource {
        /// Path of the rejected file.
        path: PathBuf,
        /// Which metadata field was unusable.
        reason: String,
    },

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    DecodeError(String),

    /// Pixel data was requested before any frame had been reached.
    ///
    /// [`VideoSource::decode_current`](crate::VideoSource::decode_current) is
    /// only meaningful after a successful
    /// [`advance`](crate::VideoSource::advance).
    #[error("No current frame: advance() must succeed before decode_current()")]
    NoCurrentFrame,

    /// The sample rate string could not be parsed or resolves to an unusable
    /// sampling plan.
    #[error("Invalid sample rate {value:?}: {reason}")]
    InvalidSampleRate {
        /// The rate expression as given.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The correlation threshold is outside the accepted `(0, 1]` range.
    #[error("Invalid correlation threshold {0}: must be in (0, 1]")]
    InvalidThreshold(f64),

    /// An output path template failed to parse.
    #[error("Invalid output template {template:?}: {reason}")]
    InvalidTemplate {
        /// The template string as given.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Two frames with different pixel dimensions were compared.
    ///
    /// All frames drawn from one video session share the stream's dimensions,
    /// so a mismatch means the source itself is inconsistent. It is reported
    /// rather than treated as "no match" so the corruption is not silently
    /// folded into a slide boundary.
    #[error(
        "Frame dimension mismatch: {expected_width}x{expected_height} vs {actual_width}x{actual_height}"
    )]
    DimensionMismatch {
        /// Width of the first frame.
        expected_width: u32,
        /// Height of the first frame.
        expected_height: u32,
        /// Width of the second frame.
        actual_width: u32,
        /// Height of the second frame.
        actual_height: u32,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while encoding a slide image.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for DeslideError {
    fn from(error: FfmpegError) -> Self {
        DeslideError::FfmpegError(error.to_string())
    }
}
