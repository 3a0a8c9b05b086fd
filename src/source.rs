//! The video source abstraction.
//!
//! [`VideoSource`] is the seam between frame sampling and the decoding
//! backend. The production implementation is [`VideoFile`](crate::VideoFile)
//! (FFmpeg-backed); tests substitute scripted sources that synthesize frames
//! without touching a real file.
//!
//! The trait splits *advancing* the stream cursor from *materializing* pixel
//! data. [`advance`](VideoSource::advance) moves one native frame forward as
//! cheaply as the backing decoder allows;
//! [`decode_current`](VideoSource::decode_current) pays the full
//! convert-to-RGB cost only for the frames the sampler actually selects.

use std::{path::Path, time::Duration};

use image::RgbImage;

use crate::error::DeslideError;

/// A forward-only decoded view of a video stream.
///
/// Implementations report stream metadata (native frame rate and total frame
/// count, both validated as nonzero at construction) and expose a cursor that
/// only moves forward. There is no seeking; slide extraction is a single
/// sequential pass.
pub trait VideoSource {
    /// Native frame rate of the stream in frames per second.
    ///
    /// Always greater than zero for a successfully opened source.
    fn native_frame_rate(&self) -> f64;

    /// Total number of frames in the stream.
    ///
    /// May be an estimate for containers that do not record an exact count.
    /// Always greater than zero for a successfully opened source.
    fn total_frame_count(&self) -> u64;

    /// Advance the cursor by one native frame.
    ///
    /// Returns `Ok(true)` if a new frame is now current, `Ok(false)` at end
    /// of stream. Must not materialize RGB pixel data beyond what the backing
    /// decoder inherently requires to step forward.
    ///
    /// # Errors
    ///
    /// Any demux or decode failure other than a clean end of stream is
    /// returned as an error; the stream position is unspecified afterwards.
    fn advance(&mut self) -> Result<bool, DeslideError>;

    /// Materialize the frame at the cursor.
    ///
    /// Returns the frame's RGB pixel data and its elapsed timestamp from the
    /// start of the video.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::NoCurrentFrame`] if called before any
    /// successful [`advance`](VideoSource::advance), and a decode error if
    /// pixel conversion fails.
    fn decode_current(&mut self) -> Result<(RgbImage, Duration), DeslideError>;

    /// Path identifying the source video.
    ///
    /// Stamped onto every [`Frame`](crate::Frame) produced from this source.
    fn path(&self) -> &Path;
}

impl<S: VideoSource + ?Sized> VideoSource for &mut S {
    fn native_frame_rate(&self) -> f64 {
        (**self).native_frame_rate()
    }

    fn total_frame_count(&self) -> u64 {
        (**self).total_frame_count()
    }

    fn advance(&mut self) -> Result<bool, DeslideError> {
        (**self).advance()
    }

    fn decode_current(&mut self) -> Result<(RgbImage, Duration), DeslideError> {
        (**self).decode_current()
    }

    fn path(&self) -> &Path {
        (**self).path()
    }
}
