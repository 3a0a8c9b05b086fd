//! FFmpeg-backed video source.
//!
//! [`VideoFile`] opens a video file, validates its stream metadata, and
//! implements [`VideoSource`] on top of a forward-only decode loop: each
//! [`advance`](VideoSource::advance) pulls packets until the decoder produces
//! the next frame, and [`decode_current`](VideoSource::decode_current)
//! converts that frame to RGB only when the sampler actually wants it. Frames
//! advanced past without a decode request never pay the scaling and copy cost.
//!
//! # Example
//!
//! ```no_run
//! use deslide::{DeslideError, VideoFile, VideoSource};
//!
//! let mut source = VideoFile::open("lecture.mp4")?;
//! println!(
//!     "{} frames at {:.2} fps",
//!     source.total_frame_count(),
//!     source.native_frame_rate(),
//! );
//!
//! while source.advance()? {
//!     let (image, timestamp) = source.decode_current()?;
//!     println!("{}x{} frame at {timestamp:?}", image.width(), image.height());
//! }
//! # Ok::<(), DeslideError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError,
    Packet,
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as RawFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use ffmpeg_sys_next::AV_NOPTS_VALUE;
use image::RgbImage;

use crate::error::DeslideError;
use crate::source::VideoSource;

/// Metadata for the video stream slide extraction reads.
///
/// Snapshotted once at open time.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Total number of frames, from the container when recorded, otherwise
    /// estimated from duration and frame rate.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"vp9"`, `"av1"`).
    pub codec: String,
    /// Total duration of the video.
    pub duration: Duration,
}

/// An open video file, decoded sequentially one frame at a time.
///
/// Created via [`VideoFile::open`]. The cursor only moves forward; there is
/// no seeking. Stream metadata is validated at open: a source that reports a
/// zero frame rate or zero frame count is rejected with
/// [`DeslideError::DegenerateSource`] rather than producing an unsamplable
/// pass later.
pub struct VideoFile {
    input: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    stream_index: usize,
    time_base: Rational,
    /// PTS of the stream's first frame; subtracted so timestamps are elapsed
    /// time, not container time.
    stream_start_pts: i64,
    path: PathBuf,
    metadata: VideoMetadata,
    decoded_frame: RawFrame,
    scaled_frame: RawFrame,
    /// Count of successful advances; the current frame's number is one less.
    frames_advanced: u64,
    eof_sent: bool,
    finished: bool,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("frames_advanced", &self.frames_advanced)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file for sequential decoding.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and validates that the stream reports a positive frame
    /// rate and frame count.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::FileOpen`] if the file cannot be opened or a
    /// decoder cannot be built, [`DeslideError::NoVideoStream`] if it has no
    /// video stream, and [`DeslideError::DegenerateSource`] if the stream's
    /// reported frame rate or frame count is unusable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deslide::{DeslideError, VideoFile};
    ///
    /// let source = VideoFile::open("lecture.mp4")?;
    /// # Ok::<(), DeslideError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DeslideError> {
        let path = path.as_ref();
        let canonical_path = path.to_path_buf();

        log::debug!("Opening video file: {}", canonical_path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| DeslideError::FileOpen {
            path: canonical_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| DeslideError::FileOpen {
            path: canonical_path.clone(),
            reason: error.to_string(),
        })?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or(DeslideError::NoVideoStream)?;
        let stream_index = stream.index();
        let time_base = stream.time_base();

        let stream_start_pts = match stream.start_time() {
            AV_NOPTS_VALUE => 0,
            start => start,
        };

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                DeslideError::FileOpen {
                    path: canonical_path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| DeslideError::FileOpen {
                path: canonical_path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let frames_per_second = resolve_frame_rate(stream.avg_frame_rate(), stream.rate())
            .ok_or_else(|| DeslideError::DegenerateSource {
                path: canonical_path.clone(),
                reason: "stream reports no frame rate".to_string(),
            })?;

        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let frame_count = resolve_frame_count(stream.frames(), duration, frames_per_second)
            .ok_or_else(|| DeslideError::DegenerateSource {
                path: canonical_path.clone(),
                reason: "stream reports no frames".to_string(),
            })?;

        let width = decoder.width();
        let height = decoder.height();
        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| DeslideError::FileOpen {
            path: canonical_path.clone(),
            reason: format!("Failed to create pixel format converter: {error}"),
        })?;

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
            codec,
            duration,
        };

        log::info!(
            "Opened {}: {}x{}, {:.3} fps, {} frames, codec {}",
            canonical_path.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec,
        );

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            time_base,
            stream_start_pts,
            path: canonical_path,
            metadata,
            decoded_frame: RawFrame::empty(),
            scaled_frame: RawFrame::empty(),
            frames_advanced: 0,
            eof_sent: false,
            finished: false,
        })
    }

    /// Metadata for the video stream being read.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Elapsed time of the current frame, from its PTS when present.
    ///
    /// Falls back to frame number over frame rate for streams that do not
    /// stamp presentation times.
    fn current_timestamp(&self) -> Duration {
        match self.decoded_frame.pts() {
            Some(pts) => {
                let elapsed_pts = pts - self.stream_start_pts;
                let seconds = elapsed_pts as f64 * self.time_base.numerator() as f64
                    / self.time_base.denominator() as f64;
                Duration::from_secs_f64(seconds.max(0.0))
            }
            None => {
                let current_frame_number = self.frames_advanced.saturating_sub(1);
                Duration::from_secs_f64(
                    current_frame_number as f64 / self.metadata.frames_per_second,
                )
            }
        }
    }
}

impl VideoSource for VideoFile {
    fn native_frame_rate(&self) -> f64 {
        self.metadata.frames_per_second
    }

    fn total_frame_count(&self) -> u64 {
        self.metadata.frame_count
    }

    fn advance(&mut self) -> Result<bool, DeslideError> {
        if self.finished {
            return Ok(false);
        }

        loop {
            // Try to receive a frame the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                self.frames_advanced += 1;
                return Ok(true);
            }

            if self.eof_sent {
                // EOF sent and the decoder is drained.
                self.finished = true;
                return Ok(false);
            }

            // Decoder has no buffered frames. Feed it more packets.
            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() == self.stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            self.finished = true;
                            return Err(DeslideError::DecodeError(format!(
                                "decoder rejected packet near frame {}: {error}",
                                self.frames_advanced,
                            )));
                        }
                    }
                    // Non-video packets are silently skipped.
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        self.finished = true;
                        return Err(DeslideError::DecodeError(format!(
                            "failed to flush decoder: {error}",
                        )));
                    }
                    self.eof_sent = true;
                }
                Err(error) => {
                    // A read failure that is not end-of-stream would
                    // desynchronize frame numbering if skipped.
                    self.finished = true;
                    return Err(DeslideError::DecodeError(format!(
                        "packet read failed near frame {}: {error}",
                        self.frames_advanced,
                    )));
                }
            }
        }
    }

    fn decode_current(&mut self) -> Result<(RgbImage, Duration), DeslideError> {
        if self.frames_advanced == 0 {
            return Err(DeslideError::NoCurrentFrame);
        }

        self.scaler
            .run(&self.decoded_frame, &mut self.scaled_frame)
            .map_err(|error| {
                DeslideError::DecodeError(format!("pixel format conversion failed: {error}"))
            })?;

        let width = self.metadata.width;
        let height = self.metadata.height;
        let buffer = frame_to_rgb_buffer(&self.scaled_frame, width, height);
        let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            DeslideError::DecodeError(
                "failed to construct RGB image from decoded frame data".to_string(),
            )
        })?;

        Ok((image, self.current_timestamp()))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Frames per second from the stream's average frame rate, falling back to
/// the raw rate field. `None` when neither field yields a positive rate;
/// callers reject such streams as degenerate.
fn resolve_frame_rate(average: Rational, raw: Rational) -> Option<f64> {
    for rate in [average, raw] {
        if rate.denominator() != 0 {
            let frames_per_second = rate.numerator() as f64 / rate.denominator() as f64;
            if frames_per_second > 0.0 {
                return Some(frames_per_second);
            }
        }
    }
    None
}

/// Frame count from the container when recorded, otherwise estimated from
/// duration and frame rate. `None` when both come out empty.
fn resolve_frame_count(recorded: i64, duration: Duration, frames_per_second: f64) -> Option<u64> {
    if recorded > 0 {
        return Some(recorded as u64);
    }
    let estimated = (duration.as_secs_f64() * frames_per_second) as u64;
    (estimated > 0).then_some(estimated)
}

/// Copy pixel data from an FFmpeg video frame into a tightly-packed RGB
/// buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3).
/// This strips that padding so the result can be passed directly to
/// [`image::RgbImage::from_raw`].
fn frame_to_rgb_buffer(frame: &RawFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = frame.data(0);

    if stride == expected_stride {
        // No padding — fast path: copy the entire plane at once.
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        // Stride includes padding bytes — copy row by row.
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}
