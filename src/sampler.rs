//! Frame sampling.
//!
//! [`SampleRate`] expresses how densely to sample a video and resolves to an
//! integer frame stride; [`FrameSampler`] wraps a [`VideoSource`] and lazily
//! yields one decoded [`Frame`] per stride, skipping the frames in between
//! without paying their decode cost.
//!
//! # Example
//!
//! ```no_run
//! use deslide::{DeslideError, FrameSampler, SampleRate, VideoFile};
//!
//! let source = VideoFile::open("lecture.mp4")?;
//! let rate: SampleRate = "1.0fps".parse()?;
//!
//! for frame in FrameSampler::new(source, rate)? {
//!     let frame = frame?;
//!     println!("sampled native frame {} at {:?}", frame.frame_number, frame.timestamp);
//! }
//! # Ok::<(), DeslideError>(())
//! ```

use std::{path::Path, str::FromStr, sync::Arc};

use crate::error::DeslideError;
use crate::frame::Frame;
use crate::progress::{NoOpProgress, ProgressSink};
use crate::source::VideoSource;

/// How densely to sample frames from a video.
///
/// Three forms are accepted, written as `"1.5fps"`, `"0.5%"`, or `"40"`:
///
/// - [`Fps`](SampleRate::Fps): an absolute target rate in frames per second.
/// - [`Percent`](SampleRate::Percent): the stride expressed as a percentage
///   of the native frame rate (`"50%"` on a 30 fps video advances 15 native
///   frames between samples).
/// - [`Count`](SampleRate::Count): a fixed total number of samples spread
///   evenly across the video.
///
/// Each form resolves to an integer stride via [`resolve_stride`]
/// (SampleRate::resolve_stride). Values that cannot produce a usable stride
/// (non-positive rates, a count below 2) are rejected when parsing, and
/// again at stride resolution for directly-constructed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleRate {
    /// Sample at this many frames per second.
    Fps(f64),
    /// Advance this percentage of the native frame rate between samples.
    Percent(f64),
    /// Take this many samples in total, spread evenly. Must be at least 2.
    Count(u64),
}

impl SampleRate {
    /// Parse a sample rate expression.
    ///
    /// Accepts `"<rate>fps"`, `"<percentage>%"`, or a bare integer count,
    /// with surrounding whitespace ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::InvalidSampleRate`] for unparsable input,
    /// non-positive or non-finite rates, and counts below 2.
    pub fn parse(input: &str) -> Result<Self, DeslideError> {
        let invalid = |reason: &str| DeslideError::InvalidSampleRate {
            value: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if let Some(rate_text) = trimmed.strip_suffix("fps") {
            let fps: f64 = rate_text
                .trim()
                .parse()
                .map_err(|_| invalid("expected a number before 'fps'"))?;
            if !fps.is_finite() || fps <= 0.0 {
                return Err(invalid("frame rate must be a positive number"));
            }
            Ok(SampleRate::Fps(fps))
        } else if let Some(percent_text) = trimmed.strip_suffix('%') {
            let percent: f64 = percent_text
                .trim()
                .parse()
                .map_err(|_| invalid("expected a number before '%'"))?;
            if !percent.is_finite() || percent <= 0.0 {
                return Err(invalid("percentage must be a positive number"));
            }
            Ok(SampleRate::Percent(percent))
        } else {
            let count: u64 = trimmed.parse().map_err(|_| {
                invalid("expected '<rate>fps', '<percentage>%', or an integer sample count")
            })?;
            if count < 2 {
                return Err(invalid("sample count must be at least 2"));
            }
            Ok(SampleRate::Count(count))
        }
    }

    /// Resolve this rate to a frame stride for the given source.
    ///
    /// The stride is the number of native frames to advance between two
    /// consecutive samples:
    ///
    /// - `Fps(target)` resolves to `floor(native_fps / target)`.
    /// - `Percent(p)` resolves to `floor(native_fps * p / 100)`.
    /// - `Count(k)` resolves to `floor(total_frames / (k - 1))`, which
    ///   places the first sample at frame 0 and leaves at most `k` samples
    ///   across the video.
    ///
    /// A computed stride below 1 means the request is at or above the native
    /// rate; it is clamped to 1, sampling every frame.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::InvalidSampleRate`] for values the string
    /// grammar would have rejected but that were constructed directly:
    /// non-finite or non-positive rates, and counts below 2. These surface
    /// here, before any sampling begins, rather than as a panic or a silent
    /// every-frame clamp.
    pub fn resolve_stride(&self, native_fps: f64, total_frames: u64) -> Result<u64, DeslideError> {
        let invalid = |value: String, reason: &str| DeslideError::InvalidSampleRate {
            value,
            reason: reason.to_string(),
        };

        let stride = match *self {
            SampleRate::Fps(target) => {
                if !target.is_finite() || target <= 0.0 {
                    return Err(invalid(
                        format!("{target}fps"),
                        "frame rate must be a positive number",
                    ));
                }
                (native_fps / target).floor() as u64
            }
            SampleRate::Percent(percent) => {
                if !percent.is_finite() || percent <= 0.0 {
                    return Err(invalid(
                        format!("{percent}%"),
                        "percentage must be a positive number",
                    ));
                }
                (native_fps * percent / 100.0).floor() as u64
            }
            SampleRate::Count(count) => {
                if count < 2 {
                    return Err(invalid(
                        count.to_string(),
                        "sample count must be at least 2",
                    ));
                }
                total_frames / (count - 1)
            }
        };
        Ok(stride.max(1))
    }
}

impl FromStr for SampleRate {
    type Err = DeslideError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        SampleRate::parse(input)
    }
}

/// A lazy iterator over sampled, decoded frames.
///
/// Wraps a [`VideoSource`] and advances it one native frame at a time,
/// decoding only the frames the resolved stride selects (native frame
/// numbers `0, stride, 2 * stride, ...`). Every native frame advanced past,
/// decoded or not, is reported to the attached [`ProgressSink`].
///
/// The iterator ends when the source reports end of stream, and fuses after
/// yielding an error. Dropping it early decodes nothing further.
pub struct FrameSampler<S> {
    source: S,
    stride: u64,
    total_frames: u64,
    source_path: Arc<Path>,
    progress: Arc<dyn ProgressSink>,
    /// Native frames advanced so far; also the frame number the next
    /// successful advance will land on.
    frames_advanced: u64,
    done: bool,
}

impl<S: VideoSource> FrameSampler<S> {
    /// Create a sampler over `source` at the given rate.
    ///
    /// The stride is resolved once, here, from the source's reported frame
    /// rate and frame count.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::InvalidSampleRate`] if `rate` cannot resolve
    /// to a stride (non-positive or non-finite rate, count below 2). This is
    /// rejected here, before the source is ever advanced.
    pub fn new(source: S, rate: SampleRate) -> Result<Self, DeslideError> {
        let native_fps = source.native_frame_rate();
        let total_frames = source.total_frame_count();
        let stride = rate.resolve_stride(native_fps, total_frames)?;
        let source_path: Arc<Path> = Arc::from(source.path());

        log::debug!(
            "Sampling {} at {rate:?}: stride {stride} over {total_frames} native frames ({native_fps:.3} fps)",
            source_path.display(),
        );

        Ok(Self {
            source,
            stride,
            total_frames,
            source_path,
            progress: Arc::new(NoOpProgress),
            frames_advanced: 0,
            done: false,
        })
    }

    /// Attach a progress sink, notified once per native frame advanced.
    #[must_use]
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// The resolved frame stride.
    #[must_use]
    pub fn stride(&self) -> u64 {
        self.stride
    }
}

impl<S: VideoSource> Iterator for FrameSampler<S> {
    type Item = Result<Frame, DeslideError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.source.advance() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            }

            let frame_number = self.frames_advanced;
            self.frames_advanced += 1;
            self.progress.on_advance(self.frames_advanced, self.total_frames);

            if frame_number % self.stride != 0 {
                continue;
            }

            match self.source.decode_current() {
                Ok((image, timestamp)) => {
                    return Some(Ok(Frame {
                        image,
                        frame_number,
                        timestamp,
                        source: Arc::clone(&self.source_path),
                    }));
                }
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            }
        }
    }
}
