//! Core [`SlideExtractor`] implementation.
//!
//! `SlideExtractor` is the main entry point for the crate. It opens a video
//! file, validates and caches its metadata, and wires the frame sampler and
//! run segmenter into a lazy stream of [`Slide`](crate::Slide)s.
//!
//! # Example
//!
//! ```no_run
//! use deslide::{DeslideError, ExtractOptions, SlideExtractor};
//!
//! let mut extractor = SlideExtractor::open("lecture.mp4")?;
//! println!("{:.2} fps", extractor.metadata().frames_per_second);
//!
//! let options = ExtractOptions::new()
//!     .with_sample_rate("2.0fps".parse()?)
//!     .with_correlation_threshold(0.995);
//!
//! for slide in extractor.slides(options)? {
//!     let slide = slide?;
//!     slide.end.image.save(format!("slide_{:03}.png", slide.number()))?;
//! }
//! # Ok::<(), DeslideError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    sync::Arc,
};

use crate::error::DeslideError;
use crate::progress::{NoOpProgress, ProgressSink};
use crate::sampler::{FrameSampler, SampleRate};
use crate::segmenter::SlideIterator;
use crate::similarity::CorrelationMatcher;
use crate::source::VideoSource;
use crate::video::{VideoFile, VideoMetadata};

/// Configuration for one slide extraction pass.
///
/// Carries the sampling rate, the similarity threshold, and an optional
/// progress sink. A default-constructed value samples at 1 frame per second
/// with a correlation threshold of 0.999 and no progress reporting.
#[derive(Clone)]
pub struct ExtractOptions {
    pub(crate) sample_rate: SampleRate,
    pub(crate) correlation_threshold: f64,
    pub(crate) progress: Arc<dyn ProgressSink>,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("sample_rate", &self.sample_rate)
            .field("correlation_threshold", &self.correlation_threshold)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create options with default settings.
    ///
    /// Defaults: sample at 1 fps, correlation threshold 0.999, no progress
    /// sink.
    pub fn new() -> Self {
        Self {
            sample_rate: SampleRate::Fps(1.0),
            correlation_threshold: 0.999,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the frame sampling rate.
    ///
    /// Directly-constructed values are validated when the extraction pass
    /// starts, like the threshold.
    #[must_use]
    pub fn with_sample_rate(mut self, rate: SampleRate) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Set the correlation threshold two frames must strictly exceed to be
    /// considered the same slide.
    ///
    /// Must be in `(0, 1]`; validated when the extraction pass starts.
    #[must_use]
    pub fn with_correlation_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = threshold;
        self
    }

    /// Attach a progress sink, notified once per native frame advanced.
    #[must_use]
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }
}

/// Extracts slides from a video file.
///
/// Created via [`SlideExtractor::open`], which validates the source up
/// front. [`slides`](SlideExtractor::slides) starts a lazy extraction pass;
/// the video is decoded only as slides are pulled from the returned
/// iterator, and dropping the iterator early stops all decoding.
#[derive(Debug)]
pub struct SlideExtractor {
    video: VideoFile,
}

impl SlideExtractor {
    /// Open a video file for slide extraction.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`VideoFile::open`]: the file cannot be
    /// opened, has no video stream, or reports degenerate metadata.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DeslideError> {
        Ok(Self {
            video: VideoFile::open(path)?,
        })
    }

    /// Metadata for the video stream being read.
    pub fn metadata(&self) -> &VideoMetadata {
        self.video.metadata()
    }

    /// Path of the opened video file.
    pub fn path(&self) -> &Path {
        self.video.path()
    }

    /// Start an extraction pass and return the lazy slide stream.
    ///
    /// The extractor is borrowed for the lifetime of the returned iterator;
    /// one pass must finish (or be dropped) before the next starts. The
    /// cursor is not rewound between passes, so a second pass on the same
    /// extractor continues from wherever the previous one stopped pulling.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::InvalidThreshold`] if the configured
    /// correlation threshold is outside `(0, 1]`, and
    /// [`DeslideError::InvalidSampleRate`] if the configured rate cannot
    /// resolve to a stride (non-positive or non-finite rate, count below 2).
    /// Both are rejected here, before any decoding starts.
    pub fn slides(
        &mut self,
        options: ExtractOptions,
    ) -> Result<SlideIterator<FrameSampler<&mut VideoFile>, CorrelationMatcher>, DeslideError>
    {
        let threshold = options.correlation_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(DeslideError::InvalidThreshold(threshold));
        }

        log::debug!(
            "Starting slide extraction pass on {} with {options:?}",
            self.path().display(),
        );

        let sampler = FrameSampler::new(&mut self.video, options.sample_rate)?
            .with_progress(options.progress);
        Ok(SlideIterator::new(sampler, CorrelationMatcher::new(threshold)))
    }
}
