//! Sampled frame and slide data types.
//!
//! [`Frame`] is a single decoded video frame together with its position in the
//! source, produced by the [`FrameSampler`](crate::FrameSampler). [`Slide`] is
//! a maximal run of consecutive visually-identical sampled frames, produced by
//! the [`SlideIterator`](crate::SlideIterator), represented by its two boundary
//! frames.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    sync::Arc,
    time::Duration,
};

use image::RgbImage;

/// A single sampled video frame.
///
/// Carries the decoded RGB pixel data alongside the frame's position in the
/// source video: its native frame number (0-based, counting every frame of the
/// stream, not just sampled ones) and its elapsed timestamp. The `source` path
/// is shared across all frames of one extraction session.
#[derive(Clone)]
pub struct Frame {
    /// Decoded pixel data in RGB8.
    pub image: RgbImage,
    /// Native frame number in the source video, 0-based.
    pub frame_number: u64,
    /// Elapsed time from the start of the video to this frame.
    pub timestamp: Duration,
    /// Path of the video this frame was decoded from.
    pub source: Arc<Path>,
}

impl Frame {
    /// Pixel dimensions of this frame as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl Debug for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let (width, height) = self.dimensions();
        f.debug_struct("Frame")
            .field("frame_number", &self.frame_number)
            .field("timestamp", &self.timestamp)
            .field("dimensions", &format_args!("{width}x{height}"))
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A maximal run of consecutive visually-identical sampled frames.
///
/// Produced by [`SlideIterator`](crate::SlideIterator) in playback order.
/// Only the run's boundary frames are retained; interior frames are dropped
/// as the run grows. For a run of a single frame, `start` and `end` are
/// clones of that frame.
///
/// # Example
///
/// ```no_run
/// use deslide::SlideExtractor;
///
/// let mut extractor = SlideExtractor::open("lecture.mp4")?;
/// for slide in extractor.slides(Default::default())? {
///     let slide = slide?;
///     println!(
///         "slide {} covers frames {}..={}",
///         slide.number(),
///         slide.start.frame_number,
///         slide.end.frame_number,
///     );
/// }
/// # Ok::<(), deslide::DeslideError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Slide {
    /// Emission ordinal, 0-based. The first slide of a video has index 0.
    pub index: u64,
    /// First sampled frame of the run.
    pub start: Frame,
    /// Last sampled frame of the run. Equal to `start` for single-frame runs.
    pub end: Frame,
}

impl Slide {
    /// 1-based slide number, derived from [`index`](Slide::index).
    ///
    /// The first slide of a video is number 1. This is a view over `index`,
    /// never tracked separately.
    pub fn number(&self) -> u64 {
        self.index + 1
    }

    /// Path of the video both boundary frames were decoded from.
    ///
    /// `start` and `end` always originate from the same source.
    pub fn source(&self) -> &Path {
        &self.start.source
    }

    /// Time spanned by this slide, from its first to its last sampled frame.
    ///
    /// Zero for single-frame runs.
    pub fn duration(&self) -> Duration {
        self.end.timestamp.saturating_sub(self.start.timestamp)
    }
}
