//! Progress reporting.
//!
//! This module provides [`ProgressSink`] for monitoring a slide extraction
//! pass. The [`FrameSampler`](crate::FrameSampler) notifies the sink once per
//! native frame it advances past, whether or not that frame is decoded, so a
//! sink driving a progress bar over the video's total frame count reaches 100%
//! exactly when the pass ends.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use deslide::{DeslideError, ExtractOptions, ProgressSink, SlideExtractor};
//!
//! struct PrintProgress;
//!
//! impl ProgressSink for PrintProgress {
//!     fn on_advance(&self, frames_advanced: u64, total_frames: u64) {
//!         if frames_advanced % 100 == 0 {
//!             println!("{frames_advanced}/{total_frames} frames scanned");
//!         }
//!     }
//! }
//!
//! let mut extractor = SlideExtractor::open("lecture.mp4")?;
//! let options = ExtractOptions::new().with_progress(Arc::new(PrintProgress));
//! for slide in extractor.slides(options)? {
//!     let _slide = slide?;
//! }
//! # Ok::<(), DeslideError>(())
//! ```

/// Trait for receiving per-frame progress updates during extraction.
///
/// Implementations must be [`Send`] and [`Sync`] so a sink can be shared
/// with other threads (a terminal progress bar, a UI channel).
///
/// Sinks are **infallible observers**: they cannot pause or halt the pass,
/// and extraction results never depend on what a sink does. To stop early,
/// stop pulling from the slide iterator.
pub trait ProgressSink: Send + Sync {
    /// Called after each native frame the sampler advances past.
    ///
    /// `frames_advanced` counts from 1; `total_frames` is the source's
    /// reported frame count, which may be an estimate.
    fn on_advance(&self, frames_advanced: u64, total_frames: u64);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no sink is configured.
pub(crate) struct NoOpProgress;

impl ProgressSink for NoOpProgress {
    fn on_advance(&self, _frames_advanced: u64, _total_frames: u64) {}
}
