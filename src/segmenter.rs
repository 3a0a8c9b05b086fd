//! Run segmentation: grouping sampled frames into slides.
//!
//! [`SlideIterator`] consumes a sequence of sampled [`Frame`]s and partitions
//! it into maximal runs of consecutive visually-identical frames, yielding one
//! [`Slide`] per run. Each incoming frame is compared against the run's most
//! recent frame only, so the pass is single-lookback: no matter how long a
//! slide stays on screen, only its first and latest frames are held in memory.
//!
//! # Example
//!
//! ```no_run
//! use deslide::{CorrelationMatcher, DeslideError, FrameSampler, SlideIterator, VideoFile};
//!
//! let source = VideoFile::open("lecture.mp4")?;
//! let frames = FrameSampler::new(source, "1.0fps".parse()?)?;
//! let slides = SlideIterator::new(frames, CorrelationMatcher::new(0.999));
//!
//! for slide in slides {
//!     let slide = slide?;
//!     println!("slide {}: {:?} to {:?}", slide.number(), slide.start.timestamp, slide.end.timestamp);
//! }
//! # Ok::<(), DeslideError>(())
//! ```

use crate::error::DeslideError;
use crate::frame::{Frame, Slide};
use crate::similarity::FrameMatcher;

/// The run being accumulated: its first frame, and its most recent frame
/// once it holds more than one. Interior frames are dropped as the run grows.
struct Run {
    first: Frame,
    latest: Option<Frame>,
}

impl Run {
    fn starting_at(frame: Frame) -> Self {
        Self {
            first: frame,
            latest: None,
        }
    }

    /// The frame the next incoming frame is compared against.
    fn newest(&self) -> &Frame {
        self.latest.as_ref().unwrap_or(&self.first)
    }
}

/// A lazy iterator over [`Slide`]s.
///
/// Wraps any sequence of `Result<Frame, DeslideError>` (normally a
/// [`FrameSampler`](crate::FrameSampler)) and a [`FrameMatcher`]. Pulling a
/// slide pulls frames from the underlying sequence until a run boundary is
/// found or the sequence ends; the final pending run is emitted at
/// exhaustion. An error from the frame sequence or the matcher is yielded
/// once, after which the iterator is fused.
///
/// Slide `index` values are assigned 0-based in emission order.
pub struct SlideIterator<I, M> {
    frames: I,
    matcher: M,
    run: Option<Run>,
    next_index: u64,
    done: bool,
}

impl<I, M> SlideIterator<I, M>
where
    I: Iterator<Item = Result<Frame, DeslideError>>,
    M: FrameMatcher,
{
    /// Create a slide iterator over `frames` using `matcher` to decide run
    /// boundaries.
    pub fn new(frames: I, matcher: M) -> Self {
        Self {
            frames,
            matcher,
            run: None,
            next_index: 0,
            done: false,
        }
    }

    /// Close `run` as the next slide in emission order.
    fn close_run(&mut self, run: Run) -> Slide {
        let index = self.next_index;
        self.next_index += 1;

        let start = run.first;
        let end = match run.latest {
            Some(latest) => latest,
            // Single-frame run: both boundaries are the same frame.
            None => start.clone(),
        };

        log::debug!(
            "Slide {index} closed: native frames {}..={} ({:?} to {:?})",
            start.frame_number,
            end.frame_number,
            start.timestamp,
            end.timestamp,
        );

        Slide { index, start, end }
    }
}

impl<I, M> Iterator for SlideIterator<I, M>
where
    I: Iterator<Item = Result<Frame, DeslideError>>,
    M: FrameMatcher,
{
    type Item = Result<Slide, DeslideError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let frame = match self.frames.next() {
                Some(Ok(frame)) => frame,
                Some(Err(error)) => {
                    self.done = true;
                    return Some(Err(error));
                }
                None => {
                    self.done = true;
                    let pending = self.run.take();
                    return pending.map(|run| Ok(self.close_run(run)));
                }
            };

            let extends_run = match self.run.as_ref() {
                None => None,
                Some(run) => match self.matcher.is_match(run.newest(), &frame) {
                    Ok(matched) => Some(matched),
                    Err(error) => {
                        self.done = true;
                        return Some(Err(error));
                    }
                },
            };

            match extends_run {
                // First frame of the sequence starts the first run.
                None => self.run = Some(Run::starting_at(frame)),
                Some(true) => {
                    if let Some(run) = self.run.as_mut() {
                        run.latest = Some(frame);
                    }
                }
                Some(false) => {
                    let closed = self.run.replace(Run::starting_at(frame));
                    if let Some(run) = closed {
                        return Some(Ok(self.close_run(run)));
                    }
                }
            }
        }
    }
}
