//! # deslide
//!
//! Extract presentation slides from video files as still images.
//!
//! `deslide` scans a video of a slide presentation (a lecture recording, a
//! conference talk, a screen capture), samples frames at a configurable rate,
//! groups consecutive visually-identical frames into runs, and yields one
//! [`Slide`] per run carrying the run's first and last frame. Decoding is
//! powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; similarity is
//! decided by normalized cross-correlation of the sampled frames.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deslide::SlideExtractor;
//!
//! let mut extractor = SlideExtractor::open("lecture.mp4").unwrap();
//! for slide in extractor.slides(Default::default()).unwrap() {
//!     let slide = slide.unwrap();
//!     slide.end.image.save(format!("slide_{:03}.png", slide.number())).unwrap();
//! }
//! ```
//!
//! ### Tuning the pass
//!
//! ```no_run
//! use deslide::{ExtractOptions, SlideExtractor};
//!
//! let mut extractor = SlideExtractor::open("lecture.mp4").unwrap();
//! let options = ExtractOptions::new()
//!     .with_sample_rate("0.5fps".parse().unwrap())
//!     .with_correlation_threshold(0.995);
//!
//! for slide in extractor.slides(options).unwrap() {
//!     let slide = slide.unwrap();
//!     println!(
//!         "slide {} held from {:?} to {:?}",
//!         slide.number(),
//!         slide.start.timestamp,
//!         slide.end.timestamp,
//!     );
//! }
//! ```
//!
//! ### Composing the pipeline by hand
//!
//! The façade is a thin wrapper; the pieces compose directly when more
//! control is needed:
//!
//! ```no_run
//! use deslide::{CorrelationMatcher, FrameSampler, SlideIterator, VideoFile};
//!
//! let source = VideoFile::open("lecture.mp4").unwrap();
//! let frames = FrameSampler::new(source, "1.0fps".parse().unwrap()).unwrap();
//! let slides = SlideIterator::new(frames, CorrelationMatcher::new(0.999));
//!
//! for slide in slides {
//!     let slide = slide.unwrap();
//!     println!("{}..={}", slide.start.frame_number, slide.end.frame_number);
//! }
//! ```
//!
//! ## How it works
//!
//! - **Sampling** — a [`SampleRate`] (`"1.5fps"`, `"50%"`, or a fixed count
//!   like `"40"`) resolves to an integer stride; [`FrameSampler`] advances
//!   the video one native frame at a time and decodes to RGB only every
//!   stride-th frame.
//! - **Similarity** — [`CorrelationMatcher`] computes the normalized
//!   cross-correlation of two frames' raw RGB samples and compares it
//!   against a threshold (default 0.999).
//! - **Segmentation** — [`SlideIterator`] groups the sampled sequence into
//!   maximal runs of adjacent-similar frames in a single pass, holding only
//!   each run's boundary frames in memory.
//!
//! The whole pipeline is lazy and pull-based: nothing is decoded until a
//! slide is requested, and dropping the iterator stops all work.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system. See the
//! [README](https://github.com/skanderjeddi/deslide#installation) for
//! platform-specific instructions.

pub mod error;
pub mod extractor;
pub mod ffmpeg;
pub mod frame;
pub mod output_format;
pub mod progress;
pub mod sampler;
pub mod segmenter;
pub mod similarity;
pub mod source;
pub mod video;

pub use error::DeslideError;
pub use extractor::{ExtractOptions, SlideExtractor};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use frame::{Frame, Slide};
pub use output_format::OutputTemplate;
pub use progress::ProgressSink;
pub use sampler::{FrameSampler, SampleRate};
pub use segmenter::SlideIterator;
pub use similarity::{CorrelationMatcher, FrameMatcher};
pub use source::VideoSource;
pub use video::{VideoFile, VideoMetadata};
