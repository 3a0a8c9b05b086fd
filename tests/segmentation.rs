//! Run segmentation integration tests over synthetic frame sequences.

use std::{path::Path, sync::Arc, time::Duration};

use deslide::{DeslideError, Frame, FrameMatcher, Slide, SlideIterator};
use image::RgbImage;

fn frame(frame_number: u64) -> Frame {
    Frame {
        image: RgbImage::from_pixel(4, 4, image::Rgb([128, 128, 128])),
        frame_number,
        timestamp: Duration::from_secs(frame_number),
        source: Arc::from(Path::new("synthetic.mp4")),
    }
}

fn frames(count: u64) -> Vec<Result<Frame, DeslideError>> {
    (0..count).map(|number| Ok(frame(number))).collect()
}

/// Matcher scripted by frame number: `decisions[i]` answers whether frames
/// `i` and `i + 1` show the same slide.
struct ScriptedMatcher {
    decisions: Vec<bool>,
}

impl FrameMatcher for ScriptedMatcher {
    fn is_match(&self, a: &Frame, _b: &Frame) -> Result<bool, DeslideError> {
        Ok(self.decisions[a.frame_number as usize])
    }
}

struct AlwaysMatch;

impl FrameMatcher for AlwaysMatch {
    fn is_match(&self, _a: &Frame, _b: &Frame) -> Result<bool, DeslideError> {
        Ok(true)
    }
}

struct NeverMatch;

impl FrameMatcher for NeverMatch {
    fn is_match(&self, _a: &Frame, _b: &Frame) -> Result<bool, DeslideError> {
        Ok(false)
    }
}

fn collect(
    frames: Vec<Result<Frame, DeslideError>>,
    matcher: impl FrameMatcher,
) -> Vec<Slide> {
    SlideIterator::new(frames.into_iter(), matcher)
        .collect::<Result<Vec<_>, _>>()
        .expect("segmentation should not fail")
}

// ── degenerate inputs ──────────────────────────────────────────────

#[test]
fn empty_input_yields_no_slides() {
    let slides = collect(frames(0), AlwaysMatch);
    assert!(slides.is_empty());
}

#[test]
fn single_frame_yields_single_slide() {
    let slides = collect(frames(1), AlwaysMatch);

    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].index, 0);
    assert_eq!(slides[0].start.frame_number, 0);
    assert_eq!(slides[0].end.frame_number, 0);
}

// ── run grouping ───────────────────────────────────────────────────

#[test]
fn all_matching_frames_form_one_slide() {
    let slides = collect(frames(7), AlwaysMatch);

    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].start.frame_number, 0);
    assert_eq!(slides[0].end.frame_number, 6);
}

#[test]
fn no_matching_frames_form_one_slide_each() {
    let slides = collect(frames(5), NeverMatch);

    assert_eq!(slides.len(), 5);
    for (position, slide) in slides.iter().enumerate() {
        assert_eq!(slide.index, position as u64);
        assert_eq!(slide.start.frame_number, position as u64);
        assert_eq!(slide.end.frame_number, position as u64);
    }
}

#[test]
fn mismatch_splits_runs_at_the_boundary() {
    // Pairs 0-1 and 1-2 match, 2-3 does not, 3-4 matches: two slides,
    // frames [0, 1, 2] and [3, 4].
    let matcher = ScriptedMatcher {
        decisions: vec![true, true, false, true],
    };
    let slides = collect(frames(5), matcher);

    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].start.frame_number, 0);
    assert_eq!(slides[0].end.frame_number, 2);
    assert_eq!(slides[1].start.frame_number, 3);
    assert_eq!(slides[1].end.frame_number, 4);
}

#[test]
fn final_pending_run_is_flushed_at_exhaustion() {
    let matcher = ScriptedMatcher {
        decisions: vec![false, true, true],
    };
    let slides = collect(frames(4), matcher);

    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].start.frame_number, 0);
    assert_eq!(slides[0].end.frame_number, 0);
    assert_eq!(slides[1].start.frame_number, 1);
    assert_eq!(slides[1].end.frame_number, 3);
}

#[test]
fn slide_spans_partition_the_input_sequence() {
    // Whatever the match pattern, the emitted spans must reconstruct the
    // sampled sequence with no gaps and no overlaps.
    let matcher = ScriptedMatcher {
        decisions: vec![true, false, false, true, true, false, true, true, false],
    };
    let slides = collect(frames(10), matcher);

    let mut expected_next = 0;
    for slide in &slides {
        assert_eq!(slide.start.frame_number, expected_next);
        assert!(slide.end.frame_number >= slide.start.frame_number);
        expected_next = slide.end.frame_number + 1;
    }
    assert_eq!(expected_next, 10);
}

// ── numbering ──────────────────────────────────────────────────────

#[test]
fn indices_are_sequential_from_zero() {
    let slides = collect(frames(6), NeverMatch);

    for (position, slide) in slides.iter().enumerate() {
        assert_eq!(slide.index, position as u64);
    }
}

#[test]
fn number_is_always_index_plus_one() {
    let matcher = ScriptedMatcher {
        decisions: vec![true, false, true, false, false, true, true],
    };
    let slides = collect(frames(8), matcher);

    assert!(!slides.is_empty());
    for slide in &slides {
        assert_eq!(slide.number(), slide.index + 1);
    }
}

// ── frame identity ─────────────────────────────────────────────────

#[test]
fn boundary_frames_share_the_source() {
    let matcher = ScriptedMatcher {
        decisions: vec![true, false, true],
    };
    for slide in collect(frames(4), matcher) {
        assert_eq!(slide.start.source, slide.end.source);
        assert_eq!(slide.source(), Path::new("synthetic.mp4"));
    }
}

#[test]
fn slide_duration_spans_the_run() {
    let slides = collect(frames(4), AlwaysMatch);

    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].duration(), Duration::from_secs(3));
}

// ── error propagation ──────────────────────────────────────────────

#[test]
fn frame_error_is_yielded_once_then_fused() {
    let input: Vec<Result<Frame, DeslideError>> = vec![
        Ok(frame(0)),
        Ok(frame(1)),
        Err(DeslideError::DecodeError("corrupt frame".to_string())),
        Ok(frame(3)),
    ];

    let mut slides = SlideIterator::new(input.into_iter(), AlwaysMatch);
    let first = slides.next().expect("error should be yielded");
    assert!(matches!(first, Err(DeslideError::DecodeError(_))));
    assert!(slides.next().is_none(), "iterator should fuse after an error");
}

#[test]
fn matcher_error_is_yielded_once_then_fused() {
    struct FailingMatcher;

    impl FrameMatcher for FailingMatcher {
        fn is_match(&self, _a: &Frame, _b: &Frame) -> Result<bool, DeslideError> {
            Err(DeslideError::DimensionMismatch {
                expected_width: 4,
                expected_height: 4,
                actual_width: 8,
                actual_height: 8,
            })
        }
    }

    let mut slides = SlideIterator::new(frames(3).into_iter(), FailingMatcher);
    let first = slides.next().expect("error should be yielded");
    assert!(matches!(first, Err(DeslideError::DimensionMismatch { .. })));
    assert!(slides.next().is_none());
}

// ── laziness ───────────────────────────────────────────────────────

#[test]
fn dropping_the_iterator_stops_pulling_frames() {
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingFrames<'a> {
        produced: &'a AtomicU64,
        remaining: u64,
    }

    impl Iterator for CountingFrames<'_> {
        type Item = Result<Frame, DeslideError>;

        fn next(&mut self) -> Option<Self::Item> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            let number = self.produced.fetch_add(1, Ordering::SeqCst);
            Some(Ok(frame(number)))
        }
    }

    let produced = AtomicU64::new(0);
    let input = CountingFrames {
        produced: &produced,
        remaining: 100,
    };

    // Frames never match, so every pulled frame closes a run immediately.
    let mut slides = SlideIterator::new(input, NeverMatch);
    let _first = slides.next().expect("first slide").expect("no error");
    drop(slides);

    // Closing slide 0 requires seeing frame 1 (the mismatch), nothing more.
    assert_eq!(produced.load(Ordering::SeqCst), 2);
}
