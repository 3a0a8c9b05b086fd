//! Frame similarity decisions.
//!
//! [`FrameMatcher`] is the boolean oracle the
//! [`SlideIterator`](crate::SlideIterator) consults to decide whether two
//! adjacent sampled frames show the same slide. The production implementation
//! is [`CorrelationMatcher`], which computes the normalized cross-correlation
//! of the two frames' raw RGB samples and compares it against a threshold.
//!
//! # Example
//!
//! ```no_run
//! use deslide::{CorrelationMatcher, FrameMatcher};
//! # use deslide::{DeslideError, Frame};
//! # fn frames() -> (Frame, Frame) { unimplemented!() }
//!
//! let matcher = CorrelationMatcher::new(0.999);
//! let (a, b) = frames();
//! if matcher.is_match(&a, &b)? {
//!     println!("same slide");
//! }
//! # Ok::<(), DeslideError>(())
//! ```

use crate::error::DeslideError;
use crate::frame::Frame;

/// Decides whether two sampled frames show the same slide.
///
/// Implementations must be pure (no state mutated by a comparison) and
/// symmetric. The segmenter only ever compares frames that were sampled
/// adjacently from the same video.
pub trait FrameMatcher {
    /// Returns `true` if `a` and `b` are considered visually identical.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::DimensionMismatch`] if the two frames do not
    /// share pixel dimensions. Frames from one session always do, so a
    /// mismatch indicates a corrupted or inconsistent source and is never
    /// folded into a "no match" answer.
    fn is_match(&self, a: &Frame, b: &Frame) -> Result<bool, DeslideError>;
}

/// Similarity via normalized cross-correlation of raw RGB samples.
///
/// The correlation of two equal-sized frames is
/// `sum(a[i] * b[i]) / sqrt(sum(a[i]^2) * sum(b[i]^2))` over all channel
/// samples, always in `[0, 1]` for non-negative sample values. Two frames
/// match when the correlation **strictly exceeds** the threshold.
///
/// Typical thresholds are very close to 1.0 (the default CLI value is
/// `0.999`): compression noise between two encodings of the same still
/// slide barely moves the correlation, while any real content change drops
/// it well below.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationMatcher {
    threshold: f64,
}

impl CorrelationMatcher {
    /// Create a matcher with the given decision threshold.
    ///
    /// The threshold is used as-is; callers that accept user input should
    /// validate it against `(0, 1]` first (the CLI does).
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The decision threshold this matcher compares against.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compute the normalized cross-correlation of two frames.
    ///
    /// A frame with no signal energy (all-zero samples) correlates `1.0`
    /// with another all-zero frame and `0.0` with anything else.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::DimensionMismatch`] if the frames differ in
    /// pixel dimensions.
    pub fn correlation(&self, a: &Frame, b: &Frame) -> Result<f64, DeslideError> {
        let (a_width, a_height) = a.dimensions();
        let (b_width, b_height) = b.dimensions();
        if (a_width, a_height) != (b_width, b_height) {
            return Err(DeslideError::DimensionMismatch {
                expected_width: a_width,
                expected_height: a_height,
                actual_width: b_width,
                actual_height: b_height,
            });
        }

        let mut cross_sum = 0.0f64;
        let mut a_energy = 0.0f64;
        let mut b_energy = 0.0f64;

        for (&a_sample, &b_sample) in a.image.as_raw().iter().zip(b.image.as_raw().iter()) {
            let a_value = f64::from(a_sample);
            let b_value = f64::from(b_sample);
            cross_sum += a_value * b_value;
            a_energy += a_value * a_value;
            b_energy += b_value * b_value;
        }

        if a_energy == 0.0 && b_energy == 0.0 {
            return Ok(1.0);
        }
        if a_energy == 0.0 || b_energy == 0.0 {
            return Ok(0.0);
        }

        Ok(cross_sum / (a_energy * b_energy).sqrt())
    }
}

impl FrameMatcher for CorrelationMatcher {
    fn is_match(&self, a: &Frame, b: &Frame) -> Result<bool, DeslideError> {
        Ok(self.correlation(a, b)? > self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use std::{path::Path, sync::Arc, time::Duration};

    use image::RgbImage;

    use super::*;

    fn test_frame(width: u32, height: u32, fill: u8) -> Frame {
        Frame {
            image: RgbImage::from_pixel(width, height, image::Rgb([fill, fill, fill])),
            frame_number: 0,
            timestamp: Duration::ZERO,
            source: Arc::from(Path::new("test.mp4")),
        }
    }

    #[test]
    fn identical_frames_correlate_fully() {
        let matcher = CorrelationMatcher::new(0.999);
        let a = test_frame(32, 24, 128);
        let b = test_frame(32, 24, 128);

        let correlation = matcher.correlation(&a, &b).unwrap();
        assert!((correlation - 1.0).abs() < 1e-12);
        assert!(matcher.is_match(&a, &b).unwrap());
    }

    #[test]
    fn uniform_frames_of_different_brightness_still_correlate() {
        // Correlation is scale-invariant: a uniformly brighter copy of the
        // same image correlates 1.0.
        let matcher = CorrelationMatcher::new(0.999);
        let a = test_frame(16, 16, 60);
        let b = test_frame(16, 16, 180);

        let correlation = matcher.correlation(&a, &b).unwrap();
        assert!((correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_content_does_not_match() {
        let matcher = CorrelationMatcher::new(0.5);

        // Left half bright in one frame, right half bright in the other:
        // no overlapping energy, correlation 0.
        let mut a = test_frame(16, 16, 0);
        let mut b = test_frame(16, 16, 0);
        for y in 0..16 {
            for x in 0..8 {
                a.image.put_pixel(x, y, image::Rgb([255, 255, 255]));
                b.image.put_pixel(x + 8, y, image::Rgb([255, 255, 255]));
            }
        }

        let correlation = matcher.correlation(&a, &b).unwrap();
        assert!(correlation.abs() < 1e-12);
        assert!(!matcher.is_match(&a, &b).unwrap());
    }

    #[test]
    fn threshold_comparison_is_strict() {
        // Identical frames correlate exactly 1.0, which does not strictly
        // exceed a threshold of 1.0.
        let matcher = CorrelationMatcher::new(1.0);
        let a = test_frame(8, 8, 200);
        let b = test_frame(8, 8, 200);

        assert!(!matcher.is_match(&a, &b).unwrap());
    }

    #[test]
    fn black_frames_match_each_other() {
        let matcher = CorrelationMatcher::new(0.999);
        let a = test_frame(8, 8, 0);
        let b = test_frame(8, 8, 0);

        assert!(matcher.is_match(&a, &b).unwrap());
    }

    #[test]
    fn black_frame_does_not_match_content() {
        let matcher = CorrelationMatcher::new(0.999);
        let black = test_frame(8, 8, 0);
        let gray = test_frame(8, 8, 128);

        assert_eq!(matcher.correlation(&black, &gray).unwrap(), 0.0);
        assert!(!matcher.is_match(&black, &gray).unwrap());
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let matcher = CorrelationMatcher::new(0.999);
        let a = test_frame(32, 24, 128);
        let b = test_frame(16, 16, 128);

        let error = matcher.is_match(&a, &b).unwrap_err();
        assert!(matches!(
            error,
            DeslideError::DimensionMismatch {
                expected_width: 32,
                expected_height: 24,
                actual_width: 16,
                actual_height: 16,
            }
        ));
    }
}
