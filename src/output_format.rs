//! Output path templates.
//!
//! [`OutputTemplate`] compiles a `%`-tag format string into a renderer that
//! produces one output path per [`Slide`]. Templates are validated up front,
//! so a typo fails before any video work starts rather than on the first
//! written file.
//!
//! Supported tags:
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `%%` | literal percent sign |
//! | `%f` | input video path without its extension |
//! | `%d` | directory containing the input video |
//! | `%[W]n` | slide index, 0-based |
//! | `%[W]N` | slide number, 1-based |
//! | `%t` / `%T` | start/end timestamp as `H:MM:SS[.ffffff]` |
//! | `%[W]s` / `%[W]S` | start/end timestamp in whole seconds |
//! | `%[W]m` / `%[W]M` | start/end timestamp in whole milliseconds |
//! | `%[W]i` / `%[W]I` | start/end native frame number |
//!
//! `[W]` is an optional width the numeric tags are zero-padded to; widths on
//! the non-numeric tags are accepted and ignored.
//!
//! # Example
//!
//! ```
//! use deslide::{DeslideError, OutputTemplate};
//!
//! let template = OutputTemplate::parse("%f__%3N__%t.png")?;
//! assert!(OutputTemplate::parse("%x").is_err());
//! # Ok::<(), DeslideError>(())
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::error::DeslideError;
use crate::frame::Slide;

/// Which slide attribute a tag renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    /// `%f`: source path without its extension.
    SourceStem,
    /// `%d`: directory containing the source.
    SourceDir,
    /// `%n`: 0-based slide index.
    Index,
    /// `%N`: 1-based slide number.
    Number,
    /// `%t` / `%T`: timestamp in `H:MM:SS[.ffffff]` form.
    Timestamp(Boundary),
    /// `%s` / `%S`: timestamp in whole seconds.
    Seconds(Boundary),
    /// `%m` / `%M`: timestamp in whole milliseconds.
    Millis(Boundary),
    /// `%i` / `%I`: native frame number.
    FrameNumber(Boundary),
}

/// Whether a tag reads the run's first or last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Start,
    End,
}

impl Tag {
    /// Zero-pad widths only apply to tags that render a plain number.
    fn accepts_width(self) -> bool {
        !matches!(self, Tag::SourceStem | Tag::SourceDir | Tag::Timestamp(_))
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Tag { tag: Tag, width: Option<usize> },
}

/// A compiled output path template.
///
/// Created by [`OutputTemplate::parse`]; renders one [`PathBuf`] per
/// [`Slide`] via [`render`](OutputTemplate::render).
#[derive(Debug, Clone)]
pub struct OutputTemplate {
    text: String,
    segments: Vec<Segment>,
}

impl OutputTemplate {
    /// Compile a template string.
    ///
    /// # Errors
    ///
    /// Returns [`DeslideError::InvalidTemplate`] for an unknown tag
    /// character or a `%` with nothing after it.
    pub fn parse(template: &str) -> Result<Self, DeslideError> {
        let invalid = |reason: String| DeslideError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '%' {
                literal.push(ch);
                continue;
            }

            // Optional zero-pad width between '%' and the tag character.
            let mut width_text = String::new();
            while let Some(digit) = chars.peek().filter(|c| c.is_ascii_digit()) {
                width_text.push(*digit);
                chars.next();
            }
            let width = if width_text.is_empty() {
                None
            } else {
                Some(width_text.parse::<usize>().map_err(|_| {
                    invalid(format!("width {width_text:?} is out of range"))
                })?)
            };

            let Some(tag_char) = chars.next() else {
                return Err(invalid("'%' at end of template".to_string()));
            };

            if tag_char == '%' {
                literal.push('%');
                continue;
            }

            let tag = match tag_char {
                'f' => Tag::SourceStem,
                'd' => Tag::SourceDir,
                'n' => Tag::Index,
                'N' => Tag::Number,
                't' => Tag::Timestamp(Boundary::Start),
                'T' => Tag::Timestamp(Boundary::End),
                's' => Tag::Seconds(Boundary::Start),
                'S' => Tag::Seconds(Boundary::End),
                'm' => Tag::Millis(Boundary::Start),
                'M' => Tag::Millis(Boundary::End),
                'i' => Tag::FrameNumber(Boundary::Start),
                'I' => Tag::FrameNumber(Boundary::End),
                other => return Err(invalid(format!("unknown format tag '%{other}'"))),
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Tag {
                tag,
                width: width.filter(|_| tag.accepts_width()),
            });
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            text: template.to_string(),
            segments,
        })
    }

    /// Render the output path for one slide.
    pub fn render(&self, slide: &Slide) -> PathBuf {
        let mut rendered = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Tag { tag, width } => {
                    let value = self.expand(*tag, slide);
                    match width {
                        Some(width) if value.len() < *width => {
                            for _ in 0..(width - value.len()) {
                                rendered.push('0');
                            }
                            rendered.push_str(&value);
                        }
                        _ => rendered.push_str(&value),
                    }
                }
            }
        }

        PathBuf::from(rendered)
    }

    fn expand(&self, tag: Tag, slide: &Slide) -> String {
        let frame = |boundary: Boundary| match boundary {
            Boundary::Start => &slide.start,
            Boundary::End => &slide.end,
        };

        match tag {
            Tag::SourceStem => slide
                .source()
                .with_extension("")
                .to_string_lossy()
                .into_owned(),
            Tag::SourceDir => {
                let parent = slide
                    .source()
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                parent.to_string_lossy().into_owned()
            }
            Tag::Index => slide.index.to_string(),
            Tag::Number => slide.number().to_string(),
            Tag::Timestamp(boundary) => format_timestamp(frame(boundary).timestamp),
            Tag::Seconds(boundary) => frame(boundary).timestamp.as_secs().to_string(),
            Tag::Millis(boundary) => frame(boundary).timestamp.as_millis().to_string(),
            Tag::FrameNumber(boundary) => frame(boundary).frame_number.to_string(),
        }
    }

    /// The template text this was parsed from.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Display for OutputTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.text)
    }
}

impl FromStr for OutputTemplate {
    type Err = DeslideError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        OutputTemplate::parse(input)
    }
}

/// Format an elapsed time as `H:MM:SS`, with `.ffffff` microseconds appended
/// only when the time has a fractional second.
///
/// Hours are unpadded and roll past 24 (a 26-hour timestamp renders as
/// `26:00:00`).
fn format_timestamp(elapsed: Duration) -> String {
    let total_seconds = elapsed.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let micros = elapsed.subsec_micros();

    if micros == 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}.{micros:06}")
    }
}
