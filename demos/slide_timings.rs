//! Print how long each slide stays on screen, without writing any images.
//!
//! Usage: cargo run --example slide_timings -- <video>

use deslide::{ExtractOptions, SlideExtractor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = std::env::args()
        .nth(1)
        .ok_or("usage: slide_timings <video>")?;

    let mut extractor = SlideExtractor::open(&input)?;
    for slide in extractor.slides(ExtractOptions::default())? {
        let slide = slide?;
        println!(
            "slide {:3}  {:8.2}s -> {:8.2}s  ({:6.2}s, frames {}..={})",
            slide.number(),
            slide.start.timestamp.as_secs_f64(),
            slide.end.timestamp.as_secs_f64(),
            slide.duration().as_secs_f64(),
            slide.start.frame_number,
            slide.end.frame_number,
        );
    }

    Ok(())
}
