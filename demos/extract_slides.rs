//! Extract every slide of a video to PNG files in the current directory.
//!
//! Usage: cargo run --example extract_slides -- <video>

use deslide::{ExtractOptions, SlideExtractor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = std::env::args()
        .nth(1)
        .ok_or("usage: extract_slides <video>")?;

    let mut extractor = SlideExtractor::open(&input)?;
    println!(
        "{}: {} frames at {:.2} fps",
        input,
        extractor.metadata().frame_count,
        extractor.metadata().frames_per_second,
    );

    let options = ExtractOptions::new().with_sample_rate("1.0fps".parse()?);
    for slide in extractor.slides(options)? {
        let slide = slide?;
        let path = format!("slide_{:03}.png", slide.number());
        slide.end.image.save(&path)?;
        println!("{path}");
    }

    Ok(())
}
