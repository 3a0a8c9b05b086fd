//! Output path template integration tests.

use std::{path::Path, sync::Arc, time::Duration};

use deslide::{Frame, OutputTemplate, Slide};
use image::RgbImage;

fn slide_fixture() -> Slide {
    let source: Arc<Path> = Arc::from(Path::new("talks/lecture.mp4"));
    let start = Frame {
        image: RgbImage::from_pixel(4, 4, image::Rgb([32, 32, 32])),
        frame_number: 120,
        timestamp: Duration::from_secs(4),
        source: Arc::clone(&source),
    };
    let end = Frame {
        image: RgbImage::from_pixel(4, 4, image::Rgb([32, 32, 32])),
        frame_number: 330,
        timestamp: Duration::from_millis(11_500),
        source,
    };
    Slide {
        index: 2,
        start,
        end,
    }
}

// ── tag rendering ──────────────────────────────────────────────────

#[test]
fn renders_source_and_timestamp_tags() {
    let template = OutputTemplate::parse("%f__%t.png").unwrap();
    let path = template.render(&slide_fixture());
    assert_eq!(path, Path::new("talks/lecture__0:00:04.png"));
}

#[test]
fn renders_end_boundary_tags_in_uppercase() {
    let template = OutputTemplate::parse("%f__%T.png").unwrap();
    let path = template.render(&slide_fixture());
    assert_eq!(path, Path::new("talks/lecture__0:00:11.500000.png"));
}

#[test]
fn renders_numbering_tags() {
    let slide = slide_fixture();
    assert_eq!(
        OutputTemplate::parse("%n").unwrap().render(&slide),
        Path::new("2")
    );
    assert_eq!(
        OutputTemplate::parse("%N").unwrap().render(&slide),
        Path::new("3")
    );
}

#[test]
fn renders_frame_number_and_second_tags() {
    let slide = slide_fixture();
    let template = OutputTemplate::parse("%i-%I_%s-%S_%m-%M").unwrap();
    assert_eq!(
        template.render(&slide),
        Path::new("120-330_4-11_4000-11500")
    );
}

#[test]
fn renders_source_directory() {
    let template = OutputTemplate::parse("%d/slide_%N.png").unwrap();
    let path = template.render(&slide_fixture());
    assert_eq!(path, Path::new("talks/slide_3.png"));
}

#[test]
fn zero_pads_numeric_tags_to_the_requested_width() {
    let slide = slide_fixture();
    assert_eq!(
        OutputTemplate::parse("slide_%4N.png").unwrap().render(&slide),
        Path::new("slide_0003.png")
    );
    // Values wider than the requested width are not truncated.
    assert_eq!(
        OutputTemplate::parse("%2i").unwrap().render(&slide),
        Path::new("120")
    );
}

#[test]
fn literal_percent_renders_as_percent() {
    let template = OutputTemplate::parse("certainty_100%%.png").unwrap();
    assert_eq!(
        template.render(&slide_fixture()),
        Path::new("certainty_100%.png")
    );
}

// ── validation ─────────────────────────────────────────────────────

#[test]
fn bad_templates_fail_before_any_rendering() {
    assert!(OutputTemplate::parse("%z").is_err());
    assert!(OutputTemplate::parse("dangling%").is_err());
    assert!(OutputTemplate::parse("width_without_tag_%12").is_err());
}

#[test]
fn template_round_trips_its_text() {
    let template: OutputTemplate = "%f__%3N.png".parse().unwrap();
    assert_eq!(template.text(), "%f__%3N.png");
    assert_eq!(template.to_string(), "%f__%3N.png");
}

// ── write-out ──────────────────────────────────────────────────────

#[test]
fn rendered_path_is_usable_for_image_write() {
    let directory = tempfile::tempdir().expect("create temp dir");
    let slide = slide_fixture();

    let template_text = format!("{}/slide_%3N.png", directory.path().display());
    let template = OutputTemplate::parse(&template_text).unwrap();
    let path = template.render(&slide);

    slide.end.image.save(&path).expect("image write should succeed");
    assert!(path.exists());
    assert_eq!(path.file_name().unwrap(), "slide_003.png");
}
