use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use deslide::{
    DeslideError, ExtractOptions, FfmpegLogLevel, OutputTemplate, ProgressSink, SampleRate, Slide,
    SlideExtractor,
};

const CLI_AFTER_HELP: &str = "Format tags:\n  %f  input path without extension   %d  input directory\n  %n  slide index (0-based)           %N  slide number (1-based)\n  %t / %T  start/end time H:MM:SS     %s / %S  start/end whole seconds\n  %m / %M  start/end milliseconds     %i / %I  start/end frame number\n  A digit between '%' and a numeric tag zero-pads it: %3N -> 001.\n\nExamples:\n  deslide lecture.mp4 --progress\n  deslide lecture.mp4 -e 'slides/%f__%3N.png' -s 0.5fps -c 0.995\n  deslide lecture.mp4 -b '%f__begin_%t.png' -e '%f__end_%T.png'\n  deslide lecture.mp4 --json > slides.json\n  deslide --completions zsh > _deslide";

#[derive(Debug, Parser)]
#[command(
    name = "deslide",
    version,
    about = "Extract presentation slides from video files as still images",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video file.
    #[arg(required_unless_present = "completions")]
    input: Option<String>,

    /// Output path format for each slide's first frame; "none" disables.
    #[arg(short = 'b', long, default_value = "none")]
    begin_format: String,

    /// Output path format for each slide's last frame.
    #[arg(short = 'e', long, default_value = "%f__%t.png")]
    end_format: String,

    /// Sampling rate: '<rate>fps', '<percentage>%', or a total sample count.
    #[arg(short = 's', long, default_value = "1.0fps")]
    sample_rate: String,

    /// Correlation two adjacent frames must exceed to count as one slide, in (0, 1].
    #[arg(short = 'c', long, default_value_t = 0.999)]
    correlation_threshold: f64,

    /// Show a progress bar over the video's native frames.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// Print a machine-readable JSON summary instead of plain paths.
    #[arg(long)]
    json: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Generate shell completion scripts and exit.
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

/// The begin template is optional; the literal string "none" spells the
/// disabled state so the flag always has a printable default.
fn parse_begin_format(value: &str) -> Result<Option<OutputTemplate>, DeslideError> {
    if value.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        OutputTemplate::parse(value).map(Some)
    }
}

fn validate_threshold(threshold: f64) -> Result<f64, DeslideError> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(DeslideError::InvalidThreshold(threshold))
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

/// Bridges the library's per-frame progress notifications to an indicatif
/// bar. The bar length is fixed to the source's reported frame count up
/// front, so only the position moves here.
struct TerminalProgress {
    bar: ProgressBar,
}

impl ProgressSink for TerminalProgress {
    fn on_advance(&self, frames_advanced: u64, _total_frames: u64) {
        self.bar.set_position(frames_advanced);
    }
}

/// What the JSON summary needs from a slide after its images are written.
/// Pixel data is not retained.
struct WrittenSlide {
    index: u64,
    number: u64,
    start_frame: u64,
    end_frame: u64,
    start_seconds: f64,
    end_seconds: f64,
    begin_path: Option<PathBuf>,
    end_path: PathBuf,
}

impl WrittenSlide {
    fn record(slide: &Slide, begin_path: Option<PathBuf>, end_path: PathBuf) -> Self {
        Self {
            index: slide.index,
            number: slide.number(),
            start_frame: slide.start.frame_number,
            end_frame: slide.end.frame_number,
            start_seconds: slide.start.timestamp.as_secs_f64(),
            end_seconds: slide.end.timestamp.as_secs_f64(),
            begin_path,
            end_path,
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "deslide", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let parsed: FfmpegLogLevel = level.parse()?;
        deslide::set_ffmpeg_log_level(parsed);
    }

    // Reject bad configuration before touching the video.
    let threshold = validate_threshold(cli.correlation_threshold)?;
    let sample_rate: SampleRate = cli.sample_rate.parse()?;
    let begin_template = parse_begin_format(&cli.begin_format)?;
    let end_template = OutputTemplate::parse(&cli.end_format)?;

    let input = cli.input.as_deref().expect("clap enforces input");
    let mut extractor = SlideExtractor::open(input)?;
    let metadata = extractor.metadata().clone();

    if cli.verbose {
        eprintln!(
            "{} {}x{} @ {:.2} fps, {} frames [{}]",
            "input:".cyan().bold(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec,
        );
    }

    let progress_bar = if cli.progress {
        let bar = ProgressBar::new(metadata.frame_count);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Some(bar)
    } else {
        None
    };

    let mut options = ExtractOptions::new()
        .with_sample_rate(sample_rate)
        .with_correlation_threshold(threshold);
    if let Some(bar) = &progress_bar {
        options = options.with_progress(Arc::new(TerminalProgress { bar: bar.clone() }));
    }

    // The slide stream is lazy; each slide is written out as soon as its run
    // closes, so long videos produce output while still being scanned.
    let mut written = Vec::new();
    for slide in extractor.slides(options)? {
        let slide = slide?;

        let begin_path = match &begin_template {
            Some(template) => {
                let path = template.render(&slide);
                ensure_writable_path(&path, cli.overwrite)?;
                slide.start.image.save(&path)?;
                Some(path)
            }
            None => None,
        };

        let end_path = end_template.render(&slide);
        ensure_writable_path(&end_path, cli.overwrite)?;
        slide.end.image.save(&end_path)?;

        if !cli.json {
            for path in begin_path.iter().chain(std::iter::once(&end_path)) {
                let line = path.display().to_string();
                match &progress_bar {
                    Some(bar) => bar.println(line),
                    None => println!("{line}"),
                }
            }
        }

        if cli.verbose {
            eprintln!(
                "{} slide {} spans native frames {}..={}",
                "saved:".cyan().bold(),
                slide.number(),
                slide.start.frame_number,
                slide.end.frame_number,
            );
        }

        written.push(WrittenSlide::record(&slide, begin_path, end_path));
    }

    if let Some(bar) = progress_bar {
        bar.finish_with_message("done");
    }

    if cli.json {
        let slides: Vec<_> = written
            .iter()
            .map(|entry| {
                json!({
                    "index": entry.index,
                    "number": entry.number,
                    "start_frame": entry.start_frame,
                    "end_frame": entry.end_frame,
                    "start_seconds": entry.start_seconds,
                    "end_seconds": entry.end_seconds,
                    "begin_path": entry.begin_path.as_ref().map(|path| path.display().to_string()),
                    "end_path": entry.end_path.display().to_string(),
                })
            })
            .collect();
        let payload = json!({
            "input": input,
            "fps": metadata.frames_per_second,
            "frame_count": metadata.frame_count,
            "slides": slides,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        eprintln!(
            "{} {}",
            "success:".green().bold(),
            format!("Extracted {} slide(s) from {input}", written.len()).green()
        );
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_begin_format, validate_threshold};

    #[test]
    fn begin_format_none_sentinel() {
        assert!(parse_begin_format("none").unwrap().is_none());
        assert!(parse_begin_format("NONE").unwrap().is_none());
        assert!(parse_begin_format("%f__%t.png").unwrap().is_some());
        assert!(parse_begin_format("%x").is_err());
    }

    #[test]
    fn threshold_bounds() {
        assert!(validate_threshold(0.999).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(0.0).is_err());
        assert!(validate_threshold(-0.5).is_err());
        assert!(validate_threshold(1.5).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }
}
