use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow, bail};

use crate::common::progress::create_render_bar;

pub trait FfmpegRunner {
    fn run(&self, args: &[String], options: FfmpegRunOptions) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct FfmpegRunOptions {
    pub total_duration: Option<f64>,
    pub verbose: bool,
    pub message: String,
}

impl FfmpegRunOptions {
    pub fn new(total_duration: Option<f64>, verbose: bool, message: impl Into<String>) -> Self {
        Self {
            total_duration,
            verbose,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFfmpegRunner;

impl FfmpegRunner for SystemFfmpegRunner {
    fn run(&self, args: &[String], options: FfmpegRunOptions) -> Result<()> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn ffmpeg")?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("ffmpeg stderr was not captured"))?;

        let bar = options
            .total_duration
            .map(|duration| create_render_bar(duration, options.message.clone()));
        let scanned = scan_stderr(stderr, options.verbose, |seconds| {
            if let Some(bar) = &bar {
                bar.set_position((seconds * 1000.0) as u64);
            }
        });

        let status = child.wait().context("Failed to wait for ffmpeg")?;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        let summary = scanned?;

        if !status.success() {
            bail!("ffmpeg failed ({status}): {}", summary.failure_message());
        }
        Ok(())
    }
}

/// Keeps every argument vector instead of running ffmpeg.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<Vec<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.borrow().clone()
    }
}

impl FfmpegRunner for RecordingRunner {
    fn run(&self, args: &[String], _options: FfmpegRunOptions) -> Result<()> {
        self.commands.borrow_mut().push(args.to_vec());
        Ok(())
    }
}

/// What is kept from ffmpeg's stderr for error reporting.
#[derive(Debug, Default)]
struct StderrSummary {
    errors: Vec<String>,
    last_line: String,
}

impl StderrSummary {
    fn failure_message(&self) -> String {
        if self.errors.is_empty() {
            self.last_line.trim().to_string()
        } else {
            self.errors.join("\n")
        }
    }
}

/// ffmpeg rewrites its progress line with `\r`, so both separators end a line.
fn scan_stderr<R: Read>(
    stderr: R,
    verbose: bool,
    mut on_progress: impl FnMut(f64),
) -> Result<StderrSummary> {
    let mut summary = StderrSummary::default();
    for chunk in BufReader::new(stderr).split(b'\r') {
        let chunk = chunk.context("Failed to read ffmpeg stderr")?;
        for line in String::from_utf8_lossy(&chunk).lines() {
            if line.is_empty() {
                continue;
            }
            if verbose {
                eprintln!("{line}");
            }
            if let Some(seconds) = progress_seconds(line) {
                on_progress(seconds);
            }
            if line.to_lowercase().contains("error") {
                summary.errors.push(line.to_string());
            }
            summary.last_line = line.to_string();
        }
    }
    Ok(summary)
}

/// Seconds encoded so far, from the `time=HH:MM:SS.ss` field.
fn progress_seconds(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once("time=")?;
    let stamp = rest.split_whitespace().next()?;
    let mut fields = stamp.splitn(3, ':').map(|field| field.parse::<f64>().ok());
    let hours = fields.next()??;
    let minutes = fields.next()??;
    let seconds = fields.next()??;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

pub fn ffmpeg_available() -> bool {
    which::which("ffmpeg").is_ok() && which::which("ffprobe").is_ok()
}

pub fn probe_duration_seconds(path: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("Failed to run ffprobe for {}", path.display()))?;

    if !output.status.success() {
        bail!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration: f64 = duration_str
        .trim()
        .parse()
        .with_context(|| format!("Failed to parse ffprobe duration for {}", path.display()))?;

    Ok(duration)
}

pub fn probe_video_dimensions(video_path: &Path) -> Result<(u32, u32)> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=s=x:p=0",
        ])
        .arg(video_path)
        .output()
        .with_context(|| {
            format!(
                "Failed to probe video dimensions for {}",
                video_path.display()
            )
        })?;

    if !output.status.success() {
        bail!(
            "ffprobe exited with status {:?} while probing {}",
            output.status.code(),
            video_path.display()
        );
    }

    let stdout = String::from_utf8(output.stdout)
        .context("ffprobe returned non-UTF8 output for video dimensions")?;
    parse_dimensions(stdout.trim())
        .with_context(|| format!("Unexpected ffprobe dimensions for {}", video_path.display()))
}

fn parse_dimensions(value: &str) -> Result<(u32, u32)> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: u32 = width
        .parse()
        .with_context(|| format!("Unable to parse width '{width}'"))?;
    let height: u32 = height
        .trim_end_matches('x')
        .parse()
        .with_context(|| format!("Unable to parse height '{height}'"))?;
    Ok((width, height))
}
