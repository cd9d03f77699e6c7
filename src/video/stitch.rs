//! Joins the four split-layout videos into one: the timer and the station
//! demos side by side, framed by the intro and the cooldown.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::json;

use super::cli::StitchArgs;
use super::composer::SPLIT_TIMELINES;
use super::config::ClassConfig;
use super::render::compiler::{AUDIO_SAMPLE_RATE, FilterChain, push_encoding_args};
use super::render::ffmpeg::{
    FfmpegRunOptions, FfmpegRunner, RecordingRunner, SystemFfmpegRunner, ffmpeg_available,
    probe_duration_seconds, probe_video_dimensions,
};
use super::render::output::{finalize_output, partial_path, prepare_output_destination};
use super::render::print_recorded_commands;
use crate::ui::prelude::{Level, emit};

pub const MERGED_NAME: &str = "segment-24";
pub const FINAL_NAME: &str = "final_video";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Frame {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

fn even(value: f64) -> u32 {
    let rounded = value.round() as u32;
    rounded + rounded % 2
}

/// Frame of the side-by-side video: both inputs scaled to the smaller height.
pub fn merged_frame(left: Frame, right: Frame) -> Frame {
    let height = left.height.min(right.height);
    let scaled_width = |frame: Frame| {
        even(f64::from(frame.width) * f64::from(height) / f64::from(frame.height))
    };
    Frame {
        width: scaled_width(left) + scaled_width(right),
        height: even(f64::from(height)),
    }
}

/// Timer on the left, station demos on the right; the timer's audio is kept.
pub fn side_by_side_args(
    timer: &Path,
    stations: &Path,
    frame: Frame,
    fps: u32,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-i".to_string(),
        timer.to_string_lossy().into_owned(),
        "-i".to_string(),
        stations.to_string_lossy().into_owned(),
    ];

    let mut filters = FilterChain::new();
    filters.push(format!("[0:v]scale=-2:{},setsar=1[left]", frame.height));
    filters.push(format!("[1:v]scale=-2:{},setsar=1[right]", frame.height));
    filters.push("[left][right]hstack=inputs=2[outv]".to_string());

    args.push("-filter_complex".to_string());
    args.push(filters.join());
    args.extend(["-map".to_string(), "[outv]".to_string()]);
    args.extend(["-map".to_string(), "0:a?".to_string()]);
    push_encoding_args(&mut args, fps);
    args.push("-shortest".to_string());
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Concatenate the inputs in order, each letterboxed into `frame`.
pub fn framed_concat_args(
    inputs: &[PathBuf],
    frame: Frame,
    fps: u32,
    output: &Path,
) -> Vec<String> {
    let mut args = vec!["-y".to_string(), "-hide_banner".to_string()];
    for input in inputs {
        args.push("-i".to_string());
        args.push(input.to_string_lossy().into_owned());
    }

    let mut filters = FilterChain::new();
    let mut concat_inputs = String::new();
    for index in 0..inputs.len() {
        filters.push(format!(
            "[{index}:v]scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:0x000000,setsar=1,fps={fps}[v{index}]",
            w = frame.width,
            h = frame.height,
        ));
        filters.push(format!(
            "[{index}:a]aformat=sample_rates={AUDIO_SAMPLE_RATE}:channel_layouts=stereo[a{index}]"
        ));
        concat_inputs.push_str(&format!("[v{index}][a{index}]"));
    }
    filters.push(format!(
        "{concat_inputs}concat=n={}:v=1:a=1[outv][outa]",
        inputs.len()
    ));

    args.push("-filter_complex".to_string());
    args.push(filters.join());
    args.extend(["-map".to_string(), "[outv]".to_string()]);
    args.extend(["-map".to_string(), "[outa]".to_string()]);
    push_encoding_args(&mut args, fps);
    args.push("-movflags".to_string());
    args.push("+faststart".to_string());
    args.push(output.to_string_lossy().into_owned());
    args
}

pub fn handle_stitch(args: StitchArgs) -> Result<()> {
    if !args.dry_run && !ffmpeg_available() {
        bail!("ffmpeg and ffprobe are required to stitch; install them or use --dry-run");
    }

    let inputs: Vec<PathBuf> = SPLIT_TIMELINES
        .iter()
        .map(|name| args.out_dir.join(format!("{name}.mp4")))
        .collect();
    if let Some(missing) = inputs.iter().find(|path| !path.is_file()) {
        bail!(
            "{} not found; render the split layout first with `fitclass video render all`",
            missing.display()
        );
    }

    if args.dry_run {
        let runner = RecordingRunner::new();
        let outputs = stitch(&runner, &inputs, &args)?;
        print_recorded_commands(&runner);
        emit(
            Level::Info,
            "video.stitch.dry_run",
            &format!("Dry run: {} would be written", outputs.1.display()),
            None,
        );
        return Ok(());
    }

    let (merged, final_video) = stitch(&SystemFfmpegRunner, &inputs, &args)?;
    emit(
        Level::Success,
        "video.stitch.done",
        &format!("Final video saved as {}", final_video.display()),
        Some(json!({
            "merged": merged.display().to_string(),
            "output": final_video.display().to_string(),
        })),
    );
    Ok(())
}

fn stitch(
    runner: &dyn FfmpegRunner,
    inputs: &[PathBuf],
    args: &StitchArgs,
) -> Result<(PathBuf, PathBuf)> {
    let [intro, timer, cooldown, stations] = inputs else {
        bail!("expected {} split videos", SPLIT_TIMELINES.len());
    };

    let merged_path = args.out_dir.join(format!("{MERGED_NAME}.mp4"));
    let final_path = args.out_dir.join(format!("{FINAL_NAME}.mp4"));
    if !args.dry_run {
        prepare_output_destination(&merged_path, args.force)?;
        prepare_output_destination(&final_path, args.force)?;
    }

    let probed = probe_video_dimensions(timer)
        .and_then(|timer_size| Ok((timer_size, probe_video_dimensions(stations)?)));
    let frame = match probed {
        Ok((timer_size, stations_size)) => merged_frame(timer_size.into(), stations_size.into()),
        Err(err) if args.dry_run => {
            let screen = Frame::from(ClassConfig::resolve(args.config.as_deref())?.dimensions());
            emit(
                Level::Warn,
                "video.stitch.probe_fallback",
                &format!(
                    "Could not probe input sizes ({err:#}); assuming {}x{} from the class config",
                    screen.width, screen.height
                ),
                None,
            );
            merged_frame(screen, screen)
        }
        Err(err) => return Err(err),
    };
    emit(
        Level::Debug,
        "video.stitch.frame",
        &format!("Merged frame is {}x{}", frame.width, frame.height),
        None,
    );

    let timer_duration = probe_duration_seconds(timer).ok();
    let merged_partial = partial_path(&merged_path);
    runner
        .run(
            &side_by_side_args(timer, stations, frame, args.fps, &merged_partial),
            FfmpegRunOptions::new(timer_duration, args.verbose, "side by side"),
        )
        .context("Failed to merge timer and station videos")?;
    if !args.dry_run {
        finalize_output(&merged_partial, &merged_path)?;
    }

    let parts = vec![intro.clone(), merged_path.clone(), cooldown.clone()];
    let total = [intro, timer, cooldown]
        .iter()
        .map(|path| probe_duration_seconds(path).ok())
        .sum::<Option<f64>>();
    let final_partial = partial_path(&final_path);
    runner
        .run(
            &framed_concat_args(&parts, frame, args.fps, &final_partial),
            FfmpegRunOptions::new(total, args.verbose, "final video"),
        )
        .context("Failed to concatenate final video")?;
    if !args.dry_run {
        finalize_output(&final_partial, &final_path)?;
    }

    Ok((merged_path, final_path))
}
