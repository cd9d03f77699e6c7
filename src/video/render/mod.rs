pub(crate) mod compiler;
pub(crate) mod ffmpeg;
pub(crate) mod output;
mod renderer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::json;

use crate::ui::prelude::{Level, emit};

use self::ffmpeg::{FfmpegRunner, RecordingRunner, SystemFfmpegRunner, ffmpeg_available};
use self::output::{finalize_output, partial_path, prepare_output_destination};
use self::renderer::{FfmpegRenderer, RenderSettings, SegmentRenderer};
use super::assets::{FfprobeClipProbe, RenderAssets, resolve_exercise_clips};
use super::cli::RenderArgs;
use super::composer::{COMBINED_TIMELINE, SPLIT_TIMELINES, compose_session};
use super::config::ClassConfig;
use super::timeline::Timeline;

pub const ALL_TARGETS: &str = "all";

pub fn render_usage() -> String {
    format!(
        "Usage: fitclass video render <TARGET>...\n\nTargets:\n  {all:<12} every timeline of the configured layout\n  {combined:<12} whole class (combined layout)\n  {split:<12} split layout: intro, timer, cooldown, station demos",
        all = ALL_TARGETS,
        combined = COMBINED_TIMELINE,
        split = format!("{} .. {}", SPLIT_TIMELINES[0], SPLIT_TIMELINES[3]),
    )
}

pub fn handle_render(args: RenderArgs) -> Result<()> {
    if args.targets.is_empty() {
        println!("{}", render_usage());
        return Ok(());
    }

    if !args.dry_run && !ffmpeg_available() {
        bail!("ffmpeg and ffprobe are required to render; install them or use --dry-run");
    }

    let config = ClassConfig::resolve(args.config.as_deref())?;
    let clips = resolve_exercise_clips(&config, &FfprobeClipProbe);
    let assets = RenderAssets::resolve(&config);
    let timelines = compose_session(&config, &clips).context("Failed to compose class timelines")?;

    let selected = select_timelines(&timelines, &args.targets);
    if selected.is_empty() {
        emit(
            Level::Warn,
            "video.render.nothing",
            "None of the requested targets exist for this layout; nothing to render",
            Some(json!({ "targets": args.targets })),
        );
        return Ok(());
    }

    let settings = RenderSettings {
        fps: config.fps,
        preview_speed: config.preview_speed,
        verbose: args.verbose,
    };

    if args.dry_run {
        let runner = RecordingRunner::new();
        let outputs = render_timelines(&runner, &selected, assets, settings, &args)?;
        print_recorded_commands(&runner);
        emit(
            Level::Info,
            "video.render.dry_run",
            &format!("Dry run: {} video(s) would be written", outputs.len()),
            Some(json!({ "outputs": outputs })),
        );
        return Ok(());
    }

    let runner = SystemFfmpegRunner;
    let outputs = render_timelines(&runner, &selected, assets, settings, &args)?;
    emit(
        Level::Success,
        "video.render.done",
        &format!("Rendered {} video(s)", outputs.len()),
        Some(json!({ "outputs": outputs })),
    );
    Ok(())
}

/// Timelines named by `targets`, in session order; `all` selects every one.
pub fn select_timelines<'a>(timelines: &'a [Timeline], targets: &[String]) -> Vec<&'a Timeline> {
    if targets.iter().any(|t| t == ALL_TARGETS) {
        return timelines.iter().collect();
    }

    for target in targets {
        if !timelines.iter().any(|t| &t.name == target) {
            let known: Vec<&str> = timelines.iter().map(|t| t.name.as_str()).collect();
            emit(
                Level::Warn,
                "video.render.unknown_target",
                &format!(
                    "Unknown target '{}' (available: {}, {})",
                    target,
                    known.join(", "),
                    ALL_TARGETS
                ),
                Some(json!({ "target": target, "available": known })),
            );
        }
    }

    timelines
        .iter()
        .filter(|timeline| targets.iter().any(|t| t == &timeline.name))
        .collect()
}

fn render_timelines(
    runner: &dyn FfmpegRunner,
    timelines: &[&Timeline],
    assets: RenderAssets,
    settings: RenderSettings,
    args: &RenderArgs,
) -> Result<Vec<String>> {
    let mut renderer = FfmpegRenderer::new(runner, assets, settings)?;
    let mut outputs = Vec::with_capacity(timelines.len());

    for timeline in timelines {
        let output = args.out_dir.join(format!("{}.mp4", timeline.name));
        if !args.dry_run {
            prepare_output_destination(&output, args.force)?;
        }

        emit(
            Level::Info,
            "video.render.timeline",
            &format!(
                "Rendering {} ({} segments, {:.0}s)",
                timeline.name,
                timeline.segments.len(),
                timeline.total_duration()
            ),
            Some(json!({
                "timeline": timeline.name,
                "segments": timeline.segments.len(),
                "duration": timeline.total_duration(),
            })),
        );

        render_timeline(&mut renderer, timeline, &output, settings.fps, args.dry_run)
            .with_context(|| format!("Failed to render {}", timeline.name))?;
        outputs.push(output.display().to_string());
    }

    Ok(outputs)
}

/// Render every segment, join them, and write the result through a partial file.
pub fn render_timeline(
    renderer: &mut dyn SegmentRenderer,
    timeline: &Timeline,
    output: &Path,
    fps: u32,
    dry_run: bool,
) -> Result<PathBuf> {
    let clips = timeline
        .segments
        .iter()
        .map(|segment| renderer.render_segment(segment))
        .collect::<Result<Vec<_>>>()?;
    let joined = renderer.concatenate(&clips)?;

    let partial = partial_path(output);
    renderer.write_video(&joined, &partial, fps)?;
    if !dry_run {
        finalize_output(&partial, output)?;
    }
    Ok(output.to_path_buf())
}

pub(crate) fn print_recorded_commands(runner: &RecordingRunner) {
    for command in runner.commands() {
        let line =
            shell_words::join(std::iter::once("ffmpeg").chain(command.iter().map(String::as_str)));
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::config::{Interval, Layout};
    use crate::video::segment::{Rgb, SegmentContent, SegmentSpec};

    fn timeline(name: &str) -> Timeline {
        let mut timeline = Timeline::new(name);
        timeline.push(
            SegmentSpec::new(5.0, "Work", Rgb::GREEN, 1080, 1920, SegmentContent::Countdown)
                .unwrap(),
        );
        timeline
    }

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_selects_every_timeline() {
        let timelines: Vec<Timeline> = SPLIT_TIMELINES.iter().map(|n| timeline(n)).collect();
        assert_eq!(select_timelines(&timelines, &targets(&["all"])).len(), 4);
    }

    #[test]
    fn unknown_targets_are_skipped() {
        let timelines: Vec<Timeline> = SPLIT_TIMELINES.iter().map(|n| timeline(n)).collect();
        let selected = select_timelines(&timelines, &targets(&["segment-3", "bogus", "segment-1"]));
        let names: Vec<&str> = selected.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["segment-1", "segment-3"]);
    }

    #[test]
    fn usage_lists_targets() {
        let usage = render_usage();
        assert!(usage.contains("workout"));
        assert!(usage.contains("segment-1 .. segment-4"));
        assert!(usage.contains("all"));
    }

    #[test]
    fn dry_run_records_one_command_per_step() {
        let config = ClassConfig {
            layout: Layout::Split,
            intervals: vec![Interval::new(75, 35), Interval::new(60, 0)],
            ..ClassConfig::default()
        };
        let timelines = compose_session(&config, &[]).unwrap();
        let selected = select_timelines(&timelines, &targets(&["segment-2"]));

        let runner = RecordingRunner::new();
        let mut renderer = FfmpegRenderer::new(
            &runner,
            RenderAssets::default(),
            RenderSettings {
                fps: 24,
                preview_speed: 1.0,
                verbose: false,
            },
        )
        .unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("segment-2.mp4");
        render_timeline(&mut renderer, selected[0], &output, 24, true).unwrap();

        // four screens, one concat, one final write
        let commands = runner.commands();
        assert_eq!(commands.len(), 6);
        assert_eq!(
            commands[5].last().unwrap(),
            &out_dir.path().join("segment-2.partial.mp4").display().to_string()
        );
        assert!(!output.exists());
    }
}
