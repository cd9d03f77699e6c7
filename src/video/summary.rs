use anyhow::{Context, Result};
use colored::*;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;

use super::assets::{FfprobeClipProbe, resolve_exercise_clips};
use super::cli::PlanArgs;
use super::composer::compose_session;
use super::config::ClassConfig;
use super::segment::{SegmentContent, SegmentSpec};
use super::timeline::Timeline;
use crate::ui::prelude::*;

#[derive(Debug, Serialize)]
struct SegmentRow {
    start: f64,
    duration: f64,
    label: String,
    kind: &'static str,
    color: String,
    detail: String,
}

fn content_kind(segment: &SegmentSpec) -> &'static str {
    match segment.content {
        SegmentContent::Countdown => "countdown",
        SegmentContent::Demo(_) => "demo",
        SegmentContent::Placeholder => "placeholder",
    }
}

fn content_detail(segment: &SegmentSpec) -> String {
    match &segment.content {
        SegmentContent::Demo(cut) => {
            let source = cut
                .source
                .as_ref()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{source} ({:.2}s x{})", cut.clip_seconds, cut.loops)
        }
        _ => String::new(),
    }
}

fn rows(timeline: &Timeline) -> Vec<SegmentRow> {
    timeline
        .segments
        .iter()
        .zip(timeline.start_times())
        .map(|(segment, start)| SegmentRow {
            start,
            duration: segment.duration_seconds,
            label: segment.label.replace('\n', " "),
            kind: content_kind(segment),
            color: segment.background.to_hex(),
            detail: content_detail(segment),
        })
        .collect()
}

pub fn format_clock(seconds: f64) -> String {
    let total = seconds.round() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn handle_plan(args: PlanArgs) -> Result<()> {
    let config = ClassConfig::resolve(args.config.as_deref())?;
    let clips = resolve_exercise_clips(&config, &FfprobeClipProbe);
    let timelines = compose_session(&config, &clips).context("Failed to compose class timelines")?;
    print_timelines(&timelines);
    Ok(())
}

fn print_timelines(timelines: &[Timeline]) {
    for timeline in timelines {
        match get_output_format() {
            OutputFormat::Json => {
                emit(
                    Level::Info,
                    "video.plan.timeline",
                    &timeline.name,
                    Some(serde_json::json!({
                        "timeline": timeline.name,
                        "duration": timeline.total_duration(),
                        "segments": rows(timeline),
                    })),
                );
            }
            OutputFormat::Text => {
                println!(
                    "{} {}",
                    timeline.name.bold().cyan(),
                    format!(
                        "({} segments, {})",
                        timeline.segments.len(),
                        format_clock(timeline.total_duration())
                    )
                    .dimmed()
                );
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["Start", "Length", "Screen", "Kind", "Color", "Clip"]);
                for row in rows(timeline) {
                    table.add_row(vec![
                        format_clock(row.start),
                        format!("{:.2}s", row.duration),
                        row.label,
                        row.kind.to_string(),
                        row.color,
                        row.detail,
                    ]);
                }
                println!("{table}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::composer::ExerciseClip;
    use std::path::PathBuf;

    #[test]
    fn clock_rounds_to_seconds() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(95.4), "01:35");
        assert_eq!(format_clock(3600.0), "60:00");
    }

    #[test]
    fn rows_carry_start_offsets_and_clip_detail() {
        let clips = vec![ExerciseClip {
            name: "Squat".to_string(),
            source: Some(PathBuf::from("/gym/exercises/(1) Squat.mp4")),
            duration: Some(4.0),
        }];
        let timelines = compose_session(&ClassConfig::default(), &clips).unwrap();
        let rows = rows(&timelines[0]);

        assert_eq!(rows[0].start, 0.0);
        assert_eq!(rows[1].start, 15.0);
        assert_eq!(rows[1].kind, "demo");
        assert_eq!(rows[1].detail, "(1) Squat.mp4 (4.00s x23)");
        assert_eq!(rows[2].start, 105.0);
        assert_eq!(rows[2].label, "Warm- up");
    }
}
