//! Expands a class description into the ordered segments of each output video.
//!
//! Everything here is plain value construction. Asset paths travel through as
//! opaque values and are only opened by the renderer.

use std::path::PathBuf;

use super::config::{ClassConfig, Interval, Layout};
use super::error::ComposeError;
use super::segment::{DemoCut, Rgb, Screen, SegmentContent, SegmentSpec, validate_duration};
use super::timeline::Timeline;

pub const WORK_LABEL: &str = "Work";
pub const REST_LABEL: &str = "Rest";
pub const WATER_LABEL: &str = "Water";
pub const WARMUP_LABEL: &str = "Warm-\nup";
pub const GET_READY_LABEL: &str = "Get\nready!";
pub const COOLDOWN_LABEL: &str = "Great Job!";
pub const DEMO_PLACEHOLDER_LABEL: &str = "Exercise demo";

pub const WORK_COLOR: Rgb = Rgb::GREEN;
pub const REST_COLOR: Rgb = Rgb::RED;
pub const WATER_COLOR: Rgb = Rgb::BLUE;

pub const COMBINED_TIMELINE: &str = "workout";
pub const SPLIT_TIMELINES: [&str; 4] = ["segment-1", "segment-2", "segment-3", "segment-4"];

/// An exercise demo clip as far as the composer cares about it.
///
/// `source` and `duration` are `None` when the clip could not be found or
/// probed; such clips become placeholder screens.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseClip {
    pub name: String,
    pub source: Option<PathBuf>,
    pub duration: Option<f64>,
}

impl ExerciseClip {
    fn is_available(&self) -> bool {
        self.source.is_some() && self.duration.is_some_and(|d| d.is_finite() && d > 0.0)
    }
}

pub fn build_countdown_segment(
    duration: f64,
    label: impl Into<String>,
    color: Rgb,
    width: u32,
    height: u32,
) -> Result<SegmentSpec, ComposeError> {
    SegmentSpec::new(duration, label, color, width, height, SegmentContent::Countdown)
}

/// Work then rest for every interval; a zero rest becomes a water break.
pub fn build_interval_block(
    intervals: &[Interval],
    water_seconds: f64,
    screen: Screen,
) -> Result<Vec<SegmentSpec>, ComposeError> {
    validate_duration(water_seconds)?;
    let mut segments = Vec::with_capacity(intervals.len() * 2);

    for (index, interval) in intervals.iter().enumerate() {
        if interval.work_seconds == 0 {
            return Err(ComposeError::EmptyWorkInterval { index });
        }
        segments.push(build_countdown_segment(
            f64::from(interval.work_seconds),
            WORK_LABEL,
            WORK_COLOR,
            screen.width,
            screen.height,
        )?);

        let (seconds, label, color) = if interval.is_water_break() {
            (water_seconds, WATER_LABEL, WATER_COLOR)
        } else {
            (f64::from(interval.rest_seconds), REST_LABEL, REST_COLOR)
        };
        segments.push(build_countdown_segment(
            seconds,
            label,
            color,
            screen.width,
            screen.height,
        )?);
    }

    Ok(segments)
}

/// Split `total_duration` evenly across the clips.
///
/// A clip shorter than its share is looped `floor(share / clip) + 1` times and
/// then truncated; a longer clip is only truncated. Every segment lasts
/// exactly one share.
pub fn build_demo_block(
    clip_durations: &[f64],
    total_duration: f64,
    screen: Screen,
) -> Result<Vec<SegmentSpec>, ComposeError> {
    validate_duration(total_duration)?;
    if clip_durations.is_empty() {
        return Err(ComposeError::EmptyDemo);
    }

    let share = total_duration / clip_durations.len() as f64;
    clip_durations
        .iter()
        .map(|&clip_seconds| {
            validate_duration(clip_seconds)?;
            let loops = if clip_seconds < share {
                ((share / clip_seconds).floor() as u32).saturating_add(1)
            } else {
                1
            };
            SegmentSpec::new(
                share,
                "",
                Rgb::BLACK,
                screen.width,
                screen.height,
                SegmentContent::Demo(DemoCut {
                    source: None,
                    clip_seconds,
                    loops,
                }),
            )
        })
        .collect()
}

/// Demo block over the given clips, substituting placeholders for missing ones.
fn demo_segments(
    clips: &[ExerciseClip],
    total_duration: f64,
    screen: Screen,
) -> Result<Vec<SegmentSpec>, ComposeError> {
    if clips.is_empty() {
        return Ok(vec![SegmentSpec::new(
            total_duration,
            DEMO_PLACEHOLDER_LABEL,
            Rgb::BLACK,
            screen.width,
            screen.height,
            SegmentContent::Placeholder,
        )?]);
    }

    let share = total_duration / clips.len() as f64;
    let durations: Vec<f64> = clips
        .iter()
        .map(|clip| match clip.duration {
            Some(seconds) if clip.is_available() => seconds,
            _ => share,
        })
        .collect();

    let mut segments = build_demo_block(&durations, total_duration, screen)?;
    for (segment, clip) in segments.iter_mut().zip(clips) {
        segment.label = clip.name.clone();
        if !clip.is_available() {
            segment.content = SegmentContent::Placeholder;
        } else if let SegmentContent::Demo(cut) = &mut segment.content {
            cut.source = clip.source.clone();
        }
    }
    Ok(segments)
}

/// All output timelines of one class, per the configured layout.
pub fn compose_session(
    config: &ClassConfig,
    clips: &[ExerciseClip],
) -> Result<Vec<Timeline>, ComposeError> {
    let screen = Screen::from(config.dimensions());
    let countdown = |seconds: f64, label: &str, color: Rgb| {
        build_countdown_segment(seconds, label, color, screen.width, screen.height)
    };

    let welcome = countdown(config.welcome_seconds, &config.welcome_label(), Rgb::BLACK)?;
    let demo = demo_segments(clips, config.demo_seconds, screen)?;
    let warmup = countdown(config.warmup_seconds, WARMUP_LABEL, Rgb::BLACK)?;
    let get_ready = countdown(config.get_ready_seconds, GET_READY_LABEL, Rgb::ORANGE)?;
    let intervals = build_interval_block(&config.intervals, config.water_seconds, screen)?;
    let cooldown = countdown(config.cooldown_seconds, COOLDOWN_LABEL, Rgb::BLACK)?;

    match config.layout {
        Layout::Combined => {
            let mut timeline = Timeline::new(COMBINED_TIMELINE);
            timeline.push(welcome);
            timeline.extend(demo);
            timeline.push(warmup);
            timeline.push(get_ready);
            timeline.extend(intervals);
            timeline.push(cooldown);
            Ok(vec![timeline])
        }
        Layout::Split => {
            let [intro_name, timer_name, cooldown_name, stations_name] = SPLIT_TIMELINES;

            let mut intro = Timeline::new(intro_name);
            intro.push(welcome);
            intro.extend(demo);
            intro.push(warmup);
            intro.push(get_ready);

            let mut timer = Timeline::new(timer_name);
            timer.extend(intervals);

            let mut outro = Timeline::new(cooldown_name);
            outro.push(cooldown);

            let mut stations = Timeline::new(stations_name);
            stations.extend(demo_segments(clips, timer.total_duration(), screen)?);

            Ok(vec![intro, timer, outro, stations])
        }
    }
}
