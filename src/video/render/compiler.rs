//! ffmpeg argument vectors for every kind of clip the renderer produces.
//!
//! Every intermediate clip is encoded with the same codec, frame rate, frame
//! size and a silent stereo track, so the concat demuxer can join them with a
//! stream copy.

use std::path::{Path, PathBuf};

use crate::video::assets::RenderAssets;
use crate::video::segment::{DemoCut, Rgb, SegmentSpec};

pub const AUDIO_SAMPLE_RATE: u32 = 48_000;
const COUNTDOWN_FONT_SCALE: f64 = 0.33;
const LABEL_FONT_SCALE: f64 = 0.175;
const PLACEHOLDER_FONT_SCALE: f64 = 0.06;
const LOGO_SIZE: u32 = 500;
const BEEP_LEAD_SECONDS: f64 = 3.0;
const FONT_COLOR: Rgb = Rgb::WHITE;

pub fn format_time(value: f64) -> String {
    format!("{value:.6}")
}

pub fn escape_ffmpeg_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
}

#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<String>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: String) {
        self.filters.push(filter);
    }

    pub fn join(&self) -> String {
        self.filters.join(";")
    }
}

/// Encoder settings shared by every file the renderer writes.
pub fn push_encoding_args(args: &mut Vec<String>, fps: u32) {
    for arg in [
        "-c:v", "libx264", "-preset", "medium", "-crf", "18", "-pix_fmt", "yuv420p",
    ] {
        args.push(arg.to_string());
    }
    args.push("-r".to_string());
    args.push(fps.to_string());
    for arg in ["-c:a", "aac", "-b:a", "192k", "-ac", "2"] {
        args.push(arg.to_string());
    }
    args.push("-ar".to_string());
    args.push(AUDIO_SAMPLE_RATE.to_string());
}

fn push_lavfi_input(args: &mut Vec<String>, source: String) {
    args.push("-f".to_string());
    args.push("lavfi".to_string());
    args.push("-i".to_string());
    args.push(source);
}

fn color_source(segment: &SegmentSpec, fps: u32) -> String {
    format!(
        "color=c={color}:s={width}x{height}:d={duration}:r={fps}",
        color = segment.background.to_hex(),
        width = segment.width,
        height = segment.height,
        duration = format_time(segment.duration_seconds),
    )
}

fn silent_audio_source(duration: f64) -> String {
    format!(
        "anullsrc=r={AUDIO_SAMPLE_RATE}:cl=stereo:d={}",
        format_time(duration)
    )
}

fn finish_args(args: &mut Vec<String>, duration: f64, fps: u32, output: &Path) {
    push_encoding_args(args, fps);
    args.push("-t".to_string());
    args.push(format_time(duration));
    args.push(output.to_string_lossy().into_owned());
}

fn map_outputs(args: &mut Vec<String>, video: &str, audio: &str) {
    args.push("-map".to_string());
    args.push(video.to_string());
    args.push("-map".to_string());
    args.push(audio.to_string());
}

/// Countdown screen: remaining seconds in the middle, the label in the
/// bottom-right corner, the logo on top and a beep shortly before the end.
pub fn countdown_args(
    segment: &SegmentSpec,
    fps: u32,
    label_file: &Path,
    assets: &RenderAssets,
    output: &Path,
) -> Vec<String> {
    let duration = segment.duration_seconds;
    let mut args = vec!["-y".to_string(), "-hide_banner".to_string()];
    push_lavfi_input(&mut args, color_source(segment, fps));
    push_lavfi_input(&mut args, silent_audio_source(duration));

    let mut next_input = 2;
    let logo_input = assets.logo.as_ref().map(|logo| {
        args.extend([
            "-loop".to_string(),
            "1".to_string(),
            "-t".to_string(),
            format_time(duration),
            "-i".to_string(),
            logo.to_string_lossy().into_owned(),
        ]);
        next_input += 1;
        next_input - 1
    });
    let beep_input = assets
        .beep
        .as_ref()
        .filter(|_| duration >= BEEP_LEAD_SECONDS)
        .map(|beep| {
            args.push("-i".to_string());
            args.push(beep.to_string_lossy().into_owned());
            next_input
        });

    let mut filters = FilterChain::new();
    filters.push(format!(
        "[0:v]drawtext=text='%{{eif\\:ceil({duration}-t)\\:d}}s':fontcolor={color}:fontsize=h*{countdown}:x=(w-text_w)/2:y=(h-text_h)/2,\
drawtext=textfile='{label}':fontcolor={color}:fontsize=h*{label_scale}:x=w-text_w:y=h-text_h[text]",
        duration = format_time(duration),
        color = FONT_COLOR.to_hex(),
        countdown = COUNTDOWN_FONT_SCALE,
        label = escape_ffmpeg_path(label_file),
        label_scale = LABEL_FONT_SCALE,
    ));

    let video_label = match logo_input {
        Some(index) => {
            filters.push(format!("[{index}:v]scale={LOGO_SIZE}:{LOGO_SIZE}[logo]"));
            filters.push("[text][logo]overlay=(W-w)/2:(H-h)/2:shortest=1[outv]".to_string());
            "[outv]"
        }
        None => "[text]",
    };

    let audio_label = match beep_input {
        Some(index) => {
            let delay_ms = ((duration - BEEP_LEAD_SECONDS) * 1000.0).round() as u64;
            filters.push(format!(
                "[{index}:a]aformat=sample_rates={AUDIO_SAMPLE_RATE}:channel_layouts=stereo,adelay={delay_ms}|{delay_ms}[beep]"
            ));
            filters.push(
                "[1:a][beep]amix=inputs=2:duration=first:dropout_transition=0:normalize=0[outa]"
                    .to_string(),
            );
            "[outa]"
        }
        None => "1:a",
    };

    args.push("-filter_complex".to_string());
    args.push(filters.join());
    map_outputs(&mut args, video_label, audio_label);
    finish_args(&mut args, duration, fps, output);
    args
}

/// Demo clip looped `loops` times, cut to the slot length and centred on the
/// background without resizing. The clip's own audio is dropped.
pub fn demo_args(
    segment: &SegmentSpec,
    cut: &DemoCut,
    source: &Path,
    fps: u32,
    output: &Path,
) -> Vec<String> {
    let duration = segment.duration_seconds;
    let mut args = vec!["-y".to_string(), "-hide_banner".to_string()];
    push_lavfi_input(&mut args, color_source(segment, fps));
    args.extend([
        "-stream_loop".to_string(),
        cut.loops.saturating_sub(1).to_string(),
        "-t".to_string(),
        format_time(duration),
        "-i".to_string(),
        source.to_string_lossy().into_owned(),
    ]);
    push_lavfi_input(&mut args, silent_audio_source(duration));

    let mut filters = FilterChain::new();
    filters.push(format!("[1:v]fps={fps},setpts=PTS-STARTPTS[clip]"));
    filters.push("[0:v][clip]overlay=(W-w)/2:(H-h)/2:eof_action=repeat[outv]".to_string());

    args.push("-filter_complex".to_string());
    args.push(filters.join());
    map_outputs(&mut args, "[outv]", "2:a");
    finish_args(&mut args, duration, fps, output);
    args
}

/// Labelled screen standing in for a clip that could not be loaded.
pub fn placeholder_args(
    segment: &SegmentSpec,
    fps: u32,
    label_file: &Path,
    output: &Path,
) -> Vec<String> {
    let duration = segment.duration_seconds;
    let mut args = vec!["-y".to_string(), "-hide_banner".to_string()];
    push_lavfi_input(&mut args, color_source(segment, fps));
    push_lavfi_input(&mut args, silent_audio_source(duration));

    args.push("-filter_complex".to_string());
    args.push(format!(
        "[0:v]drawtext=textfile='{label}':fontcolor={color}:fontsize=h*{scale}:x=(w-text_w)/2:y=(h-text_h)/2[outv]",
        label = escape_ffmpeg_path(label_file),
        color = FONT_COLOR.to_hex(),
        scale = PLACEHOLDER_FONT_SCALE,
    ));
    map_outputs(&mut args, "[outv]", "1:a");
    finish_args(&mut args, duration, fps, output);
    args
}

/// Body of a concat demuxer list file.
pub fn concat_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|path| {
            format!(
                "file '{}'\n",
                path.to_string_lossy().replace('\'', "'\\''")
            )
        })
        .collect()
}

pub fn concat_args(list_file: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        list_file.to_string_lossy().into_owned(),
        "-c".to_string(),
        "copy".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Final re-encode. A preview speed above 1 speeds the picture up and swaps
/// the audio for silence of the shortened length.
pub fn write_args(input: &Path, output: &Path, fps: u32, preview_speed: f64) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
    ];

    if preview_speed > 1.0 {
        push_lavfi_input(
            &mut args,
            format!("anullsrc=r={AUDIO_SAMPLE_RATE}:cl=stereo"),
        );
        args.push("-filter:v".to_string());
        args.push(format!("setpts=PTS/{preview_speed}"));
        map_outputs(&mut args, "0:v", "1:a");
        args.push("-shortest".to_string());
    }

    push_encoding_args(&mut args, fps);
    args.push("-movflags".to_string());
    args.push("+faststart".to_string());
    args.push(output.to_string_lossy().into_owned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::segment::SegmentContent;

    fn countdown(duration: f64) -> SegmentSpec {
        SegmentSpec::new(duration, "Work", Rgb::GREEN, 1080, 1920, SegmentContent::Countdown)
            .unwrap()
    }

    fn filter_of(args: &[String]) -> &str {
        let index = args.iter().position(|a| a == "-filter_complex").unwrap();
        &args[index + 1]
    }

    #[test]
    fn countdown_draws_timer_label_logo_and_beep() {
        let assets = RenderAssets {
            logo: Some(PathBuf::from("/gym/logo.webp")),
            beep: Some(PathBuf::from("/gym/beep.mp3")),
        };
        let args = countdown_args(
            &countdown(75.0),
            24,
            Path::new("/tmp/label-0.txt"),
            &assets,
            Path::new("/tmp/clip-0.mp4"),
        );

        assert!(args.contains(&"color=c=0x00FF00:s=1080x1920:d=75.000000:r=24".to_string()));
        let filter = filter_of(&args);
        assert!(filter.contains("ceil(75.000000-t)"));
        assert!(filter.contains("fontsize=h*0.33"));
        assert!(filter.contains("fontsize=h*0.175:x=w-text_w:y=h-text_h"));
        assert!(filter.contains("scale=500:500"));
        assert!(filter.contains("adelay=72000|72000"));
        assert_eq!(args.last().unwrap(), "/tmp/clip-0.mp4");
    }

    #[test]
    fn countdown_without_assets_keeps_silent_track() {
        let args = countdown_args(
            &countdown(15.0),
            24,
            Path::new("label.txt"),
            &RenderAssets::default(),
            Path::new("clip.mp4"),
        );
        let filter = filter_of(&args);
        assert!(!filter.contains("overlay"));
        assert!(!filter.contains("adelay"));
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "1:a"));
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "[text]"));
    }

    #[test]
    fn short_countdown_has_no_beep() {
        let assets = RenderAssets {
            logo: None,
            beep: Some(PathBuf::from("beep.mp3")),
        };
        let args = countdown_args(
            &countdown(2.0),
            24,
            Path::new("l.txt"),
            &assets,
            Path::new("o.mp4"),
        );
        assert!(!args.contains(&"beep.mp3".to_string()));
    }

    #[test]
    fn demo_loops_then_truncates() {
        let cut = DemoCut {
            source: Some(PathBuf::from("squat.mp4")),
            clip_seconds: 3.0,
            loops: 4,
        };
        let segment = SegmentSpec::new(
            11.25,
            "squat",
            Rgb::BLACK,
            1080,
            1920,
            SegmentContent::Demo(cut.clone()),
        )
        .unwrap();
        let args = demo_args(&segment, &cut, Path::new("squat.mp4"), 24, Path::new("o.mp4"));
        let loop_at = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_at + 1], "3");
        assert_eq!(args[loop_at + 3], "11.250000");
        let t_at = args.iter().rposition(|a| a == "-t").unwrap();
        assert_eq!(args[t_at + 1], "11.250000");
    }

    #[test]
    fn concat_list_quotes_paths() {
        let list = concat_list(&[PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/it's.mp4")]);
        assert_eq!(list, "file '/tmp/a.mp4'\nfile '/tmp/it'\\''s.mp4'\n");
        let args = concat_args(Path::new("list.txt"), Path::new("out.mp4"));
        assert!(args.windows(2).any(|w| w[0] == "-c" && w[1] == "copy"));
    }

    #[test]
    fn preview_speed_applies_setpts() {
        let normal = write_args(Path::new("in.mp4"), Path::new("out.mp4"), 24, 1.0);
        assert!(!normal.iter().any(|a| a.starts_with("setpts")));

        let fast = write_args(Path::new("in.mp4"), Path::new("out.mp4"), 24, 40.0);
        assert!(fast.contains(&"setpts=PTS/40".to_string()));
        assert!(fast.contains(&"-shortest".to_string()));
    }

    #[test]
    fn escapes_filter_paths() {
        assert_eq!(
            escape_ffmpeg_path(Path::new("/tmp/it's:here")),
            "/tmp/it'\\''s\\:here"
        );
    }
}
