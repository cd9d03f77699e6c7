use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::json;
use tempfile::TempDir;

use super::compiler::{
    concat_args, concat_list, countdown_args, demo_args, placeholder_args, write_args,
};
use super::ffmpeg::{FfmpegRunOptions, FfmpegRunner};
use crate::ui::prelude::{Level, emit};
use crate::video::assets::RenderAssets;
use crate::video::segment::{SegmentContent, SegmentSpec};

/// A rendered clip on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipHandle {
    pub path: PathBuf,
    pub duration: f64,
}

pub trait SegmentRenderer {
    fn render_segment(&mut self, segment: &SegmentSpec) -> Result<ClipHandle>;
    fn concatenate(&mut self, clips: &[ClipHandle]) -> Result<ClipHandle>;
    fn write_video(&mut self, clip: &ClipHandle, output: &Path, fps: u32) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub fps: u32,
    pub preview_speed: f64,
    pub verbose: bool,
}

/// Renders segments with ffmpeg into a private working directory that is
/// removed when the renderer is dropped.
pub struct FfmpegRenderer<'r> {
    runner: &'r dyn FfmpegRunner,
    assets: RenderAssets,
    settings: RenderSettings,
    work_dir: TempDir,
    next_file: usize,
}

impl<'r> FfmpegRenderer<'r> {
    pub fn new(
        runner: &'r dyn FfmpegRunner,
        assets: RenderAssets,
        settings: RenderSettings,
    ) -> Result<Self> {
        let work_dir = tempfile::Builder::new()
            .prefix("fitclass-render-")
            .tempdir()
            .context("Failed to create render working directory")?;
        Ok(Self {
            runner,
            assets,
            settings,
            work_dir,
            next_file: 0,
        })
    }

    #[cfg(test)]
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    fn next_path(&mut self, stem: &str, extension: &str) -> PathBuf {
        let path = self
            .work_dir
            .path()
            .join(format!("{stem}-{:04}.{extension}", self.next_file));
        self.next_file += 1;
        path
    }

    fn write_label(&mut self, label: &str) -> Result<PathBuf> {
        let path = self.next_path("label", "txt");
        fs::write(&path, label)
            .with_context(|| format!("Failed to write label file {}", path.display()))?;
        Ok(path)
    }

    fn run(&self, args: &[String], duration: f64, message: String) -> Result<()> {
        let options = FfmpegRunOptions::new(
            (duration >= 30.0).then_some(duration),
            self.settings.verbose,
            message,
        );
        self.runner.run(args, options)
    }
}

impl SegmentRenderer for FfmpegRenderer<'_> {
    fn render_segment(&mut self, segment: &SegmentSpec) -> Result<ClipHandle> {
        let fps = self.settings.fps;
        let output = self.next_path("clip", "mp4");

        let args = match &segment.content {
            SegmentContent::Countdown => {
                let label = self.write_label(&segment.label)?;
                countdown_args(segment, fps, &label, &self.assets, &output)
            }
            SegmentContent::Demo(cut) => match &cut.source {
                Some(source) => demo_args(segment, cut, source, fps, &output),
                None => {
                    let label = self.write_label(&segment.label)?;
                    placeholder_args(segment, fps, &label, &output)
                }
            },
            SegmentContent::Placeholder => {
                let label = self.write_label(&segment.label)?;
                placeholder_args(segment, fps, &label, &output)
            }
        };

        emit(
            Level::Debug,
            "video.render.segment",
            &format!(
                "Rendering '{}' ({:.2}s)",
                segment.label.replace('\n', " "),
                segment.duration_seconds
            ),
            Some(json!({
                "label": segment.label,
                "duration": segment.duration_seconds,
                "output": output.display().to_string(),
            })),
        );

        self.run(&args, segment.duration_seconds, segment.label.replace('\n', " "))
            .with_context(|| format!("Failed to render segment '{}'", segment.label))?;

        Ok(ClipHandle {
            path: output,
            duration: segment.duration_seconds,
        })
    }

    fn concatenate(&mut self, clips: &[ClipHandle]) -> Result<ClipHandle> {
        match clips {
            [] => bail!("Nothing to concatenate"),
            [single] => Ok(single.clone()),
            _ => {
                let list_path = self.next_path("concat", "txt");
                let paths: Vec<PathBuf> = clips.iter().map(|clip| clip.path.clone()).collect();
                fs::write(&list_path, concat_list(&paths)).with_context(|| {
                    format!("Failed to write concat list {}", list_path.display())
                })?;

                let output = self.next_path("joined", "mp4");
                let duration = clips.iter().map(|clip| clip.duration).sum();
                self.run(
                    &concat_args(&list_path, &output),
                    duration,
                    "joining".to_string(),
                )
                .context("Failed to concatenate clips")?;

                Ok(ClipHandle {
                    path: output,
                    duration,
                })
            }
        }
    }

    fn write_video(&mut self, clip: &ClipHandle, output: &Path, fps: u32) -> Result<()> {
        let args = write_args(&clip.path, output, fps, self.settings.preview_speed);
        self.run(&args, clip.duration, "encoding".to_string())
            .with_context(|| format!("Failed to write {}", output.display()))
    }
}
