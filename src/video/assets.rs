use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::json;

use super::composer::ExerciseClip;
use super::config::ClassConfig;
use super::render::ffmpeg::probe_duration_seconds;
use crate::ui::prelude::{Level, emit};

/// Optional media drawn on every countdown screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderAssets {
    pub logo: Option<PathBuf>,
    pub beep: Option<PathBuf>,
}

impl RenderAssets {
    /// Keep only the assets that exist, warning about the rest.
    pub fn resolve(config: &ClassConfig) -> Self {
        Self {
            logo: existing_asset("logo", &config.logo),
            beep: existing_asset("beep", &config.beep),
        }
    }
}

fn existing_asset(kind: &str, path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    emit(
        Level::Warn,
        "video.assets.missing",
        &format!(
            "{} not found at {}; countdown screens will render without it",
            kind,
            path.display()
        ),
        Some(json!({ "asset": kind, "path": path.display().to_string() })),
    );
    None
}

pub trait ClipProbe {
    fn duration(&self, path: &Path) -> Result<f64>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FfprobeClipProbe;

impl ClipProbe for FfprobeClipProbe {
    fn duration(&self, path: &Path) -> Result<f64> {
        probe_duration_seconds(path)
    }
}

/// Display name of a clip: the file stem without a leading `(N)` ordinal.
pub fn clip_name(file: &str) -> String {
    let stem = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    let trimmed = stem.trim();
    match trimmed.strip_prefix('(').and_then(|rest| rest.split_once(')')) {
        Some((ordinal, name)) if ordinal.chars().all(|c| c.is_ascii_digit()) => {
            name.trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Look up every configured demo clip; missing or unreadable clips are kept
/// with no source so they become placeholders.
pub fn resolve_exercise_clips(config: &ClassConfig, probe: &dyn ClipProbe) -> Vec<ExerciseClip> {
    config
        .exercise_files
        .iter()
        .zip(config.exercise_paths())
        .map(|(file, path)| {
            let name = clip_name(file);
            if !path.is_file() {
                emit(
                    Level::Warn,
                    "video.assets.clip_missing",
                    &format!("Exercise clip {} not found; using a placeholder", path.display()),
                    Some(json!({ "clip": name, "path": path.display().to_string() })),
                );
                return ExerciseClip {
                    name,
                    source: None,
                    duration: None,
                };
            }

            match probe.duration(&path) {
                Ok(seconds) if seconds.is_finite() && seconds > 0.0 => {
                    emit(
                        Level::Debug,
                        "video.assets.clip",
                        &format!("{} lasts {:.2}s", path.display(), seconds),
                        None,
                    );
                    ExerciseClip {
                        name,
                        source: Some(path),
                        duration: Some(seconds),
                    }
                }
                Ok(seconds) => {
                    emit(
                        Level::Warn,
                        "video.assets.clip_unreadable",
                        &format!(
                            "Exercise clip {} reports a duration of {}; using a placeholder",
                            path.display(),
                            seconds
                        ),
                        None,
                    );
                    ExerciseClip {
                        name,
                        source: None,
                        duration: None,
                    }
                }
                Err(err) => {
                    emit(
                        Level::Warn,
                        "video.assets.clip_unreadable",
                        &format!(
                            "Could not probe {}: {err:#}; using a placeholder",
                            path.display()
                        ),
                        None,
                    );
                    ExerciseClip {
                        name,
                        source: None,
                        duration: None,
                    }
                }
            }
        })
        .collect()
}
