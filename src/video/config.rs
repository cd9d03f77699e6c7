use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::{config, paths};

/// One work/rest pair of the interval table.
///
/// A rest of zero marks a water break rather than "no rest".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Interval {
    pub work_seconds: u32,
    pub rest_seconds: u32,
}

impl Interval {
    pub const fn new(work_seconds: u32, rest_seconds: u32) -> Self {
        Self {
            work_seconds,
            rest_seconds,
        }
    }

    pub fn is_water_break(&self) -> bool {
        self.rest_seconds == 0
    }
}

impl From<(u32, u32)> for Interval {
    fn from((work_seconds, rest_seconds): (u32, u32)) -> Self {
        Self::new(work_seconds, rest_seconds)
    }
}

impl From<Interval> for (u32, u32) {
    fn from(interval: Interval) -> Self {
        (interval.work_seconds, interval.rest_seconds)
    }
}

/// Reference class: eight 75/35 rounds, eight 60/30 rounds, eight 45/25
/// rounds, with a water break opening the second and third blocks and
/// closing the class.
pub const DEFAULT_INTERVALS: [Interval; 25] = [
    Interval::new(75, 35),
    Interval::new(75, 35),
    Interval::new(75, 35),
    Interval::new(75, 35),
    Interval::new(75, 35),
    Interval::new(75, 35),
    Interval::new(75, 35),
    Interval::new(75, 35),
    Interval::new(60, 0),
    Interval::new(60, 30),
    Interval::new(60, 30),
    Interval::new(60, 30),
    Interval::new(60, 30),
    Interval::new(60, 30),
    Interval::new(60, 30),
    Interval::new(60, 30),
    Interval::new(60, 0),
    Interval::new(45, 25),
    Interval::new(45, 25),
    Interval::new(45, 25),
    Interval::new(45, 25),
    Interval::new(45, 25),
    Interval::new(45, 25),
    Interval::new(45, 25),
    Interval::new(60, 0),
];

/// Screen orientation of the rendered video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Vertical format for wall-mounted screens (1080x1920)
    #[default]
    Portrait,
    /// Standard widescreen (1920x1080)
    Landscape,
}

impl Orientation {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Orientation::Portrait => (1080, 1920),
            Orientation::Landscape => (1920, 1080),
        }
    }
}

/// How the session is split into output videos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// A single video containing the whole class
    #[default]
    Combined,
    /// Four videos (intro, timer, cooldown, station demos) stitched afterwards
    Split,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassConfig {
    pub gym_name: String,
    pub date: String,
    pub workout_name: String,
    pub orientation: Orientation,
    pub layout: Layout,
    /// Frame rate of the written videos
    pub fps: u32,
    /// Playback speed-up for quick review renders; 1.0 renders in real time
    pub preview_speed: f64,
    /// Logo drawn at the centre of every countdown screen
    pub logo: PathBuf,
    /// Beep played three seconds before each countdown ends
    pub beep: PathBuf,
    pub exercises_dir: PathBuf,
    /// Demo clips in presentation order, relative to `exercises_dir`
    pub exercise_files: Vec<String>,
    pub welcome_seconds: f64,
    pub demo_seconds: f64,
    pub warmup_seconds: f64,
    pub get_ready_seconds: f64,
    pub water_seconds: f64,
    pub cooldown_seconds: f64,
    pub intervals: Vec<Interval>,
}

/// Station clips of the reference class, in station order
pub const DEFAULT_EXERCISE_FILES: [&str; 8] = [
    "(1) Hip Escape.mp4",
    "(2) Slamball Over the Shoulder.mp4",
    "(3) Russian Kettlebell Swing.mp4",
    "(4) Sit Through.mp4",
    "(5) Med Ball Oblique Slams.mp4",
    "(6) Burpee Sprawl.mp4",
    "(7) Med Ball Russian Twist.mp4",
    "(8) Bear Crawl mp4.mp4",
];

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            gym_name: "My Gym".to_string(),
            date: String::new(),
            workout_name: "Circuit".to_string(),
            orientation: Orientation::default(),
            layout: Layout::default(),
            fps: 24,
            preview_speed: 1.0,
            logo: PathBuf::from("logo.webp"),
            beep: PathBuf::from("beep.mp3"),
            exercises_dir: PathBuf::from("exercises"),
            exercise_files: DEFAULT_EXERCISE_FILES.iter().map(|f| f.to_string()).collect(),
            welcome_seconds: 15.0,
            demo_seconds: 90.0,
            warmup_seconds: 120.0,
            get_ready_seconds: 20.0,
            water_seconds: 60.0,
            cooldown_seconds: 60.0,
            intervals: DEFAULT_INTERVALS.to_vec(),
        }
    }
}

impl ClassConfig {
    pub fn load() -> Result<Self> {
        let path = paths::class_config_path()?;
        let mut config: Self = config::load_or_create(&path)?;
        config.anchor_paths(path.parent().unwrap_or_else(|| Path::new(".")));
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config; relative asset paths resolve against its directory.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config: Self = config::load_existing(path)?;
        config.anchor_paths(path.parent().unwrap_or_else(|| Path::new(".")));
        config
            .validate()
            .with_context(|| format!("invalid class config {}", path.display()))?;
        Ok(config)
    }

    /// The explicit config when one is given, the user config otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    fn anchor_paths(&mut self, base: &Path) {
        for path in [&mut self.logo, &mut self.beep, &mut self.exercises_dir] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("welcome_seconds", self.welcome_seconds),
            ("demo_seconds", self.demo_seconds),
            ("warmup_seconds", self.warmup_seconds),
            ("get_ready_seconds", self.get_ready_seconds),
            ("water_seconds", self.water_seconds),
            ("cooldown_seconds", self.cooldown_seconds),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value <= 0.0 {
                bail!("{name} must be positive, got {value}");
            }
        }
        if self.fps == 0 {
            bail!("fps must be at least 1");
        }
        if !self.preview_speed.is_finite() || self.preview_speed <= 0.0 {
            bail!("preview_speed must be positive, got {}", self.preview_speed);
        }
        if self.intervals.is_empty() {
            bail!("intervals must contain at least one work/rest pair");
        }
        if let Some(index) = self.intervals.iter().position(|i| i.work_seconds == 0) {
            bail!("interval {} has zero work seconds", index + 1);
        }
        Ok(())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.orientation.dimensions()
    }

    pub fn welcome_label(&self) -> String {
        format!("{} \n {} \n {}", self.gym_name, self.date, self.workout_name)
    }

    pub fn exercise_paths(&self) -> Vec<PathBuf> {
        self.exercise_files
            .iter()
            .map(|file| self.exercises_dir.join(file))
            .collect()
    }
}
