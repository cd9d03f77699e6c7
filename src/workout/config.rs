use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::equipment::DEFAULT_EQUIPMENT_KEYWORDS;
use super::exercise::TargetCategory;
use crate::common::{config, paths};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutConfig {
    /// Number of workout days in a generated plan
    pub days: usize,
    /// Minimum number of aerobic exercises per workout
    pub min_aerobic: usize,
    /// Full re-samples allowed before a day is given up on
    pub max_attempts: usize,
    /// Re-shuffles allowed per candidate while separating anaerobic exercises
    pub max_shuffles: usize,
    /// Equipment markers that may appear in at most one exercise name per workout
    pub equipment_keywords: Vec<String>,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            days: Self::DEFAULT_DAYS,
            min_aerobic: Self::DEFAULT_MIN_AEROBIC,
            max_attempts: 10_000,
            max_shuffles: 10_000,
            equipment_keywords: DEFAULT_EQUIPMENT_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
        }
    }
}

impl WorkoutConfig {
    pub const DEFAULT_DAYS: usize = 20;
    pub const DEFAULT_MIN_AEROBIC: usize = 5;

    pub fn load() -> Result<Self> {
        let config: Self = config::load_or_create(&paths::workouts_config_path()?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = config::load_existing(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            bail!("days must be at least 1");
        }
        if self.min_aerobic > TargetCategory::ALL.len() {
            bail!(
                "min_aerobic is {} but a workout only has {} exercises",
                self.min_aerobic,
                TargetCategory::ALL.len()
            );
        }
        if self.max_attempts == 0 || self.max_shuffles == 0 {
            bail!("max_attempts and max_shuffles must be at least 1");
        }
        if self.equipment_keywords.iter().any(|keyword| keyword.is_empty()) {
            bail!("equipment_keywords must not contain empty strings");
        }
        Ok(())
    }
}
