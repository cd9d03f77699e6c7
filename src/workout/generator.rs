//! Rejection-sampling workout generator.
//!
//! A candidate is drawn one exercise per category, repaired up to the aerobic
//! quota, shuffled until no two anaerobic exercises touch, and finally checked
//! for equipment collisions. Any collision throws the whole candidate away.

use rand::Rng;
use rand::seq::{SliceRandom, index};

use super::config::WorkoutConfig;
use super::equipment::has_equipment_collision;
use super::error::GenerateError;
use super::exercise::{Exercise, ExerciseTable, TargetCategory};

#[derive(Debug, Clone)]
pub struct GeneratorPolicy {
    pub min_aerobic: usize,
    pub max_attempts: usize,
    pub max_shuffles: usize,
    pub equipment_keywords: Vec<String>,
}

impl From<&WorkoutConfig> for GeneratorPolicy {
    fn from(config: &WorkoutConfig) -> Self {
        Self {
            min_aerobic: config.min_aerobic,
            max_attempts: config.max_attempts,
            max_shuffles: config.max_shuffles,
            equipment_keywords: config.equipment_keywords.clone(),
        }
    }
}

impl Default for GeneratorPolicy {
    fn default() -> Self {
        Self::from(&WorkoutConfig::default())
    }
}

/// Exercises grouped by category, computed once per run.
#[derive(Debug)]
pub struct CategoryPools<'t> {
    by_category: Vec<(TargetCategory, Vec<&'t Exercise>)>,
    aerobic_only: Vec<&'t Exercise>,
}

impl<'t> CategoryPools<'t> {
    pub fn build(table: &'t ExerciseTable) -> Result<Self, GenerateError> {
        let mut by_category = Vec::with_capacity(TargetCategory::ALL.len());
        for category in TargetCategory::ALL {
            let pool: Vec<&Exercise> = table
                .exercises()
                .iter()
                .filter(|exercise| exercise.targets.has(category))
                .collect();
            if pool.is_empty() {
                return Err(GenerateError::UnsatisfiableCategory(
                    category.column().to_string(),
                ));
            }
            by_category.push((category, pool));
        }

        let aerobic_only = table
            .exercises()
            .iter()
            .filter(|exercise| exercise.is_aerobic_only())
            .collect();

        Ok(Self {
            by_category,
            aerobic_only,
        })
    }

    #[cfg(test)]
    pub fn pool(&self, category: TargetCategory) -> &[&'t Exercise] {
        self.by_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, pool)| pool.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutEntry {
    pub exercise: Exercise,
    pub targets: String,
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub id: usize,
    pub entries: Vec<WorkoutEntry>,
}

#[cfg(test)]
impl Workout {
    pub fn aerobic_count(&self) -> usize {
        self.entries.iter().filter(|e| e.exercise.aerobic).count()
    }

    pub fn has_adjacent_anaerobic(&self) -> bool {
        let rows: Vec<&Exercise> = self.entries.iter().map(|e| &e.exercise).collect();
        has_adjacent_anaerobic(&rows)
    }
}

pub(crate) fn has_adjacent_anaerobic(rows: &[&Exercise]) -> bool {
    rows.windows(2).any(|pair| pair[0].anaerobic && pair[1].anaerobic)
}

enum Candidate<'t> {
    Accepted(Vec<&'t Exercise>),
    Rejected,
}

#[derive(Debug)]
pub struct WorkoutGenerator<'t> {
    pools: CategoryPools<'t>,
    policy: GeneratorPolicy,
}

impl<'t> WorkoutGenerator<'t> {
    pub fn new(table: &'t ExerciseTable, policy: GeneratorPolicy) -> Result<Self, GenerateError> {
        Ok(Self {
            pools: CategoryPools::build(table)?,
            policy,
        })
    }

    pub fn generate_workout<R: Rng + ?Sized>(
        &self,
        day_index: usize,
        rng: &mut R,
    ) -> Result<Workout, GenerateError> {
        for _ in 0..self.policy.max_attempts {
            if let Candidate::Accepted(rows) = self.sample_candidate(day_index, rng)? {
                return Ok(annotate(day_index, &rows));
            }
        }

        Err(GenerateError::AttemptsExhausted {
            day: day_index,
            attempts: self.policy.max_attempts,
        })
    }

    fn sample_candidate<R: Rng + ?Sized>(
        &self,
        day_index: usize,
        rng: &mut R,
    ) -> Result<Candidate<'t>, GenerateError> {
        let mut rows: Vec<&'t Exercise> = Vec::with_capacity(TargetCategory::ALL.len());
        for (_, pool) in &self.pools.by_category {
            if let Some(exercise) = pool.choose(rng) {
                rows.push(*exercise);
            }
        }
        if rows.len() != TargetCategory::ALL.len() {
            return Ok(Candidate::Rejected);
        }

        if !self.repair_aerobic_quota(&mut rows, rng)? {
            return Ok(Candidate::Rejected);
        }

        self.separate_anaerobic(day_index, &mut rows, rng)?;

        if has_equipment_collision(&rows, &self.policy.equipment_keywords) {
            return Ok(Candidate::Rejected);
        }

        Ok(Candidate::Accepted(rows))
    }

    /// Swap anaerobic-only rows for aerobic-only ones until the quota is met.
    ///
    /// Returns `false` when the candidate cannot be repaired and should be
    /// resampled. Replacements are not checked against rows already chosen.
    fn repair_aerobic_quota<R: Rng + ?Sized>(
        &self,
        rows: &mut Vec<&'t Exercise>,
        rng: &mut R,
    ) -> Result<bool, GenerateError> {
        let aerobic = rows.iter().filter(|exercise| exercise.aerobic).count();
        if aerobic >= self.policy.min_aerobic {
            return Ok(true);
        }

        let deficit = self.policy.min_aerobic - aerobic;
        if self.pools.aerobic_only.is_empty() {
            return Err(GenerateError::UnsatisfiableCategory("Aerobic".to_string()));
        }
        if self.pools.aerobic_only.len() < deficit {
            return Ok(false);
        }

        let replaceable: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, exercise)| exercise.is_anaerobic_only())
            .map(|(position, _)| position)
            .collect();
        if replaceable.len() < deficit {
            return Ok(false);
        }

        let mut dropped: Vec<usize> = index::sample(rng, replaceable.len(), deficit)
            .into_iter()
            .map(|i| replaceable[i])
            .collect();
        dropped.sort_unstable_by(|a, b| b.cmp(a));
        for position in dropped {
            rows.remove(position);
        }

        rows.extend(
            self.pools
                .aerobic_only
                .choose_multiple(rng, deficit)
                .copied(),
        );
        Ok(true)
    }

    fn separate_anaerobic<R: Rng + ?Sized>(
        &self,
        day_index: usize,
        rows: &mut [&'t Exercise],
        rng: &mut R,
    ) -> Result<(), GenerateError> {
        for _ in 0..self.policy.max_shuffles {
            rows.shuffle(rng);
            if !has_adjacent_anaerobic(rows) {
                return Ok(());
            }
        }

        Err(GenerateError::ShuffleExhausted {
            day: day_index,
            shuffles: self.policy.max_shuffles,
        })
    }
}

fn annotate(day_index: usize, rows: &[&Exercise]) -> Workout {
    let entries = rows
        .iter()
        .map(|exercise| WorkoutEntry {
            exercise: (*exercise).clone(),
            targets: exercise.targets_summary(),
            tags: exercise.tags_summary(),
        })
        .collect();

    Workout {
        id: day_index,
        entries,
    }
}
