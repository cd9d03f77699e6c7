use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::error::GenerateError;
use super::generator::{Workout, WorkoutGenerator};

/// A day-indexed sequence of workouts, day `n` at position `n - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub workouts: Vec<Workout>,
}

/// One spreadsheet row of a persisted plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRow<'a> {
    #[serde(rename = "Workout_ID")]
    pub workout_id: usize,
    #[serde(rename = "Ex Name")]
    pub name: &'a str,
    #[serde(rename = "Description")]
    pub description: &'a str,
    pub targets: &'a str,
    pub tags: &'a str,
    #[serde(rename = "Workout Day")]
    pub workout_day: usize,
}

pub fn generate_plan<R: Rng + ?Sized>(
    generator: &WorkoutGenerator<'_>,
    days: usize,
    rng: &mut R,
) -> Result<Plan, GenerateError> {
    if days == 0 {
        return Err(GenerateError::NoDays);
    }

    let workouts = (1..=days)
        .map(|day| generator.generate_workout(day, rng))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Plan { workouts })
}

impl Plan {
    pub fn rows(&self) -> Vec<PlanRow<'_>> {
        self.workouts
            .iter()
            .enumerate()
            .flat_map(|(position, workout)| {
                workout.entries.iter().map(move |entry| PlanRow {
                    workout_id: workout.id,
                    name: &entry.exercise.name,
                    description: &entry.exercise.description,
                    targets: &entry.targets,
                    tags: &entry.tags,
                    workout_day: position + 1,
                })
            })
            .collect()
    }

    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in self.rows() {
            csv_writer.serialize(row).context("writing plan row")?;
        }
        csv_writer.flush().context("flushing plan")?;
        Ok(())
    }

    /// Write the plan to a new timestamped file inside `dir`.
    ///
    /// An existing file is never overwritten; a numeric suffix is added instead.
    pub fn save_timestamped(&self, dir: &Path, generated_at: DateTime<Local>) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;

        let path = timestamped_path(dir, generated_at);
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("creating plan file {}", path.display()))?;
        self.write_csv(file)
            .with_context(|| format!("writing plan to {}", path.display()))?;
        Ok(path)
    }
}

fn timestamped_path(dir: &Path, generated_at: DateTime<Local>) -> PathBuf {
    let stamp = generated_at.format("%Y%m%d%H%M%S").to_string();
    let mut path = dir.join(format!("workouts_{stamp}.csv"));
    let mut suffix = 1;
    while path.exists() {
        path = dir.join(format!("workouts_{stamp}-{suffix}.csv"));
        suffix += 1;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::generator::GeneratorPolicy;
    use crate::workout::generator::tests::sample_table;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 9, 2, 6, 30, 0).unwrap()
    }

    #[test]
    fn plan_has_requested_days_in_order() {
        let table = sample_table();
        let generator = WorkoutGenerator::new(&table, GeneratorPolicy::default()).unwrap();
        let plan = generate_plan(&generator, 20, &mut StdRng::seed_from_u64(11)).unwrap();

        assert_eq!(plan.workouts.len(), 20);
        for (position, workout) in plan.workouts.iter().enumerate() {
            assert_eq!(workout.id, position + 1);
        }
        let rows = plan.rows();
        assert_eq!(rows.len(), 160);
        assert!(rows.iter().all(|row| row.workout_id == row.workout_day));
    }

    #[test]
    fn zero_days_is_rejected() {
        let table = sample_table();
        let generator = WorkoutGenerator::new(&table, GeneratorPolicy::default()).unwrap();
        let err = generate_plan(&generator, 0, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, GenerateError::NoDays);
    }

    #[test]
    fn seeded_plans_are_reproducible() {
        let table = sample_table();
        let generator = WorkoutGenerator::new(&table, GeneratorPolicy::default()).unwrap();
        let a = generate_plan(&generator, 5, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = generate_plan(&generator, 5, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn csv_uses_spreadsheet_headers() {
        let table = sample_table();
        let generator = WorkoutGenerator::new(&table, GeneratorPolicy::default()).unwrap();
        let plan = generate_plan(&generator, 1, &mut StdRng::seed_from_u64(2)).unwrap();

        let mut buffer = Vec::new();
        plan.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Workout_ID,Ex Name,Description,targets,tags,Workout Day")
        );
        assert_eq!(lines.count(), 8);
    }

    #[test]
    fn reruns_never_overwrite_previous_plans() {
        let table = sample_table();
        let generator = WorkoutGenerator::new(&table, GeneratorPolicy::default()).unwrap();
        let plan = generate_plan(&generator, 1, &mut StdRng::seed_from_u64(2)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let first = plan.save_timestamped(dir.path(), fixed_time()).unwrap();
        let second = plan.save_timestamped(dir.path(), fixed_time()).unwrap();

        assert_eq!(first.file_name().unwrap(), "workouts_20240902063000.csv");
        assert_eq!(second.file_name().unwrap(), "workouts_20240902063000-1.csv");
    }
}
