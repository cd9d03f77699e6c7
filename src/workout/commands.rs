use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::cli::{GenerateArgs, WorkoutCommands};
use super::config::WorkoutConfig;
use super::exercise::ExerciseTable;
use super::generator::{GeneratorPolicy, WorkoutGenerator};
use super::plan::{Plan, generate_plan};
use crate::ui::prelude::*;

pub fn handle_workout_command(command: WorkoutCommands) -> Result<()> {
    match command {
        WorkoutCommands::Generate(args) => handle_generate(args),
    }
}

fn handle_generate(args: GenerateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => WorkoutConfig::load_from_path(path)?,
        None => WorkoutConfig::load()?,
    };
    let days = args.days.unwrap_or(config.days);

    let table = ExerciseTable::load(&args.exercises)?;
    emit(
        Level::Debug,
        "workout.table.loaded",
        &format!("Loaded {} exercises from {}", table.len(), args.exercises.display()),
        None,
    );

    let generator = WorkoutGenerator::new(&table, GeneratorPolicy::from(&config))?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let plan = generate_plan(&generator, days, &mut rng)
        .with_context(|| format!("generating a {days}-day plan"))?;
    let path = plan.save_timestamped(&args.out_dir, Local::now())?;

    if args.print {
        print_plan(&plan);
    }

    emit(
        Level::Success,
        "workout.plan.saved",
        &format!("Saved {days}-day plan to {}", path.display()),
        Some(serde_json::json!({
            "path": path.display().to_string(),
            "days": days,
            "seed": args.seed,
        })),
    );
    Ok(())
}

fn print_plan(plan: &Plan) {
    match get_output_format() {
        OutputFormat::Json => {
            let rows = serde_json::to_value(plan.rows()).unwrap_or_default();
            emit(Level::Info, "workout.plan.rows", "Generated plan", Some(rows));
        }
        OutputFormat::Text => {
            for workout in &plan.workouts {
                println!("{}", format!("Day {}", workout.id).bold().cyan());
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["#", "Exercise", "Targets", "Tags"]);
                for (position, entry) in workout.entries.iter().enumerate() {
                    table.add_row(vec![
                        (position + 1).to_string(),
                        entry.exercise.name.clone(),
                        entry.targets.clone(),
                        entry.tags.clone(),
                    ]);
                }
                println!("{table}");
            }
        }
    }
}
