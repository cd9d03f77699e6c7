mod common;

use anyhow::Result;
use common::{TestEnvironment, exercise_csv};
use std::fs;
use std::path::PathBuf;

const SMALL_CLASS: &str = r#"
gym_name = "Iron Temple"
date = "Sept 2"
workout_name = "Leg Day"
exercises_dir = "clips"
exercise_files = ["(1) Hip Escape.mp4", "(2) Sit Through.mp4"]
intervals = [[75, 35], [60, 0]]
"#;

fn plan_files(dir: &std::path::Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_plan = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("workouts_") && name.ends_with(".csv"));
        if is_plan {
            files.push(path);
        }
    }
    Ok(files)
}

#[test]
fn workout_generate_writes_eight_rows_per_day() -> Result<()> {
    let env = TestEnvironment::new()?;
    let table = env.write_file("exercises.csv", &exercise_csv())?;
    let table_arg = table.display().to_string();

    let output = env.run(&[
        "workout", "generate", &table_arg, "--days", "3", "--seed", "7", "--out-dir", "plans",
    ])?;
    assert_eq!(output.exit_code, 0, "generate failed: {}", output.stderr);

    let files = plan_files(&env.path().join("plans"))?;
    assert_eq!(files.len(), 1);

    let mut reader = csv::Reader::from_path(&files[0])?;
    let headers = reader.headers()?.clone();
    assert_eq!(headers.get(0), Some("Workout_ID"));
    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 24);
    Ok(())
}

#[test]
fn workout_generate_is_reproducible_with_seed() -> Result<()> {
    let env = TestEnvironment::new()?;
    let table = env.write_file("exercises.csv", &exercise_csv())?;
    let table_arg = table.display().to_string();

    for dir in ["first", "second"] {
        let output = env.run(&[
            "workout", "generate", &table_arg, "-n", "2", "--seed", "42", "--out-dir", dir,
        ])?;
        assert_eq!(output.exit_code, 0, "generate failed: {}", output.stderr);
    }

    let first = fs::read_to_string(&plan_files(&env.path().join("first"))?[0])?;
    let second = fs::read_to_string(&plan_files(&env.path().join("second"))?[0])?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn workout_generate_reports_unsatisfiable_table() -> Result<()> {
    let env = TestEnvironment::new()?;
    let csv: String = exercise_csv()
        .lines()
        .filter(|line| !line.starts_with("Calf"))
        .map(|line| format!("{line}\n"))
        .collect();
    let table = env.write_file("exercises.csv", &csv)?;

    let output = env.run(&["workout", "generate", &table.display().to_string(), "--seed", "1"])?;
    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("Calves"), "stderr: {}", output.stderr);
    Ok(())
}

#[test]
fn render_without_targets_prints_usage() -> Result<()> {
    let env = TestEnvironment::new()?;
    let output = env.run(&["video", "render"])?;
    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains("Usage: fitclass video render"));
    Ok(())
}

#[test]
fn plan_lists_timelines_as_json() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_file("class.toml", SMALL_CLASS)?;

    let output = env.run(&[
        "--output",
        "json",
        "video",
        "plan",
        "--config",
        &config.display().to_string(),
    ])?;
    assert_eq!(output.exit_code, 0, "plan failed: {}", output.stderr);
    assert!(output.stderr.contains("video.assets.clip_missing"));

    let event: serde_json::Value = output
        .stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|event| event["code"] == "video.plan.timeline")
        .expect("timeline event");
    assert_eq!(event["data"]["timeline"], "workout");
    // welcome, 2 demo placeholders, warmup, get ready, 4 timer screens, cooldown
    assert_eq!(event["data"]["segments"].as_array().unwrap().len(), 10);
    let duration = event["data"]["duration"].as_f64().unwrap();
    let expected = 15.0 + 90.0 + 120.0 + 20.0 + 75.0 + 35.0 + 60.0 + 60.0 + 60.0;
    assert!((duration - expected).abs() < 1e-6);
    Ok(())
}

#[test]
fn plan_requires_explicit_config_to_exist() -> Result<()> {
    let env = TestEnvironment::new()?;
    let output = env.run(&["video", "plan", "--config", "missing.toml"])?;
    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("does not exist"));
    Ok(())
}

#[test]
fn plan_creates_default_config_on_first_use() -> Result<()> {
    let env = TestEnvironment::new()?;
    let output = env.run(&["video", "plan"])?;
    assert_eq!(output.exit_code, 0, "plan failed: {}", output.stderr);
    assert!(env.config_home().join("fitclass").join("class.toml").exists());
    Ok(())
}

#[test]
fn dry_run_stitch_falls_back_to_configured_frame() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_file("class.toml", SMALL_CLASS)?;
    for index in 1..=4 {
        env.write_file(&format!("out/segment-{index}.mp4"), "not a video")?;
    }

    let output = env.run(&[
        "video",
        "stitch",
        "--out-dir",
        "out",
        "--config",
        &config.display().to_string(),
        "--dry-run",
    ])?;
    assert_eq!(output.exit_code, 0, "stitch failed: {}", output.stderr);
    assert!(output.stderr.contains("assuming 1080x1920"), "stderr: {}", output.stderr);

    let commands: Vec<&str> = output
        .stdout
        .lines()
        .filter(|line| line.starts_with("ffmpeg "))
        .collect();
    assert_eq!(commands.len(), 2);
    assert!(commands[0].contains("hstack"));
    assert!(commands[1].contains("final_video.partial.mp4"));
    assert!(!env.path().join("out").join("final_video.mp4").exists());
    Ok(())
}

#[test]
fn dry_run_render_prints_commands_without_writing() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_file("class.toml", SMALL_CLASS)?;

    let output = env.run(&[
        "video",
        "render",
        "workout",
        "bogus",
        "--config",
        &config.display().to_string(),
        "--out-dir",
        "out",
        "--dry-run",
    ])?;
    assert_eq!(output.exit_code, 0, "render failed: {}", output.stderr);
    assert!(output.stderr.contains("Unknown target 'bogus'"));

    let commands: Vec<&str> = output
        .stdout
        .lines()
        .filter(|line| line.starts_with("ffmpeg "))
        .collect();
    // ten screens, one concat, one final write
    assert_eq!(commands.len(), 12);
    assert!(commands.last().unwrap().contains("workout.partial.mp4"));
    assert!(!env.path().join("out").join("workout.mp4").exists());
    Ok(())
}
