use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Isolated home and config directory for one test
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join("config"))?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_home(&self) -> PathBuf {
        self.path().join("config")
    }

    pub fn write_file(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(env!("CARGO_BIN_EXE_fitclass"))
            .args(args)
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .current_dir(self.path())
            .output()?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

pub const EXERCISE_HEADER: &str = "Ex Name,Description,Push (Chest),Pull (Back),Shoulders,Push (Quads),Pull (Hamstrings),Calves,Core,Cardio,Aerobic,Anaerobic,Plyometric,Strength,isolation,compound";

/// Three exercises per category, two of them aerobic
pub fn exercise_csv() -> String {
    let categories = [
        "Chest", "Back", "Shoulder", "Quad", "Hamstring", "Calf", "Core", "Cardio",
    ];
    let mut csv = format!("{EXERCISE_HEADER}\n");
    for (column, category) in categories.iter().enumerate() {
        for (variant, aerobic) in [("Flow", true), ("Tempo", true), ("Hold", false)] {
            let mut targets = ["0"; 8];
            targets[column] = "1";
            let (aerobic_flag, anaerobic_flag) = if aerobic { ("1", "0") } else { ("0", "1") };
            csv.push_str(&format!(
                "{category} {variant},{category} {variant} drill,{},{aerobic_flag},{anaerobic_flag},0,{anaerobic_flag},0,1\n",
                targets.join(",")
            ));
        }
    }
    csv
}
