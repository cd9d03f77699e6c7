use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

/// The eight muscle-group categories every workout must cover, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetCategory {
    ChestPush,
    BackPull,
    Shoulders,
    QuadPush,
    HamstringPull,
    Calves,
    Core,
    Cardio,
}

impl TargetCategory {
    pub const ALL: [TargetCategory; 8] = [
        TargetCategory::ChestPush,
        TargetCategory::BackPull,
        TargetCategory::Shoulders,
        TargetCategory::QuadPush,
        TargetCategory::HamstringPull,
        TargetCategory::Calves,
        TargetCategory::Core,
        TargetCategory::Cardio,
    ];

    /// Column name in the exercise table
    pub fn column(self) -> &'static str {
        match self {
            TargetCategory::ChestPush => "Push (Chest)",
            TargetCategory::BackPull => "Pull (Back)",
            TargetCategory::Shoulders => "Shoulders",
            TargetCategory::QuadPush => "Push (Quads)",
            TargetCategory::HamstringPull => "Pull (Hamstrings)",
            TargetCategory::Calves => "Calves",
            TargetCategory::Core => "Core",
            TargetCategory::Cardio => "Cardio",
        }
    }
}

impl std::fmt::Display for TargetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetFlags {
    pub chest_push: bool,
    pub back_pull: bool,
    pub shoulders: bool,
    pub quad_push: bool,
    pub hamstring_pull: bool,
    pub calves: bool,
    pub core: bool,
    pub cardio: bool,
}

impl TargetFlags {
    pub fn has(&self, category: TargetCategory) -> bool {
        match category {
            TargetCategory::ChestPush => self.chest_push,
            TargetCategory::BackPull => self.back_pull,
            TargetCategory::Shoulders => self.shoulders,
            TargetCategory::QuadPush => self.quad_push,
            TargetCategory::HamstringPull => self.hamstring_pull,
            TargetCategory::Calves => self.calves,
            TargetCategory::Core => self.core,
            TargetCategory::Cardio => self.cardio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub description: String,
    pub targets: TargetFlags,
    pub aerobic: bool,
    pub anaerobic: bool,
    pub plyometric: bool,
    pub strength: bool,
    pub isolation: bool,
    pub compound: bool,
}

impl Exercise {
    pub fn is_aerobic_only(&self) -> bool {
        self.aerobic && !self.anaerobic
    }

    pub fn is_anaerobic_only(&self) -> bool {
        self.anaerobic && !self.aerobic
    }

    /// Comma-joined names of the categories this exercise targets
    pub fn targets_summary(&self) -> String {
        TargetCategory::ALL
            .iter()
            .filter(|category| self.targets.has(**category))
            .map(|category| category.column())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-joined energy and movement tags
    pub fn tags_summary(&self) -> String {
        [
            ("Anaerobic", self.anaerobic),
            ("Aerobic", self.aerobic),
            ("Plyometric", self.plyometric),
            ("Strength", self.strength),
            ("isolation", self.isolation),
            ("compound", self.compound),
        ]
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// One CSV row exactly as the spreadsheet authors it.
#[derive(Debug, Deserialize)]
struct ExerciseRecord {
    #[serde(rename = "Ex Name")]
    name: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Push (Chest)", deserialize_with = "flag")]
    chest_push: bool,
    #[serde(rename = "Pull (Back)", deserialize_with = "flag")]
    back_pull: bool,
    #[serde(rename = "Shoulders", deserialize_with = "flag")]
    shoulders: bool,
    #[serde(rename = "Push (Quads)", deserialize_with = "flag")]
    quad_push: bool,
    #[serde(rename = "Pull (Hamstrings)", deserialize_with = "flag")]
    hamstring_pull: bool,
    #[serde(rename = "Calves", deserialize_with = "flag")]
    calves: bool,
    #[serde(rename = "Core", deserialize_with = "flag")]
    core: bool,
    #[serde(rename = "Cardio", deserialize_with = "flag")]
    cardio: bool,
    #[serde(rename = "Aerobic", deserialize_with = "flag")]
    aerobic: bool,
    #[serde(rename = "Anaerobic", deserialize_with = "flag")]
    anaerobic: bool,
    #[serde(rename = "Plyometric", deserialize_with = "flag")]
    plyometric: bool,
    #[serde(rename = "Strength", deserialize_with = "flag")]
    strength: bool,
    #[serde(rename = "isolation", deserialize_with = "flag")]
    isolation: bool,
    #[serde(rename = "compound", deserialize_with = "flag")]
    compound: bool,
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid flag value '{raw}'")))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "0.0" | "false" | "no" => Some(false),
        "1" | "1.0" | "true" | "yes" => Some(true),
        _ => None,
    }
}

impl From<ExerciseRecord> for Exercise {
    fn from(record: ExerciseRecord) -> Self {
        Exercise {
            name: record.name,
            description: record.description,
            targets: TargetFlags {
                chest_push: record.chest_push,
                back_pull: record.back_pull,
                shoulders: record.shoulders,
                quad_push: record.quad_push,
                hamstring_pull: record.hamstring_pull,
                calves: record.calves,
                core: record.core,
                cardio: record.cardio,
            },
            aerobic: record.aerobic,
            anaerobic: record.anaerobic,
            plyometric: record.plyometric,
            strength: record.strength,
            isolation: record.isolation,
            compound: record.compound,
        }
    }
}

/// The exercise table, validated once when loaded.
#[derive(Debug, Clone, Default)]
pub struct ExerciseTable {
    exercises: Vec<Exercise>,
}

impl ExerciseTable {
    #[cfg(test)]
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self { exercises }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening exercise table {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("reading exercise table {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let mut exercises = Vec::new();

        for (index, record) in csv_reader.deserialize::<ExerciseRecord>().enumerate() {
            // Header is line 1
            let line = index + 2;
            let record = record.with_context(|| format!("invalid exercise row on line {line}"))?;
            let exercise = Exercise::from(record);
            if exercise.name.trim().is_empty() {
                bail!("exercise on line {line} has an empty 'Ex Name'");
            }
            exercises.push(exercise);
        }

        Ok(Self { exercises })
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const HEADER: &str = "Ex Name,Description,Push (Chest),Pull (Back),Shoulders,Push (Quads),Pull (Hamstrings),Calves,Core,Cardio,Aerobic,Anaerobic,Plyometric,Strength,isolation,compound";

    pub(crate) fn exercise(
        name: &str,
        category: TargetCategory,
        aerobic: bool,
        anaerobic: bool,
    ) -> Exercise {
        let mut targets = TargetFlags::default();
        match category {
            TargetCategory::ChestPush => targets.chest_push = true,
            TargetCategory::BackPull => targets.back_pull = true,
            TargetCategory::Shoulders => targets.shoulders = true,
            TargetCategory::QuadPush => targets.quad_push = true,
            TargetCategory::HamstringPull => targets.hamstring_pull = true,
            TargetCategory::Calves => targets.calves = true,
            TargetCategory::Core => targets.core = true,
            TargetCategory::Cardio => targets.cardio = true,
        }
        Exercise {
            name: name.to_string(),
            description: format!("{name} description"),
            targets,
            aerobic,
            anaerobic,
            plyometric: false,
            strength: anaerobic,
            isolation: false,
            compound: true,
        }
    }

    #[test]
    fn loads_rows_with_mixed_flag_spellings() {
        let csv = format!(
            "{HEADER}\nPush-up,Chest to floor,1,0,0,0,0,0,1,0,1,0,0,1,0,1\nKB Swing,Hinge,0.0,0,0,0,1.0,0,0,1,true,,0,0,0,1\n"
        );
        let table = ExerciseTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let push_up = &table.exercises()[0];
        assert!(push_up.targets.chest_push);
        assert!(push_up.targets.core);
        assert!(push_up.aerobic);
        assert!(!push_up.anaerobic);

        let swing = &table.exercises()[1];
        assert!(swing.targets.hamstring_pull);
        assert!(swing.targets.cardio);
        assert!(swing.aerobic);
        assert!(!swing.anaerobic);
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let csv = format!("{HEADER}\nPush-up,,maybe,0,0,0,0,0,0,0,0,0,0,0,0,0\n");
        let err = ExerciseTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_missing_columns() {
        let csv = "Ex Name,Description\nPush-up,desc\n";
        assert!(ExerciseTable::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn rejects_blank_names() {
        let csv = format!("{HEADER}\n  ,desc,1,0,0,0,0,0,0,0,0,0,0,0,0,0\n");
        assert!(ExerciseTable::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn names_are_kept_as_authored() {
        let csv = format!("{HEADER}\n KB Row ,desc,0,1,0,0,0,0,0,0,0,1,0,1,0,1\n");
        let table = ExerciseTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.exercises()[0].name, " KB Row ");
    }

    #[test]
    fn summaries_follow_column_order() {
        let mut row = exercise("Thruster", TargetCategory::QuadPush, true, true);
        row.targets.shoulders = true;
        row.plyometric = true;
        assert_eq!(row.targets_summary(), "Shoulders, Push (Quads)");
        assert_eq!(row.tags_summary(), "Anaerobic, Aerobic, Plyometric, Strength, compound");
    }
}
