use super::exercise::Exercise;

pub const DEFAULT_EQUIPMENT_KEYWORDS: [&str; 3] = ["KB", "Med Ball", "Band"];

/// First keyword that appears in more than one exercise name, if any.
///
/// Matching is case-sensitive substring containment with no normalization.
pub fn find_equipment_collision<'a, S: AsRef<str>>(
    exercises: &[&Exercise],
    keywords: &'a [S],
) -> Option<&'a str> {
    keywords.iter().map(|keyword| keyword.as_ref()).find(|keyword| {
        exercises
            .iter()
            .filter(|exercise| exercise.name.contains(*keyword))
            .count()
            > 1
    })
}

pub fn has_equipment_collision<S: AsRef<str>>(exercises: &[&Exercise], keywords: &[S]) -> bool {
    find_equipment_collision(exercises, keywords).is_some()
}
