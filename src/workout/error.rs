use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Unsatisfiable category '{0}': no exercise in the table can fill it")]
    UnsatisfiableCategory(String),

    #[error("Could not order workout {day} without adjacent anaerobic exercises after {shuffles} shuffles")]
    ShuffleExhausted { day: usize, shuffles: usize },

    #[error("No valid workout found for day {day} after {attempts} attempts")]
    AttemptsExhausted { day: usize, attempts: usize },

    #[error("A plan needs at least one day")]
    NoDays,
}
