pub mod cli;
pub mod commands;
mod config;
mod equipment;
mod error;
mod exercise;
mod generator;
mod plan;

pub use cli::WorkoutCommands;
pub use commands::handle_workout_command;
