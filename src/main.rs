mod common;
mod ui;
mod video;
mod workout;

use clap::{Parser, Subcommand};

use crate::ui::prelude::*;
use crate::video::VideoCommands;
use crate::workout::WorkoutCommands;

/// Fitness class video composer and workout plan generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format for messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose and render class videos
    Video {
        #[command(subcommand)]
        command: VideoCommands,
    },
    /// Generate randomized workout plans from an exercise table
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    ui::init(cli.output, !cli.no_color);
    ui::set_debug_mode(cli.debug);
    emit(Level::Debug, "debug.enabled", "Debug mode is on", None);

    let result = match cli.command {
        Some(Commands::Video { command }) => video::handle_video_command(command),
        Some(Commands::Workout { command }) => workout::handle_workout_command(command),
        None => {
            println!("fitclass: run with --help for usage");
            Ok(())
        }
    };

    if let Err(err) = result {
        emit(
            Level::Error,
            "error",
            &format!("Error: {err:#}"),
            Some(serde_json::json!({ "error": format!("{err:#}") })),
        );
        std::process::exit(1);
    }
}
