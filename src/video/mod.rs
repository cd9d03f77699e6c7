pub mod cli;
pub mod commands;
mod assets;
mod composer;
mod config;
mod error;
mod render;
mod segment;
mod stitch;
mod summary;
mod timeline;

pub use cli::VideoCommands;
pub use commands::handle_video_command;
