use anyhow::Result;

use super::cli::VideoCommands;
use super::render::handle_render;
use super::stitch::handle_stitch;
use super::summary::handle_plan;

pub fn handle_video_command(command: VideoCommands) -> Result<()> {
    match command {
        VideoCommands::Render(args) => handle_render(args),
        VideoCommands::Plan(args) => handle_plan(args),
        VideoCommands::Stitch(args) => handle_stitch(args),
    }
}
