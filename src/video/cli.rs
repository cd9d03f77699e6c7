use clap::{Args, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum VideoCommands {
    /// Render class videos (timeline names or `all`)
    Render(RenderArgs),
    /// Show the composed timelines without rendering
    Plan(PlanArgs),
    /// Merge the split-layout videos into final_video.mp4
    Stitch(StitchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Timelines to render: `workout`, `segment-1` .. `segment-4`, or `all`
    pub targets: Vec<String>,

    /// Class config file; defaults to the user config directory
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory the videos are written to
    #[arg(short = 'o', long = "out-dir", default_value = ".", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,

    /// Print the ffmpeg commands that would be executed without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Show raw ffmpeg output instead of progress bars
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Class config file; defaults to the user config directory
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StitchArgs {
    /// Directory holding segment-1.mp4 .. segment-4.mp4
    #[arg(short = 'o', long = "out-dir", default_value = ".", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Class config whose frame size is used when a dry run cannot probe the inputs
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Frame rate of the stitched videos
    #[arg(long, default_value_t = 24)]
    pub fps: u32,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,

    /// Print the ffmpeg commands that would be executed without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Show raw ffmpeg output instead of progress bars
    #[arg(long)]
    pub verbose: bool,
}
