use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar measured in milliseconds of rendered media
pub fn create_render_bar(total_seconds: f64, message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new((total_seconds * 1000.0).max(1.0) as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>8}/{len:8} ({eta}) {msg}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

