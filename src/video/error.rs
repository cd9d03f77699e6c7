use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComposeError {
    #[error("Segment duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("Screen size must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Interval {index} has no work time")]
    EmptyWorkInterval { index: usize },

    #[error("A demo block needs at least one exercise clip")]
    EmptyDemo,
}
