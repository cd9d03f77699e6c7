use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::ComposeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(234, 4, 4);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const ORANGE: Rgb = Rgb(255, 165, 0);

    /// `0xRRGGBB`, the form ffmpeg color options accept
    pub fn to_hex(self) -> String {
        format!("0x{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Frame size every segment of a session shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
}

impl Screen {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Screen {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// How an exercise clip fills its slot in a demo block.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoCut {
    /// Source clip, carried through to the renderer untouched
    pub source: Option<PathBuf>,
    /// Length of one pass through the source clip
    pub clip_seconds: f64,
    /// Whole passes played before truncating to the slot length
    pub loops: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentContent {
    /// Seconds counting down over a solid background, with logo and beep
    Countdown,
    /// A looped and truncated exercise clip centred on the background
    Demo(DemoCut),
    /// Plain labelled screen standing in for a clip that could not be loaded
    Placeholder,
}

/// One timed screen of the output video.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSpec {
    pub duration_seconds: f64,
    pub label: String,
    pub background: Rgb,
    pub width: u32,
    pub height: u32,
    pub content: SegmentContent,
}

impl SegmentSpec {
    pub fn new(
        duration_seconds: f64,
        label: impl Into<String>,
        background: Rgb,
        width: u32,
        height: u32,
        content: SegmentContent,
    ) -> Result<Self, ComposeError> {
        validate_duration(duration_seconds)?;
        if width == 0 || height == 0 {
            return Err(ComposeError::InvalidDimensions { width, height });
        }
        Ok(Self {
            duration_seconds,
            label: label.into(),
            background,
            width,
            height,
            content,
        })
    }
}

pub(crate) fn validate_duration(seconds: f64) -> Result<(), ComposeError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ComposeError::InvalidDuration(seconds));
    }
    Ok(())
}
