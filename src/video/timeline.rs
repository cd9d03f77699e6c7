//! A timeline is one output video: its segments play back to back, so the
//! total length is exactly the sum of the segment lengths.

use super::segment::SegmentSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub name: String,
    pub segments: Vec<SegmentSpec>,
}

impl Timeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: SegmentSpec) {
        self.segments.push(segment);
    }

    pub fn extend(&mut self, segments: impl IntoIterator<Item = SegmentSpec>) {
        self.segments.extend(segments);
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_seconds).sum()
    }

    /// Start offset of every segment within the timeline
    pub fn start_times(&self) -> Vec<f64> {
        let mut elapsed = 0.0;
        self.segments
            .iter()
            .map(|segment| {
                let start = elapsed;
                elapsed += segment.duration_seconds;
                start
            })
            .collect()
    }
}
