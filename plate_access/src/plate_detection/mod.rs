pub mod bounding_box_render;
pub mod display;
pub mod ocr_reader;
pub mod preprocess;
pub mod verdict;
pub mod video_reader;

use log::debug;
use opencv::core::Point;

use crate::config::MIN_PLATE_LEN;

/// One line of text as reported by the recognition engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Corners clockwise from the top-left.
    pub polygon: [Point; 4],
    pub confidence: f32,
}

impl TextLine {
    pub fn new(text: impl Into<String>, polygon: [Point; 4], confidence: f32) -> Self {
        Self {
            text: text.into(),
            polygon,
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlateCandidate {
    pub text: String,
    pub polygon: [Point; 4],
}

/// A text fragment looks like a plate when it is long enough and mixes
/// letters and digits.
pub fn is_plate_like(text: &str) -> bool {
    text.chars().count() >= MIN_PLATE_LEN
        && text.chars().any(|c| c.is_ascii_digit())
        && text.chars().any(char::is_alphabetic)
}

/// Plate candidates found in a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameAnalysis {
    candidates: Vec<PlateCandidate>,
}

impl FrameAnalysis {
    pub fn from_lines(lines: &[TextLine]) -> Self {
        let candidates = lines
            .iter()
            .filter(|line| !line.text.is_empty() && is_plate_like(&line.text))
            .map(|line| {
                let text = line.text.to_uppercase();
                debug!("Detected text: '{}' ({:.2})", text, line.confidence);
                PlateCandidate {
                    text,
                    polygon: line.polygon,
                }
            })
            .collect();
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PlateCandidate] {
        &self.candidates
    }

    /// Text of the last qualifying line. Earlier candidates are still drawn
    /// but do not take part in the verdict.
    pub fn detected(&self) -> Option<&str> {
        self.candidates.last().map(|c| c.text.as_str())
    }
}
