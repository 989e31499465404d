//! Line construction from a pivot point, a length and an angle.

use kurbo::{Line as KurboLine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Which point of a new segment coincides with the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorMode {
    #[default]
    Start,
    Middle,
    End,
}

impl AnchorMode {
    /// Anchor mode for an options-panel index (0 = start, 1 = middle, 2 = end).
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(AnchorMode::Start),
            1 => Some(AnchorMode::Middle),
            2 => Some(AnchorMode::End),
            _ => None,
        }
    }

    /// Parse a name (`start`, `middle`, `end`) or an options-panel index.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(index) = text.parse::<usize>() {
            return Self::from_index(index);
        }
        [AnchorMode::Start, AnchorMode::Middle, AnchorMode::End]
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(text))
    }

    pub fn name(self) -> &'static str {
        match self {
            AnchorMode::Start => "start",
            AnchorMode::Middle => "middle",
            AnchorMode::End => "end",
        }
    }
}

/// Start and end point of a straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineData {
    pub start: Point,
    pub end: Point,
}

impl LineData {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Euclidean length of the segment.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Direction from start to end in radians.
    pub fn angle(&self) -> f64 {
        (self.end - self.start).atan2()
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Get as a kurbo Line.
    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.start, self.end)
    }
}

/// Polar offset with the same component order as a CAD `setPolar(radius, angle)`.
fn polar(radius: f64, angle: f64) -> Vec2 {
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

/// Build the segment placed at `pos` with the given length, angle and anchor.
///
/// The offset is `polar(length, angle)`, with the length negated when the
/// pivot marks the end of the segment. For a middle anchor the start is moved
/// back by half the offset. Preview and commit both go through here, so the
/// committed line is bit-identical to the last preview.
pub fn line_from_anchor(pos: Point, length: f64, angle: f64, anchor: AnchorMode) -> LineData {
    let offset = match anchor {
        AnchorMode::End => polar(-length, angle),
        AnchorMode::Start | AnchorMode::Middle => polar(length, angle),
    };

    let start = match anchor {
        AnchorMode::Middle => pos - offset / 2.0,
        AnchorMode::Start | AnchorMode::End => pos,
    };

    LineData::new(start, start + offset)
}
