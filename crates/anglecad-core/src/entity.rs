//! Drawing entities and their pen attributes.

use crate::geometry::LineData;
use crate::snap::{SnapTarget, snap_targets_from_line};
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Name of the layer every drawing starts with.
pub const DEFAULT_LAYER: &str = "0";

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Dash pattern of a pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Stroke attributes applied to new entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: SerializableColor,
    pub width: f64,
    #[serde(default)]
    pub line_type: LineType,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 0.25,
            line_type: LineType::Solid,
        }
    }
}

impl Pen {
    /// Get the pen color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.color.into()
    }

    /// Set the pen color from a peniko Color.
    pub fn set_stroke(&mut self, color: Color) {
        self.color = color.into();
    }
}

/// A straight line segment owned by a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineEntity {
    pub(crate) id: EntityId,
    /// Geometry.
    pub data: LineData,
    /// Layer the entity lives on.
    pub layer: String,
    /// Stroke attributes.
    pub pen: Pen,
}

impl LineEntity {
    /// Create a new entity on the default layer with the default pen.
    pub fn new(data: LineData) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            layer: DEFAULT_LAYER.to_string(),
            pen: Pen::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn set_layer(&mut self, layer: impl Into<String>) {
        self.layer = layer.into();
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    pub fn start(&self) -> Point {
        self.data.start
    }

    pub fn end(&self) -> Point {
        self.data.end
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.data.start, self.data.end)
    }

    /// Endpoints and midpoint.
    pub fn snap_targets(&self) -> [SnapTarget; 3] {
        snap_targets_from_line(self.data.start, self.data.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal() -> LineEntity {
        LineEntity::new(LineData::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)))
    }

    #[test]
    fn test_new_entity_defaults() {
        let line = horizontal();
        assert_eq!(line.layer, DEFAULT_LAYER);
        assert_eq!(line.pen, Pen::default());
        assert_ne!(line.id(), horizontal().id());
    }

    #[test]
    fn test_bounds() {
        let line = LineEntity::new(LineData::new(Point::new(50.0, 80.0), Point::new(10.0, 20.0)));
        let bounds = line.bounds();
        assert_eq!(bounds, Rect::new(10.0, 20.0, 50.0, 80.0));
    }

    #[test]
    fn test_snap_targets() {
        let targets = horizontal().snap_targets();
        assert_eq!(targets[0].point, Point::new(0.0, 0.0));
        assert_eq!(targets[1].point, Point::new(100.0, 0.0));
        assert_eq!(targets[2].point, Point::new(50.0, 0.0));
    }

    #[test]
    fn test_pen_color_conversion() {
        let mut pen = Pen::default();
        pen.set_stroke(Color::from_rgba8(200, 10, 20, 255));
        assert_eq!(pen.color, SerializableColor::new(200, 10, 20, 255));
        assert_eq!(SerializableColor::from(pen.stroke()), pen.color);
    }
}
