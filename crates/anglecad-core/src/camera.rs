//! View transform between screen and world coordinates.
//!
//! `screen = world * zoom + offset`. Pointer events arrive in screen
//! coordinates and are converted to drawing coordinates before snapping.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level at which one screen unit equals one drawing unit.
pub const UNIT_ZOOM: f64 = 1.0;

pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 100.0;

/// Factor applied per zoom step.
pub const ZOOM_STEP: f64 = 1.25;

/// Pan and zoom of a graphic view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the world origin.
    pub offset: Vec2,
    /// Screen units per world unit.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: UNIT_ZOOM,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.offset) / self.zoom).to_point()
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        (world.to_vec2() * self.zoom + self.offset).to_point()
    }

    /// Length in world units of a screen-space distance.
    pub fn screen_to_world_distance(&self, distance: f64) -> f64 {
        distance / self.zoom
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Scale the view by `factor` around a screen point.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let world = self.screen_to_world(anchor);
        self.zoom = zoom;
        self.offset = anchor.to_vec2() - world.to_vec2() * zoom;
    }

    /// One zoom step in (`steps > 0`) or out around a screen point.
    pub fn zoom_steps(&mut self, anchor: Point, steps: i32) {
        self.zoom_at(anchor, ZOOM_STEP.powi(steps));
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Zoom and pan so `bounds` fills the viewport minus `margin` on each side.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, margin: f64) {
        if bounds.width() <= 0.0 && bounds.height() <= 0.0 {
            self.reset();
            self.offset = viewport.to_vec2() / 2.0 - bounds.center().to_vec2();
            return;
        }
        let avail_w = (viewport.width - 2.0 * margin).max(1.0);
        let avail_h = (viewport.height - 2.0 * margin).max(1.0);
        let zoom_w = if bounds.width() > 0.0 { avail_w / bounds.width() } else { f64::INFINITY };
        let zoom_h = if bounds.height() > 0.0 { avail_h / bounds.height() } else { f64::INFINITY };
        self.zoom = zoom_w.min(zoom_h).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = viewport.to_vec2() / 2.0 - bounds.center().to_vec2() * self.zoom;
    }
}
