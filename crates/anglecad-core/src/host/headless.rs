//! Graphic view without a window, used by the shell and in tests.

use super::{CursorStyle, GraphicView, RedrawMode};
use crate::camera::Camera;
use crate::geometry::LineData;
use crate::snap::{ENTITY_SNAP_THRESHOLD, GRID_SIZE, SnapMode, SnapTarget, snap_point};
use kurbo::Point;

/// View state kept in memory: camera, snapping, preview and relative zero.
#[derive(Debug, Clone)]
pub struct HeadlessView {
    pub camera: Camera,
    pub snap_mode: SnapMode,
    pub grid_size: f64,
    /// Entity snap distance in screen units.
    pub snap_threshold: f64,
    relative_zero: Point,
    preview: Option<LineData>,
    cursor: CursorStyle,
    redraws: Vec<RedrawMode>,
}

impl Default for HeadlessView {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            snap_mode: SnapMode::None,
            grid_size: GRID_SIZE,
            snap_threshold: ENTITY_SNAP_THRESHOLD,
            relative_zero: Point::ZERO,
            preview: None,
            cursor: CursorStyle::default(),
            redraws: Vec::new(),
        }
    }
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snap(mut self, mode: SnapMode, grid_size: f64) -> Self {
        self.snap_mode = mode;
        self.grid_size = grid_size;
        self
    }

    /// Preview currently on screen.
    pub fn preview(&self) -> Option<&LineData> {
        self.preview.as_ref()
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Every redraw requested so far, oldest first.
    pub fn redraws(&self) -> &[RedrawMode] {
        &self.redraws
    }
}

impl GraphicView for HeadlessView {
    fn snap_point(&mut self, screen: Point, targets: &[SnapTarget]) -> Point {
        let world = self.camera.screen_to_world(screen);
        if !self.snap_mode.is_enabled() {
            return world;
        }
        let threshold = self.camera.screen_to_world_distance(self.snap_threshold);
        let result = snap_point(world, self.snap_mode, self.grid_size, targets, threshold);
        if result.is_snapped() {
            log::trace!("snapped ({}, {}) -> ({}, {})", world.x, world.y, result.point.x, result.point.y);
        }
        result.point
    }

    fn relative_zero(&self) -> Point {
        self.relative_zero
    }

    fn move_relative_zero(&mut self, point: Point) {
        self.relative_zero = point;
    }

    fn redraw(&mut self, mode: RedrawMode) {
        self.redraws.push(mode);
    }

    fn set_mouse_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    fn draw_preview(&mut self, line: &LineData) {
        self.preview = Some(*line);
    }

    fn delete_preview(&mut self) {
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::snap_targets_from_line;
    use kurbo::Vec2;

    #[test]
    fn test_free_snap_applies_camera() {
        let mut view = HeadlessView::new();
        view.camera.offset = Vec2::new(10.0, 10.0);
        view.camera.zoom = 2.0;
        assert_eq!(view.snap_point(Point::new(30.0, 50.0), &[]), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_grid_snap() {
        let mut view = HeadlessView::new().with_snap(SnapMode::Grid, 5.0);
        assert_eq!(view.snap_point(Point::new(6.0, 14.0), &[]), Point::new(5.0, 15.0));
    }

    #[test]
    fn test_endpoint_threshold_scales_with_zoom() {
        let targets = snap_targets_from_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let mut view = HeadlessView::new().with_snap(SnapMode::Endpoints, 10.0);
        view.snap_threshold = 4.0;
        view.camera.zoom = 0.5;
        // 4 screen units are 8 world units at half zoom
        assert_eq!(view.snap_point(Point::new(3.0, 0.0), &targets), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_preview_slot() {
        let mut view = HeadlessView::new();
        view.draw_preview(&LineData::new(Point::ZERO, Point::new(1.0, 0.0)));
        assert!(view.preview().is_some());
        view.delete_preview();
        assert!(view.preview().is_none());
    }
}
