//! Snap functionality for aligning pointer positions to the grid and entities.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid spacing in drawing units.
pub const GRID_SIZE: f64 = 10.0;

/// Default distance threshold for entity snapping (in world units).
pub const ENTITY_SNAP_THRESHOLD: f64 = 5.0;

/// Which snap sources are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    /// Free positioning.
    #[default]
    None,
    /// Grid nodes only.
    Grid,
    /// Snap to endpoints and midpoints of existing entities.
    Endpoints,
    /// Entities first, grid otherwise.
    All,
}

impl SnapMode {
    /// Snap mode the toolbar toggle switches to.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Endpoints,
            SnapMode::Endpoints => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    /// Parse a mode name as typed on the command line.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Some(SnapMode::None),
            "grid" => Some(SnapMode::Grid),
            "endpoints" | "ends" => Some(SnapMode::Endpoints),
            "all" | "on" => Some(SnapMode::All),
            _ => None,
        }
    }

    /// Whether grid nodes capture points.
    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    /// Whether entity targets capture points.
    pub fn snaps_to_entities(self) -> bool {
        matches!(self, SnapMode::Endpoints | SnapMode::All)
    }

    /// Whether snapping is on at all.
    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Outcome of snapping one point.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// Point after snapping.
    pub point: Point,
    /// Kind of target that captured the point, if any.
    pub target: Option<SnapTargetKind>,
    /// Whether the grid captured the point.
    pub on_grid: bool,
}

impl SnapResult {
    /// Unsnapped result at `point`.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            target: None,
            on_grid: false,
        }
    }

    /// Whether the point moved onto a grid node or target.
    pub fn is_snapped(&self) -> bool {
        self.target.is_some() || self.on_grid
    }
}

/// A point on an entity that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// Location in world coordinates.
    pub point: Point,
    /// Target kind.
    pub kind: SnapTargetKind,
}

/// Kind of entity snap target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTargetKind {
    Endpoint,
    Midpoint,
}

/// Both endpoints and the midpoint of a segment.
pub fn snap_targets_from_line(start: Point, end: Point) -> [SnapTarget; 3] {
    [
        SnapTarget { point: start, kind: SnapTargetKind::Endpoint },
        SnapTarget { point: end, kind: SnapTargetKind::Endpoint },
        SnapTarget { point: start.midpoint(end), kind: SnapTargetKind::Midpoint },
    ]
}

/// Round a point to the nearest grid node.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    SnapResult {
        point: Point::new(
            (point.x / grid_size).round() * grid_size,
            (point.y / grid_size).round() * grid_size,
        ),
        target: None,
        on_grid: true,
    }
}

/// Snap a point to the nearest entity snap target within `threshold`.
pub fn snap_to_targets(point: Point, targets: &[SnapTarget], threshold: f64) -> SnapResult {
    let mut best: Option<&SnapTarget> = None;
    let mut best_dist_sq = threshold * threshold;

    for target in targets {
        let dist_sq = (point - target.point).hypot2();
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(target);
        }
    }

    match best {
        Some(target) => SnapResult {
            point: target.point,
            target: Some(target.kind),
            on_grid: false,
        },
        None => SnapResult::none(point),
    }
}

/// Snap a point based on the current snap mode.
pub fn snap_point(
    point: Point,
    mode: SnapMode,
    grid_size: f64,
    targets: &[SnapTarget],
    threshold: f64,
) -> SnapResult {
    let mut result = SnapResult::none(point);
    if mode.snaps_to_entities() {
        result = snap_to_targets(point, targets, threshold);
    }
    if !result.is_snapped() && mode.snaps_to_grid() {
        result = snap_to_grid(point, grid_size);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(12.0, 27.0), 5.0);
        assert_eq!(result.point, Point::new(10.0, 25.0));
        assert!(result.on_grid);
    }

    #[test]
    fn test_snap_to_grid_rounds_half_up() {
        let result = snap_to_grid(Point::new(15.0, -4.9), 10.0);
        assert_eq!(result.point, Point::new(20.0, 0.0));
    }

    #[test]
    fn test_snap_to_grid_ignores_invalid_size() {
        let result = snap_to_grid(Point::new(3.0, 4.0), 0.0);
        assert_eq!(result.point, Point::new(3.0, 4.0));
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_mode_cycle() {
        assert_eq!(SnapMode::None.next(), SnapMode::Grid);
        assert_eq!(SnapMode::Grid.next(), SnapMode::Endpoints);
        assert_eq!(SnapMode::Endpoints.next(), SnapMode::All);
        assert_eq!(SnapMode::All.next(), SnapMode::None);
    }

    #[test]
    fn test_snap_mode_names() {
        assert_eq!(SnapMode::parse("Grid"), Some(SnapMode::Grid));
        assert_eq!(SnapMode::parse("off"), Some(SnapMode::None));
        assert_eq!(SnapMode::parse("ends"), Some(SnapMode::Endpoints));
        assert_eq!(SnapMode::parse("tangent"), None);
    }

    #[test]
    fn test_snap_mode_flags() {
        assert!(!SnapMode::None.is_enabled());
        assert!(SnapMode::Grid.snaps_to_grid());
        assert!(!SnapMode::Endpoints.snaps_to_grid());
        assert!(SnapMode::Endpoints.snaps_to_entities());
        assert!(SnapMode::All.snaps_to_grid() && SnapMode::All.snaps_to_entities());
    }

    #[test]
    fn test_snap_to_nearest_target() {
        let targets = snap_targets_from_line(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let result = snap_to_targets(Point::new(5.5, 1.0), &targets, 3.0);
        assert_eq!(result.point, Point::new(5.0, 0.0));
        assert_eq!(result.target, Some(SnapTargetKind::Midpoint));
    }

    #[test]
    fn test_target_out_of_range_is_free() {
        let targets = snap_targets_from_line(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let result = snap_to_targets(Point::new(50.0, 50.0), &targets, 3.0);
        assert!(!result.is_snapped());
        assert_eq!(result.point, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_all_prefers_entities_over_grid() {
        let targets = snap_targets_from_line(Point::new(1.0, 1.0), Point::new(31.0, 1.0));
        let near_endpoint = snap_point(Point::new(2.0, 2.0), SnapMode::All, 10.0, &targets, 3.0);
        assert_eq!(near_endpoint.point, Point::new(1.0, 1.0));

        let far = snap_point(Point::new(48.0, 52.0), SnapMode::All, 10.0, &targets, 3.0);
        assert_eq!(far.point, Point::new(50.0, 50.0));
        assert!(far.on_grid);
    }
}
