//! Collaborator contracts between a tool and the application hosting it.
//!
//! A tool never reaches for global singletons. The document, the graphic
//! view and the command surface are injected as trait implementations and
//! bundled in a [`ToolContext`] the tool owns while it is active.

mod headless;
mod recording;

pub use headless::HeadlessView;
pub use recording::{RecordingSurface, SurfaceEvent};

use crate::entity::{EntityId, LineEntity, Pen};
use crate::geometry::{AnchorMode, LineData};
use crate::snap::SnapTarget;
use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Container that accepts new entities and records them for undo.
pub trait EntityContainer {
    /// Layer new entities are placed on.
    fn active_layer(&self) -> &str;

    /// Pen new entities are drawn with.
    fn active_pen(&self) -> Pen;

    /// Insert an entity and return its id.
    fn add_entity(&mut self, entity: LineEntity) -> EntityId;

    /// Open an undo transaction.
    fn start_undo_cycle(&mut self);

    /// Register an entity created inside the open transaction.
    fn add_undoable(&mut self, id: EntityId);

    /// Close the open transaction.
    fn end_undo_cycle(&mut self);

    /// Points the view may snap to.
    fn snap_targets(&self) -> Vec<SnapTarget>;
}

/// Portion of the drawing that needs repainting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedrawMode {
    /// Entities changed.
    Drawing,
    /// The view transform changed.
    All,
}

/// Mouse cursor shapes a tool may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorStyle {
    #[default]
    Arrow,
    Cad,
}

/// The graphic view a tool draws into.
pub trait GraphicView {
    /// Resolve a screen position to a snapped world coordinate.
    fn snap_point(&mut self, screen: Point, targets: &[SnapTarget]) -> Point;

    /// Reference point for relative coordinate entry.
    fn relative_zero(&self) -> Point;

    fn move_relative_zero(&mut self, point: Point);

    fn redraw(&mut self, mode: RedrawMode);

    fn set_mouse_cursor(&mut self, cursor: CursorStyle);

    /// Show a transient preview segment, replacing any previous one.
    fn draw_preview(&mut self, line: &LineData);

    /// Discard the transient preview.
    fn delete_preview(&mut self);
}

/// Toolbars the host can switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolBar {
    Lines,
    Snap,
}

/// Current values shown in a tool's options panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineAngleOptions {
    /// Angle in degrees.
    pub angle_degrees: f64,
    pub length: f64,
    pub anchor: AnchorMode,
    /// The angle field is read-only.
    pub fixed_angle: bool,
}

/// Values changed in a tool's options panel; `None` leaves a value as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsEdit {
    pub angle_degrees: Option<f64>,
    pub length: Option<f64>,
    pub anchor: Option<AnchorMode>,
}

/// Request to show, hide or refresh a tool's options panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionsRequest {
    pub tool: ToolKind,
    pub show: bool,
    /// Refresh the values of an already visible panel.
    pub update: bool,
    pub options: LineAngleOptions,
}

/// Command line, status bar and tool chrome of the host.
pub trait CommandSurface {
    /// Print a message in the command history.
    fn command_message(&mut self, message: &str);

    fn request_options(&mut self, request: OptionsRequest);

    fn request_tool_bar(&mut self, tool_bar: ToolBar);

    /// Describe what the left and right mouse buttons do right now.
    fn update_mouse_hints(&mut self, left: &str, right: &str);
}

/// Injected collaborators of an active tool.
#[derive(Debug, Clone, Default)]
pub struct ToolContext<D, V, S> {
    pub document: D,
    pub view: V,
    pub surface: S,
}

impl<D, V, S> ToolContext<D, V, S>
where
    D: EntityContainer,
    V: GraphicView,
    S: CommandSurface,
{
    pub fn new(document: D, view: V, surface: S) -> Self {
        Self {
            document,
            view,
            surface,
        }
    }

    /// Snap a screen position against the document's snap targets.
    pub fn snap(&mut self, screen: Point) -> Point {
        let targets = self.document.snap_targets();
        self.view.snap_point(screen, &targets)
    }
}
