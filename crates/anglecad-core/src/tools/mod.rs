//! Tool system: the action contract and the line tools built on it.

pub mod commands;
mod line_angle;
mod manager;

pub use commands::{Command, available_commands_message, parse_coordinate};
pub use line_angle::{LineAngleStatus, LineAngleTool};
pub use manager::ToolManager;

use crate::input::{MouseButton, PointerEvent};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Lines at a user-specified angle.
    #[default]
    #[serde(alias = "lineangle")]
    Angle,
    /// Lines fixed at 0°.
    Horizontal,
    /// Lines fixed at 90°.
    Vertical,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Angle, ToolKind::Horizontal, ToolKind::Vertical];

    /// Initial angle in radians and whether the user may change it.
    pub fn preset(self) -> (f64, bool) {
        match self {
            ToolKind::Angle => (0.0, false),
            ToolKind::Horizontal => (0.0, true),
            ToolKind::Vertical => (FRAC_PI_2, true),
        }
    }

    /// Tool kind whose preset matches a configuration, if any.
    pub fn from_preset(angle: f64, fixed_angle: bool) -> Self {
        if !fixed_angle {
            return ToolKind::Angle;
        }
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.preset() == (angle, true))
            .unwrap_or(ToolKind::Angle)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Angle => "angle",
            ToolKind::Horizontal => "horizontal",
            ToolKind::Vertical => "vertical",
        }
    }

    /// One-line description for status bars and help output.
    pub fn description(self) -> &'static str {
        match self {
            ToolKind::Angle => "Draw lines with a given angle",
            ToolKind::Horizontal => "Draw horizontal lines",
            ToolKind::Vertical => "Draw vertical lines",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a tool name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0} (expected angle, horizontal or vertical)")]
pub struct UnknownTool(pub String);

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "angle" | "lineangle" | "a" => Ok(ToolKind::Angle),
            "horizontal" | "hor" | "h" => Ok(ToolKind::Horizontal),
            "vertical" | "ver" | "v" => Ok(ToolKind::Vertical),
            _ => Err(UnknownTool(s.to_string())),
        }
    }
}

/// Contract between an interactive tool and its host.
///
/// Hosts forward raw pointer events in screen coordinates and command-line
/// text; the tool talks back through its injected collaborators.
pub trait Action {
    fn kind(&self) -> ToolKind;

    /// (Re)start the tool at its first input stage.
    fn init(&mut self);

    /// Stop the tool; the host should deactivate it.
    fn finish(&mut self);

    fn is_finished(&self) -> bool;

    fn mouse_move(&mut self, screen: Point);

    fn mouse_release(&mut self, screen: Point, button: MouseButton);

    /// Route a pointer event to the matching handler.
    fn handle_pointer(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Move { position } => self.mouse_move(position),
            PointerEvent::Up { position, button } => self.mouse_release(position, button),
            PointerEvent::Down { .. } => {}
        }
    }

    /// Text typed into the command line.
    fn command(&mut self, text: &str);

    /// A world coordinate entered without the mouse.
    fn coordinate_event(&mut self, point: Point);

    /// Commands valid in the current stage.
    fn available_commands(&self) -> Vec<Command>;

    fn update_mouse_button_hints(&mut self);

    fn update_mouse_cursor(&mut self);

    fn update_tool_bar(&mut self);

    fn show_options(&mut self);

    fn hide_options(&mut self);
}
