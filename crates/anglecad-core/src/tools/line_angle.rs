//! Place straight lines at a fixed or typed angle with a fixed length.
//!
//! Each confirmed position commits one line. The pivot can be the start,
//! middle or end of the new segment. Angle and length are changed by typing
//! `angle` / `length` followed by an expression, or through the options panel.

use super::commands::{Command, available_commands_message, parse_coordinate};
use super::{Action, ToolKind};
use crate::entity::LineEntity;
use crate::expr::{Evaluator, MathEvaluator};
use crate::geometry::{AnchorMode, LineData, line_from_anchor};
use crate::host::{
    CommandSurface, CursorStyle, EntityContainer, GraphicView, LineAngleOptions, OptionsEdit,
    OptionsRequest, RedrawMode, ToolBar, ToolContext,
};
use crate::input::MouseButton;
use kurbo::Point;

/// Message shown when typed input does not evaluate.
pub const MSG_INVALID_EXPRESSION: &str = "Not a valid expression";

/// Default segment length.
pub const DEFAULT_LENGTH: f64 = 1.0;

/// Input stage of the line-angle tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineAngleStatus {
    /// Waiting for a click or typed coordinate.
    #[default]
    AwaitingPosition,
    /// Waiting for an angle expression in degrees.
    AwaitingAngle,
    /// Waiting for a length expression.
    AwaitingLength,
}

/// Interactive tool drawing lines of a given angle and length.
///
/// The free-angle, horizontal and vertical variants differ only in their
/// initial angle and whether the angle may be changed.
pub struct LineAngleTool<D, V, S> {
    kind: ToolKind,
    status: LineAngleStatus,
    finished: bool,
    /// Angle in radians.
    angle: f64,
    length: f64,
    fixed_angle: bool,
    anchor: AnchorMode,
    /// Last snapped pivot.
    pos: Option<Point>,
    /// Line built from the pivot; absent until a position is known.
    data: Option<LineData>,
    evaluator: Box<dyn Evaluator>,
    ctx: ToolContext<D, V, S>,
}

impl<D, V, S> LineAngleTool<D, V, S>
where
    D: EntityContainer,
    V: GraphicView,
    S: CommandSurface,
{
    /// Create the tool variant for `kind`.
    pub fn new(kind: ToolKind, ctx: ToolContext<D, V, S>) -> Self {
        let (angle, fixed_angle) = kind.preset();
        Self::with_angle(ctx, angle, fixed_angle)
    }

    /// Create a tool with an explicit initial angle (radians).
    pub fn with_angle(ctx: ToolContext<D, V, S>, angle: f64, fixed_angle: bool) -> Self {
        Self {
            kind: ToolKind::from_preset(angle, fixed_angle),
            status: LineAngleStatus::AwaitingPosition,
            finished: false,
            angle,
            length: DEFAULT_LENGTH,
            fixed_angle,
            anchor: AnchorMode::Start,
            pos: None,
            data: None,
            evaluator: Box::new(MathEvaluator),
            ctx,
        }
    }

    /// Start with a segment length other than [`DEFAULT_LENGTH`].
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Start with another anchor mode.
    pub fn with_anchor(mut self, anchor: AnchorMode) -> Self {
        self.anchor = anchor;
        self
    }

    /// Replace the expression evaluator used for typed input.
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Switch to another variant, keeping length and anchor.
    pub fn reconfigure(&mut self, kind: ToolKind) {
        let (angle, fixed_angle) = kind.preset();
        self.kind = kind;
        self.angle = angle;
        self.fixed_angle = fixed_angle;
    }

    /// Current input stage.
    pub fn status(&self) -> LineAngleStatus {
        self.status
    }

    /// Angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Segment length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Which point of the segment sits on the pivot.
    pub fn anchor(&self) -> AnchorMode {
        self.anchor
    }

    /// Whether the angle is locked by the variant.
    pub fn fixed_angle(&self) -> bool {
        self.fixed_angle
    }

    /// Line built from the last known pivot.
    pub fn line_data(&self) -> Option<&LineData> {
        self.data.as_ref()
    }

    /// Set the angle in radians. Ignored for fixed-angle variants.
    pub fn set_angle(&mut self, angle: f64) {
        if self.fixed_angle {
            log::warn!("{}: angle is fixed, ignoring {angle}", self.kind);
            return;
        }
        if !angle.is_finite() {
            log::warn!("{}: ignoring angle {angle}", self.kind);
            return;
        }
        self.angle = angle;
    }

    /// Set the segment length. Non-finite values are ignored.
    pub fn set_length(&mut self, length: f64) {
        if !length.is_finite() {
            log::warn!("{}: ignoring length {length}", self.kind);
            return;
        }
        self.length = length;
    }

    /// Set which point of the segment sits on the pivot.
    pub fn set_anchor(&mut self, anchor: AnchorMode) {
        self.anchor = anchor;
    }

    /// Apply changes made in the options panel, echo the resulting values
    /// back to it and rebuild the preview.
    pub fn edit_options(&mut self, edit: OptionsEdit) {
        if self.finished {
            return;
        }
        if let Some(degrees) = edit.angle_degrees {
            self.set_angle(degrees.to_radians());
        }
        if let Some(length) = edit.length {
            self.set_length(length);
        }
        if let Some(anchor) = edit.anchor {
            self.set_anchor(anchor);
        }
        self.request_options(true, true);
        self.refresh_preview();
    }

    /// Values for the options panel.
    pub fn options(&self) -> LineAngleOptions {
        LineAngleOptions {
            angle_degrees: self.angle.to_degrees(),
            length: self.length,
            anchor: self.anchor,
            fixed_angle: self.fixed_angle,
        }
    }

    /// Injected collaborators.
    pub fn context(&self) -> &ToolContext<D, V, S> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ToolContext<D, V, S> {
        &mut self.ctx
    }

    /// Give the collaborators back to the host.
    pub fn into_context(self) -> ToolContext<D, V, S> {
        self.ctx
    }

    /// Forget the line built so far.
    fn reset(&mut self) {
        self.data = None;
    }

    fn set_status(&mut self, status: LineAngleStatus) {
        self.status = status;
        self.update_mouse_button_hints();
        self.update_mouse_cursor();
        self.update_tool_bar();
    }

    fn request_options(&mut self, show: bool, update: bool) {
        let request = OptionsRequest {
            tool: self.kind,
            show,
            update,
            options: self.options(),
        };
        self.ctx.surface.request_options(request);
    }

    /// Build the line for the current pivot.
    fn prepare_preview(&mut self) -> Option<LineData> {
        let pos = self.pos?;
        let data = line_from_anchor(pos, self.length, self.angle, self.anchor);
        self.data = Some(data);
        Some(data)
    }

    /// Redraw the preview at the last pivot while a position is awaited.
    fn refresh_preview(&mut self) {
        if self.status != LineAngleStatus::AwaitingPosition {
            return;
        }
        self.ctx.view.delete_preview();
        if let Some(data) = self.prepare_preview() {
            self.ctx.view.draw_preview(&data);
        }
    }

    /// Commit the line at the current pivot.
    fn trigger(&mut self) {
        self.ctx.view.delete_preview();
        let Some(data) = self.prepare_preview() else {
            log::warn!("{}: trigger without a position", self.kind);
            return;
        };

        let mut line = LineEntity::new(data);
        line.set_layer(self.ctx.document.active_layer());
        line.set_pen(self.ctx.document.active_pen());
        let id = self.ctx.document.add_entity(line);

        self.ctx.document.start_undo_cycle();
        self.ctx.document.add_undoable(id);
        self.ctx.document.end_undo_cycle();

        self.ctx.view.move_relative_zero(data.start);
        self.ctx.view.redraw(RedrawMode::Drawing);
        log::debug!(
            "line added: {id} ({}, {}) -> ({}, {})",
            data.start.x,
            data.start.y,
            data.end.x,
            data.end.y
        );
    }

    /// Evaluate typed text for the angle or length stage.
    fn value_entered(&mut self, text: &str) {
        match self.evaluator.eval(text) {
            Ok(value) => {
                match self.status {
                    LineAngleStatus::AwaitingAngle => self.angle = value.to_radians(),
                    LineAngleStatus::AwaitingLength => self.length = value,
                    LineAngleStatus::AwaitingPosition => return,
                }
                self.request_options(true, true);
                self.set_status(LineAngleStatus::AwaitingPosition);
            }
            Err(err) => {
                log::debug!("{}: rejected {text:?}: {err}", self.kind);
                self.ctx.surface.command_message(MSG_INVALID_EXPRESSION);
                self.update_mouse_button_hints();
            }
        }
    }

    fn position_command(&mut self, text: &str) {
        match Command::parse(text) {
            Some(Command::Angle) if !self.fixed_angle => {
                self.ctx.view.delete_preview();
                self.set_status(LineAngleStatus::AwaitingAngle);
            }
            Some(Command::Length) => {
                self.ctx.view.delete_preview();
                self.set_status(LineAngleStatus::AwaitingLength);
            }
            _ => {
                let relative_zero = self.ctx.view.relative_zero();
                match parse_coordinate(text, relative_zero, self.evaluator.as_ref()) {
                    Some(Ok(point)) => self.coordinate_event(point),
                    Some(Err(err)) => {
                        log::debug!("{}: bad coordinate {text:?}: {err}", self.kind);
                        self.ctx.surface.command_message(MSG_INVALID_EXPRESSION);
                        self.update_mouse_button_hints();
                    }
                    None => {
                        let message = format!("Unknown command: {}", text.trim());
                        self.ctx.surface.command_message(&message);
                        self.update_mouse_button_hints();
                    }
                }
            }
        }
    }
}

impl<D, V, S> Action for LineAngleTool<D, V, S>
where
    D: EntityContainer,
    V: GraphicView,
    S: CommandSurface,
{
    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn init(&mut self) {
        self.finished = false;
        self.ctx.view.delete_preview();
        self.reset();
        self.set_status(LineAngleStatus::AwaitingPosition);
    }

    fn finish(&mut self) {
        self.ctx.view.delete_preview();
        self.reset();
        self.finished = true;
        self.ctx.view.set_mouse_cursor(CursorStyle::Arrow);
        self.ctx.surface.update_mouse_hints("", "");
        self.hide_options();
        self.update_tool_bar();
        log::debug!("{}: finished", self.kind);
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn mouse_move(&mut self, screen: Point) {
        if self.finished || self.status != LineAngleStatus::AwaitingPosition {
            return;
        }
        self.pos = Some(self.ctx.snap(screen));
        self.refresh_preview();
    }

    fn mouse_release(&mut self, screen: Point, button: MouseButton) {
        if self.finished {
            return;
        }
        match button {
            MouseButton::Left => {
                if self.status == LineAngleStatus::AwaitingPosition {
                    let point = self.ctx.snap(screen);
                    self.coordinate_event(point);
                }
            }
            MouseButton::Right => {
                self.ctx.view.delete_preview();
                match self.status {
                    LineAngleStatus::AwaitingPosition => self.finish(),
                    // Length goes straight back too: fixed-angle variants have no angle stage
                    LineAngleStatus::AwaitingAngle | LineAngleStatus::AwaitingLength => {
                        self.reset();
                        self.set_status(LineAngleStatus::AwaitingPosition);
                    }
                }
            }
            MouseButton::Middle => {}
        }
    }

    fn command(&mut self, text: &str) {
        if self.finished {
            return;
        }
        if Command::parse(text) == Some(Command::Help) {
            let message = available_commands_message(&self.available_commands());
            self.ctx.surface.command_message(&message);
            self.update_mouse_button_hints();
            return;
        }

        match self.status {
            LineAngleStatus::AwaitingPosition => self.position_command(text),
            LineAngleStatus::AwaitingAngle | LineAngleStatus::AwaitingLength => {
                self.value_entered(text)
            }
        }
    }

    fn coordinate_event(&mut self, point: Point) {
        if self.finished || self.status != LineAngleStatus::AwaitingPosition {
            return;
        }
        self.pos = Some(point);
        self.trigger();
    }

    fn available_commands(&self) -> Vec<Command> {
        match self.status {
            LineAngleStatus::AwaitingPosition if self.fixed_angle => vec![Command::Length],
            LineAngleStatus::AwaitingPosition => vec![Command::Angle, Command::Length],
            _ => Vec::new(),
        }
    }

    fn update_mouse_button_hints(&mut self) {
        let (left, right) = match self.status {
            LineAngleStatus::AwaitingPosition => ("Specify position", "Cancel"),
            LineAngleStatus::AwaitingAngle => ("Enter angle:", "Back"),
            LineAngleStatus::AwaitingLength => ("Enter length:", "Back"),
        };
        self.ctx.surface.update_mouse_hints(left, right);
    }

    fn update_mouse_cursor(&mut self) {
        self.ctx.view.set_mouse_cursor(CursorStyle::Cad);
    }

    fn update_tool_bar(&mut self) {
        let bar = if self.finished { ToolBar::Lines } else { ToolBar::Snap };
        self.ctx.surface.request_tool_bar(bar);
    }

    fn show_options(&mut self) {
        self.request_options(true, false);
    }

    fn hide_options(&mut self) {
        self.request_options(false, false);
    }
}
