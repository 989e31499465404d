//! Activation and switching of the line tools.

use super::{Action, LineAngleTool, ToolKind};
use crate::host::{CommandSurface, EntityContainer, GraphicView, OptionsEdit, ToolContext};
use crate::input::PointerEvent;

/// Owns the active tool and routes host input to it.
pub struct ToolManager<D, V, S> {
    tool: LineAngleTool<D, V, S>,
    active: bool,
}

impl<D, V, S> ToolManager<D, V, S>
where
    D: EntityContainer,
    V: GraphicView,
    S: CommandSurface,
{
    /// Wrap an already configured tool and activate it.
    pub fn new(tool: LineAngleTool<D, V, S>) -> Self {
        let mut manager = Self { tool, active: false };
        manager.activate();
        manager
    }

    /// Create and activate the tool variant for `kind`.
    pub fn with_kind(kind: ToolKind, ctx: ToolContext<D, V, S>) -> Self {
        Self::new(LineAngleTool::new(kind, ctx))
    }

    fn activate(&mut self) {
        self.tool.init();
        self.tool.show_options();
        self.active = true;
        let kind = self.tool.kind();
        log::info!("activated tool: {kind} ({})", kind.description());
    }

    /// Currently active tool, `None` once the user has left it.
    pub fn current_tool(&self) -> Option<ToolKind> {
        self.active.then(|| self.tool.kind())
    }

    /// Switch to another tool variant.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.active {
            self.tool.hide_options();
        }
        self.tool.reconfigure(kind);
        self.activate();
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        if !self.active {
            log::debug!("no active tool, dropping {event:?}");
            return;
        }
        self.tool.handle_pointer(event);
        self.sync_active();
    }

    pub fn command(&mut self, text: &str) {
        if !self.active {
            log::debug!("no active tool, dropping command {text:?}");
            return;
        }
        self.tool.command(text);
        self.sync_active();
    }

    /// Forward an options-panel edit to the active tool.
    pub fn edit_options(&mut self, edit: OptionsEdit) {
        if !self.active {
            log::debug!("no active tool, dropping options edit {edit:?}");
            return;
        }
        self.tool.edit_options(edit);
    }

    fn sync_active(&mut self) {
        if self.tool.is_finished() {
            self.active = false;
            log::info!("deactivated tool: {}", self.tool.kind());
        }
    }

    pub fn tool(&self) -> &LineAngleTool<D, V, S> {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut LineAngleTool<D, V, S> {
        &mut self.tool
    }

    pub fn context(&self) -> &ToolContext<D, V, S> {
        self.tool.context()
    }

    pub fn context_mut(&mut self) -> &mut ToolContext<D, V, S> {
        self.tool.context_mut()
    }

    pub fn into_context(self) -> ToolContext<D, V, S> {
        self.tool.into_context()
    }
}
