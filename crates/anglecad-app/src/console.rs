//! Command surface that prints to a terminal stream.

use anglecad_core::host::{CommandSurface, OptionsRequest, ToolBar};
use std::io::Write;

/// Writes command messages and prompts to `out`; options and toolbar
/// requests only go to the log since a terminal has no panels.
pub struct ConsoleSurface<W: Write> {
    out: W,
    prompt: Option<String>,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, prompt: None }
    }

    /// Current left-button prompt.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            log::warn!("failed to write to console: {err}");
        }
    }
}

impl<W: Write> CommandSurface for ConsoleSurface<W> {
    fn command_message(&mut self, message: &str) {
        self.write_line(message);
        // The prompt scrolled away; show it again on the next hint update
        self.prompt = None;
    }

    fn request_options(&mut self, request: OptionsRequest) {
        log::debug!(
            "options {} for {}: angle={}° length={} anchor={}",
            if request.show { "shown" } else { "hidden" },
            request.tool,
            request.options.angle_degrees,
            request.options.length,
            request.options.anchor.name()
        );
    }

    fn request_tool_bar(&mut self, tool_bar: ToolBar) {
        log::debug!("toolbar: {tool_bar:?}");
    }

    fn update_mouse_hints(&mut self, left: &str, right: &str) {
        if left.is_empty() {
            self.prompt = None;
            return;
        }
        if self.prompt.as_deref() == Some(left) {
            return;
        }
        self.prompt = Some(left.to_string());
        self.write_line(&format!("{left} [right click: {right}]"));
    }
}
