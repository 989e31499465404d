//! Command surface that records every request it receives.

use super::{CommandSurface, OptionsRequest, ToolBar};

/// One interaction with the command surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Message(String),
    Options(OptionsRequest),
    ToolBar(ToolBar),
    Hints { left: String, right: String },
}

/// In-memory command surface.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Drain recorded events, oldest first.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Command-history messages in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            SurfaceEvent::Message(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Most recent mouse hints.
    pub fn current_hints(&self) -> Option<(&str, &str)> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::Hints { left, right } => Some((left.as_str(), right.as_str())),
            _ => None,
        })
    }

    pub fn last_tool_bar(&self) -> Option<ToolBar> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::ToolBar(bar) => Some(*bar),
            _ => None,
        })
    }

    pub fn last_options(&self) -> Option<&OptionsRequest> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::Options(request) => Some(request),
            _ => None,
        })
    }
}

impl CommandSurface for RecordingSurface {
    fn command_message(&mut self, message: &str) {
        self.events.push(SurfaceEvent::Message(message.to_string()));
    }

    fn request_options(&mut self, request: OptionsRequest) {
        self.events.push(SurfaceEvent::Options(request));
    }

    fn request_tool_bar(&mut self, tool_bar: ToolBar) {
        self.events.push(SurfaceEvent::ToolBar(tool_bar));
    }

    fn update_mouse_hints(&mut self, left: &str, right: &str) {
        self.events.push(SurfaceEvent::Hints {
            left: left.to_string(),
            right: right.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new();
        surface.update_mouse_hints("Specify position", "Cancel");
        surface.command_message("hello");
        surface.request_tool_bar(ToolBar::Snap);
        surface.update_mouse_hints("Enter angle:", "Back");

        assert_eq!(surface.events().len(), 4);
        assert_eq!(surface.messages().collect::<Vec<_>>(), vec!["hello"]);
        assert_eq!(surface.current_hints(), Some(("Enter angle:", "Back")));
        assert_eq!(surface.last_tool_bar(), Some(ToolBar::Snap));

        let drained = surface.take_events();
        assert_eq!(drained.len(), 4);
        assert!(surface.events().is_empty());
    }
}
