//! Replays input events against a tool session.

use crate::console::ConsoleSurface;
use anglecad_core::host::{GraphicView, LineAngleOptions, RedrawMode};
use anglecad_core::{
    AnchorMode, Camera, Document, HeadlessView, LineAngleTool, MouseButton, OptionsEdit,
    PointerEvent, SnapMode, ToolContext, ToolKind, ToolManager, ToolSettings,
};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Screen margin kept around the drawing by [`SessionEvent::Fit`].
pub const FIT_MARGIN: f64 = 10.0;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Bad input line {line:?}: {reason}")]
    Line { line: String, reason: String },
}

/// One host input, as found in a script file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionEvent {
    /// Pointer moved to screen coordinates.
    Move { x: f64, y: f64 },
    /// Button pressed and released at screen coordinates.
    Click {
        x: f64,
        y: f64,
        #[serde(default = "default_button")]
        button: MouseButton,
    },
    /// Text typed on the command line.
    Command { text: String },
    /// Switch tools.
    Tool { kind: ToolKind },
    /// Options-panel edit; angle in degrees.
    #[serde(rename = "option")]
    Options {
        #[serde(default)]
        angle: Option<f64>,
        #[serde(default)]
        length: Option<f64>,
        #[serde(default)]
        anchor: Option<AnchorMode>,
    },
    /// Pan the view by a screen-space delta.
    Pan { dx: f64, dy: f64 },
    /// Zoom in (`steps > 0`) or out around a screen point.
    Zoom { x: f64, y: f64, steps: i32 },
    /// Fit the drawing into a viewport of the given size.
    Fit { width: f64, height: f64 },
    /// Set the snap mode, or cycle to the next one when absent.
    Snap {
        #[serde(default)]
        mode: Option<SnapMode>,
    },
    Undo,
    Redo,
}

fn default_button() -> MouseButton {
    MouseButton::Left
}

/// Read a JSON array of events.
pub fn load_script(path: &Path) -> Result<Vec<SessionEvent>, SessionError> {
    let json = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| SessionError::Script {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse one interactive line. Blank lines yield `None`; anything that is
/// not a session keyword is passed to the tool as command text.
pub fn parse_line(line: &str) -> Result<Option<SessionEvent>, SessionError> {
    let trimmed = line.trim();
    let mut words = trimmed.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let bad = |reason: &str| SessionError::Line {
        line: trimmed.to_string(),
        reason: reason.to_string(),
    };
    let number = |text: &str| {
        text.parse::<f64>()
            .map_err(|_| bad(&format!("{text} is not a number")))
    };

    let event = match head.to_ascii_lowercase().as_str() {
        "move" | "click" => {
            let [x, y, extra @ ..] = rest.as_slice() else {
                return Err(bad("expected x and y"));
            };
            let (x, y) = (number(x)?, number(y)?);
            if head.eq_ignore_ascii_case("move") {
                SessionEvent::Move { x, y }
            } else {
                let button = match extra {
                    [] => MouseButton::Left,
                    [name] => parse_button(name).ok_or_else(|| bad("unknown button"))?,
                    _ => return Err(bad("too many arguments")),
                };
                SessionEvent::Click { x, y, button }
            }
        }
        "tool" => {
            let [name] = rest.as_slice() else {
                return Err(bad("expected a tool name"));
            };
            let kind = name.parse().map_err(|err: anglecad_core::tools::UnknownTool| {
                bad(&err.to_string())
            })?;
            SessionEvent::Tool { kind }
        }
        "option" => {
            let [field, value] = rest.as_slice() else {
                return Err(bad("expected: option <angle|length|anchor> <value>"));
            };
            let (mut angle, mut length, mut anchor) = (None, None, None);
            match field.to_ascii_lowercase().as_str() {
                "angle" => angle = Some(number(value)?),
                "length" => length = Some(number(value)?),
                "anchor" => {
                    anchor = Some(AnchorMode::parse(value).ok_or_else(|| bad("unknown anchor"))?)
                }
                _ => return Err(bad("unknown option")),
            }
            SessionEvent::Options {
                angle,
                length,
                anchor,
            }
        }
        "pan" => {
            let [dx, dy] = rest.as_slice() else {
                return Err(bad("expected dx and dy"));
            };
            SessionEvent::Pan {
                dx: number(dx)?,
                dy: number(dy)?,
            }
        }
        "zoom" => {
            let [x, y, steps] = rest.as_slice() else {
                return Err(bad("expected x, y and steps"));
            };
            let steps = steps
                .parse::<i32>()
                .map_err(|_| bad("steps is not an integer"))?;
            SessionEvent::Zoom {
                x: number(x)?,
                y: number(y)?,
                steps,
            }
        }
        "fit" => {
            let [width, height] = rest.as_slice() else {
                return Err(bad("expected viewport width and height"));
            };
            SessionEvent::Fit {
                width: number(width)?,
                height: number(height)?,
            }
        }
        "snap" => match rest.as_slice() {
            [] => SessionEvent::Snap { mode: None },
            [name] => SessionEvent::Snap {
                mode: Some(SnapMode::parse(name).ok_or_else(|| bad("unknown snap mode"))?),
            },
            _ => return Err(bad("too many arguments")),
        },
        "undo" if rest.is_empty() => SessionEvent::Undo,
        "redo" if rest.is_empty() => SessionEvent::Redo,
        _ => SessionEvent::Command {
            text: trimmed.to_string(),
        },
    };
    Ok(Some(event))
}

fn parse_button(name: &str) -> Option<MouseButton> {
    match name.to_ascii_lowercase().as_str() {
        "left" | "l" => Some(MouseButton::Left),
        "right" | "r" => Some(MouseButton::Right),
        "middle" | "m" => Some(MouseButton::Middle),
        _ => None,
    }
}

/// A document, a view and a console wired to the tool manager.
pub struct Session<W: Write> {
    manager: ToolManager<Document, HeadlessView, ConsoleSurface<W>>,
}

impl<W: Write> Session<W> {
    pub fn new(kind: ToolKind, settings: &ToolSettings, out: W) -> Self {
        let mut document = Document::new();
        document.set_active_layer(settings.layer.clone());
        document.set_active_pen(settings.pen);

        let mut view = HeadlessView::new().with_snap(settings.snap_mode, settings.grid_size);
        view.snap_threshold = settings.snap_threshold;

        let ctx = ToolContext::new(document, view, ConsoleSurface::new(out));
        let tool = LineAngleTool::new(kind, ctx)
            .with_length(settings.default_length)
            .with_anchor(settings.anchor);
        Self {
            manager: ToolManager::new(tool),
        }
    }

    pub fn apply(&mut self, event: &SessionEvent) {
        log::debug!("session event: {event:?}");
        match event {
            SessionEvent::Move { x, y } => {
                self.manager.handle_pointer(&PointerEvent::Move {
                    position: Point::new(*x, *y),
                });
            }
            SessionEvent::Click { x, y, button } => {
                for pointer in PointerEvent::click(Point::new(*x, *y), *button) {
                    self.manager.handle_pointer(&pointer);
                }
            }
            SessionEvent::Command { text } => self.manager.command(text),
            SessionEvent::Tool { kind } => self.manager.set_tool(*kind),
            SessionEvent::Options {
                angle,
                length,
                anchor,
            } => self.manager.edit_options(OptionsEdit {
                angle_degrees: *angle,
                length: *length,
                anchor: *anchor,
            }),
            SessionEvent::Pan { dx, dy } => {
                self.view_changed(|camera, _| camera.pan(Vec2::new(*dx, *dy)));
            }
            SessionEvent::Zoom { x, y, steps } => {
                self.view_changed(|camera, _| camera.zoom_steps(Point::new(*x, *y), *steps));
            }
            SessionEvent::Fit { width, height } => {
                let viewport = Size::new(*width, *height);
                self.view_changed(|camera, document| match document.bounds() {
                    Some(bounds) => camera.fit_to_bounds(bounds, viewport, FIT_MARGIN),
                    None => camera.reset(),
                });
            }
            SessionEvent::Snap { mode } => {
                let view = &mut self.manager.context_mut().view;
                view.snap_mode = mode.unwrap_or(view.snap_mode.next());
                log::info!("snap mode: {:?}", view.snap_mode);
            }
            SessionEvent::Undo => self.history(Document::undo, "undo"),
            SessionEvent::Redo => self.history(Document::redo, "redo"),
        }
    }

    fn view_changed(&mut self, change: impl FnOnce(&mut Camera, &Document)) {
        let ctx = self.manager.context_mut();
        change(&mut ctx.view.camera, &ctx.document);
        ctx.view.redraw(RedrawMode::All);
    }

    fn history(&mut self, step: fn(&mut Document) -> bool, name: &str) {
        let ctx = self.manager.context_mut();
        if step(&mut ctx.document) {
            ctx.view.redraw(RedrawMode::Drawing);
        } else {
            log::info!("nothing to {name}");
        }
    }

    pub fn current_tool(&self) -> Option<ToolKind> {
        self.manager.current_tool()
    }

    /// Values the options panel would show.
    pub fn tool_options(&self) -> LineAngleOptions {
        self.manager.tool().options()
    }

    pub fn view(&self) -> &HeadlessView {
        &self.manager.context().view
    }

    pub fn console(&self) -> &ConsoleSurface<W> {
        &self.manager.context().surface
    }

    pub fn document(&self) -> &Document {
        &self.manager.context().document
    }

    pub fn into_document(self) -> Document {
        self.manager.into_context().document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(kind: ToolKind) -> Session<Vec<u8>> {
        Session::new(kind, &ToolSettings::default(), Vec::new())
    }

    fn run(session: &mut Session<Vec<u8>>, lines: &[&str]) {
        for line in lines {
            if let Some(event) = parse_line(line).unwrap() {
                session.apply(&event);
            }
        }
    }

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got {actual:?}"
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(
            parse_line("move 1 2").unwrap(),
            Some(SessionEvent::Move { x: 1.0, y: 2.0 })
        );
        assert_eq!(
            parse_line("click 3 4 right").unwrap(),
            Some(SessionEvent::Click {
                x: 3.0,
                y: 4.0,
                button: MouseButton::Right
            })
        );
        assert_eq!(
            parse_line("tool v").unwrap(),
            Some(SessionEvent::Tool {
                kind: ToolKind::Vertical
            })
        );
        assert_eq!(parse_line("undo").unwrap(), Some(SessionEvent::Undo));
    }

    #[test]
    fn test_parse_passes_other_text_to_the_tool() {
        assert_eq!(
            parse_line(" 10, 10 ").unwrap(),
            Some(SessionEvent::Command {
                text: "10, 10".to_string()
            })
        );
        assert_eq!(
            parse_line("angle").unwrap(),
            Some(SessionEvent::Command {
                text: "angle".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed_pointer_lines() {
        assert!(parse_line("click 1").is_err());
        assert!(parse_line("move a b").is_err());
        assert!(parse_line("click 1 2 side").is_err());
        assert!(parse_line("tool circle").is_err());
    }

    #[test]
    fn test_parse_view_and_option_lines() {
        assert_eq!(
            parse_line("option anchor middle").unwrap(),
            Some(SessionEvent::Options {
                angle: None,
                length: None,
                anchor: Some(AnchorMode::Middle)
            })
        );
        assert_eq!(
            parse_line("option length 2.5").unwrap(),
            Some(SessionEvent::Options {
                angle: None,
                length: Some(2.5),
                anchor: None
            })
        );
        assert_eq!(
            parse_line("zoom 10 20 -2").unwrap(),
            Some(SessionEvent::Zoom {
                x: 10.0,
                y: 20.0,
                steps: -2
            })
        );
        assert_eq!(parse_line("snap").unwrap(), Some(SessionEvent::Snap { mode: None }));
        assert_eq!(
            parse_line("snap grid").unwrap(),
            Some(SessionEvent::Snap {
                mode: Some(SnapMode::Grid)
            })
        );

        assert!(parse_line("option anchor top").is_err());
        assert!(parse_line("option colour red").is_err());
        assert!(parse_line("option length").is_err());
        assert!(parse_line("zoom 1 1 1.5").is_err());
        assert!(parse_line("fit 100").is_err());
        assert!(parse_line("snap sideways").is_err());
    }

    #[test]
    fn test_script_events_deserialize() {
        let json = r#"[
            {"type": "move", "x": 1, "y": 2},
            {"type": "click", "x": 1, "y": 2},
            {"type": "click", "x": 0, "y": 0, "button": "right"},
            {"type": "command", "text": "45"},
            {"type": "tool", "kind": "horizontal"},
            {"type": "option", "anchor": "end", "length": 3},
            {"type": "pan", "dx": 5, "dy": -5},
            {"type": "fit", "width": 640, "height": 480},
            {"type": "snap"},
            {"type": "undo"}
        ]"#;
        let events: Vec<SessionEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 10);
        assert_eq!(
            events[5],
            SessionEvent::Options {
                angle: None,
                length: Some(3.0),
                anchor: Some(AnchorMode::End)
            }
        );
        assert_eq!(events[8], SessionEvent::Snap { mode: None });
        assert_eq!(
            events[1],
            SessionEvent::Click {
                x: 1.0,
                y: 2.0,
                button: MouseButton::Left
            }
        );
    }

    #[test]
    fn test_load_script_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"[{"type": "redo"}]"#).unwrap();
        assert_eq!(load_script(&path).unwrap(), vec![SessionEvent::Redo]);

        std::fs::write(&path, "[{\"type\": \"jump\"}]").unwrap();
        assert!(matches!(load_script(&path), Err(SessionError::Script { .. })));
    }

    #[test]
    fn test_typed_session_draws_angled_line() {
        let mut session = session(ToolKind::Angle);
        run(&mut session, &["angle", "45", "length", "2", "3,4"]);

        let line = session.document().last().unwrap().data;
        let half = 2.0_f64.sqrt();
        assert_point(line.start, 3.0, 4.0);
        assert_point(line.end, 3.0 + half, 4.0 + half);
    }

    #[test]
    fn test_settings_apply_to_new_tool() {
        let settings = ToolSettings {
            default_length: 4.0,
            anchor: AnchorMode::Middle,
            layer: "walls".to_string(),
            ..ToolSettings::default()
        };
        let mut session = Session::new(ToolKind::Horizontal, &settings, Vec::new());
        run(&mut session, &["click 10 0"]);

        let entity = session.document().last().unwrap();
        assert_eq!(entity.layer, "walls");
        assert_point(entity.data.start, 8.0, 0.0);
        assert_point(entity.data.end, 12.0, 0.0);
    }

    #[test]
    fn test_undo_and_redo_between_lines() {
        let mut session = session(ToolKind::Vertical);
        run(&mut session, &["click 0 0", "click 5 0"]);
        assert_eq!(session.document().len(), 2);

        run(&mut session, &["undo"]);
        assert_eq!(session.document().len(), 1);
        run(&mut session, &["redo"]);
        assert_eq!(session.document().len(), 2);

        run(&mut session, &["undo", "undo", "undo"]);
        assert!(session.document().is_empty());
    }

    #[test]
    fn test_tool_switch_after_cancel() {
        let mut session = session(ToolKind::Angle);
        run(&mut session, &["click 0 0 right"]);
        assert_eq!(session.current_tool(), None);

        run(&mut session, &["tool horizontal", "click 1 1"]);
        assert_eq!(session.current_tool(), Some(ToolKind::Horizontal));
        let document = session.into_document();
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_option_lines_change_the_next_line() {
        let mut session = session(ToolKind::Horizontal);
        run(&mut session, &["option anchor middle", "option length 4", "option angle 30"]);

        let options = session.tool_options();
        assert_eq!(options.anchor, AnchorMode::Middle);
        assert_eq!(options.length, 4.0);
        assert_eq!(options.angle_degrees, 0.0);

        run(&mut session, &["click 10 0"]);
        let line = session.document().last().unwrap().data;
        assert_point(line.start, 8.0, 0.0);
        assert_point(line.end, 12.0, 0.0);
    }

    #[test]
    fn test_option_angle_on_angle_tool() {
        let mut session = session(ToolKind::Angle);
        run(&mut session, &["option angle 90", "option length 2", "click 1 1"]);

        let line = session.document().last().unwrap().data;
        assert_point(line.start, 1.0, 1.0);
        assert_point(line.end, 1.0, 3.0);
    }

    #[test]
    fn test_invalid_angle_repeats_prompt() {
        let mut session = session(ToolKind::Angle);
        run(&mut session, &["angle", "forty"]);

        let out = String::from_utf8(session.console().get_ref().clone()).unwrap();
        assert_eq!(out.matches("Enter angle:").count(), 2);
        assert!(out.contains("Not a valid expression\nEnter angle:"));
        assert!(session.document().is_empty());
    }

    #[test]
    fn test_pan_and_zoom_move_the_click_point() {
        let mut session = session(ToolKind::Horizontal);
        run(&mut session, &["pan 10 0", "click 10 0"]);
        let line = session.document().last().unwrap().data;
        assert_point(line.start, 0.0, 0.0);

        run(&mut session, &["pan -10 0", "zoom 0 0 1", "click 5 0"]);
        let line = session.document().last().unwrap().data;
        assert_point(line.start, 4.0, 0.0);
        assert!(session.view().redraws().contains(&RedrawMode::All));
    }

    #[test]
    fn test_fit_frames_the_drawing() {
        let mut session = session(ToolKind::Vertical);
        run(&mut session, &["fit 100 100"]);
        assert_eq!(session.view().camera, Camera::default());

        run(&mut session, &["click 0 0", "fit 100 100"]);
        let camera = session.view().camera;
        assert!((camera.zoom - 80.0).abs() < 1e-9);
        assert_point(camera.world_to_screen(Point::new(0.0, 0.5)), 50.0, 50.0);
    }

    #[test]
    fn test_snap_mode_switching() {
        let mut session = session(ToolKind::Horizontal);
        run(&mut session, &["snap grid", "click 13 2"]);
        let line = session.document().last().unwrap().data;
        assert_point(line.start, 10.0, 0.0);

        run(&mut session, &["snap"]);
        assert_eq!(session.view().snap_mode, SnapMode::Endpoints);
        run(&mut session, &["snap off", "click 13 2"]);
        let line = session.document().last().unwrap().data;
        assert_point(line.start, 13.0, 2.0);
    }
}
