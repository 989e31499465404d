//! anglecad core library
//!
//! Platform-agnostic data structures and tool logic for placing straight
//! lines at a fixed or typed angle: geometry, entities, the document with its
//! undo history, snapping, expression evaluation and the line-angle tool.

pub mod camera;
pub mod document;
pub mod entity;
pub mod expr;
pub mod geometry;
pub mod host;
pub mod input;
pub mod settings;
pub mod snap;
pub mod tools;

pub use camera::Camera;
pub use document::Document;
pub use entity::{EntityId, LineEntity, LineType, Pen, SerializableColor};
pub use expr::{EvalError, Evaluator, MathEvaluator};
pub use geometry::{AnchorMode, LineData, line_from_anchor};
pub use host::{
    CommandSurface, CursorStyle, EntityContainer, GraphicView, HeadlessView, OptionsEdit,
    RecordingSurface, RedrawMode, ToolBar, ToolContext,
};
pub use input::{MouseButton, PointerEvent};
pub use settings::{SettingsError, ToolSettings};
pub use snap::{SnapMode, SnapResult, SnapTarget, SnapTargetKind};
pub use tools::{Action, LineAngleStatus, LineAngleTool, ToolKind, ToolManager};
