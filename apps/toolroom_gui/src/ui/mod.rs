//! UI layer: app shell, per-tab panels, widgets, and status colors.

pub mod app;
pub mod panels;
pub mod theme;
pub mod widgets;

pub use app::ToolRoomApp;
