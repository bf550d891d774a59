//! UI panels for the inspector.

pub mod browser_panel;
pub mod editor_panel;

pub use browser_panel::*;
pub use editor_panel::*;
