//! A live developer overlay for Bevy.
//!
//! Field editors bind to values in the running game and write edits back, entity
//! pickers select targets by clicking the world, tools run one-shot actions, and
//! predicate filters narrow browsable lists. Built using bevy_feathers.

pub mod browser;
pub mod filters;
pub mod inspector;
pub mod tools;

// Re-export the main plugin for convenience
pub use inspector::{FieldEditorAppExt, InspectorConfig, InspectorWindowPlugin};
pub use tools::ToolAppExt;
