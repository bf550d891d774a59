//! Inspector UI module.
//!
//! Provides a separate window hosting live field editors, developer tools and a
//! filterable browser, built with bevy_ui and bevy_experimental_feathers.

pub mod config;
pub mod panels;
pub mod plugin;
pub mod state;
pub mod widgets;

pub use config::InspectorConfig;
pub use panels::EditorCardPlugin;
pub use plugin::{InspectorSet, InspectorWindow, InspectorWindowPlugin};
pub use state::{InspectorInternal, InspectorState, InspectorWindowState};
pub use widgets::{
    DragValue, DragValueChanged, DragValuePlugin, EditorError, EditorId, EditorInput,
    EditorState, EditorValue, FieldEditor, FieldEditorAppExt, FieldEditors, OverlayNotice,
    PickRadius, WorldEntity, pick_nearest,
};
