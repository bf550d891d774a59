//! Inspector UI widgets.
//!
//! - [`FieldEditor`]: the live-binding editor state machine (observe / edit / select)
//! - [`FieldEditors`]: per-type registry ticked once per frame
//! - [`DragValue`]: a draggable number input (like ImGui's DragFloat) fronting `f64` editors
//!   - Drag horizontally to change value, released drag commits
//!   - Double-click to enter text input mode, Enter commits, Escape cancels

pub mod drag_value;
pub mod editor_set;
pub mod entity_editor;
pub mod field_editor;

pub use drag_value::{
    DragValue, DragValueChanged, DragValueDragState, DragValueEditModeChanged, DragValuePlugin,
    spawn_drag_value,
};
pub use editor_set::{
    EditorId, FieldEditorAppExt, FieldEditorPlugin, FieldEditors, run_deferred,
    tick_field_editors,
};
pub use entity_editor::{
    OverlayNotice, PickRadius, PickTarget, PickTargets, SELECTION_INSTRUCTIONS, WorldEntity,
    pick_nearest, refresh_pick_targets,
};
pub use field_editor::{
    EditorError, EditorInput, EditorMode, EditorState, EditorValue, FieldEditor, ValueWidget,
};
