//! Central UI state for the inspector.

use bevy::prelude::*;

/// Marker component for inspector-internal entities.
/// Applied to the inspector camera and UI so they are never picked or listed.
#[derive(Component)]
pub struct InspectorInternal;

/// Central UI state for the inspector.
#[derive(Resource, Default)]
pub struct InspectorState {
    /// Latest message for the user, shown in the title bar.
    pub notice: Option<String>,
}

/// Tracks the state of the inspector window.
#[derive(Resource, Default)]
pub struct InspectorWindowState {
    /// Entity ID of the inspector window, if it exists.
    pub window_entity: Option<Entity>,
    /// Entity ID of the camera rendering to the inspector window.
    pub camera_entity: Option<Entity>,
    /// Whether the inspector window is currently open.
    pub is_open: bool,
}
