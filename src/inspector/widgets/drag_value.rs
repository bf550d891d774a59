//! Drag value widget - a draggable number input like ImGui's DragFloat.
//!
//! Fronts a `FieldEditor<f64>` registered in [`FieldEditors<f64>`]:
//! 1. Horizontal dragging begins an edit, previews intermediate values, and commits on release
//! 2. Double-clicking enters text input mode; Enter commits, Escape cancels
//!
//! Only the final value of a drag is committed, so the bound source sees one change
//! per gesture.

use bevy::ecs::entity::Entity;
use bevy::ecs::event::Event;
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::ecs::observer::On;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input_focus::{FocusedInput, InputFocus};
use bevy::picking::events::{Click, Drag, DragEnd, DragStart, Pointer};
use bevy::prelude::*;
use bevy::ui::Val::*;
use std::time::{Duration, Instant};

use super::editor_set::{EditorId, FieldEditorPlugin, FieldEditors};
use crate::inspector::config::InspectorConfig;
use crate::inspector::plugin::InspectorSet;

/// Double-click detection threshold (in milliseconds)
const DOUBLE_CLICK_THRESHOLD_MS: u64 = 300;

/// A drag value widget bound to a `FieldEditor<f64>`.
#[derive(Component, Clone, Debug)]
#[require(DragValueDragState)]
pub struct DragValue {
    /// The editor this widget drives.
    pub editor: EditorId,
    /// How fast dragging changes the value (units per pixel).
    pub drag_speed: f64,
    /// Number of decimal places for display.
    pub precision: usize,
    /// Minimum allowed value.
    pub min: Option<f64>,
    /// Maximum allowed value.
    pub max: Option<f64>,
}

impl DragValue {
    pub fn new(editor: EditorId) -> Self {
        Self {
            editor,
            drag_speed: 0.1,
            precision: 2,
            min: None,
            max: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Applies min/max constraints.
    pub fn clamp(&self, value: f64) -> f64 {
        let mut value = value;
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        value
    }

    pub fn format(&self, value: f64) -> String {
        format!("{:.prec$}", value, prec = self.precision)
    }
}

/// Tracks the interaction state of a DragValue widget.
#[derive(Component, Default)]
pub struct DragValueDragState {
    /// Whether currently dragging.
    pub dragging: bool,
    /// The value when dragging started.
    pub start_value: f64,
    /// Latest value shown while dragging, committed on release.
    pub pending_value: Option<f64>,
    /// Whether in text editing mode.
    pub editing: bool,
    /// Text buffer for editing mode.
    pub edit_buffer: String,
    /// Last click time for double-click detection.
    pub last_click_time: Option<Instant>,
}

/// Emitted while dragging, for every previewed value.
#[derive(Event, Clone, Debug)]
pub struct DragValueChanged {
    /// The UI entity being dragged.
    pub source: Entity,
    /// The previewed value.
    pub new_value: f64,
}

/// Event emitted when edit mode changes
#[derive(Event, Clone, Debug)]
pub struct DragValueEditModeChanged {
    pub entity: Entity,
    pub editing: bool,
}

/// Spawns a DragValue widget with its text child.
pub fn spawn_drag_value(
    parent: &mut ChildSpawnerCommands<'_>,
    drag_value: DragValue,
    config: &InspectorConfig,
) {
    parent
        .spawn((
            Node {
                min_width: Px(60.0),
                padding: UiRect::horizontal(Px(4.0)),
                border: UiRect::all(Px(1.0)),
                ..default()
            },
            BorderColor::all(config.border_color),
            BackgroundColor(Color::srgba(0.15, 0.15, 0.15, 1.0)),
            drag_value,
            Interaction::default(),
        ))
        .with_child((
            Text::new("-"),
            TextFont {
                font_size: config.small_font_size,
                ..default()
            },
            TextColor(Color::srgba(0.9, 0.9, 0.6, 1.0)), // Yellow for editable
        ));
}

// Observer: handle click for double-click detection
fn drag_value_on_click(
    mut click: On<Pointer<Click>>,
    mut q_drag_value: Query<(Entity, &DragValue, &mut DragValueDragState)>,
    mut editors: ResMut<FieldEditors<f64>>,
    mut input_focus: ResMut<InputFocus>,
    mut commands: Commands,
) {
    let entity = click.entity;
    let Ok((_, _, mut drag_state)) = q_drag_value.get_mut(entity) else {
        return;
    };
    click.propagate(false);

    let now = Instant::now();

    // Check for double-click
    let is_double_click = drag_state
        .last_click_time
        .map(|last| now.duration_since(last) < Duration::from_millis(DOUBLE_CLICK_THRESHOLD_MS))
        .unwrap_or(false);

    if is_double_click && !drag_state.editing {
        drag_state.last_click_time = None; // Reset to prevent triple-click
        enter_edit_mode(
            entity,
            &mut q_drag_value,
            &mut editors,
            &mut input_focus,
            &mut commands,
        );
    } else {
        drag_state.last_click_time = Some(now);
    }
}

/// Helper: switch `entity` into text edit mode.
///
/// Only one widget edits at a time; any other widget still in edit mode is cancelled
/// first so its editor returns to observing.
fn enter_edit_mode(
    entity: Entity,
    q_drag_value: &mut Query<(Entity, &DragValue, &mut DragValueDragState)>,
    editors: &mut FieldEditors<f64>,
    input_focus: &mut InputFocus,
    commands: &mut Commands,
) {
    for (other, drag_value, mut drag_state) in q_drag_value.iter_mut() {
        if other == entity || !drag_state.editing {
            continue;
        }
        if let Ok(editor) = editors.get_mut(drag_value.editor) {
            editor.cancel();
        }
        drag_state.editing = false;
        drag_state.edit_buffer.clear();
        commands.trigger(DragValueEditModeChanged {
            entity: other,
            editing: false,
        });
    }

    let Ok((_, drag_value, mut drag_state)) = q_drag_value.get_mut(entity) else {
        return;
    };
    let editor = match editors.get_mut(drag_value.editor) {
        Ok(editor) => editor,
        Err(err) => {
            warn!("{err}");
            return;
        }
    };

    // Seed the buffer with the editor's current value
    let current_value = editor.value().copied().unwrap_or(0.0);
    editor.begin_edit();
    drag_state.editing = true;
    drag_state.edit_buffer = drag_value.format(current_value);

    // Set input focus to this widget
    input_focus.set(entity);

    commands.trigger(DragValueEditModeChanged {
        entity,
        editing: true,
    });
}

// Observer: handle drag start (skip if in edit mode)
fn drag_value_on_drag_start(
    mut drag_start: On<Pointer<DragStart>>,
    mut q_drag_value: Query<(&DragValue, &mut DragValueDragState)>,
    mut editors: ResMut<FieldEditors<f64>>,
) {
    if let Ok((drag_value, mut drag_state)) = q_drag_value.get_mut(drag_start.entity) {
        // Skip dragging if in edit mode
        if drag_state.editing {
            return;
        }

        drag_start.propagate(false);

        let editor = match editors.get_mut(drag_value.editor) {
            Ok(editor) => editor,
            Err(err) => {
                warn!("{err}");
                return;
            }
        };

        editor.begin_edit();
        drag_state.dragging = true;
        drag_state.start_value = editor.value().copied().unwrap_or(0.0);
        drag_state.pending_value = None;
    }
}

// Observer: handle drag
fn drag_value_on_drag(
    mut drag: On<Pointer<Drag>>,
    mut q_drag_value: Query<(&DragValue, &mut DragValueDragState)>,
    mut commands: Commands,
) {
    if let Ok((drag_value, mut drag_state)) = q_drag_value.get_mut(drag.entity) {
        drag.propagate(false);

        if drag_state.dragging {
            // Horizontal drag distance in pixels
            let delta_x = drag.distance.x as f64;
            let new_value =
                drag_value.clamp(drag_state.start_value + delta_x * drag_value.drag_speed);

            drag_state.pending_value = Some(new_value);
            commands.trigger(DragValueChanged {
                source: drag.entity,
                new_value,
            });
        }
    }
}

// Observer: handle drag end
fn drag_value_on_drag_end(
    mut drag_end: On<Pointer<DragEnd>>,
    mut q_drag_value: Query<(&DragValue, &mut DragValueDragState)>,
    mut editors: ResMut<FieldEditors<f64>>,
    mut commands: Commands,
) {
    if let Ok((drag_value, mut drag_state)) = q_drag_value.get_mut(drag_end.entity) {
        drag_end.propagate(false);

        if !drag_state.dragging {
            return;
        }
        drag_state.dragging = false;

        let Ok(editor) = editors.get_mut(drag_value.editor) else {
            return;
        };

        match drag_state.pending_value.take() {
            Some(value) => {
                if let Err(err) = editor.commit(value, &mut commands) {
                    warn!("{err}");
                }
            }
            // Released without moving
            None => editor.cancel(),
        }
    }
}

// Observer: show previewed values while dragging
fn update_drag_value_display(
    trigger: On<DragValueChanged>,
    q_drag_value: Query<(&DragValue, &Children)>,
    mut q_text: Query<&mut Text>,
) {
    if let Ok((drag_value, children)) = q_drag_value.get(trigger.source) {
        for child in children.iter() {
            if let Ok(mut text) = q_text.get_mut(child) {
                text.0 = drag_value.format(trigger.new_value);
            }
        }
    }
}

/// Observer: handle keyboard input during text edit mode
fn drag_value_on_keyboard_input(
    trigger: On<FocusedInput<KeyboardInput>>,
    mut q_drag_value: Query<(&DragValue, &mut DragValueDragState, &Children)>,
    mut q_text: Query<&mut Text>,
    mut editors: ResMut<FieldEditors<f64>>,
    mut input_focus: ResMut<InputFocus>,
    mut commands: Commands,
) {
    // Only process key presses
    if trigger.input.state != ButtonState::Pressed {
        return;
    }

    // Check if the focused entity is a DragValue in edit mode
    let entity = trigger.focused_entity;
    let Ok((drag_value, mut drag_state, children)) = q_drag_value.get_mut(entity) else {
        return;
    };
    if !drag_state.editing {
        return;
    }

    match &trigger.input.logical_key {
        Key::Enter => {
            if let Ok(editor) = editors.get_mut(drag_value.editor) {
                match drag_state.edit_buffer.parse::<f64>() {
                    Ok(parsed) => {
                        if let Err(err) = editor.commit(drag_value.clamp(parsed), &mut commands) {
                            warn!("{err}");
                        }
                    }
                    Err(_) => {
                        debug!("Discarding unparsable input {:?}", drag_state.edit_buffer);
                        editor.cancel();
                    }
                }
            }

            exit_edit_mode(&mut drag_state, &mut input_focus, entity, &mut commands);
        }
        Key::Escape => {
            if let Ok(editor) = editors.get_mut(drag_value.editor) {
                editor.cancel();
            }

            exit_edit_mode(&mut drag_state, &mut input_focus, entity, &mut commands);
        }
        Key::Backspace => {
            drag_state.edit_buffer.pop();
            update_edit_display(&drag_state.edit_buffer, children, &mut q_text);
        }
        Key::Character(c) => {
            // Only allow numeric characters, decimal point, and minus sign
            let valid = c.chars().all(|ch| {
                ch.is_ascii_digit()
                    || ch == '.'
                    || ch == '-'
                    || ch == 'e'
                    || ch == 'E'
                    || ch == '+'
            });
            if valid {
                drag_state.edit_buffer.push_str(c);
                update_edit_display(&drag_state.edit_buffer, children, &mut q_text);
            }
        }
        _ => {}
    }
}

/// Helper: exit edit mode
fn exit_edit_mode(
    drag_state: &mut DragValueDragState,
    input_focus: &mut ResMut<InputFocus>,
    entity: Entity,
    commands: &mut Commands,
) {
    drag_state.editing = false;
    drag_state.edit_buffer.clear();
    input_focus.clear();
    commands.trigger(DragValueEditModeChanged {
        entity,
        editing: false,
    });
}

/// Helper: update the text display during editing
fn update_edit_display(buffer: &str, children: &Children, q_text: &mut Query<&mut Text>) {
    for child in children.iter() {
        if let Ok(mut text) = q_text.get_mut(child) {
            // Show edit buffer with cursor indicator
            text.0 = format!("{}|", buffer);
        }
    }
}

/// Observer: handle edit mode visual changes
fn update_edit_mode_display(
    trigger: On<DragValueEditModeChanged>,
    q_drag_value: Query<(&DragValue, &DragValueDragState, &Children)>,
    editors: Res<FieldEditors<f64>>,
    mut q_text: Query<&mut Text>,
) {
    if let Ok((drag_value, drag_state, children)) = q_drag_value.get(trigger.entity) {
        let label = if trigger.editing {
            format!("{}|", drag_state.edit_buffer)
        } else {
            editors
                .get(drag_value.editor)
                .and_then(|editor| editor.value())
                .map(|value| drag_value.format(*value))
                .unwrap_or_else(|| "-".to_string())
        };

        for child in children.iter() {
            if let Ok(mut text) = q_text.get_mut(child) {
                text.0 = label.clone();
            }
        }
    }
}

/// System: mirror observed values into idle widgets.
fn sync_drag_value_text(
    q_drag_value: Query<(&DragValue, &DragValueDragState, &Children)>,
    editors: Res<FieldEditors<f64>>,
    mut q_text: Query<&mut Text>,
) {
    for (drag_value, drag_state, children) in &q_drag_value {
        if drag_state.dragging || drag_state.editing {
            continue;
        }

        let Some(editor) = editors.get(drag_value.editor) else {
            continue;
        };
        if editor.is_editing() {
            continue;
        }

        let Some(value) = editor.value() else {
            continue;
        };

        let label = drag_value.format(*value);
        for child in children.iter() {
            if let Ok(mut text) = q_text.get_mut(child)
                && text.0 != label
            {
                text.0 = label.clone();
            }
        }
    }
}

/// Plugin that adds the DragValue widget observers.
pub struct DragValuePlugin;

impl Plugin for DragValuePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FieldEditorPlugin<f64>>() {
            app.add_plugins(FieldEditorPlugin::<f64>::default());
        }

        app
            // Drag behavior
            .add_observer(drag_value_on_drag_start)
            .add_observer(drag_value_on_drag)
            .add_observer(drag_value_on_drag_end)
            // Click for double-click detection
            .add_observer(drag_value_on_click)
            // Keyboard input for text editing
            .add_observer(drag_value_on_keyboard_input)
            // Display updates
            .add_observer(update_drag_value_display)
            .add_observer(update_edit_mode_display)
            .add_systems(Update, sync_drag_value_text.in_set(InspectorSet::SyncUI));
    }
}
