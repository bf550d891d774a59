//! Live-binding field editor.
//!
//! A [`FieldEditor`] shows a value that lives somewhere else (a resource, a component,
//! an engine setting) and keeps itself synchronized with it by polling once per frame.
//! While the user is editing, polling is suspended so the editor never fights the user
//! over the value. A new value reaches the source only through [`FieldEditor::commit`].

use bevy::ecs::entity::Entity;
use bevy::prelude::*;
use thiserror::Error;

use super::editor_set::EditorId;

/// Reads the current value from the world. `None` means "nothing new this tick".
pub type Poll<T> = Box<dyn FnMut(&World) -> Option<T> + Send + Sync>;

/// Called with the previous and the freshly polled value, before the overwrite.
pub type ReceiveHook<T> = Box<dyn FnMut(Option<&T>, &T) + Send + Sync>;

/// Writes a committed value back to its source.
pub type ValueChanged<T> = Box<dyn FnMut(&mut Commands, &T) + Send + Sync>;

/// Resolves a world-space pointer position to a value, if anything is under it.
pub type HitTest<T> = Box<dyn Fn(&World, Vec2) -> Option<T> + Send + Sync>;

/// Values a field editor can be bound to.
pub trait EditorValue: Clone + Send + Sync + 'static {
    /// The widget used to edit values of this type.
    const WIDGET: ValueWidget = ValueWidget::Label;

    /// Text shown in the editor card for this value.
    fn display_value(&self) -> String;
}

/// How an editor card presents its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueWidget {
    /// Read-only text; edits come from custom controls (e.g. the entity picker).
    Label,
    /// A [`DragValue`](super::DragValue) number input.
    Drag,
}

impl EditorValue for f64 {
    const WIDGET: ValueWidget = ValueWidget::Drag;

    fn display_value(&self) -> String {
        format!("{self:.2}")
    }
}

impl EditorValue for f32 {
    fn display_value(&self) -> String {
        format!("{self:.2}")
    }
}

impl EditorValue for i32 {
    fn display_value(&self) -> String {
        self.to_string()
    }
}

impl EditorValue for bool {
    fn display_value(&self) -> String {
        let label = if *self { "On" } else { "Off" };
        label.to_string()
    }
}

impl EditorValue for String {
    fn display_value(&self) -> String {
        self.clone()
    }
}

impl EditorValue for Entity {
    fn display_value(&self) -> String {
        format!("Entity {self}")
    }
}

/// Top-level state of a field editor.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    /// Follows the bound source every tick.
    #[default]
    Observing,
    /// The user owns the value; polling is suspended.
    Editing,
}

/// Behaviour layered on top of the observe/edit state machine.
pub enum EditorMode<T> {
    /// Edits come from the host UI calling `begin_edit`/`commit`/`cancel`.
    Plain,
    /// Edits come from clicking something in the world.
    ///
    /// `selecting` is only ever true while the editor is [`EditorState::Editing`].
    EntitySelecting {
        selecting: bool,
        hit_test: HitTest<T>,
    },
}

/// Per-frame input signals consumed by editors.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct EditorInput {
    /// Primary confirm pressed this frame.
    pub confirm: bool,
    /// Secondary confirm (cancel) pressed this frame.
    pub cancel: bool,
    /// Pointer position in world space, if the cursor is over the game view.
    pub pointer: Option<Vec2>,
}

/// Errors from driving a field editor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("editor \"{0}\" is not being edited")]
    NotEditing(String),
    #[error("editor \"{0}\" cannot pick entities from the world")]
    NotEntityEditor(String),
    #[error("no field editor registered as {0:?}")]
    UnknownEditor(EditorId),
}

/// An editor bound to an externally owned value of type `T`.
pub struct FieldEditor<T: EditorValue> {
    name: String,
    description: String,
    value: Option<T>,
    state: EditorState,
    mode: EditorMode<T>,
    poll: Option<Poll<T>>,
    on_receive_new_value: Option<ReceiveHook<T>>,
    on_value_changed: ValueChanged<T>,
}

impl<T: EditorValue> FieldEditor<T> {
    /// Creates a plain editor that only changes value through [`FieldEditor::commit`].
    pub fn new(
        name: impl Into<String>,
        on_value_changed: impl FnMut(&mut Commands, &T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            value: None,
            state: EditorState::Observing,
            mode: EditorMode::Plain,
            poll: None,
            on_receive_new_value: None,
            on_value_changed: Box::new(on_value_changed),
        }
    }

    /// Tooltip text shown when hovering the editor.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// A hint for the bound value before the first poll.
    pub fn with_initial_value(mut self, value: T) -> Self {
        self.value = Some(value);
        self
    }

    /// Keeps the editor synchronized with `poll` while it is not being edited.
    pub fn with_poll(
        mut self,
        poll: impl FnMut(&World) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        self.poll = Some(Box::new(poll));
        self
    }

    /// Runs `hook(old, new)` whenever a polled value is about to replace the current one.
    pub fn with_receive_hook(
        mut self,
        hook: impl FnMut(Option<&T>, &T) + Send + Sync + 'static,
    ) -> Self {
        self.on_receive_new_value = Some(Box::new(hook));
        self
    }

    /// Turns this into an entity picker: edits happen by clicking the world.
    pub fn with_hit_test(
        mut self,
        hit_test: impl Fn(&World, Vec2) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        self.mode = EditorMode::EntitySelecting {
            selecting: false,
            hit_test: Box::new(hit_test),
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The last known or accepted value.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == EditorState::Editing
    }

    /// Whether the editor is waiting for a world click.
    pub fn is_selecting(&self) -> bool {
        matches!(
            self.mode,
            EditorMode::EntitySelecting {
                selecting: true,
                ..
            }
        )
    }

    pub fn is_entity_picker(&self) -> bool {
        matches!(self.mode, EditorMode::EntitySelecting { .. })
    }

    /// Short name of the bound type, e.g. `f64`, `Entity` or `Option<Entity>`.
    pub fn type_name(&self) -> String {
        short_type_name(std::any::type_name::<T>())
    }

    /// Advances the editor by one frame.
    ///
    /// Observing editors poll their source. Editing editors skip polling; entity pickers
    /// additionally resolve confirm/cancel input against the world.
    pub fn update(&mut self, world: &World, input: &EditorInput, commands: &mut Commands) {
        match self.state {
            EditorState::Observing => self.poll_source(world),
            EditorState::Editing => self.tick_selection(world, input, commands),
        }
    }

    /// Suspends synchronization. In entity mode this also starts selecting.
    pub fn begin_edit(&mut self) {
        if self.state == EditorState::Editing {
            return;
        }

        self.state = EditorState::Editing;
        if let EditorMode::EntitySelecting { selecting, .. } = &mut self.mode {
            *selecting = true;
        }
    }

    /// Accepts `value`, resumes observing and notifies the source once.
    pub fn commit(&mut self, value: T, commands: &mut Commands) -> Result<(), EditorError> {
        if self.state != EditorState::Editing {
            return Err(EditorError::NotEditing(self.name.clone()));
        }

        self.accept(value, commands);
        Ok(())
    }

    /// Abandons the edit without notifying the source. No-op while observing.
    pub fn cancel(&mut self) {
        if self.state == EditorState::Editing {
            self.leave_editing();
        }
    }

    fn poll_source(&mut self, world: &World) {
        let Some(poll) = self.poll.as_mut() else {
            return;
        };

        // A failed read keeps the last known value.
        let Some(new_value) = poll(world) else {
            return;
        };

        if let Some(hook) = self.on_receive_new_value.as_mut() {
            hook(self.value.as_ref(), &new_value);
        }
        self.value = Some(new_value);
    }

    fn tick_selection(&mut self, world: &World, input: &EditorInput, commands: &mut Commands) {
        if !self.is_selecting() {
            return;
        }

        if input.cancel {
            debug!("Selection cancelled for editor \"{}\"", self.name);
            self.cancel();
            return;
        }

        if !input.confirm {
            return;
        }

        let hit = match (&self.mode, input.pointer) {
            (EditorMode::EntitySelecting { hit_test, .. }, Some(pointer)) => {
                hit_test(world, pointer)
            }
            _ => None,
        };

        // A miss keeps selecting so the user can click again.
        if let Some(selected) = hit {
            self.accept(selected, commands);
        }
    }

    fn accept(&mut self, value: T, commands: &mut Commands) {
        self.leave_editing();
        (self.on_value_changed)(commands, &value);
        debug!("Editor \"{}\" committed {}", self.name, value.display_value());
        self.value = Some(value);
    }

    fn leave_editing(&mut self) {
        self.state = EditorState::Observing;
        if let EditorMode::EntitySelecting { selecting, .. } = &mut self.mode {
            *selecting = false;
        }
    }
}

/// Strips module paths from every path segment of a type name.
fn short_type_name(full: &str) -> String {
    let mut short = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
        } else {
            short.push_str(segment.rsplit("::").next().unwrap_or(&segment));
            segment.clear();
            short.push(ch);
        }
    }
    short.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    short
}
