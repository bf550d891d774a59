//! Registry of live field editors and the per-frame tick that drives them.

use core::marker::PhantomData;

use bevy::ecs::world::CommandQueue;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::field_editor::{EditorError, EditorInput, EditorValue, FieldEditor};
use crate::inspector::plugin::InspectorSet;

/// Identifies a registered field editor, unique per value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(pub u32);

/// All field editors bound to values of type `T`.
#[derive(Resource)]
pub struct FieldEditors<T: EditorValue> {
    editors: HashMap<EditorId, FieldEditor<T>>,
    next_id: u32,
}

impl<T: EditorValue> Default for FieldEditors<T> {
    fn default() -> Self {
        Self {
            editors: HashMap::default(),
            next_id: 0,
        }
    }
}

impl<T: EditorValue> FieldEditors<T> {
    pub fn insert(&mut self, editor: FieldEditor<T>) -> EditorId {
        let id = EditorId(self.next_id);
        self.next_id += 1;
        self.editors.insert(id, editor);
        id
    }

    pub fn get(&self, id: EditorId) -> Option<&FieldEditor<T>> {
        self.editors.get(&id)
    }

    pub fn get_mut(&mut self, id: EditorId) -> Result<&mut FieldEditor<T>, EditorError> {
        self.editors
            .get_mut(&id)
            .ok_or(EditorError::UnknownEditor(id))
    }

    pub fn remove(&mut self, id: EditorId) -> Option<FieldEditor<T>> {
        self.editors.remove(&id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> Vec<EditorId> {
        let mut ids: Vec<EditorId> = self.editors.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Advances every editor by one frame.
    pub fn update_all(&mut self, world: &World, input: &EditorInput, commands: &mut Commands) {
        for editor in self.editors.values_mut() {
            editor.update(world, input, commands);
        }
    }
}

/// Runs `f` with read access to the world and a command buffer applied afterwards.
///
/// Lets editors poll the world and write commits back in the same pass.
pub fn run_deferred<R>(world: &mut World, f: impl FnOnce(&World, &mut Commands) -> R) -> R {
    let mut queue = CommandQueue::default();
    let result = {
        let mut commands = Commands::new(&mut queue, world);
        f(world, &mut commands)
    };
    queue.apply(world);
    result
}

/// Exclusive system that ticks every editor of type `T` exactly once.
pub fn tick_field_editors<T: EditorValue>(world: &mut World) {
    let input = world.get_resource::<EditorInput>().copied().unwrap_or_default();

    world.resource_scope(|world, mut editors: Mut<FieldEditors<T>>| {
        run_deferred(world, |world, commands| {
            editors.update_all(world, &input, commands);
        });
    });
}

/// Ticks the [`FieldEditors`] of one value type.
pub struct FieldEditorPlugin<T>(PhantomData<fn() -> T>);

impl<T> Default for FieldEditorPlugin<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: EditorValue> Plugin for FieldEditorPlugin<T> {
    fn build(&self, app: &mut App) {
        app.init_resource::<FieldEditors<T>>()
            .add_systems(Update, tick_field_editors::<T>.in_set(InspectorSet::Tick));
    }
}

/// Registers field editors on an [`App`].
pub trait FieldEditorAppExt {
    /// Adds `editor` to the overlay, returning its id.
    fn add_field_editor<T: EditorValue>(&mut self, editor: FieldEditor<T>) -> EditorId;
}

impl FieldEditorAppExt for App {
    fn add_field_editor<T: EditorValue>(&mut self, editor: FieldEditor<T>) -> EditorId {
        if !self.is_plugin_added::<FieldEditorPlugin<T>>() {
            self.add_plugins(FieldEditorPlugin::<T>::default());
        }

        let name = editor.name().to_string();
        let id = self
            .world_mut()
            .resource_mut::<FieldEditors<T>>()
            .insert(editor);
        debug!("Registered field editor \"{name}\" as {id:?}");
        id
    }
}
