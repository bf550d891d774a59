//! Entity pickers: field editors whose value is chosen by clicking the world.

use bevy::prelude::*;

use super::field_editor::{EditorError, EditorValue, FieldEditor};
use crate::inspector::state::InspectorInternal;

/// Shown to the user when an entity picker starts selecting.
pub const SELECTION_INSTRUCTIONS: &str =
    "Click on an entity in the world to select it. Right click to cancel.";

/// A message for the user, raised by overlay widgets.
#[derive(Event, Clone, Debug)]
pub struct OverlayNotice {
    pub text: String,
}

/// Values that refer to something living in the world.
pub trait WorldEntity: EditorValue {
    /// Whether the referenced thing still exists.
    fn is_live(&self, world: &World) -> bool;

    /// Where it is, in world space.
    fn world_position(&self, world: &World) -> Option<Vec2>;
}

impl WorldEntity for Entity {
    fn is_live(&self, world: &World) -> bool {
        world.entities().contains(*self)
    }

    fn world_position(&self, world: &World) -> Option<Vec2> {
        world
            .get::<GlobalTransform>(*self)
            .map(|transform| transform.translation().truncate())
    }
}

impl<T: EditorValue> FieldEditor<T> {
    /// Enters selection mode and tells the user how to pick.
    pub fn start_selection(&mut self, commands: &mut Commands) -> Result<(), EditorError> {
        if !self.is_entity_picker() {
            return Err(EditorError::NotEntityEditor(self.name().to_string()));
        }

        self.begin_edit();
        info!("{SELECTION_INSTRUCTIONS}");
        commands.trigger(OverlayNotice {
            text: SELECTION_INSTRUCTIONS.to_string(),
        });
        Ok(())
    }
}

impl<T: WorldEntity> FieldEditor<T> {
    /// An editor that picks its value with `hit_test` when the user clicks the world.
    pub fn entity_picker(
        name: impl Into<String>,
        on_value_changed: impl FnMut(&mut Commands, &T) + Send + Sync + 'static,
        hit_test: impl Fn(&World, Vec2) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, on_value_changed).with_hit_test(hit_test)
    }

    /// The tracked value, or `None` if it no longer exists in the world.
    ///
    /// This is a display-time check: a despawned value does not change editor state.
    pub fn live_value(&self, world: &World) -> Option<&T> {
        self.value().filter(|value| value.is_live(world))
    }

    /// Text for the picker's preview area.
    pub fn preview_label(&self, world: &World) -> String {
        if self.is_selecting() {
            return "Selecting...".to_string();
        }

        match self.live_value(world) {
            Some(value) => match value.world_position(world) {
                Some(position) => format!(
                    "{} at ({:.0}, {:.0})",
                    value.display_value(),
                    position.x,
                    position.y
                ),
                None => value.display_value(),
            },
            None => "None".to_string(),
        }
    }
}

/// Makes an entity selectable by entity pickers within `radius` world units.
#[derive(Component, Clone, Copy, Debug)]
pub struct PickRadius(pub f32);

/// One pickable entity as seen this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickTarget {
    pub entity: Entity,
    pub position: Vec2,
    pub radius: f32,
}

/// Snapshot of pickable entities, refreshed every frame.
#[derive(Resource, Default, Debug)]
pub struct PickTargets {
    pub targets: Vec<PickTarget>,
}

impl PickTargets {
    /// The target whose centre is closest to `pointer`, among those covering it.
    pub fn hit_test(&self, pointer: Vec2) -> Option<Entity> {
        self.targets
            .iter()
            .filter(|target| target.position.distance(pointer) <= target.radius)
            .min_by(|a, b| {
                let da = a.position.distance_squared(pointer);
                let db = b.position.distance_squared(pointer);
                da.total_cmp(&db).then(a.entity.cmp(&b.entity))
            })
            .map(|target| target.entity)
    }
}

/// Hit test for entity pickers, backed by [`PickTargets`].
pub fn pick_nearest(world: &World, pointer: Vec2) -> Option<Entity> {
    world
        .get_resource::<PickTargets>()?
        .hit_test(pointer)
        .filter(|entity| entity.is_live(world))
}

/// Rebuilds [`PickTargets`] from the world.
pub fn refresh_pick_targets(
    mut pick_targets: ResMut<PickTargets>,
    pickable: Query<(Entity, &GlobalTransform, &PickRadius), Without<InspectorInternal>>,
) {
    pick_targets.targets.clear();
    pick_targets
        .targets
        .extend(pickable.iter().map(|(entity, transform, radius)| PickTarget {
            entity,
            position: transform.translation().truncate(),
            radius: radius.0,
        }));
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::inspector::widgets::{EditorInput, EditorState, run_deferred};

    fn picker(world: &mut World) -> (FieldEditor<Entity>, Arc<Mutex<Vec<Entity>>>) {
        world.init_resource::<PickTargets>();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let editor = FieldEditor::<Entity>::entity_picker(
            "Target",
            move |_, entity| sink.lock().unwrap().push(*entity),
            pick_nearest,
        );
        (editor, log)
    }

    fn place(world: &mut World, position: Vec2, radius: f32) -> Entity {
        let entity = world
            .spawn((
                GlobalTransform::from_translation(position.extend(0.0)),
                PickRadius(radius),
            ))
            .id();
        world.resource_mut::<PickTargets>().targets.push(PickTarget {
            entity,
            position,
            radius,
        });
        entity
    }

    fn tick(editor: &mut FieldEditor<Entity>, world: &mut World, input: EditorInput) {
        run_deferred(world, |world, commands| editor.update(world, &input, commands));
    }

    fn click(pointer: Vec2) -> EditorInput {
        EditorInput {
            confirm: true,
            cancel: false,
            pointer: Some(pointer),
        }
    }

    #[test]
    fn begin_edit_starts_selecting() {
        let mut world = World::new();
        let (mut editor, _) = picker(&mut world);

        assert!(!editor.is_selecting());
        editor.begin_edit();
        assert!(editor.is_selecting());
        assert_eq!(editor.state(), EditorState::Editing);
    }

    #[test]
    fn cancel_signal_leaves_selection_without_commit() {
        let mut world = World::new();
        let (mut editor, log) = picker(&mut world);
        place(&mut world, Vec2::ZERO, 10.0);

        editor.begin_edit();
        let input = EditorInput {
            confirm: true,
            cancel: true,
            pointer: Some(Vec2::ZERO),
        };
        tick(&mut editor, &mut world, input);

        assert!(!editor.is_selecting());
        assert_eq!(editor.state(), EditorState::Observing);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn miss_keeps_selecting_until_hit() {
        let mut world = World::new();
        let (mut editor, log) = picker(&mut world);
        let target = place(&mut world, Vec2::new(100.0, 0.0), 8.0);

        editor.begin_edit();
        tick(&mut editor, &mut world, click(Vec2::new(-50.0, 0.0)));
        assert!(editor.is_selecting());
        assert_eq!(editor.state(), EditorState::Editing);
        assert!(log.lock().unwrap().is_empty());

        tick(&mut editor, &mut world, click(Vec2::new(104.0, 0.0)));
        assert!(!editor.is_selecting());
        assert_eq!(editor.state(), EditorState::Observing);
        assert_eq!(editor.value(), Some(&target));
        assert_eq!(*log.lock().unwrap(), vec![target]);
    }

    #[test]
    fn idle_ticks_and_missing_pointer_do_not_select() {
        let mut world = World::new();
        let (mut editor, log) = picker(&mut world);
        place(&mut world, Vec2::ZERO, 8.0);

        editor.begin_edit();
        tick(&mut editor, &mut world, EditorInput::default());
        tick(
            &mut editor,
            &mut world,
            EditorInput {
                confirm: true,
                cancel: false,
                pointer: None,
            },
        );

        assert!(editor.is_selecting());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn closest_target_wins() {
        let mut world = World::new();
        world.init_resource::<PickTargets>();
        let far = place(&mut world, Vec2::new(6.0, 0.0), 10.0);
        let near = place(&mut world, Vec2::new(2.0, 0.0), 10.0);

        assert_eq!(pick_nearest(&world, Vec2::ZERO), Some(near));
        assert_eq!(pick_nearest(&world, Vec2::new(9.0, 0.0)), Some(far));
        assert_eq!(pick_nearest(&world, Vec2::new(0.0, 50.0)), None);
    }

    #[test]
    fn despawned_value_reads_as_absent() {
        let mut world = World::new();
        let (mut editor, _) = picker(&mut world);
        let target = place(&mut world, Vec2::ZERO, 4.0);

        editor.begin_edit();
        tick(&mut editor, &mut world, click(Vec2::ZERO));
        assert_eq!(editor.live_value(&world), Some(&target));

        world.despawn(target);
        assert_eq!(editor.live_value(&world), None);
        assert_eq!(editor.value(), Some(&target));
        assert_eq!(editor.state(), EditorState::Observing);
        assert_eq!(editor.preview_label(&world), "None");
    }

    #[test]
    fn despawned_targets_cannot_be_picked() {
        let mut world = World::new();
        world.init_resource::<PickTargets>();
        let target = place(&mut world, Vec2::ZERO, 4.0);
        world.despawn(target);

        assert_eq!(pick_nearest(&world, Vec2::ZERO), None);
    }

    #[derive(Resource, Default)]
    struct Notices(Vec<String>);

    fn record_notices(world: &mut World) {
        world.init_resource::<Notices>();
        world.add_observer(|trigger: On<OverlayNotice>, mut notices: ResMut<Notices>| {
            notices.0.push(trigger.text.clone());
        });
    }

    #[test]
    fn start_selection_requires_picker() {
        let mut world = World::new();
        record_notices(&mut world);
        let (mut editor, _) = picker(&mut world);
        let mut plain = FieldEditor::<Entity>::new("Plain", |_, _| {});

        let refused = run_deferred(&mut world, |_, commands| plain.start_selection(commands));
        assert_eq!(
            refused,
            Err(EditorError::NotEntityEditor("Plain".to_string()))
        );
        assert!(!plain.is_editing());
        assert!(world.resource::<Notices>().0.is_empty());

        let started = run_deferred(&mut world, |_, commands| editor.start_selection(commands));
        assert_eq!(started, Ok(()));
        assert!(editor.is_selecting());
        assert_eq!(
            world.resource::<Notices>().0,
            vec![SELECTION_INSTRUCTIONS.to_string()]
        );
    }

    #[test]
    fn preview_reports_position() {
        let mut world = World::new();
        let (mut editor, _) = picker(&mut world);
        let target = place(&mut world, Vec2::new(12.0, -40.0), 4.0);

        editor.begin_edit();
        assert_eq!(editor.preview_label(&world), "Selecting...");
        tick(&mut editor, &mut world, click(Vec2::new(12.0, -40.0)));

        assert_eq!(
            editor.preview_label(&world),
            format!("Entity {target} at (12, -40)")
        );
    }
}
