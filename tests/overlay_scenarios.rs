//! End-to-end runs of the overlay's editors and tools inside a headless `App`.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use live_inspector::inspector::widgets::{
    EditorId, EditorInput, EditorState, FieldEditor, FieldEditorAppExt, FieldEditors, PickTarget,
    PickTargets, pick_nearest, run_deferred,
};
use live_inspector::tools::{
    ActivateTool, DirectTileAccess, HideMapTool, MapRefresh, MapTile, PublicApiOnly, ToolAppExt,
    ToolsPlugin, WorldMap,
};

#[derive(Resource)]
struct Lives(i32);

fn lives_app() -> (App, Arc<Mutex<Vec<i32>>>) {
    let mut app = App::new();
    app.insert_resource(Lives(5));

    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    app.add_field_editor(
        FieldEditor::new("Lives", move |commands, value: &i32| {
            sink.lock().unwrap().push(*value);
            commands.insert_resource(Lives(*value));
        })
        .with_poll(|world| world.get_resource::<Lives>().map(|lives| lives.0)),
    );
    (app, log)
}

#[test]
fn edit_is_not_overwritten_until_commit() {
    let (mut app, log) = lives_app();
    app.update();

    let id = app.world().resource::<FieldEditors<i32>>().ids()[0];
    let editor = |app: &App| snapshot(app, id);
    assert_eq!(editor(&app), (EditorState::Observing, Some(5)));

    app.world_mut()
        .resource_mut::<FieldEditors<i32>>()
        .get_mut(id)
        .unwrap()
        .begin_edit();
    app.world_mut().resource_mut::<Lives>().0 = 7;
    app.update();
    app.update();
    assert_eq!(editor(&app), (EditorState::Editing, Some(5)));

    let world = app.world_mut();
    world.resource_scope(|world, mut editors: Mut<FieldEditors<i32>>| {
        let editor = editors.get_mut(id).unwrap();
        run_deferred(world, |_, commands| {
            editor.commit(9, commands)
        })
        .unwrap();
    });

    assert_eq!(editor(&app), (EditorState::Observing, Some(9)));
    assert_eq!(app.world().resource::<Lives>().0, 9);
    assert_eq!(*log.lock().unwrap(), vec![9]);

    // Observing again, so external changes flow back in
    app.world_mut().resource_mut::<Lives>().0 = 3;
    app.update();
    assert_eq!(editor(&app), (EditorState::Observing, Some(3)));
    assert_eq!(*log.lock().unwrap(), vec![9]);
}

fn snapshot(app: &App, id: EditorId) -> (EditorState, Option<i32>) {
    let editors = app.world().resource::<FieldEditors<i32>>();
    let editor = editors.get(id).expect("editor is registered");
    (editor.state(), editor.value().copied())
}

#[derive(Resource, Default)]
struct FollowTarget(Option<Entity>);

fn picker_app() -> (App, Arc<Mutex<Vec<Entity>>>) {
    let mut app = App::new();
    app.init_resource::<PickTargets>()
        .init_resource::<EditorInput>()
        .init_resource::<FollowTarget>();

    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    app.add_field_editor(FieldEditor::<Entity>::entity_picker(
        "Follow",
        move |commands, entity| {
            sink.lock().unwrap().push(*entity);
            commands.insert_resource(FollowTarget(Some(*entity)));
        },
        pick_nearest,
    ));
    (app, log)
}

fn place(app: &mut App, position: Vec2) -> Entity {
    let entity = app
        .world_mut()
        .spawn(GlobalTransform::from_translation(position.extend(0.0)))
        .id();
    app.world_mut()
        .resource_mut::<PickTargets>()
        .targets
        .push(PickTarget {
            entity,
            position,
            radius: 10.0,
        });
    entity
}

fn set_input(app: &mut App, confirm: bool, cancel: bool, pointer: Vec2) {
    *app.world_mut().resource_mut::<EditorInput>() = EditorInput {
        confirm,
        cancel,
        pointer: Some(pointer),
    };
}

fn start_picking(app: &mut App) -> EditorId {
    let world = app.world_mut();
    let id = world.resource::<FieldEditors<Entity>>().ids()[0];
    world.resource_scope(|world, mut editors: Mut<FieldEditors<Entity>>| {
        let editor = editors.get_mut(id).unwrap();
        run_deferred(world, |_, commands| {
            editor.start_selection(commands)
        })
        .unwrap();
    });
    id
}

#[test]
fn right_click_cancels_selection() {
    let (mut app, log) = picker_app();
    place(&mut app, Vec2::ZERO);
    let id = start_picking(&mut app);

    set_input(&mut app, false, true, Vec2::ZERO);
    app.update();

    let editors = app.world().resource::<FieldEditors<Entity>>();
    let editor = editors.get(id).unwrap();
    assert!(!editor.is_selecting());
    assert_eq!(editor.state(), EditorState::Observing);
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(app.world().resource::<FollowTarget>().0, None);
}

#[test]
fn clicking_empty_space_keeps_selecting_until_a_hit() {
    let (mut app, log) = picker_app();
    let target = place(&mut app, Vec2::new(200.0, 200.0));
    let id = start_picking(&mut app);

    set_input(&mut app, true, false, Vec2::new(-300.0, 0.0));
    app.update();
    {
        let editors = app.world().resource::<FieldEditors<Entity>>();
        let editor = editors.get(id).unwrap();
        assert!(editor.is_selecting());
        assert_eq!(editor.state(), EditorState::Editing);
    }

    set_input(&mut app, true, false, Vec2::new(195.0, 205.0));
    app.update();

    let editors = app.world().resource::<FieldEditors<Entity>>();
    let editor = editors.get(id).unwrap();
    assert!(!editor.is_selecting());
    assert_eq!(editor.state(), EditorState::Observing);
    assert_eq!(editor.value(), Some(&target));
    assert_eq!(*log.lock().unwrap(), vec![target]);
    assert_eq!(app.world().resource::<FollowTarget>().0, Some(target));
}

fn explored_map() -> WorldMap {
    let mut map = WorldMap::new(16, 8);
    let tile = MapTile {
        kind: 3,
        light: 200,
        color: 1,
    };
    map.reveal(0, 0, tile);
    map.reveal(15, 7, tile);
    map.reveal(4, 2, tile);
    map
}

fn map_app(tool: HideMapTool) -> App {
    let mut app = App::new();
    app.add_plugins(ToolsPlugin).insert_resource(explored_map());
    app.register_tool(tool);
    app
}

#[test]
fn hide_map_button_resets_the_map_on_either_path() {
    let mut fast = map_app(HideMapTool::new(DirectTileAccess));
    let mut slow = map_app(HideMapTool::new(PublicApiOnly));

    for app in [&mut fast, &mut slow] {
        app.world_mut().trigger(ActivateTool {
            icon_key: "HideMap".to_string(),
        });
        app.update();

        let map = app.world().resource::<WorldMap>();
        assert_eq!(map.revealed_count(), 0);
        assert_eq!(map.tiles().len(), 16 * 8);
        assert_eq!(
            *app.world().resource::<MapRefresh>(),
            MapRefresh {
                refresh_map: true,
                clear_map: true,
            }
        );
    }

    assert_eq!(
        fast.world().resource::<WorldMap>(),
        slow.world().resource::<WorldMap>()
    );
}

#[test]
fn unknown_tool_requests_are_dropped() {
    let mut app = map_app(HideMapTool::new(DirectTileAccess));
    app.world_mut().trigger(ActivateTool {
        icon_key: "Teleport".to_string(),
    });
    app.update();

    assert_eq!(app.world().resource::<WorldMap>().revealed_count(), 3);
    assert!(app.world().get_resource::<MapRefresh>().is_none());
}
