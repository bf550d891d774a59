//! Example: a small scene wired to the live developer overlay.
//!
//! Run with: cargo run --example dev_overlay
//!
//! - Drag "Time scale" to speed the orbiting shapes up or down
//! - Press "Pick" on "Camera follows" and click a shape to follow it
//! - "Hide map" forgets the explored map
//! - Toggle damage class filters in the browser

use bevy::prelude::*;
use live_inspector::browser::{Browser, ItemEntry, NpcEntry};
use live_inspector::filters::{DamageClass, damage_class_filter};
use live_inspector::inspector::InspectorInternal;
use live_inspector::inspector::widgets::{FieldEditor, PickRadius, pick_nearest};
use live_inspector::tools::{DirectTileAccess, HideMapTool, MapRefresh, MapTile, WorldMap};
use live_inspector::{FieldEditorAppExt, InspectorWindowPlugin, ToolAppExt};

/// Multiplier applied to animation time.
#[derive(Resource)]
struct TimeScale(f64);

/// Entity the camera follows.
#[derive(Resource, Default)]
struct FollowTarget(Option<Entity>);

#[derive(Component)]
struct Orbit {
    radius: f32,
    speed: f32,
    phase: f32,
}

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins)
        .add_plugins(InspectorWindowPlugin)
        .insert_resource(TimeScale(1.0))
        .init_resource::<FollowTarget>()
        .init_resource::<MapRefresh>()
        .insert_resource(explored_map())
        .insert_resource(demo_browser())
        .add_systems(Startup, setup)
        .add_systems(Update, (orbit, follow_target, log_map_refresh));

    app.add_field_editor(
        FieldEditor::new("Time scale", |commands, value: &f64| {
            commands.insert_resource(TimeScale(*value));
        })
        .with_description("Multiplier applied to orbit speed")
        .with_poll(|world| world.get_resource::<TimeScale>().map(|scale| scale.0)),
    );

    app.add_field_editor(
        FieldEditor::<Entity>::entity_picker(
            "Camera follows",
            |commands, entity| commands.insert_resource(FollowTarget(Some(*entity))),
            pick_nearest,
        )
        .with_description("Click Pick, then a shape in the game window")
        .with_poll(|world| world.get_resource::<FollowTarget>().and_then(|target| target.0)),
    );

    app.register_tool(HideMapTool::new(DirectTileAccess));

    app.run();
}

fn explored_map() -> WorldMap {
    let mut map = WorldMap::new(64, 32);
    for x in 0..20 {
        for y in 0..10 {
            map.reveal(
                x,
                y,
                MapTile {
                    kind: 1,
                    light: 255,
                    color: 2,
                },
            );
        }
    }
    map
}

fn demo_browser() -> Browser {
    let mut browser = Browser::new()
        .with_item(ItemEntry::weapon("Copper Shortsword", 5, DamageClass::Melee))
        .with_item(ItemEntry::weapon("Zenith", 190, DamageClass::MeleeNoSpeed))
        .with_item(ItemEntry::weapon("Wand of Sparking", 10, DamageClass::Magic))
        .with_item(ItemEntry::weapon("Minishark", 6, DamageClass::Ranged))
        .with_item(ItemEntry::weapon("Slime Staff", 9, DamageClass::Summon))
        .with_item(ItemEntry::weapon("Training Dummy Bat", 0, DamageClass::Melee))
        .with_item(ItemEntry::material("Gel"))
        .with_item(NpcEntry::new("Guide", 250));

    for class in [
        DamageClass::Melee,
        DamageClass::Ranged,
        DamageClass::Magic,
        DamageClass::Summon,
    ] {
        browser.add_filter(damage_class_filter(class, class.display_name()));
    }
    browser
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2d);

    let shapes = [
        (Mesh::from(Circle::new(24.0)), 120.0, 0.8, Color::srgb(0.9, 0.3, 0.3)),
        (Mesh::from(Rectangle::new(40.0, 40.0)), 200.0, 0.5, Color::srgb(0.3, 0.9, 0.4)),
        (Mesh::from(Circle::new(16.0)), 280.0, 1.2, Color::srgb(0.3, 0.5, 0.9)),
    ];

    for (index, (mesh, radius, speed, color)) in shapes.into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Shape {index}")),
            Mesh2d(meshes.add(mesh)),
            MeshMaterial2d(materials.add(color)),
            Transform::default(),
            Orbit {
                radius,
                speed,
                phase: index as f32 * 2.0,
            },
            PickRadius(30.0),
        ));
    }
}

fn orbit(time: Res<Time>, scale: Res<TimeScale>, mut query: Query<(&Orbit, &mut Transform)>) {
    let t = time.elapsed_secs() * scale.0 as f32;
    for (orbit, mut transform) in &mut query {
        let angle = orbit.phase + t * orbit.speed;
        transform.translation.x = angle.cos() * orbit.radius;
        transform.translation.y = angle.sin() * orbit.radius;
    }
}

fn follow_target(
    target: Res<FollowTarget>,
    targets: Query<&GlobalTransform, Without<Camera2d>>,
    mut cameras: Query<&mut Transform, (With<Camera2d>, Without<InspectorInternal>)>,
) {
    let Some(position) = target.0.and_then(|entity| targets.get(entity).ok()) else {
        return;
    };

    for mut camera in &mut cameras {
        camera.translation.x = position.translation().x;
        camera.translation.y = position.translation().y;
    }
}

fn log_map_refresh(mut refresh: ResMut<MapRefresh>, map: Res<WorldMap>) {
    if refresh.refresh_map {
        info!(
            "Map redrawn: {} of {} tiles explored",
            map.revealed_count(),
            map.width() * map.height()
        );
        *refresh = MapRefresh::default();
    }
}
