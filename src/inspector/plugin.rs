//! Inspector window plugin and UI scaffold.

use bevy::camera::RenderTarget;
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::ecs::relationship::Relationship;
use bevy::feathers::FeathersPlugins;
use bevy::feathers::dark_theme::create_dark_theme;
use bevy::feathers::theme::{ThemeBackgroundColor, UiTheme};
use bevy::feathers::tokens;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::picking::hover::HoverMap;
use bevy::prelude::*;
use bevy::ui::Val::*;
use bevy::window::{PrimaryWindow, WindowRef, WindowResolution};

use super::config::InspectorConfig;
use super::panels::{
    BrowserSearchPlugin, EditorCardPlugin, spawn_browser_panel, spawn_editor_panel,
    sync_browser_panel, sync_entity_previews, sync_tool_bar,
};
use super::state::{InspectorInternal, InspectorState, InspectorWindowState};
use super::widgets::{
    DragValuePlugin, EditorInput, FieldEditorPlugin, FieldEditors, OverlayNotice, PickTargets,
    SELECTION_INSTRUCTIONS, refresh_pick_targets,
};
use crate::browser::Browser;
use crate::tools::ToolsPlugin;

/// Marker component for the inspector window.
#[derive(Component)]
pub struct InspectorWindow;

/// Marker to indicate UI has been initialized.
#[derive(Component)]
struct InspectorUiInitialized;

/// Marker for the notice line in the title bar.
#[derive(Component)]
struct NoticeText;

/// System sets for organizing inspector systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum InspectorSet {
    /// Handle input events.
    Input,
    /// Refresh cached data.
    RefreshCache,
    /// Advance field editors and run tools.
    Tick,
    /// Sync UI with state.
    SyncUI,
}

/// Plugin that manages the inspector window and the live editing overlay.
///
/// Editor cards are shown for `f64` and `Entity` editors. Add
/// [`EditorCardPlugin`] for any other value type you register.
pub struct InspectorWindowPlugin;

impl Plugin for InspectorWindowPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FeathersPlugins)
            .add_plugins((DragValuePlugin, BrowserSearchPlugin, ToolsPlugin))
            .insert_resource(UiTheme(create_dark_theme()));

        if !app.is_plugin_added::<FieldEditorPlugin<Entity>>() {
            app.add_plugins(FieldEditorPlugin::<Entity>::default());
        }

        app.add_plugins((
            EditorCardPlugin::<f64>::default(),
            EditorCardPlugin::<Entity>::default(),
        ))
        // State resources
        .init_resource::<InspectorState>()
        .init_resource::<InspectorConfig>()
        .init_resource::<InspectorWindowState>()
        .init_resource::<EditorInput>()
        .init_resource::<PickTargets>()
        .init_resource::<Browser>()
        // System ordering
        .configure_sets(
            Update,
            (
                InspectorSet::Input,
                InspectorSet::RefreshCache,
                InspectorSet::Tick,
                InspectorSet::SyncUI,
            )
                .chain(),
        )
        .add_observer(show_overlay_notice)
        // Startup
        .add_systems(Startup, setup_inspector_window)
        // Update systems
        .add_systems(
            Update,
            (
                // Input handling
                (gather_editor_input, handle_mouse_wheel_scroll).in_set(InspectorSet::Input),
                // Cache refresh
                refresh_pick_targets.in_set(InspectorSet::RefreshCache),
                // UI sync - chain these to avoid resource conflicts
                (
                    setup_inspector_ui,
                    sync_browser_panel,
                    sync_tool_bar,
                    sync_entity_previews::<Entity>,
                    clear_finished_selection_notice,
                    sync_notice_text,
                )
                    .chain()
                    .in_set(InspectorSet::SyncUI),
                // Cleanup
                handle_window_close,
            ),
        );
    }
}

/// Spawns the inspector window on startup.
fn setup_inspector_window(mut commands: Commands, mut window_state: ResMut<InspectorWindowState>) {
    let window_entity = commands
        .spawn((
            Window {
                title: "Live Inspector".to_string(),
                resolution: WindowResolution::new(900, 650),
                ..default()
            },
            InspectorWindow,
            Visibility::Visible,
            InheritedVisibility::default(),
            ViewVisibility::default(),
        ))
        .id();

    window_state.window_entity = Some(window_entity);
    window_state.is_open = true;

    info!("Inspector window created: {:?}", window_entity);
}

/// Sets up the UI scaffold once the window exists.
fn setup_inspector_ui(
    mut commands: Commands,
    mut window_state: ResMut<InspectorWindowState>,
    config: Res<InspectorConfig>,
    inspector_windows: Query<Entity, (With<InspectorWindow>, Without<InspectorUiInitialized>)>,
) {
    let Some(window_entity) = window_state.window_entity else {
        return;
    };

    if inspector_windows.get(window_entity).is_err() {
        return;
    }

    commands.entity(window_entity).insert(InspectorUiInitialized);

    // Internal so it is never used to project the game cursor
    let camera_entity = commands
        .spawn((
            Camera2d,
            Camera {
                target: RenderTarget::Window(WindowRef::Entity(window_entity)),
                ..default()
            },
            InspectorInternal,
        ))
        .id();
    window_state.camera_entity = Some(camera_entity);

    commands
        .spawn((
            Node {
                width: Percent(100.0),
                height: Percent(100.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            ThemeBackgroundColor(tokens::WINDOW_BG),
            UiTargetCamera(camera_entity),
            InspectorInternal,
        ))
        .with_children(|root| {
            spawn_title_bar(root, &config);

            root.spawn(Node {
                width: Percent(100.0),
                flex_grow: 1.0,
                display: Display::Flex,
                flex_direction: FlexDirection::Row,
                padding: config.panel_padding,
                column_gap: config.column_gap,
                ..default()
            })
            .with_children(|content| {
                // Left panel: browsable entries and their filters
                spawn_browser_panel(content, &config);

                // Right panel: tools and field editors
                spawn_editor_panel(content, &config);
            });
        });

    info!("Inspector UI initialized");
}

fn spawn_title_bar(parent: &mut ChildSpawnerCommands<'_>, config: &InspectorConfig) {
    parent
        .spawn((
            Node {
                width: Percent(100.0),
                height: config.title_bar_height,
                display: Display::Flex,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::SpaceBetween,
                padding: config.panel_padding,
                border: UiRect::bottom(Px(1.0)),
                ..default()
            },
            BorderColor::all(config.border_color),
        ))
        .with_children(|bar| {
            bar.spawn((
                Text::new("Live Inspector"),
                TextFont {
                    font_size: config.title_font_size + 2.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            bar.spawn((
                Text::new(""),
                TextFont {
                    font_size: config.small_font_size,
                    ..default()
                },
                TextColor(config.notice_text_color),
                NoticeText,
            ));
        });
}

/// Builds this frame's [`EditorInput`] from the mouse and the game camera.
fn gather_editor_input(
    mut input: ResMut<EditorInput>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    config: Res<InspectorConfig>,
    windows: Query<(Entity, &Window), With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), Without<InspectorInternal>>,
) {
    let (confirm, cancel) = mouse
        .map(|mouse| {
            (
                mouse.just_pressed(config.confirm_button),
                mouse.just_pressed(config.cancel_button),
            )
        })
        .unwrap_or_default();

    // Cursor positions outside the primary window never hit the world
    let pointer = windows.single().ok().and_then(|(window_entity, window)| {
        let cursor = window.cursor_position()?;
        let (camera, camera_transform) = cameras.iter().find(|(camera, _)| {
            camera.is_active && renders_to_primary(&camera.target, window_entity)
        })?;
        camera.viewport_to_world_2d(camera_transform, cursor).ok()
    });

    *input = EditorInput {
        confirm,
        cancel,
        pointer,
    };
}

/// Whether `target` draws into the primary window `primary`.
fn renders_to_primary(target: &RenderTarget, primary: Entity) -> bool {
    match target {
        RenderTarget::Window(WindowRef::Primary) => true,
        RenderTarget::Window(WindowRef::Entity(window)) => *window == primary,
        _ => false,
    }
}

/// Observer: surface overlay notices in the title bar.
fn show_overlay_notice(trigger: On<OverlayNotice>, mut state: ResMut<InspectorState>) {
    state.notice = Some(trigger.text.clone());
}

/// Drops the selection instructions once no picker is selecting.
fn clear_finished_selection_notice(
    mut state: ResMut<InspectorState>,
    editors: Res<FieldEditors<Entity>>,
) {
    if state.notice.as_deref() != Some(SELECTION_INSTRUCTIONS) {
        return;
    }

    let still_selecting = editors
        .ids()
        .into_iter()
        .filter_map(|id| editors.get(id))
        .any(|editor| editor.is_selecting());
    if !still_selecting {
        state.notice = None;
    }
}

fn sync_notice_text(state: Res<InspectorState>, mut texts: Query<&mut Text, With<NoticeText>>) {
    if !state.is_changed() {
        return;
    }

    for mut text in &mut texts {
        text.0 = state.notice.clone().unwrap_or_default();
    }
}

/// Handles cleanup when the inspector window is closed.
fn handle_window_close(
    mut window_state: ResMut<InspectorWindowState>,
    mut removed_windows: RemovedComponents<Window>,
) {
    for entity in removed_windows.read() {
        if window_state.window_entity == Some(entity) {
            window_state.window_entity = None;
            window_state.camera_entity = None;
            window_state.is_open = false;
            info!("Inspector window closed");
        }
    }
}

/// Handles mouse wheel scrolling by traversing up from hovered entities to find scrollable containers.
fn handle_mouse_wheel_scroll(
    mut mouse_wheel_reader: MessageReader<MouseWheel>,
    hover_map: Res<HoverMap>,
    parents: Query<&ChildOf>,
    mut scrollables: Query<(&mut ScrollPosition, &Node, &ComputedNode)>,
) {
    for event in mouse_wheel_reader.read() {
        let mut delta = Vec2::new(event.x, event.y);
        if event.unit == MouseScrollUnit::Line {
            delta *= 20.0; // Lines to pixels
        }
        delta = -delta;

        for pointer_map in hover_map.values() {
            for &hovered_entity in pointer_map.keys() {
                let mut current = hovered_entity;
                loop {
                    if let Ok((mut scroll_pos, node, computed)) = scrollables.get_mut(current) {
                        if node.overflow.y == OverflowAxis::Scroll && delta.y != 0.0 {
                            let max_y = (computed.content_size().y - computed.size().y).max(0.0)
                                * computed.inverse_scale_factor();
                            scroll_pos.y = (scroll_pos.y + delta.y).clamp(0.0, max_y);
                        }
                        if node.overflow.x == OverflowAxis::Scroll && delta.x != 0.0 {
                            let max_x = (computed.content_size().x - computed.size().x).max(0.0)
                                * computed.inverse_scale_factor();
                            scroll_pos.x = (scroll_pos.x + delta.x).clamp(0.0, max_x);
                        }
                        return;
                    }

                    match parents.get(current) {
                        Ok(child_of) => current = child_of.get(),
                        Err(_) => break,
                    }
                }
            }
        }
    }
}
