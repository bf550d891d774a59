//! Editor panel for the right side of the inspector.
//! Contains the tool bar and one card per registered field editor.

use core::any::TypeId;
use core::marker::PhantomData;

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::ecs::observer::On;
use bevy::ecs::relationship::Relationship;
use bevy::feathers::controls::{ButtonProps, button};
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::ui::Val::*;
use bevy::ui_widgets::{Activate, ControlOrientation, CoreScrollbarThumb, Scrollbar, observe};

use crate::inspector::config::InspectorConfig;
use crate::inspector::plugin::InspectorSet;
use crate::inspector::widgets::{
    DragValue, EditorId, EditorValue, FieldEditor, FieldEditors, ValueWidget, WorldEntity,
    spawn_drag_value,
};
use crate::tools::{ActivateTool, ToolRegistry};

/// Marker component for the editor panel container.
#[derive(Component)]
pub struct EditorPanel;

/// Marker for the row holding tool buttons.
#[derive(Component)]
pub struct ToolBar;

/// A tool button. Stores the tool's icon key.
#[derive(Component)]
pub struct ToolButton(pub String);

/// Marker for the scrollable list of editor cards.
#[derive(Component)]
pub struct EditorCardList;

/// A card showing one `FieldEditor<T>`.
#[derive(Component)]
pub struct EditorCard<T: EditorValue> {
    pub id: EditorId,
    marker: PhantomData<fn() -> T>,
}

/// Text showing an editor's current value.
#[derive(Component)]
pub struct EditorValueText<T: EditorValue> {
    pub id: EditorId,
    marker: PhantomData<fn() -> T>,
}

/// Text showing what an entity picker is tracking.
#[derive(Component)]
pub struct EntityPreviewText<T: EditorValue> {
    pub id: EditorId,
    marker: PhantomData<fn() -> T>,
}

/// Button that puts an entity picker into selection mode.
#[derive(Component)]
pub struct PickButton<T: EditorValue> {
    pub id: EditorId,
    marker: PhantomData<fn() -> T>,
}

macro_rules! impl_editor_marker {
    ($($ty:ident),*) => {$(
        impl<T: EditorValue> $ty<T> {
            pub fn new(id: EditorId) -> Self {
                Self {
                    id,
                    marker: PhantomData,
                }
            }
        }
    )*};
}

impl_editor_marker!(EditorCard, EditorValueText, EntityPreviewText, PickButton);

/// Spawns and retires cards so every `FieldEditor<T>` has exactly one.
pub fn sync_editor_cards<T: EditorValue>(
    mut commands: Commands,
    editors: Res<FieldEditors<T>>,
    config: Res<InspectorConfig>,
    card_list: Query<Entity, With<EditorCardList>>,
    cards: Query<(Entity, &EditorCard<T>)>,
) {
    let Some(list_entity) = card_list.iter().next() else {
        return;
    };

    let mut shown = HashSet::new();
    for (card_entity, card) in &cards {
        if editors.get(card.id).is_some() {
            shown.insert(card.id);
        } else {
            commands.entity(card_entity).despawn();
        }
    }

    let missing: Vec<EditorId> = editors
        .ids()
        .into_iter()
        .filter(|id| !shown.contains(id))
        .collect();
    if missing.is_empty() {
        return;
    }

    commands.entity(list_entity).with_children(|list| {
        for id in missing {
            if let Some(editor) = editors.get(id) {
                spawn_editor_card(list, id, editor, &config);
            }
        }
    });
}

/// Spawns a card: title, type, description, and the value widget.
fn spawn_editor_card<T: EditorValue>(
    parent: &mut ChildSpawnerCommands<'_>,
    id: EditorId,
    editor: &FieldEditor<T>,
    config: &InspectorConfig,
) {
    parent
        .spawn((
            Node {
                width: config.editor_card_width,
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                row_gap: config.item_gap,
                padding: config.panel_padding,
                border: UiRect::all(Px(1.0)),
                ..default()
            },
            BorderColor::all(config.border_color),
            BackgroundColor(Color::srgba(0.12, 0.12, 0.12, 1.0)),
            EditorCard::<T>::new(id),
        ))
        .with_children(|card| {
            // Header: name and type
            card.spawn(Node {
                display: Display::Flex,
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                column_gap: config.column_gap,
                ..default()
            })
            .with_children(|header| {
                header.spawn((
                    Text::new(editor.name()),
                    TextFont {
                        font_size: config.body_font_size,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
                header.spawn((
                    Text::new(editor.type_name()),
                    TextFont {
                        font_size: config.small_font_size,
                        ..default()
                    },
                    TextColor(config.muted_text_color),
                ));
            });

            if !editor.description().is_empty() {
                card.spawn((
                    Text::new(editor.description()),
                    TextFont {
                        font_size: config.small_font_size,
                        ..default()
                    },
                    TextColor(config.muted_text_color),
                ));
            }

            if editor.is_entity_picker() {
                spawn_picker_row::<T>(card, id, config);
            } else if T::WIDGET == ValueWidget::Drag && TypeId::of::<T>() == TypeId::of::<f64>() {
                spawn_drag_value(card, DragValue::new(id), config);
            } else {
                card.spawn((
                    Text::new("-"),
                    TextFont {
                        font_size: config.small_font_size,
                        ..default()
                    },
                    TextColor(Color::srgba(0.9, 0.9, 0.6, 1.0)),
                    EditorValueText::<T>::new(id),
                ));
            }
        });
}

fn spawn_picker_row<T: EditorValue>(
    parent: &mut ChildSpawnerCommands<'_>,
    id: EditorId,
    config: &InspectorConfig,
) {
    parent
        .spawn(Node {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: config.column_gap,
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                button(
                    ButtonProps::default(),
                    PickButton::<T>::new(id),
                    Spawn((
                        Text::new("Pick"),
                        TextFont {
                            font_size: config.small_font_size,
                            ..default()
                        },
                    )),
                ),
                observe(on_pick_button_click::<T>),
            ));
            row.spawn((
                Text::new("None"),
                TextFont {
                    font_size: config.small_font_size,
                    ..default()
                },
                TextColor(Color::srgba(0.9, 0.9, 0.6, 1.0)),
                EntityPreviewText::<T>::new(id),
            ));
        });
}

/// Observer: start selecting when a Pick button is pressed.
fn on_pick_button_click<T: EditorValue>(
    activate: On<Activate>,
    buttons: Query<&PickButton<T>>,
    mut editors: ResMut<FieldEditors<T>>,
    mut commands: Commands,
) {
    let Ok(pick) = buttons.get(activate.entity) else {
        return;
    };

    let started = editors
        .get_mut(pick.id)
        .and_then(|editor| editor.start_selection(&mut commands));
    if let Err(err) = started {
        warn!("{err}");
    }
}

/// Mirrors editor values into their value texts.
pub fn sync_editor_value_text<T: EditorValue>(
    editors: Res<FieldEditors<T>>,
    mut texts: Query<(&EditorValueText<T>, &mut Text)>,
) {
    for (value_text, mut text) in &mut texts {
        let label = editors
            .get(value_text.id)
            .and_then(|editor| editor.value())
            .map(|value| value.display_value())
            .unwrap_or_else(|| "-".to_string());
        if text.0 != label {
            text.0 = label;
        }
    }
}

/// Exclusive system that refreshes entity picker previews.
/// Needs the whole world to check liveness and positions.
pub fn sync_entity_previews<T: WorldEntity>(world: &mut World) {
    let mut query = world.query::<(Entity, &EntityPreviewText<T>)>();
    let labels: Vec<(Entity, String)> = {
        let Some(editors) = world.get_resource::<FieldEditors<T>>() else {
            return;
        };
        query
            .iter(world)
            .filter_map(|(entity, preview)| {
                let editor = editors.get(preview.id)?;
                Some((entity, editor.preview_label(world)))
            })
            .collect()
    };

    for (entity, label) in labels {
        if let Some(mut text) = world.get_mut::<Text>(entity)
            && text.0 != label
        {
            text.0 = label;
        }
    }
}

/// Adds a button to the tool bar for every registered tool.
pub fn sync_tool_bar(
    mut commands: Commands,
    registry: Res<ToolRegistry>,
    config: Res<InspectorConfig>,
    tool_bar: Query<Entity, With<ToolBar>>,
    buttons: Query<&ToolButton>,
) {
    let Some(bar_entity) = tool_bar.iter().next() else {
        return;
    };

    let shown: HashSet<&str> = buttons.iter().map(|button| button.0.as_str()).collect();
    let missing: Vec<(&'static str, &'static str)> = registry
        .iter()
        .filter(|tool| !shown.contains(tool.icon_key()))
        .map(|tool| (tool.icon_key(), tool.display_name()))
        .collect();
    if missing.is_empty() {
        return;
    }

    commands.entity(bar_entity).with_children(|bar| {
        for (icon_key, display_name) in missing {
            bar.spawn((
                button(
                    ButtonProps::default(),
                    ToolButton(icon_key.to_string()),
                    Spawn((
                        Text::new(display_name),
                        TextFont {
                            font_size: config.small_font_size,
                            ..default()
                        },
                    )),
                ),
                observe(on_tool_button_click),
            ));
        }
    });
}

/// Observer for tool button clicks.
/// Traverses up the parent hierarchy to find the ToolButton component.
fn on_tool_button_click(
    activate: On<Activate>,
    buttons: Query<&ToolButton>,
    parents: Query<&ChildOf>,
    mut commands: Commands,
) {
    let mut current = activate.entity;
    loop {
        if let Ok(tool_button) = buttons.get(current) {
            commands.trigger(ActivateTool {
                icon_key: tool_button.0.clone(),
            });
            return;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.get(),
            Err(_) => break,
        }
    }
    warn!("Could not find ToolButton in hierarchy!");
}

/// Spawns the editor panel structure.
pub fn spawn_editor_panel(parent: &mut ChildSpawnerCommands<'_>, config: &InspectorConfig) {
    parent
        .spawn((
            Node {
                flex_grow: 1.0,
                height: Percent(100.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                border: UiRect::all(Px(1.0)),
                ..default()
            },
            BorderColor::all(config.border_color),
            EditorPanel,
        ))
        .with_children(|panel| {
            panel.spawn((
                Node {
                    width: Percent(100.0),
                    display: Display::Flex,
                    flex_direction: FlexDirection::Row,
                    flex_wrap: FlexWrap::Wrap,
                    column_gap: config.item_gap,
                    row_gap: config.item_gap,
                    padding: config.panel_padding,
                    border: UiRect::bottom(Px(1.0)),
                    ..default()
                },
                BorderColor::all(config.border_color),
                ToolBar,
            ));

            // Scrollable area with scrollbar - use Grid layout
            let scrollbar_width = 8.0;
            panel
                .spawn(Node {
                    width: Percent(100.0),
                    flex_grow: 1.0,
                    display: Display::Grid,
                    grid_template_columns: vec![GridTrack::fr(1.0), GridTrack::px(scrollbar_width)],
                    ..default()
                })
                .with_children(|scroll_area| {
                    let content_id = scroll_area
                        .spawn((
                            Node {
                                display: Display::Flex,
                                flex_direction: FlexDirection::Row,
                                flex_wrap: FlexWrap::Wrap,
                                align_content: AlignContent::FlexStart,
                                column_gap: config.column_gap,
                                row_gap: config.column_gap,
                                padding: config.panel_padding,
                                overflow: Overflow::scroll_y(),
                                ..default()
                            },
                            ScrollPosition::default(),
                            EditorCardList,
                        ))
                        .id();

                    scroll_area
                        .spawn((
                            Scrollbar {
                                target: content_id,
                                orientation: ControlOrientation::Vertical,
                                min_thumb_length: 20.0,
                            },
                            Node {
                                width: Px(scrollbar_width),
                                height: Percent(100.0),
                                ..default()
                            },
                            BackgroundColor(Color::srgba(0.15, 0.15, 0.15, 0.5)),
                        ))
                        .with_children(|sb| {
                            sb.spawn((
                                CoreScrollbarThumb,
                                Node {
                                    width: Percent(100.0),
                                    ..default()
                                },
                                BackgroundColor(Color::srgba(0.5, 0.5, 0.5, 0.8)),
                            ));
                        });
                });
        });
}

/// Shows cards for every `FieldEditor<T>` in the inspector window.
pub struct EditorCardPlugin<T>(PhantomData<fn() -> T>);

impl<T> Default for EditorCardPlugin<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: EditorValue> Plugin for EditorCardPlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (sync_editor_cards::<T>, sync_editor_value_text::<T>)
                .chain()
                .in_set(InspectorSet::SyncUI),
        );
    }
}
