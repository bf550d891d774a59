//! Browser panel for the left side of the inspector.

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::ecs::observer::On;
use bevy::ecs::relationship::Relationship;
use bevy::feathers::controls::{ButtonProps, button};
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input_focus::{FocusedInput, InputFocus};
use bevy::picking::events::{Click, Pointer};
use bevy::prelude::*;
use bevy::ui::Val::*;
use bevy::ui_widgets::{Activate, ControlOrientation, CoreScrollbarThumb, Scrollbar, observe};

use crate::browser::Browser;
use crate::filters::BrowsableItem;
use crate::inspector::config::InspectorConfig;

/// Marker component for the browser panel container.
#[derive(Component)]
pub struct BrowserPanel;

/// Marker for the row of filter toggles.
#[derive(Component)]
pub struct FilterBar;

/// A filter toggle. Stores the filter's index in the [`Browser`].
#[derive(Component)]
pub struct FilterToggle(pub usize);

/// Free-text search box. Holds the typed query.
#[derive(Component, Default)]
pub struct BrowserSearch {
    pub query: String,
}

/// Shown in the search box while the query is empty.
const SEARCH_PLACEHOLDER: &str = "Search...";

/// Marker for the scrollable list of entries.
#[derive(Component)]
pub struct BrowserListContent;

/// Marker for entry rows.
#[derive(Component)]
pub struct BrowserRow;

/// Marker for the "N of M shown" footer.
#[derive(Component)]
pub struct BrowserSummary;

/// System that rebuilds filter toggles and entry rows when the browser changes.
pub fn sync_browser_panel(
    mut commands: Commands,
    browser: Res<Browser>,
    config: Res<InspectorConfig>,
    filter_bar: Query<Entity, With<FilterBar>>,
    list_content: Query<Entity, With<BrowserListContent>>,
    new_content: Query<(), Added<BrowserListContent>>,
    existing: Query<Entity, Or<(With<BrowserRow>, With<FilterToggle>)>>,
    mut summary: Query<&mut Text, With<BrowserSummary>>,
) {
    if !browser.is_changed() && new_content.is_empty() {
        return;
    }

    let (Some(bar_entity), Some(content_entity)) =
        (filter_bar.iter().next(), list_content.iter().next())
    else {
        return;
    };

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    commands.entity(bar_entity).with_children(|bar| {
        for (index, entry) in browser.filters().iter().enumerate() {
            let label = format!("{} {}", entry.filter.icon, entry.filter.title);
            spawn_filter_toggle(bar, index, label, entry.active, &config);
        }
    });

    let visible = browser.visible_items();
    commands.entity(content_entity).with_children(|list| {
        for item in &visible {
            spawn_browser_row(list, *item, &config);
        }
    });

    let total = browser.items().count();
    for mut text in &mut summary {
        text.0 = format!("{} of {} shown", visible.len(), total);
    }
}

fn spawn_filter_toggle(
    parent: &mut ChildSpawnerCommands<'_>,
    index: usize,
    label: String,
    active: bool,
    config: &InspectorConfig,
) {
    parent.spawn((
        button(
            ButtonProps::default(),
            FilterToggle(index),
            Spawn((
                Text::new(label),
                TextFont {
                    font_size: config.small_font_size,
                    ..default()
                },
                TextColor(if active {
                    Color::WHITE
                } else {
                    config.muted_text_color
                }),
            )),
        ),
        observe(on_filter_toggle_click),
    ));
}

/// Spawns a single entry row.
fn spawn_browser_row(
    parent: &mut ChildSpawnerCommands<'_>,
    item: &dyn BrowsableItem,
    config: &InspectorConfig,
) {
    // Truncate long names
    let name = item.name();
    let display_name = if name.chars().count() > 24 {
        format!("{}...", name.chars().take(21).collect::<String>())
    } else {
        name.to_string()
    };

    let label = match item.as_damage_dealing() {
        Some(profile) => format!(
            "{:24} {} | {} {}",
            display_name,
            item.kind(),
            profile.amount,
            profile.class.display_name()
        ),
        None => format!("{:24} {}", display_name, item.kind()),
    };

    parent.spawn((
        Text::new(label),
        TextFont {
            font_size: config.small_font_size,
            ..default()
        },
        TextColor(Color::srgba(0.9, 0.9, 0.9, 1.0)),
        BrowserRow,
    ));
}

/// Observer for filter toggle clicks.
/// Traverses up the parent hierarchy to find the FilterToggle component.
fn on_filter_toggle_click(
    activate: On<Activate>,
    mut browser: ResMut<Browser>,
    toggles: Query<&FilterToggle>,
    parents: Query<&ChildOf>,
) {
    let mut current = activate.entity;
    loop {
        if let Ok(toggle) = toggles.get(current) {
            match browser.toggle_filter(toggle.0) {
                Some(active) => debug!("Filter {} is now {}", toggle.0, active),
                None => warn!("Filter {} no longer exists", toggle.0),
            }
            return;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.get(),
            Err(_) => break,
        }
    }
    warn!("Could not find FilterToggle in hierarchy!");
}

/// Applies one key press to the search query. Returns whether the query changed.
fn edit_search_query(query: &mut String, key: &Key) -> bool {
    match key {
        Key::Backspace => query.pop().is_some(),
        Key::Escape => {
            let had_text = !query.is_empty();
            query.clear();
            had_text
        }
        Key::Space => {
            query.push(' ');
            true
        }
        Key::Character(c) if !c.chars().any(char::is_control) => {
            query.push_str(c);
            true
        }
        _ => false,
    }
}

fn search_label(query: &str, focused: bool) -> String {
    match (query.is_empty(), focused) {
        (true, false) => SEARCH_PLACEHOLDER.to_string(),
        (_, true) => format!("{query}|"),
        (false, false) => query.to_string(),
    }
}

// Observer: focus the search box on click
fn on_search_click(
    mut click: On<Pointer<Click>>,
    searches: Query<(&BrowserSearch, &Children)>,
    mut texts: Query<&mut Text>,
    mut input_focus: ResMut<InputFocus>,
) {
    let Ok((search, children)) = searches.get(click.entity) else {
        return;
    };
    click.propagate(false);
    input_focus.set(click.entity);
    update_search_display(&search_label(&search.query, true), children, &mut texts);
}

/// Observer: type into the focused search box and refilter the browser.
fn on_search_keyboard_input(
    trigger: On<FocusedInput<KeyboardInput>>,
    mut searches: Query<(&mut BrowserSearch, &Children)>,
    mut texts: Query<&mut Text>,
    mut browser: ResMut<Browser>,
    config: Res<InspectorConfig>,
    mut input_focus: ResMut<InputFocus>,
) {
    if trigger.input.state != ButtonState::Pressed {
        return;
    }
    let Ok((mut search, children)) = searches.get_mut(trigger.focused_entity) else {
        return;
    };

    let key = &trigger.input.logical_key;
    if edit_search_query(&mut search.query, key) {
        browser.set_search(&search.query, config.search_threshold);
        debug!("Browser search is now {:?}", search.query);
    }

    let focused = !matches!(key, Key::Enter | Key::Escape);
    if !focused {
        input_focus.clear();
    }
    update_search_display(&search_label(&search.query, focused), children, &mut texts);
}

fn update_search_display(label: &str, children: &Children, texts: &mut Query<&mut Text>) {
    for child in children.iter() {
        if let Ok(mut text) = texts.get_mut(child) {
            text.0 = label.to_string();
        }
    }
}

/// Plugin that adds the browser search box observers.
pub struct BrowserSearchPlugin;

impl Plugin for BrowserSearchPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_search_click)
            .add_observer(on_search_keyboard_input);
    }
}

/// Spawns the browser panel structure.
pub fn spawn_browser_panel(parent: &mut ChildSpawnerCommands<'_>, config: &InspectorConfig) {
    parent
        .spawn((
            Node {
                width: config.left_panel_width,
                height: Percent(100.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                border: UiRect::all(Px(1.0)),
                ..default()
            },
            BorderColor::all(config.border_color),
            BrowserPanel,
        ))
        .with_children(|panel| {
            panel
                .spawn((
                    Node {
                        margin: config.panel_padding,
                        padding: UiRect::horizontal(Px(4.0)),
                        border: UiRect::all(Px(1.0)),
                        ..default()
                    },
                    BorderColor::all(config.border_color),
                    BackgroundColor(Color::srgba(0.15, 0.15, 0.15, 1.0)),
                    BrowserSearch::default(),
                    Interaction::default(),
                ))
                .with_child((
                    Text::new(SEARCH_PLACEHOLDER),
                    TextFont {
                        font_size: config.small_font_size,
                        ..default()
                    },
                    TextColor(config.muted_text_color),
                ));

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
                FilterBar,
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
                                flex_direction: FlexDirection::Column,
                                row_gap: config.item_gap,
                                padding: config.panel_padding,
                                overflow: Overflow::scroll_y(),
                                ..default()
                            },
                            ScrollPosition::default(),
                            BrowserListContent,
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

            panel.spawn((
                Node {
                    padding: config.panel_padding,
                    border: UiRect::top(Px(1.0)),
                    ..default()
                },
                BorderColor::all(config.border_color),
                Text::new(""),
                TextFont {
                    font_size: config.small_font_size,
                    ..default()
                },
                TextColor(config.muted_text_color),
                BrowserSummary,
            ));
        });
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::browser::ItemEntry;
    use crate::filters::{DamageClass, damage_class_filter};

    fn browser_world() -> World {
        let mut world = World::new();
        world.init_resource::<InspectorConfig>();
        world.insert_resource(
            Browser::new()
                .with_item(ItemEntry::weapon("Copper Shortsword", 5, DamageClass::Melee))
                .with_item(ItemEntry::weapon("Wand of Sparking", 8, DamageClass::Magic))
                .with_item(ItemEntry::material("Gel"))
                .with_filter(damage_class_filter(DamageClass::Melee, "melee")),
        );
        world.spawn(FilterBar);
        world.spawn(BrowserListContent);
        world.spawn((Text::new(""), BrowserSummary));
        world
    }

    fn row_count(world: &mut World) -> usize {
        world
            .query_filtered::<(), With<BrowserRow>>()
            .iter(world)
            .count()
    }

    fn summary(world: &mut World) -> String {
        world
            .query_filtered::<&Text, With<BrowserSummary>>()
            .single(world)
            .unwrap()
            .0
            .clone()
    }

    #[test]
    fn lists_every_item_when_no_filter_is_active() {
        let mut world = browser_world();
        world.run_system_once(sync_browser_panel).unwrap();

        assert_eq!(row_count(&mut world), 3);
        assert_eq!(summary(&mut world), "3 of 3 shown");
        let toggles: Vec<usize> = world
            .query::<&FilterToggle>()
            .iter(&world)
            .map(|toggle| toggle.0)
            .collect();
        assert_eq!(toggles, vec![0]);
    }

    fn type_query(
        query: &mut String,
        browser: &mut Browser,
        config: &InspectorConfig,
        text: &str,
    ) {
        for ch in text.chars() {
            let key = Key::Character(ch.to_string().into());
            if edit_search_query(query, &key) {
                browser.set_search(query, config.search_threshold);
            }
        }
    }

    #[test]
    fn search_keys_edit_the_query() {
        let mut query = String::new();
        assert!(edit_search_query(&mut query, &Key::Character("g".into())));
        assert!(edit_search_query(&mut query, &Key::Space));
        assert!(edit_search_query(&mut query, &Key::Backspace));
        assert!(!edit_search_query(&mut query, &Key::Enter));
        assert_eq!(query, "g");

        assert!(edit_search_query(&mut query, &Key::Escape));
        assert!(query.is_empty());
        assert!(!edit_search_query(&mut query, &Key::Backspace));
    }

    #[test]
    fn typed_search_narrows_rows_with_the_configured_threshold() {
        let mut world = browser_world();
        let mut query = String::new();

        world.resource_scope(|world, mut browser: Mut<Browser>| {
            let config = world.resource::<InspectorConfig>();
            type_query(&mut query, &mut browser, config, "wand");
        });
        world.run_system_once(sync_browser_panel).unwrap();
        assert_eq!(row_count(&mut world), 1);
        assert_eq!(summary(&mut world), "1 of 3 shown");

        // A zero threshold lets every name through the fuzzy match
        world.resource_mut::<InspectorConfig>().search_threshold = 0.0;
        world.resource_scope(|world, mut browser: Mut<Browser>| {
            let config = world.resource::<InspectorConfig>();
            type_query(&mut query, &mut browser, config, "zzz");
        });
        world.run_system_once(sync_browser_panel).unwrap();
        assert_eq!(row_count(&mut world), 3);

        edit_search_query(&mut query, &Key::Escape);
        world.resource_mut::<Browser>().set_search(&query, 0.85);
        world.run_system_once(sync_browser_panel).unwrap();
        assert_eq!(summary(&mut world), "3 of 3 shown");
    }

    #[test]
    fn search_label_shows_placeholder_and_cursor() {
        assert_eq!(search_label("", false), SEARCH_PLACEHOLDER);
        assert_eq!(search_label("", true), "|");
        assert_eq!(search_label("gel", true), "gel|");
        assert_eq!(search_label("gel", false), "gel");
    }

    #[test]
    fn toggling_a_filter_rebuilds_rows() {
        let mut world = browser_world();
        world.run_system_once(sync_browser_panel).unwrap();

        world.resource_mut::<Browser>().toggle_filter(0);
        world.run_system_once(sync_browser_panel).unwrap();

        // Only the melee weapon survives the melee filter
        assert_eq!(row_count(&mut world), 1);
        assert_eq!(summary(&mut world), "1 of 3 shown");
        assert_eq!(world.query::<&FilterToggle>().iter(&world).count(), 1);
    }
}
