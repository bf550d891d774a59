//! Browsable lists: entries plus the filters that hide them.

pub mod entries;

use bevy::prelude::*;

use crate::filters::{BrowsableItem, Filter, is_visible, search_filter};

pub use entries::{ItemEntry, NpcEntry};

/// A filter registered with a browser, toggled on and off by the user.
#[derive(Debug)]
pub struct BrowserFilter {
    pub filter: Filter,
    pub active: bool,
}

/// The entries shown in the browser panel and the filters applied to them.
#[derive(Resource, Default)]
pub struct Browser {
    items: Vec<Box<dyn BrowsableItem>>,
    filters: Vec<BrowserFilter>,
    search: Option<Filter>,
}

impl Browser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: impl BrowsableItem) -> Self {
        self.push_item(item);
        self
    }

    /// Adds an inactive filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.add_filter(filter);
        self
    }

    pub fn push_item(&mut self, item: impl BrowsableItem) {
        self.items.push(Box::new(item));
    }

    /// Adds an inactive filter and returns its index.
    pub fn add_filter(&mut self, filter: Filter) -> usize {
        self.filters.push(BrowserFilter {
            filter,
            active: false,
        });
        self.filters.len() - 1
    }

    pub fn items(&self) -> impl Iterator<Item = &dyn BrowsableItem> {
        self.items.iter().map(|item| item.as_ref())
    }

    pub fn filters(&self) -> &[BrowserFilter] {
        &self.filters
    }

    /// Flips a filter on or off, returning its new state.
    pub fn toggle_filter(&mut self, index: usize) -> Option<bool> {
        let entry = self.filters.get_mut(index)?;
        entry.active = !entry.active;
        Some(entry.active)
    }

    /// Replaces the search text. Blank text clears the search.
    pub fn set_search(&mut self, query: &str, threshold: f64) {
        self.search = if query.trim().is_empty() {
            None
        } else {
            Some(search_filter(query, threshold))
        };
    }

    /// Filters currently hiding entries.
    pub fn active_filters(&self) -> impl Iterator<Item = &Filter> {
        self.filters
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| &entry.filter)
            .chain(self.search.as_ref())
    }

    /// Entries not excluded by any active filter, in insertion order.
    pub fn visible_items(&self) -> Vec<&dyn BrowsableItem> {
        self.items()
            .filter(|item| is_visible(*item, self.active_filters()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{DamageClass, damage_class_filter};

    fn armory() -> Browser {
        Browser::new()
            .with_item(ItemEntry::weapon("Iron Broadsword", 12, DamageClass::Melee))
            .with_item(ItemEntry::weapon("Wooden Bow", 4, DamageClass::Ranged))
            .with_item(ItemEntry::material("Gel"))
            .with_item(NpcEntry::new("Guide", 250))
            .with_filter(damage_class_filter(DamageClass::Melee, "Melee"))
            .with_filter(damage_class_filter(DamageClass::Ranged, "Ranged"))
    }

    fn names(browser: &Browser) -> Vec<String> {
        browser
            .visible_items()
            .iter()
            .map(|item| item.name().to_string())
            .collect()
    }

    #[test]
    fn inactive_filters_hide_nothing() {
        assert_eq!(names(&armory()).len(), 4);
    }

    #[test]
    fn toggled_filter_applies() {
        let mut browser = armory();
        assert_eq!(browser.toggle_filter(0), Some(true));
        assert_eq!(names(&browser), vec!["Iron Broadsword"]);

        assert_eq!(browser.toggle_filter(0), Some(false));
        assert_eq!(names(&browser).len(), 4);
        assert_eq!(browser.toggle_filter(7), None);
    }

    #[test]
    fn filters_combine_as_exclusions() {
        let mut browser = armory();
        browser.toggle_filter(0);
        browser.toggle_filter(1);
        assert!(names(&browser).is_empty());
    }

    #[test]
    fn search_narrows_results() {
        let mut browser = armory();
        browser.set_search("bow", 0.9);
        assert_eq!(names(&browser), vec!["Wooden Bow"]);

        browser.set_search("", 0.9);
        assert_eq!(names(&browser).len(), 4);
    }
}
