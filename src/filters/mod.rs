//! Predicate filters that hide entries in browsable lists.
//!
//! A filter answers one question per entry: should it be hidden? Filters never see
//! concrete entry types; they query capabilities through [`BrowsableItem`]. An entry
//! is shown only when no active filter excludes it.

pub mod damage_class;
pub mod search;

pub use damage_class::{DamageClass, DamageProfile, damage_class_filter};
pub use search::search_filter;

/// An entry that can be listed in a browser panel.
pub trait BrowsableItem: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Short label for the kind of entry, e.g. "Item" or "NPC".
    fn kind(&self) -> &'static str;

    /// Damage information, for entries that deal damage.
    fn as_damage_dealing(&self) -> Option<DamageProfile> {
        None
    }
}

/// Returns `true` to hide an entry.
pub type Predicate = Box<dyn Fn(&dyn BrowsableItem) -> bool + Send + Sync>;

/// A named, iconified exclusion predicate.
pub struct Filter {
    /// Icon key shown on the filter toggle.
    pub icon: String,
    pub title: String,
    pub description: String,
    predicate: Predicate,
}

impl Filter {
    pub fn new(
        icon: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        predicate: impl Fn(&dyn BrowsableItem) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Whether this filter hides `item`.
    pub fn should_exclude(&self, item: &dyn BrowsableItem) -> bool {
        (self.predicate)(item)
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("icon", &self.icon)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// An entry is visible iff none of `filters` excludes it.
pub fn is_visible<'a>(
    item: &dyn BrowsableItem,
    filters: impl IntoIterator<Item = &'a Filter>,
) -> bool {
    !filters.into_iter().any(|filter| filter.should_exclude(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{ItemEntry, NpcEntry};

    #[test]
    fn no_filters_shows_everything() {
        let npc = NpcEntry::new("Guide", 250);
        assert!(is_visible(&npc, []));
    }

    #[test]
    fn any_exclusion_hides() {
        let sword = ItemEntry::weapon("Copper Shortsword", 5, DamageClass::Melee);
        let melee = damage_class_filter(DamageClass::Melee, "Melee");
        let magic = damage_class_filter(DamageClass::Magic, "Magic");
        let keep_all = Filter::new("All", "All", "Keeps everything", |_| false);

        assert!(is_visible(&sword, [&melee, &keep_all]));
        assert!(!is_visible(&sword, [&melee, &magic]));
        assert!(!is_visible(&sword, [&keep_all, &magic]));
    }

    #[test]
    fn custom_predicates_see_capabilities() {
        let hits_hard = Filter::new("Strong", "Strong", "Damage of 50 or more", |item| {
            item.as_damage_dealing()
                .is_none_or(|profile| profile.amount < 50)
        });

        let club = ItemEntry::weapon("Pwnhammer", 26, DamageClass::Melee);
        let zenith = ItemEntry::weapon("Zenith", 190, DamageClass::Melee);
        assert!(hits_hard.should_exclude(&club));
        assert!(!hits_hard.should_exclude(&zenith));
        assert!(hits_hard.should_exclude(&NpcEntry::new("Merchant", 250)));
    }
}
