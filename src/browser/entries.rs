//! Entry types listed by the browser.

use crate::filters::{BrowsableItem, DamageClass, DamageProfile};

/// An inventory item.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemEntry {
    pub name: String,
    pub damage: i32,
    pub damage_class: DamageClass,
}

impl ItemEntry {
    pub fn weapon(name: impl Into<String>, damage: i32, damage_class: DamageClass) -> Self {
        Self {
            name: name.into(),
            damage,
            damage_class,
        }
    }

    /// An item that deals no damage.
    pub fn material(name: impl Into<String>) -> Self {
        Self::weapon(name, 0, DamageClass::Default)
    }
}

impl BrowsableItem for ItemEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "Item"
    }

    fn as_damage_dealing(&self) -> Option<DamageProfile> {
        Some(DamageProfile {
            amount: self.damage,
            class: self.damage_class,
        })
    }
}

/// A creature that can be spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct NpcEntry {
    pub name: String,
    pub life: i32,
}

impl NpcEntry {
    pub fn new(name: impl Into<String>, life: i32) -> Self {
        Self {
            name: name.into(),
            life,
        }
    }
}

impl BrowsableItem for NpcEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "NPC"
    }
}
