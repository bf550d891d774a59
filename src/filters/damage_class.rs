//! Filtering weapons by damage class.

use super::{BrowsableItem, Filter};

/// The class of damage an item deals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageClass {
    /// Deals no class-specific damage and counts as nothing else.
    Default,
    /// Parent of every other class.
    Generic,
    Melee,
    MeleeNoSpeed,
    Ranged,
    Magic,
    Summon,
    SummonMeleeSpeed,
    MagicSummonHybrid,
    Throwing,
}

impl DamageClass {
    pub const ALL: [DamageClass; 10] = [
        DamageClass::Default,
        DamageClass::Generic,
        DamageClass::Melee,
        DamageClass::MeleeNoSpeed,
        DamageClass::Ranged,
        DamageClass::Magic,
        DamageClass::Summon,
        DamageClass::SummonMeleeSpeed,
        DamageClass::MagicSummonHybrid,
        DamageClass::Throwing,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            DamageClass::Default => "Default",
            DamageClass::Generic => "Generic",
            DamageClass::Melee => "Melee",
            DamageClass::MeleeNoSpeed => "Melee (no speed)",
            DamageClass::Ranged => "Ranged",
            DamageClass::Magic => "Magic",
            DamageClass::Summon => "Summon",
            DamageClass::SummonMeleeSpeed => "Summon (melee speed)",
            DamageClass::MagicSummonHybrid => "Magic/Summon",
            DamageClass::Throwing => "Throwing",
        }
    }

    /// Whether damage of this class also counts as `other`.
    ///
    /// Membership, not identity: a class counts as itself, as `Generic`, and as the
    /// classes it inherits from. `Default` only counts as itself.
    pub fn counts_as(self, other: DamageClass) -> bool {
        if self == other {
            return true;
        }

        matches!(
            (self, other),
            (
                DamageClass::Melee
                    | DamageClass::MeleeNoSpeed
                    | DamageClass::Ranged
                    | DamageClass::Magic
                    | DamageClass::Summon
                    | DamageClass::SummonMeleeSpeed
                    | DamageClass::MagicSummonHybrid
                    | DamageClass::Throwing,
                DamageClass::Generic
            ) | (DamageClass::MeleeNoSpeed, DamageClass::Melee)
                | (DamageClass::SummonMeleeSpeed, DamageClass::Summon)
                | (
                    DamageClass::MagicSummonHybrid,
                    DamageClass::Magic | DamageClass::Summon
                )
        )
    }
}

/// What a damage-dealing entry exposes to filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageProfile {
    pub amount: i32,
    pub class: DamageClass,
}

/// Hides everything except entries dealing positive damage that counts as `class`.
pub fn excluded_by_damage_class(item: &dyn BrowsableItem, class: DamageClass) -> bool {
    match item.as_damage_dealing() {
        Some(profile) => !(profile.amount > 0 && profile.class.counts_as(class)),
        None => true,
    }
}

/// A filter keeping only weapons of `class`.
pub fn damage_class_filter(class: DamageClass, icon: impl Into<String>) -> Filter {
    Filter::new(
        icon,
        class.display_name(),
        format!("Items with {}", class.display_name()),
        move |item| excluded_by_damage_class(item, class),
    )
}
