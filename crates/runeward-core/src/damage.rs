//! Damage type catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// A damage type recognized by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    // Base physical types
    Bludgeoning,
    Piercing,
    Slashing,
    // Energy
    Acid,
    Cold,
    Electricity,
    Fire,
    Sonic,
    Force,
    Vitality,
    Void,
    // Other
    Mental,
    Poison,
    Spirit,
    Bleed,
    Untyped,
}

/// The three base physical damage types, in catalog order
pub const PHYSICAL_DAMAGE_TYPES: [DamageType; 3] = [
    DamageType::Bludgeoning,
    DamageType::Piercing,
    DamageType::Slashing,
];

impl DamageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Piercing => "piercing",
            DamageType::Slashing => "slashing",
            DamageType::Acid => "acid",
            DamageType::Cold => "cold",
            DamageType::Electricity => "electricity",
            DamageType::Fire => "fire",
            DamageType::Sonic => "sonic",
            DamageType::Force => "force",
            DamageType::Vitality => "vitality",
            DamageType::Void => "void",
            DamageType::Mental => "mental",
            DamageType::Poison => "poison",
            DamageType::Spirit => "spirit",
            DamageType::Bleed => "bleed",
            DamageType::Untyped => "untyped",
        }
    }

    /// Look up a damage type by its full catalog name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bludgeoning" => Some(DamageType::Bludgeoning),
            "piercing" => Some(DamageType::Piercing),
            "slashing" => Some(DamageType::Slashing),
            "acid" => Some(DamageType::Acid),
            "cold" => Some(DamageType::Cold),
            "electricity" => Some(DamageType::Electricity),
            "fire" => Some(DamageType::Fire),
            "sonic" => Some(DamageType::Sonic),
            "force" => Some(DamageType::Force),
            "vitality" => Some(DamageType::Vitality),
            "void" => Some(DamageType::Void),
            "mental" => Some(DamageType::Mental),
            "poison" => Some(DamageType::Poison),
            "spirit" => Some(DamageType::Spirit),
            "bleed" => Some(DamageType::Bleed),
            "untyped" => Some(DamageType::Untyped),
            _ => None,
        }
    }

    /// Decode a versatile trait code: the three one-letter codes map to
    /// the base physical types, anything else goes through the catalog
    pub fn from_versatile_code(code: &str) -> Option<Self> {
        match code {
            "b" => Some(DamageType::Bludgeoning),
            "p" => Some(DamageType::Piercing),
            "s" => Some(DamageType::Slashing),
            other => Self::from_name(other),
        }
    }

    /// Whether this is one of the three base physical types
    pub fn is_physical(&self) -> bool {
        PHYSICAL_DAMAGE_TYPES.contains(self)
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
