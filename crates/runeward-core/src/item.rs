//! Owning-item boundary
//!
//! An item declares rule sources and owns the rule elements
//! reconstructed from them each cycle. Weapons and shields carry the
//! persisted source data the toggle resolver reads and writes.

use crate::damage::DamageType;
use crate::element::RuleElement;
use crate::source::RuleSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for an item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// Persisted toggle selections on a weapon's source data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToggleSelections {
    #[serde(default)]
    pub modular: Option<DamageType>,
    #[serde(default)]
    pub versatile: Option<DamageType>,
}

/// Weapon source data read by the toggle resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponData {
    /// Base damage type
    pub damage_type: DamageType,
    /// Trait tags (e.g. "modular", "versatile-p", "agile")
    #[serde(default)]
    pub traits: Vec<String>,
    /// Persisted toggle selections for the weapon itself
    #[serde(default)]
    pub toggles: ToggleSelections,
    /// Persisted toggle selections for the melee alternate usage
    #[serde(default)]
    pub melee_usage_toggles: ToggleSelections,
}

/// Shield source data: the integrated weapon usage's versatile selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldData {
    #[serde(default)]
    pub integrated_versatile: Option<DamageType>,
}

/// What kind of item this is, with kind-specific source data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(WeaponData),
    Shield(ShieldData),
    Other,
}

/// An item owned by an actor
#[derive(Debug)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Stable identity slug
    pub slug: Option<String>,
    pub kind: ItemKind,
    /// Authored rule records, construction input for rule elements
    pub rule_sources: Vec<RuleSource>,
    /// Rule elements reconstructed from the sources each cycle
    pub rules: Vec<Box<dyn RuleElement>>,
}

/// The slice of item identity a rule element hook can see
#[derive(Debug, Clone)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
    pub slug: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            slug: None,
            kind,
            rule_sources: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_rules(mut self, sources: Vec<RuleSource>) -> Self {
        self.rule_sources = sources;
        self
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon(_))
    }

    pub fn is_shield(&self) -> bool {
        matches!(self.kind, ItemKind::Shield(_))
    }

    pub fn weapon(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(data) => Some(data),
            _ => None,
        }
    }

    pub fn weapon_mut(&mut self) -> Option<&mut WeaponData> {
        match &mut self.kind {
            ItemKind::Weapon(data) => Some(data),
            _ => None,
        }
    }

    pub fn shield(&self) -> Option<&ShieldData> {
        match &self.kind {
            ItemKind::Shield(data) => Some(data),
            _ => None,
        }
    }

    pub fn shield_mut(&mut self) -> Option<&mut ShieldData> {
        match &mut self.kind {
            ItemKind::Shield(data) => Some(data),
            _ => None,
        }
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_queries() {
        let weapon = Item::new(
            "w1",
            "Elven Branched Spear",
            ItemKind::Weapon(WeaponData {
                damage_type: DamageType::Piercing,
                traits: vec!["finesse".into()],
                toggles: ToggleSelections::default(),
                melee_usage_toggles: ToggleSelections::default(),
            }),
        )
        .with_slug("elven-branched-spear");

        assert!(weapon.is_weapon());
        assert!(!weapon.is_shield());
        assert_eq!(weapon.weapon().unwrap().damage_type, DamageType::Piercing);
        assert_eq!(weapon.summary().slug.as_deref(), Some("elven-branched-spear"));

        let other = Item::new("x1", "Healer's Kit", ItemKind::Other);
        assert!(other.weapon().is_none());
        assert!(other.shield().is_none());
    }
}
