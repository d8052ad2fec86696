//! Item definition schema
//!
//! The authored shape of an item: identity, kind-specific source data,
//! and the rule source records attached to it. Unknown extra fields in
//! authored records are ignored, not rejected.

use runeward_core::{Item, ItemKind, RuleSource};
use serde::{Deserialize, Serialize};

/// Definition of an item carrying rule sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    /// Unique identifier for this item
    pub id: String,
    /// Display name
    pub name: String,
    /// Stable identity slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Kind-specific source data
    #[serde(default = "default_kind")]
    pub kind: ItemKind,
    /// Rule sources, in declaration order
    #[serde(default)]
    pub rules: Vec<RuleSource>,
}

fn default_kind() -> ItemKind {
    ItemKind::Other
}

impl ItemDef {
    /// Instantiate a runtime item from this definition
    pub fn instantiate(&self) -> Item {
        let mut item = Item::new(self.id.clone(), self.name.clone(), self.kind.clone())
            .with_rules(self.rules.clone());
        item.slug = self.slug.clone();
        item
    }
}
