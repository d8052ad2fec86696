//! Toggleable weapon traits
//!
//! Derives selectable damage-type options for the `modular` and
//! `versatile` traits from a weapon's trait tags, and commits a
//! selection through exactly one of several ownership-dependent update
//! pathways. The derived `{options, selection}` view is recomputed
//! every time it is read; only the selection itself is persisted, on
//! the item's stored source data.

use crate::actor::{Actor, ActorKind};
use crate::damage::{DamageType, PHYSICAL_DAMAGE_TYPES};
use crate::error::Result;
use crate::item::{Item, ItemId, ItemKind};
use serde::{Deserialize, Serialize};

/// A weapon trait whose effective damage type is player-selectable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleableTrait {
    Modular,
    Versatile,
}

impl ToggleableTrait {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleableTrait::Modular => "modular",
            ToggleableTrait::Versatile => "versatile",
        }
    }
}

/// The derived view of one toggleable trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitToggle {
    pub options: Vec<DamageType>,
    pub selection: Option<DamageType>,
}

/// How a weapon view relates to its stored item, when not directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AltUsage {
    Melee,
    Thrown,
}

/// A weapon as seen by the toggle resolver
///
/// May be the stored item itself, an alternate usage profile of it, or
/// a shield's integrated weapon usage; `item_id` always names the
/// stored item a commit would write to.
#[derive(Debug, Clone)]
pub struct WeaponView {
    pub item_id: ItemId,
    pub slug: String,
    pub damage_type: DamageType,
    pub traits: Vec<String>,
    /// Persisted selections from the item's stored source data
    pub persisted_modular: Option<DamageType>,
    pub persisted_versatile: Option<DamageType>,
    /// Set when this view is an alternate usage of the stored item
    pub alt_usage: Option<AltUsage>,
}

impl WeaponView {
    /// View an actor's stored weapon item directly
    pub fn of_item(item: &Item) -> Option<Self> {
        let weapon = item.weapon()?;
        Some(Self {
            item_id: item.id.clone(),
            slug: item.slug.clone().unwrap_or_default(),
            damage_type: weapon.damage_type,
            traits: weapon.traits.clone(),
            persisted_modular: weapon.toggles.modular,
            persisted_versatile: weapon.toggles.versatile,
            alt_usage: None,
        })
    }

    pub fn with_alt_usage(mut self, usage: AltUsage) -> Self {
        self.alt_usage = Some(usage);
        self
    }

    /// Collect selectable damage types for one toggleable trait
    fn resolve_options(&self, toggle: ToggleableTrait) -> Vec<DamageType> {
        let mut options: Vec<DamageType> = Vec::new();
        let mut push = |ty: DamageType| {
            if !options.contains(&ty) {
                options.push(ty);
            }
        };

        for tag in &self.traits {
            match toggle {
                ToggleableTrait::Modular => {
                    if tag == "modular" {
                        PHYSICAL_DAMAGE_TYPES.into_iter().for_each(&mut push);
                    }
                }
                ToggleableTrait::Versatile => {
                    if let Some(code) = tag.strip_prefix("versatile-") {
                        // Unrecognized codes contribute nothing
                        if let Some(ty) = DamageType::from_versatile_code(code) {
                            push(ty);
                        }
                    }
                }
            }
        }

        if toggle == ToggleableTrait::Versatile {
            // Versatile into the weapon's own base type is meaningless
            options.retain(|ty| *ty != self.damage_type);
        }
        options
    }

    /// Derived modular options and selection
    ///
    /// The persisted selection is preserved if still among the derived
    /// options; otherwise the weapon's base damage type is the implied
    /// selection when it is itself an option.
    pub fn modular(&self) -> TraitToggle {
        let options = self.resolve_options(ToggleableTrait::Modular);
        let selection = match self.persisted_modular {
            Some(persisted) if options.contains(&persisted) => Some(persisted),
            _ if options.contains(&self.damage_type) => Some(self.damage_type),
            _ => None,
        };
        TraitToggle { options, selection }
    }

    /// Derived versatile options and selection
    ///
    /// The persisted selection is preserved only if still among the
    /// derived options; otherwise it resets to none.
    pub fn versatile(&self) -> TraitToggle {
        let options = self.resolve_options(ToggleableTrait::Versatile);
        let selection = self
            .persisted_versatile
            .filter(|persisted| options.contains(persisted));
        TraitToggle { options, selection }
    }

    pub fn toggle(&self, toggle: ToggleableTrait) -> TraitToggle {
        match toggle {
            ToggleableTrait::Modular => self.modular(),
            ToggleableTrait::Versatile => self.versatile(),
        }
    }
}

/// A requested selection change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToggleTraitParams {
    pub toggle: ToggleableTrait,
    pub selection: Option<DamageType>,
}

/// One write against an item's stored source data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TogglePatch {
    /// Write the weapon's own toggle field
    ToggleSelection {
        toggle: ToggleableTrait,
        selection: Option<DamageType>,
    },
    /// Write the melee alternate-usage toggle field
    MeleeUsageToggle {
        toggle: ToggleableTrait,
        selection: Option<DamageType>,
    },
    /// Write the shield's integrated-versatile selection field
    IntegratedVersatile { selection: Option<DamageType> },
}

/// Persistence collaborator for toggle commits
///
/// The engine only calls this on explicit user action, never during
/// data preparation; a committed patch takes effect in a future cycle.
/// Hosts with an asynchronous document transport implement this by
/// enqueueing the patch.
pub trait DocumentStore {
    fn update_item(&mut self, id: &ItemId, patch: TogglePatch) -> Result<()>;
}

/// In-memory document store: queues patches for the host to apply
/// before the next data-preparation cycle
#[derive(Debug, Default)]
pub struct PatchQueue {
    pub patches: Vec<(ItemId, TogglePatch)>,
}

impl PatchQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for PatchQueue {
    fn update_item(&mut self, id: &ItemId, patch: TogglePatch) -> Result<()> {
        self.patches.push((id.clone(), patch));
        Ok(())
    }
}

/// Apply a committed patch to an item's stored source data
pub fn apply_patch(item: &mut Item, patch: &TogglePatch) -> Result<()> {
    use crate::error::Error;

    let unsupported = |reason: &str| Error::UnsupportedPatch {
        item: item.id.to_string(),
        reason: reason.to_string(),
    };

    match (patch, &mut item.kind) {
        (TogglePatch::ToggleSelection { toggle, selection }, ItemKind::Weapon(weapon)) => {
            match toggle {
                ToggleableTrait::Modular => weapon.toggles.modular = *selection,
                ToggleableTrait::Versatile => weapon.toggles.versatile = *selection,
            }
            Ok(())
        }
        (TogglePatch::MeleeUsageToggle { toggle, selection }, ItemKind::Weapon(weapon)) => {
            match toggle {
                ToggleableTrait::Modular => weapon.melee_usage_toggles.modular = *selection,
                ToggleableTrait::Versatile => weapon.melee_usage_toggles.versatile = *selection,
            }
            Ok(())
        }
        (TogglePatch::IntegratedVersatile { selection }, ItemKind::Shield(shield)) => {
            shield.integrated_versatile = *selection;
            Ok(())
        }
        (TogglePatch::IntegratedVersatile { .. }, _) => {
            Err(unsupported("integrated-versatile patch on a non-shield"))
        }
        _ => Err(unsupported("weapon toggle patch on a non-weapon")),
    }
}

/// Commit a selection change through exactly one ownership pathway
///
/// Returns `Ok(false)` without writing when the actor is not a
/// player-controlled character or the requested selection equals the
/// current one. Otherwise the first matching pathway wins:
/// 1. the weapon is the actor's own item record;
/// 2. the weapon is a melee alternate-usage profile of the item;
/// 3. a versatile toggle on an item that is structurally a shield;
/// 4. delegate to a matching, non-ignored strike-style rule element.
/// The call reports `Ok(true)` after the pathway step even when the
/// pathway-4 delegate is absent and nothing was written.
pub fn update(
    actor: &Actor,
    view: &WeaponView,
    params: ToggleTraitParams,
    store: &mut dyn DocumentStore,
) -> Result<bool> {
    if actor.kind != ActorKind::Character {
        return Ok(false);
    }

    let current = view.toggle(params.toggle).selection;
    if current == params.selection {
        return Ok(false);
    }

    let item = actor.item(&view.item_id);
    match item {
        Some(item) if item.is_weapon() && view.alt_usage.is_none() => {
            store.update_item(
                &item.id,
                TogglePatch::ToggleSelection {
                    toggle: params.toggle,
                    selection: params.selection,
                },
            )?;
        }
        Some(item) if item.is_weapon() && view.alt_usage == Some(AltUsage::Melee) => {
            store.update_item(
                &item.id,
                TogglePatch::MeleeUsageToggle {
                    toggle: params.toggle,
                    selection: params.selection,
                },
            )?;
        }
        Some(item) if params.toggle == ToggleableTrait::Versatile && item.is_shield() => {
            store.update_item(
                &item.id,
                TogglePatch::IntegratedVersatile {
                    selection: params.selection,
                },
            )?;
        }
        _ => {
            if let Some(rule) = item.and_then(|item| {
                item.rules.iter().find(|rule| {
                    rule.key() == "strike"
                        && !rule.ignored()
                        && rule.slug() == Some(view.slug.as_str())
                })
            }) {
                rule.toggle_trait(&params, store)?;
            }
        }
    }

    Ok(true)
}
