//! Runeward Core - rule element engine
//!
//! This crate provides a registry-driven system that lets externally
//! authored, declarative records ("rule sources") attach computed
//! behavior to actors and the items they carry:
//! - Dynamic value types and dotted-path roll data (`Value`, `ValueMap`)
//! - Predicate expressions over a roll-option tag set
//! - Arithmetic string formulas and bracketed threshold tables
//! - The rule element base contract and kind registry
//! - Two concrete kinds: base speed and multiple attack penalty
//! - The per-cycle synthetics registry of deferred computations
//! - The toggleable weapon trait resolver (modular / versatile)
//!
//! ## Failure semantics
//!
//! One malformed or inapplicable rule never prevents the rest of an
//! actor's rules from evaluating: validation failures mark the rule
//! ignored and report through the structured diagnostics channel.

pub mod actor;
mod damage;
mod diagnostics;
pub mod element;
pub mod elements;
mod error;
pub mod formula;
mod item;
mod predicate;
mod source;
pub mod synthetics;
pub mod toggle;
mod value;

pub use actor::{Actor, ActorId, ActorKind};
pub use damage::{DamageType, PHYSICAL_DAMAGE_TYPES};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use element::{RuleBuilder, RuleContext, RuleElement, RuleElementBase, RuleRegistry};
pub use elements::{BaseSpeedRuleElement, MultipleAttackPenaltyRuleElement};
pub use error::{Error, Result};
pub use item::{Item, ItemId, ItemKind, ItemSummary, ShieldData, ToggleSelections, WeaponData};
pub use predicate::{Predicate, RollOptions};
pub use source::{Bracket, BracketedValue, RuleSource, RuleValue, DEFAULT_PRIORITY};
pub use synthetics::{
    AttackPenaltySynthetic, DeferredMovement, MovementType, MovementTypeSynthetic, ResolveContext,
    SyntheticsRegistry,
};
pub use toggle::{
    apply_patch, update, AltUsage, DocumentStore, PatchQueue, ToggleTraitParams, ToggleableTrait,
    TogglePatch, TraitToggle, WeaponView,
};
pub use value::{resolve_path, Value, ValueMap};
