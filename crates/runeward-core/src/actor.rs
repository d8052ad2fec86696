//! Owning-actor boundary and the data-preparation cycle
//!
//! An actor owns its items, its roll data and roll-option tag set, and
//! a synthetics registry that is cleared and fully rebuilt every
//! cycle. Rule elements never diff against previous state.

use crate::diagnostics::Diagnostics;
use crate::element::{RuleContext, RuleRegistry};
use crate::item::{Item, ItemId};
use crate::predicate::RollOptions;
use crate::synthetics::{ResolveContext, SyntheticsRegistry};
use crate::value::ValueMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl ActorId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// Creature type of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    /// Player-controlled creature
    Character,
    Npc,
    Familiar,
}

/// An actor and the per-cycle state rule elements read and write
#[derive(Debug)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub name: String,
    /// Dotted-path-resolvable roll data (read by formulas and templates)
    pub roll_data: ValueMap,
    /// Current roll-option tag set (read by predicates)
    pub roll_options: RollOptions,
    /// Items in stable, deterministic order
    pub items: Vec<Item>,
    /// Write target for rule elements; rebuilt every cycle
    pub synthetics: SyntheticsRegistry,
}

impl Actor {
    pub fn new(id: ActorId, kind: ActorKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            roll_data: ValueMap::new(),
            roll_options: RollOptions::new(),
            items: Vec::new(),
            synthetics: SyntheticsRegistry::new(),
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// The read-only view deferred computations resolve against
    pub fn resolve_context(&self) -> ResolveContext<'_> {
        ResolveContext {
            roll_data: &self.roll_data,
            options: &self.roll_options,
        }
    }

    /// Run one data-preparation cycle
    ///
    /// Clears the synthetics registry, reconstructs every item's rule
    /// elements from their sources, and runs each element's
    /// `before_prepare_data` hook. Within one item, elements run in
    /// ascending priority with ties kept in declaration order; items
    /// are processed in their stored order. Single-threaded and
    /// synchronous throughout.
    pub fn prepare_data(&mut self, registry: &RuleRegistry) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        self.synthetics.clear();

        let Self {
            items,
            synthetics,
            roll_data,
            roll_options,
            ..
        } = self;

        for item in items.iter_mut() {
            let summary = item.summary();

            let mut rules: Vec<_> = item
                .rule_sources
                .iter()
                .cloned()
                .filter_map(|source| registry.construct(source, &mut diagnostics))
                .collect();
            // Stable sort: ties keep declaration order
            rules.sort_by_key(|rule| rule.priority());

            for rule in rules.iter_mut() {
                let mut ctx = RuleContext {
                    item: &summary,
                    roll_data: &*roll_data,
                    options: &*roll_options,
                    synthetics: &mut *synthetics,
                    diagnostics: &mut diagnostics,
                };
                rule.before_prepare_data(&mut ctx);
            }

            item.rules = rules;
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use crate::source::{RuleSource, RuleValue};
    use crate::synthetics::MovementType;
    use crate::value::Value;

    fn speed_rule(selector: &str, value: RuleValue, priority: i32) -> RuleSource {
        RuleSource {
            key: "base-speed".into(),
            selector: Some(selector.into()),
            label: None,
            slug: None,
            predicate: Default::default(),
            value: Some(value),
            priority,
            ignored: false,
        }
    }

    fn actor_with_rules(rules: Vec<RuleSource>) -> Actor {
        let mut actor = Actor::new(ActorId::new(1), ActorKind::Character, "Seelah");
        let mut attributes = ValueMap::new();
        let mut speed = ValueMap::new();
        speed.insert("total".into(), Value::Int(25));
        attributes.insert("speed".into(), Value::Map(speed));
        let mut actor_data = ValueMap::new();
        actor_data.insert("attributes".into(), Value::Map(attributes));
        actor.roll_data.insert("actor".into(), Value::Map(actor_data));
        actor.add_item(Item::new("i1", "Wavecaller Charm", ItemKind::Other).with_rules(rules));
        actor
    }

    #[test]
    fn test_registry_is_rebuilt_each_cycle() {
        let registry = RuleRegistry::with_core_elements();
        let mut actor =
            actor_with_rules(vec![speed_rule("swim-speed", RuleValue::Number(20.0), 100)]);

        actor.prepare_data(&registry);
        actor.prepare_data(&registry);

        // Two consecutive rebuilds: one deferred computation, not two
        assert_eq!(actor.synthetics.movement_types[&MovementType::Swim].len(), 1);
    }

    #[test]
    fn test_determinism() {
        let registry = RuleRegistry::with_core_elements();
        let mut actor = actor_with_rules(vec![
            speed_rule("swim-speed", RuleValue::Number(20.0), 100),
            speed_rule(
                "fly-speed",
                RuleValue::Formula("@actor.attributes.speed.total".into()),
                100,
            ),
        ]);

        actor.prepare_data(&registry);
        let mut diagnostics = Diagnostics::new();
        let first: Vec<_> = [MovementType::Swim, MovementType::Fly]
            .into_iter()
            .flat_map(|ty| {
                actor
                    .synthetics
                    .resolve_movement(ty, &actor.resolve_context(), &mut diagnostics)
            })
            .collect();

        actor.prepare_data(&registry);
        let second: Vec<_> = [MovementType::Swim, MovementType::Fly]
            .into_iter()
            .flat_map(|ty| {
                actor
                    .synthetics
                    .resolve_movement(ty, &actor.resolve_context(), &mut diagnostics)
            })
            .collect();

        assert_eq!(first, second);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_ignored_rule_isolation() {
        let registry = RuleRegistry::with_core_elements();
        let mut actor = actor_with_rules(vec![
            // Malformed: empty selector
            speed_rule("", RuleValue::Number(20.0), 100),
            speed_rule("swim-speed", RuleValue::Number(20.0), 100),
        ]);

        let diagnostics = actor.prepare_data(&registry);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(actor.synthetics.movement_types[&MovementType::Swim].len(), 1);
        // The malformed rule is kept on the item, marked ignored
        assert_eq!(actor.items[0].rules.len(), 2);
        assert!(actor.items[0].rules.iter().any(|r| r.ignored()));
    }

    #[test]
    fn test_priority_order() {
        let registry = RuleRegistry::with_core_elements();
        let mut actor = actor_with_rules(vec![
            speed_rule("swim-speed", RuleValue::Number(10.0), 200),
            speed_rule("swim-speed", RuleValue::Number(20.0), 50),
            speed_rule("swim-speed", RuleValue::Number(30.0), 200),
        ]);

        actor.prepare_data(&registry);

        // Ascending priority, declaration order on ties
        let values: Vec<_> = actor.synthetics.movement_types[&MovementType::Swim]
            .iter()
            .map(|d| d.value.clone())
            .collect();
        assert_eq!(
            values,
            vec![
                RuleValue::Number(20.0),
                RuleValue::Number(10.0),
                RuleValue::Number(30.0)
            ]
        );
    }
}
