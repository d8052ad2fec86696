//! Synthetics: derived aggregates that rule elements write and
//! downstream subsystems read
//!
//! The registry is owned by the actor and rebuilt from scratch at the
//! start of every data-preparation cycle. Movement contributions are
//! stored as deferred computations: small data records capturing only
//! the inputs needed, resolved at consumption time so that predicate
//! testing and formula resolution see the tag set of the moment.

use crate::diagnostics::Diagnostics;
use crate::predicate::{Predicate, RollOptions};
use crate::source::RuleValue;
use crate::value::ValueMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognized movement type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Land,
    Burrow,
    Climb,
    Fly,
    Swim,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Land => "land",
            MovementType::Burrow => "burrow",
            MovementType::Climb => "climb",
            MovementType::Fly => "fly",
            MovementType::Swim => "swim",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "land" => Some(MovementType::Land),
            "burrow" => Some(MovementType::Burrow),
            "climb" => Some(MovementType::Climb),
            "fly" => Some(MovementType::Fly),
            "swim" => Some(MovementType::Swim),
            _ => None,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A movement contribution, produced by resolving a deferred computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementTypeSynthetic {
    pub movement_type: MovementType,
    /// Strictly positive; zero or negative contributions are suppressed
    pub value: i64,
    /// Name of the item that contributed this speed
    pub source: String,
    /// Whether the value formula references the actor's land speed
    pub derived_from_land: bool,
}

/// A multiple-attack-penalty contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackPenaltySynthetic {
    pub label: String,
    pub penalty: i64,
    /// Consumers match against this at roll time
    pub predicate: Predicate,
}

/// Read-only view of the state a deferred computation resolves against
pub struct ResolveContext<'a> {
    pub roll_data: &'a ValueMap,
    pub options: &'a RollOptions,
}

/// A deferred movement computation
///
/// Captures only what resolution needs; never retained past the cycle
/// that created it (the registry is cleared at the next rebuild).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeferredMovement {
    pub movement_type: MovementType,
    pub predicate: Predicate,
    pub value: RuleValue,
    /// Name of the contributing item
    pub source: String,
    /// Rule label, for diagnostics
    pub label: String,
}

impl DeferredMovement {
    const LAND_SPEED_PATHS: [&'static str; 2] =
        ["attributes.speed.value", "attributes.speed.total"];

    /// Resolve this computation against the current context
    ///
    /// Returns `None` when the predicate fails, the value does not
    /// resolve to an integer (reported as a validation failure), or
    /// the resolved value is not strictly positive.
    pub fn resolve(
        &self,
        ctx: &ResolveContext,
        diagnostics: &mut Diagnostics,
    ) -> Option<MovementTypeSynthetic> {
        if !self.predicate.test(ctx.options) {
            return None;
        }

        let resolved = self.value.resolve(ctx.roll_data);
        let value = match resolved {
            Some(n) if n.is_finite() => n.trunc() as i64,
            _ => {
                diagnostics.error(&self.label, "Failed to resolve value");
                return None;
            }
        };

        let derived_from_land = self.movement_type != MovementType::Land
            && self
                .value
                .as_formula()
                .is_some_and(|f| Self::LAND_SPEED_PATHS.iter().any(|p| f.contains(p)));

        (value > 0).then(|| MovementTypeSynthetic {
            movement_type: self.movement_type,
            value,
            source: self.source.clone(),
            derived_from_land,
        })
    }
}

/// Per-actor aggregation of rule element contributions
///
/// Cleared and fully rebuilt at the start of every data-preparation
/// cycle; rule elements never diff against previous state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntheticsRegistry {
    /// Deferred movement computations, by movement type
    pub movement_types: IndexMap<MovementType, Vec<DeferredMovement>>,
    /// Attack penalty contributions, by domain selector
    pub multiple_attack_penalties: IndexMap<String, Vec<AttackPenaltySynthetic>>,
}

impl SyntheticsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything, at the start of a cycle
    pub fn clear(&mut self) {
        self.movement_types.clear();
        self.multiple_attack_penalties.clear();
    }

    /// Register a deferred movement computation
    pub fn push_movement(&mut self, deferred: DeferredMovement) {
        self.movement_types
            .entry(deferred.movement_type)
            .or_default()
            .push(deferred);
    }

    /// Register an attack penalty synthetic under a selector
    pub fn push_attack_penalty(
        &mut self,
        selector: impl Into<String>,
        synthetic: AttackPenaltySynthetic,
    ) {
        self.multiple_attack_penalties
            .entry(selector.into())
            .or_default()
            .push(synthetic);
    }

    /// Resolve every deferred computation for a movement type
    pub fn resolve_movement(
        &self,
        movement_type: MovementType,
        ctx: &ResolveContext,
        diagnostics: &mut Diagnostics,
    ) -> Vec<MovementTypeSynthetic> {
        self.movement_types
            .get(&movement_type)
            .into_iter()
            .flatten()
            .filter_map(|deferred| deferred.resolve(ctx, diagnostics))
            .collect()
    }

    /// Attack penalties registered under a selector
    pub fn attack_penalties(&self, selector: &str) -> &[AttackPenaltySynthetic] {
        self.multiple_attack_penalties
            .get(selector)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn roll_data() -> ValueMap {
        let mut speed = ValueMap::new();
        speed.insert("total".into(), Value::Int(30));
        let mut attributes = ValueMap::new();
        attributes.insert("speed".into(), Value::Map(speed));
        let mut actor = ValueMap::new();
        actor.insert("attributes".into(), Value::Map(attributes));
        let mut root = ValueMap::new();
        root.insert("actor".into(), Value::Map(actor));
        root
    }

    fn deferred(movement_type: MovementType, value: RuleValue) -> DeferredMovement {
        DeferredMovement {
            movement_type,
            predicate: Predicate::default(),
            value,
            source: "Boots of Bounding".into(),
            label: "Base Speed".into(),
        }
    }

    #[test]
    fn test_positive_only() {
        let data = roll_data();
        let options = RollOptions::new();
        let ctx = ResolveContext { roll_data: &data, options: &options };
        let mut diagnostics = Diagnostics::new();

        let zero = deferred(MovementType::Land, RuleValue::Number(0.0));
        assert_eq!(zero.resolve(&ctx, &mut diagnostics), None);

        let negative = deferred(MovementType::Land, RuleValue::Number(-5.0));
        assert_eq!(negative.resolve(&ctx, &mut diagnostics), None);
        assert!(diagnostics.is_empty());

        let positive = deferred(MovementType::Land, RuleValue::Number(25.0));
        let synthetic = positive.resolve(&ctx, &mut diagnostics).unwrap();
        assert_eq!(synthetic.value, 25);
    }

    #[test]
    fn test_predicate_gates_resolution() {
        let data = roll_data();
        let options: RollOptions = ["flying".to_string()].into_iter().collect();
        let ctx = ResolveContext { roll_data: &data, options: &options };
        let mut diagnostics = Diagnostics::new();

        let mut gated = deferred(MovementType::Fly, RuleValue::Number(40.0));
        gated.predicate = Predicate::has("grounded");
        assert_eq!(gated.resolve(&ctx, &mut diagnostics), None);

        gated.predicate = Predicate::has("flying");
        assert!(gated.resolve(&ctx, &mut diagnostics).is_some());
    }

    #[test]
    fn test_derived_from_land() {
        let data = roll_data();
        let options = RollOptions::new();
        let ctx = ResolveContext { roll_data: &data, options: &options };
        let mut diagnostics = Diagnostics::new();

        let swim = deferred(
            MovementType::Swim,
            RuleValue::Formula("@actor.attributes.speed.total".into()),
        );
        let synthetic = swim.resolve(&ctx, &mut diagnostics).unwrap();
        assert_eq!(synthetic.value, 30);
        assert!(synthetic.derived_from_land);

        // Land speeds are never marked derived, regardless of formula
        let land = deferred(
            MovementType::Land,
            RuleValue::Formula("@actor.attributes.speed.total".into()),
        );
        assert!(!land.resolve(&ctx, &mut diagnostics).unwrap().derived_from_land);

        let flat = deferred(MovementType::Swim, RuleValue::Number(20.0));
        assert!(!flat.resolve(&ctx, &mut diagnostics).unwrap().derived_from_land);
    }

    #[test]
    fn test_unresolvable_value_is_validation_failure() {
        let data = roll_data();
        let options = RollOptions::new();
        let ctx = ResolveContext { roll_data: &data, options: &options };
        let mut diagnostics = Diagnostics::new();

        let bad = deferred(MovementType::Swim, RuleValue::Formula("@@".into()));
        assert_eq!(bad.resolve(&ctx, &mut diagnostics), None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_registry_rebuild() {
        let mut registry = SyntheticsRegistry::new();
        registry.push_movement(deferred(MovementType::Swim, RuleValue::Number(20.0)));
        registry.push_attack_penalty(
            "attack-roll",
            AttackPenaltySynthetic {
                label: "Agile".into(),
                penalty: -4,
                predicate: Predicate::default(),
            },
        );

        assert_eq!(registry.movement_types[&MovementType::Swim].len(), 1);
        assert_eq!(registry.attack_penalties("attack-roll").len(), 1);

        registry.clear();
        assert!(registry.movement_types.is_empty());
        assert!(registry.attack_penalties("attack-roll").is_empty());
    }
}
