//! Authored rule source records
//!
//! A rule source is the immutable-at-construction input every rule
//! element starts from. It arrives as an authoring-time record with a
//! known field set; unknown extra fields are ignored, never rejected.

use crate::predicate::Predicate;
use crate::value::{resolve_path, ValueMap};
use crate::{formula, Value};
use serde::{Deserialize, Serialize};

/// Default execution priority for rule elements
pub const DEFAULT_PRIORITY: i32 = 100;

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

/// The raw, validated-at-construction shape of one rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSource {
    /// Rule kind discriminator (e.g. "base-speed")
    pub key: String,
    /// Domain selector; may contain `{token}` templates
    #[serde(default)]
    pub selector: Option<String>,
    /// Display label; may contain `{token}` templates
    #[serde(default)]
    pub label: Option<String>,
    /// Stable identity slug (used by strike-style rules)
    #[serde(default)]
    pub slug: Option<String>,
    /// Gating condition over the roll-option tag set
    #[serde(default)]
    pub predicate: Predicate,
    /// Contributed value: number, formula, or bracketed table
    #[serde(default)]
    pub value: Option<RuleValue>,
    /// Execution order (ascending; ties broken by declaration order)
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Rule is present but inert
    #[serde(default)]
    pub ignored: bool,
}

/// A rule value before resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// A plain number, passed through as-is
    Number(f64),
    /// An arithmetic formula over roll data
    Formula(String),
    /// A threshold table keyed by a resolved scalar
    Bracket(BracketedValue),
}

impl RuleValue {
    /// Resolve this value against roll data
    ///
    /// Numbers pass through; formulas are evaluated with undefined
    /// references as 0; bracketed tables resolve via the threshold
    /// rule. `None` means the value could not be resolved at all
    /// (malformed formula), which callers treat as a validation
    /// failure on the owning rule.
    pub fn resolve(&self, roll_data: &ValueMap) -> Option<f64> {
        match self {
            RuleValue::Number(n) => Some(*n),
            RuleValue::Formula(text) => formula::evaluate(text, roll_data),
            RuleValue::Bracket(bracketed) => Some(bracketed.resolve(roll_data)),
        }
    }

    /// The formula text, if this value is a string formula
    pub fn as_formula(&self) -> Option<&str> {
        match self {
            RuleValue::Formula(text) => Some(text),
            _ => None,
        }
    }
}

impl Default for RuleValue {
    fn default() -> Self {
        RuleValue::Number(0.0)
    }
}

/// A small ordered table of `{threshold, value}` entries keyed by a
/// resolved scalar (typically actor level)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketedValue {
    /// Dotted path to the keying scalar in roll data
    #[serde(default = "BracketedValue::default_field")]
    pub field: String,
    /// Entries in ascending threshold order
    pub brackets: Vec<Bracket>,
}

/// One entry of a bracketed table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Minimum scalar for this entry to apply
    pub threshold: i64,
    pub value: f64,
}

impl BracketedValue {
    fn default_field() -> String {
        "actor.level".to_string()
    }

    /// Pick the entry with the highest threshold <= the keying scalar,
    /// or 0 if no entry applies
    pub fn resolve(&self, roll_data: &ValueMap) -> f64 {
        let scalar = resolve_path(roll_data, &self.field)
            .and_then(Value::as_float)
            .unwrap_or(0.0) as i64;
        self.brackets
            .iter()
            .filter(|b| b.threshold <= scalar)
            .max_by_key(|b| b.threshold)
            .map(|b| b.value)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll_data(level: i64) -> ValueMap {
        let mut actor = ValueMap::new();
        actor.insert("level".into(), Value::Int(level));
        let mut root = ValueMap::new();
        root.insert("actor".into(), Value::Map(actor));
        root
    }

    #[test]
    fn test_rule_source_from_ron() {
        let source: RuleSource = ron::from_str(
            r#"(
                key: "base-speed",
                selector: Some("swim-speed"),
                value: Some(25.0),
            )"#,
        )
        .unwrap();

        assert_eq!(source.key, "base-speed");
        assert_eq!(source.selector.as_deref(), Some("swim-speed"));
        assert_eq!(source.value, Some(RuleValue::Number(25.0)));
        assert_eq!(source.priority, DEFAULT_PRIORITY);
        assert!(!source.ignored);
    }

    #[test]
    fn test_rule_value_variants() {
        let data = roll_data(3);
        assert_eq!(RuleValue::Number(15.0).resolve(&data), Some(15.0));
        assert_eq!(
            RuleValue::Formula("@actor.level * 2".into()).resolve(&data),
            Some(6.0)
        );
        assert_eq!(RuleValue::Formula("not a formula!".into()).resolve(&data), None);
    }

    #[test]
    fn test_bracket_resolution() {
        let bracketed = BracketedValue {
            field: "actor.level".into(),
            brackets: vec![
                Bracket { threshold: 1, value: 10.0 },
                Bracket { threshold: 5, value: 20.0 },
                Bracket { threshold: 10, value: 30.0 },
            ],
        };

        assert_eq!(bracketed.resolve(&roll_data(1)), 10.0);
        assert_eq!(bracketed.resolve(&roll_data(7)), 20.0);
        assert_eq!(bracketed.resolve(&roll_data(10)), 30.0);
        // Below every threshold: default
        assert_eq!(bracketed.resolve(&roll_data(0)), 0.0);
    }
}
