//! Predicate expressions over the roll-option tag set
//!
//! A predicate is a pure boolean expression evaluated against the
//! current set of roll options (string tags) derived from actor, item,
//! and situational state. Evaluation never mutates anything, so the
//! same predicate can be tested at registration time and again at
//! consumption time against a changed tag set.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The current set of roll-option tags
///
/// Uses IndexSet to keep iteration deterministic.
pub type RollOptions = IndexSet<String>;

/// A boolean expression over roll options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// True if the tag is present
    Has(String),
    /// True if every sub-predicate holds (empty list always passes)
    All(Vec<Predicate>),
    /// True if at least one sub-predicate holds
    Any(Vec<Predicate>),
    /// Negation
    Not(Box<Predicate>),
}

impl Default for Predicate {
    /// The empty predicate, which always passes
    fn default() -> Self {
        Predicate::All(Vec::new())
    }
}

impl Predicate {
    /// Evaluate this predicate against a tag set
    pub fn test(&self, options: &RollOptions) -> bool {
        match self {
            Predicate::Has(tag) => options.contains(tag.as_str()),
            Predicate::All(preds) => preds.iter().all(|p| p.test(options)),
            Predicate::Any(preds) => preds.iter().any(|p| p.test(options)),
            Predicate::Not(pred) => !pred.test(options),
        }
    }

    /// Create a single-tag predicate
    pub fn has(tag: impl Into<String>) -> Self {
        Predicate::Has(tag.into())
    }
}
