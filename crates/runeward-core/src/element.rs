//! Rule element base contract and kind registry
//!
//! A rule element is the runtime object constructed from a rule
//! source. Concrete kinds implement [`RuleElement`]; shared behavior
//! (validation failure, property injection, value resolution,
//! predicate testing) lives on [`RuleElementBase`], which every kind
//! embeds. New kinds register with [`RuleRegistry`] without modifying
//! the engine.

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::item::ItemSummary;
use crate::predicate::RollOptions;
use crate::source::{RuleSource, RuleValue};
use crate::synthetics::SyntheticsRegistry;
use crate::toggle::{DocumentStore, ToggleTraitParams};
use crate::value::{resolve_path, ValueMap};
use indexmap::IndexMap;
use std::fmt;

/// Everything a rule element hook can see and touch during one
/// invocation of the data-preparation cycle
pub struct RuleContext<'a> {
    /// Summary of the owning item
    pub item: &'a ItemSummary,
    /// Dotted-path-resolvable roll data of the owning actor
    pub roll_data: &'a ValueMap,
    /// Current roll-option tag set
    pub options: &'a RollOptions,
    /// Write target for synthetics
    pub synthetics: &'a mut SyntheticsRegistry,
    /// Channel for validation failures and soft omissions
    pub diagnostics: &'a mut Diagnostics,
}

/// State and helpers shared by every rule element kind
#[derive(Debug, Clone)]
pub struct RuleElementBase {
    /// The authored record this element was constructed from
    pub source: RuleSource,
    /// Display label (falls back to the kind key)
    pub label: String,
    /// Once set, the element is inert for the rest of the cycle
    pub ignored: bool,
}

impl RuleElementBase {
    pub fn new(source: RuleSource) -> Self {
        let label = source.label.clone().unwrap_or_else(|| source.key.clone());
        let ignored = source.ignored;
        Self {
            source,
            label,
            ignored,
        }
    }

    /// Mark this element ignored and record the reason
    ///
    /// Never aborts the cycle: the rest of the pipeline treats an
    /// ignored element as a no-op.
    pub fn fail_validation(&mut self, diagnostics: &mut Diagnostics, reason: impl Into<String>) {
        self.ignored = true;
        diagnostics.error(&self.label, reason);
    }

    /// Replace `{token}` spans with dotted-path lookups against roll
    /// data; unresolvable tokens are left literal
    pub fn resolve_injected_properties(&self, template: &str, roll_data: &ValueMap) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            result.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            match after_open.find('}') {
                Some(close) => {
                    let token = &after_open[..close];
                    match resolve_path(roll_data, token) {
                        Some(value) => result.push_str(&value.to_string()),
                        None => {
                            result.push('{');
                            result.push_str(token);
                            result.push('}');
                        }
                    }
                    rest = &after_open[close + 1..];
                }
                None => {
                    // Unterminated span: keep the remainder as-is
                    result.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Resolve a raw rule value to a number
    ///
    /// `None` means resolution failed outright; callers coerce and
    /// validate the returned number themselves.
    pub fn resolve_value(&self, value: &RuleValue, roll_data: &ValueMap) -> Option<f64> {
        value.resolve(roll_data)
    }

    /// Test this element's predicate against the current tag set
    ///
    /// An element with an empty predicate always passes.
    pub fn test(&self, options: &RollOptions) -> bool {
        self.source.predicate.test(options)
    }
}

/// The capability set every rule element kind implements
pub trait RuleElement: fmt::Debug {
    /// The kind discriminator this element was registered under
    fn key(&self) -> &'static str;

    fn base(&self) -> &RuleElementBase;

    fn base_mut(&mut self) -> &mut RuleElementBase;

    /// Side-effecting hook, invoked once per cycle in ascending
    /// priority order; must short-circuit immediately if ignored
    fn before_prepare_data(&mut self, _ctx: &mut RuleContext) {}

    /// Hook for kinds that manage their own toggleable weapon traits
    /// (used by the toggle resolver's delegate pathway)
    fn toggle_trait(
        &self,
        _params: &ToggleTraitParams,
        _store: &mut dyn DocumentStore,
    ) -> Result<bool> {
        Ok(false)
    }

    fn ignored(&self) -> bool {
        self.base().ignored
    }

    fn priority(&self) -> i32 {
        self.base().source.priority
    }

    fn slug(&self) -> Option<&str> {
        self.base().source.slug.as_deref()
    }

    fn label(&self) -> &str {
        &self.base().label
    }
}

/// Constructor function for one rule element kind
///
/// Constructors never fail: a structurally invalid source produces an
/// element already marked ignored, kept for inspection.
pub type RuleBuilder = fn(RuleSource, &mut Diagnostics) -> Box<dyn RuleElement>;

/// Open dispatch table mapping kind discriminators to constructors
#[derive(Default)]
pub struct RuleRegistry {
    builders: IndexMap<String, RuleBuilder>,
}

impl RuleRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the core rule kinds registered
    pub fn with_core_elements() -> Self {
        let mut registry = Self::new();
        registry.register(
            crate::elements::BaseSpeedRuleElement::KEY,
            crate::elements::BaseSpeedRuleElement::build,
        );
        registry.register(
            crate::elements::MultipleAttackPenaltyRuleElement::KEY,
            crate::elements::MultipleAttackPenaltyRuleElement::build,
        );
        registry
    }

    /// Register a kind; a later registration for the same key wins
    pub fn register(&mut self, key: impl Into<String>, builder: RuleBuilder) {
        self.builders.insert(key.into(), builder);
    }

    /// Construct an element from a source record
    ///
    /// An unknown key is reported as a warning and produces nothing;
    /// sibling rules on the same item are unaffected.
    pub fn construct(
        &self,
        source: RuleSource,
        diagnostics: &mut Diagnostics,
    ) -> Option<Box<dyn RuleElement>> {
        match self.builders.get(&source.key) {
            Some(builder) => Some(builder(source, diagnostics)),
            None => {
                diagnostics.warn(&source.key, "Unknown rule element key");
                None
            }
        }
    }

    /// Registered kind keys, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }
}
