//! Multiple attack penalty rule element: penalty synthesis

use crate::diagnostics::Diagnostics;
use crate::element::{RuleContext, RuleElement, RuleElementBase};
use crate::source::RuleSource;
use crate::synthetics::AttackPenaltySynthetic;

/// Replaces the standard multiple attack penalty for matching attacks
///
/// Unlike movement synthesis, the contribution is registered eagerly:
/// the synthetic carries its predicate, and consumers choose among the
/// penalties registered under a selector at roll time.
#[derive(Debug)]
pub struct MultipleAttackPenaltyRuleElement {
    base: RuleElementBase,
    selector: String,
}

impl MultipleAttackPenaltyRuleElement {
    pub const KEY: &'static str = "multiple-attack-penalty";

    pub fn build(source: RuleSource, diagnostics: &mut Diagnostics) -> Box<dyn RuleElement> {
        let mut base = RuleElementBase::new(source);

        let selector = match base.source.selector.clone() {
            Some(selector) => selector,
            None => {
                base.fail_validation(diagnostics, "Missing string selector property");
                String::new()
            }
        };

        Box::new(Self { base, selector })
    }
}

impl RuleElement for MultipleAttackPenaltyRuleElement {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn base(&self) -> &RuleElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleElementBase {
        &mut self.base
    }

    fn before_prepare_data(&mut self, ctx: &mut RuleContext) {
        if self.base.ignored {
            return;
        }

        let selector = self
            .base
            .resolve_injected_properties(&self.selector, ctx.roll_data);
        let label = self
            .base
            .resolve_injected_properties(&self.base.label, ctx.roll_data);
        // Non-numeric and unresolvable values coerce to 0
        let penalty = self
            .base
            .source
            .value
            .as_ref()
            .and_then(|v| self.base.resolve_value(v, ctx.roll_data))
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
            .trunc() as i64;

        if !selector.is_empty() && !label.is_empty() && penalty != 0 {
            ctx.synthetics.push_attack_penalty(
                selector,
                AttackPenaltySynthetic {
                    label,
                    penalty,
                    predicate: self.base.source.predicate.clone(),
                },
            );
        } else {
            // Soft omission, not a validation failure: contribution may
            // legitimately be gated on data resolved elsewhere
            ctx.diagnostics.warn(
                &self.base.label,
                "Multiple attack penalty requires at least a selector field and a non-empty value field",
            );
        }
    }
}
