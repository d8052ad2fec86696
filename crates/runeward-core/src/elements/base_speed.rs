//! Base speed rule element: movement synthesis

use crate::diagnostics::Diagnostics;
use crate::element::{RuleContext, RuleElement, RuleElementBase};
use crate::source::{RuleSource, RuleValue};
use crate::synthetics::{DeferredMovement, MovementType};

/// Grants (or adjusts) a movement type on the owning actor
///
/// The selector names the movement type, with an optional conventional
/// `-speed` suffix (`"swim-speed"` and `"swim"` are equivalent). The
/// contribution itself is deferred: the predicate and value are
/// evaluated when a consumer resolves the registered computation, not
/// when the rule registers it.
#[derive(Debug)]
pub struct BaseSpeedRuleElement {
    base: RuleElementBase,
    selector: String,
    value: RuleValue,
}

impl BaseSpeedRuleElement {
    pub const KEY: &'static str = "base-speed";

    pub fn build(source: RuleSource, diagnostics: &mut Diagnostics) -> Box<dyn RuleElement> {
        let mut base = RuleElementBase::new(source);

        let trimmed = base.source.selector.clone().unwrap_or_default();
        let trimmed = trimmed.trim();
        let selector = trimmed
            .strip_suffix("-speed")
            .unwrap_or(trimmed)
            .to_string();

        let value = match base.source.value.clone() {
            Some(value) => value,
            None => {
                base.fail_validation(
                    diagnostics,
                    "A value must be a number, string, or bracketed value",
                );
                RuleValue::default()
            }
        };

        Box::new(Self {
            base,
            selector,
            value,
        })
    }
}

impl RuleElement for BaseSpeedRuleElement {
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

        let speed_type = self
            .base
            .resolve_injected_properties(&self.selector, ctx.roll_data);
        let Some(movement_type) = MovementType::from_name(&speed_type) else {
            return self
                .base
                .fail_validation(ctx.diagnostics, "Unrecognized or missing selector");
        };

        ctx.synthetics.push_movement(DeferredMovement {
            movement_type,
            predicate: self.base.source.predicate.clone(),
            value: self.value.clone(),
            source: ctx.item.name.clone(),
            label: self.base.label.clone(),
        });
    }
}
