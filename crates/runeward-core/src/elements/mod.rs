//! Concrete rule element kinds

pub mod base_speed;
pub mod multiple_attack_penalty;

pub use base_speed::BaseSpeedRuleElement;
pub use multiple_attack_penalty::MultipleAttackPenaltyRuleElement;
