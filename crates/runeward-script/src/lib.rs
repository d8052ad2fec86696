//! Runeward Script - RON loader and schema definitions
//!
//! Loads authored rule pack content from RON files:
//! - Item definitions (identity, weapon/shield source data)
//! - Rule source records attached to items

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::{Loader, RulePackDefs};
pub use schema::ItemDef;
