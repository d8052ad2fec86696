//! Schema definitions for RON rule packs

pub mod item;

pub use item::ItemDef;
