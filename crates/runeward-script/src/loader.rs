//! RON rule pack loader

use crate::error::{Error, Result};
use crate::schema::ItemDef;
use indexmap::IndexMap;
use runeward_core::ItemId;
use std::fs;
use std::path::Path;

/// Loaded rule pack definitions
#[derive(Debug, Default)]
pub struct RulePackDefs {
    /// Item definitions by ID, in load order
    pub items: IndexMap<ItemId, ItemDef>,
}

impl RulePackDefs {
    /// Create empty definitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an item definition
    pub fn get_item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }
}

/// Loader for RON rule packs
pub struct Loader {
    defs: RulePackDefs,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            defs: RulePackDefs::new(),
        }
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.load_items_str(&content)
    }

    /// Load item definitions from a RON string
    pub fn load_items_str(&mut self, content: &str) -> Result<()> {
        #[derive(serde::Deserialize)]
        struct ItemFile {
            items: Vec<ItemDef>,
        }

        let file: ItemFile = ron::from_str(content)?;
        for item in file.items {
            let id = ItemId::new(item.id.clone());
            if self.defs.items.contains_key(&id) {
                return Err(Error::DuplicateDefinition(id.to_string()));
            }
            self.defs.items.insert(id, item);
        }
        Ok(())
    }

    /// Load all RON files from a directory, recursively
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        for entry in fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the definitions
    pub fn finish(self) -> RulePackDefs {
        self.defs
    }

    /// Get the current definitions (for inspection during loading)
    pub fn defs(&self) -> &RulePackDefs {
        &self.defs
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runeward_core::{
        Actor, ActorId, ActorKind, MovementType, RuleRegistry, Value, ValueMap,
    };

    const PACK: &str = r#"
    (
        items: [
            (
                id: "charm-1",
                name: "Wavecaller Charm",
                slug: Some("wavecaller-charm"),
                rules: [
                    (
                        key: "base-speed",
                        selector: Some("swim-speed"),
                        value: Some("@actor.attributes.speed.total"),
                    ),
                    (
                        key: "multiple-attack-penalty",
                        selector: Some("attack-roll"),
                        label: Some("Tidal Flurry"),
                        value: Some(-4.0),
                    ),
                ],
            ),
        ]
    )
    "#;

    #[test]
    fn test_load_items() {
        let mut loader = Loader::new();
        loader.load_items_str(PACK).unwrap();

        let defs = loader.finish();
        let def = defs.get_item(&ItemId::new("charm-1")).unwrap();
        assert_eq!(def.name, "Wavecaller Charm");
        assert_eq!(def.rules.len(), 2);
    }

    #[test]
    fn test_duplicate_definition() {
        let mut loader = Loader::new();
        loader.load_items_str(PACK).unwrap();
        let err = loader.load_items_str(PACK).unwrap_err();
        assert!(matches!(err, Error::DuplicateDefinition(_)));
    }

    #[test]
    fn test_loaded_pack_drives_preparation() {
        let mut loader = Loader::new();
        loader.load_items_str(PACK).unwrap();
        let defs = loader.finish();

        let mut actor = Actor::new(ActorId::new(1), ActorKind::Character, "Seelah");
        let mut speed = ValueMap::new();
        speed.insert("total".into(), Value::Int(25));
        let mut attributes = ValueMap::new();
        attributes.insert("speed".into(), Value::Map(speed));
        let mut actor_data = ValueMap::new();
        actor_data.insert("attributes".into(), Value::Map(attributes));
        actor.roll_data.insert("actor".into(), Value::Map(actor_data));

        for def in defs.items.values() {
            actor.add_item(def.instantiate());
        }

        let registry = RuleRegistry::with_core_elements();
        let diagnostics = actor.prepare_data(&registry);
        assert!(diagnostics.is_empty());

        let mut diagnostics = runeward_core::Diagnostics::new();
        let speeds = actor.synthetics.resolve_movement(
            MovementType::Swim,
            &actor.resolve_context(),
            &mut diagnostics,
        );
        assert_eq!(speeds.len(), 1);
        assert_eq!(speeds[0].value, 25);
        assert!(speeds[0].derived_from_land);

        let penalties = actor.synthetics.attack_penalties("attack-roll");
        assert_eq!(penalties.len(), 1);
        assert_eq!(penalties[0].penalty, -4);
    }
}
