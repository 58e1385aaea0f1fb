//! Read-only game data: spells, items, and enemy archetypes.

mod bestiary;
mod items;
mod spells;

pub use bestiary::{Bestiary, EnemyDefinition};
pub use items::{Item, ItemCatalog, ItemDefinition, ItemKind};
pub use spells::{SpellCatalog, SpellDefinition, SpellKind};

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

const SPELLS_JSON: &str = include_str!("../../data/spells.json");
const ITEMS_JSON: &str = include_str!("../../data/items.json");
const ENEMIES_JSON: &str = include_str!("../../data/enemies.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} table contains an empty id")]
    EmptyId { table: &'static str },
}

/// Parses a JSON object of `id -> definition` entries.
fn parse_table<T: DeserializeOwned>(
    table: &'static str,
    json: &str,
) -> Result<BTreeMap<String, T>, CatalogError> {
    let entries: BTreeMap<String, T> =
        serde_json::from_str(json).map_err(|source| CatalogError::Parse { table, source })?;
    if entries.keys().any(|id| id.trim().is_empty()) {
        return Err(CatalogError::EmptyId { table });
    }
    Ok(entries)
}

/// All definition tables a battle reads from. Shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub spells: SpellCatalog,
    pub items: ItemCatalog,
    pub bestiary: Bestiary,
}

impl GameData {
    pub fn from_json(spells: &str, items: &str, enemies: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            spells: SpellCatalog::from_json(spells)?,
            items: ItemCatalog::from_json(items)?,
            bestiary: Bestiary::from_json(enemies)?,
        })
    }

    /// Tables compiled into the binary from `data/`.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(SPELLS_JSON, ITEMS_JSON, ENEMIES_JSON)
    }
}
