use super::{parse_table, CatalogError};
use crate::constants::{DEFAULT_MULTI_HIT_COUNT, DEFAULT_MULTI_HIT_MULTIPLIER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellKind {
    #[default]
    Damage,
    Healing,
    Status,
    MultiHit,
}

impl SpellKind {
    /// Whether the spell needs an enemy target.
    pub fn is_offensive(&self) -> bool {
        !matches!(self, SpellKind::Healing)
    }
}

/// Immutable spell template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDefinition {
    #[serde(skip)]
    pub id: String,
    #[serde(default = "unknown_spell")]
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub power: u32,
    #[serde(rename = "type", default)]
    pub kind: SpellKind,
    #[serde(default = "neutral")]
    pub element: String,
    /// Status applied by `status` spells.
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default = "certain")]
    pub chance: f64,
    #[serde(default = "default_hits")]
    pub hits: u32,
    /// Strength multiplier per hit of a `multi_hit` spell.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub description: String,
}

fn unknown_spell() -> String {
    "Unknown Spell".to_string()
}

pub(super) fn neutral() -> String {
    "neutral".to_string()
}

fn certain() -> f64 {
    1.0
}

fn default_hits() -> u32 {
    DEFAULT_MULTI_HIT_COUNT
}

fn default_multiplier() -> f64 {
    DEFAULT_MULTI_HIT_MULTIPLIER
}

/// Spell definitions keyed by id. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct SpellCatalog {
    spells: BTreeMap<String, SpellDefinition>,
}

impl SpellCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut spells: BTreeMap<String, SpellDefinition> = parse_table("spells", json)?;
        for (id, spell) in spells.iter_mut() {
            spell.id = id.clone();
        }
        Ok(Self { spells })
    }

    pub fn get(&self, id: &str) -> Option<&SpellDefinition> {
        self.spells.get(id)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}
