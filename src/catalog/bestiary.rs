use super::{parse_table, CatalogError};
use crate::combat::{
    AttackKind, CombatRecord, Enemy, LootEntry, ScriptedBehavior, SpecialAbilities, Stats, NUM_STATS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Enemy archetype as stored in the definition table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    #[serde(default = "unknown_enemy")]
    pub name: String,
    #[serde(default = "default_hp")]
    pub max_hp: u32,
    #[serde(default = "default_stats")]
    pub stats: [u32; NUM_STATS],
    #[serde(default)]
    pub intelligence: u32,
    #[serde(default)]
    pub xp_reward: u64,
    #[serde(default)]
    pub gold_reward: u64,
    #[serde(default)]
    pub attack_type: AttackKind,
    #[serde(default)]
    pub special_abilities: SpecialAbilities,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
    #[serde(default)]
    pub script: Option<ScriptedBehavior>,
}

fn unknown_enemy() -> String {
    "Unknown".to_string()
}

fn default_hp() -> u32 {
    10
}

fn default_stats() -> [u32; NUM_STATS] {
    [1, 1, 1, 1]
}

/// Enemy archetypes keyed by type tag; doubles as the enemy factory.
#[derive(Debug, Clone, Default)]
pub struct Bestiary {
    enemies: BTreeMap<String, EnemyDefinition>,
}

impl Bestiary {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let enemies = parse_table("enemies", json)?;
        Ok(Self { enemies })
    }

    pub fn get(&self, type_tag: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(type_tag)
    }

    /// Builds a fresh, full-health enemy of `type_tag`.
    pub fn create_enemy(&self, type_tag: &str) -> Option<Enemy> {
        let def = self.get(type_tag)?;
        let record = CombatRecord::new(def.max_hp, 0, Stats::from_array(def.stats))
            .with_intelligence(def.intelligence)
            .with_rewards(def.xp_reward, def.gold_reward);
        let mut enemy = Enemy::new(type_tag, def.name.clone(), record);
        enemy.attack_kind = def.attack_type;
        enemy.abilities = def.special_abilities.clone();
        enemy.loot = def.loot.clone();
        enemy.script = def.script;
        Some(enemy)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}
