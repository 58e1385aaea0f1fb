use super::record::CombatRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Player,
    Ally,
    Enemy,
}

/// Any battle participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub faction: Faction,
    pub record: CombatRecord,
}

impl Combatant {
    pub fn new(name: impl Into<String>, faction: Faction, record: CombatRecord) -> Self {
        Self {
            name: name.into(),
            faction,
            record,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.record.is_alive()
    }
}

/// How an enemy delivers its standard attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    #[default]
    Melee,
    Ranged,
    Magic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealOnHit {
    pub chance: f64,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallForHelp {
    /// Fraction of max HP below which the enemy starts calling.
    pub hp_threshold: f64,
    pub chance: f64,
    pub enemy_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DazeOnAttack {
    pub chance: f64,
    pub duration: u32,
}

/// Reactive capabilities of an enemy archetype. An ability is present when
/// its entry is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialAbilities {
    #[serde(default)]
    pub heal_on_hit: Option<HealOnHit>,
    #[serde(default)]
    pub call_for_help: Option<CallForHelp>,
    #[serde(default)]
    pub daze_on_attack: Option<DazeOnAttack>,
}

/// Hardcoded narrative overrides for named bosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedBehavior {
    DarylLedeay,
    ChickenGeorge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    #[serde(default = "always")]
    pub chance: f64,
}

fn always() -> f64 {
    1.0
}

/// An enemy instance: a combatant plus the archetype data the battle reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub combatant: Combatant,
    pub type_tag: String,
    pub attack_kind: AttackKind,
    pub abilities: SpecialAbilities,
    pub loot: Vec<LootEntry>,
    pub script: Option<ScriptedBehavior>,
}

impl Enemy {
    pub fn new(type_tag: impl Into<String>, name: impl Into<String>, record: CombatRecord) -> Self {
        Self {
            combatant: Combatant::new(name, Faction::Enemy, record),
            type_tag: type_tag.into(),
            attack_kind: AttackKind::Melee,
            abilities: SpecialAbilities::default(),
            loot: Vec::new(),
            script: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.combatant.name
    }

    pub fn record(&self) -> &CombatRecord {
        &self.combatant.record
    }

    pub fn record_mut(&mut self) -> &mut CombatRecord {
        &mut self.combatant.record
    }

    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }
}
