use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NUM_STATS: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Defense,
    Agility,
    Luck,
    Intelligence,
}

impl Attribute {
    /// Slot in the four-stat vector. Intelligence has no slot and is looked
    /// up separately.
    pub fn slot(&self) -> Option<usize> {
        match self {
            Attribute::Strength => Some(0),
            Attribute::Defense => Some(1),
            Attribute::Agility => Some(2),
            Attribute::Luck => Some(3),
            Attribute::Intelligence => None,
        }
    }
}

/// Strength, defense, agility and luck, in that order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Stats {
    values: [u32; NUM_STATS],
}

impl Stats {
    pub fn new(strength: u32, defense: u32, agility: u32, luck: u32) -> Self {
        Self {
            values: [strength, defense, agility, luck],
        }
    }

    pub fn from_array(values: [u32; NUM_STATS]) -> Self {
        Self { values }
    }

    pub fn as_array(&self) -> [u32; NUM_STATS] {
        self.values
    }

    pub fn get(&self, attr: Attribute) -> u32 {
        attr.slot().map_or(0, |slot| self.values[slot])
    }

    pub fn add(&mut self, attr: Attribute, amount: u32) {
        if let Some(slot) = attr.slot() {
            self.values[slot] = self.values[slot].saturating_add(amount);
        }
    }

    pub fn grow(&mut self, growth: [u32; NUM_STATS]) {
        for (value, extra) in self.values.iter_mut().zip(growth) {
            *value = value.saturating_add(extra);
        }
    }
}

/// Named status effects with their remaining duration in rounds.
///
/// Applying an effect that is already present replaces its duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    effects: BTreeMap<String, u32>,
}

impl StatusEffects {
    pub fn apply(&mut self, name: &str, duration: u32) {
        if duration == 0 {
            self.effects.remove(name);
        } else {
            self.effects.insert(name.to_string(), duration);
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.effects.get(name).is_some_and(|d| *d > 0)
    }

    pub fn remaining(&self, name: &str) -> Option<u32> {
        self.effects.get(name).copied()
    }

    /// Decrements every duration once and drops the ones that ran out.
    pub fn tick(&mut self) {
        self.effects.retain(|_, duration| {
            *duration = duration.saturating_sub(1);
            *duration > 0
        });
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.effects.iter().map(|(name, d)| (name.as_str(), *d))
    }
}

/// Health, mana, attributes and status effects of one combatant.
///
/// Every mutator clamps: `hp` stays in `0..=max_hp` and `mp` in `0..=max_mp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatRecord {
    hp: u32,
    max_hp: u32,
    mp: u32,
    max_mp: u32,
    pub stats: Stats,
    #[serde(default)]
    pub intelligence: u32,
    #[serde(default)]
    pub xp_reward: u64,
    #[serde(default)]
    pub gold_reward: u64,
    #[serde(default)]
    pub status_effects: StatusEffects,
}

impl CombatRecord {
    pub fn new(max_hp: u32, max_mp: u32, stats: Stats) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            stats,
            intelligence: 0,
            xp_reward: 0,
            gold_reward: 0,
            status_effects: StatusEffects::default(),
        }
    }

    pub fn with_intelligence(mut self, intelligence: u32) -> Self {
        self.intelligence = intelligence;
        self
    }

    pub fn with_rewards(mut self, xp: u64, gold: u64) -> Self {
        self.xp_reward = xp;
        self.gold_reward = gold;
        self
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn max_mp(&self) -> u32 {
        self.max_mp
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    pub fn restore_mp(&mut self, amount: u32) {
        self.mp = self.mp.saturating_add(amount).min(self.max_mp);
    }

    /// Spends `amount` MP. Returns false, spending nothing, when short.
    pub fn spend_mp(&mut self, amount: u32) -> bool {
        if self.mp < amount {
            return false;
        }
        self.mp -= amount;
        true
    }

    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    pub fn set_mp(&mut self, mp: u32) {
        self.mp = mp.min(self.max_mp);
    }

    /// Raises both maxima and refills HP and MP.
    pub fn grow_and_refill(&mut self, hp_growth: u32, mp_growth: u32) {
        self.max_hp = self.max_hp.saturating_add(hp_growth);
        self.max_mp = self.max_mp.saturating_add(mp_growth);
        self.hp = self.max_hp;
        self.mp = self.max_mp;
    }

    /// Base attribute value. Equipment bonuses are not applied.
    pub fn get_attribute(&self, attr: Attribute) -> u32 {
        match attr {
            Attribute::Intelligence => self.intelligence,
            other => self.stats.get(other),
        }
    }

    pub fn apply_status_effect(&mut self, name: &str, duration: u32) {
        self.status_effects.apply(name, duration);
    }

    pub fn has_status_effect(&self, name: &str) -> bool {
        self.status_effects.has(name)
    }

    pub fn tick_statuses(&mut self) {
        self.status_effects.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CombatRecord {
        CombatRecord::new(50, 20, Stats::new(5, 3, 4, 3))
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut rec = record();
        rec.take_damage(500);
        assert_eq!(rec.hp(), 0);
        assert!(!rec.is_alive());
    }

    #[test]
    fn test_heal_and_restore_clamp_to_max() {
        let mut rec = record();
        rec.take_damage(10);
        rec.heal(1000);
        assert_eq!(rec.hp(), 50);

        assert!(rec.spend_mp(15));
        rec.restore_mp(u32::MAX);
        assert_eq!(rec.mp(), 20);
    }

    #[test]
    fn test_spend_mp_insufficient_spends_nothing() {
        let mut rec = record();
        assert!(!rec.spend_mp(21));
        assert_eq!(rec.mp(), 20);
    }

    #[test]
    fn test_hp_mp_bounds_hold_over_mixed_sequence() {
        let mut rec = record();
        let ops: [(u8, u32); 8] = [
            (0, 7),
            (1, 3),
            (0, 99),
            (1, 60),
            (2, 4),
            (0, 0),
            (2, 100),
            (1, 1),
        ];
        for (op, amount) in ops {
            match op {
                0 => rec.take_damage(amount),
                1 => rec.heal(amount),
                _ => rec.restore_mp(amount),
            }
            assert!(rec.hp() <= rec.max_hp());
            assert!(rec.mp() <= rec.max_mp());
            assert_eq!(rec.is_alive(), rec.hp() > 0);
        }
    }

    #[test]
    fn test_get_attribute_slots() {
        let rec = record().with_intelligence(7);
        assert_eq!(rec.get_attribute(Attribute::Strength), 5);
        assert_eq!(rec.get_attribute(Attribute::Defense), 3);
        assert_eq!(rec.get_attribute(Attribute::Agility), 4);
        assert_eq!(rec.get_attribute(Attribute::Luck), 3);
        assert_eq!(rec.get_attribute(Attribute::Intelligence), 7);
    }

    #[test]
    fn test_status_effect_overwrites_and_expires() {
        let mut rec = record();
        rec.apply_status_effect("sleep", 5);
        rec.apply_status_effect("sleep", 2);
        assert_eq!(rec.status_effects.remaining("sleep"), Some(2));

        rec.tick_statuses();
        assert!(rec.has_status_effect("sleep"));
        rec.tick_statuses();
        assert!(!rec.has_status_effect("sleep"));
        assert!(rec.status_effects.is_empty());
    }

    #[test]
    fn test_stats_grow() {
        let mut stats = Stats::new(5, 3, 4, 3);
        stats.grow([2, 2, 2, 1]);
        assert_eq!(stats.as_array(), [7, 5, 6, 4]);
    }
}
