//! Combat math shared by every battle state.
//!
//! The deterministic functions take their rolls as arguments so the formulas
//! can be checked exactly; the `roll_*` companions draw those rolls from an
//! injected RNG.

use crate::constants::*;
use rand::Rng;

/// Result of a player melee attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackResult {
    /// Damage dealt, after crit doubling and jitter.
    pub damage: u32,
    pub is_crit: bool,
}

/// Adds an additive jitter to a damage value, flooring the result at 1.
pub fn apply_jitter(damage: u32, jitter: i32) -> u32 {
    (damage as i64 + jitter as i64).clamp(1, u32::MAX as i64) as u32
}

/// Melee damage before crit and jitter.
///
/// # Arguments
/// * `strength` - Attacker strength
/// * `level` - Attacker level (0 for non-player attackers)
/// * `defense` - Defender defense
pub fn melee_base_damage(strength: u32, level: u32, defense: u32) -> u32 {
    let attack_power = strength
        .saturating_mul(MELEE_STRENGTH_FACTOR)
        .saturating_add(level);
    let defense_power = defense.saturating_mul(MELEE_DEFENSE_FACTOR);
    attack_power.saturating_sub(defense_power).max(1)
}

/// Full melee formula with the crit decision and jitter already rolled.
pub fn melee_damage(strength: u32, level: u32, defense: u32, is_crit: bool, jitter: i32) -> AttackResult {
    let mut base = melee_base_damage(strength, level, defense);
    if is_crit {
        base = base.saturating_mul(CRIT_MULTIPLIER);
    }
    AttackResult {
        damage: apply_jitter(base, jitter),
        is_crit,
    }
}

pub fn crit_chance(luck: u32) -> f64 {
    luck as f64 * CRIT_CHANCE_PER_LUCK
}

pub fn roll_melee(strength: u32, level: u32, defense: u32, luck: u32, rng: &mut impl Rng) -> AttackResult {
    let is_crit = rng.gen::<f64>() < crit_chance(luck);
    let jitter = rng.gen_range(-DAMAGE_JITTER..=DAMAGE_JITTER);
    melee_damage(strength, level, defense, is_crit, jitter)
}

/// Single-target spell damage.
///
/// # Arguments
/// * `power` - Spell power
/// * `strength` - Caster strength (half of it is added)
/// * `variance` - Multiplicative jitter in `-MAGIC_VARIANCE..=MAGIC_VARIANCE`
pub fn magic_damage(power: u32, strength: u32, variance: f64) -> u32 {
    let base = power.saturating_add(strength / 2) as f64;
    ((base * (1.0 + variance)) as u32).max(1)
}

pub fn roll_magic_damage(power: u32, strength: u32, rng: &mut impl Rng) -> u32 {
    let variance = rng.gen_range(-MAGIC_VARIANCE..=MAGIC_VARIANCE);
    magic_damage(power, strength, variance)
}

/// Heal amount of a healing spell for a caster of `level`.
pub fn spell_heal_amount(power: u32, level: u32) -> u32 {
    power.saturating_add(level.saturating_mul(HEAL_SPELL_LEVEL_FACTOR))
}

/// One hit of a multi-hit spell: `strength * multiplier - defense / 2`,
/// floored at 1, then jittered.
pub fn multi_hit_damage(strength: u32, multiplier: f64, defense: u32, jitter: i32) -> u32 {
    let raw = strength as f64 * multiplier - defense as f64 / 2.0;
    let base = (raw as i64).max(1) as u32;
    apply_jitter(base, jitter)
}

/// Always lands at least one hit.
pub fn roll_multi_hit(strength: u32, multiplier: f64, defense: u32, hits: u32, rng: &mut impl Rng) -> Vec<u32> {
    (0..hits.max(1))
        .map(|_| {
            let jitter = rng.gen_range(-DAMAGE_JITTER..=DAMAGE_JITTER);
            multi_hit_damage(strength, multiplier, defense, jitter)
        })
        .collect()
}

/// Rolls a plain probability check.
pub fn roll_chance(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < chance
}

pub fn escape_chance(agility: u32) -> f64 {
    ESCAPE_BASE_CHANCE + agility as f64 * ESCAPE_CHANCE_PER_AGILITY
}

pub fn roll_escape(agility: u32, rng: &mut impl Rng) -> bool {
    roll_chance(escape_chance(agility), rng)
}

/// Outcome of an enemy's standard attack, before any negation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyStrike {
    Melee { damage: u32 },
    /// `None` when the shot missed.
    Ranged { damage: Option<u32> },
    Magic { spell: &'static str, damage: u32 },
}

impl EnemyStrike {
    pub fn damage(&self) -> u32 {
        match self {
            EnemyStrike::Melee { damage } | EnemyStrike::Magic { damage, .. } => *damage,
            EnemyStrike::Ranged { damage } => damage.unwrap_or(0),
        }
    }
}

pub fn enemy_melee_damage(strength: u32, multiplier: f64, player_defense: u32, jitter: i32) -> u32 {
    let enemy_str = strength.saturating_mul(ENEMY_STAT_FACTOR) as f64;
    let player_def = player_defense.saturating_mul(PLAYER_DEFENSE_FACTOR);
    let base = (enemy_str * multiplier - (player_def / 2) as f64).max(1.0);
    ((base + jitter as f64) as i64).max(1) as u32
}

/// Ranged attacks pierce armour: only a quarter of doubled defense applies.
pub fn enemy_ranged_damage(strength: u32, multiplier: f64, player_defense: u32, bonus: u32) -> u32 {
    let enemy_str = strength.saturating_mul(ENEMY_STAT_FACTOR) as f64;
    let player_def = player_defense.saturating_mul(PLAYER_DEFENSE_FACTOR);
    let base = (enemy_str * RANGED_STRENGTH_MULTIPLIER * multiplier - (player_def / 4) as f64).max(1.0);
    ((base + bonus as f64) as u32).max(1)
}

/// Magic attacks ignore defense entirely.
pub fn enemy_magic_damage(intelligence: u32, multiplier: f64) -> u32 {
    let enemy_int = intelligence.saturating_mul(ENEMY_STAT_FACTOR) as f64;
    ((enemy_int * MAGIC_INTELLIGENCE_MULTIPLIER * multiplier) as u32).max(1)
}

pub fn roll_enemy_melee(strength: u32, multiplier: f64, player_defense: u32, rng: &mut impl Rng) -> EnemyStrike {
    let jitter = rng.gen_range(-DAMAGE_JITTER..=DAMAGE_JITTER);
    EnemyStrike::Melee {
        damage: enemy_melee_damage(strength, multiplier, player_defense, jitter),
    }
}

pub fn roll_enemy_ranged(strength: u32, multiplier: f64, player_defense: u32, rng: &mut impl Rng) -> EnemyStrike {
    if !roll_chance(RANGED_HIT_CHANCE, rng) {
        return EnemyStrike::Ranged { damage: None };
    }
    let bonus = rng.gen_range(0..=RANGED_MAX_BONUS);
    EnemyStrike::Ranged {
        damage: Some(enemy_ranged_damage(strength, multiplier, player_defense, bonus)),
    }
}

pub fn roll_enemy_magic(intelligence: u32, multiplier: f64, rng: &mut impl Rng) -> EnemyStrike {
    let spell = ENEMY_SPELLS[rng.gen_range(0..ENEMY_SPELLS.len())];
    EnemyStrike::Magic {
        spell,
        damage: enemy_magic_damage(intelligence, multiplier),
    }
}

/// What one drunk ally does with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllyAction {
    /// Flavour only; the index picks the line.
    Idle { line: usize },
    TossDrink,
    Whiff,
    Brawl { target: usize, damage: u32 },
}

pub const ALLY_IDLE_LINE_COUNT: usize = 5;

/// Maps a uniform roll onto the cumulative 20/10/10/60 bands.
pub fn ally_band(roll: f64) -> u8 {
    if roll < ALLY_IDLE_BAND {
        0
    } else if roll < ALLY_HEAL_BAND {
        1
    } else if roll < ALLY_WHIFF_BAND {
        2
    } else {
        3
    }
}

/// Rolls an ally action against `enemy_count` possible targets.
/// With no targets a brawl degrades into a whiff.
pub fn roll_ally_action(enemy_count: usize, rng: &mut impl Rng) -> AllyAction {
    match ally_band(rng.gen::<f64>()) {
        0 => AllyAction::Idle {
            line: rng.gen_range(0..ALLY_IDLE_LINE_COUNT),
        },
        1 => AllyAction::TossDrink,
        2 => AllyAction::Whiff,
        _ if enemy_count == 0 => AllyAction::Whiff,
        _ => AllyAction::Brawl {
            target: rng.gen_range(0..enemy_count),
            damage: rng.gen_range(ALLY_MIN_DAMAGE..=ALLY_MAX_DAMAGE),
        },
    }
}
