//! Battle tuning constants.
//!
//! Formula coefficients, probability bands and presentation timings live here
//! so balance changes never touch the resolvers themselves.

use ratatui::style::Color;

// Player melee
pub const MELEE_STRENGTH_FACTOR: u32 = 2;
pub const MELEE_DEFENSE_FACTOR: u32 = 2;
/// Crit chance per point of luck (luck 10 = 20%).
pub const CRIT_CHANCE_PER_LUCK: f64 = 0.02;
pub const CRIT_MULTIPLIER: u32 = 2;
pub const DAMAGE_JITTER: i32 = 1;

// Player magic
pub const MAGIC_VARIANCE: f64 = 0.1;
pub const HEAL_SPELL_LEVEL_FACTOR: u32 = 2;
pub const DEFAULT_MULTI_HIT_COUNT: u32 = 2;
pub const DEFAULT_MULTI_HIT_MULTIPLIER: f64 = 0.8;

// Escape
pub const ESCAPE_BASE_CHANCE: f64 = 0.5;
pub const ESCAPE_CHANCE_PER_AGILITY: f64 = 0.03;

// Enemy attacks
pub const ENEMY_STAT_FACTOR: u32 = 2;
pub const PLAYER_DEFENSE_FACTOR: u32 = 2;
pub const RANGED_HIT_CHANCE: f64 = 0.9;
pub const RANGED_STRENGTH_MULTIPLIER: f64 = 0.8;
pub const RANGED_MAX_BONUS: u32 = 2;
pub const MAGIC_INTELLIGENCE_MULTIPLIER: f64 = 1.5;
pub const ENEMY_SPELLS: [&str; 2] = ["fireball", "ice_bolt"];
pub const LUCKY_CAP_ID: &str = "daryls_lucky_cap";
pub const LUCKY_CAP_NEGATE_CHANCE: f64 = 0.05;
pub const LUCKY_CAP_HEAL: u32 = 1;
pub const DAZED_STATUS: &str = "dazed";

// Reinforcements
pub const MAX_ENEMIES: usize = 3;

// Allies: cumulative roll bands
pub const ALLY_IDLE_BAND: f64 = 0.2;
pub const ALLY_HEAL_BAND: f64 = 0.3;
pub const ALLY_WHIFF_BAND: f64 = 0.4;
pub const ALLY_HEAL_AMOUNT: u32 = 15;
pub const ALLY_MIN_DAMAGE: u32 = 5;
pub const ALLY_MAX_DAMAGE: u32 = 15;

// Scripted enemies
pub const TRIP_CHANCE: f64 = 0.05;
pub const TRIP_SELF_DAMAGE_RATIO: f64 = 0.10;
pub const LUCKY_SWING_CHANCE: f64 = 0.10;
pub const LUCKY_SWING_MULTIPLIER: f64 = 2.5;
pub const PITY_HEAL_CHANCE: f64 = 0.20;
pub const PITY_HEAL_RATIO: f64 = 0.15;
pub const BUDDY_BUFF_CHANCE: f64 = 0.10;
pub const BUDDY_BUFF_DEFENSE: u32 = 50;

// Level-up growth
pub const LEVEL_UP_STAT_GROWTH: [u32; 4] = [2, 2, 2, 1];
pub const LEVEL_UP_HP_GROWTH: u32 = 10;
pub const LEVEL_UP_MP_GROWTH: u32 = 5;
pub const XP_CURVE_MULTIPLIER: f64 = 1.5;
pub const STARTING_XP_TO_NEXT: u64 = 100;

// Starting hero
pub const HERO_MAX_HP: u32 = 50;
pub const HERO_MAX_MP: u32 = 20;
pub const HERO_STATS: [u32; 4] = [5, 3, 4, 3];
pub const HERO_SPELLS: [&str; 2] = ["heal", "fireball"];
pub const HERO_ITEMS: [&str; 5] = ["potion", "potion", "potion", "ether", "iron_sword"];

// Visual effects (seconds)
pub const MELEE_FLASH_SECONDS: f64 = 0.1;
pub const MAGIC_FLASH_SECONDS: f64 = 0.2;
pub const MULTI_HIT_FLASH_SECONDS: f64 = 0.1;
pub const ENEMY_FLASH_SECONDS: f64 = 0.2;
pub const DAMAGE_NUMBER_SECONDS: f64 = 0.8;
/// Initial upward drift of a damage number, in rows per second.
pub const DAMAGE_NUMBER_RISE_SPEED: f64 = 5.0;
/// Downward acceleration of a damage number, in rows per second squared.
pub const DAMAGE_NUMBER_GRAVITY: f64 = 10.0;
/// Horizontal scatter for multi-hit numbers, in columns.
pub const MULTI_HIT_SCATTER: i32 = 2;

pub const MELEE_FLASH_COLOR: Color = Color::Rgb(255, 255, 255);
pub const MELEE_NUMBER_COLOR: Color = Color::Rgb(255, 200, 50);
pub const MAGIC_FLASH_COLOR: Color = Color::Rgb(100, 100, 255);
pub const MAGIC_NUMBER_COLOR: Color = Color::Rgb(100, 150, 255);
pub const MULTI_HIT_COLOR: Color = Color::Rgb(255, 255, 200);
pub const ITEM_NUMBER_COLOR: Color = Color::Rgb(255, 140, 0);
pub const ENEMY_HIT_COLOR: Color = Color::Rgb(255, 50, 50);

// Host loop
pub const FRAME_MS: u64 = 16;
