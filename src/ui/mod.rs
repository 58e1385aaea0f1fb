//! Terminal rendering for the battle window.

pub mod battle_scene;
pub mod combat_effects;
