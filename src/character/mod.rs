//! The player aggregate: progression and inventory.

pub mod inventory;
pub mod player;

pub use inventory::{Equipment, EquipmentSlot, Inventory, ItemGroup};
pub use player::Player;
