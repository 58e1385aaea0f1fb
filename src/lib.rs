//! Quest Battle - turn-based encounter engine
//!
//! Catalogs, combat records, the battle state machine and its ratatui
//! rendering. A host owns one [`battle::Battle`] per encounter.

pub mod battle;
pub mod catalog;
pub mod character;
pub mod combat;
pub mod constants;
pub mod ui;
