//! Combat records, archetype data and the resolvers battle states call.

pub mod math;
pub mod record;
pub mod scripts;
pub mod types;

pub use math::*;
pub use record::*;
pub use scripts::*;
pub use types::*;
