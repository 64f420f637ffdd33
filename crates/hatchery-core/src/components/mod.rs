//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod animal;
mod egg;

pub use animal::*;
pub use egg::*;
