//! ECS components for the arena population.
//!
//! Organized by entity kind:
//! - health: shared hit-point pool
//! - player: the single player avatar and its combat stats
//! - enemy: hostile units generated from tasks (tier, lifecycle state)
//! - projectile: in-flight manual shots carrying precomputed damage

pub mod enemy;
pub mod health;
pub mod player;
pub mod projectile;

pub use enemy::*;
pub use health::*;
pub use player::*;
pub use projectile::*;
