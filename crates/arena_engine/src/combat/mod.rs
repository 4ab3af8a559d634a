//! Combat pipeline.
//!
//! Split by stage:
//! - resolver: pure damage/loot math, never inlined at call sites
//! - shooting: phase-gated shot intents, projectile flight and impact
//! - damage: the single damage/kill pipeline and wave-clear detection
//!
//! Ordering contract: every system that wants to hurt an enemy writes a
//! `DamageRequest`; `apply_enemy_damage` runs after all of them in the engine
//! chain so mutations, log appends and event publishes happen in one fixed
//! order per frame.

pub mod damage;
pub mod resolver;
pub mod shooting;

pub use damage::{apply_enemy_damage, finish_dying_enemies, DEATH_ANIMATION_SECS};
pub use resolver::{
    calculate_focus_damage, calculate_loot, calculate_manual_shot_damage, Loot,
};
pub use shooting::{handle_shoot_enemy, tick_projectiles, PROJECTILE_SPEED};
