use bevy::prelude::*;

/// An in-flight manual shot.
///
/// Carries its damage as data, precomputed at fire time rather than a live
/// reference to player stats. An impact against a target that died or
/// vanished mid-flight is a no-op downstream.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub origin: Vec3,
    pub destination: Vec3,
    /// Target enemy id. Resolved again at impact time; may no longer exist.
    pub target: Entity,
    /// Travel speed in progress units per second (1.0 = full flight).
    pub speed: f32,
    /// Travel progress in [0, 1]; the impact fires at 1.0.
    pub progress: f32,
    /// Damage payload applied on impact.
    pub damage: u32,
}
