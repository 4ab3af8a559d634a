use bevy::prelude::*;

/// The player avatar. Exactly one instance exists per arena session; it is
/// despawned and respawned wholesale when the arena is reinitialized.
///
/// Position lives in `Transform`, hit points in `Health`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Player {
    /// Base damage of a manual shot (before buffs).
    pub attack_damage: u32,
    /// Shots per second the presentation layer should allow.
    pub attack_speed: f32,
    /// Base damage of a completed focus session.
    pub focus_damage: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            attack_damage: 10,
            attack_speed: 1.5,
            focus_damage: 25,
        }
    }
}
