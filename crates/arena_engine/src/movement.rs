//! Player movement.

use bevy::prelude::*;

use crate::components::Player;
use crate::events::MovePlayerIntent;

/// Half-width of the square arena. Positions clamp to this on both axes
/// independently (a saturating clamp, not a circular bound).
pub const ARENA_RADIUS: f32 = 12.0;

/// System: apply movement intents with per-axis clamping.
pub fn handle_move_player(
    mut intents: EventReader<MovePlayerIntent>,
    mut player: Query<&mut Transform, With<Player>>,
) {
    for intent in intents.read() {
        let Ok(mut transform) = player.single_mut() else {
            continue;
        };
        transform.translation.x =
            (transform.translation.x + intent.dx).clamp(-ARENA_RADIUS, ARENA_RADIUS);
        transform.translation.z =
            (transform.translation.z + intent.dz).clamp(-ARENA_RADIUS, ARENA_RADIUS);
    }
}
