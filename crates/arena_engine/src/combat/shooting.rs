//! Manual shots.
//!
//! A shot never applies damage directly: it enqueues a projectile carrying
//! the damage computed at fire time. Impact processing is the sole trigger
//! for damage application.

use bevy::prelude::*;

use crate::buffs::ActiveBuffs;
use crate::clock::ArenaClock;
use crate::combat::resolver::calculate_manual_shot_damage;
use crate::components::{Enemy, EnemyState, Player, Projectile};
use crate::events::{DamageRequest, DamageSource, ProjectileImpact, ShootEnemyIntent};
use crate::phase::PhaseState;

/// Progress units per second; a shot lands in 1/PROJECTILE_SPEED seconds.
pub const PROJECTILE_SPEED: f32 = 4.0;

/// System: validate a shot intent and enqueue the projectile.
pub fn handle_shoot_enemy(
    mut intents: EventReader<ShootEnemyIntent>,
    mut commands: Commands,
    phase: Res<PhaseState>,
    clock: Res<ArenaClock>,
    buffs: Res<ActiveBuffs>,
    player: Query<(&Player, &Transform), Without<Enemy>>,
    enemies: Query<(&EnemyState, &Transform), With<Enemy>>,
) {
    for intent in intents.read() {
        if !phase.in_combat() {
            crate::logger::log_warning(&format!(
                "Shot rejected: phase {} forbids shooting",
                phase.current().as_str()
            ));
            continue;
        }

        let Ok((player, player_tf)) = player.single() else {
            continue;
        };
        let Ok((state, enemy_tf)) = enemies.get(intent.target) else {
            continue;
        };
        if state.is_terminal() {
            continue;
        }

        let damage = calculate_manual_shot_damage(player, &buffs, clock.now());
        commands.spawn(Projectile {
            origin: player_tf.translation,
            destination: enemy_tf.translation,
            target: intent.target,
            speed: PROJECTILE_SPEED,
            progress: 0.0,
            damage,
        });
    }
}

/// System: advance in-flight projectiles; at full progress, remove the
/// projectile and hand its payload to the damage pipeline.
///
/// The impact event fires regardless of whether the target still exists;
/// damage application on a missing target is a no-op downstream.
pub fn tick_projectiles(
    mut commands: Commands,
    clock: Res<ArenaClock>,
    mut projectiles: Query<(Entity, &mut Projectile)>,
    mut impacts: EventWriter<ProjectileImpact>,
    mut damage: EventWriter<DamageRequest>,
) {
    let dt = clock.delta();

    for (entity, mut projectile) in projectiles.iter_mut() {
        projectile.progress += projectile.speed * dt;
        if projectile.progress < 1.0 {
            continue;
        }

        commands.entity(entity).despawn();
        impacts.write(ProjectileImpact {
            target: projectile.target,
            damage: projectile.damage,
        });
        damage.write(DamageRequest {
            target: projectile.target,
            amount: projectile.damage,
            source: DamageSource::Shot,
        });
    }
}
