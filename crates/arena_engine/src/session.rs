//! Arena session lifecycle.
//!
//! `InitializeArena` tears the previous attempt down completely (entities,
//! queue, run summary, corruption, buffs, charges, focus target) and seeds a
//! fresh run from the live task list. Because every timer in the engine is
//! state owned by these resources, the teardown also cancels all outstanding
//! spawn ticks and death delays in one stroke.

use bevy::prelude::*;

use crate::abilities::AbilityState;
use crate::buffs::ActiveBuffs;
use crate::clock::ArenaClock;
use crate::combat_log::{CombatLog, LogKind};
use crate::components::{Enemy, Health, Player, Projectile};
use crate::corruption::Corruption;
use crate::events::InitializeArena;
use crate::phase::{ArenaPhase, PhaseState};
use crate::run::ArenaRun;
use crate::spawner::SpawnQueue;
use crate::waves::generate_enemy_wave;
use crate::DeterministicRng;

use crate::bridge::FocusTarget;

/// System: reset the arena and seed a fresh run.
pub fn handle_initialize_arena(
    mut events: EventReader<InitializeArena>,
    mut commands: Commands,
    existing: Query<Entity, Or<(With<Enemy>, With<Projectile>, With<Player>)>>,
    mut rng: ResMut<DeterministicRng>,
    mut queue: ResMut<SpawnQueue>,
    mut phase: ResMut<PhaseState>,
    mut run: ResMut<ArenaRun>,
    mut corruption: ResMut<Corruption>,
    mut buffs: ResMut<ActiveBuffs>,
    mut abilities: ResMut<AbilityState>,
    mut focus: ResMut<FocusTarget>,
    mut log: ResMut<CombatLog>,
    clock: Res<ArenaClock>,
) {
    for init in events.read() {
        // Previous population is gone wholesale, player included.
        for entity in existing.iter() {
            commands.entity(entity).despawn();
        }

        phase.reset();
        phase.set(ArenaPhase::Loading);

        *rng = DeterministicRng::new(init.seed);
        let wave = generate_enemy_wave(&init.tasks, &mut rng.rng);
        let total = wave.len() as u32;
        queue.reload(wave);

        *run = ArenaRun::new(init.seed, total);
        corruption.reset();
        buffs.clear();
        abilities.reset();
        focus.clear();
        log.clear();

        commands.spawn((
            Transform::from_translation(Vec3::ZERO),
            Player::default(),
            Health::new(100),
        ));

        phase.set(ArenaPhase::Briefing);
        log.push(
            LogKind::System,
            format!("Arena online: {} hostiles queued", total),
            clock.now(),
        );
        crate::logger::log_info(&format!(
            "Arena initialized (seed {}, {} hostiles)",
            init.seed, total
        ));
    }
}
