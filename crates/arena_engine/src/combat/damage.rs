//! The damage/kill pipeline.
//!
//! All enemy damage (shots, abilities, task strikes, focus strikes) arrives
//! here as `DamageRequest`s. The pipeline owns the no-op rules (missing
//! target, dying, dead), the kill sequence (loot, run bookkeeping, charge
//! grants, delayed terminal state) and wave-clear detection, which runs only
//! after a death delay completes.

use bevy::prelude::*;

use crate::abilities::AbilityState;
use crate::clock::ArenaClock;
use crate::combat::resolver::calculate_loot;
use crate::combat_log::{CombatLog, LogKind};
use crate::components::{Enemy, EnemyState, Health, Tier};
use crate::events::{
    DamageRequest, DamageSource, EnemyDamaged, EnemyKilled, VictoryEvent, WaveClearedEvent,
};
use crate::phase::{ArenaPhase, PhaseState};
use crate::run::{ArenaRun, RunStatus};
use crate::spawner::SpawnQueue;

/// Seconds a felled enemy stays in `dying` before turning `dead`.
pub const DEATH_ANIMATION_SECS: f64 = 0.6;

/// System: apply queued damage requests in arrival order.
///
/// Per request: reduce health (floored at zero), publish and log the hit; on
/// lethal damage run the kill sequence. Requests against missing or terminal
/// targets are dropped without side effects.
pub fn apply_enemy_damage(
    mut requests: EventReader<DamageRequest>,
    mut enemies: Query<(&Enemy, &mut Health, &mut EnemyState)>,
    clock: Res<ArenaClock>,
    mut run: ResMut<ArenaRun>,
    mut abilities: ResMut<AbilityState>,
    mut log: ResMut<CombatLog>,
    mut damaged: EventWriter<EnemyDamaged>,
    mut killed: EventWriter<EnemyKilled>,
) {
    let now = clock.now();

    for request in requests.read() {
        let Ok((enemy, mut health, mut state)) = enemies.get_mut(request.target) else {
            // Target died or was reset away between scheduling and firing.
            continue;
        };
        if state.is_terminal() {
            continue;
        }

        health.take_damage(request.amount);
        log.push(
            LogKind::Damage,
            damage_message(enemy, request.amount, request.source),
            now,
        );
        damaged.write(EnemyDamaged {
            enemy: request.target,
            amount: request.amount,
            remaining: health.current,
        });

        if health.current == 0 {
            *state = EnemyState::Dying {
                dead_at: now + DEATH_ANIMATION_SECS,
            };

            let loot = calculate_loot(enemy.tier, enemy.is_overdue);
            run.record_kill(enemy.tier == Tier::Boss, loot.xp);
            if loot.charges > 0 {
                abilities.grant_charges(loot.charges);
                log.push(
                    LogKind::System,
                    format!("+{} ability charge(s)", loot.charges),
                    now,
                );
            }

            log.push(
                LogKind::Kill,
                format!("{} destroyed (+{} XP)", enemy.name, loot.xp),
                now,
            );
            killed.write(EnemyKilled {
                enemy: request.target,
                xp: loot.xp,
                kills: run.kills,
            });
        }
    }
}

fn damage_message(enemy: &Enemy, amount: u32, source: DamageSource) -> String {
    match source {
        DamageSource::Shot => format!("Shot hits {} for {}", enemy.name, amount),
        DamageSource::Ability => format!("{} seared for {}", enemy.name, amount),
        DamageSource::TaskStrike => format!("Task complete: {} struck down", enemy.name),
        DamageSource::Focus => format!("Focus strike hits {} for {}", enemy.name, amount),
    }
}

/// System: complete death delays, then check for wave clear.
///
/// The wave is cleared iff the spawn queue is drained and no enemy is
/// spawning or active. Both transitions (wave_cleared, then victory) go
/// through the phase table; if either is refused the sequence stops rather
/// than forcing an illegal state.
pub fn finish_dying_enemies(
    clock: Res<ArenaClock>,
    mut enemies: Query<&mut EnemyState, With<Enemy>>,
    queue: Res<SpawnQueue>,
    mut phase: ResMut<PhaseState>,
    mut run: ResMut<ArenaRun>,
    mut log: ResMut<CombatLog>,
    mut wave_cleared: EventWriter<WaveClearedEvent>,
    mut victory: EventWriter<VictoryEvent>,
) {
    let now = clock.now();
    let mut any_completed = false;

    for mut state in enemies.iter_mut() {
        if let EnemyState::Dying { dead_at } = *state {
            if now >= dead_at {
                *state = EnemyState::Dead;
                any_completed = true;
            }
        }
    }

    if !any_completed {
        return;
    }
    if !queue.is_drained() || enemies.iter().any(|state| state.is_engaged()) {
        return;
    }

    if !phase.set(ArenaPhase::WaveCleared) {
        crate::logger::log("Wave-clear sequence stopped: transition refused");
        return;
    }
    wave_cleared.write(WaveClearedEvent);

    if !phase.set(ArenaPhase::Victory) {
        crate::logger::log("Victory sequence stopped: transition refused");
        return;
    }
    run.status = RunStatus::Completed;
    log.push(
        LogKind::System,
        format!(
            "Arena cleared: {} kills, {} XP",
            run.kills, run.xp_earned
        ),
        now,
    );
    victory.write(VictoryEvent {
        xp: run.xp_earned,
        kills: run.kills,
    });
}
