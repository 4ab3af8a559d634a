//! Spawn scheduler.
//!
//! Consumes the precomputed wave queue at a fixed cadence. `StartWave` fires
//! one spawn immediately so the wave feels responsive, then arms the recurring
//! schedule. The schedule is an absolute `next_spawn_at` instant on the arena
//! clock; when the queue drains it is cleared (self-cancel), and leaving
//! combat (defeat, reinitialization) clears it as well, so no stale tick can
//! reach a fresh or finished arena.

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::clock::ArenaClock;
use crate::combat_log::{CombatLog, LogKind};
use crate::components::{Enemy, EnemyState, Health, Tier};
use crate::events::{BossSpawned, EnemySpawned, StartWave};
use crate::phase::{ArenaPhase, PhaseState};
use crate::waves::EnemySpawn;

/// Seconds between scheduled spawns.
pub const SPAWN_INTERVAL_SECS: f64 = 0.8;

/// How long a freshly spawned unit stays in the `spawning` state.
pub const SPAWNING_STATE_SECS: f64 = 0.4;

#[derive(Resource, Debug, Default)]
pub struct SpawnQueue {
    pending: VecDeque<EnemySpawn>,
    next_spawn_at: Option<f64>,
}

impl SpawnQueue {
    /// Replace the queue contents and cancel any armed schedule.
    pub fn reload(&mut self, wave: Vec<EnemySpawn>) {
        self.pending = wave.into();
        self.next_spawn_at = None;
    }

    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn timer_armed(&self) -> bool {
        self.next_spawn_at.is_some()
    }

    pub fn cancel(&mut self) {
        self.next_spawn_at = None;
    }
}

/// System: begin the wave. Legal only from briefing; an illegal call is a
/// logged no-op and spawns nothing.
pub fn handle_start_wave(
    mut events: EventReader<StartWave>,
    mut commands: Commands,
    mut queue: ResMut<SpawnQueue>,
    mut phase: ResMut<PhaseState>,
    clock: Res<ArenaClock>,
    mut log: ResMut<CombatLog>,
    mut spawned: EventWriter<EnemySpawned>,
    mut boss_spawned: EventWriter<BossSpawned>,
) {
    for _ in events.read() {
        if !phase.set(ArenaPhase::WaveActive) {
            continue;
        }

        let now = clock.now();
        log.push(LogKind::System, "Wave incoming", now);

        // Immediate first spawn, then the recurring schedule.
        if let Some(plan) = queue.pending.pop_front() {
            spawn_enemy(
                &mut commands,
                plan,
                now,
                &mut phase,
                &mut log,
                &mut spawned,
                &mut boss_spawned,
            );
        }
        if !queue.pending.is_empty() {
            queue.next_spawn_at = Some(now + SPAWN_INTERVAL_SECS);
        }
    }
}

/// System: release one queued enemy per elapsed interval. Clears the schedule
/// when the queue drains.
pub fn tick_spawn_queue(
    mut commands: Commands,
    mut queue: ResMut<SpawnQueue>,
    mut phase: ResMut<PhaseState>,
    clock: Res<ArenaClock>,
    mut log: ResMut<CombatLog>,
    mut spawned: EventWriter<EnemySpawned>,
    mut boss_spawned: EventWriter<BossSpawned>,
) {
    // Defeat mid-wave must not keep releasing enemies.
    if !phase.in_combat() {
        queue.cancel();
        return;
    }

    while let Some(due) = queue.next_spawn_at {
        if clock.now() < due {
            break;
        }

        if let Some(plan) = queue.pending.pop_front() {
            spawn_enemy(
                &mut commands,
                plan,
                clock.now(),
                &mut phase,
                &mut log,
                &mut spawned,
                &mut boss_spawned,
            );
        }

        if queue.pending.is_empty() {
            queue.cancel();
        } else {
            queue.next_spawn_at = Some(due + SPAWN_INTERVAL_SECS);
        }
    }
}

/// System: flip `spawning` units to `active` once their entry window passes.
pub fn activate_spawning_enemies(
    clock: Res<ArenaClock>,
    mut enemies: Query<&mut EnemyState, With<Enemy>>,
) {
    let now = clock.now();
    for mut state in enemies.iter_mut() {
        if let EnemyState::Spawning { active_at } = *state {
            if now >= active_at {
                *state = EnemyState::Active;
            }
        }
    }
}

fn spawn_enemy(
    commands: &mut Commands,
    plan: EnemySpawn,
    now: f64,
    phase: &mut PhaseState,
    log: &mut CombatLog,
    spawned: &mut EventWriter<EnemySpawned>,
    boss_spawned: &mut EventWriter<BossSpawned>,
) {
    let tier = plan.tier;
    let entity = commands
        .spawn((
            Transform::from_translation(plan.position),
            Enemy {
                tier,
                name: plan.name.clone(),
                task_id: plan.task_id,
                is_overdue: plan.is_overdue,
            },
            Health::new(plan.max_health),
            EnemyState::Spawning {
                active_at: now + SPAWNING_STATE_SECS,
            },
        ))
        .id();

    log.push(
        LogKind::System,
        format!("{} [{}] breaches the arena", plan.name, tier.as_str()),
        now,
    );
    spawned.write(EnemySpawned { enemy: entity, tier });

    if tier == Tier::Boss {
        boss_spawned.write(BossSpawned { enemy: entity });
        // Boss arrival escalates the fight; the table rejects it if the wave
        // has already resolved.
        phase.set(ArenaPhase::BossPhase);
    }
}
