//! Arena engine integration tests.
//!
//! Drives a full headless App through whole-session scenarios: wave spawning,
//! shooting, abilities, corruption, the task bridge, and win/lose sequencing.
//! Time is stepped deterministically through the arena clock.

use arena_engine::*;
use bevy::prelude::*;

// --- Helpers ---

fn task(id: &str) -> TaskRef {
    TaskRef {
        id: id.to_string(),
        title: format!("task {}", id),
        is_overdue: false,
    }
}

fn setup_arena(tasks: Vec<TaskRef>) -> App {
    let mut app = create_headless_app(7);
    app.world_mut().send_event(InitializeArena { tasks, seed: 7 });
    app.update();
    app
}

/// Advance the arena clock and run one frame.
fn tick(app: &mut App, secs: f32) {
    app.world_mut().resource_mut::<ArenaClock>().skip(secs);
    app.update();
}

fn phase(app: &App) -> ArenaPhase {
    app.world().resource::<PhaseState>().current()
}

fn enemy_snapshot(app: &mut App) -> Vec<(Entity, u32, EnemyState)> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<(Entity, &Health, &EnemyState), With<Enemy>>();
    query
        .iter(world)
        .map(|(entity, health, state)| (entity, health.current, state.clone()))
        .collect()
}

fn projectile_count(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query::<&Projectile>();
    query.iter(world).count()
}

fn drain_events<E: Event + Clone>(app: &mut App) -> Vec<E> {
    let mut events = app.world_mut().resource_mut::<Events<E>>();
    events.drain().collect()
}

// --- Session / spawn scheduler ---

#[test]
fn test_initialize_then_start_wave_spawns_immediately() {
    let mut app = setup_arena(vec![task("t1"), task("t2")]);

    assert_eq!(phase(&app), ArenaPhase::Briefing);
    assert_eq!(app.world().resource::<SpawnQueue>().pending_len(), 2);
    assert_eq!(app.world().resource::<ArenaRun>().total_enemies, 2);

    app.world_mut().send_event(StartWave);
    app.update();

    // Immediate first spawn, schedule armed for the second
    assert_eq!(phase(&app), ArenaPhase::WaveActive);
    assert_eq!(enemy_snapshot(&mut app).len(), 1);
    assert_eq!(drain_events::<EnemySpawned>(&mut app).len(), 1);
    assert!(app.world().resource::<SpawnQueue>().timer_armed());

    // One interval later the second enemy arrives and the schedule cancels
    tick(&mut app, 0.85);
    assert_eq!(enemy_snapshot(&mut app).len(), 2);
    assert!(!app.world().resource::<SpawnQueue>().timer_armed());
    assert!(app.world().resource::<SpawnQueue>().is_drained());

    // No phantom (N+1)-th spawn
    tick(&mut app, 2.0);
    assert_eq!(enemy_snapshot(&mut app).len(), 2);
}

#[test]
fn test_start_wave_outside_briefing_is_noop() {
    let mut app = setup_arena(vec![task("t1")]);

    app.world_mut().send_event(StartWave);
    app.update();
    assert_eq!(phase(&app), ArenaPhase::WaveActive);

    // A second StartWave mid-wave is rejected and spawns nothing extra
    app.world_mut().send_event(StartWave);
    app.update();
    assert_eq!(phase(&app), ArenaPhase::WaveActive);
    assert_eq!(enemy_snapshot(&mut app).len(), 1);
}

#[test]
fn test_boss_appended_and_escalates_phase() {
    let tasks: Vec<_> = (0..BOSS_TASK_THRESHOLD).map(|i| task(&i.to_string())).collect();
    let mut app = setup_arena(tasks);

    let total = app.world().resource::<ArenaRun>().total_enemies;
    assert_eq!(total, BOSS_TASK_THRESHOLD as u32 + 1);

    app.world_mut().send_event(StartWave);
    app.update();
    for _ in 0..total {
        tick(&mut app, 0.85);
    }

    assert_eq!(enemy_snapshot(&mut app).len(), total as usize);
    assert_eq!(drain_events::<BossSpawned>(&mut app).len(), 1);
    assert_eq!(phase(&app), ArenaPhase::BossPhase);
    assert!(!app.world().resource::<SpawnQueue>().timer_armed());
}

#[test]
fn test_defeat_cancels_spawn_schedule() {
    let mut app = setup_arena(vec![task("t1"), task("t2"), task("t3")]);
    app.world_mut().send_event(StartWave);
    app.update();
    assert!(app.world().resource::<SpawnQueue>().timer_armed());
    drain_events::<EnemySpawned>(&mut app);

    app.world_mut().send_event(CorruptionDelta { delta: 2.0 });
    app.update();
    assert_eq!(phase(&app), ArenaPhase::Defeat);

    // The remaining queue must never release into a finished arena
    tick(&mut app, 3.0);
    assert!(!app.world().resource::<SpawnQueue>().timer_armed());
    assert_eq!(enemy_snapshot(&mut app).len(), 1);
    assert_eq!(drain_events::<EnemySpawned>(&mut app).len(), 0);
}

#[test]
fn test_reinitialize_clears_population_and_schedule() {
    let mut app = setup_arena(vec![task("t1"), task("t2"), task("t3")]);
    app.world_mut().send_event(StartWave);
    app.update();
    assert!(app.world().resource::<SpawnQueue>().timer_armed());

    app.world_mut().send_event(InitializeArena {
        tasks: vec![task("x")],
        seed: 9,
    });
    app.update();

    assert_eq!(phase(&app), ArenaPhase::Briefing);
    assert_eq!(enemy_snapshot(&mut app).len(), 0);
    assert!(!app.world().resource::<SpawnQueue>().timer_armed());
    assert_eq!(app.world().resource::<SpawnQueue>().pending_len(), 1);

    // The old run's schedule must not leak ticks into the fresh arena
    tick(&mut app, 3.0);
    assert_eq!(enemy_snapshot(&mut app).len(), 0);
}

// --- Shooting ---

#[test]
fn test_shoot_during_briefing_is_noop() {
    let mut app = setup_arena(vec![task("t1")]);
    assert_eq!(phase(&app), ArenaPhase::Briefing);

    app.world_mut().send_event(ShootEnemyIntent {
        target: Entity::from_raw(9999),
    });
    app.update();

    assert_eq!(projectile_count(&mut app), 0);
    assert_eq!(enemy_snapshot(&mut app).len(), 0);
}

#[test]
fn test_shot_damage_lands_on_projectile_impact() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.5); // Spawning -> Active

    let (enemy, health_before, _) = enemy_snapshot(&mut app)[0].clone();

    app.world_mut().send_event(ShootEnemyIntent { target: enemy });
    app.update();

    // Damage is deferred until impact
    assert_eq!(projectile_count(&mut app), 1);
    assert_eq!(enemy_snapshot(&mut app)[0].1, health_before);

    tick(&mut app, 0.3); // Flight completes
    assert_eq!(projectile_count(&mut app), 0);
    assert_eq!(drain_events::<ProjectileImpact>(&mut app).len(), 1);

    let damaged = drain_events::<EnemyDamaged>(&mut app);
    assert_eq!(damaged.len(), 1);
    assert_eq!(enemy_snapshot(&mut app)[0].1, health_before - damaged[0].amount);
}

#[test]
fn test_projectile_impact_on_vanished_target_is_noop() {
    let mut app = setup_arena(vec![task("t1"), task("t2")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.85);

    let (target, _, _) = enemy_snapshot(&mut app)[0].clone();
    app.world_mut().send_event(ShootEnemyIntent { target });
    app.update();

    // Target is removed mid-flight
    app.world_mut().entity_mut(target).despawn();

    tick(&mut app, 0.3);
    assert_eq!(projectile_count(&mut app), 0);
    assert_eq!(drain_events::<EnemyDamaged>(&mut app).len(), 0);
    assert_eq!(app.world().resource::<ArenaRun>().kills, 0);
}

// --- Damage pipeline / enemy lifecycle ---

#[test]
fn test_overkill_clamps_to_zero_and_runs_kill_sequence() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.5);

    let (enemy, health, _) = enemy_snapshot(&mut app)[0].clone();
    app.world_mut().send_event(DamageRequest {
        target: enemy,
        amount: health + 10,
        source: DamageSource::Shot,
    });
    app.update();

    let (_, health_after, state) = enemy_snapshot(&mut app)[0].clone();
    assert_eq!(health_after, 0);
    assert!(matches!(state, EnemyState::Dying { .. }));
    assert_eq!(app.world().resource::<ArenaRun>().kills, 1);
    assert!(app.world().resource::<ArenaRun>().xp_earned > 0);
    assert_eq!(drain_events::<EnemyKilled>(&mut app).len(), 1);

    // Death-animation delay, then terminal state
    tick(&mut app, 0.7);
    let (_, _, state) = enemy_snapshot(&mut app)[0].clone();
    assert_eq!(state, EnemyState::Dead);
}

#[test]
fn test_terminal_enemies_ignore_further_damage() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.5);

    let (enemy, health, _) = enemy_snapshot(&mut app)[0].clone();
    app.world_mut().send_event(DamageRequest {
        target: enemy,
        amount: health,
        source: DamageSource::Shot,
    });
    app.update();
    assert_eq!(app.world().resource::<ArenaRun>().kills, 1);
    drain_events::<EnemyKilled>(&mut app);

    // While dying and after dead: damage and kill attempts are no-ops
    for wait in [0.0, 1.0] {
        tick(&mut app, wait);
        app.world_mut().send_event(DamageRequest {
            target: enemy,
            amount: 999,
            source: DamageSource::Shot,
        });
        app.update();

        let (_, health_after, state) = enemy_snapshot(&mut app)[0].clone();
        assert_eq!(health_after, 0);
        assert!(state.is_terminal());
        assert_eq!(app.world().resource::<ArenaRun>().kills, 1);
        assert_eq!(drain_events::<EnemyKilled>(&mut app).len(), 0);
    }
}

// --- Wave clear / victory ---

#[test]
fn test_single_active_enemy_blocks_wave_clear() {
    let mut app = setup_arena(vec![task("t1"), task("t2")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.85); // Both spawned, queue drained

    app.world_mut().send_event(TaskCompleted {
        task_id: "t1".to_string(),
    });
    app.update();
    tick(&mut app, 0.7); // First death completes

    // One active enemy remains: no clear, no victory
    assert_eq!(phase(&app), ArenaPhase::WaveActive);
    assert_eq!(drain_events::<WaveClearedEvent>(&mut app).len(), 0);

    app.world_mut().send_event(TaskCompleted {
        task_id: "t2".to_string(),
    });
    app.update();
    tick(&mut app, 0.7);

    assert_eq!(phase(&app), ArenaPhase::Victory);
    assert_eq!(drain_events::<WaveClearedEvent>(&mut app).len(), 1);
    let victory = drain_events::<VictoryEvent>(&mut app);
    assert_eq!(victory.len(), 1);
    assert_eq!(victory[0].kills, 2);

    let run = app.world().resource::<ArenaRun>();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.xp_earned, victory[0].xp);
}

// --- Task / pomodoro bridge ---

#[test]
fn test_task_completed_fells_matching_enemy_outright() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.5);

    let (_, health, _) = enemy_snapshot(&mut app)[0].clone();
    assert!(health > 0);

    app.world_mut().send_event(TaskCompleted {
        task_id: "t1".to_string(),
    });
    app.update();

    // Exactly H damage: instant kill regardless of magnitude
    let (_, health_after, state) = enemy_snapshot(&mut app)[0].clone();
    assert_eq!(health_after, 0);
    assert!(state.is_terminal());
    let damaged = drain_events::<EnemyDamaged>(&mut app);
    assert_eq!(damaged[0].amount, health);
}

#[test]
fn test_task_completed_without_match_is_noop() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.5);

    app.world_mut().send_event(TaskCompleted {
        task_id: "unknown".to_string(),
    });
    app.update();

    assert_eq!(app.world().resource::<ArenaRun>().kills, 0);
    assert_eq!(drain_events::<EnemyDamaged>(&mut app).len(), 0);
}

#[test]
fn test_pomodoro_targets_then_strikes() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.5);

    let (enemy, health, _) = enemy_snapshot(&mut app)[0].clone();

    app.world_mut().send_event(PomodoroStarted {
        task_id: "t1".to_string(),
    });
    app.update();
    let targeted = drain_events::<EnemyTargeted>(&mut app);
    assert_eq!(targeted.len(), 1);
    assert_eq!(targeted[0].enemy, enemy);
    assert_eq!(app.world().resource::<FocusTarget>().get(), Some(enemy));

    app.world_mut().send_event(PomodoroCompleted);
    app.update();

    let damaged = drain_events::<EnemyDamaged>(&mut app);
    assert_eq!(damaged.len(), 1);
    assert_eq!(enemy_snapshot(&mut app)[0].1, health.saturating_sub(damaged[0].amount));
}

#[test]
fn test_pomodoro_completed_without_target_is_noop() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();

    app.world_mut().send_event(PomodoroCompleted);
    app.update();
    assert_eq!(drain_events::<EnemyDamaged>(&mut app).len(), 0);
}

// --- Abilities ---

#[test]
fn test_rejected_ability_never_debits_charges() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();

    // Overclock costs 2, the fresh run has 1
    let charges_before = app.world().resource::<AbilityState>().charges;
    app.world_mut().send_event(ActivateAbilityIntent { index: 1 });
    app.update();

    assert_eq!(app.world().resource::<AbilityState>().charges, charges_before);
    assert_eq!(app.world().resource::<ArenaRun>().abilities_used, 0);
    assert_eq!(drain_events::<AbilityActivated>(&mut app).len(), 0);

    // Out-of-range index: plain no-op
    app.world_mut().send_event(ActivateAbilityIntent { index: 99 });
    app.update();
    assert_eq!(app.world().resource::<AbilityState>().charges, charges_before);
    assert_eq!(drain_events::<AbilityActivated>(&mut app).len(), 0);
}

#[test]
fn test_cooldown_rejection_preserves_charges() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();
    app.world_mut().resource_mut::<AbilityState>().grant_charges(10);

    app.world_mut().send_event(ActivateAbilityIntent { index: 0 });
    app.update();
    assert_eq!(drain_events::<AbilityActivated>(&mut app).len(), 1);
    let charges_after_first = app.world().resource::<AbilityState>().charges;

    // Immediately again: cooldown gate rejects, charges untouched
    app.world_mut().send_event(ActivateAbilityIntent { index: 0 });
    app.update();
    assert_eq!(app.world().resource::<AbilityState>().charges, charges_after_first);
    assert_eq!(drain_events::<AbilityActivated>(&mut app).len(), 0);
    assert_eq!(app.world().resource::<ArenaRun>().abilities_used, 1);

    // Ready again after the cooldown window
    tick(&mut app, 8.5);
    app.world_mut().send_event(ActivateAbilityIntent { index: 0 });
    app.update();
    assert_eq!(drain_events::<AbilityActivated>(&mut app).len(), 1);
}

#[test]
fn test_ability_rejected_outside_combat() {
    // Briefing: nothing debited or executed
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(ActivateAbilityIntent { index: 0 });
    app.update();
    assert_eq!(app.world().resource::<AbilityState>().charges, INITIAL_CHARGES);
    assert_eq!(app.world().resource::<ArenaRun>().abilities_used, 0);
    assert_eq!(drain_events::<AbilityActivated>(&mut app).len(), 0);

    // After a corruption defeat the finalized run must stay untouched
    app.world_mut().send_event(StartWave);
    app.update();
    app.world_mut().send_event(CorruptionDelta { delta: 2.0 });
    app.update();
    assert_eq!(phase(&app), ArenaPhase::Defeat);
    assert_eq!(app.world().resource::<ArenaRun>().status, RunStatus::Abandoned);

    app.world_mut().send_event(ActivateAbilityIntent { index: 0 });
    app.update();
    assert_eq!(app.world().resource::<AbilityState>().charges, INITIAL_CHARGES);
    assert_eq!(app.world().resource::<ArenaRun>().abilities_used, 0);
    assert_eq!(drain_events::<AbilityActivated>(&mut app).len(), 0);
}

#[test]
fn test_purge_pulse_hits_every_living_enemy() {
    let mut app = setup_arena(vec![task("t1"), task("t2")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.85);

    let before = enemy_snapshot(&mut app);
    app.world_mut().send_event(ActivateAbilityIntent { index: 0 });
    app.update();

    let after = enemy_snapshot(&mut app);
    for ((_, health_before, _), (_, health_after, _)) in before.iter().zip(after.iter()) {
        assert_eq!(*health_after, health_before.saturating_sub(15));
    }
    assert_eq!(drain_events::<AbilityActivated>(&mut app).len(), 1);
}

#[test]
fn test_kill_process_executes_lowest_health_enemy() {
    let mut app = setup_arena(vec![task("t1"), task("t2")]);
    app.world_mut().send_event(StartWave);
    app.update();
    tick(&mut app, 0.85);

    // Wound the second enemy down to 1 so it is strictly weakest
    let (weak, weak_health_before, _) = enemy_snapshot(&mut app)[1].clone();
    app.world_mut().send_event(DamageRequest {
        target: weak,
        amount: weak_health_before - 1,
        source: DamageSource::Shot,
    });
    app.update();

    app.world_mut().resource_mut::<AbilityState>().grant_charges(10);
    app.world_mut().send_event(ActivateAbilityIntent { index: 3 });
    app.update();

    let snapshot = enemy_snapshot(&mut app);
    let (_, weak_health, weak_state) = snapshot
        .iter()
        .find(|(entity, _, _)| *entity == weak)
        .unwrap()
        .clone();
    assert_eq!(weak_health, 0);
    assert!(weak_state.is_terminal());
    assert_eq!(app.world().resource::<ArenaRun>().kills, 1);
}

// --- Corruption ---

#[test]
fn test_corruption_clamps_and_defeat_fires_once() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();

    // Clamped into a no-op: no state change and no event
    app.world_mut().send_event(CorruptionDelta { delta: -0.5 });
    app.update();
    assert_eq!(app.world().resource::<Corruption>().value(), 0.0);
    assert_eq!(drain_events::<CorruptionChanged>(&mut app).len(), 0);

    app.world_mut().send_event(CorruptionDelta { delta: 5.0 });
    app.update();
    assert_eq!(app.world().resource::<Corruption>().value(), 1.0);
    assert_eq!(phase(&app), ArenaPhase::Defeat);
    assert_eq!(app.world().resource::<ArenaRun>().status, RunStatus::Abandoned);
    assert_eq!(app.world().resource::<ArenaRun>().peak_corruption, 1.0);
    assert_eq!(drain_events::<DefeatEvent>(&mut app).len(), 1);
    assert_eq!(drain_events::<CorruptionChanged>(&mut app).len(), 1);

    // Further additions must not re-trigger defeat or publish a change
    app.world_mut().send_event(CorruptionDelta { delta: 0.5 });
    app.update();
    assert_eq!(app.world().resource::<Corruption>().value(), 1.0);
    assert_eq!(drain_events::<DefeatEvent>(&mut app).len(), 0);
    assert_eq!(drain_events::<CorruptionChanged>(&mut app).len(), 0);
}

#[test]
fn test_firewall_suppresses_corruption_entirely() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();

    let now = app.world().resource::<ArenaClock>().now();
    app.world_mut()
        .resource_mut::<ActiveBuffs>()
        .grant(BuffKind::Firewall, now, 8.0);

    app.world_mut().send_event(CorruptionDelta { delta: 0.9 });
    app.update();
    assert_eq!(app.world().resource::<Corruption>().value(), 0.0);
    assert_eq!(drain_events::<CorruptionChanged>(&mut app).len(), 0);

    // Immunity ends with the buff window
    tick(&mut app, 9.0);
    app.world_mut().send_event(CorruptionDelta { delta: 0.5 });
    app.update();
    assert_eq!(app.world().resource::<Corruption>().value(), 0.5);
    assert_eq!(drain_events::<CorruptionChanged>(&mut app).len(), 1);
}

#[test]
fn test_peak_corruption_survives_recovery() {
    let mut app = setup_arena(vec![task("t1")]);
    app.world_mut().send_event(StartWave);
    app.update();

    app.world_mut().send_event(CorruptionDelta { delta: 0.4 });
    app.update();
    app.world_mut().send_event(CorruptionDelta { delta: -0.3 });
    app.update();

    let run = app.world().resource::<ArenaRun>();
    assert!((app.world().resource::<Corruption>().value() - 0.1).abs() < 1e-5);
    assert_eq!(run.peak_corruption, 0.4);
}

// --- Movement ---

#[test]
fn test_player_movement_clamps_per_axis() {
    let mut app = setup_arena(vec![task("t1")]);

    app.world_mut().send_event(MovePlayerIntent { dx: 100.0, dz: -100.0 });
    app.update();

    let world = app.world_mut();
    let mut query = world.query_filtered::<&Transform, With<Player>>();
    let transform = query.single(world).unwrap();
    assert_eq!(transform.translation.x, ARENA_RADIUS);
    assert_eq!(transform.translation.z, -ARENA_RADIUS);
}
