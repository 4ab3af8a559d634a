//! Arena Engine
//!
//! Headless ECS combat simulation for the task-board arena: tasks become a
//! queued enemy wave, the player fells enemies with shots, abilities and
//! completed work, and a corruption accumulator drives the lose condition.
//!
//! Architecture:
//! - ECS = the whole engine (phase machine, registry, combat rules, events)
//! - Presentation/persistence live in the host app and talk to the engine
//!   exclusively through intent events in and notification events out
//!
//! All engine systems run chained in `Update`, so within one frame every
//! registry mutation, combat-log append and event publish happens in a fixed
//! order.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod abilities;
pub mod bridge;
pub mod buffs;
pub mod clock;
pub mod combat;
pub mod combat_log;
pub mod components;
pub mod corruption;
pub mod events;
pub mod logger;
pub mod movement;
pub mod phase;
pub mod run;
pub mod session;
pub mod spawner;
pub mod waves;

pub use abilities::{AbilityDef, AbilityEffect, AbilityState, ABILITIES, INITIAL_CHARGES};
pub use bridge::FocusTarget;
pub use buffs::{ActiveBuffs, Buff, BuffKind};
pub use clock::ArenaClock;
pub use combat::{
    calculate_focus_damage, calculate_loot, calculate_manual_shot_damage, Loot,
    DEATH_ANIMATION_SECS, PROJECTILE_SPEED,
};
pub use combat_log::{CombatLog, CombatLogEntry, LogKind, MAX_LOG_ENTRIES};
pub use components::*;
pub use corruption::Corruption;
pub use events::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger};
pub use movement::ARENA_RADIUS;
pub use phase::{can_transition, ArenaPhase, PhaseState};
pub use run::{ArenaRun, RunStatus};
pub use spawner::{SpawnQueue, SPAWNING_STATE_SECS, SPAWN_INTERVAL_SECS};
pub use waves::{generate_enemy_wave, EnemySpawn, TaskRef, BOSS_TASK_THRESHOLD};

/// Seed used when the host never reinitializes the arena explicitly.
pub const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG resource (seeded). Reseeded on every arena
/// initialization so a session's wave is reproducible.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Top-level engine plugin: all resources, events and the chained system
/// pipeline.
pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DeterministicRng::new(DEFAULT_SEED))
            .init_resource::<ArenaClock>()
            .init_resource::<PhaseState>()
            .init_resource::<CombatLog>()
            .init_resource::<ArenaRun>()
            .init_resource::<Corruption>()
            .init_resource::<ActiveBuffs>()
            .init_resource::<AbilityState>()
            .init_resource::<SpawnQueue>()
            .init_resource::<FocusTarget>();

        // Intents (host -> engine)
        app.add_event::<InitializeArena>()
            .add_event::<StartWave>()
            .add_event::<ShootEnemyIntent>()
            .add_event::<ActivateAbilityIntent>()
            .add_event::<MovePlayerIntent>()
            .add_event::<TaskCompleted>()
            .add_event::<PomodoroStarted>()
            .add_event::<PomodoroCompleted>()
            .add_event::<CorruptionDelta>();

        // Notifications (engine -> host)
        app.add_event::<EnemySpawned>()
            .add_event::<BossSpawned>()
            .add_event::<EnemyTargeted>()
            .add_event::<ProjectileImpact>()
            .add_event::<EnemyDamaged>()
            .add_event::<EnemyKilled>()
            .add_event::<CorruptionChanged>()
            .add_event::<DefeatEvent>()
            .add_event::<WaveClearedEvent>()
            .add_event::<VictoryEvent>()
            .add_event::<AbilityActivated>();

        // Internal
        app.add_event::<DamageRequest>();

        // One fixed order per frame:
        // 1. Clock and buff expiry
        // 2. Session lifecycle and spawning
        // 3. Player intents (movement, shots, abilities, task bridge)
        // 4. Damage pipeline, corruption, death completion + wave clear
        app.add_systems(
            Update,
            (
                clock::advance_clock,
                buffs::expire_buffs,
                session::handle_initialize_arena,
                spawner::handle_start_wave,
                spawner::tick_spawn_queue,
                spawner::activate_spawning_enemies,
                movement::handle_move_player,
                combat::handle_shoot_enemy,
                combat::tick_projectiles,
                abilities::handle_activate_ability,
                bridge::handle_task_completed,
                bridge::handle_pomodoro_started,
                bridge::handle_pomodoro_completed,
                combat::apply_enemy_damage,
                corruption::apply_corruption,
                combat::finish_dying_enemies,
            )
                .chain(),
        );
    }
}

/// Create a minimal Bevy App for headless simulation.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(ArenaPlugin)
        .insert_resource(DeterministicRng::new(seed));

    app
}
