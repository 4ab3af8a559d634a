//! Event bus surface of the engine.
//!
//! Three groups:
//! - Intents: commands pushed in by the host app (UI clicks, task lifecycle
//!   notifications). Each is validated against phase/resource preconditions
//!   by its handler system; a rejected intent degrades to a logged no-op.
//! - Notifications: fire-and-forget facts published for the presentation
//!   layer. Payloads carry ids and numeric deltas only, never entity objects.
//! - Internal: `DamageRequest` funnels every source of enemy damage through
//!   the single damage/kill pipeline so ordering and no-op rules live in one
//!   place.

use bevy::prelude::*;

use crate::components::Tier;
use crate::waves::TaskRef;

// --- Intents (host app -> engine) ---

/// Reset the arena and seed a fresh run from the live task list.
#[derive(Event, Debug, Clone)]
pub struct InitializeArena {
    pub tasks: Vec<TaskRef>,
    pub seed: u64,
}

/// Begin releasing the queued wave. Legal only from the briefing phase.
#[derive(Event, Debug, Clone)]
pub struct StartWave;

/// Manual shot at an enemy. Legal only while a wave or boss fight is active.
#[derive(Event, Debug, Clone)]
pub struct ShootEnemyIntent {
    pub target: Entity,
}

/// Activate the ability at `index` in the static ability table.
#[derive(Event, Debug, Clone)]
pub struct ActivateAbilityIntent {
    pub index: usize,
}

/// Move the player; the result is clamped to the arena square on both axes.
#[derive(Event, Debug, Clone)]
pub struct MovePlayerIntent {
    pub dx: f32,
    pub dz: f32,
}

/// A task was completed outside the arena: instantly fell the matching enemy.
#[derive(Event, Debug, Clone)]
pub struct TaskCompleted {
    pub task_id: String,
}

/// A focus session started: target the matching enemy.
#[derive(Event, Debug, Clone)]
pub struct PomodoroStarted {
    pub task_id: String,
}

/// A focus session finished: strike the currently targeted enemy.
#[derive(Event, Debug, Clone)]
pub struct PomodoroCompleted;

/// Corruption pressure pushed in by the host app (e.g. overdue task ticks).
#[derive(Event, Debug, Clone)]
pub struct CorruptionDelta {
    pub delta: f32,
}

// --- Notifications (engine -> host app) ---

#[derive(Event, Debug, Clone)]
pub struct EnemySpawned {
    pub enemy: Entity,
    pub tier: Tier,
}

#[derive(Event, Debug, Clone)]
pub struct BossSpawned {
    pub enemy: Entity,
}

/// An enemy became the focus-session target.
#[derive(Event, Debug, Clone)]
pub struct EnemyTargeted {
    pub enemy: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct ProjectileImpact {
    pub target: Entity,
    pub damage: u32,
}

#[derive(Event, Debug, Clone)]
pub struct EnemyDamaged {
    pub enemy: Entity,
    pub amount: u32,
    /// Health remaining after the hit.
    pub remaining: u32,
}

#[derive(Event, Debug, Clone)]
pub struct EnemyKilled {
    pub enemy: Entity,
    pub xp: u32,
    /// Run kill count including this one.
    pub kills: u32,
}

#[derive(Event, Debug, Clone)]
pub struct CorruptionChanged {
    pub value: f32,
}

#[derive(Event, Debug, Clone)]
pub struct DefeatEvent {
    pub corruption: f32,
    pub kills: u32,
}

#[derive(Event, Debug, Clone)]
pub struct WaveClearedEvent;

#[derive(Event, Debug, Clone)]
pub struct VictoryEvent {
    pub xp: u32,
    pub kills: u32,
}

#[derive(Event, Debug, Clone)]
pub struct AbilityActivated {
    pub index: usize,
    pub id: &'static str,
}

// --- Internal ---

/// Where a damage request came from, for combat log flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Shot,
    Ability,
    TaskStrike,
    Focus,
}

/// Request to damage one enemy. Consumed by the damage pipeline, which owns
/// all no-op rules (missing target, dying, dead) and the kill sequence.
#[derive(Event, Debug, Clone)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: u32,
    pub source: DamageSource,
}
