use bevy::prelude::*;

/// Enemy category. Determines stats and loot weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Tier {
    Grunt,
    Standard,
    Elite,
    Boss,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Grunt => "grunt",
            Tier::Standard => "standard",
            Tier::Elite => "elite",
            Tier::Boss => "boss",
        }
    }
}

/// A hostile unit generated from the task list.
///
/// `task_id` is a lookup key into the productivity side of the app, never an
/// owning reference; the bridge systems match on it to route task events.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub tier: Tier,
    /// Display name used in combat log lines.
    pub name: String,
    pub task_id: Option<String>,
    pub is_overdue: bool,
}

/// Enemy lifecycle state machine.
///
/// spawning -> active -> dying -> dead. Dead is terminal; the entity is kept
/// for bookkeeping, not despawned. Damage and kill operations are no-ops once
/// a unit is dying or dead.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    /// Materializing; flips to Active once `active_at` passes.
    Spawning { active_at: f64 },
    Active,
    /// Lethal damage taken; flips to Dead once `dead_at` passes
    /// (death-animation window).
    Dying { dead_at: f64 },
    Dead,
}

impl EnemyState {
    /// Dying or dead units ignore further damage and kills.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EnemyState::Dying { .. } | EnemyState::Dead)
    }

    /// Spawning or active. Blocks wave-clear detection.
    pub fn is_engaged(&self) -> bool {
        matches!(self, EnemyState::Spawning { .. } | EnemyState::Active)
    }
}
