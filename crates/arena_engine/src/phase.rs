//! Arena phase state machine.
//!
//! The phase is the single gate against inconsistent actions: every
//! phase-sensitive system checks the current phase first and no-ops when the
//! phase forbids the action. Transitions go through [`PhaseState::set`], which
//! consults the allowed-transition table and refuses everything else.

use bevy::prelude::*;

/// Top-level state of one arena attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaPhase {
    Idle,
    Loading,
    Briefing,
    WaveActive,
    WaveCleared,
    BossPhase,
    Victory,
    Defeat,
}

impl ArenaPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaPhase::Idle => "idle",
            ArenaPhase::Loading => "loading",
            ArenaPhase::Briefing => "briefing",
            ArenaPhase::WaveActive => "wave_active",
            ArenaPhase::WaveCleared => "wave_cleared",
            ArenaPhase::BossPhase => "boss_phase",
            ArenaPhase::Victory => "victory",
            ArenaPhase::Defeat => "defeat",
        }
    }
}

/// Transition legality table.
///
/// Victory and Defeat are terminal: nothing leads out of them here. A fresh
/// arena initialization resets the machine to Idle instead.
pub fn can_transition(from: ArenaPhase, to: ArenaPhase) -> bool {
    use ArenaPhase::*;

    matches!(
        (from, to),
        (Idle, Loading)
            | (Loading, Briefing)
            | (Briefing, WaveActive)
            | (WaveActive, BossPhase)
            | (WaveActive, WaveCleared)
            | (BossPhase, WaveCleared)
            | (WaveCleared, Victory)
            | (Briefing, Defeat)
            | (WaveActive, Defeat)
            | (BossPhase, Defeat)
            | (WaveCleared, Defeat)
    )
}

/// Current arena phase, owned by the orchestrator.
#[derive(Resource, Debug)]
pub struct PhaseState {
    current: ArenaPhase,
}

impl Default for PhaseState {
    fn default() -> Self {
        Self {
            current: ArenaPhase::Idle,
        }
    }
}

impl PhaseState {
    pub fn current(&self) -> ArenaPhase {
        self.current
    }

    /// Attempt a transition. On an illegal pair the phase is left unchanged
    /// and `false` is returned; callers must abort dependent logic.
    pub fn set(&mut self, target: ArenaPhase) -> bool {
        if can_transition(self.current, target) {
            crate::logger::log(&format!(
                "Phase transition: {} -> {}",
                self.current.as_str(),
                target.as_str()
            ));
            self.current = target;
            true
        } else {
            crate::logger::log_warning(&format!(
                "Illegal phase transition rejected: {} -> {}",
                self.current.as_str(),
                target.as_str()
            ));
            false
        }
    }

    /// Hard reset to Idle. Only arena initialization uses this; everything
    /// else goes through the transition table.
    pub fn reset(&mut self) {
        self.current = ArenaPhase::Idle;
    }

    pub fn in_combat(&self) -> bool {
        matches!(self.current, ArenaPhase::WaveActive | ArenaPhase::BossPhase)
    }
}
