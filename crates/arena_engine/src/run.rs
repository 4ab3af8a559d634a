//! Per-attempt run summary.
//!
//! Created at arena initialization, mutated throughout the attempt, finalized
//! (status set) at victory or defeat. The finalized record is the only
//! artifact that outlives a run; the host app reads and persists it untouched.

use bevy::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Active,
    Completed,
    Abandoned,
}

#[derive(Resource, Debug, Clone, Serialize)]
pub struct ArenaRun {
    pub date: String,
    pub seed: u64,
    pub total_enemies: u32,
    pub kills: u32,
    pub boss_defeated: bool,
    pub abilities_used: u32,
    pub xp_earned: u32,
    pub peak_corruption: f32,
    pub status: RunStatus,
}

impl Default for ArenaRun {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl ArenaRun {
    pub fn new(seed: u64, total_enemies: u32) -> Self {
        Self {
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            seed,
            total_enemies,
            kills: 0,
            boss_defeated: false,
            abilities_used: 0,
            xp_earned: 0,
            peak_corruption: 0.0,
            status: RunStatus::Active,
        }
    }

    pub fn record_kill(&mut self, tier_is_boss: bool, xp: u32) {
        self.kills += 1;
        self.xp_earned += xp;
        if tier_is_boss {
            self.boss_defeated = true;
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status != RunStatus::Active
    }
}
