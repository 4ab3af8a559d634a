//! Timed buffs.
//!
//! A buff is active iff `now - started_at < duration`. Buffs are never
//! removed explicitly; a periodic sweep drops expired ones. Multiple buffs of
//! different kinds may be active at once; "the" active buff for display
//! purposes is the earliest unexpired one.

use bevy::prelude::*;

use crate::clock::ArenaClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BuffKind {
    /// Doubles shot and focus damage.
    Overclock,
    /// Complete corruption immunity while active.
    Firewall,
}

impl BuffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuffKind::Overclock => "overclock",
            BuffKind::Firewall => "firewall",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Buff {
    pub kind: BuffKind,
    pub started_at: f64,
    pub duration: f64,
}

impl Buff {
    pub fn is_active(&self, now: f64) -> bool {
        now - self.started_at < self.duration
    }
}

#[derive(Resource, Debug, Default)]
pub struct ActiveBuffs {
    buffs: Vec<Buff>,
}

impl ActiveBuffs {
    pub fn grant(&mut self, kind: BuffKind, now: f64, duration: f64) {
        self.buffs.push(Buff {
            kind,
            started_at: now,
            duration,
        });
    }

    pub fn is_active(&self, kind: BuffKind, now: f64) -> bool {
        self.buffs
            .iter()
            .any(|b| b.kind == kind && b.is_active(now))
    }

    /// The display buff: earliest unexpired one.
    pub fn current(&self, now: f64) -> Option<&Buff> {
        self.buffs
            .iter()
            .filter(|b| b.is_active(now))
            .min_by(|a, b| a.started_at.total_cmp(&b.started_at))
    }

    /// Drop expired buffs.
    pub fn sweep(&mut self, now: f64) {
        self.buffs.retain(|b| b.is_active(now));
    }

    pub fn clear(&mut self) {
        self.buffs.clear();
    }
}

/// System: periodic expiry sweep.
pub fn expire_buffs(clock: Res<ArenaClock>, mut buffs: ResMut<ActiveBuffs>) {
    buffs.sweep(clock.now());
}
