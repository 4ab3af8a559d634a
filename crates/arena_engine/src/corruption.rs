//! Corruption, the lose-condition accumulator.
//!
//! Clamped to [0, 1]. A firewall buff suppresses additions entirely (full
//! immunity, no event, no log), and a delta the clamp reduces to no change
//! publishes nothing. Crossing from below 1 to 1 is the sole defeat trigger
//! and fires exactly once per run.

use bevy::prelude::*;

use crate::buffs::{ActiveBuffs, BuffKind};
use crate::clock::ArenaClock;
use crate::combat_log::{CombatLog, LogKind};
use crate::events::{CorruptionChanged, CorruptionDelta, DefeatEvent};
use crate::phase::{ArenaPhase, PhaseState};
use crate::run::{ArenaRun, RunStatus};

#[derive(Resource, Debug, Default)]
pub struct Corruption {
    value: f32,
}

impl Corruption {
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// System: apply corruption deltas.
pub fn apply_corruption(
    mut deltas: EventReader<CorruptionDelta>,
    mut corruption: ResMut<Corruption>,
    buffs: Res<ActiveBuffs>,
    clock: Res<ArenaClock>,
    mut run: ResMut<ArenaRun>,
    mut phase: ResMut<PhaseState>,
    mut log: ResMut<CombatLog>,
    mut changed: EventWriter<CorruptionChanged>,
    mut defeat: EventWriter<DefeatEvent>,
) {
    let now = clock.now();

    for event in deltas.read() {
        if buffs.is_active(BuffKind::Firewall, now) {
            // Full immunity: no state change, no event.
            continue;
        }

        let before = corruption.value;
        corruption.value = (corruption.value + event.delta).clamp(0.0, 1.0);
        if corruption.value == before {
            // Clamped into a no-op (e.g. a negative delta at zero).
            continue;
        }
        if corruption.value > run.peak_corruption {
            run.peak_corruption = corruption.value;
        }
        changed.write(CorruptionChanged {
            value: corruption.value,
        });

        // Defeat fires only on the first crossing.
        if before < 1.0 && corruption.value >= 1.0 {
            if !phase.set(ArenaPhase::Defeat) {
                continue;
            }
            run.status = RunStatus::Abandoned;
            log.push(
                LogKind::System,
                format!(
                    "SYSTEM FAILURE: corruption {:.0}%, {} kills",
                    corruption.value * 100.0,
                    run.kills
                ),
                now,
            );
            defeat.write(DefeatEvent {
                corruption: corruption.value,
                kills: run.kills,
            });
        }
    }
}
