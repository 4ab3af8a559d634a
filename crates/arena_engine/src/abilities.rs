//! Ability system.
//!
//! Abilities are a closed, statically defined table: charge cost, cooldown
//! and a tagged effect variant, exhaustively matched at activation. Charges
//! are earned from kills; cooldowns are absolute ready-at instants on the
//! arena clock. Activation is legal only while a wave or boss fight is
//! active, and every precondition must pass before any resource is spent;
//! a rejected activation never partially consumes a charge.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::buffs::{ActiveBuffs, BuffKind};
use crate::clock::ArenaClock;
use crate::combat_log::{CombatLog, LogKind};
use crate::components::{Enemy, EnemyState, Health};
use crate::events::{AbilityActivated, ActivateAbilityIntent, DamageRequest, DamageSource};
use crate::phase::PhaseState;
use crate::run::ArenaRun;

/// Charges a fresh run starts with.
pub const INITIAL_CHARGES: u32 = 1;

#[derive(Debug, Clone, Copy)]
pub enum AbilityEffect {
    /// Damage every living enemy.
    DamageAll { amount: u32 },
    /// Grant a timed buff.
    GrantBuff { kind: BuffKind, duration: f64 },
    /// Instantly fell the lowest-health living enemy.
    ExecuteWeakest,
}

#[derive(Debug, Clone, Copy)]
pub struct AbilityDef {
    pub id: &'static str,
    pub name: &'static str,
    pub charge_cost: u32,
    pub cooldown: f64,
    pub effect: AbilityEffect,
}

/// The closed ability set. Index order is the activation index used by
/// `ActivateAbilityIntent`.
pub static ABILITIES: [AbilityDef; 4] = [
    AbilityDef {
        id: "purge_pulse",
        name: "Purge Pulse",
        charge_cost: 1,
        cooldown: 8.0,
        effect: AbilityEffect::DamageAll { amount: 15 },
    },
    AbilityDef {
        id: "overclock",
        name: "Overclock",
        charge_cost: 2,
        cooldown: 20.0,
        effect: AbilityEffect::GrantBuff {
            kind: BuffKind::Overclock,
            duration: 10.0,
        },
    },
    AbilityDef {
        id: "firewall",
        name: "Firewall",
        charge_cost: 2,
        cooldown: 25.0,
        effect: AbilityEffect::GrantBuff {
            kind: BuffKind::Firewall,
            duration: 8.0,
        },
    },
    AbilityDef {
        id: "kill_process",
        name: "Kill Process",
        charge_cost: 3,
        cooldown: 30.0,
        effect: AbilityEffect::ExecuteWeakest,
    },
];

/// Charges and per-ability ready-at instants.
#[derive(Resource, Debug)]
pub struct AbilityState {
    pub charges: u32,
    ready_at: HashMap<&'static str, f64>,
}

impl Default for AbilityState {
    fn default() -> Self {
        Self {
            charges: INITIAL_CHARGES,
            ready_at: HashMap::new(),
        }
    }
}

impl AbilityState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn grant_charges(&mut self, amount: u32) {
        self.charges += amount;
    }

    pub fn is_ready(&self, id: &str, now: f64) -> bool {
        self.ready_at.get(id).map_or(true, |&at| now >= at)
    }

    fn start_cooldown(&mut self, id: &'static str, now: f64, cooldown: f64) {
        self.ready_at.insert(id, now + cooldown);
    }
}

/// System: gate and execute ability activations.
pub fn handle_activate_ability(
    mut intents: EventReader<ActivateAbilityIntent>,
    phase: Res<PhaseState>,
    mut state: ResMut<AbilityState>,
    mut buffs: ResMut<ActiveBuffs>,
    mut run: ResMut<ArenaRun>,
    mut log: ResMut<CombatLog>,
    clock: Res<ArenaClock>,
    enemies: Query<(Entity, &Health, &EnemyState), With<Enemy>>,
    mut damage: EventWriter<DamageRequest>,
    mut activated: EventWriter<AbilityActivated>,
) {
    let now = clock.now();

    for intent in intents.read() {
        // Phase gate first: outside combat nothing is debited or executed.
        if !phase.in_combat() {
            crate::logger::log_warning(&format!(
                "Ability rejected: phase {} forbids ability use",
                phase.current().as_str()
            ));
            continue;
        }

        let Some(def) = ABILITIES.get(intent.index) else {
            crate::logger::log_warning(&format!(
                "Ability index {} out of range",
                intent.index
            ));
            continue;
        };

        // Both gates must pass before anything is debited.
        if state.charges < def.charge_cost {
            log.push(
                LogKind::Ability,
                format!(
                    "{} needs {} charge(s), have {}",
                    def.name, def.charge_cost, state.charges
                ),
                now,
            );
            continue;
        }
        if !state.is_ready(def.id, now) {
            log.push(
                LogKind::Ability,
                format!("{} is still recharging", def.name),
                now,
            );
            continue;
        }

        state.charges -= def.charge_cost;
        state.start_cooldown(def.id, now, def.cooldown);
        run.abilities_used += 1;

        match def.effect {
            AbilityEffect::DamageAll { amount } => {
                let mut hit = 0;
                for (entity, _, enemy_state) in enemies.iter() {
                    if enemy_state.is_terminal() {
                        continue;
                    }
                    damage.write(DamageRequest {
                        target: entity,
                        amount,
                        source: DamageSource::Ability,
                    });
                    hit += 1;
                }
                log.push(
                    LogKind::Ability,
                    format!("{}: {} target(s) hit", def.name, hit),
                    now,
                );
            }
            AbilityEffect::GrantBuff { kind, duration } => {
                buffs.grant(kind, now, duration);
                log.push(
                    LogKind::Ability,
                    format!("{} online for {:.0}s", def.name, duration),
                    now,
                );
            }
            AbilityEffect::ExecuteWeakest => {
                let weakest = enemies
                    .iter()
                    .filter(|(_, _, enemy_state)| !enemy_state.is_terminal())
                    .min_by_key(|(_, health, _)| health.current);

                match weakest {
                    Some((entity, health, _)) => {
                        damage.write(DamageRequest {
                            target: entity,
                            amount: health.current,
                            source: DamageSource::Ability,
                        });
                        log.push(LogKind::Ability, format!("{} executed", def.name), now);
                    }
                    None => {
                        log.push(
                            LogKind::Ability,
                            format!("{}: no living target", def.name),
                            now,
                        );
                    }
                }
            }
        }

        activated.write(AbilityActivated {
            index: intent.index,
            id: def.id,
        });
    }
}
