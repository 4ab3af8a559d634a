//! Task/pomodoro bridge.
//!
//! Three narrow entry points let the productivity side of the app reach into
//! combat without the engine knowing task internals: enemies are matched by
//! `task_id` only. All three degrade to no-ops when no matching enemy is
//! alive.

use bevy::prelude::*;

use crate::buffs::ActiveBuffs;
use crate::clock::ArenaClock;
use crate::combat::resolver::calculate_focus_damage;
use crate::components::{Enemy, EnemyState, Health, Player};
use crate::events::{
    DamageRequest, DamageSource, EnemyTargeted, PomodoroCompleted, PomodoroStarted, TaskCompleted,
};

/// The enemy a running focus session is aimed at, if any.
#[derive(Resource, Debug, Default)]
pub struct FocusTarget(Option<Entity>);

impl FocusTarget {
    pub fn get(&self) -> Option<Entity> {
        self.0
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

fn find_living_by_task<'a>(
    enemies: impl Iterator<Item = (Entity, &'a Enemy, &'a Health, &'a EnemyState)>,
    task_id: &str,
) -> Option<(Entity, u32)> {
    enemies
        .filter(|(_, enemy, _, state)| {
            enemy.task_id.as_deref() == Some(task_id) && !state.is_terminal()
        })
        .map(|(entity, _, health, _)| (entity, health.current))
        .next()
}

/// System: a completed task fells its enemy outright, damage equal to its
/// remaining health, bypassing normal combat math.
pub fn handle_task_completed(
    mut events: EventReader<TaskCompleted>,
    enemies: Query<(Entity, &Enemy, &Health, &EnemyState)>,
    mut damage: EventWriter<DamageRequest>,
) {
    for event in events.read() {
        let Some((entity, health)) = find_living_by_task(enemies.iter(), &event.task_id) else {
            continue;
        };
        damage.write(DamageRequest {
            target: entity,
            amount: health,
            source: DamageSource::TaskStrike,
        });
    }
}

/// System: a starting focus session targets the matching enemy.
pub fn handle_pomodoro_started(
    mut events: EventReader<PomodoroStarted>,
    enemies: Query<(Entity, &Enemy, &Health, &EnemyState)>,
    mut focus: ResMut<FocusTarget>,
    mut targeted: EventWriter<EnemyTargeted>,
) {
    for event in events.read() {
        let Some((entity, _)) = find_living_by_task(enemies.iter(), &event.task_id) else {
            continue;
        };
        focus.0 = Some(entity);
        targeted.write(EnemyTargeted { enemy: entity });
    }
}

/// System: a finished focus session strikes whichever enemy is targeted.
pub fn handle_pomodoro_completed(
    mut events: EventReader<PomodoroCompleted>,
    player: Query<&Player>,
    enemies: Query<&EnemyState, With<Enemy>>,
    buffs: Res<ActiveBuffs>,
    clock: Res<ArenaClock>,
    mut focus: ResMut<FocusTarget>,
    mut damage: EventWriter<DamageRequest>,
) {
    for _ in events.read() {
        let Some(target) = focus.0 else {
            continue;
        };
        let Ok(state) = enemies.get(target) else {
            focus.clear();
            continue;
        };
        if state.is_terminal() {
            focus.clear();
            continue;
        }
        let Ok(player) = player.single() else {
            continue;
        };

        let amount = calculate_focus_damage(player, &buffs, clock.now());
        damage.write(DamageRequest {
            target,
            amount,
            source: DamageSource::Focus,
        });
    }
}
