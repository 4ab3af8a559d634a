//! Wave generation: task list in, ordered spawn queue out.
//!
//! Deterministic given an RNG state: a fixed session seed reproduces the
//! same wave. The engine treats the output as opaque; only count, ordering
//! and per-entry stats matter downstream.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::components::Tier;

/// A boss is appended once a batch reaches this many tasks.
pub const BOSS_TASK_THRESHOLD: usize = 4;

/// Radius of the ring enemies materialize on.
pub const SPAWN_RING_RADIUS: f32 = 8.0;

/// Task reference handed in by the productivity side. A lookup key plus the
/// fields wave generation cares about, never the full task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_overdue: bool,
}

/// One queued enemy, produced by wave generation and consumed by the spawn
/// scheduler. Plain data; the ECS entity is created at spawn time.
#[derive(Debug, Clone)]
pub struct EnemySpawn {
    pub tier: Tier,
    pub name: String,
    pub max_health: u32,
    pub position: Vec3,
    pub task_id: Option<String>,
    pub is_overdue: bool,
}

pub fn tier_max_health(tier: Tier) -> u32 {
    match tier {
        Tier::Grunt => 20,
        Tier::Standard => 35,
        Tier::Elite => 60,
        Tier::Boss => 160,
    }
}

/// Generate the ordered spawn queue for one wave.
///
/// One enemy per task: overdue tasks are promoted to elite, the rest roll a
/// weighted tier. Batches of [`BOSS_TASK_THRESHOLD`] or more tasks get a boss
/// appended at the end of the queue.
pub fn generate_enemy_wave(tasks: &[TaskRef], rng: &mut ChaCha8Rng) -> Vec<EnemySpawn> {
    let slots = if tasks.len() >= BOSS_TASK_THRESHOLD {
        tasks.len() + 1
    } else {
        tasks.len().max(1)
    };

    let mut wave = Vec::with_capacity(tasks.len() + 1);

    for (i, task) in tasks.iter().enumerate() {
        let tier = if task.is_overdue {
            Tier::Elite
        } else {
            // 50% grunt, 35% standard, 15% elite
            match rng.gen_range(0..100u32) {
                0..=49 => Tier::Grunt,
                50..=84 => Tier::Standard,
                _ => Tier::Elite,
            }
        };

        wave.push(EnemySpawn {
            tier,
            name: task.title.clone(),
            max_health: tier_max_health(tier),
            position: ring_position(i, slots),
            task_id: Some(task.id.clone()),
            is_overdue: task.is_overdue,
        });
    }

    if tasks.len() >= BOSS_TASK_THRESHOLD {
        wave.push(EnemySpawn {
            tier: Tier::Boss,
            name: "Overseer".to_string(),
            max_health: tier_max_health(Tier::Boss),
            position: ring_position(tasks.len(), slots),
            task_id: None,
            is_overdue: false,
        });
    }

    wave
}

fn ring_position(index: usize, slots: usize) -> Vec3 {
    let angle = TAU * index as f32 / slots.max(1) as f32;
    Vec3::new(
        SPAWN_RING_RADIUS * angle.cos(),
        0.0,
        SPAWN_RING_RADIUS * angle.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn task(id: &str, overdue: bool) -> TaskRef {
        TaskRef {
            id: id.to_string(),
            title: format!("task {}", id),
            is_overdue: overdue,
        }
    }

    #[test]
    fn test_one_enemy_per_task_below_boss_threshold() {
        let tasks = vec![task("a", false), task("b", false)];
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let wave = generate_enemy_wave(&tasks, &mut rng);
        assert_eq!(wave.len(), 2);
        assert!(wave.iter().all(|e| e.tier != Tier::Boss));
        assert_eq!(wave[0].task_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_boss_appended_for_large_batches() {
        let tasks: Vec<_> = (0..BOSS_TASK_THRESHOLD)
            .map(|i| task(&i.to_string(), false))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let wave = generate_enemy_wave(&tasks, &mut rng);
        assert_eq!(wave.len(), BOSS_TASK_THRESHOLD + 1);
        assert_eq!(wave.last().unwrap().tier, Tier::Boss);
        assert!(wave.last().unwrap().task_id.is_none());
    }

    #[test]
    fn test_overdue_tasks_are_elite() {
        let tasks = vec![task("a", true)];
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let wave = generate_enemy_wave(&tasks, &mut rng);
        assert_eq!(wave[0].tier, Tier::Elite);
        assert!(wave[0].is_overdue);
    }

    #[test]
    fn test_same_seed_same_wave() {
        let tasks: Vec<_> = (0..6).map(|i| task(&i.to_string(), false)).collect();

        let mut rng1 = ChaCha8Rng::seed_from_u64(7);
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);
        let wave1 = generate_enemy_wave(&tasks, &mut rng1);
        let wave2 = generate_enemy_wave(&tasks, &mut rng2);

        let tiers1: Vec<_> = wave1.iter().map(|e| e.tier).collect();
        let tiers2: Vec<_> = wave2.iter().map(|e| e.tier).collect();
        assert_eq!(tiers1, tiers2);
    }
}
