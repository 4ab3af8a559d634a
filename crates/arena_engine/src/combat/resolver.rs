//! Combat resolver: pure calculation functions.
//!
//! Fixed contract consumed by the orchestration systems: damage and loot are
//! functions of current state only, with no side effects. Tunable numbers
//! live here and nowhere else.

use crate::buffs::{ActiveBuffs, BuffKind};
use crate::components::{Player, Tier};

/// Overclock doubles outgoing damage while active.
pub const OVERCLOCK_MULTIPLIER: f32 = 2.0;

/// XP bonus multiplier for felling an overdue enemy (x1.5).
const OVERDUE_XP_BONUS_NUM: u32 = 3;
const OVERDUE_XP_BONUS_DEN: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loot {
    pub xp: u32,
    pub charges: u32,
}

/// Damage of one manual shot given current player stats and buffs.
pub fn calculate_manual_shot_damage(player: &Player, buffs: &ActiveBuffs, now: f64) -> u32 {
    scale_damage(player.attack_damage, buffs, now)
}

/// Damage of one completed focus session.
pub fn calculate_focus_damage(player: &Player, buffs: &ActiveBuffs, now: f64) -> u32 {
    scale_damage(player.focus_damage, buffs, now)
}

fn scale_damage(base: u32, buffs: &ActiveBuffs, now: f64) -> u32 {
    let mut damage = base as f32;
    if buffs.is_active(BuffKind::Overclock, now) {
        damage *= OVERCLOCK_MULTIPLIER;
    }
    damage.round() as u32
}

/// Loot for a felled enemy. Boss kills fund two ability charges; overdue
/// enemies pay bonus XP.
pub fn calculate_loot(tier: Tier, is_overdue: bool) -> Loot {
    let (xp, charges) = match tier {
        Tier::Grunt => (10, 0),
        Tier::Standard => (20, 1),
        Tier::Elite => (40, 1),
        Tier::Boss => (120, 2),
    };

    let xp = if is_overdue {
        xp * OVERDUE_XP_BONUS_NUM / OVERDUE_XP_BONUS_DEN
    } else {
        xp
    };

    Loot { xp, charges }
}
