//! Engine-owned simulation clock.
//!
//! Every duration in the engine (spawn cadence, death-animation delay, buff
//! windows, ability cooldowns) is stored as an absolute instant on this clock
//! and compared against `now()`. Resetting the arena replaces that derived
//! state wholesale, so no timer can fire against a stale registry.

use bevy::prelude::*;

/// Elapsed simulation time in seconds.
///
/// Advanced once per frame from `Res<Time>` by `advance_clock`, the first
/// system in the engine chain. Tests queue extra time with [`ArenaClock::skip`]
/// to step through intervals deterministically.
#[derive(Resource, Debug, Default)]
pub struct ArenaClock {
    elapsed: f64,
    last_delta: f32,
    queued: f32,
}

impl ArenaClock {
    /// Current simulation time (seconds since app start).
    pub fn now(&self) -> f64 {
        self.elapsed
    }

    /// Delta applied on the most recent frame.
    pub fn delta(&self) -> f32 {
        self.last_delta
    }

    /// Queue extra time to be applied on the next frame (test hook).
    pub fn skip(&mut self, secs: f32) {
        self.queued += secs;
    }

    fn tick(&mut self, real_delta: f32) {
        let dt = real_delta + std::mem::take(&mut self.queued);
        self.elapsed += dt as f64;
        self.last_delta = dt;
    }
}

/// System: advance the arena clock by the frame delta plus any queued time.
pub fn advance_clock(time: Res<Time>, mut clock: ResMut<ArenaClock>) {
    clock.tick(time.delta_secs());
}
