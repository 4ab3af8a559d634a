//! Append-only combat log.
//!
//! Bounded ring buffer of human-readable events, newest first. Independent of
//! everything else in the engine; systems append through [`CombatLog::push`].

use bevy::prelude::*;
use std::collections::VecDeque;

/// Oldest entries beyond this cap are silently dropped.
pub const MAX_LOG_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Damage,
    Kill,
    Ability,
    System,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Damage => "damage",
            LogKind::Kill => "kill",
            LogKind::Ability => "ability",
            LogKind::System => "system",
        }
    }

    /// Display color for the presentation layer.
    pub fn color(&self) -> &'static str {
        match self {
            LogKind::Damage => "#ff6b6b",
            LogKind::Kill => "#feca57",
            LogKind::Ability => "#54a0ff",
            LogKind::System => "#a0a0b8",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CombatLogEntry {
    pub id: u64,
    pub message: String,
    pub kind: LogKind,
    /// Arena clock time at append.
    pub timestamp: f64,
    pub color: &'static str,
}

#[derive(Resource, Debug, Default)]
pub struct CombatLog {
    entries: VecDeque<CombatLogEntry>,
    next_id: u64,
}

impl CombatLog {
    pub fn push(&mut self, kind: LogKind, message: impl Into<String>, now: f64) {
        let entry = CombatLogEntry {
            id: self.next_id,
            message: message.into(),
            kind,
            timestamp: now,
            color: kind.color(),
        };
        self.next_id += 1;

        self.entries.push_front(entry);
        self.entries.truncate(MAX_LOG_ENTRIES);
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &CombatLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut log = CombatLog::default();
        log.push(LogKind::System, "first", 0.0);
        log.push(LogKind::Damage, "second", 1.0);

        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_ring_buffer_drops_oldest_over_cap() {
        let mut log = CombatLog::default();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            log.push(LogKind::System, format!("entry {}", i), i as f64);
        }

        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        // Newest survives, oldest ten are gone
        assert_eq!(log.entries().next().unwrap().message, "entry 59");
        assert!(log.entries().all(|e| e.message != "entry 0"));
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut log = CombatLog::default();
        log.push(LogKind::Kill, "a", 0.0);
        log.push(LogKind::Kill, "b", 0.0);

        let ids: Vec<_> = log.entries().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }
}
