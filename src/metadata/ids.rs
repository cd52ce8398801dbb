// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Handle generation.
//!
//! Handles are produced by an injected generator so tests can use a
//! predictable sequence while the editor gets unique ones.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What a handle is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Pattern,
    Track,
    Scene,
}

impl EntityKind {
    /// Handle prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Pattern => "pattern",
            EntityKind::Track => "track",
            EntityKind::Scene => "scene",
        }
    }
}

/// Source of fresh handles
pub trait IdGenerator {
    /// Produce a handle that has not been returned before
    fn next_id(&mut self, kind: EntityKind) -> String;
}

/// Unique handles: a running counter plus a random suffix
pub struct RandomIds {
    counter: u64,
    rng: StdRng,
}

impl RandomIds {
    /// Create a generator seeded from the OS
    pub fn new() -> Self {
        Self {
            counter: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            counter: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self, kind: EntityKind) -> String {
        self.counter += 1;
        let suffix: String = (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(9)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect();
        format!("{}-{}-{}", kind.prefix(), self.counter, suffix)
    }
}

/// Predictable handles: `pattern-1`, `track-2`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Start counting from 1
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, kind: EntityKind) -> String {
        self.next += 1;
        format!("{}-{}", kind.prefix(), self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(EntityKind::Pattern), "pattern-1");
        assert_eq!(ids.next_id(EntityKind::Track), "track-2");
        assert_eq!(ids.next_id(EntityKind::Scene), "scene-3");
    }

    #[test]
    fn test_random_ids_unique() {
        let mut ids = RandomIds::new();
        let handles: HashSet<String> = (0..500).map(|_| ids.next_id(EntityKind::Pattern)).collect();
        assert_eq!(handles.len(), 500);
        assert!(handles.iter().all(|h| h.starts_with("pattern-")));
    }

    #[test]
    fn test_seeded_ids_repeat() {
        let mut a = RandomIds::with_seed(7);
        let mut b = RandomIds::with_seed(7);
        for _ in 0..10 {
            assert_eq!(a.next_id(EntityKind::Track), b.next_id(EntityKind::Track));
        }
    }
}
