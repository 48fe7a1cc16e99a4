//! One play-through: score, level and the alive flag
//!
//! Pure data plus mutation rules. Once the session is dead every mutation is a no-op.

use serde::{Deserialize, Serialize};

/// What a `collect` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// Score increased, stars remain
    Collected,
    /// Score increased and the last star was taken; level has advanced
    LevelComplete { level: u32 },
    /// Session is over, nothing changed
    Ignored,
}

/// Session progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    score: u64,
    level: u32,
    alive: bool,
    finalized: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            alive: true,
            finalized: false,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Add `points` for a collected star. `remaining_active` is the star count left
    /// after the collected one was removed; zero advances the level.
    pub fn collect(&mut self, points: u64, remaining_active: usize) -> CollectOutcome {
        if !self.alive {
            return CollectOutcome::Ignored;
        }

        self.score = self.score.saturating_add(points);

        if remaining_active == 0 {
            self.level += 1;
            CollectOutcome::LevelComplete { level: self.level }
        } else {
            CollectOutcome::Collected
        }
    }

    /// End the session. Returns true only for the call that actually killed it.
    pub fn hit(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        true
    }

    /// Final score for persistence: `Some` exactly once, after the session died
    pub fn finalize(&mut self) -> Option<u64> {
        if self.alive || self.finalized {
            return None;
        }
        self.finalized = true;
        Some(self.score)
    }

    /// HUD label
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }
}
