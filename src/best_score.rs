//! Best score register
//!
//! A single non-negative integer persisted under `bestScore` as decimal text.
//! Updates follow a monotone-max rule, so the stored value only ever grows.

use crate::storage::KeyValueStore;

/// Storage key, readable by any page on the same origin
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Attempts before giving up on a contended compare-and-swap
const MAX_SWAP_ATTEMPTS: u32 = 64;

/// Persistence adapter for the cross-session high score
#[derive(Debug, Clone)]
pub struct BestScore<S> {
    store: S,
}

impl<S: KeyValueStore> BestScore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current best score, 0 if nothing was ever written or the stored text is unreadable
    pub fn read(&self) -> u64 {
        match self.store.get(BEST_SCORE_KEY) {
            Ok(raw) => parse_score(raw.as_deref()).unwrap_or(0),
            Err(e) => {
                log::warn!("Could not read best score, using 0: {}", e);
                0
            }
        }
    }

    /// Store `max(current, candidate)` and return the resulting best score.
    ///
    /// The read-modify-write runs as a compare-and-swap loop, and every successful swap
    /// is read back, so a writer only returns once the stored value is at least its own.
    /// Storage failures are logged, not returned.
    pub fn write_if_greater(&self, candidate: u64) -> u64 {
        for _ in 0..MAX_SWAP_ATTEMPTS {
            let raw = match self.store.get(BEST_SCORE_KEY) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("Could not read best score before update: {}", e);
                    return candidate;
                }
            };

            let current = parse_score(raw.as_deref());
            if let Some(current) = current {
                if candidate <= current {
                    return current;
                }
            }

            let best = candidate.max(current.unwrap_or(0));
            match self
                .store
                .compare_and_swap(BEST_SCORE_KEY, raw.as_deref(), &best.to_string())
            {
                // A store without a cross-context lock (localStorage) can lose the
                // write to a racing tab, so confirm it stuck before returning
                Ok(true) => match self.store.get(BEST_SCORE_KEY) {
                    Ok(raw) => match parse_score(raw.as_deref()) {
                        Some(stored) if stored >= best => {
                            log::info!("Best score is now {}", stored);
                            return stored;
                        }
                        _ => {
                            log::debug!("Best score {} was overwritten, retrying", best);
                            continue;
                        }
                    },
                    Err(e) => {
                        log::warn!("Could not confirm best score {}: {}", best, e);
                        return best;
                    }
                },
                // Another writer got in first - re-read and retry
                Ok(false) => continue,
                Err(e) => {
                    log::warn!("Could not store best score {}: {}", best, e);
                    return best;
                }
            }
        }

        log::warn!("Best score update for {} kept losing the race", candidate);
        self.read().max(candidate)
    }
}

/// `None` for an absent or unparsable value
fn parse_score(raw: Option<&str>) -> Option<u64> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(score) => Some(score),
        Err(_) => {
            log::warn!("Ignoring unreadable best score {:?}", raw);
            None
        }
    }
}
