use crate::Score;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::Instant;

/// A player's standing: score and any freeze in effect.
/// Written by adjudication, read by the player and the final tally.
#[derive(Debug, Default)]
pub struct Seat {
    score: AtomicU32,
    thaw: Mutex<Option<Instant>>,
}

impl Seat {
    pub fn score(&self) -> Score {
        self.score.load(Ordering::SeqCst)
    }
    /// Awards one point, returning the new score.
    pub fn point(&self) -> Score {
        self.score.fetch_add(1, Ordering::SeqCst) + 1
    }
    /// Freezes the seat for `duration` from now, returning when it thaws.
    pub fn freeze(&self, duration: Duration) -> Instant {
        let thaw = Instant::now() + duration;
        *self.thaw.lock().unwrap_or_else(PoisonError::into_inner) = Some(thaw);
        thaw
    }
    /// The instant the current freeze lifts, if one is still in effect.
    pub fn frozen_until(&self) -> Option<Instant> {
        let thaw = *self.thaw.lock().unwrap_or_else(PoisonError::into_inner);
        thaw.filter(|thaw| *thaw > Instant::now())
    }
}
