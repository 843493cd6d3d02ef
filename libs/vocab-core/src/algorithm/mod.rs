//! Spaced repetition scheduling.

pub mod leaky_bucket;

pub use leaky_bucket::LeakyBucket;

use crate::types::{Grade, PartialReviewState, ReviewState};
use chrono::{DateTime, Utc};

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Calculate the next review state after a grade. Must not read the clock.
    fn schedule(&self, state: &ReviewState, grade: Grade, now: DateTime<Utc>) -> ReviewState;
}

/// Schedule with the default leaky-bucket parameters.
pub fn schedule(state: &ReviewState, grade: Grade, now: DateTime<Utc>) -> ReviewState {
    LeakyBucket::default().schedule(state, grade, now)
}

/// Hydrate a possibly incomplete state, then schedule it.
pub fn schedule_partial(
    state: &PartialReviewState,
    grade: Grade,
    now: DateTime<Utc>,
) -> ReviewState {
    schedule(&state.hydrate(now), grade, now)
}

/// Schedule against the wall clock. Tests should call [`schedule`] instead.
pub fn schedule_now(state: &ReviewState, grade: Grade) -> ReviewState {
    schedule(state, grade, Utc::now())
}

/// A card is due once its due time has been reached.
pub fn is_due(state: &ReviewState, now: DateTime<Utc>) -> bool {
    state.due <= now
}
