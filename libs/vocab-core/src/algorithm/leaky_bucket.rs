//! Three-bucket (again / learning / known) scheduler.
//!
//! A simplified variant of SM-2 tuned for short study sessions: failures
//! return to a ten-minute relearning step, partial recall waits six hours,
//! and successful recall walks the interval 1 -> 3 -> round(d * ease) days,
//! capped at `maximum_interval`.

use super::SpacedRepetitionAlgorithm;
use crate::types::{CardStatus, Grade, ReviewState, MINIMUM_EASE};
use chrono::{DateTime, Duration, Utc};

/// Leaky-bucket scheduler parameters.
#[derive(Debug, Clone)]
pub struct LeakyBucket {
    pub minimum_ease: f64,
    pub lapse_penalty: f64,
    pub success_bonus: f64,
    pub relearn_delay: Duration,
    pub learning_delay: Duration,
    pub learning_reps_cap: u32,
    pub first_interval: u32,
    pub second_interval: u32,
    pub maximum_interval: u32,
}

impl Default for LeakyBucket {
    fn default() -> Self {
        Self {
            minimum_ease: MINIMUM_EASE,
            lapse_penalty: 0.2,
            success_bonus: 0.05,
            relearn_delay: Duration::minutes(10),
            learning_delay: Duration::hours(6),
            learning_reps_cap: 2,
            first_interval: 1,
            second_interval: 3,
            maximum_interval: 36_500,
        }
    }
}

impl SpacedRepetitionAlgorithm for LeakyBucket {
    fn schedule(&self, state: &ReviewState, grade: Grade, now: DateTime<Utc>) -> ReviewState {
        let state = ReviewState {
            ease: state.ease.max(self.minimum_ease),
            ..state.clone()
        };
        match grade {
            Grade::Again => self.schedule_again(&state, now),
            Grade::Learning => self.schedule_learning(&state, now),
            Grade::Known => self.schedule_known(&state, now),
        }
    }
}

impl LeakyBucket {
    fn schedule_again(&self, state: &ReviewState, now: DateTime<Utc>) -> ReviewState {
        ReviewState {
            ease: (state.ease - self.lapse_penalty).max(self.minimum_ease),
            interval_days: 0,
            reps: 0,
            lapses: state.lapses.saturating_add(1),
            status: CardStatus::Learning,
            due: advance(now, self.relearn_delay),
        }
    }

    fn schedule_learning(&self, state: &ReviewState, now: DateTime<Utc>) -> ReviewState {
        ReviewState {
            reps: state.reps.saturating_add(1).min(self.learning_reps_cap),
            status: CardStatus::Learning,
            due: advance(now, self.learning_delay),
            ..state.clone()
        }
    }

    fn schedule_known(&self, state: &ReviewState, now: DateTime<Utc>) -> ReviewState {
        let interval_days = self.next_interval(state.interval_days, state.ease);
        ReviewState {
            ease: state.ease + self.success_bonus,
            interval_days,
            reps: state.reps.saturating_add(1),
            lapses: state.lapses,
            status: CardStatus::Known,
            // Fixed 24h days; no calendar or DST adjustment.
            due: advance(now, Duration::days(i64::from(interval_days))),
        }
    }

    /// Interval after a successful recall, using the ease before the bonus.
    pub fn next_interval(&self, interval_days: u32, ease: f64) -> u32 {
        let next = match interval_days {
            0 => self.first_interval,
            1 => self.second_interval,
            d => (f64::from(d) * ease)
                .round()
                .min(f64::from(self.maximum_interval)) as u32,
        };
        next.min(self.maximum_interval)
    }
}

/// `now + delta`, pinned to the latest representable instant on overflow.
fn advance(now: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
