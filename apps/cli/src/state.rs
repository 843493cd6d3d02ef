//! Application state.

use crate::db::SqliteRepository;
use chrono::{DateTime, Local, NaiveDate, Utc};

/// State shared by every command.
pub struct AppState {
    pub repository: SqliteRepository,
    pub daily_reset_hour: u32,
}

impl AppState {
    pub fn new(repository: SqliteRepository, daily_reset_hour: u32) -> Self {
        Self {
            repository,
            daily_reset_hour,
        }
    }

    /// Local study day a review at `now` counts toward.
    pub fn study_day(&self, now: DateTime<Utc>) -> NaiveDate {
        vocab_core::study_day(&now.with_timezone(&Local), self.daily_reset_hour)
    }
}
