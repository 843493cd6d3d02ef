//! Review statistics per study day and part of speech.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One graded review as seen by the statistics recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub part_of_speech: String,
    pub correct: bool,
}

/// Correct and total review counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: u32,
    pub total: u32,
}

impl Tally {
    pub fn add(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn merge(&mut self, other: Tally) {
        self.correct += other.correct;
        self.total += other.total;
    }

    /// Fraction of correct reviews; 0.0 when nothing was reviewed.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.total)
        }
    }
}

/// Tallies keyed by study day, then by part of speech.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsBook {
    days: BTreeMap<NaiveDate, BTreeMap<String, Tally>>,
}

impl StatsBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, day: NaiveDate, outcome: &ReviewOutcome) {
        self.entry(day, &outcome.part_of_speech).add(outcome.correct);
    }

    /// Merge an already aggregated tally, e.g. one loaded from storage.
    pub fn insert_tally(&mut self, day: NaiveDate, part_of_speech: &str, tally: Tally) {
        self.entry(day, part_of_speech).merge(tally);
    }

    fn entry(&mut self, day: NaiveDate, part_of_speech: &str) -> &mut Tally {
        self.days
            .entry(day)
            .or_default()
            .entry(part_of_speech.to_string())
            .or_default()
    }

    pub fn day(&self, day: NaiveDate) -> Option<&BTreeMap<String, Tally>> {
        self.days.get(&day)
    }

    /// Study days with at least one review, oldest first.
    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &BTreeMap<String, Tally>)> {
        self.days.iter()
    }

    pub fn totals_by_part_of_speech(&self) -> BTreeMap<String, Tally> {
        let mut totals: BTreeMap<String, Tally> = BTreeMap::new();
        for by_pos in self.days.values() {
            for (pos, tally) in by_pos {
                totals.entry(pos.clone()).or_default().merge(*tally);
            }
        }
        totals
    }

    pub fn overall(&self) -> Tally {
        let mut total = Tally::default();
        for tally in self.days.values().flat_map(|by_pos| by_pos.values()) {
            total.merge(*tally);
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Calendar day a review counts toward.
///
/// Before `daily_reset_hour` (0-23) the previous day is still current, so a
/// session past midnight counts toward the evening it started.
pub fn study_day<Tz: TimeZone>(now: &DateTime<Tz>, daily_reset_hour: u32) -> NaiveDate {
    if now.hour() < daily_reset_hour {
        (now.clone() - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}
