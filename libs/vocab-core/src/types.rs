//! Core types for vocabulary review.

use crate::error::InvalidGradeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default ease factor for a fresh card.
pub const DEFAULT_EASE: f64 = 2.5;

/// Lowest ease a card can reach.
pub const MINIMUM_EASE: f64 = 1.3;

/// Coarse review phase of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    New,
    Learning,
    Known,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::New
    }
}

impl CardStatus {
    /// Get the status name as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Known => "known",
        }
    }

    /// Parse from the stored name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "learning" => Some(Self::Learning),
            "known" => Some(Self::Known),
            _ => None,
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recall grade chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// Forgot the card.
    Again,
    /// Partial recall.
    Learning,
    /// Easy, correct recall.
    Known,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Learning => "learning",
            Self::Known => "known",
        }
    }

    /// Correctness reported to statistics when grading without typing.
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Known)
    }
}

impl FromStr for Grade {
    type Err = InvalidGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" => Ok(Self::Again),
            "learning" => Ok(Self::Learning),
            "known" => Ok(Self::Known),
            _ => Err(InvalidGradeError {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully populated review state of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub ease: f64,
    pub interval_days: u32,
    pub reps: u32,
    pub lapses: u32,
    pub status: CardStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub due: DateTime<Utc>,
}

impl ReviewState {
    /// State of a freshly imported (or reset) card, due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease: DEFAULT_EASE,
            interval_days: 0,
            reps: 0,
            lapses: 0,
            status: CardStatus::New,
            due: now,
        }
    }
}

/// Review state as it arrives from storage or the wire; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialReviewState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lapses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due: Option<DateTime<Utc>>,
}

impl PartialReviewState {
    /// Fill every absent field with its default. A missing `due` becomes `now`
    /// and a stored ease below the floor is lifted to it.
    pub fn hydrate(&self, now: DateTime<Utc>) -> ReviewState {
        ReviewState {
            ease: self.ease.unwrap_or(DEFAULT_EASE).max(MINIMUM_EASE),
            interval_days: self.interval_days.unwrap_or(0),
            reps: self.reps.unwrap_or(0),
            lapses: self.lapses.unwrap_or(0),
            status: self.status.unwrap_or_default(),
            due: self.due.unwrap_or(now),
        }
    }
}

impl From<&ReviewState> for PartialReviewState {
    fn from(state: &ReviewState) -> Self {
        Self {
            ease: Some(state.ease),
            interval_days: Some(state.interval_days),
            reps: Some(state.reps),
            lapses: Some(state.lapses),
            status: Some(state.status),
            due: Some(state.due),
        }
    }
}

/// Unique card identifier combining rank and word text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardKey {
    pub rank: u32,
    pub word: String,
}

impl CardKey {
    pub fn new(rank: u32, word: impl Into<String>) -> Self {
        Self {
            rank,
            word: word.into(),
        }
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.rank, self.word)
    }
}

/// Vocabulary card with its review state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabCard {
    pub word: String,
    pub meaning: String,
    pub part_of_speech: String,
    pub level: String,
    pub rank: u32,
    pub state: ReviewState,
}

impl VocabCard {
    pub fn key(&self) -> CardKey {
        CardKey::new(self.rank, self.word.clone())
    }
}
