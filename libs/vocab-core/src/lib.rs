//! Core vocabulary review library.
//!
//! Provides:
//! - Leaky-bucket spaced repetition scheduler (again / learning / known)
//! - Answer matching for typed mode (normalization + Levenshtein tolerance)
//! - CSV importer for vocabulary lists
//! - Due-set selection and per-day review statistics
//! - Shared types (VocabCard, ReviewState, Grade, etc.)

pub mod algorithm;
pub mod error;
pub mod importer;
pub mod matching;
pub mod queue;
pub mod stats;
pub mod types;

pub use algorithm::{
    is_due, schedule, schedule_now, schedule_partial, LeakyBucket, SpacedRepetitionAlgorithm,
};
pub use error::{ImportError, InvalidGradeError, Result};
pub use importer::{import_csv, ImportReport};
pub use matching::{compare_answers, is_close_match, levenshtein_distance, normalize, MatchKind, MatchResult};
pub use queue::{select_queues, CardFilter, QueueCounts, ReviewQueues};
pub use stats::{study_day, ReviewOutcome, StatsBook, Tally};
pub use types::{CardKey, CardStatus, Grade, PartialReviewState, ReviewState, VocabCard};
