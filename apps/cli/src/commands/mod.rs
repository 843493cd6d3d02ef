//! Commands behind the `vocab` subcommands.

pub mod deck;
pub mod stats;
pub mod study;

pub use deck::{clear_cards, import_file, import_reader, reset_card, ImportSummary};
pub use stats::show_stats;
pub use study::{check_answer, grade_card, show_queue, study, SessionSummary, StudyOptions};
