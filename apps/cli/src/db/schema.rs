//! SQLite schema definitions.

/// Complete schema for the local card store.
///
/// Review-state columns are nullable: absent values are filled with defaults
/// when the state is read back.
pub const SCHEMA: &str = r#"
-- Vocabulary cards, keyed by rank and word text
CREATE TABLE IF NOT EXISTS cards (
    rank INTEGER NOT NULL,
    word TEXT NOT NULL,
    meaning TEXT NOT NULL,
    part_of_speech TEXT NOT NULL DEFAULT '',
    level TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (rank, word)
);

-- Card review state
CREATE TABLE IF NOT EXISTS card_states (
    rank INTEGER NOT NULL,
    word TEXT NOT NULL,
    status TEXT,
    interval_days INTEGER,
    ease REAL,
    reps INTEGER,
    lapses INTEGER,
    due_ms INTEGER,
    PRIMARY KEY (rank, word),
    FOREIGN KEY (rank, word) REFERENCES cards(rank, word)
);

-- Review tallies per study day and part of speech
CREATE TABLE IF NOT EXISTS daily_stats (
    day TEXT NOT NULL,
    part_of_speech TEXT NOT NULL,
    correct INTEGER NOT NULL DEFAULT 0,
    total INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (day, part_of_speech)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_card_states_due ON card_states(due_ms);
CREATE INDEX IF NOT EXISTS idx_cards_level ON cards(level);
"#;
