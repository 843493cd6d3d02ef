//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use vocab_core::types::{CardKey, CardStatus, PartialReviewState, ReviewState, VocabCard};
use vocab_core::{ReviewOutcome, StatsBook, Tally};

type Result<T> = std::result::Result<T, DbError>;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Repository for card operations.
pub trait CardRepository {
    /// Insert or refresh cards. Existing review state is kept; returns how many
    /// cards were new.
    fn upsert_cards(&self, cards: &[VocabCard]) -> Result<usize>;
    fn get_card(&self, key: &CardKey, now: DateTime<Utc>) -> Result<Option<VocabCard>>;
    fn list_cards(&self, now: DateTime<Utc>) -> Result<Vec<VocabCard>>;
    /// Delete every card and its state; returns how many cards were removed.
    fn clear_cards(&self) -> Result<usize>;
}

/// Repository for card review state.
pub trait StateRepository {
    fn get_review_state(&self, key: &CardKey) -> Result<Option<PartialReviewState>>;
    fn save_review_state(&self, key: &CardKey, state: &ReviewState) -> Result<()>;
    fn reset_review_state(&self, key: &CardKey, now: DateTime<Utc>) -> Result<ReviewState>;
}

/// Repository for review statistics.
pub trait StatsRepository {
    fn record_outcome(&self, day: NaiveDate, outcome: &ReviewOutcome) -> Result<()>;
    fn load_stats(&self) -> Result<StatsBook>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        Ok(())
    }
}

/// Review-state columns as stored; every column may be NULL.
struct StateRow {
    status: Option<String>,
    interval_days: Option<u32>,
    ease: Option<f64>,
    reps: Option<u32>,
    lapses: Option<u32>,
    due_ms: Option<i64>,
}

impl StateRow {
    /// Read the six state columns starting at `offset`.
    fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            status: row.get(offset)?,
            interval_days: row.get(offset + 1)?,
            ease: row.get(offset + 2)?,
            reps: row.get(offset + 3)?,
            lapses: row.get(offset + 4)?,
            due_ms: row.get(offset + 5)?,
        })
    }

    fn into_partial(self) -> Result<PartialReviewState> {
        let status = match self.status {
            Some(s) => Some(
                CardStatus::parse(&s)
                    .ok_or_else(|| DbError::InvalidData(format!("unknown status {s:?}")))?,
            ),
            None => None,
        };
        let due = match self.due_ms {
            Some(ms) => Some(
                DateTime::<Utc>::from_timestamp_millis(ms)
                    .ok_or_else(|| DbError::InvalidData(format!("due out of range: {ms}")))?,
            ),
            None => None,
        };

        Ok(PartialReviewState {
            ease: self.ease,
            interval_days: self.interval_days,
            reps: self.reps,
            lapses: self.lapses,
            status,
            due,
        })
    }
}

struct CardRow {
    rank: u32,
    word: String,
    meaning: String,
    part_of_speech: String,
    level: String,
    state: StateRow,
}

impl SqliteRepository {
    const CARD_COLUMNS: &'static str = "c.rank, c.word, c.meaning, c.part_of_speech, c.level,
        s.status, s.interval_days, s.ease, s.reps, s.lapses, s.due_ms
        FROM cards c
        LEFT JOIN card_states s ON c.rank = s.rank AND c.word = s.word";

    fn row_to_card(row: &Row) -> rusqlite::Result<CardRow> {
        Ok(CardRow {
            rank: row.get(0)?,
            word: row.get(1)?,
            meaning: row.get(2)?,
            part_of_speech: row.get(3)?,
            level: row.get(4)?,
            state: StateRow::from_row(row, 5)?,
        })
    }

    fn hydrate_card(row: CardRow, now: DateTime<Utc>) -> Result<VocabCard> {
        Ok(VocabCard {
            rank: row.rank,
            word: row.word,
            meaning: row.meaning,
            part_of_speech: row.part_of_speech,
            level: row.level,
            state: row.state.into_partial()?.hydrate(now),
        })
    }

    fn write_state(&self, key: &CardKey, state: &ReviewState, replace: bool) -> Result<usize> {
        let verb = if replace { "INSERT OR REPLACE" } else { "INSERT OR IGNORE" };
        let sql = format!(
            "{verb} INTO card_states (rank, word, status, interval_days, ease, reps, lapses, due_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        );
        let changed = self.conn.execute(
            &sql,
            params![
                key.rank,
                key.word,
                state.status.as_str(),
                state.interval_days,
                state.ease,
                state.reps,
                state.lapses,
                state.due.timestamp_millis(),
            ],
        )?;
        Ok(changed)
    }
}

impl CardRepository for SqliteRepository {
    fn upsert_cards(&self, cards: &[VocabCard]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut created = 0;

        for card in cards {
            self.conn.execute(
                "INSERT INTO cards (rank, word, meaning, part_of_speech, level) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(rank, word) DO UPDATE SET
                    meaning = excluded.meaning,
                    part_of_speech = excluded.part_of_speech,
                    level = excluded.level",
                params![card.rank, card.word, card.meaning, card.part_of_speech, card.level],
            )?;

            // Initialize card state if not exists
            created += self.write_state(&card.key(), &card.state, false)?;
        }

        tx.commit()?;
        Ok(created)
    }

    fn get_card(&self, key: &CardKey, now: DateTime<Utc>) -> Result<Option<VocabCard>> {
        let sql = format!(
            "SELECT {} WHERE c.rank = ?1 AND c.word = ?2",
            Self::CARD_COLUMNS
        );
        let row = self
            .conn
            .query_row(&sql, params![key.rank, key.word], Self::row_to_card)
            .optional()?;

        row.map(|r| Self::hydrate_card(r, now)).transpose()
    }

    fn list_cards(&self, now: DateTime<Utc>) -> Result<Vec<VocabCard>> {
        let sql = format!("SELECT {} ORDER BY c.rank, c.word", Self::CARD_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], Self::row_to_card)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|r| Self::hydrate_card(r, now))
            .collect()
    }

    fn clear_cards(&self) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        self.conn.execute("DELETE FROM card_states", [])?;
        let count = self.conn.execute("DELETE FROM cards", [])?;
        tx.commit()?;
        Ok(count)
    }
}

impl StateRepository for SqliteRepository {
    fn get_review_state(&self, key: &CardKey) -> Result<Option<PartialReviewState>> {
        let row = self
            .conn
            .query_row(
                "SELECT status, interval_days, ease, reps, lapses, due_ms
                 FROM card_states WHERE rank = ?1 AND word = ?2",
                params![key.rank, key.word],
                |row| StateRow::from_row(row, 0),
            )
            .optional()?;

        row.map(StateRow::into_partial).transpose()
    }

    fn save_review_state(&self, key: &CardKey, state: &ReviewState) -> Result<()> {
        self.write_state(key, state, true)?;
        Ok(())
    }

    fn reset_review_state(&self, key: &CardKey, now: DateTime<Utc>) -> Result<ReviewState> {
        if self.get_card(key, now)?.is_none() {
            return Err(DbError::CardNotFound(key.to_string()));
        }
        let state = ReviewState::new(now);
        self.save_review_state(key, &state)?;
        Ok(state)
    }
}

impl StatsRepository for SqliteRepository {
    fn record_outcome(&self, day: NaiveDate, outcome: &ReviewOutcome) -> Result<()> {
        self.conn.execute(
            "INSERT INTO daily_stats (day, part_of_speech, correct, total) VALUES (?1, ?2, ?3, 1)
             ON CONFLICT(day, part_of_speech) DO UPDATE SET
                correct = correct + excluded.correct,
                total = total + 1",
            params![
                day.format(DAY_FORMAT).to_string(),
                outcome.part_of_speech,
                u32::from(outcome.correct),
            ],
        )?;
        Ok(())
    }

    fn load_stats(&self) -> Result<StatsBook> {
        let mut stmt = self
            .conn
            .prepare("SELECT day, part_of_speech, correct, total FROM daily_stats")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    Tally {
                        correct: row.get(2)?,
                        total: row.get(3)?,
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut book = StatsBook::new();
        for (day, pos, tally) in rows {
            let day = NaiveDate::parse_from_str(&day, DAY_FORMAT)
                .map_err(|e| DbError::InvalidData(format!("bad stats day {day:?}: {e}")))?;
            book.insert_tally(day, &pos, tally);
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use vocab_core::{schedule, Grade};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn card(rank: u32, word: &str, meaning: &str) -> VocabCard {
        VocabCard {
            word: word.to_string(),
            meaning: meaning.to_string(),
            part_of_speech: "noun".to_string(),
            level: "1".to_string(),
            rank,
            state: ReviewState::new(t0()),
        }
    }

    #[test]
    fn upsert_and_list_cards() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let created = repo
            .upsert_cards(&[card(2, "가격", "price"), card(1, "시장", "market")])
            .unwrap();
        assert_eq!(created, 2);

        let cards = repo.list_cards(t0()).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].word, "시장");
        assert_eq!(cards[1], card(2, "가격", "price"));
    }

    #[test]
    fn reimport_refreshes_metadata_and_keeps_state() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let original = card(2, "가격", "price");
        repo.upsert_cards(&[original.clone()]).unwrap();

        let graded = schedule(&original.state, Grade::Known, t0());
        repo.save_review_state(&original.key(), &graded).unwrap();

        let mut updated = card(2, "가격", "price, cost");
        updated.state = ReviewState::new(t0() + Duration::days(5));
        let created = repo.upsert_cards(&[updated]).unwrap();
        assert_eq!(created, 0);

        let stored = repo.get_card(&original.key(), t0()).unwrap().unwrap();
        assert_eq!(stored.meaning, "price, cost");
        assert_eq!(stored.state, graded);
    }

    #[test]
    fn graded_state_round_trips() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let c = card(7, "사다", "to buy");
        repo.upsert_cards(&[c.clone()]).unwrap();

        let state = schedule(&c.state, Grade::Again, t0() + Duration::hours(1));
        repo.save_review_state(&c.key(), &state).unwrap();

        let partial = repo.get_review_state(&c.key()).unwrap().unwrap();
        assert_eq!(partial.hydrate(t0()), state);
    }

    #[test]
    fn missing_state_columns_are_hydrated() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.conn
            .execute(
                "INSERT INTO cards (rank, word, meaning) VALUES (3, '비싸다', 'expensive')",
                [],
            )
            .unwrap();
        repo.conn
            .execute(
                "INSERT INTO card_states (rank, word, ease) VALUES (3, '비싸다', 2.1)",
                [],
            )
            .unwrap();

        let key = CardKey::new(3, "비싸다");
        let stored = repo.get_card(&key, t0()).unwrap().unwrap();
        assert_eq!(stored.state.ease, 2.1);
        assert_eq!(stored.state.status, CardStatus::New);
        assert_eq!(stored.state.due, t0());
        assert_eq!(stored.part_of_speech, "");
    }

    #[test]
    fn unknown_status_is_invalid_data() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.conn
            .execute(
                "INSERT INTO card_states (rank, word, status) VALUES (4, '팔다', 'review')",
                [],
            )
            .unwrap();
        let result = repo.get_review_state(&CardKey::new(4, "팔다"));
        assert!(matches!(result, Err(DbError::InvalidData(_))));
    }

    #[test]
    fn reset_restores_defaults() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let c = card(2, "가격", "price");
        repo.upsert_cards(&[c.clone()]).unwrap();
        let graded = schedule(&c.state, Grade::Again, t0());
        repo.save_review_state(&c.key(), &graded).unwrap();

        let later = t0() + Duration::days(2);
        let reset = repo.reset_review_state(&c.key(), later).unwrap();
        assert_eq!(reset, ReviewState::new(later));
        assert_eq!(
            repo.get_card(&c.key(), later).unwrap().unwrap().state,
            ReviewState::new(later)
        );

        let missing = repo.reset_review_state(&CardKey::new(99, "없다"), later);
        assert!(matches!(missing, Err(DbError::CardNotFound(_))));
    }

    #[test]
    fn clear_removes_cards() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.upsert_cards(&[card(1, "시장", "market"), card(2, "가격", "price")])
            .unwrap();
        assert_eq!(repo.clear_cards().unwrap(), 2);
        assert!(repo.list_cards(t0()).unwrap().is_empty());
        assert!(repo
            .get_review_state(&CardKey::new(1, "시장"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn stats_accumulate_per_day() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let outcome = |pos: &str, correct| ReviewOutcome {
            part_of_speech: pos.to_string(),
            correct,
        };

        repo.record_outcome(day, &outcome("noun", true)).unwrap();
        repo.record_outcome(day, &outcome("noun", false)).unwrap();
        repo.record_outcome(day, &outcome("verb", true)).unwrap();

        let book = repo.load_stats().unwrap();
        let tallies = book.day(day).unwrap();
        assert_eq!(tallies["noun"], Tally { correct: 1, total: 2 });
        assert_eq!(tallies["verb"], Tally { correct: 1, total: 1 });
        assert_eq!(book.overall(), Tally { correct: 2, total: 3 });
    }
}
