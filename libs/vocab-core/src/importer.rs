//! CSV importer for vocabulary lists.
//!
//! # Format
//! ```text
//! word,meaning,pos,level,rank
//! 가격,price,noun,1,12
//! 감사합니다,thank you,expression,1,40
//! ```
//!
//! Header names are case-insensitive. The part-of-speech column may be named
//! `pos`, `part_of_speech` or `part-of-speech`; `level` and part of speech are
//! optional. Rows that cannot be read are skipped and counted.

use crate::error::{ImportError, Result};
use crate::types::{CardKey, ReviewState, VocabCard};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

const REQUIRED_COLUMNS: [&str; 3] = ["word", "meaning", "rank"];

/// Cards read from one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub cards: Vec<VocabCard>,
    /// Rows dropped as malformed or duplicate.
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct ImportRow {
    word: String,
    meaning: String,
    #[serde(default, alias = "pos", alias = "part-of-speech")]
    part_of_speech: String,
    #[serde(default)]
    level: String,
    rank: u32,
}

impl ImportRow {
    fn into_card(self, now: DateTime<Utc>) -> Option<VocabCard> {
        if self.word.is_empty() || self.meaning.is_empty() {
            return None;
        }
        Some(VocabCard {
            word: self.word,
            meaning: self.meaning,
            part_of_speech: self.part_of_speech,
            level: self.level,
            rank: self.rank,
            state: ReviewState::new(now),
        })
    }
}

/// Read vocabulary rows, giving every card a fresh review state due at `now`.
pub fn import_csv<R: Read>(input: R, now: DateTime<Utc>) -> Result<ImportReport> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ImportError::MissingColumn(column));
        }
    }

    let mut report = ImportReport::default();
    let mut seen = HashSet::new();

    for record in reader.records() {
        let record = record?;
        let card = record
            .deserialize::<ImportRow>(Some(&headers))
            .ok()
            .and_then(|row| row.into_card(now));

        match card {
            Some(card) if seen.insert(CardKey::new(card.rank, card.word.clone())) => {
                report.cards.push(card);
            }
            _ => report.skipped += 1,
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardStatus;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn import_basic_rows() {
        let input = "word,meaning,pos,level,rank\n가격,price,noun,1,12\n감사합니다,thank you,expression,1,40\n";
        let report = import_csv(input.as_bytes(), t0()).unwrap();
        assert_eq!(report.skipped, 0);
        assert_eq!(report.cards.len(), 2);

        let card = &report.cards[0];
        assert_eq!(card.word, "가격");
        assert_eq!(card.meaning, "price");
        assert_eq!(card.part_of_speech, "noun");
        assert_eq!(card.level, "1");
        assert_eq!(card.rank, 12);
        assert_eq!(card.state, ReviewState::new(t0()));
        assert_eq!(card.state.status, CardStatus::New);
    }

    #[test]
    fn header_aliases_and_case() {
        let input = "Rank,Word,Meaning,Part-Of-Speech\n3, 사다 , to buy ,verb\n";
        let report = import_csv(input.as_bytes(), t0()).unwrap();
        assert_eq!(report.cards.len(), 1);
        assert_eq!(report.cards[0].word, "사다");
        assert_eq!(report.cards[0].meaning, "to buy");
        assert_eq!(report.cards[0].part_of_speech, "verb");
        assert_eq!(report.cards[0].level, "");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let input = "word,meaning,pos,level,rank\n\
                     가격,price,noun,1,12\n\
                     ,missing word,noun,1,13\n\
                     빈칸,,noun,1,14\n\
                     순위,rank,noun,1,not-a-number\n\
                     짧은\n\
                     사다,to buy,verb,2,15\n";
        let report = import_csv(input.as_bytes(), t0()).unwrap();
        assert_eq!(report.cards.len(), 2);
        assert_eq!(report.skipped, 5);
        assert_eq!(report.cards[1].word, "사다");
    }

    #[test]
    fn duplicate_keys_keep_first_row() {
        let input = "word,meaning,rank\n가격,price,12\n가격,cost,12\n가격,price,13\n";
        let report = import_csv(input.as_bytes(), t0()).unwrap();
        assert_eq!(report.cards.len(), 2);
        assert_eq!(report.cards[0].meaning, "price");
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn reject_missing_required_column() {
        let input = "word,pos,rank\n가격,noun,12\n";
        let result = import_csv(input.as_bytes(), t0());
        assert!(matches!(result, Err(ImportError::MissingColumn("meaning"))));
    }

    #[test]
    fn import_empty_content() {
        let result = import_csv("".as_bytes(), t0());
        assert!(matches!(result, Err(ImportError::MissingColumn("word"))));

        let report = import_csv("word,meaning,rank\n".as_bytes(), t0()).unwrap();
        assert!(report.cards.is_empty());
        assert_eq!(report.skipped, 0);
    }
}
