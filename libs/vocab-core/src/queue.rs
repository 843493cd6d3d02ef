//! Due-set selection: filter cards and split them into review queues.

use crate::algorithm::is_due;
use crate::types::{CardStatus, VocabCard};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional narrowing of the card set. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    /// Case-insensitive substring of the word or its meaning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl CardFilter {
    pub fn matches(&self, card: &VocabCard) -> bool {
        if let Some(level) = non_blank(&self.level) {
            if card.level.trim() != level {
                return false;
            }
        }
        if let Some(pos) = non_blank(&self.part_of_speech) {
            if card.part_of_speech.trim() != pos {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            return card.word.to_lowercase().contains(&needle)
                || card.meaning.to_lowercase().contains(&needle);
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Cards partitioned for a study session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewQueues<'a> {
    /// Cards whose due time has passed, earliest first.
    pub due: Vec<&'a VocabCard>,
    pub learning: Vec<&'a VocabCard>,
    pub known: Vec<&'a VocabCard>,
    pub new: Vec<&'a VocabCard>,
}

/// Queue sizes for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounts {
    pub due: usize,
    pub learning: usize,
    pub known: usize,
    pub new: usize,
}

impl ReviewQueues<'_> {
    pub fn counts(&self) -> QueueCounts {
        QueueCounts {
            due: self.due.len(),
            learning: self.learning.len(),
            known: self.known.len(),
            new: self.new.len(),
        }
    }
}

/// Filter `cards` and partition them into review queues at `now`.
pub fn select_queues<'a>(
    cards: &'a [VocabCard],
    filter: &CardFilter,
    now: DateTime<Utc>,
) -> ReviewQueues<'a> {
    let mut queues = ReviewQueues::default();

    for card in cards.iter().filter(|c| filter.matches(c)) {
        if is_due(&card.state, now) {
            queues.due.push(card);
        }
        match card.state.status {
            CardStatus::New => queues.new.push(card),
            CardStatus::Learning => queues.learning.push(card),
            CardStatus::Known => queues.known.push(card),
        }
    }

    queues
        .due
        .sort_by(|a, b| a.state.due.cmp(&b.state.due).then(a.rank.cmp(&b.rank)));
    for queue in [&mut queues.learning, &mut queues.known, &mut queues.new] {
        queue.sort_by_key(|c| c.rank);
    }

    queues
}
