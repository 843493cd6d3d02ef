//! Study commands: queue overview, interactive session, single grades and checks.

use crate::db::{CardRepository, DbError, StateRepository, StatsRepository};
use crate::state::AppState;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{BufRead, Write};
use vocab_core::types::{CardKey, Grade, ReviewState, VocabCard};
use vocab_core::{
    compare_answers, schedule, select_queues, CardFilter, MatchKind, MatchResult, QueueCounts,
    ReviewOutcome,
};

/// Options for an interactive study session.
#[derive(Debug, Clone, Default)]
pub struct StudyOptions {
    pub filter: CardFilter,
    /// Ask the user to type the meaning before grading.
    pub typed: bool,
    /// Maximum number of due cards to review.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub reviewed: usize,
    pub correct: usize,
    pub again: usize,
    pub learning: usize,
    pub known: usize,
}

impl SessionSummary {
    fn count(&mut self, grade: Grade, correct: bool) {
        self.reviewed += 1;
        if correct {
            self.correct += 1;
        }
        match grade {
            Grade::Again => self.again += 1,
            Grade::Learning => self.learning += 1,
            Grade::Known => self.known += 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct QueueReport<'a> {
    counts: QueueCounts,
    due: Vec<&'a VocabCard>,
}

/// Print queue sizes and the due cards.
pub fn show_queue<W: Write>(
    state: &AppState,
    filter: &CardFilter,
    now: DateTime<Utc>,
    json: bool,
    out: &mut W,
) -> Result<QueueCounts> {
    let cards = state.repository.list_cards(now)?;
    let queues = select_queues(&cards, filter, now);
    let counts = queues.counts();

    if json {
        let report = QueueReport {
            counts,
            due: queues.due,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(counts);
    }

    writeln!(
        out,
        "Due: {}  Learning: {}  Known: {}  New: {}",
        counts.due, counts.learning, counts.known, counts.new
    )?;
    for card in &queues.due {
        writeln!(
            out,
            "  [{}] {} ({}) {}",
            card.rank, card.word, card.part_of_speech, card.state.status
        )?;
    }
    Ok(counts)
}

/// Run an interactive session over the due cards.
///
/// Stops early on end of input or when the user answers `q` at the grade prompt.
pub fn study<R: BufRead, W: Write>(
    state: &AppState,
    options: &StudyOptions,
    now: DateTime<Utc>,
    mut input: R,
    out: &mut W,
) -> Result<SessionSummary> {
    let cards = state.repository.list_cards(now)?;
    let queues = select_queues(&cards, &options.filter, now);
    let limit = options.limit.unwrap_or(usize::MAX);
    let due: Vec<&VocabCard> = queues.due.into_iter().take(limit).collect();

    let mut summary = SessionSummary::default();
    if due.is_empty() {
        writeln!(out, "No cards due for review.")?;
        return Ok(summary);
    }
    writeln!(
        out,
        "{} card{} to review\n",
        due.len(),
        if due.len() == 1 { "" } else { "s" }
    )?;
    tracing::info!(due = due.len(), typed = options.typed, "study session started");

    for card in due {
        writeln!(out, "[{}] {} ({})", card.rank, card.word, card.part_of_speech)?;

        let typed_correct = if options.typed {
            write!(out, "Meaning: ")?;
            out.flush()?;
            let Some(typed) = read_line(&mut input)? else {
                break;
            };
            let result = compare_answers(&typed, &card.meaning);
            print_match(out, &result, &card.meaning)?;
            Some(result.kind.is_correct())
        } else {
            write!(out, "Press Enter to reveal ")?;
            out.flush()?;
            if read_line(&mut input)?.is_none() {
                break;
            }
            writeln!(out, "=> {}", card.meaning)?;
            None
        };

        let Some(grade) = prompt_grade(&mut input, out)? else {
            break;
        };
        let correct = typed_correct.unwrap_or_else(|| grade.is_correct());
        let new_state = apply_grade(state, card, grade, correct, now)?;
        summary.count(grade, correct);

        writeln!(
            out,
            "Next review {} ({})\n",
            new_state.due.format("%Y-%m-%d %H:%M UTC"),
            new_state.status
        )?;
    }

    writeln!(
        out,
        "{} review{}, {} correct. Done.",
        summary.reviewed,
        if summary.reviewed == 1 { "" } else { "s" },
        summary.correct
    )?;
    tracing::info!(
        reviewed = summary.reviewed,
        correct = summary.correct,
        "study session finished"
    );
    Ok(summary)
}

/// Grade one card outside a session.
pub fn grade_card<W: Write>(
    state: &AppState,
    key: &CardKey,
    grade: &str,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<ReviewState> {
    let grade: Grade = grade.parse()?;
    let card = find_card(state, key, now)?;
    let new_state = apply_grade(state, &card, grade, grade.is_correct(), now)?;

    writeln!(
        out,
        "{key}: {} -> {}, interval {}d, ease {:.2}, due {}",
        card.state.status,
        new_state.status,
        new_state.interval_days,
        new_state.ease,
        new_state.due.format("%Y-%m-%d %H:%M UTC")
    )?;
    Ok(new_state)
}

/// Check a typed answer against a card and record the outcome.
pub fn check_answer<W: Write>(
    state: &AppState,
    key: &CardKey,
    typed: &str,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<MatchResult> {
    let card = find_card(state, key, now)?;
    let result = compare_answers(typed, &card.meaning);
    record_outcome(state, &card, result.kind.is_correct(), now)?;
    print_match(out, &result, &card.meaning)?;
    Ok(result)
}

fn find_card(state: &AppState, key: &CardKey, now: DateTime<Utc>) -> Result<VocabCard> {
    state
        .repository
        .get_card(key, now)?
        .ok_or_else(|| DbError::CardNotFound(key.to_string()).into())
}

/// Schedule, persist and record statistics for one graded review.
fn apply_grade(
    state: &AppState,
    card: &VocabCard,
    grade: Grade,
    correct: bool,
    now: DateTime<Utc>,
) -> Result<ReviewState> {
    let key = card.key();
    let new_state = schedule(&card.state, grade, now);
    state
        .repository
        .save_review_state(&key, &new_state)
        .with_context(|| format!("failed to save review of {key}"))?;
    record_outcome(state, card, correct, now)?;

    tracing::debug!(
        card = %key,
        %grade,
        interval_days = new_state.interval_days,
        ease = new_state.ease,
        "card graded"
    );
    Ok(new_state)
}

fn record_outcome(
    state: &AppState,
    card: &VocabCard,
    correct: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let outcome = ReviewOutcome {
        part_of_speech: card.part_of_speech.clone(),
        correct,
    };
    state
        .repository
        .record_outcome(state.study_day(now), &outcome)?;
    Ok(())
}

fn print_match<W: Write>(out: &mut W, result: &MatchResult, meaning: &str) -> Result<()> {
    match result.kind {
        MatchKind::Exact => writeln!(out, "exact")?,
        MatchKind::Close => writeln!(out, "close (expected: {meaning})")?,
        MatchKind::Incorrect => writeln!(out, "incorrect (expected: {meaning})")?,
    }
    Ok(())
}

/// Ask until a valid grade is given. `None` means quit or end of input.
fn prompt_grade<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<Grade>> {
    loop {
        write!(out, "Grade [a]gain / [l]earning / [k]nown / [q]uit: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        let grade = match line.trim().to_lowercase().as_str() {
            "q" | "quit" => return Ok(None),
            "a" => Ok(Grade::Again),
            "l" => Ok(Grade::Learning),
            "k" => Ok(Grade::Known),
            other => other.parse::<Grade>(),
        };
        match grade {
            Ok(grade) => return Ok(Some(grade)),
            Err(e) => writeln!(out, "{e}")?,
        }
    }
}

/// Read one line without its terminator; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
