//! Statistics command.

use crate::db::StatsRepository;
use crate::state::AppState;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use vocab_core::{StatsBook, Tally};

#[derive(Debug, Serialize)]
struct DayReport<'a> {
    day: String,
    by_part_of_speech: &'a BTreeMap<String, Tally>,
}

#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    days: Vec<DayReport<'a>>,
    by_part_of_speech: BTreeMap<String, Tally>,
    overall: Tally,
}

/// Print per-day and per-part-of-speech accuracy.
pub fn show_stats<W: Write>(state: &AppState, json: bool, out: &mut W) -> Result<StatsBook> {
    let book = state.repository.load_stats()?;

    if json {
        let report = StatsReport {
            days: book
                .days()
                .map(|(day, by_pos)| DayReport {
                    day: day.format("%Y-%m-%d").to_string(),
                    by_part_of_speech: by_pos,
                })
                .collect(),
            by_part_of_speech: book.totals_by_part_of_speech(),
            overall: book.overall(),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(book);
    }

    if book.is_empty() {
        writeln!(out, "No reviews recorded yet.")?;
        return Ok(book);
    }

    for (day, by_pos) in book.days() {
        writeln!(out, "{day}")?;
        for (pos, tally) in by_pos {
            writeln!(out, "  {}", format_tally(display_pos(pos), tally))?;
        }
    }
    writeln!(out, "By part of speech")?;
    for (pos, tally) in &book.totals_by_part_of_speech() {
        writeln!(out, "  {}", format_tally(display_pos(pos), tally))?;
    }
    writeln!(out, "{}", format_tally("Overall", &book.overall()))?;
    Ok(book)
}

fn display_pos(pos: &str) -> &str {
    if pos.is_empty() {
        "(none)"
    } else {
        pos
    }
}

fn format_tally(label: &str, tally: &Tally) -> String {
    format!(
        "{label:<12} {:>4}/{:<4} {:>5.1}%",
        tally.correct,
        tally.total,
        tally.accuracy() * 100.0
    )
}
