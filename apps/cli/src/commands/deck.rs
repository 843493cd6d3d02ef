//! Card set commands: import, reset, clear.

use crate::db::{CardRepository, StateRepository};
use crate::state::AppState;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use vocab_core::types::CardKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub read: usize,
    pub created: usize,
    pub skipped: usize,
}

/// Import a vocabulary CSV file.
pub fn import_file<W: Write>(
    state: &AppState,
    path: &Path,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<ImportSummary> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    tracing::info!(path = %path.display(), "importing vocabulary");
    import_reader(state, file, now, out)
}

/// Import vocabulary CSV content from any reader.
pub fn import_reader<R: Read, W: Write>(
    state: &AppState,
    input: R,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<ImportSummary> {
    let report = vocab_core::import_csv(input, now).context("failed to read vocabulary CSV")?;
    if report.skipped > 0 {
        tracing::debug!(skipped = report.skipped, "dropped malformed rows");
    }

    let created = state.repository.upsert_cards(&report.cards)?;
    let summary = ImportSummary {
        read: report.cards.len(),
        created,
        skipped: report.skipped,
    };
    tracing::info!(read = summary.read, created, "import finished");

    writeln!(
        out,
        "Imported {} card{} ({} new, {} skipped).",
        summary.read,
        if summary.read == 1 { "" } else { "s" },
        summary.created,
        summary.skipped
    )?;
    Ok(summary)
}

/// Reset a card's review state to that of a fresh import.
pub fn reset_card<W: Write>(
    state: &AppState,
    key: &CardKey,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<()> {
    state.repository.reset_review_state(key, now)?;
    tracing::info!(card = %key, "review state reset");
    writeln!(out, "Reset {key}; it is due now.")?;
    Ok(())
}

/// Delete the whole card set. Statistics are kept.
pub fn clear_cards<W: Write>(state: &AppState, confirmed: bool, out: &mut W) -> Result<usize> {
    if !confirmed {
        bail!("refusing to delete every card without --yes");
    }
    let removed = state.repository.clear_cards()?;
    tracing::warn!(removed, "card set cleared");
    writeln!(out, "Removed {removed} cards.")?;
    Ok(removed)
}
