//! Answer matching for typed recall.

use serde::{Deserialize, Serialize};

/// Answers at least this many characters long tolerate two edits instead of one.
const LONG_ANSWER_CHARS: usize = 6;

/// How a typed answer relates to the correct one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Close,
    Incorrect,
}

impl MatchKind {
    /// Exact and close matches both count as correct for statistics.
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Exact | Self::Close)
    }

    /// Label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Close => "close",
            Self::Incorrect => "incorrect",
        }
    }
}

/// Result of comparing a typed answer to the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub kind: MatchKind,
    /// Edit distance between the normalized strings.
    pub distance: usize,
    /// Normalized typed answer (for display).
    pub typed_normalized: String,
    /// Normalized correct answer (for display).
    pub answer_normalized: String,
}

/// Trim, drop all whitespace and lowercase.
pub fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let s: Vec<char> = a.chars().collect();
    let t: Vec<char> = b.chars().collect();
    let n = s.len();
    let m = t.len();

    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(s[i - 1] != t[j - 1]);
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[n][m]
}

/// Edits allowed for a normalized answer.
pub fn tolerance_for(answer_normalized: &str) -> usize {
    if answer_normalized.chars().count() >= LONG_ANSWER_CHARS {
        2
    } else {
        1
    }
}

/// Whether `typed` is equal to or within tolerance of `answer`.
///
/// Blank input never matches, even against a blank answer.
pub fn is_close_match(typed: &str, answer: &str) -> bool {
    let typed = normalize(typed);
    if typed.is_empty() {
        return false;
    }
    let answer = normalize(answer);
    if typed == answer {
        return true;
    }
    levenshtein_distance(&typed, &answer) <= tolerance_for(&answer)
}

/// Compare a typed answer to the correct answer.
pub fn compare_answers(typed: &str, answer: &str) -> MatchResult {
    let typed_normalized = normalize(typed);
    let answer_normalized = normalize(answer);

    let (kind, distance) = if typed_normalized.is_empty() {
        (MatchKind::Incorrect, answer_normalized.chars().count())
    } else if typed_normalized == answer_normalized {
        (MatchKind::Exact, 0)
    } else {
        let distance = levenshtein_distance(&typed_normalized, &answer_normalized);
        if distance <= tolerance_for(&answer_normalized) {
            (MatchKind::Close, distance)
        } else {
            (MatchKind::Incorrect, distance)
        }
    };

    MatchResult {
        kind,
        distance,
        typed_normalized,
        answer_normalized,
    }
}
