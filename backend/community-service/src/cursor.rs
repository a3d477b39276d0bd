//! Opaque pagination cursors.
//!
//! A cursor captures the primary sort key of the last item on a page and
//! nothing else. Tie-break components (created-at under the score-ordered
//! modes) are deliberately not captured, so items that share the boundary
//! value with the last returned post may be skipped on the next page.
//! That single-field limitation is an intentional property of the
//! pagination contract, covered by tests rather than silently widened.

use base64::{engine::general_purpose, Engine as _};
use std::cmp::Ordering;
use thiserror::Error;

/// Comparable resume position in the active ordering's primary sort key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey {
    /// Millisecond epoch of the creation time
    Timestamp(i64),
    /// Peak hotness score
    Score(f64),
    /// Like count
    Count(i64),
}

impl SortKey {
    pub fn kind(&self) -> SortKeyKind {
        match self {
            SortKey::Timestamp(_) => SortKeyKind::Timestamp,
            SortKey::Score(_) => SortKeyKind::Score,
            SortKey::Count(_) => SortKeyKind::Count,
        }
    }

    /// Total order over keys of the same kind. Scores are guaranteed
    /// finite by `decode`, so `total_cmp` agrees with the numeric order.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Score(a), SortKey::Score(b)) => a.total_cmp(b),
            (SortKey::Count(a), SortKey::Count(b)) => a.cmp(b),
            // Mixed kinds never meet: decode is keyed by the active ordering.
            _ => Ordering::Equal,
        }
    }
}

/// Which primary sort key a token must decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKeyKind {
    Timestamp,
    Score,
    Count,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("invalid cursor format")]
    Format,
    #[error("invalid cursor encoding")]
    Encoding,
    #[error("invalid cursor value")]
    Value,
}

/// Encode a page-boundary sort key as an opaque token.
pub fn encode(key: SortKey) -> String {
    let raw = match key {
        SortKey::Timestamp(ms) => ms.to_string(),
        SortKey::Score(score) => score.to_string(),
        SortKey::Count(count) => count.to_string(),
    };
    general_purpose::STANDARD.encode(raw)
}

/// Decode a token into the sort key kind required by the active ordering.
///
/// Malformed or out-of-range tokens fail with a validation error; a bad
/// cursor must never fall back to an unfiltered page, since that would
/// duplicate or skip content.
pub fn decode(token: &str, kind: SortKeyKind) -> std::result::Result<SortKey, CursorError> {
    let decoded = general_purpose::STANDARD
        .decode(token)
        .map_err(|_| CursorError::Format)?;
    let raw = String::from_utf8(decoded).map_err(|_| CursorError::Encoding)?;

    match kind {
        SortKeyKind::Timestamp => raw
            .parse::<i64>()
            .ok()
            .filter(|ms| *ms >= 0)
            .map(SortKey::Timestamp)
            .ok_or(CursorError::Value),
        SortKeyKind::Score => raw
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite() && *score >= 0.0)
            .map(SortKey::Score)
            .ok_or(CursorError::Value),
        SortKeyKind::Count => raw
            .parse::<i64>()
            .ok()
            .filter(|count| *count >= 0)
            .map(SortKey::Count)
            .ok_or(CursorError::Value),
    }
}
