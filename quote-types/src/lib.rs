//! Shared types for the quote store, its file format, and the web API.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// A single stored quote.
///
/// Serialized with camelCase keys (`createdAt`) so the persisted file, the
/// export file, and the `/api/quotes` payload all share one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub quote: String,
    pub author: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Build a record stamped with the current time (millisecond precision).
    pub fn new(id: impl Into<String>, quote: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quote: quote.into(),
            author: author.into(),
            created_at: now_millis(),
        }
    }
}

/// Current UTC time truncated to what the file format can hold.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

// =====================================================
// File Types
// =====================================================

/// The on-disk document: `{ "quotes": [ ... ] }`.
///
/// Used for the persisted store, the export file, and import input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDocument {
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

/// Outcome of an import: how many records were appended and how many were
/// dropped because their id was already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

// =====================================================
// Timestamp codec
// =====================================================

/// `createdAt` codec: `YYYY-MM-DDTHH:MM:SS.mmmZ` on the way out, any RFC 3339
/// timestamp on the way in (normalized to UTC, truncated to milliseconds).
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3))
            .map_err(|e| serde::de::Error::custom(format!("invalid createdAt '{}': {}", raw, e)))
    }
}
