//! Request-payload field types.
//!
//! Drop-in datetime fields for serde schemas: deserialization delegates to
//! the normalizer, so a payload's naive or locally-formatted datetimes arrive
//! in the model UTC-anchored, interpreted in the request's active timezone.
//! The validation framework surfaces the carried error text to the client.

use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::normalize::{normalize_with_options, NormalizeOptions};

/// A UTC-anchored datetime field, lenient about naive input.
///
/// Accepts every string shape the normalizer does — ISO date+time with
/// tolerant separators, time-only, offset or no offset — and stores UTC.
/// Serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalDateTime(pub DateTime<Utc>);

/// A UTC-anchored datetime field that rejects naive input.
///
/// Identical to [`LocalDateTime`] except payloads without an explicit offset
/// fail validation with the naive-datetime error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictLocalDateTime(pub DateTime<Utc>);

fn deserialize_normalized<'de, D>(deserializer: D, strict: bool) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    normalize_with_options(raw, &NormalizeOptions { strict }).map_err(de::Error::custom)
}

impl<'de> Deserialize<'de> for LocalDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_normalized(deserializer, false).map(Self)
    }
}

impl<'de> Deserialize<'de> for StrictLocalDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_normalized(deserializer, true).map(Self)
    }
}

impl Serialize for LocalDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Serialize for StrictLocalDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Deref for LocalDateTime {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for StrictLocalDateTime {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<LocalDateTime> for DateTime<Utc> {
    fn from(value: LocalDateTime) -> Self {
        value.0
    }
}

impl From<StrictLocalDateTime> for DateTime<Utc> {
    fn from(value: StrictLocalDateTime) -> Self {
        value.0
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for StrictLocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
