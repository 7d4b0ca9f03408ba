//! Directional converters between UTC and the active timezone.
//!
//! Both functions pass `None` through untouched so optional model fields can
//! be converted without unwrapping. Neither participates in strict mode;
//! [`local_to_utc`] is always permissive with naive input.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::context::get_timezone;
use crate::normalize::resolve_local;

/// A datetime that may or may not carry an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyDatetime {
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

impl From<NaiveDateTime> for AnyDatetime {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<DateTime<FixedOffset>> for AnyDatetime {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Aware(value)
    }
}

impl From<DateTime<Utc>> for AnyDatetime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Aware(value.fixed_offset())
    }
}

impl From<DateTime<Tz>> for AnyDatetime {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Aware(value.fixed_offset())
    }
}

/// Re-express a UTC instant in the active timezone.
///
/// The instant is unchanged; only its displayed offset moves.
pub fn utc_to_local(dt: Option<DateTime<Utc>>) -> Option<DateTime<Tz>> {
    dt.map(|dt| dt.with_timezone(&get_timezone()))
}

/// Convert a local datetime to UTC.
///
/// Naive input gets the active timezone attached first; aware input converts
/// directly. For any aware `dt`, `local_to_utc(utc_to_local(dt))` denotes the
/// same instant as `dt`.
pub fn local_to_utc(dt: Option<impl Into<AnyDatetime>>) -> Option<DateTime<Utc>> {
    dt.map(|dt| match dt.into() {
        AnyDatetime::Aware(aware) => aware.with_timezone(&Utc),
        AnyDatetime::Naive(naive) => resolve_local(naive, get_timezone()).with_timezone(&Utc),
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
