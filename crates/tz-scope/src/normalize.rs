//! Datetime normalization against the request-scoped timezone.
//!
//! [`normalize`] accepts the handful of shapes request payloads arrive in —
//! ISO-ish strings (with tolerant date separators), bare wall-clock times,
//! naive datetimes, aware datetimes — and produces a UTC-anchored
//! [`DateTime<Utc>`] using the active zone from [`crate::context`]. The
//! output is never naive and always offset-zero.
//!
//! DST disambiguation is pinned rather than platform-inherited: a fall-back
//! overlap resolves to the earlier of the two candidate instants, and a
//! spring-forward gap resolves with the pre-transition offset so the result
//! lands just past the gap, shifted forward by the gap size.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::context::get_timezone;
use crate::error::{Result, TimezoneError};

/// The input union accepted by [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum DatetimeInput {
    /// An ISO 8601-ish date+time or time-only string.
    Text(String),
    /// A bare wall-clock time, anchored to today's date in the active zone.
    TimeOfDay(NaiveTime),
    /// A datetime with no attached offset, read as local time in the active zone.
    Naive(NaiveDateTime),
    /// A datetime that already carries its offset.
    Aware(DateTime<FixedOffset>),
}

impl From<&str> for DatetimeInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DatetimeInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveTime> for DatetimeInput {
    fn from(value: NaiveTime) -> Self {
        Self::TimeOfDay(value)
    }
}

impl From<NaiveDateTime> for DatetimeInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<DateTime<FixedOffset>> for DatetimeInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Aware(value)
    }
}

impl From<DateTime<Utc>> for DatetimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Aware(value.fixed_offset())
    }
}

impl From<DateTime<Tz>> for DatetimeInput {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Aware(value.fixed_offset())
    }
}

/// Options for [`normalize_with_options`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Reject naive input with
    /// [`TimezoneError::NaiveDatetime`] instead of attaching the active zone.
    pub strict: bool,
}

/// Parsed shape of a text input before zone attachment.
enum Parsed {
    Time(NaiveTime),
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

/// Normalize `value` to a UTC-anchored datetime using the active timezone.
///
/// Naive input is treated as local wall-clock time in the active zone. Use
/// [`normalize_with_options`] to reject naive input instead.
///
/// # Errors
///
/// Returns [`TimezoneError::InvalidFormat`] when a string matches neither the
/// date+time nor the time-only grammar; the error carries the original input.
pub fn normalize(value: impl Into<DatetimeInput>) -> Result<DateTime<Utc>> {
    normalize_with_options(value, &NormalizeOptions::default())
}

/// Normalize `value` to a UTC-anchored datetime, with options.
///
/// The active timezone is read from the context at call time. Aware input is
/// untouched by anchoring and strictness and only re-expressed in UTC.
///
/// # Errors
///
/// Returns [`TimezoneError::InvalidFormat`] for unparseable strings and
/// [`TimezoneError::NaiveDatetime`] for naive input under `strict`.
pub fn normalize_with_options(
    value: impl Into<DatetimeInput>,
    options: &NormalizeOptions,
) -> Result<DateTime<Utc>> {
    let tz = get_timezone();

    let parsed = match value.into() {
        DatetimeInput::Text(text) => parse_text(&text)?,
        DatetimeInput::TimeOfDay(time) => Parsed::Time(time),
        DatetimeInput::Naive(naive) => Parsed::Naive(naive),
        DatetimeInput::Aware(aware) => Parsed::Aware(aware),
    };

    match parsed {
        Parsed::Aware(aware) => Ok(aware.with_timezone(&Utc)),
        Parsed::Time(time) => {
            let today = Utc::now().with_timezone(&tz).date_naive();
            attach_zone(today.and_time(time), tz, options)
        }
        Parsed::Naive(naive) => attach_zone(naive, tz, options),
    }
}

fn attach_zone(naive: NaiveDateTime, tz: Tz, options: &NormalizeOptions) -> Result<DateTime<Utc>> {
    if options.strict {
        return Err(TimezoneError::NaiveDatetime);
    }
    Ok(resolve_local(naive, tz).with_timezone(&Utc))
}

/// Project a naive wall-clock stamp into `tz`.
///
/// Overlapping wall clocks (fall-back) resolve to the earlier candidate.
/// Nonexistent wall clocks (spring-forward gap) resolve with the offset in
/// effect before the transition, landing past the gap.
pub(crate) fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt,
        None => {
            let pre_transition = (1..=24).find_map(|hours| {
                tz.from_local_datetime(&(naive - chrono::Duration::hours(hours)))
                    .earliest()
            });
            match pre_transition {
                Some(before) => {
                    let offset = before.offset().fix();
                    let in_utc =
                        naive - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
                    tz.from_utc_datetime(&in_utc)
                }
                // no resolvable wall clock within a day of the gap; read as UTC
                None => tz.from_utc_datetime(&naive),
            }
        }
    }
}

// ── Text parsing ────────────────────────────────────────────────────────────

fn parse_text(text: &str) -> Result<Parsed> {
    let candidate = rewrite_date_prefix(text);
    if let Some(parsed) = parse_datetime_text(&candidate) {
        return Ok(parsed);
    }
    if let Some(time) = parse_time_text(&candidate) {
        return Ok(Parsed::Time(time));
    }
    Err(TimezoneError::InvalidFormat(text.to_string()))
}

/// Rewrite tolerated date separators in a 10-character date prefix.
///
/// A prefix whose 5th and 8th characters are both `:` or `/` (4-digit-year
/// date), or whose 3rd and 6th are (2-digit-leading date), has every `:` and
/// `/` in those 10 characters replaced with `-`; the remainder of the string
/// is reattached unchanged. Accepts spellings like `2026:01:10 10:56` and
/// `2026/05/20 15:00` without a custom grammar.
fn rewrite_date_prefix(value: &str) -> Cow<'_, str> {
    let prefix: Vec<char> = value.chars().take(10).collect();
    if prefix.len() < 10 {
        return Cow::Borrowed(value);
    }
    let sep = |i: usize| prefix[i] == ':' || prefix[i] == '/';
    if (sep(4) && sep(7)) || (sep(2) && sep(5)) {
        let prefix_bytes: usize = prefix.iter().map(|c| c.len_utf8()).sum();
        let mut rewritten = String::with_capacity(value.len());
        rewritten.extend(
            prefix
                .iter()
                .map(|&c| if c == ':' || c == '/' { '-' } else { c }),
        );
        rewritten.push_str(&value[prefix_bytes..]);
        Cow::Owned(rewritten)
    } else {
        Cow::Borrowed(value)
    }
}

/// Accept `T`, `t`, or a space between the date and time parts.
fn normalize_separator(s: &str) -> Cow<'_, str> {
    match s.as_bytes().get(10) {
        Some(b' ' | b't') => {
            let mut owned = s.to_string();
            owned.replace_range(10..11, "T");
            Cow::Owned(owned)
        }
        _ => Cow::Borrowed(s),
    }
}

fn parse_datetime_text(s: &str) -> Option<Parsed> {
    let s = normalize_separator(s);
    if let Ok(aware) = DateTime::parse_from_rfc3339(&s) {
        return Some(Parsed::Aware(aware));
    }
    // offset without seconds is outside RFC 3339 but inside ISO 8601
    if let Ok(aware) = DateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M%:z") {
        return Some(Parsed::Aware(aware));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&s, format) {
            return Some(Parsed::Naive(naive));
        }
    }
    let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()?;
    Some(Parsed::Naive(date.and_time(NaiveTime::MIN)))
}

fn parse_time_text(s: &str) -> Option<NaiveTime> {
    ["%H:%M:%S%.f", "%H:%M"]
        .into_iter()
        .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
}

// ── Tests ───────────────────────────────────────────────────────────────────
