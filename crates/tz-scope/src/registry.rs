//! IANA timezone database lookup.
//!
//! `chrono-tz` compiles the IANA table into the binary, so resolution is a
//! static lookup: read-only, idempotent, and safe to call concurrently from
//! any number of tasks or threads without locking.

use chrono_tz::Tz;

use crate::error::{Result, TimezoneError};

/// Resolve an IANA zone name (e.g. `"Asia/Kolkata"`) to a [`Tz`].
///
/// # Errors
///
/// Returns [`TimezoneError::InvalidTimezone`] when `name` is empty, malformed,
/// or not a recognized IANA zone identifier.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| TimezoneError::InvalidTimezone {
            timezone: name.to_string(),
        })
}
