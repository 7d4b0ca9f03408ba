//! # tz-scope
//!
//! Request-scoped timezone normalization for datetime values flowing through
//! a request/validation pipeline. A server remembers "the timezone for the
//! current request" and consistently converts naive or locally-formatted
//! datetime input into UTC-anchored values, and converts UTC back to the
//! request's local time for display.
//!
//! An inbound adapter (see the `tz-scope-tower` crate) pins a zone per
//! request; application code and serde field types then normalize through
//! that context without threading the zone through every call.
//!
//! ## Modules
//!
//! - [`registry`] — IANA zone name → [`Tz`] lookup
//! - [`context`] — per-task/per-thread timezone slot with a UTC default
//! - [`normalize`] — arbitrary datetime-like input → UTC-anchored datetime
//! - [`convert`] — UTC ⇄ active-zone directional converters
//! - [`field`] — serde field types that validate through the normalizer
//! - [`error`] — error types
//!
//! ## Example
//!
//! ```
//! use tz_scope::{normalize, set_timezone, with_timezone_sync};
//! use chrono_tz::Tz;
//!
//! let utc = with_timezone_sync(Tz::UTC, || {
//!     set_timezone("Asia/Kolkata");
//!     normalize("2024-01-01 12:00").unwrap()
//! });
//! assert_eq!(utc.to_rfc3339(), "2024-01-01T06:30:00+00:00");
//! ```

pub mod context;
pub mod convert;
pub mod error;
pub mod field;
pub mod normalize;
pub mod registry;

pub use context::{
    get_timezone, now_local, set_timezone, set_timezone_strict, today_local, with_timezone,
    with_timezone_sync,
};
pub use convert::{local_to_utc, utc_to_local, AnyDatetime};
pub use error::{Result, TimezoneError};
pub use field::{LocalDateTime, StrictLocalDateTime};
pub use normalize::{normalize, normalize_with_options, DatetimeInput, NormalizeOptions};
pub use registry::resolve_timezone;

// downstream code names zones without importing chrono-tz itself
pub use chrono_tz::Tz;
