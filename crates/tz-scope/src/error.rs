//! Error types for tz-scope operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimezoneError {
    #[error("Invalid timezone provided: '{timezone}'")]
    InvalidTimezone { timezone: String },

    #[error("Timezone information is missing")]
    MissingTimezone,

    #[error("Naive datetime provided where timezone-aware datetime was required")]
    NaiveDatetime,

    #[error("Invalid datetime or time format: '{0}'")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, TimezoneError>;
