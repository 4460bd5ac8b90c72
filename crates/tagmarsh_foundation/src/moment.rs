//! Date/time instants and their textual forms.
//!
//! A date envelope carries a string, not a numeric timestamp. The default
//! [`MomentFormat::Display`] form is a human-oriented display string such as
//! `Mon Oct 19 2026 12:00:00 GMT+0000`, which only has second precision:
//! round trips through it preserve the display string, not the exact
//! instant. [`MomentFormat::Rfc3339`] keeps millisecond precision.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// chrono format string for the display form.
const DISPLAY_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Textual form used when encoding a [`Moment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MomentFormat {
    /// `Mon Oct 19 2026 12:00:00 GMT+0000`, second precision.
    #[default]
    Display,
    /// `2026-10-19T12:00:00.000Z`, millisecond precision.
    Rfc3339,
}

/// A date/time instant, always held in UTC.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Moment(DateTime<Utc>);

impl Moment {
    /// Wraps a chrono instant.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Returns the current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a moment from milliseconds since the Unix epoch.
    ///
    /// Returns `None` if the timestamp is out of range.
    #[must_use]
    pub fn from_timestamp_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Returns milliseconds since the Unix epoch.
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the underlying chrono instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Renders the moment in the requested textual form.
    #[must_use]
    pub fn format(&self, format: MomentFormat) -> String {
        match format {
            MomentFormat::Display => self.0.format(DISPLAY_FORMAT).to_string(),
            MomentFormat::Rfc3339 => self.0.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parses text written in exactly one textual form.
    ///
    /// The display form tolerates a trailing parenthesized zone name, as in
    /// `Mon Oct 19 2026 12:00:00 GMT+0000 (Coordinated Universal Time)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMoment` if the text is not in the given form.
    pub fn parse_as(text: &str, format: MomentFormat) -> Result<Self> {
        let parsed = match format {
            MomentFormat::Display => {
                let trimmed = text.split(" (").next().unwrap_or(text).trim();
                DateTime::parse_from_str(trimmed, DISPLAY_FORMAT)
            }
            MomentFormat::Rfc3339 => DateTime::parse_from_rfc3339(text.trim()),
        };
        parsed
            .map(|instant| Self(instant.with_timezone(&Utc)))
            .map_err(|_| Error::invalid_moment(text))
    }

    /// Parses text in any supported textual form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMoment` if no form matches.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_as(text, MomentFormat::Display)
            .or_else(|_| Self::parse_as(text, MomentFormat::Rfc3339))
    }
}

impl From<DateTime<Utc>> for Moment {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl fmt::Debug for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Moment({})", self.format(MomentFormat::Rfc3339))
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(MomentFormat::Display))
    }
}
