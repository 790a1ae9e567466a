//! Launch-list signups and their log-line representation.

use std::fmt;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::error::DomainError;

/// An email address accepted by the signup endpoint.
///
/// Only presence is validated and the value is stored exactly as submitted.
/// Line breaks are rejected since each record occupies one log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let value = raw.unwrap_or_default();
        if value.is_empty() {
            return Err(DomainError::missing("email"));
        }
        if value.contains(['\n', '\r']) {
            return Err(DomainError::validation("email must fit on a single line"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One signup event. Records are appended and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberRecord {
    pub subscribed_at: OffsetDateTime,
    pub email: EmailAddress,
}

impl SubscriberRecord {
    pub fn new(email: EmailAddress, subscribed_at: OffsetDateTime) -> Self {
        Self {
            subscribed_at,
            email,
        }
    }

    pub fn now(email: EmailAddress) -> Self {
        Self::new(email, OffsetDateTime::now_utc())
    }

    /// `<ISO-8601 timestamp>,<email>` terminated by a newline.
    pub fn to_log_line(&self) -> Result<String, DomainError> {
        let timestamp = self
            .subscribed_at
            .format(&Rfc3339)
            .map_err(|err| DomainError::validation(format!("unformattable timestamp: {err}")))?;
        Ok(format!("{timestamp},{}\n", self.email))
    }
}
