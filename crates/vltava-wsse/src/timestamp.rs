#![forbid(unsafe_code)]

//! The signature timestamp window.

use chrono::{DateTime, Duration, Utc};

/// Validity window of a security timestamp: five minutes, per the broker
/// profile.
const VALIDITY_MINUTES: i64 = 5;

/// A freshly generated timestamp window for one signing operation.
#[derive(Debug, Clone, Copy)]
pub struct TimestampWindow {
    created: DateTime<Utc>,
    expires: DateTime<Utc>,
}

impl TimestampWindow {
    /// A window opening now.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// A window opening at the given instant.
    pub fn at(created: DateTime<Utc>) -> Self {
        Self {
            created,
            expires: created + Duration::minutes(VALIDITY_MINUTES),
        }
    }

    /// `wsu:Created` content.
    pub fn created(&self) -> String {
        format_instant(&self.created)
    }

    /// `wsu:Expires` content.
    pub fn expires(&self) -> String {
        format_instant(&self.expires)
    }
}

fn format_instant(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
