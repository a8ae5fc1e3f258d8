//! Publication status resolution
//!
//! Status is a snapshot: computed exactly once per save from the item's
//! window and the save-time instant, persisted verbatim, and never
//! re-derived on read. An item whose window lapses keeps its stored
//! status until the next save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    /// Window has not opened yet
    Scheduled,
    /// Live
    Published,
    /// Window has closed
    Expired,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Published => "published",
            Self::Expired => "expired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "published" => Some(Self::Published),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl Default for PublicationStatus {
    fn default() -> Self {
        Self::Published
    }
}

/// Map a publication window onto a status, first match wins:
/// a future start date means scheduled, a past end date means expired,
/// everything else is published.
pub fn resolve_status(
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> PublicationStatus {
    if let Some(start) = start_date {
        if start > now {
            return PublicationStatus::Scheduled;
        }
    }
    if let Some(end) = end_date {
        if end < now {
            return PublicationStatus::Expired;
        }
    }
    PublicationStatus::Published
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2025-06-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_no_window_is_published() {
        assert_eq!(resolve_status(None, None, now()), PublicationStatus::Published);
    }

    #[test]
    fn test_future_start_is_scheduled() {
        let start = now() + Duration::hours(1);
        assert_eq!(
            resolve_status(Some(start), None, now()),
            PublicationStatus::Scheduled
        );
    }

    #[test]
    fn test_past_end_is_expired() {
        let end = now() - Duration::hours(1);
        assert_eq!(
            resolve_status(None, Some(end), now()),
            PublicationStatus::Expired
        );
    }

    #[test]
    fn test_open_window_is_published() {
        let start = now() - Duration::days(1);
        let end = now() + Duration::days(1);
        assert_eq!(
            resolve_status(Some(start), Some(end), now()),
            PublicationStatus::Published
        );
    }

    #[test]
    fn test_future_start_wins_over_past_end() {
        // First rule wins even when both would match
        let start = now() + Duration::hours(1);
        let end = now() - Duration::hours(1);
        assert_eq!(
            resolve_status(Some(start), Some(end), now()),
            PublicationStatus::Scheduled
        );
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        // start == now and end == now both leave the item published
        assert_eq!(
            resolve_status(Some(now()), Some(now()), now()),
            PublicationStatus::Published
        );
    }

    #[test]
    fn test_status_round_trip() {
        for s in [
            PublicationStatus::Scheduled,
            PublicationStatus::Published,
            PublicationStatus::Expired,
        ] {
            assert_eq!(PublicationStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(PublicationStatus::from_str("draft"), None);
    }
}
