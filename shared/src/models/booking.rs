//! Booking Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::form::FieldError;
use crate::util::{deserialize_id, deserialize_optional_id};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Scheduled,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    /// Whether the booking still occupies its time slot
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| FieldError::InvalidChoice(s.to_string()))
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub staff_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub service_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub status: BookingStatus,
    /// Customer's message / needs
    #[serde(default)]
    pub message: Option<String>,
    /// Internal notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Booking {
    /// Half-open interval overlap with `[start, end)`
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

impl Entity for Booking {
    const TABLE: &'static str = "bookings";
    type Fields = BookingFields;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update booking payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingFields {
    pub customer_id: String,
    pub staff_id: Option<String>,
    pub service_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub message: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_round_trip_names() {
        assert_eq!("no_show".parse::<BookingStatus>(), Ok(BookingStatus::NoShow));
        assert!("noshow".parse::<BookingStatus>().is_err());
        assert_eq!(serde_json::to_string(&BookingStatus::NoShow).unwrap(), r#""no_show""#);
        assert!(!BookingStatus::Cancelled.blocks_slot());
    }

    #[test]
    fn test_overlap_is_half_open() {
        let at = |h| Utc.with_ymd_and_hms(2026, 5, 4, h, 0, 0).unwrap();
        let booking = Booking {
            id: "1".into(),
            customer_id: "c".into(),
            staff_id: None,
            service_id: None,
            start_time: at(10),
            end_time: at(11),
            status: BookingStatus::Scheduled,
            message: None,
            notes: None,
        };
        assert!(booking.overlaps(at(10), at(12)));
        assert!(!booking.overlaps(at(11), at(12)));
        assert!(!booking.overlaps(at(9), at(10)));
    }
}
