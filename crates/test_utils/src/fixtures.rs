//! Pre-built Test Fixtures
//!
//! Consistent, predictable dates and identifiers for integration tests.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{MemberId, MonthKey};
use uuid::Uuid;

/// Fixture for calendar test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// March 2024, a 31-day month
    pub fn march_2024() -> MonthKey {
        MonthKey::new(2024, 3).unwrap()
    }

    /// Noon UTC on a day in March 2024
    pub fn march_2024_day(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    /// Noon UTC in the following month
    pub fn april_2024_day(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, 12, 0, 0).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// A deterministic member ID that belongs to no group
    pub fn outsider_id() -> MemberId {
        MemberId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }
}
