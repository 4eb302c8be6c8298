//! Days-since-last-interaction and overdue evaluation.
//!
//! Everything here works at calendar-day granularity and takes `today`
//! from the caller, so a contact seen earlier today is never overdue.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Contact;

/// Returned by [`days_since`] for contacts that were never contacted.
pub const NEVER_CONTACTED: i64 = i64::MAX;

/// Whole days from `last` to `today`. Future dates count as 0.
pub fn days_since(last: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match last {
        Some(last) => (today - last).num_days().max(0),
        None => NEVER_CONTACTED,
    }
}

pub fn is_overdue(days_since: i64, frequency: u32) -> bool {
    days_since > i64::from(frequency)
}

/// How far past the target frequency a contact is. Negative when not overdue.
pub fn overdue_magnitude(days_since: i64, frequency: u32) -> i64 {
    days_since.saturating_sub(i64::from(frequency))
}

/// Overdue badge data for one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recency {
    pub days_since: i64,
    pub overdue: bool,
    pub magnitude: i64,
}

impl Recency {
    pub fn evaluate(contact: &Contact, today: NaiveDate) -> Self {
        let days = days_since(contact.last_interaction, today);
        Self {
            days_since: days,
            overdue: is_overdue(days, contact.frequency_days),
            magnitude: overdue_magnitude(days, contact.frequency_days),
        }
    }

    pub fn never_contacted(&self) -> bool {
        self.days_since == NEVER_CONTACTED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_same_day_never_overdue() {
        let today = day("2025-02-15");
        let days = days_since(Some(today), today);
        assert_eq!(days, 0);
        for freq in [1, 7, 30, 365] {
            assert!(!is_overdue(days, freq));
        }
    }

    #[test]
    fn test_never_contacted_always_overdue() {
        let days = days_since(None, day("2025-02-15"));
        assert_eq!(days, NEVER_CONTACTED);
        for freq in [1, 30, u32::MAX] {
            assert!(is_overdue(days, freq));
            assert!(overdue_magnitude(days, freq) > 0);
        }
    }

    #[test]
    fn test_forty_five_days_against_thirty() {
        let days = days_since(Some(day("2025-01-01")), day("2025-02-15"));
        assert_eq!(days, 45);
        assert!(is_overdue(days, 30));
        assert_eq!(overdue_magnitude(days, 30), 15);
    }

    #[test]
    fn test_boundary_is_strict() {
        assert!(!is_overdue(30, 30));
        assert!(is_overdue(31, 30));
    }

    #[test]
    fn test_future_date_clamped() {
        assert_eq!(days_since(Some(day("2025-03-01")), day("2025-02-15")), 0);
    }
}
