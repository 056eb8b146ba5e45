use std::fmt;

use serde::{Deserialize, Serialize};

/// UTC timestamp that serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WrappedChronoDateTime(chrono::DateTime<chrono::Utc>);

impl WrappedChronoDateTime {
    pub fn get_inner(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }

    pub fn new(value: chrono::DateTime<chrono::Utc>) -> Self {
        Self(value)
    }

    /// Midnight UTC of the given calendar day.
    pub fn from_date(date: chrono::NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl fmt::Display for WrappedChronoDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(all(test, feature = "unit_test"))]
mod unit_test {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    #[test]
    fn test_from_date_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(1980, 2, 29).unwrap();
        let wrapped = WrappedChronoDateTime::from_date(date);
        assert_eq!(wrapped.get_inner().year(), 1980);
        assert_eq!(wrapped.get_inner().hour(), 0);
        assert_eq!(wrapped.to_string(), "1980-02-29T00:00:00+00:00");
    }
}
