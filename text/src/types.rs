// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Value records the engine serves that have no `jiff` counterpart.

use jiff::civil;
use jiff::tz::Offset;

/// A calendar year and month, without a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i16,
    month: i8,
}

impl YearMonth {
    /// Build a year-month, validating the month.
    ///
    /// # Errors
    ///
    /// Returns `None` when the month is outside `1..=12` or the year is
    /// outside the supported `-9999..=9999` range.
    #[must_use]
    pub fn new(year: i16, month: i8) -> Option<Self> {
        ((-9999..=9999).contains(&year) && (1..=12).contains(&month))
            .then_some(Self { year, month })
    }

    /// Year component.
    #[must_use]
    pub fn year(self) -> i16 {
        self.year
    }

    /// Month component, 1-12.
    #[must_use]
    pub fn month(self) -> i8 {
        self.month
    }

    /// Combine with a day of month into a civil date.
    ///
    /// # Errors
    ///
    /// Fails when the day does not exist in this month.
    pub fn on_day(self, day: i8) -> Result<civil::Date, jiff::Error> {
        civil::Date::new(self.year, self.month, day)
    }
}

impl From<civil::Date> for YearMonth {
    fn from(date: civil::Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// A month and day, without a year. February 29 is a valid month-day; it
/// only gains a concrete date in a leap year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: i8,
    day: i8,
}

impl MonthDay {
    /// Build a month-day, validating the combination against a leap
    /// reference year (2000), so February 29 is accepted but February 30 is
    /// not.
    #[must_use]
    pub fn new(month: i8, day: i8) -> Option<Self> {
        civil::Date::new(2000, month, day)
            .ok()
            .map(|_| Self { month, day })
    }

    /// Month component, 1-12.
    #[must_use]
    pub fn month(self) -> i8 {
        self.month
    }

    /// Day component.
    #[must_use]
    pub fn day(self) -> i8 {
        self.day
    }

    /// Combine with a year into a civil date.
    ///
    /// # Errors
    ///
    /// Fails for February 29 in a non-leap year.
    pub fn in_year(self, year: i16) -> Result<civil::Date, jiff::Error> {
        civil::Date::new(year, self.month, self.day)
    }
}

impl From<civil::Date> for MonthDay {
    fn from(date: civil::Date) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

/// A civil date-time paired with the UTC offset it was observed at.
///
/// Unlike a zoned date-time there is no time-zone identity, only the fixed
/// offset, so the value is unambiguous by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetDateTime {
    datetime: civil::DateTime,
    offset: Offset,
}

impl OffsetDateTime {
    /// Pair a civil date-time with an offset.
    #[must_use]
    pub fn new(datetime: civil::DateTime, offset: Offset) -> Self {
        Self { datetime, offset }
    }

    /// The local date-time component.
    #[must_use]
    pub fn datetime(self) -> civil::DateTime {
        self.datetime
    }

    /// The date component.
    #[must_use]
    pub fn date(self) -> civil::Date {
        self.datetime.date()
    }

    /// The time component.
    #[must_use]
    pub fn time(self) -> civil::Time {
        self.datetime.time()
    }

    /// The UTC offset.
    #[must_use]
    pub fn offset(self) -> Offset {
        self.offset
    }

    /// The instant this value names.
    ///
    /// # Errors
    ///
    /// Fails when the date-time is at the very edge of the representable
    /// range and the offset pushes it over.
    pub fn to_timestamp(self) -> Result<jiff::Timestamp, jiff::Error> {
        self.offset.to_timestamp(self.datetime)
    }

    /// View this value as a zoned date-time in a fixed-offset zone.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`OffsetDateTime::to_timestamp`].
    pub fn to_zoned(self) -> Result<jiff::Zoned, jiff::Error> {
        let tz = jiff::tz::TimeZone::fixed(self.offset);
        Ok(self.to_timestamp()?.to_zoned(tz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_validation() {
        assert!(YearMonth::new(2024, 2).is_some());
        assert!(YearMonth::new(2024, 13).is_none());
        assert!(YearMonth::new(-10_000, 1).is_none());

        let ym = YearMonth::new(2024, 2).unwrap();
        assert_eq!(ym.on_day(29).unwrap(), civil::date(2024, 2, 29));
        assert!(ym.on_day(30).is_err());
    }

    #[test]
    fn month_day_leap_awareness() {
        let md = MonthDay::new(2, 29).unwrap();
        assert!(md.in_year(2024).is_ok());
        assert!(md.in_year(1999).is_err());
        assert!(MonthDay::new(2, 30).is_none());
    }

    #[test]
    fn offset_date_time_instant() {
        let odt = OffsetDateTime::new(
            civil::datetime(2024, 6, 1, 12, 0, 0, 0),
            Offset::from_seconds(2 * 3600).unwrap(),
        );
        let utc = OffsetDateTime::new(civil::datetime(2024, 6, 1, 10, 0, 0, 0), Offset::UTC);
        assert_eq!(odt.to_timestamp().unwrap(), utc.to_timestamp().unwrap());
    }
}
