// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Mutable staging for parsed fields.
//!
//! A bucket is created per parse call, filled by the parse steps, and
//! committed once the whole input is matched. Committing combines the
//! assigned fields with the template value: any field the pattern did not
//! assign keeps the template's value. Field uniqueness was already enforced
//! when the pattern was compiled, so the runtime never re-checks it.

use jiff::civil;

use crate::calendar::Calendar;
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::fields::PatternFields;
use crate::types::{MonthDay, OffsetDateTime, YearMonth};

/// Staging that can commit to a value of kind `T`.
pub(crate) trait ParseBucket<T>: Sized {
    /// Turn the assigned fields plus the template into a value. `used` is
    /// the compile-time set of assigned fields; `end` is the input position
    /// reported by commit-stage failures.
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<T>;
}

/// Read access to the date fields of a value, as the format steps need it.
pub(crate) trait DateFields {
    fn year(&self) -> i64;
    fn month(&self) -> i64;
    fn day(&self) -> i64;
    fn weekday_mon1(&self) -> i64;

    fn year_of_era(&self) -> i64 {
        Calendar::iso().year_of_era(self.year())
    }

    fn era_index(&self) -> usize {
        Calendar::iso().era_of(self.year())
    }

    fn calendar_id(&self) -> &'static str {
        Calendar::iso().id()
    }
}

/// Read access to the time fields of a value.
pub(crate) trait TimeFields {
    fn hour(&self) -> i64;
    fn minute(&self) -> i64;
    fn second(&self) -> i64;
    fn subsec_nanos(&self) -> i64;

    fn hour_12(&self) -> i64 {
        let hour = self.hour() % 12;
        if hour == 0 { 12 } else { hour }
    }

    /// 0 for AM, 1 for PM.
    fn half_day(&self) -> i64 {
        self.hour() / 12
    }
}

/// Write access to an embedded [`DateBucket`].
pub(crate) trait HasDateBucket {
    fn date_bucket(&mut self) -> &mut DateBucket;
}

/// Write access to an embedded [`TimeBucket`].
pub(crate) trait HasTimeBucket {
    fn time_bucket(&mut self) -> &mut TimeBucket;
}

impl HasDateBucket for DateBucket {
    fn date_bucket(&mut self) -> &mut DateBucket {
        self
    }
}

impl HasTimeBucket for TimeBucket {
    fn time_bucket(&mut self) -> &mut TimeBucket {
        self
    }
}

impl DateFields for civil::Date {
    fn year(&self) -> i64 {
        i64::from(civil::Date::year(*self))
    }

    fn month(&self) -> i64 {
        i64::from(civil::Date::month(*self))
    }

    fn day(&self) -> i64 {
        i64::from(civil::Date::day(*self))
    }

    fn weekday_mon1(&self) -> i64 {
        i64::from(self.weekday().to_monday_one_offset())
    }
}

impl DateFields for civil::DateTime {
    fn year(&self) -> i64 {
        i64::from(civil::DateTime::year(*self))
    }

    fn month(&self) -> i64 {
        i64::from(civil::DateTime::month(*self))
    }

    fn day(&self) -> i64 {
        i64::from(civil::DateTime::day(*self))
    }

    fn weekday_mon1(&self) -> i64 {
        i64::from(self.weekday().to_monday_one_offset())
    }
}

impl DateFields for YearMonth {
    fn year(&self) -> i64 {
        i64::from(YearMonth::year(*self))
    }

    fn month(&self) -> i64 {
        i64::from(YearMonth::month(*self))
    }

    // The year-month handler table has no day or day-of-week characters;
    // these exist only to satisfy the trait.
    fn day(&self) -> i64 {
        1
    }

    fn weekday_mon1(&self) -> i64 {
        1
    }
}

impl DateFields for MonthDay {
    // Reference leap year, never printed: the month-day table has no year
    // characters.
    fn year(&self) -> i64 {
        2000
    }

    fn month(&self) -> i64 {
        i64::from(MonthDay::month(*self))
    }

    fn day(&self) -> i64 {
        i64::from(MonthDay::day(*self))
    }

    fn weekday_mon1(&self) -> i64 {
        1
    }
}

impl DateFields for OffsetDateTime {
    fn year(&self) -> i64 {
        self.datetime().year().into()
    }

    fn month(&self) -> i64 {
        self.datetime().month().into()
    }

    fn day(&self) -> i64 {
        self.datetime().day().into()
    }

    fn weekday_mon1(&self) -> i64 {
        i64::from(self.datetime().weekday().to_monday_one_offset())
    }
}

impl DateFields for jiff::Zoned {
    fn year(&self) -> i64 {
        i64::from(self.datetime().year())
    }

    fn month(&self) -> i64 {
        i64::from(self.datetime().month())
    }

    fn day(&self) -> i64 {
        i64::from(self.datetime().day())
    }

    fn weekday_mon1(&self) -> i64 {
        i64::from(self.datetime().weekday().to_monday_one_offset())
    }
}

impl TimeFields for civil::Time {
    fn hour(&self) -> i64 {
        i64::from(civil::Time::hour(*self))
    }

    fn minute(&self) -> i64 {
        i64::from(civil::Time::minute(*self))
    }

    fn second(&self) -> i64 {
        i64::from(civil::Time::second(*self))
    }

    fn subsec_nanos(&self) -> i64 {
        i64::from(self.subsec_nanosecond())
    }
}

impl TimeFields for civil::DateTime {
    fn hour(&self) -> i64 {
        i64::from(civil::DateTime::hour(*self))
    }

    fn minute(&self) -> i64 {
        i64::from(civil::DateTime::minute(*self))
    }

    fn second(&self) -> i64 {
        i64::from(civil::DateTime::second(*self))
    }

    fn subsec_nanos(&self) -> i64 {
        i64::from(self.subsec_nanosecond())
    }
}

impl TimeFields for OffsetDateTime {
    fn hour(&self) -> i64 {
        self.datetime().hour().into()
    }

    fn minute(&self) -> i64 {
        self.datetime().minute().into()
    }

    fn second(&self) -> i64 {
        self.datetime().second().into()
    }

    fn subsec_nanos(&self) -> i64 {
        self.datetime().subsec_nanosecond().into()
    }
}

impl TimeFields for jiff::Zoned {
    fn hour(&self) -> i64 {
        i64::from(self.datetime().hour())
    }

    fn minute(&self) -> i64 {
        i64::from(self.datetime().minute())
    }

    fn second(&self) -> i64 {
        i64::from(self.datetime().second())
    }

    fn subsec_nanos(&self) -> i64 {
        i64::from(self.datetime().subsec_nanosecond())
    }
}

pub(crate) fn pick(
    used: PatternFields,
    field: PatternFields,
    parsed: Option<i64>,
    template: i64,
) -> i64 {
    if used.intersects(field) {
        parsed.unwrap_or(template)
    } else {
        template
    }
}

/// Staging for the date fields.
#[derive(Debug, Clone)]
pub(crate) struct DateBucket {
    pub calendar: Option<&'static Calendar>,
    pub era: Option<usize>,
    pub year: Option<i64>,
    pub year_of_era: Option<i64>,
    pub two_digit_year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
    pub day_of_week: Option<i64>,
    pub template: civil::Date,
}

impl DateBucket {
    pub(crate) fn new(template: civil::Date) -> Self {
        Self {
            calendar: None,
            era: None,
            year: None,
            year_of_era: None,
            two_digit_year: None,
            month: None,
            day: None,
            day_of_week: None,
            template,
        }
    }

    pub(crate) fn commit_date(&self, used: PatternFields, end: usize) -> ParseResult<civil::Date> {
        let calendar = self.calendar.unwrap_or_else(Calendar::iso);
        let template_year = i64::from(self.template.year());

        let year = if used.contains(PatternFields::YEAR_TWO_DIGITS) {
            let two = self.two_digit_year.unwrap_or_default();
            template_year - template_year.rem_euclid(100) + two
        } else if used.contains(PatternFields::YEAR_OF_ERA) {
            let year_of_era = self.year_of_era.unwrap_or(1);
            let era = if used.contains(PatternFields::ERA) {
                self.era.unwrap_or(1)
            } else {
                calendar.era_of(template_year)
            };
            let absolute = calendar.absolute_year(year_of_era, era).ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::FieldValueOutOfRange {
                        value: year_of_era,
                        field: 'y',
                    },
                    end,
                )
            })?;
            if used.contains(PatternFields::YEAR) && self.year != Some(absolute) {
                return Err(ParseError::new(
                    ParseErrorKind::InconsistentValues {
                        first: 'u',
                        second: 'y',
                    },
                    end,
                ));
            }
            absolute
        } else {
            pick(used, PatternFields::YEAR, self.year, template_year)
        };

        let month = pick(
            used,
            PatternFields::MONTH_OF_YEAR_NUMERIC | PatternFields::MONTH_OF_YEAR_TEXT,
            self.month,
            i64::from(self.template.month()),
        );
        let day = pick(
            used,
            PatternFields::DAY_OF_MONTH,
            self.day,
            i64::from(self.template.day()),
        );

        if !(calendar.min_year()..=calendar.max_year()).contains(&year) {
            return Err(ParseError::new(
                ParseErrorKind::FieldValueOutOfRange {
                    value: year,
                    field: 'u',
                },
                end,
            ));
        }
        // Month was range-checked when parsed; only the day depends on the
        // rest of the date.
        let first = civil::Date::new(year as i16, month as i8, 1).map_err(|_| {
            ParseError::new(
                ParseErrorKind::FieldValueOutOfRange {
                    value: month,
                    field: 'M',
                },
                end,
            )
        })?;
        if day < 1 || day > i64::from(first.days_in_month()) {
            return Err(ParseError::new(
                ParseErrorKind::FieldValueOutOfRange {
                    value: day,
                    field: 'd',
                },
                end,
            ));
        }
        let date = civil::Date::new(year as i16, month as i8, day as i8).map_err(|_| {
            ParseError::new(ParseErrorKind::FieldValueOutOfRange { value: day, field: 'd' }, end)
        })?;

        if used.contains(PatternFields::DAY_OF_WEEK)
            && self.day_of_week != Some(i64::from(date.weekday().to_monday_one_offset()))
        {
            return Err(ParseError::new(ParseErrorKind::InconsistentDayOfWeek, end));
        }
        Ok(date)
    }
}

impl ParseBucket<civil::Date> for DateBucket {
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<civil::Date> {
        self.commit_date(used, end)
    }
}

/// Staging for the time fields.
#[derive(Debug, Clone)]
pub(crate) struct TimeBucket {
    pub hours12: Option<i64>,
    pub hours24: Option<i64>,
    pub am_pm: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
    pub fraction: Option<i64>,
    pub template: civil::Time,
}

impl TimeBucket {
    pub(crate) fn new(template: civil::Time) -> Self {
        Self {
            hours12: None,
            hours24: None,
            am_pm: None,
            minutes: None,
            seconds: None,
            fraction: None,
            template,
        }
    }

    /// Commit the time fields. The boolean is the hour-24 carry: a parsed
    /// `24:00:00` commits as midnight with the carry set, and the caller is
    /// responsible for rolling the date forward. Kinds without a date pass
    /// `allow_carry = false` and reject hour 24 outright.
    pub(crate) fn commit_time(
        &self,
        used: PatternFields,
        end: usize,
        allow_carry: bool,
    ) -> Result<(civil::Time, bool), ParseError> {
        let template = self.template;
        let minutes = pick(
            used,
            PatternFields::MINUTES,
            self.minutes,
            i64::from(template.minute()),
        );
        let seconds = pick(
            used,
            PatternFields::SECONDS,
            self.seconds,
            i64::from(template.second()),
        );
        let nanos = pick(
            used,
            PatternFields::FRACTIONAL_SECONDS,
            self.fraction,
            i64::from(template.subsec_nanosecond()),
        );

        let has12 = used.contains(PatternFields::HOURS_12);
        let has24 = used.contains(PatternFields::HOURS_24);
        let has_am_pm = used.contains(PatternFields::AM_PM);
        let hours12 = self.hours12.unwrap_or(12);
        let hours24 = self.hours24.unwrap_or_default();
        let am_pm = self.am_pm.unwrap_or_default();

        if has24 && hours24 == 24 {
            if !allow_carry || minutes != 0 || seconds != 0 || nanos != 0 {
                return Err(ParseError::new(ParseErrorKind::InvalidHour24, end));
            }
            if has12 && hours12 % 12 != 0 {
                return Err(ParseError::new(
                    ParseErrorKind::InconsistentValues {
                        first: 'H',
                        second: 'h',
                    },
                    end,
                ));
            }
            if has_am_pm && am_pm != 0 {
                return Err(ParseError::new(
                    ParseErrorKind::InconsistentValues {
                        first: 'H',
                        second: 't',
                    },
                    end,
                ));
            }
            return Ok((civil::Time::midnight(), true));
        }

        let hour = if has12 && has24 {
            if hours12 % 12 != hours24 % 12 {
                return Err(ParseError::new(
                    ParseErrorKind::InconsistentValues {
                        first: 'H',
                        second: 'h',
                    },
                    end,
                ));
            }
            hours24
        } else if has24 && has_am_pm {
            if hours24 / 12 != am_pm {
                return Err(ParseError::new(
                    ParseErrorKind::InconsistentValues {
                        first: 'H',
                        second: 't',
                    },
                    end,
                ));
            }
            hours24
        } else if has24 {
            hours24
        } else if has12 && has_am_pm {
            hours12 % 12 + am_pm * 12
        } else if has12 {
            // Preserve the half-day of the template.
            hours12 % 12 + TimeFields::half_day(&template) * 12
        } else if has_am_pm {
            // Preserve the 12-hour value of the template.
            TimeFields::hour(&template) % 12 + am_pm * 12
        } else {
            TimeFields::hour(&template)
        };

        civil::Time::new(hour as i8, minutes as i8, seconds as i8, nanos as i32)
            .map(|time| (time, false))
            .map_err(|_| {
                ParseError::new(ParseErrorKind::ValueOutOfRange { value: hour }, end)
            })
    }
}

impl ParseBucket<civil::Time> for TimeBucket {
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<civil::Time> {
        self.commit_time(used, end, false).map(|(time, _)| time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_template() -> civil::Date {
        civil::date(2000, 1, 1)
    }

    #[test]
    fn unassigned_date_fields_come_from_the_template() {
        let bucket = DateBucket::new(civil::date(1987, 6, 15));
        let date = bucket.commit_date(PatternFields::empty(), 0).unwrap();
        assert_eq!(date, civil::date(1987, 6, 15));
    }

    #[test]
    fn two_digit_year_uses_template_century() {
        let mut bucket = DateBucket::new(date_template());
        bucket.two_digit_year = Some(25);
        let date = bucket
            .commit_date(PatternFields::YEAR_TWO_DIGITS, 0)
            .unwrap();
        assert_eq!(date.year(), 2025);
    }

    #[test]
    fn day_is_validated_against_the_resolved_month() {
        let mut bucket = DateBucket::new(date_template());
        bucket.year = Some(1999);
        bucket.month = Some(2);
        bucket.day = Some(29);
        let used = PatternFields::YEAR
            | PatternFields::MONTH_OF_YEAR_NUMERIC
            | PatternFields::DAY_OF_MONTH;
        let err = bucket.commit_date(used, 10).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::FieldValueOutOfRange {
                value: 29,
                field: 'd'
            }
        );
        assert_eq!(err.position, 10);
    }

    #[test]
    fn era_year_resolution() {
        let mut bucket = DateBucket::new(date_template());
        bucket.era = Some(0);
        bucket.year_of_era = Some(44);
        let used = PatternFields::ERA | PatternFields::YEAR_OF_ERA;
        let date = bucket.commit_date(used, 0).unwrap();
        assert_eq!(date.year(), -43);
    }

    #[test]
    fn twelve_hour_keeps_template_half_day() {
        let mut bucket = TimeBucket::new(civil::time(15, 0, 0, 0));
        bucket.hours12 = Some(5);
        let (time, carry) = bucket
            .commit_time(PatternFields::HOURS_12, 0, false)
            .unwrap();
        assert!(!carry);
        assert_eq!(time, civil::time(17, 0, 0, 0));
    }

    #[test]
    fn hour_24_carry() {
        let mut bucket = TimeBucket::new(civil::Time::midnight());
        bucket.hours24 = Some(24);
        bucket.minutes = Some(0);
        let used = PatternFields::HOURS_24 | PatternFields::MINUTES;

        let (time, carry) = bucket.commit_time(used, 0, true).unwrap();
        assert_eq!((time, carry), (civil::Time::midnight(), true));

        // Without a date to carry into, 24:00 is invalid.
        let err = bucket.commit_time(used, 0, false).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidHour24);

        bucket.minutes = Some(30);
        let err = bucket.commit_time(used, 0, true).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidHour24);
    }

    #[test]
    fn half_day_conflicts() {
        let mut bucket = TimeBucket::new(civil::Time::midnight());
        bucket.hours24 = Some(13);
        bucket.am_pm = Some(0);
        let used = PatternFields::HOURS_24 | PatternFields::AM_PM;
        let err = bucket.commit_time(used, 0, false).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::InconsistentValues {
                first: 'H',
                second: 't'
            }
        );
    }
}
