// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Combined date and time patterns.

use std::sync::{Arc, OnceLock};

use jiff::civil;

use crate::bucket::{DateBucket, HasDateBucket, HasTimeBucket, ParseBucket, TimeBucket};
use crate::builder::{CharacterHandler, HandlerTable, SteppedPatternBuilder};
use crate::error::{ParseError, ParseErrorKind, ParseResult, PatternError};
use crate::fields::PatternFields;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::{add_date_handlers, single_character};
use crate::patterns::time::add_time_handlers;

pub(crate) const GENERAL_ISO_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd'T'HH':'mm':'ss";
pub(crate) const EXTENDED_ISO_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd'T'HH':'mm':'ss;FFFFFFFFF";
const FULL_ROUNDTRIP_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd'T'HH':'mm':'ss'.'fffffffff' ('c')'";

/// A compiled pattern for [`jiff::civil::DateTime`] values.
pub type DateTimePattern = Pattern<civil::DateTime>;

impl DateTimePattern {
    /// The template used when none is given: 2000-01-01 at midnight.
    pub const DEFAULT_TEMPLATE: civil::DateTime = civil::DateTime::constant(2000, 1, 1, 0, 0, 0, 0);

    /// Compile a date-time pattern.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        Self::create_with_template(pattern, locale, Self::DEFAULT_TEMPLATE)
    }

    /// Compile a date-time pattern with an explicit template value.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: civil::DateTime,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory())
    }

    /// The cached general ISO pattern, seconds precision.
    #[must_use]
    pub fn general_iso() -> Self {
        static GENERAL: OnceLock<DateTimePattern> = OnceLock::new();
        GENERAL
            .get_or_init(|| {
                Self::create(GENERAL_ISO_PATTERN_TEXT, &Locale::invariant())
                    .expect("the general ISO date-time pattern compiles")
            })
            .clone()
    }

    /// The cached extended ISO pattern, nanosecond precision with trailing
    /// zeros trimmed.
    #[must_use]
    pub fn extended_iso() -> Self {
        static EXTENDED: OnceLock<DateTimePattern> = OnceLock::new();
        EXTENDED
            .get_or_init(|| {
                Self::create(EXTENDED_ISO_PATTERN_TEXT, &Locale::invariant())
                    .expect("the extended ISO date-time pattern compiles")
            })
            .clone()
    }
}

/// Staging for a date-time: the two sub-buckets, committed masked by their
/// own field categories and recombined.
pub(crate) struct DateTimeBucket {
    pub(crate) date: DateBucket,
    pub(crate) time: TimeBucket,
}

impl DateTimeBucket {
    pub(crate) fn new(template: civil::DateTime) -> Self {
        Self {
            date: DateBucket::new(template.date()),
            time: TimeBucket::new(template.time()),
        }
    }

    /// Commit both halves, applying the hour-24 carry to the date.
    pub(crate) fn commit_date_time(
        &self,
        used: PatternFields,
        end: usize,
    ) -> ParseResult<civil::DateTime> {
        let (time, carry) = self
            .time
            .commit_time(used & PatternFields::ALL_TIME_FIELDS, end, true)?;
        let mut date = self
            .date
            .commit_date(used & PatternFields::ALL_DATE_FIELDS, end)?;
        if carry {
            date = date.tomorrow().map_err(|_| {
                ParseError::new(
                    ParseErrorKind::ValueOutOfRange {
                        value: i64::from(date.year()),
                    },
                    end,
                )
            })?;
        }
        Ok(civil::DateTime::from_parts(date, time))
    }
}

impl HasDateBucket for DateTimeBucket {
    fn date_bucket(&mut self) -> &mut DateBucket {
        &mut self.date
    }
}

impl HasTimeBucket for DateTimeBucket {
    fn time_bucket(&mut self) -> &mut TimeBucket {
        &mut self.time
    }
}

impl ParseBucket<civil::DateTime> for DateTimeBucket {
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<civil::DateTime> {
        self.commit_date_time(used, end)
    }
}

/// Inline an embedded `l<...>` local date-time pattern: the inner text is
/// compiled with the given table straight into the enclosing builder, so
/// its fields share the enclosing pattern's bookkeeping.
pub(crate) fn embedded_local_handler<T: 'static, B: 'static>(
    table: fn() -> &'static HandlerTable<T, B>,
) -> CharacterHandler<T, B> {
    Box::new(move |cursor, builder| {
        let text = cursor.get_embedded_pattern()?;
        builder.add_field(
            PatternFields::EMBEDDED_DATE | PatternFields::EMBEDDED_TIME,
            'l',
        )?;
        builder.parse_custom_pattern(&text, table())
    })
}

fn factory() -> PatternFactory<civil::DateTime> {
    Arc::new(|text, locale, template| compile(text, locale, *template))
}

pub(crate) fn compile(
    text: &str,
    locale: &Locale,
    template: civil::DateTime,
) -> Result<Arc<dyn PatternImpl<civil::DateTime>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let text = match single_character(text) {
        Some(specifier) => expand_standard(specifier)?,
        None => text,
    };
    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, handlers())?;
    let pattern = builder.build(move || DateTimeBucket::new(template))?;
    Ok(Arc::new(pattern))
}

fn expand_standard(specifier: char) -> Result<&'static str, PatternError> {
    match specifier {
        // `s` is the sortable pattern, which coincides with the general ISO
        // shape.
        'G' | 's' => Ok(GENERAL_ISO_PATTERN_TEXT),
        'o' | 'O' => Ok(EXTENDED_ISO_PATTERN_TEXT),
        // The full round-trip keeps every fraction digit and names the
        // calendar.
        'r' => Ok(FULL_ROUNDTRIP_PATTERN_TEXT),
        _ => Err(PatternError::UnknownStandardFormat {
            specifier,
            kind: "DateTime",
        }),
    }
}

fn handlers() -> &'static HandlerTable<civil::DateTime, DateTimeBucket> {
    static TABLE: OnceLock<HandlerTable<civil::DateTime, DateTimeBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        add_date_handlers(&mut table);
        add_time_handlers(&mut table);
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_iso_round_trip() {
        let pattern = DateTimePattern::general_iso();
        let value = civil::datetime(2013, 3, 10, 22, 45, 30, 0);
        assert_eq!(pattern.format(&value), "2013-03-10T22:45:30");
        assert_eq!(pattern.parse("2013-03-10T22:45:30").unwrap(), value);
    }

    #[test]
    fn hour_24_rolls_into_the_next_day() {
        let pattern = DateTimePattern::general_iso();
        assert_eq!(
            pattern.parse("2013-03-10T24:00:00").unwrap(),
            civil::datetime(2013, 3, 11, 0, 0, 0, 0)
        );

        let err = pattern.parse("2013-03-10T24:00:01").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidHour24);
    }

    #[test]
    fn full_round_trip_keeps_every_fraction_digit() {
        let pattern = DateTimePattern::create("r", &Locale::invariant()).unwrap();
        let value = civil::datetime(2024, 2, 29, 12, 30, 45, 500_000_000);
        assert_eq!(
            pattern.format(&value),
            "2024-02-29T12:30:45.500000000 (ISO)"
        );
        assert_eq!(
            pattern.parse("2024-02-29T12:30:45.500000000 (ISO)").unwrap(),
            value
        );
    }

    #[test]
    fn extended_iso_trims_trailing_zeros() {
        let pattern = DateTimePattern::extended_iso();
        let value = civil::datetime(2024, 2, 29, 12, 30, 45, 500_000_000);
        assert_eq!(pattern.format(&value), "2024-02-29T12:30:45.5");
    }

    #[test]
    fn time_fields_fall_back_to_the_template() {
        let pattern = DateTimePattern::create_with_template(
            GENERAL_ISO_PATTERN_TEXT,
            &Locale::invariant(),
            civil::datetime(2000, 1, 1, 0, 0, 0, 750),
        )
        .unwrap();
        let value = pattern.parse("2024-05-06T01:02:03").unwrap();
        assert_eq!(value, civil::datetime(2024, 5, 6, 1, 2, 3, 750));
    }
}
