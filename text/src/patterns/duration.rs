// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Absolute duration patterns.
//!
//! A duration pattern has at most one total-valued field (`D`, `H`, `M` or
//! `S`); the lower-case characters are components within the next larger
//! unit. Unassigned components are zero, so `-H:mm` covers the whole
//! duration with total hours plus a minute component.

use std::sync::{Arc, OnceLock};

use jiff::SignedDuration;

use crate::bucket::ParseBucket;
use crate::builder::{
    CharacterHandler, HandlerTable, SteppedPatternBuilder, handle_decimal_separator,
    handle_fraction, handle_negative_only_sign, handle_padded_field, handle_required_sign,
    handle_time_separator,
};
use crate::error::{ParseResult, PatternError};
use crate::fields::PatternFields;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::single_character;

pub(crate) const ROUNDTRIP_PATTERN_TEXT: &str = "-D:hh:mm:ss.FFFFFFFFF";
const GENERAL_PATTERN_TEXT: &str = "-H:mm:ss";

/// A compiled pattern for [`jiff::SignedDuration`] values.
pub type DurationPattern = Pattern<SignedDuration>;

impl DurationPattern {
    /// Compile a duration pattern.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        Self::create_with_template(pattern, locale, SignedDuration::ZERO)
    }

    /// Compile a duration pattern with an explicit template value. The
    /// template only seeds façade variants; unassigned duration components
    /// are zero.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: SignedDuration,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory())
    }

    /// The cached round-trip pattern, `-D:hh:mm:ss.FFFFFFFFF`.
    #[must_use]
    pub fn round_trip() -> Self {
        static ROUNDTRIP: OnceLock<DurationPattern> = OnceLock::new();
        ROUNDTRIP
            .get_or_init(|| {
                Self::create(ROUNDTRIP_PATTERN_TEXT, &Locale::invariant())
                    .expect("the round-trip duration pattern compiles")
            })
            .clone()
    }
}

/// Staging for a duration: unsigned totals and components plus a sign flag.
#[derive(Default)]
struct DurationBucket {
    negative: bool,
    days: Option<i64>,
    hours: Option<i64>,
    minutes: Option<i64>,
    seconds: Option<i64>,
    fraction: Option<i64>,
}

impl ParseBucket<SignedDuration> for DurationBucket {
    fn commit(self, _used: PatternFields, _end: usize) -> ParseResult<SignedDuration> {
        let seconds: i128 = i128::from(self.days.unwrap_or(0)) * 86_400
            + i128::from(self.hours.unwrap_or(0)) * 3_600
            + i128::from(self.minutes.unwrap_or(0)) * 60
            + i128::from(self.seconds.unwrap_or(0));
        let mut nanos = seconds * 1_000_000_000 + i128::from(self.fraction.unwrap_or(0));
        if self.negative {
            nanos = -nanos;
        }
        // Every component is bounded well inside the i64-second range.
        let secs = (nanos / 1_000_000_000) as i64;
        let subsec = (nanos % 1_000_000_000) as i32;
        Ok(SignedDuration::new(secs, subsec))
    }
}

fn factory() -> PatternFactory<SignedDuration> {
    Arc::new(|text, locale, template| compile(text, locale, *template))
}

fn compile(
    text: &str,
    locale: &Locale,
    _template: SignedDuration,
) -> Result<Arc<dyn PatternImpl<SignedDuration>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let text = match single_character(text) {
        Some('o' | 'l') => ROUNDTRIP_PATTERN_TEXT,
        Some('g') => GENERAL_PATTERN_TEXT,
        Some(specifier) => {
            return Err(PatternError::UnknownStandardFormat {
                specifier,
                kind: "Duration",
            });
        }
        None => text,
    };
    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, handlers())?;
    let pattern = builder.build(DurationBucket::default)?;
    Ok(Arc::new(pattern))
}

/// A total-valued capital field. Only one may appear per pattern.
fn handle_total_field(
    component: PatternFields,
    getter: fn(&SignedDuration) -> i64,
    setter: fn(&mut DurationBucket, i64),
) -> CharacterHandler<SignedDuration, DurationBucket> {
    Box::new(move |cursor, builder| {
        let character = cursor.current().unwrap_or_default();
        let count = cursor.get_repeat_count(10)?;
        if builder
            .used_fields()
            .contains(PatternFields::TOTAL_DURATION)
        {
            return Err(PatternError::MultipleCapitalDurationFields);
        }
        builder.add_field(PatternFields::TOTAL_DURATION | component, character)?;
        builder.add_parse_value_step(count, 10, character, 0, 9_999_999_999, setter);
        builder.add_format_left_pad(count, getter);
        Ok(())
    })
}

fn abs_secs(duration: &SignedDuration) -> i64 {
    duration.as_secs().abs()
}

fn handlers() -> &'static HandlerTable<SignedDuration, DurationBucket> {
    static TABLE: OnceLock<HandlerTable<SignedDuration, DurationBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        table.insert(':', Box::new(handle_time_separator));
        table.insert(
            'D',
            handle_total_field(
                PatternFields::empty(),
                |duration| abs_secs(duration) / 86_400,
                |bucket, value| bucket.days = Some(value),
            ),
        );
        table.insert(
            'H',
            handle_total_field(
                PatternFields::HOURS_24,
                |duration| abs_secs(duration) / 3_600,
                |bucket, value| bucket.hours = Some(value),
            ),
        );
        table.insert(
            'M',
            handle_total_field(
                PatternFields::MINUTES,
                |duration| abs_secs(duration) / 60,
                |bucket, value| bucket.minutes = Some(value),
            ),
        );
        table.insert(
            'S',
            handle_total_field(
                PatternFields::SECONDS,
                abs_secs,
                |bucket, value| bucket.seconds = Some(value),
            ),
        );
        table.insert(
            'h',
            handle_padded_field(
                2,
                PatternFields::HOURS_24,
                0,
                23,
                |duration: &SignedDuration| abs_secs(duration) % 86_400 / 3_600,
                |bucket: &mut DurationBucket, value| bucket.hours = Some(value),
            ),
        );
        table.insert(
            'm',
            handle_padded_field(
                2,
                PatternFields::MINUTES,
                0,
                59,
                |duration: &SignedDuration| abs_secs(duration) % 3_600 / 60,
                |bucket: &mut DurationBucket, value| bucket.minutes = Some(value),
            ),
        );
        table.insert(
            's',
            handle_padded_field(
                2,
                PatternFields::SECONDS,
                0,
                59,
                |duration: &SignedDuration| abs_secs(duration) % 60,
                |bucket: &mut DurationBucket, value| bucket.seconds = Some(value),
            ),
        );
        let fraction_getter =
            |duration: &SignedDuration| i64::from(duration.subsec_nanos().abs());
        let fraction_setter =
            |bucket: &mut DurationBucket, value: i64| bucket.fraction = Some(value);
        table.insert('f', handle_fraction(fraction_getter, fraction_setter));
        table.insert('F', handle_fraction(fraction_getter, fraction_setter));
        table.insert('.', handle_decimal_separator(fraction_getter, fraction_setter));
        table.insert(';', handle_decimal_separator(fraction_getter, fraction_setter));
        table.insert(
            '+',
            handle_required_sign(
                |bucket: &mut DurationBucket, negative| bucket.negative = negative,
                SignedDuration::is_negative,
            ),
        );
        table.insert(
            '-',
            handle_negative_only_sign(
                |bucket: &mut DurationBucket, negative| bucket.negative = negative,
                SignedDuration::is_negative,
            ),
        );
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn general_negative_duration() {
        let pattern = DurationPattern::create("-H:mm:ss", &Locale::invariant()).unwrap();
        assert_eq!(
            pattern.parse("-01:30:00").unwrap(),
            SignedDuration::new(-5_400, 0)
        );
        assert_eq!(pattern.format(&SignedDuration::new(-5_400, 0)), "-1:30:00");
        assert_eq!(pattern.format(&SignedDuration::new(5_400, 0)), "1:30:00");
    }

    #[test]
    fn round_trip_with_days_and_fraction() {
        let pattern = DurationPattern::round_trip();
        let value = SignedDuration::new(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5, 500_000_000);
        assert_eq!(pattern.format(&value), "2:03:04:05.5");
        assert_eq!(pattern.parse("2:03:04:05.5").unwrap(), value);
        assert_eq!(
            pattern.parse("-2:03:04:05.5").unwrap(),
            SignedDuration::new(-(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5), -500_000_000)
        );
    }

    #[test]
    fn total_minutes() {
        let pattern = DurationPattern::create("M':'ss", &Locale::invariant()).unwrap();
        assert_eq!(
            pattern.parse("90:15").unwrap(),
            SignedDuration::new(90 * 60 + 15, 0)
        );
    }

    #[test]
    fn only_one_capital_field_is_allowed() {
        assert_eq!(
            DurationPattern::create("H:M", &Locale::invariant()).unwrap_err(),
            PatternError::MultipleCapitalDurationFields
        );
        assert_eq!(
            DurationPattern::create("D:HH", &Locale::invariant()).unwrap_err(),
            PatternError::MultipleCapitalDurationFields
        );
    }

    #[test]
    fn required_sign() {
        let pattern = DurationPattern::create("+ss", &Locale::invariant()).unwrap();
        assert_eq!(pattern.parse("+05").unwrap(), SignedDuration::new(5, 0));
        assert_eq!(pattern.parse("-05").unwrap(), SignedDuration::new(-5, 0));
        let err = pattern.parse("05").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSign);
    }
}
