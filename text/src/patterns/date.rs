// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar date patterns.
//!
//! The date handlers are generic over the value and bucket types, so every
//! kind that carries a date (date-time, zoned date-time, year-month) reuses
//! them with its own getters.

use std::sync::{Arc, OnceLock};

use jiff::civil;

use crate::bucket::{DateBucket, DateFields, HasDateBucket};
use crate::builder::{HandlerTable, SteppedPatternBuilder, handle_date_separator};
use crate::calendar::Calendar;
use crate::cursor::{PatternCursor, ValueCursor};
use crate::error::{ParseError, ParseErrorKind, PatternError};
use crate::fields::PatternFields;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};

/// The ISO-8601 calendar date pattern text.
pub(crate) const ISO_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd";

/// A compiled pattern for [`jiff::civil::Date`] values.
pub type DatePattern = Pattern<civil::Date>;

impl DatePattern {
    /// The template used when none is given: 2000-01-01.
    pub const DEFAULT_TEMPLATE: civil::Date = civil::Date::constant(2000, 1, 1);

    /// Compile a date pattern.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        Self::create_with_template(pattern, locale, Self::DEFAULT_TEMPLATE)
    }

    /// Compile a date pattern with an explicit template value.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: civil::Date,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory())
    }

    /// The cached ISO-8601 date pattern, `uuuu'-'MM'-'dd`.
    #[must_use]
    pub fn iso() -> Self {
        static ISO: OnceLock<DatePattern> = OnceLock::new();
        ISO.get_or_init(|| {
            Self::create(ISO_PATTERN_TEXT, &Locale::invariant())
                .expect("the ISO date pattern compiles")
        })
        .clone()
    }
}

fn factory() -> PatternFactory<civil::Date> {
    Arc::new(|text, locale, template| compile(text, locale, *template))
}

pub(crate) fn compile(
    text: &str,
    locale: &Locale,
    template: civil::Date,
) -> Result<Arc<dyn PatternImpl<civil::Date>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let text = match single_character(text) {
        Some(specifier) => {
            let expanded = expand_standard(specifier, locale)?;
            tracing::trace!(%specifier, pattern = %expanded, "expanded standard date pattern");
            expanded
        }
        None => text,
    };
    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, handlers())?;
    let pattern = builder.build(move || DateBucket::new(template))?;
    Ok(Arc::new(pattern))
}

/// The character of a one-character pattern, which dispatches to the
/// standard-pattern expander instead of the custom compiler.
pub(crate) fn single_character(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn expand_standard(specifier: char, locale: &Locale) -> Result<&str, PatternError> {
    match specifier {
        'G' => Ok(ISO_PATTERN_TEXT),
        'd' => Ok(locale.short_date_pattern()),
        'D' => Ok(locale.long_date_pattern()),
        _ => Err(PatternError::UnknownStandardFormat {
            specifier,
            kind: "Date",
        }),
    }
}

fn handlers() -> &'static HandlerTable<civil::Date, DateBucket> {
    static TABLE: OnceLock<HandlerTable<civil::Date, DateBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        add_date_handlers(&mut table);
        table
    })
}

/// Install the date characters (`/ u y M d g c`) into a handler table.
pub(crate) fn add_date_handlers<T, B>(table: &mut HandlerTable<T, B>)
where
    T: DateFields + 'static,
    B: HasDateBucket + 'static,
{
    table.insert('/', Box::new(handle_date_separator));
    table.insert('u', Box::new(handle_absolute_year));
    table.insert('y', Box::new(handle_year_of_era));
    table.insert('M', Box::new(handle_month));
    table.insert('d', Box::new(handle_day));
    table.insert('g', Box::new(handle_era));
    table.insert('c', Box::new(handle_calendar));
}

pub(crate) fn handle_absolute_year<T, B>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError>
where
    T: DateFields + 'static,
    B: HasDateBucket + 'static,
{
    let count = cursor.get_repeat_count(5)?;
    builder.add_field(PatternFields::YEAR, 'u')?;
    builder.add_parse_value_step(count, 5, 'u', -9999, 9999, |bucket: &mut B, value| {
        bucket.date_bucket().year = Some(value);
    });
    builder.add_format_left_pad(count, |value: &T| value.year());
    Ok(())
}

pub(crate) fn handle_year_of_era<T, B>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError>
where
    T: DateFields + 'static,
    B: HasDateBucket + 'static,
{
    let count = cursor.get_repeat_count(4)?;
    if count == 2 {
        // Two-digit year, completed from the template century on commit.
        builder.add_field(PatternFields::YEAR_TWO_DIGITS, 'y')?;
        builder.add_parse_value_step(2, 2, 'y', 0, 99, |bucket: &mut B, value| {
            bucket.date_bucket().two_digit_year = Some(value);
        });
        builder.add_format_left_pad(2, |value: &T| value.year_of_era().rem_euclid(100));
    } else {
        builder.add_field(PatternFields::YEAR_OF_ERA, 'y')?;
        builder.add_parse_value_step(count, 4, 'y', 1, 9999, |bucket: &mut B, value| {
            bucket.date_bucket().year_of_era = Some(value);
        });
        builder.add_format_left_pad(count, |value: &T| value.year_of_era());
    }
    Ok(())
}

pub(crate) fn handle_month<T, B>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError>
where
    T: DateFields + 'static,
    B: HasDateBucket + 'static,
{
    let count = cursor.get_repeat_count(4)?;
    // Numeric and text month both assign the month; one per pattern.
    let month_fields = PatternFields::MONTH_OF_YEAR_NUMERIC | PatternFields::MONTH_OF_YEAR_TEXT;
    if builder.used_fields().intersects(month_fields) {
        return Err(PatternError::RepeatedFieldInPattern { character: 'M' });
    }
    if count <= 2 {
        builder.add_field(PatternFields::MONTH_OF_YEAR_NUMERIC, 'M')?;
        builder.add_parse_value_step(count, 2, 'M', 1, 12, |bucket: &mut B, value| {
            bucket.date_bucket().month = Some(value);
        });
        builder.add_format_left_pad(count, |value: &T| value.month());
        return Ok(());
    }

    builder.add_field(PatternFields::MONTH_OF_YEAR_TEXT, 'M')?;
    let locale = builder.locale().clone();

    // Both the genitive and nominative forms are accepted on parse.
    let (nominative, genitive) = month_names(&locale, count);
    let mut candidates: Vec<(String, i64)> = nominative
        .iter()
        .chain(genitive.iter())
        .enumerate()
        .map(|(index, name)| (name.clone(), (index % 12) as i64 + 1))
        .collect();
    sort_longest_first(&mut candidates);
    builder.add_parse_step(move |cursor, bucket| {
        let position = cursor.position();
        match longest_caseless_match(cursor, &candidates) {
            Some(month) => {
                bucket.date_bucket().month = Some(month);
                Ok(())
            }
            None => Err(ParseError::new(
                ParseErrorKind::MismatchedText { field: 'M' },
                position,
            )),
        }
    });

    // The form emitted on format depends on whether a day-of-month field is
    // present anywhere in the pattern, so the step is finalized only once
    // the whole pattern has been compiled.
    builder.add_post_pattern_format_step(move |used| {
        let (nominative, genitive) = month_names(&locale, count);
        let names = if used.contains(PatternFields::DAY_OF_MONTH) {
            genitive
        } else {
            nominative
        };
        Box::new(move |value: &T, out| {
            if let Some(name) = names.get((value.month() - 1) as usize) {
                out.push_str(name);
            }
        })
    });
    Ok(())
}

fn month_names(locale: &Locale, count: usize) -> (Vec<String>, Vec<String>) {
    if count == 3 {
        (
            locale.month_names_abbreviated().to_vec(),
            locale.month_genitive_abbreviated().to_vec(),
        )
    } else {
        (
            locale.month_names_full().to_vec(),
            locale.month_genitive_full().to_vec(),
        )
    }
}

pub(crate) fn handle_day<T, B>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError>
where
    T: DateFields + 'static,
    B: HasDateBucket + 'static,
{
    let count = cursor.get_repeat_count(4)?;
    if count <= 2 {
        builder.add_field(PatternFields::DAY_OF_MONTH, 'd')?;
        builder.add_parse_value_step(count, 2, 'd', 1, 31, |bucket: &mut B, value| {
            bucket.date_bucket().day = Some(value);
        });
        builder.add_format_left_pad(count, |value: &T| value.day());
        return Ok(());
    }

    builder.add_field(PatternFields::DAY_OF_WEEK, 'd')?;
    let locale = builder.locale().clone();
    let names: Vec<String> = if count == 3 {
        locale.day_names_abbreviated().to_vec()
    } else {
        locale.day_names_full().to_vec()
    };
    let mut candidates: Vec<(String, i64)> = names
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index as i64 + 1))
        .collect();
    sort_longest_first(&mut candidates);
    builder.add_parse_step(move |cursor, bucket| {
        let position = cursor.position();
        match longest_caseless_match(cursor, &candidates) {
            Some(weekday) => {
                bucket.date_bucket().day_of_week = Some(weekday);
                Ok(())
            }
            None => Err(ParseError::new(
                ParseErrorKind::MismatchedText { field: 'd' },
                position,
            )),
        }
    });
    builder.add_format_step(move |value: &T, out| {
        if let Some(name) = names.get((value.weekday_mon1() - 1) as usize) {
            out.push_str(name);
        }
    });
    Ok(())
}

pub(crate) fn handle_era<T, B>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError>
where
    T: DateFields + 'static,
    B: HasDateBucket + 'static,
{
    // `g` and `gg` are equivalent.
    let _ = cursor.get_repeat_count(2)?;
    builder.add_field(PatternFields::ERA, 'g')?;
    let locale = builder.locale().clone();

    let mut candidates: Vec<(String, i64)> = Vec::new();
    for (index, era) in Calendar::iso().eras().iter().enumerate() {
        for name in locale.era_parse_names(era) {
            candidates.push((name.to_string(), index as i64));
        }
    }
    sort_longest_first(&mut candidates);
    builder.add_parse_step(move |cursor, bucket| {
        let position = cursor.position();
        match longest_caseless_match(cursor, &candidates) {
            Some(index) => {
                bucket.date_bucket().era = Some(index as usize);
                Ok(())
            }
            None => Err(ParseError::new(
                ParseErrorKind::MismatchedText { field: 'g' },
                position,
            )),
        }
    });

    let locale = builder.locale().clone();
    builder.add_format_step(move |value: &T, out| {
        if let Some(era) = Calendar::iso().eras().get(value.era_index()) {
            out.push_str(locale.era_name(era));
        }
    });
    Ok(())
}

pub(crate) fn handle_calendar<T, B>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError>
where
    T: DateFields + 'static,
    B: HasDateBucket + 'static,
{
    let _ = cursor.get_repeat_count(1)?;
    builder.add_field(PatternFields::CALENDAR, 'c')?;
    builder.add_parse_step(|cursor: &mut ValueCursor<'_>, bucket: &mut B| {
        let position = cursor.position();
        match Calendar::longest_prefix_of(cursor.remainder()) {
            Some(calendar) => {
                cursor.set_position(position + calendar.id().len());
                bucket.date_bucket().calendar = Some(calendar);
                Ok(())
            }
            None => Err(ParseError::new(
                ParseErrorKind::MismatchedText { field: 'c' },
                position,
            )),
        }
    });
    builder.add_format_step(|value: &T, out| out.push_str(value.calendar_id()));
    Ok(())
}

/// Pick the longest candidate matching at the cursor, consuming it. The
/// candidate list must be sorted longest first.
pub(crate) fn longest_caseless_match(
    cursor: &mut ValueCursor<'_>,
    candidates: &[(String, i64)],
) -> Option<i64> {
    for (name, value) in candidates {
        if !name.is_empty() && cursor.match_case_insensitive(name, true) {
            return Some(*value);
        }
    }
    None
}

pub(crate) fn sort_longest_first(candidates: &mut [(String, i64)]) {
    candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
}
