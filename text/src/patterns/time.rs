// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Wall-clock time patterns.

use std::sync::{Arc, OnceLock};

use jiff::civil;

use crate::bucket::{HasTimeBucket, TimeBucket, TimeFields};
use crate::builder::{
    HandlerTable, SteppedPatternBuilder, handle_decimal_separator, handle_fraction,
    handle_padded_field, handle_time_separator,
};
use crate::cursor::PatternCursor;
use crate::error::{ParseError, ParseErrorKind, PatternError};
use crate::fields::PatternFields;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::single_character;

/// The extended ISO time pattern text: seconds with an optional fraction of
/// up to nine digits.
pub(crate) const EXTENDED_ISO_PATTERN_TEXT: &str = "HH':'mm':'ss;FFFFFFFFF";

/// A compiled pattern for [`jiff::civil::Time`] values.
pub type TimePattern = Pattern<civil::Time>;

impl TimePattern {
    /// The template used when none is given: midnight.
    pub const DEFAULT_TEMPLATE: civil::Time = civil::Time::midnight();

    /// Compile a time pattern.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        Self::create_with_template(pattern, locale, Self::DEFAULT_TEMPLATE)
    }

    /// Compile a time pattern with an explicit template value.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: civil::Time,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory())
    }

    /// The cached extended ISO time pattern, `HH':'mm':'ss;FFFFFFFFF`.
    #[must_use]
    pub fn extended_iso() -> Self {
        static EXTENDED: OnceLock<TimePattern> = OnceLock::new();
        EXTENDED
            .get_or_init(|| {
                Self::create(EXTENDED_ISO_PATTERN_TEXT, &Locale::invariant())
                    .expect("the extended ISO time pattern compiles")
            })
            .clone()
    }
}

fn factory() -> PatternFactory<civil::Time> {
    Arc::new(|text, locale, template| compile(text, locale, *template))
}

pub(crate) fn compile(
    text: &str,
    locale: &Locale,
    template: civil::Time,
) -> Result<Arc<dyn PatternImpl<civil::Time>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let text = match single_character(text) {
        Some(specifier) => expand_standard(specifier, locale)?,
        None => text,
    };
    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, handlers())?;
    let pattern = builder.build(move || TimeBucket::new(template))?;
    Ok(Arc::new(pattern))
}

fn expand_standard(specifier: char, locale: &Locale) -> Result<&str, PatternError> {
    match specifier {
        't' => Ok(locale.short_time_pattern()),
        'T' => Ok(locale.long_time_pattern()),
        'r' | 'o' => Ok(EXTENDED_ISO_PATTERN_TEXT),
        _ => Err(PatternError::UnknownStandardFormat {
            specifier,
            kind: "Time",
        }),
    }
}

fn handlers() -> &'static HandlerTable<civil::Time, TimeBucket> {
    static TABLE: OnceLock<HandlerTable<civil::Time, TimeBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        add_time_handlers(&mut table);
        table
    })
}

/// Install the time characters (`: h H m s f F . ; t`) into a handler
/// table.
pub(crate) fn add_time_handlers<T, B>(table: &mut HandlerTable<T, B>)
where
    T: TimeFields + 'static,
    B: HasTimeBucket + 'static,
{
    table.insert(':', Box::new(handle_time_separator));
    table.insert(
        'h',
        handle_padded_field(
            2,
            PatternFields::HOURS_12,
            1,
            12,
            |value: &T| value.hour_12(),
            |bucket: &mut B, value| bucket.time_bucket().hours12 = Some(value),
        ),
    );
    table.insert(
        'H',
        handle_padded_field(
            2,
            PatternFields::HOURS_24,
            0,
            24,
            |value: &T| value.hour(),
            |bucket: &mut B, value| bucket.time_bucket().hours24 = Some(value),
        ),
    );
    table.insert(
        'm',
        handle_padded_field(
            2,
            PatternFields::MINUTES,
            0,
            59,
            |value: &T| value.minute(),
            |bucket: &mut B, value| bucket.time_bucket().minutes = Some(value),
        ),
    );
    table.insert(
        's',
        handle_padded_field(
            2,
            PatternFields::SECONDS,
            0,
            59,
            |value: &T| value.second(),
            |bucket: &mut B, value| bucket.time_bucket().seconds = Some(value),
        ),
    );
    table.insert(
        'f',
        handle_fraction(
            |value: &T| value.subsec_nanos(),
            |bucket: &mut B, value| bucket.time_bucket().fraction = Some(value),
        ),
    );
    table.insert(
        'F',
        handle_fraction(
            |value: &T| value.subsec_nanos(),
            |bucket: &mut B, value| bucket.time_bucket().fraction = Some(value),
        ),
    );
    table.insert(
        '.',
        handle_decimal_separator(
            |value: &T| value.subsec_nanos(),
            |bucket: &mut B, value| bucket.time_bucket().fraction = Some(value),
        ),
    );
    table.insert(
        ';',
        handle_decimal_separator(
            |value: &T| value.subsec_nanos(),
            |bucket: &mut B, value| bucket.time_bucket().fraction = Some(value),
        ),
    );
    table.insert('t', Box::new(handle_am_pm));
}

fn handle_am_pm<T, B>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError>
where
    T: TimeFields + 'static,
    B: HasTimeBucket + 'static,
{
    let count = cursor.get_repeat_count(2)?;
    builder.add_field(PatternFields::AM_PM, 't')?;
    let am = builder.locale().am_designator().to_string();
    let pm = builder.locale().pm_designator().to_string();

    if count == 1 {
        // Single-character designators: exactly one character is consumed.
        let am_first: String = am.chars().take(1).collect();
        let pm_first: String = pm.chars().take(1).collect();
        let parse_am = am_first.clone();
        let parse_pm = pm_first.clone();
        builder.add_parse_step(move |cursor, bucket| {
            let position = cursor.position();
            if !parse_am.is_empty() && cursor.match_case_insensitive(&parse_am, true) {
                bucket.time_bucket().am_pm = Some(0);
            } else if !parse_pm.is_empty() && cursor.match_case_insensitive(&parse_pm, true) {
                bucket.time_bucket().am_pm = Some(1);
            } else {
                return Err(ParseError::new(
                    ParseErrorKind::MissingAmPmDesignator,
                    position,
                ));
            }
            Ok(())
        });
        builder.add_format_step(move |value: &T, out| {
            let designator = if value.half_day() == 1 {
                &pm_first
            } else {
                &am_first
            };
            out.push_str(designator);
        });
        return Ok(());
    }

    // Full designators; the longer one is tried first so a designator that
    // is a prefix of the other cannot shadow it.
    let mut order = [(am.clone(), 0_i64), (pm.clone(), 1)];
    if pm.len() > am.len() {
        order.swap(0, 1);
    }
    builder.add_parse_step(move |cursor, bucket| {
        let position = cursor.position();
        for (designator, value) in &order {
            if !designator.is_empty() && cursor.match_case_insensitive(designator, true) {
                bucket.time_bucket().am_pm = Some(*value);
                return Ok(());
            }
        }
        Err(ParseError::new(
            ParseErrorKind::MissingAmPmDesignator,
            position,
        ))
    });
    builder.add_format_step(move |value: &T, out| {
        out.push_str(if value.half_day() == 1 { &pm } else { &am });
    });
    Ok(())
}
