// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Offset date-time patterns.
//!
//! The offset itself is parsed and formatted by an embedded `o<...>`
//! pattern, compiled with the offset kind's own compiler and wired into
//! this kind's step lists as a partial pattern.

use std::sync::{Arc, OnceLock};

use jiff::civil;
use jiff::tz::Offset;

use crate::bucket::{DateBucket, HasDateBucket, HasTimeBucket, ParseBucket, TimeBucket};
use crate::builder::{CharacterHandler, HandlerTable, SteppedPatternBuilder};
use crate::error::{ParseError, ParseErrorKind, ParseResult, PatternError};
use crate::fields::PatternFields;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::{add_date_handlers, single_character};
use crate::patterns::date_time::embedded_local_handler;
use crate::patterns::offset;
use crate::patterns::time::add_time_handlers;
use crate::types::OffsetDateTime;

pub(crate) const GENERAL_ISO_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd'T'HH':'mm':'sso<G>";
const EXTENDED_ISO_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd'T'HH':'mm':'ss;FFFFFFFFFo<G>";
const FULL_ROUNDTRIP_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd'T'HH':'mm':'ss;FFFFFFFFFo<G>' ('c')'";

/// A compiled pattern for [`OffsetDateTime`] values.
pub type OffsetDateTimePattern = Pattern<OffsetDateTime>;

impl OffsetDateTimePattern {
    /// Compile an offset date-time pattern. The default template is
    /// 2000-01-01 midnight at offset zero.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        let template = OffsetDateTime::new(
            civil::DateTime::constant(2000, 1, 1, 0, 0, 0, 0),
            Offset::UTC,
        );
        Self::create_with_template(pattern, locale, template)
    }

    /// Compile an offset date-time pattern with an explicit template value.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: OffsetDateTime,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory())
    }

    /// The cached general ISO pattern with offset.
    #[must_use]
    pub fn general_iso() -> Self {
        static GENERAL: OnceLock<OffsetDateTimePattern> = OnceLock::new();
        GENERAL
            .get_or_init(|| {
                Self::create(GENERAL_ISO_PATTERN_TEXT, &Locale::invariant())
                    .expect("the general ISO offset date-time pattern compiles")
            })
            .clone()
    }
}

/// Staging for an offset date-time.
pub(crate) struct OffsetDateTimeBucket {
    date: DateBucket,
    time: TimeBucket,
    offset: Option<Offset>,
    template_offset: Offset,
}

impl OffsetDateTimeBucket {
    fn new(template: OffsetDateTime) -> Self {
        Self {
            date: DateBucket::new(template.date()),
            time: TimeBucket::new(template.time()),
            offset: None,
            template_offset: template.offset(),
        }
    }
}

impl HasDateBucket for OffsetDateTimeBucket {
    fn date_bucket(&mut self) -> &mut DateBucket {
        &mut self.date
    }
}

impl HasTimeBucket for OffsetDateTimeBucket {
    fn time_bucket(&mut self) -> &mut TimeBucket {
        &mut self.time
    }
}

impl ParseBucket<OffsetDateTime> for OffsetDateTimeBucket {
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<OffsetDateTime> {
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
        let offset = if used.contains(PatternFields::EMBEDDED_OFFSET) {
            self.offset.unwrap_or(self.template_offset)
        } else {
            self.template_offset
        };
        Ok(OffsetDateTime::new(
            civil::DateTime::from_parts(date, time),
            offset,
        ))
    }
}

/// The `o<...>` embedded offset: the inner text is compiled by the offset
/// kind and wired in as a partial pattern.
pub(crate) fn embedded_offset_handler<T: 'static, B: 'static>(
    getter: fn(&T) -> Offset,
    setter: fn(&mut B, Offset),
) -> CharacterHandler<T, B> {
    Box::new(move |cursor, builder| {
        let embedded = cursor.get_embedded_pattern()?;
        builder.add_field(PatternFields::EMBEDDED_OFFSET, 'o')?;
        let inner = offset::compile_impl(&embedded, builder.locale(), Offset::UTC)?;
        let parse_inner = Arc::clone(&inner);
        builder.add_parse_step(move |cursor, bucket| {
            let value = parse_inner.parse_partial(cursor)?;
            setter(bucket, value);
            Ok(())
        });
        builder.add_format_step(move |value, out| inner.append_format(&getter(value), out));
        Ok(())
    })
}

fn factory() -> PatternFactory<OffsetDateTime> {
    Arc::new(|text, locale, template| compile(text, locale, *template))
}

fn compile(
    text: &str,
    locale: &Locale,
    template: OffsetDateTime,
) -> Result<Arc<dyn PatternImpl<OffsetDateTime>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let text = match single_character(text) {
        Some('G') => GENERAL_ISO_PATTERN_TEXT,
        Some('o' | 'O') => EXTENDED_ISO_PATTERN_TEXT,
        Some('r') => FULL_ROUNDTRIP_PATTERN_TEXT,
        Some(specifier) => {
            return Err(PatternError::UnknownStandardFormat {
                specifier,
                kind: "OffsetDateTime",
            });
        }
        None => text,
    };
    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, handlers())?;
    let pattern = builder.build(move || OffsetDateTimeBucket::new(template))?;
    Ok(Arc::new(pattern))
}

/// The date and time characters without the embedded-pattern characters;
/// this is what `l<...>` re-enters with.
fn local_handlers() -> &'static HandlerTable<OffsetDateTime, OffsetDateTimeBucket> {
    static TABLE: OnceLock<HandlerTable<OffsetDateTime, OffsetDateTimeBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        add_date_handlers(&mut table);
        add_time_handlers(&mut table);
        table
    })
}

fn handlers() -> &'static HandlerTable<OffsetDateTime, OffsetDateTimeBucket> {
    static TABLE: OnceLock<HandlerTable<OffsetDateTime, OffsetDateTimeBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        add_date_handlers(&mut table);
        add_time_handlers(&mut table);
        table.insert(
            'o',
            embedded_offset_handler(
                |value: &OffsetDateTime| value.offset(),
                |bucket: &mut OffsetDateTimeBucket, offset| bucket.offset = Some(offset),
            ),
        );
        table.insert('l', embedded_local_handler(local_handlers));
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        offset_seconds: i32,
    ) -> OffsetDateTime {
        OffsetDateTime::new(
            civil::datetime(year, month, day, hour, minute, second, 0),
            Offset::from_seconds(offset_seconds).unwrap(),
        )
    }

    #[test]
    fn general_iso_round_trip() {
        let pattern = OffsetDateTimePattern::general_iso();

        #[rustfmt::skip]
        let cases = [
            ("2024-06-01T12:30:45+05:30", value(2024, 6, 1, 12, 30, 45,  5 * 3600 + 30 * 60)),
            ("2024-06-01T12:30:45Z",      value(2024, 6, 1, 12, 30, 45,  0)),
            ("2024-06-01T12:30:45-08:00", value(2024, 6, 1, 12, 30, 45, -8 * 3600)),
        ];
        for (src, expected) in cases {
            assert_eq!(pattern.parse(src).unwrap(), expected, "parse {src}");
            assert_eq!(pattern.format(&expected), src, "format {src}");
        }
    }

    #[test]
    fn full_round_trip_names_the_calendar() {
        let pattern = OffsetDateTimePattern::create("r", &Locale::invariant()).unwrap();
        let v = value(2024, 2, 29, 1, 2, 3, 3600);
        assert_eq!(pattern.format(&v), "2024-02-29T01:02:03+01:00 (ISO)");
        assert_eq!(pattern.parse("2024-02-29T01:02:03+01:00 (ISO)").unwrap(), v);
    }

    #[test]
    fn embedded_local_pattern() {
        let pattern = OffsetDateTimePattern::create(
            "l<uuuu'-'MM'-'dd HH':'mm> o<m>",
            &Locale::invariant(),
        )
        .unwrap();
        let v = value(2024, 6, 1, 12, 30, 0, 5 * 3600);
        assert_eq!(pattern.format(&v), "2024-06-01 12:30 +05:00");
        assert_eq!(pattern.parse("2024-06-01 12:30 +05:00").unwrap(), v);
    }

    #[test]
    fn embedded_fields_share_uniqueness_checks() {
        assert_eq!(
            OffsetDateTimePattern::create("HH l<HH':'mm>", &Locale::invariant()).unwrap_err(),
            PatternError::RepeatedFieldInPattern { character: 'H' }
        );
    }

    #[test]
    fn hour_24_carries_into_the_date() {
        let pattern = OffsetDateTimePattern::general_iso();
        assert_eq!(
            pattern.parse("2013-03-10T24:00:00Z").unwrap(),
            value(2013, 3, 11, 0, 0, 0, 0)
        );
    }
}
