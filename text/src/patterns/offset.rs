// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! UTC offset patterns.
//!
//! The general pattern `g` is a composite of the locale's long, medium and
//! short canonical patterns: formatting picks the shortest form that loses
//! nothing, parsing tries the three in that order. `G` additionally accepts
//! and emits `Z` for a zero offset.

use std::sync::{Arc, OnceLock};

use jiff::tz::Offset;

use crate::bucket::{ParseBucket, pick};
use crate::builder::{
    HandlerTable, SteppedPatternBuilder, handle_negative_only_sign, handle_padded_field,
    handle_required_sign, handle_time_separator,
};
use crate::composite::CompositePattern;
use crate::cursor::ValueCursor;
use crate::error::{ParseError, ParseErrorKind, ParseResult, PatternError};
use crate::fields::PatternFields;
use crate::locale::{Locale, OffsetPatternLength};
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::single_character;

/// A compiled pattern for [`jiff::tz::Offset`] values.
pub type OffsetPattern = Pattern<Offset>;

impl OffsetPattern {
    /// Compile an offset pattern. The default template is the zero offset.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        Self::create_with_template(pattern, locale, Offset::UTC)
    }

    /// Compile an offset pattern with an explicit template value.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: Offset,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory())
    }

    /// The cached general ISO offset pattern with the `Z` shortcut.
    #[must_use]
    pub fn general_iso() -> Self {
        static GENERAL: OnceLock<OffsetPattern> = OnceLock::new();
        GENERAL
            .get_or_init(|| {
                Self::create("G", &Locale::invariant())
                    .expect("the general ISO offset pattern compiles")
            })
            .clone()
    }
}

/// Staging for an offset: unsigned components plus a sign flag.
struct OffsetBucket {
    negative: bool,
    hours: Option<i64>,
    minutes: Option<i64>,
    seconds: Option<i64>,
    template: Offset,
}

impl OffsetBucket {
    fn new(template: Offset) -> Self {
        Self {
            negative: false,
            hours: None,
            minutes: None,
            seconds: None,
            template,
        }
    }
}

impl ParseBucket<Offset> for OffsetBucket {
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<Offset> {
        let template = i64::from(self.template.seconds().abs());
        let hours = pick(used, PatternFields::HOURS_24, self.hours, template / 3600);
        let minutes = pick(
            used,
            PatternFields::MINUTES,
            self.minutes,
            template % 3600 / 60,
        );
        let seconds = pick(used, PatternFields::SECONDS, self.seconds, template % 60);
        let negative = if used.contains(PatternFields::SIGN) {
            self.negative
        } else {
            self.template.seconds() < 0
        };

        let mut total = hours * 3600 + minutes * 60 + seconds;
        if negative {
            total = -total;
        }
        i32::try_from(total)
            .ok()
            .and_then(|seconds| Offset::from_seconds(seconds).ok())
            .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidOffset, end))
    }
}

fn factory() -> PatternFactory<Offset> {
    Arc::new(|text, locale, template| compile_impl(text, locale, *template))
}

/// Compile offset pattern text to its runtime. Shared with the embedded
/// `o<...>` handler of the larger kinds.
pub(crate) fn compile_impl(
    text: &str,
    locale: &Locale,
    template: Offset,
) -> Result<Arc<dyn PatternImpl<Offset>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    // A bare `Z`, standard or escaped, has no pattern to fall back to for
    // non-zero offsets.
    if text == "Z" || text == "%Z" {
        return Err(PatternError::EmptyZPrefixedOffsetPattern);
    }
    if let Some(specifier) = single_character(text) {
        return expand_standard(specifier, locale, template);
    }
    if let Some(rest) = text.strip_prefix('Z') {
        return Ok(Arc::new(ZPrefixedOffsetPattern {
            inner: compile_custom(rest, locale, template)?,
        }));
    }
    compile_custom(text, locale, template)
}

fn expand_standard(
    specifier: char,
    locale: &Locale,
    template: Offset,
) -> Result<Arc<dyn PatternImpl<Offset>>, PatternError> {
    match specifier {
        'g' => general(locale, template),
        'G' => Ok(Arc::new(ZPrefixedOffsetPattern {
            inner: general(locale, template)?,
        })),
        'f' => compile_custom(locale.offset_pattern(OffsetPatternLength::Full), locale, template),
        'l' => compile_custom(locale.offset_pattern(OffsetPatternLength::Long), locale, template),
        'm' => compile_custom(
            locale.offset_pattern(OffsetPatternLength::Medium),
            locale,
            template,
        ),
        's' => compile_custom(
            locale.offset_pattern(OffsetPatternLength::Short),
            locale,
            template,
        ),
        _ => Err(PatternError::UnknownStandardFormat {
            specifier,
            kind: "Offset",
        }),
    }
}

/// The long/medium/short composite: formatting picks by the least
/// significant non-zero component.
fn general(
    locale: &Locale,
    template: Offset,
) -> Result<Arc<dyn PatternImpl<Offset>>, PatternError> {
    let patterns = vec![
        compile_custom(locale.offset_pattern(OffsetPatternLength::Long), locale, template)?,
        compile_custom(
            locale.offset_pattern(OffsetPatternLength::Medium),
            locale,
            template,
        )?,
        compile_custom(
            locale.offset_pattern(OffsetPatternLength::Short),
            locale,
            template,
        )?,
    ];
    Ok(Arc::new(CompositePattern::new(patterns, |offset: &Offset| {
        let seconds = offset.seconds().abs();
        if seconds % 60 != 0 {
            0
        } else if seconds % 3600 != 0 {
            1
        } else {
            2
        }
    })))
}

fn compile_custom(
    text: &str,
    locale: &Locale,
    template: Offset,
) -> Result<Arc<dyn PatternImpl<Offset>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, handlers())?;
    let pattern = builder.build(move || OffsetBucket::new(template))?;
    Ok(Arc::new(pattern))
}

fn handlers() -> &'static HandlerTable<Offset, OffsetBucket> {
    static TABLE: OnceLock<HandlerTable<Offset, OffsetBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        table.insert(':', Box::new(handle_time_separator));
        table.insert(
            'H',
            handle_padded_field(
                2,
                PatternFields::HOURS_24,
                0,
                23,
                |offset: &Offset| i64::from(offset.seconds().abs()) / 3600,
                |bucket: &mut OffsetBucket, value| bucket.hours = Some(value),
            ),
        );
        table.insert(
            'm',
            handle_padded_field(
                2,
                PatternFields::MINUTES,
                0,
                59,
                |offset: &Offset| i64::from(offset.seconds().abs()) % 3600 / 60,
                |bucket: &mut OffsetBucket, value| bucket.minutes = Some(value),
            ),
        );
        table.insert(
            's',
            handle_padded_field(
                2,
                PatternFields::SECONDS,
                0,
                59,
                |offset: &Offset| i64::from(offset.seconds().abs()) % 60,
                |bucket: &mut OffsetBucket, value| bucket.seconds = Some(value),
            ),
        );
        table.insert(
            '+',
            handle_required_sign(
                |bucket: &mut OffsetBucket, negative| bucket.negative = negative,
                |offset: &Offset| offset.seconds() < 0,
            ),
        );
        table.insert(
            '-',
            handle_negative_only_sign(
                |bucket: &mut OffsetBucket, negative| bucket.negative = negative,
                |offset: &Offset| offset.seconds() < 0,
            ),
        );
        table.insert(
            'h',
            Box::new(|_cursor, _builder| {
                Err(PatternError::Hour12PatternNotSupported { kind: "Offset" })
            }),
        );
        table.insert(
            'Z',
            Box::new(|_cursor, _builder| Err(PatternError::ZPrefixNotAtStart)),
        );
        table
    })
}

/// Accepts and emits `Z` for the zero offset, delegating everything else.
struct ZPrefixedOffsetPattern {
    inner: Arc<dyn PatternImpl<Offset>>,
}

impl PatternImpl<Offset> for ZPrefixedOffsetPattern {
    fn parse(&self, text: &str) -> ParseResult<Offset> {
        if text == "Z" {
            Ok(Offset::UTC)
        } else {
            self.inner.parse(text)
        }
    }

    fn parse_partial(&self, cursor: &mut ValueCursor<'_>) -> ParseResult<Offset> {
        if cursor.match_char('Z') {
            Ok(Offset::UTC)
        } else {
            self.inner.parse_partial(cursor)
        }
    }

    fn append_format(&self, value: &Offset, out: &mut String) {
        if value.seconds() == 0 {
            out.push('Z');
        } else {
            self.inner.append_format(value, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(seconds: i32) -> Offset {
        Offset::from_seconds(seconds).unwrap()
    }

    #[test]
    fn explicit_sign_round_trip() {
        let pattern = OffsetPattern::create("+HH':'mm", &Locale::invariant()).unwrap();

        #[rustfmt::skip]
        let success_cases = [
            ("+05:30", offset( 5 * 3600 + 30 * 60)),
            ("-08:00", offset(-8 * 3600)),
            ("+00:00", offset(0)),
        ];
        for (src, expected) in success_cases {
            assert_eq!(pattern.parse(src).unwrap(), expected, "parse {src}");
            assert_eq!(pattern.format(&expected), src, "format {src}");
        }

        // A negative zero is zero.
        assert_eq!(pattern.parse("-00:00").unwrap(), offset(0));

        let err = pattern.parse("05:30").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSign);
    }

    #[test]
    fn z_shortcut() {
        let pattern = OffsetPattern::general_iso();
        assert_eq!(pattern.parse("Z").unwrap(), offset(0));
        assert_eq!(pattern.format(&offset(0)), "Z");
        assert_eq!(pattern.parse("+05:30").unwrap(), offset(5 * 3600 + 30 * 60));
    }

    #[test]
    fn general_format_picks_the_shortest_faithful_form() {
        let pattern = OffsetPattern::create("g", &Locale::invariant()).unwrap();

        #[rustfmt::skip]
        let cases = [
            (offset( 5 * 3600),                     "+05"),
            (offset( 5 * 3600 + 30 * 60),           "+05:30"),
            (offset(-(5 * 3600 + 30 * 60 + 15)),    "-05:30:15"),
        ];
        for (value, expected) in cases {
            assert_eq!(pattern.format(&value), expected);
            assert_eq!(pattern.parse(expected).unwrap(), value, "parse {expected}");
        }
    }

    #[test]
    fn z_prefix_rules() {
        assert_eq!(
            OffsetPattern::create("Z", &Locale::invariant()).unwrap_err(),
            PatternError::EmptyZPrefixedOffsetPattern
        );
        assert_eq!(
            OffsetPattern::create("%Z", &Locale::invariant()).unwrap_err(),
            PatternError::EmptyZPrefixedOffsetPattern
        );
        assert_eq!(
            OffsetPattern::create("+HH'x'Z", &Locale::invariant()).unwrap_err(),
            PatternError::ZPrefixNotAtStart
        );

        // A custom pattern may carry the prefix itself.
        let pattern = OffsetPattern::create("Z+HH':'mm", &Locale::invariant()).unwrap();
        assert_eq!(pattern.parse("Z").unwrap(), offset(0));
        assert_eq!(pattern.parse("+01:00").unwrap(), offset(3600));
    }

    #[test]
    fn twelve_hour_fields_are_rejected() {
        assert_eq!(
            OffsetPattern::create("+hh':'mm", &Locale::invariant()).unwrap_err(),
            PatternError::Hour12PatternNotSupported { kind: "Offset" }
        );
    }

    #[test]
    fn negative_only_sign() {
        let pattern = OffsetPattern::create("-HH':'mm", &Locale::invariant()).unwrap();
        assert_eq!(pattern.parse("05:30").unwrap(), offset(5 * 3600 + 30 * 60));
        assert_eq!(pattern.parse("-05:30").unwrap(), offset(-(5 * 3600 + 30 * 60)));
        let err = pattern.parse("+05:30").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::PositiveSignInvalid);
        assert_eq!(pattern.format(&offset(5 * 3600 + 30 * 60)), "05:30");
        assert_eq!(pattern.format(&offset(-(5 * 3600 + 30 * 60))), "-05:30");
    }
}
