// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! ISO-8601-like period patterns.
//!
//! Periods have exactly two standard patterns and no custom pattern
//! language: `o` is the round-trip form (`P1Y2M3DT4H5M6S7s8t9n`, where `s`
//! is milliseconds, `t` is ticks of 100 ns and `n` is nanoseconds), `n` is
//! the normalizing ISO form, which folds every sub-second unit into a
//! fraction of the seconds component. Units must appear at most once, in
//! strictly descending significance.

use std::fmt::Write;
use std::sync::{Arc, OnceLock};

use jiff::Span;

use crate::cursor::ValueCursor;
use crate::error::{ParseError, ParseErrorKind, ParseResult, PatternError};
use crate::formatter;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::single_character;

/// A compiled pattern for [`jiff::Span`] values.
pub type PeriodPattern = Pattern<Span>;

impl PeriodPattern {
    /// Compile a period pattern; only the standard `o` and `n` patterns
    /// exist.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError::UnknownStandardFormat`] for anything but
    /// `o` and `n`.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), Span::new(), factory())
    }

    /// The cached round-trip pattern.
    #[must_use]
    pub fn round_trip() -> Self {
        static ROUNDTRIP: OnceLock<PeriodPattern> = OnceLock::new();
        ROUNDTRIP
            .get_or_init(|| {
                Self::create("o", &Locale::invariant())
                    .expect("the round-trip period pattern compiles")
            })
            .clone()
    }

    /// The cached normalizing ISO pattern.
    #[must_use]
    pub fn normalizing_iso() -> Self {
        static NORMALIZING: OnceLock<PeriodPattern> = OnceLock::new();
        NORMALIZING
            .get_or_init(|| {
                Self::create("n", &Locale::invariant())
                    .expect("the normalizing ISO period pattern compiles")
            })
            .clone()
    }
}

fn factory() -> PatternFactory<Span> {
    Arc::new(|text, _locale, _template| {
        if text.is_empty() {
            return Err(PatternError::FormatStringEmpty);
        }
        match single_character(text) {
            Some('o') => Ok(Arc::new(PeriodPatternImpl {
                style: Style::RoundTrip,
            }) as Arc<dyn PatternImpl<Span>>),
            Some('n') => Ok(Arc::new(PeriodPatternImpl {
                style: Style::NormalizingIso,
            })),
            _ => Err(PatternError::UnknownStandardFormat {
                specifier: text.chars().next().unwrap_or_default(),
                kind: "Period",
            }),
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    RoundTrip,
    NormalizingIso,
}

struct PeriodPatternImpl {
    style: Style,
}

impl PatternImpl<Span> for PeriodPatternImpl {
    fn parse(&self, text: &str) -> ParseResult<Span> {
        let mut cursor = ValueCursor::new(text);
        let span = self.parse_partial(&mut cursor)?;
        if cursor.is_exhausted() {
            Ok(span)
        } else {
            Err(ParseError::new(
                ParseErrorKind::ExtraValueCharacters {
                    remainder: cursor.remainder().to_string(),
                },
                cursor.position(),
            ))
        }
    }

    fn parse_partial(&self, cursor: &mut ValueCursor<'_>) -> ParseResult<Span> {
        parse_period(cursor, self.style)
    }

    fn append_format(&self, value: &Span, out: &mut String) {
        match self.style {
            Style::RoundTrip => format_round_trip(value, out),
            Style::NormalizingIso => format_normalizing(value, out),
        }
    }
}

/// Unit significance ranks: years, months, weeks, days, hours, minutes,
/// seconds, milliseconds, ticks, nanoseconds.
const UNIT_COUNT: usize = 10;

fn unit_rank(unit: char, in_time: bool, style: Style) -> Result<usize, ParseErrorKind> {
    let (date_rank, time_rank) = match unit {
        'Y' => (Some(0), None),
        'M' => (Some(1), Some(5)),
        'W' => (Some(2), None),
        'D' => (Some(3), None),
        'H' => (None, Some(4)),
        'S' => (None, Some(6)),
        's' if style == Style::RoundTrip => (None, Some(7)),
        't' if style == Style::RoundTrip => (None, Some(8)),
        'n' if style == Style::RoundTrip => (None, Some(9)),
        _ => return Err(ParseErrorKind::InvalidUnitSpecifier { unit }),
    };
    let rank = if in_time { time_rank } else { date_rank };
    rank.ok_or(ParseErrorKind::MisplacedUnitSpecifier { unit })
}

fn parse_period(cursor: &mut ValueCursor<'_>, style: Style) -> ParseResult<Span> {
    let start = cursor.position();
    if !cursor.match_char('P') {
        return Err(ParseError::new(
            ParseErrorKind::MismatchedCharacter { expected: 'P' },
            start,
        ));
    }

    let mut units: [Option<i64>; UNIT_COUNT] = [None; UNIT_COUNT];
    let mut fraction: i64 = 0;
    let mut in_time = false;
    let mut last_rank: i32 = -1;

    while !cursor.is_exhausted() {
        if !in_time && cursor.match_char('T') {
            if cursor.is_exhausted() {
                return Err(ParseError::new(
                    ParseErrorKind::EndOfString,
                    cursor.position(),
                ));
            }
            in_time = true;
            continue;
        }

        let explicit_minus = cursor.current() == Some('-');
        let value = cursor.parse_int64()?;

        // The normalizing form allows a fraction, on the seconds unit only.
        if style == Style::NormalizingIso
            && in_time
            && matches!(cursor.current(), Some('.' | ','))
        {
            cursor.advance();
            let position = cursor.position();
            let Some(parsed) = cursor.parse_fraction(9, 9, 1) else {
                return Err(ParseError::new(
                    ParseErrorKind::MismatchedNumber {
                        field: "F".repeat(9),
                    },
                    position,
                ));
            };
            let position = cursor.position();
            if !cursor.match_char('S') {
                return Err(ParseError::new(
                    ParseErrorKind::MismatchedCharacter { expected: 'S' },
                    position,
                ));
            }
            let negative = value < 0 || (value == 0 && explicit_minus);
            units[6] = Some(value);
            fraction = if negative { -parsed } else { parsed };
            // Nothing may follow a fractional seconds unit.
            last_rank = UNIT_COUNT as i32;
            continue;
        }

        let position = cursor.position();
        let Some(unit) = cursor.current() else {
            return Err(ParseError::new(ParseErrorKind::EndOfString, position));
        };
        cursor.advance();
        let rank =
            unit_rank(unit, in_time, style).map_err(|kind| ParseError::new(kind, position))?;
        if (rank as i32) <= last_rank {
            let kind = if units[rank].is_some() {
                ParseErrorKind::RepeatedUnitSpecifier { unit }
            } else {
                ParseErrorKind::MisplacedUnitSpecifier { unit }
            };
            return Err(ParseError::new(kind, position));
        }
        units[rank] = Some(value);
        last_rank = rank as i32;
    }

    if last_rank < 0 {
        return Err(ParseError::new(
            ParseErrorKind::EmptyPeriod,
            cursor.position(),
        ));
    }
    let matched = &cursor.text()[start..cursor.position()];
    build_span(&units, fraction, matched, style, cursor.position())
}

fn build_span(
    units: &[Option<i64>; UNIT_COUNT],
    fraction: i64,
    text: &str,
    style: Style,
    position: usize,
) -> ParseResult<Span> {
    // A unit outside the span model's bounds, or units of mixed signs: the
    // text as a whole names no representable period.
    let unrepresentable = |_value: i64| {
        ParseError::new(
            ParseErrorKind::CannotParseValue {
                value: text.to_string(),
                format: match style {
                    Style::RoundTrip => "o".to_string(),
                    Style::NormalizingIso => "n".to_string(),
                },
            },
            position,
        )
    };
    let mut span = Span::new();
    if let Some(value) = units[0] {
        span = span.try_years(value).map_err(|_| unrepresentable(value))?;
    }
    if let Some(value) = units[1] {
        span = span.try_months(value).map_err(|_| unrepresentable(value))?;
    }
    if let Some(value) = units[2] {
        span = span.try_weeks(value).map_err(|_| unrepresentable(value))?;
    }
    if let Some(value) = units[3] {
        span = span.try_days(value).map_err(|_| unrepresentable(value))?;
    }
    if let Some(value) = units[4] {
        span = span.try_hours(value).map_err(|_| unrepresentable(value))?;
    }
    if let Some(value) = units[5] {
        span = span.try_minutes(value).map_err(|_| unrepresentable(value))?;
    }
    if let Some(value) = units[6] {
        span = span.try_seconds(value).map_err(|_| unrepresentable(value))?;
    }
    if let Some(value) = units[7] {
        span = span
            .try_milliseconds(value)
            .map_err(|_| unrepresentable(value))?;
    }
    // Ticks have no field of their own; they land in the nanosecond unit
    // together with the explicit nanoseconds and any seconds fraction.
    let ticks = units[8].unwrap_or(0);
    let nanos = ticks
        .checked_mul(100)
        .and_then(|value| value.checked_add(units[9].unwrap_or(0)))
        .and_then(|value| value.checked_add(fraction))
        .ok_or_else(|| unrepresentable(ticks))?;
    if nanos != 0 {
        span = span.try_nanoseconds(nanos).map_err(|_| unrepresentable(nanos))?;
    }
    Ok(span)
}

fn emit_unit(out: &mut String, value: i64, unit: char) {
    if value != 0 {
        formatter::format_invariant(value, out);
        out.push(unit);
    }
}

fn format_round_trip(span: &Span, out: &mut String) {
    let start = out.len();
    out.push('P');
    emit_unit(out, span.get_years().into(), 'Y');
    emit_unit(out, span.get_months().into(), 'M');
    emit_unit(out, span.get_weeks().into(), 'W');
    emit_unit(out, span.get_days().into(), 'D');

    let hours: i64 = span.get_hours().into();
    let minutes: i64 = span.get_minutes().into();
    let seconds: i64 = span.get_seconds().into();
    let millis: i64 = span.get_milliseconds().into();
    let sub_nanos =
        i128::from(span.get_microseconds()) * 1_000 + i128::from(span.get_nanoseconds());
    if hours != 0 || minutes != 0 || seconds != 0 || millis != 0 || sub_nanos != 0 {
        out.push('T');
        emit_unit(out, hours, 'H');
        emit_unit(out, minutes, 'M');
        emit_unit(out, seconds, 'S');
        emit_unit(out, millis, 's');
        if sub_nanos != 0 {
            let _ = write!(out, "{sub_nanos}");
            out.push('n');
        }
    }
    if out.len() == start + 1 {
        out.push_str("0D");
    }
}

fn format_normalizing(span: &Span, out: &mut String) {
    let start = out.len();
    out.push('P');
    emit_unit(out, span.get_years().into(), 'Y');
    emit_unit(out, span.get_months().into(), 'M');
    emit_unit(out, span.get_weeks().into(), 'W');
    emit_unit(out, span.get_days().into(), 'D');

    let hours: i64 = span.get_hours().into();
    let minutes: i64 = span.get_minutes().into();
    let sub_nanos = i128::from(span.get_milliseconds()) * 1_000_000
        + i128::from(span.get_microseconds()) * 1_000
        + i128::from(span.get_nanoseconds());
    let whole_seconds: i64 = span.get_seconds().into();
    let seconds = whole_seconds + (sub_nanos / 1_000_000_000) as i64;
    let fraction = (sub_nanos % 1_000_000_000) as i64;

    if hours != 0 || minutes != 0 || seconds != 0 || fraction != 0 {
        out.push('T');
        emit_unit(out, hours, 'H');
        emit_unit(out, minutes, 'M');
        if seconds != 0 || fraction != 0 {
            if seconds == 0 && fraction < 0 {
                out.push_str("-0");
            } else {
                formatter::format_invariant(seconds, out);
            }
            if fraction != 0 {
                out.push('.');
                formatter::right_pad_truncate(fraction.abs(), 9, 9, out);
            }
            out.push('S');
        }
    }
    if out.len() == start + 1 {
        out.push_str("T0S");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pattern: &PeriodPattern, src: &str) -> ParseResult<Span> {
        pattern.parse(src)
    }

    #[test]
    fn round_trip_units() {
        let pattern = PeriodPattern::round_trip();
        let span = parse(&pattern, "P1Y2M3DT4H5M6S").unwrap();
        assert_eq!(
            span.fieldwise(),
            Span::new()
                .try_years(1)
                .and_then(|s| s.try_months(2))
                .and_then(|s| s.try_days(3))
                .and_then(|s| s.try_hours(4))
                .and_then(|s| s.try_minutes(5))
                .and_then(|s| s.try_seconds(6))
                .unwrap()
                .fieldwise()
        );
        assert_eq!(pattern.format(&span), "P1Y2M3DT4H5M6S");
    }

    #[test]
    fn unit_order_is_enforced() {
        let pattern = PeriodPattern::round_trip();

        let err = parse(&pattern, "P1M1Y").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MisplacedUnitSpecifier { unit: 'Y' }
        );

        let err = parse(&pattern, "P1Y2Y").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::RepeatedUnitSpecifier { unit: 'Y' }
        );

        // Time units require the `T` marker.
        let err = parse(&pattern, "P1H").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MisplacedUnitSpecifier { unit: 'H' }
        );

        let err = parse(&pattern, "P1X").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUnitSpecifier { unit: 'X' });
    }

    #[test]
    fn empty_period_is_rejected() {
        let pattern = PeriodPattern::round_trip();
        let err = parse(&pattern, "P").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyPeriod);
    }

    #[test]
    fn sub_second_units() {
        let pattern = PeriodPattern::round_trip();
        // 5 ms, 3 ticks, 7 ns = 5_000_000 + 300 + 7 nanoseconds.
        let span = parse(&pattern, "PT5s3t7n").unwrap();
        assert_eq!(i64::from(span.get_milliseconds()), 5);
        assert_eq!(span.get_nanoseconds(), 307);
        // Sub-millisecond content is always formatted as nanoseconds.
        assert_eq!(pattern.format(&span), "PT5s307n");
    }

    #[test]
    fn normalizing_fraction() {
        let pattern = PeriodPattern::normalizing_iso();
        let span = parse(&pattern, "PT0.5S").unwrap();
        assert_eq!(span.get_nanoseconds(), 500_000_000);
        assert_eq!(pattern.format(&span), "PT0.5S");

        let span = parse(&pattern, "PT-0,25S").unwrap();
        assert_eq!(span.get_nanoseconds(), -250_000_000);

        // Sub-second round-trip units are not part of the normalizing form.
        let err = parse(&pattern, "PT5s").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUnitSpecifier { unit: 's' });
    }

    #[test]
    fn zero_periods() {
        let round_trip = PeriodPattern::round_trip();
        assert_eq!(round_trip.format(&Span::new()), "P0D");
        let normalizing = PeriodPattern::normalizing_iso();
        assert_eq!(normalizing.format(&Span::new()), "PT0S");
        assert_eq!(
            parse(&round_trip, "P0D").unwrap().fieldwise(),
            Span::new().fieldwise()
        );
    }

    #[test]
    fn only_standard_patterns_exist() {
        assert_eq!(
            PeriodPattern::create("PnYnMnDT", &Locale::invariant()).unwrap_err(),
            PatternError::UnknownStandardFormat {
                specifier: 'P',
                kind: "Period"
            }
        );
    }
}
