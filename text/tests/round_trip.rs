// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Round-trip laws: formatting a value and parsing the result yields the
//! value back, for every kind and a spread of representative values.

use jiff::civil;
use jiff::tz::Offset;
use jiff::SignedDuration;
use tempora_text::{
    DatePattern, DateTimePattern, DurationPattern, Locale, MonthDay, MonthDayPattern,
    OffsetDateTime, OffsetDateTimePattern, OffsetPattern, PeriodPattern, TimePattern, YearMonth,
    YearMonthPattern,
};

#[test]
fn dates() {
    let patterns = [
        DatePattern::iso(),
        DatePattern::create("dd'/'MM'/'uuuu", &Locale::invariant()).unwrap(),
        DatePattern::create("dddd',' dd MMMM uuuu", &Locale::invariant()).unwrap(),
    ];
    let values = [
        civil::date(2024, 2, 29),
        civil::date(1, 1, 1),
        civil::date(1999, 12, 31),
        civil::date(2525, 7, 15),
    ];
    for pattern in &patterns {
        for value in values {
            let text = pattern.format(&value);
            assert_eq!(
                pattern.parse(&text).unwrap(),
                value,
                "{} via {}",
                value,
                pattern.text()
            );
        }
    }
}

#[test]
fn negative_years() {
    let pattern = DatePattern::iso();
    let value = civil::date(-43, 3, 15);
    let text = pattern.format(&value);
    assert_eq!(text, "-0043-03-15");
    assert_eq!(pattern.parse(&text).unwrap(), value);
}

#[test]
fn times() {
    let patterns = [
        TimePattern::extended_iso(),
        TimePattern::create("hh':'mm':'ss tt", &Locale::invariant()).unwrap(),
        TimePattern::create("HH'h'mm", &Locale::invariant()).unwrap(),
    ];
    let values = [
        civil::Time::midnight(),
        civil::time(9, 30, 45, 500_000_000),
        civil::time(12, 0, 0, 0),
        civil::time(23, 59, 59, 999_999_999),
    ];
    for pattern in &patterns {
        for value in values {
            let text = pattern.format(&value);
            let expected = reduce_to_pattern_precision(pattern.text(), value);
            assert_eq!(
                pattern.parse(&text).unwrap(),
                expected,
                "{} via {}",
                value,
                pattern.text()
            );
        }
    }
}

/// A pattern without seconds or fraction fields cannot carry them; the
/// template (midnight) supplies zeros on reparse.
fn reduce_to_pattern_precision(pattern_text: &str, value: civil::Time) -> civil::Time {
    let mut value = value;
    if !pattern_text.contains('F') && !pattern_text.contains('f') {
        value = civil::time(value.hour(), value.minute(), value.second(), 0);
    }
    if !pattern_text.contains('s') {
        value = civil::time(value.hour(), value.minute(), 0, 0);
    }
    value
}

#[test]
fn date_times() {
    let pattern = DateTimePattern::extended_iso();
    let values = [
        civil::datetime(2024, 2, 29, 23, 59, 59, 999_999_999),
        civil::datetime(2000, 1, 1, 0, 0, 0, 0),
        civil::datetime(1969, 7, 20, 20, 17, 40, 0),
    ];
    for value in values {
        let text = pattern.format(&value);
        assert_eq!(pattern.parse(&text).unwrap(), value);
    }
}

#[test]
fn year_months_and_month_days() {
    let ym = YearMonthPattern::iso();
    for value in [YearMonth::new(2024, 1).unwrap(), YearMonth::new(1, 12).unwrap()] {
        assert_eq!(ym.parse(&ym.format(&value)).unwrap(), value);
    }

    let md = MonthDayPattern::iso();
    for value in [MonthDay::new(2, 29).unwrap(), MonthDay::new(12, 31).unwrap()] {
        assert_eq!(md.parse(&md.format(&value)).unwrap(), value);
    }
}

#[test]
fn offsets() {
    let pattern = OffsetPattern::general_iso();
    let seconds = [0, 3600, -3600, 5 * 3600 + 30 * 60, -(8 * 3600), 45 * 60 + 30];
    for s in seconds {
        let value = Offset::from_seconds(s).unwrap();
        let text = pattern.format(&value);
        assert_eq!(pattern.parse(&text).unwrap(), value, "{text}");
    }
}

#[test]
fn offset_date_times() {
    let pattern = OffsetDateTimePattern::general_iso();
    let values = [
        OffsetDateTime::new(
            civil::datetime(2024, 6, 1, 12, 30, 45, 0),
            Offset::from_seconds(5 * 3600 + 30 * 60).unwrap(),
        ),
        OffsetDateTime::new(civil::datetime(2000, 1, 1, 0, 0, 0, 0), Offset::UTC),
    ];
    for value in values {
        let text = pattern.format(&value);
        assert_eq!(pattern.parse(&text).unwrap(), value, "{text}");
    }
}

#[test]
fn durations() {
    let pattern = DurationPattern::round_trip();
    let values = [
        SignedDuration::ZERO,
        SignedDuration::new(90 * 60, 0),
        SignedDuration::new(-(3 * 86_400 + 4 * 3600 + 5 * 60 + 6), -700_000_000),
        SignedDuration::new(59, 999_999_999),
    ];
    for value in values {
        let text = pattern.format(&value);
        assert_eq!(pattern.parse(&text).unwrap(), value, "{text}");
    }
}

#[test]
fn periods() {
    let pattern = PeriodPattern::round_trip();
    let texts = ["P1Y2M3DT4H5M6S", "P2W", "PT90M", "P0D", "PT5s307n"];
    for text in texts {
        let span = pattern.parse(text).unwrap();
        let reformatted = pattern.format(&span);
        let reparsed = pattern.parse(&reformatted).unwrap();
        assert_eq!(
            span.fieldwise(),
            reparsed.fieldwise(),
            "{text} -> {reformatted}"
        );
    }
}

#[test]
fn reparse_is_stable() {
    // Parsing accepts forms that format does not reproduce (lowercase
    // month names, comma fractions); the value must still survive a
    // format-parse cycle.
    let pattern =
        DatePattern::create("dd MMMM uuuu", &Locale::invariant()).unwrap();
    let first = pattern.parse("29 FEBRUARY 2024").unwrap();
    let second = pattern.parse(&pattern.format(&first)).unwrap();
    assert_eq!(first, second);
}
