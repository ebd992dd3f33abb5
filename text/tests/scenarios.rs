// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end behavior of the engine across value kinds, one test per
//! documented scenario.

use jiff::civil;
use jiff::tz::Offset;
use jiff::{SignedDuration, Span};
use tempora_text::{
    DatePattern, DateTimePattern, DurationPattern, Locale, OffsetPattern, ParseErrorKind,
    PatternSet, PeriodPattern, TimePattern,
};

#[test]
fn leap_day_parses_in_a_leap_year() {
    let pattern = DatePattern::iso();
    assert_eq!(
        pattern.parse("2000-02-29").unwrap(),
        civil::date(2000, 2, 29)
    );
}

#[test]
fn leap_day_fails_in_a_common_year() {
    let pattern = DatePattern::iso();
    let err = pattern.parse("1999-02-29").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::FieldValueOutOfRange {
            value: 29,
            field: 'd'
        }
    );
}

#[test]
fn midnight_24_rolls_to_the_next_day() {
    let pattern = DateTimePattern::general_iso();
    assert_eq!(
        pattern.parse("2013-03-10T24:00:00").unwrap(),
        civil::datetime(2013, 3, 11, 0, 0, 0, 0)
    );
}

#[test]
fn midnight_24_requires_exact_midnight() {
    let pattern = DateTimePattern::general_iso();
    let err = pattern.parse("2013-03-10T24:00:01").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidHour24);
}

#[test]
fn fractions_scale_up_and_trim_back() {
    let pattern = TimePattern::extended_iso();
    let parsed = pattern.parse("09:30:45.5").unwrap();
    assert_eq!(parsed, civil::time(9, 30, 45, 500_000_000));
    assert_eq!(pattern.format(&parsed), "09:30:45.5");
}

#[test]
fn zero_offset_is_z_in_both_directions() {
    let pattern = OffsetPattern::general_iso();
    assert_eq!(pattern.parse("Z").unwrap(), Offset::UTC);
    assert_eq!(pattern.format(&Offset::UTC), "Z");
}

#[test]
fn signed_offsets() {
    let pattern = OffsetPattern::create("+HH':'mm", &Locale::invariant()).unwrap();
    assert_eq!(
        pattern.parse("+05:30").unwrap(),
        Offset::from_seconds(5 * 3600 + 30 * 60).unwrap()
    );
    assert_eq!(pattern.parse("-00:00").unwrap(), Offset::UTC);
}

#[test]
fn period_round_trip_units() {
    let pattern = PeriodPattern::round_trip();
    let span = pattern.parse("P1Y2M3DT4H5M6S").unwrap();
    let expected = Span::new()
        .try_years(1)
        .and_then(|s| s.try_months(2))
        .and_then(|s| s.try_days(3))
        .and_then(|s| s.try_hours(4))
        .and_then(|s| s.try_minutes(5))
        .and_then(|s| s.try_seconds(6))
        .unwrap();
    assert_eq!(span.fieldwise(), expected.fieldwise());
}

#[test]
fn period_units_must_descend() {
    let pattern = PeriodPattern::round_trip();
    assert_eq!(
        pattern.parse("P1Y2M").unwrap().fieldwise(),
        Span::new()
            .try_years(1)
            .and_then(|s| s.try_months(2))
            .unwrap()
            .fieldwise()
    );
    let err = pattern.parse("P1M1Y").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::MisplacedUnitSpecifier { unit: 'Y' }
    );
}

#[test]
fn negative_duration() {
    let pattern = DurationPattern::create("-H:mm:ss", &Locale::invariant()).unwrap();
    assert_eq!(
        pattern.parse("-01:30:00").unwrap(),
        SignedDuration::new(-(90 * 60), 0)
    );
}

#[test]
fn multi_pattern_trial_takes_the_first_match() {
    let locale = Locale::invariant();
    let set = PatternSet::new(vec![
        TimePattern::create("HH':'mm", &locale).unwrap(),
        TimePattern::create("h':'mm tt", &locale).unwrap(),
    ]);
    assert_eq!(set.parse("1:05 PM").unwrap(), civil::time(13, 5, 0, 0));
    assert_eq!(set.parse("13:05").unwrap(), civil::time(13, 5, 0, 0));
    assert_eq!(set.format(&civil::time(13, 5, 0, 0)), "13:05");
}

#[test]
fn two_digit_years_complete_from_the_template_century() {
    let pattern = DatePattern::create("yy", &Locale::invariant()).unwrap();
    assert_eq!(pattern.parse("25").unwrap(), civil::date(2025, 1, 1));
}

#[test]
fn every_parse_error_carries_its_position() {
    let pattern = DatePattern::iso();
    let err = pattern.parse("2024-0a-01").unwrap_err();
    assert_eq!(err.position, 5);

    let err = pattern.parse("2024-01-01x").unwrap_err();
    assert_eq!(err.position, 10);
    assert_eq!(
        err.kind,
        ParseErrorKind::ExtraValueCharacters {
            remainder: "x".to_string()
        }
    );
}

#[test]
fn empty_input_is_its_own_error() {
    let pattern = DatePattern::iso();
    let err = pattern.parse("").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::ValueStringEmpty);
}
