// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Zoned date-time patterns.
//!
//! The `z` character parses a time-zone identifier: first the fixed-zone
//! shortcut `UTC` (optionally followed by a general offset), then the
//! longest identifier match against the provider's sorted list. Resolution
//! of the parsed local time is strict: without an embedded offset, a local
//! time that is skipped or repeated in the target zone is an error.

use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

use jiff::civil;
use jiff::tz::{AmbiguousOffset, Offset, TimeZone};
use jiff::Zoned;

use crate::bucket::{DateBucket, HasDateBucket, HasTimeBucket, ParseBucket, TimeBucket};
use crate::builder::{CharacterHandler, HandlerTable, SteppedPatternBuilder};
use crate::cursor::PatternCursor;
use crate::error::{ParseError, ParseErrorKind, ParseResult, PatternError};
use crate::fields::PatternFields;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::{add_date_handlers, single_character};
use crate::patterns::date_time::embedded_local_handler;
use crate::patterns::offset;
use crate::patterns::offset_date_time::embedded_offset_handler;
use crate::patterns::time::add_time_handlers;
use crate::zone::{TzdbZoneProvider, ZoneProvider};

pub(crate) const GENERAL_ISO_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd'T'HH':'mm':'ss z";
const FULL_PATTERN_TEXT: &str = "uuuu'-'MM'-'dd'T'HH':'mm':'ss;FFFFFFFFF z '('o<G>')'";

/// A compiled pattern for [`jiff::Zoned`] values.
pub type ZonedPattern = Pattern<Zoned>;

impl ZonedPattern {
    /// Compile a zoned date-time pattern against the bundled tzdb. The
    /// default template is 2000-01-01 midnight in UTC.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        Self::create_with_template(pattern, locale, default_template())
    }

    /// Compile a zoned date-time pattern with an explicit template value.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: Zoned,
    ) -> Result<Self, PatternError> {
        Self::create_with_provider(pattern, locale, template, default_provider())
    }

    /// Compile a zoned date-time pattern with an explicit zone provider.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_provider(
        pattern: &str,
        locale: &Locale,
        template: Zoned,
        provider: Arc<dyn ZoneProvider>,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory(provider))
    }

    /// The cached general ISO pattern with a zone identifier.
    #[must_use]
    pub fn general_iso() -> Self {
        static GENERAL: OnceLock<ZonedPattern> = OnceLock::new();
        GENERAL
            .get_or_init(|| {
                Self::create(GENERAL_ISO_PATTERN_TEXT, &Locale::invariant())
                    .expect("the general ISO zoned date-time pattern compiles")
            })
            .clone()
    }
}

fn default_template() -> Zoned {
    civil::date(2000, 1, 1)
        .at(0, 0, 0, 0)
        .to_zoned(TimeZone::UTC)
        .expect("the epoch-adjacent default template resolves in UTC")
}

fn default_provider() -> Arc<dyn ZoneProvider> {
    static PROVIDER: OnceLock<Arc<dyn ZoneProvider>> = OnceLock::new();
    PROVIDER.get_or_init(TzdbZoneProvider::shared).clone()
}

/// Staging for a zoned date-time.
struct ZonedBucket {
    date: DateBucket,
    time: TimeBucket,
    zone: Option<TimeZone>,
    offset: Option<Offset>,
    template_zone: TimeZone,
}

impl HasDateBucket for ZonedBucket {
    fn date_bucket(&mut self) -> &mut DateBucket {
        &mut self.date
    }
}

impl HasTimeBucket for ZonedBucket {
    fn time_bucket(&mut self) -> &mut TimeBucket {
        &mut self.time
    }
}

impl ParseBucket<Zoned> for ZonedBucket {
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<Zoned> {
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
        let datetime = civil::DateTime::from_parts(date, time);
        let tz = self.zone.unwrap_or(self.template_zone);

        // An embedded offset pins the instant; otherwise the local time
        // must resolve unambiguously in the zone.
        let offset = match self.offset {
            Some(offset) => offset,
            None => match tz.to_ambiguous_timestamp(datetime).offset() {
                AmbiguousOffset::Unambiguous { offset } => offset,
                AmbiguousOffset::Gap { .. } => {
                    return Err(ParseError::new(ParseErrorKind::SkippedLocalTime, end));
                }
                AmbiguousOffset::Fold { .. } => {
                    return Err(ParseError::new(ParseErrorKind::AmbiguousLocalTime, end));
                }
            },
        };
        let timestamp = offset
            .to_timestamp(datetime)
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidOffset, end))?;
        Ok(timestamp.to_zoned(tz))
    }
}

fn factory(provider: Arc<dyn ZoneProvider>) -> PatternFactory<Zoned> {
    Arc::new(move |text, locale, template| {
        compile(text, locale, template.clone(), Arc::clone(&provider))
    })
}

fn compile(
    text: &str,
    locale: &Locale,
    template: Zoned,
    provider: Arc<dyn ZoneProvider>,
) -> Result<Arc<dyn PatternImpl<Zoned>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let text = match single_character(text) {
        Some('G') => GENERAL_ISO_PATTERN_TEXT,
        Some('F') => FULL_PATTERN_TEXT,
        Some(specifier) => {
            return Err(PatternError::UnknownStandardFormat {
                specifier,
                kind: "ZonedDateTime",
            });
        }
        None => text,
    };

    // The zone handler captures the provider, so this kind builds its
    // table per compilation rather than caching it.
    let mut table: HandlerTable<Zoned, ZonedBucket> = HandlerTable::with_escapes();
    add_date_handlers(&mut table);
    add_time_handlers(&mut table);
    table.insert(
        'o',
        embedded_offset_handler(
            |value: &Zoned| value.offset(),
            |bucket: &mut ZonedBucket, offset| bucket.offset = Some(offset),
        ),
    );
    table.insert('l', embedded_local_handler(local_handlers));
    table.insert('z', zone_handler(provider));
    table.insert('x', Box::new(handle_zone_abbreviation));

    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, &table)?;
    let template_datetime = template.datetime();
    let template_zone = template.time_zone().clone();
    let pattern = builder.build(move || ZonedBucket {
        date: DateBucket::new(template_datetime.date()),
        time: TimeBucket::new(template_datetime.time()),
        zone: None,
        offset: None,
        template_zone: template_zone.clone(),
    })?;
    Ok(Arc::new(pattern))
}

fn local_handlers() -> &'static HandlerTable<Zoned, ZonedBucket> {
    static TABLE: OnceLock<HandlerTable<Zoned, ZonedBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        add_date_handlers(&mut table);
        add_time_handlers(&mut table);
        table
    })
}

fn zone_handler(provider: Arc<dyn ZoneProvider>) -> CharacterHandler<Zoned, ZonedBucket> {
    Box::new(move |_cursor, builder| {
        builder.add_field(PatternFields::ZONE, 'z')?;
        let general_offset = offset::compile_impl("G", builder.locale(), Offset::UTC)?;

        let parse_provider = Arc::clone(&provider);
        let parse_offset = Arc::clone(&general_offset);
        builder.add_parse_step(move |cursor, bucket| {
            let position = cursor.position();

            // Fixed-zone shortcut: `UTC`, optionally followed by an offset.
            if cursor.match_str("UTC") {
                let saved = cursor.position();
                match parse_offset.parse_partial(cursor) {
                    Ok(offset) => bucket.zone = Some(parse_provider.fixed(offset)),
                    Err(_) => {
                        cursor.set_position(saved);
                        bucket.zone = Some(TimeZone::UTC);
                    }
                }
                return Ok(());
            }

            // Longest identifier match: binary-search the sorted list,
            // then walk back through the identifiers that can still be
            // prefixes of the input.
            let ids = parse_provider.ids();
            let (mut lo, mut hi) = (0, ids.len());
            while lo < hi {
                let mid = (lo + hi) / 2;
                match cursor.compare_ordinal(&ids[mid]) {
                    Ordering::Less => hi = mid,
                    _ => lo = mid + 1,
                }
            }
            let remainder = cursor.remainder();
            let first = remainder.as_bytes().first();
            for index in (0..lo).rev() {
                let id = &ids[index];
                if id.as_bytes().first() != first {
                    break;
                }
                if remainder.starts_with(id.as_str()) {
                    if let Some(tz) = parse_provider.get(id) {
                        cursor.set_position(position + id.len());
                        bucket.zone = Some(tz);
                        return Ok(());
                    }
                }
            }
            Err(ParseError::new(ParseErrorKind::NoMatchingZoneId, position))
        });

        builder.add_format_step(move |value: &Zoned, out| {
            match value.time_zone().iana_name() {
                Some(name) => out.push_str(name),
                None => {
                    // Fixed zones print the way the shortcut parses.
                    out.push_str("UTC");
                    let offset = value.offset();
                    if offset.seconds() != 0 {
                        general_offset.append_format(&offset, out);
                    }
                }
            }
        });
        Ok(())
    })
}

/// `x` formats the zone abbreviation in effect at the instant. There is no
/// reliable reverse mapping, so the whole pattern becomes format-only.
fn handle_zone_abbreviation(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<Zoned, ZonedBucket>,
) -> Result<(), PatternError> {
    let _ = cursor.get_repeat_count(1)?;
    builder.add_field(PatternFields::ZONE_ABBREVIATION, 'x')?;
    builder.set_format_only();
    builder.add_format_step(|value: &Zoned, out| {
        let tz = value.time_zone();
        let info = tz.to_offset_info(value.timestamp());
        out.push_str(info.abbreviation());
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_zone(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        zone: &str,
    ) -> Zoned {
        civil::datetime(year, month, day, hour, minute, second, 0)
            .to_zoned(jiff::tz::db().get(zone).unwrap())
            .unwrap()
    }

    #[test]
    fn general_iso_round_trip() {
        let pattern = ZonedPattern::general_iso();
        let value = in_zone(2024, 6, 1, 12, 30, 45, "Europe/Paris");
        assert_eq!(pattern.format(&value), "2024-06-01T12:30:45 Europe/Paris");

        let parsed = pattern.parse("2024-06-01T12:30:45 Europe/Paris").unwrap();
        assert_eq!(parsed.timestamp(), value.timestamp());
        assert_eq!(parsed.time_zone().iana_name(), Some("Europe/Paris"));
    }

    #[test]
    fn utc_shortcut_with_and_without_offset() {
        let pattern = ZonedPattern::general_iso();

        let parsed = pattern.parse("2024-06-01T12:30:45 UTC").unwrap();
        assert_eq!(parsed.offset(), Offset::UTC);

        let parsed = pattern.parse("2024-06-01T12:30:45 UTC+05:30").unwrap();
        assert_eq!(parsed.offset().seconds(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn unknown_zone_identifier() {
        let pattern = ZonedPattern::general_iso();
        let err = pattern
            .parse("2024-06-01T12:30:45 Nowhere/Special")
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NoMatchingZoneId);
        assert_eq!(err.position, 20);
    }

    #[test]
    fn skipped_and_ambiguous_local_times() {
        let pattern = ZonedPattern::general_iso();

        // Europe/London springs forward over 01:00-02:00 on 2024-03-31.
        let err = pattern
            .parse("2024-03-31T01:30:00 Europe/London")
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::SkippedLocalTime);

        // It falls back over 01:00-02:00 on 2024-10-27.
        let err = pattern
            .parse("2024-10-27T01:30:00 Europe/London")
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::AmbiguousLocalTime);
    }

    #[test]
    fn embedded_offset_resolves_ambiguity() {
        let pattern = ZonedPattern::create("F", &Locale::invariant()).unwrap();
        let parsed = pattern
            .parse("2024-10-27T01:30:00 Europe/London (+01:00)")
            .unwrap();
        assert_eq!(parsed.offset().seconds(), 3600);

        let formatted = pattern.format(&parsed);
        assert_eq!(formatted, "2024-10-27T01:30:00 Europe/London (+01:00)");
    }

    #[test]
    fn zone_abbreviation_is_format_only() {
        let pattern =
            ZonedPattern::create("HH':'mm x", &Locale::invariant()).unwrap();
        let value = in_zone(2024, 6, 1, 12, 30, 0, "Europe/London");
        assert_eq!(pattern.format(&value), "12:30 BST");

        let err = pattern.parse("12:30 BST").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::FormatOnlyPattern);
    }
}
