// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Bidirectional text patterns for temporal values.
//!
//! A pattern string plus a [`Locale`] compiles into a reusable
//! [`Pattern`]: an ordered program of parse steps (text to value) and
//! format steps (value to text) over one of the supported temporal kinds -
//! calendar dates, wall-clock times, date-times, year-months, month-days,
//! UTC offsets, durations, periods, and offset/zoned date-times. Values
//! themselves are `jiff` types plus a few thin records of this crate.
//!
//! # Example
//!
//! ```
//! use tempora_text::{DatePattern, Locale};
//!
//! let pattern = DatePattern::create("dd MMMM uuuu", &Locale::invariant())?;
//! let date = pattern.parse("29 February 2024")?;
//! assert_eq!(date, jiff::civil::date(2024, 2, 29));
//! assert_eq!(pattern.format(&date), "29 February 2024");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Compiled patterns are immutable and cheap to clone; share them freely
//! across threads. Parsing never panics: every failure is returned as a
//! [`ParseError`] carrying the error kind and the byte position in the
//! input.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::single_match_else
)]

mod bucket;
mod builder;
pub mod calendar;
mod composite;
mod cursor;
mod error;
mod fields;
mod formatter;
pub mod locale;
mod pattern;
pub mod patterns;
mod types;
pub mod zone;

pub use crate::calendar::{Calendar, Era};
pub use crate::error::{ParseError, ParseErrorKind, ParseResult, PatternError};
pub use crate::fields::PatternFields;
pub use crate::locale::{Locale, LocaleBuilder, OffsetPatternLength};
pub use crate::pattern::{Pattern, PatternSet};
pub use crate::patterns::date::DatePattern;
pub use crate::patterns::date_time::DateTimePattern;
pub use crate::patterns::duration::DurationPattern;
pub use crate::patterns::month_day::MonthDayPattern;
pub use crate::patterns::offset::OffsetPattern;
pub use crate::patterns::offset_date_time::OffsetDateTimePattern;
pub use crate::patterns::period::PeriodPattern;
pub use crate::patterns::time::TimePattern;
pub use crate::patterns::year_month::YearMonthPattern;
pub use crate::patterns::zoned::ZonedPattern;
pub use crate::types::{MonthDay, OffsetDateTime, YearMonth};
pub use crate::zone::{TzdbZoneProvider, ZoneProvider};
