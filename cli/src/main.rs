// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! A command-line playground for temporal text patterns: parse text into a
//! value with any pattern, or reformat a canonically-written value with
//! any pattern.

use std::error::Error;
use std::fmt::Debug;

use clap::{Parser, Subcommand, ValueEnum};
use tempora_text::{
    DatePattern, DateTimePattern, DurationPattern, Locale, MonthDayPattern,
    OffsetDateTimePattern, OffsetPattern, Pattern, PatternError, PeriodPattern, TimePattern,
    YearMonthPattern, ZonedPattern,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tempora", version, about = "Temporal text pattern playground")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse input text with a pattern and print the value.
    Parse {
        /// The value kind the pattern targets.
        #[arg(long, value_enum)]
        kind: Kind,

        /// The pattern text, e.g. `uuuu'-'MM'-'dd`.
        #[arg(long)]
        pattern: String,

        /// The text to parse.
        input: String,
    },

    /// Format a canonically-written value with a pattern.
    Format {
        /// The value kind the pattern targets.
        #[arg(long, value_enum)]
        kind: Kind,

        /// The pattern text to format with.
        #[arg(long)]
        pattern: String,

        /// The value, written in the kind's canonical (ISO or round-trip)
        /// form.
        value: String,
    },
}

/// The value kinds the engine serves.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Date,
    Time,
    DateTime,
    YearMonth,
    MonthDay,
    Offset,
    Duration,
    Period,
    OffsetDateTime,
    Zoned,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let locale = Locale::invariant();
    match cli.command {
        Commands::Parse {
            kind,
            pattern,
            input,
        } => {
            tracing::debug!(?kind, %pattern, "compiling pattern for parse");
            match kind {
                Kind::Date => parse(DatePattern::create(&pattern, &locale), &input),
                Kind::Time => parse(TimePattern::create(&pattern, &locale), &input),
                Kind::DateTime => parse(DateTimePattern::create(&pattern, &locale), &input),
                Kind::YearMonth => parse(YearMonthPattern::create(&pattern, &locale), &input),
                Kind::MonthDay => parse(MonthDayPattern::create(&pattern, &locale), &input),
                Kind::Offset => parse(OffsetPattern::create(&pattern, &locale), &input),
                Kind::Duration => parse(DurationPattern::create(&pattern, &locale), &input),
                Kind::Period => parse(PeriodPattern::create(&pattern, &locale), &input),
                Kind::OffsetDateTime => {
                    parse(OffsetDateTimePattern::create(&pattern, &locale), &input)
                }
                Kind::Zoned => parse(ZonedPattern::create(&pattern, &locale), &input),
            }
        }
        Commands::Format {
            kind,
            pattern,
            value,
        } => {
            tracing::debug!(?kind, %pattern, "compiling pattern for format");
            match kind {
                Kind::Date => format(
                    DatePattern::create(&pattern, &locale),
                    DatePattern::iso(),
                    &value,
                ),
                Kind::Time => format(
                    TimePattern::create(&pattern, &locale),
                    TimePattern::extended_iso(),
                    &value,
                ),
                Kind::DateTime => format(
                    DateTimePattern::create(&pattern, &locale),
                    DateTimePattern::extended_iso(),
                    &value,
                ),
                Kind::YearMonth => format(
                    YearMonthPattern::create(&pattern, &locale),
                    YearMonthPattern::iso(),
                    &value,
                ),
                Kind::MonthDay => format(
                    MonthDayPattern::create(&pattern, &locale),
                    MonthDayPattern::iso(),
                    &value,
                ),
                Kind::Offset => format(
                    OffsetPattern::create(&pattern, &locale),
                    OffsetPattern::general_iso(),
                    &value,
                ),
                Kind::Duration => format(
                    DurationPattern::create(&pattern, &locale),
                    DurationPattern::round_trip(),
                    &value,
                ),
                Kind::Period => format(
                    PeriodPattern::create(&pattern, &locale),
                    PeriodPattern::round_trip(),
                    &value,
                ),
                Kind::OffsetDateTime => format(
                    OffsetDateTimePattern::create(&pattern, &locale),
                    OffsetDateTimePattern::general_iso(),
                    &value,
                ),
                Kind::Zoned => format(
                    ZonedPattern::create(&pattern, &locale),
                    ZonedPattern::general_iso(),
                    &value,
                ),
            }
        }
    }
}

fn parse<T: Clone + Debug>(
    pattern: Result<Pattern<T>, PatternError>,
    input: &str,
) -> Result<(), Box<dyn Error>> {
    let pattern = pattern?;
    let value = pattern.parse(input)?;
    println!("{value:?}");
    Ok(())
}

fn format<T: Clone>(
    pattern: Result<Pattern<T>, PatternError>,
    canonical: Pattern<T>,
    value_text: &str,
) -> Result<(), Box<dyn Error>> {
    let pattern = pattern?;
    let value = canonical.parse(value_text)?;
    println!("{}", pattern.format(&value));
    Ok(())
}
