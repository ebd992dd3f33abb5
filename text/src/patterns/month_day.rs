// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Month-day patterns.

use std::sync::{Arc, OnceLock};

use jiff::civil;

use crate::bucket::{DateBucket, HasDateBucket, ParseBucket};
use crate::builder::{HandlerTable, SteppedPatternBuilder, handle_date_separator};
use crate::error::{ParseResult, PatternError};
use crate::fields::PatternFields;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::{self, single_character};
use crate::types::MonthDay;

pub(crate) const ISO_PATTERN_TEXT: &str = "MM'-'dd";

/// A compiled pattern for [`MonthDay`] values.
pub type MonthDayPattern = Pattern<MonthDay>;

impl MonthDayPattern {
    /// Compile a month-day pattern. The default template is January 1.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        let template = MonthDay::new(1, 1).expect("the default month-day template is valid");
        Self::create_with_template(pattern, locale, template)
    }

    /// Compile a month-day pattern with an explicit template value.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: MonthDay,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory())
    }

    /// The cached month-day pattern, `MM'-'dd`.
    #[must_use]
    pub fn iso() -> Self {
        static ISO: OnceLock<MonthDayPattern> = OnceLock::new();
        ISO.get_or_init(|| {
            Self::create(ISO_PATTERN_TEXT, &Locale::invariant())
                .expect("the ISO month-day pattern compiles")
        })
        .clone()
    }
}

struct MonthDayBucket {
    date: DateBucket,
}

impl HasDateBucket for MonthDayBucket {
    fn date_bucket(&mut self) -> &mut DateBucket {
        &mut self.date
    }
}

impl ParseBucket<MonthDay> for MonthDayBucket {
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<MonthDay> {
        // The template year is the leap reference year 2000, so February 29
        // commits successfully.
        self.date.commit_date(used, end).map(MonthDay::from)
    }
}

fn factory() -> PatternFactory<MonthDay> {
    Arc::new(|text, locale, template| compile(text, locale, *template))
}

fn compile(
    text: &str,
    locale: &Locale,
    template: MonthDay,
) -> Result<Arc<dyn PatternImpl<MonthDay>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let text = match single_character(text) {
        Some('G') => ISO_PATTERN_TEXT,
        Some(specifier) => {
            return Err(PatternError::UnknownStandardFormat {
                specifier,
                kind: "MonthDay",
            });
        }
        None => text,
    };
    let template_date = civil::date(2000, template.month(), template.day());
    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, handlers())?;
    let pattern = builder.build(move || MonthDayBucket {
        date: DateBucket::new(template_date),
    })?;
    Ok(Arc::new(pattern))
}

fn handlers() -> &'static HandlerTable<MonthDay, MonthDayBucket> {
    static TABLE: OnceLock<HandlerTable<MonthDay, MonthDayBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HandlerTable::with_escapes();
        table.insert('/', Box::new(handle_date_separator));
        table.insert('M', Box::new(date::handle_month));
        table.insert('d', Box::new(date::handle_day));
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn iso_round_trip() {
        let pattern = MonthDayPattern::iso();
        let value = MonthDay::new(2, 29).unwrap();
        assert_eq!(pattern.format(&value), "02-29");
        assert_eq!(pattern.parse("02-29").unwrap(), value);
    }

    #[test]
    fn impossible_days_are_rejected() {
        let pattern = MonthDayPattern::iso();
        let err = pattern.parse("02-30").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::FieldValueOutOfRange {
                value: 30,
                field: 'd'
            }
        );
    }

    #[test]
    fn month_name_with_genitive_selection() {
        let pattern = MonthDayPattern::create("MMMM d", &Locale::invariant()).unwrap();
        let value = MonthDay::new(7, 4).unwrap();
        assert_eq!(pattern.format(&value), "July 4");
        assert_eq!(pattern.parse("july 4").unwrap(), value);
    }
}
