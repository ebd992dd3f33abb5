// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Year-month patterns.

use std::sync::{Arc, OnceLock};

use jiff::civil;

use crate::bucket::{DateBucket, HasDateBucket, ParseBucket};
use crate::builder::{HandlerTable, SteppedPatternBuilder, handle_date_separator};
use crate::error::{ParseResult, PatternError};
use crate::fields::PatternFields;
use crate::locale::Locale;
use crate::pattern::{Pattern, PatternFactory, PatternImpl};
use crate::patterns::date::{self, single_character};
use crate::types::YearMonth;

pub(crate) const ISO_PATTERN_TEXT: &str = "uuuu'-'MM";

/// A compiled pattern for [`YearMonth`] values.
pub type YearMonthPattern = Pattern<YearMonth>;

impl YearMonthPattern {
    /// Compile a year-month pattern. The default template is 2000-01.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create(pattern: &str, locale: &Locale) -> Result<Self, PatternError> {
        let template = YearMonth::new(2000, 1).expect("the default year-month template is valid");
        Self::create_with_template(pattern, locale, template)
    }

    /// Compile a year-month pattern with an explicit template value.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError`] when the pattern text is invalid.
    pub fn create_with_template(
        pattern: &str,
        locale: &Locale,
        template: YearMonth,
    ) -> Result<Self, PatternError> {
        Pattern::from_parts(pattern, locale.clone(), template, factory())
    }

    /// The cached ISO year-month pattern, `uuuu'-'MM`.
    #[must_use]
    pub fn iso() -> Self {
        static ISO: OnceLock<YearMonthPattern> = OnceLock::new();
        ISO.get_or_init(|| {
            Self::create(ISO_PATTERN_TEXT, &Locale::invariant())
                .expect("the ISO year-month pattern compiles")
        })
        .clone()
    }
}

struct YearMonthBucket {
    date: DateBucket,
}

impl HasDateBucket for YearMonthBucket {
    fn date_bucket(&mut self) -> &mut DateBucket {
        &mut self.date
    }
}

impl ParseBucket<YearMonth> for YearMonthBucket {
    fn commit(self, used: PatternFields, end: usize) -> ParseResult<YearMonth> {
        self.date.commit_date(used, end).map(YearMonth::from)
    }
}

fn factory() -> PatternFactory<YearMonth> {
    Arc::new(|text, locale, template| compile(text, locale, *template))
}

fn compile(
    text: &str,
    locale: &Locale,
    template: YearMonth,
) -> Result<Arc<dyn PatternImpl<YearMonth>>, PatternError> {
    if text.is_empty() {
        return Err(PatternError::FormatStringEmpty);
    }
    let text = match single_character(text) {
        Some('G') => ISO_PATTERN_TEXT,
        Some(specifier) => {
            return Err(PatternError::UnknownStandardFormat {
                specifier,
                kind: "YearMonth",
            });
        }
        None => text,
    };
    let template_date = civil::date(template.year(), template.month(), 1);
    let mut builder = SteppedPatternBuilder::new(locale.clone());
    builder.parse_custom_pattern(text, handlers())?;
    let pattern = builder.build(move || YearMonthBucket {
        date: DateBucket::new(template_date),
    })?;
    Ok(Arc::new(pattern))
}

fn handlers() -> &'static HandlerTable<YearMonth, YearMonthBucket> {
    static TABLE: OnceLock<HandlerTable<YearMonth, YearMonthBucket>> = OnceLock::new();
    TABLE.get_or_init(|| {
        // The date characters minus the day field.
        let mut table = HandlerTable::with_escapes();
        table.insert('/', Box::new(handle_date_separator));
        table.insert('u', Box::new(date::handle_absolute_year));
        table.insert('y', Box::new(date::handle_year_of_era));
        table.insert('M', Box::new(date::handle_month));
        table.insert('g', Box::new(date::handle_era));
        table.insert('c', Box::new(date::handle_calendar));
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn iso_round_trip() {
        let pattern = YearMonthPattern::iso();
        let value = YearMonth::new(2024, 5).unwrap();
        assert_eq!(pattern.format(&value), "2024-05");
        assert_eq!(pattern.parse("2024-05").unwrap(), value);
    }

    #[test]
    fn month_must_be_in_range() {
        let pattern = YearMonthPattern::iso();
        let err = pattern.parse("2024-13").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::FieldValueOutOfRange {
                value: 13,
                field: 'M'
            }
        );
    }

    #[test]
    fn month_names_work_without_a_day() {
        let pattern =
            YearMonthPattern::create("MMMM uuuu", &Locale::invariant()).unwrap();
        let value = YearMonth::new(2024, 2).unwrap();
        assert_eq!(pattern.format(&value), "February 2024");
        assert_eq!(pattern.parse("february 2024").unwrap(), value);
    }
}
