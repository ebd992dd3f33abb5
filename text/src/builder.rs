// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The pattern compiler.
//!
//! [`SteppedPatternBuilder`] walks the pattern text, dispatches every
//! character through a per-kind [`HandlerTable`], and grows two ordered step
//! lists: parse steps, which run against a [`ValueCursor`] and a bucket, and
//! format steps, which read the value and append to the output. The result
//! is a [`SteppedPattern`], the immutable runtime behind every pattern
//! handle.
//!
//! Handlers shared by several value kinds (escapes, quoting, padded numeric
//! fields, fractions, signs) live here; kind-specific handlers live next to
//! their pattern type.

use std::collections::HashMap;

use crate::bucket::ParseBucket;
use crate::cursor::{PatternCursor, ValueCursor};
use crate::error::{ParseError, ParseErrorKind, ParseResult, PatternError};
use crate::fields::PatternFields;
use crate::formatter;
use crate::locale::Locale;
use crate::pattern::PatternImpl;

/// A single parse step: may advance the cursor, mutate the bucket, or fail.
pub(crate) type ParseStep<B> =
    Box<dyn Fn(&mut ValueCursor<'_>, &mut B) -> Result<(), ParseError> + Send + Sync>;

/// A single format step: reads the value, appends text.
pub(crate) type FormatStep<T> = Box<dyn Fn(&T, &mut String) + Send + Sync>;

/// A compile-time handler for one pattern character.
pub(crate) type CharacterHandler<T, B> = Box<
    dyn Fn(&mut PatternCursor<'_>, &mut SteppedPatternBuilder<T, B>) -> Result<(), PatternError>
        + Send
        + Sync,
>;

enum FormatItem<T> {
    Ready(FormatStep<T>),
    /// Finalized with the complete used-fields set once the whole pattern
    /// has been compiled.
    Post(Box<dyn FnOnce(PatternFields) -> FormatStep<T> + Send + Sync>),
}

/// Dispatch table from pattern character to handler for one value kind.
pub(crate) struct HandlerTable<T, B> {
    map: HashMap<char, CharacterHandler<T, B>>,
}

impl<T: 'static, B: 'static> HandlerTable<T, B> {
    pub(crate) fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// The escape mechanics every kind shares: `%`, quoting and `\`.
    pub(crate) fn with_escapes() -> Self {
        let mut table = Self::new();
        table.insert('%', Box::new(handle_percent));
        table.insert('\'', Box::new(handle_quote));
        table.insert('"', Box::new(handle_quote));
        table.insert('\\', Box::new(handle_backslash));
        table
    }

    pub(crate) fn insert(&mut self, character: char, handler: CharacterHandler<T, B>) {
        self.map.insert(character, handler);
    }

    pub(crate) fn get(&self, character: char) -> Option<&CharacterHandler<T, B>> {
        self.map.get(&character)
    }
}

/// Compiler state for one pattern.
pub(crate) struct SteppedPatternBuilder<T, B> {
    locale: Locale,
    parse_steps: Vec<ParseStep<B>>,
    format_items: Vec<FormatItem<T>>,
    used_fields: PatternFields,
    format_only: bool,
}

impl<T: 'static, B: 'static> SteppedPatternBuilder<T, B> {
    pub(crate) fn new(locale: Locale) -> Self {
        Self {
            locale,
            parse_steps: Vec::new(),
            format_items: Vec::new(),
            used_fields: PatternFields::empty(),
            format_only: false,
        }
    }

    pub(crate) fn locale(&self) -> &Locale {
        &self.locale
    }

    pub(crate) fn used_fields(&self) -> PatternFields {
        self.used_fields
    }

    /// Record a field assignment, rejecting duplicates.
    pub(crate) fn add_field(
        &mut self,
        field: PatternFields,
        character: char,
    ) -> Result<(), PatternError> {
        self.used_fields.add(field, character)
    }

    /// Mark the whole pattern as format-only; parsing will fail with
    /// [`ParseErrorKind::FormatOnlyPattern`].
    pub(crate) fn set_format_only(&mut self) {
        self.format_only = true;
    }

    pub(crate) fn add_parse_step(
        &mut self,
        step: impl Fn(&mut ValueCursor<'_>, &mut B) -> Result<(), ParseError> + Send + Sync + 'static,
    ) {
        self.parse_steps.push(Box::new(step));
    }

    pub(crate) fn add_format_step(
        &mut self,
        step: impl Fn(&T, &mut String) + Send + Sync + 'static,
    ) {
        self.format_items.push(FormatItem::Ready(Box::new(step)));
    }

    /// Register a format step that is only finalized after the whole
    /// pattern has been compiled, with the final used-fields set. Month
    /// names use this to choose between the genitive and nominative form.
    pub(crate) fn add_post_pattern_format_step(
        &mut self,
        finalize: impl FnOnce(PatternFields) -> FormatStep<T> + Send + Sync + 'static,
    ) {
        self.format_items.push(FormatItem::Post(Box::new(finalize)));
    }

    /// Register a literal character: parsed exactly, formatted verbatim.
    pub(crate) fn add_literal_char(&mut self, expected: char, kind: fn(char) -> ParseErrorKind) {
        self.add_parse_step(move |cursor, _bucket| {
            let position = cursor.position();
            if cursor.match_char(expected) {
                Ok(())
            } else if cursor.is_exhausted() {
                Err(ParseError::new(ParseErrorKind::EndOfString, position))
            } else {
                Err(ParseError::new(kind(expected), position))
            }
        });
        self.add_format_step(move |_value, out| out.push(expected));
    }

    /// Register a literal string (quoted text, a separator).
    pub(crate) fn add_literal_string(&mut self, literal: String, kind: fn() -> ParseErrorKind) {
        let formatted = literal.clone();
        self.add_parse_step(move |cursor, _bucket| {
            let position = cursor.position();
            if cursor.match_str(&literal) {
                Ok(())
            } else if cursor.is_exhausted() {
                Err(ParseError::new(ParseErrorKind::EndOfString, position))
            } else {
                Err(ParseError::new(kind(), position))
            }
        });
        self.add_format_step(move |_value, out| out.push_str(&formatted));
    }

    /// Register the parse half of a padded numeric field: between
    /// `min_digits` and `max_digits` digits, value in
    /// `min_value..=max_value`. A negative value is only accepted when
    /// `min_value` is negative.
    pub(crate) fn add_parse_value_step(
        &mut self,
        min_digits: usize,
        max_digits: usize,
        pattern_char: char,
        min_value: i64,
        max_value: i64,
        setter: fn(&mut B, i64),
    ) {
        self.add_parse_step(move |cursor, bucket| {
            let start = cursor.position();
            let negative = min_value < 0 && cursor.match_char('-');
            let Some(magnitude) = cursor.parse_digits(min_digits, max_digits) else {
                cursor.set_position(start);
                return Err(ParseError::new(
                    ParseErrorKind::MismatchedNumber {
                        field: pattern_char.to_string().repeat(min_digits),
                    },
                    start,
                ));
            };
            let value = if negative { -magnitude } else { magnitude };
            if value < min_value || value > max_value {
                return Err(ParseError::new(
                    ParseErrorKind::FieldValueOutOfRange {
                        value,
                        field: pattern_char,
                    },
                    start,
                ));
            }
            setter(bucket, value);
            Ok(())
        });
    }

    /// Register the format half of a padded numeric field.
    pub(crate) fn add_format_left_pad(&mut self, width: usize, getter: fn(&T) -> i64) {
        self.add_format_step(move |value, out| formatter::left_pad(getter(value), width, out));
    }

    /// Compile `text` against a handler table, appending to this builder.
    /// Characters without a handler become literals. This is also the entry
    /// point for inlining an embedded local date/time pattern.
    pub(crate) fn parse_custom_pattern(
        &mut self,
        text: &str,
        table: &HandlerTable<T, B>,
    ) -> Result<(), PatternError> {
        let mut cursor = PatternCursor::new(text);
        while let Some(character) = cursor.advance() {
            match table.get(character) {
                Some(handler) => handler(&mut cursor, self)?,
                None => self.add_literal_char(character, |expected| {
                    ParseErrorKind::MismatchedCharacter { expected }
                }),
            }
        }
        Ok(())
    }

    /// Validate cross-field rules, finalize post-pattern format actions and
    /// freeze the step lists.
    pub(crate) fn build(
        self,
        bucket_factory: impl Fn() -> B + Send + Sync + 'static,
    ) -> Result<SteppedPattern<T, B>, PatternError> {
        self.used_fields.validate_combination()?;
        let used_fields = self.used_fields;
        let format_steps = self
            .format_items
            .into_iter()
            .map(|item| match item {
                FormatItem::Ready(step) => step,
                FormatItem::Post(finalize) => finalize(used_fields),
            })
            .collect();
        Ok(SteppedPattern {
            parse_steps: self.parse_steps,
            format_steps,
            used_fields,
            format_only: self.format_only,
            bucket_factory: Box::new(bucket_factory),
        })
    }
}

/// The `%` specifier: forces the next character onto the custom-pattern
/// path. Nothing is registered; the compile loop handles the next character
/// normally.
pub(crate) fn handle_percent<T: 'static, B: 'static>(
    cursor: &mut PatternCursor<'_>,
    _builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError> {
    match cursor.peek_next() {
        None => Err(PatternError::PercentAtEndOfString),
        Some('%') => Err(PatternError::PercentDoubled),
        Some(_) => Ok(()),
    }
}

/// A `'...'` or `"..."` quoted literal.
pub(crate) fn handle_quote<T: 'static, B: 'static>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError> {
    let quote = cursor.current().unwrap_or_default();
    let literal = cursor.get_quoted_string(quote)?;
    builder.add_literal_string(literal, || ParseErrorKind::QuotedStringMismatch);
    Ok(())
}

/// A `\X` escaped literal.
pub(crate) fn handle_backslash<T: 'static, B: 'static>(
    cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError> {
    match cursor.advance() {
        None => Err(PatternError::EscapeAtEndOfString),
        Some(escaped) => {
            builder.add_literal_char(escaped, |expected| {
                ParseErrorKind::EscapedCharacterMismatch { expected }
            });
            Ok(())
        }
    }
}

/// The locale time separator (`:`).
pub(crate) fn handle_time_separator<T: 'static, B: 'static>(
    _cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError> {
    let separator = builder.locale().time_separator().to_string();
    builder.add_literal_string(separator, || ParseErrorKind::TimeSeparatorMismatch);
    Ok(())
}

/// The locale date separator (`/`).
pub(crate) fn handle_date_separator<T: 'static, B: 'static>(
    _cursor: &mut PatternCursor<'_>,
    builder: &mut SteppedPatternBuilder<T, B>,
) -> Result<(), PatternError> {
    let separator = builder.locale().date_separator().to_string();
    builder.add_literal_string(separator, || ParseErrorKind::DateSeparatorMismatch);
    Ok(())
}

/// A numeric field whose repeat count sets both the parse width and the
/// format padding.
pub(crate) fn handle_padded_field<T: 'static, B: 'static>(
    max_count: usize,
    field: PatternFields,
    min_value: i64,
    max_value: i64,
    getter: fn(&T) -> i64,
    setter: fn(&mut B, i64),
) -> CharacterHandler<T, B> {
    Box::new(move |cursor, builder| {
        let character = cursor.current().unwrap_or_default();
        let count = cursor.get_repeat_count(max_count)?;
        builder.add_field(field, character)?;
        builder.add_parse_value_step(count, max_count, character, min_value, max_value, setter);
        builder.add_format_left_pad(count, getter);
        Ok(())
    })
}

/// The `f`/`F` fraction field. `f` requires exactly the declared digit
/// count and formats zero-padded; `F` allows up to the count and trims
/// trailing zeros.
pub(crate) fn handle_fraction<T: 'static, B: 'static>(
    getter: fn(&T) -> i64,
    setter: fn(&mut B, i64),
) -> CharacterHandler<T, B> {
    Box::new(move |cursor, builder| {
        let character = cursor.current().unwrap_or_default();
        let count = cursor.get_repeat_count_unbounded();
        if count > 9 {
            return Err(PatternError::PrecisionNotSupported {
                requested: count,
                maximum: 9,
            });
        }
        builder.add_field(PatternFields::FRACTIONAL_SECONDS, character)?;
        let required = character == 'f';
        builder.add_parse_step(move |cursor, bucket| {
            let position = cursor.position();
            let min_digits = if required { count } else { 0 };
            match cursor.parse_fraction(count, 9, min_digits) {
                Some(value) => {
                    setter(bucket, value);
                    Ok(())
                }
                None if !required => {
                    setter(bucket, 0);
                    Ok(())
                }
                None => Err(ParseError::new(
                    ParseErrorKind::MismatchedNumber {
                        field: character.to_string().repeat(count),
                    },
                    position,
                )),
            }
        });
        if required {
            builder.add_format_step(move |value, out| {
                formatter::right_pad(getter(value), count, 9, out);
            });
        } else {
            builder.add_format_step(move |value, out| {
                formatter::right_pad_truncate(getter(value), count, 9, out);
            });
        }
        Ok(())
    })
}

/// `.F...` / `;F...`: an optional decimal separator followed by an
/// up-to-count fraction. When the separator is absent on parse the fraction
/// is skipped entirely; on format the separator is only emitted when the
/// fraction is non-zero. `;` also accepts a comma on parse.
pub(crate) fn handle_decimal_separator<T: 'static, B: 'static>(
    getter: fn(&T) -> i64,
    setter: fn(&mut B, i64),
) -> CharacterHandler<T, B> {
    Box::new(move |cursor, builder| {
        let introducer = cursor.current().unwrap_or_default();
        if cursor.peek_next() != Some('F') {
            // A bare separator is a mandatory literal.
            if introducer == '.' {
                builder.add_literal_char('.', |_| ParseErrorKind::MissingDecimalSeparator);
            } else {
                builder.add_literal_char(introducer, |expected| {
                    ParseErrorKind::MismatchedCharacter { expected }
                });
            }
            return Ok(());
        }
        cursor.advance();
        let count = cursor.get_repeat_count_unbounded();
        if count > 9 {
            return Err(PatternError::PrecisionNotSupported {
                requested: count,
                maximum: 9,
            });
        }
        builder.add_field(PatternFields::FRACTIONAL_SECONDS, 'F')?;
        let accept_comma = introducer == ';';
        builder.add_parse_step(move |cursor, bucket| {
            if cursor.match_char('.') || (accept_comma && cursor.match_char(',')) {
                let position = cursor.position();
                match cursor.parse_fraction(count, 9, 1) {
                    Some(value) => {
                        setter(bucket, value);
                        Ok(())
                    }
                    None => Err(ParseError::new(
                        ParseErrorKind::MismatchedNumber {
                            field: "F".repeat(count),
                        },
                        position,
                    )),
                }
            } else {
                setter(bucket, 0);
                Ok(())
            }
        });
        builder.add_format_step(move |value, out| {
            out.push('.');
            // Removes the separator again when every digit is trimmed.
            formatter::right_pad_truncate(getter(value), count, 9, out);
        });
        Ok(())
    })
}

/// The `+` specifier: a sign is required on parse and always emitted on
/// format.
pub(crate) fn handle_required_sign<T: 'static, B: 'static>(
    setter: fn(&mut B, bool),
    is_negative: fn(&T) -> bool,
) -> CharacterHandler<T, B> {
    Box::new(move |_cursor, builder| {
        builder.add_field(PatternFields::SIGN, '+')?;
        builder.add_parse_step(move |cursor, bucket| {
            let position = cursor.position();
            if cursor.match_char('-') {
                setter(bucket, true);
                Ok(())
            } else if cursor.match_char('+') {
                setter(bucket, false);
                Ok(())
            } else {
                Err(ParseError::new(ParseErrorKind::MissingSign, position))
            }
        });
        builder.add_format_step(move |value, out| {
            out.push(if is_negative(value) { '-' } else { '+' });
        });
        Ok(())
    })
}

/// The `-` specifier: a sign is allowed on parse and emitted on format only
/// for negative values.
pub(crate) fn handle_negative_only_sign<T: 'static, B: 'static>(
    setter: fn(&mut B, bool),
    is_negative: fn(&T) -> bool,
) -> CharacterHandler<T, B> {
    Box::new(move |_cursor, builder| {
        builder.add_field(PatternFields::SIGN, '-')?;
        builder.add_parse_step(move |cursor, bucket| {
            let position = cursor.position();
            if cursor.current() == Some('+') {
                return Err(ParseError::new(ParseErrorKind::PositiveSignInvalid, position));
            }
            setter(bucket, cursor.match_char('-'));
            Ok(())
        });
        builder.add_format_step(move |value, out| {
            if is_negative(value) {
                out.push('-');
            }
        });
        Ok(())
    })
}

/// The compiled, immutable runtime of one pattern.
pub(crate) struct SteppedPattern<T, B> {
    parse_steps: Vec<ParseStep<B>>,
    format_steps: Vec<FormatStep<T>>,
    used_fields: PatternFields,
    format_only: bool,
    bucket_factory: Box<dyn Fn() -> B + Send + Sync>,
}

impl<T, B> std::fmt::Debug for SteppedPattern<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteppedPattern")
            .field("used_fields", &self.used_fields)
            .field("format_only", &self.format_only)
            .finish_non_exhaustive()
    }
}

impl<T, B: ParseBucket<T>> SteppedPattern<T, B> {
    fn run_steps(&self, cursor: &mut ValueCursor<'_>) -> Result<B, ParseError> {
        let mut bucket = (self.bucket_factory)();
        for step in &self.parse_steps {
            step(cursor, &mut bucket)?;
        }
        Ok(bucket)
    }
}

impl<T, B: ParseBucket<T>> PatternImpl<T> for SteppedPattern<T, B> {
    fn parse(&self, text: &str) -> ParseResult<T> {
        if self.format_only {
            return Err(ParseError::new(ParseErrorKind::FormatOnlyPattern, 0));
        }
        let mut cursor = ValueCursor::new(text);
        let bucket = self.run_steps(&mut cursor)?;
        if !cursor.is_exhausted() {
            return Err(ParseError::new(
                ParseErrorKind::ExtraValueCharacters {
                    remainder: cursor.remainder().to_string(),
                },
                cursor.position(),
            ));
        }
        bucket.commit(self.used_fields, cursor.position())
    }

    fn parse_partial(&self, cursor: &mut ValueCursor<'_>) -> ParseResult<T> {
        if self.format_only {
            return Err(ParseError::new(
                ParseErrorKind::FormatOnlyPattern,
                cursor.position(),
            ));
        }
        let bucket = self.run_steps(cursor)?;
        bucket.commit(self.used_fields, cursor.position())
    }

    fn append_format(&self, value: &T, out: &mut String) {
        for step in &self.format_steps {
            step(value, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil;

    use super::*;
    use crate::bucket::TimeBucket;

    fn minute_table() -> HandlerTable<civil::Time, TimeBucket> {
        let mut table = HandlerTable::with_escapes();
        table.insert(
            'm',
            handle_padded_field(
                2,
                PatternFields::MINUTES,
                0,
                59,
                |time: &civil::Time| i64::from(time.minute()),
                |bucket: &mut TimeBucket, value| bucket.minutes = Some(value),
            ),
        );
        table.insert(':', Box::new(handle_time_separator));
        table
    }

    fn compile(pattern: &str) -> Result<SteppedPattern<civil::Time, TimeBucket>, PatternError> {
        let mut builder = SteppedPatternBuilder::new(Locale::invariant());
        builder.parse_custom_pattern(pattern, &minute_table())?;
        builder.build(|| TimeBucket::new(civil::Time::midnight()))
    }

    #[test]
    fn literal_and_field_round_trip() {
        let pattern = compile("'m='mm").unwrap();
        let parsed = pattern.parse("m=07").unwrap();
        assert_eq!(parsed, civil::time(0, 7, 0, 0));
        let mut out = String::new();
        pattern.append_format(&civil::time(9, 41, 0, 0), &mut out);
        assert_eq!(out, "m=41");
    }

    #[test]
    fn trailing_input_is_rejected() {
        let pattern = compile("mm").unwrap();
        let err = pattern.parse("071").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ExtraValueCharacters {
                remainder: "1".to_string()
            }
        );
        assert_eq!(err.position, 2);
    }

    #[test]
    fn repeated_field_fails_at_compile_time() {
        assert_eq!(
            compile("mm:mm").unwrap_err(),
            PatternError::RepeatedFieldInPattern { character: 'm' }
        );
    }

    #[test]
    fn percent_escapes() {
        assert_eq!(compile("%").unwrap_err(), PatternError::PercentAtEndOfString);
        assert_eq!(compile("%%").unwrap_err(), PatternError::PercentDoubled);
        // "%m" is the single-character custom pattern for a minute.
        let pattern = compile("%m").unwrap();
        assert_eq!(pattern.parse("5").unwrap(), civil::time(0, 5, 0, 0));
    }

    #[test]
    fn out_of_range_field_value() {
        let pattern = compile("mm").unwrap();
        let err = pattern.parse("61").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::FieldValueOutOfRange {
                value: 61,
                field: 'm'
            }
        );
    }

    #[test]
    fn end_of_string_during_literal() {
        let pattern = compile("mm':'").unwrap();
        let err = pattern.parse("07").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EndOfString);
        assert_eq!(err.position, 2);
    }
}
