// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for pattern compilation and value parsing.
//!
//! Compilation problems surface as [`PatternError`] from the `create` call.
//! Parse problems are always returned as [`ParseError`] values, never
//! panicked. A [`ParseError`] stores the raw arguments of the failure and the
//! byte position in the input where it was detected; the human-readable
//! message is only rendered by the `Display` impl, so the probe-and-retry
//! paths of multi-pattern parsing never pay for message formatting.

/// Result of parsing text into a value of kind `T`.
pub type ParseResult<T> = Result<T, ParseError>;

/// An invalid pattern, reported when a pattern string is compiled.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern string is empty.
    #[error("the format string is empty")]
    FormatStringEmpty,

    /// A single-character pattern is not a known standard pattern for the
    /// value kind.
    #[error("the standard format \"{specifier}\" is not valid for {kind}")]
    UnknownStandardFormat {
        /// The unrecognized specifier.
        specifier: char,
        /// Human-readable name of the value kind.
        kind: &'static str,
    },

    /// A pattern character was repeated more often than it supports.
    #[error("a character run of \"{character}\" exceeds the maximum length of {maximum}")]
    RepeatCountExceeded {
        /// The repeated character.
        character: char,
        /// The longest supported run.
        maximum: usize,
    },

    /// Two pattern characters assign the same field.
    #[error("the field represented by \"{character}\" appears more than once")]
    RepeatedFieldInPattern {
        /// The character whose field was already assigned.
        character: char,
    },

    /// A quoted section is missing its end quote.
    #[error("the pattern ends before the matching \"{quote}\" end quote")]
    MissingEndQuote {
        /// The open quote character.
        quote: char,
    },

    /// The escape character `\` is the last character of the pattern.
    #[error("the pattern ends with an escape character")]
    EscapeAtEndOfString,

    /// The `%` specifier is the last character of the pattern.
    #[error("the pattern ends with a \"%\" specifier")]
    PercentAtEndOfString,

    /// The sequence `%%` is not a valid escape.
    #[error("\"%%\" is not a valid pattern sequence")]
    PercentDoubled,

    /// An embedded pattern specifier is not followed by `<`.
    #[error("the \"{character}\" specifier must be followed by an embedded <...> pattern")]
    MissingEmbeddedPatternStart {
        /// The specifier requiring an embedded pattern.
        character: char,
    },

    /// An embedded pattern is missing its closing `>`.
    #[error("the pattern ends before the \">\" closing an embedded pattern")]
    MissingEmbeddedPatternEnd,

    /// An era specifier is present without a year-of-era specifier.
    #[error("the era specifier \"g\" requires a year-of-era specifier \"y\"")]
    EraWithoutYearOfEra,

    /// A calendar specifier and an era specifier cannot be combined.
    #[error("the calendar specifier \"c\" cannot be combined with the era specifier \"g\"")]
    CalendarAndEra,

    /// 12-hour fields have no meaning for the value kind.
    #[error("the 12-hour specifier \"h\" is not supported for {kind}")]
    Hour12PatternNotSupported {
        /// Human-readable name of the value kind.
        kind: &'static str,
    },

    /// `Z` may only introduce an offset pattern.
    #[error("\"Z\" is only valid at the start of an offset pattern")]
    ZPrefixNotAtStart,

    /// A `Z`-prefixed offset pattern has no pattern after the prefix.
    #[error("a \"Z\"-prefixed offset pattern must contain a pattern after the prefix")]
    EmptyZPrefixedOffsetPattern,

    /// At most one total-valued duration field may appear in a pattern.
    #[error("a duration pattern supports at most one of the \"D\", \"H\", \"M\" and \"S\" fields")]
    MultipleCapitalDurationFields,

    /// A fraction specifier requests more digits than the value kind stores.
    #[error("a precision of {requested} digits exceeds the supported maximum of {maximum}")]
    PrecisionNotSupported {
        /// Requested digit count.
        requested: usize,
        /// Largest supported digit count.
        maximum: usize,
    },
}

/// The reason a parse failed.
///
/// The variants mirror the failures the parse steps can detect; each stores
/// the raw arguments so that rendering the message is deferred to `Display`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The input string is empty.
    #[error("the value string is empty")]
    ValueStringEmpty,

    /// A literal character of the pattern is missing from the input.
    #[error("the input does not match the \"{expected}\" literal")]
    MismatchedCharacter {
        /// The expected literal.
        expected: char,
    },

    /// A numeric field could not be read.
    #[error("the input does not match the numeric field \"{field}\"")]
    MismatchedNumber {
        /// The pattern characters of the field, e.g. `HH`.
        field: String,
    },

    /// Quoted literal text of the pattern is missing from the input.
    #[error("the input does not match the quoted literal of the pattern")]
    QuotedStringMismatch,

    /// An escaped literal character is missing from the input.
    #[error("the input does not match the escaped \"{expected}\" literal")]
    EscapedCharacterMismatch {
        /// The expected literal.
        expected: char,
    },

    /// A required decimal separator is missing.
    #[error("the input is missing a decimal separator")]
    MissingDecimalSeparator,

    /// The locale time separator is missing.
    #[error("the input does not match the time separator")]
    TimeSeparatorMismatch,

    /// The locale date separator is missing.
    #[error("the input does not match the date separator")]
    DateSeparatorMismatch,

    /// A required sign is missing.
    #[error("the input is missing a required sign")]
    MissingSign,

    /// A positive sign is present where only a negative sign is allowed.
    #[error("a positive sign is not valid at this position")]
    PositiveSignInvalid,

    /// No AM/PM designator could be read.
    #[error("the input is missing an AM/PM designator")]
    MissingAmPmDesignator,

    /// A text field (month name, day name, era, ...) could not be matched.
    #[error("the input does not match any text value for the field \"{field}\"")]
    MismatchedText {
        /// The pattern character of the field.
        field: char,
    },

    /// The input cannot be parsed at all with the given format.
    #[error("the value \"{value}\" cannot be parsed with the \"{format}\" format")]
    CannotParseValue {
        /// The offending input.
        value: String,
        /// The pattern text in use.
        format: String,
    },

    /// A parsed value is outside the range of the value kind.
    #[error("the value {value} is out of range for the value type")]
    ValueOutOfRange {
        /// The offending value.
        value: i64,
    },

    /// A parsed field value is outside the range of its field.
    #[error("the value {value} is out of range for the field \"{field}\"")]
    FieldValueOutOfRange {
        /// The offending value.
        value: i64,
        /// The pattern character of the field.
        field: char,
    },

    /// The input ended while the pattern expected more characters.
    #[error("the input ended before the pattern was fully matched")]
    EndOfString,

    /// The pattern was fully matched with input characters left over.
    #[error("the input has trailing characters: \"{remainder}\"")]
    ExtraValueCharacters {
        /// The unconsumed remainder of the input.
        remainder: String,
    },

    /// Two fields of the input contradict each other.
    #[error("the fields \"{first}\" and \"{second}\" have inconsistent values")]
    InconsistentValues {
        /// Pattern character of the first field.
        first: char,
        /// Pattern character of the second field.
        second: char,
    },

    /// A day-of-week name contradicts the parsed date.
    #[error("the day-of-week name does not match the parsed date")]
    InconsistentDayOfWeek,

    /// An hour value of 24 with any other non-midnight time field.
    #[error("a 24:00 time is only valid at exact midnight")]
    InvalidHour24,

    /// No pattern of a multi-pattern set matched the input.
    #[error("none of the available formats matches the input")]
    NoMatchingFormat,

    /// No registered time-zone identifier matches the input.
    #[error("the input does not match any known time-zone identifier")]
    NoMatchingZoneId,

    /// The parsed local time is skipped in the target time zone.
    #[error("the local date/time is skipped in the target time zone")]
    SkippedLocalTime,

    /// The parsed local time is ambiguous in the target time zone.
    #[error("the local date/time is ambiguous in the target time zone")]
    AmbiguousLocalTime,

    /// An offset value outside the supported range.
    #[error("the offset is outside the supported range")]
    InvalidOffset,

    /// A period with no components.
    #[error("the period is empty")]
    EmptyPeriod,

    /// A period unit that appears out of order.
    #[error("the period unit \"{unit}\" is misplaced")]
    MisplacedUnitSpecifier {
        /// The offending unit character.
        unit: char,
    },

    /// A period unit that appears twice.
    #[error("the period unit \"{unit}\" appears more than once")]
    RepeatedUnitSpecifier {
        /// The offending unit character.
        unit: char,
    },

    /// A character that is not a period unit.
    #[error("\"{unit}\" is not a valid period unit")]
    InvalidUnitSpecifier {
        /// The offending character.
        unit: char,
    },

    /// The pattern can only format values, not parse them.
    #[error("this pattern is only capable of formatting values")]
    FormatOnlyPattern,
}

/// A parse failure, carrying the reason and the input position.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} (at byte {position})")]
pub struct ParseError {
    /// The reason the parse failed.
    pub kind: ParseErrorKind,

    /// Byte offset into the input where the failure was detected.
    pub position: usize,
}

impl ParseError {
    /// Build an error at the given input position.
    #[must_use]
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// Whether a multi-pattern parse should try the remaining patterns after
    /// this failure.
    ///
    /// Value-level failures (a mismatched character, an out-of-range number,
    /// inconsistent fields) are worth retrying with a different pattern;
    /// pattern-level failures (an empty input, a format-only pattern) abort
    /// the search.
    #[must_use]
    pub fn continue_with_multiple(&self) -> bool {
        !matches!(
            self.kind,
            ParseErrorKind::ValueStringEmpty | ParseErrorKind::FormatOnlyPattern
        )
    }

    /// Re-type a failure produced while parsing one value kind as a failure
    /// of another kind. The error carries no type information, so this is a
    /// move.
    #[must_use]
    pub fn convert(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_rendering_is_deferred_to_display() {
        let err = ParseError::new(
            ParseErrorKind::FieldValueOutOfRange {
                value: 29,
                field: 'd',
            },
            8,
        );
        assert_eq!(
            err.to_string(),
            "the value 29 is out of range for the field \"d\" (at byte 8)"
        );
    }

    #[test]
    fn multi_pattern_continuation() {
        let value_level = ParseError::new(ParseErrorKind::MismatchedCharacter { expected: ':' }, 2);
        assert!(value_level.continue_with_multiple());

        let pattern_level = ParseError::new(ParseErrorKind::ValueStringEmpty, 0);
        assert!(!pattern_level.continue_with_multiple());

        let format_only = ParseError::new(ParseErrorKind::FormatOnlyPattern, 0);
        assert!(!format_only.continue_with_multiple());
    }
}
