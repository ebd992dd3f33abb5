// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Alternative sub-patterns behind one pattern.
//!
//! A composite holds an ordered list of sub-patterns plus a format-side
//! selector. Parsing tries each sub-pattern in order, honoring the
//! continue-with-multiple flag of each failure; formatting asks the selector
//! which sub-pattern fits the value (for offsets, the least significant
//! non-zero component).

use std::sync::Arc;

use crate::cursor::ValueCursor;
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::pattern::PatternImpl;

pub(crate) struct CompositePattern<T> {
    patterns: Vec<Arc<dyn PatternImpl<T>>>,
    selector: Box<dyn Fn(&T) -> usize + Send + Sync>,
}

impl<T> CompositePattern<T> {
    /// Build a composite. `selector` returns the index of the sub-pattern
    /// to format with; it is clamped to the list.
    pub(crate) fn new(
        patterns: Vec<Arc<dyn PatternImpl<T>>>,
        selector: impl Fn(&T) -> usize + Send + Sync + 'static,
    ) -> Self {
        debug_assert!(!patterns.is_empty());
        Self {
            patterns,
            selector: Box::new(selector),
        }
    }
}

impl<T> PatternImpl<T> for CompositePattern<T> {
    fn parse(&self, text: &str) -> ParseResult<T> {
        let mut last_retriable: Option<ParseError> = None;
        for pattern in &self.patterns {
            match pattern.parse(text) {
                Ok(value) => return Ok(value),
                Err(err) if err.continue_with_multiple() => last_retriable = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last_retriable
            .unwrap_or_else(|| ParseError::new(ParseErrorKind::NoMatchingFormat, 0)))
    }

    fn parse_partial(&self, cursor: &mut ValueCursor<'_>) -> ParseResult<T> {
        let start = cursor.position();
        let mut last_retriable: Option<ParseError> = None;
        for pattern in &self.patterns {
            cursor.set_position(start);
            match pattern.parse_partial(cursor) {
                Ok(value) => return Ok(value),
                Err(err) if err.continue_with_multiple() => last_retriable = Some(err),
                Err(err) => return Err(err),
            }
        }
        cursor.set_position(start);
        Err(last_retriable
            .unwrap_or_else(|| ParseError::new(ParseErrorKind::NoMatchingFormat, start)))
    }

    fn append_format(&self, value: &T, out: &mut String) {
        let index = (self.selector)(value).min(self.patterns.len() - 1);
        self.patterns[index].append_format(value, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts exactly one specific character, formats it back.
    struct Exact(char);

    impl PatternImpl<char> for Exact {
        fn parse(&self, text: &str) -> ParseResult<char> {
            let mut cursor = ValueCursor::new(text);
            let value = self.parse_partial(&mut cursor)?;
            if cursor.is_exhausted() {
                Ok(value)
            } else {
                Err(ParseError::new(
                    ParseErrorKind::ExtraValueCharacters {
                        remainder: cursor.remainder().to_string(),
                    },
                    cursor.position(),
                ))
            }
        }

        fn parse_partial(&self, cursor: &mut ValueCursor<'_>) -> ParseResult<char> {
            let position = cursor.position();
            if cursor.match_char(self.0) {
                Ok(self.0)
            } else {
                Err(ParseError::new(
                    ParseErrorKind::MismatchedCharacter { expected: self.0 },
                    position,
                ))
            }
        }

        fn append_format(&self, _value: &char, out: &mut String) {
            out.push(self.0);
        }
    }

    fn composite() -> CompositePattern<char> {
        CompositePattern::new(
            vec![Arc::new(Exact('a')), Arc::new(Exact('b'))],
            |value: &char| usize::from(*value == 'b'),
        )
    }

    #[test]
    fn parse_tries_in_order() {
        let pattern = composite();
        assert_eq!(pattern.parse("a").unwrap(), 'a');
        assert_eq!(pattern.parse("b").unwrap(), 'b');
        // The reported failure is the last retriable one.
        let err = pattern.parse("c").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MismatchedCharacter { expected: 'b' }
        );
    }

    #[test]
    fn partial_parse_rewinds_between_attempts() {
        let pattern = composite();
        let mut cursor = ValueCursor::new("bX");
        assert_eq!(pattern.parse_partial(&mut cursor).unwrap(), 'b');
        assert_eq!(cursor.remainder(), "X");
    }

    #[test]
    fn format_uses_the_selector() {
        let pattern = composite();
        let mut out = String::new();
        pattern.append_format(&'b', &mut out);
        assert_eq!(out, "b");
    }
}
