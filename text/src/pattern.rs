// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The public pattern handle.
//!
//! A [`Pattern`] pairs a compiled step program with the pattern text, locale
//! and template value it was compiled against. It is immutable: the
//! `with_*` methods compile a fresh pattern and leave the original
//! untouched, so handles can be shared freely across threads.

use std::fmt;
use std::sync::Arc;

use crate::cursor::ValueCursor;
use crate::error::{ParseError, ParseErrorKind, ParseResult, PatternError};
use crate::locale::Locale;

/// A compiled pattern body: the ordered parse and format steps behind a
/// [`Pattern`] handle.
pub(crate) trait PatternImpl<T>: Send + Sync {
    /// Parse the complete input.
    fn parse(&self, text: &str) -> ParseResult<T>;

    /// Parse from the cursor position, leaving the cursor after the matched
    /// region. Embedded patterns parse this way.
    fn parse_partial(&self, cursor: &mut ValueCursor<'_>) -> ParseResult<T>;

    /// Append the formatted value.
    fn append_format(&self, value: &T, out: &mut String);
}

/// Compiles pattern text into a pattern body. Each value kind supplies one
/// of these; the handle keeps it so the `with_*` variants can recompile.
pub(crate) type PatternFactory<T> =
    Arc<dyn Fn(&str, &Locale, &T) -> Result<Arc<dyn PatternImpl<T>>, PatternError> + Send + Sync>;

/// A compiled, reusable text pattern for values of kind `T`.
///
/// Create one through the kind-specific constructors (for example
/// [`DatePattern::create`](crate::DatePattern::create)), then use
/// [`Pattern::parse`] and [`Pattern::format`] any number of times, from any
/// number of threads.
pub struct Pattern<T> {
    text: Arc<str>,
    locale: Locale,
    template: T,
    inner: Arc<dyn PatternImpl<T>>,
    factory: PatternFactory<T>,
}

impl<T: Clone> Pattern<T> {
    pub(crate) fn from_parts(
        text: &str,
        locale: Locale,
        template: T,
        factory: PatternFactory<T>,
    ) -> Result<Self, PatternError> {
        let inner = factory(text, &locale, &template)?;
        Ok(Self {
            text: Arc::from(text),
            locale,
            template,
            inner,
            factory,
        })
    }

    /// The pattern text this handle was compiled from.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The locale this handle was compiled against.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The template value supplying unassigned fields.
    #[must_use]
    pub fn template(&self) -> &T {
        &self.template
    }

    /// Parse `text` into a value. Never panics; every failure is returned.
    pub fn parse(&self, text: &str) -> ParseResult<T> {
        if text.is_empty() {
            return Err(ParseError::new(ParseErrorKind::ValueStringEmpty, 0));
        }
        self.inner.parse(text)
    }

    /// Format `value` as a new string.
    #[must_use]
    pub fn format(&self, value: &T) -> String {
        let mut out = String::new();
        self.inner.append_format(value, &mut out);
        out
    }

    /// Append the formatted `value` to `out`, returning `out` for chaining.
    pub fn append_format<'a>(&self, value: &T, out: &'a mut String) -> &'a mut String {
        self.inner.append_format(value, out);
        out
    }

    /// Recompile with different pattern text.
    ///
    /// # Errors
    ///
    /// Fails when the new text is not a valid pattern.
    pub fn with_pattern_text(&self, text: &str) -> Result<Self, PatternError> {
        Self::from_parts(
            text,
            self.locale.clone(),
            self.template.clone(),
            Arc::clone(&self.factory),
        )
    }

    /// Recompile against a different locale.
    ///
    /// # Errors
    ///
    /// Fails when a locale-supplied canonical pattern is invalid for this
    /// pattern text.
    pub fn with_locale(&self, locale: Locale) -> Result<Self, PatternError> {
        Self::from_parts(
            &self.text,
            locale,
            self.template.clone(),
            Arc::clone(&self.factory),
        )
    }

    /// Recompile with a different template value.
    ///
    /// # Errors
    ///
    /// Fails when the pattern text no longer compiles (it was compiled
    /// before, so this is effectively infallible).
    pub fn with_template(&self, template: T) -> Result<Self, PatternError> {
        Self::from_parts(
            &self.text,
            self.locale.clone(),
            template,
            Arc::clone(&self.factory),
        )
    }
}

impl<T: Clone> Clone for Pattern<T> {
    fn clone(&self) -> Self {
        Self {
            text: Arc::clone(&self.text),
            locale: self.locale.clone(),
            template: self.template.clone(),
            inner: Arc::clone(&self.inner),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("text", &self.text)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

/// An ordered list of patterns tried in turn.
///
/// Parsing attempts each pattern; the first success wins. A failure whose
/// [`ParseError::continue_with_multiple`] flag is unset aborts the search.
/// Formatting always uses the first pattern.
#[derive(Debug, Clone)]
pub struct PatternSet<T> {
    patterns: Vec<Pattern<T>>,
}

impl<T: Clone> PatternSet<T> {
    /// Build a set from the patterns to try, in order. An empty set fails
    /// every parse with [`ParseErrorKind::NoMatchingFormat`].
    #[must_use]
    pub fn new(patterns: Vec<Pattern<T>>) -> Self {
        Self { patterns }
    }

    /// The patterns in trial order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern<T>] {
        &self.patterns
    }

    /// Parse `text` with the first matching pattern.
    pub fn parse(&self, text: &str) -> ParseResult<T> {
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

    /// Format with the first pattern of the set.
    #[must_use]
    pub fn format(&self, value: &T) -> String {
        self.patterns
            .first()
            .map(|pattern| pattern.format(value))
            .unwrap_or_default()
    }
}
