//! Module containing error definitions for parsing, checking and formatting.

use crate::{Identifier, StaticVec};
use std::fmt;

/// A location (line number + character position) in message source text.
///
/// Lines are 1-based; the character position is 0-based from the start of
/// the line. Line 0 means "no position".
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    line: u32,
    pos: u32,
}

impl Position {
    /// A [`Position`] representing no position.
    pub const NONE: Self = Self { line: 0, pos: 0 };
    /// A [`Position`] representing the first character of the source.
    pub const START: Self = Self { line: 1, pos: 0 };

    /// Create a new [`Position`]. `line` is 1-based and must not be zero.
    #[inline(always)]
    #[must_use]
    pub fn new(line: u32, pos: u32) -> Self {
        assert!(line != 0, "line cannot be zero");
        Self { line, pos }
    }
    /// The line number, or [`None`] if this is [`Position::NONE`].
    #[inline(always)]
    #[must_use]
    pub const fn line(self) -> Option<u32> {
        if self.line == 0 {
            None
        } else {
            Some(self.line)
        }
    }
    /// The character offset from the start of the line.
    #[inline(always)]
    #[must_use]
    pub const fn position(self) -> u32 {
        self.pos
    }
    /// Is there no position?
    #[inline(always)]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "line {}, position {}", self.line, self.pos)
        }
    }
}

/// Kinds of error that are determined by the message source alone,
/// independently of any arguments.
#[derive(Debug, Clone, Eq, PartialEq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum StaticErrorKind {
    /// The message source does not match the MessageFormat 2.0 grammar.
    #[error("syntax error in message source")]
    SyntaxError,
    /// An annotation carries two options with the same name.
    /// Wrapped value is the duplicated name.
    #[error("duplicate option name '{0}'")]
    DuplicateOptionName(Identifier),
    /// A variant's key list length differs from the number of selectors.
    #[error("variant key list does not match the selector count")]
    VariantKeyMismatch,
    /// No variant consists entirely of wildcard keys.
    #[error("no variant matches all values (missing '*' variant)")]
    NonexhaustivePattern,
    /// A selector has no annotation, directly or through declarations.
    #[error("selector is missing an annotation")]
    MissingSelectorAnnotation,
}

/// A static (syntax or data-model) error, with the source position where it
/// was detected. Data-model errors carry [`Position::NONE`].
#[derive(Debug, Clone, Eq, PartialEq, Hash, thiserror::Error)]
pub struct StaticError {
    kind: StaticErrorKind,
    position: Position,
}

impl StaticError {
    #[inline(always)]
    #[must_use]
    pub(crate) const fn new(kind: StaticErrorKind, position: Position) -> Self {
        Self { kind, position }
    }
    /// The kind of error.
    #[inline(always)]
    #[must_use]
    pub const fn kind(&self) -> &StaticErrorKind {
        &self.kind
    }
    /// Where the error was detected, if known.
    #[inline(always)]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for StaticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)?;
        if !self.position.is_none() {
            write!(f, " ({})", self.position)?;
        }
        Ok(())
    }
}

/// Kinds of error that are determined by the arguments and the function
/// registry, not by the message source alone.
#[derive(Debug, Clone, Eq, PartialEq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum DynamicErrorKind {
    /// A variable has no binding, neither local nor in the arguments.
    /// Wrapped value is the variable name, without the `$` sigil.
    #[error("unresolved variable '${0}'")]
    UnresolvedVariable(Identifier),
    /// An annotation names a function the registry does not know.
    /// Wrapped value is the sigil-prefixed function name.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    /// A selector function failed, or a formatter was used to select.
    #[error("selector '{0}' failed")]
    SelectorError(String),
    /// A formatter function failed, or a selector was used to format.
    #[error("formatting with '{0}' failed")]
    FormattingError(String),
    /// A reserved annotation was formatted. Reserved syntax is valid but
    /// has no semantics, so formatting it is always an error.
    #[error("reserved annotation has no formatting semantics")]
    ReservedError,
}

/// A dynamic (resolution, selection or formatting) error.
#[derive(Debug, Clone, Eq, PartialEq, Hash, thiserror::Error)]
#[error("{kind}")]
pub struct DynamicError {
    kind: DynamicErrorKind,
}

impl DynamicError {
    #[inline(always)]
    #[must_use]
    pub(crate) const fn new(kind: DynamicErrorKind) -> Self {
        Self { kind }
    }
    /// The kind of error.
    #[inline(always)]
    #[must_use]
    pub const fn kind(&self) -> &DynamicErrorKind {
        &self.kind
    }
}

/// The status of a formatting call: its first static error if any,
/// otherwise its first dynamic error.
#[derive(Debug, Clone, Eq, PartialEq, Hash, thiserror::Error)]
pub enum MessageError {
    /// A syntax or data-model error.
    #[error(transparent)]
    Static(StaticError),
    /// A resolution, selection or formatting error.
    #[error(transparent)]
    Dynamic(DynamicError),
}

impl MessageError {
    /// Is this a static (syntax or data-model) error?
    #[inline(always)]
    #[must_use]
    pub const fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

/// Accumulator for static errors, filled by the parser and the checker and
/// kept for the lifetime of a compiled message.
///
/// Only the first syntax error is recorded; data-model errors accumulate.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StaticErrors {
    errors: StaticVec<StaticError>,
    syntax_error: bool,
}

impl StaticErrors {
    #[inline(always)]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }
    /// Record a syntax error at `position`, unless one was recorded already.
    pub(crate) fn add_syntax_error(&mut self, position: Position) {
        if self.syntax_error {
            return;
        }
        self.syntax_error = true;
        tracing::trace!(%position, "syntax error");
        self.errors
            .push(StaticError::new(StaticErrorKind::SyntaxError, position));
    }
    /// Record a data-model error.
    pub(crate) fn add(&mut self, kind: StaticErrorKind) {
        debug_assert!(!matches!(kind, StaticErrorKind::SyntaxError));
        self.errors.push(StaticError::new(kind, Position::NONE));
    }
    /// Has a syntax error been recorded?
    #[inline(always)]
    #[must_use]
    pub fn has_syntax_error(&self) -> bool {
        self.syntax_error
    }
    /// Has any static error been recorded?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
    /// Number of recorded errors.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }
    /// The first recorded error, in source order.
    #[inline(always)]
    #[must_use]
    pub fn first(&self) -> Option<&StaticError> {
        self.errors.first()
    }
    /// Iterate over the recorded errors in the order they were detected.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &StaticError> {
        self.errors.iter()
    }
}

/// Per-call error accumulator: the compiled message's static errors plus
/// any dynamic errors recorded while formatting.
#[derive(Debug, Clone)]
pub(crate) struct DynamicErrors {
    statics: StaticErrors,
    dynamics: StaticVec<DynamicError>,
}

impl DynamicErrors {
    #[inline(always)]
    #[must_use]
    pub fn new(statics: StaticErrors) -> Self {
        Self {
            statics,
            dynamics: StaticVec::new(),
        }
    }

    fn add(&mut self, kind: DynamicErrorKind) {
        tracing::debug!(error = %kind, "dynamic error");
        self.dynamics.push(DynamicError::new(kind));
    }

    pub fn set_unresolved_variable(&mut self, name: &str) {
        self.add(DynamicErrorKind::UnresolvedVariable(Identifier::from(name)));
    }
    pub fn set_unknown_function(&mut self, name: impl Into<String>) {
        self.add(DynamicErrorKind::UnknownFunction(name.into()));
    }
    pub fn set_selector_error(&mut self, name: impl Into<String>) {
        self.add(DynamicErrorKind::SelectorError(name.into()));
    }
    pub fn set_formatting_error(&mut self, name: impl Into<String>) {
        self.add(DynamicErrorKind::FormattingError(name.into()));
    }
    pub fn set_reserved_error(&mut self) {
        self.add(DynamicErrorKind::ReservedError);
    }
    /// Record a missing selector annotation detected at selection time.
    /// This is a static-class error even when found dynamically, so it is
    /// appended to the static collection.
    pub fn set_missing_selector_annotation(&mut self) {
        self.statics.add(StaticErrorKind::MissingSelectorAnnotation);
    }

    /// Has any static (syntax or data-model) error been recorded?
    #[inline(always)]
    #[must_use]
    pub fn has_static_error(&self) -> bool {
        !self.statics.is_empty()
    }
    /// The call's status: the first static error if any, else the first
    /// dynamic error, else [`None`].
    #[must_use]
    pub fn status(&self) -> Option<MessageError> {
        if let Some(e) = self.statics.first() {
            return Some(MessageError::Static(e.clone()));
        }
        self.dynamics.first().cloned().map(MessageError::Dynamic)
    }
}
