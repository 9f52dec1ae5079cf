//! Module defining the interfaces to formatting and selection functions.

use crate::value::{FormattedPlaceholder, FormattedValue, Value};
use crate::Identifier;
use std::fmt;

/// Trait that maps to `Send + Sync` only under the `sync` feature.
#[cfg(feature = "sync")]
pub trait SendSync: Send + Sync {}
/// Trait that maps to `Send + Sync` only under the `sync` feature.
#[cfg(feature = "sync")]
impl<T: Send + Sync> SendSync for T {}

/// Trait that maps to `Send + Sync` only under the `sync` feature.
#[cfg(not(feature = "sync"))]
pub trait SendSync {}
/// Trait that maps to `Send + Sync` only under the `sync` feature.
#[cfg(not(feature = "sync"))]
impl<T> SendSync for T {}

/// Immutable reference-counted container.
#[cfg(not(feature = "sync"))]
pub use std::rc::Rc as Shared;
/// Immutable reference-counted container.
#[cfg(feature = "sync")]
pub use std::sync::Arc as Shared;

/// A locale tag, e.g. `en-US`.
///
/// The core does not interpret locale tags beyond passing them to function
/// factories; locale-sensitive behavior lives entirely behind the
/// [`Formatter`]/[`Selector`] boundary.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Locale(Identifier);

impl Locale {
    /// Create a new [`Locale`] from a tag.
    #[inline(always)]
    #[must_use]
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(Identifier::from(tag.as_ref()))
    }
    /// The locale tag.
    #[inline(always)]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// The primary language subtag (everything before the first `-` or `_`).
    #[must_use]
    pub fn language(&self) -> &str {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or(&self.0)
    }
}

impl Default for Locale {
    #[inline(always)]
    fn default() -> Self {
        Self::new("en")
    }
}

impl From<&str> for Locale {
    #[inline(always)]
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Locale {
    #[inline(always)]
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An error signaled by a function or function factory.
///
/// The engine records it as a formatting or selection error (depending on
/// which capability was being exercised) and substitutes the expression's
/// fallback.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct FunctionError(String);

impl FunctionError {
    /// Create a new [`FunctionError`] with a human-readable reason.
    #[inline(always)]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
    /// The reason.
    #[inline(always)]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The options of an annotation after resolution: every option operand has
/// been evaluated to a [`Value`], and options whose operands failed to
/// resolve have been dropped.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOptions(indexmap::IndexMap<Identifier, Value>);

impl ResolvedOptions {
    /// Create an empty option set.
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a resolved option. A later value for the same name replaces the
    /// earlier one (duplicates were already rejected at parse time; this
    /// path only matters for programmatically built options).
    #[inline(always)]
    pub fn insert(&mut self, name: impl AsRef<str>, value: Value) -> &mut Self {
        self.0.insert(Identifier::from(name.as_ref()), value);
        self
    }
    /// The value of the named option, if present.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
    /// The value of the named option as a string, if it is one.
    #[inline(always)]
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
    /// Number of options.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Are there no options?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Iterate over (name, value) pairs in source order.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The formatting capability of a function.
///
/// A function may implement [`Formatter`], [`Selector`], or both.
pub trait Formatter: SendSync {
    /// Format `arg` with `options`, producing a formatted value.
    ///
    /// `arg` is [`FormattedPlaceholder::Null`] for a standalone annotation.
    /// An error is recorded by the engine as a formatting error and the
    /// expression formats to its fallback.
    fn format(
        &self,
        arg: FormattedPlaceholder,
        options: &ResolvedOptions,
    ) -> Result<FormattedValue, FunctionError>;
}

/// The selection capability of a function.
pub trait Selector: SendSync {
    /// Return the subset of `keys` that match `arg`, best match first.
    ///
    /// The returned keys drive variant filtering and ordering; a key that
    /// is not in `keys` is ignored.
    fn select(
        &self,
        arg: &FormattedPlaceholder,
        options: &ResolvedOptions,
        keys: &[&str],
    ) -> Result<Vec<String>, FunctionError>;
}

/// Factory producing a locale-specific [`Formatter`].
pub trait FormatterFactory: SendSync {
    /// Create a formatter for `locale`.
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Formatter>, FunctionError>;
}

/// Factory producing a locale-specific [`Selector`].
pub trait SelectorFactory: SendSync {
    /// Create a selector for `locale`.
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Selector>, FunctionError>;
}

/// Adapter turning a closure into a [`FormatterFactory`].
pub(crate) struct FnFormatterFactory<F>(pub(crate) F);

impl<F> FormatterFactory for FnFormatterFactory<F>
where
    F: Fn(&Locale) -> Shared<dyn Formatter> + SendSync,
{
    #[inline(always)]
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Formatter>, FunctionError> {
        Ok((self.0)(locale))
    }
}

/// Adapter turning a closure into a [`SelectorFactory`].
pub(crate) struct FnSelectorFactory<F>(pub(crate) F);

impl<F> SelectorFactory for FnSelectorFactory<F>
where
    F: Fn(&Locale) -> Shared<dyn Selector> + SendSync,
{
    #[inline(always)]
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Selector>, FunctionError> {
        Ok((self.0)(locale))
    }
}
