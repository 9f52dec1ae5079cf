//! Module containing the function registry: the mapping from function
//! names to formatter and selector factories.

use crate::ast::FunctionName;
use crate::builtins;
use crate::fn_native::{
    FnFormatterFactory, FnSelectorFactory, Formatter, FormatterFactory, Locale, Selector,
    SelectorFactory, SendSync, Shared,
};

/// A registry of formatting and selection functions.
///
/// A name may be registered with either capability or both; the registry
/// tracks the roles separately. The standard registry (see
/// [`FunctionRegistry::standard`]) covers the built-in functions; a custom
/// registry can be layered over it when building a
/// [`MessageFormatter`][crate::MessageFormatter], in which case lookup
/// consults the custom registry first.
///
/// # Example
///
/// ```
/// use messageformat2::{
///     FormattedPlaceholder, FormattedValue, Formatter, FunctionError, FunctionRegistry, Locale,
///     ResolvedOptions, Shared,
/// };
///
/// struct Shout;
///
/// impl Formatter for Shout {
///     fn format(
///         &self,
///         arg: FormattedPlaceholder,
///         _options: &ResolvedOptions,
///     ) -> Result<FormattedValue, FunctionError> {
///         let text = match arg.source() {
///             Some(value) => value.as_str().unwrap_or_default().to_uppercase(),
///             None => String::new(),
///         };
///         Ok(FormattedValue::Text(text))
///     }
/// }
///
/// let mut registry = FunctionRegistry::new();
/// registry.register_formatter_fn("shout", |_: &Locale| {
///     Shared::new(Shout) as Shared<dyn Formatter>
/// });
/// assert!(registry.has_formatter(&"shout".into()));
/// ```
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    formatters: ahash::AHashMap<FunctionName, Shared<dyn FormatterFactory>>,
    selectors: ahash::AHashMap<FunctionName, Shared<dyn SelectorFactory>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard registry: `number`, `integer`, `datetime`, `date`,
    /// `time` and `string` formatters, and `number`, `integer`, `plural`
    /// and `string` selectors.
    #[must_use]
    pub fn standard() -> Self {
        builtins::standard_registry()
    }

    /// Register a formatter factory under `name`, replacing any previous
    /// formatter registration for that name.
    pub fn register_formatter(
        &mut self,
        name: impl Into<FunctionName>,
        factory: impl FormatterFactory + 'static,
    ) -> &mut Self {
        self.formatters.insert(name.into(), Shared::new(factory));
        self
    }

    /// Register a selector factory under `name`, replacing any previous
    /// selector registration for that name.
    pub fn register_selector(
        &mut self,
        name: impl Into<FunctionName>,
        factory: impl SelectorFactory + 'static,
    ) -> &mut Self {
        self.selectors.insert(name.into(), Shared::new(factory));
        self
    }

    /// Register a formatter from a per-locale construction closure.
    pub fn register_formatter_fn<F>(&mut self, name: impl Into<FunctionName>, f: F) -> &mut Self
    where
        F: Fn(&Locale) -> Shared<dyn Formatter> + SendSync + 'static,
    {
        self.register_formatter(name, FnFormatterFactory(f))
    }

    /// Register a selector from a per-locale construction closure.
    pub fn register_selector_fn<F>(&mut self, name: impl Into<FunctionName>, f: F) -> &mut Self
    where
        F: Fn(&Locale) -> Shared<dyn Selector> + SendSync + 'static,
    {
        self.register_selector(name, FnSelectorFactory(f))
    }

    /// The formatter factory registered under `name`, if any.
    #[inline(always)]
    #[must_use]
    pub fn formatter(&self, name: &FunctionName) -> Option<&Shared<dyn FormatterFactory>> {
        self.formatters.get(name)
    }

    /// The selector factory registered under `name`, if any.
    #[inline(always)]
    #[must_use]
    pub fn selector(&self, name: &FunctionName) -> Option<&Shared<dyn SelectorFactory>> {
        self.selectors.get(name)
    }

    /// Is `name` registered as a formatter?
    #[inline(always)]
    #[must_use]
    pub fn has_formatter(&self, name: &FunctionName) -> bool {
        self.formatters.contains_key(name)
    }

    /// Is `name` registered as a selector?
    #[inline(always)]
    #[must_use]
    pub fn has_selector(&self, name: &FunctionName) -> bool {
        self.selectors.contains_key(name)
    }

    /// Is anything registered?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty() && self.selectors.is_empty()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = |map_keys: Vec<&FunctionName>| {
            let mut v: Vec<_> = map_keys.iter().map(|n| n.to_string()).collect();
            v.sort();
            v
        };
        f.debug_struct("FunctionRegistry")
            .field("formatters", &names(self.formatters.keys().collect()))
            .field("selectors", &names(self.selectors.keys().collect()))
            .finish()
    }
}
