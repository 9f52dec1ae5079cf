//! # messageformat2 - MessageFormat 2.0 for Rust
//!
//! An implementation of the MessageFormat 2.0 message syntax: a parser that
//! turns message source text into an immutable data model, a checker that
//! enforces the data-model invariants, a serializer that renders a canonical
//! form, and a formatter that evaluates a message against named arguments
//! using a registry of formatting and selection functions.
//!
//! # A Quick Example
//!
//! ```
//! use messageformat2::{MessageArguments, MessageFormatter};
//!
//! let formatter = MessageFormatter::builder()
//!     .locale("en-US")
//!     .source("{Hello, {$userName}!}")
//!     .build();
//!
//! let mut args = MessageArguments::new();
//! args.set("userName", "John");
//!
//! let result = formatter.format_to_string(&args);
//! assert_eq!(result.as_str(), "Hello, John!");
//! assert!(result.error().is_none());
//! ```
//!
//! Formatting is total: a message that fails to parse, or fails during
//! evaluation, still formats to a string with the failed placeholders
//! replaced by their fallback forms, and the first error is reported
//! separately as the call's status.

// Internal modules

mod ast;
pub mod builtins;
mod checker;
mod engine;
mod engine_api;
mod env;
mod error;
mod fn_native;
mod fn_register;
mod parse;
mod serialize;
mod value;

pub use ast::{
    Binding, Expression, ExpressionBuilder, FunctionName, Key, Literal, Message, MessageBody,
    Operand, Operator, OptionMap, Pattern, PatternPart, Reserved, SelectorKeys, Sigil, Variant,
    VariableName,
};
pub use engine::MessageFormatter;
pub use engine_api::{FormattedMessage, MessageFormatterBuilder, MessagePart};
pub use error::{
    DynamicError, DynamicErrorKind, MessageError, Position, StaticError, StaticErrorKind,
    StaticErrors,
};
pub use fn_native::{
    Formatter, FormatterFactory, FunctionError, Locale, ResolvedOptions, Selector, SelectorFactory,
    SendSync, Shared,
};
pub use fn_register::FunctionRegistry;
pub use value::{
    FormattedNumber, FormattedPlaceholder, FormattedValue, MessageArguments, Opaque, OpaqueValue,
    Value,
};

/// An identifier (variable name, function name, option name).
/// [`SmartString`](https://crates.io/crates/smartstring) is used because
/// identifiers are almost always short enough to be stored inline.
pub(crate) type Identifier = smartstring::SmartString<smartstring::LazyCompact>;

/// Alias to [`smallvec::SmallVec<[T; 4]>`]: a [`Vec`] backed by a small,
/// inline, fixed-size array when there are ≤ 4 items stored.
///
/// Most messages have fewer than 5 declarations, selectors, keys per
/// variant, and options per annotation, so these lists normally never touch
/// the heap.
pub(crate) type StaticVec<T> = smallvec::SmallVec<[T; 4]>;

/// U+FFFD REPLACEMENT CHARACTER, the fallback of last resort.
pub(crate) const REPLACEMENT: char = '\u{FFFD}';
