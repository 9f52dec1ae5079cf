//! Module defining argument values and the intermediate values used while
//! formatting.

use crate::fn_native::{Locale, SendSync, Shared};
use crate::{Identifier, REPLACEMENT};
use chrono::{DateTime, Datelike, Timelike, Utc};
use rust_decimal::Decimal;
use std::any::Any;
use std::fmt;

/// Trait for opaque argument payloads, so custom functions can recognize
/// their own types by downcasting.
pub trait Opaque: Any + SendSync {
    /// View as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + SendSync> Opaque for T {
    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An opaque tagged argument payload.
///
/// The tag identifies the payload's type by convention; a custom function
/// checks the tag (or just tries a downcast) before using the payload.
#[derive(Clone)]
pub struct OpaqueValue {
    tag: Identifier,
    payload: Shared<dyn Opaque>,
}

impl OpaqueValue {
    /// Wrap `payload` with `tag`.
    #[inline(always)]
    #[must_use]
    pub fn new(tag: impl AsRef<str>, payload: impl Opaque) -> Self {
        Self {
            tag: Identifier::from(tag.as_ref()),
            payload: Shared::new(payload),
        }
    }
    /// The tag.
    #[inline(always)]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
    /// Downcast the payload to a concrete type.
    #[inline(always)]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueValue")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl PartialEq for OpaqueValue {
    /// Two opaque values are equal iff they share the same payload.
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && Shared::ptr_eq(&self.payload, &other.payload)
    }
}

/// A neutral argument value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A string.
    String(String),
    /// A 64-bit integer.
    Int(i64),
    /// A double-precision float.
    Double(f64),
    /// An arbitrary-precision decimal.
    Decimal(Decimal),
    /// A date, as an instant.
    Date(DateTime<Utc>),
    /// An array of values.
    Array(Vec<Value>),
    /// An opaque tagged object.
    Object(OpaqueValue),
}

impl Value {
    /// Is this the null value?
    #[inline(always)]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
    /// Is this a numeric value (int, double or decimal)?
    #[inline(always)]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Double(_) | Self::Decimal(_))
    }
    /// The string contents, if this is a string.
    #[inline(always)]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    #[inline(always)]
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl From<String> for Value {
    #[inline(always)]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
impl From<i64> for Value {
    #[inline(always)]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
impl From<i32> for Value {
    #[inline(always)]
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}
impl From<f64> for Value {
    #[inline(always)]
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}
impl From<Decimal> for Value {
    #[inline(always)]
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}
impl From<DateTime<Utc>> for Value {
    #[inline(always)]
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}
impl From<Vec<Value>> for Value {
    #[inline(always)]
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}
impl From<OpaqueValue> for Value {
    #[inline(always)]
    fn from(value: OpaqueValue) -> Self {
        Self::Object(value)
    }
}

/// The named arguments of a formatting call.
///
/// Names are identifiers without the `$` sigil. Arguments are borrowed for
/// the duration of a call and never mutated by it.
///
/// # Example
///
/// ```
/// use messageformat2::MessageArguments;
///
/// let mut args = MessageArguments::new();
/// args.set("count", 3_i64).set("name", "Alice");
/// assert!(args.contains("count"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageArguments(ahash::AHashMap<Identifier, Value>);

impl MessageArguments {
    /// Create an empty argument map.
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Bind `name` to `value`, replacing any previous binding.
    #[inline(always)]
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(Identifier::from(name.as_ref()), value.into());
        self
    }
    /// The value bound to `name`, if any.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
    /// Is `name` bound?
    #[inline(always)]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    /// Number of bound arguments.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Are there no arguments?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for MessageArguments {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.set(k, v);
        }
        args
    }
}

/// A formatted number: the numeric value together with its rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedNumber {
    value: Decimal,
    text: String,
}

impl FormattedNumber {
    /// Create a new [`FormattedNumber`].
    #[inline(always)]
    #[must_use]
    pub fn new(value: Decimal, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }
    /// The numeric value.
    #[inline(always)]
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }
    /// The rendered form.
    #[inline(always)]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// The output of a formatting function: a string, or a formatted number.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedValue {
    /// Formatted text.
    Text(String),
    /// A formatted number.
    Number(FormattedNumber),
}

impl FormattedValue {
    /// The rendered form.
    #[inline(always)]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.as_str(),
        }
    }
}

impl From<String> for FormattedValue {
    #[inline(always)]
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The intermediate value of an expression while formatting.
///
/// Every non-null placeholder knows its fallback string before any function
/// runs; any downstream failure yields that fallback, rendered into the
/// output as `{`fallback`}`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedPlaceholder {
    /// The absent argument of an annotation-only expression.
    Null,
    /// Evaluation failed; the output shows the fallback string.
    Fallback(String),
    /// The input is known but no formatter has run yet.
    Unevaluated {
        /// The source value.
        source: Value,
        /// The fallback string, in case a later step fails.
        fallback: String,
    },
    /// A formatter has produced output.
    Evaluated {
        /// The source value the formatter consumed.
        source: Value,
        /// The fallback string, in case a later step fails.
        fallback: String,
        /// The formatter's output.
        value: FormattedValue,
    },
}

impl FormattedPlaceholder {
    /// An unevaluated placeholder.
    #[inline(always)]
    #[must_use]
    pub fn unevaluated(source: Value, fallback: impl Into<String>) -> Self {
        Self::Unevaluated {
            source,
            fallback: fallback.into(),
        }
    }
    /// A fallback placeholder.
    #[inline(always)]
    #[must_use]
    pub fn fallback(fallback: impl Into<String>) -> Self {
        Self::Fallback(fallback.into())
    }

    /// Is this a fallback?
    #[inline(always)]
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
    /// Is this the null operand?
    #[inline(always)]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The fallback string. U+FFFD when there is no better source.
    #[must_use]
    pub fn fallback_str(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Null => std::borrow::Cow::Owned(REPLACEMENT.to_string()),
            Self::Fallback(f)
            | Self::Unevaluated { fallback: f, .. }
            | Self::Evaluated { fallback: f, .. } => std::borrow::Cow::Borrowed(f),
        }
    }

    /// The source value, if the input is known.
    #[inline(always)]
    #[must_use]
    pub const fn source(&self) -> Option<&Value> {
        match self {
            Self::Unevaluated { source, .. } | Self::Evaluated { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The formatted output, if a formatter has run.
    #[inline(always)]
    #[must_use]
    pub const fn formatted(&self) -> Option<&FormattedValue> {
        match self {
            Self::Evaluated { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Apply the default formatting rules to a value that was never passed
/// through an explicit formatter.
///
/// Strings format to themselves, integers and decimals to their plain
/// decimal form, and dates to the short date-time form. Arrays and opaque
/// objects have no default formatter; formatting them collapses to the
/// placeholder's fallback.
pub(crate) fn default_format(value: &Value, _locale: &Locale) -> Result<String, ()> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Double(d) => Ok(d.to_string()),
        Value::Decimal(d) => Ok(d.normalize().to_string()),
        Value::Date(d) => Ok(default_format_date(d)),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(()),
    }
}

/// The short/short date-time form, e.g. `1/2/25, 3:04 PM`.
pub(crate) fn default_format_date(date: &DateTime<Utc>) -> String {
    let (hour12, am) = hour12(date.hour());
    format!(
        "{}/{}/{:02}, {}:{:02} {}",
        date.month(),
        date.day(),
        date.year() % 100,
        hour12,
        date.minute(),
        if am { "AM" } else { "PM" }
    )
}

/// Convert a 24-hour value to (12-hour value, is-AM).
pub(crate) fn hour12(hour: u32) -> (u32, bool) {
    let am = hour < 12;
    let h = hour % 12;
    (if h == 0 { 12 } else { h }, am)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn opaque_downcast() {
        struct Person {
            age: i64,
        }
        let value = OpaqueValue::new("person", Person { age: 42 });
        assert_eq!(value.tag(), "person");
        assert_eq!(value.downcast_ref::<Person>().unwrap().age, 42);
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn default_formats() {
        let locale = Locale::default();
        assert_eq!(default_format(&Value::Int(42), &locale).unwrap(), "42");
        assert_eq!(
            default_format(&Value::from("hi"), &locale).unwrap(),
            "hi"
        );
        assert_eq!(
            default_format(&Value::Decimal("1.50".parse().unwrap()), &locale).unwrap(),
            "1.5"
        );
        assert!(default_format(&Value::Array(vec![]), &locale).is_err());
    }

    #[test]
    fn default_date_format_is_short_short() {
        let date = Utc.with_ymd_and_hms(2025, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(default_format_date(&date), "1/2/25, 3:04 PM");
    }

    #[test]
    fn placeholder_fallback_str() {
        assert_eq!(FormattedPlaceholder::Null.fallback_str(), "\u{FFFD}");
        let p = FormattedPlaceholder::unevaluated(Value::Int(1), "$n");
        assert_eq!(p.fallback_str(), "$n");
    }
}
