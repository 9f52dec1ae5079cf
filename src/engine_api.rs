//! Module exposing the public construction and formatting API.

use crate::ast::Message;
use crate::engine::MessageFormatter;
use crate::error::{MessageError, StaticErrors};
use crate::fn_native::{Locale, Shared};
use crate::fn_register::FunctionRegistry;
use crate::value::MessageArguments;
use crate::{checker, parse, serialize, StaticVec};
use std::fmt;

/// One piece of formatted output, in order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MessagePart {
    /// A run of literal text from the pattern.
    Text(String),
    /// The formatted value of a placeholder.
    Placeholder(String),
    /// A placeholder that failed; the output shows `{fallback}`.
    Fallback(String),
}

/// The result of one formatting call: the output string, its parts, and
/// the call's status.
///
/// Formatting is total; inspect [`error`][FormattedMessage::error] to find
/// out whether fallbacks were substituted.
#[derive(Debug, Clone)]
pub struct FormattedMessage {
    output: String,
    parts: StaticVec<MessagePart>,
    error: Option<MessageError>,
}

impl FormattedMessage {
    /// The formatted output.
    #[inline(always)]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.output
    }
    /// Consume into the formatted output.
    #[inline(always)]
    #[must_use]
    pub fn into_string(self) -> String {
        self.output
    }
    /// The ordered sequence of output parts.
    #[inline(always)]
    #[must_use]
    pub fn parts(&self) -> &[MessagePart] {
        &self.parts
    }
    /// The call's status: the first static error if any, else the first
    /// dynamic error, else [`None`].
    #[inline(always)]
    #[must_use]
    pub const fn error(&self) -> Option<&MessageError> {
        self.error.as_ref()
    }
    /// Did the call complete without recording any error?
    #[inline(always)]
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}

/// Builder for [`MessageFormatter`].
#[derive(Default)]
pub struct MessageFormatterBuilder {
    locale: Locale,
    source: Option<String>,
    model: Option<Message>,
    custom: Option<Shared<FunctionRegistry>>,
}

impl MessageFormatterBuilder {
    /// Set the locale. Defaults to `en`. The locale is read once, here;
    /// it is passed to function factories on every call.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = locale.into();
        self
    }
    /// Set the message source text to compile.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
    /// Use an existing data model instead of parsing source text.
    #[must_use]
    pub fn data_model(mut self, model: Message) -> Self {
        self.model = Some(model);
        self
    }
    /// Layer a custom function registry over the standard one. Lookup
    /// consults the custom registry first.
    #[must_use]
    pub fn custom_registry(mut self, registry: FunctionRegistry) -> Self {
        self.custom = Some(Shared::new(registry));
        self
    }

    /// Compile the message.
    ///
    /// Building is total: syntax and data-model errors do not fail the
    /// build but are stored, shape the formatted output through fallbacks,
    /// and become the status of every formatting call.
    #[must_use]
    pub fn build(self) -> MessageFormatter {
        let (model, normalized, mut errors) = match (self.model, self.source) {
            (Some(model), _) => {
                let normalized = serialize::serialize(&model);
                (model, normalized, StaticErrors::new())
            }
            (None, source) => {
                let parsed = parse::parse(source.as_deref().unwrap_or(""));
                (parsed.message, parsed.normalized, parsed.errors)
            }
        };
        checker::check(&model, &mut errors);

        MessageFormatter {
            locale: self.locale,
            model,
            normalized,
            static_errors: errors,
            standard: FunctionRegistry::standard(),
            custom: self.custom,
        }
    }
}

impl MessageFormatter {
    /// Create a builder.
    #[inline(always)]
    #[must_use]
    pub fn builder() -> MessageFormatterBuilder {
        MessageFormatterBuilder::default()
    }

    /// Format the message against `arguments`.
    ///
    /// Always produces output; the first recorded static error (else the
    /// first dynamic error) is carried as the result's status, and failed
    /// placeholders appear in the output as `{fallback}`.
    #[must_use]
    pub fn format_to_string(&self, arguments: &MessageArguments) -> FormattedMessage {
        let (output, parts, errors) = self.run(arguments);
        FormattedMessage {
            output,
            parts,
            error: errors.status(),
        }
    }

    /// The compiled data model.
    #[inline(always)]
    #[must_use]
    pub fn data_model(&self) -> &Message {
        &self.model
    }

    /// The canonicalized source the parser accumulated: required
    /// whitespace collapsed to single spaces, optional whitespace dropped.
    #[inline(always)]
    #[must_use]
    pub fn normalized_input(&self) -> &str {
        &self.normalized
    }

    /// Render the data model back to canonical source text.
    #[must_use]
    pub fn canonical_form(&self) -> String {
        serialize::serialize(&self.model)
    }

    /// The locale the formatter was built with.
    #[inline(always)]
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The static errors detected at compile time.
    #[inline(always)]
    #[must_use]
    pub fn static_errors(&self) -> &StaticErrors {
        &self.static_errors
    }
}

impl fmt::Debug for MessageFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFormatter")
            .field("locale", &self.locale)
            .field("normalized", &self.normalized)
            .field("static_errors", &self.static_errors)
            .finish_non_exhaustive()
    }
}
