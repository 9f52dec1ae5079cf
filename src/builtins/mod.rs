//! Module containing the standard function library.
//!
//! The standard registry covers the built-in function names: `number`,
//! `integer`, `datetime`, `date`, `time` and `string` as formatters, and
//! `number`, `integer`, `plural` and `string` as selectors.
//!
//! The implementations here are locale-neutral: they render English forms
//! and use English plural rules, treating any other locale's plural
//! categories as `other`. Deployments that need full locale data overlay a
//! custom registry; the engine consults it before this one.

mod datetime;
mod number;
mod string;

pub use datetime::{DateTimeFactory, DateTimeKind};
pub use number::{NumberFactory, PluralFactory};
pub use string::StringFactory;

use crate::fn_register::FunctionRegistry;

/// Build the standard function registry.
#[must_use]
pub fn standard_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    registry
        .register_formatter("number", NumberFactory::number())
        .register_formatter("integer", NumberFactory::integer())
        .register_formatter("datetime", DateTimeFactory::new(DateTimeKind::DateTime))
        .register_formatter("date", DateTimeFactory::new(DateTimeKind::Date))
        .register_formatter("time", DateTimeFactory::new(DateTimeKind::Time))
        .register_formatter("string", StringFactory)
        .register_selector("number", NumberFactory::number())
        .register_selector("integer", NumberFactory::integer())
        .register_selector("plural", PluralFactory)
        .register_selector("string", StringFactory);
    registry
}
