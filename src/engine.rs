//! Module implementing the formatter/selector evaluation core.
//!
//! Errors are accumulated, never thrown: every expression evaluates to a
//! placeholder, and a failed placeholder carries a fallback string that is
//! rendered into the output as `{fallback}`. A single formatting call
//! therefore always produces a string, plus a separately reported status.

use crate::ast::{
    Expression, FunctionName, Literal, Message, MessageBody, Operand, Operator, OptionMap,
    Pattern, SelectorKeys, Variant, VariableName,
};
use crate::engine_api::MessagePart;
use crate::env::Environment;
use crate::error::{DynamicErrors, StaticErrors};
use crate::fn_native::{Locale, ResolvedOptions, Selector, Shared};
use crate::fn_register::FunctionRegistry;
use crate::value::{self, FormattedPlaceholder, Value};
use crate::{MessageArguments, StaticVec, REPLACEMENT};

/// A compiled message: the data model, the static errors detected while
/// compiling it, and the function registries used to evaluate it.
///
/// Construction is total; syntax and data-model errors are kept and
/// surfaced at format time, as the fallback rules require. A compiled
/// formatter is immutable, so formatting is referentially transparent in
/// the arguments and the registry.
pub struct MessageFormatter {
    pub(crate) locale: Locale,
    pub(crate) model: Message,
    pub(crate) normalized: String,
    pub(crate) static_errors: StaticErrors,
    pub(crate) standard: FunctionRegistry,
    pub(crate) custom: Option<Shared<FunctionRegistry>>,
}

/// Per-call state: the borrowed arguments and the error accumulator.
pub(crate) struct MessageContext<'c> {
    arguments: &'c MessageArguments,
    pub(crate) errors: DynamicErrors,
}

/// A selector expression resolved up to, but not including, the function
/// call: the selector function with its resolved options and argument, or
/// no function at all, in which case selection always fails ("nomatch").
struct ResolvedSelector {
    bundle: Option<SelectorBundle>,
    argument: FormattedPlaceholder,
}

struct SelectorBundle {
    name: FunctionName,
    function: Shared<dyn Selector>,
    options: ResolvedOptions,
}

/// A variant surviving filtering, carrying the mutable priority used by the
/// per-position stable sorts.
struct PrioritizedVariant<'m> {
    priority: usize,
    keys: &'m SelectorKeys,
    pattern: &'m Pattern,
}

impl MessageFormatter {
    /// Look up a formatter factory: custom registry first, then standard.
    fn lookup_formatter(
        &self,
        name: &FunctionName,
    ) -> Option<Shared<dyn crate::fn_native::FormatterFactory>> {
        if let Some(custom) = &self.custom {
            if let Some(factory) = custom.formatter(name) {
                return Some(factory.clone());
            }
        }
        self.standard.formatter(name).cloned()
    }

    fn lookup_selector(
        &self,
        name: &FunctionName,
    ) -> Option<Shared<dyn crate::fn_native::SelectorFactory>> {
        if let Some(custom) = &self.custom {
            if let Some(factory) = custom.selector(name) {
                return Some(factory.clone());
            }
        }
        self.standard.selector(name).cloned()
    }

    fn is_formatter(&self, name: &FunctionName) -> bool {
        self.custom
            .as_ref()
            .is_some_and(|c| c.has_formatter(name))
            || self.standard.has_formatter(name)
    }

    fn is_selector(&self, name: &FunctionName) -> bool {
        self.custom
            .as_ref()
            .is_some_and(|c| c.has_selector(name))
            || self.standard.has_selector(name)
    }

    // ---------- operands and expressions

    /// The value of a message argument. The fallback for a variable is its
    /// `$`-prefixed name.
    fn eval_argument(&self, var: &VariableName, value: &Value) -> FormattedPlaceholder {
        FormattedPlaceholder::unevaluated(value.clone(), var.to_string())
    }

    /// The result of formatting a literal is itself; its fallback is its
    /// quoted form.
    fn format_literal(&self, literal: &Literal) -> FormattedPlaceholder {
        FormattedPlaceholder::unevaluated(
            Value::String(literal.as_str().to_string()),
            literal.quoted_form(),
        )
    }

    fn format_operand<'m>(
        &'m self,
        env: &Environment<'m>,
        operand: &'m Operand,
        ctx: &mut MessageContext<'_>,
    ) -> FormattedPlaceholder {
        match operand {
            Operand::Null => FormattedPlaceholder::Null,
            Operand::Literal(literal) => self.format_literal(literal),
            Operand::Variable(var) => {
                // Locals shadow arguments. A local resolves by evaluating
                // its closure in the environment captured at the
                // declaration site; on failure the fallback is therefore
                // based on the declaration's right-hand side, not the use
                // site.
                if let Some(closure) = env.lookup(var.as_str()) {
                    let closure_env = closure.env().clone();
                    return self.format_expression(&closure_env, closure.expr(), ctx);
                }
                if let Some(value) = ctx.arguments.get(var.as_str()) {
                    return self.eval_argument(var, value);
                }
                ctx.errors.set_unresolved_variable(var.as_str());
                FormattedPlaceholder::fallback(var.to_string())
            }
        }
    }

    /// Resolve an option map eagerly. Options whose operands resolve to
    /// fallbacks are dropped, not propagated; only the expression's own
    /// operand short-circuits a call.
    fn resolve_options<'m>(
        &'m self,
        env: &Environment<'m>,
        options: &'m OptionMap,
        ctx: &mut MessageContext<'_>,
    ) -> ResolvedOptions {
        let mut resolved = ResolvedOptions::new();
        for (name, operand) in options.iter() {
            let placeholder = self.format_operand(env, operand, ctx);
            if placeholder.is_fallback() {
                tracing::debug!(option = name, "dropping option that failed to resolve");
                continue;
            }
            if let Some(source) = placeholder.source() {
                resolved.insert(name, source.clone());
            }
        }
        resolved
    }

    /// Invoke `name` as a formatter on an already-resolved argument.
    fn eval_formatter_call(
        &self,
        name: &FunctionName,
        argument: FormattedPlaceholder,
        options: ResolvedOptions,
        ctx: &mut MessageContext<'_>,
    ) -> FormattedPlaceholder {
        let fallback = if argument.is_null() {
            name.to_string()
        } else {
            argument.fallback_str().into_owned()
        };

        if let Some(factory) = self.lookup_formatter(name) {
            let formatter = match factory.create(&self.locale) {
                Ok(formatter) => formatter,
                Err(_) => {
                    ctx.errors.set_formatting_error(name.to_string());
                    return FormattedPlaceholder::fallback(fallback);
                }
            };
            let source = argument.source().cloned().unwrap_or_default();
            return match formatter.format(argument, &options) {
                Ok(value) => FormattedPlaceholder::Evaluated {
                    source,
                    fallback,
                    value,
                },
                Err(error) => {
                    tracing::debug!(function = %name, %error, "formatter failed");
                    ctx.errors.set_formatting_error(name.to_string());
                    FormattedPlaceholder::fallback(fallback)
                }
            };
        }
        if self.is_selector(name) {
            // Selector-only function in formatting position.
            ctx.errors.set_formatting_error(name.to_string());
        } else {
            ctx.errors.set_unknown_function(name.to_string());
        }
        FormattedPlaceholder::fallback(fallback)
    }

    /// Evaluate one expression to a placeholder, following the state
    /// machine: resolve the operand, resolve the options, look up and
    /// invoke the formatter, falling back at the first failure.
    pub(crate) fn format_expression<'m>(
        &'m self,
        env: &Environment<'m>,
        expr: &'m Expression,
        ctx: &mut MessageContext<'_>,
    ) -> FormattedPlaceholder {
        let operator = match expr.operator() {
            Some(Operator::Reserved(_)) => {
                ctx.errors.set_reserved_error();
                return FormattedPlaceholder::fallback(REPLACEMENT.to_string());
            }
            other => other,
        };

        let operand_value = self.format_operand(env, expr.operand(), ctx);
        let Some(Operator::Call { name, options }) = operator else {
            return operand_value;
        };

        // Options are resolved eagerly, before the fallback check on the
        // operand, so their own resolution errors are still recorded.
        let resolved = self.resolve_options(env, options, ctx);
        if operand_value.is_fallback() {
            return operand_value;
        }
        self.eval_formatter_call(name, operand_value, resolved, ctx)
    }

    /// Format a pattern, appending to `out` and `parts`.
    fn format_pattern<'m>(
        &'m self,
        env: &Environment<'m>,
        pattern: &'m Pattern,
        ctx: &mut MessageContext<'_>,
        out: &mut String,
        parts: &mut StaticVec<MessagePart>,
    ) {
        for part in pattern.parts() {
            match part {
                crate::ast::PatternPart::Text(text) => {
                    out.push_str(text);
                    parts.push(MessagePart::Text(text.clone()));
                }
                crate::ast::PatternPart::Expression(expr) => {
                    let placeholder = self.format_expression(env, expr, ctx);
                    self.append_placeholder(placeholder, ctx, out, parts);
                }
            }
        }
    }

    /// Force a placeholder to its string form, applying the default
    /// formatting rules to values no formatter has touched.
    fn append_placeholder(
        &self,
        placeholder: FormattedPlaceholder,
        ctx: &mut MessageContext<'_>,
        out: &mut String,
        parts: &mut StaticVec<MessagePart>,
    ) {
        match placeholder {
            FormattedPlaceholder::Null => {}
            FormattedPlaceholder::Fallback(fallback) => {
                append_fallback(&fallback, out, parts);
            }
            FormattedPlaceholder::Evaluated { value, .. } => {
                out.push_str(value.as_str());
                parts.push(MessagePart::Placeholder(value.as_str().to_string()));
            }
            FormattedPlaceholder::Unevaluated { source, fallback } => {
                match value::default_format(&source, &self.locale) {
                    Ok(text) => {
                        out.push_str(&text);
                        parts.push(MessagePart::Placeholder(text));
                    }
                    Err(()) => {
                        // No default formatter for this value; collapse to
                        // the fallback.
                        ctx.errors.set_formatting_error("default");
                        append_fallback(&fallback, out, parts);
                    }
                }
            }
        }
    }

    // ---------- declarations

    /// Process the declarations in source order, extending the environment
    /// with one lazy closure per binding and recording resolution errors in
    /// each right-hand side against the environment so far. Nothing is
    /// evaluated here.
    fn check_declarations<'m>(
        &'m self,
        ctx: &mut MessageContext<'_>,
    ) -> Environment<'m> {
        let mut env = Environment::empty();
        for binding in self.model.declarations() {
            self.check_expression_resolution(&env, &binding.value, ctx);
            env = env.bind(binding.name.as_str(), &binding.value);
        }
        env
    }

    fn check_expression_resolution(
        &self,
        env: &Environment<'_>,
        expr: &Expression,
        ctx: &mut MessageContext<'_>,
    ) {
        self.check_operand_resolution(env, expr.operand(), ctx);
        if let Some(Operator::Call { options, .. }) = expr.operator() {
            for (_, operand) in options.iter() {
                self.check_operand_resolution(env, operand, ctx);
            }
        }
    }

    fn check_operand_resolution(
        &self,
        env: &Environment<'_>,
        operand: &Operand,
        ctx: &mut MessageContext<'_>,
    ) {
        if let Operand::Variable(var) = operand {
            if !env.has(var.as_str()) && !ctx.arguments.contains(var.as_str()) {
                ctx.errors.set_unresolved_variable(var.as_str());
            }
        }
    }

    // ---------- selection

    /// Resolve the operand of a selector, expanding local declarations so
    /// an annotation reached through a `let` chain still selects.
    fn resolve_selector_operand<'m>(
        &'m self,
        env: &Environment<'m>,
        operand: &'m Operand,
        ctx: &mut MessageContext<'_>,
    ) -> ResolvedSelector {
        match operand {
            Operand::Null => ResolvedSelector {
                bundle: None,
                argument: FormattedPlaceholder::Null,
            },
            Operand::Literal(literal) => ResolvedSelector {
                bundle: None,
                argument: self.format_literal(literal),
            },
            Operand::Variable(var) => {
                if let Some(closure) = env.lookup(var.as_str()) {
                    let closure_env = closure.env().clone();
                    return self.resolve_selector_expression(&closure_env, closure.expr(), ctx);
                }
                if let Some(value) = ctx.arguments.get(var.as_str()) {
                    return ResolvedSelector {
                        bundle: None,
                        argument: self.eval_argument(var, value),
                    };
                }
                ctx.errors.set_unresolved_variable(var.as_str());
                ResolvedSelector {
                    bundle: None,
                    argument: FormattedPlaceholder::fallback(var.to_string()),
                }
            }
        }
    }

    /// Evaluate a selector expression without performing the final function
    /// call: the operand and options are resolved and the selector function
    /// is looked up.
    fn resolve_selector_expression<'m>(
        &'m self,
        env: &Environment<'m>,
        expr: &'m Expression,
        ctx: &mut MessageContext<'_>,
    ) -> ResolvedSelector {
        match expr.operator() {
            Some(Operator::Reserved(_)) => {
                ctx.errors.set_reserved_error();
                ResolvedSelector {
                    bundle: None,
                    argument: FormattedPlaceholder::fallback(REPLACEMENT.to_string()),
                }
            }
            Some(Operator::Call { name, options }) => {
                if let Some(factory) = self.lookup_selector(name) {
                    match factory.create(&self.locale) {
                        Ok(function) => {
                            let options = self.resolve_options(env, options, ctx);
                            let argument = self.format_operand(env, expr.operand(), ctx);
                            return ResolvedSelector {
                                bundle: Some(SelectorBundle {
                                    name: name.clone(),
                                    function,
                                    options,
                                }),
                                argument,
                            };
                        }
                        Err(_) => ctx.errors.set_selector_error(name.to_string()),
                    }
                } else if self.is_formatter(name) {
                    // Formatter-only function in selection position.
                    ctx.errors.set_selector_error(name.to_string());
                } else {
                    ctx.errors.set_unknown_function(name.to_string());
                }
                let fallback = if expr.operand().is_null() {
                    name.to_string()
                } else {
                    self.format_operand(env, expr.operand(), ctx)
                        .fallback_str()
                        .into_owned()
                };
                ResolvedSelector {
                    bundle: None,
                    argument: FormattedPlaceholder::fallback(fallback),
                }
            }
            None => self.resolve_selector_operand(env, expr.operand(), ctx),
        }
    }

    /// Step 1 of selection: resolve each selector, substituting a nomatch
    /// sentinel (no function) when the expression cannot select.
    fn resolve_selectors<'m>(
        &'m self,
        env: &Environment<'m>,
        selectors: &'m [Expression],
        ctx: &mut MessageContext<'_>,
    ) -> Vec<ResolvedSelector> {
        selectors
            .iter()
            .map(|expr| {
                let resolved = self.resolve_selector_expression(env, expr, ctx);
                match resolved.bundle {
                    Some(bundle) => {
                        if resolved.argument.is_fallback() {
                            // The operand failed; selection must fail too,
                            // but the error was already recorded.
                            ResolvedSelector {
                                bundle: None,
                                argument: resolved.argument,
                            }
                        } else {
                            ResolvedSelector {
                                bundle: Some(bundle),
                                argument: resolved.argument,
                            }
                        }
                    }
                    None => {
                        if !resolved.argument.is_fallback() {
                            // An operand with no annotation at all.
                            ctx.errors.set_missing_selector_annotation();
                        }
                        ResolvedSelector {
                            bundle: None,
                            argument: FormattedPlaceholder::fallback(
                                resolved.argument.fallback_str().into_owned(),
                            ),
                        }
                    }
                }
            })
            .collect()
    }

    /// Step 2: for each selector position, gather the literal keys at that
    /// position across all variants and ask the selector to filter and
    /// order them.
    fn resolve_preferences(
        &self,
        resolved: &[ResolvedSelector],
        variants: &[Variant],
        ctx: &mut MessageContext<'_>,
    ) -> Vec<Vec<String>> {
        resolved
            .iter()
            .enumerate()
            .map(|(i, selector)| {
                let keys: Vec<&str> = variants
                    .iter()
                    .filter_map(|variant| variant.keys.get(i))
                    .filter_map(|key| key.as_literal())
                    .map(Literal::as_str)
                    .collect();

                let Some(bundle) = &selector.bundle else {
                    return Vec::new();
                };
                match bundle
                    .function
                    .select(&selector.argument, &bundle.options, &keys)
                {
                    Ok(matches) => matches,
                    Err(error) => {
                        tracing::debug!(selector = %bundle.name, %error, "selector failed");
                        ctx.errors.set_selector_error(bundle.name.to_string());
                        Vec::new()
                    }
                }
            })
            .collect()
    }

    /// Step 3: keep each variant whose every key is either the wildcard or
    /// a preferred key at its position.
    fn filter_variants<'m>(
        &self,
        preferences: &[Vec<String>],
        variants: &'m [Variant],
    ) -> Vec<PrioritizedVariant<'m>> {
        variants
            .iter()
            .filter(|variant| {
                preferences.iter().enumerate().all(|(i, matches)| {
                    match variant.keys.get(i).and_then(|key| key.as_literal()) {
                        None => true, // wildcard
                        Some(literal) => matches.iter().any(|m| m == literal.as_str()),
                    }
                })
            })
            .map(|variant| PrioritizedVariant {
                priority: 0,
                keys: &variant.keys,
                pattern: &variant.pattern,
            })
            .collect()
    }

    /// Step 4: stable-sort by priority once per selector position, from
    /// the last position to the first, so earlier positions dominate. A
    /// wildcard ranks after every explicit match at its position.
    fn sort_variants(&self, preferences: &[Vec<String>], variants: &mut [PrioritizedVariant<'_>]) {
        for i in (0..preferences.len()).rev() {
            let matches = &preferences[i];
            let min_priority = matches.len();
            for variant in variants.iter_mut() {
                variant.priority = match variant.keys.get(i).and_then(|key| key.as_literal()) {
                    None => min_priority,
                    Some(literal) => matches
                        .iter()
                        .position(|m| m == literal.as_str())
                        .unwrap_or(min_priority),
                };
            }
            variants.sort_by_key(|variant| variant.priority);
        }
    }

    /// Run the selection algorithm and format the winning variant.
    fn format_selectors<'m>(
        &'m self,
        env: &Environment<'m>,
        selectors: &'m [Expression],
        variants: &'m [Variant],
        ctx: &mut MessageContext<'_>,
        out: &mut String,
        parts: &mut StaticVec<MessagePart>,
    ) {
        let resolved = self.resolve_selectors(env, selectors, ctx);
        let preferences = self.resolve_preferences(&resolved, variants, ctx);
        let mut survivors = self.filter_variants(&preferences, variants);
        self.sort_variants(&preferences, &mut survivors);

        match survivors.first() {
            Some(winner) => {
                tracing::debug!(keys = ?winner.keys, "variant selected");
                self.format_pattern(env, winner.pattern, ctx, out, parts);
            }
            None => {
                // Unreachable for checked messages: the all-wildcard
                // variant survives every filter.
                append_fallback(&REPLACEMENT.to_string(), out, parts);
            }
        }
    }

    // ---------- entry point

    /// Format the message against `arguments`, producing the output string,
    /// its parts, and the call status.
    pub(crate) fn run(
        &self,
        arguments: &MessageArguments,
    ) -> (String, StaticVec<MessagePart>, DynamicErrors) {
        let mut ctx = MessageContext {
            arguments,
            errors: DynamicErrors::new(self.static_errors.clone()),
        };
        let env = self.check_declarations(&mut ctx);

        let mut out = String::new();
        let mut parts = StaticVec::new();
        match self.model.body() {
            MessageBody::Pattern(pattern) => {
                self.format_pattern(&env, pattern, &mut ctx, &mut out, &mut parts);
            }
            MessageBody::Selectors {
                selectors,
                variants,
            } => {
                // A selectors message with any static error formats to
                // U+FFFD rather than attempting selection.
                if ctx.errors.has_static_error() {
                    out.push(REPLACEMENT);
                    parts.push(MessagePart::Fallback(REPLACEMENT.to_string()));
                } else {
                    self.format_selectors(
                        &env, selectors, variants, &mut ctx, &mut out, &mut parts,
                    );
                }
            }
        }
        (out, parts, ctx.errors)
    }
}

/// Fallback substitution: a failed placeholder renders as `{fallback}`.
fn append_fallback(fallback: &str, out: &mut String, parts: &mut StaticVec<MessagePart>) {
    out.push('{');
    out.push_str(fallback);
    out.push('}');
    parts.push(MessagePart::Fallback(fallback.to_string()));
}
