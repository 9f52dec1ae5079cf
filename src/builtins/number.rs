//! Number formatting and selection: `:number`, `:integer` and the
//! `:plural` selector.

use crate::fn_native::{
    Formatter, FormatterFactory, FunctionError, Locale, ResolvedOptions, Selector,
    SelectorFactory, Shared,
};
use crate::value::{FormattedNumber, FormattedPlaceholder, FormattedValue, Value};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Factory for the `:number` and `:integer` functions (both capabilities).
#[derive(Debug, Clone, Copy)]
pub struct NumberFactory {
    integer: bool,
}

impl NumberFactory {
    /// The `:number` factory.
    #[inline(always)]
    #[must_use]
    pub const fn number() -> Self {
        Self { integer: false }
    }
    /// The `:integer` factory: the subset of `:number` that applies to
    /// integer precision.
    #[inline(always)]
    #[must_use]
    pub const fn integer() -> Self {
        Self { integer: true }
    }
}

impl FormatterFactory for NumberFactory {
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Formatter>, FunctionError> {
        Ok(Shared::new(NumberFunction {
            integer: self.integer,
            locale: locale.clone(),
        }))
    }
}

impl SelectorFactory for NumberFactory {
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Selector>, FunctionError> {
        Ok(Shared::new(NumberFunction {
            integer: self.integer,
            locale: locale.clone(),
        }))
    }
}

/// Factory for the `:plural` selector: number selection with cardinal
/// plural rules unless the `select` option says otherwise.
#[derive(Debug, Clone, Copy)]
pub struct PluralFactory;

impl SelectorFactory for PluralFactory {
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Selector>, FunctionError> {
        Ok(Shared::new(NumberFunction {
            integer: false,
            locale: locale.clone(),
        }))
    }
}

struct NumberFunction {
    integer: bool,
    locale: Locale,
}

impl Formatter for NumberFunction {
    fn format(
        &self,
        arg: FormattedPlaceholder,
        options: &ResolvedOptions,
    ) -> Result<FormattedValue, FunctionError> {
        let value = operand_value(&arg)?;
        let opts = NumberOptions::from_options(options, self.integer);
        let (value, text) = render(value, &opts);
        Ok(FormattedValue::Number(FormattedNumber::new(value, text)))
    }
}

impl Selector for NumberFunction {
    fn select(
        &self,
        arg: &FormattedPlaceholder,
        options: &ResolvedOptions,
        keys: &[&str],
    ) -> Result<Vec<String>, FunctionError> {
        let value = operand_value(arg)?;
        let select = PluralType::from_options(options);
        let exact = value.normalize().to_string();

        let mut prefs = Vec::new();
        // Exact matches rank before keyword matches. Keys are compared as
        // strings, but only keys that are themselves numeric can match
        // exactly.
        for key in keys {
            if key.parse::<Decimal>().is_ok() && *key == exact {
                prefs.push((*key).to_string());
                break;
            }
        }
        if prefs.len() == keys.len() || select == PluralType::Exact {
            return Ok(prefs);
        }

        let keyword = plural_category(value, select, &self.locale);
        for key in keys {
            if *key == keyword {
                prefs.push((*key).to_string());
            }
        }
        Ok(prefs)
    }
}

/// Extract the numeric operand of a number function.
fn operand_value(arg: &FormattedPlaceholder) -> Result<Decimal, FunctionError> {
    let Some(source) = arg.source() else {
        return Err(FunctionError::new("number function requires an operand"));
    };
    match source {
        Value::Int(i) => Ok(Decimal::from(*i)),
        Value::Decimal(d) => Ok(*d),
        Value::Double(d) => {
            Decimal::from_f64(*d).ok_or_else(|| FunctionError::new("value is not representable"))
        }
        Value::String(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| FunctionError::new("operand does not parse as a number")),
        _ => Err(FunctionError::new("operand is not a number")),
    }
}

// ---------- options

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Notation {
    Simple,
    Scientific,
    Engineering,
    Compact,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum SignDisplay {
    Auto,
    Always,
    ExceptZero,
    Negative,
    Never,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum PluralType {
    Cardinal,
    Ordinal,
    Exact,
}

impl PluralType {
    fn from_options(options: &ResolvedOptions) -> Self {
        match options.string("select") {
            Some("ordinal") => Self::Ordinal,
            Some("exact") => Self::Exact,
            _ => Self::Cardinal,
        }
    }
}

#[derive(Debug, Clone)]
struct NumberOptions {
    notation: Notation,
    compact_long: bool,
    percent: bool,
    min_fraction: u32,
    max_fraction: Option<u32>,
    min_significant: Option<u32>,
    max_significant: Option<u32>,
    min_integer: u32,
    sign_display: SignDisplay,
    grouping: bool,
}

impl NumberOptions {
    /// Read the recognized options, ignoring values that do not parse.
    fn from_options(options: &ResolvedOptions, integer: bool) -> Self {
        let notation = match options.string("notation") {
            Some("scientific") => Notation::Scientific,
            Some("engineering") => Notation::Engineering,
            Some("compact") => Notation::Compact,
            _ => Notation::Simple,
        };
        let mut opts = Self {
            notation,
            compact_long: options.string("compactDisplay") == Some("long"),
            percent: options.string("style") == Some("percent"),
            min_fraction: uint_option(options, "minimumFractionDigits").unwrap_or(0),
            max_fraction: uint_option(options, "maximumFractionDigits"),
            min_significant: uint_option(options, "minimumSignificantDigits"),
            max_significant: uint_option(options, "maximumSignificantDigits"),
            min_integer: uint_option(options, "minimumIntegerDigits").unwrap_or(1).max(1),
            sign_display: match options.string("signDisplay") {
                Some("always") => SignDisplay::Always,
                Some("exceptZero") => SignDisplay::ExceptZero,
                Some("negative") => SignDisplay::Negative,
                Some("never") => SignDisplay::Never,
                _ => SignDisplay::Auto,
            },
            grouping: !matches!(options.string("useGrouping"), Some("false" | "never")),
        };
        if integer {
            opts.min_fraction = 0;
            opts.max_fraction = Some(0);
        }
        opts
    }
}

fn uint_option(options: &ResolvedOptions, name: &str) -> Option<u32> {
    match options.get(name)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Int(i) => u32::try_from(*i).ok(),
        Value::Decimal(d) => d.to_u32(),
        Value::Double(d) => {
            if d.fract() == 0.0 && *d >= 0.0 {
                Some(*d as u32)
            } else {
                None
            }
        }
        _ => None,
    }
}

// ---------- rendering

/// Render `value` with `opts`. Returns the value after rounding together
/// with its rendered form.
fn render(value: Decimal, opts: &NumberOptions) -> (Decimal, String) {
    let mut value = value;
    if opts.percent {
        value *= Decimal::from(100);
    }

    match opts.notation {
        Notation::Simple => {
            let value = apply_precision(value, opts);
            let text = render_fixed(value, opts);
            (value, decorate(text, value, opts))
        }
        Notation::Scientific | Notation::Engineering => {
            let (mantissa, exponent) = split_exponent(value, opts.notation == Notation::Engineering);
            let mantissa = apply_precision(mantissa, opts);
            let text = format!("{}E{}", render_fixed(mantissa, opts), exponent);
            (value, decorate(text, value, opts))
        }
        Notation::Compact => {
            let (scaled, suffix) = compact_scale(value, opts.compact_long);
            // Compact notation rounds to at most one fraction digit unless
            // the options say otherwise.
            let scaled = if opts.max_fraction.is_none() && opts.max_significant.is_none() {
                scaled.round_dp(1).normalize()
            } else {
                apply_precision(scaled, opts)
            };
            let text = format!("{}{}", render_fixed(scaled, opts), suffix);
            (value, decorate(text, value, opts))
        }
    }
}

/// Apply significant-digit and fraction-digit rounding.
fn apply_precision(value: Decimal, opts: &NumberOptions) -> Decimal {
    let mut value = value;
    if let Some(max_sig) = opts.max_significant {
        value = round_significant(value, max_sig.max(1));
    }
    if let Some(max_fraction) = opts.max_fraction {
        value = value.round_dp(max_fraction);
    }
    value.normalize()
}

fn round_significant(value: Decimal, digits: u32) -> Decimal {
    if value.is_zero() {
        return Decimal::ZERO;
    }
    let magnitude = integer_digits(value.abs()) as i64;
    let dp = digits as i64 - magnitude;
    if dp >= 0 {
        value.round_dp(dp as u32)
    } else {
        // Rounding to the left of the decimal point.
        let factor = Decimal::from(10_i64.pow((-dp) as u32));
        (value / factor).round() * factor
    }
}

/// Number of digits in the integer part of a non-negative decimal.
fn integer_digits(value: Decimal) -> u32 {
    let truncated = value.trunc();
    if truncated.is_zero() {
        return 1;
    }
    truncated.abs().to_string().len() as u32
}

/// Split into (mantissa, exponent) with `1 <= |mantissa| < 10`, or a
/// multiple-of-three exponent for engineering notation.
fn split_exponent(value: Decimal, engineering: bool) -> (Decimal, i32) {
    if value.is_zero() {
        return (Decimal::ZERO, 0);
    }
    let ten = Decimal::from(10);
    let mut mantissa = value;
    let mut exponent = 0_i32;
    while mantissa.abs() >= ten {
        mantissa /= ten;
        exponent += 1;
    }
    while mantissa.abs() < Decimal::ONE {
        mantissa *= ten;
        exponent -= 1;
    }
    if engineering {
        let shift = exponent.rem_euclid(3);
        mantissa *= Decimal::from(10_i64.pow(shift as u32));
        exponent -= shift;
    }
    (mantissa, exponent)
}

fn compact_scale(value: Decimal, long: bool) -> (Decimal, &'static str) {
    let abs = value.abs();
    let steps: [(i64, &str, &str); 4] = [
        (1_000_000_000_000, "T", " trillion"),
        (1_000_000_000, "B", " billion"),
        (1_000_000, "M", " million"),
        (1_000, "K", " thousand"),
    ];
    for (scale, short_suffix, long_suffix) in steps {
        if abs >= Decimal::from(scale) {
            let suffix = if long { long_suffix } else { short_suffix };
            return (value / Decimal::from(scale), suffix);
        }
    }
    (value, "")
}

/// Fixed-point rendering of the absolute value: fraction padding, integer
/// padding and grouping. The sign is applied by [`decorate`].
fn render_fixed(value: Decimal, opts: &NumberOptions) -> String {
    let plain = value.abs().normalize().to_string();
    let (int_part, fraction_part) = match plain.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (plain, String::new()),
    };

    let mut fraction = fraction_part;
    let min_fraction = match (opts.min_significant, opts.min_fraction) {
        // Minimum significant digits extend the fraction past the integer
        // digits already shown.
        (Some(min_sig), min_fraction) => {
            let int_digits = if int_part == "0" { 0 } else { int_part.len() as u32 };
            min_fraction.max(min_sig.saturating_sub(int_digits))
        }
        (None, min_fraction) => min_fraction,
    };
    while (fraction.len() as u32) < min_fraction {
        fraction.push('0');
    }

    let mut int_digits = int_part;
    while (int_digits.len() as u32) < opts.min_integer {
        int_digits.insert(0, '0');
    }
    if opts.grouping && int_digits.len() > 3 {
        let mut grouped = String::with_capacity(int_digits.len() + int_digits.len() / 3);
        let offset = int_digits.len() % 3;
        for (i, c) in int_digits.chars().enumerate() {
            if i != 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        int_digits = grouped;
    }

    if fraction.is_empty() {
        int_digits
    } else {
        format!("{int_digits}.{fraction}")
    }
}

/// Apply the sign display rule to an unsigned rendering.
fn decorate(text: String, value: Decimal, opts: &NumberOptions) -> String {
    let negative = value.is_sign_negative() && !value.is_zero();
    let prefix = match opts.sign_display {
        SignDisplay::Auto => {
            if negative {
                "-"
            } else {
                ""
            }
        }
        SignDisplay::Always => {
            if negative {
                "-"
            } else {
                "+"
            }
        }
        SignDisplay::ExceptZero => {
            if value.is_zero() {
                ""
            } else if negative {
                "-"
            } else {
                "+"
            }
        }
        SignDisplay::Negative => {
            if negative {
                "-"
            } else {
                ""
            }
        }
        SignDisplay::Never => "",
    };
    let suffix = if opts.percent { "%" } else { "" };
    if prefix.is_empty() && suffix.is_empty() {
        text
    } else {
        format!("{prefix}{text}{suffix}")
    }
}

// ---------- plural rules

/// Select the plural category for `value`.
///
/// Locale data is out of the core's scope: English cardinal and ordinal
/// rules are built in, and every other language maps to `other`. Deployments
/// needing CLDR-complete rules register a custom selector.
fn plural_category(value: Decimal, select: PluralType, locale: &Locale) -> &'static str {
    if locale.language() != "en" && !locale.as_str().is_empty() {
        return "other";
    }
    match select {
        PluralType::Exact => "",
        PluralType::Cardinal => {
            let normalized = value.normalize();
            if normalized == Decimal::ONE {
                "one"
            } else {
                "other"
            }
        }
        PluralType::Ordinal => {
            let normalized = value.normalize();
            if normalized.scale() != 0 || normalized.is_sign_negative() {
                return "other";
            }
            let Some(n) = normalized.to_i64() else {
                return "other";
            };
            match (n % 10, n % 100) {
                (1, m) if m != 11 => "one",
                (2, m) if m != 12 => "two",
                (3, m) if m != 13 => "few",
                _ => "other",
            }
        }
    }
}
