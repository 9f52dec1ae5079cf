//! String formatting and selection: `:string`.

use crate::fn_native::{
    Formatter, FormatterFactory, FunctionError, Locale, ResolvedOptions, Selector,
    SelectorFactory, Shared,
};
use crate::value::{self, FormattedPlaceholder, FormattedValue, Value};

/// Factory for the `:string` function.
///
/// Formatting renders the operand as a string; selection compares the
/// operand string against each key for equality. No options are honored.
#[derive(Debug, Clone, Copy)]
pub struct StringFactory;

impl FormatterFactory for StringFactory {
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Formatter>, FunctionError> {
        Ok(Shared::new(StringFunction {
            locale: locale.clone(),
        }))
    }
}

impl SelectorFactory for StringFactory {
    fn create(&self, locale: &Locale) -> Result<Shared<dyn Selector>, FunctionError> {
        Ok(Shared::new(StringFunction {
            locale: locale.clone(),
        }))
    }
}

struct StringFunction {
    locale: Locale,
}

impl StringFunction {
    fn stringify(&self, arg: &FormattedPlaceholder) -> Result<String, FunctionError> {
        // A standalone `{:string}` has nothing to format.
        let Some(source) = arg.source() else {
            return Ok(String::new());
        };
        if source.is_null() {
            return Ok(String::new());
        }
        value::default_format(source, &self.locale)
            .map_err(|_| FunctionError::new("operand has no string form"))
    }
}

impl Formatter for StringFunction {
    fn format(
        &self,
        arg: FormattedPlaceholder,
        _options: &ResolvedOptions,
    ) -> Result<FormattedValue, FunctionError> {
        Ok(FormattedValue::Text(self.stringify(&arg)?))
    }
}

impl Selector for StringFunction {
    fn select(
        &self,
        arg: &FormattedPlaceholder,
        _options: &ResolvedOptions,
        keys: &[&str],
    ) -> Result<Vec<String>, FunctionError> {
        let formatted = self.stringify(arg)?;
        Ok(keys
            .iter()
            .find(|key| **key == formatted)
            .map(|key| vec![(*key).to_string()])
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_operands_to_strings() {
        let function = StringFunction {
            locale: Locale::default(),
        };
        let arg = FormattedPlaceholder::unevaluated(Value::Int(42), "$x");
        assert_eq!(
            function
                .format(arg, &ResolvedOptions::new())
                .unwrap()
                .as_str(),
            "42"
        );
    }

    #[test]
    fn selects_by_equality() {
        let function = StringFunction {
            locale: Locale::default(),
        };
        let arg = FormattedPlaceholder::unevaluated(Value::from("masculine"), "$g");
        let prefs = function
            .select(&arg, &ResolvedOptions::new(), &["feminine", "masculine", "*x"])
            .unwrap();
        assert_eq!(prefs, ["masculine"]);

        let miss = FormattedPlaceholder::unevaluated(Value::from("none"), "$g");
        assert!(function
            .select(&miss, &ResolvedOptions::new(), &["feminine"])
            .unwrap()
            .is_empty());
    }
}
