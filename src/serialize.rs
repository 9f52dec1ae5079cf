//! Module rendering a data model back to message source text.
//!
//! The output is *a* canonical form, not the original source: required
//! whitespace is a single space and optional whitespace is omitted, which
//! makes the output identical to the parser's normalized input for any
//! message without reserved annotations. Re-parsing the output always
//! yields an equal data model.

use crate::ast::{
    Expression, Key, Literal, Message, MessageBody, Operand, Operator, OptionMap, Pattern,
    PatternPart, Reserved, SelectorKeys,
};

/// Render `message` to canonical source text.
pub(crate) fn serialize(message: &Message) -> String {
    let mut out = Serializer::default();
    out.message(message);
    out.result
}

#[derive(Default)]
struct Serializer {
    result: String,
}

impl Serializer {
    fn message(&mut self, message: &Message) {
        for binding in message.declarations() {
            self.result.push_str("let ");
            self.result.push_str(&binding.name.to_string());
            self.result.push('=');
            self.expression(&binding.value);
        }
        match message.body() {
            MessageBody::Pattern(pattern) => self.pattern(pattern),
            MessageBody::Selectors {
                selectors,
                variants,
            } => {
                self.result.push_str("match");
                for selector in selectors {
                    self.expression(selector);
                }
                for variant in variants {
                    self.result.push_str("when ");
                    self.keys(&variant.keys);
                    self.pattern(&variant.pattern);
                }
            }
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        self.result.push('{');
        for part in pattern.parts() {
            match part {
                PatternPart::Text(text) => {
                    for c in text.chars() {
                        if matches!(c, '\\' | '{' | '}') {
                            self.result.push('\\');
                        }
                        self.result.push(c);
                    }
                }
                PatternPart::Expression(expr) => self.expression(expr),
            }
        }
        self.result.push('}');
    }

    fn expression(&mut self, expr: &Expression) {
        self.result.push('{');
        if !expr.operand().is_null() {
            self.operand(expr.operand());
            if expr.operator().is_some() {
                self.result.push(' ');
            }
        }
        match expr.operator() {
            None => {}
            Some(Operator::Call { name, options }) => {
                self.result.push_str(&name.to_string());
                self.options(options);
            }
            Some(Operator::Reserved(reserved)) => self.reserved(reserved),
        }
        self.result.push('}');
    }

    fn operand(&mut self, operand: &Operand) {
        match operand {
            Operand::Null => unreachable!("checked by the caller"),
            Operand::Variable(var) => self.result.push_str(&var.to_string()),
            Operand::Literal(lit) => self.literal(lit),
        }
    }

    fn literal(&mut self, literal: &Literal) {
        if literal.is_quoted() {
            self.result.push_str(&literal.quoted_form());
        } else {
            self.result.push_str(literal.as_str());
        }
    }

    fn options(&mut self, options: &OptionMap) {
        for (name, value) in options.iter() {
            self.result.push(' ');
            self.result.push_str(name);
            self.result.push('=');
            self.operand(value);
        }
    }

    /// Reserved bodies are emitted chunk by chunk, re-escaping `\`, `{`,
    /// `|` and `}` in unquoted chunks. Adjacent unquoted chunks after the
    /// start character are separated by one space so that re-parsing does
    /// not merge them.
    fn reserved(&mut self, reserved: &Reserved) {
        let mut previous_unquoted = false;
        for (i, part) in reserved.parts().enumerate() {
            if part.is_quoted() {
                self.literal(part);
                previous_unquoted = false;
                continue;
            }
            if i > 1 && previous_unquoted {
                self.result.push(' ');
            }
            for c in part.as_str().chars() {
                if matches!(c, '\\' | '{' | '|' | '}') {
                    self.result.push('\\');
                }
                self.result.push(c);
            }
            previous_unquoted = true;
        }
    }

    fn keys(&mut self, keys: &SelectorKeys) {
        for (i, key) in keys.iter().enumerate() {
            if i != 0 {
                self.result.push(' ');
            }
            match key {
                Key::Wildcard => self.result.push('*'),
                Key::Literal(lit) => self.literal(lit),
            }
        }
    }
}
