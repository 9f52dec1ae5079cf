//! Module defining the message parser.
//!
//! This is a recursive-descent scannerless parser over Unicode code points
//! that, with a few exceptions, uses one character of lookahead.
//!
//! All the exceptions involve ambiguities about the meaning of whitespace,
//! which cannot be resolved with finite lookahead because whitespace runs
//! are unbounded:
//!
//! 1. `variant` - after each key, a space may begin another key or the
//!    pattern.
//! 2. Option lists - after each option, a space may begin another option or
//!    the closing `}`.
//! 3. Reserved bodies - the same ambiguity between another chunk and the
//!    closing `}`.
//! 4. `(literal / variable) [s annotation]` inside an expression.
//!
//! In each case the parser consumes the optional whitespace, peeks one
//! character, and either continues the list or treats the whitespace as
//! trailing and exits to the outer production. No parser state needs to be
//! saved or restored, because whitespace does not affect the shape of the
//! parse tree; when exiting, the just-consumed space is removed from the
//! normalized buffer so that the canonical form reflects the parse.
//!
//! Only the first syntax error is recorded. After an error the parser
//! continues best-effort; if the message body itself cannot be parsed, the
//! unparsed remainder of the source is wrapped as a single text pattern so
//! that a pattern always exists for downstream formatting.

use crate::ast::{
    Binding, Expression, ExpressionBuilder, FunctionName, Key, Literal, Message, MessageBody,
    Operand, Operator, OptionMap, Pattern, PatternPart, Reserved, SelectorKeys, Sigil, Variant,
    VariableName,
};
use crate::error::{Position, StaticErrorKind, StaticErrors};
use crate::{Identifier, StaticVec, REPLACEMENT};

/// A syntax error has been recorded; unwind to the nearest recovery point.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bail;

type PResult<T> = Result<T, Bail>;

/// The result of parsing a message source.
#[derive(Debug)]
pub(crate) struct ParsedMessage {
    /// The data model. Present even for erroneous input (fallback parse).
    pub message: Message,
    /// The canonicalized source: required whitespace collapsed to single
    /// spaces, optional whitespace dropped.
    pub normalized: String,
    /// Syntax errors (at most one) recorded while parsing.
    pub errors: StaticErrors,
}

/// Parse a message source into a data model.
pub(crate) fn parse(source: &str) -> ParsedMessage {
    Parser::new(source).parse()
}

/// Which escape grammar applies: each context accepts a different subset of
/// `\{`, `\}`, `\|`, `\\`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum EscapeContext {
    Literal,
    Text,
    Reserved,
}

struct Parser {
    src: Vec<char>,
    index: usize,
    normalized: String,
    errors: StaticErrors,
    /// 1-based line number of the current index.
    line: u32,
    /// Number of characters seen before the current line (so the in-line
    /// offset of an error is `index - chars_before_line`).
    chars_before_line: usize,

    declarations: Vec<Binding>,
    selectors: StaticVec<Expression>,
    variants: Vec<Variant>,
    pattern: Option<Pattern>,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            src: source.chars().collect(),
            index: 0,
            normalized: String::with_capacity(source.len()),
            errors: StaticErrors::new(),
            line: 1,
            chars_before_line: 0,
            declarations: Vec::new(),
            selectors: StaticVec::new(),
            variants: Vec::new(),
            pattern: None,
        }
    }

    // ---------- low-level helpers

    #[inline(always)]
    fn in_bounds(&self) -> bool {
        self.index < self.src.len()
    }

    /// The current character. Precondition: `in_bounds()`.
    #[inline(always)]
    fn peek(&self) -> char {
        self.src[self.index]
    }

    /// Consume the current character, updating line tracking on LF.
    /// Precondition: `in_bounds()`.
    #[inline(always)]
    fn consume_char(&mut self) -> char {
        let c = self.src[self.index];
        if c == '\n' {
            self.line += 1;
            self.chars_before_line = self.index + 1;
        }
        self.index += 1;
        c
    }

    /// Record a syntax error at the current index, unless one was recorded
    /// already.
    fn record_error(&mut self) {
        let pos = Position::new(self.line, (self.index - self.chars_before_line) as u32);
        self.errors.add_syntax_error(pos);
    }

    /// Signal an error and bail if the input is exhausted.
    #[inline(always)]
    fn expect_bounds(&mut self) -> PResult<()> {
        if self.in_bounds() {
            Ok(())
        } else {
            self.record_error();
            Err(Bail)
        }
    }

    /// Consume optional whitespace. Neither errors nor touches the
    /// normalized buffer; a message may end here.
    fn parse_optional_ws(&mut self) {
        while self.in_bounds() && is_ws(self.peek()) {
            self.consume_char();
        }
    }

    /// Consume required whitespace, normalizing the run to a single space.
    fn parse_required_ws(&mut self) -> PResult<()> {
        let mut saw_ws = false;
        while self.in_bounds() && is_ws(self.peek()) {
            self.consume_char();
            saw_ws = true;
        }
        if !saw_ws {
            self.record_error();
            return Err(Bail);
        }
        self.normalized.push(' ');
        Ok(())
    }

    /// Consume a single expected character.
    fn parse_token(&mut self, c: char) -> PResult<()> {
        self.expect_bounds()?;
        if self.peek() != c {
            self.record_error();
            return Err(Bail);
        }
        self.consume_char();
        // Postcondition: a token is never the last thing in a message.
        self.expect_bounds()?;
        self.normalized.push(c);
        Ok(())
    }

    /// Consume a fixed keyword (`let`, `match`, `when`).
    fn parse_keyword(&mut self, keyword: &str) -> PResult<()> {
        debug_assert!(self.in_bounds());
        for c in keyword.chars() {
            if self.peek() != c {
                self.record_error();
                return Err(Bail);
            }
            self.normalized.push(c);
            self.consume_char();
            self.expect_bounds()?;
        }
        Ok(())
    }

    /// Consume optional whitespace, a single expected character, then
    /// optional whitespace again. The whitespace is not normalized.
    fn parse_token_with_ws(&mut self, c: char) -> PResult<()> {
        self.parse_optional_ws();
        self.expect_bounds()?;
        self.parse_token(c)?;
        self.parse_optional_ws();
        self.expect_bounds()?;
        Ok(())
    }

    // ---------- names, variables, literals

    /// Consume a non-empty sequence of `name-char`s, the first of which is
    /// also a `name-start`. Matches the `name` nonterminal.
    fn parse_name(&mut self) -> PResult<Identifier> {
        debug_assert!(self.in_bounds());
        if !is_name_start(self.peek()) {
            self.record_error();
            return Err(Bail);
        }
        let mut name = Identifier::new();
        while is_name_char(self.peek()) {
            let c = self.consume_char();
            name.push(c);
            self.normalized.push(c);
            self.expect_bounds()?;
        }
        Ok(name)
    }

    /// Consume a `$` followed by a name. Matches the `variable`
    /// nonterminal.
    fn parse_variable_name(&mut self) -> PResult<VariableName> {
        self.parse_token('$')?;
        Ok(VariableName::new(self.parse_name()?))
    }

    /// Consume an escape sequence; the escapes accepted depend on the
    /// context. Returns the escaped character.
    fn parse_escape(&mut self, context: EscapeContext) -> PResult<char> {
        debug_assert!(self.peek() == '\\');
        self.normalized.push('\\');
        self.consume_char();
        self.expect_bounds()?;
        let c = self.peek();
        let accepted = match c {
            '{' | '}' => matches!(context, EscapeContext::Text | EscapeContext::Reserved),
            '|' => matches!(context, EscapeContext::Literal | EscapeContext::Reserved),
            '\\' => true,
            _ => false,
        };
        if !accepted {
            self.record_error();
            return Err(Bail);
        }
        self.normalized.push(c);
        self.consume_char();
        self.expect_bounds()?;
        Ok(c)
    }

    /// Consume a quoted or unquoted literal. Matches the `literal`
    /// nonterminal.
    fn parse_literal(&mut self) -> PResult<Literal> {
        self.expect_bounds()?;
        let quoted = self.peek() == '|';
        if quoted {
            self.parse_token('|')?;
        } else if !is_unquoted_start(self.peek()) {
            self.record_error();
            return Err(Bail);
        }

        let mut contents = Identifier::new();
        loop {
            let c = self.peek();
            if quoted && c == '\\' {
                contents.push(self.parse_escape(EscapeContext::Literal)?);
            } else if (!quoted && is_name_char(c)) || (quoted && is_quoted_char(c)) {
                contents.push(c);
                self.normalized.push(c);
                self.consume_char();
                self.expect_bounds()?;
            } else {
                break;
            }
        }

        if quoted {
            self.parse_token('|')?;
        }
        Ok(Literal::new(quoted, contents))
    }

    // ---------- annotations

    /// Consume a function name with its sigil. Matches the `function`
    /// nonterminal.
    fn parse_function(&mut self) -> PResult<FunctionName> {
        debug_assert!(self.in_bounds());
        let sigil = match self.peek() {
            ':' => Sigil::Default,
            '+' => Sigil::Open,
            '-' => Sigil::Close,
            _ => {
                self.record_error();
                return Err(Bail);
            }
        };
        self.normalized.push(self.peek());
        self.consume_char();
        self.expect_bounds()?;
        Ok(FunctionName::new(sigil, self.parse_name()?))
    }

    /// Consume a name-value pair and add it to `options`. Matches the
    /// `option` nonterminal. A duplicate name is recorded as a data-model
    /// error, not a syntax error.
    fn parse_option(&mut self, options: &mut OptionMap) -> PResult<()> {
        debug_assert!(self.in_bounds());
        let name = self.parse_name()?;
        self.parse_token_with_ws('=')?;
        let value = if self.peek() == '$' {
            Operand::Variable(self.parse_variable_name()?)
        } else {
            Operand::Literal(self.parse_literal()?)
        };
        if let Err(duplicate) = options.insert(&name, value) {
            self.errors.add(StaticErrorKind::DuplicateOptionName(duplicate));
        }
        Ok(())
    }

    /// Consume a possibly-empty whitespace-separated option list, plus any
    /// trailing whitespace (ambiguity 2: after consuming whitespace, a name
    /// start character means another option; anything else means the
    /// whitespace was trailing and the caller can require the `}`).
    fn parse_options(&mut self, options: &mut OptionMap) -> PResult<()> {
        loop {
            self.expect_bounds()?;
            if !is_ws(self.peek()) {
                break;
            }
            self.parse_required_ws()?;
            self.expect_bounds()?;
            if !is_name_start(self.peek()) {
                // Trailing whitespace: drop the space from the normalized
                // buffer and exit to the enclosing expression.
                self.normalized.pop();
                break;
            }
            self.parse_option(options)?;
        }
        Ok(())
    }

    /// Consume a non-empty run of reserved chars, reserved escapes and
    /// quoted literals, flushing runs of plain chars into single chunks.
    fn parse_reserved_chunk(&mut self, parts: &mut StaticVec<Literal>) -> PResult<()> {
        debug_assert!(self.in_bounds());
        let mut empty = true;
        let mut chunk = Identifier::new();
        loop {
            let c = self.peek();
            if !reserved_chunk_follows(c) {
                break;
            }
            empty = false;
            if c == '\\' {
                if !chunk.is_empty() {
                    parts.push(Literal::new(false, std::mem::take(&mut chunk)));
                }
                let escaped = self.parse_escape(EscapeContext::Reserved)?;
                parts.push(Literal::new(false, escaped.to_string()));
            } else if c == '|' {
                if !chunk.is_empty() {
                    parts.push(Literal::new(false, std::mem::take(&mut chunk)));
                }
                let literal = self.parse_literal()?;
                parts.push(literal);
            } else {
                chunk.push(c);
                self.normalized.push(c);
                self.consume_char();
                self.expect_bounds()?;
            }
        }
        if !chunk.is_empty() {
            parts.push(Literal::new(false, chunk));
        }
        if empty {
            self.record_error();
            return Err(Bail);
        }
        Ok(())
    }

    /// Consume a reserved annotation: a `reserved-start` character followed
    /// by whitespace-separated chunks (ambiguity 3: whitespace may precede
    /// another chunk or the closing `}`).
    fn parse_reserved(&mut self) -> PResult<Reserved> {
        debug_assert!(self.in_bounds());
        if !is_reserved_start(self.peek()) {
            self.record_error();
            return Err(Bail);
        }
        let mut parts = StaticVec::new();
        let start = self.peek();
        parts.push(Literal::new(false, start.to_string()));
        self.normalized.push(start);
        self.consume_char();

        loop {
            if !self.in_bounds() {
                break;
            }
            let mut saw_ws = false;
            if is_ws(self.peek()) {
                saw_ws = true;
                self.parse_optional_ws();
                if !self.in_bounds() {
                    break;
                }
            }
            if reserved_chunk_follows(self.peek()) {
                if saw_ws {
                    self.normalized.push(' ');
                }
                self.parse_reserved_chunk(&mut parts)?;
            } else if saw_ws {
                if self.peek() == '}' {
                    // Trailing whitespace before the closing brace.
                    break;
                }
                // Whitespace inside a reserved body must be followed by
                // another chunk or by the closing brace.
                self.record_error();
                return Err(Bail);
            } else {
                break;
            }
        }
        Ok(Reserved::new(parts))
    }

    /// Consume a function call or reserved sequence, setting the operator
    /// on `builder` as soon as enough of it is known (so that a later
    /// syntax error still leaves the function name available for
    /// fallbacks). Matches the `annotation` nonterminal.
    fn parse_annotation_into(&mut self, builder: &mut ExpressionBuilder) -> PResult<()> {
        debug_assert!(self.in_bounds());
        if is_function_start(self.peek()) {
            let name = self.parse_function()?;
            let mut options = OptionMap::new();
            let outcome = self.parse_options(&mut options);
            builder.set_operator(Operator::Call { name, options });
            outcome
        } else {
            let reserved = self.parse_reserved()?;
            builder.set_operator(Operator::Reserved(reserved));
            Ok(())
        }
    }

    /// Consume a literal or variable operand, optionally followed by
    /// whitespace and an annotation (ambiguity 4: after the operand,
    /// whitespace may precede an annotation or the closing `}`).
    fn parse_operand_with_annotation(
        &mut self,
        is_variable: bool,
        builder: &mut ExpressionBuilder,
    ) -> PResult<()> {
        let operand = if is_variable {
            Operand::Variable(self.parse_variable_name()?)
        } else {
            Operand::Literal(self.parse_literal()?)
        };
        builder.set_operand(operand);

        if is_ws(self.peek()) {
            self.parse_optional_ws();
            self.expect_bounds()?;
            if is_annotation_start(self.peek()) {
                // The whitespace was the required space before an
                // annotation; reflect it in the normalized form.
                self.normalized.push(' ');
                self.parse_annotation_into(builder)?;
            }
            // Otherwise the whitespace was trailing; the caller requires
            // the closing brace next.
        }
        Ok(())
    }

    fn parse_expression_body(&mut self, builder: &mut ExpressionBuilder) -> PResult<()> {
        self.expect_bounds()?;
        match self.peek() {
            '|' => self.parse_operand_with_annotation(false, builder),
            '$' => self.parse_operand_with_annotation(true, builder),
            c if is_annotation_start(c) => self.parse_annotation_into(builder),
            c if is_unquoted_start(c) => self.parse_operand_with_annotation(false, builder),
            _ => {
                self.record_error();
                Err(Bail)
            }
        }
    }

    /// Consume an expression. Matches the `expression` nonterminal.
    ///
    /// On a body error, recovers if the closing brace is next: the
    /// expression is built from whatever was parsed (with a U+FFFD literal
    /// operand if nothing was), so formatting can still produce a fallback.
    fn parse_expression(&mut self) -> PResult<Expression> {
        self.parse_token('{')?;
        self.parse_optional_ws();

        let mut builder = Expression::builder();
        match self.parse_expression_body(&mut builder) {
            Ok(()) => {
                self.parse_token('}')?;
            }
            Err(Bail) => {
                if builder.is_empty() {
                    builder.set_operand(Operand::Literal(Literal::new(
                        false,
                        REPLACEMENT.to_string(),
                    )));
                }
                if self.in_bounds() && self.peek() == '}' {
                    self.consume_char();
                    self.normalized.push('}');
                } else {
                    return Err(Bail);
                }
            }
        }
        Ok(builder.build())
    }

    // ---------- declarations and message body

    /// Consume a possibly-empty run of `let` declarations.
    fn parse_declarations(&mut self) -> PResult<()> {
        // Even empty declarations must be followed by a body.
        self.expect_bounds()?;
        while self.peek() == 'l' {
            self.parse_keyword("let")?;
            self.parse_required_ws()?;
            self.expect_bounds()?;
            let name = self.parse_variable_name()?;
            self.parse_token_with_ws('=')?;
            let value = self.parse_expression()?;
            self.parse_optional_ws();
            self.expect_bounds()?;
            self.declarations.push(Binding { name, value });
        }
        Ok(())
    }

    /// Consume a non-empty run of text characters and text escapes.
    /// Matches the `text` nonterminal.
    fn parse_text(&mut self) -> PResult<String> {
        debug_assert!(self.in_bounds());
        let mut text = String::new();
        loop {
            let c = self.peek();
            if c == '\\' {
                text.push(self.parse_escape(EscapeContext::Text)?);
            } else if is_text_char(c) {
                text.push(c);
                self.normalized.push(c);
                self.consume_char();
                self.expect_bounds()?;
            } else {
                break;
            }
        }
        if text.is_empty() {
            self.record_error();
            return Err(Bail);
        }
        Ok(text)
    }

    /// Consume a literal key or the wildcard `*`. Matches the `key`
    /// nonterminal.
    fn parse_key(&mut self) -> PResult<Key> {
        debug_assert!(self.in_bounds());
        if self.peek() == '*' {
            self.consume_char();
            self.expect_bounds()?;
            self.normalized.push('*');
            Ok(Key::Wildcard)
        } else {
            Ok(Key::Literal(self.parse_literal()?))
        }
    }

    /// Consume a non-empty whitespace-separated key list (ambiguity 1:
    /// after each key, whitespace may precede another key or the variant's
    /// pattern).
    fn parse_non_empty_keys(&mut self) -> PResult<SelectorKeys> {
        let mut keys = StaticVec::new();
        self.parse_required_ws()?;
        self.expect_bounds()?;
        keys.push(self.parse_key()?);

        while self.peek() != '{' {
            self.parse_required_ws()?;
            self.expect_bounds()?;
            if self.peek() == '{' {
                // The whitespace was the optional space before the
                // pattern, not a key separator.
                self.normalized.pop();
                break;
            }
            keys.push(self.parse_key()?);
        }
        Ok(SelectorKeys::new(keys))
    }

    /// Consume a pattern. Matches the `pattern` nonterminal. The closing
    /// brace may be the last character of the message.
    fn parse_pattern(&mut self) -> PResult<Pattern> {
        self.parse_token('{')?;
        let mut parts = StaticVec::new();
        loop {
            if !self.in_bounds() {
                self.record_error();
                return Err(Bail);
            }
            match self.peek() {
                '}' => break,
                '{' => parts.push(PatternPart::Expression(self.parse_expression()?)),
                _ => parts.push(PatternPart::Text(self.parse_text()?)),
            }
        }
        self.consume_char();
        self.normalized.push('}');
        Ok(Pattern::new(parts))
    }

    /// Consume a `match` construct: one or more selector expressions
    /// followed by one or more variants.
    fn parse_selectors(&mut self) -> PResult<()> {
        self.parse_keyword("match")?;

        while is_ws(self.peek()) || self.peek() == '{' {
            self.parse_optional_ws();
            self.expect_bounds()?;
            if self.peek() != '{' {
                // The whitespace preceded the first variant, not another
                // selector.
                break;
            }
            let selector = self.parse_expression()?;
            self.selectors.push(selector);
            self.expect_bounds()?;
        }
        if self.selectors.is_empty() {
            self.record_error();
            return Err(Bail);
        }

        while is_ws(self.peek()) || self.peek() == 'w' {
            self.parse_optional_ws();
            if !self.in_bounds() {
                // Trailing whitespace after the last variant.
                break;
            }
            self.parse_keyword("when")?;
            let keys = self.parse_non_empty_keys()?;
            let pattern = self.parse_pattern()?;
            self.variants.push(Variant { keys, pattern });
            if !self.in_bounds() {
                break;
            }
        }
        Ok(())
    }

    /// Consume the message body: a pattern or a `match` construct.
    fn parse_body(&mut self) -> PResult<()> {
        debug_assert!(self.in_bounds());
        match self.peek() {
            '{' => {
                let pattern = self.parse_pattern()?;
                self.pattern = Some(pattern);
                Ok(())
            }
            'm' => self.parse_selectors(),
            _ => {
                self.record_error();
                self.error_pattern();
                Ok(())
            }
        }
    }

    /// Fallback for an unparseable body: record the error and wrap the
    /// remaining source, braces included, as a single text pattern so a
    /// pattern exists for downstream formatting.
    fn error_pattern(&mut self) {
        self.record_error();
        let mut text = String::from("{");
        while self.in_bounds() {
            text.push(self.consume_char());
        }
        text.push('}');
        self.pattern = Some(Pattern::new([PatternPart::Text(text)]));
    }

    // ---------- entry point

    fn parse(mut self) -> ParsedMessage {
        let outcome = self.parse_message();

        if outcome.is_err() && self.pattern.is_none() && self.selectors.is_empty() {
            // Nothing usable was parsed; fall back to wrapping whatever is
            // left of the source.
            self.error_pattern();
        }

        let body = if self.selectors.is_empty() {
            MessageBody::Pattern(self.pattern.unwrap_or_default())
        } else {
            MessageBody::Selectors {
                selectors: self.selectors,
                variants: self.variants,
            }
        };
        ParsedMessage {
            message: Message::new(self.declarations, body),
            normalized: self.normalized,
            errors: self.errors,
        }
    }

    fn parse_message(&mut self) -> PResult<()> {
        self.parse_optional_ws();
        if !self.in_bounds() {
            self.record_error();
            self.error_pattern();
            return Ok(());
        }
        self.parse_declarations()?;
        self.parse_body()?;

        if !self.errors.has_syntax_error() {
            self.parse_optional_ws();
            if self.in_bounds() {
                // The entire input must have been consumed.
                self.record_error();
            }
        }
        Ok(())
    }
}

// ---------- character classes
//
// These predicates exactly match the corresponding nonterminals in the
// MessageFormat 2 grammar. Surrogates cannot occur in a Rust `char`, so the
// surrogate exclusions of the grammar are implicit.

/// `s` in the grammar.
#[inline(always)]
fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// `text-char`: anything except `\`, `{` and `}`.
#[inline(always)]
fn is_text_char(c: char) -> bool {
    !matches!(c, '\\' | '{' | '}')
}

/// `quoted-char`: anything except `\` and `|`.
#[inline(always)]
fn is_quoted_char(c: char) -> bool {
    !matches!(c, '\\' | '|')
}

/// `reserved-start`.
#[inline(always)]
fn is_reserved_start(c: char) -> bool {
    matches!(c, '!' | '@' | '#' | '%' | '^' | '&' | '*' | '<' | '>' | '?' | '~')
}

/// `reserved-char`.
#[inline(always)]
fn is_reserved_char(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{0008}'         // omit HTAB and LF
        | '\u{000B}'..='\u{000C}'       // omit CR
        | '\u{000E}'..='\u{0019}'       // omit SP
        | '\u{0021}'..='\u{005B}'       // omit backslash
        | '\u{005D}'..='\u{007A}'       // omit { | }
        | '\u{007E}'..='\u{10FFFF}')
}

#[inline(always)]
fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

#[inline(always)]
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// `name-start`.
fn is_name_start(c: char) -> bool {
    is_alpha(c)
        || c == '_'
        || matches!(c,
            '\u{00C0}'..='\u{00D6}'
            | '\u{00D8}'..='\u{00F6}'
            | '\u{00F8}'..='\u{02FF}'
            | '\u{0370}'..='\u{037D}'
            | '\u{037F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}')
}

/// `name-char`.
fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || is_digit(c)
        || matches!(c, '-' | '.' | ':' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// `unquoted-start`.
fn is_unquoted_start(c: char) -> bool {
    is_name_start(c)
        || is_digit(c)
        || matches!(c, '.' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// Can `c` begin a `function` nonterminal?
#[inline(always)]
fn is_function_start(c: char) -> bool {
    matches!(c, ':' | '+' | '-')
}

/// Can `c` begin an `annotation` nonterminal?
#[inline(always)]
fn is_annotation_start(c: char) -> bool {
    is_function_start(c) || is_reserved_start(c)
}

/// Can `c` begin a `reserved-char`, a `reserved-escape` or a literal?
#[inline(always)]
fn reserved_chunk_follows(c: char) -> bool {
    c == '\\' || c == '|' || is_reserved_char(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_classes() {
        assert!(is_name_start('a'));
        assert!(is_name_start('_'));
        assert!(!is_name_start('1'));
        assert!(is_name_char('1'));
        assert!(is_name_char('-'));
        assert!(is_unquoted_start('1'));
        assert!(!is_unquoted_start('-'));
        assert!(is_reserved_start('@'));
        assert!(!is_reserved_start(':'));
        assert!(is_text_char('|'));
        assert!(!is_text_char('{'));
        assert!(!is_quoted_char('|'));
        assert!(!is_reserved_char(' '));
        assert!(!is_reserved_char('\u{001A}'));
    }

    #[test]
    fn line_tracking() {
        let parsed = parse("{a}\n junk");
        let first = parsed.errors.first().unwrap();
        assert_eq!(first.position().line(), Some(2));
        assert_eq!(first.position().position(), 1);
    }

    #[test]
    fn normalized_input_collapses_whitespace() {
        let parsed = parse("let $x = { 42 }  {{$x :number   }}");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.normalized, "let $x={42}{{$x :number}}");
    }
}
