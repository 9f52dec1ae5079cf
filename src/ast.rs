//! Module defining the message data model (abstract syntax tree).
//!
//! Every node is immutable after construction and owned by its parent.
//! Equality and ordering are semantic: cosmetic details such as literal
//! quoting do not participate.

use crate::{Identifier, StaticVec};
use std::cmp::Ordering;
use std::fmt;

/// A string value from the message source, with a flag recording whether it
/// was written in quoted (`|...|`) form.
///
/// Quoting is cosmetic: two literals are equal, and order the same, iff
/// their contents are equal.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    quoted: bool,
    contents: Identifier,
}

impl Literal {
    /// Create a new [`Literal`].
    #[inline(always)]
    #[must_use]
    pub fn new(quoted: bool, contents: impl AsRef<str>) -> Self {
        Self {
            quoted,
            contents: Identifier::from(contents.as_ref()),
        }
    }
    /// The contents, without quotes or escapes.
    #[inline(always)]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.contents
    }
    /// Was this literal written in quoted form?
    #[inline(always)]
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }
    /// The quoted (`|...|`) form, re-escaping `|` and `\`.
    ///
    /// This is the display form used in fallback strings, regardless of how
    /// the literal was originally written.
    #[must_use]
    pub fn quoted_form(&self) -> String {
        let mut out = String::with_capacity(self.contents.len() + 2);
        out.push('|');
        for c in self.contents.chars() {
            if c == '|' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('|');
        out
    }
}

impl PartialEq for Literal {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.contents == other.contents
    }
}

impl Eq for Literal {}

impl PartialOrd for Literal {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.contents.cmp(&other.contents)
    }
}

impl std::hash::Hash for Literal {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.contents.hash(state);
    }
}

/// The name of a variable, without the `$` sigil.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableName(Identifier);

impl VariableName {
    /// Create a new [`VariableName`].
    #[inline(always)]
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Identifier::from(name.as_ref()))
    }
    /// The name, without the sigil.
    #[inline(always)]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    /// The declaration form: `$name`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// The sigil introducing a function name.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sigil {
    /// `:` - a plain function.
    Default,
    /// `+` - an opening markup-like function.
    Open,
    /// `-` - a closing markup-like function.
    Close,
}

impl Sigil {
    /// The sigil character.
    #[inline(always)]
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Default => ':',
            Self::Open => '+',
            Self::Close => '-',
        }
    }
}

/// The name of a formatting or selection function, with its sigil.
///
/// The total order is (sigil, name).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionName {
    sigil: Sigil,
    name: Identifier,
}

impl FunctionName {
    /// Create a new [`FunctionName`].
    #[inline(always)]
    #[must_use]
    pub fn new(sigil: Sigil, name: impl AsRef<str>) -> Self {
        Self {
            sigil,
            name: Identifier::from(name.as_ref()),
        }
    }
    /// The name, without the sigil.
    #[inline(always)]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }
    /// The sigil.
    #[inline(always)]
    #[must_use]
    pub const fn sigil(&self) -> Sigil {
        self.sigil
    }
}

impl From<&str> for FunctionName {
    /// A bare name becomes a `:`-sigil function name.
    #[inline(always)]
    fn from(name: &str) -> Self {
        Self::new(Sigil::Default, name)
    }
}

impl fmt::Display for FunctionName {
    /// The source form: sigil followed by name, e.g. `:number`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sigil.as_char(), self.name)
    }
}

/// The operand of an expression or option value.
///
/// [`Operand::Null`] exists only as the absent operand of an
/// annotation-only expression.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// No operand.
    #[default]
    Null,
    /// A variable reference.
    Variable(VariableName),
    /// A literal value.
    Literal(Literal),
}

impl Operand {
    /// Is there no operand?
    #[inline(always)]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
    /// Is this a variable reference?
    #[inline(always)]
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }
    /// Is this a literal?
    #[inline(always)]
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// A single match token in a variant: a literal, or the wildcard `*`.
///
/// The wildcard is greater than every literal key.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    /// The catch-all key `*`.
    Wildcard,
    /// A literal key.
    Literal(Literal),
}

impl Key {
    /// Is this the catch-all key?
    #[inline(always)]
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
    /// The literal, if this is not the wildcard.
    #[inline(always)]
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Wildcard => None,
            Self::Literal(lit) => Some(lit),
        }
    }
}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Wildcard, Self::Wildcard) => Ordering::Equal,
            (Self::Wildcard, Self::Literal(_)) => Ordering::Greater,
            (Self::Literal(_), Self::Wildcard) => Ordering::Less,
            (Self::Literal(a), Self::Literal(b)) => a.cmp(b),
        }
    }
}

/// The fixed-length key list of a variant. Ordered lexicographically.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorKeys(StaticVec<Key>);

impl SelectorKeys {
    /// Create a new key list.
    #[inline(always)]
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self(keys.into_iter().collect())
    }
    /// Number of keys.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Is the key list empty?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// The key at `index`, if any.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Key> {
        self.0.get(index)
    }
    /// Iterate over the keys in order.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.0.iter()
    }
    /// Does every key match all values?
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0.iter().all(Key::is_wildcard)
    }
}

/// An insertion-ordered map of option names to operands, with unique keys.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionMap(indexmap::IndexMap<Identifier, Operand>);

impl OptionMap {
    /// Create an empty [`OptionMap`].
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add an option. Option names must be unique within an annotation;
    /// a duplicate name is a data-model error and the map is unchanged.
    pub fn insert(&mut self, name: impl AsRef<str>, value: Operand) -> Result<(), Identifier> {
        let name = Identifier::from(name.as_ref());
        if self.0.contains_key(&name) {
            return Err(name);
        }
        self.0.insert(name, value);
        Ok(())
    }
    /// The operand of the named option, if present.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Operand> {
        self.0.get(name)
    }
    /// Number of options.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Is the map empty?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Iterate over (name, operand) pairs in insertion order.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A reserved annotation: syntactically valid, semantically undefined.
///
/// The body is kept as the sequence of chunks the parser saw, so the
/// serializer can reproduce an equivalent source form.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reserved(StaticVec<Literal>);

impl Reserved {
    /// Create a new [`Reserved`] from its chunks. The first chunk is the
    /// `reserved-start` character.
    #[inline(always)]
    #[must_use]
    pub fn new(parts: impl IntoIterator<Item = Literal>) -> Self {
        Self(parts.into_iter().collect())
    }
    /// Iterate over the chunks in order.
    #[inline(always)]
    pub fn parts(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }
    /// Number of chunks.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Is the body empty?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The annotation of an expression: a function call, or a reserved
/// sequence.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// A reserved sequence.
    Reserved(Reserved),
    /// A call to a named function with options.
    Call {
        /// The function name.
        name: FunctionName,
        /// The options, in source order.
        options: OptionMap,
    },
}

impl Operator {
    /// Is this a reserved sequence?
    #[inline(always)]
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self, Self::Reserved(_))
    }
    /// The function name, if this is a call.
    #[inline(always)]
    #[must_use]
    pub const fn function_name(&self) -> Option<&FunctionName> {
        match self {
            Self::Reserved(_) => None,
            Self::Call { name, .. } => Some(name),
        }
    }
}

/// A brace-delimited occurrence of `{operand? annotation?}`.
///
/// At least one of the operand and the operator is always present; a
/// function call with a null operand is a *standalone annotation*.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    operand: Operand,
    operator: Option<Operator>,
}

impl Expression {
    /// Create a builder.
    #[inline(always)]
    #[must_use]
    pub fn builder() -> ExpressionBuilder {
        ExpressionBuilder::default()
    }
    /// The operand. [`Operand::Null`] for a standalone annotation.
    #[inline(always)]
    #[must_use]
    pub const fn operand(&self) -> &Operand {
        &self.operand
    }
    /// The annotation, if any.
    #[inline(always)]
    #[must_use]
    pub const fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }
    /// Is the annotation a function call?
    #[inline(always)]
    #[must_use]
    pub fn is_function_call(&self) -> bool {
        matches!(self.operator, Some(Operator::Call { .. }))
    }
    /// Is the annotation a reserved sequence?
    #[inline(always)]
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        matches!(self.operator, Some(Operator::Reserved(_)))
    }
    /// Is this an annotation with no operand?
    #[inline(always)]
    #[must_use]
    pub fn is_standalone_annotation(&self) -> bool {
        self.operand.is_null() && self.operator.is_some()
    }
}

/// Builder for [`Expression`]. Used by the parser; also useful for
/// constructing messages programmatically.
#[derive(Debug, Clone, Default)]
pub struct ExpressionBuilder {
    operand: Operand,
    operator: Option<Operator>,
}

impl ExpressionBuilder {
    /// Set the operand.
    #[inline(always)]
    pub fn set_operand(&mut self, operand: Operand) -> &mut Self {
        self.operand = operand;
        self
    }
    /// Set the annotation.
    #[inline(always)]
    pub fn set_operator(&mut self, operator: Operator) -> &mut Self {
        self.operator = Some(operator);
        self
    }
    /// Has neither an operand nor an operator been set?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operand.is_null() && self.operator.is_none()
    }
    /// Build the expression. An operand or an operator must have been set.
    #[must_use]
    pub fn build(self) -> Expression {
        debug_assert!(
            !(self.operand.is_null() && self.operator.is_none()),
            "an expression must have an operand or an annotation"
        );
        Expression {
            operand: self.operand,
            operator: self.operator,
        }
    }
}

/// A part of a pattern: raw text, or a placeholder expression.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternPart {
    /// Raw text, with escapes already processed.
    Text(String),
    /// A placeholder.
    Expression(Expression),
}

/// A possibly-empty ordered sequence of pattern parts.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern(StaticVec<PatternPart>);

impl Pattern {
    /// Create a new [`Pattern`].
    #[inline(always)]
    #[must_use]
    pub fn new(parts: impl IntoIterator<Item = PatternPart>) -> Self {
        Self(parts.into_iter().collect())
    }
    /// Iterate over the parts in order.
    #[inline(always)]
    pub fn parts(&self) -> impl Iterator<Item = &PatternPart> {
        self.0.iter()
    }
    /// Number of parts.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Is the pattern empty?
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A (keys, pattern) pair in a selectors message.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variant {
    /// The match keys, one per selector.
    pub keys: SelectorKeys,
    /// The pattern formatted when this variant is selected.
    pub pattern: Pattern,
}

/// A `let` declaration binding a variable name to an expression.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binding {
    /// The bound name.
    pub name: VariableName,
    /// The right-hand-side expression.
    pub value: Expression,
}

/// The body of a message: a single pattern, or selectors with variants.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageBody {
    /// A plain pattern message.
    Pattern(Pattern),
    /// A `match` construct.
    Selectors {
        /// The selector expressions, in source order. Never empty in a
        /// well-formed message.
        selectors: StaticVec<Expression>,
        /// The variants, in source order. Emptiness and key arity are
        /// data-model errors reported by the checker, not enforced here,
        /// so that malformed messages can still format with fallbacks.
        variants: Vec<Variant>,
    },
}

/// The root of the data model: local declarations plus a body.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    declarations: Vec<Binding>,
    body: MessageBody,
}

impl Message {
    /// Create a new [`Message`].
    #[inline(always)]
    #[must_use]
    pub fn new(declarations: Vec<Binding>, body: MessageBody) -> Self {
        Self { declarations, body }
    }
    /// The local declarations, in source order.
    #[inline(always)]
    #[must_use]
    pub fn declarations(&self) -> &[Binding] {
        &self.declarations
    }
    /// The message body.
    #[inline(always)]
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }
    /// Is this a selectors message?
    #[inline(always)]
    #[must_use]
    pub const fn has_selectors(&self) -> bool {
        matches!(self.body, MessageBody::Selectors { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_equality_ignores_quoting() {
        assert_eq!(Literal::new(true, "foo"), Literal::new(false, "foo"));
        assert_ne!(Literal::new(false, "foo"), Literal::new(false, "bar"));
    }

    #[test]
    fn literal_quoted_form_escapes() {
        assert_eq!(Literal::new(false, "a|b\\c").quoted_form(), "|a\\|b\\\\c|");
    }

    #[test]
    fn wildcard_sorts_after_literals() {
        let wild = Key::Wildcard;
        let lit = Key::Literal(Literal::new(false, "zzz"));
        assert!(wild > lit);
        assert_eq!(wild.cmp(&Key::Wildcard), Ordering::Equal);
    }

    #[test]
    fn selector_keys_are_lex_ordered() {
        let a = SelectorKeys::new([
            Key::Literal(Literal::new(false, "one")),
            Key::Wildcard,
        ]);
        let b = SelectorKeys::new([Key::Wildcard, Key::Literal(Literal::new(false, "one"))]);
        assert!(a < b);
    }

    #[test]
    fn function_name_orders_by_sigil_then_name() {
        let a = FunctionName::new(Sigil::Default, "zebra");
        let b = FunctionName::new(Sigil::Open, "alpha");
        assert!(a < b);
        assert_eq!(FunctionName::from("number").to_string(), ":number");
    }

    #[test]
    fn option_map_rejects_duplicates() {
        let mut map = OptionMap::new();
        map.insert("style", Operand::Literal(Literal::new(false, "decimal")))
            .unwrap();
        let err = map.insert("style", Operand::Null).unwrap_err();
        assert_eq!(&*err, "style");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn option_map_preserves_insertion_order() {
        let mut map = OptionMap::new();
        map.insert("b", Operand::Null).unwrap();
        map.insert("a", Operand::Null).unwrap();
        let names: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn standalone_annotation() {
        let mut builder = Expression::builder();
        builder.set_operator(Operator::Call {
            name: FunctionName::from("number"),
            options: OptionMap::new(),
        });
        let expr = builder.build();
        assert!(expr.is_standalone_annotation());
        assert!(expr.is_function_call());
    }
}
