//! Module defining the runtime environment for local declarations.
//!
//! The environment is a linked chain of frames terminating in an empty
//! frame, searched linearly. Each frame binds one name to a *closure*: the
//! unevaluated right-hand-side expression together with the environment
//! that was in force at its declaration site. Evaluation is lazy and never
//! memoized; re-binding a name shadows the earlier frame.

use crate::ast::Expression;
use crate::fn_native::Shared;

/// The right-hand side of a declaration, captured with its environment.
#[derive(Debug, Clone)]
pub(crate) struct Closure<'m> {
    expr: &'m Expression,
    env: Environment<'m>,
}

impl<'m> Closure<'m> {
    /// The unevaluated expression.
    #[inline(always)]
    #[must_use]
    pub const fn expr(&self) -> &'m Expression {
        self.expr
    }
    /// The environment captured at the declaration site.
    #[inline(always)]
    #[must_use]
    pub const fn env(&self) -> &Environment<'m> {
        &self.env
    }
}

#[derive(Debug)]
struct Frame<'m> {
    name: &'m str,
    closure: Closure<'m>,
    parent: Environment<'m>,
}

/// A chain of lazy bindings for local declarations.
#[derive(Debug, Clone, Default)]
pub(crate) struct Environment<'m>(Option<Shared<Frame<'m>>>);

impl<'m> Environment<'m> {
    /// The empty environment.
    #[inline(always)]
    #[must_use]
    pub fn empty() -> Self {
        Self(None)
    }

    /// Extend this environment with a binding of `name` to `expr`.
    ///
    /// The closure captures `self` (the environment *before* the binding),
    /// so the declaration cannot see itself or later declarations.
    #[must_use]
    pub fn bind(&self, name: &'m str, expr: &'m Expression) -> Self {
        Self(Some(Shared::new(Frame {
            name,
            closure: Closure {
                expr,
                env: self.clone(),
            },
            parent: self.clone(),
        })))
    }

    /// Look up `name`, returning its closure if bound.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Closure<'m>> {
        let mut current = self;
        while let Some(frame) = current.0.as_deref() {
            if frame.name == name {
                return Some(&frame.closure);
            }
            current = &frame.parent;
        }
        None
    }

    /// Is `name` bound in this environment?
    #[inline(always)]
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Literal, Operand};

    fn literal_expr(text: &str) -> Expression {
        let mut builder = Expression::builder();
        builder.set_operand(Operand::Literal(Literal::new(false, text)));
        builder.build()
    }

    #[test]
    fn lookup_walks_the_chain() {
        let a = literal_expr("a");
        let b = literal_expr("b");
        let env = Environment::empty().bind("x", &a).bind("y", &b);
        assert!(env.has("x"));
        assert!(env.has("y"));
        assert!(!env.has("z"));
    }

    #[test]
    fn closures_capture_the_declaration_site() {
        let a = literal_expr("a");
        let b = literal_expr("b");
        let env = Environment::empty().bind("x", &a);
        let env = env.bind("y", &b);
        // y's closure sees x, but x's closure sees nothing.
        let y = env.lookup("y").unwrap();
        assert!(y.env().has("x"));
        let x = env.lookup("x").unwrap();
        assert!(!x.env().has("x"));
        assert!(!x.env().has("y"));
    }

    #[test]
    fn rebinding_shadows() {
        let a = literal_expr("a");
        let b = literal_expr("b");
        let env = Environment::empty().bind("x", &a).bind("x", &b);
        let x = env.lookup("x").unwrap();
        assert_eq!(x.expr(), &b);
        // The shadowed frame is still reachable from the closure's capture.
        assert!(x.env().has("x"));
    }
}
