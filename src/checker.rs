//! Module checking data-model invariants that the grammar cannot express.

use crate::ast::{Expression, Message, MessageBody, Operand};
use crate::error::{StaticErrorKind, StaticErrors};

/// Walk a parsed message and record data-model errors:
///
/// - `VariantKeyMismatch` for a variant whose key count differs from the
///   selector count;
/// - `NonexhaustivePattern` when no variant is all-wildcard (which includes
///   a `match` with no variants at all);
/// - `MissingSelectorAnnotation` for a selector whose operand is a variable
///   that is not annotated, directly or transitively through declarations.
///
/// Duplicate option names cannot occur here: the option map enforces
/// uniqueness when it is built, and the parser records the error.
pub(crate) fn check(message: &Message, errors: &mut StaticErrors) {
    let annotated = annotation_environment(message);

    if let MessageBody::Selectors {
        selectors,
        variants,
    } = message.body()
    {
        for selector in selectors {
            if selector.operator().is_none() {
                if let Operand::Variable(var) = selector.operand() {
                    if !annotated.get(var.as_str()).copied().unwrap_or(false) {
                        errors.add(StaticErrorKind::MissingSelectorAnnotation);
                    }
                }
            }
        }

        let selector_count = selectors.len();
        let mut default_exists = false;
        for variant in variants {
            if variant.keys.len() != selector_count {
                errors.add(StaticErrorKind::VariantKeyMismatch);
            }
            default_exists |= variant.keys.is_default();
        }
        if !default_exists {
            errors.add(StaticErrorKind::NonexhaustivePattern);
        }
    }
}

/// The annotation type environment: a two-point {annotated, unannotated}
/// lattice extended left-to-right over the local declarations.
///
/// `let $x = e` makes `$x` annotated iff `e` is a function call, or `e`'s
/// operand is a variable that is annotated in the enclosing environment.
fn annotation_environment(message: &Message) -> ahash::AHashMap<&str, bool> {
    let mut env = ahash::AHashMap::new();
    for binding in message.declarations() {
        let annotated = is_annotated(&binding.value, &env);
        env.insert(binding.name.as_str(), annotated);
    }
    env
}

fn is_annotated(expr: &Expression, env: &ahash::AHashMap<&str, bool>) -> bool {
    if expr.is_function_call() {
        return true;
    }
    match expr.operand() {
        Operand::Variable(var) => env.get(var.as_str()).copied().unwrap_or(false),
        _ => false,
    }
}
