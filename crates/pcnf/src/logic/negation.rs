//! Negation nodes

use super::connective::Connective;
use super::formula::Formula;
use super::quantifier::Quantifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Negation of exactly one sub-formula
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Negation {
    pub child: Box<Formula>,
}

impl Negation {
    pub fn new(child: Formula) -> Self {
        Negation {
            child: Box::new(child),
        }
    }

    /// Push this negation one level past its child.
    ///
    /// - `~(A & B)` becomes `~A | ~B` and `~(A | B)` becomes `~A & ~B`
    /// - `~forall(x)[A]` becomes `exists(x)[~A]` and vice versa
    /// - `~~A` becomes `A`
    /// - `~P(..)` is already a literal and is returned unchanged
    ///
    /// Negations created on the children are not pushed further.
    pub fn push_complete(self) -> Formula {
        match *self.child {
            Formula::Connective(c) => Formula::Connective(Connective::new(
                c.kind.dual(),
                c.children.into_iter().map(Formula::not).collect(),
            )),
            Formula::Quantifier(q) => Formula::Quantifier(Quantifier::new(
                q.kind.dual(),
                q.variables,
                Formula::not(*q.body),
            )),
            Formula::Negation(inner) => *inner.child,
            literal @ Formula::Predicate(_) => Formula::not(literal),
        }
    }
}

impl fmt::Display for Negation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.child)
    }
}
