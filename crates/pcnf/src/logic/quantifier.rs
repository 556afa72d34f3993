//! Quantifier nodes

use super::formula::Formula;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantifierKind {
    Forall,
    Exists,
}

impl QuantifierKind {
    /// The kind a negation turns this quantifier into
    pub fn dual(self) -> Self {
        match self {
            QuantifierKind::Forall => QuantifierKind::Exists,
            QuantifierKind::Exists => QuantifierKind::Forall,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            QuantifierKind::Forall => "forall",
            QuantifierKind::Exists => "exists",
        }
    }
}

/// A block of variables bound by one quantifier over a single scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantifier {
    pub kind: QuantifierKind,
    pub variables: Vec<String>,
    pub body: Box<Formula>,
}

impl Quantifier {
    pub fn new(kind: QuantifierKind, variables: Vec<String>, body: Formula) -> Self {
        Quantifier {
            kind,
            variables,
            body: Box::new(body),
        }
    }

    pub fn binds(&self, var: &str) -> bool {
        self.variables.iter().any(|v| v == var)
    }

    /// Absorb an immediately nested quantifier of the same kind.
    ///
    /// `forall(x)[forall(y)[A]]` becomes `forall(x,y)[A]`. A name bound by
    /// both blocks is kept once. Only one level is absorbed per call.
    pub fn simplify(self) -> Quantifier {
        match *self.body {
            Formula::Quantifier(inner) if inner.kind == self.kind => {
                let mut variables = self.variables;
                for var in inner.variables {
                    if !variables.contains(&var) {
                        variables.push(var);
                    }
                }
                Quantifier {
                    kind: self.kind,
                    variables,
                    body: inner.body,
                }
            }
            body => Quantifier {
                kind: self.kind,
                variables: self.variables,
                body: Box::new(body),
            },
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})[{}]", self.kind.keyword(), self.variables.join(","), self.body)
    }
}
