//! Clausal view of a sentence in prenex conjunctive normal form

use super::connective::ConnectiveKind;
use super::formula::Formula;
use super::predicate::Predicate;
use super::quantifier::QuantifierKind;
use crate::error::{NormalizeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal (positive or negative predicate)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub polarity: bool, // true = positive, false = negative
    pub predicate: Predicate,
}

impl Literal {
    pub fn positive(predicate: Predicate) -> Self {
        Literal {
            polarity: true,
            predicate,
        }
    }

    pub fn negative(predicate: Predicate) -> Self {
        Literal {
            polarity: false,
            predicate,
        }
    }

    fn from_formula(formula: &Formula) -> Option<Literal> {
        match formula {
            Formula::Predicate(p) => Some(Literal::positive(p.clone())),
            Formula::Negation(n) => match n.child.as_ref() {
                Formula::Predicate(p) => Some(Literal::negative(p.clone())),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Clause { literals }
    }

    fn from_formula(formula: &Formula) -> Option<Clause> {
        match formula {
            Formula::Connective(c) if c.kind == ConnectiveKind::Or => c
                .children
                .iter()
                .map(Literal::from_formula)
                .collect::<Option<Vec<_>>>()
                .map(Clause::new),
            other => Literal::from_formula(other).map(|lit| Clause::new(vec![lit])),
        }
    }
}

/// One block of the quantifier prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantifierBlock {
    pub kind: QuantifierKind,
    pub variables: Vec<String>,
}

/// A quantifier prefix over a conjunction of clauses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClausalForm {
    pub prefix: Vec<QuantifierBlock>,
    pub clauses: Vec<Clause>,
}

impl ClausalForm {
    /// Read a sentence in prenex conjunctive normal form.
    ///
    /// Fails with `NotClausal` if a quantifier occurs below the prefix or
    /// the matrix is not a conjunction of disjunctions of literals.
    pub fn from_pcnf(formula: &Formula) -> Result<ClausalForm> {
        let mut prefix = Vec::new();
        let mut node = formula;
        while let Formula::Quantifier(q) = node {
            prefix.push(QuantifierBlock {
                kind: q.kind,
                variables: q.variables.clone(),
            });
            node = &q.body;
        }

        let conjuncts: Vec<&Formula> = match node {
            Formula::Connective(c) if c.kind == ConnectiveKind::And => c.children.iter().collect(),
            other => vec![other],
        };

        let clauses = conjuncts
            .into_iter()
            .map(|conjunct| {
                Clause::from_formula(conjunct)
                    .ok_or_else(|| NormalizeError::NotClausal(conjunct.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ClausalForm { prefix, clauses })
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "~")?;
        }
        write!(f, "{}", self.predicate)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "⊥");
        }
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", lit)?;
        }
        Ok(())
    }
}

impl fmt::Display for ClausalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.prefix {
            write!(f, "{}({}) ", block.kind.keyword(), block.variables.join(","))?;
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " & ")?;
            }
            write!(f, "[{}]", clause)?;
        }
        Ok(())
    }
}
