//! Predicates: non-logical symbols applied to terms

use super::formula::Formula;
use super::term::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A predicate symbol applied to an ordered sequence of terms
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub name: String,
    pub terms: Vec<Term>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, terms: Vec<Term>) -> Self {
        Predicate {
            name: name.into(),
            terms,
        }
    }

    /// True if any argument is a function application
    pub fn has_functions(&self) -> bool {
        self.terms.iter().any(Term::is_function)
    }

    /// Names of all variable occurrences in argument order
    pub fn variables(&self) -> Vec<&str> {
        self.terms.iter().flat_map(Term::variables).collect()
    }

    /// Eliminate one function application from the arguments.
    ///
    /// The leftmost top-level function term `f(t1..tn)` is replaced (every
    /// identical occurrence of it) by `result`. Returns the rewritten sentence
    /// `forall(result)[~f(t1..tn,result) | P(..result..)]` together with the
    /// defining relational axiom `f(t1..tn,result)`, or `None` when there is
    /// no function term left.
    ///
    /// Arguments of the defining axiom may still hold nested function terms;
    /// callers repeat the substitution on the rewritten sentence until
    /// `has_functions` is false everywhere.
    pub fn substitute_function(&self, result: &str) -> Option<(Formula, Predicate)> {
        let target = self.terms.iter().find(|t| t.is_function())?.clone();
        let Term::Function { name, args } = &target else {
            return None;
        };

        let mut relation_args = args.clone();
        relation_args.push(Term::var(result));
        let definition = Predicate::new(name.clone(), relation_args);

        let terms = self
            .terms
            .iter()
            .map(|t| if *t == target { Term::var(result) } else { t.clone() })
            .collect();
        let rewritten = Predicate::new(self.name.clone(), terms);

        let guarded = Formula::forall(
            vec![result.to_string()],
            Formula::or(vec![
                Formula::not(Formula::Predicate(definition.clone())),
                Formula::Predicate(rewritten),
            ]),
        );

        Some((guarded, definition))
    }

    /// Names of all constant occurrences in argument order
    pub fn constants(&self) -> Vec<&str> {
        self.terms.iter().flat_map(Term::constants).collect()
    }

    /// Rebuild with every variable name passed through `rename`
    pub fn map_variables<F>(&self, rename: &mut F) -> Predicate
    where
        F: FnMut(&str) -> String,
    {
        Predicate {
            name: self.name.clone(),
            terms: self.terms.iter().map(|t| t.map_variables(rename)).collect(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.terms.is_empty() {
            write!(f, "(")?;
            for (i, term) in self.terms.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", term)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
