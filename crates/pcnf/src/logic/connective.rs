//! Conjunction and disjunction nodes

use super::formula::Formula;
use super::quantifier::{Quantifier, QuantifierKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectiveKind {
    And,
    Or,
}

impl ConnectiveKind {
    /// The kind De Morgan's laws turn this connective into
    pub fn dual(self) -> Self {
        match self {
            ConnectiveKind::And => ConnectiveKind::Or,
            ConnectiveKind::Or => ConnectiveKind::And,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ConnectiveKind::And => "&",
            ConnectiveKind::Or => "|",
        }
    }
}

/// An n-ary conjunction or disjunction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connective {
    pub kind: ConnectiveKind,
    pub children: Vec<Formula>,
}

impl Connective {
    pub fn new(kind: ConnectiveKind, children: Vec<Formula>) -> Self {
        Connective { kind, children }
    }

    /// Splice children of the same kind into this node.
    ///
    /// `(A & (B & C))` becomes `(A & B & C)`. Only immediate children are
    /// flattened. A connective left with a single child collapses to it.
    pub fn coalesce(self) -> Formula {
        let kind = self.kind;
        let mut children = Vec::with_capacity(self.children.len());
        for child in self.children {
            match child {
                Formula::Connective(inner) if inner.kind == kind => children.extend(inner.children),
                other => children.push(other),
            }
        }

        if children.len() == 1 {
            children.remove(0)
        } else {
            Formula::Connective(Connective { kind, children })
        }
    }

    /// Pull the quantifiers found among the children out past this connective.
    ///
    /// Children are scanned left to right and each quantified child gives up
    /// its whole prefix, outermost block first. Hoisting is sound as long as
    /// a hoisted variable does not occur free in a sibling and does not clash
    /// with a variable hoisted before it; otherwise the variable is renamed to
    /// a primed variant (`x'`, `x''`, ...) that occurs nowhere in `parent`
    /// (the node itself when it is the root).
    ///
    /// Returns the quantifier prefix wrapping the coalesced connective, with
    /// adjacent blocks of the same kind merged, or the connective unchanged
    /// when no child is quantified.
    pub fn rescope(self, parent: Option<&Formula>) -> Formula {
        let kind = self.kind;
        let mut children = self.children;

        let mut reserved: HashSet<String> = HashSet::new();
        if let Some(parent) = parent {
            reserved.extend(parent.names());
            reserved.extend(parent.constants());
        }
        for child in &children {
            reserved.extend(child.names());
            reserved.extend(child.constants());
        }

        let mut prefix: Vec<(QuantifierKind, Vec<String>)> = Vec::new();
        let mut hoisted: HashSet<String> = HashSet::new();

        while let Some(index) = children
            .iter()
            .position(|child| matches!(child, Formula::Quantifier(_)))
        {
            let Formula::Quantifier(quantifier) = children.remove(index) else {
                break;
            };

            let sibling_free: HashSet<String> = children
                .iter()
                .flat_map(|sibling| sibling.free_variables())
                .collect();

            let mut body = *quantifier.body;
            let mut variables = Vec::with_capacity(quantifier.variables.len());
            for var in quantifier.variables {
                if sibling_free.contains(&var) || hoisted.contains(&var) {
                    let fresh = variant(&var, &reserved);
                    debug!(from = %var, to = %fresh, "renaming bound variable to avoid capture");
                    body = body.rename_free(&var, &fresh);
                    reserved.insert(fresh.clone());
                    variables.push(fresh);
                } else {
                    variables.push(var);
                }
            }

            hoisted.extend(variables.iter().cloned());
            match prefix.last_mut() {
                Some((last_kind, block)) if *last_kind == quantifier.kind => block.extend(variables),
                _ => prefix.push((quantifier.kind, variables)),
            }
            children.insert(index, body);
        }

        if prefix.is_empty() {
            return Formula::Connective(Connective { kind, children });
        }

        let matrix = Connective { kind, children }.coalesce();
        prefix
            .into_iter()
            .rev()
            .fold(matrix, |body, (quantifier_kind, variables)| {
                Formula::Quantifier(Quantifier::new(quantifier_kind, variables, body))
            })
    }
}

/// `name` followed by as many primes as needed to avoid `reserved`
fn variant(name: &str, reserved: &HashSet<String>) -> String {
    let mut candidate = format!("{}'", name);
    while reserved.contains(&candidate) {
        candidate.push('\'');
    }
    candidate
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.kind.symbol())?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Term;

    fn p(name: &str, vars: &[&str]) -> Formula {
        Formula::pred(name, vars.iter().map(|v| Term::var(*v)).collect())
    }

    fn and(children: Vec<Formula>) -> Connective {
        Connective::new(ConnectiveKind::And, children)
    }

    fn or(children: Vec<Formula>) -> Connective {
        Connective::new(ConnectiveKind::Or, children)
    }

    #[test]
    fn test_coalesce_flattens_same_kind() {
        let c = and(vec![
            p("A", &[]),
            Formula::and(vec![p("B", &[]), p("C", &[])]),
            Formula::or(vec![p("D", &[]), p("E", &[])]),
        ]);
        assert_eq!(c.coalesce().to_string(), "(A & B & C & (D | E))");
    }

    #[test]
    fn test_coalesce_collapses_single_child() {
        let c = or(vec![Formula::or(vec![p("A", &[])])]);
        assert_eq!(c.coalesce(), p("A", &[]));
    }

    #[test]
    fn test_rescope_hoists_over_conjunction() {
        // (forall(x)[P(x)] & Q) -> forall(x)[(P(x) & Q)]
        let c = and(vec![Formula::forall(["x"], p("P", &["x"])), p("Q", &[])]);
        assert_eq!(c.rescope(None).to_string(), "forall(x)[(P(x) & Q)]");
    }

    #[test]
    fn test_rescope_without_quantifiers_is_unchanged() {
        let c = or(vec![p("P", &["x"]), p("Q", &["x"])]);
        assert_eq!(c.clone().rescope(None), Formula::Connective(c));
    }

    #[test]
    fn test_rescope_renames_on_capture() {
        // (forall(x)[P(x)] & Q(x)): the free x in Q must not be captured
        let c = and(vec![Formula::forall(["x"], p("P", &["x"])), p("Q", &["x"])]);
        assert_eq!(c.rescope(None).to_string(), "forall(x')[(P(x') & Q(x))]");
    }

    #[test]
    fn test_rescope_fresh_name_avoids_parent_names() {
        let c = and(vec![Formula::exists(["x"], p("P", &["x"])), p("Q", &["x"])]);
        let parent = Formula::forall(["x'"], Formula::Connective(c.clone()));
        assert_eq!(
            c.rescope(Some(&parent)).to_string(),
            "exists(x'')[(P(x'') & Q(x))]"
        );
    }

    #[test]
    fn test_rescope_fresh_name_avoids_constants() {
        // a constant named x' must stay distinguishable from the renamed binder
        let c = and(vec![
            Formula::forall(["x"], Formula::pred("P", vec![Term::var("x"), Term::constant("x'")])),
            p("Q", &["x"]),
        ]);
        assert_eq!(c.rescope(None).to_string(), "forall(x'')[(P(x'',x') & Q(x))]");
    }

    #[test]
    fn test_rescope_hoists_every_quantified_child() {
        // (forall(x)[P(x)] | exists(y)[forall(w)[R(y,w)]] | S)
        let c = or(vec![
            Formula::forall(["x"], p("P", &["x"])),
            Formula::exists(["y"], Formula::forall(["w"], p("R", &["y", "w"]))),
            p("S", &[]),
        ]);
        let result = c.rescope(None);
        assert_eq!(
            result.to_string(),
            "forall(x)[exists(y)[forall(w)[(P(x) | R(y,w) | S)]]]"
        );
        assert!(result.is_prenex());
    }

    #[test]
    fn test_rescope_merges_adjacent_same_kind_blocks() {
        let c = and(vec![
            Formula::forall(["x"], p("P", &["x"])),
            Formula::forall(["y"], p("Q", &["y"])),
        ]);
        assert_eq!(c.rescope(None).to_string(), "forall(x,y)[(P(x) & Q(y))]");
    }

    #[test]
    fn test_rescope_renames_repeated_bound_names() {
        let c = and(vec![
            Formula::forall(["x"], p("P", &["x"])),
            Formula::exists(["x"], p("Q", &["x"])),
        ]);
        assert_eq!(c.rescope(None).to_string(), "forall(x)[exists(x')[(P(x) & Q(x'))]]");
    }

    #[test]
    fn test_rescope_coalesces_hoisted_bodies() {
        let c = and(vec![
            Formula::forall(["x"], Formula::and(vec![p("P", &["x"]), p("R", &["x"])])),
            p("Q", &[]),
        ]);
        assert_eq!(c.rescope(None).to_string(), "forall(x)[(P(x) & R(x) & Q)]");
    }
}
