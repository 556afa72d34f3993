//! Formula trees
//!
//! A sentence is a tree of four node kinds: predicates, negations,
//! connectives (`And`/`Or`) and quantifiers (`Forall`/`Exists`). Each
//! non-leaf kind lives in its own struct carrying the rewrite operations
//! that apply to it; this module holds the enum tying them together plus
//! the whole-tree queries used by the normalizer.

use super::connective::{Connective, ConnectiveKind};
use super::negation::Negation;
use super::predicate::Predicate;
use super::quantifier::{Quantifier, QuantifierKind};
use super::term::Term;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::trace;

/// A node of a first-order sentence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    Predicate(Predicate),
    Negation(Negation),
    Connective(Connective),
    Quantifier(Quantifier),
}

impl Formula {
    pub fn pred(name: impl Into<String>, terms: Vec<Term>) -> Formula {
        Formula::Predicate(Predicate::new(name, terms))
    }

    pub fn not(child: Formula) -> Formula {
        Formula::Negation(Negation::new(child))
    }

    pub fn and(children: Vec<Formula>) -> Formula {
        Formula::Connective(Connective::new(ConnectiveKind::And, children))
    }

    pub fn or(children: Vec<Formula>) -> Formula {
        Formula::Connective(Connective::new(ConnectiveKind::Or, children))
    }

    pub fn forall<I, S>(variables: I, body: Formula) -> Formula
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Formula::Quantifier(Quantifier::new(
            QuantifierKind::Forall,
            variables.into_iter().map(Into::into).collect(),
            body,
        ))
    }

    pub fn exists<I, S>(variables: I, body: Formula) -> Formula
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Formula::Quantifier(Quantifier::new(
            QuantifierKind::Exists,
            variables.into_iter().map(Into::into).collect(),
            body,
        ))
    }

    /// `a -> b`, encoded as `~a | b`
    pub fn implies(antecedent: Formula, consequent: Formula) -> Formula {
        Formula::or(vec![Formula::not(antecedent), consequent])
    }

    /// `a <-> b`, encoded as `(~a | b) & (~b | a)`
    pub fn iff(left: Formula, right: Formula) -> Formula {
        Formula::and(vec![
            Formula::implies(left.clone(), right.clone()),
            Formula::implies(right, left),
        ])
    }

    /// Immediate children in order (a quantifier's only child is its scope)
    pub fn children(&self) -> Vec<&Formula> {
        match self {
            Formula::Predicate(_) => vec![],
            Formula::Negation(n) => vec![n.child.as_ref()],
            Formula::Connective(c) => c.children.iter().collect(),
            Formula::Quantifier(q) => vec![q.body.as_ref()],
        }
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut Formula> {
        match self {
            Formula::Predicate(_) => None,
            Formula::Negation(n) if index == 0 => Some(n.child.as_mut()),
            Formula::Quantifier(q) if index == 0 => Some(q.body.as_mut()),
            Formula::Connective(c) => c.children.get_mut(index),
            _ => None,
        }
    }

    /// Node reached by following child indices from this node
    pub fn at_path(&self, path: &[usize]) -> Option<&Formula> {
        let mut node = self;
        for &index in path {
            node = *node.children().get(index)?;
        }
        Some(node)
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Formula> {
        let mut node = self;
        for &index in path {
            node = node.child_mut(index)?;
        }
        Some(node)
    }

    /// Variables occurring outside the scope of any quantifier binding them,
    /// in order of first occurrence
    pub fn free_variables(&self) -> IndexSet<String> {
        let mut free = IndexSet::new();
        self.collect_free_variables(&mut Vec::new(), &mut free);
        free
    }

    fn collect_free_variables(&self, bound: &mut Vec<String>, free: &mut IndexSet<String>) {
        match self {
            Formula::Predicate(p) => {
                for var in p.variables() {
                    if !bound.iter().any(|b| b == var) {
                        free.insert(var.to_string());
                    }
                }
            }
            Formula::Negation(n) => n.child.collect_free_variables(bound, free),
            Formula::Connective(c) => {
                for child in &c.children {
                    child.collect_free_variables(bound, free);
                }
            }
            Formula::Quantifier(q) => {
                let depth = bound.len();
                bound.extend(q.variables.iter().cloned());
                q.body.collect_free_variables(bound, free);
                bound.truncate(depth);
            }
        }
    }

    /// Every variable name in the tree, bound or free
    pub fn names(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut HashSet<String>) {
        match self {
            Formula::Predicate(p) => names.extend(p.variables().into_iter().map(String::from)),
            Formula::Negation(n) => n.child.collect_names(names),
            Formula::Connective(c) => {
                for child in &c.children {
                    child.collect_names(names);
                }
            }
            Formula::Quantifier(q) => {
                names.extend(q.variables.iter().cloned());
                q.body.collect_names(names);
            }
        }
    }

    /// Every constant symbol in the tree
    pub fn constants(&self) -> HashSet<String> {
        self.predicates()
            .into_iter()
            .flat_map(|p| p.constants().into_iter().map(String::from))
            .collect()
    }

    /// Rename the free occurrences of `from` to `to`
    pub fn rename_free(&self, from: &str, to: &str) -> Formula {
        match self {
            Formula::Predicate(p) => Formula::Predicate(p.map_variables(&mut |var| {
                if var == from {
                    to.to_string()
                } else {
                    var.to_string()
                }
            })),
            Formula::Negation(n) => Formula::not(n.child.rename_free(from, to)),
            Formula::Connective(c) => Formula::Connective(Connective::new(
                c.kind,
                c.children.iter().map(|child| child.rename_free(from, to)).collect(),
            )),
            Formula::Quantifier(q) if q.binds(from) => self.clone(),
            Formula::Quantifier(q) => Formula::Quantifier(Quantifier::new(
                q.kind,
                q.variables.clone(),
                q.body.rename_free(from, to),
            )),
        }
    }

    /// All predicates in depth-first order
    pub fn predicates(&self) -> Vec<&Predicate> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Formula::Predicate(p) = node {
                out.push(p);
            }
            stack.extend(node.children().into_iter().rev());
        }
        out
    }

    /// All quantifier nodes in depth-first order
    pub fn quantifiers(&self) -> Vec<&Quantifier> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Formula::Quantifier(q) = node {
                out.push(q);
            }
            stack.extend(node.children().into_iter().rev());
        }
        out
    }

    pub fn has_functions(&self) -> bool {
        self.predicates().iter().any(|p| p.has_functions())
    }

    /// A predicate or a negated predicate
    pub fn is_literal(&self) -> bool {
        match self {
            Formula::Predicate(_) => true,
            Formula::Negation(n) => matches!(n.child.as_ref(), Formula::Predicate(_)),
            _ => false,
        }
    }

    /// Negation occurs only directly above predicates
    pub fn is_negation_normal(&self) -> bool {
        match self {
            Formula::Predicate(_) => true,
            Formula::Negation(_) => self.is_literal(),
            _ => self.children().iter().all(|child| child.is_negation_normal()),
        }
    }

    fn contains_quantifier(&self) -> bool {
        match self {
            Formula::Quantifier(_) => true,
            _ => self.children().iter().any(|child| child.contains_quantifier()),
        }
    }

    /// The quantifier-free part below the outermost quantifier prefix
    pub fn matrix(&self) -> &Formula {
        let mut node = self;
        while let Formula::Quantifier(q) = node {
            node = &q.body;
        }
        node
    }

    /// All quantifiers form a contiguous prefix from the root
    pub fn is_prenex(&self) -> bool {
        !self.matrix().contains_quantifier()
    }

    /// A literal, a disjunction of literals, or a conjunction of those
    pub fn is_clausal_matrix(&self) -> bool {
        match self {
            Formula::Connective(c) if c.kind == ConnectiveKind::And => {
                c.children.iter().all(Formula::is_clause)
            }
            _ => self.is_clause(),
        }
    }

    fn is_clause(&self) -> bool {
        match self {
            Formula::Connective(c) if c.kind == ConnectiveKind::Or => {
                c.children.iter().all(Formula::is_literal)
            }
            _ => self.is_literal(),
        }
    }

    pub fn is_pcnf(&self) -> bool {
        self.matrix().is_clausal_matrix()
    }

    /// Flatten the quantifier-free matrix into a conjunction of disjunctions.
    ///
    /// The quantifier prefix is kept as is. `Or` is distributed over `And`,
    /// duplicate literals within a clause and duplicate clauses are dropped
    /// keeping first occurrences. A single clause stands for the whole
    /// conjunction and a single literal for its clause.
    pub fn to_onf(self) -> Formula {
        match self {
            Formula::Quantifier(q) => {
                Formula::Quantifier(Quantifier::new(q.kind, q.variables, q.body.to_onf()))
            }
            matrix => {
                let clauses: IndexSet<Vec<Formula>> = matrix_clauses(matrix)
                    .into_iter()
                    .map(|clause| clause.into_iter().collect::<IndexSet<_>>().into_iter().collect())
                    .collect();

                let mut clauses: Vec<Formula> = clauses
                    .into_iter()
                    .map(|mut literals| {
                        if literals.len() == 1 {
                            literals.remove(0)
                        } else {
                            Formula::or(literals)
                        }
                    })
                    .collect();

                if clauses.len() == 1 {
                    clauses.remove(0)
                } else {
                    Formula::and(clauses)
                }
            }
        }
    }
}

/// Clauses of a quantifier-free matrix, each clause a list of literals
fn matrix_clauses(formula: Formula) -> Vec<Vec<Formula>> {
    match formula {
        Formula::Connective(c) => match c.kind {
            ConnectiveKind::And => c.children.into_iter().flat_map(matrix_clauses).collect(),
            ConnectiveKind::Or => c.children.into_iter().fold(vec![vec![]], |acc, child| {
                let right = matrix_clauses(child);
                let mut product = Vec::with_capacity(acc.len() * right.len());
                for left_clause in &acc {
                    for right_clause in &right {
                        let mut combined = left_clause.clone();
                        combined.extend(right_clause.iter().cloned());
                        product.push(combined);
                    }
                }
                product
            }),
        },
        Formula::Quantifier(q) => {
            trace!(quantifier = %q, "quantifier inside matrix kept as an opaque literal");
            vec![vec![Formula::Quantifier(q).to_onf()]]
        }
        literal => vec![vec![literal]],
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Predicate(p) => write!(f, "{}", p),
            Formula::Negation(n) => write!(f, "{}", n),
            Formula::Connective(c) => write!(f, "{}", c),
            Formula::Quantifier(q) => write!(f, "{}", q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str, vars: &[&str]) -> Formula {
        Formula::pred(name, vars.iter().map(|v| Term::var(*v)).collect())
    }

    #[test]
    fn test_display() {
        let f = Formula::forall(
            ["x", "y"],
            Formula::or(vec![Formula::not(p("P", &["x"])), p("Q", &["x", "y"])]),
        );
        assert_eq!(f.to_string(), "forall(x,y)[(~P(x) | Q(x,y))]");
    }

    #[test]
    fn test_implication_and_biconditional_encoding() {
        let imp = Formula::implies(p("P", &["x"]), p("Q", &["x"]));
        assert_eq!(imp.to_string(), "(~P(x) | Q(x))");

        let iff = Formula::iff(p("A", &[]), p("B", &[]));
        assert_eq!(iff.to_string(), "((~A | B) & (~B | A))");
    }

    #[test]
    fn test_free_variables_respect_scope() {
        // (forall x P(x,y)) & Q(x)
        let f = Formula::and(vec![
            Formula::forall(["x"], p("P", &["x", "y"])),
            p("Q", &["x"]),
        ]);
        let free: Vec<String> = f.free_variables().into_iter().collect();
        assert_eq!(free, vec!["y".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_constants_are_kept_apart_from_variable_names() {
        let f = Formula::forall(
            ["x"],
            Formula::pred("P", vec![Term::var("x"), Term::function("g", vec![Term::constant("z")])]),
        );
        let constants: Vec<String> = f.constants().into_iter().collect();
        assert_eq!(constants, vec!["z".to_string()]);
        assert!(!f.names().contains("z"));
    }

    #[test]
    fn test_rename_free_stops_at_rebinding() {
        let f = Formula::and(vec![p("P", &["x"]), Formula::exists(["x"], p("Q", &["x"]))]);
        assert_eq!(f.rename_free("x", "w").to_string(), "(P(w) & exists(x)[Q(x)])");
    }

    #[test]
    fn test_paths() {
        let mut f = Formula::and(vec![p("P", &[]), Formula::not(p("Q", &[]))]);
        assert_eq!(f.at_path(&[1, 0]).unwrap().to_string(), "Q");
        assert!(f.at_path(&[2]).is_none());

        *f.at_path_mut(&[0]).unwrap() = p("R", &[]);
        assert_eq!(f.to_string(), "(R & ~Q)");
    }

    #[test]
    fn test_prenex_and_clausal_checks() {
        let good = Formula::forall(
            ["x"],
            Formula::and(vec![Formula::or(vec![p("P", &["x"]), p("Q", &["x"])]), p("R", &[])]),
        );
        assert!(good.is_prenex());
        assert!(good.is_pcnf());

        let nested = Formula::and(vec![Formula::forall(["x"], p("P", &["x"])), p("Q", &[])]);
        assert!(!nested.is_prenex());

        let or_of_and = Formula::or(vec![Formula::and(vec![p("P", &[]), p("Q", &[])]), p("R", &[])]);
        assert!(or_of_and.is_prenex());
        assert!(!or_of_and.is_pcnf());
    }

    #[test]
    fn test_to_onf_distributes_or_over_and() {
        // (A & B) | C  ->  (A | C) & (B | C)
        let f = Formula::or(vec![Formula::and(vec![p("A", &[]), p("B", &[])]), p("C", &[])]);
        let onf = f.to_onf();
        assert_eq!(onf.to_string(), "((A | C) & (B | C))");
        assert!(onf.is_pcnf());
    }

    #[test]
    fn test_to_onf_keeps_prefix_and_drops_duplicates() {
        let f = Formula::exists(
            ["x"],
            Formula::and(vec![
                Formula::or(vec![p("P", &["x"]), p("P", &["x"])]),
                p("P", &["x"]),
            ]),
        );
        assert_eq!(f.to_onf().to_string(), "exists(x)[P(x)]");
    }

    #[test]
    fn test_to_onf_flattens_nested_connectives() {
        let f = Formula::and(vec![
            Formula::and(vec![p("A", &[]), p("B", &[])]),
            Formula::or(vec![p("C", &[]), Formula::or(vec![p("D", &[]), Formula::not(p("E", &[]))])]),
        ]);
        assert_eq!(f.to_onf().to_string(), "(A & B & (C | D | ~E))");
    }
}
