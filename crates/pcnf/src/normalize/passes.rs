//! The rewrite passes behind `Axiom::to_pcnf`
//!
//! Each pass takes the tree produced by the previous one by reference and
//! builds a new tree, so earlier stages stay valid as snapshots.

use super::naming::VariableNamer;
use crate::error::{NormalizeError, Result};
use crate::logic::{Connective, Formula, Predicate, Quantifier, Term};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace, warn};

/// Fresh variables for function elimination: `v0`, `v1`, ...
///
/// Names already occurring in the sentence are skipped.
pub struct FunctionVariables {
    prefix: String,
    next: usize,
    taken: HashSet<String>,
}

impl FunctionVariables {
    pub fn new(prefix: impl Into<String>, taken: HashSet<String>) -> Self {
        FunctionVariables {
            prefix: prefix.into(),
            next: 0,
            taken,
        }
    }

    pub fn next_name(&mut self) -> String {
        loop {
            let candidate = format!("{}{}", self.prefix, self.next);
            self.next += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Replace every function application by a fresh universally quantified
/// variable guarded by its defining relation.
///
/// Returns the rewritten sentence and the defining axioms in the order
/// they were produced.
pub fn substitute_functions(sentence: &Formula, fresh: &mut FunctionVariables) -> (Formula, Vec<Predicate>) {
    let mut definitions = Vec::new();
    let rewritten = substitute(sentence.clone(), fresh, &mut definitions);
    (rewritten, definitions)
}

fn substitute(formula: Formula, fresh: &mut FunctionVariables, definitions: &mut Vec<Predicate>) -> Formula {
    match formula {
        Formula::Predicate(p) if p.has_functions() => {
            let var = fresh.next_name();
            match p.substitute_function(&var) {
                Some((guarded, definition)) => {
                    trace!(predicate = %p, definition = %definition, "eliminated function application");
                    definitions.push(definition);
                    substitute(guarded, fresh, definitions)
                }
                None => Formula::Predicate(p),
            }
        }
        Formula::Predicate(p) => Formula::Predicate(p),
        Formula::Negation(n) => Formula::not(substitute(*n.child, fresh, definitions)),
        Formula::Connective(c) => Formula::Connective(Connective::new(
            c.kind,
            c.children
                .into_iter()
                .map(|child| substitute(child, fresh, definitions))
                .collect(),
        )),
        Formula::Quantifier(q) => Formula::Quantifier(Quantifier::new(
            q.kind,
            q.variables,
            substitute(*q.body, fresh, definitions),
        )),
    }
}

/// Closed sentences that make `relation` the graph of a total function.
///
/// For a relation `f/n+1` this is totality
/// `forall(v0..)[exists(v)[f(v0..,v)]]` and functionality
/// `forall(v0..,v,v')[(~f(v0..,v) | ~f(v0..,v') | =(v,v'))]`, where `=` is
/// the equality predicate. A nullary function drops the outer `forall` of
/// the totality sentence.
pub fn function_axioms(relation: &Predicate, prefix: &str) -> [Formula; 2] {
    let prefix = if prefix.is_empty() { "v" } else { prefix };
    let arity = relation.terms.len().saturating_sub(1);
    let arguments: Vec<String> = (0..arity).map(|i| format!("{}{}", prefix, i)).collect();
    let result = prefix.to_string();
    let other = format!("{}'", prefix);

    let atom = |value: &str| {
        let mut terms: Vec<Term> = arguments.iter().map(|a| Term::var(a.as_str())).collect();
        terms.push(Term::var(value));
        Formula::pred(relation.name.as_str(), terms)
    };

    let exists = Formula::exists([result.as_str()], atom(&result));
    let totality = if arguments.is_empty() {
        exists
    } else {
        Formula::forall(arguments.iter().map(String::as_str), exists)
    };

    let mut bound = arguments.clone();
    bound.extend([result.clone(), other.clone()]);
    let functionality = Formula::forall(
        bound,
        Formula::or(vec![
            Formula::not(atom(&result)),
            Formula::not(atom(&other)),
            Formula::pred("=", vec![Term::var(result.as_str()), Term::var(other.as_str())]),
        ]),
    );

    [totality, functionality]
}

/// Rename every bound variable to a name drawn from `namer`.
///
/// Each quantifier opens a scope mapping its variables to fresh names;
/// predicates resolve variables innermost scope first. A variable no scope
/// binds is left alone and treated as a constant. Names occurring free in
/// the sentence and constant names are never handed out.
pub fn standardize_variables(sentence: &Formula, namer: &mut dyn VariableNamer) -> Result<Formula> {
    let mut reserved = sentence.constants();
    reserved.extend(sentence.free_variables());

    let mut standardizer = Standardizer {
        namer,
        reserved,
        scopes: Vec::new(),
        renamed: 0,
    };
    standardizer.visit(sentence)
}

struct Standardizer<'a> {
    namer: &'a mut dyn VariableNamer,
    reserved: HashSet<String>,
    scopes: Vec<HashMap<String, String>>,
    renamed: usize,
}

impl Standardizer<'_> {
    fn fresh(&mut self) -> Result<String> {
        while let Some(name) = self.namer.next_name() {
            if !self.reserved.contains(&name) {
                self.renamed += 1;
                return Ok(name);
            }
        }
        Err(NormalizeError::VariableNamesExhausted { renamed: self.renamed })
    }

    fn resolve(&self, var: &str) -> Option<&String> {
        self.scopes.iter().rev().find_map(|scope| scope.get(var))
    }

    fn visit(&mut self, formula: &Formula) -> Result<Formula> {
        match formula {
            Formula::Predicate(p) => {
                let mut rename = |var: &str| match self.resolve(var) {
                    Some(fresh) => fresh.clone(),
                    None => {
                        warn!(variable = %var, predicate = %p, "unbound variable treated as a constant");
                        var.to_string()
                    }
                };
                Ok(Formula::Predicate(p.map_variables(&mut rename)))
            }
            Formula::Negation(n) => Ok(Formula::not(self.visit(&n.child)?)),
            Formula::Connective(c) => {
                let children = c
                    .children
                    .iter()
                    .map(|child| self.visit(child))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Formula::Connective(Connective::new(c.kind, children)))
            }
            Formula::Quantifier(q) => {
                let mut scope = HashMap::with_capacity(q.variables.len());
                let mut variables = Vec::with_capacity(q.variables.len());
                for var in &q.variables {
                    let fresh = self.fresh()?;
                    scope.insert(var.clone(), fresh.clone());
                    variables.push(fresh);
                }

                self.scopes.push(scope);
                let body = self.visit(&q.body);
                self.scopes.pop();

                Ok(Formula::Quantifier(Quantifier::new(q.kind, variables, body?)))
            }
        }
    }
}

/// Push every negation down to literal position
pub fn push_negation(sentence: &Formula) -> Formula {
    push(sentence.clone())
}

fn push(formula: Formula) -> Formula {
    match formula {
        Formula::Negation(n) if matches!(n.child.as_ref(), Formula::Predicate(_)) => Formula::Negation(n),
        Formula::Negation(n) => push(n.push_complete()),
        Formula::Connective(c) => Formula::Connective(Connective::new(
            c.kind,
            c.children.into_iter().map(push).collect(),
        )),
        Formula::Quantifier(q) => Formula::Quantifier(Quantifier::new(q.kind, q.variables, push(*q.body))),
        predicate @ Formula::Predicate(_) => predicate,
    }
}

/// Child-index paths of every node in breadth-first discovery order
pub fn breadth_first_paths(root: &Formula) -> Vec<Vec<usize>> {
    let mut order = Vec::new();
    let mut queue = VecDeque::from([(Vec::new(), root)]);
    while let Some((path, node)) = queue.pop_front() {
        for (i, child) in node.children().into_iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(i);
            queue.push_back((child_path, child));
        }
        order.push(path);
    }
    order
}

/// Move every quantifier into the prefix.
///
/// Nodes are visited in reverse breadth-first order so that all of a
/// node's descendants are rewritten before it. Quantifiers absorb nested
/// quantifiers of their kind; connectives are coalesced and then rescoped
/// under their parent. Each result replaces the node at its own path,
/// which stays valid because only the node's own subtree changes.
pub fn prenex(sentence: &Formula) -> Formula {
    let mut root = sentence.clone();

    for path in breadth_first_paths(sentence).into_iter().rev() {
        let Some(node) = root.at_path(&path).cloned() else {
            continue;
        };
        let parent = path
            .split_last()
            .and_then(|(_, parent_path)| root.at_path(parent_path));

        let rewritten = match node {
            Formula::Quantifier(q) => Formula::Quantifier(simplify_to_fixpoint(q)),
            Formula::Connective(c) => match c.coalesce() {
                Formula::Connective(c) => c.rescope(parent),
                collapsed => collapsed,
            },
            Formula::Predicate(_) | Formula::Negation(_) => continue,
        };

        trace!(path = ?path, node = %rewritten, "rewrote node");
        if let Some(slot) = root.at_path_mut(&path) {
            *slot = rewritten;
        }
    }

    root
}

fn simplify_to_fixpoint(mut quantifier: Quantifier) -> Quantifier {
    loop {
        let next = quantifier.clone().simplify();
        if next == quantifier {
            return quantifier;
        }
        debug!(quantifier = %next, "absorbed nested quantifier");
        quantifier = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::naming::{IndexedNames, ReverseAlphabet};

    fn p(name: &str, vars: &[&str]) -> Formula {
        Formula::pred(name, vars.iter().map(|v| Term::var(*v)).collect())
    }

    #[test]
    fn test_function_variables_skip_taken_names() {
        let taken: HashSet<String> = ["v0".to_string(), "v2".to_string()].into_iter().collect();
        let mut fresh = FunctionVariables::new("v", taken);
        assert_eq!(fresh.next_name(), "v1");
        assert_eq!(fresh.next_name(), "v3");
    }

    #[test]
    fn test_substitute_nested_functions() {
        // P(f(g(x)))
        let f = Formula::pred(
            "P",
            vec![Term::function("f", vec![Term::function("g", vec![Term::var("x")])])],
        );
        let mut fresh = FunctionVariables::new("v", f.names());
        let (rewritten, definitions) = substitute_functions(&f, &mut fresh);

        assert!(!rewritten.has_functions());
        let defs: Vec<String> = definitions.iter().map(|d| d.to_string()).collect();
        assert_eq!(defs, vec!["f(g(x),v0)", "g(x,v1)"]);
        assert_eq!(
            rewritten.to_string(),
            "forall(v0)[(~forall(v1)[(~g(x,v1) | f(v1,v0))] | P(v0))]"
        );
    }

    #[test]
    fn test_substitute_leaves_function_free_sentence() {
        let f = Formula::forall(["x"], p("P", &["x"]));
        let mut fresh = FunctionVariables::new("v", f.names());
        let (rewritten, definitions) = substitute_functions(&f, &mut fresh);
        assert_eq!(rewritten, f);
        assert!(definitions.is_empty());
    }

    #[test]
    fn test_function_axioms_are_closed() {
        let relation = Predicate::new("f", vec![Term::var("x"), Term::var("v0")]);
        let [totality, functionality] = function_axioms(&relation, "v");

        assert_eq!(totality.to_string(), "forall(v0)[exists(v)[f(v0,v)]]");
        assert_eq!(
            functionality.to_string(),
            "forall(v0,v,v')[(~f(v0,v) | ~f(v0,v') | =(v,v'))]"
        );
        assert!(totality.free_variables().is_empty());
        assert!(functionality.free_variables().is_empty());
        assert!(functionality.is_pcnf());
    }

    #[test]
    fn test_function_axioms_for_constant_function() {
        let relation = Predicate::new("c", vec![Term::var("v0")]);
        let [totality, functionality] = function_axioms(&relation, "r");
        assert_eq!(totality.to_string(), "exists(r)[c(r)]");
        assert_eq!(functionality.to_string(), "forall(r,r')[(~c(r) | ~c(r') | =(r,r'))]");
    }

    #[test]
    fn test_standardize_scopes_are_popped() {
        // (forall x P(x)) & (exists x Q(x)) & R(x)
        let f = Formula::and(vec![
            Formula::forall(["x"], p("P", &["x"])),
            Formula::exists(["x"], p("Q", &["x"])),
            p("R", &["x"]),
        ]);
        let result = standardize_variables(&f, &mut ReverseAlphabet::new()).unwrap();
        assert_eq!(result.to_string(), "(forall(z)[P(z)] & exists(y)[Q(y)] & R(x))");
    }

    #[test]
    fn test_standardize_innermost_binding_wins() {
        let f = Formula::forall(["x"], Formula::exists(["x"], p("P", &["x"])));
        let result = standardize_variables(&f, &mut ReverseAlphabet::new()).unwrap();
        assert_eq!(result.to_string(), "forall(z)[exists(y)[P(y)]]");
    }

    #[test]
    fn test_standardize_skips_free_names() {
        // the free z must not be captured by a fresh binder
        let f = Formula::forall(["x"], p("P", &["x", "z"]));
        let result = standardize_variables(&f, &mut ReverseAlphabet::new()).unwrap();
        assert_eq!(result.to_string(), "forall(y)[P(y,z)]");
    }

    #[test]
    fn test_standardize_skips_constant_names() {
        // forall x P(x, z) with z a constant: the binder must not print as z
        let f = Formula::forall(["x"], Formula::pred("P", vec![Term::var("x"), Term::constant("z")]));
        let result = standardize_variables(&f, &mut ReverseAlphabet::new()).unwrap();
        assert_eq!(result.to_string(), "forall(y)[P(y,z)]");
    }

    #[test]
    fn test_standardize_exhaustion() {
        let f = Formula::forall(["a", "b", "c"], p("P", &["a", "b", "c"]));
        let err = standardize_variables(&f, &mut IndexedNames::new("x", Some(2))).unwrap_err();
        assert_eq!(err, NormalizeError::VariableNamesExhausted { renamed: 2 });
    }

    #[test]
    fn test_push_negation() {
        // ~(forall x (P(x) & ~~Q(x)))
        let f = Formula::not(Formula::forall(
            ["x"],
            Formula::and(vec![p("P", &["x"]), Formula::not(Formula::not(p("Q", &["x"])))]),
        ));
        let result = push_negation(&f);
        assert_eq!(result.to_string(), "exists(x)[(~P(x) | ~Q(x))]");
        assert!(result.is_negation_normal());
    }

    #[test]
    fn test_breadth_first_paths() {
        let f = Formula::and(vec![Formula::not(p("P", &[])), p("Q", &[])]);
        assert_eq!(
            breadth_first_paths(&f),
            vec![vec![], vec![0], vec![1], vec![0, 0]]
        );
    }

    #[test]
    fn test_prenex_hoists_through_levels() {
        // (P | (Q & exists y R(y))) -> exists(y)[(P | (Q & R(y)))]
        let f = Formula::or(vec![
            p("P", &[]),
            Formula::and(vec![p("Q", &[]), Formula::exists(["y"], p("R", &["y"]))]),
        ]);
        let result = prenex(&f);
        assert_eq!(result.to_string(), "exists(y)[(P | (Q & R(y)))]");
        assert!(result.is_prenex());
    }

    #[test]
    fn test_prenex_merges_under_quantifier() {
        // forall x ((forall y P(x,y)) & Q(x)) -> forall(x,y)[(P(x,y) & Q(x))]
        let f = Formula::forall(
            ["x"],
            Formula::and(vec![Formula::forall(["y"], p("P", &["x", "y"])), p("Q", &["x"])]),
        );
        assert_eq!(prenex(&f).to_string(), "forall(x,y)[(P(x,y) & Q(x))]");
    }
}
