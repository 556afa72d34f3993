//! Terms in first-order logic

use serde::{Deserialize, Serialize};
use std::fmt;

/// A term appearing as an argument of a predicate
///
/// Parsers cannot always tell variables from constants, so a `Variable`
/// that no quantifier binds is kept as is and behaves like a constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Variable(String),
    Constant(String),
    Function { name: String, args: Vec<Term> },
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    pub fn function(name: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Function {
            name: name.into(),
            args,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Term::Function { .. })
    }

    /// Names of all variable occurrences, including those nested in functions
    pub fn variables(&self) -> Vec<&str> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables<'a>(&'a self, vars: &mut Vec<&'a str>) {
        match self {
            Term::Variable(name) => vars.push(name),
            Term::Constant(_) => {}
            Term::Function { args, .. } => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    /// Names of all constant occurrences, including those nested in functions
    pub fn constants(&self) -> Vec<&str> {
        match self {
            Term::Variable(_) => vec![],
            Term::Constant(name) => vec![name.as_str()],
            Term::Function { args, .. } => args.iter().flat_map(Term::constants).collect(),
        }
    }

    /// Rebuild this term, passing every variable name through `rename`
    pub fn map_variables<F>(&self, rename: &mut F) -> Term
    where
        F: FnMut(&str) -> String,
    {
        match self {
            Term::Variable(name) => Term::Variable(rename(name)),
            Term::Constant(_) => self.clone(),
            Term::Function { name, args } => Term::Function {
                name: name.clone(),
                args: args.iter().map(|arg| arg.map_variables(rename)).collect(),
            },
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) | Term::Constant(name) => write!(f, "{}", name),
            Term::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_include_nested_function_arguments() {
        let t = Term::function("f", vec![Term::var("x"), Term::function("g", vec![Term::var("y")])]);
        assert_eq!(t.variables(), vec!["x", "y"]);
    }

    #[test]
    fn test_constants_include_nested_function_arguments() {
        let t = Term::function("f", vec![Term::constant("a"), Term::function("g", vec![Term::constant("b"), Term::var("a")])]);
        assert_eq!(t.constants(), vec!["a", "b"]);
    }

    #[test]
    fn test_map_variables_leaves_constants() {
        let t = Term::function("f", vec![Term::var("x"), Term::constant("x")]);
        let renamed = t.map_variables(&mut |name| format!("{}1", name));
        assert_eq!(renamed.to_string(), "f(x1,x)");
    }

    #[test]
    fn test_display() {
        let t = Term::function("f", vec![Term::var("x"), Term::constant("a")]);
        assert_eq!(t.to_string(), "f(x,a)");
    }
}
