//! Normalization of sentences to prenex conjunctive normal form
//!
//! The pipeline runs, in order:
//! 1. function elimination
//! 2. standardizing bound variables apart
//! 3. pushing negation to the predicates
//! 4. a bottom-up pass moving quantifiers to the prefix
//! 5. flattening the matrix into clauses

pub mod axiom;
pub mod naming;
pub mod passes;


pub use axiom::Axiom;
pub use naming::{IndexedNames, NamingPolicy, ReverseAlphabet, VariableNamer};
pub use passes::{breadth_first_paths, function_axioms, prenex, FunctionVariables};
