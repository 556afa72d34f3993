//! First-order logic representation
//!
//! This module provides the formula tree the normalizer rewrites: terms,
//! predicates, the four node kinds and their rewrite operations, and the
//! clausal view of a normalized sentence.

pub mod clause;
pub mod connective;
pub mod formula;
pub mod negation;
pub mod predicate;
pub mod quantifier;
pub mod term;

// Re-export commonly used types
pub use clause::{ClausalForm, Clause, Literal, QuantifierBlock};
pub use connective::{Connective, ConnectiveKind};
pub use formula::Formula;
pub use negation::Negation;
pub use predicate::Predicate;
pub use quantifier::{Quantifier, QuantifierKind};
pub use term::Term;
