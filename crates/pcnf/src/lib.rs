//! pcnf: normalization of first-order sentences to prenex conjunctive normal form
//!
//! A sentence is a tree of predicates, negations, `And`/`Or` connectives
//! and `Forall`/`Exists` quantifiers. [`Axiom::to_pcnf`] eliminates
//! function applications, standardizes bound variables apart, pushes
//! negation to the predicates, moves every quantifier into a prefix and
//! flattens the remaining matrix into a conjunction of clauses.
//!
//! ```
//! use pcnf::{Axiom, Formula, Term};
//!
//! let x = || Term::var("x");
//! let sentence = Formula::forall(
//!     ["x"],
//!     Formula::implies(Formula::pred("P", vec![x()]), Formula::pred("Q", vec![x()])),
//! );
//! let normalized = Axiom::new(sentence).unwrap().to_pcnf().unwrap();
//! assert_eq!(normalized.to_string(), "forall(z)[(~P(z) | Q(z))]");
//! ```

pub mod config;
pub mod error;
pub mod json;
pub mod logic;
pub mod normalize;

pub use config::NormalizerConfig;
pub use error::{NormalizeError, Result};
pub use json::{clausal_form_to_json, parse_sentence};
pub use logic::{
    ClausalForm, Clause, Connective, ConnectiveKind, Formula, Literal, Negation, Predicate,
    Quantifier, QuantifierBlock, QuantifierKind, Term,
};
pub use normalize::{Axiom, IndexedNames, NamingPolicy, ReverseAlphabet, VariableNamer};
