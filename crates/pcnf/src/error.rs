//! Error types for sentence normalization

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The input is not a well-formed sentence tree
    #[error("Invalid sentence: {0}")]
    InvalidSentence(String),

    /// The fresh-name strategy ran dry while standardizing bound variables
    #[error("Ran out of fresh variable names after renaming {renamed} bound variables")]
    VariableNamesExhausted { renamed: usize },

    /// A clausal view was requested for a sentence that is not in PCNF
    #[error("Sentence is not in prenex conjunctive normal form: {0}")]
    NotClausal(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
