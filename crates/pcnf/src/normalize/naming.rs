//! Fresh variable names for standardizing a sentence apart

use serde::{Deserialize, Serialize};

/// Source of fresh bound-variable names
pub trait VariableNamer {
    /// The next unused name, or `None` once the supply is exhausted
    fn next_name(&mut self) -> Option<String>;
}

/// Single letters from `z` down to `a`: 26 names in total
#[derive(Debug, Clone)]
pub struct ReverseAlphabet {
    next: Option<u8>,
}

impl ReverseAlphabet {
    pub fn new() -> Self {
        ReverseAlphabet { next: Some(b'z') }
    }
}

impl Default for ReverseAlphabet {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableNamer for ReverseAlphabet {
    fn next_name(&mut self) -> Option<String> {
        let letter = self.next?;
        self.next = if letter == b'a' { None } else { Some(letter - 1) };
        Some(char::from(letter).to_string())
    }
}

/// `prefix` followed by a counter: `x0`, `x1`, ...
#[derive(Debug, Clone)]
pub struct IndexedNames {
    prefix: String,
    next: usize,
    limit: Option<usize>,
}

impl IndexedNames {
    pub fn new(prefix: impl Into<String>, limit: Option<usize>) -> Self {
        IndexedNames {
            prefix: prefix.into(),
            next: 0,
            limit,
        }
    }
}

impl VariableNamer for IndexedNames {
    fn next_name(&mut self) -> Option<String> {
        if self.limit.is_some_and(|limit| self.next >= limit) {
            return None;
        }
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        Some(name)
    }
}

/// Which namer `standardize_variables` uses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    #[default]
    ReverseAlphabet,
    Indexed {
        prefix: String,
        limit: Option<usize>,
    },
}

impl NamingPolicy {
    pub fn namer(&self) -> Box<dyn VariableNamer> {
        match self {
            NamingPolicy::ReverseAlphabet => Box::new(ReverseAlphabet::new()),
            NamingPolicy::Indexed { prefix, limit } => Box::new(IndexedNames::new(prefix.clone(), *limit)),
        }
    }
}
