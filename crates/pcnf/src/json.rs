//! JSON input and output for sentences and their clausal form

use crate::error::{NormalizeError, Result};
use crate::logic::{ClausalForm, Formula, Literal, Predicate, Term};
use crate::normalize::Axiom;
use serde::{Deserialize, Serialize};

/// Decode a sentence tree.
///
/// This is the untyped boundary of the crate, so anything that is not a
/// formula node is reported as an invalid sentence.
pub fn parse_sentence(json: &str) -> Result<Formula> {
    serde_json::from_str(json).map_err(|e| NormalizeError::InvalidSentence(e.to_string()))
}

/// JSON representation of a term
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TermJson {
    Variable { name: String },
    Constant { name: String },
    Function { name: String, args: Vec<TermJson> },
}

impl TermJson {
    pub fn from_term(term: &Term) -> Self {
        match term {
            Term::Variable(name) => TermJson::Variable { name: name.clone() },
            Term::Constant(name) => TermJson::Constant { name: name.clone() },
            Term::Function { name, args } => TermJson::Function {
                name: name.clone(),
                args: args.iter().map(TermJson::from_term).collect(),
            },
        }
    }
}

/// JSON representation of an atom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomJson {
    pub predicate: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TermJson>,
}

impl AtomJson {
    pub fn from_predicate(predicate: &Predicate) -> Self {
        AtomJson {
            predicate: predicate.name.clone(),
            args: predicate.terms.iter().map(TermJson::from_term).collect(),
        }
    }
}

/// JSON representation of a literal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralJson {
    pub polarity: bool,
    pub atom: AtomJson,
}

impl LiteralJson {
    pub fn from_literal(lit: &Literal) -> Self {
        LiteralJson {
            polarity: lit.polarity,
            atom: AtomJson::from_predicate(&lit.predicate),
        }
    }
}

/// JSON representation of one quantifier block of the prefix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantifierJson {
    pub quantifier: String,
    pub variables: Vec<String>,
}

/// JSON representation of a normalized axiom
///
/// The function axioms of the sentence are nested under `definitions` in
/// the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClausalFormJson {
    pub prefix: Vec<QuantifierJson>,
    pub clauses: Vec<Vec<LiteralJson>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<ClausalFormJson>,
}

impl ClausalFormJson {
    pub fn from_form(form: &ClausalForm) -> Self {
        ClausalFormJson {
            prefix: form
                .prefix
                .iter()
                .map(|block| QuantifierJson {
                    quantifier: block.kind.keyword().to_string(),
                    variables: block.variables.clone(),
                })
                .collect(),
            clauses: form
                .clauses
                .iter()
                .map(|clause| clause.literals.iter().map(LiteralJson::from_literal).collect())
                .collect(),
            definitions: Vec::new(),
        }
    }
}

/// Render a normalized axiom, with its function axioms, as JSON
pub fn clausal_form_to_json(axiom: &Axiom) -> Result<String> {
    let mut json = ClausalFormJson::from_form(&axiom.clausal_form()?);
    for definition in axiom.definitions() {
        json.definitions
            .push(ClausalFormJson::from_form(&ClausalForm::from_pcnf(definition)?));
    }
    serde_json::to_string(&json).map_err(|e| NormalizeError::Json(e.to_string()))
}
