//! A single sentence and the pipeline that normalizes it

use super::naming::VariableNamer;
use super::passes::{self, FunctionVariables};
use crate::config::NormalizerConfig;
use crate::error::{NormalizeError, Result};
use crate::logic::{ClausalForm, Formula};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// One sentence of a theory
///
/// Every operation returns a new `Axiom` and leaves `self` untouched.
/// The closed function axioms introduced by function elimination travel
/// with the sentence through every later pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axiom {
    sentence: Formula,
    definitions: Vec<Formula>,
    config: NormalizerConfig,
}

impl Axiom {
    pub fn new(sentence: Formula) -> Result<Self> {
        Self::with_config(sentence, NormalizerConfig::default())
    }

    pub fn with_config(sentence: Formula, config: NormalizerConfig) -> Result<Self> {
        validate(&sentence)?;
        Ok(Axiom {
            sentence,
            definitions: Vec::new(),
            config,
        })
    }

    /// Build an axiom from a JSON-encoded sentence tree
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(crate::json::parse_sentence(json)?)
    }

    pub fn sentence(&self) -> &Formula {
        &self.sentence
    }

    /// Closed sentences making each relation introduced by function
    /// elimination the graph of a total function, two per function symbol
    pub fn definitions(&self) -> &[Formula] {
        &self.definitions
    }

    pub fn into_sentence(self) -> Formula {
        self.sentence
    }

    fn derive(&self, sentence: Formula, definitions: Vec<Formula>) -> Axiom {
        Axiom {
            sentence,
            definitions,
            config: self.config.clone(),
        }
    }

    /// Replace function applications by guarded fresh variables
    pub fn substitute_functions(&self) -> Axiom {
        let mut fresh = FunctionVariables::new(
            self.config.function_variable_prefix.clone(),
            self.taken_names(),
        );
        let (sentence, introduced) = passes::substitute_functions(&self.sentence, &mut fresh);

        let mut definitions = self.definitions.clone();
        for relation in &introduced {
            for axiom in passes::function_axioms(relation, &self.config.function_variable_prefix) {
                if !definitions.contains(&axiom) {
                    definitions.push(axiom);
                }
            }
        }

        debug!(sentence = %sentence, definitions = definitions.len(), "substituted functions");
        self.derive(sentence, definitions)
    }

    /// Rename bound variables apart using the configured naming policy
    pub fn standardize_variables(&self) -> Result<Axiom> {
        let mut namer = self.config.naming.namer();
        self.standardize_variables_with(namer.as_mut())
    }

    pub fn standardize_variables_with(&self, namer: &mut dyn VariableNamer) -> Result<Axiom> {
        let sentence = passes::standardize_variables(&self.sentence, namer)?;
        debug!(sentence = %sentence, "standardized variables");
        Ok(self.derive(sentence, self.definitions.clone()))
    }

    /// Move negations down to the predicates
    pub fn push_negation(&self) -> Axiom {
        let sentence = passes::push_negation(&self.sentence);
        debug!(sentence = %sentence, "pushed negation");
        self.derive(sentence, self.definitions.clone())
    }

    /// Normalize to prenex conjunctive normal form
    pub fn to_pcnf(&self) -> Result<Axiom> {
        let axiom = self.substitute_functions().standardize_variables()?.push_negation();

        let prenex = passes::prenex(&axiom.sentence);
        debug!(sentence = %prenex, "moved quantifiers to prefix");

        let sentence = prenex.to_onf();
        debug!(sentence = %sentence, "converted matrix to clausal form");

        Ok(axiom.derive(sentence, axiom.definitions.clone()))
    }

    pub fn is_pcnf(&self) -> bool {
        self.sentence.is_prenex() && self.sentence.is_pcnf()
    }

    /// Clausal view of an axiom already in prenex conjunctive normal form
    pub fn clausal_form(&self) -> Result<ClausalForm> {
        ClausalForm::from_pcnf(&self.sentence)
    }

    fn taken_names(&self) -> HashSet<String> {
        let mut taken = self.sentence.names();
        taken.extend(self.sentence.constants());
        taken
    }
}

/// Reject trees that no rewrite can make sense of
fn validate(formula: &Formula) -> Result<()> {
    match formula {
        Formula::Predicate(p) if p.name.is_empty() => {
            Err(NormalizeError::InvalidSentence("predicate with an empty name".to_string()))
        }
        Formula::Predicate(_) => Ok(()),
        Formula::Negation(n) => validate(&n.child),
        Formula::Connective(c) if c.children.is_empty() => Err(NormalizeError::InvalidSentence(format!(
            "'{}' connective without operands",
            c.kind.symbol()
        ))),
        Formula::Connective(c) => c.children.iter().try_for_each(validate),
        Formula::Quantifier(q) => {
            if q.variables.is_empty() {
                return Err(NormalizeError::InvalidSentence(format!(
                    "{} binds no variables",
                    q.kind.keyword()
                )));
            }
            let mut seen = HashSet::new();
            for var in &q.variables {
                if var.is_empty() || !seen.insert(var.as_str()) {
                    return Err(NormalizeError::InvalidSentence(format!(
                        "{} has an empty or repeated variable '{}'",
                        q.kind.keyword(),
                        var
                    )));
                }
            }
            validate(&q.body)
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sentence)
    }
}
