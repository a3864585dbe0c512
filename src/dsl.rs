use serde::{Deserialize, Serialize};

use crate::variable::{Variable, VariableKey};

/// One antecedent slot of a rule.
///
/// `T` is a term name while a rule is being declared and a term index once the
/// rule has been checked against its variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Antecedent<T = String> {
    /// The variable must be in this term
    Required(T),
    /// Don't care: the variable is treated as fully satisfied
    Wildcard,
}

/// `variable is term` (or `variable is anything`) on the premise side of a rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub(crate) var: VariableKey,
    pub(crate) antecedent: Antecedent,
}

/// `variable is term` on the consequence side of a rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Conclusion {
    pub(crate) var: VariableKey,
    pub(crate) term: String,
}

impl Variable {
    pub fn is(self, term: impl Into<String>) -> Condition {
        Condition {
            var: self.0,
            antecedent: Antecedent::Required(term.into()),
        }
    }

    pub fn any(self) -> Condition {
        Condition {
            var: self.0,
            antecedent: Antecedent::Wildcard,
        }
    }

    pub fn becomes(self, term: impl Into<String>) -> Conclusion {
        Conclusion {
            var: self.0,
            term: term.into(),
        }
    }
}
