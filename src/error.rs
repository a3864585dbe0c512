use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    #[error("Invalid breakpoints {0:?}: must be finite and non-decreasing")]
    InvalidBreakpoints(Vec<f64>),

    #[error("Invalid universe for variable '{name}': [{min}, {max}] sampled at {samples} points")]
    InvalidUniverse {
        name: String,
        min: f64,
        max: f64,
        samples: usize,
    },

    #[error("Variable '{0}' is defined more than once")]
    DuplicateVariable(String),

    #[error("Term '{term}' is defined more than once on variable '{variable}'")]
    DuplicateTerm { variable: String, term: String },

    #[error("Term '{term}' on variable '{variable}' has breakpoints outside the universe")]
    TermOutOfRange { variable: String, term: String },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown term '{term}' on variable '{variable}'")]
    UnknownTerm { variable: String, term: String },

    #[error("Variable '{0}' is not an input and cannot appear in a rule antecedent")]
    NotAnInput(String),

    #[error("Variable '{0}' is not an output and cannot appear in a rule consequent")]
    NotAnOutput(String),

    #[error("Variable '{0}' appears more than once on the same side of a rule")]
    DuplicateSlot(String),

    #[error("Rule antecedent has no slot for input variable '{0}'")]
    IncompleteAntecedent(String),

    #[error("Rule consequent has no term for output variable '{0}'")]
    IncompleteConsequent(String),

    #[error("Unknown defuzzification method '{0}' (expected centroid, bisector, som, lom or mom)")]
    UnknownMethod(String),

    #[error("No crisp value supplied for input variable '{0}'")]
    MissingInput(String),

    #[error("Crisp value {value} for input variable '{variable}' is not a number")]
    InvalidInput { variable: String, value: f64 },
}

pub type Result<T> = std::result::Result<T, FuzzyError>;
