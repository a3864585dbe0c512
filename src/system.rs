use crate::error::{FuzzyError, Result};
use crate::fuzzify::DegreeMap;
use crate::inference::MinMaxInference;
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::variable::{Kind, Variable, VariableConstraints, Variables};

/// Variables, rules and inference settings fixed at construction.
///
/// Evaluation never mutates the system, so one instance can serve any number of
/// concurrent evaluations.
pub struct FuzzySystem {
    vars: Variables,
    rules: Rules,
    model: MinMaxInference,
}

impl FuzzySystem {
    pub fn new(vars: Variables, rules: Rules, model: MinMaxInference) -> Self {
        Self { vars, rules, model }
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn model(&self) -> MinMaxInference {
        self.model
    }

    pub fn variable(&self, name: &str) -> Result<Variable> {
        self.vars.lookup(name)
    }

    fn constraints(&self, name: &str) -> Result<&VariableConstraints> {
        let var = self.vars.lookup(name)?;

        self.vars
            .get(var)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))
    }

    /// Sample points of the named variable.
    pub fn universe(&self, name: &str) -> Result<&[f64]> {
        Ok(self.constraints(name)?.universe())
    }

    /// Every term of the named variable with its profile over the universe, in declaration order.
    pub fn terms(&self, name: &str) -> Result<Vec<(&str, &[f64])>> {
        Ok(self
            .constraints(name)?
            .terms()
            .iter()
            .map(|term| (term.name(), term.profile()))
            .collect())
    }

    /// Fuzzifies `value` against the named input variable using the system's fuzzification mode.
    pub fn fuzzify(&self, name: &str, value: f64) -> Result<DegreeMap> {
        let var = self.constraints(name)?;

        if var.kind() != Kind::Input {
            return Err(FuzzyError::NotAnInput(name.to_owned()));
        }
        if value.is_nan() {
            return Err(FuzzyError::InvalidInput {
                variable: name.to_owned(),
                value,
            });
        }

        Ok(self.model.fuzzification().fuzzify(value, var))
    }

    pub fn eval(&self, inputs: &Inputs) -> Result<Outputs> {
        self.model.eval(&self.vars, &self.rules, inputs)
    }
}
