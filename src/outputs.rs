use std::collections::HashMap;

use crate::variable::{Variable, VariableKey};

/// Result of one evaluation: a crisp value and the aggregated profile per output variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs {
    defuzzificated: HashMap<VariableKey, f64>,
    aggregated: HashMap<VariableKey, Vec<f64>>,
    firing_strengths: Vec<f64>,
}

impl Outputs {
    pub(crate) fn new(
        defuzzificated: HashMap<VariableKey, f64>,
        aggregated: HashMap<VariableKey, Vec<f64>>,
        firing_strengths: Vec<f64>,
    ) -> Self {
        Self {
            defuzzificated,
            aggregated,
            firing_strengths,
        }
    }

    pub fn get_inferred_value(&self, var: Variable) -> Option<f64> {
        self.defuzzificated.get(&var.0).copied()
    }

    /// Aggregated profile, aligned with the output variable's universe.
    pub fn aggregated(&self, var: Variable) -> Option<&[f64]> {
        self.aggregated.get(&var.0).map(Vec::as_slice)
    }

    /// Firing strength of every rule, in rule base order.
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }
}
