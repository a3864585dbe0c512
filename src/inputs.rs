use std::collections::HashMap;

use crate::ops::DefuzzificationOp;
use crate::variable::{Variable, VariableKey};

/// Crisp facts for one evaluation, plus the defuzzification method wanted per output.
#[derive(Clone, Debug, Default)]
pub struct Inputs {
    pub(crate) values: HashMap<VariableKey, f64>,
    pub(crate) methods: HashMap<VariableKey, DefuzzificationOp>,
}

impl Inputs {
    pub fn new() -> Self {
        Inputs::default()
    }

    pub fn add(&mut self, var: Variable, val: f64) {
        self.values.insert(var.0, val);
    }

    /// Outputs without an explicit method use the centroid.
    pub fn defuzzify_with(&mut self, var: Variable, method: DefuzzificationOp) {
        self.methods.insert(var.0, method);
    }

    pub(crate) fn method(&self, key: VariableKey) -> DefuzzificationOp {
        self.methods
            .get(&key)
            .copied()
            .unwrap_or(DefuzzificationOp::Centroid)
    }
}
