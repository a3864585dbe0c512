use std::collections::HashMap;

use tracing::{debug, trace};

use crate::dsl::Antecedent;
use crate::error::{FuzzyError, Result};
use crate::fuzzify::{DegreeMap, Fuzzification};
use crate::inputs::Inputs;
use crate::ops::{and_min, clip, or_max, Domain};
use crate::outputs::Outputs;
use crate::rules::{Rule, Rules};
use crate::variable::{Kind, VariableKey, Variables};

/// Fuzzified facts, one degree map per input variable.
pub type Facts = HashMap<VariableKey, DegreeMap>;

/// Min-max (Mamdani) inference: min for AND and implication, max for aggregation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinMaxInference {
    fuzzification: Fuzzification,
    domain: Domain,
}

impl MinMaxInference {
    pub fn new(fuzzification: Fuzzification, domain: Domain) -> Self {
        Self {
            fuzzification,
            domain,
        }
    }

    pub fn fuzzification(&self) -> Fuzzification {
        self.fuzzification
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Converts the crisp value of every input variable into term degrees.
    ///
    /// Out-of-range values, infinities included, saturate to the universe bounds; NaN is rejected.
    pub fn fuzzify(&self, vars: &Variables, inputs: &Inputs) -> Result<Facts> {
        vars.of_kind(Kind::Input)
            .map(|(var, constraints)| {
                let value = *inputs
                    .values
                    .get(&var.0)
                    .ok_or_else(|| FuzzyError::MissingInput(constraints.name.clone()))?;

                if value.is_nan() {
                    return Err(FuzzyError::InvalidInput {
                        variable: constraints.name.clone(),
                        value,
                    });
                }

                Ok((var.0, self.fuzzification.fuzzify(value, constraints)))
            })
            .collect()
    }

    /// Firing strength of every rule and the max-aggregated clipped consequents of
    /// every output variable. Outputs no rule reaches stay all-zero.
    pub fn aggregate(
        &self,
        vars: &Variables,
        rules: &Rules,
        facts: &Facts,
    ) -> (Vec<f64>, HashMap<VariableKey, Vec<f64>>) {
        let mut aggregated: HashMap<VariableKey, Vec<f64>> = vars
            .of_kind(Kind::Output)
            .map(|(var, constraints)| (var.0, vec![0.; constraints.universe.len()]))
            .collect();
        let mut strengths = Vec::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            let strength = firing_strength(rule, facts);

            trace!(rule = i, strength, "rule fired");

            for (key, clipped) in implicate(vars, rule, strength) {
                if let Some(agg) = aggregated.get_mut(&key) {
                    or_max(agg, &clipped);
                }
            }

            strengths.push(strength);
        }

        (strengths, aggregated)
    }

    pub fn eval(&self, vars: &Variables, rules: &Rules, inputs: &Inputs) -> Result<Outputs> {
        let facts = self.fuzzify(vars, inputs)?;
        let (strengths, aggregated) = self.aggregate(vars, rules, &facts);
        let mut defuzzificated = HashMap::with_capacity(aggregated.len());

        for (key, aggregated_membership) in &aggregated {
            let var = &vars.0[*key];
            let method = inputs.method(*key);
            let value = method.defuzzify(self.domain, &var.universe, aggregated_membership);

            debug!(variable = %var.name, %method, value, "defuzzificated");

            defuzzificated.insert(*key, value);
        }

        Ok(Outputs::new(defuzzificated, aggregated, strengths))
    }
}

/// Minimum over the rule's antecedent degrees. A wildcard slot contributes 1.
pub fn firing_strength(rule: &Rule, facts: &Facts) -> f64 {
    and_min(rule.antecedent.iter().map(|(key, slot)| match slot {
        Antecedent::Required(term) => facts.get(key).map_or(0., |degrees| degrees.degree(*term)),
        Antecedent::Wildcard => 1.,
    }))
}

/// Each consequent term's profile clipped to `strength`.
pub fn implicate<'a>(
    vars: &'a Variables,
    rule: &'a Rule,
    strength: f64,
) -> impl Iterator<Item = (VariableKey, Vec<f64>)> + 'a {
    rule.consequent.iter().filter_map(move |(key, term)| {
        let profile = &vars.0.get(*key)?.terms.get(*term)?.profile;

        Some((*key, clip(profile, strength)))
    })
}

#[cfg(test)]
fn service_system() -> (Variables, Rules, [crate::variable::Variable; 3]) {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;

    let mut vars = Variables::new();
    let service = vars
        .add(
            "Service",
            Kind::Input,
            0. ..=10.,
            11,
            Terms::new()
                .with("Poor", MembershipFunction::trapezoidal(0., 0., 2., 6.).unwrap())
                .with("Good", MembershipFunction::trapezoidal(4., 8., 10., 10.).unwrap()),
        )
        .unwrap();
    let food = vars
        .add(
            "Food",
            Kind::Input,
            0. ..=10.,
            11,
            Terms::new()
                .with("Bad", MembershipFunction::trapezoidal(0., 0., 3., 7.).unwrap())
                .with("Tasty", MembershipFunction::trapezoidal(3., 7., 10., 10.).unwrap()),
        )
        .unwrap();
    let tip = vars
        .add(
            "Tip",
            Kind::Output,
            0. ..=20.,
            21,
            Terms::new()
                .with("Small", MembershipFunction::triangular(0., 0., 10.).unwrap())
                .with("Large", MembershipFunction::triangular(10., 20., 20.).unwrap()),
        )
        .unwrap();
    let mut rules = Rules::new();

    rules
        .add(&vars, [service.is("Poor"), food.any()], [tip.becomes("Small")])
        .unwrap();
    rules
        .add(&vars, [service.is("Good"), food.is("Tasty")], [tip.becomes("Large")])
        .unwrap();

    (vars, rules, [service, food, tip])
}

#[test]
fn test_firing_strengths() {
    let (vars, rules, [service, food, tip]) = service_system();
    let mut inputs = Inputs::new();

    inputs.add(service, 5.);
    inputs.add(food, 9.);

    let model = MinMaxInference::default();
    let outputs = model.eval(&vars, &rules, &inputs).unwrap();

    // Poor(5) = 0.25, Good(5) = 0.25, Tasty(9) = 1
    assert_eq!(outputs.firing_strengths(), &[0.25, 0.25]);

    let aggregated = outputs.aggregated(tip).unwrap();

    assert_eq!(aggregated.len(), 21);
    assert!(aggregated.iter().all(|m| *m <= 0.25));
    assert_eq!(aggregated[0], 0.25);
    assert_eq!(aggregated[10], 0.);
    assert_eq!(aggregated[20], 0.25);
    assert!((outputs.get_inferred_value(tip).unwrap() - 10.).abs() < 1e-9);
}

#[test]
fn test_wildcard_ignores_fact() {
    let (vars, rules, [service, food, _]) = service_system();
    let model = MinMaxInference::default();
    let mut strengths = Vec::new();

    for food_value in [0., 2.5, 5., 7.5, 10.] {
        let mut inputs = Inputs::new();

        inputs.add(service, 3.);
        inputs.add(food, food_value);

        let facts = model.fuzzify(&vars, &inputs).unwrap();

        strengths.push(firing_strength(&rules.0[0], &facts));
    }

    assert!(strengths.iter().all(|s| *s == 0.75));
}

#[test]
fn test_unfired_rules_leave_zero_profile() {
    let (vars, rules, [service, food, tip]) = service_system();
    let mut inputs = Inputs::new();

    // Poor(10) = 0 and Tasty(0) = 0
    inputs.add(service, 10.);
    inputs.add(food, 0.);

    for method in crate::ops::DefuzzificationOp::ALL {
        inputs.defuzzify_with(tip, method);

        let outputs = MinMaxInference::default().eval(&vars, &rules, &inputs).unwrap();

        assert_eq!(outputs.firing_strengths(), &[0., 0.]);
        assert!(outputs.aggregated(tip).unwrap().iter().all(|m| *m == 0.));
        assert_eq!(outputs.get_inferred_value(tip), Some(0.));
    }
}

#[test]
fn test_missing_input() {
    let (vars, rules, [service, _, _]) = service_system();
    let mut inputs = Inputs::new();

    inputs.add(service, 4.);

    assert_eq!(
        MinMaxInference::default().eval(&vars, &rules, &inputs),
        Err(FuzzyError::MissingInput("Food".into()))
    );
}

#[test]
fn test_nan_input_is_rejected() {
    let (vars, rules, [service, food, _]) = service_system();
    let mut inputs = Inputs::new();

    inputs.add(service, f64::NAN);
    inputs.add(food, 8.);

    assert!(matches!(
        MinMaxInference::default().eval(&vars, &rules, &inputs),
        Err(FuzzyError::InvalidInput { variable, value }) if variable == "Service" && value.is_nan()
    ));

    inputs.add(service, f64::INFINITY);

    assert!(MinMaxInference::default().eval(&vars, &rules, &inputs).is_ok());
}
