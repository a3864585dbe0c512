use serde::{Deserialize, Serialize};

use crate::math::interp;
use crate::variable::VariableConstraints;

/// How a crisp value is turned into term degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fuzzification {
    /// Evaluate each membership function at the value directly
    #[default]
    Exact,
    /// Interpolate each term's sampled profile over the universe
    Interpolated,
}

/// Degree of membership per linguistic term, in the variable's term order.
#[derive(Clone, Debug, PartialEq)]
pub struct DegreeMap(Vec<(String, f64)>);

impl DegreeMap {
    pub fn get(&self, term: &str) -> Option<f64> {
        self.0.iter().find(|(name, _)| name == term).map(|(_, d)| *d)
    }

    /// Degree of the term at position `index` in the variable's term list.
    pub fn degree(&self, index: usize) -> f64 {
        self.0.get(index).map_or(0., |(_, d)| *d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, d)| (name.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Fuzzification {
    /// Clips `value` into the universe, then grades it against every term of `var`.
    pub fn fuzzify(self, value: f64, var: &VariableConstraints) -> DegreeMap {
        let x = var.clip(value);
        let degrees = var
            .terms
            .iter()
            .map(|term| {
                let degree = match self {
                    _ if x.is_nan() => 0.,
                    Self::Exact => term.membership.evaluate(x),
                    Self::Interpolated => interp(
                        Some(x),
                        var.universe.iter().copied().zip(term.profile.iter().copied()),
                    )
                    .first()
                    .copied()
                    .unwrap_or(0.),
                };

                (term.name.clone(), degree)
            })
            .collect();

        DegreeMap(degrees)
    }
}

/// Exact fuzzification of `value` against `var`.
pub fn fuzzify(value: f64, var: &VariableConstraints) -> DegreeMap {
    Fuzzification::Exact.fuzzify(value, var)
}

#[cfg(test)]
fn days() -> crate::variable::Variables {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;
    use crate::variable::{Kind, Variables};

    let terms = Terms::new()
        .with("Low", MembershipFunction::trapezoidal(0., 0., 5., 15.).unwrap())
        .with("Medium", MembershipFunction::trapezoidal(5., 20., 30., 45.).unwrap())
        .with("High", MembershipFunction::trapezoidal(30., 45., 50., 50.).unwrap());
    let mut vars = Variables::new();

    vars.add("Days", Kind::Input, 0. ..=50., 51, terms).unwrap();
    vars
}

#[test]
fn test_fuzzify_days() {
    let vars = days();
    let var = vars.get(vars.lookup("Days").unwrap()).unwrap();
    let degrees = fuzzify(40., var);

    assert_eq!(degrees.len(), 3);
    assert_eq!(degrees.get("Low"), Some(0.));
    assert!((degrees.get("Medium").unwrap() - 1. / 3.).abs() < 1e-12);
    assert!((degrees.get("High").unwrap() - 2. / 3.).abs() < 1e-12);
    assert_eq!(degrees.get("Expired"), None);
    assert_eq!(
        degrees.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        vec!["Low", "Medium", "High"]
    );
}

#[test]
fn test_fuzzify_saturates_out_of_range() {
    let vars = days();
    let var = vars.get(vars.lookup("Days").unwrap()).unwrap();

    assert_eq!(fuzzify(-12., var), fuzzify(0., var));
    assert_eq!(fuzzify(400., var), fuzzify(50., var));
    assert_eq!(fuzzify(-12., var).get("Low"), Some(1.));
}

#[test]
fn test_fuzzify_nan_has_no_degree() {
    let vars = days();
    let var = vars.get(vars.lookup("Days").unwrap()).unwrap();

    for mode in [Fuzzification::Exact, Fuzzification::Interpolated] {
        assert!(mode.fuzzify(f64::NAN, var).iter().all(|(_, degree)| degree == 0.));
    }
    assert_eq!(fuzzify(f64::INFINITY, var), fuzzify(50., var));
    assert_eq!(fuzzify(f64::NEG_INFINITY, var), fuzzify(0., var));
}

#[test]
fn test_interpolated_matches_exact() {
    let vars = days();
    let var = vars.get(vars.lookup("Days").unwrap()).unwrap();

    // Every breakpoint sits on a sample point, so interpolation is exact up to rounding
    for x in [0., 3.5, 5., 12.25, 20., 37.5, 44.9, 50., 70.] {
        let exact = Fuzzification::Exact.fuzzify(x, var);
        let interpolated = Fuzzification::Interpolated.fuzzify(x, var);

        for ((_, e), (_, i)) in exact.iter().zip(interpolated.iter()) {
            assert!((e - i).abs() < 1e-12, "x = {x}: {e} != {i}");
        }
    }
}
