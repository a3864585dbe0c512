use std::fmt;
use std::str::FromStr;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::math::interp;

/// Fuzzy AND over a rule's antecedent degrees. An empty premise is fully satisfied.
pub fn and_min<F: Float>(degrees: impl IntoIterator<Item = F>) -> F {
    degrees.into_iter().fold(F::one(), F::min)
}

/// Clips a consequent profile to the rule's firing strength (min implication).
pub fn clip<F: Float>(profile: &[F], strength: F) -> Vec<F> {
    profile.iter().map(|m| F::min(*m, strength)).collect()
}

/// Folds `profile` into `aggregated` with pointwise max.
pub fn or_max<F: Float>(aggregated: &mut [F], profile: &[F]) {
    for (agg, m) in aggregated.iter_mut().zip(profile) {
        *agg = F::max(*agg, *m);
    }
}

/// Whether profiles are read as samples of a discrete distribution or of a
/// piecewise-linear curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    Discrete,
    Continuous,
}

/// Method for defuzzificating the resulting membership function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefuzzificationOp {
    /// Center of gravity
    Centroid,
    /// Bisector of area
    Bisector,
    /// Smallest value for which the membership function is maximum
    Som,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Mean of the values for which the membership function is maximum
    Mom,
}

impl DefuzzificationOp {
    pub const ALL: [Self; 5] = [Self::Centroid, Self::Bisector, Self::Som, Self::Lom, Self::Mom];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::Bisector => "bisector",
            Self::Som => "som",
            Self::Lom => "lom",
            Self::Mom => "mom",
        }
    }

    pub fn defuzzify<F: Float>(self, domain: Domain, universe: &[F], membership: &[F]) -> F {
        match domain {
            Domain::Discrete => self.call(universe, membership),
            Domain::Continuous => self.call_continuous(universe, membership),
        }
    }

    /// Reduces `membership`, sampled at `universe`, to one crisp value treating the
    /// samples as a discrete distribution. An all-zero profile gives zero.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> F {
        let total = membership.iter().fold(F::zero(), |acc, m| acc + *m);

        if total <= F::zero() {
            return F::zero();
        }

        match self {
            Self::Centroid => {
                let num = universe
                    .iter()
                    .zip(membership)
                    .fold(F::zero(), |acc, (u, m)| acc + *u * *m);

                num / total
            },
            Self::Bisector => {
                let half = total / (F::one() + F::one());
                let mut cum = F::zero();

                universe
                    .iter()
                    .zip(membership)
                    .find_map(|(u, m)| {
                        cum = cum + *m;
                        (cum >= half).then_some(*u)
                    })
                    .unwrap_or_else(F::zero)
            },
            Self::Som | Self::Lom | Self::Mom => maxima(self, universe, membership),
        }
    }

    /// Same reduction over the piecewise-linear curve through the samples: centroid and
    /// bisector are computed from trapezoid areas. A zero-area profile gives zero.
    pub fn call_continuous<F: Float>(self, universe: &[F], membership: &[F]) -> F {
        let n_areas = universe.len().min(membership.len()).saturating_sub(1);

        if n_areas == 0 {
            return self.call(universe, membership);
        }

        let two = F::one() + F::one();
        let three = two + F::one();

        match self {
            Self::Centroid => {
                let mut den = F::zero();
                let mut num = F::zero();

                for i in 0..n_areas {
                    let base = universe[i + 1] - universe[i];
                    let area_rect = F::min(membership[i], membership[i + 1]) * base;
                    let center_rect = universe[i] + base / two;
                    let (area_tria, center_tri) = if membership[i + 1] == membership[i] {
                        (F::zero(), F::zero())
                    } else if membership[i + 1] > membership[i] {
                        (
                            base * F::abs(membership[i + 1] - membership[i]) / two,
                            universe[i] + two / three * base,
                        )
                    } else {
                        (
                            base * F::abs(membership[i + 1] - membership[i]) / two,
                            universe[i] + F::one() / three * base,
                        )
                    };

                    den = den + area_rect + area_tria;
                    num = num + area_rect * center_rect + area_tria * center_tri;
                }

                if den <= F::zero() {
                    F::zero()
                } else {
                    num / den
                }
            },
            Self::Bisector => {
                let areas: Vec<F> = (0..n_areas)
                    .map(|i| (membership[i] + membership[i + 1]) * (universe[i + 1] - universe[i]) / two)
                    .collect();
                let total_area = areas.iter().fold(F::zero(), |acc, a| acc + *a);

                if total_area <= F::zero() {
                    return F::zero();
                }

                let target = total_area / two;
                let mut cum_area = F::zero();
                let mut i_area = n_areas - 1;

                for (i, area) in areas.iter().enumerate() {
                    cum_area = cum_area + *area;
                    if cum_area >= target {
                        i_area = i;
                        break;
                    }
                }

                let coords = [
                    (cum_area - areas[i_area], universe[i_area]),
                    (cum_area, universe[i_area + 1]),
                ];

                interp(Some(target), coords)
                    .first()
                    .copied()
                    .unwrap_or(universe[i_area])
            },
            Self::Som | Self::Lom | Self::Mom => self.call(universe, membership),
        }
    }
}

fn maxima<F: Float>(op: DefuzzificationOp, universe: &[F], membership: &[F]) -> F {
    let maximum = membership.iter().copied().fold(F::zero(), F::max);
    let mut at_max = universe
        .iter()
        .zip(membership)
        .filter_map(|(u, m)| if *m == maximum { Some(*u) } else { None });

    match op {
        DefuzzificationOp::Som => at_max.next().unwrap_or_else(F::zero),
        DefuzzificationOp::Lom => at_max.last().unwrap_or_else(F::zero),
        _ => {
            let (len, sum) = at_max.fold((F::zero(), F::zero()), |(len, sum), u| (len + F::one(), sum + u));

            if len == F::zero() {
                F::zero()
            } else {
                sum / len
            }
        },
    }
}

impl FromStr for DefuzzificationOp {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "centroid" | "cog" => Ok(Self::Centroid),
            "bisector" | "boa" => Ok(Self::Bisector),
            "som" => Ok(Self::Som),
            "lom" => Ok(Self::Lom),
            "mom" => Ok(Self::Mom),
            _ => Err(FuzzyError::UnknownMethod(s.to_owned())),
        }
    }
}

impl fmt::Display for DefuzzificationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
const UNIVERSE: [f64; 6] = [0., 2., 4., 6., 8., 10.];

#[test]
fn test_discrete_defuzzification() {
    let membership = [0., 0.5, 1., 1., 0.5, 0.];

    assert_eq!(DefuzzificationOp::Centroid.call(&UNIVERSE, &membership), 5.);
    assert_eq!(DefuzzificationOp::Bisector.call(&UNIVERSE, &membership), 4.);
    assert_eq!(DefuzzificationOp::Som.call(&UNIVERSE, &membership), 4.);
    assert_eq!(DefuzzificationOp::Lom.call(&UNIVERSE, &membership), 6.);
    assert_eq!(DefuzzificationOp::Mom.call(&UNIVERSE, &membership), 5.);

    let skewed = [1., 0., 0., 0., 0., 1.];

    assert_eq!(DefuzzificationOp::Bisector.call(&UNIVERSE, &skewed), 0.);
    assert_eq!(DefuzzificationOp::Mom.call(&UNIVERSE, &skewed), 5.);
}

#[test]
fn test_zero_total_fallback() {
    let membership = [0.; 6];

    for op in DefuzzificationOp::ALL {
        assert_eq!(op.call(&UNIVERSE, &membership), 0., "{op}");
        assert_eq!(op.call_continuous(&UNIVERSE, &membership), 0., "{op}");
    }
}

#[test]
fn test_continuous_defuzzification() {
    let membership = [0., 0.5, 1., 1., 0.5, 0.];

    assert!((DefuzzificationOp::Centroid.call_continuous(&UNIVERSE, &membership) - 5.).abs() < 1e-12);
    assert!((DefuzzificationOp::Bisector.call_continuous(&UNIVERSE, &membership) - 5.).abs() < 1e-12);
    assert_eq!(DefuzzificationOp::Som.call_continuous(&UNIVERSE, &membership), 4.);

    // Right triangle rising towards 10: centroid at two thirds of the base
    let ramp = [0., 0.2, 0.4, 0.6, 0.8, 1.];

    assert!((DefuzzificationOp::Centroid.call_continuous(&UNIVERSE, &ramp) - 20. / 3.).abs() < 1e-12);

    // Half the area (2.5) is reached inside [6, 8]; the split is interpolated linearly
    // over that segment's cumulative area, not solved exactly at 10 / sqrt(2)
    assert!((DefuzzificationOp::Bisector.call_continuous(&UNIVERSE, &ramp) - 7.).abs() < 1e-12);
    assert_eq!(DefuzzificationOp::Bisector.call(&UNIVERSE, &ramp), 8.);
}

#[test]
fn test_parse_method() {
    assert_eq!("centroid".parse::<DefuzzificationOp>(), Ok(DefuzzificationOp::Centroid));
    assert_eq!(" SOM ".parse::<DefuzzificationOp>(), Ok(DefuzzificationOp::Som));
    assert_eq!("boa".parse::<DefuzzificationOp>(), Ok(DefuzzificationOp::Bisector));
    assert_eq!(
        "median".parse::<DefuzzificationOp>(),
        Err(FuzzyError::UnknownMethod("median".into()))
    );

    for op in DefuzzificationOp::ALL {
        assert_eq!(op.to_string().parse::<DefuzzificationOp>(), Ok(op));
    }
}

#[test]
fn test_min_max_operators() {
    assert_eq!(and_min([0.75, 0.25, 1.]), 0.25);
    assert_eq!(and_min::<f64>([]), 1.);
    assert_eq!(clip(&[0., 0.5, 1.], 0.6), vec![0., 0.5, 0.6]);

    let mut agg = vec![0., 0.7, 0.2];

    or_max(&mut agg, &[0.1, 0.3, 0.9]);
    assert_eq!(agg, vec![0.1, 0.7, 0.9]);
}
