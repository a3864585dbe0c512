use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, Result};

/// A piecewise-linear membership shape.
///
/// A triangle `(a, b, c)` is the trapezoid `(a, b, b, c)`. Breakpoints are
/// non-decreasing and finite; construct through [`MembershipFunction::triangular`]
/// or [`MembershipFunction::trapezoidal`] to have that checked.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "shape", content = "points")]
pub enum MembershipFunction {
    Triangular([f64; 3]),
    Trapezoidal([f64; 4]),
}

impl MembershipFunction {
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self> {
        check_breakpoints(&[a, b, c])?;

        Ok(Self::Triangular([a, b, c]))
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        check_breakpoints(&[a, b, c, d])?;

        Ok(Self::Trapezoidal([a, b, c, d]))
    }

    /// Re-checks a shape that did not come through a constructor (e.g. deserialized).
    pub fn validate(self) -> Result<Self> {
        check_breakpoints(self.breakpoints())?;

        Ok(self)
    }

    pub fn breakpoints(&self) -> &[f64] {
        match self {
            Self::Triangular(points) => points,
            Self::Trapezoidal(points) => points,
        }
    }

    /// Outer and plateau breakpoints as `(a, b, c, d)`.
    fn corners(&self) -> (f64, f64, f64, f64) {
        match *self {
            Self::Triangular([a, b, c]) => (a, b, b, c),
            Self::Trapezoidal([a, b, c, d]) => (a, b, c, d),
        }
    }

    /// Degree of membership of `x`, always in `[0, 1]`. NaN belongs to nothing.
    ///
    /// The plateau `[b, c]` is checked first so a zero-width ramp behaves as a
    /// vertical edge: `(0, 0, 5, 25)` is fully satisfied at `0`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (a, b, c, d) = self.corners();

        if x.is_nan() {
            0.
        } else if b <= x && x <= c {
            1.
        } else if x <= a || x >= d {
            0.
        } else if x < b {
            ((x - a) / (b - a)).clamp(0., 1.)
        } else {
            ((d - x) / (d - c)).clamp(0., 1.)
        }
    }

    /// Samples the shape over every point of `universe`.
    pub fn profile(&self, universe: &[f64]) -> Vec<f64> {
        universe.iter().map(|x| self.evaluate(*x)).collect()
    }
}

fn check_breakpoints(points: &[f64]) -> Result<()> {
    let finite = points.iter().all(|p| p.is_finite());
    let ordered = points.windows(2).all(|w| w[0] <= w[1]);

    if finite && ordered {
        Ok(())
    } else {
        Err(FuzzyError::InvalidBreakpoints(points.to_vec()))
    }
}

#[test]
fn test_triangular() {
    let mf = MembershipFunction::triangular(5., 25., 45.).unwrap();

    assert_eq!(mf.evaluate(5.), 0.);
    assert_eq!(mf.evaluate(10.), 0.25);
    assert_eq!(mf.evaluate(25.), 1.);
    assert_eq!(mf.evaluate(40.), 0.25);
    assert_eq!(mf.evaluate(45.), 0.);
    assert_eq!(mf.evaluate(-3.), 0.);
    assert_eq!(mf.evaluate(60.), 0.);
}

#[test]
fn test_trapezoidal() {
    let mf = MembershipFunction::trapezoidal(5., 20., 30., 45.).unwrap();

    assert_eq!(mf.evaluate(5.), 0.);
    assert_eq!(mf.evaluate(20.), 1.);
    assert_eq!(mf.evaluate(25.), 1.);
    assert_eq!(mf.evaluate(30.), 1.);
    assert_eq!(mf.evaluate(45.), 0.);
    assert!((mf.evaluate(40.) - 1. / 3.).abs() < 1e-12);
}

#[test]
fn test_zero_width_ramps() {
    let left_shoulder = MembershipFunction::trapezoidal(0., 0., 5., 25.).unwrap();

    assert_eq!(left_shoulder.evaluate(0.), 1.);
    assert_eq!(left_shoulder.evaluate(15.), 0.5);

    let spike = MembershipFunction::trapezoidal(0., 0., 5., 5.).unwrap();

    assert_eq!(spike.evaluate(5.), 1.);
    assert_eq!(spike.evaluate(5.000001), 0.);

    let step = MembershipFunction::trapezoidal(5., 5., 5., 30.).unwrap();

    assert_eq!(step.evaluate(4.999), 0.);
    assert_eq!(step.evaluate(5.), 1.);
    assert_eq!(step.evaluate(17.5), 0.5);

    let right_angle = MembershipFunction::triangular(5., 5., 25.).unwrap();

    assert_eq!(right_angle.evaluate(5.), 1.);
    assert_eq!(right_angle.evaluate(15.), 0.5);
}

#[test]
fn test_nan_has_no_membership() {
    let triangle = MembershipFunction::triangular(5., 25., 45.).unwrap();
    let everything = MembershipFunction::trapezoidal(0., 0., 50., 50.).unwrap();

    assert_eq!(triangle.evaluate(f64::NAN), 0.);
    assert_eq!(everything.evaluate(f64::NAN), 0.);
    assert_eq!(everything.evaluate(f64::INFINITY), 0.);
}

#[test]
fn test_invalid_breakpoints() {
    assert_eq!(
        MembershipFunction::triangular(5., 3., 10.),
        Err(FuzzyError::InvalidBreakpoints(vec![5., 3., 10.]))
    );
    assert!(MembershipFunction::trapezoidal(0., f64::NAN, 1., 2.).is_err());
    assert!(MembershipFunction::Trapezoidal([4., 3., 2., 1.]).validate().is_err());
}
