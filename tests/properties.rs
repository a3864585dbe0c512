//! Property-based tests for the fuzzy inference pipeline.
//!
//! Readings are drawn from slightly beyond each input's universe so saturation
//! is exercised alongside the in-range behaviour.

use fuzzy_reorder::config::{DAYS, DEMAND, INVENTORY, QUANTITY, URGENCY};
use fuzzy_reorder::{
    firing_strength, DefuzzificationOp, Domain, FuzzySystem, Inputs, MembershipFunction, ReorderSystem,
    SystemConfig,
};
use proptest::prelude::*;

fn reading() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1f64..5., -10f64..60., -10f64..60.)
}

fn inputs(system: &FuzzySystem, (demand, inventory, days): (f64, f64, f64)) -> Inputs {
    let mut inputs = Inputs::new();

    inputs.add(system.variable(DEMAND).unwrap(), demand);
    inputs.add(system.variable(INVENTORY).unwrap(), inventory);
    inputs.add(system.variable(DAYS).unwrap(), days);
    inputs
}

fn aggregated(system: &FuzzySystem, reading: (f64, f64, f64)) -> (Vec<f64>, Vec<f64>) {
    let outputs = system.eval(&inputs(system, reading)).unwrap();
    let quantity = outputs.aggregated(system.variable(QUANTITY).unwrap()).unwrap();
    let urgency = outputs.aggregated(system.variable(URGENCY).unwrap()).unwrap();

    (quantity.to_vec(), urgency.to_vec())
}

fn method() -> impl Strategy<Value = DefuzzificationOp> {
    prop::sample::select(DefuzzificationOp::ALL.to_vec())
}

// =============================================================================
// Membership functions
// =============================================================================

proptest! {
    /// Sampled profiles and direct evaluation both stay within [0, 1]
    #[test]
    fn prop_term_profiles_in_unit_interval(x in -20f64..120.) {
        let system = SystemConfig::perishable().build().unwrap();

        for name in [DEMAND, INVENTORY, DAYS, QUANTITY, URGENCY] {
            for (_, profile) in system.terms(name).unwrap() {
                prop_assert!(profile.iter().all(|m| (0. ..=1.).contains(m)));
            }

            let var = system.variables().get(system.variable(name).unwrap()).unwrap();

            for term in var.terms() {
                prop_assert!((0. ..=1.).contains(&term.membership().evaluate(x)));
            }
        }
    }

    /// Trapezoids are 1 on their plateau and 0 outside their support
    #[test]
    fn prop_trapezoid_plateau_and_support(
        mut points in prop::array::uniform4(-100f64..100.),
        t in 0f64..=1.,
        outside in 0.001f64..50.,
    ) {
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let [a, b, c, d] = points;
        let mf = MembershipFunction::trapezoidal(a, b, c, d).unwrap();

        prop_assert_eq!(mf.evaluate(b), 1.);
        prop_assert_eq!(mf.evaluate(c), 1.);
        prop_assert_eq!(mf.evaluate((b + (c - b) * t).clamp(b, c)), 1.);
        prop_assert_eq!(mf.evaluate(a - outside), 0.);
        prop_assert_eq!(mf.evaluate(d + outside), 0.);

        if a < b {
            prop_assert_eq!(mf.evaluate(a), 0.);
        }
        if c < d {
            prop_assert_eq!(mf.evaluate(d), 0.);
        }
    }
}

// =============================================================================
// Rule base
// =============================================================================

proptest! {
    /// Aggregation does not depend on the order of the rules
    #[test]
    fn prop_rule_order_independent(
        reading in reading(),
        rules in Just(SystemConfig::perishable().rules).prop_shuffle(),
    ) {
        let reference = SystemConfig::perishable().build().unwrap();
        let shuffled = SystemConfig { rules, ..SystemConfig::perishable() }.build().unwrap();

        prop_assert_eq!(aggregated(&reference, reading), aggregated(&shuffled, reading));
    }

    /// A wildcard slot makes the rule's strength the minimum of the other slots alone
    #[test]
    fn prop_wildcard_ignores_variable(
        (demand, inventory, _) in reading(),
        days in prop::collection::vec(-10f64..60., 1..8),
    ) {
        let system = SystemConfig::perishable().build().unwrap();
        let model = system.model();
        // Low inventory with low demand, whatever the days before expiry
        let rule = system.rules().iter().nth(5).unwrap();
        let expected = {
            let inventory_low = system.fuzzify(INVENTORY, inventory).unwrap().get("Low").unwrap();
            let demand_low = system.fuzzify(DEMAND, demand).unwrap().get("Low").unwrap();

            inventory_low.min(demand_low)
        };

        for days in days {
            let facts = model
                .fuzzify(system.variables(), &inputs(&system, (demand, inventory, days)))
                .unwrap();

            prop_assert_eq!(firing_strength(rule, &facts), expected);
        }
    }

    /// Building twice from the same configuration gives bit-identical results
    #[test]
    fn prop_deterministic(
        reading in reading(),
        quantity_method in method(),
        urgency_method in method(),
    ) {
        let (demand, inventory, days) = reading;
        let first = ReorderSystem::new().unwrap();
        let second = ReorderSystem::new().unwrap();
        let a = first.evaluate(demand, inventory, days, quantity_method, urgency_method).unwrap();
        let b = second.evaluate(demand, inventory, days, quantity_method, urgency_method).unwrap();

        prop_assert_eq!(a.quantity.to_bits(), b.quantity.to_bits());
        prop_assert_eq!(a.urgency.to_bits(), b.urgency.to_bits());
    }

    /// Crisp outputs stay inside their universes
    #[test]
    fn prop_outputs_within_universe(
        reading in reading(),
        quantity_method in method(),
        urgency_method in method(),
    ) {
        let (demand, inventory, days) = reading;
        let system = ReorderSystem::new().unwrap();
        let recommendation = system.evaluate(demand, inventory, days, quantity_method, urgency_method).unwrap();

        prop_assert!((0. ..=50.).contains(&recommendation.quantity));
        prop_assert!((0. ..=100.).contains(&recommendation.urgency));
    }
}

// =============================================================================
// Defuzzification
// =============================================================================

fn universe() -> Vec<f64> {
    (0..51).map(|i| f64::from(i) * 2.).collect()
}

proptest! {
    /// An all-zero profile defuzzifies to zero under every method in both domains
    #[test]
    fn prop_zero_profile_defuzzifies_to_zero(op in method(), continuous in any::<bool>()) {
        let domain = if continuous { Domain::Continuous } else { Domain::Discrete };

        prop_assert_eq!(op.defuzzify(domain, universe().as_slice(), &[0f64; 51]), 0.);
    }

    /// With a single peak sample, som, lom and mom all pick it
    #[test]
    fn prop_single_peak_maxima_agree(
        peak in 0usize..51,
        height in 0.01f64..=1.,
        shoulder in 0f64..0.99,
    ) {
        let universe = universe();
        let membership: Vec<f64> = (0usize..51)
            .map(|i| {
                let distance = i.abs_diff(peak) as f64;

                if distance == 0. {
                    height
                } else {
                    height * shoulder / distance
                }
            })
            .collect();
        let x = universe[peak];

        prop_assert_eq!(DefuzzificationOp::Som.call(&universe, &membership), x);
        prop_assert_eq!(DefuzzificationOp::Lom.call(&universe, &membership), x);
        prop_assert_eq!(DefuzzificationOp::Mom.call(&universe, &membership), x);
    }

    /// The discrete bisector is a universe point and splits the mass in two
    #[test]
    fn prop_bisector_splits_mass(membership in prop::collection::vec(0f64..=1., 51)) {
        let universe = universe();
        let total: f64 = membership.iter().sum();
        let x = DefuzzificationOp::Bisector.call(&universe, &membership);

        if total == 0. {
            prop_assert_eq!(x, 0.);
        } else {
            let i = universe.iter().position(|u| *u == x).unwrap();
            let before: f64 = membership[..i].iter().sum();
            let through: f64 = membership[..=i].iter().sum();

            prop_assert!(before < total / 2.);
            prop_assert!(through >= total / 2.);
        }
    }
}
