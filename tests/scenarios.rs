use fuzzy_reorder::config::{DAYS, DEMAND, INVENTORY, QUANTITY, URGENCY};
use fuzzy_reorder::DefuzzificationOp::{Bisector, Centroid, Lom, Mom, Som};
use fuzzy_reorder::{
    DefuzzificationOp, Domain, Fuzzification, Recommendation, ReorderSystem, RuleConfig, SystemConfig,
};

const EPSILON: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

fn evaluate(system: &ReorderSystem, reading: (f64, f64, f64), method: DefuzzificationOp) -> Recommendation {
    let (demand, inventory, days) = reading;

    system
        .evaluate(demand, inventory, days, method, method)
        .unwrap()
}

#[test]
fn test_steady_demand_with_long_shelf_life() {
    let system = ReorderSystem::new().unwrap();
    let inventory = system.system().fuzzify(INVENTORY, 10.).unwrap();
    let days = system.system().fuzzify(DAYS, 40.).unwrap();
    let demand = system.system().fuzzify(DEMAND, 2.).unwrap();

    assert_eq!(inventory.get("Low"), Some(0.75));
    assert_eq!(inventory.get("Medium"), Some(0.25));
    assert_eq!(inventory.get("High"), Some(0.));
    assert_eq!(days.get("Low"), Some(0.));
    assert_close(days.get("Medium").unwrap(), 1. / 3.);
    assert_close(days.get("High").unwrap(), 2. / 3.);
    assert_eq!(demand.get("Medium"), Some(1.));

    let recommendation = system.evaluate(2., 10., 40., Centroid, Som).unwrap();

    assert_close(recommendation.quantity, 27.215062111801263);
    assert_eq!(recommendation.urgency, 6.);
    assert_eq!(
        recommendation.rounded(),
        Recommendation {
            quantity: 27.,
            urgency: 6.,
        }
    );

    let reading = (2., 10., 40.);

    assert_eq!(evaluate(&system, reading, Bisector).quantity, 27.);
    assert_eq!(evaluate(&system, reading, Som).quantity, 19.);
    assert_eq!(evaluate(&system, reading, Lom).quantity, 31.);
    assert_eq!(evaluate(&system, reading, Mom).quantity, 25.);
    assert_close(evaluate(&system, reading, Centroid).urgency, 42.1721799019096);
    assert_eq!(evaluate(&system, reading, Bisector).urgency, 40.);
    assert_eq!(evaluate(&system, reading, Lom).urgency, 12.);
    assert_eq!(evaluate(&system, reading, Mom).urgency, 9.);
}

#[test]
fn test_empty_shelf_about_to_expire() {
    let system = ReorderSystem::new().unwrap();
    let reading = (4., 0., 0.);

    assert_close(evaluate(&system, reading, Centroid).quantity, 41.67741935483871);
    assert_close(evaluate(&system, reading, Centroid).urgency, 88.6984126984127);
    assert_eq!(evaluate(&system, reading, Bisector).urgency, 90.);
    assert_eq!(evaluate(&system, reading, Som).urgency, 96.);
    assert_eq!(evaluate(&system, reading, Lom).urgency, 100.);
    assert_eq!(evaluate(&system, reading, Mom).urgency, 98.);
    assert_eq!(evaluate(&system, reading, Som).quantity, 45.);
    assert_eq!(evaluate(&system, reading, Mom).quantity, 47.5);
}

#[test]
fn test_full_shelf_with_long_shelf_life() {
    let system = ReorderSystem::new().unwrap();
    let recommendation = evaluate(&system, (0., 50., 50.), Centroid);

    assert_eq!(recommendation.quantity, 2.5);
    assert_eq!(recommendation.urgency, 2.);
    assert_eq!(evaluate(&system, (0., 50., 50.), Som).urgency, 0.);
}

#[test]
fn test_symmetric_profile_methods_agree() {
    let system = ReorderSystem::new().unwrap();
    let reading = (1., 25., 25.);

    for method in DefuzzificationOp::ALL {
        assert_close(evaluate(&system, reading, method).quantity, 25.);
    }

    assert_close(evaluate(&system, reading, Centroid).urgency, 50.);
    assert_eq!(evaluate(&system, reading, Som).urgency, 46.);
    assert_eq!(evaluate(&system, reading, Lom).urgency, 54.);
    assert_eq!(evaluate(&system, reading, Mom).urgency, 50.);
}

#[test]
fn test_out_of_range_readings_saturate() {
    let system = ReorderSystem::new().unwrap();

    for method in DefuzzificationOp::ALL {
        assert_eq!(
            evaluate(&system, (9., -20., -3.), method),
            evaluate(&system, (4., 0., 0.), method)
        );
        assert_eq!(
            evaluate(&system, (-1., 500., 75.), method),
            evaluate(&system, (0., 50., 50.), method)
        );
    }
}

#[test]
fn test_continuous_domain() {
    let config = SystemConfig {
        domain: Domain::Continuous,
        ..SystemConfig::perishable()
    };
    let system = ReorderSystem::from_config(&config).unwrap();
    let reading = (1., 25., 25.);

    assert_close(evaluate(&system, reading, Centroid).quantity, 25.);
    assert_close(evaluate(&system, reading, Bisector).quantity, 25.);
    assert_close(evaluate(&system, reading, Centroid).urgency, 50.);
    assert_eq!(evaluate(&system, reading, Som).urgency, 46.);

    for method in DefuzzificationOp::ALL {
        let recommendation = evaluate(&system, (2., 10., 40.), method);

        assert!((0. ..=50.).contains(&recommendation.quantity));
        assert!((0. ..=100.).contains(&recommendation.urgency));
    }
}

#[test]
fn test_interpolated_fuzzification() {
    let config = SystemConfig {
        fuzzification: Fuzzification::Interpolated,
        ..SystemConfig::perishable()
    };
    let interpolated = ReorderSystem::from_config(&config).unwrap();
    let exact = ReorderSystem::new().unwrap();

    // Inventory and days breakpoints fall on sample points
    for x in [0., 7.5, 10., 33.3, 50.] {
        for name in [INVENTORY, DAYS] {
            let a = exact.system().fuzzify(name, x).unwrap();
            let b = interpolated.system().fuzzify(name, x).unwrap();

            for ((_, a), (_, b)) in a.iter().zip(b.iter()) {
                assert_close(a, b);
            }
        }
    }

    // Demand is sampled every 0.08, so its 0.5 shoulder is cut off
    let low = interpolated
        .system()
        .fuzzify(DEMAND, 0.5)
        .unwrap()
        .get("Low")
        .unwrap();

    assert!(low < 1. && low > 0.98, "{low}");
    assert_eq!(exact.system().fuzzify(DEMAND, 0.5).unwrap().get("Low"), Some(1.));
}

#[test]
fn test_basic_rule_style_ignores_demand() {
    let system = ReorderSystem::from_config(&SystemConfig::basic()).unwrap();

    assert_eq!(system.system().rules().len(), 7);

    let recommendation = system.evaluate(2., 10., 40., Centroid, Centroid).unwrap();

    assert_close(recommendation.quantity, 28.92222222222222);
    assert_close(recommendation.urgency, 57.84371281237603);
    assert_eq!(
        system.evaluate(0., 10., 40., Centroid, Centroid).unwrap(),
        recommendation
    );
    assert_eq!(
        system.evaluate(3., 30., 10., Som, Lom).unwrap(),
        Recommendation {
            quantity: 35.,
            urgency: 100.,
        }
    );
}

#[test]
fn test_introspection() {
    let system = ReorderSystem::new().unwrap();
    let universe = system.universe(URGENCY).unwrap();

    assert_eq!(universe.len(), 51);
    assert_eq!(universe[0], 0.);
    assert_eq!(universe[1], 2.);
    assert_eq!(universe[50], 100.);
    assert_eq!(system.universe(DEMAND).unwrap()[50], 4.);

    let terms = system.terms(QUANTITY).unwrap();

    assert_eq!(
        terms.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
        vec!["Zero", "Low", "Medium", "High"]
    );
    assert!(terms.iter().all(|(_, profile)| profile.len() == 51));
    assert_eq!(terms[2].1[25], 1.);
    assert!(system.universe("Temperature").is_err());

    let profile = system.aggregated_profile(URGENCY, 4., 0., 0.).unwrap();
    let high = system.terms(URGENCY).unwrap()[3].1.to_vec();

    assert_eq!(profile, high);
}

#[test]
fn test_missing_output_variable() {
    let mut config = SystemConfig::perishable();

    config.variables.retain(|var| var.name != URGENCY);
    for rule in &mut config.rules {
        rule.then.retain(|(name, _)| name != URGENCY);
    }

    assert!(config.build().is_ok());
    assert!(ReorderSystem::from_config(&config).is_err());
}

#[test]
fn test_config_round_trips_through_json() {
    let mut config = SystemConfig::perishable();

    config.rules.push(
        RuleConfig::new()
            .when(INVENTORY, "Low")
            .ignore(DAYS)
            .when(DEMAND, "High")
            .then(QUANTITY, "High")
            .then(URGENCY, "High"),
    );

    let json = serde_json::to_string(&config).unwrap();
    let parsed: SystemConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, config);

    let built = ReorderSystem::from_config(&config).unwrap();
    let reloaded = ReorderSystem::from_config(&parsed).unwrap();

    assert_eq!(
        built.evaluate(3.2, 12., 18., Centroid, Mom).unwrap(),
        reloaded.evaluate(3.2, 12., 18., Centroid, Mom).unwrap()
    );
}

#[test]
fn test_config_from_handwritten_json() {
    let json = r#"{
        "variables": [
            {"name": "Demand", "kind": "input", "min": 0, "max": 4, "samples": 5, "terms": [
                {"name": "Any", "membership": {"shape": "trapezoidal", "points": [0, 0, 4, 4]}}
            ]},
            {"name": "Inventory", "kind": "input", "min": 0, "max": 10, "samples": 11, "terms": [
                {"name": "Low", "membership": {"shape": "triangular", "points": [0, 0, 10]}}
            ]},
            {"name": "Days", "kind": "input", "min": 0, "max": 10, "samples": 11, "terms": [
                {"name": "Low", "membership": {"shape": "triangular", "points": [0, 0, 10]}}
            ]},
            {"name": "Quantity", "kind": "output", "min": 0, "max": 10, "samples": 11, "terms": [
                {"name": "Some", "membership": {"shape": "triangular", "points": [0, 5, 10]}}
            ]},
            {"name": "Urgency", "kind": "output", "min": 0, "max": 10, "samples": 11, "terms": [
                {"name": "Some", "membership": {"shape": "triangular", "points": [0, 5, 10]}}
            ]}
        ],
        "rules": [
            {
                "when": [["Inventory", {"required": "Low"}], ["Days", "wildcard"], ["Demand", "wildcard"]],
                "then": [["Quantity", "Some"], ["Urgency", "Some"]]
            }
        ]
    }"#;
    let config: SystemConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.domain, Domain::Discrete);
    assert_eq!(config.fuzzification, Fuzzification::Exact);

    let system = ReorderSystem::from_config(&config).unwrap();
    let recommendation = system.evaluate(1., 2., 3., Mom, Centroid).unwrap();

    assert_eq!(recommendation.quantity, 5.);
    assert_close(recommendation.urgency, 5.);
}
