use tracing::debug;

use crate::config::{SystemConfig, DAYS, DEMAND, INVENTORY, QUANTITY, URGENCY};
use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::ops::DefuzzificationOp;
use crate::outputs::Outputs;
use crate::system::FuzzySystem;
use crate::variable::{Kind, Variable};

/// Crisp recommendation for one (demand, inventory, days before expiry) reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recommendation {
    pub quantity: f64,
    pub urgency: f64,
}

impl Recommendation {
    /// Quantity to a whole unit, urgency to two decimals.
    pub fn rounded(self) -> Self {
        Self {
            quantity: self.quantity.round(),
            urgency: (self.urgency * 100.).round() / 100.,
        }
    }
}

/// The perishable inventory system: recommends a reorder quantity and urgency.
pub struct ReorderSystem {
    system: FuzzySystem,
    demand: Variable,
    inventory: Variable,
    days: Variable,
    quantity: Variable,
    urgency: Variable,
}

impl ReorderSystem {
    pub fn new() -> Result<Self> {
        Self::from_config(&SystemConfig::perishable())
    }

    /// Builds from any configuration that declares the Demand, Inventory and Days
    /// inputs and the Quantity and Urgency outputs.
    pub fn from_config(config: &SystemConfig) -> Result<Self> {
        let system = config.build()?;

        Ok(Self {
            demand: variable_of_kind(&system, DEMAND, Kind::Input)?,
            inventory: variable_of_kind(&system, INVENTORY, Kind::Input)?,
            days: variable_of_kind(&system, DAYS, Kind::Input)?,
            quantity: variable_of_kind(&system, QUANTITY, Kind::Output)?,
            urgency: variable_of_kind(&system, URGENCY, Kind::Output)?,
            system,
        })
    }

    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    fn outputs(
        &self,
        demand: f64,
        inventory: f64,
        days_before_expiry: f64,
        quantity_method: DefuzzificationOp,
        urgency_method: DefuzzificationOp,
    ) -> Result<Outputs> {
        let mut inputs = Inputs::new();

        inputs.add(self.demand, demand);
        inputs.add(self.inventory, inventory);
        inputs.add(self.days, days_before_expiry);
        inputs.defuzzify_with(self.quantity, quantity_method);
        inputs.defuzzify_with(self.urgency, urgency_method);

        self.system.eval(&inputs)
    }

    pub fn evaluate(
        &self,
        demand: f64,
        inventory: f64,
        days_before_expiry: f64,
        quantity_method: DefuzzificationOp,
        urgency_method: DefuzzificationOp,
    ) -> Result<Recommendation> {
        let outputs = self.outputs(demand, inventory, days_before_expiry, quantity_method, urgency_method)?;
        let recommendation = Recommendation {
            quantity: outputs
                .get_inferred_value(self.quantity)
                .ok_or_else(|| FuzzyError::NotAnOutput(QUANTITY.to_owned()))?,
            urgency: outputs
                .get_inferred_value(self.urgency)
                .ok_or_else(|| FuzzyError::NotAnOutput(URGENCY.to_owned()))?,
        };

        debug!(
            demand,
            inventory,
            days_before_expiry,
            quantity = recommendation.quantity,
            urgency = recommendation.urgency,
            "evaluated reorder"
        );

        Ok(recommendation)
    }

    /// Like [`ReorderSystem::evaluate`], with methods given by name (`centroid`, `bisector`,
    /// `som`, `lom` or `mom`).
    pub fn evaluate_named(
        &self,
        demand: f64,
        inventory: f64,
        days_before_expiry: f64,
        quantity_method: &str,
        urgency_method: &str,
    ) -> Result<Recommendation> {
        self.evaluate(
            demand,
            inventory,
            days_before_expiry,
            quantity_method.parse()?,
            urgency_method.parse()?,
        )
    }

    pub fn universe(&self, name: &str) -> Result<&[f64]> {
        self.system.universe(name)
    }

    pub fn terms(&self, name: &str) -> Result<Vec<(&str, &[f64])>> {
        self.system.terms(name)
    }

    /// Recomputes the aggregated profile of output `name` for the given reading.
    pub fn aggregated_profile(
        &self,
        name: &str,
        demand: f64,
        inventory: f64,
        days_before_expiry: f64,
    ) -> Result<Vec<f64>> {
        let var = self.system.variable(name)?;
        let outputs = self.outputs(
            demand,
            inventory,
            days_before_expiry,
            DefuzzificationOp::Centroid,
            DefuzzificationOp::Centroid,
        )?;

        outputs
            .aggregated(var)
            .map(<[f64]>::to_vec)
            .ok_or_else(|| FuzzyError::NotAnOutput(name.to_owned()))
    }
}

fn variable_of_kind(system: &FuzzySystem, name: &str, kind: Kind) -> Result<Variable> {
    let var = system.variable(name)?;

    match system.variables().get(var).map(|constraints| constraints.kind()) {
        Some(found) if found == kind => Ok(var),
        _ => Err(match kind {
            Kind::Input => FuzzyError::NotAnInput(name.to_owned()),
            Kind::Output => FuzzyError::NotAnOutput(name.to_owned()),
        }),
    }
}

#[test]
fn test_rounded() {
    let recommendation = Recommendation {
        quantity: 27.215062111801263,
        urgency: 42.1721799019096,
    };

    assert_eq!(
        recommendation.rounded(),
        Recommendation {
            quantity: 27.,
            urgency: 42.17,
        }
    );
}

#[test]
fn test_invalid_method_name() {
    let system = ReorderSystem::new().unwrap();

    assert_eq!(
        system.evaluate_named(2., 10., 40., "centroid", "fastest"),
        Err(FuzzyError::UnknownMethod("fastest".into()))
    );
    assert!(system.evaluate_named(2., 10., 40., "centroid", "som").is_ok());
}

#[test]
fn test_aggregated_profile_of_input_is_rejected() {
    let system = ReorderSystem::new().unwrap();

    assert_eq!(system.aggregated_profile(QUANTITY, 2., 10., 40.).unwrap().len(), 51);
    assert_eq!(
        system.aggregated_profile(DEMAND, 2., 10., 40.),
        Err(FuzzyError::NotAnOutput(DEMAND.into()))
    );
}

#[test]
fn test_variables_of_the_wrong_kind_are_rejected() {
    let swap = |name: &str, kind: Kind| {
        let mut config = SystemConfig::perishable();
        let var = config.variables.iter_mut().find(|var| var.name == name).unwrap();

        var.kind = kind;
        config.rules.clear();
        config
    };

    assert_eq!(
        ReorderSystem::from_config(&swap(DEMAND, Kind::Output)).err(),
        Some(FuzzyError::NotAnInput(DEMAND.into()))
    );
    assert_eq!(
        ReorderSystem::from_config(&swap(URGENCY, Kind::Input)).err(),
        Some(FuzzyError::NotAnOutput(URGENCY.into()))
    );
}

#[test]
fn test_nan_reading_is_rejected() {
    let system = ReorderSystem::new().unwrap();

    assert!(matches!(
        system.evaluate(2., f64::NAN, 40., DefuzzificationOp::Centroid, DefuzzificationOp::Centroid),
        Err(FuzzyError::InvalidInput { variable, .. }) if variable == INVENTORY
    ));
    assert!(matches!(
        system.system().fuzzify(INVENTORY, f64::NAN),
        Err(FuzzyError::InvalidInput { .. })
    ));
    assert_eq!(
        system
            .evaluate(2., f64::INFINITY, 40., DefuzzificationOp::Centroid, DefuzzificationOp::Centroid)
            .unwrap(),
        system
            .evaluate(2., 50., 40., DefuzzificationOp::Centroid, DefuzzificationOp::Centroid)
            .unwrap()
    );
}
