use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dsl::{Antecedent, Conclusion, Condition};
use crate::error::Result;
use crate::fuzzify::Fuzzification;
use crate::inference::MinMaxInference;
use crate::membership::MembershipFunction;
use crate::ops::Domain;
use crate::rules::Rules;
use crate::system::FuzzySystem;
use crate::terms::Terms;
use crate::variable::{Kind, Variables};

pub const DEMAND: &str = "Demand";
pub const INVENTORY: &str = "Inventory";
pub const DAYS: &str = "Days";
pub const QUANTITY: &str = "Quantity";
pub const URGENCY: &str = "Urgency";

/// Sample count of every universe in the perishable configuration.
pub const SAMPLES: usize = 51;

/// Declarative description of a fuzzy system. Names are resolved and checked by [`SystemConfig::build`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub fuzzification: Fuzzification,
    #[serde(default)]
    pub domain: Domain,
    pub variables: Vec<VariableConfig>,
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub kind: Kind,
    pub min: f64,
    pub max: f64,
    pub samples: usize,
    pub terms: Vec<TermConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub name: String,
    pub membership: MembershipFunction,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub when: Vec<(String, Antecedent)>,
    pub then: Vec<(String, String)>,
}

impl RuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when(mut self, variable: &str, term: &str) -> Self {
        self.when
            .push((variable.to_owned(), Antecedent::Required(term.to_owned())));
        self
    }

    pub fn ignore(mut self, variable: &str) -> Self {
        self.when.push((variable.to_owned(), Antecedent::Wildcard));
        self
    }

    pub fn then(mut self, variable: &str, term: &str) -> Self {
        self.then.push((variable.to_owned(), term.to_owned()));
        self
    }
}

impl VariableConfig {
    fn new(name: &str, kind: Kind, min: f64, max: f64, terms: &[(&str, MembershipFunction)]) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            min,
            max,
            samples: SAMPLES,
            terms: terms
                .iter()
                .map(|(name, membership)| TermConfig {
                    name: (*name).to_owned(),
                    membership: *membership,
                })
                .collect(),
        }
    }
}

fn tri(a: f64, b: f64, c: f64) -> MembershipFunction {
    MembershipFunction::Triangular([a, b, c])
}

fn trap(a: f64, b: f64, c: f64, d: f64) -> MembershipFunction {
    MembershipFunction::Trapezoidal([a, b, c, d])
}

const ANY: Antecedent = Antecedent::Wildcard;

fn is(term: &str) -> Antecedent {
    Antecedent::Required(term.to_owned())
}

/// Maps an (inventory, days, demand) premise to a (quantity, urgency) conclusion.
fn rule(premise: [Antecedent; 3], quantity: &str, urgency: &str) -> RuleConfig {
    let [inventory, days, demand] = premise;

    RuleConfig {
        when: vec![
            (INVENTORY.to_owned(), inventory),
            (DAYS.to_owned(), days),
            (DEMAND.to_owned(), demand),
        ],
        then: vec![
            (QUANTITY.to_owned(), quantity.to_owned()),
            (URGENCY.to_owned(), urgency.to_owned()),
        ],
    }
}

impl SystemConfig {
    /// Variables of the perishable inventory system, without rules.
    pub fn perishable_variables() -> Vec<VariableConfig> {
        vec![
            VariableConfig::new(
                DEMAND,
                Kind::Input,
                0.,
                4.,
                &[
                    ("Low", trap(0., 0., 0.5, 2.)),
                    ("Medium", tri(0.5, 2., 3.5)),
                    ("High", trap(2., 3.5, 4., 4.)),
                ],
            ),
            VariableConfig::new(
                INVENTORY,
                Kind::Input,
                0.,
                50.,
                &[
                    ("Low", trap(0., 0., 5., 25.)),
                    ("Medium", tri(5., 25., 45.)),
                    ("High", trap(25., 45., 50., 50.)),
                ],
            ),
            VariableConfig::new(
                DAYS,
                Kind::Input,
                0.,
                50.,
                &[
                    ("Low", trap(0., 0., 5., 15.)),
                    ("Medium", trap(5., 20., 30., 45.)),
                    ("High", trap(30., 45., 50., 50.)),
                ],
            ),
            VariableConfig::new(
                QUANTITY,
                Kind::Output,
                0.,
                50.,
                &[
                    ("Zero", trap(0., 0., 5., 5.)),
                    ("Low", tri(5., 5., 25.)),
                    ("Medium", tri(5., 25., 45.)),
                    ("High", trap(25., 45., 50., 50.)),
                ],
            ),
            VariableConfig::new(
                URGENCY,
                Kind::Output,
                0.,
                100.,
                &[
                    ("Zero", trap(0., 0., 5., 5.)),
                    ("Low", trap(5., 5., 5., 30.)),
                    ("Medium", trap(5., 45., 55., 95.)),
                    ("High", trap(65., 95., 100., 100.)),
                ],
            ),
        ]
    }

    /// Three-input system whose ten rules cover all 27 (inventory, days, demand) combinations.
    pub fn perishable() -> Self {
        Self {
            fuzzification: Fuzzification::Exact,
            domain: Domain::Discrete,
            variables: Self::perishable_variables(),
            rules: vec![
                rule([is("High"), ANY, ANY], "Zero", "Zero"),
                rule([is("Low"), is("Low"), ANY], "High", "High"),
                rule([is("Medium"), is("Low"), ANY], "Medium", "High"),
                rule([is("Low"), is("Medium"), is("High")], "High", "High"),
                rule([is("Low"), is("Medium"), is("Medium")], "High", "Medium"),
                rule([is("Low"), ANY, is("Low")], "Medium", "Low"),
                rule([is("Low"), is("High"), ANY], "Medium", "Low"),
                rule([is("Medium"), is("Medium"), ANY], "Medium", "Medium"),
                rule([is("Medium"), is("High"), ANY], "Low", "Low"),
                rule([is("Medium"), is("High"), is("High")], "Medium", "Low"),
            ],
        }
    }

    /// Inventory and days only: three medium-shelf-life rules plus four boundary rules
    /// that each look at a single variable. Demand is never consulted.
    pub fn basic() -> Self {
        Self {
            fuzzification: Fuzzification::Exact,
            domain: Domain::Discrete,
            variables: Self::perishable_variables(),
            rules: vec![
                rule([is("Low"), is("Medium"), ANY], "High", "Medium"),
                rule([is("Medium"), is("Medium"), ANY], "Medium", "Medium"),
                rule([is("High"), is("Medium"), ANY], "Low", "Low"),
                rule([is("Low"), ANY, ANY], "High", "High"),
                rule([ANY, is("Low"), ANY], "High", "High"),
                rule([is("High"), ANY, ANY], "Zero", "Zero"),
                rule([ANY, is("High"), ANY], "Zero", "Zero"),
            ],
        }
    }

    pub fn build(&self) -> Result<FuzzySystem> {
        let mut vars = Variables::new();

        for var in &self.variables {
            let terms = var
                .terms
                .iter()
                .fold(Terms::new(), |terms, term| terms.with(term.name.clone(), term.membership));

            vars.add(var.name.clone(), var.kind, var.min..=var.max, var.samples, terms)?;
        }

        let mut rules = Rules::with_capacity(self.rules.len());

        for rule in &self.rules {
            let premise = rule
                .when
                .iter()
                .map(|(name, slot)| -> Result<Condition> {
                    let var = vars.lookup(name)?;

                    Ok(match slot {
                        Antecedent::Required(term) => var.is(term.clone()),
                        Antecedent::Wildcard => var.any(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let consequence = rule
                .then
                .iter()
                .map(|(name, term)| -> Result<Conclusion> {
                    Ok(vars.lookup(name)?.becomes(term.clone()))
                })
                .collect::<Result<Vec<_>>>()?;

            rules.add(&vars, premise, consequence)?;
        }

        debug!(variables = vars.len(), rules = rules.len(), "built fuzzy system");

        Ok(FuzzySystem::new(
            vars,
            rules,
            MinMaxInference::new(self.fuzzification, self.domain),
        ))
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::perishable()
    }
}

#[test]
fn test_perishable_rules_cover_every_combination() {
    let config = SystemConfig::perishable();
    let levels = ["Low", "Medium", "High"];

    assert_eq!(config.rules.len(), 10);

    for inventory in levels {
        for days in levels {
            for demand in levels {
                let covered = config.rules.iter().any(|rule| {
                    rule.when.iter().all(|(variable, slot)| {
                        let wanted = match variable.as_str() {
                            INVENTORY => inventory,
                            DAYS => days,
                            _ => demand,
                        };

                        match slot {
                            Antecedent::Required(term) => term == wanted,
                            Antecedent::Wildcard => true,
                        }
                    })
                });

                assert!(covered, "({inventory}, {days}, {demand}) not covered");
            }
        }
    }
}

#[test]
fn test_build_rejects_unknown_names() {
    use crate::error::FuzzyError;

    let mut config = SystemConfig::perishable();

    config.rules.push(rule([is("Empty"), ANY, ANY], "Zero", "Zero"));

    assert_eq!(
        config.build().err(),
        Some(FuzzyError::UnknownTerm {
            variable: INVENTORY.into(),
            term: "Empty".into(),
        })
    );

    let mut config = SystemConfig::perishable();

    config.rules.push(
        RuleConfig::new()
            .when("Temperature", "High")
            .then(QUANTITY, "Zero"),
    );

    assert_eq!(
        config.build().err(),
        Some(FuzzyError::UnknownVariable("Temperature".into()))
    );

    let mut config = SystemConfig::perishable();

    config.variables[0].terms[1].membership = MembershipFunction::Triangular([2., 1., 3.]);

    assert_eq!(
        config.build().err(),
        Some(FuzzyError::InvalidBreakpoints(vec![2., 1., 3.]))
    );
}
