use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;
use crate::membership::MembershipFunction;
use crate::terms::Terms;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Handle to a variable registered in [`Variables`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) VariableKey);

impl Variable {
    pub fn key(self) -> VariableKey {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Input,
    Output,
}

#[derive(Default)]
pub struct Variables(pub(crate) SlotMap<VariableKey, VariableConstraints>);

impl Variables {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    /// Registers a variable whose universe is `samples` evenly spaced points over `universe_range`.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        kind: Kind,
        universe_range: RangeInclusive<f64>,
        samples: usize,
        terms: Terms,
    ) -> Result<Variable> {
        let name = name.into();

        if self.find(&name).is_some() {
            return Err(FuzzyError::DuplicateVariable(name));
        }

        let constraints = VariableConstraints::new(name, kind, universe_range, samples, terms)?;

        Ok(Variable(self.0.insert(constraints)))
    }

    pub fn find(&self, name: &str) -> Option<Variable> {
        self.0
            .iter()
            .find(|(_, var)| var.name == name)
            .map(|(key, _)| Variable(key))
    }

    pub fn lookup(&self, name: &str) -> Result<Variable> {
        self.find(name)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))
    }

    pub fn get(&self, var: Variable) -> Option<&VariableConstraints> {
        self.0.get(var.0)
    }

    /// Variables of the given kind, in registration order.
    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = (Variable, &VariableConstraints)> {
        self.0
            .iter()
            .filter(move |(_, var)| var.kind == kind)
            .map(|(key, var)| (Variable(key), var))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Term {
    pub(crate) name: String,
    pub(crate) membership: MembershipFunction,
    /// Membership sampled at every universe point
    pub(crate) profile: Vec<f64>,
}

impl Term {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn membership(&self) -> MembershipFunction {
        self.membership
    }

    pub fn profile(&self) -> &[f64] {
        &self.profile
    }
}

#[derive(Clone, Debug)]
pub struct VariableConstraints {
    pub(crate) name: String,
    pub(crate) kind: Kind,
    pub(crate) universe: Vec<f64>,
    pub(crate) min_u: f64,
    pub(crate) max_u: f64,
    pub(crate) terms: Vec<Term>,
}

impl VariableConstraints {
    fn new(
        name: String,
        kind: Kind,
        universe_range: RangeInclusive<f64>,
        samples: usize,
        terms: Terms,
    ) -> Result<Self> {
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();

        if !(min_u.is_finite() && max_u.is_finite() && min_u < max_u && samples >= 2) {
            return Err(FuzzyError::InvalidUniverse {
                name,
                min: min_u,
                max: max_u,
                samples,
            });
        }

        terms.check_unique(&name)?;

        let universe: Vec<f64> = Linspace::new(min_u, max_u, samples).collect();
        let mut this = Self {
            universe,
            name,
            kind,
            min_u,
            max_u,
            terms: Vec::with_capacity(terms.len()),
        };

        for (term, membership) in terms.0 {
            let membership = membership.validate()?;
            let in_range = membership
                .breakpoints()
                .iter()
                .all(|p| (min_u..=max_u).contains(p));

            if !in_range {
                return Err(FuzzyError::TermOutOfRange {
                    variable: this.name,
                    term,
                });
            }

            let profile = membership.profile(&this.universe);

            this.terms.push(Term {
                name: term,
                membership,
                profile,
            });
        }

        Ok(this)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    pub fn range(&self) -> RangeInclusive<f64> {
        self.min_u..=self.max_u
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == term)
    }

    /// Saturates `x` at the universe bounds.
    pub fn clip(&self, x: f64) -> f64 {
        x.clamp(self.min_u, self.max_u)
    }
}

#[cfg(test)]
fn inventory_terms() -> Terms {
    Terms::new()
        .with("Low", MembershipFunction::trapezoidal(0., 0., 5., 25.).unwrap())
        .with("Medium", MembershipFunction::triangular(5., 25., 45.).unwrap())
        .with("High", MembershipFunction::trapezoidal(25., 45., 50., 50.).unwrap())
}

#[test]
fn test_add_variable() {
    let mut vars = Variables::new();
    let inventory = vars
        .add("Inventory", Kind::Input, 0. ..=50., 51, inventory_terms())
        .unwrap();
    let var = vars.get(inventory).unwrap();

    assert_eq!(var.universe().len(), 51);
    assert_eq!(var.universe()[10], 10.);
    assert_eq!(var.term_index("Medium"), Some(1));
    assert_eq!(var.term_index("Huge"), None);
    assert_eq!(var.terms()[2].profile()[50], 1.);
    assert_eq!(var.clip(-4.), 0.);
    assert_eq!(var.clip(75.), 50.);
    assert_eq!(vars.find("Inventory"), Some(inventory));
    assert_eq!(
        vars.lookup("Stock"),
        Err(FuzzyError::UnknownVariable("Stock".into()))
    );
}

#[test]
fn test_invalid_variables() {
    let mut vars = Variables::new();

    vars.add("Inventory", Kind::Input, 0. ..=50., 51, inventory_terms())
        .unwrap();

    assert_eq!(
        vars.add("Inventory", Kind::Input, 0. ..=50., 51, inventory_terms()),
        Err(FuzzyError::DuplicateVariable("Inventory".into()))
    );
    assert!(matches!(
        vars.add("Days", Kind::Input, 50. ..=0., 51, Terms::new()),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert!(matches!(
        vars.add("Days", Kind::Input, 0. ..=50., 1, Terms::new()),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert_eq!(
        vars.add("Days", Kind::Input, 0. ..=20., 21, inventory_terms()),
        Err(FuzzyError::TermOutOfRange {
            variable: "Days".into(),
            term: "Low".into(),
        })
    );
    assert_eq!(vars.len(), 1);
}
