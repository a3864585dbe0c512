use crate::dsl::{Antecedent, Conclusion, Condition};
use crate::error::{FuzzyError, Result};
use crate::variable::{Kind, VariableConstraints, VariableKey, Variables};

/// An ordered rule base, validated against the variables it was built for.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// Adds a rule after resolving every term name against `vars`.
    ///
    /// The premise must give each input variable exactly one slot, required or
    /// wildcard, and the consequence must give each output variable exactly one term.
    /// Handles must come from `vars`: a rule is only meaningful for the registry it was
    /// validated against.
    pub fn add(
        &mut self,
        vars: &Variables,
        premise: impl IntoIterator<Item = Condition>,
        consequence: impl IntoIterator<Item = Conclusion>,
    ) -> Result<()> {
        let mut antecedent: Vec<(VariableKey, Antecedent<usize>)> = Vec::new();

        for Condition { var, antecedent: slot } in premise {
            let constraints = resolve(vars, var, Kind::Input, &antecedent)?;
            let slot = match slot {
                Antecedent::Required(term) => Antecedent::Required(term_index(constraints, &term)?),
                Antecedent::Wildcard => Antecedent::Wildcard,
            };

            antecedent.push((var, slot));
        }

        let mut consequent: Vec<(VariableKey, usize)> = Vec::new();

        for Conclusion { var, term } in consequence {
            let constraints = resolve(vars, var, Kind::Output, &consequent)?;

            consequent.push((var, term_index(constraints, &term)?));
        }

        for (key, var) in vars.0.iter() {
            let covered = match var.kind {
                Kind::Input => antecedent.iter().any(|(k, _)| *k == key),
                Kind::Output => consequent.iter().any(|(k, _)| *k == key),
            };

            if !covered {
                return Err(match var.kind {
                    Kind::Input => FuzzyError::IncompleteAntecedent(var.name.clone()),
                    Kind::Output => FuzzyError::IncompleteConsequent(var.name.clone()),
                });
            }
        }

        self.0.push(Rule {
            antecedent,
            consequent,
        });

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }
}

/// A rule whose term names have been replaced by indices into each variable's terms.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub(crate) antecedent: Vec<(VariableKey, Antecedent<usize>)>,
    pub(crate) consequent: Vec<(VariableKey, usize)>,
}

impl Rule {
    pub fn antecedent(&self) -> &[(VariableKey, Antecedent<usize>)] {
        &self.antecedent
    }

    pub fn consequent(&self) -> &[(VariableKey, usize)] {
        &self.consequent
    }
}

fn resolve<'v, S>(
    vars: &'v Variables,
    key: VariableKey,
    kind: Kind,
    seen: &[(VariableKey, S)],
) -> Result<&'v VariableConstraints> {
    let var = vars
        .0
        .get(key)
        .ok_or_else(|| FuzzyError::UnknownVariable("<handle from another registry>".to_owned()))?;

    if var.kind != kind {
        return Err(match kind {
            Kind::Input => FuzzyError::NotAnInput(var.name.clone()),
            Kind::Output => FuzzyError::NotAnOutput(var.name.clone()),
        });
    }

    if seen.iter().any(|(k, _)| *k == key) {
        return Err(FuzzyError::DuplicateSlot(var.name.clone()));
    }

    Ok(var)
}

fn term_index(var: &VariableConstraints, term: &str) -> Result<usize> {
    var.term_index(term).ok_or_else(|| FuzzyError::UnknownTerm {
        variable: var.name.clone(),
        term: term.to_owned(),
    })
}

#[cfg(test)]
fn two_by_one() -> (Variables, [crate::variable::Variable; 3]) {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;

    let terms = || {
        Terms::new()
            .with("Low", MembershipFunction::trapezoidal(0., 0., 2., 8.).unwrap())
            .with("High", MembershipFunction::trapezoidal(2., 8., 10., 10.).unwrap())
    };
    let mut vars = Variables::new();
    let a = vars.add("A", Kind::Input, 0. ..=10., 11, terms()).unwrap();
    let b = vars.add("B", Kind::Input, 0. ..=10., 11, terms()).unwrap();
    let out = vars.add("Out", Kind::Output, 0. ..=10., 11, terms()).unwrap();

    (vars, [a, b, out])
}

#[test]
fn test_add_rule() {
    let (vars, [a, b, out]) = two_by_one();
    let mut rules = Rules::new();

    rules
        .add(&vars, [a.is("High"), b.any()], [out.becomes("Low")])
        .unwrap();

    let rule = &rules.0[0];

    assert_eq!(
        rule.antecedent(),
        &[(a.key(), Antecedent::Required(1)), (b.key(), Antecedent::Wildcard)]
    );
    assert_eq!(rule.consequent(), &[(out.key(), 0)]);
}

#[test]
fn test_rule_configuration_errors() {
    let (vars, [a, b, out]) = two_by_one();
    let mut rules = Rules::new();

    assert_eq!(
        rules.add(&vars, [a.is("Medium"), b.any()], [out.becomes("Low")]),
        Err(FuzzyError::UnknownTerm {
            variable: "A".into(),
            term: "Medium".into(),
        })
    );
    assert_eq!(
        rules.add(&vars, [a.is("Low"), b.any()], [out.becomes("Middling")]),
        Err(FuzzyError::UnknownTerm {
            variable: "Out".into(),
            term: "Middling".into(),
        })
    );
    assert_eq!(
        rules.add(&vars, [a.is("Low")], [out.becomes("Low")]),
        Err(FuzzyError::IncompleteAntecedent("B".into()))
    );
    assert_eq!(
        rules.add(&vars, [a.is("Low"), b.any()], []),
        Err(FuzzyError::IncompleteConsequent("Out".into()))
    );
    assert_eq!(
        rules.add(&vars, [a.is("Low"), a.any(), b.any()], [out.becomes("Low")]),
        Err(FuzzyError::DuplicateSlot("A".into()))
    );
    assert_eq!(
        rules.add(&vars, [a.is("Low"), out.any()], [out.becomes("Low")]),
        Err(FuzzyError::NotAnInput("Out".into()))
    );
    assert_eq!(
        rules.add(&vars, [a.is("Low"), b.any()], [b.becomes("Low")]),
        Err(FuzzyError::NotAnOutput("B".into()))
    );
    assert!(rules.is_empty());
}

#[test]
fn test_foreign_handle_is_rejected() {
    let (vars, [a, b, out]) = two_by_one();
    let (mut larger, _) = two_by_one();
    let extra = larger
        .add("Extra", Kind::Input, 0. ..=10., 11, crate::terms::Terms::new())
        .unwrap();
    let mut rules = Rules::new();

    assert_eq!(
        rules.add(&vars, [a.is("Low"), b.any(), extra.any()], [out.becomes("Low")]),
        Err(FuzzyError::UnknownVariable("<handle from another registry>".into()))
    );
}
