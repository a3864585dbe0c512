use crate::error::{FuzzyError, Result};
use crate::membership::MembershipFunction;

/// Ordered linguistic terms used to declare a variable. Insertion order is kept
/// and is the order in which fuzzification and introspection report them.
#[derive(Clone, Debug, Default)]
pub struct Terms(pub(crate) Vec<(String, MembershipFunction)>);

impl Terms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, membership: MembershipFunction) {
        self.0.push((name.into(), membership));
    }

    pub fn with(mut self, name: impl Into<String>, membership: MembershipFunction) -> Self {
        self.insert(name, membership);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn check_unique(&self, variable: &str) -> Result<()> {
        for (i, (name, _)) in self.0.iter().enumerate() {
            if self.0[..i].iter().any(|(seen, _)| seen == name) {
                return Err(FuzzyError::DuplicateTerm {
                    variable: variable.to_owned(),
                    term: name.clone(),
                });
            }
        }

        Ok(())
    }
}

#[test]
fn test_duplicate_terms() {
    let mf = MembershipFunction::triangular(0., 1., 2.).unwrap();
    let terms = Terms::new().with("Low", mf).with("High", mf).with("Low", mf);

    assert_eq!(terms.len(), 3);
    assert_eq!(
        terms.check_unique("Demand"),
        Err(FuzzyError::DuplicateTerm {
            variable: "Demand".into(),
            term: "Low".into(),
        })
    );
}
