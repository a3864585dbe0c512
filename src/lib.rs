//! Fuzzy inference for perishable inventory: turns demand, stock level and days
//! before expiry into a reorder quantity and an urgency score.
//!
//! ```
//! use fuzzy_reorder::{DefuzzificationOp, ReorderSystem};
//!
//! let system = ReorderSystem::new()?;
//! let recommendation = system.evaluate(2.0, 10., 40., DefuzzificationOp::Centroid, DefuzzificationOp::Som)?;
//!
//! assert!(recommendation.quantity > 0.);
//! assert!(recommendation.urgency < 50.);
//! # Ok::<(), fuzzy_reorder::FuzzyError>(())
//! ```

pub mod config;
mod dsl;
mod error;
mod fuzzify;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod reorder;
mod rules;
mod system;
mod terms;
mod variable;

pub use config::{RuleConfig, SystemConfig, TermConfig, VariableConfig};
pub use dsl::{Antecedent, Conclusion, Condition};
pub use error::{FuzzyError, Result};
pub use fuzzify::{fuzzify, DegreeMap, Fuzzification};
pub use inference::{firing_strength, implicate, Facts, MinMaxInference};
pub use inputs::Inputs;
pub use linspace::Linspace;
pub use membership::MembershipFunction;
pub use ops::{and_min, clip, or_max, DefuzzificationOp, Domain};
pub use outputs::Outputs;
pub use reorder::{Recommendation, ReorderSystem};
pub use rules::{Rule, Rules};
pub use system::FuzzySystem;
pub use terms::Terms;
pub use variable::{Kind, Term, Variable, VariableConstraints, VariableKey, Variables};
