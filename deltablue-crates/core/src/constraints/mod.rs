//! Defines the constraints which can be added to the [`Planner`].
//!
//! Every function in this module creates a [`ConstraintDefinition`], which is added to the planner
//! with [`Planner::add_constraint`]:
//! ```rust
//! # use deltablue_core::constraints;
//! # use deltablue_core::Planner;
//! # use deltablue_core::Strength;
//! let mut planner = Planner::default();
//! let x = planner.new_variable("x", 3);
//! let y = planner.new_variable("y", 0);
//!
//! // y = x
//! let equals = planner
//!     .add_constraint(constraints::equals(x, y, Strength::Required))
//!     .expect("a fresh pair of variables can always be made equal");
//!
//! assert!(planner.is_satisfied(equals));
//! assert_eq!(3, planner.value(y));
//! ```
//!
//! A constraint has one method for each variable it is able to compute. When it is added, the
//! planner selects the method whose output is currently the most weakly determined, provided it is
//! weaker than the strength of the constraint. Otherwise, the constraint stays unsatisfied (which
//! is an error only for [`Strength::Required`] constraints).
mod arithmetic;
mod input;

pub use arithmetic::*;
pub use input::*;

#[cfg(doc)]
use crate::Planner;
use crate::basic_types::Strength;
use crate::engine::constraint::Method;
use crate::engine::ConstraintKind;
use crate::engine::VariableId;

/// A description of a constraint which has not yet been added to a [`Planner`].
#[derive(Clone, Debug)]
pub struct ConstraintDefinition {
    pub(crate) kind: ConstraintKind,
    pub(crate) variables: Vec<VariableId>,
    pub(crate) methods: &'static [Method],
    pub(crate) strength: Strength,
    pub(crate) is_input: bool,
}

impl ConstraintDefinition {
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    /// Whether the constraint feeds values from outside of the graph, i.e. it is an edit.
    pub fn is_input(&self) -> bool {
        self.is_input
    }

    /// The number of different ways in which the constraint can be satisfied.
    pub fn num_methods(&self) -> usize {
        self.methods.len()
    }
}
