use thiserror::Error;

use crate::engine::ConstraintId;
use crate::engine::VariableId;

/// The errors which can occur when changing the constraint graph of a
/// [`Planner`](crate::Planner).
///
/// When adding a constraint fails, the graph is left exactly as it was before the addition started.
/// When destroying fails, the destroyed constraint is gone but a constraint it blocked could not be
/// satisfied again.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Could not satisfy a required constraint")]
    UnsatisfiableRequiredConstraint,
    #[error("Cycle encountered while propagating the added constraint")]
    CycleEncountered,
    #[error("The variable {0} does not exist in the planner")]
    UnknownVariable(VariableId),
    #[error("The constraint {0} does not exist in the planner")]
    UnknownConstraint(ConstraintId),
}
