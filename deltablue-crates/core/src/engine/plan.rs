use crate::engine::ConstraintId;
#[cfg(doc)]
use crate::Planner;

/// An ordered list of constraints which, executed in order, propagates the values of a set of edit
/// constraints through the graph.
///
/// A plan is extracted with [`Planner::extract_plan_from_constraint`] (or one of its siblings) and
/// stays valid until the constraint graph is changed; it can be executed any number of times with
/// [`Planner::execute_plan`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    constraints: Vec<ConstraintId>,
}

impl Plan {
    pub(crate) fn new(constraints: Vec<ConstraintId>) -> Self {
        Plan { constraints }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// The constraints of the plan in execution order.
    pub fn iter(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        self.constraints.iter().copied()
    }

    pub fn contains(&self, constraint: ConstraintId) -> bool {
        self.constraints.contains(&constraint)
    }

    /// The position of `constraint` in the execution order.
    pub fn position(&self, constraint: ConstraintId) -> Option<usize> {
        self.constraints
            .iter()
            .position(|&candidate| candidate == constraint)
    }
}
