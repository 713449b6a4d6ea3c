//! Contains the options of the [`Planner`](crate::Planner).

/// Options which influence the preallocation of the [`Planner`](crate::Planner).
///
/// None of the options change which plans are computed.
#[derive(Clone, Copy, Debug)]
pub struct PlannerOptions {
    /// The number of variables for which space is reserved up front.
    pub variable_capacity: usize,
    /// The number of constraints for which space is reserved up front.
    pub constraint_capacity: usize,
    /// The number of steps for which space is reserved when extracting a plan.
    pub plan_capacity: usize,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        PlannerOptions {
            variable_capacity: 64,
            constraint_capacity: 64,
            plan_capacity: 128,
        }
    }
}
