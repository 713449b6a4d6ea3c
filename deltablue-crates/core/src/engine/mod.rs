pub(crate) mod constraint;
mod plan;
mod planner;
mod variable;

pub use constraint::ConstraintId;
pub use constraint::ConstraintKind;
pub use plan::Plan;
pub use planner::Planner;
pub use planner::PlannerStatistics;
pub use variable::VariableId;
