//! # DeltaBlue
//! An incremental dataflow constraint planner. Variables are related by multi-method constraints
//! of different [`Strength`]s; the [`Planner`] keeps the constraint graph consistent while
//! constraints are added and destroyed, and compiles [`Plan`]s which propagate new input values
//! through the graph in a valid order.
//!
//! The typical use is to build the graph once, put an [edit](constraints::edit) on the variable
//! which will receive new values, and repeatedly execute the plan extracted from that edit:
//! ```rust
//! # use deltablue_core::constraints;
//! # use deltablue_core::Planner;
//! # use deltablue_core::Strength;
//! let mut planner = Planner::default();
//!
//! // v0 = v1 = ... = v10
//! let variables = (0..=10)
//!     .map(|index| planner.new_variable(format!("v{index}"), 0))
//!     .collect::<Vec<_>>();
//! for pair in variables.windows(2) {
//!     planner
//!         .add_constraint(constraints::equals(pair[0], pair[1], Strength::Required))
//!         .expect("a chain has no cycles");
//! }
//!
//! let first = variables[0];
//! let last = variables[10];
//! planner
//!     .add_constraint(constraints::stay(last, Strength::StrongDefault))
//!     .expect("stays are never required");
//! let edit = planner
//!     .add_constraint(constraints::edit(first, Strength::Preferred))
//!     .expect("edits are never required");
//!
//! let plan = planner.extract_plan_from_constraint(edit);
//! for value in 0..5 {
//!     planner.set_value(first, value);
//!     planner.execute_plan(&plan);
//!     assert_eq!(value, planner.value(last));
//! }
//!
//! planner.destroy_constraint(edit).expect("nothing required was displaced");
//! ```
pub(crate) mod basic_types;
pub mod constraints;
pub mod containers;
pub(crate) mod engine;
pub mod options;
pub mod statistics;

pub mod asserts;

pub use convert_case;

pub use crate::basic_types::PlannerError;
pub use crate::basic_types::Strength;
pub use crate::engine::ConstraintId;
pub use crate::engine::ConstraintKind;
pub use crate::engine::Plan;
pub use crate::engine::Planner;
pub use crate::engine::PlannerStatistics;
pub use crate::engine::VariableId;
pub use crate::options::PlannerOptions;
