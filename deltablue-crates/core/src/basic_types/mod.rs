mod planner_error;
mod strength;
mod trail;

pub use planner_error::*;
pub use strength::*;
pub(crate) use trail::*;
