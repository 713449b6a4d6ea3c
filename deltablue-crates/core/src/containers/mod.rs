//! Contains containers which are used by the planner.
mod keyed_arena;

pub use keyed_arena::*;
