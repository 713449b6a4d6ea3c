use crate::basic_types::Strength;
use crate::containers::StorageKey;
use crate::engine::ConstraintId;

/// An identifier to a variable within the [`Planner`](crate::Planner).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId(index as u32)
    }
}

/// Stamp used to recognise variables which were already visited by the current pass of the
/// planner; see [`Planner`](crate::Planner).
pub(crate) type Mark = u64;

/// A mutable cell in the constraint graph.
#[derive(Clone, Debug)]
pub(crate) struct Variable {
    pub(crate) name: String,
    pub(crate) value: i64,
    /// The strength with which the current value is determined.
    pub(crate) walk_strength: Strength,
    /// Whether the value is not expected to change without an external edit.
    pub(crate) stay: bool,
    /// The constraint which currently computes this variable, if any.
    pub(crate) determined_by: Option<ConstraintId>,
    pub(crate) mark: Mark,
    /// Every constraint which refers to this variable.
    pub(crate) constraints: Vec<ConstraintId>,
}

impl Variable {
    pub(crate) fn new(name: String, value: i64) -> Self {
        Variable {
            name,
            value,
            walk_strength: Strength::Weakest,
            stay: true,
            determined_by: None,
            mark: 0,
            constraints: Vec::new(),
        }
    }

    /// A variable which is never re-derived by any constraint.
    pub(crate) fn constant(name: String, value: i64) -> Self {
        Variable {
            walk_strength: Strength::Required,
            ..Variable::new(name, value)
        }
    }

    /// Forgets the constraint which determined this variable.
    pub(crate) fn reset(&mut self) {
        self.determined_by = None;
        self.walk_strength = Strength::Weakest;
        self.stay = true;
    }
}
