use std::fmt::Display;

use crate::basic_types::Strength;
use crate::constraints::ConstraintDefinition;
use crate::containers::StorageKey;
use crate::engine::VariableId;

/// An identifier to a constraint within the [`Planner`](crate::Planner).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) u32);

impl Display for ConstraintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl StorageKey for ConstraintId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ConstraintId(index as u32)
    }
}

/// The kinds of constraints which the planner knows about; see [`crate::constraints`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ConstraintKind {
    Stay,
    Edit,
    Equals,
    Add,
    ScaleOffset,
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::Stay => write!(f, "stay"),
            ConstraintKind::Edit => write!(f, "edit"),
            ConstraintKind::Equals => write!(f, "equals"),
            ConstraintKind::Add => write!(f, "add"),
            ConstraintKind::ScaleOffset => write!(f, "scale_offset"),
        }
    }
}

/// The computation a method performs. Operands are positions in the variables of the constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Formula {
    /// The output keeps its current value.
    Keep,
    /// `output = source`
    Copy { source: usize },
    /// `output = lhs + rhs`
    Sum { lhs: usize, rhs: usize },
    /// `output = minuend - subtrahend`
    Difference { minuend: usize, subtrahend: usize },
    /// `output = source * scale + offset`
    ScaleOffset {
        source: usize,
        scale: usize,
        offset: usize,
    },
    /// `output = (destination - offset) / scale`
    InverseScaleOffset {
        destination: usize,
        scale: usize,
        offset: usize,
    },
}

impl Formula {
    /// Computes the new value of the output, or [`None`] if the output should not change.
    ///
    /// Arithmetic wraps on overflow; a division by zero leaves the output unchanged.
    pub(crate) fn evaluate(self, value_at: impl Fn(usize) -> i64) -> Option<i64> {
        match self {
            Formula::Keep => None,
            Formula::Copy { source } => Some(value_at(source)),
            Formula::Sum { lhs, rhs } => Some(value_at(lhs).wrapping_add(value_at(rhs))),
            Formula::Difference {
                minuend,
                subtrahend,
            } => Some(value_at(minuend).wrapping_sub(value_at(subtrahend))),
            Formula::ScaleOffset {
                source,
                scale,
                offset,
            } => Some(
                value_at(source)
                    .wrapping_mul(value_at(scale))
                    .wrapping_add(value_at(offset)),
            ),
            Formula::InverseScaleOffset {
                destination,
                scale,
                offset,
            } => value_at(destination)
                .wrapping_sub(value_at(offset))
                .checked_div(value_at(scale)),
        }
    }
}

/// One way of satisfying a constraint: computing the variable at position `output` with
/// `formula`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Method {
    pub(crate) output: usize,
    pub(crate) formula: Formula,
}

/// A constraint as it is stored in the planner.
#[derive(Clone, Debug)]
pub(crate) struct Constraint {
    pub(crate) kind: ConstraintKind,
    pub(crate) variables: Vec<VariableId>,
    pub(crate) methods: &'static [Method],
    pub(crate) strength: Strength,
    /// The index into `methods` of the method which is currently used, or [`None`] if the
    /// constraint is unsatisfied.
    pub(crate) selected_method: Option<usize>,
    /// Whether the constraint introduces values from outside of the graph (edits).
    pub(crate) is_input: bool,
}

impl Constraint {
    pub(crate) fn is_satisfied(&self) -> bool {
        self.selected_method.is_some()
    }

    pub(crate) fn selected(&self) -> Option<Method> {
        self.selected_method.map(|index| self.methods[index])
    }

    /// The position of the output variable of the selected method.
    pub(crate) fn output_index(&self) -> Option<usize> {
        self.selected().map(|method| method.output)
    }

    /// The output variable of the selected method.
    pub(crate) fn output(&self) -> Option<VariableId> {
        self.output_index().map(|index| self.variables[index])
    }

    /// The variables which are not the output of the selected method.
    pub(crate) fn inputs(&self) -> impl Iterator<Item = VariableId> + '_ {
        let output_index = self.output_index();
        self.variables
            .iter()
            .enumerate()
            .filter(move |&(index, _)| Some(index) != output_index)
            .map(|(_, &variable)| variable)
    }
}

impl From<ConstraintDefinition> for Constraint {
    fn from(definition: ConstraintDefinition) -> Self {
        Constraint {
            kind: definition.kind,
            variables: definition.variables,
            methods: definition.methods,
            strength: definition.strength,
            selected_method: None,
            is_input: definition.is_input,
        }
    }
}
