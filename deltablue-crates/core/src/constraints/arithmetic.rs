use super::ConstraintDefinition;
use crate::basic_types::Strength;
use crate::engine::constraint::Formula;
use crate::engine::constraint::Method;
use crate::engine::ConstraintKind;
use crate::engine::VariableId;

// [a, b]
const EQUALS: [Method; 2] = [
    Method {
        output: 0,
        formula: Formula::Copy { source: 1 },
    },
    Method {
        output: 1,
        formula: Formula::Copy { source: 0 },
    },
];

// [a, b, sum]
const ADD: [Method; 3] = [
    Method {
        output: 2,
        formula: Formula::Sum { lhs: 0, rhs: 1 },
    },
    Method {
        output: 1,
        formula: Formula::Difference {
            minuend: 2,
            subtrahend: 0,
        },
    },
    Method {
        output: 0,
        formula: Formula::Difference {
            minuend: 2,
            subtrahend: 1,
        },
    },
];

// [source, scale, offset, destination]
const SCALE_OFFSET: [Method; 2] = [
    Method {
        output: 3,
        formula: Formula::ScaleOffset {
            source: 0,
            scale: 1,
            offset: 2,
        },
    },
    Method {
        output: 0,
        formula: Formula::InverseScaleOffset {
            destination: 3,
            scale: 1,
            offset: 2,
        },
    },
];

/// Creates the constraint `a = b`, which can be satisfied by computing either side.
pub fn equals(a: VariableId, b: VariableId, strength: Strength) -> ConstraintDefinition {
    ConstraintDefinition {
        kind: ConstraintKind::Equals,
        variables: vec![a, b],
        methods: &EQUALS,
        strength,
        is_input: false,
    }
}

/// Creates the constraint `a + b = sum`.
///
/// Its methods are `sum = a + b`, `b = sum - a` and `a = sum - b`.
pub fn add(a: VariableId, b: VariableId, sum: VariableId, strength: Strength) -> ConstraintDefinition {
    ConstraintDefinition {
        kind: ConstraintKind::Add,
        variables: vec![a, b, sum],
        methods: &ADD,
        strength,
        is_input: false,
    }
}

/// Creates the constraint `destination = source * scale + offset`.
///
/// Only `destination` and `source` can be computed, the latter as
/// `(destination - offset) / scale` using truncating division. When `scale` is zero the source
/// keeps its value.
pub fn scale_offset(
    source: VariableId,
    scale: VariableId,
    offset: VariableId,
    destination: VariableId,
    strength: Strength,
) -> ConstraintDefinition {
    ConstraintDefinition {
        kind: ConstraintKind::ScaleOffset,
        variables: vec![source, scale, offset, destination],
        methods: &SCALE_OFFSET,
        strength,
        is_input: false,
    }
}
