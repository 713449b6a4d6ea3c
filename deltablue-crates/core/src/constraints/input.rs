use super::ConstraintDefinition;
use crate::basic_types::Strength;
use crate::engine::constraint::Formula;
use crate::engine::constraint::Method;
use crate::engine::ConstraintKind;
use crate::engine::VariableId;

const KEEP: [Method; 1] = [Method {
    output: 0,
    formula: Formula::Keep,
}];

/// Creates a constraint which keeps `variable` at its current value with the given `strength`.
pub fn stay(variable: VariableId, strength: Strength) -> ConstraintDefinition {
    ConstraintDefinition {
        kind: ConstraintKind::Stay,
        variables: vec![variable],
        methods: &KEEP,
        strength,
        is_input: false,
    }
}

/// Creates a constraint which marks `variable` as being changed from outside of the planner.
///
/// The value is assigned with [`Planner::set_value`](crate::Planner::set_value), after which a
/// [`Plan`](crate::Plan) extracted from the edit propagates it through the graph. By convention,
/// edits use [`Strength::Preferred`] or [`Strength::StrongDefault`].
pub fn edit(variable: VariableId, strength: Strength) -> ConstraintDefinition {
    ConstraintDefinition {
        kind: ConstraintKind::Edit,
        variables: vec![variable],
        methods: &KEEP,
        strength,
        is_input: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_edits_are_inputs() {
        let variable = VariableId(0);

        assert!(edit(variable, Strength::Preferred).is_input());
        assert!(!stay(variable, Strength::Preferred).is_input());
    }

    #[test]
    fn stay_has_a_single_method() {
        let definition = stay(VariableId(3), Strength::Normal);

        assert_eq!(1, definition.num_methods());
        assert_eq!(&[VariableId(3)], definition.variables());
        assert_eq!(Strength::Normal, definition.strength());
    }
}
