#![cfg(test)]

use deltablue_core::constraints;
use deltablue_core::ConstraintId;
use deltablue_core::Plan;
use deltablue_core::Planner;
use deltablue_core::PlannerError;
use deltablue_core::Strength;
use deltablue_core::VariableId;

/// Assigns `value` to `variable` through a temporary edit constraint.
fn change(planner: &mut Planner, variable: VariableId, value: i64) {
    let edit = planner
        .add_constraint(constraints::edit(variable, Strength::Preferred))
        .expect("edits are never required");
    let plan = planner.extract_plan_from_constraint(edit);

    planner.set_value(variable, value);
    planner.execute_plan(&plan);

    planner
        .destroy_constraint(edit)
        .expect("nothing required is blocked by an edit");
}

fn chain(planner: &mut Planner, length: usize) -> Vec<VariableId> {
    let variables = (0..=length)
        .map(|index| planner.new_variable(format!("v{index}"), 0))
        .collect::<Vec<_>>();
    for pair in variables.windows(2) {
        let _ = planner
            .add_constraint(constraints::equals(pair[0], pair[1], Strength::Required))
            .expect("a chain has no cycles");
    }
    variables
}

struct Projection {
    scale: VariableId,
    offset: VariableId,
    sources: Vec<VariableId>,
    destinations: Vec<VariableId>,
}

fn projection(planner: &mut Planner, size: i64) -> Projection {
    let scale = planner.new_variable("scale", 10);
    let offset = planner.new_variable("offset", 1000);

    let mut sources = vec![];
    let mut destinations = vec![];
    for index in 0..size {
        let source = planner.new_variable(format!("src{index}"), index);
        let destination = planner.new_variable(format!("dst{index}"), index);

        let _ = planner
            .add_constraint(constraints::stay(source, Strength::Normal))
            .expect("stays are never required");
        let _ = planner
            .add_constraint(constraints::scale_offset(
                source,
                scale,
                offset,
                destination,
                Strength::Required,
            ))
            .expect("projections are independent");

        sources.push(source);
        destinations.push(destination);
    }

    Projection {
        scale,
        offset,
        sources,
        destinations,
    }
}

/// Checks that every input of every step of `plan` is stay, undetermined, or computed by an
/// earlier step.
fn assert_plan_is_sound(planner: &Planner, plan: &Plan) {
    let mut computed = vec![];
    for constraint in plan.iter() {
        let output = planner
            .output_of(constraint)
            .expect("plans only contain satisfied constraints");

        for &input in planner
            .constraint_variables(constraint)
            .iter()
            .filter(|&&variable| variable != output)
        {
            assert!(
                computed.contains(&input)
                    || planner.is_stay(input)
                    || planner.determined_by(input).is_none(),
                "{input} is used by {constraint} before it is computed"
            );
        }

        computed.push(output);
    }
}

fn assert_single_determiners(planner: &Planner, constraints: &[ConstraintId]) {
    assert!(planner.is_consistent());

    let mut outputs = constraints
        .iter()
        .filter(|&&constraint| planner.contains_constraint(constraint))
        .filter_map(|&constraint| planner.output_of(constraint))
        .collect::<Vec<_>>();
    let num_outputs = outputs.len();
    outputs.sort();
    outputs.dedup();
    assert_eq!(num_outputs, outputs.len());
}

#[test]
fn chain_propagates_values_from_first_to_last() {
    let mut planner = Planner::default();
    let variables = chain(&mut planner, 50);
    let first = variables[0];
    let last = variables[50];

    let _ = planner
        .add_constraint(constraints::stay(last, Strength::StrongDefault))
        .expect("stays are never required");
    let edit = planner
        .add_constraint(constraints::edit(first, Strength::Preferred))
        .expect("edits are never required");

    let plan = planner.extract_plan_from_constraint(edit);
    assert_eq!(51, plan.len());
    assert_plan_is_sound(&planner, &plan);

    for value in [3, -7, 100, 0] {
        planner.set_value(first, value);
        planner.execute_plan(&plan);

        assert!(variables
            .iter()
            .all(|&variable| planner.value(variable) == value));
    }
}

#[test]
fn projection_propagates_in_both_directions() {
    let mut planner = Planner::default();
    let Projection {
        scale,
        offset,
        sources,
        destinations,
    } = projection(&mut planner, 10);

    change(&mut planner, sources[9], 17);
    assert_eq!(1170, planner.value(destinations[9]));

    change(&mut planner, destinations[9], 1050);
    assert_eq!(5, planner.value(sources[9]));

    change(&mut planner, scale, 5);
    for (index, &destination) in (0..).zip(&destinations[..9]) {
        assert_eq!(index * 5 + 1000, planner.value(destination));
    }

    change(&mut planner, offset, 2000);
    for (index, &destination) in (0..).zip(&destinations[..9]) {
        assert_eq!(index * 5 + 2000, planner.value(destination));
    }
}

#[test]
fn plans_from_shared_variables_are_sound() {
    let mut planner = Planner::default();
    let Projection {
        scale,
        destinations,
        ..
    } = projection(&mut planner, 5);

    let edit = planner
        .add_constraint(constraints::edit(scale, Strength::Preferred))
        .expect("edits are never required");
    let plan = planner.extract_plan_from_constraint(edit);

    assert_eq!(6, plan.len());
    assert_plan_is_sound(&planner, &plan);

    planner.set_value(scale, 3);
    planner.execute_plan(&plan);
    for (index, &destination) in (0..).zip(&destinations) {
        assert_eq!(index * 3 + 1000, planner.value(destination));
    }
}

#[test]
fn adding_an_edit_never_weakens_walk_strengths() {
    let mut planner = Planner::default();
    let Projection {
        scale,
        offset,
        sources,
        destinations,
    } = projection(&mut planner, 4);

    let variables = [scale, offset]
        .into_iter()
        .chain(sources.iter().copied())
        .chain(destinations.iter().copied())
        .collect::<Vec<_>>();
    let before = variables
        .iter()
        .map(|&variable| planner.walk_strength(variable))
        .collect::<Vec<_>>();

    let _ = planner
        .add_constraint(constraints::edit(sources[0], Strength::Preferred))
        .expect("edits are never required");

    for (&variable, &strength) in variables.iter().zip(&before) {
        assert!(!planner.walk_strength(variable).is_weaker_than(strength));
    }
    assert_eq!(Strength::Preferred, planner.walk_strength(destinations[0]));
}

#[test]
fn destroying_and_adding_again_restores_the_graph() {
    let mut planner = Planner::default();
    let variables = chain(&mut planner, 5);
    let stay = planner
        .add_constraint(constraints::stay(variables[5], Strength::StrongDefault))
        .expect("stays are never required");
    let edit = planner
        .add_constraint(constraints::edit(variables[0], Strength::Preferred))
        .expect("edits are never required");

    let snapshot = |planner: &Planner| {
        variables
            .iter()
            .map(|&variable| {
                (
                    planner.walk_strength(variable),
                    planner.is_stay(variable),
                    planner.determined_by(variable).is_some(),
                )
            })
            .collect::<Vec<_>>()
    };
    let before = snapshot(&planner);
    assert!(!planner.is_satisfied(stay));

    planner.destroy_constraint(edit).expect("no conflict");
    assert!(planner.is_satisfied(stay));

    let _ = planner
        .add_constraint(constraints::edit(variables[0], Strength::Preferred))
        .expect("edits are never required");

    assert_eq!(before, snapshot(&planner));
    assert!(!planner.is_satisfied(stay));
}

#[test]
fn constants_cannot_be_determined_by_constraints() {
    let mut planner = Planner::default();
    let constant = planner.new_constant("k", 7);
    let variable = planner.new_variable("x", 0);

    let equals = planner
        .add_constraint(constraints::equals(variable, constant, Strength::Required))
        .expect("the variable can follow the constant");
    assert_eq!(Some(variable), planner.output_of(equals));
    assert_eq!(7, planner.value(variable));

    let result = planner.add_constraint(constraints::edit(variable, Strength::Required));
    assert_eq!(Err(PlannerError::UnsatisfiableRequiredConstraint), result);
    assert_eq!(Some(equals), planner.determined_by(variable));
}

#[test]
fn conflicting_required_stays_are_rejected() {
    let mut planner = Planner::default();
    let variable = planner.new_variable("x", 0);

    let stay = planner
        .add_constraint(constraints::stay(variable, Strength::Required))
        .expect("the variable is free");
    let result = planner.add_constraint(constraints::stay(variable, Strength::Required));

    assert_eq!(Err(PlannerError::UnsatisfiableRequiredConstraint), result);
    assert_eq!(&[stay], planner.variable_constraints(variable));
    assert_eq!(Strength::Required, planner.walk_strength(variable));
}

#[test]
fn failing_to_satisfy_a_blocked_constraint_is_reported_when_destroying() {
    let mut planner = Planner::default();
    let x = planner.new_variable("x", 0);
    let y = planner.new_variable("y", 0);
    let z = planner.new_variable("z", 0);

    let _ = planner
        .add_constraint(constraints::equals(x, y, Strength::Required))
        .expect("no conflict");
    let _ = planner
        .add_constraint(constraints::equals(y, z, Strength::Required))
        .expect("no conflict");
    let edit = planner
        .add_constraint(constraints::edit(x, Strength::Preferred))
        .expect("no conflict");

    // Too weak to be satisfied while the edit holds the chain.
    let closing = planner
        .add_constraint(constraints::equals(z, x, Strength::Normal))
        .expect("weak constraints are allowed to stay unsatisfied");
    assert!(!planner.is_satisfied(closing));

    let result = planner.destroy_constraint(edit);

    assert_eq!(Err(PlannerError::CycleEncountered), result);
    assert!(!planner.contains_constraint(edit));
    assert!(planner.contains_constraint(closing));
    assert!(!planner.is_satisfied(closing));
    assert!(planner.is_consistent());
}

#[test]
fn every_variable_has_at_most_one_determiner() {
    let mut planner = Planner::default();
    let variables = (0..6)
        .map(|index| planner.new_variable(format!("x{index}"), index))
        .collect::<Vec<_>>();

    let mut added = vec![];
    let definitions = [
        constraints::stay(variables[0], Strength::WeakDefault),
        constraints::equals(variables[0], variables[1], Strength::Required),
        constraints::add(variables[1], variables[2], variables[3], Strength::Required),
        constraints::stay(variables[3], Strength::StrongDefault),
        constraints::equals(variables[3], variables[4], Strength::Normal),
        constraints::edit(variables[4], Strength::Preferred),
        constraints::stay(variables[2], Strength::Normal),
        constraints::equals(variables[4], variables[5], Strength::StrongPreferred),
        constraints::stay(variables[5], Strength::Weakest),
    ];
    for definition in definitions {
        if let Ok(constraint) = planner.add_constraint(definition) {
            added.push(constraint);
        }
        assert_single_determiners(&planner, &added);
    }

    for constraint in added.clone().into_iter().rev().step_by(2) {
        let _ = planner.destroy_constraint(constraint);
        assert_single_determiners(&planner, &added);
    }

    let plan = planner.extract_plan();
    assert_plan_is_sound(&planner, &plan);
}

#[test]
fn destroyed_identifiers_are_never_reused() {
    let mut planner = Planner::default();
    let first = planner.new_variable("first", 0);
    planner.destroy_variable(first).expect("no constraints");

    let second = planner.new_variable("second", 0);

    assert_ne!(first, second);
    assert!(!planner.contains_variable(first));
    assert_eq!(1, planner.num_variables());
}

#[test]
fn statistics_count_changes_to_the_graph() {
    let mut planner = Planner::default();
    let variables = chain(&mut planner, 3);
    change(&mut planner, variables[0], 4);

    let statistics = planner.statistics();
    assert_eq!(4, statistics.num_constraints_added);
    assert_eq!(1, statistics.num_constraints_removed);
    assert_eq!(1, statistics.num_plans_extracted);
    assert_eq!(4, statistics.num_plan_steps_executed);
    assert_eq!(0, statistics.num_failed_additions);
}

#[test]
fn equally_weak_outputs_are_resolved_towards_the_last_method() {
    let mut planner = Planner::default();
    let a = planner.new_variable("a", 5);
    let b = planner.new_variable("b", 0);

    let equals = planner
        .add_constraint(constraints::equals(a, b, Strength::Required))
        .expect("no conflict");

    assert_eq!(Some(b), planner.output_of(equals));
    assert_eq!(5, planner.value(b));
    assert_eq!(None, planner.determined_by(a));
}

#[test]
fn cycles_are_rejected_without_changing_the_graph() {
    let mut planner = Planner::default();
    let variables = chain(&mut planner, 4);
    let outputs = (0..4)
        .map(|index| planner.determined_by(variables[index + 1]))
        .collect::<Vec<_>>();

    let result =
        planner.add_constraint(constraints::equals(variables[4], variables[0], Strength::Normal));

    assert_eq!(Err(PlannerError::CycleEncountered), result);
    assert_eq!(4, planner.num_constraints());
    assert_eq!(None, planner.determined_by(variables[0]));
    assert_eq!(
        outputs,
        (0..4)
            .map(|index| planner.determined_by(variables[index + 1]))
            .collect::<Vec<_>>()
    );
    assert!(planner.is_consistent());
}

#[test]
fn plans_order_constraints_after_their_inputs() {
    let mut planner = Planner::default();
    let a = planner.new_variable("a", 1);
    let b = planner.new_variable("b", 2);
    let sum = planner.new_variable("sum", 0);
    let copy = planner.new_variable("copy", 0);

    let _ = planner
        .add_constraint(constraints::stay(b, Strength::StrongDefault))
        .expect("no conflict");
    let add = planner
        .add_constraint(constraints::add(a, b, sum, Strength::Required))
        .expect("no conflict");
    let equals = planner
        .add_constraint(constraints::equals(sum, copy, Strength::Required))
        .expect("no conflict");
    let edit = planner
        .add_constraint(constraints::edit(a, Strength::Preferred))
        .expect("no conflict");

    let plan = planner.extract_plan();

    assert_eq!(Some(0), plan.position(edit));
    assert!(plan.position(add) < plan.position(equals));
    assert_plan_is_sound(&planner, &plan);

    planner.set_value(a, 10);
    planner.execute_plan(&plan);
    assert_eq!(12, planner.value(sum));
    assert_eq!(12, planner.value(copy));
}
