//! The two classic DeltaBlue benchmarks. Both build a constraint graph, push new values into it
//! through edit constraints and check the propagated values.

use deltablue_core::constraints;
use deltablue_core::Planner;
use deltablue_core::Strength;
use deltablue_core::VariableId;
use log::debug;

use crate::result::BenchError;
use crate::result::BenchResult;

/// The number of times the plan of an edit is executed by [`change`].
const EXECUTIONS_PER_CHANGE: usize = 10;

/// The number of values pushed through the chain by [`chain_test`].
const CHAIN_VALUES: i64 = 100;

/// Builds the chain `v0 = v1 = ... = v{size}`, holds the last variable with a stay and checks that
/// every value assigned to the first variable arrives at the last one.
pub(crate) fn chain_test(planner: &mut Planner, size: usize) -> BenchResult<()> {
    let variables = (0..=size)
        .map(|index| planner.new_variable(format!("v{index}"), 0))
        .collect::<Vec<_>>();
    for pair in variables.windows(2) {
        let _ = planner.add_constraint(constraints::equals(pair[0], pair[1], Strength::Required))?;
    }

    let first = variables[0];
    let last = variables[size];
    let _ = planner.add_constraint(constraints::stay(last, Strength::StrongDefault))?;
    let edit = planner.add_constraint(constraints::edit(first, Strength::Preferred))?;

    let plan = planner.extract_plan_from_constraint(edit);
    debug!("Chain of {size} constraints planned in {} steps", plan.len());

    for value in 0..CHAIN_VALUES {
        planner.set_value(first, value);
        planner.execute_plan(&plan);

        let arrived = planner.value(last);
        if arrived != value {
            return Err(BenchError::check_failed(
                "chain",
                format!("expected {value} at the end of the chain, found {arrived}"),
            ));
        }
    }

    Ok(())
}

/// Builds `size` constraints `dst_i = src_i * scale + offset` sharing `scale` and `offset`, then
/// changes the last source, the last destination, the scale and the offset in turn.
pub(crate) fn projection_test(planner: &mut Planner, size: usize) -> BenchResult<()> {
    let scale = planner.new_variable("scale", 10);
    let offset = planner.new_variable("offset", 1000);

    let mut sources = Vec::with_capacity(size);
    let mut destinations = Vec::with_capacity(size);
    for index in 0..size {
        let value = to_value(index);
        let source = planner.new_variable(format!("src{index}"), value);
        let destination = planner.new_variable(format!("dst{index}"), value);

        let _ = planner.add_constraint(constraints::stay(source, Strength::Normal))?;
        let _ = planner.add_constraint(constraints::scale_offset(
            source,
            scale,
            offset,
            destination,
            Strength::Required,
        ))?;

        sources.push(source);
        destinations.push(destination);
    }

    let (Some(&source), Some(&destination)) = (sources.last(), destinations.last()) else {
        return Err(BenchError::check_failed(
            "projection",
            "at least one projection is needed",
        ));
    };

    change(planner, source, 17)?;
    expect_value(planner, "projection", destination, 1170)?;

    change(planner, destination, 1050)?;
    expect_value(planner, "projection", source, 5)?;

    // The last pair was edited above, so it is left out of the remaining checks.
    change(planner, scale, 5)?;
    for (index, &destination) in destinations.iter().enumerate().take(size - 1) {
        expect_value(planner, "projection", destination, to_value(index) * 5 + 1000)?;
    }

    change(planner, offset, 2000)?;
    for (index, &destination) in destinations.iter().enumerate().take(size - 1) {
        expect_value(planner, "projection", destination, to_value(index) * 5 + 2000)?;
    }

    Ok(())
}

/// Assigns `value` to `variable` through a temporary edit constraint.
fn change(planner: &mut Planner, variable: VariableId, value: i64) -> BenchResult<()> {
    let edit = planner.add_constraint(constraints::edit(variable, Strength::Preferred))?;
    let plan = planner.extract_plan_from_constraint(edit);

    for _ in 0..EXECUTIONS_PER_CHANGE {
        planner.set_value(variable, value);
        planner.execute_plan(&plan);
    }

    planner.destroy_constraint(edit)?;
    Ok(())
}

fn expect_value(
    planner: &Planner,
    benchmark: &'static str,
    variable: VariableId,
    expected: i64,
) -> BenchResult<()> {
    let actual = planner.value(variable);
    if actual != expected {
        return Err(BenchError::check_failed(
            benchmark,
            format!(
                "expected {} to be {expected}, found {actual}",
                planner.variable_name(variable)
            ),
        ));
    }
    Ok(())
}

fn to_value(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
