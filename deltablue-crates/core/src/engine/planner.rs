use std::collections::VecDeque;

use enum_map::EnumMap;
use log::debug;
use log::trace;
use log::warn;

use crate::basic_types::PlannerError;
use crate::basic_types::Strength;
use crate::basic_types::Trail;
use crate::constraints::ConstraintDefinition;
use crate::containers::KeyedArena;
use crate::create_statistics_struct;
use crate::deltablue_assert_advanced;
use crate::deltablue_assert_simple;
use crate::engine::constraint::Constraint;
use crate::engine::variable::Mark;
use crate::engine::variable::Variable;
use crate::engine::ConstraintId;
use crate::engine::ConstraintKind;
use crate::engine::Plan;
use crate::engine::VariableId;
use crate::options::PlannerOptions;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters describing the work done by a [`Planner`].
    PlannerStatistics {
        num_constraints_added: usize,
        num_constraints_removed: usize,
        num_failed_additions: usize,
        num_satisfy_calls: usize,
        num_overrides: usize,
        num_propagation_steps: usize,
        num_cycles_detected: usize,
        num_plans_extracted: usize,
        num_plan_steps_executed: usize,
    }
);

/// The state which is restored when an incremental addition fails.
#[derive(Clone, Copy, Debug)]
enum Undo {
    WalkStrength(VariableId, Strength),
    Stay(VariableId, bool),
    DeterminedBy(VariableId, Option<ConstraintId>),
    Value(VariableId, i64),
    SelectedMethod(ConstraintId, Option<usize>),
}

/// An incremental planner for a graph of variables and multi-method constraints.
///
/// Every constraint which is added is satisfied, if possible, by selecting one of its methods; the
/// output of that method is then *determined* by the constraint. Stronger constraints override
/// weaker ones, and whenever a constraint is added or destroyed only the affected part of the
/// graph is revisited.
///
/// Values are propagated through the graph by [`Plan`]s. A plan is extracted from one or more
/// edit constraints, after which assigning new values to the edited variables and executing the
/// plan updates every variable downstream of them.
///
/// ```rust
/// # use deltablue_core::constraints;
/// # use deltablue_core::Planner;
/// # use deltablue_core::Strength;
/// let mut planner = Planner::default();
/// let celsius = planner.new_variable("celsius", 0);
/// let fahrenheit = planner.new_variable("fahrenheit", 0);
/// let scale = planner.new_constant("scale", 2);
/// let offset = planner.new_constant("offset", 32);
///
/// planner
///     .add_constraint(constraints::scale_offset(
///         celsius,
///         scale,
///         offset,
///         fahrenheit,
///         Strength::Required,
///     ))
///     .expect("no conflicts");
/// planner
///     .add_constraint(constraints::stay(fahrenheit, Strength::Normal))
///     .expect("no conflicts");
///
/// let edit = planner
///     .add_constraint(constraints::edit(celsius, Strength::Preferred))
///     .expect("no conflicts");
/// let plan = planner.extract_plan_from_constraint(edit);
///
/// for value in [10, 20, 30] {
///     planner.set_value(celsius, value);
///     planner.execute_plan(&plan);
///     assert_eq!(value * 2 + 32, planner.value(fahrenheit));
/// }
/// ```
#[derive(Debug)]
pub struct Planner {
    variables: KeyedArena<VariableId, Variable>,
    constraints: KeyedArena<ConstraintId, Constraint>,
    /// Variables whose mark equals this value have been visited by the current pass.
    current_mark: Mark,
    /// Records the changes made by the incremental addition in progress.
    trail: Trail<Undo>,
    options: PlannerOptions,
    statistics: PlannerStatistics,
}

impl Default for Planner {
    fn default() -> Self {
        Planner::with_options(PlannerOptions::default())
    }
}

impl Planner {
    /// Creates a planner with the provided [`PlannerOptions`].
    pub fn with_options(options: PlannerOptions) -> Self {
        Planner {
            variables: KeyedArena::with_capacity(options.variable_capacity),
            constraints: KeyedArena::with_capacity(options.constraint_capacity),
            current_mark: 0,
            trail: Trail::default(),
            options,
            statistics: PlannerStatistics::default(),
        }
    }

    pub fn statistics(&self) -> &PlannerStatistics {
        &self.statistics
    }

    /// Logs the statistics of the planner, if statistic logging has been configured (see
    /// [`configure_statistic_logging`](crate::statistics::configure_statistic_logging)).
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }
        self.statistics.log(StatisticLogger::default());
        log_statistic_postfix();
    }
}

/// Methods to create, destroy and inspect variables.
impl Planner {
    /// Creates a variable which is not determined by any constraint yet.
    pub fn new_variable(&mut self, name: impl Into<String>, value: i64) -> VariableId {
        self.variables.insert(Variable::new(name.into(), value))
    }

    /// Creates a variable whose walk strength is [`Strength::Required`]; no constraint is ever
    /// able to determine it.
    pub fn new_constant(&mut self, name: impl Into<String>, value: i64) -> VariableId {
        self.variables.insert(Variable::constant(name.into(), value))
    }

    /// Destroys `variable` together with every constraint which refers to it.
    ///
    /// Returns the first error reported by [`Planner::destroy_constraint`]; the variable and its
    /// constraints are destroyed regardless.
    pub fn destroy_variable(&mut self, variable: VariableId) -> Result<(), PlannerError> {
        let Some(data) = self.variables.get(variable) else {
            return Err(PlannerError::UnknownVariable(variable));
        };

        let mut first_error = None;
        for constraint in data.constraints.clone() {
            // A constraint which mentions the variable more than once is listed repeatedly.
            if !self.constraints.contains(constraint) {
                continue;
            }
            if let Err(error) = self.destroy_constraint(constraint) {
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }

        let _ = self.variables.remove(variable);
        debug!("Destroyed variable {variable}");

        first_error.map_or(Ok(()), Err)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn contains_variable(&self, variable: VariableId) -> bool {
        self.variables.contains(variable)
    }

    /// The current value of `variable`.
    ///
    /// # Panics
    /// If `variable` was destroyed.
    pub fn value(&self, variable: VariableId) -> i64 {
        self.variables[variable].value
    }

    /// Assigns a value to `variable`. This is how edit constraints receive their input; the value
    /// is propagated by executing a [`Plan`].
    ///
    /// # Panics
    /// If `variable` was destroyed.
    pub fn set_value(&mut self, variable: VariableId, value: i64) {
        self.variables[variable].value = value;
    }

    /// # Panics
    /// If `variable` was destroyed.
    pub fn variable_name(&self, variable: VariableId) -> &str {
        &self.variables[variable].name
    }

    /// The strength with which `variable` is currently determined.
    ///
    /// # Panics
    /// If `variable` was destroyed.
    pub fn walk_strength(&self, variable: VariableId) -> Strength {
        self.variables[variable].walk_strength
    }

    /// Whether the value of `variable` only changes through an edit.
    ///
    /// # Panics
    /// If `variable` was destroyed.
    pub fn is_stay(&self, variable: VariableId) -> bool {
        self.variables[variable].stay
    }

    /// The constraint which currently computes `variable`.
    ///
    /// # Panics
    /// If `variable` was destroyed.
    pub fn determined_by(&self, variable: VariableId) -> Option<ConstraintId> {
        self.variables[variable].determined_by
    }

    /// The constraints which refer to `variable`.
    ///
    /// # Panics
    /// If `variable` was destroyed.
    pub fn variable_constraints(&self, variable: VariableId) -> &[ConstraintId] {
        &self.variables[variable].constraints
    }
}

/// Methods to add, destroy and inspect constraints.
impl Planner {
    /// Adds the constraint described by `definition` and incrementally re-plans the graph around
    /// it.
    ///
    /// If no method of the constraint can be selected, the constraint is kept but stays
    /// unsatisfied. Adding fails with:
    /// - [`PlannerError::UnsatisfiableRequiredConstraint`] if the constraint, or a constraint it
    ///   displaced, is [`Strength::Required`] and cannot be satisfied;
    /// - [`PlannerError::CycleEncountered`] if satisfying it would make a variable depend on
    ///   itself;
    /// - [`PlannerError::UnknownVariable`] if it refers to a variable which does not exist.
    ///
    /// On failure the constraint is discarded and the graph is left as it was.
    pub fn add_constraint(
        &mut self,
        definition: ConstraintDefinition,
    ) -> Result<ConstraintId, PlannerError> {
        if let Some(&unknown) = definition
            .variables
            .iter()
            .find(|&&variable| !self.variables.contains(variable))
        {
            return Err(PlannerError::UnknownVariable(unknown));
        }

        let constraint = self.constraints.insert(Constraint::from(definition));
        self.attach(constraint);

        if let Err(error) = self.incremental_add(constraint) {
            self.detach(constraint);
            let _ = self.constraints.remove(constraint);
            self.statistics.num_failed_additions += 1;
            debug!("Failed to add {constraint}: {error}");

            deltablue_assert_advanced!(self.is_consistent());
            return Err(error);
        }

        self.statistics.num_constraints_added += 1;
        debug!(
            "Added {constraint} ({}, {}), determining {:?}",
            self.constraints[constraint].kind,
            self.constraints[constraint].strength,
            self.output_of(constraint)
        );

        deltablue_assert_advanced!(self.is_consistent());
        Ok(constraint)
    }

    /// Destroys `constraint`. If it was satisfied, the constraints which it blocked are given the
    /// chance to be satisfied again, strongest first.
    ///
    /// The constraint is always destroyed. An error is returned if one of the blocked constraints
    /// failed to be re-satisfied (see [`Planner::add_constraint`]); that constraint is left
    /// unsatisfied.
    pub fn destroy_constraint(&mut self, constraint: ConstraintId) -> Result<(), PlannerError> {
        let Some(data) = self.constraints.get(constraint) else {
            return Err(PlannerError::UnknownConstraint(constraint));
        };

        let result = if data.is_satisfied() {
            self.incremental_remove(constraint)
        } else {
            self.detach(constraint);
            Ok(())
        };

        let _ = self.constraints.remove(constraint);
        self.statistics.num_constraints_removed += 1;
        debug!("Destroyed {constraint}");

        deltablue_assert_advanced!(self.is_consistent());
        result
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn contains_constraint(&self, constraint: ConstraintId) -> bool {
        self.constraints.contains(constraint)
    }

    /// Whether a method of `constraint` is currently selected.
    ///
    /// # Panics
    /// If `constraint` was destroyed.
    pub fn is_satisfied(&self, constraint: ConstraintId) -> bool {
        self.constraints[constraint].is_satisfied()
    }

    /// The variable which `constraint` currently determines.
    ///
    /// # Panics
    /// If `constraint` was destroyed.
    pub fn output_of(&self, constraint: ConstraintId) -> Option<VariableId> {
        self.constraints[constraint].output()
    }

    /// # Panics
    /// If `constraint` was destroyed.
    pub fn constraint_strength(&self, constraint: ConstraintId) -> Strength {
        self.constraints[constraint].strength
    }

    /// # Panics
    /// If `constraint` was destroyed.
    pub fn constraint_kind(&self, constraint: ConstraintId) -> ConstraintKind {
        self.constraints[constraint].kind
    }

    /// Whether `constraint` is an edit.
    ///
    /// # Panics
    /// If `constraint` was destroyed.
    pub fn is_input(&self, constraint: ConstraintId) -> bool {
        self.constraints[constraint].is_input
    }

    /// # Panics
    /// If `constraint` was destroyed.
    pub fn constraint_variables(&self, constraint: ConstraintId) -> &[VariableId] {
        &self.constraints[constraint].variables
    }

    /// Checks that every satisfied constraint determines its output, and that every determined
    /// variable is determined by a satisfied constraint which outputs it. Together, this means no
    /// variable is the output of more than one constraint.
    ///
    /// Also checks that variables without a determining constraint are stay.
    pub fn is_consistent(&self) -> bool {
        let constraints_determine_their_output =
            self.constraints.iter().all(|(constraint, data)| {
                data.output().map_or(true, |output| {
                    self.variables.get(output).is_some_and(|variable| {
                        variable.determined_by == Some(constraint)
                    })
                })
            });

        let variables_are_determined_by_their_constraint =
            self.variables
                .iter()
                .all(|(variable, data)| match data.determined_by {
                    Some(constraint) => self
                        .constraints
                        .get(constraint)
                        .is_some_and(|constraint| constraint.output() == Some(variable)),
                    None => data.stay,
                });

        constraints_determine_their_output && variables_are_determined_by_their_constraint
    }
}

/// Methods to extract and execute plans.
impl Planner {
    /// Extracts a plan for all satisfied edit constraints in the graph.
    pub fn extract_plan(&mut self) -> Plan {
        let inputs = self
            .constraints
            .iter()
            .filter(|(_, data)| data.is_input && data.is_satisfied())
            .map(|(constraint, _)| constraint)
            .collect::<Vec<_>>();
        self.extract_plan_from_constraints(inputs)
    }

    /// Extracts a plan which propagates the value of the edit `constraint`.
    pub fn extract_plan_from_constraint(&mut self, constraint: ConstraintId) -> Plan {
        self.extract_plan_from_constraints([constraint])
    }

    /// Extracts a plan which propagates the values of the given edit constraints.
    ///
    /// Constraints which are not satisfied edits (or which do not exist) are ignored. A constraint
    /// is only added to the plan once all of its inputs are known: they are computed earlier in the
    /// plan, they are stay, or nothing determines them.
    pub fn extract_plan_from_constraints(
        &mut self,
        constraints: impl IntoIterator<Item = ConstraintId>,
    ) -> Plan {
        self.new_mark();

        let mut plan = Vec::with_capacity(self.options.plan_capacity);
        let mut hot = constraints
            .into_iter()
            .filter(|&constraint| {
                self.constraints
                    .get(constraint)
                    .is_some_and(|data| data.is_input && data.is_satisfied())
            })
            .collect::<VecDeque<_>>();

        while let Some(constraint) = hot.pop_front() {
            let Some(output) = self.constraints[constraint].output() else {
                continue;
            };

            if self.variables[output].mark != self.current_mark && self.inputs_known(constraint) {
                plan.push(constraint);
                self.variables[output].mark = self.current_mark;

                if let Some((next, _)) = self.next_downstream_constraint(&mut hot, output) {
                    hot.push_back(next);
                }
            }
        }

        self.statistics.num_plans_extracted += 1;
        debug!("Extracted a plan of {} steps", plan.len());

        Plan::new(plan)
    }

    /// Executes the methods of the constraints in `plan`, in order.
    ///
    /// Constraints which were destroyed or became unsatisfied after the plan was extracted are
    /// skipped; a plan should be re-extracted after the graph changes.
    pub fn execute_plan(&mut self, plan: &Plan) {
        for constraint in plan.iter() {
            if !self
                .constraints
                .get(constraint)
                .is_some_and(Constraint::is_satisfied)
            {
                warn!("Skipping {constraint} while executing a plan; it is no longer satisfied");
                continue;
            }
            self.execute(constraint);
        }

        self.statistics.num_plan_steps_executed += plan.len();
    }

    fn inputs_known(&self, constraint: ConstraintId) -> bool {
        self.constraints[constraint].inputs().all(|input| {
            let input = &self.variables[input];
            input.mark == self.current_mark || input.stay || input.determined_by.is_none()
        })
    }
}

/// Incremental addition.
impl Planner {
    fn incremental_add(&mut self, constraint: ConstraintId) -> Result<(), PlannerError> {
        let checkpoint = self.trail.get_checkpoint();
        self.trail.new_checkpoint();
        self.new_mark();

        let mut next = Some(constraint);
        while let Some(current) = next {
            match self.satisfy(current) {
                Ok(overridden) => next = overridden,
                Err(error) => {
                    self.undo_to(checkpoint);
                    return Err(error);
                }
            }
        }

        self.trail.commit(checkpoint);
        Ok(())
    }

    /// Attempts to satisfy `constraint`, returning the constraint which lost its output to it.
    fn satisfy(&mut self, constraint: ConstraintId) -> Result<Option<ConstraintId>, PlannerError> {
        self.statistics.num_satisfy_calls += 1;
        self.choose_method(constraint);

        let Some(output) = self.constraints[constraint].output() else {
            if self.constraints[constraint].strength == Strength::Required {
                return Err(PlannerError::UnsatisfiableRequiredConstraint);
            }
            trace!("{constraint} could not be satisfied");
            return Ok(None);
        };

        self.mark_inputs(constraint);

        let overridden = self.variables[output].determined_by;
        if let Some(overridden) = overridden {
            deltablue_assert_simple!(overridden != constraint);
            self.set_selected_method(overridden, None);
            self.statistics.num_overrides += 1;
            debug!("{constraint} overrides {overridden} on {output}");
        }
        self.set_determined_by(output, Some(constraint));

        if !self.add_propagate(constraint, output) {
            self.statistics.num_cycles_detected += 1;
            return Err(PlannerError::CycleEncountered);
        }

        self.variables[output].mark = self.current_mark;
        Ok(overridden)
    }

    /// Selects the method whose output is the weakest unmarked variable that is weaker than the
    /// constraint itself.
    ///
    /// Methods are scanned from last to first and only a strictly weaker output replaces the
    /// current candidate, so on ties the method that comes last wins.
    fn choose_method(&mut self, constraint: ConstraintId) {
        let data = &self.constraints[constraint];

        let mut chosen = None;
        let mut best_strength = data.strength;
        for (index, method) in data.methods.iter().enumerate().rev() {
            let output = &self.variables[data.variables[method.output]];
            if output.mark != self.current_mark && output.walk_strength.is_weaker_than(best_strength)
            {
                chosen = Some(index);
                best_strength = output.walk_strength;
            }
        }

        self.set_selected_method(constraint, chosen);
    }

    fn mark_inputs(&mut self, constraint: ConstraintId) {
        let Planner {
            variables,
            constraints,
            current_mark,
            ..
        } = self;

        for input in constraints[constraint].inputs() {
            variables[input].mark = *current_mark;
        }
    }

    /// Recalculates everything downstream of `constraint`, which has just started to determine
    /// `output`. Returns false if a marked variable is reached, i.e. the graph contains a cycle.
    fn add_propagate(&mut self, constraint: ConstraintId, output: VariableId) -> bool {
        let mut todo = VecDeque::new();
        let mut next = Some((constraint, output));

        while let Some((current, current_output)) = next {
            if self.variables[current_output].mark == self.current_mark {
                trace!("Reached {current_output} twice while propagating {constraint}");
                self.set_selected_method(constraint, None);
                return false;
            }

            self.recalculate(current);
            self.statistics.num_propagation_steps += 1;
            next = self.next_downstream_constraint(&mut todo, current_output);
        }

        true
    }
}

/// Incremental removal.
impl Planner {
    fn incremental_remove(&mut self, constraint: ConstraintId) -> Result<(), PlannerError> {
        let output = self.constraints[constraint].output();
        self.set_selected_method(constraint, None);
        self.detach(constraint);

        let Some(output) = output else {
            return Ok(());
        };
        let unsatisfied = self.remove_propagate_from(output);

        let mut by_strength: EnumMap<Strength, Vec<ConstraintId>> = EnumMap::default();
        for candidate in unsatisfied {
            let bucket = &mut by_strength[self.constraints[candidate].strength];
            if !bucket.contains(&candidate) {
                bucket.push(candidate);
            }
        }

        let mut first_error = None;
        for (strength, candidates) in by_strength {
            for candidate in candidates {
                // Satisfied as part of an earlier addition.
                if self.constraints[candidate].is_satisfied() {
                    continue;
                }

                if let Err(error) = self.incremental_add(candidate) {
                    warn!(
                        "Failed to satisfy {candidate} ({strength}) again after destroying {constraint}: {error}"
                    );
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Forgets how `variable` was determined and recalculates everything downstream of it.
    /// Returns the unsatisfied constraints encountered along the way.
    fn remove_propagate_from(&mut self, variable: VariableId) -> Vec<ConstraintId> {
        self.variables[variable].reset();

        let mut unsatisfied = Vec::new();
        let mut todo = VecDeque::new();
        let mut current = variable;
        loop {
            unsatisfied.extend(
                self.variables[current]
                    .constraints
                    .iter()
                    .copied()
                    .filter(|&constraint| !self.constraints[constraint].is_satisfied()),
            );

            let Some((next, output)) = self.next_downstream_constraint(&mut todo, current) else {
                break;
            };
            self.recalculate(next);
            current = output;
        }

        unsatisfied
    }
}

/// Shared primitives of the incremental algorithms.
impl Planner {
    fn new_mark(&mut self) {
        self.current_mark += 1;
    }

    fn attach(&mut self, constraint: ConstraintId) {
        let Planner {
            variables,
            constraints,
            ..
        } = self;

        for &variable in &constraints[constraint].variables {
            variables[variable].constraints.push(constraint);
        }
    }

    fn detach(&mut self, constraint: ConstraintId) {
        let Planner {
            variables,
            constraints,
            ..
        } = self;

        for &variable in &constraints[constraint].variables {
            if let Some(data) = variables.get_mut(variable) {
                data.constraints.retain(|&other| other != constraint);
            }
        }
    }

    /// Returns the next satisfied constraint which consumes `variable`, together with its output.
    ///
    /// Other such constraints are queued on `todo`; if there is none, the next satisfied
    /// constraint is taken from `todo` instead. Repeated calls walk the graph breadth-first.
    fn next_downstream_constraint(
        &self,
        todo: &mut VecDeque<ConstraintId>,
        variable: VariableId,
    ) -> Option<(ConstraintId, VariableId)> {
        let data = &self.variables[variable];

        let mut first = None;
        for &constraint in &data.constraints {
            if Some(constraint) == data.determined_by
                || !self.constraints[constraint].is_satisfied()
            {
                continue;
            }

            if first.is_none() {
                first = Some(constraint);
            } else {
                todo.push_back(constraint);
            }
        }

        let next = match first {
            Some(constraint) => Some(constraint),
            None => {
                let mut next = None;
                while let Some(candidate) = todo.pop_front() {
                    if self
                        .constraints
                        .get(candidate)
                        .is_some_and(Constraint::is_satisfied)
                    {
                        next = Some(candidate);
                        break;
                    }
                }
                next
            }
        };

        next.and_then(|constraint| {
            self.constraints[constraint]
                .output()
                .map(|output| (constraint, output))
        })
    }

    /// Updates the walk strength and stay flag of the output of `constraint`, and computes its
    /// value immediately if it is stay.
    fn recalculate(&mut self, constraint: ConstraintId) {
        let Some(output) = self.constraints[constraint].output() else {
            return;
        };

        let walk_strength = self.output_walk_strength(constraint);
        let stay = self.constant_output(constraint);
        trace!("Recalculating {constraint}: {output} has walk strength {walk_strength}");

        self.set_walk_strength(output, walk_strength);
        self.set_stay(output, stay);
        if stay {
            self.execute(constraint);
        }
    }

    /// The weakest of the strength of `constraint` and the walk strengths of the outputs of its
    /// other methods.
    fn output_walk_strength(&self, constraint: ConstraintId) -> Strength {
        let data = &self.constraints[constraint];
        let output_index = data.output_index();

        data.methods
            .iter()
            .filter(|method| Some(method.output) != output_index)
            .map(|method| self.variables[data.variables[method.output]].walk_strength)
            .fold(data.strength, Strength::weakest_of)
    }

    /// Whether the output of `constraint` only changes through an edit.
    fn constant_output(&self, constraint: ConstraintId) -> bool {
        let data = &self.constraints[constraint];

        !data.is_input
            && data.is_satisfied()
            && data.inputs().all(|input| self.variables[input].stay)
    }

    fn execute(&mut self, constraint: ConstraintId) {
        let data = &self.constraints[constraint];
        let Some(method) = data.selected() else {
            return;
        };

        let output = data.variables[method.output];
        let value = method
            .formula
            .evaluate(|index| self.variables[data.variables[index]].value);

        if let Some(value) = value {
            self.assign_value(output, value);
        }
    }
}

/// Mutations which are undone when an incremental addition fails.
impl Planner {
    fn undo_to(&mut self, checkpoint: usize) {
        let Planner {
            variables,
            constraints,
            trail,
            ..
        } = self;

        for entry in trail.synchronise(checkpoint) {
            match entry {
                Undo::WalkStrength(variable, strength) => {
                    variables[variable].walk_strength = strength
                }
                Undo::Stay(variable, stay) => variables[variable].stay = stay,
                Undo::DeterminedBy(variable, determined_by) => {
                    variables[variable].determined_by = determined_by
                }
                Undo::Value(variable, value) => variables[variable].value = value,
                Undo::SelectedMethod(constraint, method) => {
                    constraints[constraint].selected_method = method
                }
            }
        }
    }

    fn set_walk_strength(&mut self, variable: VariableId, strength: Strength) {
        let previous = std::mem::replace(&mut self.variables[variable].walk_strength, strength);
        self.trail.push(Undo::WalkStrength(variable, previous));
    }

    fn set_stay(&mut self, variable: VariableId, stay: bool) {
        let previous = std::mem::replace(&mut self.variables[variable].stay, stay);
        self.trail.push(Undo::Stay(variable, previous));
    }

    fn set_determined_by(&mut self, variable: VariableId, constraint: Option<ConstraintId>) {
        let previous = std::mem::replace(&mut self.variables[variable].determined_by, constraint);
        self.trail.push(Undo::DeterminedBy(variable, previous));
    }

    fn assign_value(&mut self, variable: VariableId, value: i64) {
        let previous = std::mem::replace(&mut self.variables[variable].value, value);
        self.trail.push(Undo::Value(variable, previous));
    }

    fn set_selected_method(&mut self, constraint: ConstraintId, method: Option<usize>) {
        let previous = std::mem::replace(&mut self.constraints[constraint].selected_method, method);
        self.trail.push(Undo::SelectedMethod(constraint, previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints;

    #[test]
    fn the_last_method_wins_ties_between_equally_weak_outputs() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 0);
        let b = planner.new_variable("b", 0);
        let sum = planner.new_variable("sum", 0);

        let equals = planner
            .add_constraint(constraints::equals(a, b, Strength::Required))
            .expect("no conflict");
        assert_eq!(Some(b), planner.output_of(equals));

        let c = planner.new_variable("c", 0);
        let d = planner.new_variable("d", 0);
        let add = planner
            .add_constraint(constraints::add(c, d, sum, Strength::Required))
            .expect("no conflict");
        // The methods compute `sum`, `d` and `c`, in that order.
        assert_eq!(Some(c), planner.output_of(add));
    }

    #[test]
    fn the_weakest_output_is_chosen() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 1);
        let b = planner.new_variable("b", 2);

        let stay_a = planner
            .add_constraint(constraints::stay(a, Strength::Normal))
            .expect("no conflict");
        let stay_b = planner
            .add_constraint(constraints::stay(b, Strength::StrongDefault))
            .expect("no conflict");
        let equals = planner
            .add_constraint(constraints::equals(a, b, Strength::Required))
            .expect("no conflict");

        assert_eq!(Some(a), planner.output_of(equals));
        assert!(!planner.is_satisfied(stay_a));
        assert!(planner.is_satisfied(stay_b));
        assert_eq!(2, planner.value(a));
        assert_eq!(Strength::StrongDefault, planner.walk_strength(a));
    }

    #[test]
    fn a_constraint_which_is_too_weak_stays_unsatisfied() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 0);

        let _ = planner
            .add_constraint(constraints::stay(a, Strength::Preferred))
            .expect("no conflict");
        let weak = planner
            .add_constraint(constraints::stay(a, Strength::Normal))
            .expect("weak constraints are allowed to stay unsatisfied");

        assert!(!planner.is_satisfied(weak));
        assert!(planner.is_consistent());
    }

    #[test]
    fn unsatisfiable_required_constraint_is_rejected() {
        let mut planner = Planner::default();
        let constant = planner.new_constant("k", 3);

        let result = planner.add_constraint(constraints::stay(constant, Strength::Required));

        assert_eq!(Err(PlannerError::UnsatisfiableRequiredConstraint), result);
        assert_eq!(0, planner.num_constraints());
        assert!(planner.variable_constraints(constant).is_empty());
        assert_eq!(1, planner.statistics().num_failed_additions);
    }

    #[test]
    fn cycle_is_rejected_and_rolled_back() {
        let mut planner = Planner::default();
        let x = planner.new_variable("x", 1);
        let y = planner.new_variable("y", 0);
        let z = planner.new_variable("z", 0);

        let x_to_y = planner
            .add_constraint(constraints::equals(x, y, Strength::Required))
            .expect("no conflict");
        let y_to_z = planner
            .add_constraint(constraints::equals(y, z, Strength::Required))
            .expect("no conflict");
        assert_eq!(1, planner.value(z));

        planner.set_value(y, 42);
        let walk_strengths = [x, y, z].map(|variable| planner.walk_strength(variable));

        let result = planner.add_constraint(constraints::equals(z, x, Strength::Required));

        assert_eq!(Err(PlannerError::CycleEncountered), result);
        assert_eq!(2, planner.num_constraints());
        assert_eq!(Some(y), planner.output_of(x_to_y));
        assert_eq!(Some(z), planner.output_of(y_to_z));
        assert_eq!(None, planner.determined_by(x));
        assert_eq!(42, planner.value(y));
        assert_eq!(
            walk_strengths,
            [x, y, z].map(|variable| planner.walk_strength(variable))
        );
        assert_eq!(1, planner.statistics().num_cycles_detected);
        assert!(planner.is_consistent());
    }

    #[test]
    fn a_constraint_over_the_same_variable_twice_is_a_cycle() {
        let mut planner = Planner::default();
        let x = planner.new_variable("x", 0);

        let result = planner.add_constraint(constraints::equals(x, x, Strength::Required));

        assert_eq!(Err(PlannerError::CycleEncountered), result);
        assert!(planner.variable_constraints(x).is_empty());
    }

    #[test]
    fn overridden_constraints_are_satisfied_again_after_destroying() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 0);

        let stay = planner
            .add_constraint(constraints::stay(a, Strength::Normal))
            .expect("no conflict");
        let edit = planner
            .add_constraint(constraints::edit(a, Strength::Preferred))
            .expect("no conflict");
        assert!(!planner.is_satisfied(stay));
        assert_eq!(Some(edit), planner.determined_by(a));

        planner.destroy_constraint(edit).expect("no conflict");

        assert!(planner.is_satisfied(stay));
        assert_eq!(Some(stay), planner.determined_by(a));
        assert_eq!(Strength::Normal, planner.walk_strength(a));
        assert!(!planner.contains_constraint(edit));
    }

    #[test]
    fn stronger_constraints_are_satisfied_first_after_destroying() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 0);

        let weak = planner
            .add_constraint(constraints::stay(a, Strength::WeakDefault))
            .expect("no conflict");
        let normal = planner
            .add_constraint(constraints::stay(a, Strength::Normal))
            .expect("no conflict");
        let edit = planner
            .add_constraint(constraints::edit(a, Strength::Preferred))
            .expect("no conflict");
        let overrides = planner.statistics().num_overrides;

        planner.destroy_constraint(edit).expect("no conflict");

        assert_eq!(Some(normal), planner.determined_by(a));
        assert!(!planner.is_satisfied(weak));
        assert_eq!(overrides, planner.statistics().num_overrides);
    }

    #[test]
    fn destroying_a_variable_destroys_its_constraints() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 0);
        let b = planner.new_variable("b", 0);

        let equals = planner
            .add_constraint(constraints::equals(a, b, Strength::Required))
            .expect("no conflict");
        let stay = planner
            .add_constraint(constraints::stay(b, Strength::Normal))
            .expect("no conflict");

        planner.destroy_variable(a).expect("no conflict");

        assert!(!planner.contains_variable(a));
        assert!(!planner.contains_constraint(equals));
        assert!(planner.contains_constraint(stay));
        assert_eq!(&[stay], planner.variable_constraints(b));
        assert!(planner.is_consistent());
    }

    #[test]
    fn unknown_identifiers_are_reported() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 0);
        let stay = planner
            .add_constraint(constraints::stay(a, Strength::Normal))
            .expect("no conflict");

        planner.destroy_constraint(stay).expect("no conflict");
        assert_eq!(
            Err(PlannerError::UnknownConstraint(stay)),
            planner.destroy_constraint(stay)
        );

        planner.destroy_variable(a).expect("no conflict");
        assert_eq!(
            Err(PlannerError::UnknownVariable(a)),
            planner
                .add_constraint(constraints::stay(a, Strength::Normal))
                .map(|_| ())
        );
    }

    #[test]
    fn plans_skip_destroyed_constraints() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 0);
        let b = planner.new_variable("b", 0);

        let equals = planner
            .add_constraint(constraints::equals(a, b, Strength::Required))
            .expect("no conflict");
        let edit = planner
            .add_constraint(constraints::edit(a, Strength::Preferred))
            .expect("no conflict");
        let plan = planner.extract_plan_from_constraint(edit);
        assert_eq!(vec![edit, equals], plan.iter().collect::<Vec<_>>());

        planner.destroy_constraint(equals).expect("no conflict");
        planner.set_value(a, 8);
        planner.execute_plan(&plan);

        assert_eq!(8, planner.value(a));
        assert_eq!(0, planner.value(b));
    }

    #[test]
    fn extraction_ignores_constraints_which_are_not_edits() {
        let mut planner = Planner::default();
        let a = planner.new_variable("a", 0);

        let stay = planner
            .add_constraint(constraints::stay(a, Strength::Normal))
            .expect("no conflict");

        assert!(planner.extract_plan_from_constraint(stay).is_empty());
        assert!(planner.extract_plan().is_empty());
    }
}
