use super::{Candidate, GeneratorConfig, LevelModel};
use crate::error::GeneratorError;
use crate::types::{PlacedSlot, TimeGrid};
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use log::{debug, info};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Slots and objective extracted from a successful level solve
#[derive(Debug, Default)]
pub struct LevelSolution {
    pub slots: Vec<PlacedSlot>,
    /// Total soft-constraint penalty of the selected placements
    pub objective: f64,
}

/// Terminal state of one level solve. `Optimal` and `Feasible` carry a
/// usable assignment; the other two fail the level.
#[derive(Debug)]
pub enum SolveOutcome {
    Optimal(LevelSolution),
    Feasible(LevelSolution),
    Infeasible,
    TimeoutNoSolution,
}

/// Solve one level model with a bounded time budget.
///
/// Minimises the lecturer-preference penalty subject to: every session
/// block placed exactly once (H1) and no room, lecturer or group serving
/// two placements in the same hour (H2-H4). Thread count and seed are
/// pinned so identical inputs reproduce the same objective.
pub fn solve_level(
    model: &LevelModel,
    grid: &TimeGrid,
    config: &GeneratorConfig,
) -> Result<SolveOutcome, GeneratorError> {
    if !model.unplaceable.is_empty() {
        info!(
            "Level {}: {} session blocks have no admissible placement",
            model.level,
            model.unplaceable.len()
        );
        return Ok(SolveOutcome::Infeasible);
    }
    if model.session_keys.is_empty() {
        return Ok(SolveOutcome::Optimal(LevelSolution::default()));
    }

    let mut vars = variables!();
    let xs: Vec<Variable> = model
        .candidates
        .iter()
        .map(|_| vars.add(variable().binary()))
        .collect();

    // Objective: weighted sum of preference penalties
    let mut objective = Expression::default();
    for (candidate, &var) in model.candidates.iter().zip(&xs) {
        if candidate.penalty > 0 {
            objective += candidate.penalty as f64 * var;
        }
    }

    let mut problem = vars
        .minimise(objective)
        .using(good_lp::solvers::highs::highs)
        .set_option("threads", config.solver_threads as i32)
        .set_option("random_seed", config.solver_seed as i32)
        .set_option("time_limit", config.level_budget_secs as f64);

    // H1: each session block placed exactly once.
    // BTreeMaps keep constraint emission order deterministic.
    let mut by_session: BTreeMap<_, Vec<usize>> = BTreeMap::new();
    for (i, candidate) in model.candidates.iter().enumerate() {
        by_session
            .entry(candidate.session_key())
            .or_default()
            .push(i);
    }
    for indices in by_session.values() {
        let placed: Expression = indices.iter().map(|&i| Expression::from(xs[i])).sum();
        problem = problem.with(constraint!(placed == 1));
    }

    // H2-H4: at most one occupant per (day, hour, resource)
    let mut room_usage: BTreeMap<_, Vec<usize>> = BTreeMap::new();
    let mut lecturer_usage: BTreeMap<_, Vec<usize>> = BTreeMap::new();
    let mut group_usage: BTreeMap<_, Vec<usize>> = BTreeMap::new();
    for (i, candidate) in model.candidates.iter().enumerate() {
        for hour in candidate.covered_hours() {
            room_usage
                .entry((candidate.day, hour, candidate.room_id))
                .or_default()
                .push(i);
            lecturer_usage
                .entry((candidate.day, hour, candidate.lecturer_id))
                .or_default()
                .push(i);
            group_usage
                .entry((candidate.day, hour, candidate.group_id))
                .or_default()
                .push(i);
        }
    }

    let mut exclusion_count = 0usize;
    for indices in room_usage
        .values()
        .chain(lecturer_usage.values())
        .chain(group_usage.values())
    {
        if indices.len() > 1 {
            let occupied: Expression = indices.iter().map(|&i| Expression::from(xs[i])).sum();
            problem = problem.with(constraint!(occupied <= 1));
            exclusion_count += 1;
        }
    }

    debug!(
        "Level {}: {} uniqueness and {} exclusion constraints",
        model.level,
        model.session_keys.len(),
        exclusion_count
    );

    let budget = Duration::from_secs(config.level_budget_secs);
    let started = Instant::now();

    match problem.solve() {
        Ok(solution) => {
            let mut chosen: Vec<&Candidate> = model
                .candidates
                .iter()
                .zip(&xs)
                .filter(|(_, &var)| solution.value(var) > 0.5)
                .map(|(candidate, _)| candidate)
                .collect();
            chosen.sort_by_key(|c| (c.course_id, c.group_id, c.session.ordinal));

            let objective = chosen.iter().map(|c| c.penalty as f64).sum();
            let slots = expand_to_slots(&chosen, grid);
            let elapsed = started.elapsed();
            info!(
                "Level {}: solved in {:.2?}, objective {}, {} hour slots",
                model.level,
                elapsed,
                objective,
                slots.len()
            );

            let level_solution = LevelSolution { slots, objective };
            if elapsed < budget {
                Ok(SolveOutcome::Optimal(level_solution))
            } else {
                // Budget exhausted with an incumbent: usable but unproven
                Ok(SolveOutcome::Feasible(level_solution))
            }
        }
        Err(ResolutionError::Infeasible) => Ok(SolveOutcome::Infeasible),
        Err(other) => {
            if started.elapsed() >= budget {
                Ok(SolveOutcome::TimeoutNoSolution)
            } else {
                Err(GeneratorError::SolverFailed(format!("{other:?}")))
            }
        }
    }
}

/// Expand selected block placements into one-hour slot records.
/// A block of duration `d` becomes `d` adjacent records sharing
/// everything but their start/end times.
fn expand_to_slots(chosen: &[&Candidate], grid: &TimeGrid) -> Vec<PlacedSlot> {
    let mut slots = Vec::new();
    for candidate in chosen {
        for hour in candidate.covered_hours() {
            slots.push(PlacedSlot {
                course_id: candidate.course_id,
                lecturer_id: candidate.lecturer_id,
                room_id: candidate.room_id,
                group_id: candidate.group_id,
                day_of_week: candidate.day,
                start_time: grid.slot_start(hour),
                end_time: grid.slot_end(hour),
                session_type: candidate.session.session_type,
            });
        }
    }
    slots
}
