mod compatibility;
mod decomposer;
mod model;
mod solver;

pub use compatibility::*;
pub use decomposer::*;
pub use model::*;
pub use solver::*;

use crate::catalogue::CatalogueSnapshot;
use crate::error::{GeneratorError, Result};
use crate::progress::{ProgressEvent, ProgressSink, ProgressStatus, GLOBAL_LEVEL};
use crate::store::PersistenceSink;
use crate::types::{GenerationMetadata, PlacedSlot, TimeGrid, Timetable, TimetableId};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Tunables for a generation run, loadable from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GeneratorConfig {
    /// Solver time budget per academic level, in seconds
    pub level_budget_secs: u64,
    pub start_hour: u8,
    pub slots_per_day: u8,
    /// Academic levels in solve order; earlier levels freeze their slots
    /// as obstacles for later ones
    pub level_order: Vec<u8>,
    pub solver_threads: u32,
    pub solver_seed: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            level_budget_secs: 300,
            start_hour: 7,
            slots_per_day: 12,
            level_order: vec![5, 4, 3, 2],
            solver_threads: 1,
            solver_seed: 1234,
        }
    }
}

impl GeneratorConfig {
    /// Reject grids the clock cannot represent: `TimeGrid` hands out
    /// `NaiveTime` values up to the end of the last slot, so the teaching
    /// day must hold at least one slot and end by 23:00.
    pub fn validate(&self) -> std::result::Result<(), GeneratorError> {
        if self.slots_per_day == 0 {
            return Err(GeneratorError::InvalidConfig(
                "slots_per_day must be at least 1".to_string(),
            ));
        }
        if self.start_hour as u32 + self.slots_per_day as u32 > 23 {
            return Err(GeneratorError::InvalidConfig(format!(
                "teaching day runs {}:00 to {}:00; it must end by 23:00",
                self.start_hour,
                self.start_hour as u32 + self.slots_per_day as u32
            )));
        }
        Ok(())
    }

    pub fn grid(&self) -> TimeGrid {
        TimeGrid {
            start_hour: self.start_hour,
            slots_per_day: self.slots_per_day,
        }
    }
}

/// Cooperative cancellation flag, checked at each progress milestone
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serialises generation per timetable: a second run on the same id is
/// rejected while the first is in flight. Independent timetables may
/// generate concurrently.
#[derive(Debug, Default)]
pub struct RunRegistry {
    active: Mutex<BTreeSet<TimetableId>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, id: TimetableId) -> std::result::Result<RunGuard<'_>, GeneratorError> {
        let mut active = self.active.lock().unwrap();
        if !active.insert(id) {
            return Err(GeneratorError::GenerationInProgress(id));
        }
        Ok(RunGuard { registry: self, id })
    }
}

/// Releases the timetable's registry entry when dropped
pub struct RunGuard<'a> {
    registry: &'a RunRegistry,
    id: TimetableId,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.registry.active.lock().unwrap().remove(&self.id);
    }
}

/// Result of a completed generation run
#[derive(Debug)]
pub struct GenerationOutcome {
    pub slots: Vec<PlacedSlot>,
    /// Sum of per-level objective values
    pub objective: f64,
    pub levels_processed: Vec<u8>,
    pub solve_time_ms: u64,
}

// Fraction of the run reserved for the per-level windows; the remainder
// covers finalisation and commit
const LEVELS_SPAN: f64 = 95.0;

/// Drives generation level by level: solve, freeze, repeat, commit.
pub struct Orchestrator<'a> {
    catalogue: &'a CatalogueSnapshot,
    config: &'a GeneratorConfig,
    sink: &'a dyn ProgressSink,
    cancel: CancelToken,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        catalogue: &'a CatalogueSnapshot,
        config: &'a GeneratorConfig,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            catalogue,
            config,
            sink,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Generate the timetable's slots and commit them through `store`.
    ///
    /// Levels run in configured order, each receiving the union of all
    /// earlier levels' slots as frozen obstacles. Any level failure aborts
    /// the run with nothing persisted.
    pub fn run(
        &self,
        timetable: &mut Timetable,
        store: &dyn PersistenceSink,
        registry: &RunRegistry,
    ) -> Result<GenerationOutcome> {
        self.config.validate()?;
        let _guard = registry.try_begin(timetable.id)?;
        let grid = self.config.grid();
        let started = Instant::now();

        let levels = &self.config.level_order;
        let window = LEVELS_SPAN / levels.len().max(1) as f64;

        let mut frozen: Vec<PlacedSlot> = Vec::new();
        let mut objective = 0.0;
        let mut pct = 0.0;

        for (idx, &level) in levels.iter().enumerate() {
            let lo = idx as f64 * window;
            let hi = (idx + 1) as f64 * window;

            self.ensure_active(&mut pct)?;
            self.emit(
                &mut pct,
                level,
                ProgressStatus::Starting,
                lo,
                format!("Starting timetable generation for Level {level}..."),
            );

            let courses = self.catalogue.courses_at_level(level);
            let groups = self.catalogue.groups_at_level(level);
            self.emit(
                &mut pct,
                level,
                ProgressStatus::Loading,
                lo + 0.05 * window,
                format!(
                    "Loaded {} courses and {} groups for Level {level}",
                    courses.len(),
                    groups.len()
                ),
            );

            if courses.is_empty() || groups.is_empty() {
                info!("Level {level} has no courses or groups; skipping");
                self.emit(
                    &mut pct,
                    level,
                    ProgressStatus::Completed,
                    hi,
                    format!("Level {level} has nothing to schedule; skipped"),
                );
                continue;
            }

            self.emit(
                &mut pct,
                level,
                ProgressStatus::Building,
                lo + 0.10 * window,
                format!("Preparing constraints for {} courses...", courses.len()),
            );

            let frozen_index = FrozenIndex::from_slots(&frozen, &grid);
            let level_model =
                match build_level_model(self.catalogue, level, &grid, &frozen_index) {
                    Ok(m) => m,
                    Err(e) => return Err(self.fail_level(&mut pct, level, e)),
                };

            self.emit(
                &mut pct,
                level,
                ProgressStatus::Constraints,
                lo + 0.30 * window,
                format!(
                    "{} candidate placements for {} session blocks",
                    level_model.candidates.len(),
                    level_model.session_keys.len()
                ),
            );

            self.ensure_active(&mut pct)?;
            self.emit(
                &mut pct,
                level,
                ProgressStatus::Solving,
                lo + 0.60 * window,
                format!("Solving constraints for Level {level}..."),
            );

            let outcome = match solve_level(&level_model, &grid, self.config) {
                Ok(o) => o,
                Err(e) => return Err(self.fail_level(&mut pct, level, e)),
            };

            match outcome {
                SolveOutcome::Optimal(solution) | SolveOutcome::Feasible(solution) => {
                    self.emit(
                        &mut pct,
                        level,
                        ProgressStatus::Extracting,
                        lo + 0.90 * window,
                        format!(
                            "Solution found, extracting {} hour slots...",
                            solution.slots.len()
                        ),
                    );
                    objective += solution.objective;
                    frozen.extend(solution.slots);
                    self.emit(
                        &mut pct,
                        level,
                        ProgressStatus::Completed,
                        hi,
                        format!("Level {level} timetable completed successfully"),
                    );
                }
                SolveOutcome::Infeasible => {
                    return Err(self.fail_level(
                        &mut pct,
                        level,
                        GeneratorError::LevelInfeasible { level },
                    ));
                }
                SolveOutcome::TimeoutNoSolution => {
                    return Err(self.fail_level(
                        &mut pct,
                        level,
                        GeneratorError::LevelTimeout {
                            level,
                            seconds: self.config.level_budget_secs,
                        },
                    ));
                }
            }
        }

        self.ensure_active(&mut pct)?;
        self.emit(
            &mut pct,
            GLOBAL_LEVEL,
            ProgressStatus::Finalizing,
            LEVELS_SPAN,
            "Combining all levels and saving timetable...".to_string(),
        );

        timetable.generation_metadata = Some(GenerationMetadata {
            generated: true,
            levels_processed: levels.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        });

        if let Err(e) = store.commit(timetable, &frozen) {
            self.emit(
                &mut pct,
                GLOBAL_LEVEL,
                ProgressStatus::Error,
                LEVELS_SPAN,
                format!("Failed to save timetable: {e}"),
            );
            return Err(GeneratorError::Persistence {
                timetable: timetable.id,
                message: e.to_string(),
            }
            .into());
        }

        self.emit(
            &mut pct,
            GLOBAL_LEVEL,
            ProgressStatus::Completed,
            100.0,
            "Timetable generation completed successfully!".to_string(),
        );

        Ok(GenerationOutcome {
            slots: frozen,
            objective,
            levels_processed: levels.clone(),
            solve_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Emit one event, clamping the percentage so the sequence never
    /// decreases over the run
    fn emit(&self, pct: &mut f64, level: u8, status: ProgressStatus, at: f64, message: String) {
        *pct = at.max(*pct);
        self.sink.emit(ProgressEvent {
            level,
            status,
            percentage: *pct,
            message,
        });
    }

    fn ensure_active(&self, pct: &mut f64) -> std::result::Result<(), GeneratorError> {
        if self.cancel.is_cancelled() {
            let at = *pct;
            self.emit(
                pct,
                GLOBAL_LEVEL,
                ProgressStatus::Error,
                at,
                "Generation cancelled".to_string(),
            );
            return Err(GeneratorError::Cancelled);
        }
        Ok(())
    }

    fn fail_level(&self, pct: &mut f64, level: u8, error: GeneratorError) -> anyhow::Error {
        let at = *pct;
        self.emit(
            pct,
            level,
            ProgressStatus::Failed,
            at,
            format!("Failed to generate timetable for Level {level}"),
        );
        self.emit(pct, GLOBAL_LEVEL, ProgressStatus::Error, at, error.to_string());
        error.into()
    }
}
