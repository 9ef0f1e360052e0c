use crate::data_model::Record;
use crate::error::{PipelineError, Result};
use tracing::{debug, warn};

/// Position of a step in the filter chain.
///
/// Steps run sorted by stage, so a record rejected by several predicates is
/// always attributed to the earliest one. Steps sharing a stage keep the order
/// they were registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Normalize,
    Date,
    CategoryExclusion,
    UrlExclusion,
    Topic,
    CategoryMapping,
    KeywordPresence,
}

pub trait ProcessingStep {
    fn name(&self) -> &'static str; // For logging/error reporting

    fn stage(&self) -> Stage;

    /// Returns the (possibly modified) record, or
    /// `PipelineError::RecordFiltered` to drop it.
    fn process(&self, record: Record) -> Result<Record>;

    /// Columns this step may add to a record, in the order it adds them.
    fn added_columns(&self) -> Vec<String> {
        Vec::new()
    }
}

pub struct PipelineExecutor {
    pub(crate) steps: Vec<Box<dyn ProcessingStep>>, // Held in canonical stage order
    added_columns: Vec<String>,                     // In registration order
}

impl PipelineExecutor {
    pub fn new(mut steps: Vec<Box<dyn ProcessingStep>>) -> Self {
        if steps.is_empty() {
            warn!("Pipeline created with no steps.");
        }
        let mut added_columns: Vec<String> = Vec::new();
        for column in steps.iter().flat_map(|s| s.added_columns()) {
            if !added_columns.contains(&column) {
                added_columns.push(column);
            }
        }
        // Stable: same-stage steps (mapping + group filter) stay in sequence.
        steps.sort_by_key(|step| step.stage());
        PipelineExecutor {
            steps,
            added_columns,
        }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Columns added by any step, deduplicated, in the order the steps were
    /// registered. Evaluation order does not affect output column order.
    pub fn added_columns(&self) -> &[String] {
        &self.added_columns
    }

    /// Runs one record through every step. The first rejection
    /// short-circuits; any other error is wrapped with the failing step name.
    pub fn run_single(&self, initial_record: Record) -> Result<Record> {
        let mut current = initial_record;
        for step in &self.steps {
            debug!("Running step: {}", step.name());
            current = match step.process(current) {
                Ok(next) => next,
                Err(e @ PipelineError::RecordFiltered { .. }) => return Err(e),
                Err(e) => {
                    return Err(PipelineError::StepError {
                        step_name: step.name().to_string(),
                        source: Box::new(e),
                    })
                }
            };
        }
        Ok(current)
    }
}
