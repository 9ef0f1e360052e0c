use std::collections::BTreeMap;
use std::path::Path;

use indicatif::ProgressBar;
use tracing::{debug, info, info_span, warn};

use crate::config::pipeline::{FlagTallyParams, PipelineConfig, RemapConfig, StepConfig};
use crate::data_model::{ExclusionReason, Record};
use crate::error::{PipelineError, Result};
use crate::executor::{PipelineExecutor, ProcessingStep};
use crate::pipeline::categories::{
    category_table, exclusion_set, CategoryClassifier, UnmappedPolicy,
};
use crate::pipeline::filters::{
    mapping_steps, CategoryExclusionFilter, CategoryRename, DateCutoffFilter,
    KeywordPresenceFilter, TopicFilter, UrlExclusionFilter,
};
use crate::pipeline::ids::IdGenerator;
use crate::pipeline::readers::{BaseReader, CsvReader};
use crate::pipeline::remap::GroupRemapper;
use crate::pipeline::writers::{merge_headers, BaseWriter, CsvWriter};
use crate::utils::progress::{create_progress_bar, RECORDS_TEMPLATE};

/// Flag tally result: how many survivors carried the configured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagCount {
    pub label: String,
    pub count: usize,
}

/// Counters for one run. Built fresh per run and only ever printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub original: usize,
    pub exclusions: BTreeMap<ExclusionReason, usize>,
    pub final_count: usize,
    pub category_tally: BTreeMap<String, usize>,
    pub flag: Option<FlagCount>,
    pub ids_generated: Option<usize>,
    pub updated: Option<usize>,
}

impl RunStatistics {
    pub fn excluded_total(&self) -> usize {
        self.exclusions.values().sum()
    }

    pub fn excluded(&self, reason: ExclusionReason) -> usize {
        self.exclusions.get(&reason).copied().unwrap_or(0)
    }

    /// Every record read is either written or counted under one reason.
    pub fn is_consistent(&self) -> bool {
        self.original == self.final_count + self.excluded_total()
    }

    fn record_exclusion(&mut self, reason: ExclusionReason) {
        *self.exclusions.entry(reason).or_insert(0) += 1;
    }

    fn record_survivor(&mut self, category: &str) {
        self.final_count += 1;
        *self.category_tally.entry(category.to_string()).or_insert(0) += 1;
    }

    /// Human-readable report, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Original records: {}", self.original)];
        for (reason, count) in &self.exclusions {
            lines.push(format!("Excluded {} records ({})", count, reason.label()));
        }
        lines.push(format!("Final records: {}", self.final_count));
        if let Some(flag) = &self.flag {
            lines.push(format!("{}: {}", flag.label, flag.count));
        }
        if let Some(generated) = self.ids_generated {
            lines.push(format!("Generated ids: {}", generated));
        }
        if let Some(updated) = self.updated {
            lines.push(format!("Updated {} group values", updated));
        }
        if !self.category_tally.is_empty() {
            lines.push(String::new());
            lines.push("Category distribution:".to_string());
            for (category, count) in &self.category_tally {
                lines.push(format!("  {}: {}", category, count));
            }
        }
        lines
    }
}

/// Builds the configured steps. The executor sorts them by stage for
/// evaluation; configuration order only decides where added columns go.
pub fn build_pipeline_from_config(config: &PipelineConfig) -> Result<Vec<Box<dyn ProcessingStep>>> {
    let mut steps: Vec<Box<dyn ProcessingStep>> = Vec::new();
    info!(pipeline = %config.name, "Building pipeline from configuration...");

    for (i, step_config) in config.steps.iter().enumerate() {
        let step_span = info_span!("pipeline_step", index = i, type = step_config.name());
        let _enter = step_span.enter();

        match step_config {
            StepConfig::CategoryRename(params) => {
                debug!(params = ?params, "Adding CategoryRename");
                steps.push(Box::new(CategoryRename::new(
                    params.field.as_str(),
                    params.from.as_str(),
                    params.to.as_str(),
                )));
            }
            StepConfig::DateCutoff(params) => {
                debug!(params = ?params, "Adding DateCutoffFilter");
                steps.push(Box::new(DateCutoffFilter::new(
                    params.field.as_str(),
                    params.formats.clone(),
                    params.cutoff,
                    params.policy,
                )));
            }
            StepConfig::CategoryExclusion(params) => {
                debug!(params = ?params, "Adding CategoryExclusionFilter");
                let set = exclusion_set(&params.exclusion_set).ok_or_else(|| {
                    PipelineError::ConfigValidationError(format!(
                        "unknown exclusion_set '{}'",
                        params.exclusion_set
                    ))
                })?;
                steps.push(Box::new(CategoryExclusionFilter::new(params.field.as_str(), set)));
            }
            StepConfig::UrlExclusion(params) => {
                debug!(params = ?params, "Adding UrlExclusionFilter");
                steps.push(Box::new(UrlExclusionFilter::new(
                    params.field.as_str(),
                    params.pattern.as_str(),
                    params.match_mode,
                )));
            }
            StepConfig::TopicMatch(params) => {
                debug!(params = ?params, "Adding TopicFilter");
                steps.push(Box::new(TopicFilter::new(params.field.as_str(), &params.needle)));
            }
            StepConfig::CategoryMapping(params) => {
                debug!(params = ?params, "Adding category mapping");
                let classifier = classifier_for(&params.table, params.policy)?;
                steps.extend(mapping_steps(&params.field, &params.group_field, classifier));
            }
            StepConfig::KeywordPresence(params) => {
                debug!(params = ?params, "Adding KeywordPresenceFilter");
                steps.push(Box::new(KeywordPresenceFilter::new(
                    params.field.as_str(),
                    params.output_field.clone(),
                )));
            }
        }
    }

    info!("Pipeline built with {} steps.", steps.len());
    Ok(steps)
}

fn classifier_for(table: &str, policy: UnmappedPolicy) -> Result<CategoryClassifier> {
    let table = category_table(table).ok_or_else(|| {
        PipelineError::ConfigValidationError(format!("unknown category table '{}'", table))
    })?;
    Ok(CategoryClassifier::new(table, policy))
}

fn progress_bar(show: bool, message: &str) -> ProgressBar {
    if show {
        create_progress_bar(0, message, RECORDS_TEMPLATE)
    } else {
        ProgressBar::hidden()
    }
}

/// Streams a source through the filter chain into a sink.
pub struct PipelineRunner {
    name: String,
    category_field: String,
    executor: PipelineExecutor,
    id_generator: Option<IdGenerator>,
    flag_tally: Option<FlagTallyParams>,
    fail_when_empty: bool,
    show_progress: bool,
}

impl PipelineRunner {
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let steps = build_pipeline_from_config(config)?;
        Ok(PipelineRunner {
            name: config.name.clone(),
            category_field: config.category_field.clone(),
            executor: PipelineExecutor::new(steps),
            id_generator: config
                .id_generation
                .as_ref()
                .map(|params| IdGenerator::new(params.field.as_str())),
            flag_tally: config.flag_tally.clone(),
            fail_when_empty: config.fail_when_empty,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input columns, then the id column, then the columns the chain adds in
    /// the order its steps are configured.
    pub fn output_headers(&self, input: &[String]) -> Vec<String> {
        let mut added: Vec<String> = self
            .id_generator
            .iter()
            .map(|generator| generator.field().to_string())
            .collect();
        added.extend_from_slice(self.executor.added_columns());
        merge_headers(input, &added)
    }

    pub fn run<R: BaseReader, W: BaseWriter>(&self, reader: R, mut writer: W) -> Result<RunStatistics> {
        let mut stats = RunStatistics {
            flag: self.flag_tally.as_ref().map(|params| FlagCount {
                label: params.label.clone(),
                count: 0,
            }),
            ids_generated: self.id_generator.as_ref().map(|_| 0),
            ..RunStatistics::default()
        };
        let pb = progress_bar(self.show_progress, &self.name);

        for record_result in reader.read_records()? {
            let record = record_result?;
            stats.original += 1;
            pb.inc(1);

            let mut survivor = match self.executor.run_single(record) {
                Ok(survivor) => survivor,
                Err(PipelineError::RecordFiltered { reason, detail, .. }) => {
                    debug!(reason = %reason, detail = %detail, "Record excluded");
                    stats.record_exclusion(reason);
                    continue;
                }
                Err(e) => {
                    pb.abandon_with_message(format!("{} failed", self.name));
                    return Err(e);
                }
            };

            if let Some(generator) = &self.id_generator {
                if generator.assign(&mut survivor, stats.final_count) {
                    if let Some(generated) = stats.ids_generated.as_mut() {
                        *generated += 1;
                    }
                }
            }
            if let (Some(params), Some(flag)) = (&self.flag_tally, stats.flag.as_mut()) {
                if flag_matches(&survivor, params) {
                    flag.count += 1;
                }
            }
            stats.record_survivor(survivor.get_trimmed(&self.category_field));
            writer.write_record(&survivor)?;
        }

        writer.close()?;
        pb.finish_and_clear();

        if !stats.is_consistent() {
            return Err(PipelineError::Unexpected(format!(
                "record counts do not add up: {} read, {} written, {} excluded",
                stats.original,
                stats.final_count,
                stats.excluded_total()
            )));
        }
        info!(
            pipeline = %self.name,
            original = stats.original,
            excluded = stats.excluded_total(),
            written = stats.final_count,
            "Run complete"
        );
        Ok(stats)
    }

    /// Reads `input`, writes `output` and returns the run counters.
    ///
    /// The output file is created before any record is processed, so a run
    /// that fails midway can leave a partial file behind.
    pub fn run_files(&self, input: &Path, output: &Path) -> Result<RunStatistics> {
        let reader = CsvReader::from_path(input)?;
        let headers = self.output_headers(reader.headers());
        let writer = CsvWriter::from_path(output, headers)?;
        let stats = self.run(reader, writer)?;
        if self.fail_when_empty && stats.final_count == 0 {
            warn!(pipeline = %self.name, "No records survived filtering");
            return Err(PipelineError::EmptyOutput(output.display().to_string()));
        }
        Ok(stats)
    }
}

fn flag_matches(record: &Record, params: &FlagTallyParams) -> bool {
    record.get_trimmed(&params.field).to_lowercase() == params.value.to_lowercase()
}

/// Rewrites the group column of processed output. Every record is written.
pub struct RemapRunner {
    name: String,
    category_field: String,
    remapper: GroupRemapper,
    show_progress: bool,
}

impl RemapRunner {
    pub fn from_config(config: &RemapConfig) -> Result<Self> {
        let classifier = classifier_for(&config.table, UnmappedPolicy::LenientOtherThenFilter)?;
        Ok(RemapRunner {
            name: config.name.clone(),
            category_field: config.category_field.clone(),
            remapper: GroupRemapper::new(
                config.category_field.as_str(),
                config.group_field.as_str(),
                classifier,
            ),
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn output_headers(&self, input: &[String]) -> Vec<String> {
        merge_headers(input, &[self.remapper.group_field().to_string()])
    }

    pub fn run<R: BaseReader, W: BaseWriter>(&self, reader: R, mut writer: W) -> Result<RunStatistics> {
        let mut stats = RunStatistics {
            updated: Some(0),
            ..RunStatistics::default()
        };
        let mut updated = 0;
        let pb = progress_bar(self.show_progress, &self.name);

        for record_result in reader.read_records()? {
            let mut record = record_result?;
            stats.original += 1;
            pb.inc(1);
            if self.remapper.remap(&mut record) {
                updated += 1;
            }
            stats.record_survivor(record.get_trimmed(&self.category_field));
            writer.write_record(&record)?;
        }

        writer.close()?;
        pb.finish_and_clear();
        stats.updated = Some(updated);
        info!(pipeline = %self.name, records = stats.original, updated, "Group update complete");
        Ok(stats)
    }

    pub fn run_files(&self, input: &Path, output: &Path) -> Result<RunStatistics> {
        let reader = CsvReader::from_path(input)?;
        let headers = self.output_headers(reader.headers());
        let writer = CsvWriter::from_path(output, headers)?;
        self.run(reader, writer)
    }
}
