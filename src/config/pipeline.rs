use crate::error::{PipelineError, Result};
use crate::pipeline::categories::{category_table, exclusion_set, UnmappedPolicy};
use crate::pipeline::dates::DateFormat;
use crate::pipeline::filters::{DatePolicy, UrlMatch};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs; // For reading the file
use std::path::Path;

/// One pipeline variant, as read from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Column tallied in the run summary.
    pub category_field: String,
    pub steps: Vec<StepConfig>,
    #[serde(default)]
    pub id_generation: Option<IdGenerationParams>,
    #[serde(default)]
    pub flag_tally: Option<FlagTallyParams>,
    /// Treat a run with no surviving records as a failure.
    #[serde(default)]
    pub fail_when_empty: bool,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("PipelineConfig", "name", &self.name)?;
        require_non_empty("PipelineConfig", "category_field", &self.category_field)?;
        for step_config in &self.steps {
            step_config.validate()?;
        }
        if let Some(params) = &self.id_generation {
            params.validate()?;
        }
        if let Some(params) = &self.flag_tally {
            params.validate()?;
        }
        Ok(())
    }
}

/// A single step of the filter chain.
/// Uses Serde's internally tagged enum representation.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type")] // The 'type' field in YAML determines which variant
pub enum StepConfig {
    CategoryRename(CategoryRenameParams),
    DateCutoff(DateCutoffParams),
    CategoryExclusion(CategoryExclusionParams),
    UrlExclusion(UrlExclusionParams),
    TopicMatch(TopicMatchParams),
    CategoryMapping(CategoryMappingParams),
    KeywordPresence(KeywordPresenceParams),
}

impl StepConfig {
    /// Returns a string slice representing the name of the step type.
    pub fn name(&self) -> &'static str {
        match self {
            StepConfig::CategoryRename(_) => "CategoryRename",
            StepConfig::DateCutoff(_) => "DateCutoff",
            StepConfig::CategoryExclusion(_) => "CategoryExclusion",
            StepConfig::UrlExclusion(_) => "UrlExclusion",
            StepConfig::TopicMatch(_) => "TopicMatch",
            StepConfig::CategoryMapping(_) => "CategoryMapping",
            StepConfig::KeywordPresence(_) => "KeywordPresence",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            StepConfig::CategoryRename(params) => params.validate(),
            StepConfig::DateCutoff(params) => params.validate(),
            StepConfig::CategoryExclusion(params) => params.validate(),
            StepConfig::UrlExclusion(params) => params.validate(),
            StepConfig::TopicMatch(params) => params.validate(),
            StepConfig::CategoryMapping(params) => params.validate(),
            StepConfig::KeywordPresence(params) => params.validate(),
        }
    }
}

fn require_non_empty(owner: &str, name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PipelineError::ConfigValidationError(format!(
            "{}: {} cannot be empty",
            owner, name
        )));
    }
    Ok(())
}

#[derive(Deserialize, Debug, Clone)]
pub struct CategoryRenameParams {
    pub field: String,
    pub from: String,
    pub to: String,
}

impl CategoryRenameParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("CategoryRenameParams", "field", &self.field)?;
        require_non_empty("CategoryRenameParams", "from", &self.from)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DateCutoffParams {
    pub field: String,
    /// Tried in order; `split-heuristic` selects the separator-agnostic guess.
    pub formats: Vec<DateFormat>,
    pub cutoff: NaiveDate,
    pub policy: DatePolicy,
}

impl DateCutoffParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("DateCutoffParams", "field", &self.field)?;
        if self.formats.is_empty() {
            return Err(PipelineError::ConfigValidationError(
                "DateCutoffParams: formats cannot be empty".to_string(),
            ));
        }
        for format in &self.formats {
            if let DateFormat::Pattern(pattern) = format {
                require_non_empty("DateCutoffParams", "format pattern", pattern)?;
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CategoryExclusionParams {
    pub field: String,
    /// Name of a built-in exclusion set.
    pub exclusion_set: String,
}

impl CategoryExclusionParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("CategoryExclusionParams", "field", &self.field)?;
        if exclusion_set(&self.exclusion_set).is_none() {
            return Err(PipelineError::ConfigValidationError(format!(
                "CategoryExclusionParams: unknown exclusion_set '{}'",
                self.exclusion_set
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct UrlExclusionParams {
    pub field: String,
    pub pattern: String,
    #[serde(rename = "match")]
    pub match_mode: UrlMatch,
}

impl UrlExclusionParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("UrlExclusionParams", "field", &self.field)?;
        require_non_empty("UrlExclusionParams", "pattern", &self.pattern)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TopicMatchParams {
    pub field: String,
    pub needle: String,
}

impl TopicMatchParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("TopicMatchParams", "field", &self.field)?;
        require_non_empty("TopicMatchParams", "needle", &self.needle)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CategoryMappingParams {
    pub field: String,
    /// Name of a built-in category table.
    pub table: String,
    pub policy: UnmappedPolicy,
    #[serde(default = "default_group_field")]
    pub group_field: String,
}

fn default_group_field() -> String {
    "group".to_string()
}

impl CategoryMappingParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("CategoryMappingParams", "field", &self.field)?;
        require_non_empty("CategoryMappingParams", "group_field", &self.group_field)?;
        validate_table_name("CategoryMappingParams", &self.table)
    }
}

fn validate_table_name(owner: &str, table: &str) -> Result<()> {
    if category_table(table).is_none() {
        return Err(PipelineError::ConfigValidationError(format!(
            "{}: unknown category table '{}'",
            owner, table
        )));
    }
    Ok(())
}

#[derive(Deserialize, Debug, Clone)]
pub struct KeywordPresenceParams {
    pub field: String,
    /// Column receiving the normalized keywords, if any.
    #[serde(default)]
    pub output_field: Option<String>,
}

impl KeywordPresenceParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("KeywordPresenceParams", "field", &self.field)?;
        if let Some(output_field) = &self.output_field {
            require_non_empty("KeywordPresenceParams", "output_field", output_field)?;
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdGenerationParams {
    pub field: String,
}

impl IdGenerationParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("IdGenerationParams", "field", &self.field)
    }
}

/// Counts surviving records whose `field` equals `value` (case-insensitive).
#[derive(Deserialize, Debug, Clone)]
pub struct FlagTallyParams {
    pub field: String,
    pub value: String,
    pub label: String,
}

impl FlagTallyParams {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("FlagTallyParams", "field", &self.field)?;
        require_non_empty("FlagTallyParams", "value", &self.value)?;
        require_non_empty("FlagTallyParams", "label", &self.label)
    }
}

/// Configuration of the group update pass.
#[derive(Deserialize, Debug, Clone)]
pub struct RemapConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_field: String,
    #[serde(default = "default_group_field")]
    pub group_field: String,
    pub table: String,
}

impl RemapConfig {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("RemapConfig", "name", &self.name)?;
        require_non_empty("RemapConfig", "category_field", &self.category_field)?;
        require_non_empty("RemapConfig", "group_field", &self.group_field)?;
        validate_table_name("RemapConfig", &self.table)
    }
}

fn parse_yaml<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| {
        PipelineError::ConfigError(format!(
            "Failed to parse pipeline config YAML from '{}': {}",
            origin, e
        ))
    })
}

fn read_config_file(path_ref: &Path) -> Result<String> {
    fs::read_to_string(path_ref).map_err(|e| {
        PipelineError::ConfigError(format!(
            "Failed to read pipeline config file '{}': {}",
            path_ref.display(),
            e
        ))
    })
}

/// Parses and validates a pipeline configuration held in memory.
pub fn pipeline_config_from_str(content: &str, origin: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = parse_yaml(content, origin)?;
    config.validate()?; // Validate the loaded configuration
    Ok(config)
}

/// Loads and parses the pipeline configuration YAML file.
pub fn load_pipeline_config<P: AsRef<Path>>(config_path: P) -> Result<PipelineConfig> {
    let path_ref = config_path.as_ref();
    let content = read_config_file(path_ref)?;
    pipeline_config_from_str(&content, &path_ref.display().to_string())
}

pub fn remap_config_from_str(content: &str, origin: &str) -> Result<RemapConfig> {
    let config: RemapConfig = parse_yaml(content, origin)?;
    config.validate()?;
    Ok(config)
}

pub fn load_remap_config<P: AsRef<Path>>(config_path: P) -> Result<RemapConfig> {
    let path_ref = config_path.as_ref();
    let content = read_config_file(path_ref)?;
    remap_config_from_str(&content, &path_ref.display().to_string())
}
