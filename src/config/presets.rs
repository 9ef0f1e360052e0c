//! Built-in variant configurations, embedded at compile time.

use crate::config::pipeline::{
    pipeline_config_from_str, remap_config_from_str, PipelineConfig, RemapConfig,
};
use crate::error::Result;

const FILTER_CATEGORIES_YAML: &str = include_str!("../../config/variants/filter_categories.yaml");
const FILTER_RECENT_YAML: &str = include_str!("../../config/variants/filter_recent.yaml");
const PREPROCESS_YAML: &str = include_str!("../../config/variants/preprocess.yaml");
const UPDATE_GROUPS_YAML: &str = include_str!("../../config/variants/update_groups.yaml");

pub fn filter_categories() -> Result<PipelineConfig> {
    pipeline_config_from_str(FILTER_CATEGORIES_YAML, "filter_categories.yaml")
}

pub fn filter_recent() -> Result<PipelineConfig> {
    pipeline_config_from_str(FILTER_RECENT_YAML, "filter_recent.yaml")
}

pub fn preprocess() -> Result<PipelineConfig> {
    pipeline_config_from_str(PREPROCESS_YAML, "preprocess.yaml")
}

pub fn update_groups() -> Result<RemapConfig> {
    remap_config_from_str(UPDATE_GROUPS_YAML, "update_groups.yaml")
}
