// src/config.rs
pub mod cli;
pub mod pipeline;
pub mod presets;

pub use cli::VariantArgs;
pub use pipeline::{
    load_pipeline_config, load_remap_config, pipeline_config_from_str, remap_config_from_str,
    PipelineConfig, RemapConfig, StepConfig,
};
