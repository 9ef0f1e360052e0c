#![allow(non_snake_case)]

// Declare the modules that form the library's public API.
// Binaries reach them through `use NewsSieve::module_name;`
pub mod config;
pub mod data_model;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod runner;
pub mod utils;

pub use error::{PipelineError, Result};
pub use runner::{PipelineRunner, RemapRunner, RunStatistics};
