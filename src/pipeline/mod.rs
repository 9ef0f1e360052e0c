// src/pipeline/mod.rs

pub mod categories;
pub mod dates;
pub mod filters;
pub mod ids;
pub mod keywords;
pub mod readers;
pub mod remap;
pub mod writers;
