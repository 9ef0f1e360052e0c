// src/pipeline/filters/mod.rs

mod category_filters;
mod date_filter;
mod keyword_filter;
mod topic_filter;
mod url_filter;

pub use category_filters::{
    mapping_steps, CategoryExclusionFilter, CategoryMappingStep, CategoryRename, OtherGroupFilter,
};
pub use date_filter::{DateCutoffFilter, DatePolicy, FailureAction};
pub use keyword_filter::KeywordPresenceFilter;
pub use topic_filter::TopicFilter;
pub use url_filter::{UrlExclusionFilter, UrlMatch};
