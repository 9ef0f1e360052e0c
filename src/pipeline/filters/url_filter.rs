use serde::Deserialize;

use crate::data_model::{ExclusionReason, Record};
use crate::error::{PipelineError, Result};
use crate::executor::{ProcessingStep, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlMatch {
    Prefix,
    Exact,
}

/// Drops records whose URL starts with (or equals) a configured pattern.
pub struct UrlExclusionFilter {
    field: String,
    pattern: String,
    mode: UrlMatch,
}

impl UrlExclusionFilter {
    pub fn new(field: impl Into<String>, pattern: impl Into<String>, mode: UrlMatch) -> Self {
        UrlExclusionFilter {
            field: field.into(),
            pattern: pattern.into(),
            mode,
        }
    }

    fn matches(&self, url: &str) -> bool {
        match self.mode {
            UrlMatch::Prefix => url.starts_with(&self.pattern),
            UrlMatch::Exact => url == self.pattern,
        }
    }
}

impl ProcessingStep for UrlExclusionFilter {
    fn name(&self) -> &'static str {
        "UrlExclusionFilter"
    }

    fn stage(&self) -> Stage {
        Stage::UrlExclusion
    }

    fn process(&self, record: Record) -> Result<Record> {
        if self.matches(record.get_trimmed(&self.field)) {
            let detail = format!("{} matches excluded URL {:?}", self.field, self.pattern);
            return Err(PipelineError::filtered(
                record,
                ExclusionReason::ExcludedUrl,
                detail,
            ));
        }
        Ok(record)
    }
}
