use crate::data_model::{ExclusionReason, Record};
use crate::error::{PipelineError, Result};
use crate::executor::{ProcessingStep, Stage};
use crate::pipeline::keywords::normalize_keywords;

/// Drops records with no usable keywords. When `output_field` is set, the
/// normalized keyword list is stored there for surviving records.
pub struct KeywordPresenceFilter {
    field: String,
    output_field: Option<String>,
}

impl KeywordPresenceFilter {
    pub fn new(field: impl Into<String>, output_field: Option<String>) -> Self {
        KeywordPresenceFilter {
            field: field.into(),
            output_field,
        }
    }
}

impl ProcessingStep for KeywordPresenceFilter {
    fn name(&self) -> &'static str {
        "KeywordPresenceFilter"
    }

    fn stage(&self) -> Stage {
        Stage::KeywordPresence
    }

    fn process(&self, mut record: Record) -> Result<Record> {
        let keywords = normalize_keywords(record.get(&self.field).unwrap_or(""));
        if keywords.is_empty() {
            let detail = format!("'{}' has no keywords", self.field);
            return Err(PipelineError::filtered(
                record,
                ExclusionReason::MissingKeywords,
                detail,
            ));
        }
        if let Some(output_field) = &self.output_field {
            record.set(output_field.clone(), keywords);
        }
        Ok(record)
    }

    fn added_columns(&self) -> Vec<String> {
        self.output_field.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keywords_are_rejected() {
        let f = KeywordPresenceFilter::new("first_keywords_auto", None);
        let blank: Record = [("first_keywords_auto", " , ,")].into_iter().collect();
        assert!(matches!(
            f.process(blank),
            Err(PipelineError::RecordFiltered {
                reason: ExclusionReason::MissingKeywords,
                ..
            })
        ));
        assert!(f.process(Record::new()).is_err());
    }

    #[test]
    fn test_processed_keywords_are_written_when_requested() {
        let f = KeywordPresenceFilter::new(
            "first_keywords_auto",
            Some("keywords_processed".to_string()),
        );
        let input: Record = [("first_keywords_auto", " A, ,b ,")].into_iter().collect();
        let out = f.process(input).unwrap();
        assert_eq!(out.get("keywords_processed"), Some("a,b"));
        assert_eq!(out.get("first_keywords_auto"), Some(" A, ,b ,"));
        assert_eq!(f.added_columns(), vec!["keywords_processed".to_string()]);
    }
}
