use crate::data_model::{ExclusionReason, Record};
use crate::error::{PipelineError, Result};
use crate::executor::{ProcessingStep, Stage};

/// Keeps only records whose `field` mentions `needle`, ignoring case.
pub struct TopicFilter {
    field: String,
    needle: String,
}

impl TopicFilter {
    pub fn new(field: impl Into<String>, needle: &str) -> Self {
        TopicFilter {
            field: field.into(),
            needle: needle.to_lowercase(),
        }
    }
}

impl ProcessingStep for TopicFilter {
    fn name(&self) -> &'static str {
        "TopicFilter"
    }

    fn stage(&self) -> Stage {
        Stage::Topic
    }

    fn process(&self, record: Record) -> Result<Record> {
        let value = record.get(&self.field).unwrap_or("");
        if value.to_lowercase().contains(&self.needle) {
            Ok(record)
        } else {
            let detail = format!("'{}' does not mention '{}'", self.field, self.needle);
            Err(PipelineError::filtered(record, ExclusionReason::OffTopic, detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_match_is_case_insensitive() {
        let f = TopicFilter::new("type2", "Corona");
        let hit: Record = [("type2", "Health; CORONAVIRUS")].into_iter().collect();
        let miss: Record = [("type2", "Health")].into_iter().collect();
        assert!(f.process(hit).is_ok());
        assert!(matches!(
            f.process(miss),
            Err(PipelineError::RecordFiltered {
                reason: ExclusionReason::OffTopic,
                ..
            })
        ));
        assert!(f.process(Record::new()).is_err());
    }
}
