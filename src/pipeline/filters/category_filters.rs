use crate::data_model::{ExclusionReason, Record, OTHER_GROUP};
use crate::error::{PipelineError, Result};
use crate::executor::{ProcessingStep, Stage};
use crate::pipeline::categories::{
    CategoryClassifier, Classification, ExclusionSet, UnmappedPolicy,
};

/// Rewrites one exact category value to another before anything else looks
/// at the category.
pub struct CategoryRename {
    field: String,
    from: String,
    to: String,
}

impl CategoryRename {
    pub fn new(field: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        CategoryRename {
            field: field.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

impl ProcessingStep for CategoryRename {
    fn name(&self) -> &'static str {
        "CategoryRename"
    }

    fn stage(&self) -> Stage {
        Stage::Normalize
    }

    fn process(&self, mut record: Record) -> Result<Record> {
        if record.get_trimmed(&self.field) == self.from {
            record.set(self.field.clone(), self.to.clone());
        }
        Ok(record)
    }
}

/// Drops records whose trimmed category is in an exclusion set.
pub struct CategoryExclusionFilter {
    field: String,
    excluded: &'static ExclusionSet,
}

impl CategoryExclusionFilter {
    pub fn new(field: impl Into<String>, excluded: &'static ExclusionSet) -> Self {
        CategoryExclusionFilter {
            field: field.into(),
            excluded,
        }
    }
}

impl ProcessingStep for CategoryExclusionFilter {
    fn name(&self) -> &'static str {
        "CategoryExclusionFilter"
    }

    fn stage(&self) -> Stage {
        Stage::CategoryExclusion
    }

    fn process(&self, record: Record) -> Result<Record> {
        let category = record.get_trimmed(&self.field);
        if self.excluded.contains(category) {
            let detail = format!("'{}' is in exclusion set '{}'", category, self.excluded.name());
            return Err(PipelineError::filtered(
                record,
                ExclusionReason::ExcludedCategory,
                detail,
            ));
        }
        Ok(record)
    }
}

/// Writes the mapped group into `group_field`.
///
/// Under [`UnmappedPolicy::StrictDrop`] an unmapped category rejects the
/// record here. Under [`UnmappedPolicy::LenientOtherThenFilter`] it is
/// labelled `Other` and left for [`OtherGroupFilter`].
pub struct CategoryMappingStep {
    field: String,
    group_field: String,
    classifier: CategoryClassifier,
}

impl CategoryMappingStep {
    pub fn new(
        field: impl Into<String>,
        group_field: impl Into<String>,
        classifier: CategoryClassifier,
    ) -> Self {
        CategoryMappingStep {
            field: field.into(),
            group_field: group_field.into(),
            classifier,
        }
    }
}

impl ProcessingStep for CategoryMappingStep {
    fn name(&self) -> &'static str {
        "CategoryMappingStep"
    }

    fn stage(&self) -> Stage {
        Stage::CategoryMapping
    }

    fn process(&self, mut record: Record) -> Result<Record> {
        let group = match self.classifier.classify(record.get_trimmed(&self.field)) {
            Classification::Mapped(group) => group,
            Classification::Unmapped => match self.classifier.policy() {
                UnmappedPolicy::StrictDrop => {
                    let detail = format!(
                        "'{}' has no group in table '{}'",
                        record.get_trimmed(&self.field),
                        self.classifier.table().name()
                    );
                    return Err(PipelineError::filtered(
                        record,
                        ExclusionReason::UnmappedCategory,
                        detail,
                    ));
                }
                UnmappedPolicy::LenientOtherThenFilter => OTHER_GROUP,
            },
        };
        record.set(self.group_field.clone(), group);
        Ok(record)
    }

    fn added_columns(&self) -> Vec<String> {
        vec![self.group_field.clone()]
    }
}

/// Second half of the lenient policy: drops anything labelled `Other`.
pub struct OtherGroupFilter {
    group_field: String,
}

impl OtherGroupFilter {
    pub fn new(group_field: impl Into<String>) -> Self {
        OtherGroupFilter {
            group_field: group_field.into(),
        }
    }
}

impl ProcessingStep for OtherGroupFilter {
    fn name(&self) -> &'static str {
        "OtherGroupFilter"
    }

    fn stage(&self) -> Stage {
        Stage::CategoryMapping
    }

    fn process(&self, record: Record) -> Result<Record> {
        if record.get(&self.group_field) == Some(OTHER_GROUP) {
            return Err(PipelineError::filtered(
                record,
                ExclusionReason::OtherGroup,
                "group is 'Other'",
            ));
        }
        Ok(record)
    }
}

/// Builds the mapping steps for a classifier: one step for strict mode, the
/// map-then-filter pair for lenient mode.
pub fn mapping_steps(
    field: &str,
    group_field: &str,
    classifier: CategoryClassifier,
) -> Vec<Box<dyn ProcessingStep>> {
    let mut steps: Vec<Box<dyn ProcessingStep>> =
        vec![Box::new(CategoryMappingStep::new(field, group_field, classifier))];
    if classifier.policy() == UnmappedPolicy::LenientOtherThenFilter {
        steps.push(Box::new(OtherGroupFilter::new(group_field)));
    }
    steps
}
