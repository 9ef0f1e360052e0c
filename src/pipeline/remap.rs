use tracing::debug;

use crate::data_model::Record;
use crate::pipeline::categories::CategoryClassifier;

/// Re-derives the stored group of already-processed records from their
/// category, using a possibly revised table. Unmapped categories become
/// `Other`; nothing is dropped.
#[derive(Debug, Clone)]
pub struct GroupRemapper {
    category_field: String,
    group_field: String,
    classifier: CategoryClassifier,
}

impl GroupRemapper {
    pub fn new(
        category_field: impl Into<String>,
        group_field: impl Into<String>,
        classifier: CategoryClassifier,
    ) -> Self {
        GroupRemapper {
            category_field: category_field.into(),
            group_field: group_field.into(),
            classifier,
        }
    }

    pub fn group_field(&self) -> &str {
        &self.group_field
    }

    /// Overwrites the group only when it differs from the expected one.
    /// Returns whether the record changed.
    pub fn remap(&self, record: &mut Record) -> bool {
        let expected = self
            .classifier
            .group_or_other(record.get_trimmed(&self.category_field));
        if record.get(&self.group_field) == Some(expected) {
            return false;
        }
        debug!(
            category = record.get_trimmed(&self.category_field),
            from = record.get(&self.group_field).unwrap_or(""),
            to = expected,
            "Updating group"
        );
        record.set(self.group_field.clone(), expected);
        true
    }

    /// Remaps every record in place and returns the number updated.
    pub fn remap_all<'a>(&self, records: impl IntoIterator<Item = &'a mut Record>) -> usize {
        records
            .into_iter()
            .map(|record| self.remap(record))
            .filter(|updated| *updated)
            .count()
    }
}
