use chrono::Utc;
use rand::Rng;

use crate::data_model::Record;

/// Placeholder some exports use instead of leaving the id blank.
pub const MISSING_ID: &str = "missing";

/// Fills in ids for records that lack one.
///
/// Generated ids look like `gen_<index>_<unix seconds>_<5 random digits>`.
/// `index` is the record's position among surviving records, which alone
/// keeps ids unique within a run; the suffix only makes clashes between
/// separate runs unlikely.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    field: String,
}

impl IdGenerator {
    pub fn new(field: impl Into<String>) -> Self {
        IdGenerator {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn needs_id(&self, record: &Record) -> bool {
        let current = record.get_trimmed(&self.field);
        current.is_empty() || current == MISSING_ID
    }

    /// Assigns an id if needed, returning whether one was generated.
    pub fn assign(&self, record: &mut Record, index: usize) -> bool {
        self.assign_with(record, index, Utc::now().timestamp(), &mut rand::thread_rng())
    }

    pub fn assign_with<R: Rng + ?Sized>(
        &self,
        record: &mut Record,
        index: usize,
        timestamp: i64,
        rng: &mut R,
    ) -> bool {
        if !self.needs_id(record) {
            return false;
        }
        record.set(self.field.clone(), Self::generate_with(index, timestamp, rng));
        true
    }

    pub fn generate_with<R: Rng + ?Sized>(index: usize, timestamp: i64, rng: &mut R) -> String {
        format!("gen_{}_{}_{}", index, timestamp, rng.gen_range(10000..=99999))
    }
}
