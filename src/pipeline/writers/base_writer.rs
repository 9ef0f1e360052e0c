use crate::data_model::Record;
use crate::error::Result;

/// Trait for writing Records to an output sink (e.g. file).
pub trait BaseWriter {
    fn write_record(&mut self, record: &Record) -> Result<()>;

    /// Flush and close the output writer.
    fn close(self) -> Result<()>;
}
