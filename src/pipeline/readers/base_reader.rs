use crate::data_model::Record;
use crate::error::Result;

pub trait BaseReader {
    /// Column names in file order.
    fn headers(&self) -> &[String];

    fn read_records(self) -> Result<Box<dyn Iterator<Item = Result<Record>>>>;
}
