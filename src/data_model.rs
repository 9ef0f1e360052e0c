use indexmap::IndexMap;
use std::fmt;

/// Sentinel group for categories the table does not know.
pub const OTHER_GROUP: &str = "Other";

/// One row of the tabular input, keyed by column name.
///
/// Column order is insertion order: columns read from the file come first,
/// and columns added by pipeline stages are appended the first time they are
/// set. Overwriting an existing column keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Best-effort lookup: a missing column reads as the empty string, and
    /// surrounding whitespace is stripped.
    pub fn get_trimmed(&self, column: &str) -> &str {
        self.get(column).map(str::trim).unwrap_or("")
    }

    /// Sets a column, returning the previous value if it existed.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(column.into(), value.into())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Why a record was dropped by the filter chain.
///
/// Variants are declared in canonical evaluation order; the derived `Ord`
/// is what the run report sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExclusionReason {
    Date,
    ExcludedCategory,
    ExcludedUrl,
    OffTopic,
    UnmappedCategory,
    OtherGroup,
    MissingKeywords,
}

impl ExclusionReason {
    /// Human-readable label used in the console summary.
    pub fn label(&self) -> &'static str {
        match self {
            ExclusionReason::Date => "date before cutoff or unparseable",
            ExclusionReason::ExcludedCategory => "unwanted categories",
            ExclusionReason::ExcludedUrl => "excluded URL",
            ExclusionReason::OffTopic => "off-topic",
            ExclusionReason::UnmappedCategory => "category not in group table",
            ExclusionReason::OtherGroup => "group='Other'",
            ExclusionReason::MissingKeywords => "without keywords",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
