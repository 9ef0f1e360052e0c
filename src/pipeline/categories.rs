use crate::data_model::OTHER_GROUP;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Static many-to-one mapping from raw category (`type1`) to group.
#[derive(Debug)]
pub struct CategoryTable {
    name: &'static str,
    groups: HashMap<&'static str, &'static str>,
}

impl CategoryTable {
    fn new(name: &'static str, entries: &[(&'static str, &'static str)]) -> Self {
        CategoryTable {
            name,
            groups: entries.iter().copied().collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group_for(&self, category: &str) -> Option<&'static str> {
        self.groups.get(category).copied()
    }

    /// The closed set of group labels this table can produce.
    pub fn groups(&self) -> BTreeSet<&'static str> {
        self.groups.values().copied().collect()
    }
}

/// Raw categories dropped outright, regardless of any table.
#[derive(Debug)]
pub struct ExclusionSet {
    name: &'static str,
    categories: HashSet<&'static str>,
}

impl ExclusionSet {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

const ENTERTAINMENT: &[&str] = &[
    "Arts",
    "Theatre",
    "Comedy",
    "Film and Cinema",
    "Festival",
    "Music",
    "Culture",
];

const GOVERNMENT: &[&str] = &[
    "Government",
    "Local Authority",
    "Parliament",
    "Executive NDPB",
    "Agency",
    "Public Corporations",
    "Politics",
    "Law",
    "Support",
    "Utilities",
    "Transport",
    "Community",
];

const LEARNING: &[&str] = &[
    "Health",
    "Health and Social Care",
    "Education",
    "School",
    "School, Primary",
    "School, Secondary",
    "School, ASL",
    "School, Independent",
    "Libraries and Archives",
    "Research",
    "Science",
    "Think Tank",
    "History",
    "Heritage",
];

const MEDIA: &[&str] = &["Sports", "News", "Media", "Blog", "Heritage and Tourism"];

fn assign<'a>(
    categories: &'a [&'static str],
    group: &'static str,
) -> impl Iterator<Item = (&'static str, &'static str)> + 'a {
    categories.iter().map(move |c| (*c, group))
}

/// Table used by the recent-records filter and the group update pass.
pub static CURATED_TABLE: Lazy<CategoryTable> = Lazy::new(|| {
    let entries: Vec<_> = assign(ENTERTAINMENT, "Entertainment")
        .chain(assign(GOVERNMENT, "Government"))
        .chain(assign(LEARNING, "Education"))
        .chain(assign(MEDIA, "Media"))
        .collect();
    CategoryTable::new("curated", &entries)
});

/// Table used by the coronavirus preprocessing pass. Broader than the curated
/// table: commercial and charitable categories are folded into existing
/// groups instead of being excluded.
pub static KNOWLEDGE_TABLE: Lazy<CategoryTable> = Lazy::new(|| {
    let entries: Vec<_> = assign(ENTERTAINMENT, "Entertainment")
        .chain(assign(GOVERNMENT, "Government"))
        .chain(assign(&["Charity", "Church and religion"], "Government"))
        .chain(assign(LEARNING, "Knowledge"))
        .chain(assign(MEDIA, "Media"))
        .chain(assign(
            &[
                "Business",
                "Retail",
                "Food and Drink",
                "Oil",
                "Timber",
                "Voluntary",
                "Nature",
                "Wildlife",
                "Religion",
            ],
            "Media",
        ))
        .collect();
    CategoryTable::new("knowledge", &entries)
});

pub static STANDARD_EXCLUSIONS: Lazy<ExclusionSet> = Lazy::new(|| ExclusionSet {
    name: "standard",
    categories: [
        "Business",
        "Retail",
        "Food and Drink",
        "Oil",
        "Timber",
        "Voluntary",
        "Charity",
        "Nature",
        "Wildlife",
        "Church and religion",
        "Religion",
    ]
    .into_iter()
    .collect(),
});

/// Looks up a built-in table by the name used in variant configuration.
pub fn category_table(name: &str) -> Option<&'static CategoryTable> {
    match name {
        "curated" => Some(&*CURATED_TABLE),
        "knowledge" => Some(&*KNOWLEDGE_TABLE),
        _ => None,
    }
}

/// Looks up a built-in exclusion set by name.
pub fn exclusion_set(name: &str) -> Option<&'static ExclusionSet> {
    match name {
        "standard" => Some(&*STANDARD_EXCLUSIONS),
        _ => None,
    }
}

/// What happens to a record whose category is not in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Drop the record at the mapping step.
    StrictDrop,
    /// Label it `Other`; a group filter later drops `Other`.
    LenientOtherThenFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Mapped(&'static str),
    Unmapped,
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryClassifier {
    table: &'static CategoryTable,
    policy: UnmappedPolicy,
}

impl CategoryClassifier {
    pub fn new(table: &'static CategoryTable, policy: UnmappedPolicy) -> Self {
        CategoryClassifier { table, policy }
    }

    pub fn table(&self) -> &'static CategoryTable {
        self.table
    }

    pub fn policy(&self) -> UnmappedPolicy {
        self.policy
    }

    pub fn classify(&self, raw_category: &str) -> Classification {
        match self.table.group_for(raw_category.trim()) {
            Some(group) => Classification::Mapped(group),
            None => Classification::Unmapped,
        }
    }

    /// Group label with unmapped categories folded into `Other`.
    pub fn group_or_other(&self, raw_category: &str) -> &'static str {
        match self.classify(raw_category) {
            Classification::Mapped(group) => group,
            Classification::Unmapped => OTHER_GROUP,
        }
    }
}
