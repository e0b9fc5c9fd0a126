use std::collections::BTreeSet;

/// Distinct resolved queries in ascending byte-wise order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryList {
    entries: Vec<String>,
}

impl QueryList {
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl FromIterator<String> for QueryList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let unique: BTreeSet<String> = iter.into_iter().collect();
        Self {
            entries: unique.into_iter().collect(),
        }
    }
}
