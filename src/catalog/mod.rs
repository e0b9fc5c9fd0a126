//! Operation catalog: which method names are data-access operations and where
//! their query text argument sits.

pub mod capabilities;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use capabilities::CAPABILITIES;

/// A recognized data-access operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSpec {
    pub name: String,
    pub query_argument: usize,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>, query_argument: usize) -> Self {
        Self {
            name: name.into(),
            query_argument,
        }
    }
}

/// Immutable lookup table from operation name to its spec.
#[derive(Debug, Clone)]
pub struct OperationCatalog {
    operations: HashMap<String, OperationSpec>,
}

impl OperationCatalog {
    /// Catalog derived from the declared capabilities.
    pub fn builtin() -> Self {
        let operations = CAPABILITIES
            .iter()
            .filter_map(|c| {
                c.query_index()
                    .map(|index| (c.operation.to_string(), OperationSpec::new(c.operation, index)))
            })
            .collect();
        Self { operations }
    }

    /// Built-in catalog extended by configured operations. A configured entry
    /// with a built-in name replaces the built-in index.
    pub fn with_extra(extra: &[OperationSpec]) -> Self {
        let mut catalog = Self::builtin();
        for op in extra {
            catalog.operations.insert(op.name.clone(), op.clone());
        }
        catalog
    }

    pub fn get(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.get(name)
    }

}

/// How strictly a call must match before its query argument is collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPolicy {
    /// Operation name alone decides. Any receiver exposing a method with a
    /// catalogued name matches.
    #[default]
    NameOnly,
    /// The receiver's static type must also declare the operation.
    Conformant,
}
