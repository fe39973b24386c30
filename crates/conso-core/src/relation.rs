//! Relations between terms and external entities (rows of `relations.tsv`)

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::index::TermIndex;
use crate::integrity;
use crate::record::{Row, TableReader};
use crate::schema;

/// One end of a relation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub namespace: String,
    pub identifier: String,
    pub name: String,
}

impl Endpoint {
    pub fn new(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            name: name.into(),
        }
    }

    /// True when the endpoint belongs to the local terminology
    pub fn is_local(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} ({})", self.namespace, self.identifier, self.name)
    }
}

/// A typed, directed edge (e.g. `is_a`, `has_role`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub source: Endpoint,
    pub relation: String,
    pub target: Endpoint,
}

impl Relation {
    fn from_row(row: &Row) -> Self {
        Self {
            source: Endpoint::new(row.get(0), row.get(1), row.get(2)),
            relation: row.get(3).to_string(),
            target: Endpoint::new(row.get(4), row.get(5), row.get(6)),
        }
    }
}

/// Validate `relations.tsv` against the term index. Only endpoints in the
/// local namespace are resolved; foreign endpoints are opaque.
pub fn check_relations<R: Read>(
    reader: TableReader<R>,
    index: &TermIndex,
    diags: &mut Diagnostics,
) -> Result<Vec<Relation>> {
    let rows = integrity::scan(&schema::RELATIONS, reader, index, diags, |_, _| Ok(true))?;
    Ok(rows.iter().map(Relation::from_row).collect())
}
