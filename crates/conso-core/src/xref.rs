//! Cross-references to external databases (rows of `xrefs.tsv`)

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::index::TermIndex;
use crate::integrity;
use crate::record::TableReader;
use crate::schema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xref {
    pub identifier: String,
    pub database: String,
    pub database_identifier: String,
}

impl Xref {
    /// True when the external identifier is a stand-in such as `?` or `N/A`
    pub fn is_placeholder(&self, placeholders: &[String]) -> bool {
        placeholders.iter().any(|p| *p == self.database_identifier)
    }
}

/// Validate `xrefs.tsv` against the term index
pub fn check_xrefs<R: Read>(
    reader: TableReader<R>,
    index: &TermIndex,
    diags: &mut Diagnostics,
) -> Result<Vec<Xref>> {
    let rows = integrity::scan(&schema::XREFS, reader, index, diags, |_, _| Ok(true))?;
    Ok(rows
        .into_iter()
        .map(|row| Xref {
            identifier: row.get(0).to_string(),
            database: row.get(1).to_string(),
            database_identifier: row.get(2).to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let placeholders = vec!["?".to_string(), "N/A".to_string()];
        let xref = Xref {
            identifier: "CONSO00001".to_string(),
            database: "inchi".to_string(),
            database_identifier: "?".to_string(),
        };
        assert!(xref.is_placeholder(&placeholders));

        let xref = Xref {
            database_identifier: "InChI=1S/C9H8O4".to_string(),
            ..xref
        };
        assert!(!xref.is_placeholder(&placeholders));
    }
}
