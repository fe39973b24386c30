//! Controlled vocabularies: curators, classes and reference sources

use std::collections::BTreeSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Category, Diagnostics};
use crate::error::Result;
use crate::record::TableReader;
use crate::schema;

/// A `source:accession` pair from a term's references column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    pub source: String,
    pub accession: String,
}

impl Reference {
    /// Parse one entry. Both parts must be present and non-empty.
    pub fn parse(entry: &str) -> Option<Self> {
        let mut parts = entry.trim().split(':');
        let source = parts.next()?;
        let accession = parts.next()?;
        if parts.next().is_some() || source.is_empty() || accession.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            accession: accession.to_string(),
        })
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.accession)
    }
}

/// Fixed sets that constrained fields are checked against
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    curators: BTreeSet<String>,
    sources: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new<I, S>(curators: I, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            curators: curators.into_iter().map(Into::into).collect(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// Add curators, e.g. from the authors table
    pub fn extend_curators<I: IntoIterator<Item = String>>(&mut self, curators: I) {
        self.curators.extend(curators);
    }

    pub fn is_curator(&self, curator: &str) -> bool {
        self.curators.contains(curator)
    }

    /// Parse a comma-separated references field. Every problem is returned as
    /// a message; valid entries are returned even when others fail.
    pub fn check_references(&self, field: &str) -> (Vec<Reference>, Vec<String>) {
        let mut references = Vec::new();
        let mut problems = Vec::new();
        for entry in field.split(',') {
            let Some(reference) = Reference::parse(entry) else {
                problems.push(format!(
                    "Problematic reference {:?} (expected source:accession)",
                    entry.trim()
                ));
                continue;
            };
            if reference.source != reference.source.to_lowercase() {
                problems.push(format!(
                    "Invalid reference source {:?} in {} (always use lowercase sources)",
                    reference.source, reference
                ));
                continue;
            }
            if !self.sources.contains(&reference.source) {
                problems.push(format!(
                    "Invalid reference source {:?} in {} (expected one of: {})",
                    reference.source,
                    reference,
                    self.sources.iter().cloned().collect::<Vec<_>>().join(", ")
                ));
                continue;
            }
            references.push(reference);
        }
        (references, problems)
    }
}

/// The permissible term classes, loaded from `classes.tsv`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    classes: BTreeSet<String>,
}

impl ClassRegistry {
    /// Load the registry, reporting padded names and rows out of order.
    pub fn load<R: Read>(reader: TableReader<R>, diags: &mut Diagnostics) -> Result<Self> {
        let schema = schema::CLASSES;
        let mut classes = BTreeSet::new();
        let mut last: Option<String> = None;
        for row in reader {
            let row = row?;
            if !schema.check_shape(&row, diags)? {
                continue;
            }
            let name = row.get(0).trim();
            if let Some(previous) = &last {
                if name < previous.as_str() {
                    diags.error(
                        schema.table,
                        row.line,
                        Category::Ordering,
                        format!("Not sorted properly: {:?} comes after {:?}", name, previous),
                    )?;
                }
            }
            classes.insert(name.to_string());
            last = Some(name.to_string());
        }
        tracing::debug!(count = classes.len(), "loaded class registry");
        Ok(Self { classes })
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ClassRegistry {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            classes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Curator identifiers (ORCIDs) from `authors.tsv`
pub fn load_authors<R: Read>(
    reader: TableReader<R>,
    diags: &mut Diagnostics,
) -> Result<BTreeSet<String>> {
    let schema = schema::AUTHORS;
    let mut authors = BTreeSet::new();
    for row in reader {
        let row = row?;
        if schema.check_shape(&row, diags)? {
            authors.insert(row.get(0).to_string());
        }
    }
    tracing::debug!(count = authors.len(), "loaded authors");
    Ok(authors)
}
