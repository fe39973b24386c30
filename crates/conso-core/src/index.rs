//! The term index: identifier to name and class, built once per run

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::identifier::IdentifierScheme;
use crate::term::Term;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub class: String,
}

/// Flat record used when the index is handed to other tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub identifier: String,
    pub name: String,
    pub class: String,
}

/// How a local identifier resolves against the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Known(&'a IndexEntry),
    Withdrawn,
    Unknown,
}

/// Read-only lookup over the accepted terms of one run.
///
/// Withdrawn terms are tracked separately: their identifiers are reserved but
/// do not resolve.
#[derive(Debug, Clone)]
pub struct TermIndex {
    namespace: String,
    scheme: IdentifierScheme,
    entries: BTreeMap<String, IndexEntry>,
    withdrawn: BTreeSet<String>,
}

impl TermIndex {
    pub fn new(namespace: impl Into<String>, scheme: IdentifierScheme) -> Self {
        Self {
            namespace: namespace.into(),
            scheme,
            entries: BTreeMap::new(),
            withdrawn: BTreeSet::new(),
        }
    }

    pub fn from_terms<'a>(
        namespace: impl Into<String>,
        scheme: IdentifierScheme,
        terms: impl IntoIterator<Item = &'a Term>,
    ) -> Self {
        let mut index = Self::new(namespace, scheme);
        for term in terms {
            index.insert(term);
        }
        index
    }

    pub fn insert(&mut self, term: &Term) {
        if term.withdrawn {
            self.withdrawn.insert(term.identifier.clone());
            return;
        }
        self.entries.insert(
            term.identifier.clone(),
            IndexEntry {
                name: term.name.clone(),
                class: term.class.clone(),
            },
        );
    }

    /// Namespace label used by relation rows for local terms
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn scheme(&self) -> &IdentifierScheme {
        &self.scheme
    }

    pub fn resolve(&self, identifier: &str) -> Resolution<'_> {
        if let Some(entry) = self.entries.get(identifier) {
            Resolution::Known(entry)
        } else if self.withdrawn.contains(identifier) {
            Resolution::Withdrawn
        } else {
            Resolution::Unknown
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn name(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(|e| e.name.as_str())
    }

    pub fn class(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(|e| e.class.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn withdrawn_count(&self) -> usize {
        self.withdrawn.len()
    }

    /// Entries in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Identifier and name of every term of a class, in identifier order
    pub fn members_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.iter()
            .filter(move |(_, entry)| entry.class == class)
            .map(|(id, entry)| (id, entry.name.as_str()))
    }

    pub fn to_records(&self) -> Vec<IndexRecord> {
        self.iter()
            .map(|(id, entry)| IndexRecord {
                identifier: id.to_string(),
                name: entry.name.clone(),
                class: entry.class.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(identifier: &str, name: &str, class: &str) -> Term {
        Term {
            identifier: identifier.to_string(),
            number: 0,
            curator: "cthoyt".to_string(),
            name: name.to_string(),
            class: class.to_string(),
            references: Vec::new(),
            description: "d".to_string(),
            withdrawn: false,
        }
    }

    #[test]
    fn test_resolution() {
        let terms = vec![
            term("CONSO00001", "aspirin", "chemical"),
            Term::withdrawn("CONSO00002", 2, "cthoyt"),
            term("CONSO00003", "APP", "protein"),
        ];
        let index = TermIndex::from_terms(
            "CONSO",
            IdentifierScheme::new("CONSO", 5).unwrap(),
            &terms,
        );

        assert_eq!(index.len(), 2);
        assert_eq!(index.withdrawn_count(), 1);
        assert_eq!(index.name("CONSO00001"), Some("aspirin"));
        assert_eq!(index.class("CONSO00003"), Some("protein"));
        assert!(matches!(index.resolve("CONSO00002"), Resolution::Withdrawn));
        assert!(matches!(index.resolve("CONSO00009"), Resolution::Unknown));
        assert!(!index.contains("CONSO00002"));
    }

    #[test]
    fn test_members_of_class() {
        let terms = vec![
            term("CONSO00002", "ibuprofen", "chemical"),
            term("CONSO00001", "aspirin", "chemical"),
            term("CONSO00003", "APP", "protein"),
        ];
        let index = TermIndex::from_terms(
            "CONSO",
            IdentifierScheme::new("CONSO", 5).unwrap(),
            &terms,
        );
        let chemicals: Vec<_> = index.members_of("chemical").collect();
        assert_eq!(
            chemicals,
            vec![("CONSO00001", "aspirin"), ("CONSO00002", "ibuprofen")]
        );
        assert_eq!(index.to_records().len(), 3);
    }
}
