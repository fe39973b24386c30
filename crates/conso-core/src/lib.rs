//! CONSO Core - Validation engine for the curated terminology tables
//!
//! This crate checks the tab-separated tables of the terminology (classes,
//! terms, synonyms, xrefs and relations) for internal consistency and builds
//! the term index that exporters consume.

pub mod completeness;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod identifier;
pub mod index;
pub mod integrity;
pub mod record;
pub mod relation;
pub mod run;
pub mod schema;
pub mod synonym;
pub mod term;
pub mod vocabulary;
pub mod xref;

pub use completeness::{Completeness, CompletenessRule, Finding, MissingEntry};
pub use config::ValidationConfig;
pub use diagnostics::{Category, Diagnostic, Diagnostics, Severity, Strictness, Table};
pub use error::{Error, Result};
pub use identifier::{IdentifierScheme, SchemeViolation};
pub use index::{IndexEntry, IndexRecord, Resolution, TermIndex};
pub use record::{Row, TableReader};
pub use relation::{Endpoint, Relation};
pub use run::{DataDir, Outcome, Stage, Status, TableCounts, Validator};
pub use schema::TableSchema;
pub use synonym::{Specificity, Synonym};
pub use term::{Term, TermRules};
pub use vocabulary::{ClassRegistry, Reference, Vocabulary};
pub use xref::Xref;
