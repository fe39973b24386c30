//! Diagnostics collected during a validation run

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The tables that make up the terminology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Classes,
    Authors,
    Terms,
    Synonyms,
    Xrefs,
    Relations,
}

impl Table {
    /// File name of the table inside a data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Classes => "classes.tsv",
            Self::Authors => "authors.tsv",
            Self::Terms => "terms.tsv",
            Self::Synonyms => "synonyms.tsv",
            Self::Xrefs => "xrefs.tsv",
            Self::Relations => "relations.tsv",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// What kind of rule a diagnostic comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Field counts, empty fields, stray whitespace
    Structural,
    /// Identifier pattern and sequential numbering
    Identifier,
    /// Curators, classes, reference sources, specificities
    Vocabulary,
    /// References to identifiers missing from the term index
    Referential,
    /// Sort order of a table
    Ordering,
    /// Cross-table agreement that does not break references
    Consistency,
    /// Missing roles, xrefs and relations
    Completeness,
}

impl Category {
    /// Categories whose errors stop a fail-fast run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Identifier | Self::Referential)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Structural => "structural",
            Self::Identifier => "identifier",
            Self::Vocabulary => "vocabulary",
            Self::Referential => "referential",
            Self::Ordering => "ordering",
            Self::Consistency => "consistency",
            Self::Completeness => "completeness",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// How a run reacts to fatal diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// Collect everything and decide at the end
    #[default]
    Accumulate,
    /// Stop at the first identifier or referential error
    FailFast,
}

impl std::fmt::Display for Strictness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accumulate => f.write_str("accumulate"),
            Self::FailFast => f.write_str("fail-fast"),
        }
    }
}

impl std::str::FromStr for Strictness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "accumulate" => Ok(Self::Accumulate),
            "fail-fast" => Ok(Self::FailFast),
            other => Err(Error::InvalidConfig(format!(
                "unknown strictness mode '{}' (expected accumulate or fail-fast)",
                other
            ))),
        }
    }
}

/// A single finding, located well enough to fix by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub table: Table,

    /// Physical line in the file; the header is line 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    pub category: Category,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(
        table: Table,
        line: Option<u64>,
        category: Category,
        message: impl Into<String>,
    ) -> Self {
        Self {
            table,
            line,
            category,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(
        table: Table,
        line: Option<u64>,
        category: Category,
        message: impl Into<String>,
    ) -> Self {
        Self {
            table,
            line,
            category,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_fatal(&self) -> bool {
        self.is_error() && self.category.is_fatal()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}, line {}: {}", self.table, line, self.message),
            None => write!(f, "{}: {}", self.table, self.message),
        }
    }
}

/// Collector threaded through every validator of a run.
///
/// Recording a fatal error under [`Strictness::FailFast`] keeps the
/// diagnostic and returns [`Error::Halted`] so callers can unwind with `?`.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    strictness: Strictness,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            entries: Vec::new(),
        }
    }

    /// Record a diagnostic
    pub fn record(&mut self, diagnostic: Diagnostic) -> Result<()> {
        let halt = self.strictness == Strictness::FailFast && diagnostic.is_fatal();
        if halt {
            self.push(diagnostic.clone());
            return Err(Error::Halted(Box::new(diagnostic)));
        }
        self.push(diagnostic);
        Ok(())
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "recorded");
        self.entries.push(diagnostic);
    }

    /// Record an error at a line of a table
    pub fn error(
        &mut self,
        table: Table,
        line: u64,
        category: Category,
        message: impl Into<String>,
    ) -> Result<()> {
        self.record(Diagnostic::error(table, Some(line), category, message))
    }

    /// Record a warning; warnings never halt a run
    pub fn warning(
        &mut self,
        table: Table,
        line: Option<u64>,
        category: Category,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::warning(table, line, category, message));
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries.len() - self.error_count()
    }

    /// True when no errors were recorded
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
