//! A validation run over a data directory
//!
//! Stages run in a fixed order: classes, terms (building the term index),
//! synonyms, xrefs, relations, then completeness. Nothing is retried and no
//! state survives the run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::completeness::{Completeness, Finding};
use crate::config::ValidationConfig;
use crate::diagnostics::{Diagnostic, Diagnostics, Table};
use crate::error::{Error, Result};
use crate::index::TermIndex;
use crate::record::TableReader;
use crate::relation::check_relations;
use crate::synonym::check_synonyms;
use crate::term::TermRules;
use crate::vocabulary::{load_authors, ClassRegistry};
use crate::xref::check_xrefs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Classes,
    Terms,
    Synonyms,
    Xrefs,
    Relations,
    Completeness,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Classes => "classes",
            Self::Terms => "terms",
            Self::Synonyms => "synonyms",
            Self::Xrefs => "xrefs",
            Self::Relations => "relations",
            Self::Completeness => "completeness",
        };
        f.write_str(s)
    }
}

/// Rows accepted per table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub classes: usize,
    pub terms: usize,
    pub withdrawn: usize,
    pub synonyms: usize,
    pub xrefs: usize,
    pub relations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure { errors: usize },
}

/// Everything a run found
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub diagnostics: Vec<Diagnostic>,
    pub findings: Vec<Finding>,
    pub counts: TableCounts,

    /// Stage at which a fail-fast run stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted_at: Option<Stage>,

    /// Absent when the run halted before the term table was read
    #[serde(skip)]
    pub index: Option<TermIndex>,
}

impl Outcome {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    pub fn status(&self) -> Status {
        match self.error_count() {
            0 => Status::Success,
            errors => Status::Failure { errors },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == Status::Success
    }

    /// Process exit status: 0 without errors, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Locations of the tables in a data directory
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, table: Table) -> PathBuf {
        self.root.join(table.file_name())
    }

    fn open(&self, table: Table) -> Result<TableReader<std::fs::File>> {
        TableReader::open(table, &self.path(table))
    }
}

#[derive(Debug, Default)]
struct RunState {
    stage: Stage,
    counts: TableCounts,
    index: Option<TermIndex>,
    findings: Vec<Finding>,
}

fn enter(stage: &mut Stage, next: Stage) {
    *stage = next;
    tracing::info!(stage = %next, "validating");
}

pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate every table under `dir`.
    ///
    /// Findings never make this return `Err`; only I/O, decoding and
    /// configuration problems do. A fail-fast halt is reported through
    /// [`Outcome::halted_at`].
    pub fn run(&self, dir: &Path) -> Result<Outcome> {
        let dir = DataDir::new(dir);
        let mut diags = Diagnostics::new(self.config.strictness);
        let mut state = RunState::default();

        let halted_at = match self.run_stages(&dir, &mut diags, &mut state) {
            Ok(()) => None,
            Err(Error::Halted(diagnostic)) => {
                tracing::warn!(stage = %state.stage, %diagnostic, "halted on fatal error");
                Some(state.stage)
            }
            Err(e) => return Err(e),
        };

        let outcome = Outcome {
            diagnostics: diags.into_vec(),
            findings: state.findings,
            counts: state.counts,
            halted_at,
            index: state.index,
        };
        tracing::info!(
            errors = outcome.error_count(),
            warnings = outcome.warning_count(),
            "validation finished"
        );
        Ok(outcome)
    }

    fn run_stages(
        &self,
        dir: &DataDir,
        diags: &mut Diagnostics,
        state: &mut RunState,
    ) -> Result<()> {
        let config = &self.config;
        let scheme = config.scheme()?;

        enter(&mut state.stage, Stage::Classes);
        let classes = ClassRegistry::load(dir.open(Table::Classes)?, diags)?;
        state.counts.classes = classes.len();

        let mut vocabulary = config.vocabulary();
        let authors_path = dir.path(Table::Authors);
        if authors_path.exists() {
            let authors = load_authors(dir.open(Table::Authors)?, diags)?;
            vocabulary.extend_curators(authors);
        }

        enter(&mut state.stage, Stage::Terms);
        let rules = TermRules {
            scheme: &scheme,
            classes: &classes,
            vocabulary: &vocabulary,
            withdrawn_marker: &config.withdrawn_marker,
            placeholder: &config.placeholder,
            ascii_name_cutoff_line: config.ascii_name_cutoff_line,
        };
        let terms = rules.load(dir.open(Table::Terms)?, diags)?;
        let index = &*state.index.insert(TermIndex::from_terms(
            config.namespace.clone(),
            scheme.clone(),
            &terms,
        ));
        state.counts.terms = index.len();
        state.counts.withdrawn = index.withdrawn_count();

        enter(&mut state.stage, Stage::Synonyms);
        let synonyms = check_synonyms(dir.open(Table::Synonyms)?, index, diags)?;
        state.counts.synonyms = synonyms.len();

        enter(&mut state.stage, Stage::Xrefs);
        let xrefs = check_xrefs(dir.open(Table::Xrefs)?, index, diags)?;
        state.counts.xrefs = xrefs.len();

        enter(&mut state.stage, Stage::Relations);
        let relations = check_relations(dir.open(Table::Relations)?, index, diags)?;
        state.counts.relations = relations.len();

        enter(&mut state.stage, Stage::Completeness);
        let completeness = Completeness::new(index, &xrefs, &relations, &config.xref_placeholders);
        state.findings = completeness.check_all(
            &config.completeness_rules,
            config.completeness_blocking,
            diags,
        )?;

        Ok(())
    }
}
