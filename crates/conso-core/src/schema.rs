//! Table schemas and the shape checks shared by every table
//!
//! A schema describes what a table looks like: its columns, whether empty
//! fields are allowed, which columns hold local term identifiers and whether
//! those must be sorted. The semantic checks live with each table's module;
//! everything structural is decided here.

use crate::diagnostics::{Category, Diagnostics, Table};
use crate::error::Result;
use crate::record::Row;

/// A column holding a reference to a term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceColumn {
    /// Always an identifier of the local terminology
    Local { identifier: usize },
    /// Local only when the namespace column names the local terminology
    Namespaced {
        namespace: usize,
        identifier: usize,
        name: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: Table,
    pub columns: &'static [&'static str],
    /// Reject rows with an empty field
    pub require_all: bool,
    /// Report whitespace around every field, not only at the end of the row
    pub check_padding: bool,
    pub references: &'static [ReferenceColumn],
    /// Local identifiers must appear in non-decreasing order
    pub monotonic: bool,
}

pub const CLASSES: TableSchema = TableSchema {
    table: Table::Classes,
    columns: &["class_name", "encoding"],
    require_all: true,
    check_padding: true,
    references: &[],
    monotonic: false,
};

pub const AUTHORS: TableSchema = TableSchema {
    table: Table::Authors,
    columns: &["orcid", "name"],
    require_all: true,
    check_padding: false,
    references: &[],
    monotonic: false,
};

pub const TERMS: TableSchema = TableSchema {
    table: Table::Terms,
    columns: &[
        "identifier",
        "curator",
        "name",
        "class",
        "references",
        "description",
    ],
    require_all: true,
    check_padding: true,
    references: &[],
    monotonic: false,
};

pub const SYNONYMS: TableSchema = TableSchema {
    table: Table::Synonyms,
    columns: &["identifier", "synonym", "reference", "specificity"],
    require_all: true,
    check_padding: false,
    references: &[ReferenceColumn::Local { identifier: 0 }],
    monotonic: true,
};

pub const XREFS: TableSchema = TableSchema {
    table: Table::Xrefs,
    columns: &["identifier", "database", "database_identifier"],
    require_all: true,
    check_padding: false,
    references: &[ReferenceColumn::Local { identifier: 0 }],
    monotonic: true,
};

pub const RELATIONS: TableSchema = TableSchema {
    table: Table::Relations,
    columns: &[
        "source_namespace",
        "source_identifier",
        "source_name",
        "relation",
        "target_namespace",
        "target_identifier",
        "target_name",
    ],
    require_all: true,
    check_padding: false,
    references: &[
        ReferenceColumn::Namespaced {
            namespace: 0,
            identifier: 1,
            name: 2,
        },
        ReferenceColumn::Namespaced {
            namespace: 4,
            identifier: 5,
            name: 6,
        },
    ],
    monotonic: false,
};

impl TableSchema {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Report stray whitespace. Never excludes the row.
    pub fn check_whitespace(&self, row: &Row, diags: &mut Diagnostics) -> Result<()> {
        let last = row.len().saturating_sub(1);
        for (column, field) in row.fields.iter().enumerate() {
            let trailing = field.ends_with(char::is_whitespace);
            if column == last && trailing {
                diags.error(
                    self.table,
                    row.line,
                    Category::Structural,
                    "Trailing whitespace",
                )?;
                if !self.check_padding {
                    break;
                }
                if field.starts_with(char::is_whitespace) {
                    self.report_padding(row, column, field, diags)?;
                }
                continue;
            }
            if self.check_padding && field.trim() != field {
                self.report_padding(row, column, field, diags)?;
            }
        }
        Ok(())
    }

    fn report_padding(
        &self,
        row: &Row,
        column: usize,
        field: &str,
        diags: &mut Diagnostics,
    ) -> Result<()> {
        diags.error(
            self.table,
            row.line,
            Category::Structural,
            format!("Extra whitespace in column {}: {:?}", column + 1, field),
        )
    }

    /// Check the field count. Returns `false` when the row must be excluded.
    pub fn check_width(&self, row: &Row, diags: &mut Diagnostics) -> Result<bool> {
        let expected = self.width();
        let found = row.len();
        if found < expected {
            diags.error(
                self.table,
                row.line,
                Category::Structural,
                format!(
                    "Not enough fields (only found {}/{}): {:?}",
                    found, expected, row.fields
                ),
            )?;
            return Ok(false);
        }
        if found > expected {
            diags.error(
                self.table,
                row.line,
                Category::Structural,
                format!(
                    "Too many fields (found {}/{}): {:?}",
                    found, expected, row.fields
                ),
            )?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Check for empty fields. Returns `false` when the row must be excluded.
    pub fn check_required(&self, row: &Row, diags: &mut Diagnostics) -> Result<bool> {
        if !self.require_all {
            return Ok(true);
        }
        let missing: Vec<&str> = row
            .fields
            .iter()
            .zip(self.columns)
            .filter(|(field, _)| field.is_empty())
            .map(|(_, column)| *column)
            .collect();
        if missing.is_empty() {
            return Ok(true);
        }
        diags.error(
            self.table,
            row.line,
            Category::Structural,
            format!("Missing entries ({}): {:?}", missing.join(", "), row.fields),
        )?;
        Ok(false)
    }

    /// All structural checks in order. Returns `false` when the row must be
    /// excluded from further processing.
    pub fn check_shape(&self, row: &Row, diags: &mut Diagnostics) -> Result<bool> {
        self.check_whitespace(row, diags)?;
        if !self.check_width(row, diags)? {
            return Ok(false);
        }
        self.check_required(row, diags)
    }
}
