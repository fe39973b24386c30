//! Tab-separated table reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::diagnostics::Table;
use crate::error::{Error, Result};

/// One data row of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Physical line in the file; the header is line 1
    pub line: u64,
    pub fields: Vec<String>,
}

impl Row {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Field at `column`, or `""` when the row is too short
    pub fn get(&self, column: usize) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Streams the data rows of one table, skipping the header and blank lines.
///
/// Quoting is disabled: a `"` is an ordinary character in these tables, which
/// lets the term checks reject it in descriptions.
pub struct TableReader<R> {
    table: Table,
    inner: csv::Reader<R>,
    record: csv::StringRecord,
}

impl TableReader<File> {
    /// Open a table file. The file handle lives as long as the reader.
    pub fn open(table: Table, path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(%table, path = %path.display(), "opened table");
        Ok(Self::from_reader(table, file))
    }
}

impl<R: Read> TableReader<R> {
    pub fn from_reader(table: Table, reader: R) -> Self {
        let inner = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);
        Self {
            table,
            inner,
            record: csv::StringRecord::new(),
        }
    }
}

impl<R: Read> Iterator for TableReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.read_record(&mut self.record) {
                Ok(false) => return None,
                Ok(true) => {}
                Err(e) => return Some(Err(e.into())),
            }

            // a line of tabs is a row of empty fields, not a blank line
            if self.record.len() <= 1 && self.record.get(0).map_or(true, str::is_empty) {
                continue;
            }

            let line = self.record.position().map(|p| p.line()).unwrap_or(0);
            tracing::trace!(table = %self.table, line, "read row");
            let fields = self.record.iter().map(str::to_string).collect();
            return Some(Ok(Row::new(line, fields)));
        }
    }
}
