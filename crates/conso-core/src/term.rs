//! Terms and the term table checks

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Category, Diagnostics};
use crate::error::Result;
use crate::identifier::{IdentifierScheme, SchemeViolation, Sequence};
use crate::record::{Row, TableReader};
use crate::schema;
use crate::vocabulary::{ClassRegistry, Reference, Vocabulary};

const IDENTIFIER_COLUMN: usize = 0;
const CURATOR_COLUMN: usize = 1;
const NAME_COLUMN: usize = 2;
const WITHDRAWN_COLUMN: usize = 2;
const CLASS_COLUMN: usize = 3;
const REFERENCES_COLUMN: usize = 4;
const DESCRIPTION_COLUMN: usize = 5;

/// A term of the terminology (a row of `terms.tsv`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub identifier: String,

    /// Numeric suffix of the identifier, equal to the row position
    pub number: u64,

    pub curator: String,
    pub name: String,
    pub class: String,
    pub references: Vec<Reference>,
    pub description: String,

    /// Withdrawn terms keep their number; their content is retracted
    #[serde(default)]
    pub withdrawn: bool,
}

impl Term {
    pub fn withdrawn(
        identifier: impl Into<String>,
        number: u64,
        curator: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            number,
            curator: curator.into(),
            name: String::new(),
            class: String::new(),
            references: Vec::new(),
            description: String::new(),
            withdrawn: true,
        }
    }
}

/// Rules applied to every term row
#[derive(Debug, Clone)]
pub struct TermRules<'a> {
    pub scheme: &'a IdentifierScheme,
    pub classes: &'a ClassRegistry,
    pub vocabulary: &'a Vocabulary,
    pub withdrawn_marker: &'a str,
    pub placeholder: &'a str,

    /// Names on lines after this one must be ASCII
    pub ascii_name_cutoff_line: u64,
}

impl TermRules<'_> {
    /// Scan the term table. Rows with a bad identifier, a wrong field count or
    /// empty fields are reported and left out of the result; vocabulary
    /// problems are reported without excluding the row.
    pub fn load<R: Read>(
        &self,
        reader: TableReader<R>,
        diags: &mut Diagnostics,
    ) -> Result<Vec<Term>> {
        let mut sequence = self.scheme.sequence();
        let mut terms = Vec::new();
        let mut rejected = 0usize;
        for row in reader {
            let row = row?;
            match self.check_row(&row, &mut sequence, diags)? {
                Some(term) => terms.push(term),
                None => rejected += 1,
            }
        }
        tracing::debug!(accepted = terms.len(), rejected, "scanned term table");
        Ok(terms)
    }

    fn check_row(
        &self,
        row: &Row,
        sequence: &mut Sequence<'_>,
        diags: &mut Diagnostics,
    ) -> Result<Option<Term>> {
        let table = schema::TERMS.table;
        schema::TERMS.check_whitespace(row, diags)?;

        let identifier = row.get(IDENTIFIER_COLUMN);
        let number = match sequence.advance(identifier) {
            Ok(number) => number,
            Err(SchemeViolation::Malformed) => {
                diags.error(
                    table,
                    row.line,
                    Category::Identifier,
                    format!(
                        "Invalid identifier {:?}: expected {} followed by {} digits",
                        identifier,
                        self.scheme.prefix(),
                        self.scheme.width()
                    ),
                )?;
                return Ok(None);
            }
            Err(SchemeViolation::OutOfSequence { expected, .. }) => {
                diags.error(
                    table,
                    row.line,
                    Category::Identifier,
                    format!(
                        "Indexing scheme broken: {} (expected {})",
                        identifier,
                        self.scheme.format(expected)
                    ),
                )?;
                return Ok(None);
            }
        };

        if !schema::TERMS.check_width(row, diags)? {
            return Ok(None);
        }

        let curator = row.get(CURATOR_COLUMN);
        if row.get(WITHDRAWN_COLUMN) == self.withdrawn_marker {
            tracing::debug!(identifier, "term was withdrawn");
            let retracted = &row.fields[WITHDRAWN_COLUMN + 1..];
            if retracted.iter().any(|field| field != self.placeholder) {
                diags.error(
                    table,
                    row.line,
                    Category::Structural,
                    format!(
                        "Wrong formatting for withdrawn term {}: use {:?} as placeholders",
                        identifier, self.placeholder
                    ),
                )?;
            }
            return Ok(Some(Term::withdrawn(identifier, number, curator)));
        }

        let complete = schema::TERMS.check_required(row, diags)?;

        let name = row.get(NAME_COLUMN);
        if row.line > self.ascii_name_cutoff_line && !name.is_ascii() {
            diags.error(
                table,
                row.line,
                Category::Vocabulary,
                format!("Name contains non-ASCII characters: {}", name),
            )?;
        }

        if !curator.is_empty() && !self.vocabulary.is_curator(curator) {
            diags.error(
                table,
                row.line,
                Category::Vocabulary,
                format!("Invalid curator: {}", curator),
            )?;
        }

        let class = row.get(CLASS_COLUMN);
        if !class.is_empty() && !self.classes.contains(class) {
            diags.error(
                table,
                row.line,
                Category::Vocabulary,
                format!("Invalid class: {}", class),
            )?;
        }

        let mut references = Vec::new();
        let field = row.get(REFERENCES_COLUMN);
        if !field.is_empty() {
            let (parsed, problems) = self.vocabulary.check_references(field);
            for problem in problems {
                diags.error(table, row.line, Category::Vocabulary, problem)?;
            }
            references = parsed;
        }

        let description = row.get(DESCRIPTION_COLUMN);
        if description.contains('"') {
            diags.error(
                table,
                row.line,
                Category::Vocabulary,
                "Cannot use double quote in description column",
            )?;
        }

        if !complete {
            return Ok(None);
        }

        Ok(Some(Term {
            identifier: identifier.to_string(),
            number,
            curator: curator.to_string(),
            name: name.to_string(),
            class: class.to_string(),
            references,
            description: description.to_string(),
            withdrawn: false,
        }))
    }
}
