//! Synonyms (rows of `synonyms.tsv`)

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Category, Diagnostics};
use crate::error::Result;
use crate::index::TermIndex;
use crate::integrity;
use crate::record::TableReader;
use crate::schema;

const SPECIFICITY_COLUMN: usize = 3;

/// How closely a synonym matches its term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specificity {
    #[serde(rename = "EXACT")]
    Exact,
    #[serde(rename = "BROAD")]
    Broad,
    #[serde(rename = "NARROW")]
    Narrow,
    #[serde(rename = "RELATED")]
    Related,
    /// Not yet curated
    #[serde(rename = "?")]
    Unknown,
}

impl Specificity {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EXACT" => Some(Self::Exact),
            "BROAD" => Some(Self::Broad),
            "NARROW" => Some(Self::Narrow),
            "RELATED" => Some(Self::Related),
            "?" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "EXACT",
            Self::Broad => "BROAD",
            Self::Narrow => "NARROW",
            Self::Related => "RELATED",
            Self::Unknown => "?",
        }
    }
}

impl std::fmt::Display for Specificity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub identifier: String,
    pub synonym: String,
    pub references: Vec<String>,
    pub specificity: Specificity,
}

/// Validate `synonyms.tsv` against the term index
pub fn check_synonyms<R: Read>(
    reader: TableReader<R>,
    index: &TermIndex,
    diags: &mut Diagnostics,
) -> Result<Vec<Synonym>> {
    let schema = schema::SYNONYMS;
    let rows = integrity::scan(&schema, reader, index, diags, |row, diags| {
        if Specificity::parse(row.get(SPECIFICITY_COLUMN)).is_some() {
            return Ok(true);
        }
        diags.error(
            schema.table,
            row.line,
            Category::Vocabulary,
            format!("Invalid specificity: {}", row.get(SPECIFICITY_COLUMN)),
        )?;
        Ok(false)
    })?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let specificity = Specificity::parse(row.get(SPECIFICITY_COLUMN))?;
            Some(Synonym {
                identifier: row.get(0).to_string(),
                synonym: row.get(1).to_string(),
                references: row
                    .get(2)
                    .split(',')
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect(),
                specificity,
            })
        })
        .collect())
}
