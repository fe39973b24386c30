//! Validation settings
//!
//! Every field has a default matching the CONSO tables, so an empty TOML
//! document deserializes to a usable configuration.

use serde::{Deserialize, Serialize};

use crate::completeness::CompletenessRule;
use crate::diagnostics::Strictness;
use crate::error::Result;
use crate::identifier::IdentifierScheme;
use crate::vocabulary::Vocabulary;

pub const DEFAULT_NAMESPACE: &str = "CONSO";
pub const DEFAULT_IDENTIFIER_WIDTH: usize = 5;

/// Names after this line became subject to the ASCII rule
pub const DEFAULT_ASCII_NAME_CUTOFF_LINE: u64 = 346;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Namespace label and identifier prefix of the local terminology
    pub namespace: String,
    pub identifier_width: usize,
    pub strictness: Strictness,

    /// Treat completeness findings as errors
    pub completeness_blocking: bool,

    pub ascii_name_cutoff_line: u64,

    /// Extended by the first column of `authors.tsv` when that file exists
    pub curators: Vec<String>,

    /// Reference sources allowed in the term references column (lowercase)
    pub sources: Vec<String>,

    pub withdrawn_marker: String,
    pub placeholder: String,

    /// Xref database identifiers that stand in for a missing value
    pub xref_placeholders: Vec<String>,

    #[serde(rename = "completeness")]
    pub completeness_rules: Vec<CompletenessRule>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            identifier_width: DEFAULT_IDENTIFIER_WIDTH,
            strictness: Strictness::default(),
            completeness_blocking: false,
            ascii_name_cutoff_line: DEFAULT_ASCII_NAME_CUTOFF_LINE,
            curators: [
                "Charlie", "Rana", "Sandra", "Lingling", "Esther", "Kristian", "Daniel",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            sources: ["pmc", "pmid", "pubmed", "doi", "pubchem.compound", "ncit"]
                .into_iter()
                .map(String::from)
                .collect(),
            withdrawn_marker: "WITHDRAWN".to_string(),
            placeholder: ".".to_string(),
            xref_placeholders: ["?", "N/A", "n/a"]
                .into_iter()
                .map(String::from)
                .collect(),
            completeness_rules: CompletenessRule::default_rules(),
        }
    }
}

impl ValidationConfig {
    pub fn scheme(&self) -> Result<IdentifierScheme> {
        IdentifierScheme::new(self.namespace.clone(), self.identifier_width)
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(self.curators.iter(), self.sources.iter())
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn with_completeness_blocking(mut self, blocking: bool) -> Self {
        self.completeness_blocking = blocking;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: ValidationConfig = toml::from_str("").unwrap();
        assert_eq!(config, ValidationConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: ValidationConfig = toml::from_str(
            r#"
            namespace = "HBP"
            strictness = "fail-fast"
            curators = ["cthoyt"]

            [[completeness]]
            kind = "roles"
            class = "chemical"
            relations = ["has_role"]
            "#,
        )
        .unwrap();
        assert_eq!(config.namespace, "HBP");
        assert_eq!(config.strictness, Strictness::FailFast);
        assert_eq!(config.completeness_rules.len(), 1);
        assert_eq!(config.identifier_width, 5);
        assert!(config.vocabulary().is_curator("cthoyt"));
        assert_eq!(config.scheme().unwrap().format(3), "HBP00003");
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = ValidationConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: ValidationConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
