//! Domain completeness rules
//!
//! These run after the structural and referential checks and only report:
//! which members of a class lack a role, a cross-reference or a relation.
//! Each missing entry comes with a template row for the table that would fix
//! it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Category, Diagnostic, Diagnostics, Table};
use crate::error::Result;
use crate::index::TermIndex;
use crate::relation::Relation;
use crate::xref::Xref;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CompletenessRule {
    /// Every member of `class` is the source of at least one of `relations`
    Roles {
        class: String,
        relations: Vec<String>,
    },
    /// Every member of `class` has an xref to each of `databases`
    Xrefs {
        class: String,
        databases: Vec<String>,
    },
    /// Every member of `class` is the source of `relation`
    Relation {
        class: String,
        relation: String,
        /// Namespace expected for the target, used in suggestions
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
    },
}

impl CompletenessRule {
    pub fn default_rules() -> Vec<Self> {
        vec![
            Self::Xrefs {
                class: "isoform".to_string(),
                databases: vec!["uniprot.isoform".to_string()],
            },
            Self::Relation {
                class: "isoform".to_string(),
                relation: "has_reference_protein".to_string(),
                namespace: Some("uniprot".to_string()),
            },
            Self::Relation {
                class: "protein isoform family".to_string(),
                relation: "has_reference_protein".to_string(),
                namespace: Some("uniprot".to_string()),
            },
            Self::Xrefs {
                class: "chemical".to_string(),
                databases: vec!["inchi".to_string(), "smiles".to_string()],
            },
            Self::Roles {
                class: "chemical".to_string(),
                relations: ["has_role", "inhibitor_of", "agonist_of", "antagonist_of"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            },
            Self::Relation {
                class: "antibody".to_string(),
                relation: "has_antibody_target".to_string(),
                namespace: None,
            },
        ]
    }

    pub fn class(&self) -> &str {
        match self {
            Self::Roles { class, .. } | Self::Xrefs { class, .. } | Self::Relation { class, .. } => {
                class
            }
        }
    }
}

/// A term that fails a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub identifier: String,
    pub name: String,
    /// Tab-separated template row for the table that would fix it
    pub suggestion: String,
}

/// Result of one rule (one database, for xref rules) that found gaps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub class: String,
    pub requirement: String,
    pub table: Table,
    pub total: usize,
    /// Sorted by identifier
    pub missing: Vec<MissingEntry>,
}

impl Finding {
    pub fn summary(&self) -> String {
        format!(
            "{} missing {} ({}/{})",
            self.class,
            self.requirement,
            self.missing.len(),
            self.total
        )
    }
}

/// Lookups over the validated xrefs and relations, built once per run
#[derive(Debug)]
pub struct Completeness<'a> {
    index: &'a TermIndex,
    xrefs_by_database: HashMap<&'a str, HashSet<&'a str>>,
    sources_by_relation: HashMap<&'a str, HashSet<&'a str>>,
}

impl<'a> Completeness<'a> {
    /// `placeholders` are database identifiers that do not count as an xref
    pub fn new(
        index: &'a TermIndex,
        xrefs: &'a [Xref],
        relations: &'a [Relation],
        placeholders: &[String],
    ) -> Self {
        let mut xrefs_by_database: HashMap<&str, HashSet<&str>> = HashMap::new();
        for xref in xrefs.iter().filter(|x| !x.is_placeholder(placeholders)) {
            xrefs_by_database
                .entry(xref.database.as_str())
                .or_default()
                .insert(xref.identifier.as_str());
        }

        let mut sources_by_relation: HashMap<&str, HashSet<&str>> = HashMap::new();
        for relation in relations
            .iter()
            .filter(|r| r.source.is_local(index.namespace()))
        {
            sources_by_relation
                .entry(relation.relation.as_str())
                .or_default()
                .insert(relation.source.identifier.as_str());
        }

        Self {
            index,
            xrefs_by_database,
            sources_by_relation,
        }
    }

    fn is_source_of(&self, relation: &str, identifier: &str) -> bool {
        self.sources_by_relation
            .get(relation)
            .is_some_and(|sources| sources.contains(identifier))
    }

    fn has_xref(&self, database: &str, identifier: &str) -> bool {
        self.xrefs_by_database
            .get(database)
            .is_some_and(|ids| ids.contains(identifier))
    }

    /// Evaluate one rule. Returns only findings with at least one gap.
    pub fn check(&self, rule: &CompletenessRule) -> Vec<Finding> {
        let namespace = self.index.namespace();
        let members: Vec<(&str, &str)> = self.index.members_of(rule.class()).collect();
        let total = members.len();

        let findings = match rule {
            CompletenessRule::Roles { class, relations } => {
                let missing = members
                    .iter()
                    .filter(|(id, _)| !relations.iter().any(|r| self.is_source_of(r, id)))
                    .map(|(id, name)| MissingEntry {
                        identifier: id.to_string(),
                        name: name.to_string(),
                        suggestion: format!(
                            "{}\t{}\t{}\t{}\t?\t?\t?",
                            namespace,
                            id,
                            name,
                            relations.first().map(String::as_str).unwrap_or("?")
                        ),
                    })
                    .collect();
                vec![Finding {
                    class: class.clone(),
                    requirement: format!("role ({})", relations.join(", ")),
                    table: Table::Relations,
                    total,
                    missing,
                }]
            }
            CompletenessRule::Xrefs { class, databases } => databases
                .iter()
                .map(|database| Finding {
                    class: class.clone(),
                    requirement: format!("xref to {}", database),
                    table: Table::Xrefs,
                    total,
                    missing: members
                        .iter()
                        .filter(|(id, _)| !self.has_xref(database, id))
                        .map(|(id, name)| MissingEntry {
                            identifier: id.to_string(),
                            name: name.to_string(),
                            suggestion: format!("{}\t{}\t?", id, database),
                        })
                        .collect(),
                })
                .collect(),
            CompletenessRule::Relation {
                class,
                relation,
                namespace: target_namespace,
            } => {
                let missing = members
                    .iter()
                    .filter(|(id, _)| !self.is_source_of(relation, id))
                    .map(|(id, name)| MissingEntry {
                        identifier: id.to_string(),
                        name: name.to_string(),
                        suggestion: format!(
                            "{}\t{}\t{}\t{}\t{}\t?\t?",
                            namespace,
                            id,
                            name,
                            relation,
                            target_namespace.as_deref().unwrap_or("?")
                        ),
                    })
                    .collect();
                vec![Finding {
                    class: class.clone(),
                    requirement: format!("relation {}", relation),
                    table: Table::Relations,
                    total,
                    missing,
                }]
            }
        };

        findings
            .into_iter()
            .filter(|f| !f.missing.is_empty())
            .collect()
    }

    /// Evaluate every rule and record one summary diagnostic per finding.
    /// Findings are errors only when `blocking` is set.
    pub fn check_all(
        &self,
        rules: &[CompletenessRule],
        blocking: bool,
        diags: &mut Diagnostics,
    ) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for rule in rules {
            for finding in self.check(rule) {
                let summary = finding.summary();
                tracing::info!(%summary, "completeness gap");
                let diagnostic = if blocking {
                    Diagnostic::error(finding.table, None, Category::Completeness, summary)
                } else {
                    Diagnostic::warning(finding.table, None, Category::Completeness, summary)
                };
                diags.record(diagnostic)?;
                findings.push(finding);
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Strictness;
    use crate::identifier::IdentifierScheme;
    use crate::relation::Endpoint;
    use crate::term::Term;

    fn term(n: u64, name: &str, class: &str) -> Term {
        Term {
            identifier: format!("CONSO{:05}", n),
            number: n,
            curator: "cthoyt".to_string(),
            name: name.to_string(),
            class: class.to_string(),
            references: Vec::new(),
            description: "d".to_string(),
            withdrawn: false,
        }
    }

    fn index() -> TermIndex {
        let terms = vec![
            term(1, "aspirin", "chemical"),
            term(2, "APP isoform 1", "isoform"),
            term(3, "ibuprofen", "chemical"),
            term(4, "tau", "protein"),
            term(5, "celecoxib", "chemical"),
        ];
        TermIndex::from_terms("CONSO", IdentifierScheme::new("CONSO", 5).unwrap(), &terms)
    }

    fn relation(source: &str, rel: &str) -> Relation {
        Relation {
            source: Endpoint::new("CONSO", source, "x"),
            relation: rel.to_string(),
            target: Endpoint::new("HGNC", "1", "y"),
        }
    }

    fn xref(id: &str, db: &str, db_id: &str) -> Xref {
        Xref {
            identifier: id.to_string(),
            database: db.to_string(),
            database_identifier: db_id.to_string(),
        }
    }

    #[test]
    fn test_missing_roles_sorted() {
        let index = index();
        let relations = vec![
            relation("CONSO00003", "inhibitor_of"),
            relation("CONSO00004", "has_role"),
        ];
        let completeness = Completeness::new(&index, &[], &relations, &[]);
        let rule = CompletenessRule::Roles {
            class: "chemical".to_string(),
            relations: vec!["has_role".to_string(), "inhibitor_of".to_string()],
        };

        let findings = completeness.check(&rule);
        assert_eq!(findings.len(), 1);
        let ids: Vec<&str> = findings[0]
            .missing
            .iter()
            .map(|m| m.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["CONSO00001", "CONSO00005"]);
        assert_eq!(
            findings[0].summary(),
            "chemical missing role (has_role, inhibitor_of) (2/3)"
        );
    }

    #[test]
    fn test_foreign_sources_do_not_count() {
        let index = index();
        let relations = vec![Relation {
            source: Endpoint::new("CHEBI", "CONSO00001", "aspirin"),
            relation: "has_role".to_string(),
            target: Endpoint::new("CHEBI", "35475", "NSAID"),
        }];
        let completeness = Completeness::new(&index, &[], &relations, &[]);
        let rule = CompletenessRule::Roles {
            class: "chemical".to_string(),
            relations: vec!["has_role".to_string()],
        };
        assert_eq!(completeness.check(&rule)[0].missing.len(), 3);
    }

    #[test]
    fn test_xrefs_per_database_and_placeholders() {
        let index = index();
        let xrefs = vec![
            xref("CONSO00001", "inchi", "InChI=1S/C9H8O4"),
            xref("CONSO00001", "smiles", "CC(=O)OC1=CC=CC=C1C(=O)O"),
            xref("CONSO00003", "inchi", "?"),
            xref("CONSO00005", "inchi", "InChI=1S/C17H14F3N3O2S"),
        ];
        let placeholders = vec!["?".to_string()];
        let completeness = Completeness::new(&index, &xrefs, &[], &placeholders);
        let rule = CompletenessRule::Xrefs {
            class: "chemical".to_string(),
            databases: vec!["inchi".to_string(), "smiles".to_string()],
        };

        let findings = completeness.check(&rule);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].requirement, "xref to inchi");
        assert_eq!(findings[0].missing.len(), 1);
        assert_eq!(findings[0].missing[0].suggestion, "CONSO00003\tinchi\t?");
        assert_eq!(findings[1].missing.len(), 2);
    }

    #[test]
    fn test_relation_suggests_namespace() {
        let index = index();
        let completeness = Completeness::new(&index, &[], &[], &[]);
        let rule = CompletenessRule::Relation {
            class: "isoform".to_string(),
            relation: "has_reference_protein".to_string(),
            namespace: Some("uniprot".to_string()),
        };
        let findings = completeness.check(&rule);
        assert_eq!(
            findings[0].missing[0].suggestion,
            "CONSO\tCONSO00002\tAPP isoform 1\thas_reference_protein\tuniprot\t?\t?"
        );
    }

    #[test]
    fn test_check_all_blocking() {
        let index = index();
        let completeness = Completeness::new(&index, &[], &[], &[]);
        let rules = CompletenessRule::default_rules();

        let mut diags = Diagnostics::new(Strictness::Accumulate);
        let findings = completeness.check_all(&rules, false, &mut diags).unwrap();
        assert!(!findings.is_empty());
        assert!(diags.is_clean());
        assert_eq!(diags.warning_count(), findings.len());

        let mut diags = Diagnostics::new(Strictness::Accumulate);
        completeness.check_all(&rules, true, &mut diags).unwrap();
        assert_eq!(diags.error_count(), findings.len());
    }

    #[test]
    fn test_rules_from_toml() {
        let input = r#"
            [[rules]]
            kind = "relation"
            class = "antibody"
            relation = "has_antibody_target"

            [[rules]]
            kind = "xrefs"
            class = "chemical"
            databases = ["inchi"]
        "#;
        #[derive(Deserialize)]
        struct Wrapper {
            rules: Vec<CompletenessRule>,
        }
        let wrapper: Wrapper = toml::from_str(input).unwrap();
        assert_eq!(wrapper.rules.len(), 2);
        assert_eq!(wrapper.rules[0].class(), "antibody");
    }
}
