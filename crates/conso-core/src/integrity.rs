//! Referential integrity of the tables that point at terms
//!
//! Synonyms, xrefs and relations all go through [`scan`]: shape checks from
//! the table's schema, resolution of every local identifier against the term
//! index, the optional sort-order check, then any table-specific checks.

use std::io::Read;

use crate::diagnostics::{Category, Diagnostics};
use crate::error::Result;
use crate::index::{Resolution, TermIndex};
use crate::record::{Row, TableReader};
use crate::schema::{ReferenceColumn, TableSchema};

/// Scan a dependent table and return the rows that passed.
///
/// `extra` runs last on every well-shaped row and returns whether to keep it.
/// Rows with an unresolved reference are never kept.
pub fn scan<R, F>(
    schema: &TableSchema,
    reader: TableReader<R>,
    index: &TermIndex,
    diags: &mut Diagnostics,
    mut extra: F,
) -> Result<Vec<Row>>
where
    R: Read,
    F: FnMut(&Row, &mut Diagnostics) -> Result<bool>,
{
    let mut kept = Vec::new();
    let mut last_number = 0u64;
    for row in reader {
        let row = row?;
        if !schema.check_shape(&row, diags)? {
            continue;
        }

        let mut resolved = true;
        for column in schema.references {
            resolved &= check_reference(schema, &row, *column, index, diags)?;
        }

        if resolved && schema.monotonic {
            if let Some(number) = first_local_number(schema, &row, index) {
                if number < last_number {
                    diags.error(
                        schema.table,
                        row.line,
                        Category::Ordering,
                        format!(
                            "Not monotonic increasing: {} comes after {}",
                            index.scheme().format(number),
                            index.scheme().format(last_number)
                        ),
                    )?;
                } else {
                    last_number = number;
                }
            }
        }

        // table checks run on unresolved rows too; only passing rows are kept
        if extra(&row, diags)? && resolved {
            kept.push(row);
        }
    }
    tracing::debug!(table = %schema.table, kept = kept.len(), "scanned table");
    Ok(kept)
}

/// Returns whether the reference resolved (or is not local)
fn check_reference(
    schema: &TableSchema,
    row: &Row,
    column: ReferenceColumn,
    index: &TermIndex,
    diags: &mut Diagnostics,
) -> Result<bool> {
    let (identifier, name) = match column {
        ReferenceColumn::Local { identifier } => (identifier, None),
        ReferenceColumn::Namespaced {
            namespace,
            identifier,
            name,
        } => {
            if row.get(namespace) != index.namespace() {
                return Ok(true);
            }
            (identifier, Some(name))
        }
    };
    let value = row.get(identifier);
    let label = schema.columns[identifier];

    match index.resolve(value) {
        Resolution::Known(entry) => {
            if let Some(name) = name {
                let given = row.get(name);
                if given != entry.name {
                    diags.warning(
                        schema.table,
                        Some(row.line),
                        Category::Consistency,
                        format!(
                            "{} {:?} does not match the name of {} in terms.tsv ({:?})",
                            schema.columns[name], given, value, entry.name
                        ),
                    );
                }
            }
            Ok(true)
        }
        Resolution::Withdrawn => {
            diags.error(
                schema.table,
                row.line,
                Category::Referential,
                format!("Invalid {} {}: the term was withdrawn", label, value),
            )?;
            Ok(false)
        }
        Resolution::Unknown => {
            diags.error(
                schema.table,
                row.line,
                Category::Referential,
                format!("Invalid {} {}: not found in terms.tsv", label, value),
            )?;
            Ok(false)
        }
    }
}

fn first_local_number(schema: &TableSchema, row: &Row, index: &TermIndex) -> Option<u64> {
    schema.references.iter().find_map(|column| match *column {
        ReferenceColumn::Local { identifier } => index.scheme().parse(row.get(identifier)),
        ReferenceColumn::Namespaced {
            namespace,
            identifier,
            ..
        } if row.get(namespace) == index.namespace() => index.scheme().parse(row.get(identifier)),
        ReferenceColumn::Namespaced { .. } => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Strictness, Table};
    use crate::error::Error;
    use crate::identifier::IdentifierScheme;
    use crate::schema;
    use crate::term::Term;

    fn index() -> TermIndex {
        let mut terms: Vec<Term> = (1..=3)
            .map(|n| Term {
                identifier: format!("CONSO{:05}", n),
                number: n,
                curator: "cthoyt".to_string(),
                name: format!("term {}", n),
                class: "chemical".to_string(),
                references: Vec::new(),
                description: "d".to_string(),
                withdrawn: false,
            })
            .collect();
        terms.push(Term::withdrawn("CONSO00004", 4, "cthoyt"));
        TermIndex::from_terms("CONSO", IdentifierScheme::new("CONSO", 5).unwrap(), &terms)
    }

    fn scan_xrefs(body: &str, strictness: Strictness) -> (Result<Vec<Row>>, Diagnostics) {
        let input = format!("identifier\tdatabase\tdatabase_identifier\n{}", body);
        let mut diags = Diagnostics::new(strictness);
        let result = scan(
            &schema::XREFS,
            TableReader::from_reader(Table::Xrefs, input.as_bytes()),
            &index(),
            &mut diags,
            |_, _| Ok(true),
        );
        (result, diags)
    }

    #[test]
    fn test_unknown_and_withdrawn_references() {
        let (rows, diags) = scan_xrefs(
            "CONSO00001\tchebi\t1\nCONSO00009\tchebi\t2\nCONSO00004\tchebi\t3\n",
            Strictness::Accumulate,
        );
        assert_eq!(rows.unwrap().len(), 1);
        let messages: Vec<String> = diags.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "xrefs.tsv, line 3: Invalid identifier CONSO00009: not found in terms.tsv",
                "xrefs.tsv, line 4: Invalid identifier CONSO00004: the term was withdrawn",
            ]
        );
    }

    #[test]
    fn test_monotonic_order() {
        let (rows, diags) = scan_xrefs(
            "CONSO00001\tchebi\t1\nCONSO00003\tchebi\t2\nCONSO00002\tchebi\t3\nCONSO00003\tmesh\t4\n",
            Strictness::Accumulate,
        );
        assert_eq!(rows.unwrap().len(), 4);
        assert_eq!(diags.error_count(), 1);
        let d = diags.iter().next().unwrap();
        assert_eq!(d.category, Category::Ordering);
        assert_eq!(d.line, Some(4));
    }

    #[test]
    fn test_fail_fast_stops_at_first_unresolved() {
        let (result, diags) = scan_xrefs(
            "CONSO00009\tchebi\t1\nCONSO00008\tchebi\t2\n",
            Strictness::FailFast,
        );
        assert!(matches!(result, Err(Error::Halted(_))));
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_table_checks_run_on_unresolved_rows() {
        let input = "identifier\tdatabase\tdatabase_identifier\n\
                     CONSO00009\tchebi\t1\n\
                     CONSO00001\tchebi\t2\n";
        let mut diags = Diagnostics::new(Strictness::Accumulate);
        let mut seen = Vec::new();
        let rows = scan(
            &schema::XREFS,
            TableReader::from_reader(Table::Xrefs, input.as_bytes()),
            &index(),
            &mut diags,
            |row, _| {
                seen.push(row.line);
                Ok(true)
            },
        )
        .unwrap();
        assert_eq!(seen, vec![2, 3]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(0), "CONSO00001");
    }

    #[test]
    fn test_foreign_relation_endpoints_pass() {
        let input = "a\tb\tc\td\te\tf\tg\n\
                     CONSO\tCONSO00001\tterm 1\thas_role\tCHEBI\t35222\tinhibitor\n\
                     CHEBI\t15365\taspirin\tis_a\tCONSO\tCONSO00007\tnothing\n\
                     CONSO\tCONSO00002\twrong name\tis_a\tCONSO\tCONSO00003\tterm 3\n";
        let mut diags = Diagnostics::new(Strictness::Accumulate);
        let rows = scan(
            &schema::RELATIONS,
            TableReader::from_reader(Table::Relations, input.as_bytes()),
            &index(),
            &mut diags,
            |_, _| Ok(true),
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 1);
        assert!(diags
            .iter()
            .any(|d| d.is_error() && d.message.contains("target_identifier CONSO00007")));
    }
}
