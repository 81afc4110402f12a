//! Canonical field resolution over heterogeneous export headers.
//!
//! Jira exports the same semantic column under different names depending on
//! the export tool vintage and the instance language (this codebase has to
//! cope with English and Portuguese installs). The alias table below maps
//! each canonical field to its known header spellings, ranked by
//! preference: for single-value lookups the first alias that yields a
//! non-empty value wins. Matching is case-sensitive and exact on purpose;
//! anything fuzzier has historically matched the wrong column.

use itertools::Itertools;

use crate::tabular::RawRow;

/// Semantic column names independent of the export's actual header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    IssueKey,
    Summary,
    IssueType,
    Status,
    Project,
    FixVersion,
    CreatedDate,
    ResolvedDate,
    OriginalEstimate,
    TimeSpent,
    ParentKey,
}

impl CanonicalField {
    /// Accepted header spellings, most preferred first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::IssueKey => &["Issue key", "Chave da item", "Chave", "Key"],
            CanonicalField::Summary => &["Summary", "Resumo"],
            CanonicalField::IssueType => &["Issue Type", "Tipo de item", "Tipo de Item"],
            CanonicalField::Status => &["Status", "Situação"],
            CanonicalField::Project => {
                &["Project name", "Project key", "Nome do projeto", "Projeto"]
            }
            CanonicalField::FixVersion => &[
                "Fix Version/s",
                "Fix versions",
                "Versões corrigidas",
                "Versão de Correção",
            ],
            CanonicalField::CreatedDate => &["Created", "Criado", "Criada"],
            CanonicalField::ResolvedDate => &["Resolved", "Resolvido", "Resolvida"],
            CanonicalField::OriginalEstimate => &[
                "Original estimate",
                "Original Estimate",
                "Estimativa original",
                "Σ Original Estimate",
            ],
            CanonicalField::TimeSpent => &["Time Spent", "Tempo Gasto", "Σ Time Spent"],
            CanonicalField::ParentKey => &["Parent", "Parent key", "Item pai", "Pai"],
        }
    }
}

/// First non-empty value among the field's aliases, in alias rank order.
pub fn find_column<'a>(row: &'a RawRow, field: CanonicalField) -> Option<&'a str> {
    field
        .aliases()
        .iter()
        .filter_map(|alias| row.get(alias))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Every non-empty value held by the field's aliases, including
/// duplicate-suffixed columns (`alias`, `alias_2`, `alias_3`, ...).
///
/// Order follows column iteration order, not alias rank, and values are
/// deduplicated by equality.
pub fn find_all_column_values(row: &RawRow, field: CanonicalField) -> Vec<String> {
    row.columns()
        .filter(|(header, _)| header_matches_any_alias(header, field.aliases()))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unique()
        .collect()
}

fn header_matches_any_alias(header: &str, aliases: &[&str]) -> bool {
    aliases.iter().any(|alias| {
        if header == *alias {
            return true;
        }
        header
            .strip_prefix(alias)
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::parse;

    #[test]
    fn find_column_prefers_earlier_aliases() {
        let rows = parse("Chave,Issue key\nignored,PROJ-7\n").unwrap();
        assert_eq!(
            find_column(&rows[0], CanonicalField::IssueKey),
            Some("PROJ-7")
        );
    }

    #[test]
    fn find_column_skips_empty_values() {
        let rows = parse("Issue key,Chave\n,PROJ-3\n").unwrap();
        assert_eq!(
            find_column(&rows[0], CanonicalField::IssueKey),
            Some("PROJ-3")
        );
    }

    #[test]
    fn find_column_is_case_sensitive() {
        let rows = parse("issue KEY\nPROJ-1\n").unwrap();
        assert_eq!(find_column(&rows[0], CanonicalField::IssueKey), None);
    }

    #[test]
    fn find_all_values_spans_duplicate_suffixed_columns() {
        let rows = parse(
            "Issue key,Versões corrigidas,Versões corrigidas,Versões corrigidas\n\
             PROJ-1,1.0,1.2,\n",
        )
        .unwrap();
        let versions = find_all_column_values(&rows[0], CanonicalField::FixVersion);
        assert_eq!(versions, vec!["1.0".to_string(), "1.2".to_string()]);
    }

    #[test]
    fn find_all_values_deduplicates_repeats() {
        let rows = parse("Fix Version/s,Fix Version/s\n2.0,2.0\n").unwrap();
        let versions = find_all_column_values(&rows[0], CanonicalField::FixVersion);
        assert_eq!(versions, vec!["2.0".to_string()]);
    }

    #[test]
    fn suffix_matching_requires_all_digits() {
        assert!(header_matches_any_alias(
            "Fix Version/s_2",
            &["Fix Version/s"]
        ));
        assert!(!header_matches_any_alias(
            "Fix Version/s_2a",
            &["Fix Version/s"]
        ));
        assert!(!header_matches_any_alias(
            "Fix Version/s_",
            &["Fix Version/s"]
        ));
    }
}
