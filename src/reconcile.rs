//! Column reconciliation: compound-name splitting and ordered alias merging.
//!
//! Runs once over the fully merged dataset: a legacy column present in only
//! some source files still has to coalesce against the preferred column from
//! the rest, so alias resolution must see the complete column set.

use log::{debug, info};

use crate::{
    dataset::Dataset,
    data::Value,
    mappings::{self, AliasRule, NameSplitRule},
};

/// Applies the standard split and alias rules to the merged dataset.
pub fn reconcile(dataset: &mut Dataset) {
    apply_name_split(dataset, &mappings::AGENT_ATTORNEY_SPLIT);
    apply_alias_rules(dataset, mappings::ALIAS_RULES);
}

/// Splits a compound "Last, First" column into its two name parts.
///
/// The string splits on the first comma; both halves are trimmed. With no
/// comma the whole trimmed value lands in the last-name column and the
/// first-name cell is absent. The source column is removed. A dataset
/// without the source column is left untouched.
pub fn apply_name_split(dataset: &mut Dataset, rule: &NameSplitRule) {
    let Some(cells) = dataset.remove_column(rule.source) else {
        debug!("Column '{}' not present; skipping name split", rule.source);
        return;
    };

    let mut last_names = Vec::with_capacity(cells.len());
    let mut first_names = Vec::with_capacity(cells.len());
    for cell in cells {
        let (last, first) = match cell.as_ref().and_then(Value::as_str) {
            Some(compound) => match compound.split_once(',') {
                Some((left, right)) => (non_empty(left), non_empty(right)),
                None => (non_empty(compound), None),
            },
            None => (None, None),
        };
        last_names.push(last);
        first_names.push(first);
    }

    dataset.push_column(rule.last, last_names);
    dataset.push_column(rule.first, first_names);
    info!(
        "Split '{}' into '{}' and '{}'",
        rule.source, rule.last, rule.first
    );
}

/// Applies the alias rules strictly in declared order.
///
/// Values are only relocated or coalesced, never fabricated: with both
/// columns present the preferred value wins per record and the legacy
/// column is dropped; a lone legacy column is renamed; otherwise the rule
/// is a no-op.
pub fn apply_alias_rules(dataset: &mut Dataset, rules: &[AliasRule]) {
    for rule in rules {
        let has_preferred = dataset.has_column(rule.preferred);
        let has_legacy = dataset.has_column(rule.legacy);
        match (has_preferred, has_legacy) {
            (true, true) => {
                let legacy_cells = dataset
                    .remove_column(rule.legacy)
                    .unwrap_or_default();
                let mut incoming = legacy_cells.into_iter();
                dataset.map_column(rule.preferred, |cell| {
                    let fallback = incoming.next().flatten();
                    cell.or(fallback)
                });
                info!("Coalesced '{}' into '{}'", rule.legacy, rule.preferred);
            }
            (false, true) => {
                dataset.rename_column(rule.legacy, rule.preferred);
                info!("Renamed '{}' to '{}'", rule.legacy, rule.preferred);
            }
            (true, false) => {
                debug!(
                    "Legacy column '{}' not present; keeping '{}'",
                    rule.legacy, rule.preferred
                );
            }
            (false, false) => {
                debug!(
                    "Neither '{}' nor '{}' present; rule skipped",
                    rule.preferred, rule.legacy
                );
            }
        }
    }
}

fn non_empty(value: &str) -> Option<Value> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Value::String(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Option<Value> {
        Some(Value::String(value.to_string()))
    }

    const SPLIT: NameSplitRule = NameSplitRule {
        source: "AGENT_ATTORNEY_NAME",
        last: "AGENT_ATTORNEY_LAST_NAME",
        first: "AGENT_ATTORNEY_FIRST_NAME",
    };

    #[test]
    fn split_divides_on_first_comma_and_trims() {
        let mut ds = Dataset::from_rows(
            vec!["AGENT_ATTORNEY_NAME".to_string()],
            vec![vec![text("Doe, Jane")], vec![text(" Roe ,  John, Jr. ")]],
        );
        apply_name_split(&mut ds, &SPLIT);

        assert!(!ds.has_column("AGENT_ATTORNEY_NAME"));
        assert_eq!(ds.cell("AGENT_ATTORNEY_LAST_NAME", 0), Some(&Value::String("Doe".into())));
        assert_eq!(ds.cell("AGENT_ATTORNEY_FIRST_NAME", 0), Some(&Value::String("Jane".into())));
        assert_eq!(ds.cell("AGENT_ATTORNEY_LAST_NAME", 1), Some(&Value::String("Roe".into())));
        assert_eq!(
            ds.cell("AGENT_ATTORNEY_FIRST_NAME", 1),
            Some(&Value::String("John, Jr.".into()))
        );
    }

    #[test]
    fn split_without_comma_fills_only_the_last_name() {
        let mut ds = Dataset::from_rows(
            vec!["AGENT_ATTORNEY_NAME".to_string()],
            vec![vec![text("Acme Corp")], vec![None]],
        );
        apply_name_split(&mut ds, &SPLIT);

        assert_eq!(ds.cell("AGENT_ATTORNEY_LAST_NAME", 0), Some(&Value::String("Acme Corp".into())));
        assert_eq!(ds.cell("AGENT_ATTORNEY_FIRST_NAME", 0), None);
        assert_eq!(ds.cell("AGENT_ATTORNEY_LAST_NAME", 1), None);
        assert_eq!(ds.cell("AGENT_ATTORNEY_FIRST_NAME", 1), None);
    }

    #[test]
    fn split_is_a_noop_without_the_source_column() {
        let mut ds = Dataset::from_rows(vec!["OTHER".to_string()], vec![vec![text("x")]]);
        apply_name_split(&mut ds, &SPLIT);
        assert_eq!(ds.column_names(), &["OTHER"]);
    }

    #[test]
    fn alias_merge_prefers_populated_preferred_values() {
        let mut ds = Dataset::from_rows(
            vec!["TOTAL_WORKERS".to_string(), "TOTAL WORKERS".to_string()],
            vec![
                vec![text("5"), text("9")],
                vec![None, text("3")],
                vec![text("2"), None],
            ],
        );
        apply_alias_rules(
            &mut ds,
            &[AliasRule { preferred: "TOTAL_WORKERS", legacy: "TOTAL WORKERS" }],
        );

        assert!(!ds.has_column("TOTAL WORKERS"));
        assert_eq!(ds.cell("TOTAL_WORKERS", 0), Some(&Value::String("5".into())));
        assert_eq!(ds.cell("TOTAL_WORKERS", 1), Some(&Value::String("3".into())));
        assert_eq!(ds.cell("TOTAL_WORKERS", 2), Some(&Value::String("2".into())));
    }

    #[test]
    fn lone_legacy_column_is_renamed() {
        let mut ds = Dataset::from_rows(
            vec!["NAIC_CODE".to_string()],
            vec![vec![text("541511")]],
        );
        apply_alias_rules(
            &mut ds,
            &[AliasRule { preferred: "NAICS_CODE", legacy: "NAIC_CODE" }],
        );

        assert_eq!(ds.column_names(), &["NAICS_CODE"]);
        assert_eq!(ds.cell("NAICS_CODE", 0), Some(&Value::String("541511".into())));
    }

    #[test]
    fn later_rules_see_names_settled_by_earlier_rules() {
        // H_1B_DEPENDENT must coalesce into the column the first rule
        // produced by renaming H1B_DEPENDENT.
        let mut ds = Dataset::from_rows(
            vec!["H1B_DEPENDENT".to_string(), "H_1B_DEPENDENT".to_string()],
            vec![vec![None, text("Y")], vec![text("N"), text("Y")]],
        );
        apply_alias_rules(
            &mut ds,
            &[
                AliasRule { preferred: "H-1B_DEPENDENT", legacy: "H1B_DEPENDENT" },
                AliasRule { preferred: "H-1B_DEPENDENT", legacy: "H_1B_DEPENDENT" },
            ],
        );

        assert_eq!(ds.column_names(), &["H-1B_DEPENDENT"]);
        assert_eq!(ds.cell("H-1B_DEPENDENT", 0), Some(&Value::String("Y".into())));
        assert_eq!(ds.cell("H-1B_DEPENDENT", 1), Some(&Value::String("N".into())));
    }

    #[test]
    fn missing_rule_columns_are_noops() {
        let mut ds = Dataset::from_rows(vec!["CASE_NUMBER".to_string()], vec![vec![text("I-1")]]);
        apply_alias_rules(
            &mut ds,
            &[AliasRule { preferred: "TOTAL_WORKERS", legacy: "TOTAL WORKERS" }],
        );
        assert_eq!(ds.column_names(), &["CASE_NUMBER"]);
    }
}
