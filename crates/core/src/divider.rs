//! Locating the single out-of-cycle boundary in a row sequence.

use crate::error::{ReportError, ReportResult};
use crate::field::FieldCatalog;
use crate::row::Row;

/// Find where the flag field first changes value and synthesize the divider row.
///
/// Rows are scanned in order while tracking the last seen flag value. The first
/// row whose value differs from a non-empty last value gets the divider placed
/// immediately before it; scanning stops there, so later transitions are
/// ignored. An unset or blank `flag_field` means the report has no divider.
///
/// The returned row's [`Row::index`] is its splice position in `rows`.
pub fn find_divider(
    rows: &[Row],
    catalog: &FieldCatalog,
    flag_field: Option<&str>,
) -> ReportResult<Option<Row>> {
    let Some(flag_field) = flag_field.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    let position = catalog
        .index_of(flag_field)
        .ok_or_else(|| ReportError::UnknownField {
            field: flag_field.to_string(),
        })?;

    let mut last_seen = String::new();
    for (index, row) in rows.iter().enumerate() {
        let current = row.cell(position).map_or("", |c| c.value.as_str());
        if !last_seen.is_empty() && current != last_seen {
            tracing::debug!(
                "flag '{}' changed from '{}' to '{}' at row {}",
                flag_field,
                last_seen,
                current,
                index
            );
            return Ok(Some(Row::divider(catalog, index)));
        }
        last_seen = current.to_string();
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, HeaderIndex};
    use crate::row::Cell;

    fn catalog() -> FieldCatalog {
        let headers = HeaderIndex::from_names(["Ticket", "OutOfCycle"]);
        let fields = vec![
            Field::new("Ticket").with_export_position(1),
            Field::new("OutOfCycle").with_export_position(2),
        ];
        FieldCatalog::bind(&fields, &headers).unwrap()
    }

    fn rows(flags: &[&str]) -> Vec<Row> {
        let catalog = catalog();
        flags
            .iter()
            .enumerate()
            .map(|(i, flag)| {
                let fields = catalog.fields();
                Row::data(vec![
                    Cell::for_field(&fields[0], format!("T-{i}")),
                    Cell::for_field(&fields[1], (*flag).to_string()),
                ])
            })
            .collect()
    }

    #[test]
    fn test_divider_before_first_transition() {
        let rows = rows(&["No", "No", "No", "Yes", "Yes"]);
        let divider = find_divider(&rows, &catalog(), Some("OutOfCycle"))
            .unwrap()
            .unwrap();
        assert!(divider.is_divider());
        assert_eq!(divider.index(), 3);
        assert_eq!(divider.len(), 2);
    }

    #[test]
    fn test_no_divider_for_constant_flags() {
        let rows = rows(&["No", "No", "No"]);
        assert!(find_divider(&rows, &catalog(), Some("OutOfCycle"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_no_divider_without_flag_field() {
        let rows = rows(&["No", "Yes"]);
        assert!(find_divider(&rows, &catalog(), None).unwrap().is_none());
        assert!(find_divider(&rows, &catalog(), Some("  ")).unwrap().is_none());
    }

    #[test]
    fn test_only_first_transition_counts() {
        let rows = rows(&["Yes", "No", "Yes", "No"]);
        let divider = find_divider(&rows, &catalog(), Some("outofcycle"))
            .unwrap()
            .unwrap();
        assert_eq!(divider.index(), 1);
    }

    #[test]
    fn test_leading_blank_flags_do_not_trigger() {
        let rows = rows(&["", "", "No", "Yes"]);
        let divider = find_divider(&rows, &catalog(), Some("OutOfCycle"))
            .unwrap()
            .unwrap();
        assert_eq!(divider.index(), 3);
    }

    #[test]
    fn test_unknown_flag_field_is_a_configuration_error() {
        let err = find_divider(&rows(&["No"]), &catalog(), Some("Missing")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_flag_lookup_folds_non_ascii_case() {
        let headers = HeaderIndex::from_names(["ÜBERFÄLLIG"]);
        let fields = vec![Field::new("Überfällig").with_export_position(1)];
        let catalog = FieldCatalog::bind(&fields, &headers).unwrap();
        let rows: Vec<Row> = ["Nein", "Ja"]
            .iter()
            .map(|v| Row::data(vec![Cell::for_field(&catalog.fields()[0], (*v).to_string())]))
            .collect();

        let divider = find_divider(&rows, &catalog, Some("überFÄLLIG"))
            .unwrap()
            .unwrap();
        assert_eq!(divider.index(), 1);
        assert_eq!(rows[1].value_of("ÜBERFÄLLIG"), Some("Ja"));
    }

    #[test]
    fn test_empty_sequence_has_no_divider() {
        assert!(find_divider(&[], &catalog(), Some("OutOfCycle"))
            .unwrap()
            .is_none());
    }
}
