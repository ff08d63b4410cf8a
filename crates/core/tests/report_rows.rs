use reportgen_core::{
    CancelToken, ChannelObserver, DataType, Field, FieldCatalog, HeaderIndex, MemorySource,
    Progress, RawValue, ReportBuilder, ReportDefinition, ReportError,
};
use std::sync::mpsc;

fn bind(headers: &[&str], fields: &[Field]) -> FieldCatalog {
    FieldCatalog::bind(fields, &HeaderIndex::from_names(headers)).unwrap()
}

// ===== Row sequence =====

#[test]
fn test_empty_middle_row_is_dropped_and_order_kept() {
    let catalog = bind(
        &["Name"],
        &[Field::new("Name")
            .with_export_position(1)
            .with_data_type(DataType::String)
            .with_null_value("N/A")],
    );
    let source = MemorySource::from_rows(vec![vec!["Alpha"], vec![""], vec!["Beta"]]);

    let built = ReportBuilder::new(&catalog).first_row(1).build(&source).unwrap();

    let values: Vec<&str> = built.iter().map(|r| r.cells()[0].value.as_str()).collect();
    assert_eq!(values, vec!["Alpha", "Beta"]);
    assert_eq!(built.divider_position(), None);
}

#[test]
fn test_trailing_all_null_row_is_excluded() {
    let catalog = bind(
        &["Ticket", "Due"],
        &[
            Field::new("Ticket").with_export_position(1).with_null_value("N/A"),
            Field::new("Due")
                .with_export_position(2)
                .with_data_type(DataType::Date)
                .with_null_value("TBD"),
        ],
    );
    let source = MemorySource::from_rows(vec![
        vec![RawValue::from("T-1"), RawValue::from("2024-03-01")],
        vec![RawValue::from("T-2"), RawValue::Empty],
        vec![RawValue::from("N/A"), RawValue::Empty],
        vec![RawValue::Empty, RawValue::Empty],
    ]);

    let built = ReportBuilder::new(&catalog).build(&source).unwrap();

    assert_eq!(built.len(), 2);
    assert_eq!(built.rows()[0].value_of("Due"), Some("03/01/2024"));
    assert_eq!(built.rows()[1].value_of("Due"), Some("TBD"));
}

// ===== Divider =====

fn flagged_source(flags: &[&str]) -> (FieldCatalog, MemorySource) {
    let catalog = bind(
        &["Ticket", "Hours", "OutOfCycle"],
        &[
            Field::new("Ticket").with_export_position(1).with_column_width(14.0),
            Field::new("OutOfCycle").with_export_position(0),
            Field::new("Hours")
                .with_export_position(2)
                .with_data_type(DataType::Other),
        ],
    );
    let mut source = MemorySource::default();
    source.push_row(vec![
        RawValue::from("Ticket"),
        RawValue::from("Hours"),
        RawValue::from("OutOfCycle"),
    ]);
    for (i, flag) in flags.iter().enumerate() {
        source.push_row(vec![
            RawValue::from(format!("T-{}", i + 1)),
            RawValue::Float(1.5 * (i + 1) as f64),
            RawValue::from(*flag),
        ]);
    }
    (catalog, source)
}

#[test]
fn test_divider_inserted_before_first_flagged_row() {
    let (catalog, source) = flagged_source(&["No", "No", "No", "Yes", "Yes"]);

    let built = ReportBuilder::new(&catalog)
        .first_row(2)
        .divider_field(Some("OutOfCycle"))
        .build(&source)
        .unwrap();

    assert_eq!(built.len(), 6);
    assert_eq!(built.iter().filter(|r| r.is_divider()).count(), 1);
    // Position 4 of the 6-row sequence, counting from 1.
    assert_eq!(built.divider_position(), Some(3));
    assert!(built.rows()[3].is_divider());
    assert_eq!(built.rows()[4].value_of("Ticket"), Some("T-4"));
    assert_eq!(built.rows()[4].value_of("OutOfCycle"), Some("Yes"));
    assert_eq!(built.data_row_count(), 5);
}

#[test]
fn test_no_divider_for_constant_flag_or_unset_field() {
    let (catalog, source) = flagged_source(&["No", "No", "No"]);
    let built = ReportBuilder::new(&catalog)
        .first_row(2)
        .divider_field(Some("OutOfCycle"))
        .build(&source)
        .unwrap();
    assert!(built.iter().all(|r| !r.is_divider()));

    let (catalog, source) = flagged_source(&["No", "Yes"]);
    let built = ReportBuilder::new(&catalog)
        .first_row(2)
        .divider_field(None::<String>)
        .build(&source)
        .unwrap();
    assert_eq!(built.len(), 2);
    assert_eq!(built.divider_position(), None);
}

#[test]
fn test_every_row_has_one_cell_per_field() {
    let (catalog, source) = flagged_source(&["No", "Yes", "Yes"]);
    let built = ReportBuilder::new(&catalog)
        .first_row(2)
        .divider_field(Some("OutOfCycle"))
        .build(&source)
        .unwrap();

    assert!(built.iter().any(|r| r.is_divider()));
    assert!(built.iter().all(|r| r.len() == catalog.len()));

    let divider = &built.rows()[built.divider_position().unwrap()];
    assert!(divider.cells().iter().all(|c| c.value.is_empty()));
    assert_eq!(divider.cells()[0].column_width, 14.0);
}

#[test]
fn test_hours_use_default_representation() {
    let (catalog, source) = flagged_source(&["No", "No"]);
    let built = ReportBuilder::new(&catalog).first_row(2).build(&source).unwrap();
    let hours: Vec<&str> = built.iter().filter_map(|r| r.value_of("Hours")).collect();
    assert_eq!(hours, vec!["1.5", "3"]);
}

// ===== Progress and cancellation =====

#[test]
fn test_progress_reports_each_row() {
    let (catalog, source) = flagged_source(&["No", "Yes", "Yes"]);
    let (tx, rx) = mpsc::channel();
    let observer = ChannelObserver::new(tx);

    ReportBuilder::new(&catalog)
        .first_row(2)
        .divider_field(Some("OutOfCycle"))
        .observer(&observer)
        .build(&source)
        .unwrap();
    drop(observer);

    let events: Vec<Progress> = rx.iter().collect();
    let rows: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|e| match e {
            Progress::Row { current, total } => Some((*current, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(rows, vec![(1, 3), (2, 3), (3, 3)]);
    assert!(events.contains(&Progress::Divider { position: 1 }));
}

#[test]
fn test_cancel_mid_build() {
    let (catalog, source) = flagged_source(&["No", "No", "No", "No"]);
    let token = CancelToken::new();
    let trigger = token.clone();
    let observer = move |event: Progress| {
        if event == (Progress::Row { current: 2, total: 4 }) {
            trigger.cancel();
        }
    };

    let err = ReportBuilder::new(&catalog)
        .first_row(2)
        .observer(&observer)
        .cancel_token(token)
        .build(&source)
        .unwrap_err();
    assert!(matches!(err, ReportError::Cancelled { row: 4 }));
}

// ===== Definition to rows =====

#[test]
fn test_definition_binds_against_source_headers() {
    let json = r#"{
        "Name": "Cycle",
        "Divider": "OutOfCycle",
        "HeaderRow": 1,
        "FirstRowIndex": 2,
        "Fields": [
            {"Name": "Hours Logged", "ExportName": "Hours", "ExportIndex": 2, "DataType": "int"},
            {"Name": "Ticket #", "ExportName": "ticket", "ExportIndex": 1, "DataType": "string"},
            {"Name": "OOC", "ExportName": "OutOfCycle", "ExportIndex": 0, "DataType": "string"}
        ]
    }"#;
    let definition = ReportDefinition::from_json_str(json).unwrap();
    let (_, source) = flagged_source(&["No", "Yes"]);

    let headers = HeaderIndex::from_source(&source, definition.header_row).unwrap();
    let catalog = definition.bind(&headers).unwrap();
    let built = ReportBuilder::new(&catalog)
        .first_row(definition.first_row)
        .divider_field(definition.divider_field())
        .build(&source)
        .unwrap();

    assert_eq!(built.len(), 3);
    assert_eq!(built.divider_position(), Some(1));
    let first: Vec<(i32, &str)> = built.rows()[0]
        .cells()
        .iter()
        .map(|c| (c.column_number, c.value.as_str()))
        .collect();
    assert_eq!(first, vec![(0, "No"), (1, "T-1"), (2, "1.5")]);
}

#[test]
fn test_unmatched_definition_field_fails_before_rows() {
    let json = r#"{"Name": "Bad", "HeaderRow": 1, "Fields": [{"Name": "X", "ExportName": "Priority"}]}"#;
    let definition = ReportDefinition::from_json_str(json).unwrap();
    let (_, source) = flagged_source(&["No"]);

    let headers = HeaderIndex::from_source(&source, definition.header_row).unwrap();
    let err = definition.bind(&headers).unwrap_err();
    assert!(matches!(err, ReportError::UnmatchedField { field } if field == "Priority"));
}
