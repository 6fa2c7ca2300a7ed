use fbref_etl::core::cleaner::Cleaner;
use fbref_etl::core::merger::{merge_tables, MergeKeys};
use fbref_etl::core::projector::project;
use fbref_etl::core::{RawTable, Table, TableSet, Value};

fn keys() -> MergeKeys<'static> {
    MergeKeys {
        primary_table: "stats_standard",
        entity_column: "Player",
        group_column: "Squad",
    }
}

#[test]
fn test_only_primary_table_fetched() {
    let mut tables = TableSet::new();
    tables.insert(RawTable::new(
        "stats_standard",
        Table::from_text_rows(
            &["Player", "Squad", "Age", "Matches"],
            &[&["A", "X", "22-150", "Matches"], &["B", "Y", "19-032", "Matches"]],
        ),
    ));

    let merged = merge_tables(tables, &keys()).unwrap();
    let cleaned = Cleaner::new(true).apply(merged);

    assert_eq!(cleaned.columns, vec!["Player", "Squad", "Age"]);
    assert_eq!(cleaned.row_count(), 2);
    assert_eq!(cleaned.get(0, "Age"), Some(&Value::Int(22)));
    assert_eq!(cleaned.get(1, "Age"), Some(&Value::Int(19)));
}

#[test]
fn test_player_on_two_squads_keeps_both_rows() {
    let mut tables = TableSet::new();
    tables.insert(RawTable::new(
        "stats_standard",
        Table::from_text_rows(
            &["Player", "Squad", "Age", "Gls"],
            &[
                &["Jadon Sancho", "Chelsea", "24-100", "1"],
                &["Jadon Sancho", "Dortmund", "24-100", "3"],
                &["Son Heung-min", "Tottenham", "32-280", "7"],
            ],
        ),
    ));
    tables.insert(RawTable::new(
        "stats_passing",
        Table::from_text_rows(
            &["Player", "Squad", "Cmp"],
            &[
                &["Jadon Sancho", "Dortmund", "210"],
                &["Jadon Sancho", "Chelsea", "95"],
            ],
        ),
    ));

    let merged = merge_tables(tables, &keys()).unwrap();
    let cleaned = Cleaner::new(true).apply(merged);

    assert_eq!(cleaned.row_count(), 3);
    assert_eq!(cleaned.get(0, "Cmp"), Some(&Value::Int(95)));
    assert_eq!(cleaned.get(1, "Cmp"), Some(&Value::Int(210)));
    assert_eq!(cleaned.get(2, "Cmp"), Some(&Value::Missing));
    // 名字中的連字號不受年齡處理影響
    assert_eq!(cleaned.get(2, "Player"), Some(&Value::text("Son Heung-min")));
    assert_eq!(cleaned.get(2, "Age"), Some(&Value::Int(32)));

    let light = project(&cleaned, &["Player".to_string(), "Cmp".to_string()]).unwrap();
    assert_eq!(light.columns, vec!["Player", "Cmp"]);
    assert_eq!(light.row_count(), 3);
}
