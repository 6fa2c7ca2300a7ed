use crate::domain::model::{MergedTable, RawTable, TableSet, Value};
use crate::utils::error::{EtlError, Result};
use std::collections::{HashMap, HashSet};

/// 合併所需的鍵設定
#[derive(Debug, Clone)]
pub struct MergeKeys<'a> {
    pub primary_table: &'a str,
    pub entity_column: &'a str,
    pub group_column: &'a str,
}

/// 以主表為基準，依序 left join 其他表格
///
/// 輸出列數恆等於主表列數。其他表格的欄位若與已存在欄位同名，
/// 改名為 `<欄位>_<表格 id>`；key 欄位不會重複出現。
pub fn merge_tables(mut tables: TableSet, keys: &MergeKeys<'_>) -> Result<MergedTable> {
    let primary = tables
        .remove(keys.primary_table)
        .ok_or_else(|| EtlError::MissingPrimaryTable {
            table: keys.primary_table.to_string(),
        })?;

    for column in [keys.entity_column, keys.group_column] {
        if !primary.table.has_column(column) {
            return Err(EtlError::MissingColumn {
                column: column.to_string(),
                table: primary.id.clone(),
            });
        }
    }

    let expected_rows = primary.table.row_count();
    let mut merged = primary.table;

    for other in tables.into_tables() {
        left_join(&mut merged, &other, keys);
    }

    debug_assert_eq!(merged.row_count(), expected_rows);
    tracing::info!(
        "🔗 Merged table has {} rows and {} columns",
        merged.row_count(),
        merged.column_count()
    );
    Ok(merged)
}

fn left_join(acc: &mut MergedTable, incoming: &RawTable, keys: &MergeKeys<'_>) {
    let table = &incoming.table;
    let (Some(in_entity), Some(in_group)) = (
        table.column_index(keys.entity_column),
        table.column_index(keys.group_column),
    ) else {
        tracing::warn!(
            "⚠️ Skipping {}: missing key column {} or {}",
            incoming.id,
            keys.entity_column,
            keys.group_column
        );
        return;
    };

    // 決定要帶入的欄位與輸出名稱
    let mut existing: HashSet<String> = acc.columns.iter().cloned().collect();
    let mut carried: Vec<(usize, String)> = Vec::new();
    for (idx, name) in table.columns.iter().enumerate() {
        if idx == in_entity || idx == in_group {
            continue;
        }
        let out_name = if existing.contains(name) {
            format!("{}_{}", name, incoming.id)
        } else {
            name.clone()
        };
        if !existing.insert(out_name.clone()) {
            tracing::warn!(
                "⚠️ Dropping column {} from {}: {} already exists",
                name,
                incoming.id,
                out_name
            );
            continue;
        }
        carried.push((idx, out_name));
    }

    // key 重複時取第一筆，維持主表列數
    let mut lookup: HashMap<(String, String), usize> = HashMap::new();
    let mut duplicates = 0usize;
    for (row_idx, row) in table.rows.iter().enumerate() {
        let Some(key) = row_key(row, in_entity, in_group) else {
            continue;
        };
        if lookup.contains_key(&key) {
            duplicates += 1;
        } else {
            lookup.insert(key, row_idx);
        }
    }
    if duplicates > 0 {
        tracing::warn!(
            "⚠️ {} has {} duplicate ({}, {}) keys; using the first match",
            incoming.id,
            duplicates,
            keys.entity_column,
            keys.group_column
        );
    }

    let acc_entity = acc.column_index(keys.entity_column);
    let acc_group = acc.column_index(keys.group_column);
    let mut matched = 0usize;

    for row in &mut acc.rows {
        let hit = match (acc_entity, acc_group) {
            (Some(e), Some(g)) => row_key(row, e, g).and_then(|k| lookup.get(&k).copied()),
            _ => None,
        };
        match hit {
            Some(src) => {
                matched += 1;
                let source_row = &table.rows[src];
                row.extend(carried.iter().map(|(idx, _)| source_row[*idx].clone()));
            }
            None => row.extend(std::iter::repeat(Value::Missing).take(carried.len())),
        }
    }
    acc.columns.extend(carried.into_iter().map(|(_, name)| name));

    tracing::debug!(
        "Joined {}: {} of {} rows matched",
        incoming.id,
        matched,
        acc.rows.len()
    );
}

fn row_key(row: &[Value], entity: usize, group: usize) -> Option<(String, String)> {
    Some((row[entity].key_text()?, row[group].key_text()?))
}
