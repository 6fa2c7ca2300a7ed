use crate::domain::model::{MergedTable, Value};

pub const AGE_COLUMN: &str = "Age";

/// 合併後的清理步驟
#[derive(Debug, Clone, Copy)]
pub struct Cleaner {
    pub normalize_age: bool,
}

impl Cleaner {
    pub fn new(normalize_age: bool) -> Self {
        Self { normalize_age }
    }

    pub fn apply(&self, table: MergedTable) -> MergedTable {
        let table = prune_columns(table);
        if self.normalize_age {
            normalize_age(table)
        } else {
            table
        }
    }
}

/// 移除名稱含有 "matches"（不分大小寫）的欄位
pub fn prune_columns(mut table: MergedTable) -> MergedTable {
    let before = table.column_count();
    table.retain_columns(|name| !name.to_lowercase().contains("matches"));
    let removed = before - table.column_count();
    if removed > 0 {
        tracing::debug!("Pruned {} match-log columns", removed);
    }
    table
}

/// 把 `Age` 欄位的 "年-天" 格式轉為整數年齡；無法解析時改為缺值
pub fn normalize_age(mut table: MergedTable) -> MergedTable {
    let Some(idx) = table.column_index(AGE_COLUMN) else {
        return table;
    };

    let mut unparsed = 0usize;
    for row in &mut table.rows {
        let cell = std::mem::take(&mut row[idx]);
        let was_missing = cell.is_missing();
        row[idx] = age_years(cell);
        if !was_missing && row[idx].is_missing() {
            unparsed += 1;
        }
    }

    if unparsed > 0 {
        tracing::debug!("{} Age values could not be parsed", unparsed);
    }
    table
}

fn age_years(cell: Value) -> Value {
    match cell {
        Value::Text(s) => {
            let years = s.split('-').next().unwrap_or("").trim();
            match years.parse::<i64>() {
                Ok(y) => Value::Int(y),
                Err(_) => match years.parse::<f64>() {
                    Ok(f) if f.is_finite() => Value::Float(f),
                    _ => Value::Missing,
                },
            }
        }
        other => other,
    }
}
