use crate::domain::model::{LightTable, MergedTable};
use crate::utils::error::{EtlError, Result};

/// 依白名單順序投影出精簡表
///
/// 白名單中任何一個欄位不存在都會失敗，避免來源網站改名時悄悄輸出較窄的表。
pub fn project(table: &MergedTable, allow_list: &[String]) -> Result<LightTable> {
    let indices = allow_list
        .iter()
        .map(|name| {
            table.column_index(name).ok_or_else(|| EtlError::MissingColumn {
                column: name.clone(),
                table: "merged table".to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut light = LightTable::new(allow_list.to_vec());
    light.rows = table
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    tracing::info!(
        "✂️ Light table has {} of {} columns",
        light.column_count(),
        table.column_count()
    );
    Ok(light)
}
