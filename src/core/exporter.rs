use crate::config::{ExportSettings, MetadataSettings};
use crate::domain::model::{
    DatasetMetadata, FileDescription, LightTable, License, MergedTable, Table,
};
use crate::utils::error::Result;
use serde::Serialize;

/// 一個待寫出的檔案
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// 完整表、精簡表與 metadata 三個檔案
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    pub full_csv: ExportFile,
    pub light_csv: ExportFile,
    pub metadata: ExportFile,
}

/// 由設定與兩個輸出檔名組出資料集描述
pub fn build_metadata(settings: &MetadataSettings, export: &ExportSettings) -> DatasetMetadata {
    let columns = if settings.include_column_descriptions {
        settings.columns.clone()
    } else {
        Vec::new()
    };

    DatasetMetadata {
        title: settings.title.clone(),
        id: settings.dataset_id.clone(),
        licenses: vec![License {
            name: settings.license.clone(),
        }],
        columns,
        files: vec![
            FileDescription {
                name: export.full_file_name.clone(),
                description: settings.full_file_description.clone(),
            },
            FileDescription {
                name: export.light_file_name.clone(),
                description: settings.light_file_description.clone(),
            },
        ],
    }
}

/// 純函式：相同輸入產生位元組完全相同的輸出
pub fn export(
    full: &MergedTable,
    light: &LightTable,
    metadata: &DatasetMetadata,
    settings: &ExportSettings,
) -> Result<ExportBundle> {
    Ok(ExportBundle {
        full_csv: ExportFile {
            name: settings.full_file_name.clone(),
            bytes: table_to_csv(full)?,
        },
        light_csv: ExportFile {
            name: settings.light_file_name.clone(),
            bytes: table_to_csv(light)?,
        },
        metadata: ExportFile {
            name: settings.metadata_file_name.clone(),
            bytes: to_pretty_json(metadata)?,
        },
    })
}

pub fn table_to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
