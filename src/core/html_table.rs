use crate::domain::model::{RawTable, Table, Value};
use crate::domain::ports::FetchError;
use scraper::{ElementRef, Html, Node};
use std::collections::HashSet;

/// colspan 上限，與瀏覽器相同；超過的值視為此上限
pub const MAX_COLSPAN: usize = 1000;

/// 從 HTML 文件中取出指定 id 的表格
///
/// 處理順序：
/// 1. 找 `<table id=...>`，找不到時再到 HTML 註解裡找（FBref 會把次要表格註解掉）
/// 2. 多層表頭只保留最下層
/// 3. 欄位名稱重複時保留第一個
/// 4. 移除 identity 欄位等於表頭文字的列（表格中間重複出現的表頭）
pub fn parse_table(html: &str, table_id: &str, identity_column: &str) -> Result<RawTable, FetchError> {
    let document = Html::parse_document(html);
    if let Some(table) = extract_from(&document, table_id) {
        return finish(table_id, table, identity_column);
    }

    for comment in comment_bodies(&document) {
        if !comment.contains(table_id) {
            continue;
        }
        let fragment = Html::parse_fragment(&comment);
        if let Some(table) = extract_from(&fragment, table_id) {
            tracing::debug!("Table {} found inside an HTML comment", table_id);
            return finish(table_id, table, identity_column);
        }
    }

    Err(FetchError::TableNotFound(table_id.to_string()))
}

fn finish(table_id: &str, table: Table, identity_column: &str) -> Result<RawTable, FetchError> {
    if table.columns.is_empty() {
        return Err(FetchError::Parse(format!("table '{}' has no header", table_id)));
    }
    let mut table = dedupe_columns(table);
    drop_repeated_headers(&mut table, identity_column);
    Ok(RawTable::new(table_id, table))
}

fn comment_bodies(document: &Html) -> Vec<String> {
    document
        .tree
        .nodes()
        .filter_map(|node| match node.value() {
            Node::Comment(comment) => Some((**comment).to_string()),
            _ => None,
        })
        .collect()
}

fn extract_from(document: &Html, table_id: &str) -> Option<Table> {
    let table = document
        .tree
        .nodes()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table" && el.value().id() == Some(table_id))?;

    let (header_rows, body_rows) = split_rows(table);
    let columns = flatten_header(&header_rows);

    let mut out = Table::new(columns);
    for row in body_rows {
        let cells = row_cells(row);
        if cells.is_empty() {
            continue;
        }
        out.push_row(cells.iter().map(|c| Value::from_cell(c)).collect());
    }
    Some(out)
}

/// 表頭列與資料列；沒有 `<thead>` 時把開頭全是 `<th>` 的列當表頭
fn split_rows(table: ElementRef<'_>) -> (Vec<ElementRef<'_>>, Vec<ElementRef<'_>>) {
    let mut header = Vec::new();
    let mut body = Vec::new();

    for section in table.children().filter_map(ElementRef::wrap) {
        match section.value().name() {
            "thead" => header.extend(child_rows(section)),
            "tbody" => body.extend(child_rows(section)),
            "tr" => body.push(section),
            _ => {}
        }
    }

    if header.is_empty() {
        while let Some(first) = body.first() {
            let all_th = first
                .children()
                .filter_map(ElementRef::wrap)
                .all(|cell| cell.value().name() == "th");
            if !all_th {
                break;
            }
            header.push(body.remove(0));
        }
    }

    (header, body)
}

fn child_rows(section: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
}

/// 多層表頭只取最後一列
fn flatten_header(header_rows: &[ElementRef<'_>]) -> Vec<String> {
    let Some(last) = header_rows.last() else {
        return Vec::new();
    };
    row_cells(*last)
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            }
        })
        .collect()
}

/// 一列中的儲存格文字，colspan 會展開成多格
fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    let mut cells = Vec::new();
    for cell in row.children().filter_map(ElementRef::wrap) {
        if !matches!(cell.value().name(), "th" | "td") {
            continue;
        }
        let text = normalize_ws(&cell.text().collect::<String>());
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);
        for _ in 0..span {
            cells.push(text.clone());
        }
    }
    cells
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn dedupe_columns(mut table: Table) -> Table {
    let mut seen = HashSet::new();
    let keep: Vec<bool> = table
        .columns
        .iter()
        .map(|c| seen.insert(c.clone()))
        .collect();
    let mut idx = 0;
    table.retain_columns(|_| {
        let k = keep[idx];
        idx += 1;
        k
    });
    table
}

fn drop_repeated_headers(table: &mut Table, identity_column: &str) {
    let Some(idx) = table.column_index(identity_column) else {
        return;
    };
    let before = table.rows.len();
    table
        .rows
        .retain(|row| row[idx].as_str() != Some(identity_column));
    let dropped = before - table.rows.len();
    if dropped > 0 {
        tracing::debug!("Dropped {} repeated header rows", dropped);
    }
}
