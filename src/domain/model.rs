use serde::{Deserialize, Serialize};
use std::fmt;

/// 單一儲存格的值
///
/// `Missing` 代表「沒有值」（join 無對應、解析失敗、原始儲存格為空），
/// 與 `Text("")` 或 `Int(0)` 不同。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// 依照表格讀取器的慣例分類原始文字：空白為缺值，數字轉成數值型別，
    /// 其餘保留為文字。千分位逗號會被移除。
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Missing;
        }

        let numeric = if looks_like_thousands(trimmed) {
            trimmed.replace(',', "")
        } else {
            trimmed.to_string()
        };

        if let Ok(i) = numeric.parse::<i64>() {
            return Value::Int(i);
        }
        if is_decimal(&numeric) {
            if let Ok(f) = numeric.parse::<f64>() {
                return Value::Float(f);
            }
        }
        Value::Text(trimmed.to_string())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 用於比對 join key 的字串形式；缺值沒有 key
    pub fn key_text(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// 整數部分以三位一組的逗號分隔，可帶小數，例如 `1,234` 或 `-12,345.6`
fn looks_like_thousands(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (body, None),
    };
    if frac_part.is_some_and(|f| !f.chars().all(|c| c.is_ascii_digit())) {
        return false;
    }

    let mut groups = int_part.split(',');
    let Some(head) = groups.next() else {
        return false;
    };
    if !int_part.contains(',') || head.is_empty() || head.len() > 3 {
        return false;
    }
    head.chars().all(|c| c.is_ascii_digit())
        && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

fn is_decimal(s: &str) -> bool {
    let body = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s);
    let mut parts = body.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    match frac_part {
        Some(frac) => {
            (!int_part.is_empty() || !frac.is_empty())
                && int_part.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// 欄位有序、每列依欄位位置對齊的表格
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 從欄位名稱與字串列建立表格，主要給測試與設定檔使用
    pub fn from_text_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|cell| Value::from_cell(cell)).collect());
        }
        table
    }

    /// 補齊或截斷到欄位數後加入
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// 只保留 `keep` 為真的欄位
    pub fn retain_columns<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        let mask: Vec<bool> = self.columns.iter().map(|c| keep(c)).collect();
        if mask.iter().all(|k| *k) {
            return;
        }

        self.columns = retain_by_mask(std::mem::take(&mut self.columns), &mask);
        for row in &mut self.rows {
            *row = retain_by_mask(std::mem::take(row), &mask);
        }
    }
}

fn retain_by_mask<T>(items: Vec<T>, mask: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(mask)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

/// 單一來源抓回來的表格
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub id: String,
    pub table: Table,
}

impl RawTable {
    pub fn new(id: impl Into<String>, table: Table) -> Self {
        Self {
            id: id.into(),
            table,
        }
    }
}

/// 合併後的寬表
pub type MergedTable = Table;

/// 依白名單投影出的精簡表
pub type LightTable = Table;

/// 一次執行中抓到的所有表格，保持來源設定的順序
///
/// 來源只有十來個，線性搜尋即可。
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: Vec<RawTable>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一 id 重複加入時以新的取代，位置不變
    pub fn insert(&mut self, raw: RawTable) {
        match self.tables.iter_mut().find(|t| t.id == raw.id) {
            Some(slot) => *slot = raw,
            None => self.tables.push(raw),
        }
    }

    pub fn get(&self, id: &str) -> Option<&RawTable> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: &str) -> Option<RawTable> {
        let pos = self.tables.iter().position(|t| t.id == id)?;
        Some(self.tables.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawTable> {
        self.tables.iter()
    }

    pub fn into_tables(self) -> Vec<RawTable> {
        self.tables
    }
}

/// 轉換階段的結果：完整表與精簡表
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub full: MergedTable,
    pub light: LightTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescription {
    pub name: String,
    pub description: String,
}

/// 發佈用的資料集描述，欄位順序即輸出 JSON 的順序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub title: String,
    pub id: String,
    pub licenses: Vec<License>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnDescription>,
    pub files: Vec<FileDescription>,
}
