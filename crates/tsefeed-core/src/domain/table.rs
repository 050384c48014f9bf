use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::{Date, PrimitiveDateTime};

use crate::calendar::JalaliDate;
use crate::ValidationError;

/// A single table value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Cell {
    /// Non-finite floats are stored as `Null`.
    pub fn float(value: f64) -> Self {
        if value.is_finite() {
            Self::Float(value)
        } else {
            Self::Null
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(_) | Self::Null => None,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Null => Ok(()),
        }
    }
}

/// Row label of a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowKey {
    Date(Date),
    Jalali(JalaliDate),
    DateTime(PrimitiveDateTime),
}

impl Display for RowKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{date}"),
            Self::Jalali(date) => write!(f, "{date}"),
            Self::DateTime(value) => write!(
                f,
                "{} {:02}:{:02}:{:02}",
                value.date(),
                value.hour(),
                value.minute(),
                value.second()
            ),
        }
    }
}

impl Serialize for RowKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Column label. `symbol` is set once several symbols share a table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ColumnKey {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl ColumnKey {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            symbol: None,
        }
    }

    pub fn for_symbol(field: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            symbol: Some(symbol.into()),
        }
    }
}

impl Display for ColumnKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{}|{}", self.field, symbol),
            None => f.write_str(&self.field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub key: ColumnKey,
    pub values: Vec<Cell>,
}

/// Column-major table keyed by a row index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    index_name: String,
    index: Vec<RowKey>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(index_name: impl Into<String>, index: Vec<RowKey>) -> Self {
        Self {
            index_name: index_name.into(),
            index,
            columns: Vec::new(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index(&self) -> &[RowKey] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_keys(&self) -> Vec<&ColumnKey> {
        self.columns.iter().map(|column| &column.key).collect()
    }

    /// Adds a column, replacing any existing one with the same key.
    pub fn push_column(
        &mut self,
        key: ColumnKey,
        values: Vec<Cell>,
    ) -> Result<(), ValidationError> {
        if values.len() != self.index.len() {
            return Err(ValidationError::ColumnLength {
                column: key.to_string(),
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter_mut().find(|column| column.key == key) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { key, values }),
        }
        Ok(())
    }

    pub fn with_column(
        mut self,
        field: impl Into<String>,
        values: Vec<Cell>,
    ) -> Result<Self, ValidationError> {
        self.push_column(ColumnKey::field(field), values)?;
        Ok(self)
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.key.field == field)
    }

    pub fn column_by_key(&self, key: &ColumnKey) -> Option<&Column> {
        self.columns.iter().find(|column| &column.key == key)
    }

    pub fn values(&self, field: &str) -> Result<&[Cell], ValidationError> {
        self.column(field)
            .map(|column| column.values.as_slice())
            .ok_or_else(|| ValidationError::MissingColumn {
                column: field.to_owned(),
            })
    }

    /// Keeps the named columns in the given order. Names that are absent are skipped.
    pub fn select(mut self, fields: &[&str]) -> Self {
        let mut selected = Vec::with_capacity(fields.len());
        for field in fields {
            if let Some(position) = self.columns.iter().position(|c| c.key.field == *field) {
                selected.push(self.columns.remove(position));
            }
        }
        self.columns = selected;
        self
    }

    /// Keeps rows whose position satisfies `keep`.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let mask: Vec<bool> = (0..self.index.len()).map(&mut keep).collect();
        let mut position = 0;
        self.index.retain(|_| {
            position += 1;
            mask[position - 1]
        });
        for column in &mut self.columns {
            let mut position = 0;
            column.values.retain(|_| {
                position += 1;
                mask[position - 1]
            });
        }
    }

    pub fn reversed(mut self) -> Self {
        self.index.reverse();
        for column in &mut self.columns {
            column.values.reverse();
        }
        self
    }

    pub fn row(&self, position: usize) -> Option<Vec<&Cell>> {
        if position >= self.index.len() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|column| &column.values[position])
                .collect(),
        )
    }

    pub fn rows(&self) -> impl Iterator<Item = (&RowKey, Vec<&Cell>)> + '_ {
        self.index.iter().enumerate().map(|(position, key)| {
            let cells = self
                .columns
                .iter()
                .map(|column| &column.values[position])
                .collect();
            (key, cells)
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn sample() -> Table {
        Table::new(
            "Date",
            vec![
                RowKey::Date(date!(2024 - 01 - 01)),
                RowKey::Date(date!(2024 - 01 - 02)),
                RowKey::Date(date!(2024 - 01 - 03)),
            ],
        )
        .with_column("Close", vec![Cell::Int(10), Cell::Int(11), Cell::Int(12)])
        .and_then(|t| t.with_column("Volume", vec![Cell::Int(5), Cell::Null, Cell::Int(7)]))
        .expect("columns match index length")
    }

    #[test]
    fn rejects_mismatched_column_length() {
        let err = sample()
            .with_column("Open", vec![Cell::Int(1)])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::ColumnLength { expected: 3, actual: 1, .. }));
    }

    #[test]
    fn select_reorders_and_skips_missing() {
        let table = sample().select(&["Volume", "Missing", "Close"]);
        let fields: Vec<_> = table.columns().iter().map(|c| c.key.field.as_str()).collect();
        assert_eq!(fields, vec!["Volume", "Close"]);
    }

    #[test]
    fn retain_rows_keeps_columns_aligned() {
        let mut table = sample();
        table.retain_rows(|position| position != 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.values("Close").expect("present"), &[Cell::Int(10), Cell::Int(12)]);
        assert_eq!(table.values("Volume").expect("present"), &[Cell::Int(5), Cell::Int(7)]);
    }

    #[test]
    fn reversed_flips_every_column() {
        let table = sample().reversed();
        assert_eq!(table.index()[0], RowKey::Date(date!(2024 - 01 - 03)));
        assert_eq!(table.values("Close").expect("present")[0], Cell::Int(12));
    }

    #[test]
    fn cells_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Cell::Int(1),
            Cell::Float(1.5),
            Cell::text("x"),
            Cell::Null,
        ])
        .expect("serializes");
        assert_eq!(json, r#"[1,1.5,"x",null]"#);
    }

    #[test]
    fn datetime_keys_render_without_fraction() {
        let key = RowKey::DateTime(time::macros::datetime!(2024-01-01 09:05:00));
        assert_eq!(key.to_string(), "2024-01-01 09:05:00");
    }
}
