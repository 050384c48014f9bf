//! CSV export of result tables.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::{Cell, Table};

const UTF8_BOM: &str = "\u{feff}";

fn render(cell: &Cell) -> String {
    match cell {
        Cell::Text(value) => value.clone(),
        other => other.to_string(),
    }
}

/// Writes `table` as CSV. Multi-symbol tables get a second header line naming the
/// symbol of each column.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> std::io::Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec![table.index_name().to_owned()];
    header.extend(table.columns().iter().map(|c| c.key.field.clone()));
    out.write_record(&header)?;

    if table.columns().iter().any(|c| c.key.symbol.is_some()) {
        let mut symbols = vec![String::new()];
        symbols.extend(
            table
                .columns()
                .iter()
                .map(|c| c.key.symbol.clone().unwrap_or_default()),
        );
        out.write_record(&symbols)?;
    }

    for (key, cells) in table.rows() {
        let mut line = vec![key.to_string()];
        line.extend(cells.into_iter().map(render));
        out.write_record(&line)?;
    }
    out.flush()
}

/// Saves `table` to `path` with a UTF-8 byte order mark so spreadsheet tools pick the
/// right encoding for Persian text.
pub fn save_csv(table: &Table, path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(UTF8_BOM.as_bytes())?;
    write_csv(table, &mut writer)?;
    info!(path = %path.display(), rows = table.len(), "exported csv");
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::{ColumnKey, RowKey};

    fn table() -> Table {
        Table::new(
            "Date",
            vec![RowKey::Date(date!(2024 - 01 - 06)), RowKey::Date(date!(2024 - 01 - 07))],
        )
        .with_column("Close", vec![Cell::Int(100), Cell::Null])
        .expect("aligned")
        .with_column("Ticker", vec![Cell::text("a,b"), Cell::text("فولاد")])
        .expect("aligned")
    }

    #[test]
    fn renders_nulls_empty_and_quotes_text() {
        let mut out = Vec::new();
        write_csv(&table(), &mut out).expect("in-memory write");
        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(
            text,
            "Date,Close,Ticker\n2024-01-06,100,\"a,b\"\n2024-01-07,,فولاد\n"
        );
    }

    #[test]
    fn combined_tables_carry_a_symbol_row() {
        let mut table = Table::new("Date", vec![RowKey::Date(date!(2024 - 01 - 06))]);
        table
            .push_column(ColumnKey::for_symbol("Close", "x"), vec![Cell::Int(1)])
            .expect("aligned");
        table
            .push_column(ColumnKey::for_symbol("Close", "y"), vec![Cell::Int(2)])
            .expect("aligned");
        let mut out = Vec::new();
        write_csv(&table, &mut out).expect("in-memory write");
        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(text, "Date,Close,Close\n,x,y\n2024-01-06,1,2\n");
    }

    #[test]
    fn saves_with_byte_order_mark() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("history.csv");
        save_csv(&table(), &path).expect("written");
        let bytes = std::fs::read(&path).expect("readable");
        assert!(bytes.starts_with(UTF8_BOM.as_bytes()));
        assert!(String::from_utf8_lossy(&bytes).contains("2024-01-07"));
    }
}
