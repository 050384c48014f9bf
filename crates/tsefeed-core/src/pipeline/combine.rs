use std::collections::{BTreeSet, HashMap};

use crate::domain::{Cell, ColumnKey, RowKey, Table};
use crate::TseError;

/// Aligns per-symbol tables on their row keys.
///
/// Columns become `(field, symbol)` pairs, grouped by symbol in input order. Rows are the
/// sorted union of every table's keys; a symbol without a row gets nulls, and with
/// `drop_incomplete` any row holding a null is removed. A single table comes back
/// unchanged.
pub fn combine(mut tables: Vec<(String, Table)>, drop_incomplete: bool) -> Result<Table, TseError> {
    match tables.len() {
        0 => return Err(TseError::no_data("no series to combine")),
        1 => return Ok(tables.remove(0).1),
        _ => {}
    }

    let index: Vec<RowKey> = tables
        .iter()
        .flat_map(|(_, table)| table.index().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let index_name = tables[0].1.index_name().to_owned();
    let mut combined = Table::new(index_name, index.clone());

    for (symbol, table) in &tables {
        let positions: HashMap<RowKey, usize> = table
            .index()
            .iter()
            .enumerate()
            .map(|(position, key)| (*key, position))
            .collect();

        for column in table.columns() {
            let values = index
                .iter()
                .map(|key| {
                    positions
                        .get(key)
                        .map_or(Cell::Null, |&position| column.values[position].clone())
                })
                .collect();
            combined.push_column(
                ColumnKey::for_symbol(column.key.field.clone(), symbol.clone()),
                values,
            )?;
        }
    }

    if drop_incomplete {
        let complete: Vec<bool> = (0..combined.len())
            .map(|position| {
                combined
                    .row(position)
                    .is_some_and(|cells| cells.iter().all(|cell| !cell.is_null()))
            })
            .collect();
        combined.retain_rows(|position| complete[position]);
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::Date;

    use super::*;

    fn series(dates: &[Date], closes: &[i64]) -> Table {
        Table::new("Date", dates.iter().copied().map(RowKey::Date).collect())
            .with_column("Close", closes.iter().map(|c| Cell::Int(*c)).collect())
            .expect("aligned")
    }

    fn tables() -> Vec<(String, Table)> {
        vec![
            (
                String::from("A"),
                series(&[date!(2024 - 01 - 01), date!(2024 - 01 - 02)], &[10, 11]),
            ),
            (
                String::from("B"),
                series(&[date!(2024 - 01 - 02), date!(2024 - 01 - 03)], &[20, 21]),
            ),
        ]
    }

    #[test]
    fn inner_join_keeps_only_shared_dates() {
        let table = combine(tables(), true).expect("combines");
        assert_eq!(table.index(), &[RowKey::Date(date!(2024 - 01 - 02))]);
        assert_eq!(
            table
                .column_by_key(&ColumnKey::for_symbol("Close", "A"))
                .expect("present")
                .values,
            vec![Cell::Int(11)]
        );
        assert_eq!(
            table
                .column_by_key(&ColumnKey::for_symbol("Close", "B"))
                .expect("present")
                .values,
            vec![Cell::Int(20)]
        );
    }

    #[test]
    fn outer_join_fills_nulls() {
        let table = combine(tables(), false).expect("combines");
        assert_eq!(table.len(), 3);
        assert_eq!(
            table
                .column_by_key(&ColumnKey::for_symbol("Close", "B"))
                .expect("present")
                .values,
            vec![Cell::Null, Cell::Int(20), Cell::Int(21)]
        );
    }

    #[test]
    fn single_table_is_returned_unchanged() {
        let only = series(&[date!(2024 - 01 - 01)], &[5]);
        let table = combine(vec![(String::from("A"), only.clone())], true).expect("combines");
        assert_eq!(table, only);
    }

    #[test]
    fn nothing_to_combine_is_an_error() {
        let err = combine(Vec::new(), true).expect_err("must fail");
        assert_eq!(err.code(), "tse.no_data");
    }
}
