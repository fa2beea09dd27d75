use super::model::{CellValue, Column, Dataset, Table};
use crate::error::{PipelineError, Result};

/// Concatenate extracted tables into one [`Dataset`].
///
/// Rows keep their order within each table and tables keep their order in
/// `tables`. Columns are matched by name: the first table fixes the column
/// order, columns first seen in later tables are appended, and cells a table
/// does not have are filled with `CellValue::Null`.
pub fn normalize(tables: &[Table]) -> Result<Dataset> {
    if tables.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut names: Vec<&str> = Vec::new();
    for table in tables {
        for name in table.column_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    let total_rows = tables.iter().map(Table::num_rows).sum();
    let columns = names
        .into_iter()
        .map(|name| {
            let mut values = Vec::with_capacity(total_rows);
            for table in tables {
                match table.column(name) {
                    Some(column) => values.extend(column.values.iter().cloned()),
                    None => {
                        values.extend(std::iter::repeat(CellValue::Null).take(table.num_rows()))
                    }
                }
            }
            Column::new(name, values)
        })
        .collect();

    Ok(Dataset::from_table(Table::new(columns)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let records: Vec<Vec<String>> = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        Table::from_records(&headers, &records).unwrap()
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(normalize(&[]).unwrap_err(), PipelineError::EmptyInput);
    }

    #[test]
    fn concatenates_in_order_and_classifies() {
        let first = table(&["amount", "category"], &[&["10", "rent"], &["5", "food"]]);
        let second = table(&["amount", "category"], &[&["7.5", "fuel"]]);
        let dataset = normalize(&[first, second]).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.all_columns(), ["amount", "category"]);
        assert_eq!(dataset.numeric_columns(), ["amount"]);
        assert_eq!(
            dataset.column("amount").unwrap().values,
            vec![CellValue::Integer(10), CellValue::Integer(5), CellValue::Float(7.5)]
        );
    }

    #[test]
    fn numeric_only_when_uniform_across_tables() {
        let first = table(&["ref"], &[&["1001"]]);
        let second = table(&["ref"], &[&["A-17"]]);
        let dataset = normalize(&[first, second]).unwrap();
        assert!(dataset.numeric_columns().is_empty());
        assert_eq!(dataset.all_columns(), ["ref"]);
    }

    #[test]
    fn mismatched_columns_leave_gaps() {
        let first = table(&["month", "income"], &[&["Jan", "100"]]);
        let second = table(&["expense", "month"], &[&["40", "Feb"]]);
        let dataset = normalize(&[first, second]).unwrap();

        assert_eq!(dataset.all_columns(), ["month", "income", "expense"]);
        assert_eq!(
            dataset.column("income").unwrap().values,
            vec![CellValue::Integer(100), CellValue::Null]
        );
        assert_eq!(
            dataset.column("expense").unwrap().values,
            vec![CellValue::Null, CellValue::Integer(40)]
        );
        assert_eq!(dataset.numeric_columns(), ["income", "expense"]);
    }
}
