use std::sync::Arc;

use log::debug;

use super::cache::CachedTables;
use super::document::{Document, DocumentKind};
use super::model::Table;
use super::pdf::PdfBackend;
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Extract the tables of a document. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – exactly one table, header row first
/// * `.pdf` – every table detected on every page, through `pdf`
///
/// A PDF with no detectable table fails with [`PipelineError::NoTablesFound`].
/// The kind is checked before any bytes are read.
pub fn extract(document: &Document, pdf: &dyn PdfBackend) -> Result<Vec<Table>> {
    extract_with(document, |doc| extract_pdf(doc, pdf).map(Arc::new)).map(Arc::unwrap_or_clone)
}

/// Extension dispatch shared by [`extract`] and the pipeline.
///
/// CSV is parsed in place. PDF documents are handed to `pdf`, which lets a
/// caller put a cache in front of [`extract_pdf`].
pub fn extract_with<F>(document: &Document, pdf: F) -> Result<CachedTables>
where
    F: FnOnce(&Document) -> Result<CachedTables>,
{
    match document.kind()? {
        DocumentKind::DelimitedText => Ok(Arc::new(vec![parse_delimited(document.bytes())?])),
        DocumentKind::Pdf => pdf(document),
    }
}

/// Run the PDF backend and turn an empty result into `NoTablesFound`.
pub fn extract_pdf(document: &Document, pdf: &dyn PdfBackend) -> Result<Vec<Table>> {
    let tables = pdf.extract_tables(document.bytes())?;
    if tables.is_empty() {
        return Err(PipelineError::NoTablesFound);
    }
    debug!("{}: {} table(s) extracted", document.name(), tables.len());
    Ok(tables)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per row.
/// Every record must have as many fields as the header.
pub fn parse_delimited(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::ExtractionFailure(format!("reading CSV headers: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(PipelineError::ExtractionFailure(
            "no columns to parse from file".to_string(),
        ));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line());
            PipelineError::ExtractionFailure(format!("CSV line {line}: {e}"))
        })?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Table::from_records(&headers, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, ColumnType};

    struct NoTables;

    impl PdfBackend for NoTables {
        fn extract_tables(&self, _bytes: &[u8]) -> Result<Vec<Table>> {
            Ok(Vec::new())
        }
    }

    struct Panics;

    impl PdfBackend for Panics {
        fn extract_tables(&self, _bytes: &[u8]) -> Result<Vec<Table>> {
            panic!("must not be called");
        }
    }

    #[test]
    fn csv_yields_one_typed_table() {
        let doc = Document::new(
            "spend.csv",
            "amount,category\n12.5,food\n900,rent\n40,travel\n",
        );
        let tables = extract(&doc, &Panics).unwrap();
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.num_rows(), 3);
        let amount = table.column("amount").unwrap();
        assert_eq!(amount.column_type(), ColumnType::Numeric);
        assert_eq!(amount.values[0], CellValue::Float(12.5));
        assert_eq!(table.column("category").unwrap().column_type(), ColumnType::Text);
    }

    #[test]
    fn csv_with_quoted_delimiters() {
        let table = parse_delimited(b"payee,amount\n\"Smith, J\",10\n").unwrap();
        assert_eq!(
            table.column("payee").unwrap().values,
            vec![CellValue::Text("Smith, J".into())]
        );
    }

    #[test]
    fn csv_wrong_field_count_fails() {
        let err = parse_delimited(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(err, PipelineError::ExtractionFailure(_)));
    }

    #[test]
    fn csv_errors_name_the_file_line() {
        // header on line 1, the bad record on line 4
        let err = parse_delimited(b"a,b\n1,2\n3,4\n5,6,7\n").unwrap_err();
        assert!(
            matches!(&err, PipelineError::ExtractionFailure(msg) if msg.starts_with("CSV line 4:")),
            "{err}"
        );
    }

    #[test]
    fn header_names_are_kept_as_written() {
        let table = parse_delimited(b" amount ,category\n1,food\n").unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec![" amount ", "category"]);
    }

    #[test]
    fn empty_csv_fails() {
        let err = parse_delimited(b"").unwrap_err();
        assert!(matches!(err, PipelineError::ExtractionFailure(_)));
    }

    #[test]
    fn header_only_csv_is_an_empty_table() {
        let table = parse_delimited(b"amount,category\n").unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 2);
    }

    #[test]
    fn pdf_without_tables_is_distinct_failure() {
        let doc = Document::new("scan.pdf", b"%PDF-1.7".to_vec());
        assert_eq!(extract(&doc, &NoTables).unwrap_err(), PipelineError::NoTablesFound);
    }

    #[test]
    fn unsupported_extension_never_reaches_a_parser() {
        let doc = Document::new("ledger.xlsx", b"PK\x03\x04".to_vec());
        let err = extract(&doc, &Panics).unwrap_err();
        assert_eq!(err, PipelineError::UnsupportedFormat(".xlsx".into()));
    }

    #[test]
    fn pdf_hook_only_sees_pdf_documents() {
        let mut seen = Vec::new();
        let csv = Document::new("jan.csv", "amount\n1\n");
        let tables = extract_with(&csv, |doc| {
            seen.push(doc.name().to_string());
            Ok(Arc::new(Vec::new()))
        })
        .unwrap();
        assert_eq!(tables.len(), 1);
        assert!(seen.is_empty());

        let pdf = Document::new("feb.pdf", b"%PDF-1.7".to_vec());
        let tables = extract_with(&pdf, |doc| {
            seen.push(doc.name().to_string());
            Ok(Arc::new(Vec::new()))
        })
        .unwrap();
        assert!(tables.is_empty());
        assert_eq!(seen, vec!["feb.pdf"]);
    }
}
