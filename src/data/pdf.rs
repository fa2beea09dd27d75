//! PDF table extraction.
//!
//! PDFs carry no table structure, so tables are recovered from the page text
//! the way a stream-mode extractor does: cells are separated by tabs or runs
//! of two or more spaces, and a table is a run of consecutive lines that all
//! split into the same number of cells. The first line of a run is the header.

use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};

use super::model::Table;
use crate::error::{PipelineError, Result};

/// Turns raw PDF bytes into tables.
///
/// The pipeline and the extraction cache only see this trait, so callers can
/// plug in a different extractor (or a fake one in tests).
pub trait PdfBackend: Send + Sync {
    fn extract_tables(&self, bytes: &[u8]) -> Result<Vec<Table>>;
}

/// Default backend: `pdf-extract` for the text, layout detection for tables.
#[derive(Debug, Clone)]
pub struct TextLayoutBackend {
    min_columns: usize,
}

impl Default for TextLayoutBackend {
    fn default() -> Self {
        Self { min_columns: 2 }
    }
}

impl TextLayoutBackend {
    /// `min_columns` is the fewest cells a line needs to count as a table row.
    pub fn new(min_columns: usize) -> Self {
        Self {
            min_columns: min_columns.max(2),
        }
    }
}

impl PdfBackend for TextLayoutBackend {
    fn extract_tables(&self, bytes: &[u8]) -> Result<Vec<Table>> {
        let text = extract_text(bytes)?;

        let mut tables = Vec::new();
        for (page_no, page) in text.split('\u{c}').enumerate() {
            let found = detect_tables(page, self.min_columns)?;
            if !found.is_empty() {
                debug!("page {page_no}: detected {} table(s)", found.len());
            }
            tables.extend(found);
        }
        Ok(tables)
    }
}

fn extract_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract can panic on malformed fonts and streams
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("pdf text extraction failed: {e}");
            Err(PipelineError::ExtractionFailure(e.to_string()))
        }
        Err(_) => {
            warn!("pdf text extraction panicked");
            Err(PipelineError::ExtractionFailure(
                "PDF parser aborted on a malformed document".to_string(),
            ))
        }
    }
}

/// Find every table in a block of page text.
///
/// Blank lines do not end a table. A line repeating the header (as on a
/// continued page) is skipped. Runs without at least one data row are dropped.
pub fn detect_tables(text: &str, min_columns: usize) -> Result<Vec<Table>> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_cells(line);

        if let Some(header) = block.first() {
            if header.len() == cells.len() {
                if *header != cells {
                    block.push(cells);
                }
                continue;
            }
            flush_block(&mut block, &mut tables)?;
        }

        if cells.len() >= min_columns {
            block.push(cells);
        }
    }
    flush_block(&mut block, &mut tables)?;

    Ok(tables)
}

fn flush_block(block: &mut Vec<Vec<String>>, tables: &mut Vec<Table>) -> Result<()> {
    if block.len() >= 2 {
        tables.push(Table::from_records(&block[0], &block[1..])?);
    }
    block.clear();
    Ok(())
}

/// Split a text line on tabs and on runs of two or more spaces.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut gap = 0usize;

    for ch in line.trim().chars() {
        match ch {
            '\t' => gap = 2,
            ' ' | '\u{a0}' => gap += 1,
            _ => {
                if gap >= 2 {
                    cells.push(std::mem::take(&mut current));
                } else if gap == 1 {
                    current.push(' ');
                }
                gap = 0;
                current.push(ch);
            }
        }
    }
    if !current.is_empty() {
        cells.push(current);
    }
    cells
}
