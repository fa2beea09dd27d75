//! Shared test utilities: a scripted PDF backend.
//!
//! Fake "PDF" bytes are CSV text, so tests can describe the tables a real
//! extractor would find without shipping binary fixtures. Two payloads are
//! special: `EMPTY` yields no tables and `CORRUPT` fails.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use smart_finance::data::loader::parse_delimited;
use smart_finance::data::model::Table;
use smart_finance::data::pdf::PdfBackend;
use smart_finance::{PipelineError, Result};

#[derive(Default)]
pub struct ScriptedPdf {
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedPdf {
    pub fn slow(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PdfBackend for ScriptedPdf {
    fn extract_tables(&self, bytes: &[u8]) -> Result<Vec<Table>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match bytes {
            b"EMPTY" => Ok(Vec::new()),
            b"CORRUPT" => Err(PipelineError::ExtractionFailure(
                "xref table is damaged".to_string(),
            )),
            // tables separated by a blank line
            _ => String::from_utf8_lossy(bytes)
                .split("\n\n")
                .filter(|chunk| !chunk.trim().is_empty())
                .map(|chunk| parse_delimited(chunk.as_bytes()))
                .collect(),
        }
    }
}
