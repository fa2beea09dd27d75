use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Extraction path for a document, picked from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    DelimitedText,
    Pdf,
}

impl DocumentKind {
    /// Infer the kind from a file name's last extension (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(DocumentKind::DelimitedText),
            "pdf" => Ok(DocumentKind::Pdf),
            "" => Err(PipelineError::UnsupportedFormat(format!(
                "'{name}' has no extension"
            ))),
            other => Err(PipelineError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Content digest of a document's bytes. Byte-identical uploads share an
/// identity no matter what they were called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId([u8; 32]);

impl DocumentId {
    pub fn of(bytes: &[u8]) -> Self {
        DocumentId(*blake3::hash(bytes).as_bytes())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // short prefix is enough for log lines
        for byte in &self.0[..6] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// One uploaded file: its name and raw bytes. Never mutated by extraction.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk, naming it after the file.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn kind(&self) -> Result<DocumentKind> {
        DocumentKind::from_name(&self.name)
    }

    pub fn id(&self) -> DocumentId {
        DocumentId::of(&self.bytes)
    }
}
