use std::path::PathBuf;

/// Header pairs and cleaned body pulled out of one cable page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CableDocument {
    /// Ordered `(label, value)` pairs; labels may repeat.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Where a converted cable is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPath {
    pub directory: PathBuf,
    pub filename: String,
}

impl OutputPath {
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Totals for one run over an input tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertSummary {
    pub converted: usize,
    pub failed: usize,
    pub skipped: usize,
}
