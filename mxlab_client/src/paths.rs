//! Where exported artifacts land.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ExportPaths {
    dir: PathBuf,
}

impl ExportPaths {
    /// The platform downloads directory when there is one, else the working
    /// directory.
    pub fn new() -> Self {
        let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }

    pub fn results_file(&self) -> PathBuf {
        self.dir.join("results.csv")
    }
}

impl Default for ExportPaths {
    fn default() -> Self {
        Self::new()
    }
}
