//! Download orchestration: one remote retrieval per planned period unit,
//! skipped when the target file is already on disk.

pub mod monthly;
pub mod report;
pub mod selection;
pub mod swath;

pub use report::{FetchReport, UnitOutcome};
pub use selection::{FirstProduct, FixedSelection, ProductSelector, SelectedProduct};

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{DownloadRequest, InputType, ProcessingLevel};
use crate::remote::{FileTransfer, ProductHub};
use crate::utils::constants::{DEFAULT_L3_BASE_URL, DEFAULT_QUERY_LIMIT};
use crate::utils::ProgressReporter;

pub struct Fetcher<H: ProductHub, T: FileTransfer> {
    hub: H,
    transfer: T,
    output_root: PathBuf,
    hub_location: String,
    l3_base_url: String,
    query_limit: usize,
    selector: Box<dyn ProductSelector>,
    reporter: ProgressReporter,
}

impl<H: ProductHub, T: FileTransfer> Fetcher<H, T> {
    pub fn new(hub: H, transfer: T, output_root: impl Into<PathBuf>) -> Self {
        Self {
            hub,
            transfer,
            output_root: output_root.into(),
            hub_location: "the data hub".to_string(),
            l3_base_url: DEFAULT_L3_BASE_URL.to_string(),
            query_limit: DEFAULT_QUERY_LIMIT,
            selector: Box::new(FirstProduct),
            reporter: ProgressReporter::plain(),
        }
    }

    pub fn with_hub_location(mut self, location: &str) -> Self {
        self.hub_location = location.to_string();
        self
    }

    pub fn with_l3_base_url(mut self, base_url: &str) -> Self {
        self.l3_base_url = base_url.to_string();
        self
    }

    pub fn with_query_limit(mut self, limit: usize) -> Self {
        self.query_limit = limit.max(1);
        self
    }

    pub fn with_selector(mut self, selector: Box<dyn ProductSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    /// Retrieve everything `request` covers
    pub async fn run(&self, request: &DownloadRequest) -> Result<FetchReport> {
        fs::create_dir_all(&self.output_root).await?;
        info!(
            "Fetching {} {} {} from {} to {} ({} mode)",
            request.mission(),
            request.level(),
            request.parameter(),
            request.start_date(),
            request.end_date(),
            request.input_type().name()
        );

        let report = match (request.level(), request.input_type()) {
            (ProcessingLevel::L2, InputType::Query) => self.fetch_swaths_by_query(request).await?,
            (ProcessingLevel::L2, InputType::Manual(selection)) => {
                self.fetch_swaths_manual(request, selection).await?
            }
            (ProcessingLevel::L3, _) => self.fetch_monthly_grids(request).await?,
        };

        self.reporter.finish_with_message(&report.summary());
        Ok(report)
    }

    fn say(&self, message: &str) {
        self.reporter.println(message);
    }
}

pub(crate) async fn is_file(path: &Path) -> bool {
    matches!(fs::metadata(path).await, Ok(meta) if meta.is_file())
}

/// Remove `dir` when nothing landed in it. Returns true if it was removed.
pub(crate) async fn remove_if_empty(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    if entries.next_entry().await?.is_none() {
        fs::remove_dir(dir).await?;
        debug!("Removed empty directory {}", dir.display());
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_remove_if_empty() -> Result<()> {
        let root = TempDir::new()?;
        let empty = root.path().join("empty");
        let full = root.path().join("full");
        std::fs::create_dir_all(&empty)?;
        std::fs::create_dir_all(&full)?;
        std::fs::write(full.join("x.nc"), b"data")?;

        assert!(remove_if_empty(&empty).await?);
        assert!(!empty.exists());
        assert!(!remove_if_empty(&full).await?);
        assert!(full.exists());
        assert!(!remove_if_empty(&root.path().join("missing")).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_is_file() -> Result<()> {
        let root = TempDir::new()?;
        let file = root.path().join("f");
        std::fs::write(&file, b"1")?;
        assert!(is_file(&file).await);
        assert!(!is_file(root.path()).await);
        assert!(!is_file(&root.path().join("nope")).await);
        Ok(())
    }
}
