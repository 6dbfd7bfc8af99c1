use tokio::fs;
use tracing::{info, warn};

use crate::error::Result;
use crate::fetcher::{is_file, FetchReport, Fetcher, UnitOutcome};
use crate::models::{plan_months, DownloadRequest};
use crate::remote::{FileTransfer, ProductHub};
use crate::utils::layout::{monthly_dir, monthly_file_name, monthly_url};

impl<H: ProductHub, T: FileTransfer> Fetcher<H, T> {
    /// L3 monthly grids. Each month is independent: an unavailable month is
    /// reported and the loop moves on.
    pub(crate) async fn fetch_monthly_grids(&self, request: &DownloadRequest) -> Result<FetchReport> {
        let parameter = request.parameter();
        let mut report = FetchReport::default();

        for month in plan_months(request.start_date(), request.end_date()) {
            let dir = monthly_dir(&self.output_root, request.mission(), parameter, &month);
            fs::create_dir_all(&dir).await?;

            let file_name = monthly_file_name(parameter, &month);
            let target = dir.join(&file_name);
            let token = month.token();

            if is_file(&target).await {
                self.say(&format!("{} exists, it will not be downloaded again.", file_name));
                report.outcomes.push(UnitOutcome::AlreadyPresent { token, path: target });
                self.reporter.increment(1);
                continue;
            }

            let url = monthly_url(&self.l3_base_url, parameter, &month);
            self.say(&format!("Downloading {}...", url));
            self.transfer.fetch(&url, &target).await?;

            let size = match fs::metadata(&target).await {
                Ok(meta) => meta.len(),
                Err(_) => 0,
            };

            if size == 0 {
                if is_file(&target).await {
                    fs::remove_file(&target).await?;
                }
                warn!("No L3 {} dataset for {}", parameter, token);
                self.say(&format!("The dataset for {} is not available.", token));
                report.outcomes.push(UnitOutcome::Unavailable { token });
            } else {
                info!("Saved {} ({} bytes)", target.display(), size);
                self.say(&format!("Dataset {} was successfully downloaded!", file_name));
                report.outcomes.push(UnitOutcome::Downloaded {
                    token,
                    path: target,
                    bytes: size,
                });
            }
            self.reporter.increment(1);
        }

        Ok(report)
    }
}
