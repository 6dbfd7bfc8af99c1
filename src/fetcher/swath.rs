use tokio::fs;
use tracing::{info, warn};

use crate::error::{FetchError, Result};
use crate::fetcher::{is_file, remove_if_empty, FetchReport, Fetcher, SelectedProduct, UnitOutcome};
use crate::models::{plan_days, DayWindow, DownloadRequest, ManualSelection, ProductType};
use crate::remote::{FileTransfer, HubProduct, HubQuery, ProcessingMode, ProductHub};
use crate::utils::layout::{manual_swath_dir, swath_dir, swath_file_name};

impl<H: ProductHub, T: FileTransfer> Fetcher<H, T> {
    /// L2 query mode. Each day is searched and a product selected, but only the
    /// selection from the last day is downloaded.
    pub(crate) async fn fetch_swaths_by_query(&self, request: &DownloadRequest) -> Result<FetchReport> {
        let product_type = ProductType::resolve(request.parameter());
        let mut report = FetchReport::default();

        self.say(&format!(
            "WARNING: The maximum number of items that can be shown is {}.",
            self.query_limit
        ));
        self.say(&format!("You can see all the results at {}.", self.hub_location));

        let mut last_selection: Option<SelectedProduct> = None;
        for day in plan_days(request.start_date(), request.end_date()) {
            let query = HubQuery::new(
                request.mission(),
                request.bbox(),
                product_type,
                day,
                self.query_limit,
            );

            let Some(products) = self.search_with_fallback(&query).await? else {
                self.say("There are no results in the offline archives. The code will be interrupted.");
                warn!("No {} products for {}, aborting run", product_type, day.token());
                report.aborted_on = Some(day.token());
                return Ok(report);
            };

            for (i, product) in products.iter().enumerate() {
                self.say(&format!("Number {}-{}", i, product.title));
            }

            last_selection = Some(self.choose(&day, &products)?);
            self.reporter.increment(1);
        }

        let Some(selected) = last_selection else {
            return Ok(report);
        };

        self.say("SELECTED");
        self.say(&format!("File name: {}", selected.file_id));
        self.say(&format!("Product name: {}", selected.product_name));

        let dir = swath_dir(
            &self.output_root,
            request.mission(),
            request.parameter(),
            &selected.day,
        );
        let target = dir.join(&selected.product_name);
        let token = selected.day.token();

        let outcome = if is_file(&target).await {
            self.say("The file exists, it will not be downloaded again.");
            UnitOutcome::AlreadyPresent { token, path: target }
        } else {
            self.say("The file does not exist, it will be downloaded.");
            self.say(&format!("Downloading {}...", selected.product_name));
            fs::create_dir_all(&dir).await?;
            let bytes = self.hub.download(&selected.file_id, &target).await?;
            UnitOutcome::Downloaded { token, path: target, bytes }
        };
        report.outcomes.push(outcome);

        if !remove_if_empty(&dir).await? {
            self.say("Dataset was successfully downloaded!");
        }

        report.selection = Some(selected);
        Ok(report)
    }

    /// Near-real-time first, then the offline archive. `None` when both are empty.
    async fn search_with_fallback(&self, query: &HubQuery) -> Result<Option<Vec<HubProduct>>> {
        let products = self.hub.query(query).await?;
        if !products.is_empty() {
            return Ok(Some(products));
        }

        self.say(
            "There are no results for the processing mode NRT. \
             The search in the offline archives will start.",
        );
        let offline = query.clone().with_mode(ProcessingMode::Offline);
        let products = self.hub.query(&offline).await?;

        Ok(if products.is_empty() { None } else { Some(products) })
    }

    fn choose(&self, day: &DayWindow, products: &[HubProduct]) -> Result<SelectedProduct> {
        let index = self
            .reporter
            .suspend(|| self.selector.select(day, products))?
            .unwrap_or(0);

        let product = products.get(index).ok_or(FetchError::InvalidSelection {
            index,
            available: products.len(),
        })?;

        Ok(SelectedProduct {
            day: *day,
            file_id: product.id.clone(),
            product_name: swath_file_name(&product.title),
        })
    }

    /// L2 manual mode: the same hub product for every day, stored under
    /// `{root}/{YYYY-MM-DD}`.
    pub(crate) async fn fetch_swaths_manual(
        &self,
        request: &DownloadRequest,
        selection: &ManualSelection,
    ) -> Result<FetchReport> {
        let mut report = FetchReport::default();

        for day in plan_days(request.start_date(), request.end_date()) {
            let dir = manual_swath_dir(&self.output_root, &day);
            let target = dir.join(&selection.product_name);
            let token = day.token();

            if is_file(&target).await {
                self.say("The file exists, it will not be downloaded again.");
                report.outcomes.push(UnitOutcome::AlreadyPresent { token, path: target });
            } else {
                self.say("The file does not exist, it will be downloaded.");
                self.say(&format!("Downloading {}...", selection.product_name));
                fs::create_dir_all(&dir).await?;
                let bytes = self.hub.download(&selection.file_id, &target).await?;
                info!("{}: {} bytes", target.display(), bytes);
                report.outcomes.push(UnitOutcome::Downloaded { token, path: target, bytes });
            }

            if !remove_if_empty(&dir).await? {
                self.say("Dataset was successfully downloaded!");
            }
            self.reporter.increment(1);
        }

        Ok(report)
    }
}
