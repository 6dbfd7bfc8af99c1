//! Seams to the remote services: the S5P data hub (query + download) and
//! plain HTTP file transfer for L3 grids.

pub mod dhus;
pub mod http;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::models::{BoundingBox, DayWindow, Mission, ProductType};
use crate::utils::constants::HUB_PROCESSING_LEVEL;

pub use dhus::DhusClient;
pub use http::HttpTransfer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessingMode {
    NearRealTime,
    Offline,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::NearRealTime => "Near real time",
            ProcessingMode::Offline => "Offline",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Search parameters for one day of L2 products
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubQuery {
    /// WKT polygon the products must contain
    pub footprint: String,
    pub product_type: ProductType,
    pub processing_level: &'static str,
    pub platform: &'static str,
    pub instrument: &'static str,
    pub mode: ProcessingMode,
    pub window: DayWindow,
    pub limit: usize,
}

impl HubQuery {
    pub fn new(
        mission: Mission,
        bbox: &BoundingBox,
        product_type: ProductType,
        window: DayWindow,
        limit: usize,
    ) -> Self {
        Self {
            footprint: bbox.to_wkt(),
            product_type,
            processing_level: HUB_PROCESSING_LEVEL,
            platform: mission.platform_name(),
            instrument: mission.instrument_name(),
            mode: ProcessingMode::NearRealTime,
            window,
            limit,
        }
    }

    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.mode = mode;
        self
    }

    /// OpenSearch `q` expression understood by DHuS
    pub fn to_search_string(&self) -> String {
        let start = self.window.start_iso();
        let end = self.window.end_iso();
        [
            format!("producttype:{}", self.product_type),
            format!("processinglevel:{}", self.processing_level),
            format!("platformname:\"{}\"", self.platform),
            format!("instrumentname:\"{}\"", self.instrument),
            format!("processingmode:\"{}\"", self.mode),
            format!("beginPosition:[{} TO {}]", start, end),
            format!("endPosition:[{} TO {}]", start, end),
            format!("footprint:\"Contains({})\"", self.footprint),
        ]
        .join(" AND ")
    }
}

/// One hub search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubProduct {
    pub id: String,
    pub title: String,
}

#[async_trait]
pub trait ProductHub: Send + Sync {
    /// Ordered search results, at most `query.limit`
    async fn query(&self, query: &HubQuery) -> Result<Vec<HubProduct>>;

    /// Retrieve product `product_id` into `target`, returning bytes written
    async fn download(&self, product_id: &str, target: &Path) -> Result<u64>;
}

#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// GET `url` into `target`; an unavailable resource leaves a zero-byte file
    async fn fetch(&self, url: &str, target: &Path) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Parameter;
    use chrono::NaiveDate;

    #[test]
    fn test_search_string() {
        let bbox = BoundingBox::new(0.0, 10.0, 40.0, 50.0).unwrap();
        let window = DayWindow::for_date(NaiveDate::from_ymd_opt(2021, 3, 9).unwrap());
        let query = HubQuery::new(
            Mission::Sentinel5P,
            &bbox,
            ProductType::resolve(Parameter::NO2),
            window,
            10,
        )
        .with_mode(ProcessingMode::Offline);

        let q = query.to_search_string();
        assert!(q.starts_with("producttype:L2__NO2___ AND processinglevel:L2"));
        assert!(q.contains("platformname:\"Sentinel-5 Precursor\""));
        assert!(q.contains("processingmode:\"Offline\""));
        assert!(q.contains("beginPosition:[2021-03-09T00:00:00Z TO 2021-03-09T23:00:00Z]"));
        assert!(q.ends_with("footprint:\"Contains(POLYGON((0 40,0 50,10 50,10 40,0 40)))\""));
    }
}
