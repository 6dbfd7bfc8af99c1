use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::error::{FetchError, Result};
use crate::remote::http::write_body;
use crate::remote::{HubProduct, HubQuery, ProductHub};

/// Client for a DHuS data hub (OpenSearch search, OData download).
pub struct DhusClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl DhusClient {
    pub fn new(base_url: &str, username: &str, password: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn product_url(&self, product_id: &str) -> String {
        format!("{}/odata/v1/Products('{}')/$value", self.base_url, product_id)
    }
}

#[async_trait]
impl ProductHub for DhusClient {
    #[instrument(skip(self, query), fields(mode = %query.mode, day = %query.window.token()))]
    async fn query(&self, query: &HubQuery) -> Result<Vec<HubProduct>> {
        let q = query.to_search_string();
        debug!("Hub search: {}", q);

        let rows = query.limit.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .query(&[
                ("q", q.as_str()),
                ("rows", rows.as_str()),
                ("start", "0"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = serde_json::from_str(&response.text().await?)?;
        let mut products = parse_search_response(&body)?;
        products.truncate(query.limit);

        info!("Hub returned {} products", products.len());
        Ok(products)
    }

    #[instrument(skip(self, target))]
    async fn download(&self, product_id: &str, target: &Path) -> Result<u64> {
        let response = self
            .client
            .get(self.product_url(product_id))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?
            .error_for_status()?;

        write_body(response, target).await
    }
}

/// Extract `(id, title)` pairs from an OpenSearch JSON feed.
/// `feed.entry` is absent for zero hits and an object (not an array) for one hit.
pub fn parse_search_response(body: &Value) -> Result<Vec<HubProduct>> {
    let feed = body
        .get("feed")
        .ok_or_else(|| FetchError::Hub("Search response has no 'feed'".to_string()))?;

    let entries: Vec<&Value> = match feed.get("entry") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        Some(other) => {
            return Err(FetchError::Hub(format!(
                "Unexpected 'entry' value in search response: {}",
                other
            )))
        }
    };

    entries
        .into_iter()
        .map(|entry| {
            let id = entry.get("id").and_then(Value::as_str);
            let title = entry.get("title").and_then(Value::as_str);
            match (id, title) {
                (Some(id), Some(title)) => Ok(HubProduct {
                    id: id.to_string(),
                    title: title.to_string(),
                }),
                _ => Err(FetchError::Hub(
                    "Search entry is missing 'id' or 'title'".to_string(),
                )),
            }
        })
        .collect()
}
