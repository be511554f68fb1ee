use std::time::Duration;

use futures_util::{FutureExt, future::BoxFuture};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://open-bus-stride-api.hasadna.org.il";

/// Every variant propagates the same way: the route boundary catches it.
/// They only differ in the message shown to the user.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not reach the transit data service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("the transit data service answered {0}")]
    Status(StatusCode),
    #[error("the transit data service sent an unreadable record: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where GTFS route records come from.
pub trait RecordSource: Send + Sync {
    fn fetch_route<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, LoadError>>;
}

#[derive(Debug, Clone)]
pub struct StrideClient {
    http: reqwest::Client,
    api_base: String,
}

impl StrideClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<StrideClient, LoadError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()?;

        Ok(StrideClient {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
        })
    }

    /// The id goes into the query as is, without further encoding.
    pub fn route_url(&self, id: &str) -> String {
        format!("{}/gtfs_routes/get?id={id}", self.api_base)
    }
}

impl RecordSource for StrideClient {
    fn fetch_route<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, LoadError>> {
        async move {
            let url = self.route_url(id);
            debug!(%url, "fetching gtfs route");

            let response = self.http.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                warn!(%url, %status, "gtfs route request failed");
                return Err(LoadError::Status(status));
            }

            let body = response.bytes().await?;
            let record = serde_json::from_slice(&body).inspect_err(|err| {
                warn!(%url, %err, "gtfs route record is not json");
            })?;
            Ok(record)
        }
        .boxed()
    }
}
