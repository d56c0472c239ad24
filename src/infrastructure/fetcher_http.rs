use reqwest::{Client, StatusCode, header::ACCEPT};

use crate::{FetchError, FetchOutcome, Package, PageFetcher, PageRequest, StdResult};

/// The production endpoint for the libraries.io API.
pub const LIBRARIES_IO_API_ENDPOINT: &str = "https://libraries.io/api";

/// Fixed sort parameters for the listing search.
const SORT_KEY: &str = "rank";
const SORT_ORDER: &str = "desc";

/// Fetches pages of packages from the listing REST API.
pub struct HttpListingFetcher {
    client: Client,
    endpoint: String,
    api_key: String,
    platforms: String,
}

impl HttpListingFetcher {
    /// Creates a new `HttpListingFetcher` instance for the given endpoint,
    /// API key and platforms filter.
    pub fn try_new(endpoint: &str, api_key: &str, platforms: &str) -> StdResult<Self> {
        let client = Client::builder().user_agent("registry-crawler").build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            platforms: platforms.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpListingFetcher {
    /// Performs one listing API call, classifying the response.
    async fn fetch(&self, request: &PageRequest) -> StdResult<FetchOutcome> {
        let response = self
            .client
            .get(format!("{}/search", self.endpoint))
            .query(&[
                ("api_key", self.api_key.clone()),
                ("platforms", self.platforms.clone()),
                ("sort", SORT_KEY.to_string()),
                ("order", SORT_ORDER.to_string()),
                ("page", request.page().to_string()),
                ("per_page", request.per_page().to_string()),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                return Ok(FetchOutcome::Transient(FetchError::Transport(
                    e.to_string(),
                )));
            }
        };

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Ok(FetchOutcome::RateLimited),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Ok(FetchOutcome::Transient(FetchError::Status(
                    status.as_u16(),
                    body,
                )))
            }
            _ => match response.json::<Vec<Package>>().await {
                Ok(packages) => Ok(FetchOutcome::Success(packages)),
                Err(e) => Ok(FetchOutcome::Transient(FetchError::Parse(e.to_string()))),
            },
        }
    }
}
