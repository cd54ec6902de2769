use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{PlacesError, Result};

// ─── HttpClient ───────────────────────────────────────────────────────────────

/// Thin JSON-over-HTTP client. One attempt per request, no retries.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }

    pub async fn get(&self, url: &Url) -> Result<String> {
        debug!(%url, "GET");
        let resp = self.client.get(url.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlacesError::ApiError(
                url.to_string(),
                format!("HTTP {}: {body}", status.as_u16()),
            ));
        }

        resp.text().await.map_err(PlacesError::Http)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let text = self.get(url).await?;
        serde_json::from_str(&text).map_err(|e| PlacesError::Parse(e.to_string()))
    }
}

pub fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url).map_err(|e| PlacesError::InvalidUrl(base_url.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/boom")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = HttpClient::new(Duration::from_secs(5), "placefind-test").unwrap();
        let url = parse_base_url(&format!("{}/boom", server.url())).unwrap();
        let err = client.get(&url).await.unwrap_err();

        match err {
            PlacesError::ApiError(_, msg) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("maintenance"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_relative_base_url() {
        assert!(matches!(
            parse_base_url("maps/autocomplete"),
            Err(PlacesError::InvalidUrl(_, _))
        ));
    }
}
