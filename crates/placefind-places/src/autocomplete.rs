use std::time::Duration;

use async_trait::async_trait;
use placefind_core::{PlaceSource, QueryResult, SearchConfig};
use reqwest::Url;
use tracing::debug;

use crate::error::Result;
use crate::http::{HttpClient, parse_base_url};

const SEARCH_PARAM: &str = "search";

/// Address autocomplete endpoint: `GET <base>?search=<text>`.
pub struct AutocompleteSource {
    client: HttpClient,
    base_url: Url,
}

impl AutocompleteSource {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Self::with_params(
            &config.base_url,
            config.request_timeout(),
            &config.user_agent,
        )
    }

    pub fn with_params(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(timeout, user_agent)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Request URL for `text`. Any `search` parameter already present on
    /// the base URL is replaced.
    pub fn search_url(&self, text: &str) -> Url {
        let mut url = self.base_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| *k != SEARCH_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.set_query(None);
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &kept {
                pairs.append_pair(k, v);
            }
            pairs.append_pair(SEARCH_PARAM, text);
        }
        url
    }

    pub async fn lookup(&self, text: &str) -> Result<QueryResult> {
        let url = self.search_url(text);
        let result: QueryResult = self.client.get_json(&url).await?;
        debug!(
            text,
            options = result.options().len(),
            status = result.status,
            "autocomplete response"
        );
        Ok(result)
    }
}

#[async_trait]
impl PlaceSource for AutocompleteSource {
    fn name(&self) -> &str {
        "autocomplete"
    }

    async fn search(&self, text: &str) -> placefind_core::Result<QueryResult> {
        Ok(self.lookup(text).await?)
    }
}
