// File: src/fetch.rs
//! Downloads the full subject listing, page by page.
//! No retries or rate limiting: a failed page fails the whole download.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct Page {
    data: Vec<Value>,
    pages: Pages,
}

#[derive(Debug, Deserialize)]
struct Pages {
    next_url: Option<String>,
}

pub struct SubjectFetcher {
    client: Client,
    api: ApiConfig,
    token: String,
}

impl SubjectFetcher {
    pub fn new(api: ApiConfig, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, api, token: token.into() })
    }

    /// Follows `pages.next_url` until the listing ends and returns every record untouched.
    pub fn fetch_all(&self) -> Result<Vec<Value>> {
        let mut subjects = Vec::new();
        let mut next = Some(self.api.base_url.clone());

        while let Some(url) = next {
            let page = self.fetch_page(&url)?;
            debug!(url = %url, records = page.data.len(), "fetched page");
            subjects.extend(page.data);
            next = page.pages.next_url;
        }

        info!(subjects = subjects.len(), "subject listing downloaded");
        Ok(subjects)
    }

    fn fetch_page(&self, url: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .header("Wanikani-Revision", &self.api.revision)
            .bearer_auth(&self.token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api { status: status.as_u16(), url: url.to_string() });
        }
        Ok(response.json()?)
    }
}
