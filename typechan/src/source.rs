use std::time::Duration;

use keystone::{FetchError, QuoteSource};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::QuoteSettings;

/// The part of a quote API response we care about
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    content: String,
}

/// Fetches random quotes from a quotable-compatible HTTP endpoint
#[derive(Debug)]
pub struct HttpQuoteSource {
    client: Client,
    url: String,
}

impl HttpQuoteSource {
    pub fn new(settings: &QuoteSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|error| FetchError::Transport(error.to_string()))?;

        Ok(Self {
            client,
            url: request_url(&settings.url, settings.min_length),
        })
    }
}

impl QuoteSource for HttpQuoteSource {
    fn fetch_one(&self) -> Result<String, FetchError> {
        debug!(url = %self.url, "fetching quote");

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|error| FetchError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|error| FetchError::Transport(error.to_string()))?;
        parse_response(&body)
    }
}

fn request_url(base: &str, min_length: usize) -> String {
    if min_length == 0 {
        return base.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}minLength={min_length}")
}

fn parse_response(body: &str) -> Result<String, FetchError> {
    serde_json::from_str::<QuoteResponse>(body)
        .map(|response| response.content)
        .map_err(|error| FetchError::Payload(error.to_string()))
}
