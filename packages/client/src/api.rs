//! `reqwest`-backed implementation of the collaborator traits.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use suc_status_station_models::{
    ApiMessage, CountrySummary, HistoryEntry, OverviewRow, Report, Station, StationStats,
    StationSummary,
};

use crate::{ClientConfig, ClientError, ReportApi, StationDirectory, StatsApi};

/// Stateless HTTP client for the status API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the base URL cannot carry
    /// path segments, or [`ClientError::Http`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.api_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        log::debug!("GET {url}");
        let resp = self.client.get(url).query(query).send().await?;
        let resp = check_status(resp).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            message: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Turns a non-success response into [`ClientError::Status`], reading the
/// optional `{message}` body.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .ok()
        .and_then(|m| m.message);

    log::warn!("Request failed with {status}: {body}");

    Err(ClientError::Status {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        message,
    })
}

#[async_trait]
impl StationDirectory for ApiClient {
    async fn lookup(&self, query: &str) -> Result<Vec<Station>, ClientError> {
        self.get_json(self.endpoint(&["lookup"]), &[("query", query.to_string())])
            .await
    }
}

#[async_trait]
impl ReportApi for ApiClient {
    async fn submit(&self, report: &Report) -> Result<(), ClientError> {
        let endpoint = report.kind().endpoint().trim_start_matches('/');
        let url = self.endpoint(&[endpoint]);
        log::info!("POST {url} for {}", report.location_id());

        let req = self.client.post(url);
        let req = match report {
            Report::Standard(r) => req.json(r),
            Report::Interruption(r) => req.json(r),
            Report::ChargingStatus(r) => req.json(r),
        };

        let resp = req.send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl StatsApi for ApiClient {
    async fn country_summaries(&self) -> Result<Vec<CountrySummary>, ClientError> {
        self.get_json(self.endpoint(&["stats"]), &[]).await
    }

    async fn country_stations(&self, country: &str) -> Result<Vec<StationSummary>, ClientError> {
        self.get_json(self.endpoint(&["stats", "country", country]), &[])
            .await
    }

    async fn station_stats(&self, location_id: &str) -> Result<StationStats, ClientError> {
        self.get_json(self.endpoint(&["stats", "superCharger", location_id]), &[])
            .await
    }

    async fn history(&self, limit: u32, filter: &str) -> Result<Vec<HistoryEntry>, ClientError> {
        self.get_json(
            self.endpoint(&["checkin"]),
            &[("limit", limit.to_string()), ("filter", filter.to_string())],
        )
        .await
    }

    async fn overview(&self) -> Result<Vec<OverviewRow>, ClientError> {
        self.get_json(self.endpoint(&["overview"]), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(&ClientConfig {
            api_url: url.to_string(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_joins_segments() {
        let api = client("http://localhost:5000");
        assert_eq!(
            api.endpoint(&["stats", "superCharger", "dietikon"]).as_str(),
            "http://localhost:5000/stats/superCharger/dietikon"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_segments() {
        let api = client("https://example.org/suc/");
        assert_eq!(
            api.endpoint(&["stats", "country", "United Kingdom"]).as_str(),
            "https://example.org/suc/stats/country/United%20Kingdom"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = ApiClient::new(&ClientConfig {
            api_url: "mailto:someone@example.org".to_string(),
            ..ClientConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));

        assert!(matches!(
            parse_base_url("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }
}
