use super::{build_http_client, fetch_text};
use crate::{
    error::{AppError, Result},
    logging::NetworkLogger,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Geolocation record; absent fields decode as empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoInfo {
    pub success: bool,
    pub ip: String,
    pub country: String,
    pub city: String,
    pub region: String,
    pub isp: String,
    pub org: String,
}

impl GeoInfo {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Country: {}", self.country),
            format!("City: {}", self.city),
            format!("Org: {}", self.org),
            format!("ISP: {}", self.isp),
            format!("Region: {}", self.region),
            String::new(),
        ]
    }
}

/// A decoded answer: either a record or the service's refusal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoOutcome {
    Found(GeoInfo),
    Rejected,
}

pub struct GeoLookup {
    client: Client,
    base_url: String,
    logger: NetworkLogger,
}

impl GeoLookup {
    pub fn new(base_url: &str, timeout: Duration, logger: NetworkLogger) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.to_string(),
            logger,
        })
    }

    /// Query `<base_url><target>`. Transport failures and undecodable bodies
    /// are errors (`Parse` for the latter); `success = false` is `Rejected`.
    pub async fn lookup(&self, target: &str) -> Result<GeoOutcome> {
        let url = format!("{}{}", self.base_url, target);
        let (_, body) = fetch_text(&self.client, &self.logger, &url).await?;

        let info: GeoInfo = serde_json::from_str(&body)?;
        if info.success {
            Ok(GeoOutcome::Found(info))
        } else {
            Ok(GeoOutcome::Rejected)
        }
    }
}

/// Console lines for a lookup result
pub fn render(result: &Result<GeoOutcome>) -> Vec<String> {
    match result {
        Ok(GeoOutcome::Found(info)) => info.lines(),
        Ok(GeoOutcome::Rejected) => vec!["Error: Failed to get info!".to_string()],
        Err(AppError::Parse(_)) => vec!["Error parsing response!".to_string()],
        Err(_) => vec!["Error fetching info!".to_string()],
    }
}
