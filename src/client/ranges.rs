use super::{build_http_client, fetch_text};
use crate::{error::Result, logging::NetworkLogger, output::Presenter};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// Published ranges for one address family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeList {
    pub family: AddressFamily,
    pub ranges: Vec<String>,
}

impl RangeList {
    /// Keep every non-empty trimmed line
    pub fn parse(family: AddressFamily, body: &str) -> Self {
        Self {
            family,
            ranges: body
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.ranges.len()
    }
}

pub struct RangeFetcher {
    client: Client,
    ipv4_url: String,
    ipv6_url: String,
    logger: NetworkLogger,
}

impl RangeFetcher {
    pub fn new(ipv4_url: &str, ipv6_url: &str, timeout: Duration, logger: NetworkLogger) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            ipv4_url: ipv4_url.to_string(),
            ipv6_url: ipv6_url.to_string(),
            logger,
        })
    }

    pub async fn fetch(&self, family: AddressFamily) -> Result<RangeList> {
        let url = match family {
            AddressFamily::V4 => &self.ipv4_url,
            AddressFamily::V6 => &self.ipv6_url,
        };
        let (_, body) = fetch_text(&self.client, &self.logger, url).await?;
        Ok(RangeList::parse(family, &body))
    }

    /// Fetch and render one family; a failed fetch renders an error line instead
    pub async fn section(&self, family: AddressFamily, presenter: &Presenter) -> Vec<String> {
        let mut lines = vec![presenter.header(&format!("CloudFlare {} Ranges:", family))];

        match self.fetch(family).await {
            Ok(list) => {
                lines.extend(list.ranges.iter().map(|range| format!("  {}", range)));
                lines.push(String::new());
                lines.push(format!("Total {} ranges: {}", family, list.count()));
            }
            Err(e) => lines.push(presenter.error_line(&format!("Failed to fetch {} ranges: {}", family, e.detail()))),
        }

        lines.push(String::new());
        lines
    }
}
