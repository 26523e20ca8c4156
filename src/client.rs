//! Single-shot HTTP tools: reachability (CHECK), geolocation (INFO) and
//! published address ranges (CFIP)

pub mod geo;
pub mod ranges;
pub mod reachability;

pub use geo::{GeoInfo, GeoLookup, GeoOutcome};
pub use ranges::{AddressFamily, RangeFetcher, RangeList};
pub use reachability::{ReachabilityChecker, ReachabilityReport};

use crate::{
    defaults::USER_AGENT,
    error::{AppError, Result},
    logging::NetworkLogger,
    models::Config,
};
use reqwest::Client;
use std::time::{Duration, Instant};

/// Build a client with the given overall request timeout
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))
}

/// GET `url` and return the status code and body text, logging the exchange
pub(crate) async fn fetch_text(client: &Client, logger: &NetworkLogger, url: &str) -> Result<(u16, String)> {
    let start = Instant::now();
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            logger.log_http_request(url, "GET", None, elapsed_ms(start)).await;
            return Err(e.into());
        }
    };

    let status = response.status().as_u16();
    logger.log_http_request(url, "GET", Some(status), elapsed_ms(start)).await;

    let body = response.text().await?;
    Ok((status, body))
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// The HTTP tools configured from one [`Config`]
pub struct HttpTools {
    pub reachability: ReachabilityChecker,
    pub geo: GeoLookup,
    pub ranges: RangeFetcher,
}

impl HttpTools {
    pub fn from_config(config: &Config, logger: NetworkLogger) -> Result<Self> {
        Ok(Self {
            reachability: ReachabilityChecker::new(config.check_timeout(), logger.clone())?,
            geo: GeoLookup::new(&config.geo_api_url, config.lookup_timeout(), logger.clone())?,
            ranges: RangeFetcher::new(
                &config.ipv4_ranges_url,
                &config.ipv6_ranges_url,
                config.lookup_timeout(),
                logger,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn logger() -> NetworkLogger {
        NetworkLogger::new(&Config::default())
    }

    #[test]
    fn test_tools_build_from_default_config() {
        assert!(HttpTools::from_config(&Config::default(), logger()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_text_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/agent"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let (status, body) = fetch_text(&client, &logger(), &format!("{}/agent", server.uri()))
            .await
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_fetch_text_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_millis(200)).unwrap();
        let err = fetch_text(&client, &logger(), &server.uri()).await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }
}
