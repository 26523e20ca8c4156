use super::{build_http_client, elapsed_ms};
use crate::{error::Result, logging::NetworkLogger, types::HostStatus};
use reqwest::Client;
use std::time::{Duration, Instant};

/// Status of a single GET against a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachabilityReport {
    pub status_code: u16,
    pub status: HostStatus,
}

impl ReachabilityReport {
    pub fn from_status(status_code: u16) -> Self {
        Self {
            status_code,
            status: HostStatus::from_http_status(status_code),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Status Code: {}", self.status_code),
            format!("Status: {}", self.status),
            String::new(),
        ]
    }
}

pub struct ReachabilityChecker {
    client: Client,
    logger: NetworkLogger,
}

impl ReachabilityChecker {
    pub fn new(timeout: Duration, logger: NetworkLogger) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            logger,
        })
    }

    /// Whether the console should attempt `input` at all; bare hostnames are skipped
    pub fn accepts(input: &str) -> bool {
        input.contains('/')
    }

    /// One GET following redirects; the body is discarded
    pub async fn check(&self, url: &str) -> Result<ReachabilityReport> {
        let start = Instant::now();
        match self.client.get(url).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                self.logger.log_http_request(url, "GET", Some(code), elapsed_ms(start)).await;
                Ok(ReachabilityReport::from_status(code))
            }
            Err(e) => {
                self.logger.log_http_request(url, "GET", None, elapsed_ms(start)).await;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn checker() -> ReachabilityChecker {
        ReachabilityChecker::new(Duration::from_secs(5), NetworkLogger::new(&Config::default())).unwrap()
    }

    async fn server_answering(code: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(code))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_input_without_slash_is_skipped() {
        assert!(!ReachabilityChecker::accepts("example.com"));
        assert!(ReachabilityChecker::accepts("https://example.com/"));
    }

    #[tokio::test]
    async fn test_success_is_online() {
        let server = server_answering(200).await;
        let report = checker().check(&format!("{}/health", server.uri())).await.unwrap();

        assert_eq!(report.status_code, 200);
        assert_eq!(report.status, HostStatus::Online);
        assert_eq!(report.lines()[..2], ["Status Code: 200", "Status: ONLINE"]);
    }

    #[tokio::test]
    async fn test_client_errors_stay_online() {
        let server = server_answering(404).await;
        let report = checker().check(&format!("{}/health", server.uri())).await.unwrap();
        assert_eq!(report.status, HostStatus::Online);
    }

    #[tokio::test]
    async fn test_server_errors_are_offline() {
        let server = server_answering(503).await;
        let report = checker().check(&format!("{}/health", server.uri())).await.unwrap();

        assert_eq!(report.status_code, 503);
        assert_eq!(report.status, HostStatus::Offline);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(checker().check(&format!("http://{}/", addr)).await.is_err());
    }
}
