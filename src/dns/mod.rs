//! Record lookups through the host's resolver configuration

pub mod report;
pub mod srv;

pub use report::{DnsAggregator, DnsReport, Section};
pub use srv::{ServiceAnswer, ServiceLocator, TEAMSPEAK_SERVICES};

use crate::{
    error::{AppError, Result},
    logging::NetworkLogger,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::IpAddr;
use std::time::Instant;
use trust_dns_resolver::{
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::{
        op::ResponseCode,
        rr::{RData, RecordType},
    },
    system_conf,
    TokioAsyncResolver,
};

/// Mail exchanger answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    pub priority: u16,
    pub host: String,
}

/// Service locator answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvRecord {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// Record lookups used by the DNS, PING and TSSRV tools.
///
/// A name that exists but has no records of the requested type yields an
/// empty answer rather than an error.
#[async_trait]
pub trait RecordResolver: Send + Sync {
    async fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>>;

    /// Canonical name the queried name aliases to, if any
    async fn lookup_cname(&self, name: &str) -> Result<Option<String>>;

    async fn lookup_mx(&self, name: &str) -> Result<Vec<MxRecord>>;

    async fn lookup_ns(&self, name: &str) -> Result<Vec<String>>;

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>>;

    async fn lookup_srv(&self, name: &str) -> Result<Vec<SrvRecord>>;
}

/// Resolver built from the system configuration (`/etc/resolv.conf`, registry)
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
    logger: NetworkLogger,
}

impl SystemResolver {
    /// Build from the system configuration, falling back to the library
    /// defaults when the system configuration cannot be read
    pub async fn from_system_conf(logger: NetworkLogger) -> Self {
        let (config, opts) = match system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                crate::log_warn!(logger.logger(), "Failed to read system DNS config, using defaults: {}", e);
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };

        Self::with_config(config, opts, logger)
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts, logger: NetworkLogger) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            logger,
        }
    }

    /// Run one lookup, map its error and log the outcome with its duration
    async fn timed<T, F>(&self, name: &str, record_type: RecordType, lookup: F) -> Result<Vec<T>>
    where
        F: Future<Output = std::result::Result<Vec<T>, ResolveError>>,
    {
        let start = Instant::now();
        let result = classify(name, lookup.await);
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        self.logger
            .log_dns_lookup(name, &record_type.to_string(), result.as_ref().map(Vec::len), duration_ms)
            .await;

        result
    }
}

/// Treat "no records of this type" as an empty answer; a nonexistent name
/// and transport failures stay errors.
fn classify<T>(name: &str, result: std::result::Result<Vec<T>, ResolveError>) -> Result<Vec<T>> {
    match result {
        Ok(records) => Ok(records),
        Err(e) => match e.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. } if *response_code == ResponseCode::NXDomain => {
                Err(AppError::dns_resolution(format!("lookup {}: no such host", name)))
            }
            ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
            _ => Err(AppError::dns_resolution(format!("lookup {}: {}", name, e))),
        },
    }
}

#[async_trait]
impl RecordResolver for SystemResolver {
    async fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>> {
        self.timed(name, RecordType::A, async {
            self.resolver.lookup_ip(name).await.map(|lookup| lookup.iter().collect())
        })
        .await
    }

    async fn lookup_cname(&self, name: &str) -> Result<Option<String>> {
        let aliases = self
            .timed(name, RecordType::CNAME, async {
                self.resolver.lookup(name, RecordType::CNAME).await.map(|lookup| {
                    lookup
                        .iter()
                        .filter_map(|rdata| match rdata {
                            RData::CNAME(cname) => Some(cname.0.to_utf8()),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                })
            })
            .await?;

        // The last hop of a chain is the canonical name
        Ok(aliases.into_iter().last())
    }

    async fn lookup_mx(&self, name: &str) -> Result<Vec<MxRecord>> {
        self.timed(name, RecordType::MX, async {
            self.resolver.mx_lookup(name).await.map(|lookup| {
                lookup
                    .iter()
                    .map(|mx| MxRecord {
                        priority: mx.preference(),
                        host: mx.exchange().to_utf8(),
                    })
                    .collect()
            })
        })
        .await
    }

    async fn lookup_ns(&self, name: &str) -> Result<Vec<String>> {
        self.timed(name, RecordType::NS, async {
            self.resolver
                .ns_lookup(name)
                .await
                .map(|lookup| lookup.iter().map(|ns| ns.0.to_utf8()).collect())
        })
        .await
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        self.timed(name, RecordType::TXT, async {
            self.resolver.txt_lookup(name).await.map(|lookup| {
                lookup
                    .iter()
                    .map(|txt| {
                        txt.txt_data()
                            .iter()
                            .map(|chunk| String::from_utf8_lossy(chunk))
                            .collect::<String>()
                    })
                    .collect()
            })
        })
        .await
    }

    async fn lookup_srv(&self, name: &str) -> Result<Vec<SrvRecord>> {
        self.timed(name, RecordType::SRV, async {
            self.resolver.srv_lookup(name).await.map(|lookup| {
                lookup
                    .iter()
                    .map(|srv| SrvRecord {
                        priority: srv.priority(),
                        weight: srv.weight(),
                        port: srv.port(),
                        target: srv.target().to_utf8(),
                    })
                    .collect()
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;

    fn logger() -> NetworkLogger {
        NetworkLogger::new(&Config::default())
    }

    #[test]
    fn test_classify_passes_answers_through() {
        let answers = classify("example.com", Ok(vec![1, 2, 3])).unwrap();
        assert_eq!(answers, vec![1, 2, 3]);
    }

    #[test]
    fn test_classify_wraps_other_errors() {
        let err = classify::<u8>("example.com", Err(ResolveError::from("resolver exploded"))).unwrap_err();
        assert_eq!(err.category(), "DNS");
        assert!(err.to_string().contains("example.com"));
        assert!(err.to_string().contains("resolver exploded"));
    }

    #[tokio::test]
    async fn test_ip_literal_resolves_without_network() {
        let resolver = SystemResolver::with_config(ResolverConfig::default(), ResolverOpts::default(), logger());
        let ips = resolver.lookup_ip("192.0.2.1").await.unwrap();
        assert_eq!(ips, vec!["192.0.2.1".parse::<IpAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn test_system_resolver_builds() {
        let resolver = SystemResolver::from_system_conf(logger()).await;
        let ips = resolver.lookup_ip("::1").await.unwrap();
        assert_eq!(ips, vec!["::1".parse::<IpAddr>().unwrap()]);
    }
}
