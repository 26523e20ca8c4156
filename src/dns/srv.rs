//! TeamSpeak service discovery through SRV records (TSSRV)

use super::{RecordResolver, SrvRecord};
use std::sync::Arc;

/// Service prefixes queried, in display order
pub const TEAMSPEAK_SERVICES: [&str; 2] = ["_ts3._udp.", "_tsdns._tcp."];

/// Result for one service name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAnswer {
    pub name: String,
    pub record: Option<SrvRecord>,
}

impl ServiceAnswer {
    /// `<name>: <target>:<port>` or `<name>: Not found`
    pub fn line(&self) -> String {
        match &self.record {
            Some(record) => format!(
                "{}: {}:{}",
                self.name,
                record.target.trim_end_matches('.'),
                record.port
            ),
            None => format!("{}: Not found", self.name),
        }
    }
}

pub struct ServiceLocator {
    resolver: Arc<dyn RecordResolver>,
}

impl ServiceLocator {
    pub fn new(resolver: Arc<dyn RecordResolver>) -> Self {
        Self { resolver }
    }

    /// Query every TeamSpeak service under `domain`; lookup failures count as not found
    pub async fn locate(&self, domain: &str) -> Vec<ServiceAnswer> {
        let mut answers = Vec::with_capacity(TEAMSPEAK_SERVICES.len());

        for service in TEAMSPEAK_SERVICES {
            let name = format!("{}{}", service, domain);
            let record = self
                .resolver
                .lookup_srv(&name)
                .await
                .ok()
                .and_then(preferred);
            answers.push(ServiceAnswer { name, record });
        }

        answers
    }
}

/// Lowest priority wins; among equal priorities the heaviest weight
fn preferred(records: Vec<SrvRecord>) -> Option<SrvRecord> {
    records
        .into_iter()
        .min_by(|a, b| a.priority.cmp(&b.priority).then(b.weight.cmp(&a.weight)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::MxRecord;
    use crate::error::{AppError, Result};
    use async_trait::async_trait;
    use std::net::IpAddr;
    use std::sync::Mutex;

    struct SrvOnly {
        queried: Mutex<Vec<String>>,
        ts3: Vec<SrvRecord>,
    }

    impl SrvOnly {
        fn new(ts3: Vec<SrvRecord>) -> Self {
            Self { queried: Mutex::new(Vec::new()), ts3 }
        }
    }

    fn srv(priority: u16, weight: u16, port: u16, target: &str) -> SrvRecord {
        SrvRecord { priority, weight, port, target: target.to_string() }
    }

    #[async_trait]
    impl RecordResolver for SrvOnly {
        async fn lookup_ip(&self, _name: &str) -> Result<Vec<IpAddr>> {
            Ok(Vec::new())
        }

        async fn lookup_cname(&self, _name: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn lookup_mx(&self, _name: &str) -> Result<Vec<MxRecord>> {
            Ok(Vec::new())
        }

        async fn lookup_ns(&self, _name: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn lookup_txt(&self, _name: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn lookup_srv(&self, name: &str) -> Result<Vec<SrvRecord>> {
            self.queried.lock().unwrap().push(name.to_string());
            if name.starts_with("_ts3._udp.") {
                Ok(self.ts3.clone())
            } else {
                Err(AppError::dns_resolution(format!("lookup {}: no such host", name)))
            }
        }
    }

    #[tokio::test]
    async fn test_locate_queries_each_service_in_order() {
        let resolver = Arc::new(SrvOnly::new(vec![srv(0, 5, 9987, "voice.example.com.")]));
        let answers = ServiceLocator::new(resolver.clone()).locate("example.com").await;

        assert_eq!(
            *resolver.queried.lock().unwrap(),
            vec!["_ts3._udp.example.com", "_tsdns._tcp.example.com"]
        );
        assert_eq!(answers[0].line(), "_ts3._udp.example.com: voice.example.com:9987");
        assert_eq!(answers[1].line(), "_tsdns._tcp.example.com: Not found");
    }

    #[tokio::test]
    async fn test_lowest_priority_record_is_chosen() {
        let resolver = Arc::new(SrvOnly::new(vec![
            srv(20, 100, 9988, "backup.example.com."),
            srv(10, 1, 9987, "primary.example.com."),
        ]));
        let answers = ServiceLocator::new(resolver).locate("example.com").await;

        assert_eq!(answers[0].line(), "_ts3._udp.example.com: primary.example.com:9987");
    }

    #[tokio::test]
    async fn test_heaviest_weight_breaks_priority_tie() {
        let resolver = Arc::new(SrvOnly::new(vec![
            srv(10, 5, 9987, "light.example.com."),
            srv(10, 60, 9990, "heavy.example.com."),
            srv(30, 90, 9999, "spare.example.com."),
        ]));
        let answers = ServiceLocator::new(resolver).locate("example.com").await;

        assert_eq!(answers[0].line(), "_ts3._udp.example.com: heavy.example.com:9990");
    }

    #[tokio::test]
    async fn test_empty_srv_answer_is_not_found() {
        let answers = ServiceLocator::new(Arc::new(SrvOnly::new(Vec::new()))).locate("example.com").await;
        assert_eq!(answers[0].line(), "_ts3._udp.example.com: Not found");
    }

    #[test]
    fn test_empty_answer_line() {
        let answer = ServiceAnswer {
            name: "_ts3._udp.nowhere.test".to_string(),
            record: None,
        };
        assert_eq!(answer.line(), "_ts3._udp.nowhere.test: Not found");
    }
}
