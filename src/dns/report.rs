//! Multi-record DNS report
//!
//! Every section is looked up independently: a failure in one record type
//! only affects that section of the report.

use super::{MxRecord, RecordResolver};
use crate::{defaults::TXT_DISPLAY_LIMIT, error::Result, output::Presenter};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// State of one report section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section<T> {
    Found(T),
    Empty,
    Failed(String),
}

impl<T> Section<Vec<T>> {
    fn from_lookup(result: Result<Vec<T>>) -> Self {
        match result {
            Ok(records) if records.is_empty() => Section::Empty,
            Ok(records) => Section::Found(records),
            Err(e) => Section::Failed(e.detail().to_string()),
        }
    }
}

fn non_empty<T>(records: Vec<T>) -> Section<Vec<T>> {
    if records.is_empty() {
        Section::Empty
    } else {
        Section::Found(records)
    }
}

/// Everything the DNS tool prints for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsReport {
    pub domain: String,
    pub ipv4: Section<Vec<Ipv4Addr>>,
    pub ipv6: Section<Vec<Ipv6Addr>>,
    pub canonical_name: Section<String>,
    pub mail_exchangers: Section<Vec<MxRecord>>,
    pub name_servers: Section<Vec<String>>,
    pub text_records: Section<Vec<String>>,
}

/// Split resolved addresses by family; IPv4-mapped IPv6 addresses count as IPv4.
fn partition_addresses(addresses: Vec<IpAddr>) -> (Vec<Ipv4Addr>, Vec<Ipv6Addr>) {
    let mut v4 = Vec::new();
    let mut v6 = Vec::new();

    for address in addresses {
        match address {
            IpAddr::V4(ip) => v4.push(ip),
            IpAddr::V6(ip) => match ip.to_ipv4_mapped() {
                Some(mapped) => v4.push(mapped),
                None => v6.push(ip),
            },
        }
    }

    (v4, v6)
}

/// A CNAME equal to the queried name (with or without the root dot) says nothing
fn is_self_alias(domain: &str, cname: &str) -> bool {
    let cname = cname.strip_suffix('.').unwrap_or(cname);
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    cname.eq_ignore_ascii_case(domain)
}

/// Cut a TXT string to the display limit, marking the cut with `...`
pub fn truncate_txt(text: &str) -> String {
    if text.chars().count() > TXT_DISPLAY_LIMIT {
        let mut cut: String = text.chars().take(TXT_DISPLAY_LIMIT).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Runs the per-record lookups for a domain concurrently
pub struct DnsAggregator {
    resolver: Arc<dyn RecordResolver>,
}

impl DnsAggregator {
    pub fn new(resolver: Arc<dyn RecordResolver>) -> Self {
        Self { resolver }
    }

    pub async fn inspect(&self, domain: &str) -> DnsReport {
        let (addresses, cname, mx, ns, txt) = futures::join!(
            self.resolver.lookup_ip(domain),
            self.resolver.lookup_cname(domain),
            self.resolver.lookup_mx(domain),
            self.resolver.lookup_ns(domain),
            self.resolver.lookup_txt(domain),
        );

        let (ipv4, ipv6) = match addresses {
            Ok(addresses) => {
                let (v4, v6) = partition_addresses(addresses);
                (non_empty(v4), non_empty(v6))
            }
            // Only the IPv4 section carries the failure
            Err(e) => (Section::Failed(e.detail().to_string()), Section::Empty),
        };

        let canonical_name = match cname {
            Ok(Some(name)) if !is_self_alias(domain, &name) => Section::Found(name),
            Ok(_) => Section::Empty,
            Err(e) => Section::Failed(e.detail().to_string()),
        };

        let text_records = Section::from_lookup(txt.map(|records| {
            records.iter().map(|record| truncate_txt(record)).collect()
        }));

        DnsReport {
            domain: domain.to_string(),
            ipv4,
            ipv6,
            canonical_name,
            mail_exchangers: Section::from_lookup(mx),
            name_servers: Section::from_lookup(ns),
            text_records,
        }
    }
}

impl DnsReport {
    /// Report lines in fixed section order: A, AAAA, CNAME, MX, NS, TXT
    pub fn render(&self, presenter: &Presenter) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            presenter.header(&format!("DNS Lookup Results for: {}", self.domain)),
            String::new(),
        ];

        section_lines(
            &mut lines,
            presenter,
            "A Records (IPv4):",
            &self.ipv4,
            "No A records found",
            |ip| ip.to_string(),
        );
        section_lines(
            &mut lines,
            presenter,
            "AAAA Records (IPv6):",
            &self.ipv6,
            "No AAAA records found",
            |ip| ip.to_string(),
        );

        lines.push(presenter.info("CNAME Record:"));
        match &self.canonical_name {
            Section::Found(name) => lines.push(format!("  {}", name)),
            Section::Empty => lines.push("  No CNAME record found".to_string()),
            Section::Failed(err) => lines.push(presenter.error(&format!("  Error: {}", err))),
        }
        lines.push(String::new());

        section_lines(
            &mut lines,
            presenter,
            "MX Records (Mail Servers):",
            &self.mail_exchangers,
            "No MX records found",
            |mx| format!("Priority: {}, Host: {}", mx.priority, mx.host),
        );
        section_lines(
            &mut lines,
            presenter,
            "NS Records (Name Servers):",
            &self.name_servers,
            "No NS records found",
            |ns| ns.clone(),
        );
        section_lines(
            &mut lines,
            presenter,
            "TXT Records:",
            &self.text_records,
            "No TXT records found",
            |txt| txt.clone(),
        );

        lines
    }
}

fn section_lines<T>(
    lines: &mut Vec<String>,
    presenter: &Presenter,
    title: &str,
    section: &Section<Vec<T>>,
    empty: &str,
    describe: impl Fn(&T) -> String,
) {
    lines.push(presenter.info(title));
    match section {
        Section::Found(records) => lines.extend(records.iter().map(|record| format!("  {}", describe(record)))),
        Section::Empty => lines.push(format!("  {}", empty)),
        Section::Failed(err) => lines.push(presenter.error(&format!("  Error: {}", err))),
    }
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::SrvRecord;
    use crate::error::AppError;
    use async_trait::async_trait;
    use proptest::prelude::*;

    /// Canned answers; each record type can be made to fail independently
    #[derive(Default)]
    struct FakeResolver {
        ips: Vec<IpAddr>,
        cname: Option<String>,
        mx: Vec<MxRecord>,
        ns: Vec<String>,
        txt: Vec<String>,
        failing: Vec<&'static str>,
    }

    impl FakeResolver {
        fn populated() -> Self {
            Self {
                ips: vec![
                    "93.184.216.34".parse().unwrap(),
                    "2606:2800:220:1:248:1893:25c8:1946".parse().unwrap(),
                    "::ffff:10.0.0.1".parse().unwrap(),
                ],
                cname: Some("edge.example.net.".to_string()),
                mx: vec![MxRecord { priority: 10, host: "mail.example.com.".to_string() }],
                ns: vec!["a.iana-servers.net.".to_string(), "b.iana-servers.net.".to_string()],
                txt: vec!["v=spf1 -all".to_string()],
                failing: Vec::new(),
            }
        }

        fn failing(mut self, record_type: &'static str) -> Self {
            self.failing.push(record_type);
            self
        }

        fn answer<T: Clone>(&self, record_type: &str, records: &T) -> Result<T> {
            if self.failing.contains(&record_type) {
                Err(AppError::dns_resolution(format!("{} server failure", record_type)))
            } else {
                Ok(records.clone())
            }
        }
    }

    #[async_trait]
    impl RecordResolver for FakeResolver {
        async fn lookup_ip(&self, _name: &str) -> Result<Vec<IpAddr>> {
            self.answer("A", &self.ips)
        }

        async fn lookup_cname(&self, _name: &str) -> Result<Option<String>> {
            self.answer("CNAME", &self.cname)
        }

        async fn lookup_mx(&self, _name: &str) -> Result<Vec<MxRecord>> {
            self.answer("MX", &self.mx)
        }

        async fn lookup_ns(&self, _name: &str) -> Result<Vec<String>> {
            self.answer("NS", &self.ns)
        }

        async fn lookup_txt(&self, _name: &str) -> Result<Vec<String>> {
            self.answer("TXT", &self.txt)
        }

        async fn lookup_srv(&self, _name: &str) -> Result<Vec<SrvRecord>> {
            Ok(Vec::new())
        }
    }

    async fn inspect(resolver: FakeResolver, domain: &str) -> DnsReport {
        DnsAggregator::new(Arc::new(resolver)).inspect(domain).await
    }

    #[tokio::test]
    async fn test_addresses_split_by_family() {
        let report = inspect(FakeResolver::populated(), "example.com").await;

        assert_eq!(
            report.ipv4,
            Section::Found(vec!["93.184.216.34".parse().unwrap(), "10.0.0.1".parse().unwrap()])
        );
        assert_eq!(
            report.ipv6,
            Section::Found(vec!["2606:2800:220:1:248:1893:25c8:1946".parse().unwrap()])
        );
    }

    #[tokio::test]
    async fn test_render_section_order() {
        let report = inspect(FakeResolver::populated(), "example.com").await;
        let lines = report.render(&Presenter::plain());

        assert_eq!(lines[1], "DNS Lookup Results for: example.com");

        let titles = [
            "A Records (IPv4):",
            "AAAA Records (IPv6):",
            "CNAME Record:",
            "MX Records (Mail Servers):",
            "NS Records (Name Servers):",
            "TXT Records:",
        ];
        let positions: Vec<usize> = titles
            .iter()
            .map(|title| lines.iter().position(|line| line == title).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        assert!(lines.contains(&"  93.184.216.34".to_string()));
        assert!(lines.contains(&"  edge.example.net.".to_string()));
        assert!(lines.contains(&"  Priority: 10, Host: mail.example.com.".to_string()));
        assert!(lines.contains(&"  b.iana-servers.net.".to_string()));
        assert!(lines.contains(&"  v=spf1 -all".to_string()));
    }

    #[tokio::test]
    async fn test_failed_section_does_not_affect_others() {
        let baseline = inspect(FakeResolver::populated(), "example.com").await;

        for record_type in ["A", "CNAME", "MX", "NS", "TXT"] {
            let mut report = inspect(FakeResolver::populated().failing(record_type), "example.com").await;
            let message = format!("{} server failure", record_type);

            let lines = report.render(&Presenter::plain());
            let error_line = format!("  Error: {}", message);
            assert_eq!(
                lines.iter().filter(|line| **line == error_line).count(),
                1,
                "{record_type} failure should be reported once"
            );

            // Once the failed section is restored the rest must match the healthy report
            match record_type {
                "A" => {
                    assert_eq!(report.ipv4, Section::Failed(message.clone()));
                    report.ipv4 = baseline.ipv4.clone();
                    report.ipv6 = baseline.ipv6.clone();
                }
                "CNAME" => {
                    assert_eq!(report.canonical_name, Section::Failed(message.clone()));
                    report.canonical_name = baseline.canonical_name.clone();
                }
                "MX" => {
                    assert_eq!(report.mail_exchangers, Section::Failed(message.clone()));
                    report.mail_exchangers = baseline.mail_exchangers.clone();
                }
                "NS" => {
                    assert_eq!(report.name_servers, Section::Failed(message.clone()));
                    report.name_servers = baseline.name_servers.clone();
                }
                _ => {
                    assert_eq!(report.text_records, Section::Failed(message.clone()));
                    report.text_records = baseline.text_records.clone();
                }
            }
            assert_eq!(report, baseline, "{record_type} failure leaked into other sections");
        }
    }

    #[tokio::test]
    async fn test_every_section_can_fail_together() {
        let mut resolver = FakeResolver::populated();
        for record_type in ["A", "CNAME", "MX", "NS", "TXT"] {
            resolver = resolver.failing(record_type);
        }
        let lines = inspect(resolver, "example.com").await.render(&Presenter::plain());

        let errors = lines.iter().filter(|line| line.starts_with("  Error: ")).count();
        assert_eq!(errors, 5);
        assert!(lines.contains(&"  No AAAA records found".to_string()));
    }

    #[tokio::test]
    async fn test_address_failure_reported_under_ipv4_only() {
        let report = inspect(FakeResolver::populated().failing("A"), "example.com").await;
        assert_eq!(report.ipv4, Section::Failed("A server failure".to_string()));
        assert_eq!(report.ipv6, Section::Empty);

        let lines = report.render(&Presenter::plain());
        assert!(lines.contains(&"  No AAAA records found".to_string()));
    }

    #[tokio::test]
    async fn test_empty_sections_render_placeholders() {
        let lines = inspect(FakeResolver::default(), "empty.test")
            .await
            .render(&Presenter::plain());

        for placeholder in [
            "  No A records found",
            "  No AAAA records found",
            "  No CNAME record found",
            "  No MX records found",
            "  No NS records found",
            "  No TXT records found",
        ] {
            assert!(lines.contains(&placeholder.to_string()), "missing {placeholder}");
        }
    }

    #[tokio::test]
    async fn test_self_referencing_cname_is_suppressed() {
        let resolver = FakeResolver {
            cname: Some("Example.COM.".to_string()),
            ..FakeResolver::default()
        };
        let report = inspect(resolver, "example.com").await;
        assert_eq!(report.canonical_name, Section::Empty);
    }

    #[tokio::test]
    async fn test_long_txt_records_are_truncated() {
        let resolver = FakeResolver {
            txt: vec!["x".repeat(150)],
            ..FakeResolver::default()
        };
        let report = inspect(resolver, "example.com").await;
        assert_eq!(report.text_records, Section::Found(vec![format!("{}...", "x".repeat(100))]));
    }

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_txt("short"), "short");
        assert_eq!(truncate_txt(&"y".repeat(100)), "y".repeat(100));
    }

    proptest! {
        #[test]
        fn truncated_txt_never_exceeds_limit(text in "\\PC{0,300}") {
            let shown = truncate_txt(&text);
            let count = text.chars().count();
            if count > TXT_DISPLAY_LIMIT {
                prop_assert!(shown.ends_with("..."));
                prop_assert_eq!(shown.chars().count(), TXT_DISPLAY_LIMIT + 3);
                prop_assert!(text.starts_with(shown.trim_end_matches("...")));
            } else {
                prop_assert_eq!(shown, text);
            }
        }
    }
}
