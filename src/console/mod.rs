//! Interactive read-eval loop dispatching diagnostic tools
//!
//! The outer loop reads one command per line. Tools that take queries
//! (CHECK, INFO, PING, DNS, TSSRV) run a nested prompt until `BACK`, an exit
//! token or end of input, and report back through [`Flow`].

pub mod prompt;
pub mod registry;

pub use prompt::PromptInput;
pub use registry::{Command, CATALOGUE, EXIT_TOKENS};

use crate::{
    client::{geo, AddressFamily, HttpTools, ReachabilityChecker},
    dns::{DnsAggregator, RecordResolver, ServiceLocator, SystemResolver},
    error::Result,
    logging::{ErrorEventLogger, Logger, LoggerFactory, NetworkLogger},
    models::Config,
    output::{Presenter, CLEAR_SCREEN},
    probe::{attempt_line, Connector, LatencyProber, ProbeSettings, TcpConnector},
    stats::{StatMonitor, StatSources, SystemStatSources},
    types::clean_target,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// What the caller should do after a command or sub-prompt finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading at the current level
    Continue,
    /// Leave the sub-prompt for the outer prompt
    Back,
    /// End the session
    Terminate,
}

/// Everything the tools need, built once per session
pub struct Toolkit {
    pub resolver: Arc<dyn RecordResolver>,
    pub connector: Arc<dyn Connector>,
    pub probe_settings: ProbeSettings,
    pub http: HttpTools,
    pub stat_sources: Arc<dyn StatSources>,
    pub dstat_interval: Duration,
    /// Stop DSTAT after this many reports; `None` runs until the process ends
    pub dstat_limit: Option<u64>,
    pub logger: Logger,
    pub network_logger: NetworkLogger,
    pub error_logger: ErrorEventLogger,
}

impl Toolkit {
    /// Production toolkit: system resolver, TCP probes, `sysinfo` counters
    pub async fn from_config(config: &Config, loggers: &LoggerFactory) -> Result<Self> {
        let network_logger = loggers.create_network_logger().await;
        let resolver = SystemResolver::from_system_conf(network_logger.clone()).await;

        Ok(Self {
            resolver: Arc::new(resolver),
            connector: Arc::new(TcpConnector),
            probe_settings: ProbeSettings::default(),
            http: HttpTools::from_config(config, network_logger.clone())?,
            stat_sources: Arc::new(SystemStatSources),
            dstat_interval: config.dstat_interval(),
            dstat_limit: None,
            logger: loggers.create_logger("CONSOLE").await,
            network_logger,
            error_logger: loggers.create_error_logger().await,
        })
    }
}

/// One interactive session over a line-oriented input and a text output
pub struct Console<R, W> {
    input: R,
    out: W,
    presenter: Presenter,
    toolkit: Toolkit,
    host: String,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W, presenter: Presenter, toolkit: Toolkit, host: impl Into<String>) -> Self {
        Self {
            input,
            out,
            presenter,
            toolkit,
            host: host.into(),
        }
    }

    /// Consume the console and hand back its output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until an exit token or end of input
    pub async fn run(&mut self) -> Result<()> {
        self.banner()?;
        let prompt = self.presenter.info(&prompt::main_prompt(&self.host));

        loop {
            self.write_prompt(&prompt)?;
            let Some(line) = self.read_line().await? else {
                crate::log_debug!(self.toolkit.logger, "Input closed, ending session");
                return Ok(());
            };

            let Some(token) = line.split_whitespace().next() else {
                continue;
            };

            if self.dispatch(token).await? == Flow::Terminate {
                return Ok(());
            }
        }
    }

    async fn dispatch(&mut self, token: &str) -> Result<Flow> {
        let Some(command) = Command::parse(token) else {
            let message = format!(
                "Command '{}' not found. Type 'help' for available commands.",
                token.to_uppercase()
            );
            self.line(&self.presenter.error_line(&message))?;
            return Ok(Flow::Continue);
        };

        crate::log_debug!(self.toolkit.logger, "Dispatching {}", command.name());

        match command {
            Command::Help => {
                for line in registry::help_lines(&self.presenter) {
                    self.line(&line)?;
                }
            }
            Command::Clear => self.clear()?,
            Command::Exit => {
                self.line(&self.presenter.info_line("Goodbye!"))?;
                return Ok(Flow::Terminate);
            }
            Command::Dstat => self.dstat().await?,
            Command::Cfip => self.cfip().await?,
            Command::Check | Command::Info | Command::Ping | Command::Dns | Command::Tssrv => {
                if self.sub_prompt(command).await? == Flow::Terminate {
                    return Ok(Flow::Terminate);
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// Nested query loop for one tool
    async fn sub_prompt(&mut self, command: Command) -> Result<Flow> {
        let suffix = command.sub_prompt().unwrap_or_default();
        let prompt = prompt::nested_prompt(&self.host, suffix);

        loop {
            self.write_prompt(&prompt)?;
            let Some(line) = self.read_line().await? else {
                return Ok(Flow::Back);
            };

            match PromptInput::classify(&line) {
                PromptInput::Blank => continue,
                PromptInput::Back => return Ok(Flow::Back),
                PromptInput::Clear => self.clear()?,
                PromptInput::Exit => return Ok(Flow::Terminate),
                PromptInput::Query(query) => self.answer(command, &query).await?,
            }
        }
    }

    /// Next input line without its terminator; `None` at end of input.
    /// Bytes that are not UTF-8 are replaced rather than ending the session.
    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }

        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    async fn answer(&mut self, command: Command, query: &str) -> Result<()> {
        let correlation_id = self.toolkit.logger.begin_command(command.name(), query).await;

        let result = match command {
            Command::Check => self.check(query, &correlation_id).await,
            Command::Info => self.info(query, &correlation_id).await,
            Command::Ping => self.ping(query).await,
            Command::Dns => self.dns(query).await,
            Command::Tssrv => self.tssrv(query).await,
            _ => Ok(()),
        };

        self.toolkit
            .logger
            .finish_command(&correlation_id, command.name(), result.as_ref().map(|_| ()))
            .await;
        result
    }

    async fn dstat(&mut self) -> Result<()> {
        self.line("Press Ctrl+C to stop DSTAT")?;

        let mut monitor = StatMonitor::from_sources(
            self.toolkit.dstat_interval,
            self.toolkit.stat_sources.as_ref(),
            self.toolkit.logger.clone(),
        );
        monitor
            .run(&mut self.out, &self.presenter, self.toolkit.dstat_limit)
            .await
    }

    async fn check(&mut self, url: &str, correlation_id: &str) -> Result<()> {
        if !ReachabilityChecker::accepts(url) {
            return Ok(());
        }

        self.line("Please wait...")?;
        match self.toolkit.http.reachability.check(url).await {
            Ok(report) => self.lines_out(report.lines()),
            Err(e) => {
                self.toolkit.error_logger.log_error(&e, Some("CHECK"), Some(correlation_id)).await;
                self.line(&format!("Error: {}", e.detail()))
            }
        }
    }

    async fn info(&mut self, query: &str, correlation_id: &str) -> Result<()> {
        let target = clean_target(query);
        self.pending()?;

        let result = self.toolkit.http.geo.lookup(&target).await;
        if let Err(e) = &result {
            self.toolkit.error_logger.log_error(e, Some("INFO"), Some(correlation_id)).await;
        }
        self.lines_out(geo::render(&result))
    }

    async fn ping(&mut self, query: &str) -> Result<()> {
        let target = clean_target(query);
        self.line("Please wait...")?;

        let addresses = match self.toolkit.resolver.lookup_ip(&target).await {
            Ok(addresses) => addresses,
            Err(e) => return self.line(&format!("Error resolving domain: {}", e.detail())),
        };
        let Some(address) = addresses.first().copied() else {
            return self.line("No IP addresses found");
        };
        self.line(&format!("Address: {}", address))?;

        let prober = LatencyProber::new(
            self.toolkit.connector.clone(),
            self.toolkit.probe_settings,
            self.toolkit.network_logger.clone(),
        );
        let out = &mut self.out;
        let result = prober
            .probe(address, |outcome| {
                writeln!(out, "{}", attempt_line(address, outcome))?;
                out.flush()?;
                Ok(())
            })
            .await?;

        let mut summary = result.summary_lines();
        summary.push(String::new());
        self.lines_out(summary)
    }

    async fn dns(&mut self, query: &str) -> Result<()> {
        let domain = clean_target(query);
        let report = DnsAggregator::new(self.toolkit.resolver.clone())
            .inspect(&domain)
            .await;
        self.lines_out(report.render(&self.presenter))
    }

    async fn tssrv(&mut self, query: &str) -> Result<()> {
        let domain = clean_target(query);
        self.pending()?;

        let answers = ServiceLocator::new(self.toolkit.resolver.clone())
            .locate(&domain)
            .await;
        let mut lines: Vec<String> = answers.iter().map(|answer| answer.line()).collect();
        lines.push(String::new());
        self.lines_out(lines)
    }

    async fn cfip(&mut self) -> Result<()> {
        self.line("Fetching CloudFlare IP ranges...")?;
        self.line("")?;

        for family in [AddressFamily::V4, AddressFamily::V6] {
            let section = self.toolkit.http.ranges.section(family, &self.presenter).await;
            self.lines_out(section)?;
        }

        let notice = self
            .presenter
            .info_line("You can save these ranges to a file for firewall rules or analysis.");
        self.lines_out(vec![notice, String::new()])
    }

    fn banner(&mut self) -> Result<()> {
        let lines = vec![
            String::new(),
            self.presenter.header("  Network Diagnostics Console"),
            self.presenter.info("  ─────────────────────────────"),
            "  Type 'help' for available commands".to_string(),
            String::new(),
        ];
        self.lines_out(lines)
    }

    /// Transient notice overwritten by the next line
    fn pending(&mut self) -> Result<()> {
        write!(self.out, "Please wait...\r")?;
        self.out.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        write!(self.out, "{}", CLEAR_SCREEN)?;
        self.out.flush()?;
        Ok(())
    }

    fn write_prompt(&mut self, prompt: &str) -> Result<()> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        Ok(())
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn lines_out(&mut self, lines: Vec<String>) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
