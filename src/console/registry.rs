//! Command tokens and the help catalogue

use crate::output::Presenter;

/// Tokens that end the session at either prompt level
pub const EXIT_TOKENS: [&str; 6] = ["EXIT", "QUIT", "Q", "E", "LOGOUT", "CLOSE"];

/// Token that leaves a sub-prompt
pub const BACK_TOKEN: &str = "BACK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Dstat,
    Check,
    Info,
    Tssrv,
    Ping,
    Cfip,
    Dns,
    Help,
    Clear,
    Exit,
}

/// Which help section a command is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Tool,
    Universal,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub command: Command,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
}

pub static CATALOGUE: &[CommandSpec] = &[
    CommandSpec {
        command: Command::Dstat,
        name: "DSTAT",
        description: "Network and system statistics monitor",
        kind: CommandKind::Tool,
    },
    CommandSpec {
        command: Command::Check,
        name: "CHECK",
        description: "Check if a website is online",
        kind: CommandKind::Tool,
    },
    CommandSpec {
        command: Command::Info,
        name: "INFO",
        description: "Get IP address information",
        kind: CommandKind::Tool,
    },
    CommandSpec {
        command: Command::Tssrv,
        name: "TSSRV",
        description: "TeamSpeak SRV record lookup",
        kind: CommandKind::Tool,
    },
    CommandSpec {
        command: Command::Ping,
        name: "PING",
        description: "Ping a server",
        kind: CommandKind::Tool,
    },
    CommandSpec {
        command: Command::Cfip,
        name: "CFIP",
        description: "CloudFlare IP range finder",
        kind: CommandKind::Tool,
    },
    CommandSpec {
        command: Command::Dns,
        name: "DNS",
        description: "Advanced DNS lookup tool",
        kind: CommandKind::Tool,
    },
    CommandSpec {
        command: Command::Help,
        name: "HELP",
        description: "Show this help message",
        kind: CommandKind::Universal,
    },
    CommandSpec {
        command: Command::Clear,
        name: "CLEAR",
        description: "Clear the screen",
        kind: CommandKind::Universal,
    },
    CommandSpec {
        command: Command::Exit,
        name: "EXIT",
        description: "Exit the console",
        kind: CommandKind::Universal,
    },
];

pub fn is_exit_token(token: &str) -> bool {
    EXIT_TOKENS.iter().any(|exit| exit.eq_ignore_ascii_case(token))
}

impl Command {
    /// Look up a token case-insensitively; exit aliases map to [`Command::Exit`]
    pub fn parse(token: &str) -> Option<Self> {
        if is_exit_token(token) {
            return Some(Self::Exit);
        }

        CATALOGUE
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(token))
            .map(|spec| spec.command)
    }

    pub fn name(&self) -> &'static str {
        CATALOGUE
            .iter()
            .find(|spec| spec.command == *self)
            .map_or("EXIT", |spec| spec.name)
    }

    /// Sub-prompt suffix for tools that read their own queries
    pub fn sub_prompt(&self) -> Option<&'static str> {
        match self {
            Self::Check | Self::Info | Self::Ping => Some("give-me-ipaddress# "),
            Self::Dns | Self::Tssrv => Some("give-me-domain# "),
            _ => None,
        }
    }
}

pub fn help_lines(presenter: &Presenter) -> Vec<String> {
    let mut lines = vec![String::new(), presenter.header("Available Tools:"), String::new()];
    lines.extend(entries(presenter, CommandKind::Tool));
    lines.extend([String::new(), presenter.header("Commands:"), String::new()]);
    lines.extend(entries(presenter, CommandKind::Universal));
    lines.push(String::new());
    lines
}

fn entries(presenter: &Presenter, kind: CommandKind) -> impl Iterator<Item = String> + '_ {
    CATALOGUE
        .iter()
        .filter(move |spec| spec.kind == kind)
        .map(move |spec| {
            format!(
                "  {}{} - {}",
                presenter.highlight(spec.name),
                " ".repeat(6 - spec.name.len()),
                spec.description
            )
        })
}
