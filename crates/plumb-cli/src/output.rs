//! Everything the commands print goes through [`OutputManager`], which
//! resolves `--format`, `--quiet` and colour once at startup.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use plumb_core::domain::{Severity, ValidationIssue};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    interactive: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let is_tty = io::stdout().is_terminal();

        // `--format` beats the config file; Auto resolves on the TTY check.
        let requested = match args.output_format {
            OutputFormat::Auto => match config.output.format.as_str() {
                "json" => OutputFormat::Json,
                "plain" => OutputFormat::Plain,
                _ => OutputFormat::Auto,
            },
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if is_tty {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            interactive: is_tty && io::stderr().is_terminal(),
            term: Term::stdout(),
        }
    }

    /// Plain line on stdout; dropped in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Success, msg)
    }

    /// Printed even with `--quiet`.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Error, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.status(Tone::Header, text)
    }

    fn status(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if self.quiet && tone != Tone::Error {
            return Ok(());
        }
        self.term.write_line(&tone.paint(msg, !self.no_color))
    }

    /// One issue per line.  Errors are printed even in quiet mode.
    pub fn issue(&self, issue: &ValidationIssue) -> io::Result<()> {
        if self.quiet && !issue.severity.is_error() {
            return Ok(());
        }
        self.term.write_line(&self.render_issue(issue))
    }

    /// Pretty-printed JSON on stdout, regardless of quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Spinner on stderr for long walks; hidden unless output is human and
    /// both streams are terminals.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || !self.interactive || self.resolved_format != OutputFormat::Human {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    fn render_issue(&self, issue: &ValidationIssue) -> String {
        let label = format!("{:<8}", issue.severity.as_str());
        let location = issue.location();
        let rule = issue
            .rule_id
            .as_deref()
            .map(|id| format!(" [{id}]"))
            .unwrap_or_default();
        let fixable = if issue.fixable { " (fixable)" } else { "" };

        if self.no_color {
            return format!("  {label} {location}  {}{rule}{fixable}", issue.message);
        }

        let label = match issue.severity {
            Severity::Critical => label.red().bold().to_string(),
            Severity::Error => label.red().to_string(),
            Severity::Warning => label.yellow().to_string(),
            Severity::Info => label.blue().to_string(),
        };
        format!(
            "  {label} {}  {}{}{}",
            location.bold(),
            issue.message,
            rule.dimmed(),
            fixable.green()
        )
    }

    /// Stdout and stderr are both terminals, so a prompt can be shown.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

/// Leading glyph and colour of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Header,
}

impl Tone {
    fn paint(self, msg: &str, color: bool) -> String {
        let glyph = match self {
            Self::Success => "\u{2713} ",
            Self::Error => "\u{2717} ",
            Self::Warning => "\u{26a0} ",
            Self::Info => "\u{2139} ",
            Self::Header => "",
        };
        if !color {
            return format!("{glyph}{msg}");
        }
        match self {
            Self::Success => format!("{}{}", glyph.green().bold(), msg.green()),
            Self::Error => format!("{}{}", glyph.red().bold(), msg.red()),
            Self::Warning => format!("{}{}", glyph.yellow().bold(), msg.yellow()),
            Self::Info => format!("{}{}", glyph.blue().bold(), msg.blue()),
            Self::Header => msg.cyan().bold().to_string(),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
