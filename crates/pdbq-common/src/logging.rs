//! Logging configuration and initialization
//!
//! Every pdbq binary installs its `tracing` subscriber through [`init_logging`].
//! Console logs go to stderr so that stdout stays reserved for command output
//! (identifier lists, tables, JSON) that users pipe into other tools.
//!
//! Use the structured macros (`debug!`, `info!`, `warn!`, `error!`) with fields
//! rather than `println!`:
//!
//! ```rust
//! use tracing::warn;
//!
//! let status = 404;
//! warn!(status, url = "http://example.org", "Request failed");
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pdbq_common::logging::{init_logging, LogConfig, LogLevel};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::default().with_level(LogLevel::Debug).merge_env()?;
//!     let _guard = init_logging(&config)?;
//!     tracing::info!("started");
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub const ENV_LEVEL: &str = "PDBQ_LOG_LEVEL";
pub const ENV_OUTPUT: &str = "PDBQ_LOG_OUTPUT";
pub const ENV_FORMAT: &str = "PDBQ_LOG_FORMAT";
pub const ENV_DIR: &str = "PDBQ_LOG_DIR";
pub const ENV_FILTER: &str = "PDBQ_LOG_FILTER";

/// A logging setting spelled as one of a fixed set of names.
///
/// The first name listed for a value is its canonical spelling.
trait NamedSetting: Copy + PartialEq + 'static {
    const KIND: &'static str;
    const NAMES: &'static [(&'static str, Self)];

    fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, v)| *v)
            .ok_or_else(|| anyhow!("Invalid log {}: {}", Self::KIND, name))
    }

    fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, v)| *v == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }
}

macro_rules! named_setting_impls {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                <$ty as NamedSetting>::from_name(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// Minimum severity that gets logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl NamedSetting for LogLevel {
    const KIND: &'static str = "level";
    const NAMES: &'static [(&'static str, Self)] = &[
        ("trace", LogLevel::Trace),
        ("debug", LogLevel::Debug),
        ("info", LogLevel::Info),
        ("warn", LogLevel::Warn),
        ("warning", LogLevel::Warn),
        ("error", LogLevel::Error),
    ];
}

named_setting_impls!(LogLevel);

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// stderr only
    #[default]
    Console,
    /// Daily rolling file only
    File,
    Both,
}

impl NamedSetting for LogOutput {
    const KIND: &'static str = "output";
    const NAMES: &'static [(&'static str, Self)] = &[
        ("console", LogOutput::Console),
        ("stderr", LogOutput::Console),
        ("file", LogOutput::File),
        ("both", LogOutput::Both),
    ];
}

named_setting_impls!(LogOutput);

impl LogOutput {
    fn to_console(self) -> bool {
        self != LogOutput::File
    }

    fn to_file(self) -> bool {
        self != LogOutput::Console
    }
}

/// Line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl NamedSetting for LogFormat {
    const KIND: &'static str = "format";
    const NAMES: &'static [(&'static str, Self)] = &[("text", LogFormat::Text), ("json", LogFormat::Json)];
}

named_setting_impls!(LogFormat);

/// Subscriber settings for a pdbq process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub output: LogOutput,
    pub format: LogFormat,

    /// Where rolling files go when `output` includes a file
    pub log_dir: PathBuf,

    /// File name stem; the appender adds the date ("pdbq.2026-10-16")
    pub file_prefix: String,

    /// Extra `target=level` directives, comma separated
    pub directives: Option<String>,

    /// Record source file and line on each event
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            output: LogOutput::default(),
            format: LogFormat::default(),
            log_dir: PathBuf::from("logs"),
            file_prefix: "pdbq".to_string(),
            directives: None,
            source_location: false,
        }
    }
}

impl LogConfig {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    /// Defaults overridden by `PDBQ_LOG_*` variables
    pub fn from_env() -> Result<Self> {
        Self::default().merge_env()
    }

    /// Apply the `PDBQ_LOG_*` variables that are set in the process environment
    pub fn merge_env(self) -> Result<Self> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    ///
    /// | variable          | values                          |
    /// |-------------------|---------------------------------|
    /// | `PDBQ_LOG_LEVEL`  | trace, debug, info, warn, error |
    /// | `PDBQ_LOG_OUTPUT` | console, file, both             |
    /// | `PDBQ_LOG_FORMAT` | text, json                      |
    /// | `PDBQ_LOG_DIR`    | directory for rolling files     |
    /// | `PDBQ_LOG_FILTER` | extra filter directives         |
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup(ENV_LEVEL) {
            self.level = v.parse().with_context(|| format!("{} is invalid", ENV_LEVEL))?;
        }
        if let Some(v) = lookup(ENV_OUTPUT) {
            self.output = v.parse().with_context(|| format!("{} is invalid", ENV_OUTPUT))?;
        }
        if let Some(v) = lookup(ENV_FORMAT) {
            self.format = v.parse().with_context(|| format!("{} is invalid", ENV_FORMAT))?;
        }
        if let Some(v) = lookup(ENV_DIR) {
            self.log_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_FILTER) {
            self.directives = Some(v);
        }
        Ok(self)
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let extra = self
            .directives
            .iter()
            .flat_map(|d| d.split(','))
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let mut filter = EnvFilter::default().add_directive(LevelFilter::from(self.level).into());
        for directive in extra {
            let parsed: Directive = directive
                .parse()
                .with_context(|| format!("Bad log filter directive '{}'", directive))?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }
}

/// Install the global subscriber.
///
/// Returns the file writer guard when file output is enabled; the caller must
/// hold it until exit or buffered lines are lost.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = config.env_filter()?;
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    let mut guard = None;

    if config.output.to_console() {
        layers.push(stderr_layer(config));
    }
    if config.output.to_file() {
        let (layer, file_guard) = rolling_file_layer(config)?;
        layers.push(layer);
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(guard)
}

fn stderr_layer(config: &LogConfig) -> BoxedLayer {
    let layer = tfmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    if config.format == LogFormat::Json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn rolling_file_layer(config: &LogConfig) -> Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Cannot create log directory {}", config.log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tfmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let layer = if config.format == LogFormat::Json {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    Ok((layer, guard))
}
