//! Logging backends for the command-line tools.
//!
//! Library code only talks to the `log` facade. A binary installs one backend
//! at startup: [`init_with_level`] / [`init_from_env`] for the plain stderr
//! logger, or (feature `tracing`) [`init_tracing`].
//!
//! The stderr logger prints `  12ms INFO  analysis: message`. Records from
//! other crates (image decoders and the like) are shown from `warn` up only.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Environment variable holding the log level (or, with `tracing`, a filter).
pub const LOG_ENV_VAR: &str = "JUMP_METRICS_LOG";

const OWN_TARGET_PREFIX: &str = "jump_metrics";

/// Output format of [`init_tracing`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    /// One JSON object per event.
    Json,
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    fn passes(&self, metadata: &Metadata) -> bool {
        let cap = if metadata.target().starts_with(OWN_TARGET_PREFIX) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        };
        metadata.level() <= cap
    }
}

fn render(elapsed: Duration, level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    let module = target.rsplit("::").next().unwrap_or(target);
    format!(
        "{:>6}ms {:<5} {module}: {args}",
        elapsed.as_millis(),
        level.as_str()
    )
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.passes(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.passes(record.metadata()) {
            return;
        }
        let line = render(
            self.started.elapsed(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger. Later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Like [`init_with_level`], with the level taken from [`LOG_ENV_VAR`] when it
/// names one.
pub fn init_from_env(default: LevelFilter) -> Result<(), log::SetLoggerError> {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|raw| LevelFilter::from_str(raw.trim()).ok())
        .unwrap_or(default);
    init_with_level(level)
}

/// Install a `tracing-subscriber` formatter that also receives `log` records.
///
/// The filter comes from [`LOG_ENV_VAR`], then `RUST_LOG`, then `default`.
/// Does nothing if a global subscriber is already set.
#[cfg(feature = "tracing")]
pub fn init_tracing(format: LogFormat, default: LevelFilter) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default.as_str().to_ascii_lowercase()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    let _ = match format {
        LogFormat::Plain => builder
            .compact()
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish()
            .try_init(),
        LogFormat::Json => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .finish()
            .try_init(),
    };
}
