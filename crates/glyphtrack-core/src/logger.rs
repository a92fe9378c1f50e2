//! Logger setup for binaries and examples.
//!
//! Library code only talks to the `log` facade (and to `tracing` spans behind
//! the `tracing` feature). A binary installs one of the sinks below once at
//! startup. Both read the `GLYPHTRACK_LOG` environment variable.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable consulted for the log level / filter directive.
pub const LOG_ENV: &str = "GLYPHTRACK_LOG";

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // glyphtrack_db::database -> database
        let module = record
            .target()
            .rsplit("::")
            .next()
            .unwrap_or_else(|| record.target());
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{:>9.3}s {:<5} {:<10} {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            module,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Level named by `value` (`"debug"`, `"warn"`, `"off"`, ...), or `default`
/// when it is absent or not a level name.
pub fn parse_level(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(default)
}

/// Level from [`LOG_ENV`], falling back to `default`.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    parse_level(std::env::var(LOG_ENV).ok().as_deref(), default)
}

/// Install the stderr logger.
///
/// Only the first call installs anything; later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

/// Output layout of the `tracing` subscriber.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceFormat {
    /// Human-readable lines with uptime stamps.
    Pretty,
    /// One flattened JSON object per event.
    Json,
}

/// Install a `tracing` subscriber filtered by [`LOG_ENV`] (default `info`).
///
/// Span close events are emitted so per-frame timings of the processor show
/// up in the output. Does nothing if a global subscriber is already set.
#[cfg(feature = "tracing")]
pub fn init_tracing(format: TraceFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = match format {
        TraceFormat::Json => builder.json().flatten_event(true).finish().try_init(),
        TraceFormat::Pretty => builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init(),
    };
}
