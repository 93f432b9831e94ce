use std::fmt;

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

// "Mon Oct 19 20:26:00 2026"
const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year]"
);

/// ctime-style local timestamp for log lines, falling back to UTC when the
/// local offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct CtimeTimer;

impl FormatTime for CtimeTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        write!(w, "{}", format_timestamp(now))
    }
}

pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).unwrap_or_default()
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence; otherwise
/// `verbose` selects debug output for this crate.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("qualview={}", level)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(CtimeTimer)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}
