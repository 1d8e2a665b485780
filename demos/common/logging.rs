//! Console plus per-run log file, shared by the demo binaries

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Directory the demo log files are written to
pub const LOG_DIR: &str = "log";

/// Log to stdout and to `log/<prefix>_<unix secs>.log`
///
/// Keep the returned guard alive for the whole run; dropping it flushes the
/// file writer.
pub fn init(prefix: &str, directives: &[&str]) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    init_in(Path::new(LOG_DIR), prefix, directives)
}

pub fn init_in(
    dir: &Path,
    prefix: &str,
    directives: &[&str],
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let started = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let file_name = format!("{}_{}.log", prefix, started);
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let mut filter = EnvFilter::from_default_env();
    for directive in directives {
        filter = filter.add_directive(directive.parse()?);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    Ok(guard)
}
