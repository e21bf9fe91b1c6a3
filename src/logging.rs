use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;

/// Warnings (failed provider calls) are always logged; `verbose` raises the
/// level to debug.
pub fn init(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let _ = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}
