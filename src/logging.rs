use anyhow::Result;
use tracing_subscriber::fmt;

/// Logs go to stderr so a one-shot translation on stdout stays clean.
pub fn init(verbose: bool) -> Result<()> {
    if !verbose {
        return Ok(());
    }
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_level(true)
        .try_init();
    Ok(())
}
