use anyhow::Context;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use std::path::Path;

/// Logs go to a file, the terminal belongs to the UI.
/// The returned handle must be kept alive for as long as logging is needed.
pub fn init(log_dir: &Path) -> anyhow::Result<LoggerHandle> {
    Logger::try_with_env_or_str("info")
        .context("Invalid log specification")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename("history-router"),
        )
        .start()
        .context("Failed to start the logger")
}
