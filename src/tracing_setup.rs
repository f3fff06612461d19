use std::fs::OpenOptions;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::model::config::LogConfig;

/// Where log lines go when no file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// CLI commands: stderr, leaving stdout to the command's output
    Stderr,
    /// The TUI owns the terminal: drop everything
    Discard,
}

/// Build the filter from `log.level`, falling back to `warn` on a bad directive.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level.trim()).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Safe to call once per process.
pub fn init(config: &LogConfig, fallback: Fallback) -> std::io::Result<()> {
    let filter = build_filter(&config.level);
    let registry = tracing_subscriber::registry().with(filter);

    match (&config.file, fallback) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(Path::new(path))?;
            let layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true);
            let _ = registry.with(layer).try_init();
        }
        (None, Fallback::Stderr) => {
            let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
            let _ = registry.with(layer).try_init();
        }
        (None, Fallback::Discard) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_directive_falls_back_to_warn() {
        let filter = build_filter("tessernote=loud");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn level_directive_is_kept() {
        let filter = build_filter(" tessernote=debug ");
        assert!(filter.to_string().contains("tessernote=debug"));
    }
}
