//! Tracing setup for the paraedit binary.
//!
//! Events are written as JSON lines to a log file. A human-readable stderr
//! layer is added only when `-v` is given or `RUST_LOG` is set, so the
//! editor's own output on stdout stays clean.
//!
//! Log file resolution, first match wins:
//!
//! 1. `PARAEDIT_LOG_PATH` - explicit file path
//! 2. `PARAEDIT_LOG_DIR` - directory, file name `paraedit.jsonl`
//! 3. `log_dir` from configuration
//! 4. `<data_local_dir>/paraedit/logs/paraedit.jsonl`
//!
//! A log file that cannot be created disables the file layer instead of
//! failing the program.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_PATH_ENV: &str = "PARAEDIT_LOG_PATH";
const LOG_DIR_ENV: &str = "PARAEDIT_LOG_DIR";
const LOG_FILE_NAME: &str = "paraedit.jsonl";

/// Where (and whether) to write log output.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Resolved log file, if any could be determined.
    pub log_file: Option<PathBuf>,
    /// Mirror events to stderr.
    pub stderr: bool,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, then `log_dir`, then the
    /// platform data directory.
    pub fn from_env_with_overrides(log_dir: Option<PathBuf>) -> Self {
        let log_file = env::var_os(LOG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| env::var_os(LOG_DIR_ENV).map(|dir| PathBuf::from(dir).join(LOG_FILE_NAME)))
            .or_else(|| log_dir.map(|dir| dir.join(LOG_FILE_NAME)))
            .or_else(|| {
                paraedit_core::config::user_data_local_dir()
                    .map(|dir| dir.join("logs").join(LOG_FILE_NAME).into_std_path_buf())
            });

        Self {
            log_file,
            stderr: env::var_os("RUST_LOG").is_some(),
        }
    }

    /// Force the stderr layer on.
    pub const fn with_stderr(mut self, enabled: bool) -> Self {
        self.stderr |= enabled;
        self
    }
}

/// Keeps the background log writer alive; dropping it flushes the file.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Build the level filter from CLI flags and the configured level.
///
/// `--quiet` and `-v` win over `RUST_LOG`, which wins over the config.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    let directive = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => {
            return EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level));
        }
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(directive)
}

/// Install the global subscriber.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let (file_layer, file_guard) = match config.log_file.as_deref().and_then(open_log_file) {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = config
        .stderr
        .then(|| fmt::layer().with_writer(std::io::stderr).boxed());

    Registry::default()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(ObservabilityGuard {
        _file_guard: file_guard,
    })
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).ok()?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(env_filter(true, 3, "info").to_string(), "error");
    }

    #[test]
    fn verbose_levels() {
        assert_eq!(env_filter(false, 1, "info").to_string(), "debug");
        assert_eq!(env_filter(false, 2, "info").to_string(), "trace");
    }

    /// Serializes tests that mutate the log location variables.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Run `f` with the log location variables set to the given values,
    /// restoring the previous values afterwards.
    #[allow(unsafe_code)]
    fn with_log_env<T>(path: Option<&str>, dir: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved = [
            (LOG_PATH_ENV, env::var_os(LOG_PATH_ENV)),
            (LOG_DIR_ENV, env::var_os(LOG_DIR_ENV)),
        ];

        for (key, value) in [(LOG_PATH_ENV, path), (LOG_DIR_ENV, dir)] {
            // SAFETY: the env mutex serializes env access across tests.
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }

        let result = f();

        for (key, value) in saved {
            // SAFETY: as above.
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
        result
    }

    #[test]
    fn config_dir_used_when_env_unset() {
        let config = with_log_env(None, None, || {
            ObservabilityConfig::from_env_with_overrides(Some(PathBuf::from("/tmp/pe")))
        });
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/tmp/pe").join(LOG_FILE_NAME))
        );
    }

    #[test]
    fn log_dir_env_wins_over_config_dir() {
        let config = with_log_env(None, Some("/tmp/from-env"), || {
            ObservabilityConfig::from_env_with_overrides(Some(PathBuf::from("/tmp/pe")))
        });
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/tmp/from-env").join(LOG_FILE_NAME))
        );
    }

    #[test]
    fn log_path_env_wins_over_log_dir_env() {
        let config = with_log_env(Some("/tmp/exact.jsonl"), Some("/tmp/from-env"), || {
            ObservabilityConfig::from_env_with_overrides(None)
        });
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/exact.jsonl")));
    }

    #[test]
    fn open_log_file_creates_parent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join(LOG_FILE_NAME);
        assert!(open_log_file(&path).is_some());
        assert!(path.is_file());
    }

    #[test]
    fn unwritable_location_is_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        assert!(open_log_file(&blocker.join(LOG_FILE_NAME)).is_none());
    }
}
