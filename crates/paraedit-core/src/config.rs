//! Configuration loading and discovery.
//!
//! Settings come from, in increasing precedence:
//! 1. Built-in defaults
//! 2. User config: `~/.config/paraedit/config.<ext>`
//! 3. Project config: `.paraedit.<ext>` or `paraedit.<ext>` in the current
//!    directory or the closest parent that has one (stopping at `.git`)
//! 4. Files passed explicitly (e.g. `--config`)
//! 5. `PARAEDIT_*` environment variables
//!
//! Where `<ext>` is one of: `toml`, `yaml`, `yml`, `json`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use paraedit_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::format::FormatMode;
use crate::index::DEFAULT_THRESHOLD;
use crate::store::DUMMY_TEXT;

/// Default number of characters shown when asking overwrite-or-shift.
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// The configuration for paraedit.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Start sessions in FIX mode with this width instead of RAW.
    pub fix_width: Option<NonZeroUsize>,
    /// A term must appear in more than this many paragraphs to be indexed.
    pub index_threshold: Option<usize>,
    /// Filler paragraph inserted by `DUMMY`.
    pub dummy_text: Option<String>,
    /// Characters of the existing paragraph shown on a position collision.
    pub preview_chars: Option<usize>,
}

impl Config {
    /// The output mode a new session starts in.
    pub const fn initial_format(&self) -> FormatMode {
        match self.fix_width {
            Some(width) => FormatMode::Fix(width),
            None => FormatMode::Raw,
        }
    }

    /// The effective index threshold.
    pub fn index_threshold(&self) -> usize {
        self.index_threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    /// The effective filler paragraph.
    pub fn dummy_text(&self) -> &str {
        self.dummy_text.as_deref().unwrap_or(DUMMY_TEXT)
    }

    /// The effective collision preview length.
    pub fn preview_chars(&self) -> usize {
        self.preview_chars.unwrap_or(DEFAULT_PREVIEW_CHARS)
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files from the closest directory, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "paraedit";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "PARAEDIT_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    ///
    /// The loader will walk up from this directory looking for config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/paraedit/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal.
    ///
    /// When walking up directories, stop if we find a directory containing
    /// this file or directory name. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    /// Explicit files are loaded after discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`PARAEDIT_FIX_WIDTH=40`, ...)
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/paraedit/config.<ext>`)
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns every match from the closest directory that has any,
    /// dotfiles before regular files (figment merges last-wins).
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let candidates = CONFIG_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!(".{APP_NAME}.{ext}")))
                .chain(
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(|ext| dir.join(format!("{APP_NAME}.{ext}"))),
                );
            let found: Vec<Utf8PathBuf> = candidates.filter(|p| p.is_file()).collect();

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the project directories for XDG-compliant path resolution.
///
/// Returns `None` if the home directory cannot be determined.
fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the user config directory path.
///
/// Returns `~/.config/paraedit/` on Linux, `~/Library/Application Support/paraedit/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

/// Get the local data directory path (machine-specific, not synced).
///
/// Returns `~/.local/share/paraedit/` on Linux, `~/Library/Application Support/paraedit/`
/// on macOS, and equivalent on other platforms.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_local_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionSettings;
    use std::fs;
    use std::path::Path;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;

    /// Serializes tests that read or mutate `PARAEDIT_*` environment variables.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn utf8(path: &Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
    }

    /// Loader that ignores the real user config.
    fn loader() -> ConfigLoader {
        ConfigLoader::new().with_user_config(false)
    }

    fn load_file(contents: &str, name: &str) -> ConfigResult<Config> {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(name);
        fs::write(&path, contents).unwrap();
        loader().with_file(utf8(&path)).load().map(|(config, _)| config)
    }

    fn width(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_dir.is_none());
        assert_eq!(config.initial_format(), FormatMode::Raw);
        assert_eq!(config.index_threshold(), 3);
        assert_eq!(config.preview_chars(), 50);
        assert_eq!(config.dummy_text(), DUMMY_TEXT);
    }

    #[test]
    fn test_no_files_gives_editor_defaults() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();

        let (config, sources) = loader()
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path()))
            .load()
            .unwrap();

        assert_eq!(SessionSettings::from(&config), SessionSettings::default());
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn test_all_editor_settings_from_toml() {
        let config = load_file(
            r#"fix_width = 40
index_threshold = 2
dummy_text = "Filler."
preview_chars = 10
"#,
            "config.toml",
        )
        .unwrap();

        let settings = SessionSettings::from(&config);
        assert_eq!(settings.format, FormatMode::Fix(width(40)));
        assert_eq!(settings.index_threshold, 2);
        assert_eq!(settings.dummy_text, "Filler.");
        assert_eq!(settings.preview_chars, 10);
    }

    #[test]
    fn test_yaml_and_json_formats() {
        let config = load_file("fix_width: 12\n", "config.yaml").unwrap();
        assert_eq!(config.initial_format(), FormatMode::Fix(width(12)));

        let config = load_file(r#"{"index_threshold": 5}"#, "config.json").unwrap();
        assert_eq!(config.index_threshold(), 5);
    }

    #[test]
    fn test_zero_fix_width_is_rejected() {
        let result = load_file("fix_width = 0\n", "config.toml");
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_negative_settings_are_rejected() {
        assert!(load_file("index_threshold = -1\n", "config.toml").is_err());
        assert!(load_file("preview_chars = -5\n", "config.toml").is_err());
    }

    #[test]
    fn test_zero_threshold_indexes_every_term() {
        let config = load_file("index_threshold = 0\n", "config.toml").unwrap();
        let index = crate::index::IndexBuilder::new(config.index_threshold()).build(&["Once"]);
        assert_eq!(index.get("Once"), Some(&[1][..]));
    }

    #[test]
    fn test_project_file_found_from_nested_directory() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        let nested = project.join("notes").join("drafts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(project.join(".paraedit.toml"), "fix_width = 72\n").unwrap();

        let (config, sources) = loader()
            .without_boundary_marker()
            .with_project_search(utf8(&nested))
            .load()
            .unwrap();

        assert_eq!(config.initial_format(), FormatMode::Fix(width(72)));
        assert!(
            sources
                .primary_file()
                .is_some_and(|p| p.as_str().ends_with(".paraedit.toml"))
        );
    }

    #[test]
    fn test_dotfile_and_regular_file_merge_per_setting() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".paraedit.toml"),
            "fix_width = 30\ndummy_text = \"From dotfile.\"\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("paraedit.yaml"),
            "index_threshold: 1\ndummy_text: From regular file.\n",
        )
        .unwrap();

        let (config, sources) = loader()
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path()))
            .load()
            .unwrap();

        assert_eq!(config.fix_width, Some(width(30)));
        assert_eq!(config.index_threshold(), 1);
        assert_eq!(config.dummy_text(), "From regular file.");
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn test_only_closest_directory_contributes() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        fs::create_dir_all(&child).unwrap();
        fs::write(parent.join("paraedit.toml"), "fix_width = 30\n").unwrap();
        fs::write(child.join(".paraedit.toml"), "preview_chars = 8\n").unwrap();

        let (config, sources) = loader()
            .without_boundary_marker()
            .with_project_search(utf8(&child))
            .load()
            .unwrap();

        assert_eq!(config.preview_chars(), 8);
        assert_eq!(config.initial_format(), FormatMode::Raw);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn test_boundary_marker_stops_search() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let outside = tmp.path().join("outside");
        let repo = outside.join("repo");
        let work = repo.join("chapters");
        fs::create_dir_all(&work).unwrap();
        fs::write(outside.join(".paraedit.toml"), "dummy_text = \"Outside.\"\n").unwrap();
        fs::create_dir(repo.join(".git")).unwrap();

        let (config, sources) = loader()
            .with_boundary_marker(".git")
            .with_project_search(utf8(&work))
            .load()
            .unwrap();

        assert_eq!(config.dummy_text(), DUMMY_TEXT);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn test_explicit_file_overrides_project_config() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".paraedit.toml"),
            "fix_width = 40\nindex_threshold = 2\n",
        )
        .unwrap();
        let explicit = tmp.path().join("wide.toml");
        fs::write(&explicit, "fix_width = 100\n").unwrap();

        let (config, sources) = loader()
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path()))
            .with_file(utf8(&explicit))
            .load()
            .unwrap();

        assert_eq!(config.fix_width, Some(width(100)));
        assert_eq!(config.index_threshold(), 2);
        assert!(
            sources
                .primary_file()
                .is_some_and(|p| p.as_str().ends_with("wide.toml"))
        );
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_env_var_overrides_file_config() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "fix_width = 20\npreview_chars = 12\n").unwrap();

        // SAFETY: the env mutex serializes env access across tests.
        unsafe {
            std::env::set_var("PARAEDIT_FIX_WIDTH", "64");
        }

        let result = loader().with_file(utf8(&path)).load();

        // SAFETY: as above.
        unsafe {
            std::env::remove_var("PARAEDIT_FIX_WIDTH");
        }

        let (config, _sources) = result.unwrap();
        assert_eq!(config.fix_width, Some(width(64)));
        assert_eq!(config.preview_chars(), 12);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let yaml = "index_threshold: 1\nmargin: 4\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.index_threshold(), 1);
        assert!(config.dummy_text.is_none());
    }

    #[test]
    fn test_user_config_dir() {
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("paraedit"));
        }
    }
}
