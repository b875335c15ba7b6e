// Configuration loading and parsing (wheel.toml).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },

    #[error("failed to determine the platform data directory")]
    DataDirNotFound,
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

/// Name of the config file inside `config/` and `defaults/`.
pub const CONFIG_FILE_NAME: &str = "wheel.toml";

/// File name used for the SQLite store when `storage.db_path` is unset.
pub const DEFAULT_DB_FILE_NAME: &str = "restaurant-wheel.db";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub pool: PoolConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Duration handed to the wheel with every spin request.
    pub spin_duration_ms: u64,
    /// Render interval of the terminal wheel.
    pub frame_interval_ms: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        WheelConfig {
            spin_duration_ms: 2600,
            frame_interval_ms: 33,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Explicit SQLite path. `None` means "use the platform data dir".
    pub db_path: Option<String>,
    /// Key the pool document is stored under.
    pub state_key: String,
    /// Lifetime of the stored entry, refreshed on every save.
    pub expiry_days: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            db_path: None,
            state_key: "restaurantData".to_string(),
            expiry_days: 365,
        }
    }
}

impl StorageConfig {
    /// Resolve the database location, falling back to the platform data
    /// directory (e.g. `~/.local/share/restaurant-wheel/`) when no explicit
    /// path is configured.
    pub fn resolve_db_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.db_path {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("org", "restaurant-wheel", "restaurant-wheel")
            .ok_or(ConfigError::DataDirNotFound)?;
        Ok(dirs.data_dir().join(DEFAULT_DB_FILE_NAME))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where the export action writes the pretty-printed pool document.
    pub path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            path: "restaurant-data.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Built-in candidate list used when nothing has been saved yet.
    pub defaults: Vec<String>,
}

impl PoolConfig {
    /// Default names with whitespace trimmed and blank entries dropped.
    pub fn default_names(&self) -> Vec<String> {
        self.defaults
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/wheel.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE_NAME);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let positive_fields: &[(&str, u64)] = &[
        ("wheel.spin_duration_ms", config.wheel.spin_duration_ms),
        ("wheel.frame_interval_ms", config.wheel.frame_interval_ms),
        ("storage.expiry_days", u64::from(config.storage.expiry_days)),
    ];
    for (name, val) in positive_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.storage.state_key.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "storage.state_key".into(),
            message: "must not be empty".into(),
        });
    }

    if config.export.path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "export.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Repository root, where `defaults/wheel.toml` lives.
    fn project_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    /// Fresh scratch directory with an empty `config/` inside.
    fn scratch_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn write_config(dir: &Path, text: &str) {
        fs::write(dir.join("config").join(CONFIG_FILE_NAME), text).unwrap();
    }

    #[test]
    fn load_shipped_defaults() {
        let tmp = scratch_dir("wheel_config_defaults");
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE_NAME),
            tmp.join("config").join(CONFIG_FILE_NAME),
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("shipped defaults should load");
        assert_eq!(config.wheel.spin_duration_ms, 2600);
        assert_eq!(config.wheel.frame_interval_ms, 33);
        assert!(config.storage.db_path.is_none());
        assert_eq!(config.storage.state_key, "restaurantData");
        assert_eq!(config.storage.expiry_days, 365);
        assert_eq!(config.export.path, "restaurant-data.json");
        assert_eq!(config.pool.default_names().len(), 8);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_file_uses_builtin_defaults() {
        let tmp = scratch_dir("wheel_config_empty");
        write_config(&tmp, "");

        let config = load_config_from(&tmp).expect("empty config should load");
        assert_eq!(config.wheel.spin_duration_ms, 2600);
        assert_eq!(config.storage.state_key, "restaurantData");
        assert!(config.pool.defaults.is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn default_names_are_trimmed_and_blank_entries_dropped() {
        let pool = PoolConfig {
            defaults: vec!["  Pho  ".into(), "   ".into(), "".into(), "Tacos".into()],
        };
        assert_eq!(pool.default_names(), vec!["Pho", "Tacos"]);
    }

    #[test]
    fn explicit_db_path_wins() {
        let storage = StorageConfig {
            db_path: Some("custom.db".into()),
            ..StorageConfig::default()
        };
        assert_eq!(storage.resolve_db_path().unwrap(), PathBuf::from("custom.db"));
    }

    #[test]
    fn rejects_zero_spin_duration() {
        let tmp = scratch_dir("wheel_config_zero_duration");
        write_config(&tmp, "[wheel]\nspin_duration_ms = 0\n");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "wheel.spin_duration_ms");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_expiry() {
        let tmp = scratch_dir("wheel_config_zero_expiry");
        write_config(&tmp, "[storage]\nexpiry_days = 0\n");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "storage.expiry_days");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_state_key() {
        let tmp = scratch_dir("wheel_config_blank_key");
        write_config(&tmp, "[storage]\nstate_key = \"  \"\n");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "storage.state_key");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch_dir("wheel_config_invalid");
        write_config(&tmp, "this is not valid [[[ toml");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with(CONFIG_FILE_NAME));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = scratch_dir("wheel_config_missing");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with(CONFIG_FILE_NAME));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join(format!("wheel_ensure_copies_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE_NAME),
            defaults_dir.join(CONFIG_FILE_NAME),
        )
        .unwrap();
        fs::write(defaults_dir.join("wheel.toml.example"), "# example\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config").join(CONFIG_FILE_NAME).exists());
        assert!(!tmp.join("config/wheel.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = scratch_dir("wheel_ensure_skips");
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE_NAME), "[wheel]\n").unwrap();
        write_config(&tmp, "# custom\n");

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join(format!("wheel_both_missing_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
