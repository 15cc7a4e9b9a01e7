use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::store_io::atomic_write;
use crate::model::config::Config;
use crate::model::entry::Category;
use crate::ops::labels::{INTENSITY_MAX, INTENSITY_MIN};

pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "URGE_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not edit {path}: {source}")]
    EditError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error(
        "unknown config key '{0}' (expected one of: display.currency, display.note_width, \
         defaults.category, defaults.intensity)"
    )]
    UnknownKey(String),
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: &'static str,
    },
    #[error("no data directory found: set URGE_DIR or pass --data-dir")]
    NoDataDir,
}

/// Pick the data directory: explicit flag, then `URGE_DIR`, then the
/// platform data directory.
pub fn resolve_data_dir(override_dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|d| d.join("urge"))
        .ok_or(ConfigError::NoDataDir)
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Read config.toml. A missing file gives the defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(data_dir);
    let Some(text) = read_config_text(&path)? else {
        return Ok(Config::default());
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

/// Set one `table.key` value, keeping the rest of the file as written
pub fn set_config_value(data_dir: &Path, key: &str, value: &str) -> Result<(), ConfigError> {
    let path = config_path(data_dir);
    let text = read_config_text(&path)?.unwrap_or_default();
    let mut doc: toml_edit::DocumentMut = text.parse().map_err(|e| ConfigError::EditError {
        path: path.clone(),
        source: e,
    })?;

    let (table, field) = key
        .split_once('.')
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let item = typed_value(key, value)?;

    if !doc.contains_key(table) {
        doc[table] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[table][field] = item;

    let updated = doc.to_string();
    // the edited file must still load
    toml::from_str::<Config>(&updated).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    fs::create_dir_all(data_dir).map_err(|e| ConfigError::WriteError {
        path: data_dir.to_path_buf(),
        source: e,
    })?;
    atomic_write(&path, updated.as_bytes()).map_err(|e| ConfigError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    tracing::info!(key, value, path = %path.display(), "updated config");
    Ok(())
}

fn read_config_text(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Convert a command-line value into the TOML item for `key`
fn typed_value(key: &str, value: &str) -> Result<toml_edit::Item, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };
    match key {
        "display.currency" => Ok(toml_edit::value(value)),
        "display.note_width" => {
            let width: i64 = value.parse().map_err(|_| invalid("expected a number"))?;
            if width < 1 {
                return Err(invalid("must be at least 1"));
            }
            Ok(toml_edit::value(width))
        }
        "defaults.category" => {
            let category = Category::parse_category(value)
                .ok_or_else(|| invalid("expected vaping or alcohol"))?;
            Ok(toml_edit::value(category.as_str()))
        }
        "defaults.intensity" => {
            let intensity: u8 = value.parse().map_err(|_| invalid("expected 1, 2 or 3"))?;
            if !(INTENSITY_MIN..=INTENSITY_MAX).contains(&intensity) {
                return Err(invalid("expected 1, 2 or 3"));
            }
            Ok(toml_edit::value(i64::from(intensity)))
        }
        _ => Err(ConfigError::UnknownKey(key.to_string())),
    }
}
