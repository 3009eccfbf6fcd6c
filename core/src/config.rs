//! Parser configuration and on-disk schema loading.
//!
//! Both parser settings and command schemas are serde types. Files ending in
//! `.json` are read as JSON; anything else is read as YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! handle_help: true
//! help_flags:
//!   - -h
//!   - --help
//!   - -?
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::CommandSchema;
use crate::validate::validate_command;

/// Settings for one parse call.
///
/// # Examples
///
/// ```
/// use command_args_core::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert!(config.handle_help);
/// assert!(config.is_help_flag("--help"));
/// assert!(!config.is_help_flag("--verbose"));
///
/// let strict = ParserConfig::without_help();
/// assert!(!strict.handle_help);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Intercept help flags at every level instead of matching them as options.
    pub handle_help: bool,
    /// Tokens treated as help requests when `handle_help` is set.
    pub help_flags: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            handle_help: true,
            help_flags: vec!["-h".to_string(), "--help".to_string()],
        }
    }
}

impl ParserConfig {
    /// Default configuration with help interception turned off.
    pub fn without_help() -> Self {
        Self {
            handle_help: false,
            ..Self::default()
        }
    }

    /// Returns `true` if `token` is one of the configured help flags.
    pub fn is_help_flag(&self, token: &str) -> bool {
        self.help_flags.iter().any(|flag| flag == token)
    }

    /// Loads configuration from a JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_file(path.as_ref())
    }

    /// Saves the configuration, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be
    /// written, or a JSON/YAML error if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_yaml::to_writer(writer, self)?;
        }
        Ok(())
    }
}

/// Loads and validates a command schema from a JSON or YAML file.
///
/// # Errors
///
/// Returns an I/O or format error if the file cannot be read, or
/// [`InvalidSchema`](ConfigError::InvalidSchema) if the schema fails
/// validation.
pub fn load_schema(path: impl AsRef<Path>) -> Result<CommandSchema, ConfigError> {
    let schema: CommandSchema = read_file(path.as_ref())?;
    if let Some(err) = validate_command(&schema).into_iter().next() {
        return Err(ConfigError::InvalidSchema(err));
    }
    Ok(schema)
}

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let value = if is_json(path) {
        serde_json::from_reader(reader)?
    } else {
        serde_yaml::from_reader(reader)?
    };
    Ok(value)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
