//! # Config Loader
//!
//! Options loading and resolution module.
//!
//! Responsibilities:
//! - Parse TOML/JSON options files
//! - Validate option legality
//! - Resolve options into a `PipelineConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let options = ConfigLoader::load_from_path(Path::new("analysis.toml")).unwrap();
//! let config = ConfigLoader::resolve(&options).unwrap();
//! println!("Files: {:?}", config.trajectory_files);
//! ```

mod parser;
mod resolver;
mod validator;

pub use contracts::{PipelineConfig, PipelineOptions};
pub use parser::ConfigFormat;
pub use resolver::FileKind;

use contracts::ContractError;
use std::path::Path;

/// Options loader
///
/// Provides static methods to load options from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load options from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<PipelineOptions, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load options from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<PipelineOptions, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Resolve options into the configuration the pipeline runs with
    ///
    /// # Errors
    /// - No trajectory file, or more than one structure/topology file
    /// - Unrecognized file kind
    /// - Inverted frame or time range
    pub fn resolve(options: &PipelineOptions) -> Result<PipelineConfig, ContractError> {
        resolver::resolve(options)
    }

    /// Load, validate and resolve in one step
    pub fn load_config(path: &Path) -> Result<PipelineConfig, ContractError> {
        let options = Self::load_from_path(path)?;
        Self::resolve(&options)
    }

    /// Serialize PipelineOptions to TOML string
    pub fn to_toml(options: &PipelineOptions) -> Result<String, ContractError> {
        toml::to_string_pretty(options)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize PipelineOptions to JSON string
    pub fn to_json(options: &PipelineOptions) -> Result<String, ContractError> {
        serde_json::to_string_pretty(options)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }

    /// Write a resolved configuration as pretty JSON
    pub fn dump_config(config: &PipelineConfig, path: &Path) -> Result<(), ContractError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl ConfigLoader {
    /// Infer options format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read options file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate options content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<PipelineOptions, ContractError> {
        let options = parser::parse(content, format)?;
        validator::validate(&options)?;
        Ok(options)
    }
}
