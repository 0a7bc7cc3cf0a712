//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{PipelineConfig, PipelineOptions};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    trajectory_file_count: usize,
    has_structure: bool,
    has_topology: bool,
    consumer_count: usize,
    buffer_size: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return invalid(config_path, format!("File not found: {}", args.config.display()));
    }

    let options = match ConfigLoader::load_from_path(&args.config) {
        Ok(options) => options,
        Err(e) => return invalid(config_path, e.to_string()),
    };
    let config = match ConfigLoader::resolve(&options) {
        Ok(config) => config,
        Err(e) => return invalid(config_path, e.to_string()),
    };

    let warnings = collect_warnings(&options, &config);

    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings: (!warnings.is_empty()).then_some(warnings),
        summary: Some(ConfigSummary {
            version: format!("{:?}", options.version),
            trajectory_file_count: config.trajectory_files.len(),
            has_structure: config.structure_file.is_some(),
            has_topology: config.topology_file.is_some(),
            consumer_count: options.consumers.len(),
            buffer_size: config.buffer_size,
        }),
    }
}

fn invalid(config_path: String, error: String) -> ValidationResult {
    ValidationResult {
        valid: false,
        config_path,
        error: Some(error),
        warnings: None,
        summary: None,
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(options: &PipelineOptions, config: &PipelineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if options.consumers.is_empty() {
        warnings.push("No consumers configured - `run` will refuse to start".to_string());
    }

    for file in &config.trajectory_files {
        if !file.exists() {
            warnings.push(format!("Trajectory file does not exist yet: {}", file.display()));
        }
    }

    if config.time_override.is_some() && config.bounds.first_time.is_some() {
        warnings.push(
            "first_time is compared against overridden times (custom_start_time/custom_dt)"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Trajectory files: {}", summary.trajectory_file_count);
            println!("  Structure: {}", yes_no(summary.has_structure));
            println!("  Topology: {}", yes_no(summary.has_topology));
            println!("  Consumers: {}", summary.consumer_count);
            println!("  Buffer size: {}", summary.buffer_size);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn args(config: &Path) -> ValidateArgs {
        ValidateArgs {
            config: config.to_path_buf(),
            json: true,
        }
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let result = validate_config(&args(&PathBuf::from("/nonexistent/run.toml")));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_valid_with_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(
            &path,
            r#"
buffer_size = 4

[trajectory]
files = ["system.pdb", "missing.xyz"]
"#,
        )
        .unwrap();

        let result = validate_config(&args(&path));
        assert!(result.valid);

        let summary = result.summary.unwrap();
        assert_eq!(summary.trajectory_file_count, 1);
        assert!(summary.has_structure);
        assert!(!summary.has_topology);
        assert_eq!(summary.buffer_size, 4);

        let warnings = result.warnings.unwrap();
        assert!(warnings.iter().any(|w| w.contains("No consumers")));
        assert!(warnings.iter().any(|w| w.contains("missing.xyz")));
    }

    #[test]
    fn test_unresolvable_options_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(
            &path,
            r#"
[trajectory]
files = ["system.pdb"]
"#,
        )
        .unwrap();

        let result = validate_config(&args(&path));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("trajectory"));
    }
}
