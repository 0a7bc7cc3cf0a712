//! `info` command implementation.

use std::collections::HashMap;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{PipelineConfig, PipelineOptions};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    files: FilesInfo,
    selection: SelectionInfo,
    buffer_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dump_input: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    consumers: Vec<ConsumerInfo>,
}

#[derive(Serialize)]
struct FilesInfo {
    trajectories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    structure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topology: Option<String>,
}

#[derive(Serialize)]
struct SelectionInfo {
    first_frame: Option<u64>,
    last_frame: Option<u64>,
    first_time: Option<f64>,
    last_time: Option<f64>,
    skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_dt: Option<f64>,
    window_size_frames: Option<u64>,
    window_size_time: Option<f64>,
}

#[derive(Serialize)]
struct ConsumerInfo {
    name: String,
    kind: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    params: HashMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let options = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let config = ConfigLoader::resolve(&options).context("Failed to resolve configuration")?;

    let info = build_config_info(&options, &config, args.consumers);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(
    options: &PipelineOptions,
    config: &PipelineConfig,
    with_consumers: bool,
) -> ConfigInfo {
    let display = |p: &std::path::PathBuf| p.display().to_string();

    let consumers = if with_consumers {
        options
            .consumers
            .iter()
            .map(|c| ConsumerInfo {
                name: c.name.clone(),
                kind: format!("{:?}", c.kind),
                params: c.params.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", options.version),
        files: FilesInfo {
            trajectories: config.trajectory_files.iter().map(display).collect(),
            structure: config.structure_file.as_ref().map(display),
            topology: config.topology_file.as_ref().map(display),
        },
        selection: SelectionInfo {
            first_frame: config.bounds.first_frame,
            last_frame: config.bounds.last_frame,
            first_time: config.bounds.first_time,
            last_time: config.bounds.last_time,
            skip: config.bounds.skip,
            custom_start_time: config.time_override.map(|t| t.start),
            custom_dt: config.time_override.map(|t| t.dt),
            window_size_frames: config.window.frames,
            window_size_time: config.window.time,
        },
        buffer_size: config.buffer_size,
        log_interval: config.log_interval,
        dump_input: config.dump_input.as_ref().map(display),
        consumers,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("trajstream configuration (version {})\n", info.version);

    println!("Files:");
    for file in &info.files.trajectories {
        println!("  trajectory: {}", file);
    }
    if let Some(ref structure) = info.files.structure {
        println!("  structure:  {}", structure);
    }
    if let Some(ref topology) = info.files.topology {
        println!("  topology:   {}", topology);
    }

    let sel = &info.selection;
    println!("\nSelection:");
    println!("  frames: {} ..= {}", opt(sel.first_frame), opt(sel.last_frame));
    println!("  time:   {} ..= {}", opt(sel.first_time), opt(sel.last_time));
    println!("  skip:   {}", opt(sel.skip));
    if let (Some(start), Some(dt)) = (sel.custom_start_time, sel.custom_dt) {
        println!("  time override: t = {} + {} * frame", start, dt);
    }
    println!(
        "  window: {} frames / {} ps",
        opt(sel.window_size_frames),
        opt(sel.window_size_time)
    );

    println!("\nChannels:");
    println!("  buffer size:  {}", info.buffer_size);
    println!("  log interval: {}", opt(info.log_interval));
    if let Some(ref dump) = info.dump_input {
        println!("  dump input:   {}", dump);
    }

    if !info.consumers.is_empty() {
        println!("\nConsumers:");
        for consumer in &info.consumers {
            println!("  {} ({})", consumer.name, consumer.kind);
            let mut params: Vec<_> = consumer.params.iter().collect();
            params.sort();
            for (key, value) in params {
                println!("    {} = {}", key, value);
            }
        }
    }
}

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
