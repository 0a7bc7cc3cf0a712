//! `run` command implementation.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{PipelineConfig, PipelineOptions};
use dispatcher::create_consumer;
use ingestion::FormatOpener;
use processor::TrajectoryProcessor;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let mut options = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    apply_overrides(&mut options, args);

    let config = ConfigLoader::resolve(&options).context("Failed to resolve configuration")?;

    info!(
        files = config.trajectory_files.len(),
        consumers = options.consumers.len(),
        buffer_size = config.buffer_size,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config, &options);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut processor = TrajectoryProcessor::new(config, Arc::new(FormatOpener::new()));
    for consumer_config in &options.consumers {
        let consumer = create_consumer(consumer_config)
            .with_context(|| format!("Failed to create consumer '{}'", consumer_config.name))?;
        processor.add_consumer(consumer);
    }

    info!("Starting pipeline...");

    // The pipeline blocks on channels; keep it off the async workers
    let task = tokio::task::spawn_blocking(move || processor.run());

    let report = match run_until_shutdown(task, shutdown_signal()).await? {
        RunOutcome::Finished(result) => result.context("Pipeline execution failed")?,
        RunOutcome::Interrupted => {
            // The runtime would wait for the blocking pipeline on drop
            warn!("Received shutdown signal, exiting without waiting for the pipeline");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    };

    info!(
        frames = report.frames_dispatched,
        duration_secs = report.duration.as_secs_f64(),
        fps = format!("{:.2}", report.fps()),
        "Pipeline completed"
    );
    report.print_summary();

    if report.reader.is_failure() {
        anyhow::bail!("Reading trajectory failed: {:?}", report.reader.stop_reason);
    }
    if !report.is_success() {
        warn!("Some consumers reported errors, see summary");
    }

    info!("trajstream finished");
    Ok(())
}

/// Exit status after Ctrl+C / SIGTERM (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// How the race between the pipeline and a shutdown signal ended
enum RunOutcome<T> {
    Finished(T),
    Interrupted,
}

/// Wait for the pipeline task unless `shutdown` resolves first
async fn run_until_shutdown<T, S>(task: JoinHandle<T>, shutdown: S) -> Result<RunOutcome<T>>
where
    S: Future<Output = ()>,
{
    tokio::select! {
        joined = task => Ok(RunOutcome::Finished(joined.context("Pipeline thread panicked")?)),
        _ = shutdown => Ok(RunOutcome::Interrupted),
    }
}

/// Apply command-line overrides to the raw options
fn apply_overrides(options: &mut PipelineOptions, args: &RunArgs) {
    let trajectory = &mut options.trajectory;

    if let Some(buffer_size) = args.buffer_size {
        info!(buffer_size, "Overriding buffer size from CLI");
        options.buffer_size = buffer_size;
    }
    if let Some(skip) = args.skip {
        trajectory.skip = skip;
    }
    if let Some(first_frame) = args.first_frame {
        trajectory.first_frame = first_frame;
    }
    if let Some(last_frame) = args.last_frame {
        trajectory.last_frame = last_frame;
    }
    if let Some(first_time) = args.first_time {
        trajectory.first_time = first_time;
    }
    if let Some(last_time) = args.last_time {
        trajectory.last_time = last_time;
    }
    if let Some(log_interval) = args.log_interval {
        options.log_interval = log_interval;
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &PipelineConfig, options: &PipelineOptions) {
    println!("\n=== Configuration Summary ===\n");
    println!("Trajectory files ({}):", config.trajectory_files.len());
    for file in &config.trajectory_files {
        println!("  - {}", file.display());
    }
    if let Some(ref structure) = config.structure_file {
        println!("Structure: {}", structure.display());
    }
    if let Some(ref topology) = config.topology_file {
        println!("Topology: {}", topology.display());
    }

    println!("\nSelection:");
    println!("  Frames: {:?} ..= {:?}", config.bounds.first_frame, config.bounds.last_frame);
    println!("  Time: {:?} ..= {:?}", config.bounds.first_time, config.bounds.last_time);
    println!("  Skip: {:?}", config.bounds.skip);
    println!("  Buffer size: {}", config.buffer_size);

    if !options.consumers.is_empty() {
        println!("\nConsumers ({}):", options.consumers.len());
        for consumer in &options.consumers {
            println!("  - {} ({:?})", consumer.name, consumer.kind);
        }
    }

    println!();
}
