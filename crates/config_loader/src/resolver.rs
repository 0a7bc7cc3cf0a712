//! Options resolution
//!
//! Turns raw options (with `-1` sentinels and a mixed file list) into a
//! `PipelineConfig`:
//! - files are sorted into structure / topology / trajectory by extension
//! - negative bounds become `None`, `skip <= 0` means no stride
//! - custom start time and time step default each other

use std::path::{Path, PathBuf};

use contracts::{
    ContractError, FrameBounds, PipelineConfig, PipelineOptions, TimeOverride, TrajectoryOptions,
    WindowSize,
};

/// Role of a file in the trajectory block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Coordinates + atom names (PDB, GRO)
    Structure,
    /// Force-field topology
    Topology,
    /// Frame-by-frame trajectory
    Trajectory,
}

impl FileKind {
    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdb" | "gro" => Some(Self::Structure),
            "pttop" | "top" | "tpr" => Some(Self::Topology),
            "xtc" | "trr" | "dcd" | "xyz" => Some(Self::Trajectory),
            _ => None,
        }
    }
}

/// Resolve raw options into a validated `PipelineConfig`
pub fn resolve(options: &PipelineOptions) -> Result<PipelineConfig, ContractError> {
    let trj = &options.trajectory;
    let (structure_file, topology_file, trajectory_files) = classify_files(&trj.files)?;

    let config = PipelineConfig {
        trajectory_files,
        structure_file,
        topology_file,
        bounds: resolve_bounds(trj),
        time_override: resolve_time_override(trj),
        window: WindowSize {
            frames: non_negative_u64(trj.window_size_frames),
            time: non_negative_f64(trj.window_size_time),
        },
        buffer_size: options.buffer_size,
        log_interval: (options.log_interval > 0).then_some(options.log_interval),
        dump_input: options.dump_input.clone(),
    };

    config.validate()?;
    Ok(config)
}

type ClassifiedFiles = (Option<PathBuf>, Option<PathBuf>, Vec<PathBuf>);

fn classify_files(files: &[PathBuf]) -> Result<ClassifiedFiles, ContractError> {
    let mut structure = None;
    let mut topology = None;
    let mut trajectories = Vec::new();

    for (idx, file) in files.iter().enumerate() {
        let kind = FileKind::from_path(file).ok_or_else(|| {
            ContractError::config_validation(
                format!("trajectory.files[{idx}]"),
                format!("unrecognized file kind: {}", file.display()),
            )
        })?;

        match kind {
            FileKind::Structure => set_once(&mut structure, file, idx, "structure")?,
            FileKind::Topology => set_once(&mut topology, file, idx, "topology")?,
            FileKind::Trajectory => trajectories.push(file.clone()),
        }
    }

    if trajectories.is_empty() {
        return Err(ContractError::config_validation(
            "trajectory.files",
            "at least one trajectory file is required",
        ));
    }

    Ok((structure, topology, trajectories))
}

fn set_once(
    slot: &mut Option<PathBuf>,
    file: &Path,
    idx: usize,
    category: &str,
) -> Result<(), ContractError> {
    if let Some(existing) = slot {
        return Err(ContractError::config_validation(
            format!("trajectory.files[{idx}]"),
            format!(
                "only one {category} file is allowed, got {} and {}",
                existing.display(),
                file.display()
            ),
        ));
    }
    *slot = Some(file.to_path_buf());
    Ok(())
}

fn resolve_bounds(trj: &TrajectoryOptions) -> FrameBounds {
    FrameBounds {
        first_frame: non_negative_u64(trj.first_frame),
        last_frame: non_negative_u64(trj.last_frame),
        first_time: non_negative_f64(trj.first_time),
        last_time: non_negative_f64(trj.last_time),
        skip: (trj.skip > 0).then_some(trj.skip as u64),
    }
}

fn resolve_time_override(trj: &TrajectoryOptions) -> Option<TimeOverride> {
    match (
        non_negative_f64(trj.custom_start_time),
        non_negative_f64(trj.custom_dt),
    ) {
        (None, None) => None,
        (Some(start), None) => Some(TimeOverride { start, dt: 1.0 }),
        (None, Some(dt)) => Some(TimeOverride { start: 0.0, dt }),
        (Some(start), Some(dt)) => Some(TimeOverride { start, dt }),
    }
}

fn non_negative_u64(value: i64) -> Option<u64> {
    (value >= 0).then_some(value as u64)
}

fn non_negative_f64(value: f64) -> Option<f64> {
    (value >= 0.0).then_some(value)
}
