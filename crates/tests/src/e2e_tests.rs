//! End-to-end: options file -> XYZ files -> built-in consumers

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use config_loader::ConfigLoader;
use dispatcher::create_consumer;
use ingestion::{FormatOpener, StopReason};
use processor::TrajectoryProcessor;
use serde_json::Value;

/// Two-atom frames at `time = first..first+count`, in a 10 A cubic box
fn write_xyz(path: &Path, first: usize, count: usize) {
    let mut text = String::new();
    for i in first..first + count {
        writeln!(text, "2").unwrap();
        writeln!(text, "time={i}.0 Lattice=\"10 0 0 0 10 0 0 0 10\"").unwrap();
        writeln!(text, "O {i} 0.0 0.0").unwrap();
        writeln!(text, "H {i} 2.0 0.0").unwrap();
    }
    std::fs::write(path, text).unwrap();
}

fn read_jsonl(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_options_file_to_summary_output() {
    let dir = tempfile::tempdir().unwrap();
    let part1 = dir.path().join("part1.xyz");
    let part2 = dir.path().join("part2.xyz");
    write_xyz(&part1, 0, 3);
    write_xyz(&part2, 3, 3);

    let out_a = dir.path().join("a.jsonl");
    let out_b = dir.path().join("b.jsonl");
    let dump = dir.path().join("input.json");
    let options_path = dir.path().join("run.toml");
    std::fs::write(
        &options_path,
        format!(
            r#"
buffer_size = 2
log_interval = 2
dump_input = {dump:?}

[trajectory]
files = ["system.pdb", {part1:?}, {part2:?}]
skip = 2
window_size_time = 1.5

[[consumers]]
name = "first"
kind = "summary"
[consumers.params]
path = {out_a:?}

[[consumers]]
name = "second"
kind = "summary"
[consumers.params]
path = {out_b:?}

[[consumers]]
name = "progress"
kind = "log"
[consumers.params]
every = "1"
"#,
            dump = dump.display().to_string(),
            part1 = part1.display().to_string(),
            part2 = part2.display().to_string(),
            out_a = out_a.display().to_string(),
            out_b = out_b.display().to_string(),
        ),
    )
    .unwrap();

    let options = ConfigLoader::load_from_path(&options_path).unwrap();
    let config = ConfigLoader::resolve(&options).unwrap();
    assert_eq!(config.trajectory_files.len(), 2);
    assert!(config.structure_file.is_some());

    let mut processor = TrajectoryProcessor::new(config, Arc::new(FormatOpener::new()));
    for consumer in &options.consumers {
        processor.add_consumer(create_consumer(consumer).unwrap());
    }
    let report = processor.run().unwrap();

    assert_eq!(report.reader.stop_reason, StopReason::EndOfData);
    assert_eq!(report.reader.files_opened, 2);
    assert_eq!(report.reader.frames_read, 6);
    assert_eq!(report.frames_dispatched, 3);
    assert!(report.is_success());

    let lines_a = read_jsonl(&out_a);
    let lines_b = read_jsonl(&out_b);
    assert_eq!(lines_a.len(), 4);
    // Frame records match; summaries differ only by consumer id
    assert_eq!(lines_a[..3], lines_b[..3]);
    assert_eq!(lines_b[3]["consumer"], 1);

    let frames: Vec<&Value> = lines_a.iter().filter(|l| l["type"] == "frame").collect();
    let absolute: Vec<u64> = frames
        .iter()
        .map(|f| f["absolute_frame"].as_u64().unwrap())
        .collect();
    assert_eq!(absolute, vec![0, 2, 4]);
    assert_eq!(frames[1]["absolute_time"], 2.0);
    assert_eq!(frames[1]["valid_frame"], 1);
    assert_eq!(frames[1]["atoms"], 2);
    assert_eq!(frames[1]["center"][1], 1.0);
    assert_eq!(frames[1]["box_volume"], 1000.0);
    assert_eq!(frames[1]["window_size_time"], 1.5);

    let summary = &lines_a[3];
    assert_eq!(summary["type"], "summary");
    assert_eq!(summary["frames"], 3);
    assert_eq!(summary["last_frame"], 4);
    assert_eq!(summary["elapsed_time"], 4.0);

    let dumped: Value = serde_json::from_str(&std::fs::read_to_string(&dump).unwrap()).unwrap();
    assert_eq!(dumped["bounds"]["skip"], 2);
    assert_eq!(dumped["buffer_size"], 2);
}

#[test]
fn test_truncated_xyz_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let traj = dir.path().join("broken.xyz");
    std::fs::write(&traj, "1\ntime=0\nAr 0 0 0\n2\ntime=1\nAr 1 0 0\n").unwrap();
    let out = dir.path().join("frames.jsonl");

    let options = ConfigLoader::load_from_str(
        &format!(
            r#"{{
                "trajectory": {{ "files": [{traj:?}] }},
                "consumers": [
                    {{ "name": "frames", "kind": "summary", "params": {{ "path": {out:?} }} }}
                ]
            }}"#,
            traj = traj.display().to_string(),
            out = out.display().to_string(),
        ),
        config_loader::ConfigFormat::Json,
    )
    .unwrap();
    let config = ConfigLoader::resolve(&options).unwrap();

    let mut processor = TrajectoryProcessor::new(config, Arc::new(FormatOpener::new()));
    processor.add_consumer(create_consumer(&options.consumers[0]).unwrap());
    let report = processor.run().unwrap();

    assert!(matches!(report.reader.stop_reason, StopReason::Failed(_)));
    let lines = read_jsonl(&out);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["absolute_frame"], 0);
    assert_eq!(lines[1]["type"], "summary");
}
