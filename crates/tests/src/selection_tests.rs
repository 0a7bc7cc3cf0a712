//! Frame selection through the full pipeline

use std::path::PathBuf;
use std::sync::Arc;

use contracts::{FrameBounds, PipelineConfig, TimeOverride, WindowSize};
use ingestion::{MockOpener, MockTrajectory, StopReason};
use processor::TrajectoryProcessor;
use rand::Rng;

use crate::support::{single_file, single_file_config, Recorder};

#[test]
fn test_stride_over_five_frames() {
    let config = single_file_config().with_bounds(FrameBounds {
        skip: Some(2),
        ..Default::default()
    });
    let (recorder, recording) = Recorder::new("stride");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(single_file(5)));
    processor.add_consumer(Box::new(recorder));
    let report = processor.run().unwrap();

    let rec = recording.lock().unwrap();
    assert_eq!(rec.absolute_frames(), vec![0, 2, 4]);
    assert_eq!(rec.valid_frames(), vec![0, 1, 2]);
    assert_eq!(report.reader.frames_read, 5);
    assert_eq!(report.reader.stop_reason, StopReason::EndOfData);

    let last = rec.teardown.unwrap().unwrap();
    assert_eq!(last.first_frame, 0);
    assert_eq!(last.last_frame, 4);
    assert_eq!(last.elapsed_time(), 4.0);
}

#[test]
fn test_last_time_stops_before_later_files() {
    let config = PipelineConfig::new(vec!["a.xyz".into(), "b.xyz".into()]).with_bounds(
        FrameBounds {
            last_time: Some(2.5),
            ..Default::default()
        },
    );
    let opener = MockOpener::new()
        .with("a.xyz", MockTrajectory::uniform(5, 0.0, 1.0))
        .with("b.xyz", MockTrajectory::uniform(5, 5.0, 1.0));
    let watcher = opener.clone();
    let (recorder, recording) = Recorder::new("cutoff");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(opener));
    processor.add_consumer(Box::new(recorder));
    let report = processor.run().unwrap();

    let times: Vec<f64> = recording
        .lock()
        .unwrap()
        .metas
        .iter()
        .map(|m| m.absolute_time)
        .collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0]);
    assert_eq!(report.reader.stop_reason, StopReason::EndOfInterval { frame: 3 });
    assert_eq!(report.reader.files_opened, 1);
    assert_eq!(watcher.opened(), vec![PathBuf::from("a.xyz")]);
}

#[test]
fn test_frame_range_ten_to_nineteen() {
    let config = single_file_config().with_bounds(FrameBounds {
        first_frame: Some(10),
        last_frame: Some(19),
        ..Default::default()
    });
    let (recorder, recording) = Recorder::new("range");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(single_file(30)));
    processor.add_consumer(Box::new(recorder));
    let report = processor.run().unwrap();

    let rec = recording.lock().unwrap();
    assert_eq!(rec.absolute_frames(), (10..=19).collect::<Vec<u64>>());
    assert_eq!(rec.valid_frames(), (0..10).collect::<Vec<u64>>());
    assert!(rec.metas.iter().all(|m| m.first_frame == 10));
    assert_eq!(report.reader.stop_reason, StopReason::EndOfInterval { frame: 20 });
    assert_eq!(report.reader.frames_read, 21);
}

#[test]
fn test_range_across_file_boundary() {
    let config = PipelineConfig::new(vec!["a.xyz".into(), "b.xyz".into()]).with_bounds(
        FrameBounds {
            first_frame: Some(3),
            last_frame: Some(6),
            ..Default::default()
        },
    );
    let opener = MockOpener::new()
        .with("a.xyz", MockTrajectory::uniform(5, 0.0, 1.0))
        .with("b.xyz", MockTrajectory::uniform(5, 5.0, 1.0));
    let (recorder, recording) = Recorder::new("boundary");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(opener));
    processor.add_consumer(Box::new(recorder));
    processor.run().unwrap();

    assert_eq!(recording.lock().unwrap().absolute_frames(), vec![3, 4, 5, 6]);
}

#[test]
fn test_time_override_and_window_reach_consumers() {
    let mut config = single_file_config()
        .with_time_override(TimeOverride { start: 100.0, dt: 0.5 })
        .with_bounds(FrameBounds {
            first_time: Some(101.0),
            ..Default::default()
        });
    config.window = WindowSize {
        frames: Some(8),
        time: None,
    };
    // Source times are ignored once overridden
    let opener = MockOpener::new().with("a.xyz", MockTrajectory::new(vec![7.0; 4]));
    let (recorder, recording) = Recorder::new("override");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(opener));
    processor.add_consumer(Box::new(recorder));
    processor.run().unwrap();

    let rec = recording.lock().unwrap();
    let times: Vec<f64> = rec.metas.iter().map(|m| m.absolute_time).collect();
    assert_eq!(times, vec![101.0, 101.5]);
    assert_eq!(rec.absolute_frames(), vec![2, 3]);
    assert!(rec.metas.iter().all(|m| m.window_size_frames == Some(8)));
    assert!(rec.metas.iter().all(|m| m.window_size_time.is_none()));
}

/// Reference selection over `frames` frames with `t = frame`
fn expected_selection(frames: u64, bounds: &FrameBounds) -> Vec<u64> {
    let mut selected = Vec::new();
    for fr in 0..frames {
        let t = fr as f64;
        if bounds.last_frame.is_some_and(|l| fr > l) || bounds.last_time.is_some_and(|l| t > l) {
            break;
        }
        let after_first = bounds.first_frame.is_none_or(|f| fr >= f)
            && bounds.first_time.is_none_or(|f| t >= f);
        if after_first && bounds.skip.is_none_or(|s| fr % s == 0) {
            selected.push(fr);
        }
    }
    selected
}

#[test]
fn test_random_bounds_match_reference_selection() {
    let mut rng = rand::rng();

    for _ in 0..25 {
        let frames: u64 = rng.random_range(1..60);
        let first = rng.random_bool(0.5).then(|| rng.random_range(0..frames));
        let last = rng
            .random_bool(0.5)
            .then(|| first.unwrap_or(0) + rng.random_range(0..frames));
        let bounds = FrameBounds {
            first_frame: first,
            last_frame: last,
            first_time: rng.random_bool(0.3).then(|| rng.random_range(0.0..frames as f64)),
            last_time: None,
            skip: rng.random_bool(0.7).then(|| rng.random_range(1..7)),
        };

        let config = single_file_config()
            .with_bounds(bounds)
            .with_buffer_size(rng.random_range(1..5));
        let (recorder, recording) = Recorder::new("random");

        let mut processor =
            TrajectoryProcessor::new(config, Arc::new(single_file(frames as usize)));
        processor.add_consumer(Box::new(recorder));
        processor.run().unwrap();

        let rec = recording.lock().unwrap();
        let expected = expected_selection(frames, &bounds);
        assert_eq!(rec.absolute_frames(), expected, "bounds {bounds:?}, frames {frames}");
        assert_eq!(
            rec.valid_frames(),
            (0..expected.len() as u64).collect::<Vec<_>>()
        );
    }
}
