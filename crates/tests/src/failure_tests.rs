//! Failure propagation: I/O errors, consumer errors and panics

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use contracts::{Consumer, ContractError, FrameMetadata, PipelineConfig, RawFrame};
use ingestion::{MockOpener, MockTrajectory, StopReason};
use processor::TrajectoryProcessor;

use crate::support::{single_file_config, Recorder};

#[test]
fn test_read_failure_delivers_prior_frames_then_stops() {
    let opener = MockOpener::new().with("a.xyz", MockTrajectory::uniform(10, 0.0, 1.0).failing_at(4));
    let (a, rec_a) = Recorder::new("a");
    let (b, rec_b) = Recorder::new("b");

    let mut processor = TrajectoryProcessor::new(single_file_config(), Arc::new(opener));
    processor.add_consumer(Box::new(a));
    processor.add_consumer(Box::new(b));
    let report = processor.run().unwrap();

    for rec in [&rec_a, &rec_b] {
        let rec = rec.lock().unwrap();
        assert_eq!(rec.absolute_frames(), vec![0, 1, 2, 3]);
        // Teardown ran, so the stop was delivered
        assert_eq!(rec.teardown.unwrap().unwrap().absolute_frame, 3);
    }
    match &report.reader.stop_reason {
        StopReason::Failed(message) => assert!(message.contains("injected read failure")),
        other => panic!("unexpected stop reason {other:?}"),
    }
    assert!(report.reader.is_failure());
    assert!(!report.is_success());
}

#[test]
fn test_missing_second_file_fails_after_first() {
    let config = PipelineConfig::new(vec!["a.xyz".into(), "missing.xyz".into()]);
    let opener = MockOpener::new().with("a.xyz", MockTrajectory::uniform(3, 0.0, 1.0));
    let watcher = opener.clone();
    let (recorder, recording) = Recorder::new("open");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(opener));
    processor.add_consumer(Box::new(recorder));
    let report = processor.run().unwrap();

    assert_eq!(recording.lock().unwrap().absolute_frames(), vec![0, 1, 2]);
    assert!(matches!(report.reader.stop_reason, StopReason::Failed(_)));
    assert_eq!(report.reader.files_opened, 1);
    assert_eq!(
        watcher.opened(),
        vec![PathBuf::from("a.xyz"), PathBuf::from("missing.xyz")]
    );
}

/// Fails on every odd valid frame
struct Flaky;

impl Consumer for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    fn process(&mut self, _frame: &RawFrame, meta: &FrameMetadata) -> Result<(), ContractError> {
        if meta.valid_frame % 2 == 1 {
            return Err(ContractError::consumer_process("flaky", meta.absolute_frame, "odd frame"));
        }
        Ok(())
    }

    fn teardown(&mut self, _last: Option<&FrameMetadata>) -> Result<(), ContractError> {
        Err(ContractError::consumer_teardown("flaky", "nothing to write"))
    }
}

#[test]
fn test_process_errors_are_counted_not_fatal() {
    let opener = MockOpener::new().with("a.xyz", MockTrajectory::uniform(6, 0.0, 1.0));
    let mut processor = TrajectoryProcessor::new(single_file_config(), Arc::new(opener));
    processor.add_consumer(Box::new(Flaky));
    let report = processor.run().unwrap();

    let flaky = &report.consumers[0];
    assert_eq!(flaky.frames_received(), 6);
    assert_eq!(flaky.process_failures, 3);
    assert!(flaky.teardown_error.is_some());
    assert_eq!(report.reader.stop_reason, StopReason::EndOfData);
}

#[test]
fn test_consumer_panic_resurfaces_after_join() {
    let opener = MockOpener::new().with("a.xyz", MockTrajectory::uniform(20, 0.0, 1.0));
    let (steady, rec_steady) = Recorder::new("steady");
    let (crashing, _) = Recorder::new("crashing");

    let mut processor = TrajectoryProcessor::new(
        single_file_config().with_buffer_size(2),
        Arc::new(opener),
    );
    processor.add_consumer(Box::new(steady));
    processor.add_consumer(Box::new(crashing.panicking_at(5)));

    let result = panic::catch_unwind(AssertUnwindSafe(move || processor.run()));
    assert!(result.is_err());

    // The surviving consumer was driven to completion before the panic resurfaced
    let rec = rec_steady.lock().unwrap();
    assert_eq!(rec.absolute_frames(), (0..20).collect::<Vec<u64>>());
    assert!(rec.teardown.is_some());
}

#[test]
fn test_single_consumer_panic_resurfaces() {
    let opener = MockOpener::new().with("a.xyz", MockTrajectory::uniform(100, 0.0, 1.0));
    let (crashing, _) = Recorder::new("crashing");

    let mut processor = TrajectoryProcessor::new(
        single_file_config().with_buffer_size(1),
        Arc::new(opener),
    );
    processor.add_consumer(Box::new(crashing.panicking_at(0)));

    let result = panic::catch_unwind(AssertUnwindSafe(move || processor.run()));
    assert!(result.is_err());
}
