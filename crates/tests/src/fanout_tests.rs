//! Fan-out ordering, sharing and backpressure

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ingestion::{channel, MockOpener, MockTrajectory, ReaderTask};
use processor::TrajectoryProcessor;

use crate::support::{single_file, single_file_config, Recorder};

#[test]
fn test_two_consumers_capacity_one() {
    let config = single_file_config().with_buffer_size(1);
    let (a, rec_a) = Recorder::new("a");
    let (b, rec_b) = Recorder::new("b");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(single_file(3)));
    processor.add_consumer(Box::new(a));
    processor.add_consumer(Box::new(b));
    let report = processor.run().unwrap();

    let (rec_a, rec_b) = (rec_a.lock().unwrap(), rec_b.lock().unwrap());
    assert_eq!(rec_a.absolute_frames(), vec![0, 1, 2]);
    assert_eq!(rec_b.absolute_frames(), vec![0, 1, 2]);
    assert_eq!(rec_a.setup_id, Some(0));
    assert_eq!(rec_b.setup_id, Some(1));

    // Both consumers see the same payload, not copies
    assert_eq!(rec_a.payloads, rec_b.payloads);

    for rec in [&rec_a, &rec_b] {
        let last = rec.teardown.unwrap().unwrap();
        assert_eq!(last.absolute_frame, 2);
    }
    assert_eq!(report.frames_dispatched, 3);
    assert!(report.is_success());
}

#[test]
fn test_slow_consumer_paces_the_others() {
    let config = single_file_config().with_buffer_size(2);
    let (fast, rec_fast) = Recorder::new("fast");
    let (slow, rec_slow) = Recorder::new("slow");
    let slow = slow.with_delay(Duration::from_millis(2));

    let mut processor = TrajectoryProcessor::new(config, Arc::new(single_file(25)));
    processor.add_consumer(Box::new(fast));
    processor.add_consumer(Box::new(slow));
    let report = processor.run().unwrap();

    let expected: Vec<u64> = (0..25).collect();
    assert_eq!(rec_fast.lock().unwrap().absolute_frames(), expected);
    assert_eq!(rec_slow.lock().unwrap().absolute_frames(), expected);
    assert_eq!(report.consumers[1].frames_processed, 25);
}

#[test]
fn test_capacity_one_slow_single_consumer_loses_nothing() {
    const FRAMES: usize = 30;
    let config = single_file_config().with_buffer_size(1);
    let (slow, recording) = Recorder::new("slow");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(single_file(FRAMES)));
    processor.add_consumer(Box::new(slow.with_delay(Duration::from_millis(2))));
    let report = processor.run().unwrap();

    let expected: Vec<u64> = (0..FRAMES as u64).collect();
    let rec = recording.lock().unwrap();
    assert_eq!(rec.absolute_frames(), expected);
    assert_eq!(rec.valid_frames(), expected);
    assert_eq!(report.reader.frames_accepted, FRAMES as u64);
    assert_eq!(report.frames_dispatched, FRAMES as u64);
}

#[test]
fn test_capacity_one_slow_consumer_in_fan_out_loses_nothing() {
    const FRAMES: usize = 30;
    let config = single_file_config().with_buffer_size(1);
    let (fast, rec_fast) = Recorder::new("fast");
    let (slow, rec_slow) = Recorder::new("slow");

    let mut processor = TrajectoryProcessor::new(config, Arc::new(single_file(FRAMES)));
    processor.add_consumer(Box::new(fast));
    processor.add_consumer(Box::new(slow.with_delay(Duration::from_millis(2))));
    let report = processor.run().unwrap();

    let expected: Vec<u64> = (0..FRAMES as u64).collect();
    for rec in [&rec_fast, &rec_slow] {
        let rec = rec.lock().unwrap();
        assert_eq!(rec.absolute_frames(), expected);
        assert_eq!(rec.valid_frames(), expected);
    }
    assert_eq!(report.reader.frames_accepted, FRAMES as u64);
    assert_eq!(report.frames_dispatched, FRAMES as u64);
    assert!(report.consumers.iter().all(|c| c.frames_processed == FRAMES as u64));
}

#[test]
fn test_reader_never_runs_ahead_of_capacity() {
    const CAPACITY: usize = 3;
    const FRAMES: usize = 40;

    let config = single_file_config().with_buffer_size(CAPACITY);
    let opener = MockOpener::new().with("a.xyz", MockTrajectory::uniform(FRAMES, 0.0, 1.0));
    let (tx, rx) = channel("primary", CAPACITY);
    let task = ReaderTask::new(&config, Arc::new(opener), tx);
    let metrics = task.metrics();
    let reader = task.spawn().unwrap();

    let mut received = 0u64;
    while let Some(frame) = rx.receive() {
        received += 1;
        assert_eq!(frame.meta().valid_frame + 1, received);
        // Accepted frames are either received or still buffered
        let accepted = metrics.snapshot().frames_accepted;
        assert!(
            accepted <= received + CAPACITY as u64,
            "accepted {accepted} with only {received} received"
        );
        thread::sleep(Duration::from_millis(1));
    }

    let outcome = reader.join().unwrap();
    assert_eq!(outcome.frames_accepted, FRAMES as u64);
    assert_eq!(received, FRAMES as u64);
}

#[test]
fn test_many_consumers_same_order() {
    let config = single_file_config().with_buffer_size(4);
    let mut recordings = Vec::new();

    let mut processor = TrajectoryProcessor::new(config, Arc::new(single_file(50)));
    for i in 0..5 {
        let (recorder, recording) = Recorder::new(&format!("c{i}"));
        assert_eq!(processor.add_consumer(Box::new(recorder)), i);
        recordings.push(recording);
    }
    let report = processor.run().unwrap();

    let expected: Vec<u64> = (0..50).collect();
    for recording in &recordings {
        assert_eq!(recording.lock().unwrap().absolute_frames(), expected);
    }
    let ids: Vec<usize> = report.consumers.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}
