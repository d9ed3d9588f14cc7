// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Lifecycle delivery from an engine thread to the controlling loop.

use std::thread;
use std::time::Duration;

use osdlib::{
    LifecycleEvent, LoopExit, PipelineState, lifecycle_channel, run_lifecycle_loop, stop_signal,
};

#[test]
fn test_events_delivered_in_order_until_end_of_stream() {
    let (tx, rx) = lifecycle_channel();
    let (_stop_handle, stop) = stop_signal();

    let producer = thread::spawn(move || {
        tx.state_changed(PipelineState::Null, PipelineState::Ready);
        tx.state_changed(PipelineState::Ready, PipelineState::Playing);
        tx.warning("Late buffer");
        tx.end_of_stream();
    });

    let mut seen = Vec::new();
    let exit = run_lifecycle_loop(&rx, &stop, |event| seen.push(event.clone()));
    producer.join().unwrap();

    assert_eq!(exit, LoopExit::EndOfStream);
    assert_eq!(exit.exit_code(), 0);
    assert_eq!(seen.len(), 4);
    assert!(matches!(
        seen[1],
        LifecycleEvent::StateChanged {
            to: PipelineState::Playing,
            ..
        }
    ));
    assert!(matches!(seen[3], LifecycleEvent::EndOfStream { .. }));
}

#[test]
fn test_error_ends_loop_before_later_events() {
    let (tx, rx) = lifecycle_channel();
    let (_stop_handle, stop) = stop_signal();

    tx.error("Internal data stream error", Some("not-negotiated".into()));
    tx.end_of_stream();

    let mut seen = 0;
    let exit = run_lifecycle_loop(&rx, &stop, |_| seen += 1);

    assert_eq!(exit, LoopExit::Error("Internal data stream error".into()));
    assert_eq!(exit.exit_code(), 1);
    assert_eq!(seen, 1);
    assert_eq!(rx.pending(), 1);
}

#[test]
fn test_stop_from_another_thread() {
    let (tx, rx) = lifecycle_channel();
    let (stop_handle, stop) = stop_signal();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        stop_handle.stop();
    });

    let exit = run_lifecycle_loop(&rx, &stop, |_| {});
    stopper.join().unwrap();

    assert_eq!(exit, LoopExit::Stopped);
    assert_eq!(exit.exit_code(), 0);
    drop(tx);
}

#[test]
fn test_producer_gone_without_end_of_stream() {
    let (tx, rx) = lifecycle_channel();
    let (_stop_handle, stop) = stop_signal();

    tx.state_changed(PipelineState::Null, PipelineState::Ready);
    drop(tx);

    let exit = run_lifecycle_loop(&rx, &stop, |_| {});
    assert_eq!(exit, LoopExit::Disconnected);
    assert_eq!(exit.exit_code(), 1);
}
