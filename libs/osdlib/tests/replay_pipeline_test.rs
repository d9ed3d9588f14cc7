// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Full sessions driven by the replay engine.

use std::fs;
use std::io::Write;
use std::sync::Arc;

use tempfile::{NamedTempFile, TempDir};

use osdlib::core::frames::OverlayOrigin;

use osdlib::{
    ClassId, EdgeState, FrameMeta, InputSlot, LoopExit, MediaEngine, OsdConfig, Pipeline,
    PipelineTopology, ReplayEngine, SourceLocator, stop_signal,
};

fn replay_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

fn run_session(source: &NamedTempFile, sink: &std::path::Path) -> (Pipeline, LoopExit) {
    let locator = SourceLocator::parse(source.path().to_str().unwrap());
    let mut engine = ReplayEngine::open(&locator).unwrap().with_sink(sink);
    let pipeline = Pipeline::new(
        Arc::new(OsdConfig::default()),
        PipelineTopology::for_source(&locator),
        engine.attacher(),
    )
    .unwrap();
    let (_stop_handle, stop) = stop_signal();
    let exit = pipeline.run(&mut engine, &stop).unwrap();
    (pipeline, exit)
}

fn read_frames(sink: &std::path::Path) -> Vec<FrameMeta> {
    fs::read_to_string(sink)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_replay_annotates_every_frame() {
    let source = replay_file(&[
        r#"{"outputs": ["audio/mpeg", "video/x-h264, stream-format=(string)avc"]}"#,
        r#"{"frame_number": 0, "objects": [{"object_id": 1, "class_id": 0, "bounding_box": {"left": 10, "top": 10, "width": 40, "height": 30}}]}"#,
        "",
        r#"{"frame_number": 1, "objects": [{"object_id": 2, "class_id": 2, "bounding_box": {"left": 5, "top": 5, "width": 20, "height": 60}}, {"object_id": 3, "class_id": 99, "bounding_box": {"left": 0, "top": 0, "width": 1, "height": 1}}]}"#,
        "not json",
    ]);
    let dir = TempDir::new().unwrap();
    let sink = dir.path().join("annotated.jsonl");

    let (pipeline, exit) = run_session(&source, &sink);

    assert_eq!(exit, LoopExit::EndOfStream);
    assert_eq!(
        pipeline.linker().state(&InputSlot::parse("h264-parser.sink")),
        Some(EdgeState::Linked)
    );

    let frames = read_frames(&sink);
    assert_eq!(frames.len(), 2);
    assert_eq!((frames[0].width, frames[0].height), (1920, 1080));
    assert!(
        frames[0]
            .overlays_from(OverlayOrigin::Summary)
            .next()
            .and_then(|item| item.as_text())
            .unwrap()
            .starts_with("Frame Number=0 Number of Objects=1 Vehicle_count=1 Person_count=0")
    );

    let counts = frames[1].class_counts.as_ref().unwrap();
    assert_eq!(counts.get(ClassId(2)), Some(1));
    assert_eq!(counts.other(), 1);

    let stats = pipeline.probe_stats().unwrap();
    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.handler_errors, 1);
}

#[test]
fn test_replay_without_video_output_errors() {
    let source = replay_file(&[
        r#"{"outputs": ["audio/mpeg"]}"#,
        r#"{"frame_number": 0}"#,
    ]);
    let dir = TempDir::new().unwrap();
    let sink = dir.path().join("annotated.jsonl");

    let (pipeline, exit) = run_session(&source, &sink);

    assert!(matches!(exit, LoopExit::Error(_)));
    assert_eq!(exit.exit_code(), 1);
    assert!(!pipeline.linker().any_linked());
    assert_eq!(pipeline.probe_stats().unwrap().dispatched, 0);
}

#[test]
fn test_replay_without_header_uses_raw_video() {
    let source = replay_file(&[r#"{"frames": [{"frame_number": 5}, {"frame_number": 6}]}"#]);
    let dir = TempDir::new().unwrap();
    let sink = dir.path().join("annotated.jsonl");

    let (_pipeline, exit) = run_session(&source, &sink);

    assert_eq!(exit, LoopExit::EndOfStream);
    let frames = read_frames(&sink);
    assert_eq!(
        frames.iter().map(|f| f.frame_number).collect::<Vec<_>>(),
        vec![5, 6]
    );
}
