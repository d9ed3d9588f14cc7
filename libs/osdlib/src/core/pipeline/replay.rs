// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::Deserialize;

use super::{EngineContext, MediaEngine, SourceLocator};
use crate::core::error::{Result, StreamError};
use crate::core::frames::{BatchMeta, FrameMeta, MediaBuffer};
use crate::core::lifecycle::PipelineState;
use crate::core::links::{CapabilityAnnouncement, InputSlot, LinkAttacher, ProducerHandle};
use crate::core::probe::ProbeReturn;

const DEFAULT_OUTPUT_CAPS: &str = "video/x-raw";

/// Optional first line of a replay file: the outputs the demuxing stage
/// announces, in order.
#[derive(Debug, Deserialize)]
struct ReplayHeader {
    outputs: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayRecord {
    Batch(BatchMeta),
    Frame(FrameMeta),
}

impl ReplayRecord {
    fn into_batch(self) -> BatchMeta {
        match self {
            Self::Batch(batch) => batch,
            Self::Frame(frame) => BatchMeta::single(frame),
        }
    }
}

/// Engine that replays recorded inference output from a JSON-lines file.
///
/// Each line is a frame (or `{"frames": [...]}` batch) as the inference
/// stage would have produced it. Annotated frames are written to the sink
/// file, one JSON object per line, when one is configured.
pub struct ReplayEngine {
    source: PathBuf,
    sink: Option<PathBuf>,
    frame_interval: Option<Duration>,
    stop_requested: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ReplayEngine {
    /// Fails when the source has no local path or cannot be opened.
    pub fn open(source: &SourceLocator) -> Result<Self> {
        let path = source.local_path().ok_or_else(|| {
            StreamError::Configuration(format!("Replay needs a local file, got {}", source))
        })?;
        File::open(path).map_err(|e| {
            StreamError::Pipeline(format!("Cannot open source {}: {}", path.display(), e))
        })?;

        Ok(Self {
            source: path.to_path_buf(),
            sink: None,
            frame_interval: None,
            stop_requested: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    pub fn with_sink(mut self, sink: impl Into<PathBuf>) -> Self {
        self.sink = Some(sink.into());
        self
    }

    /// Pace frames instead of replaying as fast as possible.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl MediaEngine for ReplayEngine {
    fn name(&self) -> &str {
        "replay"
    }

    fn attacher(&self) -> Arc<dyn LinkAttacher> {
        Arc::new(|producer: &ProducerHandle, slot: &InputSlot| -> Result<()> {
            tracing::debug!("[replay] {} -> {}", producer, slot);
            Ok(())
        })
    }

    fn start(&mut self, ctx: EngineContext) -> Result<()> {
        if self.worker.is_some() {
            return Err(StreamError::Pipeline("Replay engine already started".into()));
        }

        let source = File::open(&self.source).map_err(|e| {
            StreamError::Pipeline(format!("Cannot open source {}: {}", self.source.display(), e))
        })?;
        let sink = match &self.sink {
            Some(path) => Some(BufWriter::new(File::create(path).map_err(|e| {
                StreamError::Pipeline(format!("Cannot create sink {}: {}", path.display(), e))
            })?)),
            None => None,
        };

        self.stop_requested.store(false, Ordering::SeqCst);
        let session = ReplaySession {
            ctx,
            stop_requested: Arc::clone(&self.stop_requested),
            frame_interval: self.frame_interval,
            sink,
            last_frame: None,
        };

        let worker = std::thread::Builder::new()
            .name("replay-engine".into())
            .spawn(move || session.run(BufReader::new(source)))
            .map_err(StreamError::Io)?;
        self.worker = Some(worker);
        tracing::info!("[replay] streaming {}", self.source.display());
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stop_requested.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| StreamError::Pipeline("Replay worker panicked".into()))?;
            tracing::debug!("[replay] worker joined");
        }
        Ok(())
    }
}

impl Drop for ReplayEngine {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!("[replay] {}", e);
        }
    }
}

struct ReplaySession {
    ctx: EngineContext,
    stop_requested: Arc<AtomicBool>,
    frame_interval: Option<Duration>,
    sink: Option<BufWriter<File>>,
    last_frame: Option<u64>,
}

impl ReplaySession {
    fn run(mut self, reader: impl BufRead) {
        let lifecycle = &self.ctx.lifecycle;
        lifecycle.state_changed(PipelineState::Null, PipelineState::Ready);

        let mut lines = reader.lines().enumerate().peekable();
        let header = match lines.peek() {
            Some((_, Ok(first))) => serde_json::from_str::<ReplayHeader>(first).ok(),
            _ => None,
        };
        let outputs = match header {
            Some(header) => {
                lines.next();
                header.outputs
            }
            None => vec![DEFAULT_OUTPUT_CAPS.to_string()],
        };

        lifecycle.state_changed(PipelineState::Ready, PipelineState::Paused);
        if !self.announce_outputs(&outputs) {
            return;
        }
        self.ctx
            .lifecycle
            .state_changed(PipelineState::Paused, PipelineState::Playing);

        for (index, line) in lines {
            if self.stop_requested.load(Ordering::SeqCst) {
                tracing::debug!("[replay] stop requested at line {}", index + 1);
                return;
            }
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.ctx
                        .lifecycle
                        .error("Failed to read source", Some(format!("line {}: {}", index + 1, e)));
                    return;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let record = match serde_json::from_str::<ReplayRecord>(&line) {
                Ok(record) => record,
                Err(e) => {
                    self.ctx
                        .lifecycle
                        .warning(format!("Skipping malformed record on line {}: {}", index + 1, e));
                    continue;
                }
            };
            if let Err(e) = self.push_batch(record.into_batch()) {
                self.ctx.lifecycle.error("Failed to write sink", Some(e.to_string()));
                return;
            }
            if let Some(interval) = self.frame_interval {
                std::thread::sleep(interval);
            }
        }

        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.flush() {
                self.ctx.lifecycle.error("Failed to flush sink", Some(e.to_string()));
                return;
            }
        }
        self.ctx.lifecycle.end_of_stream();
    }

    /// Announce every recorded output, then close the set. Posts an error and
    /// returns `false` when nothing got linked.
    fn announce_outputs(&self, outputs: &[String]) -> bool {
        let linker = &self.ctx.linker;
        for (i, caps) in outputs.iter().enumerate() {
            let producer = format!("{}.src_{}", linker.upstream(), i);
            let announcement = CapabilityAnnouncement::new(producer, caps.as_str());
            match linker.announce(&announcement) {
                Ok(outcome) => tracing::debug!("[replay] {} -> {:?}", caps, outcome),
                Err(e) if e.is_recoverable() => {
                    self.ctx.lifecycle.warning(e.to_string());
                }
                Err(e) => {
                    self.ctx
                        .lifecycle
                        .error("Dynamic link failed", Some(e.to_string()));
                    return false;
                }
            }
        }

        let unlinked = linker.no_more_outputs();
        if !linker.any_linked() {
            let slots: Vec<String> = unlinked.iter().map(ToString::to_string).collect();
            self.ctx.lifecycle.error(
                "Internal data stream error",
                Some(format!("no compatible output for {}", slots.join(", "))),
            );
            return false;
        }
        true
    }

    fn push_batch(&mut self, mut batch: BatchMeta) -> std::io::Result<()> {
        for frame in &mut batch.frames {
            if let Some(last) = self.last_frame.filter(|last| frame.frame_number <= *last) {
                self.ctx.lifecycle.warning(format!(
                    "Frame number {} does not follow {}",
                    frame.frame_number, last
                ));
            }
            self.last_frame = Some(frame.frame_number);
            if frame.width == 0 || frame.height == 0 {
                frame.width = self.ctx.muxer.width;
                frame.height = self.ctx.muxer.height;
            }
        }

        let mut buffer = MediaBuffer::with_batch(batch);
        buffer.pts = buffer
            .batch
            .as_ref()
            .and_then(|b| b.frames.first())
            .and_then(|f| f.pts);
        if self.ctx.probe.dispatch(Some(&mut buffer)) == ProbeReturn::Drop {
            return Ok(());
        }

        if let (Some(sink), Some(batch)) = (self.sink.as_mut(), buffer.batch.as_ref()) {
            for frame in &batch.frames {
                serde_json::to_writer(&mut *sink, frame)?;
                sink.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_fails() {
        let err = ReplayEngine::open(&SourceLocator::parse("/nonexistent/clip.jsonl"))
            .err()
            .unwrap();
        assert!(matches!(err, StreamError::Pipeline(_)));
    }

    #[test]
    fn test_open_remote_uri_fails() {
        let err = ReplayEngine::open(&SourceLocator::parse("rtsp://camera.local/stream"))
            .err()
            .unwrap();
        assert!(matches!(err, StreamError::Configuration(_)));
    }

    #[test]
    fn test_record_forms() {
        let frame: ReplayRecord =
            serde_json::from_str(r#"{"frame_number": 3, "objects": []}"#).unwrap();
        assert_eq!(frame.into_batch().len(), 1);

        let batch: ReplayRecord = serde_json::from_str(
            r#"{"frames": [{"frame_number": 1}, {"frame_number": 2}]}"#,
        )
        .unwrap();
        assert_eq!(batch.into_batch().len(), 2);
    }
}
