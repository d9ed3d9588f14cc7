// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{ProbeHandler, ProbePoint, ProbeReturn};
use crate::core::StreamError;
use crate::core::frames::MediaBuffer;

/// Counters for one probe point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    /// Buffers the handler was invoked on.
    pub dispatched: u64,
    pub passed: u64,
    pub dropped: u64,
    /// Handler failures (the buffers still passed).
    pub handler_errors: u64,
    /// Buffers that arrived without batch metadata.
    pub missing_buffers: u64,
}

#[derive(Default)]
struct Counters {
    dispatched: AtomicU64,
    passed: AtomicU64,
    dropped: AtomicU64,
    handler_errors: AtomicU64,
    missing_buffers: AtomicU64,
}

/// Invokes one handler on every buffer crossing one probe point.
///
/// `dispatch` runs on the caller's thread and takes `&self`, so the engine may
/// deliver buffers from several workers at once. Handler failures never
/// block the data path.
pub struct ProbeDispatcher {
    point: ProbePoint,
    handler: Arc<dyn ProbeHandler>,
    counters: Counters,
}

impl ProbeDispatcher {
    pub fn new(point: ProbePoint, handler: Arc<dyn ProbeHandler>) -> Self {
        Self {
            point,
            handler,
            counters: Counters::default(),
        }
    }

    pub fn point(&self) -> ProbePoint {
        self.point
    }

    pub fn handler_name(&self) -> &str {
        self.handler.name()
    }

    /// Run the handler on `buffer` and decide whether it continues.
    ///
    /// A missing buffer, or one without batch metadata, is passed through
    /// without invoking the handler.
    pub fn dispatch(&self, buffer: Option<&mut MediaBuffer>) -> ProbeReturn {
        let Some(batch) = buffer.and_then(|b| b.batch.as_mut()) else {
            self.counters.missing_buffers.fetch_add(1, Ordering::Relaxed);
            self.counters.passed.fetch_add(1, Ordering::Relaxed);
            let err = StreamError::MissingBuffer(self.point.to_string());
            tracing::warn!("{}", err);
            return ProbeReturn::Continue;
        };

        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
        match self.handler.on_batch(batch) {
            Ok(ProbeReturn::Continue) => {
                self.counters.passed.fetch_add(1, Ordering::Relaxed);
                ProbeReturn::Continue
            }
            Ok(ProbeReturn::Drop) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("[{}] {} dropped buffer", self.point, self.handler.name());
                ProbeReturn::Drop
            }
            Err(e) => {
                self.counters.handler_errors.fetch_add(1, Ordering::Relaxed);
                self.counters.passed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("[{}] {} failed: {}", self.point, self.handler.name(), e);
                ProbeReturn::Continue
            }
        }
    }

    pub fn stats(&self) -> ProbeStats {
        ProbeStats {
            dispatched: self.counters.dispatched.load(Ordering::Relaxed),
            passed: self.counters.passed.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            handler_errors: self.counters.handler_errors.load(Ordering::Relaxed),
            missing_buffers: self.counters.missing_buffers.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for ProbeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeDispatcher")
            .field("point", &self.point)
            .field("handler", &self.handler.name())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frames::{BatchMeta, FrameMeta};
    use crate::core::probe::probe_fn;
    use std::sync::atomic::AtomicUsize;

    fn buffer(frame_number: u64) -> MediaBuffer {
        MediaBuffer::with_batch(BatchMeta::single(FrameMeta::new(frame_number, Vec::new())))
    }

    #[test]
    fn test_missing_buffer_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let dispatcher = ProbeDispatcher::new(
            ProbePoint::RenderInput,
            Arc::new(probe_fn("count", move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(ProbeReturn::Continue)
            })),
        );

        assert_eq!(dispatcher.dispatch(None), ProbeReturn::Continue);
        assert_eq!(
            dispatcher.dispatch(Some(&mut MediaBuffer::empty())),
            ProbeReturn::Continue
        );

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let stats = dispatcher.stats();
        assert_eq!(stats.missing_buffers, 2);
        assert_eq!(stats.dispatched, 0);
    }

    #[test]
    fn test_drop_disposition() {
        let dispatcher = ProbeDispatcher::new(
            ProbePoint::InferenceOutput,
            Arc::new(probe_fn("odd-frames", |batch: &mut BatchMeta| {
                if batch.frames[0].frame_number % 2 == 1 {
                    Ok(ProbeReturn::Drop)
                } else {
                    Ok(ProbeReturn::Continue)
                }
            })),
        );

        assert_eq!(dispatcher.dispatch(Some(&mut buffer(1))), ProbeReturn::Drop);
        assert_eq!(dispatcher.dispatch(Some(&mut buffer(2))), ProbeReturn::Continue);
        let stats = dispatcher.stats();
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.dispatched, 2);
    }

    #[test]
    fn test_handler_error_keeps_buffer_flowing() {
        let dispatcher = ProbeDispatcher::new(
            ProbePoint::RenderInput,
            Arc::new(probe_fn("failing", |batch: &mut BatchMeta| {
                batch.frames[0].source_id = 9;
                Err(StreamError::Pipeline("boom".into()))
            })),
        );

        let mut buf = buffer(1);
        assert_eq!(dispatcher.dispatch(Some(&mut buf)), ProbeReturn::Continue);
        assert_eq!(buf.batch.unwrap().frames[0].source_id, 9);
        assert_eq!(dispatcher.stats().handler_errors, 1);
    }

    #[test]
    fn test_concurrent_dispatch() {
        let dispatcher = Arc::new(ProbeDispatcher::new(
            ProbePoint::RenderInput,
            Arc::new(probe_fn("noop", |_| Ok(ProbeReturn::Continue))),
        ));

        let workers: Vec<_> = (0..4)
            .map(|w| {
                let d = Arc::clone(&dispatcher);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        d.dispatch(Some(&mut buffer(w * 100 + i)));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(dispatcher.stats().dispatched, 400);
        assert_eq!(dispatcher.stats().passed, 400);
    }
}
