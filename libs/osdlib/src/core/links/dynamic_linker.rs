// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::{Mutex, RwLock};

use super::{Capability, CapabilityAnnouncement, EdgeState, InputSlot, LinkAttacher, ProducerHandle};
use crate::core::{Result, StreamError};

/// Result of an announcement that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnounceOutcome {
    /// The announcement completed the edge to this slot.
    Linked(InputSlot),
    /// No requested edge accepts this capability; the output stays unlinked.
    Ignored,
}

/// Point-in-time view of one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSnapshot {
    pub id: String,
    pub slot: InputSlot,
    pub expected_family: String,
    pub state: EdgeState,
    pub producer: Option<ProducerHandle>,
}

struct Edge {
    id: String,
    slot: InputSlot,
    expected_family: String,
    state: AtomicU8,
    producer: Mutex<Option<ProducerHandle>>,
}

impl Edge {
    fn state(&self) -> EdgeState {
        EdgeState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Compare-and-set; only one caller can move an edge out of `from`.
    fn transition(&self, from: EdgeState, to: EdgeState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn set(&self, to: EdgeState) {
        self.state.store(to as u8, Ordering::Release);
    }

    fn snapshot(&self) -> EdgeSnapshot {
        let state = self.state();
        EdgeSnapshot {
            id: self.id.clone(),
            slot: self.slot.clone(),
            expected_family: self.expected_family.clone(),
            state,
            producer: self.producer.lock().clone(),
        }
    }
}

/// Resolves the outputs of a demultiplexing stage onto requested input slots
/// as their capabilities become known.
///
/// Edges are requested before the stream starts. Each announcement is routed
/// to the first edge, in request order, whose expected family matches and
/// which is still awaiting. Announcements may arrive from several threads;
/// every edge transition is a compare-and-set, so only the first matching
/// announcement per edge wins.
pub struct DynamicLinker {
    upstream: String,
    attacher: Arc<dyn LinkAttacher>,
    edges: RwLock<Vec<Arc<Edge>>>,
}

impl DynamicLinker {
    pub fn new(upstream: impl Into<String>, attacher: Arc<dyn LinkAttacher>) -> Self {
        Self {
            upstream: upstream.into(),
            attacher,
            edges: RwLock::new(Vec::new()),
        }
    }

    /// Name of the upstream stage whose outputs this linker resolves.
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// Request an edge into `slot` for outputs of `expected_family`
    /// (e.g. `"video"`). Returns the edge id.
    pub fn request_edge(&self, slot: InputSlot, expected_family: impl Into<String>) -> Result<String> {
        let mut edges = self.edges.write();
        if edges.iter().any(|edge| edge.slot == slot) {
            return Err(StreamError::Configuration(format!(
                "input slot {} already requested",
                slot
            )));
        }
        let id = cuid2::create_id();
        let expected_family = expected_family.into();
        tracing::debug!(
            "[{}] awaiting {} output for {} (edge {})",
            self.upstream,
            expected_family,
            slot,
            id
        );
        edges.push(Arc::new(Edge {
            id: id.clone(),
            slot,
            expected_family,
            state: AtomicU8::new(EdgeState::AwaitingCapability as u8),
            producer: Mutex::new(None),
        }));
        Ok(id)
    }

    /// Handle a capability announcement from the upstream stage.
    ///
    /// Non-matching announcements are ignored. A matching announcement for
    /// edges that are all already linked fails with
    /// [`StreamError::DuplicateLink`] and leaves the edges untouched. If
    /// attaching fails the edge moves to `LinkFailed`.
    pub fn announce(&self, announcement: &CapabilityAnnouncement) -> Result<AnnounceOutcome> {
        let caps = match Capability::parse(&announcement.caps) {
            Ok(caps) => caps,
            Err(e) => {
                tracing::warn!(
                    "[{}] ignoring output {}: {}",
                    self.upstream,
                    announcement.producer,
                    e
                );
                return Ok(AnnounceOutcome::Ignored);
            }
        };

        let candidates: Vec<Arc<Edge>> = self
            .edges
            .read()
            .iter()
            .filter(|edge| caps.matches_family(&edge.expected_family))
            .cloned()
            .collect();

        if candidates.is_empty() {
            tracing::info!(
                "[{}] output {} is {}, not requested; ignoring",
                self.upstream,
                announcement.producer,
                caps.media_type()
            );
            return Ok(AnnounceOutcome::Ignored);
        }

        for edge in &candidates {
            if edge.transition(EdgeState::AwaitingCapability, EdgeState::Resolving) {
                return self.complete(edge, &announcement.producer, &caps);
            }
        }

        // Every matching edge is past AwaitingCapability.
        if let Some(edge) = candidates
            .iter()
            .find(|edge| matches!(edge.state(), EdgeState::Linked | EdgeState::Resolving))
        {
            let linked_to = edge
                .producer
                .lock()
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            let err = StreamError::DuplicateLink {
                slot: edge.slot.to_string(),
                linked_to,
                announced: announcement.producer.to_string(),
            };
            tracing::warn!("[{}] {}", self.upstream, err);
            return Err(err);
        }

        let edge = &candidates[0];
        Err(StreamError::LinkFailed {
            slot: edge.slot.to_string(),
            reason: format!(
                "edge already failed; late output {} not attached",
                announcement.producer
            ),
        })
    }

    fn complete(
        &self,
        edge: &Edge,
        producer: &ProducerHandle,
        caps: &Capability,
    ) -> Result<AnnounceOutcome> {
        *edge.producer.lock() = Some(producer.clone());

        match self.attacher.attach(producer, &edge.slot) {
            Ok(()) => {
                edge.set(EdgeState::Linked);
                tracing::info!(
                    "[{}] linked {} ({}) to {}",
                    self.upstream,
                    producer,
                    caps.media_type(),
                    edge.slot
                );
                Ok(AnnounceOutcome::Linked(edge.slot.clone()))
            }
            Err(e) => {
                edge.set(EdgeState::LinkFailed);
                let err = StreamError::LinkFailed {
                    slot: edge.slot.to_string(),
                    reason: format!("attaching {} failed: {}", producer, e),
                };
                tracing::warn!("[{}] {}", self.upstream, err);
                Err(err)
            }
        }
    }

    /// The upstream stage will announce no further outputs. Every edge still
    /// awaiting a capability fails; the failed slots are returned.
    pub fn no_more_outputs(&self) -> Vec<InputSlot> {
        let edges = self.edges.read();
        let mut failed = Vec::new();
        for edge in edges.iter() {
            if edge.transition(EdgeState::AwaitingCapability, EdgeState::LinkFailed) {
                tracing::warn!(
                    "[{}] no {} output ever appeared for {}; edge carries no data",
                    self.upstream,
                    edge.expected_family,
                    edge.slot
                );
                failed.push(edge.slot.clone());
            }
        }
        failed
    }

    pub fn state(&self, slot: &InputSlot) -> Option<EdgeState> {
        self.edges
            .read()
            .iter()
            .find(|edge| &edge.slot == slot)
            .map(|edge| edge.state())
    }

    /// The producer attached to `slot`, once linked.
    pub fn linked_producer(&self, slot: &InputSlot) -> Option<ProducerHandle> {
        self.edges
            .read()
            .iter()
            .find(|edge| &edge.slot == slot && edge.state() == EdgeState::Linked)
            .and_then(|edge| edge.producer.lock().clone())
    }

    pub fn edges(&self) -> Vec<EdgeSnapshot> {
        self.edges.read().iter().map(|edge| edge.snapshot()).collect()
    }

    pub fn any_linked(&self) -> bool {
        self.edges
            .read()
            .iter()
            .any(|edge| edge.state() == EdgeState::Linked)
    }
}

impl std::fmt::Debug for DynamicLinker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLinker")
            .field("upstream", &self.upstream)
            .field("edges", &self.edges())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn linker() -> (DynamicLinker, Arc<Mutex<Vec<(String, String)>>>) {
        let attached = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&attached);
        let attacher = move |producer: &ProducerHandle, slot: &InputSlot| -> Result<()> {
            log.lock().push((producer.to_string(), slot.to_string()));
            Ok(())
        };
        (DynamicLinker::new("qt-demux", Arc::new(attacher)), attached)
    }

    fn slot() -> InputSlot {
        InputSlot::new("h264-parser", "sink")
    }

    #[test]
    fn test_non_matching_then_matching() {
        let (linker, attached) = linker();
        linker.request_edge(slot(), "video").unwrap();

        let audio = CapabilityAnnouncement::new("audio_0", "audio/mpeg, mpegversion=4");
        assert_eq!(linker.announce(&audio).unwrap(), AnnounceOutcome::Ignored);
        assert_eq!(linker.state(&slot()), Some(EdgeState::AwaitingCapability));

        let video = CapabilityAnnouncement::new("video_0", "video/x-h264, stream-format=avc");
        assert_eq!(
            linker.announce(&video).unwrap(),
            AnnounceOutcome::Linked(slot())
        );
        assert_eq!(linker.state(&slot()), Some(EdgeState::Linked));
        assert_eq!(
            linker.linked_producer(&slot()),
            Some(ProducerHandle::new("video_0"))
        );
        assert_eq!(
            attached.lock().as_slice(),
            &[("video_0".to_string(), "h264-parser.sink".to_string())]
        );
    }

    #[test]
    fn test_duplicate_link_rejected() {
        let (linker, attached) = linker();
        linker.request_edge(slot(), "video").unwrap();

        linker
            .announce(&CapabilityAnnouncement::new("video_0", "video/x-h264"))
            .unwrap();
        let err = linker
            .announce(&CapabilityAnnouncement::new("video_1", "video/x-h265"))
            .unwrap_err();

        match err {
            StreamError::DuplicateLink {
                linked_to,
                announced,
                ..
            } => {
                assert_eq!(linked_to, "video_0");
                assert_eq!(announced, "video_1");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(linker.state(&slot()), Some(EdgeState::Linked));
        assert_eq!(
            linker.linked_producer(&slot()),
            Some(ProducerHandle::new("video_0"))
        );
        assert_eq!(attached.lock().len(), 1);
    }

    #[test]
    fn test_no_more_outputs_fails_awaiting_edge() {
        let (linker, _) = linker();
        linker.request_edge(slot(), "video").unwrap();
        linker
            .announce(&CapabilityAnnouncement::new("audio_0", "audio/x-raw"))
            .unwrap();

        assert_eq!(linker.no_more_outputs(), vec![slot()]);
        assert_eq!(linker.state(&slot()), Some(EdgeState::LinkFailed));
        assert!(linker.no_more_outputs().is_empty());
        assert!(!linker.any_linked());
    }

    #[test]
    fn test_attach_failure_fails_edge() {
        let attacher = |_: &ProducerHandle, _: &InputSlot| -> Result<()> {
            Err(StreamError::Pipeline("pads incompatible".into()))
        };
        let linker = DynamicLinker::new("decodebin", Arc::new(attacher));
        linker.request_edge(slot(), "video").unwrap();

        let err = linker
            .announce(&CapabilityAnnouncement::new("src_0", "video/x-raw"))
            .unwrap_err();
        assert!(matches!(err, StreamError::LinkFailed { .. }));
        assert_eq!(linker.state(&slot()), Some(EdgeState::LinkFailed));
        assert_eq!(linker.linked_producer(&slot()), None);
    }

    #[test]
    fn test_announcements_fill_slots_in_request_order() {
        let (linker, _) = linker();
        let first = InputSlot::new("stream-muxer", "sink_0");
        let second = InputSlot::new("stream-muxer", "sink_1");
        linker.request_edge(first.clone(), "video").unwrap();
        linker.request_edge(second.clone(), "video").unwrap();

        assert_eq!(
            linker
                .announce(&CapabilityAnnouncement::new("src_0", "video/x-raw"))
                .unwrap(),
            AnnounceOutcome::Linked(first)
        );
        assert_eq!(
            linker
                .announce(&CapabilityAnnouncement::new("src_1", "video/x-raw"))
                .unwrap(),
            AnnounceOutcome::Linked(second)
        );
    }

    #[test]
    fn test_duplicate_slot_request() {
        let (linker, _) = linker();
        linker.request_edge(slot(), "video").unwrap();
        assert!(linker.request_edge(slot(), "audio").is_err());
    }

    #[test]
    fn test_concurrent_announcements_single_winner() {
        let attaches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attaches);
        let attacher = move |_: &ProducerHandle, _: &InputSlot| -> Result<()> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };
        let linker = Arc::new(DynamicLinker::new("decodebin", Arc::new(attacher)));
        linker.request_edge(slot(), "video").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let linker = Arc::clone(&linker);
                std::thread::spawn(move || {
                    linker
                        .announce(&CapabilityAnnouncement::new(format!("src_{i}"), "video/x-raw"))
                        .is_ok()
                })
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(wins, 1);
        assert_eq!(attaches.load(Ordering::SeqCst), 1);
        assert_eq!(linker.state(&slot()), Some(EdgeState::Linked));
    }
}
