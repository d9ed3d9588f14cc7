// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::SourceLocator;
use crate::core::links::InputSlot;
use crate::core::probe::ProbePoint;

/// One external stage: instance name plus the engine factory that builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSpec {
    pub name: String,
    pub factory: String,
    /// Outputs appear only at runtime and are resolved by the dynamic linker.
    pub dynamic_outputs: bool,
}

impl StageSpec {
    fn fixed(name: &str, factory: &str) -> Self {
        Self {
            name: name.to_string(),
            factory: factory.to_string(),
            dynamic_outputs: false,
        }
    }

    fn dynamic(name: &str, factory: &str) -> Self {
        Self {
            dynamic_outputs: true,
            ..Self::fixed(name, factory)
        }
    }
}

/// Stage chain for a source, the edge completed at runtime and the point
/// where the annotator is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTopology {
    pub stages: Vec<StageSpec>,
    /// Downstream slot fed by the stage with dynamic outputs.
    pub dynamic_slot: InputSlot,
    pub probe_point: ProbePoint,
    pub live: bool,
}

impl PipelineTopology {
    /// Container files are demuxed and re-encoded to a file; URIs go through
    /// a decoding bin and are rendered.
    pub fn for_source(source: &SourceLocator) -> Self {
        match source {
            SourceLocator::File(_) => Self {
                stages: vec![
                    StageSpec::fixed("file-source", "filesrc"),
                    StageSpec::dynamic("qt-demux", "qtdemux"),
                    StageSpec::fixed("h264-parser", "h264parse"),
                    StageSpec::fixed("nvv4l2-decoder", "nvv4l2decoder"),
                    StageSpec::fixed("stream-muxer", "nvstreammux"),
                    StageSpec::fixed("primary-inference", "nvinfer"),
                    StageSpec::fixed("convertor", "nvvideoconvert"),
                    StageSpec::fixed("onscreendisplay", "nvdsosd"),
                    StageSpec::fixed("h264-encoder", "nvv4l2h264enc"),
                    StageSpec::fixed("h264-parse-out", "h264parse"),
                    StageSpec::fixed("mp4-mux", "mp4mux"),
                    StageSpec::fixed("file-sink", "filesink"),
                ],
                dynamic_slot: InputSlot::new("h264-parser", "sink"),
                probe_point: ProbePoint::RenderInput,
                live: false,
            },
            SourceLocator::Uri(_) => Self {
                stages: vec![
                    StageSpec::dynamic("uri-decode-bin", "uridecodebin"),
                    StageSpec::fixed("stream-muxer", "nvstreammux"),
                    StageSpec::fixed("primary-inference", "nvinfer"),
                    StageSpec::fixed("converter", "nvvideoconvert"),
                    StageSpec::fixed("onscreendisplay", "nvdsosd"),
                    StageSpec::fixed("nvvideo-renderer", "nveglglessink"),
                ],
                dynamic_slot: InputSlot::new("stream-muxer", "sink_0"),
                probe_point: ProbePoint::InferenceOutput,
                live: source.is_live(),
            },
        }
    }

    /// The stage whose outputs are announced at runtime.
    pub fn demuxer(&self) -> Option<&StageSpec> {
        self.stages.iter().find(|stage| stage.dynamic_outputs)
    }

    /// `filesrc ! qtdemux ~ h264parse ! ...`, with `~` marking the runtime edge.
    pub fn describe(&self) -> String {
        let mut text = String::new();
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                let prev = &self.stages[i - 1];
                text.push_str(if prev.dynamic_outputs { " ~ " } else { " ! " });
            }
            text.push_str(&stage.factory);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_topology() {
        let topology = PipelineTopology::for_source(&SourceLocator::parse("clip.mp4"));
        assert_eq!(topology.demuxer().unwrap().factory, "qtdemux");
        assert_eq!(topology.dynamic_slot.to_string(), "h264-parser.sink");
        assert_eq!(topology.probe_point, ProbePoint::RenderInput);
        assert!(topology.describe().starts_with("filesrc ! qtdemux ~ h264parse ! "));
    }

    #[test]
    fn test_uri_topology() {
        let topology =
            PipelineTopology::for_source(&SourceLocator::parse("rtsp://camera.local/stream"));
        assert_eq!(topology.demuxer().unwrap().name, "uri-decode-bin");
        assert_eq!(topology.dynamic_slot, InputSlot::new("stream-muxer", "sink_0"));
        assert_eq!(topology.probe_point, ProbePoint::InferenceOutput);
        assert!(topology.live);
    }
}
