// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod label_set;
mod osd_config;

pub use label_set::{Label, LabelSet};
pub use osd_config::{
    ClassColor, LinkerConfig, LiveSource, MuxerConfig, ObjectStyleConfig, OsdConfig,
    SummaryConfig,
};
