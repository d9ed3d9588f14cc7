// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Runtime completion of graph edges whose media type is only known once
//! the upstream stage starts parsing its input.

mod attacher;
mod capability;
mod dynamic_linker;
mod edge_state;
mod endpoints;

pub use attacher::LinkAttacher;
pub use capability::{Capability, CapabilityAnnouncement};
pub use dynamic_linker::{AnnounceOutcome, DynamicLinker, EdgeSnapshot};
pub use edge_state::EdgeState;
pub use endpoints::{InputSlot, ProducerHandle};
