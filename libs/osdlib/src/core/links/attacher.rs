// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::{InputSlot, ProducerHandle};
use crate::core::Result;

/// The engine-side call that physically connects a producer to an input slot.
pub trait LinkAttacher: Send + Sync {
    fn attach(&self, producer: &ProducerHandle, slot: &InputSlot) -> Result<()>;
}

impl<F> LinkAttacher for F
where
    F: Fn(&ProducerHandle, &InputSlot) -> Result<()> + Send + Sync,
{
    fn attach(&self, producer: &ProducerHandle, slot: &InputSlot) -> Result<()> {
        self(producer, slot)
    }
}
