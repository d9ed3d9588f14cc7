// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{ProbeDispatcher, ProbePoint};
use crate::core::{Result, StreamError};

/// At most one dispatcher per probe point.
#[derive(Debug, Default)]
pub struct ProbeRegistry {
    dispatchers: RwLock<HashMap<ProbePoint, Arc<ProbeDispatcher>>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, dispatcher: ProbeDispatcher) -> Result<Arc<ProbeDispatcher>> {
        let point = dispatcher.point();
        let mut dispatchers = self.dispatchers.write();
        if let Some(existing) = dispatchers.get(&point) {
            return Err(StreamError::Configuration(format!(
                "probe point {} already has handler '{}'",
                point,
                existing.handler_name()
            )));
        }
        let dispatcher = Arc::new(dispatcher);
        dispatchers.insert(point, Arc::clone(&dispatcher));
        tracing::debug!("Registered '{}' at {}", dispatcher.handler_name(), point);
        Ok(dispatcher)
    }

    pub fn get(&self, point: ProbePoint) -> Option<Arc<ProbeDispatcher>> {
        self.dispatchers.read().get(&point).cloned()
    }
}
