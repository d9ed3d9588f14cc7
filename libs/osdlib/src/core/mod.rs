// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod annotate;
pub mod config;
pub mod error;
pub mod frames;
pub mod lifecycle;
pub mod links;
pub mod logging;
pub mod pipeline;
pub mod probe;

pub use error::*;
