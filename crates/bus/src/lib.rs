// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous publish/subscribe topics.
//!
//! This crate decouples test-group declaration from test execution: groups
//! announce themselves on a topic, a runner listens, and results are
//! published back out without either side knowing about the other.

mod bus;
mod error;

pub use bus::{
    panic_message, EventBus, PublishReport, SubscriberFailure, Topic, WeakEventBus,
};
pub use error::{BusError, SubscriberError};
