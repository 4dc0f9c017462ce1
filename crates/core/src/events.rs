// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Payloads exchanged over the spec bus.

use crate::describe::Describe;
use crate::runner::{RunOptions, RunReport};
use spectacle_bus::EventBus;

pub const NEW_TEST_GROUP: &str = "new test group";
pub const RUN_REQUESTED: &str = "run requested";
pub const RUN_RESULTS: &str = "run results";
pub const TEST_GROUP_RESULTS: &str = "test group results";

#[derive(Clone, Debug)]
pub enum SpecEvent {
    /// A root group was declared
    NewTestGroup(Describe),
    /// Run every registered group
    RunRequested(RunOptions),
    /// A runner finished
    RunResults(RunReport),
    /// A root group finished; its rendered report
    TestGroupResults(Vec<String>),
}

impl SpecEvent {
    /// The topic this payload belongs on
    pub fn topic(&self) -> &'static str {
        match self {
            Self::NewTestGroup(_) => NEW_TEST_GROUP,
            Self::RunRequested(_) => RUN_REQUESTED,
            Self::RunResults(_) => RUN_RESULTS,
            Self::TestGroupResults(_) => TEST_GROUP_RESULTS,
        }
    }
}

pub type SpecBus = EventBus<SpecEvent>;

/// Publish an event on its own topic
pub fn emit(bus: &SpecBus, event: SpecEvent) -> Result<spectacle_bus::PublishReport, spectacle_bus::BusError> {
    let topic = event.topic();
    bus.publish(topic, event)
}
