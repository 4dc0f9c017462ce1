// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! BDD-style test declaration and execution.
//!
//! Declare nested groups with [`describe`] and [`Describe::describe`], add
//! tests with [`Describe::it`], share state with `let` and `before`
//! definitions, and run everything through a [`Runner`] attached to a
//! [`SpecBus`].
//!
//! ```
//! use spectacle_core::{Comparison, Describe, RunOptions, Value};
//!
//! let group = Describe::new("arithmetic");
//! group.let_value("two", 2);
//! group
//!     .it("adds")
//!     .expect(|scope| Value::from(1).add(&scope.get("two")?))
//!     .to(Comparison::eq(3));
//!
//! let lines = group.run(RunOptions::muted()).unwrap();
//! assert_eq!(lines, vec!["arithmetic: ok"]);
//! ```

pub mod comparison;
pub mod describe;
pub mod error;
pub mod events;
pub mod raised;
pub mod report;
pub mod runner;
pub mod scope;
pub mod stats;
pub mod test_case;
pub mod time;
pub mod value;

pub use comparison::{Comparison, Outcome, Strategy};
pub use describe::{describe, Describe, Phase};
pub use error::{SpecError, UnknownStrategy};
pub use events::{
    SpecBus, SpecEvent, NEW_TEST_GROUP, RUN_REQUESTED, RUN_RESULTS, TEST_GROUP_RESULTS,
};
pub use raised::{set_backtrace_capture, ErrorKind, Raised};
pub use report::{LineKind, ReportLine};
pub use runner::{RunOptions, RunReport, Runner};
pub use scope::{Producer, Scope};
pub use stats::{Stats, StatsSnapshot};
pub use test_case::{Polarity, Test, TestResult, NEGATED_PASS_MESSAGE};
pub use time::{Clock, ClockHandle, FakeClock, SystemClock};
pub use value::{Function, Object, Value, ValueType};
