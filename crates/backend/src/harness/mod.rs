//! Lightweight test harness.
//!
//! A [`TestCase`] goes through `setup → run → teardown` under [`execute`],
//! which maps any run error onto a terminal [`TestStatus`] by its code.
//! [`TestRunner`] executes cases in order, each under a time budget, and
//! aggregates a [`RunSummary`]. [`ProcessorValidation`] is the built-in
//! end-to-end suite over a [`crate::Processor`].

mod case;
mod runner;
mod status;
mod validation;

pub use case::{CaseError, TestCase, TestReport, execute, execute_within};
pub use runner::{RunReport, RunSummary, TestRunner};
pub use status::TestStatus;
pub use validation::ProcessorValidation;
