//! Scenario runner
//!
//! Executes an ordered plan of API scenarios against one authenticated
//! session. Every scenario is asserted on its own; a failure is recorded and
//! the run moves on to the next scenario.

mod config;
mod runner;
pub mod suite;

pub use config::*;
pub use runner::{
    check_expectation, evaluate, execute_scenario, run, run_plan, Outcome, RunContext,
    RunOptions, ScenarioError, ScenarioResult, SuiteReport,
};
