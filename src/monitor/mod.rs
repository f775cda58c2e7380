//! Monitor layer: detecting public address changes and announcing them.
//!
//! This module provides:
//! - The polling loop ([`PollingController`]) and its inputs ([`PollOptions`])
//! - Per-cycle results ([`CycleOutcome`]) and carried state ([`ControllerState`])

mod controller;


pub use controller::{ControllerState, CycleOutcome, PollOptions, PollingController};
