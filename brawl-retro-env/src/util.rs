//! Utilities for tests and demos.
mod random_policy;
mod scripted;
pub use random_policy::RandomPolicy;
pub use scripted::{ScriptStep, ScriptedEmulator};
