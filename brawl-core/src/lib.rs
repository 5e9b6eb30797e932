#![warn(missing_docs)]
//! Core components for training agents on fighting games.
//!
//! The crate defines the contract between an environment and whatever drives it
//! ([`Env`], [`Step`], [`Space`]), the contract of an external learner ([`Policy`],
//! [`Agent`]), and the glue that runs them: [`DefaultEvaluator`], [`Trainer`]
//! with a [`CheckpointCallback`], and a hyperparameter [`tuner::Study`].
//!
//! Concrete environments live in other crates. `brawl-retro-env` provides the
//! adapter over a retro-style emulator.
pub mod error;
pub mod record;
pub mod space;
pub mod tuner;
pub mod util;

mod base;
pub use base::{Act, Agent, Env, Info, Obs, Policy, Step};

mod callback;
pub use callback::{Callback, CheckpointCallback, CheckpointCallbackConfig, NullCallback};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

#[cfg(test)]
mod dummy;

mod monitor;
pub use monitor::Monitor;

mod trainer;
pub use trainer::{Trainer, TrainerConfig};

pub use space::Space;
