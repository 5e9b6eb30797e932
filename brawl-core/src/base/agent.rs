//! Agent.
use super::{Env, Policy, Step};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
///
/// The learning algorithm itself (PPO, for instance) lives behind this trait.
/// [`Trainer`](crate::Trainer) only hands transitions to the agent and asks it to
/// save or load its parameters.
pub trait Agent<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Consumes a transition from `obs` through `step`.
    ///
    /// The agent decides when to perform an optimization step, e.g. when its
    /// rollout buffer is full. It returns a record if an optimization step was done.
    fn observe(&mut self, obs: &E::Obs, step: &Step<E>) -> Result<Option<Record>>;

    /// Save the parameters of the agent in the given directory.
    ///
    /// The files written there are opaque to this crate.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
