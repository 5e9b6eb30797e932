//! Hooks invoked by [`Trainer`](crate::Trainer) during training.
use crate::{Agent, Env};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A hook called by [`Trainer`](crate::Trainer) after every environment step.
pub trait Callback<E: Env> {
    /// Called once before the first environment step.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after each environment step.
    ///
    /// `n_calls` is the number of environment steps done so far, starting from 1.
    /// Returning `false` stops training.
    fn on_step(&mut self, n_calls: usize, agent: &dyn Agent<E>) -> Result<bool>;
}

/// A callback doing nothing.
#[derive(Debug, Default)]
pub struct NullCallback;

impl<E: Env> Callback<E> for NullCallback {
    fn on_step(&mut self, _n_calls: usize, _agent: &dyn Agent<E>) -> Result<bool> {
        Ok(true)
    }
}

/// Configuration of [`CheckpointCallback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointCallbackConfig {
    /// Interval of saving the agent in environment steps.
    pub check_freq: usize,

    /// Directory where checkpoints are written.
    pub save_path: PathBuf,
}

impl Default for CheckpointCallbackConfig {
    fn default() -> Self {
        Self {
            check_freq: 10000,
            save_path: PathBuf::from("./train/"),
        }
    }
}

impl CheckpointCallbackConfig {
    /// Sets the interval of saving in environment steps.
    pub fn check_freq(mut self, v: usize) -> Self {
        self.check_freq = v;
        self
    }

    /// Sets the checkpoint directory.
    pub fn save_path(mut self, v: impl Into<PathBuf>) -> Self {
        self.save_path = v.into();
        self
    }
}

/// Saves the agent periodically.
///
/// Every `check_freq` environment steps the agent is saved in
/// `save_path/best_model_{n_calls}`. The directory `save_path` is created in
/// [`Callback::init`].
#[derive(Debug)]
pub struct CheckpointCallback {
    check_freq: usize,
    save_path: PathBuf,
}

impl CheckpointCallback {
    /// Constructs the callback.
    pub fn build(config: &CheckpointCallbackConfig) -> Self {
        Self {
            check_freq: config.check_freq,
            save_path: config.save_path.clone(),
        }
    }

    /// Path of the checkpoint written at the given number of steps.
    pub fn checkpoint_path(&self, n_calls: usize) -> PathBuf {
        self.save_path.join(format!("best_model_{}", n_calls))
    }

    /// The checkpoint directory.
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }
}

impl<E: Env> Callback<E> for CheckpointCallback {
    fn init(&mut self) -> Result<()> {
        fs::create_dir_all(&self.save_path)?;
        Ok(())
    }

    fn on_step(&mut self, n_calls: usize, agent: &dyn Agent<E>) -> Result<bool> {
        if self.check_freq > 0 && n_calls % self.check_freq == 0 {
            let path = self.checkpoint_path(n_calls);
            agent.save_params(&path)?;
            info!("Saved the model in {:?}.", &path);
        }
        Ok(true)
    }
}
