//! Environment.
use super::{Act, Info, Obs, Step};
use crate::{record::Record, Space};
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// An environment is driven through [`Env::reset`] and [`Env::step`]. [`Env::reset`]
/// must be called before the first step and again after a step reports the end
/// of an episode. After [`Env::close`] the environment is unusable.
///
/// The spaces returned by [`Env::observation_space`] and [`Env::action_space`]
/// are fixed when the environment is built.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns its initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Resets the environment with a given index.
    ///
    /// The index is used in an arbitrary way, for example as a random seed of the
    /// episode. [`DefaultEvaluator`](crate::DefaultEvaluator) calls this method with
    /// the episode index. The default implementation ignores the index.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        let _ = ix;
        self.reset()
    }

    /// Performes an environment step.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Performes an environment step and resets the environment if the episode ends.
    ///
    /// The initial observation of the next episode is put in [`Step::init_obs`].
    fn step_with_reset(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized,
    {
        let (mut step, record) = self.step(a)?;
        if step.is_done() {
            step.init_obs = Some(self.reset()?);
        }
        Ok((step, record))
    }

    /// Renders the current state. Best effort, does nothing by default.
    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    /// Releases resources held by the environment.
    fn close(&mut self) -> Result<()>;

    /// Space of observations returned by [`Env::reset`] and [`Env::step`].
    fn observation_space(&self) -> &Space;

    /// Space of actions accepted by [`Env::step`].
    fn action_space(&self) -> &Space;
}
