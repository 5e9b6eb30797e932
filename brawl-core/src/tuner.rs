//! Hyperparameter search.
//!
//! A [`Study`] runs a number of trials. In each trial a [`ParamSampler`] suggests
//! [`PpoParams`] from a [`PpoParamSpace`], and a user-supplied objective trains and
//! evaluates an agent with them. The sampling strategy is pluggable; only the
//! [`RandomSampler`] baseline ships with this crate.
//!
//! Objectives report failures as errors. A failed trial is recorded as
//! [`TrialState::Failed`] and never competes with completed trials, so an
//! infrastructure failure is not mistaken for a poorly performing policy.
//!
//! ```no_run
//! use brawl_core::tuner::{RandomSampler, Study, StudyConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = StudyConfig::default().n_trials(10).opt_dir("./opt/");
//! let mut study = Study::new(config, RandomSampler::new(42));
//! study.optimize(|trial| {
//!     // Train an agent with trial.params, save it in trial.save_path and
//!     // return the mean evaluation reward.
//!     Ok(trial.params.gamma as f32)
//! })?;
//! println!("{:?}", study.best_params());
//! # Ok(())
//! # }
//! ```
mod params;
mod sampler;
mod study;
pub use params::{FloatRange, IntRange, PpoParamSpace, PpoParams};
pub use sampler::{ParamSampler, RandomSampler};
pub use study::{Direction, Study, StudyConfig, Trial, TrialRecord, TrialState};
