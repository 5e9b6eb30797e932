//! Train [`Agent`].
mod config;
use crate::{
    record::{
        Record,
        RecordValue::{Scalar, String as Text},
        Recorder,
    },
    Agent, Callback, Env, Evaluator,
};
use anyhow::Result;
pub use config::TrainerConfig;
use csv::Writer;
use log::{info, warn};
use serde::Serialize;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    time::SystemTime,
};

/// A row of `monitor.csv`.
#[derive(Debug, Serialize)]
struct EpisodeRow {
    env_steps: usize,
    episode_return: f32,
    episode_length: usize,
}

impl EpisodeRow {
    /// Reads the episode statistics put in a step record by [`Monitor`](crate::Monitor).
    fn from_record(env_steps: usize, record: &Record) -> Option<Self> {
        Some(Self {
            env_steps,
            episode_return: record.get_scalar("episode_return").ok()?,
            episode_length: record.get_scalar("episode_length").ok()? as usize,
        })
    }
}

/// Manages the training loop.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`], a [`Recorder`], an [`Evaluator`] and
///    a [`Callback`].
/// 1. Build [`Env`] and call [`Callback::init`].
/// 2. Reset [`Env`].
/// 3. Sample an action from the agent, do an environment step with
///    [`Env::step_with_reset`] and hand the transition to [`Agent::observe`].
///    The agent optimizes its parameters whenever it decides to.
/// 4. `env_steps += 1`, then call [`Callback::on_step`]. Training stops if it
///    returns `false`.
/// 5. If `env_steps % eval_interval == 0`, evaluate the agent. If the result
///    is the best so far, the agent is saved in `(model_dir)/best`.
/// 6. Write records every `record_interval` steps.
/// 7. Back to step 3 until `env_steps == max_env_steps`, then close [`Env`].
///
/// If `log_dir` is set, the statistics of every episode reported by
/// [`Monitor`](crate::Monitor) are appended to `(log_dir)/monitor.csv`.
pub struct Trainer<E: Env> {
    /// Configuration of the environment for training.
    env_config_train: E::Config,

    /// The number of environment steps of training.
    max_env_steps: usize,

    /// Interval of evaluation in environment steps.
    eval_interval: usize,

    /// Interval of writing records in environment steps.
    record_interval: usize,

    /// Interval of flushing records in environment steps.
    flush_record_interval: usize,

    /// Where to save the best model.
    model_dir: Option<String>,

    /// Where to write episode statistics.
    log_dir: Option<String>,
}

impl<E: Env> Trainer<E> {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig, env_config_train: E::Config) -> Self {
        Self {
            env_config_train,
            max_env_steps: config.max_env_steps,
            eval_interval: config.eval_interval,
            record_interval: config.record_interval.max(1),
            flush_record_interval: config.flush_record_interval.max(1),
            model_dir: config.model_dir,
            log_dir: config.log_dir,
        }
    }

    fn save_best_model<A: Agent<E>>(agent: &A, model_dir: &str) -> Result<PathBuf> {
        let path = Path::new(model_dir).join("best");
        agent.save_params(&path)?;
        info!("Saved the best model in {:?}.", &path);
        Ok(path)
    }

    fn episode_writer(&self) -> Result<Option<Writer<File>>> {
        match self.log_dir.as_ref() {
            Some(log_dir) => {
                fs::create_dir_all(log_dir)?;
                let path = Path::new(log_dir).join("monitor.csv");
                info!("Episode statistics are written in {:?}", &path);
                Ok(Some(Writer::from_path(path)?))
            }
            None => Ok(None),
        }
    }

    /// Train the agent.
    pub fn train<A, D, C>(
        &mut self,
        agent: &mut A,
        recorder: &mut dyn Recorder,
        evaluator: &mut D,
        callback: &mut C,
    ) -> Result<()>
    where
        A: Agent<E>,
        D: Evaluator<E>,
        C: Callback<E> + ?Sized,
    {
        let mut env = E::build(&self.env_config_train, 0)?;
        let mut episode_writer = self.episode_writer()?;
        callback.init()?;
        agent.train();

        let mut obs = env.reset()?;
        let mut max_eval_reward = f32::MIN;
        let mut env_steps: usize = 0;
        let mut episodes: usize = 0;
        let timer = SystemTime::now();

        while env_steps < self.max_env_steps {
            let act = agent.sample(&obs);
            let (step, mut record) = env.step_with_reset(&act)?;
            env_steps += 1;

            if let Some(record_agent) = agent.observe(&obs, &step)? {
                record.merge_inplace(record_agent);
            }

            let is_done = step.is_done();
            obs = match (is_done, step.init_obs) {
                (true, Some(init_obs)) => init_obs,
                (true, None) => env.reset()?,
                (false, _) => step.obs,
            };
            if is_done {
                episodes += 1;
            }

            if let Some(wtr) = episode_writer.as_mut() {
                if let Some(row) = EpisodeRow::from_record(env_steps, &record) {
                    wtr.serialize(row)?;
                }
            }

            if !callback.on_step(env_steps, &*agent)? {
                info!("Training stopped by the callback at {} steps", env_steps);
                break;
            }

            if self.eval_interval > 0 && env_steps % self.eval_interval == 0 {
                info!("Starts evaluation of the trained model");
                agent.eval();
                let eval_record = evaluator.evaluate(agent)?;
                agent.train();
                let eval_reward = eval_record.get_scalar("Episode return")?;
                info!("Evaluation at {} steps, return = {}", env_steps, eval_reward);
                record.insert("eval_reward", Scalar(eval_reward));

                if eval_reward > max_eval_reward {
                    max_eval_reward = eval_reward;
                    match self.model_dir.as_ref() {
                        Some(model_dir) => {
                            let path = Self::save_best_model(agent, model_dir)?;
                            record.insert("best_model", Text(path.to_string_lossy().into()));
                        }
                        None => warn!("model_dir is not set, the best model is not saved"),
                    }
                }
            }

            if env_steps % self.record_interval == 0 || !record.is_empty() {
                let elapsed = timer.elapsed()?.as_secs_f32();
                if elapsed > 0.0 {
                    record.insert("fps", Scalar(env_steps as f32 / elapsed));
                }
                record.insert("env_steps", Scalar(env_steps as f32));
                record.insert("episodes", Scalar(episodes as f32));
                recorder.write(record);
            }

            if env_steps % self.flush_record_interval == 0 {
                recorder.flush();
                if let Some(wtr) = episode_writer.as_mut() {
                    wtr.flush()?;
                }
            }
        }

        recorder.flush();
        if let Some(wtr) = episode_writer.as_mut() {
            wtr.flush()?;
        }
        env.close()?;
        info!(
            "Finished training: {} env steps, {} episodes",
            env_steps, episodes
        );
        Ok(())
    }
}
