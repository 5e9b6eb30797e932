//! Study: a sequence of trials.
use super::{ParamSampler, PpoParamSpace, PpoParams};
use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Whether the objective is maximized or minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Larger is better.
    Maximize,

    /// Smaller is better.
    Minimize,
}

/// Configuration of [`Study`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// The number of trials.
    pub n_trials: usize,

    /// Direction of optimization.
    pub direction: Direction,

    /// Directory where trials save their models.
    pub opt_dir: PathBuf,

    /// Search space.
    pub space: PpoParamSpace,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            n_trials: 10,
            direction: Direction::Maximize,
            opt_dir: PathBuf::from("./opt/"),
            space: PpoParamSpace::default(),
        }
    }
}

impl StudyConfig {
    /// Sets the number of trials.
    pub fn n_trials(mut self, v: usize) -> Self {
        self.n_trials = v;
        self
    }

    /// Sets the direction of optimization.
    pub fn direction(mut self, v: Direction) -> Self {
        self.direction = v;
        self
    }

    /// Sets the directory of trial models.
    pub fn opt_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.opt_dir = v.into();
        self
    }

    /// Sets the search space.
    pub fn space(mut self, v: PpoParamSpace) -> Self {
        self.space = v;
        self
    }

    /// Constructs [`StudyConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        Ok(serde_yaml::from_reader(rdr)?)
    }

    /// Saves [`StudyConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// A trial handed to the objective.
#[derive(Debug, Clone)]
pub struct Trial {
    /// Index of the trial in the study, starting from 0.
    pub number: usize,

    /// Suggested parameters.
    pub params: PpoParams,

    /// Where the objective should save the model trained in this trial.
    pub save_path: PathBuf,
}

/// Outcome of a trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrialState {
    /// The objective returned a value.
    Complete(f32),

    /// The objective failed; the reason is kept for diagnosis.
    Failed(String),
}

/// A finished trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Index of the trial.
    pub number: usize,

    /// Parameters of the trial.
    pub params: PpoParams,

    /// Outcome.
    pub state: TrialState,
}

impl TrialRecord {
    /// Objective value, if the trial completed.
    pub fn value(&self) -> Option<f32> {
        match self.state {
            TrialState::Complete(v) => Some(v),
            TrialState::Failed(_) => None,
        }
    }
}

/// Runs trials with parameters suggested by a [`ParamSampler`].
pub struct Study<S: ParamSampler> {
    config: StudyConfig,
    sampler: S,
    trials: Vec<TrialRecord>,
}

impl<S: ParamSampler> Study<S> {
    /// Creates a study.
    pub fn new(config: StudyConfig, sampler: S) -> Self {
        Self {
            config,
            sampler,
            trials: vec![],
        }
    }

    /// Path where the model of the given trial is saved.
    pub fn trial_save_path(&self, number: usize) -> PathBuf {
        self.config
            .opt_dir
            .join(format!("trial_{}_best_model", number))
    }

    /// Runs `n_trials` trials with the objective.
    ///
    /// An error or a non-finite value returned by the objective marks the trial
    /// as failed and the study continues. Errors of the study itself, e.g. failing
    /// to create `opt_dir`, are returned.
    pub fn optimize<F>(&mut self, mut objective: F) -> Result<()>
    where
        F: FnMut(&Trial) -> Result<f32>,
    {
        fs::create_dir_all(&self.config.opt_dir)?;

        for _ in 0..self.config.n_trials {
            let number = self.trials.len();
            let params = self.sampler.suggest(&self.config.space, &self.trials);
            let trial = Trial {
                number,
                params: params.clone(),
                save_path: self.trial_save_path(number),
            };

            let state = match objective(&trial) {
                Ok(v) if v.is_finite() => {
                    info!("Trial {} finished with value {}, {:?}", number, v, params);
                    TrialState::Complete(v)
                }
                Ok(v) => {
                    warn!("Trial {} returned non-finite value {}", number, v);
                    TrialState::Failed(format!("non-finite objective value: {}", v))
                }
                Err(e) => {
                    warn!("Trial {} failed: {:#}", number, e);
                    TrialState::Failed(format!("{:#}", e))
                }
            };

            self.trials.push(TrialRecord {
                number,
                params,
                state,
            });
        }

        Ok(())
    }

    /// All finished trials.
    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// The best completed trial. Failed trials are never returned.
    pub fn best_trial(&self) -> Option<&TrialRecord> {
        let better = |a: f32, b: f32| match self.config.direction {
            Direction::Maximize => a > b,
            Direction::Minimize => a < b,
        };

        self.trials
            .iter()
            .filter_map(|t| t.value().map(|v| (t, v)))
            .fold(None, |best: Option<(&TrialRecord, f32)>, (t, v)| match best {
                Some((_, bv)) if !better(v, bv) => best,
                _ => Some((t, v)),
            })
            .map(|(t, _)| t)
    }

    /// Parameters of the best completed trial.
    pub fn best_params(&self) -> Option<&PpoParams> {
        self.best_trial().map(|t| &t.params)
    }

    /// Saves the trials as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self.trials)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuner::RandomSampler;
    use anyhow::bail;
    use tempdir::TempDir;

    #[test]
    fn failed_trials_are_not_scored() -> Result<()> {
        let dir = TempDir::new("study")?;
        let config = StudyConfig::default()
            .n_trials(4)
            .opt_dir(dir.path().join("opt"));
        let mut study = Study::new(config, RandomSampler::new(0));

        study.optimize(|trial| match trial.number {
            0 => Ok(-1000.0),
            1 => bail!("emulator crashed"),
            2 => Ok(f32::NAN),
            _ => Ok(-5.0),
        })?;

        assert!(dir.path().join("opt").is_dir());
        let trials = study.trials();
        assert_eq!(trials.len(), 4);
        assert_eq!(trials[0].state, TrialState::Complete(-1000.0));
        assert_eq!(
            trials[1].state,
            TrialState::Failed("emulator crashed".to_string())
        );
        assert!(matches!(trials[2].state, TrialState::Failed(_)));
        assert_eq!(study.best_trial().map(|t| t.number), Some(3));
        Ok(())
    }

    #[test]
    fn direction_and_save_paths() -> Result<()> {
        let dir = TempDir::new("study")?;
        let config = StudyConfig::default()
            .n_trials(3)
            .direction(Direction::Minimize)
            .opt_dir(dir.path());
        let mut study = Study::new(config, RandomSampler::new(1));
        let mut paths = vec![];

        study.optimize(|trial| {
            paths.push(trial.save_path.clone());
            Ok(trial.number as f32)
        })?;

        assert_eq!(study.best_trial().map(|t| t.number), Some(0));
        assert_eq!(paths[2], dir.path().join("trial_2_best_model"));
        assert_eq!(study.best_params(), Some(&study.trials()[0].params));

        let path = dir.path().join("study.yaml");
        study.save(&path)?;
        let file = File::open(&path)?;
        let trials: Vec<TrialRecord> = serde_yaml::from_reader(file)?;
        assert_eq!(trials, study.trials());
        Ok(())
    }

    #[test]
    fn no_completed_trial_no_best() {
        let config = StudyConfig::default().n_trials(0);
        let study = Study::new(config, RandomSampler::new(0));
        assert!(study.best_trial().is_none());
    }

    #[test]
    fn test_serde_study_config() -> Result<()> {
        let dir = TempDir::new("study_config")?;
        let path = dir.path().join("study.yaml");
        let config = StudyConfig::default().n_trials(100);
        config.save(&path)?;
        assert_eq!(StudyConfig::load(&path)?, config);
        Ok(())
    }
}
