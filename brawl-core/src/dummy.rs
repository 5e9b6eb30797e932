//! Small environment and agent used in tests.
use crate::{
    record::Record,
    space::{BoxSpace, Dtype, MultiBinarySpace},
    Act, Agent, Env, Obs, Policy, Space, Step,
};
use anyhow::Result;
use std::{fs, path::Path};

/// Observation: the number of steps since reset.
#[derive(Clone, Debug, PartialEq)]
pub struct CountingObs(pub [f32; 1]);

impl Obs for CountingObs {
    fn shape(&self) -> &[usize] {
        &[1]
    }
}

/// Action: a single flag.
#[derive(Clone, Debug, PartialEq)]
pub struct CountingAct(pub u8);

impl Act for CountingAct {
    fn len(&self) -> usize {
        1
    }
}

/// Configuration of [`CountingEnv`].
#[derive(Clone, Debug)]
pub struct CountingEnvConfig {
    pub episode_len: usize,
}

/// Rewards 1 for each step with flag set, terminates after `episode_len` steps.
pub struct CountingEnv {
    episode_len: usize,
    t: usize,
    obs_space: Space,
    act_space: Space,
}

impl Env for CountingEnv {
    type Config = CountingEnvConfig;
    type Obs = CountingObs;
    type Act = CountingAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            episode_len: config.episode_len,
            t: 0,
            obs_space: BoxSpace::new(0.0, config.episode_len as f32, [1], Dtype::F32).into(),
            act_space: MultiBinarySpace::new(1).into(),
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(CountingObs([0.0]))
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.t += 1;
        let obs = CountingObs([self.t as f32]);
        let done = self.t >= self.episode_len;
        let step = Step::new(obs, a.clone(), a.0 as f32, done, false, ());
        Ok((step, Record::empty()))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn observation_space(&self) -> &Space {
        &self.obs_space
    }

    fn action_space(&self) -> &Space {
        &self.act_space
    }
}

/// Always presses the flag and counts observed transitions.
#[derive(Default)]
pub struct CountingAgent {
    pub observed: usize,
    train: bool,
}

impl<E: Env<Obs = CountingObs, Act = CountingAct>> Policy<E> for CountingAgent {
    fn sample(&mut self, _obs: &CountingObs) -> CountingAct {
        CountingAct(1)
    }
}

impl<E: Env<Obs = CountingObs, Act = CountingAct>> Agent<E> for CountingAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn observe(&mut self, _obs: &CountingObs, _step: &Step<E>) -> Result<Option<Record>> {
        self.observed += 1;
        Ok(None)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        fs::write(path.join("params"), self.observed.to_string())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.observed = fs::read_to_string(path.join("params"))?.trim().parse()?;
        Ok(())
    }
}
