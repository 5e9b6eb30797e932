use anyhow::Result;
use brawl_core::{
    record::{BufferedRecorder, Record},
    tuner::{Direction, RandomSampler, Study, StudyConfig},
    Agent, CheckpointCallback, CheckpointCallbackConfig, DefaultEvaluator, Env as _,
    Evaluator as _, Monitor, Policy, Step, Trainer, TrainerConfig,
};
use brawl_retro_env::{
    util::{RandomPolicy, ScriptedEmulator},
    FighterAct, FighterEnv, FighterEnvConfig, FighterObs, FrameStack, FrameStackConfig,
};
use std::{fs, path::Path};
use tempdir::TempDir;

type Env = Monitor<FrameStack<FighterEnv<ScriptedEmulator>>>;
type EnvConfig = FrameStackConfig<FighterEnvConfig>;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Presses random buttons and counts transitions.
#[derive(Default)]
struct RandomAgent {
    observed: usize,
    train: bool,
}

impl Policy<Env> for RandomAgent {
    fn sample(&mut self, obs: &FighterObs) -> FighterAct {
        Policy::<Env>::sample(&mut RandomPolicy, obs)
    }
}

impl Agent<Env> for RandomAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn observe(
        &mut self,
        obs: &FighterObs,
        step: &Step<Env>,
    ) -> Result<Option<Record>> {
        assert_eq!(obs.frames.shape(), step.obs.frames.shape());
        self.observed += 1;
        Ok(None)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        fs::write(path.join("params"), self.observed.to_string())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.observed = fs::read_to_string(path.join("params"))?.parse()?;
        Ok(())
    }
}

fn env_config() -> EnvConfig {
    FrameStackConfig::new(FighterEnvConfig::default())
}

#[test]
fn monitored_frame_stack() -> Result<()> {
    init();
    let mut env = Env::build(&env_config(), 0)?;
    assert_eq!(env.observation_space().shape(), vec![84, 84, 4]);
    assert_eq!(env.action_space().shape(), vec![12]);

    let mut obs = env.reset()?;
    let mut policy = RandomPolicy;
    loop {
        let act = Policy::<Env>::sample(&mut policy, &obs);
        let (step, record) = env.step(&act)?;
        if step.is_done() {
            assert_eq!(record.get_scalar("episode_return")?, 300.0);
            assert_eq!(record.get_scalar("episode_length")?, 120.0);
            break;
        }
        obs = step.obs;
    }
    assert_eq!(env.episode_returns(), &[300.0]);
    env.close()
}

#[test]
fn train_with_checkpoints() -> Result<()> {
    init();
    let dir = TempDir::new("fighter_training")?;
    let config = TrainerConfig::default()
        .max_env_steps(250)
        .eval_interval(125)
        .record_interval(50)
        .model_dir(dir.path().join("model").to_string_lossy());
    let mut trainer = Trainer::<Env>::build(config, env_config());
    let mut agent = RandomAgent::default();
    let mut recorder = BufferedRecorder::new();
    let mut evaluator = DefaultEvaluator::<Env>::new(&env_config(), 0, 1)?;
    let mut callback = CheckpointCallback::build(
        &CheckpointCallbackConfig::default()
            .check_freq(100)
            .save_path(dir.path().join("train")),
    );

    trainer.train(&mut agent, &mut recorder, &mut evaluator, &mut callback)?;

    assert_eq!(agent.observed, 250);
    assert!(dir.path().join("train/best_model_100").exists());
    assert!(dir.path().join("train/best_model_200").exists());
    assert!(dir.path().join("model/best").exists());

    // Two episodes of 120 steps end within 250 steps.
    let returns: Vec<_> = recorder
        .iter()
        .filter_map(|r| r.get_scalar("episode_return").ok())
        .collect();
    assert_eq!(returns, vec![300.0, 300.0]);

    let mut restored = RandomAgent::default();
    restored.load_params(&dir.path().join("train/best_model_200"))?;
    assert_eq!(restored.observed, 200);
    Ok(())
}

#[test]
fn study_over_training_runs() -> Result<()> {
    init();
    let dir = TempDir::new("fighter_study")?;
    let study_config = StudyConfig::default()
        .n_trials(3)
        .direction(Direction::Maximize)
        .opt_dir(dir.path());
    let mut study = Study::new(study_config, RandomSampler::new(0));

    study.optimize(|trial| {
        let n_steps = trial.params.clone().align_n_steps(64).n_steps;
        assert_eq!(n_steps % 64, 0);

        let config = TrainerConfig::default().max_env_steps(130);
        let mut trainer = Trainer::<Env>::build(config, env_config());
        let mut agent = RandomAgent::default();
        let mut evaluator = DefaultEvaluator::<Env>::new(&env_config(), 0, 1)?;
        let mut callback = CheckpointCallback::build(
            &CheckpointCallbackConfig::default()
                .check_freq(130)
                .save_path(dir.path().join("train")),
        );
        trainer.train(
            &mut agent,
            &mut BufferedRecorder::new(),
            &mut evaluator,
            &mut callback,
        )?;
        agent.save_params(&trial.save_path)?;

        let record = evaluator.evaluate(&mut agent)?;
        Ok(record.get_scalar("Episode return")?)
    })?;

    assert_eq!(study.trials().len(), 3);
    let best = study.best_trial().unwrap();
    assert_eq!(best.value(), Some(300.0));
    assert!(study.trial_save_path(best.number).exists());
    Ok(())
}
