mod config;
use crate::{
    preprocess::{frame_delta, preprocess},
    Emulator, FighterAct, FighterObs, Frame, RetroInfo, FRAME_SIZE, N_BUTTONS,
};
use anyhow::Result;
use brawl_core::{
    error::EnvError,
    record::Record,
    space::{BoxSpace, Dtype, MultiBinarySpace},
    Env, Space, Step,
};
pub use config::{FighterEnvConfig, ObsMode};
use log::{debug, trace};

/// Largest score change that `f32` represents exactly.
pub const MAX_SCORE_DELTA: i64 = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Built, or the last episode was aborted by an error.
    NeedsReset,
    Running,
    /// The last step reported the end of the episode.
    Done,
    Closed,
}

/// Adapter turning an emulator into an [`Env`].
///
/// The adapter exclusively owns the emulator, the previous preprocessed frame and
/// the score counter.
///
/// * [`Env::reset`] starts an episode, zeroes the score counter and returns the
///   preprocessed first frame, which also becomes the previous frame.
/// * [`Env::step`] forwards the buttons, preprocesses the new frame and returns,
///   depending on [`ObsMode`], the difference from the previous frame or the frame
///   itself. The previous frame is then replaced by the new frame (never by the
///   difference). The reward is `info.score - score_counter`, after which the
///   counter takes `info.score`. A score change larger than [`MAX_SCORE_DELTA`]
///   in magnitude is not representable as an exact reward and fails with
///   [`EnvError::EmulatorFault`].
///
/// Calling [`Env::step`] before [`Env::reset`], or after a step reported the end
/// of the episode, fails with [`EnvError::ContractViolation`] without touching
/// the emulator. An emulator error during a step aborts the episode; reset before
/// stepping again. After [`Env::close`], every method except `close` fails with
/// [`EnvError::Closed`].
pub struct FighterEnv<M: Emulator> {
    emulator: M,
    obs_mode: ObsMode,
    render: bool,
    phase: Phase,
    prev_frame: Frame,
    score: i64,
    obs_space: Space,
    act_space: Space,
}

impl<M: Emulator> FighterEnv<M> {
    /// Wraps an emulator that is already running.
    pub fn new(emulator: M, config: &FighterEnvConfig) -> Result<Self> {
        if emulator.num_buttons() != N_BUTTONS {
            return Err(EnvError::EmulatorUnavailable(format!(
                "the controller has {} buttons, expected {}",
                emulator.num_buttons(),
                N_BUTTONS
            ))
            .into());
        }

        Ok(Self {
            emulator,
            obs_mode: config.obs_mode,
            render: config.render,
            phase: Phase::NeedsReset,
            prev_frame: Frame::zeros((FRAME_SIZE, FRAME_SIZE, 1)),
            score: 0,
            obs_space: Self::observation_space_of(config.obs_mode),
            act_space: MultiBinarySpace::new(N_BUTTONS).into(),
        })
    }

    /// The observation space for an observation mode.
    pub fn observation_space_of(obs_mode: ObsMode) -> Space {
        let shape = [FRAME_SIZE, FRAME_SIZE, 1];
        match obs_mode {
            ObsMode::FrameDelta => BoxSpace::new(-255.0, 255.0, shape, Dtype::I16),
            ObsMode::Frame => BoxSpace::new(0.0, 255.0, shape, Dtype::U8),
        }
        .into()
    }

    /// The cumulative score seen in the current episode.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// The last preprocessed frame.
    pub fn previous_frame(&self) -> &Frame {
        &self.prev_frame
    }

    /// The wrapped emulator.
    pub fn emulator(&self) -> &M {
        &self.emulator
    }

    fn check_open(&self) -> Result<()> {
        if self.phase == Phase::Closed {
            return Err(EnvError::Closed.into());
        }
        Ok(())
    }

    fn check_stepable(&self) -> Result<()> {
        match self.phase {
            Phase::Running => Ok(()),
            Phase::Closed => Err(EnvError::Closed.into()),
            Phase::NeedsReset => Err(EnvError::ContractViolation(
                "step() was called before reset()".to_string(),
            )
            .into()),
            Phase::Done => Err(EnvError::ContractViolation(
                "step() was called after the episode ended without reset()".to_string(),
            )
            .into()),
        }
    }

    fn try_reset(&mut self) -> Result<Frame> {
        let raw = self
            .emulator
            .reset()
            .map_err(|e| EnvError::EmulatorUnavailable(format!("{:#}", e)))?;
        let frame =
            preprocess(&raw).map_err(|e| EnvError::EmulatorUnavailable(format!("{:#}", e)))?;
        Ok(frame)
    }

    fn try_step(&mut self, a: &FighterAct) -> Result<(FighterObs, f32, bool, RetroInfo)> {
        if self.render {
            self.emulator
                .render()
                .map_err(|e| EnvError::EmulatorFault(format!("{:#}", e)))?;
        }

        let out = self
            .emulator
            .step(&a.buttons)
            .map_err(|e| EnvError::EmulatorFault(format!("{:#}", e)))?;
        let frame = preprocess(&out.frame)?;
        let score = out.info.score().ok_or_else(|| {
            EnvError::EmulatorFault("the info reported by the emulator has no score".to_string())
        })?;

        let delta = score - self.score;
        if delta.abs() > MAX_SCORE_DELTA {
            return Err(EnvError::EmulatorFault(format!(
                "score jumped from {} to {}",
                self.score, score
            ))
            .into());
        }

        let obs = match self.obs_mode {
            ObsMode::FrameDelta => frame_delta(&frame, &self.prev_frame).into(),
            ObsMode::Frame => FighterObs::from(&frame),
        };
        self.prev_frame = frame;

        self.score = score;

        Ok((obs, delta as f32, out.done, out.info))
    }
}

impl<M: Emulator> Env for FighterEnv<M> {
    type Config = FighterEnvConfig;
    type Obs = FighterObs;
    type Act = FighterAct;
    type Info = RetroInfo;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        debug!("Start emulator for {:?}", config.emulator.game);
        let emulator = M::make(&config.emulator)
            .map_err(|e| EnvError::EmulatorUnavailable(format!("{:#}", e)))?;
        Self::new(emulator, config)
    }

    fn reset(&mut self) -> Result<FighterObs> {
        trace!("FighterEnv::reset()");
        self.check_open()?;

        // The previous episode is discarded even if the new one fails to start.
        self.phase = Phase::NeedsReset;
        self.score = 0;
        let frame = self.try_reset()?;
        let obs = FighterObs::from(&frame);
        self.prev_frame = frame;
        self.phase = Phase::Running;

        Ok(obs)
    }

    fn step(&mut self, a: &FighterAct) -> Result<(Step<Self>, Record)> {
        trace!("FighterEnv::step()");
        self.check_stepable()?;

        match self.try_step(a) {
            Ok((obs, reward, done, info)) => {
                if done {
                    debug!("Episode ended with score {}", self.score);
                    self.phase = Phase::Done;
                }
                let step = Step::new(obs, *a, reward, done, false, info);
                Ok((step, Record::empty()))
            }
            Err(e) => {
                self.phase = Phase::NeedsReset;
                Err(e)
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        self.check_open()?;
        self.emulator.render()
    }

    fn close(&mut self) -> Result<()> {
        if self.phase == Phase::Closed {
            return Ok(());
        }
        self.phase = Phase::Closed;
        self.emulator.close()
    }

    fn observation_space(&self) -> &Space {
        &self.obs_space
    }

    fn action_space(&self) -> &Space {
        &self.act_space
    }
}
