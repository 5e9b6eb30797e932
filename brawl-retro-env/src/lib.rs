#![warn(missing_docs)]
//! An environment adapter over a retro game emulator for fighting games.
//!
//! [`FighterEnv`] drives an emulator implementing [`Emulator`] and turns its raw
//! color frames and cumulative scores into what a training loop expects:
//!
//! * Observations are grayscale 84x84 frames with a trailing channel axis,
//!   `(84, 84, 1)`. By default, [`FighterEnv::step`](brawl_core::Env::step)
//!   returns the signed difference between the current and previous frames so
//!   that the policy sees motion rather than static poses (see [`ObsMode`]).
//! * Rewards are the change of the in-game score since the previous step.
//!   They can be negative.
//! * Actions are 12 button flags pressed at once ([`FighterAct`]).
//!
//! The emulator is an external collaborator. Bind it by implementing [`Emulator`];
//! [`util::ScriptedEmulator`] replays a fixed script and is used in tests and demos.
//!
//! ```no_run
//! use anyhow::Result;
//! use brawl_core::{DefaultEvaluator, Evaluator as _};
//! use brawl_retro_env::{
//!     util::{RandomPolicy, ScriptedEmulator},
//!     FighterEnv, FighterEnvConfig,
//! };
//!
//! type Env = FighterEnv<ScriptedEmulator>;
//!
//! fn main() -> Result<()> {
//!     let env_config = FighterEnvConfig::default();
//!     let mut policy = RandomPolicy;
//!     let record = DefaultEvaluator::<Env>::new(&env_config, 0, 5)?.evaluate(&mut policy)?;
//!     println!("{:?}", record.get_scalar("Episode return")?);
//!     Ok(())
//! }
//! ```
mod act;
mod env;
mod frame_stack;
mod obs;
pub mod preprocess;
pub mod retro;
pub mod util;
pub use act::{FighterAct, N_BUTTONS};
pub use env::{FighterEnv, FighterEnvConfig, ObsMode, MAX_SCORE_DELTA};
pub use frame_stack::{FrameStack, FrameStackConfig};
pub use obs::FighterObs;
pub use preprocess::{Frame, FRAME_SIZE};
pub use retro::{ActionFilter, Emulator, EmulatorConfig, EmulatorStep, RawFrame, RetroInfo};
