//! The emulator collaborator.
//!
//! [`Emulator`] is the interface [`FighterEnv`](crate::FighterEnv) expects from a
//! retro game emulator. It mirrors the call contract of gym-retro:
//! `make(game, actions)`, `reset()`, `step(buttons)`, `render()` and `close()`.
use anyhow::Result;
use brawl_core::Info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which button combinations the emulator accepts, as in gym-retro's `Actions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionFilter {
    /// Every combination of buttons.
    All,

    /// Only combinations valid for the game.
    Filtered,

    /// A single discrete index into the valid combinations.
    Discrete,

    /// One discrete index per button group.
    MultiDiscrete,
}

/// Arguments to [`Emulator::make`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// Game identifier, e.g. `SamuraiShodown-Genesis`.
    pub game: String,

    /// Save state to start episodes from. `None` uses the game's default state.
    pub state: Option<String>,

    /// Button combination filter.
    pub actions: ActionFilter,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            game: "SamuraiShodown-Genesis".to_string(),
            state: None,
            actions: ActionFilter::Filtered,
        }
    }
}

impl EmulatorConfig {
    /// Sets the game identifier.
    pub fn game(mut self, game: impl Into<String>) -> Self {
        self.game = game.into();
        self
    }

    /// Sets the initial save state.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the button combination filter.
    pub fn actions(mut self, actions: ActionFilter) -> Self {
        self.actions = actions;
        self
    }
}

/// A color frame produced by the emulator.
///
/// `data` is RGB24 in row-major order, so its length is `width * height * 3`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// Pixels.
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Constructs a frame.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// A frame filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let n = width as usize * height as usize;
        let data = rgb.iter().copied().cycle().take(n * 3).collect();
        Self::new(width, height, data)
    }
}

/// Variables reported by the emulator at every step, such as `score` or `health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetroInfo(BTreeMap<String, i64>);

impl RetroInfo {
    /// Creates an empty info map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an info map with only a score.
    pub fn with_score(score: i64) -> Self {
        let mut info = Self::new();
        info.insert("score", score);
        info
    }

    /// Inserts a variable.
    pub fn insert(&mut self, k: impl Into<String>, v: i64) {
        self.0.insert(k.into(), v);
    }

    /// Gets a variable.
    pub fn get(&self, k: &str) -> Option<i64> {
        self.0.get(k).copied()
    }

    /// The cumulative game score.
    pub fn score(&self) -> Option<i64> {
        self.get("score")
    }

    /// Iterates over the variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Info for RetroInfo {}

/// What the emulator returns from [`Emulator::step`].
#[derive(Debug, Clone)]
pub struct EmulatorStep {
    /// The frame after the step.
    pub frame: RawFrame,

    /// Reward computed by the emulator. Not used by [`FighterEnv`](crate::FighterEnv),
    /// which derives rewards from `info`.
    pub reward: f32,

    /// The episode is over.
    pub done: bool,

    /// Game variables, containing at least `score`.
    pub info: RetroInfo,
}

/// A retro game emulator.
///
/// An emulator instance is driven by exactly one environment at a time.
/// Run several (environment, emulator) pairs for parallel data collection.
pub trait Emulator {
    /// Starts the emulator for the game in `config`.
    fn make(config: &EmulatorConfig) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns its first frame.
    fn reset(&mut self) -> Result<RawFrame>;

    /// Presses `buttons` for one step.
    fn step(&mut self, buttons: &[bool]) -> Result<EmulatorStep>;

    /// Displays the current frame.
    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    /// Shuts the emulator down.
    fn close(&mut self) -> Result<()>;

    /// The number of buttons of the controller.
    fn num_buttons(&self) -> usize {
        crate::N_BUTTONS
    }
}
