//! Configuration of [`FighterEnv`](super::FighterEnv).
use crate::EmulatorConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// What [`FighterEnv::step`](brawl_core::Env::step) returns as observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObsMode {
    /// The current frame minus the previous one, values in `-255..=255`.
    FrameDelta,

    /// The current frame, values in `0..=255`.
    Frame,
}

/// Configurations of [`FighterEnv`](super::FighterEnv).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterEnvConfig {
    pub(super) emulator: EmulatorConfig,
    pub(super) obs_mode: ObsMode,
    pub(super) render: bool,
}

impl Default for FighterEnvConfig {
    fn default() -> Self {
        Self {
            emulator: EmulatorConfig::default(),
            obs_mode: ObsMode::FrameDelta,
            render: false,
        }
    }
}

impl FighterEnvConfig {
    /// Sets the emulator configuration.
    pub fn emulator(mut self, emulator: EmulatorConfig) -> Self {
        self.emulator = emulator;
        self
    }

    /// Sets the game identifier.
    pub fn game(mut self, game: impl Into<String>) -> Self {
        self.emulator.game = game.into();
        self
    }

    /// Sets the observation mode.
    pub fn obs_mode(mut self, obs_mode: ObsMode) -> Self {
        self.obs_mode = obs_mode;
        self
    }

    /// Renders at every step.
    pub fn render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    /// Emulator configuration.
    pub fn emulator_config(&self) -> &EmulatorConfig {
        &self.emulator
    }

    /// Constructs [`FighterEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        Ok(serde_yaml::from_reader(rdr)?)
    }

    /// Saves [`FighterEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
