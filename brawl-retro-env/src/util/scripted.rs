use crate::{Emulator, EmulatorConfig, EmulatorStep, RawFrame, RetroInfo, N_BUTTONS};
use anyhow::{bail, Result};
use log::{debug, trace};

const DEMO_WIDTH: u32 = 320;
const DEMO_HEIGHT: u32 = 224;
const DEMO_EPISODE_LEN: usize = 120;

/// An entry of the script replayed by [`ScriptedEmulator`].
#[derive(Debug, Clone)]
pub struct ScriptStep {
    /// Frame returned by the step.
    pub frame: RawFrame,

    /// Info returned by the step.
    pub info: RetroInfo,

    /// The episode ends at this step.
    pub done: bool,
}

impl ScriptStep {
    /// A step reporting the cumulative `score`.
    pub fn new(frame: RawFrame, score: i64, done: bool) -> Self {
        Self {
            frame,
            info: RetroInfo::with_score(score),
            done,
        }
    }
}

/// An [`Emulator`] replaying a fixed script.
///
/// Every episode starts with the same reset frame and the `i`-th call of
/// [`Emulator::step`] in the episode returns the `i`-th entry of the script.
/// Stepping past the end of the script fails.
///
/// [`Emulator::make`] builds a synthetic fight: a bright block sliding over a
/// dark stage with the score growing by 100 every 30 steps. An empty game name
/// is rejected as if the ROM were missing.
#[derive(Debug, Clone)]
pub struct ScriptedEmulator {
    reset_frame: RawFrame,
    script: Vec<ScriptStep>,
    cursor: usize,
    fail_reset: bool,
    fail_at_step: Option<usize>,
    pressed: Vec<[bool; N_BUTTONS]>,
    steps_taken: usize,
    n_renders: usize,
    closed: bool,
}

impl ScriptedEmulator {
    /// Replays `script` after `reset_frame`.
    pub fn new(reset_frame: RawFrame, script: Vec<ScriptStep>) -> Self {
        Self {
            reset_frame,
            script,
            cursor: 0,
            fail_reset: false,
            fail_at_step: None,
            pressed: vec![],
            steps_taken: 0,
            n_renders: 0,
            closed: false,
        }
    }

    /// The synthetic fight of `n_steps` steps used by [`Emulator::make`].
    pub fn demo(n_steps: usize) -> Self {
        let script = (0..n_steps)
            .map(|i| {
                let score = (i / 30) as i64 * 100;
                ScriptStep::new(demo_frame(i), score, i + 1 == n_steps)
            })
            .collect();
        Self::new(demo_frame(0), script)
    }

    /// Makes every [`Emulator::reset`] fail.
    pub fn fail_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Makes the `ix`-th step of every episode fail, counting from zero.
    pub fn fail_at_step(mut self, ix: usize) -> Self {
        self.fail_at_step = Some(ix);
        self
    }

    /// The total number of steps taken over all episodes.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Buttons pressed at every step of the current episode, in order.
    pub fn pressed(&self) -> &[[bool; N_BUTTONS]] {
        &self.pressed
    }

    /// The number of calls to [`Emulator::render`].
    pub fn n_renders(&self) -> usize {
        self.n_renders
    }

    /// Returns `true` after [`Emulator::close`].
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

fn demo_frame(i: usize) -> RawFrame {
    let (w, h) = (DEMO_WIDTH as usize, DEMO_HEIGHT as usize);
    let side = 32;
    let x0 = (i * 4) % (w - side);
    let y0 = (h - side) / 2;

    let mut data = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            let inside = (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y);
            let rgb = if inside { [220, 180, 60] } else { [20, 20, 40] };
            data.extend_from_slice(&rgb);
        }
    }
    RawFrame::new(DEMO_WIDTH, DEMO_HEIGHT, data)
}

impl Emulator for ScriptedEmulator {
    fn make(config: &EmulatorConfig) -> Result<Self> {
        if config.game.is_empty() {
            bail!("no game given");
        }
        debug!("Scripted emulator for {}", config.game);
        Ok(Self::demo(DEMO_EPISODE_LEN))
    }

    fn reset(&mut self) -> Result<RawFrame> {
        if self.closed {
            bail!("emulator is closed");
        }
        if self.fail_reset {
            bail!("failed to load the initial state");
        }
        self.cursor = 0;
        self.pressed.clear();
        Ok(self.reset_frame.clone())
    }

    fn step(&mut self, buttons: &[bool]) -> Result<EmulatorStep> {
        if self.closed {
            bail!("emulator is closed");
        }
        if self.fail_at_step == Some(self.cursor) {
            bail!("emulator crashed at step {}", self.cursor);
        }
        if buttons.len() != N_BUTTONS {
            bail!("expected {} buttons, got {}", N_BUTTONS, buttons.len());
        }
        let entry = match self.script.get(self.cursor) {
            Some(entry) => entry.clone(),
            None => bail!("script of {} steps exhausted", self.script.len()),
        };
        trace!("Scripted step {}", self.cursor);

        let mut pressed = [false; N_BUTTONS];
        pressed.copy_from_slice(buttons);
        self.pressed.push(pressed);
        self.steps_taken += 1;
        self.cursor += 1;

        Ok(EmulatorStep {
            frame: entry.frame,
            reward: 0.0,
            done: entry.done,
            info: entry.info,
        })
    }

    fn render(&mut self) -> Result<()> {
        self.n_renders += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_script() -> Result<()> {
        let mut emulator = ScriptedEmulator::make(&EmulatorConfig::default())?;
        let first = emulator.reset()?;
        assert_eq!((first.width, first.height), (DEMO_WIDTH, DEMO_HEIGHT));

        let mut last = None;
        for _ in 0..DEMO_EPISODE_LEN {
            last = Some(emulator.step(&[false; N_BUTTONS])?);
        }
        let last = last.unwrap();
        assert!(last.done);
        assert_eq!(last.info.score(), Some(300));
        assert!(emulator.step(&[false; N_BUTTONS]).is_err());
        Ok(())
    }

    #[test]
    fn empty_game_is_rejected() {
        assert!(ScriptedEmulator::make(&EmulatorConfig::default().game("")).is_err());
    }

    #[test]
    fn injected_failures() -> Result<()> {
        let mut emulator = ScriptedEmulator::demo(5).fail_at_step(1);
        emulator.reset()?;
        emulator.step(&[true; N_BUTTONS])?;
        assert!(emulator.step(&[true; N_BUTTONS]).is_err());
        assert_eq!(emulator.pressed(), &[[true; N_BUTTONS]]);

        let mut emulator = ScriptedEmulator::demo(5).fail_reset();
        assert!(emulator.reset().is_err());
        Ok(())
    }

    #[test]
    fn pressed_buttons_are_kept_per_episode() -> Result<()> {
        let mut emulator = ScriptedEmulator::demo(5);
        emulator.reset()?;
        emulator.step(&[true; N_BUTTONS])?;
        emulator.step(&[false; N_BUTTONS])?;
        assert_eq!(emulator.pressed().len(), 2);

        emulator.reset()?;
        assert!(emulator.pressed().is_empty());
        emulator.step(&[true; N_BUTTONS])?;
        assert_eq!(emulator.pressed(), &[[true; N_BUTTONS]]);
        assert_eq!(emulator.steps_taken(), 3);
        Ok(())
    }
}
