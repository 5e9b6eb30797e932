use crate::{FighterAct, N_BUTTONS};
use brawl_core::{Env, Policy};

/// Presses each button with probability 1/2, independently of the observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl<E: Env<Act = FighterAct>> Policy<E> for RandomPolicy {
    fn sample(&mut self, _: &E::Obs) -> FighterAct {
        let mut buttons = [false; N_BUTTONS];
        buttons.iter_mut().for_each(|b| *b = fastrand::bool());
        buttons.into()
    }
}
