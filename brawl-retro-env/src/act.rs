//! Action for [`FighterEnv`](crate::FighterEnv).
use brawl_core::{error::EnvError, Act};
use std::convert::TryFrom;

/// The number of controller buttons.
pub const N_BUTTONS: usize = 12;

/// Buttons pressed at once in a step.
///
/// The length is fixed and each flag is a `bool`, so an action of the wrong
/// length or with non-binary values cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FighterAct {
    /// Pressed state of each controller button, in the emulator's button order.
    pub buttons: [bool; N_BUTTONS],
}

impl FighterAct {
    /// No button pressed.
    pub fn noop() -> Self {
        Self::default()
    }

    /// Flags as `0`/`1`.
    pub fn to_bits(&self) -> Vec<u8> {
        self.buttons.iter().map(|&b| b as u8).collect()
    }
}

impl Act for FighterAct {
    fn len(&self) -> usize {
        N_BUTTONS
    }
}

impl From<[bool; N_BUTTONS]> for FighterAct {
    fn from(buttons: [bool; N_BUTTONS]) -> Self {
        Self { buttons }
    }
}

impl TryFrom<&[u8]> for FighterAct {
    type Error = EnvError;

    /// Converts `0`/`1` flags, e.g. sampled from
    /// [`MultiBinarySpace`](brawl_core::space::MultiBinarySpace).
    fn try_from(bits: &[u8]) -> Result<Self, Self::Error> {
        if bits.len() != N_BUTTONS {
            return Err(EnvError::ContractViolation(format!(
                "expected {} buttons, got {}",
                N_BUTTONS,
                bits.len()
            )));
        }

        let mut buttons = [false; N_BUTTONS];
        for (b, &v) in buttons.iter_mut().zip(bits) {
            *b = match v {
                0 => false,
                1 => true,
                _ => {
                    return Err(EnvError::ContractViolation(format!(
                        "button flag must be 0 or 1, got {}",
                        v
                    )))
                }
            };
        }
        Ok(Self { buttons })
    }
}

impl TryFrom<Vec<u8>> for FighterAct {
    type Error = EnvError;

    fn try_from(bits: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bits.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_binary_flags() {
        let act = FighterAct::try_from(vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]).unwrap();
        assert!(act.buttons[0] && act.buttons[11]);
        assert_eq!(act.to_bits().iter().filter(|&&b| b == 1).count(), 2);
        assert_eq!(act.len(), 12);
    }

    #[test]
    fn rejects_wrong_length_and_values() {
        assert!(matches!(
            FighterAct::try_from(vec![0; 11]),
            Err(EnvError::ContractViolation(_))
        ));
        let mut bits = vec![0; 12];
        bits[3] = 2;
        assert!(matches!(
            FighterAct::try_from(bits),
            Err(EnvError::ContractViolation(_))
        ));
    }
}
