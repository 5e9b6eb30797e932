//! Observation of [`FighterEnv`](crate::FighterEnv).
use crate::Frame;
use brawl_core::Obs;
use ndarray::Array3;

/// Observation of [`FighterEnv`](crate::FighterEnv), shape `(height, width, channels)`.
///
/// Values are signed so that frame differences fit. A plain frame has values in
/// `0..=255`, a frame difference in `-255..=255`.
#[derive(Debug, Clone, PartialEq)]
pub struct FighterObs {
    /// Pixel values, `i16` so that frame differences fit.
    pub frames: Array3<i16>,
}

impl FighterObs {
    /// Zeros of the given shape.
    pub fn zeros(shape: (usize, usize, usize)) -> Self {
        Self {
            frames: Array3::zeros(shape),
        }
    }

    /// Returns `true` if every element is zero.
    pub fn is_zero(&self) -> bool {
        self.frames.iter().all(|&v| v == 0)
    }
}

impl From<Array3<i16>> for FighterObs {
    fn from(frames: Array3<i16>) -> Self {
        Self { frames }
    }
}

impl From<&Frame> for FighterObs {
    fn from(frame: &Frame) -> Self {
        Self {
            frames: frame.mapv(i16::from),
        }
    }
}

impl Obs for FighterObs {
    fn shape(&self) -> &[usize] {
        self.frames.shape()
    }
}
