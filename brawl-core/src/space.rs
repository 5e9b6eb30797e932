//! Observation and action spaces.
//!
//! A [`Space`] describes the shape and value range of observations or actions of an
//! environment. It is metadata: environments build it once and return it by
//! reference.
use serde::{Deserialize, Serialize};

/// Element type of a [`BoxSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dtype {
    /// Unsigned 8-bit integer.
    U8,

    /// Signed 16-bit integer.
    I16,

    /// 32-bit float.
    F32,
}

/// A box in `R^n` with the same bounds for every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    /// Lower bound, inclusive.
    pub low: f32,

    /// Upper bound, inclusive.
    pub high: f32,

    /// Shape of an element of the space.
    pub shape: Vec<usize>,

    /// Element type.
    pub dtype: Dtype,
}

impl BoxSpace {
    /// Constructs a box space.
    pub fn new(low: f32, high: f32, shape: impl Into<Vec<usize>>, dtype: Dtype) -> Self {
        Self {
            low,
            high,
            shape: shape.into(),
            dtype,
        }
    }

    /// The number of elements of a value in the space.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Returns `true` if `shape` matches the shape of the space.
    pub fn contains_shape(&self, shape: &[usize]) -> bool {
        self.shape == shape
    }

    /// Returns `true` if all of `values` are within the bounds and the number of
    /// values equals [`BoxSpace::numel`].
    pub fn contains<T: Copy + Into<f32>>(&self, values: impl IntoIterator<Item = T>) -> bool {
        let mut n = 0;
        for v in values {
            let v: f32 = v.into();
            if v < self.low || v > self.high {
                return false;
            }
            n += 1;
        }
        n == self.numel()
    }
}

/// A vector of `n` independent binary flags, e.g. buttons pressed at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiBinarySpace {
    /// The number of flags.
    pub n: usize,
}

impl MultiBinarySpace {
    /// Constructs the space.
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Samples flags uniformly at random.
    pub fn sample(&self) -> Vec<u8> {
        (0..self.n).map(|_| fastrand::u8(..2)).collect()
    }

    /// Returns `true` if `bits` has length `n` and only contains 0 and 1.
    pub fn contains(&self, bits: &[u8]) -> bool {
        bits.len() == self.n && bits.iter().all(|&b| b <= 1)
    }
}

/// A space of observations or actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Space {
    /// Bounded array.
    Box(BoxSpace),

    /// Binary flags.
    MultiBinary(MultiBinarySpace),
}

impl Space {
    /// Shape of an element of the space.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Box(s) => s.shape.clone(),
            Self::MultiBinary(s) => vec![s.n],
        }
    }

    /// Returns the box space, if it is.
    pub fn as_box(&self) -> Option<&BoxSpace> {
        match self {
            Self::Box(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the multi-binary space, if it is.
    pub fn as_multi_binary(&self) -> Option<&MultiBinarySpace> {
        match self {
            Self::MultiBinary(s) => Some(s),
            _ => None,
        }
    }
}

impl From<BoxSpace> for Space {
    fn from(s: BoxSpace) -> Self {
        Self::Box(s)
    }
}

impl From<MultiBinarySpace> for Space {
    fn from(s: MultiBinarySpace) -> Self {
        Self::MultiBinary(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_binary_samples_are_contained() {
        fastrand::seed(42);
        let space = MultiBinarySpace::new(12);
        for _ in 0..100 {
            let bits = space.sample();
            assert!(space.contains(&bits));
        }
        assert!(!space.contains(&[0; 11]));
        assert!(!space.contains(&[0, 1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn box_space_bounds() {
        let space = BoxSpace::new(0.0, 255.0, [2, 2, 1], Dtype::U8);
        assert_eq!(space.numel(), 4);
        assert!(space.contains([0u8, 10, 255, 3]));
        assert!(!space.contains([0u8, 10, 255]));

        let space = BoxSpace::new(-255.0, 255.0, [2, 1], Dtype::I16);
        assert!(space.contains([-255i16, 255]));
        assert!(!space.contains([-256i16, 0]));
        assert!(space.contains_shape(&[2, 1]));
    }

    #[test]
    fn space_shape() {
        let space: Space = MultiBinarySpace::new(12).into();
        assert_eq!(space.shape(), vec![12]);
        assert!(space.as_box().is_none());
        let space: Space = BoxSpace::new(0.0, 255.0, [84, 84, 1], Dtype::U8).into();
        assert_eq!(space.shape(), vec![84, 84, 1]);
    }
}
