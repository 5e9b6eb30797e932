//! Frame preprocessing.
//!
//! [`preprocess`] converts an emulator frame into a grayscale `84x84x1` [`Frame`]:
//!
//! 1. RGB to luminance with perceptual weights.
//! 2. Bicubic resize to `84x84`, for up- and down-sampling alike.
//! 3. A trailing channel axis of length 1.
//!
//! Values stay `u8` in `0..=255`; nothing is normalized or cropped.
use crate::RawFrame;
use anyhow::Result;
use brawl_core::error::EnvError;
use image::{
    imageops::{grayscale, resize, FilterType::CatmullRom},
    ImageBuffer, Rgb,
};
use ndarray::Array3;

/// Side length of a preprocessed frame.
pub const FRAME_SIZE: usize = 84;

/// A preprocessed frame, shape `(84, 84, 1)`.
pub type Frame = Array3<u8>;

/// Converts a raw color frame into a grayscale 84x84 frame.
///
/// The function has no state: the same input always gives the same output.
/// Frames with a zero dimension or a buffer length other than
/// `width * height * 3` are rejected with [`EnvError::EmulatorFault`].
pub fn preprocess(raw: &RawFrame) -> Result<Frame> {
    let (w, h) = (raw.width, raw.height);
    if w == 0 || h == 0 {
        return Err(EnvError::EmulatorFault(format!("empty frame of size {}x{}", w, h)).into());
    }
    let expected = w as usize * h as usize * 3;
    if raw.data.len() != expected {
        return Err(EnvError::EmulatorFault(format!(
            "frame of size {}x{} must have {} bytes, got {}",
            w,
            h,
            expected,
            raw.data.len()
        ))
        .into());
    }

    let img = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(w, h, raw.data.as_slice())
        .ok_or_else(|| EnvError::EmulatorFault("malformed frame".to_string()))?;
    let gray = grayscale(&img);
    let resized = resize(&gray, FRAME_SIZE as u32, FRAME_SIZE as u32, CatmullRom);
    let frame = Array3::from_shape_vec((FRAME_SIZE, FRAME_SIZE, 1), resized.into_raw())?;
    Ok(frame)
}

/// Elementwise `cur - prev`, widened to `i16`.
pub fn frame_delta(cur: &Frame, prev: &Frame) -> Array3<i16> {
    let mut delta = cur.mapv(i16::from);
    delta.zip_mut_with(prev, |d, &p| *d -= i16::from(p));
    delta
}
