//! Synthetic drift injection.
//!
//! Each injector returns a new sequence of the same length. Monitored features
//! are min-max scaled, so perturbed values are clamped back into
//! [`DOMAIN_MIN`, `DOMAIN_MAX`].

use driftscope_core::{Error, Result};
use rand::Rng;
use std::f64::consts::PI;
use tracing::debug;

/// Lower edge of the normalized feature domain
pub const DOMAIN_MIN: f64 = 0.0;

/// Upper edge of the normalized feature domain
pub const DOMAIN_MAX: f64 = 1.0;

/// Smallest uniform draw fed to the Box-Muller log
const MIN_UNIFORM: f64 = 1e-10;

fn clamp_to_domain(value: f64) -> f64 {
    value.clamp(DOMAIN_MIN, DOMAIN_MAX)
}

fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_input(format!("{} must be finite, got {}", name, value)))
    }
}

fn ensure_index(name: &str, index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(Error::invalid_input(format!(
            "{} {} is out of range for a sequence of length {}",
            name, index, len
        )));
    }
    Ok(())
}

/// Add a linearly increasing bias from `start_index` to the end.
///
/// Progress runs from 0 at `start_index` to 1 at the last element, so the last
/// element always carries the full `max_bias`. A ramp of a single element
/// (`start_index == len - 1`) has progress 1.
///
/// # Errors
/// `InvalidInput` if `start_index > data.len()` or `max_bias` is not finite.
pub fn inject_gradual_drift(data: &[f64], max_bias: f64, start_index: usize) -> Result<Vec<f64>> {
    ensure_finite("max_bias", max_bias)?;
    ensure_index("start_index", start_index, data.len())?;

    let span = data.len().saturating_sub(start_index + 1);

    let drifted = data
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i < start_index {
                return v;
            }
            let progress = if span == 0 {
                1.0
            } else {
                (i - start_index) as f64 / span as f64
            };
            clamp_to_domain(v + max_bias * progress)
        })
        .collect();

    debug!(len = data.len(), max_bias, start_index, "Injected gradual drift");
    Ok(drifted)
}

/// Add a constant `bias` to every element at or after `shift_index`.
///
/// # Errors
/// `InvalidInput` if `shift_index > data.len()` or `bias` is not finite.
pub fn inject_sudden_shift(data: &[f64], bias: f64, shift_index: usize) -> Result<Vec<f64>> {
    ensure_finite("bias", bias)?;
    ensure_index("shift_index", shift_index, data.len())?;

    let drifted = data
        .iter()
        .enumerate()
        .map(|(i, &v)| if i < shift_index { v } else { clamp_to_domain(v + bias) })
        .collect();

    debug!(len = data.len(), bias, shift_index, "Injected sudden shift");
    Ok(drifted)
}

/// Add zero-mean Gaussian noise using the thread-local RNG.
///
/// Repeated calls with the same input produce different output; use
/// [`inject_noise_with`] and a seeded RNG for reproducibility.
pub fn inject_noise(data: &[f64], noise_std: f64) -> Result<Vec<f64>> {
    let mut rng = rand::rng();
    inject_noise_with(data, noise_std, &mut rng)
}

/// Add zero-mean Gaussian noise drawn from `rng`.
///
/// Each element draws two uniforms and applies the Box-Muller transform.
/// A `noise_std` of 0 returns the input unchanged without consuming the RNG.
///
/// # Errors
/// `InvalidInput` if `noise_std` is negative or not finite.
pub fn inject_noise_with<R: Rng>(data: &[f64], noise_std: f64, rng: &mut R) -> Result<Vec<f64>> {
    ensure_finite("noise_std", noise_std)?;
    if noise_std < 0.0 {
        return Err(Error::invalid_input(format!(
            "noise_std must be non-negative, got {}",
            noise_std
        )));
    }
    if noise_std == 0.0 {
        return Ok(data.to_vec());
    }

    let drifted = data
        .iter()
        .map(|&v| {
            let u1: f64 = rng.random::<f64>().max(MIN_UNIFORM);
            let u2: f64 = rng.random::<f64>();
            let noise = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos() * noise_std;
            clamp_to_domain(v + noise)
        })
        .collect();

    debug!(len = data.len(), noise_std, "Injected gaussian noise");
    Ok(drifted)
}

/// Zero every element whose mask entry is set.
///
/// Used to simulate a feature that stops being reported for part of the
/// population (for example morning hours). Values are not clamped.
///
/// # Errors
/// `InvalidInput` if `mask` and `data` differ in length.
pub fn mask_feature(data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
    if data.len() != mask.len() {
        return Err(Error::invalid_input(format!(
            "mask length {} does not match data length {}",
            mask.len(),
            data.len()
        )));
    }

    Ok(data
        .iter()
        .zip(mask)
        .map(|(&v, &masked)| if masked { 0.0 } else { v })
        .collect())
}
