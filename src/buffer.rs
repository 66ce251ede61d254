use crate::config::DEFAULT_SAMPLE_RATE;
use crate::error::{Result, check_sample_rate, check_samples, check_seconds};

/// Mono PCM samples plus the rate they were captured at.
///
/// Always holds at least one sample and a non-zero rate; effects never
/// mutate a buffer, they hand back a fresh one of the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        check_samples(&samples)?;
        Ok(Self { samples, sample_rate })
    }

    pub fn with_default_rate(samples: Vec<f64>) -> Result<Self> {
        Self::new(samples, DEFAULT_SAMPLE_RATE)
    }

    /// New buffer at the same sample rate, e.g. the output of an effect.
    pub fn with_samples(&self, samples: Vec<f64>) -> Result<Self> {
        Self::new(samples, self.sample_rate)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// `floor(seconds * sample_rate)`, the sample count every effect uses for
/// delays and depths given in seconds.
pub fn seconds_to_samples(seconds: f64, sample_rate: u32) -> Result<usize> {
    check_sample_rate(sample_rate)?;
    check_seconds("duration", seconds)?;
    Ok((seconds * sample_rate as f64).floor() as usize)
}

/// Negative settings become 0. NaN and infinities pass through so the
/// effect rejects them when it runs.
pub fn clamp_seconds(seconds: f64) -> f64 {
    if seconds < 0.0 { 0.0 } else { seconds }
}
