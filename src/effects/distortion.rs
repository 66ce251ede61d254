use log::debug;

use super::AudioEffect;
use crate::buffer::AudioBuffer;
use crate::config::{UNIFORM_KERNEL_HEIGHT, UNIFORM_KERNEL_LEN};
use crate::convolution::{convolve, trim_to};
use crate::error::{Result, check_samples};

/// Smears the signal against a flat 1000-tap kernel (a running sum scaled
/// by 0.001), keeping the original length.
pub fn uniform_distortion(audio_in: &[f64]) -> Result<Vec<f64>> {
    check_samples(audio_in)?;
    debug!("uniform distortion: {} samples, {UNIFORM_KERNEL_LEN}-tap kernel", audio_in.len());
    let kernel = [UNIFORM_KERNEL_HEIGHT; UNIFORM_KERNEL_LEN];
    Ok(trim_to(&convolve(audio_in, &kernel), audio_in.len()))
}

pub struct UniformDistortion {
    enabled: bool,
}

impl UniformDistortion {
    pub fn new() -> Self {
        Self { enabled: true }
    }
}

impl Default for UniformDistortion {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEffect for UniformDistortion {
    fn process(&mut self, input: &AudioBuffer) -> Result<AudioBuffer> {
        input.with_samples(uniform_distortion(input.samples())?)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn name(&self) -> &str {
        "Uniform distortion"
    }
}
