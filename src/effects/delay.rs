use log::{debug, warn};

use super::AudioEffect;
use crate::buffer::{AudioBuffer, clamp_seconds, seconds_to_samples};
use crate::convolution::{convolve, trim_to_half};
use crate::error::{Result, check_samples};

/// What happens when two echo taps land on the same comb index, which only
/// occurs for a zero-sample delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TapPolicy {
    /// Later taps replace earlier ones (the historical behaviour).
    #[default]
    Overwrite,
    /// Colliding taps add up.
    Accumulate,
}

/// Decaying Dirac comb: tap `j` sits at `j * delay_samples` with height
/// `exp(-j)`. Taps at or past `len` are dropped.
pub fn build_comb(len: usize, echoes: usize, delay_samples: usize, policy: TapPolicy) -> Vec<f64> {
    let mut comb = vec![0.0; len];
    if len == 0 {
        return comb;
    }

    // Every tap lands on index 0
    if delay_samples == 0 {
        comb[0] = match policy {
            TapPolicy::Overwrite => (-(echoes as f64)).exp(),
            TapPolicy::Accumulate => (0..=echoes)
                .map(|j| (-(j as f64)).exp())
                .take_while(|&height| height > 0.0)
                .sum(),
        };
        if echoes > 0 && policy == TapPolicy::Overwrite {
            warn!("delay: {echoes} echo taps collided on sample 0 and were overwritten");
        }
        return comb;
    }

    for j in 0..=echoes {
        let index = match j.checked_mul(delay_samples) {
            Some(index) if index < len => index,
            _ => {
                // j >= 1 here, tap 0 always fits
                let dropped = echoes - j + 1;
                warn!(
                    "delay: {dropped} of {} echo taps fall past the end of a {len}-sample buffer \
                     and were dropped",
                    echoes.saturating_add(1)
                );
                break;
            }
        };
        comb[index] = (-(j as f64)).exp();
    }
    comb
}

/// Adds `echoes` decaying echoes spaced `delay_seconds` apart without
/// changing the length of the signal.
pub fn delay_effect(
    audio_in: &[f64],
    echoes: usize,
    delay_seconds: f64,
    sample_rate: u32,
) -> Result<Vec<f64>> {
    delay_effect_with(audio_in, echoes, delay_seconds, sample_rate, TapPolicy::Overwrite)
}

pub fn delay_effect_with(
    audio_in: &[f64],
    echoes: usize,
    delay_seconds: f64,
    sample_rate: u32,
    policy: TapPolicy,
) -> Result<Vec<f64>> {
    check_samples(audio_in)?;
    let delay_samples = seconds_to_samples(delay_seconds, sample_rate)?;
    debug!("delay: {echoes} echoes every {delay_samples} samples ({policy:?})");

    let comb = build_comb(audio_in.len(), echoes, delay_samples, policy);
    Ok(trim_to_half(&convolve(audio_in, &comb)))
}

pub struct DelayEffect {
    enabled: bool,
    pub echoes: usize,
    pub delay_seconds: f64, // Spacing between echoes
    pub policy: TapPolicy,
}

impl DelayEffect {
    pub fn new(echoes: usize, delay_seconds: f64) -> Self {
        Self {
            enabled: true,
            echoes,
            delay_seconds: clamp_seconds(delay_seconds),
            policy: TapPolicy::default(),
        }
    }

    pub fn set_echoes(&mut self, echoes: usize) {
        self.echoes = echoes;
    }

    pub fn set_delay_seconds(&mut self, delay_seconds: f64) {
        self.delay_seconds = clamp_seconds(delay_seconds);
    }

    pub fn set_policy(&mut self, policy: TapPolicy) {
        self.policy = policy;
    }
}

impl AudioEffect for DelayEffect {
    fn process(&mut self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let out = delay_effect_with(
            input.samples(),
            self.echoes,
            self.delay_seconds,
            input.sample_rate(),
            self.policy,
        )?;
        input.with_samples(out)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn name(&self) -> &str {
        "Delay"
    }
}
