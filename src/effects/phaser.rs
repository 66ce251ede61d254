use super::AudioEffect;
use crate::buffer::AudioBuffer;
use crate::config::{PHASER_MAX_LAYERS, PHASER_MIN_LAYERS};
use crate::error::{EffectError, Result, check_sample_rate, check_samples, invalid};

/// Phase-shifts frequency bands in proportion to their centre frequency
/// across `layers` filter stages. Arguments are checked, but no band
/// algorithm exists yet, so every valid call reports `NotImplemented`.
pub fn phaser_effect(audio_in: &[f64], layers: usize, sample_rate: u32) -> Result<Vec<f64>> {
    check_samples(audio_in)?;
    check_sample_rate(sample_rate)?;
    check_layers(layers)?;
    Err(EffectError::NotImplemented("phaser"))
}

pub(crate) fn check_layers(layers: usize) -> Result<()> {
    if !(PHASER_MIN_LAYERS..=PHASER_MAX_LAYERS).contains(&layers) {
        return Err(invalid(format!(
            "phaser layers must be between {PHASER_MIN_LAYERS} and {PHASER_MAX_LAYERS} \
             (got {layers})"
        )));
    }
    Ok(())
}

pub struct PhaserEffect {
    enabled: bool,
    pub layers: usize, // 1 to 32 filter stages
}

impl PhaserEffect {
    pub fn new(layers: usize) -> Self {
        Self {
            enabled: true,
            layers: layers.clamp(PHASER_MIN_LAYERS, PHASER_MAX_LAYERS),
        }
    }

    pub fn set_layers(&mut self, layers: usize) {
        self.layers = layers.clamp(PHASER_MIN_LAYERS, PHASER_MAX_LAYERS);
    }
}

impl AudioEffect for PhaserEffect {
    fn process(&mut self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let out = phaser_effect(input.samples(), self.layers, input.sample_rate())?;
        input.with_samples(out)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn name(&self) -> &str {
        "Phaser"
    }
}
