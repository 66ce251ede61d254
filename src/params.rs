//! Effect settings as a parameter surface hands them over, turned into chain
//! effects.

use rand::Rng;

use crate::effects::AudioEffect;
use crate::effects::chorus::{ChorusEffect, ChorusSettings};
use crate::effects::delay::{DelayEffect, TapPolicy};
use crate::effects::distortion::UniformDistortion;
use crate::effects::flanger::FlangerEffect;
use crate::effects::phaser::{PhaserEffect, check_layers};
use crate::error::{Result, check_seconds, invalid};
use crate::oscillator::Shape;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectParameters {
    Delay { echoes: usize, delay_seconds: f64, policy: TapPolicy },
    Flanger { depth_seconds: f64, sweep_hz: f64, shape: Shape },
    Chorus(ChorusSettings),
    Phaser { layers: usize },
    UniformDistortion,
}

impl EffectParameters {
    pub fn validate(&self) -> Result<()> {
        match *self {
            EffectParameters::Delay { delay_seconds, .. } => check_seconds("delay", delay_seconds),
            EffectParameters::Flanger { depth_seconds, sweep_hz, .. } => {
                check_seconds("flanger depth", depth_seconds)?;
                if !sweep_hz.is_finite() {
                    return Err(invalid(format!("flanger sweep must be finite (got {sweep_hz})")));
                }
                Ok(())
            }
            EffectParameters::Chorus(settings) => settings.validate(),
            EffectParameters::Phaser { layers } => check_layers(layers),
            EffectParameters::UniformDistortion => Ok(()),
        }
    }

    /// Checks the settings and builds the effect. `rng` is only kept by the
    /// chorus, which needs it for gaussian sweeps.
    pub fn into_effect<R: Rng + 'static>(self, rng: R) -> Result<Box<dyn AudioEffect>> {
        self.validate()?;
        Ok(match self {
            EffectParameters::Delay { echoes, delay_seconds, policy } => {
                let mut delay = DelayEffect::new(echoes, delay_seconds);
                delay.set_policy(policy);
                Box::new(delay)
            }
            EffectParameters::Flanger { depth_seconds, sweep_hz, shape } => {
                Box::new(FlangerEffect::new(depth_seconds, sweep_hz, shape))
            }
            EffectParameters::Chorus(settings) => Box::new(ChorusEffect::new(settings, rng)),
            EffectParameters::Phaser { layers } => Box::new(PhaserEffect::new(layers)),
            EffectParameters::UniformDistortion => Box::new(UniformDistortion::new()),
        })
    }
}
