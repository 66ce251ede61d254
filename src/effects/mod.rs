pub mod chorus;
pub mod delay;
pub mod distortion;
pub mod flanger;
pub mod phaser;

use log::debug;

use crate::buffer::AudioBuffer;
use crate::error::Result;

/// A whole-buffer effect. `process` never touches its input and returns a
/// buffer of the same length and sample rate.
pub trait AudioEffect {
    fn process(&mut self, input: &AudioBuffer) -> Result<AudioBuffer>;
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn name(&self) -> &str;
}

/// Effects applied one after another, skipping the disabled ones.
#[derive(Default)]
pub struct EffectsChain {
    effects: Vec<Box<dyn AudioEffect>>,
}

impl EffectsChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Box<dyn AudioEffect>) {
        self.effects.push(effect);
    }

    pub fn with(mut self, effect: Box<dyn AudioEffect>) -> Self {
        self.push(effect);
        self
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn AudioEffect + 'static)> {
        self.effects.get_mut(index).map(|e| e.as_mut())
    }

    pub fn process(&mut self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let mut buffer = input.clone();
        for effect in self.effects.iter_mut().filter(|e| e.is_enabled()) {
            debug!("chain: applying {}", effect.name());
            buffer = effect.process(&buffer)?;
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::delay::{DelayEffect, delay_effect};
    use super::flanger::{FlangerEffect, flanger_effect};
    use super::phaser::PhaserEffect;
    use super::*;
    use crate::error::EffectError;
    use crate::oscillator::Shape;

    fn input() -> AudioBuffer {
        AudioBuffer::new((0..40).map(|i| ((i * 7) % 5) as f64 - 2.0).collect(), 10).unwrap()
    }

    #[test]
    fn empty_chain_copies_input() {
        let mut chain = EffectsChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.process(&input()).unwrap(), input());
    }

    #[test]
    fn applies_effects_in_order() {
        let mut chain = EffectsChain::new()
            .with(Box::new(DelayEffect::new(2, 0.3)))
            .with(Box::new(FlangerEffect::new(0.1, 1.0, Shape::Sine)));
        assert_eq!(chain.names(), vec!["Delay", "Flanger"]);

        let x = input();
        let echoed = delay_effect(x.samples(), 2, 0.3, 10).unwrap();
        let expected = flanger_effect(&echoed, 0.1, 1.0, Shape::Sine, 10).unwrap();
        assert_eq!(chain.process(&x).unwrap().samples(), expected.as_slice());
    }

    #[test]
    fn disabled_effects_are_skipped() {
        let mut chain = EffectsChain::new()
            .with(Box::new(PhaserEffect::new(4)))
            .with(Box::new(DelayEffect::new(0, 1.0)));
        assert!(matches!(chain.process(&input()), Err(EffectError::NotImplemented("phaser"))));

        chain.get_mut(0).unwrap().set_enabled(false);
        assert_eq!(chain.process(&input()).unwrap(), input());
    }
}
