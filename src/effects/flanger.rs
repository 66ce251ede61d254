use log::debug;

use super::AudioEffect;
use crate::buffer::{AudioBuffer, clamp_seconds};
use crate::error::{Result, check_samples};
use crate::oscillator::{Oscillator, Shape, TimeAxis};

/// `y[j] = x[j] + x[j - floor(m[j])]`, reading before the start of the
/// buffer falls back to `x[0]`.
///
/// `m` is non-negative, so the read index never passes `j` and there is no
/// upper bound to guard.
pub fn modulated_copy(audio_in: &[f64], delays: &[f64]) -> Vec<f64> {
    audio_in
        .iter()
        .zip(delays)
        .enumerate()
        .map(|(j, (&x, &m))| {
            let back = m.floor() as usize;
            let src = j.saturating_sub(back);
            x + audio_in[src]
        })
        .collect()
}

/// Flanger: the signal plus a copy of itself read back through an
/// oscillator-swept delay of up to `2 * depth_seconds`.
pub fn flanger_effect(
    audio_in: &[f64],
    depth_seconds: f64,
    sweep_hz: f64,
    shape: Shape,
    sample_rate: u32,
) -> Result<Vec<f64>> {
    flanger_effect_with(audio_in, Oscillator::new(depth_seconds, sweep_hz, shape), sample_rate)
}

pub fn flanger_effect_with(
    audio_in: &[f64],
    lfo: Oscillator,
    sample_rate: u32,
) -> Result<Vec<f64>> {
    check_samples(audio_in)?;
    let delays = lfo.generate(audio_in.len(), sample_rate)?;
    debug!(
        "flanger: depth {}s, sweep {} Hz, {} over {} samples",
        lfo.amplitude_seconds,
        lfo.frequency_hz,
        lfo.shape,
        audio_in.len()
    );
    Ok(modulated_copy(audio_in, &delays))
}

pub struct FlangerEffect {
    enabled: bool,
    pub depth_seconds: f64, // Peak delay is twice this
    pub sweep_hz: f64,
    pub shape: Shape,
    pub time_axis: TimeAxis,
}

impl FlangerEffect {
    pub fn new(depth_seconds: f64, sweep_hz: f64, shape: Shape) -> Self {
        Self {
            enabled: true,
            depth_seconds: clamp_seconds(depth_seconds),
            sweep_hz,
            shape,
            time_axis: TimeAxis::default(),
        }
    }

    pub fn set_depth_seconds(&mut self, depth_seconds: f64) {
        self.depth_seconds = clamp_seconds(depth_seconds);
    }

    pub fn set_sweep_hz(&mut self, sweep_hz: f64) {
        self.sweep_hz = sweep_hz;
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn set_time_axis(&mut self, time_axis: TimeAxis) {
        self.time_axis = time_axis;
    }

    fn oscillator(&self) -> Oscillator {
        Oscillator::new(self.depth_seconds, self.sweep_hz, self.shape)
            .with_time_axis(self.time_axis)
    }
}

impl AudioEffect for FlangerEffect {
    fn process(&mut self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let out = flanger_effect_with(input.samples(), self.oscillator(), input.sample_rate())?;
        input.with_samples(out)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn name(&self) -> &str {
        "Flanger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_doubles_the_signal() {
        let out = flanger_effect(&[1.0, 2.0, 3.0, 4.0], 0.0, 1.0, Shape::Sine, 1).unwrap();
        assert_eq!(out, vec![2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn first_sample_is_always_doubled() {
        let x: Vec<f64> = (0..300).map(|i| (i as f64 * 0.21).sin() + 0.1).collect();
        for shape in Shape::ALL {
            for depth in [0.0, 0.01, 0.2] {
                let out = flanger_effect(&x, depth, 0.7, shape, 100).unwrap();
                assert_eq!(out[0], 2.0 * x[0], "{shape} depth {depth}");
            }
        }
    }

    #[test]
    fn reads_before_the_start_clamp_to_first_sample() {
        let x = [5.0, 1.0, 2.0, 3.0];
        let out = modulated_copy(&x, &[3.0, 3.0, 3.0, 3.0]);
        assert_eq!(out, vec![10.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn fractional_delays_are_floored() {
        let x = [1.0, 10.0, 100.0, 1000.0];
        let out = modulated_copy(&x, &[0.0, 0.9, 1.99, 2.5]);
        assert_eq!(out, vec![2.0, 20.0, 110.0, 1010.0]);
    }

    #[test]
    fn preserves_length() {
        for n in [1, 3, 64, 999] {
            let x = vec![0.25; n];
            assert_eq!(flanger_effect(&x, 0.05, 2.0, Shape::Triangle, 200).unwrap().len(), n);
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert!(flanger_effect(&[], 0.01, 1.0, Shape::Saw, 100).is_err());
        assert!(flanger_effect(&[1.0], 0.01, 1.0, Shape::Saw, 0).is_err());
    }

    #[test]
    fn non_finite_depth_is_rejected_not_zeroed() {
        let input = AudioBuffer::new(vec![1.0, 2.0, 3.0], 10).unwrap();
        let mut effect = FlangerEffect::new(f64::NAN, 1.0, Shape::Sine);
        assert!(effect.process(&input).is_err());

        effect.set_depth_seconds(-1.0);
        assert_eq!(effect.process(&input).unwrap().samples(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn effect_uses_buffer_rate() {
        let input = AudioBuffer::new((0..50).map(|i| i as f64).collect(), 10).unwrap();
        let mut effect = FlangerEffect::new(0.2, 1.0, Shape::Saw);
        let out = effect.process(&input).unwrap();
        let expected = flanger_effect(input.samples(), 0.2, 1.0, Shape::Saw, 10).unwrap();
        assert_eq!(out.samples(), expected.as_slice());
    }
}
