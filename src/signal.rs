//! Test tones and simple level measurements.

use std::f64::consts::TAU;

use crate::buffer::AudioBuffer;
use crate::config::{GUITAR_STRING_AMPLITUDE, GUITAR_STRINGS};
use crate::error::{Result, check_sample_rate, invalid};
use crate::oscillator::linspace;

/// Open-string guitar chord (E2 A2 E3 G#3 B3 E4) as summed cosines, each
/// at an amplitude of 2500, `duration_seconds` long.
pub fn guitar_chord(sample_rate: u32, duration_seconds: u32) -> Result<AudioBuffer> {
    check_sample_rate(sample_rate)?;
    let length = sample_rate as usize * duration_seconds as usize;
    if length == 0 {
        return Err(invalid("guitar chord needs a duration of at least one second"));
    }

    let times = linspace(0.0, duration_seconds as f64, length);
    let waveform = times
        .iter()
        .map(|&t| {
            GUITAR_STRINGS
                .iter()
                .map(|&f| GUITAR_STRING_AMPLITUDE * (t * f * TAU).cos())
                .sum::<f64>()
        })
        .collect();
    AudioBuffer::new(waveform, sample_rate)
}

pub fn sine(frequency_hz: f64, length: usize, sample_rate: u32) -> Result<AudioBuffer> {
    check_sample_rate(sample_rate)?;
    let samples = (0..length)
        .map(|i| (TAU * frequency_hz * i as f64 / sample_rate as f64).sin())
        .collect();
    AudioBuffer::new(samples, sample_rate)
}

/// Unit impulse at index 0.
pub fn impulse(length: usize, sample_rate: u32) -> Result<AudioBuffer> {
    let mut samples = vec![0.0; length];
    if let Some(first) = samples.first_mut() {
        *first = 1.0;
    }
    AudioBuffer::new(samples, sample_rate)
}

pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|x| x * x).sum::<f64>() / samples.len() as f64).sqrt()
}

pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0, |m, x| m.max(x.abs()))
}
