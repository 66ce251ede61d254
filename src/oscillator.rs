//! Low-frequency control signals for the time-varying delay effects.
//!
//! Every shape is evaluated as `amplitude + amplitude * wave(2π·t·f)` with
//! `amplitude` in whole samples, so the output is a non-negative delay in
//! samples bounded by `2 * amplitude`.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::buffer::seconds_to_samples;
use crate::error::{EffectError, Result, check_sample_rate, invalid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Sine,
    Triangle,
    Saw,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Sine, Shape::Triangle, Shape::Saw];

    /// One period over `[0, 2π)`, ranging over `[-1, 1]`.
    pub fn wave(self, x: f64) -> f64 {
        let phase = x.rem_euclid(TAU) / TAU;
        match self {
            Shape::Sine => x.sin(),
            // Peak at the middle of the period
            Shape::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
            Shape::Saw => 2.0 * phase - 1.0,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Shape::Sine => "sin",
            Shape::Triangle => "triangle",
            Shape::Saw => "saw",
        }
    }
}

impl FromStr for Shape {
    type Err = EffectError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "sin" => Ok(Shape::Sine),
            "triangle" => Ok(Shape::Triangle),
            "saw" => Ok(Shape::Saw),
            other => Err(invalid(format!(
                "unknown oscillator shape '{other}', expected one of sin, triangle, saw"
            ))),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// How the sample-time axis is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeAxis {
    /// `length / sample_rate` floored to whole seconds, then spread over all
    /// samples. Buffers that are not a whole number of seconds long run the
    /// oscillator slightly fast (or frozen, for buffers under one second).
    #[default]
    WholeSeconds,
    /// True elapsed time, `length as f64 / sample_rate`.
    Elapsed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    pub amplitude_seconds: f64,
    pub frequency_hz: f64,
    pub shape: Shape,
    pub time_axis: TimeAxis,
}

impl Oscillator {
    pub fn new(amplitude_seconds: f64, frequency_hz: f64, shape: Shape) -> Self {
        Self {
            amplitude_seconds,
            frequency_hz,
            shape,
            time_axis: TimeAxis::default(),
        }
    }

    pub fn with_time_axis(mut self, time_axis: TimeAxis) -> Self {
        self.time_axis = time_axis;
        self
    }

    pub fn generate(&self, length: usize, sample_rate: u32) -> Result<Vec<f64>> {
        check_sample_rate(sample_rate)?;
        if length == 0 {
            return Err(invalid("oscillator length must be at least one sample"));
        }
        if !self.frequency_hz.is_finite() {
            return Err(invalid(format!(
                "oscillator frequency must be finite (got {})",
                self.frequency_hz
            )));
        }
        let amplitude = seconds_to_samples(self.amplitude_seconds, sample_rate)? as f64;

        let duration = match self.time_axis {
            TimeAxis::WholeSeconds => (length / sample_rate as usize) as f64,
            TimeAxis::Elapsed => length as f64 / sample_rate as f64,
        };
        debug!(
            "oscillator: {} at {} Hz, amplitude {} samples, {} samples over {}s",
            self.shape, self.frequency_hz, amplitude, length, duration
        );

        let omega = TAU * self.frequency_hz;
        Ok(linspace(0.0, duration, length)
            .into_iter()
            .map(|t| amplitude + amplitude * self.shape.wave(omega * t))
            .collect())
    }
}

/// Per-sample delay (in samples) for a `length`-sample buffer, on the whole
/// seconds time axis.
pub fn generate(
    amplitude_seconds: f64,
    frequency_hz: f64,
    shape: Shape,
    length: usize,
    sample_rate: u32,
) -> Result<Vec<f64>> {
    Oscillator::new(amplitude_seconds, frequency_hz, shape).generate(length, sample_rate)
}

/// `count` evenly spaced points from `start` to `stop`, both ends included.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shape_tokens() {
        assert_eq!("sin".parse::<Shape>().unwrap(), Shape::Sine);
        assert_eq!("triangle".parse::<Shape>().unwrap(), Shape::Triangle);
        assert_eq!("saw".parse::<Shape>().unwrap(), Shape::Saw);
        assert!(matches!("square".parse::<Shape>(), Err(EffectError::InvalidArgument(_))));
        for shape in Shape::ALL {
            assert_eq!(shape.token().parse::<Shape>().unwrap(), shape);
        }
    }

    #[test]
    fn wave_landmarks() {
        let tri = Shape::Triangle;
        assert_eq!(tri.wave(0.0), -1.0);
        assert!((tri.wave(TAU / 2.0) - 1.0).abs() < 1e-12);
        assert!(tri.wave(TAU / 4.0).abs() < 1e-12);

        let saw = Shape::Saw;
        assert_eq!(saw.wave(0.0), -1.0);
        assert!(saw.wave(TAU / 2.0).abs() < 1e-12);
        assert!(saw.wave(TAU * 0.75) > saw.wave(TAU * 0.25));
    }

    #[test]
    fn output_stays_within_zero_and_twice_amplitude() {
        let sample_rate = 1_000;
        let amplitude = seconds_to_samples(0.0037, sample_rate).unwrap() as f64;
        assert_eq!(amplitude, 3.0);

        for shape in Shape::ALL {
            for axis in [TimeAxis::WholeSeconds, TimeAxis::Elapsed] {
                let lfo = Oscillator::new(0.0037, 3.3, shape).with_time_axis(axis);
                let values = lfo.generate(2_500, sample_rate).unwrap();
                assert_eq!(values.len(), 2_500);
                assert!(values.iter().all(|&m| (0.0..=2.0 * amplitude).contains(&m)), "{shape}");
            }
        }
    }

    #[test]
    fn zero_amplitude_is_flat() {
        let values = generate(0.0, 5.0, Shape::Sine, 64, 16).unwrap();
        assert!(values.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn whole_seconds_axis_truncates_duration() {
        // 1.5 s of audio is treated as 1 s: the middle sample sits at t = 0.5 s
        let saw = generate(1.0, 1.0, Shape::Saw, 15, 10).unwrap();
        assert_eq!(saw[0], 0.0);
        assert!((saw[7] - 10.0).abs() < 1e-9);

        let elapsed = Oscillator::new(1.0, 1.0, Shape::Saw)
            .with_time_axis(TimeAxis::Elapsed)
            .generate(15, 10)
            .unwrap();
        // Middle sample at t = 0.75 s, last at t = 1.5 s
        assert!((elapsed[7] - 15.0).abs() < 1e-9);
        assert!((elapsed[14] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn sub_second_buffer_freezes_on_whole_seconds_axis() {
        let values = generate(0.5, 2.0, Shape::Triangle, 5, 10).unwrap();
        assert!(values.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(generate(0.1, 1.0, Shape::Sine, 0, 10).is_err());
        assert!(generate(0.1, 1.0, Shape::Sine, 10, 0).is_err());
        assert!(generate(-0.1, 1.0, Shape::Sine, 10, 10).is_err());
        assert!(generate(0.1, f64::NAN, Shape::Sine, 10, 10).is_err());
    }

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
