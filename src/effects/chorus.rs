//! Chorus: several flanger voices, each swept at its own rate, mixed back
//! with the dry signal.

use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use super::AudioEffect;
use super::flanger::flanger_effect_with;
use crate::buffer::{AudioBuffer, clamp_seconds};
use crate::error::{EffectError, Result, check_sample_rate, check_samples, check_seconds, invalid};
use crate::oscillator::{Oscillator, Shape, TimeAxis, linspace};

/// How each voice gets its sweep rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChorusMode {
    /// Sweeps spread evenly over `[0, max_sweep]` Hz.
    Deterministic { max_sweep: f64 },
    /// Sweeps drawn independently from `N(mean, std_dev)` Hz.
    Gaussian { mean: f64, std_dev: f64 },
}

impl ChorusMode {
    /// Builds a mode from its token and positional parameters, as a parameter
    /// surface would hand them over: `deterministic [max_sweep]` or
    /// `gaussian [mean, std_dev]`.
    pub fn from_token(token: &str, params: &[f64]) -> Result<Self> {
        let expected = match token {
            "deterministic" => 1,
            "gaussian" => 2,
            other => {
                return Err(invalid(format!(
                    "unknown chorus mode '{other}', expected deterministic or gaussian"
                )));
            }
        };
        if params.len() < expected {
            let names = if expected == 1 { "max_sweep" } else { "mean and std_dev" };
            return Err(EffectError::MissingParameter(format!("{token} chorus needs {names}")));
        }
        if params.len() > expected {
            return Err(invalid(format!(
                "{token} chorus takes {expected} parameter(s), got {}",
                params.len()
            )));
        }

        let mode = if expected == 1 {
            ChorusMode::Deterministic { max_sweep: params[0] }
        } else {
            ChorusMode::Gaussian { mean: params[0], std_dev: params[1] }
        };
        mode.validate()?;
        Ok(mode)
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            ChorusMode::Deterministic { max_sweep } if !max_sweep.is_finite() => {
                Err(invalid(format!("max_sweep must be finite (got {max_sweep})")))
            }
            ChorusMode::Gaussian { mean, std_dev }
                if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 =>
            {
                Err(invalid(format!(
                    "gaussian sweep needs a finite mean and a finite, non-negative std_dev \
                     (got {mean}, {std_dev})"
                )))
            }
            _ => Ok(()),
        }
    }

    /// One sweep rate per voice.
    pub fn sweeps<R: Rng + ?Sized>(&self, voices: usize, rng: &mut R) -> Result<Vec<f64>> {
        self.validate()?;
        match *self {
            ChorusMode::Deterministic { max_sweep } => Ok(linspace(0.0, max_sweep, voices)),
            ChorusMode::Gaussian { mean, std_dev } => {
                let normal = Normal::new(mean, std_dev).map_err(|e| invalid(e.to_string()))?;
                Ok((0..voices).map(|_| normal.sample(rng)).collect())
            }
        }
    }
}

/// How the voices are folded into one output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CombinePolicy {
    /// Mean of the dry signal and every voice.
    #[default]
    Mean,
    /// Only the last voice survives, each voice overwriting the previous one.
    LastVoice,
}

/// Renders one flanger voice per sweep (in parallel) and folds them together.
pub fn combine_voices(
    audio_in: &[f64],
    depth: Oscillator,
    sweeps: &[f64],
    sample_rate: u32,
    policy: CombinePolicy,
) -> Result<Vec<f64>> {
    check_samples(audio_in)?;
    if sweeps.is_empty() {
        return Err(invalid("chorus needs at least one voice"));
    }

    let mut copies = sweeps
        .par_iter()
        .map(|&sweep| {
            let lfo = Oscillator { frequency_hz: sweep, ..depth };
            flanger_effect_with(audio_in, lfo, sample_rate)
        })
        .collect::<Result<Vec<_>>>()?;

    match policy {
        CombinePolicy::LastVoice => Ok(copies.pop().unwrap_or_default()),
        CombinePolicy::Mean => {
            let mut out = audio_in.to_vec();
            for copy in &copies {
                for (y, c) in out.iter_mut().zip(copy) {
                    *y += c;
                }
            }
            let scale = 1.0 / (copies.len() + 1) as f64;
            out.iter_mut().for_each(|y| *y *= scale);
            Ok(out)
        }
    }
}

/// Chorus with the mean combination and the whole-seconds oscillator axis.
pub fn chorus_effect<R: Rng + ?Sized>(
    audio_in: &[f64],
    voices: usize,
    mode: ChorusMode,
    depth_seconds: f64,
    shape: Shape,
    sample_rate: u32,
    rng: &mut R,
) -> Result<Vec<f64>> {
    ChorusSettings::new(voices, mode, depth_seconds, shape).render(audio_in, sample_rate, rng)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChorusSettings {
    pub voices: usize,
    pub mode: ChorusMode,
    pub depth_seconds: f64,
    pub shape: Shape,
    pub policy: CombinePolicy,
    pub time_axis: TimeAxis,
}

impl ChorusSettings {
    pub fn new(voices: usize, mode: ChorusMode, depth_seconds: f64, shape: Shape) -> Self {
        Self {
            voices,
            mode,
            depth_seconds,
            shape,
            policy: CombinePolicy::default(),
            time_axis: TimeAxis::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.voices == 0 {
            return Err(invalid("chorus needs at least one voice"));
        }
        check_seconds("chorus depth", self.depth_seconds)?;
        self.mode.validate()
    }

    pub fn render<R: Rng + ?Sized>(
        &self,
        audio_in: &[f64],
        sample_rate: u32,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        check_samples(audio_in)?;
        check_sample_rate(sample_rate)?;
        self.validate()?;

        let sweeps = self.mode.sweeps(self.voices, rng)?;
        debug!(
            "chorus: {} voices, depth {}s, {}, sweeps {:?} ({:?})",
            self.voices, self.depth_seconds, self.shape, sweeps, self.policy
        );
        let depth =
            Oscillator::new(self.depth_seconds, 0.0, self.shape).with_time_axis(self.time_axis);
        combine_voices(audio_in, depth, &sweeps, sample_rate, self.policy)
    }
}

/// Chorus as a chain effect, owning the random source for gaussian sweeps.
pub struct ChorusEffect<R> {
    enabled: bool,
    pub settings: ChorusSettings,
    rng: R,
}

impl<R: Rng> ChorusEffect<R> {
    pub fn new(settings: ChorusSettings, rng: R) -> Self {
        Self {
            enabled: true,
            settings,
            rng,
        }
    }

    pub fn set_voices(&mut self, voices: usize) {
        self.settings.voices = voices.max(1);
    }

    pub fn set_depth_seconds(&mut self, depth_seconds: f64) {
        self.settings.depth_seconds = clamp_seconds(depth_seconds);
    }

    pub fn set_mode(&mut self, mode: ChorusMode) {
        self.settings.mode = mode;
    }

    pub fn set_policy(&mut self, policy: CombinePolicy) {
        self.settings.policy = policy;
    }
}

impl<R: Rng> AudioEffect for ChorusEffect<R> {
    fn process(&mut self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let out = self.settings.render(input.samples(), input.sample_rate(), &mut self.rng)?;
        input.with_samples(out)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn name(&self) -> &str {
        "Chorus"
    }
}
