//! Guitar-pedal style effects over fully buffered mono PCM.
//!
//! Every effect takes a complete signal and returns a new one of the same
//! length: echo by convolution with a decaying Dirac comb, flanger and
//! chorus by reading the signal back through oscillator-swept delays.
//!
//! ```
//! use pedalfx::effects::delay::delay_effect;
//!
//! let out = delay_effect(&[1.0, 0.0, 0.0, 0.0, 0.0], 1, 1.0, 1).unwrap();
//! assert_eq!(out.len(), 5);
//! assert!((out[1] - (-1.0_f64).exp()).abs() < 1e-12);
//! ```

pub mod buffer;
pub mod config;
pub mod convolution;
pub mod effects;
pub mod error;
pub mod oscillator;
pub mod params;
pub mod signal;

pub use buffer::AudioBuffer;
pub use effects::chorus::{ChorusMode, CombinePolicy, chorus_effect};
pub use effects::delay::{TapPolicy, delay_effect};
pub use effects::flanger::flanger_effect;
pub use effects::phaser::phaser_effect;
pub use effects::{AudioEffect, EffectsChain};
pub use error::{EffectError, Result};
pub use oscillator::{Oscillator, Shape, TimeAxis};
pub use params::EffectParameters;
