pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

// Above this many multiply-adds (non-zeros of the sparser input times the
// length of the other) convolution goes through the FFT
pub const DIRECT_CONVOLUTION_LIMIT: usize = 1 << 24;

pub const PHASER_MIN_LAYERS: usize = 1;
pub const PHASER_MAX_LAYERS: usize = 32;

pub const UNIFORM_KERNEL_LEN: usize = 1000;
pub const UNIFORM_KERNEL_HEIGHT: f64 = 0.001;

pub const GUITAR_STRINGS: [f64; 6] = [82.41, 123.47, 164.81, 207.65, 246.94, 329.64];
pub const GUITAR_STRING_AMPLITUDE: f64 = 2500.0;
