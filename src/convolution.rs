//! Linear convolution and the trim that keeps echo effects from doubling
//! the length of a signal.

use log::trace;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use crate::config::DIRECT_CONVOLUTION_LIMIT;

/// Full linear convolution, `a.len() + b.len() - 1` points long (empty if
/// either input is empty).
///
/// The cost of the direct sum is estimated from the non-zero count of the
/// sparser input, so impulse trains stay on the exact direct path however
/// long the signal is. Dense inputs past the limit go through the FFT.
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let work = (non_zero(a).saturating_mul(b.len())).min(non_zero(b).saturating_mul(a.len()));
    if work <= DIRECT_CONVOLUTION_LIMIT {
        trace!("convolve: direct, {} x {} ({work} multiply-adds)", a.len(), b.len());
        convolve_direct(a, b)
    } else {
        trace!("convolve: fft, {} x {}", a.len(), b.len());
        convolve_fft(a, b)
    }
}

fn non_zero(x: &[f64]) -> usize {
    x.iter().filter(|&&v| v != 0.0).count()
}

pub fn convolve_direct(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    // Walk the non-zeros of the sparser side
    let (outer, inner) = if non_zero(b) < non_zero(a) { (b, a) } else { (a, b) };

    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in outer.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &h) in inner.iter().enumerate() {
            out[i + j] += x * h;
        }
    }
    out
}

pub fn convolve_fft(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let full_len = a.len() + b.len() - 1;
    let fft_size = full_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_size);
    let inverse = planner.plan_fft_inverse(fft_size);

    let mut spectrum_a = padded(a, fft_size);
    let mut spectrum_b = padded(b, fft_size);
    forward.process(&mut spectrum_a);
    forward.process(&mut spectrum_b);

    for (x, h) in spectrum_a.iter_mut().zip(&spectrum_b) {
        *x *= *h;
    }
    inverse.process(&mut spectrum_a);

    // rustfft leaves the inverse unnormalised
    let scale = 1.0 / fft_size as f64;
    spectrum_a[..full_len].iter().map(|c| c.re * scale).collect()
}

fn padded(signal: &[f64], size: usize) -> Vec<Complex<f64>> {
    let mut out = vec![Complex::new(0.0, 0.0); size];
    for (slot, &x) in out.iter_mut().zip(signal) {
        slot.re = x;
    }
    out
}

/// First `(len + 1) / 2` points of a `2n - 1` point convolution, i.e. the
/// first `n`. Not a symmetric cut: the tail is dropped, the head is kept.
pub fn trim_to_half(x: &[f64]) -> Vec<f64> {
    let half_length = (x.len() + 1) / 2;
    x[..half_length].to_vec()
}

/// First `len` points of `x` (all of it if shorter).
pub fn trim_to(x: &[f64], len: usize) -> Vec<f64> {
    x[..len.min(x.len())].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((x - y).abs() <= tol, "index {i}: {x} vs {y}");
        }
    }

    #[test]
    fn direct_matches_hand_computed() {
        let out = convolve_direct(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        assert_eq!(out, vec![0.0, 1.0, 2.5, 4.0, 1.5]);
    }

    #[test]
    fn fft_agrees_with_direct() {
        let a: Vec<f64> = (0..300).map(|i| ((i * 37 % 101) as f64 - 50.0) / 50.0).collect();
        let b: Vec<f64> = (0..300).map(|i| ((i * 11 % 23) as f64) / 23.0).collect();
        let direct = convolve_direct(&a, &b);
        let fast = convolve_fft(&a, &b);
        assert_eq!(fast.len(), 599);
        assert_close(&direct, &fast, 1e-9);
    }

    #[test]
    fn length_is_sum_minus_one() {
        for (n, m) in [(1, 1), (5, 5), (7, 3), (400, 400)] {
            assert_eq!(convolve(&vec![1.0; n], &vec![1.0; m]).len(), n + m - 1);
        }
        assert!(convolve(&[], &[1.0]).is_empty());
    }

    #[test]
    fn dense_inputs_past_the_limit_agree_across_paths() {
        let n = 4_200;
        assert!(n * n > DIRECT_CONVOLUTION_LIMIT);
        let signal: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin() + 1.5).collect();
        let kernel: Vec<f64> = (0..n).map(|k| 1.0 / (k + 1) as f64).collect();
        let out = convolve(&signal, &kernel);
        let direct = convolve_direct(&signal, &kernel);
        let scale = direct.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        assert_close(&out, &direct, 1e-9 * scale);
    }

    #[test]
    fn sparse_kernel_is_exact_on_long_signals() {
        let n = 50_000;
        let signal: Vec<f64> = (0..n).map(|i| (i as f64 * 0.013).sin()).collect();
        let mut impulse = vec![0.0; n];
        impulse[0] = 1.0;
        let out = convolve(&signal, &impulse);
        assert_eq!(&out[..n], &signal[..]);
        assert!(out[n..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn trim_keeps_first_half_and_center() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(trim_to_half(&x), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(trim_to_half(&[9.0]), vec![9.0]);
    }

    #[test]
    fn trim_after_convolving_equal_lengths_restores_length() {
        let a = [0.5, -1.0, 2.0, 0.0, 3.0];
        let b = [1.0, 0.0, 0.25, 0.0, 0.0];
        assert_eq!(trim_to_half(&convolve(&a, &b)).len(), a.len());
    }

    #[test]
    fn trim_to_clamps() {
        assert_eq!(trim_to(&[1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
        assert_eq!(trim_to(&[1.0], 4), vec![1.0]);
    }
}
