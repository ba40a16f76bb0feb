//! Filter Designer — pure functions producing the low-pass and root-raised-
//! cosine FIR kernels from configuration. Run once at startup; the
//! resulting kernels are immutable and shared across every channel.

use std::f64::consts::PI;

/// Number of taps in the low-pass kernel. Fixed by the wire/DSP contract:
/// downstream delay compensation assumes this exact length.
pub const LPF_TAPS: usize = 101;

/// Windowed-sinc FIR low-pass filter, Hamming window, DC gain ≈ 1.
///
/// `cutoff_hz` is the target two-sided filter bandwidth; the -3 dB point
/// used for the sinc design is `cutoff_hz / 2`, normalized against the
/// Nyquist rate `sample_rate_hz / 2` as `(cutoff_hz / 2) / sample_rate_hz`.
pub fn design_lpf(sample_rate_hz: f64, bandwidth_hz: f64) -> [f64; LPF_TAPS] {
    let n = LPF_TAPS;
    let m = (n - 1) as f64 / 2.0;
    let fc = (bandwidth_hz / 2.0) / sample_rate_hz;

    let mut taps = [0.0f64; LPF_TAPS];
    for (i, tap) in taps.iter_mut().enumerate() {
        let k = i as f64 - m;
        let sinc = if k == 0.0 {
            2.0 * fc
        } else {
            (2.0 * PI * fc * k).sin() / (PI * k)
        };
        let window = 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos();
        *tap = sinc * window;
    }

    let sum: f64 = taps.iter().sum();
    if sum.abs() > 1e-12 {
        for tap in taps.iter_mut() {
            *tap /= sum;
        }
    }

    taps
}

/// Closed-form root-raised-cosine impulse response, sum-normalized.
///
/// `sps` is samples per symbol (the kernel's time axis is symbol-normalized
/// at this rate). Tap indexing matches the spec exactly: for odd
/// `num_taps`, `t` ranges over `{-M, ..., M} / sps` with `M = num_taps/2`;
/// for even `num_taps`, `t` ranges over `{-M+0.5, ..., M-0.5} / sps` with
/// the same `M`. This must not drift, because downstream group-delay
/// compensation assumes a linear-phase response of exactly this shape.
pub fn design_rrc(sps: f64, alpha: f64, num_taps: usize) -> Vec<f64> {
    let m = (num_taps / 2) as f64;
    let offset = if num_taps % 2 == 0 { 0.5 } else { 0.0 };

    let mut taps = vec![0.0f64; num_taps];
    for (i, tap) in taps.iter_mut().enumerate() {
        let k = if num_taps % 2 == 0 {
            i as f64 - (m - 1.0) - offset
        } else {
            i as f64 - m
        };
        let t = k / sps;
        *tap = rrc_sample(t, alpha);
    }

    let sum: f64 = taps.iter().sum();
    if sum.abs() > 1e-12 {
        for tap in taps.iter_mut() {
            *tap /= sum;
        }
    }

    taps
}

fn rrc_sample(t: f64, alpha: f64) -> f64 {
    if t.abs() < 1e-10 {
        return 1.0 - alpha + 4.0 * alpha / PI;
    }

    if alpha != 0.0 && (t.abs() - 1.0 / (4.0 * alpha)).abs() < 1e-10 {
        let quarter = PI / (4.0 * alpha);
        return (alpha / std::f64::consts::SQRT_2)
            * ((1.0 + 2.0 / PI) * quarter.sin() + (1.0 - 2.0 / PI) * quarter.cos());
    }

    let numerator = (PI * t * (1.0 - alpha)).sin() + 4.0 * alpha * t * (PI * t * (1.0 + alpha)).cos();
    let denominator = PI * t * (1.0 - (4.0 * alpha * t).powi(2));
    numerator / denominator
}
