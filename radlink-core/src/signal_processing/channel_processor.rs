//! Channel Processor — per-offset DDC, low-pass filtering, FM
//! discrimination, RRC matched filtering, symbol sampling, and 4-FSK
//! slicing to bits. Stateless across calls except for the shared,
//! immutable filter kernels.

use std::f64::consts::TAU;
use std::sync::Arc;

use num_complex::Complex64;

use super::filters::{design_lpf, design_rrc, LPF_TAPS};

/// The nominal 4-FSK levels in units of `scale`.
const LEVEL_MULTIPLIERS: [f64; 4] = [-3.0, -1.0, 1.0, 3.0];

/// Immutable kernels shared by every `ChannelProcessor` instance. Computed
/// once at startup from configuration and never mutated.
#[derive(Debug, Clone)]
pub struct FilterKernels {
    pub lpf: [f64; LPF_TAPS],
    pub rrc: Vec<f64>,
}

impl FilterKernels {
    pub fn design(sample_rate_hz: f64, bandwidth_hz: f64, sps: f64, alpha: f64, rrc_taps: usize) -> Self {
        Self {
            lpf: design_lpf(sample_rate_hz, bandwidth_hz),
            rrc: design_rrc(sps, alpha, rrc_taps),
        }
    }

    /// Combined group delay of the two linear-phase FIRs, in samples.
    pub fn group_delay(&self) -> usize {
        (self.lpf.len() - 1) / 2 + (self.rrc.len() - 1) / 2
    }
}

/// A per-offset channel processor: digital down-conversion through 4-FSK
/// bit slicing. Holds no per-call mutable state beyond the shared kernels,
/// since stage lengths are recomputed from the input length on every call.
#[derive(Debug, Clone)]
pub struct ChannelProcessor {
    kernels: Arc<FilterKernels>,
    sample_rate_hz: f64,
    sps: f64,
    fsk_deviation_hz: f64,
}

impl ChannelProcessor {
    pub fn new(
        kernels: Arc<FilterKernels>,
        sample_rate_hz: f64,
        samples_per_symbol: f64,
        fsk_deviation_hz: f64,
    ) -> Self {
        Self {
            kernels,
            sample_rate_hz,
            sps: samples_per_symbol,
            fsk_deviation_hz,
        }
    }

    /// Run the full DSP chain on one IQ buffer at the given frequency
    /// offset, returning the recovered bit stream (0/1 values, MSB-first
    /// dibits concatenated in symbol order).
    ///
    /// `f_off` must satisfy `|f_off| < sample_rate / 2`; this is enforced
    /// by configuration validation upstream, not re-checked per call.
    pub fn process(&self, iq: &[Complex64], f_off_hz: f64) -> Vec<u8> {
        if iq.is_empty() {
            return Vec::new();
        }

        let mixed = ddc(iq, f_off_hz, self.sample_rate_hz);
        let filtered = convolve_causal_complex(&mixed, &self.kernels.lpf);
        let freq = fm_discriminate(&filtered, self.sample_rate_hz);
        let matched = convolve_causal_real(&freq, &self.kernels.rrc);

        let delay = self.kernels.group_delay();
        let symbols = sample_symbols(&matched, delay, self.sps);

        let scale = estimate_scale(&symbols, self.fsk_deviation_hz);
        symbols_to_bits(&symbols, scale)
    }
}

/// Digital down-conversion: multiply by `exp(-j * 2π * (f_off/fs) * n)`.
fn ddc(iq: &[Complex64], f_off_hz: f64, sample_rate_hz: f64) -> Vec<Complex64> {
    let step = -TAU * f_off_hz / sample_rate_hz;
    iq.iter()
        .enumerate()
        .map(|(n, &sample)| sample * Complex64::from_polar(1.0, step * n as f64))
        .collect()
}

/// Causal FIR convolution over complex samples with real taps, equivalent
/// to `lfilter(taps, 1, x)` with zero initial conditions.
fn convolve_causal_complex(x: &[Complex64], h: &[f64]) -> Vec<Complex64> {
    let mut y = vec![Complex64::new(0.0, 0.0); x.len()];
    for (n, out) in y.iter_mut().enumerate() {
        let mut acc = Complex64::new(0.0, 0.0);
        let k_max = h.len().min(n + 1);
        for k in 0..k_max {
            acc += x[n - k] * h[k];
        }
        *out = acc;
    }
    y
}

/// Causal FIR convolution over real samples.
fn convolve_causal_real(x: &[f64], h: &[f64]) -> Vec<f64> {
    let mut y = vec![0.0; x.len()];
    for (n, out) in y.iter_mut().enumerate() {
        let mut acc = 0.0;
        let k_max = h.len().min(n + 1);
        for k in 0..k_max {
            acc += x[n - k] * h[k];
        }
        *out = acc;
    }
    y
}

/// FM discriminator: instantaneous frequency from modulo-2π-unwrapped
/// phase differences. Mandatory `arg(exp(j*Δ))` formulation — this is what
/// keeps the discriminator correct across phase wraparound.
///
/// Output length matches the input length: sample 0 has no predecessor to
/// difference against, so it is emitted as zero frequency rather than
/// dropped. Downstream group-delay compensation (`FilterKernels::group_delay`)
/// assumes the stage chain preserves length end to end.
fn fm_discriminate(filtered: &[Complex64], sample_rate_hz: f64) -> Vec<f64> {
    if filtered.is_empty() {
        return Vec::new();
    }

    let mut freq = Vec::with_capacity(filtered.len());
    freq.push(0.0);
    let mut prev_phase = filtered[0].arg();
    for sample in &filtered[1..] {
        let phase = sample.arg();
        let delta = phase - prev_phase;
        let wrapped = Complex64::from_polar(1.0, delta).arg();
        freq.push(wrapped * sample_rate_hz / TAU);
        prev_phase = phase;
    }
    freq
}

/// Sample the matched-filter output at the symbol rate, starting at the
/// combined group delay. Empty if the delay exceeds the sequence length.
fn sample_symbols(filtered: &[f64], delay: usize, sps: f64) -> Vec<f64> {
    if delay >= filtered.len() {
        return Vec::new();
    }

    let mut symbols = Vec::new();
    let mut idx = delay as f64;
    while (idx.round() as usize) < filtered.len() {
        symbols.push(filtered[idx.round() as usize]);
        idx += sps;
    }
    symbols
}

/// 90th-percentile-based scale estimate, falling back to the nominal FSK
/// deviation for small batches or a degenerate (non-positive) estimate.
fn estimate_scale(symbols: &[f64], fsk_deviation_hz: f64) -> f64 {
    if symbols.len() <= 10 {
        return fsk_deviation_hz;
    }

    let mut magnitudes: Vec<f64> = symbols.iter().map(|s| s.abs()).collect();
    magnitudes.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let rank = ((magnitudes.len() - 1) as f64 * 0.9).round() as usize;
    let p90 = magnitudes[rank];
    let scale = p90 / 3.0;

    if scale > 0.0 {
        scale
    } else {
        fsk_deviation_hz
    }
}

/// Slice each symbol to the nearest of the four FSK levels (ties go to the
/// lower index) and emit the corresponding dibit, MSB-first.
fn symbols_to_bits(symbols: &[f64], scale: f64) -> Vec<u8> {
    let mut bits = Vec::with_capacity(symbols.len() * 2);
    for &s in symbols {
        let mut best_idx = 0usize;
        let mut best_dist = f64::INFINITY;
        for (idx, &mult) in LEVEL_MULTIPLIERS.iter().enumerate() {
            let dist = (s - mult * scale).abs();
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
            }
        }
        bits.push(((best_idx >> 1) & 1) as u8);
        bits.push((best_idx & 1) as u8);
    }
    bits
}
