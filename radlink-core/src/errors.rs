//! Error types for the radar link receiver core.
//!
//! Per the propagation policy: only configuration and radio-layer
//! conditions are fatal. Per-buffer DSP anomalies and per-byte framing
//! anomalies never surface as `Err` — they produce empty outputs or
//! records carrying an `error` field instead (see `payload::Record`).

use thiserror::Error;

/// Top-level error type for receiver construction and the acquisition loop.
#[derive(Debug, Error)]
pub enum RadlinkError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("radio error: {0}")]
    Radio(#[from] RadioError),
}

/// Configuration errors: fatal at startup.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid sample rate: {0} sps (must be > 0)")]
    InvalidSampleRate(u32),

    #[error("invalid symbol rate: {0} bps (must be > 0)")]
    InvalidSymbolRate(u32),

    #[error(
        "symbol rate {symbol_rate_bps} does not divide sample rate {sample_rate_sps} closely enough: \
         samples_per_symbol would be {samples_per_symbol} (must be >= 2)"
    )]
    IncompatibleRates {
        sample_rate_sps: u32,
        symbol_rate_bps: u32,
        samples_per_symbol: u32,
    },

    #[error("invalid filter bandwidth: {0} Hz (must be > 0)")]
    InvalidBandwidth(f64),

    #[error("invalid RRC alpha: {0} (must be in (0, 1])")]
    InvalidRrcAlpha(f64),

    #[error("invalid RRC tap count: {0} (must be > 0)")]
    InvalidRrcTaps(usize),

    #[error(
        "channel offset {offset_hz} Hz violates Nyquist for sample rate {sample_rate_sps} sps \
         (|offset| must be < sample_rate / 2)"
    )]
    OffsetExceedsNyquist { offset_hz: f64, sample_rate_sps: u32 },

    #[error("missing required configuration field: {0}")]
    MissingField(&'static str),
}

/// Radio-layer errors: fatal at startup or a persistent read failure.
#[derive(Debug, Error)]
pub enum RadioError {
    #[error("failed to open radio device {device}: {reason}")]
    OpenFailed { device: String, reason: String },

    #[error("persistent read error: {0}")]
    ReadFailed(String),
}

pub type Result<T> = std::result::Result<T, RadlinkError>;
