//! Configuration types for the radar link receiver.
//!
//! Mirrors the key/value document described in the external interfaces:
//! `sdr_settings`, `demodulation`, `processing`, `frequencies`,
//! `game_settings`, and `device`. Values are immutable once constructed;
//! `ChannelConfig::validate` is the single gate between a raw document and
//! a receiver that is allowed to run.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

fn default_rrc_alpha() -> f64 {
    0.25
}

fn default_rrc_num_taps() -> usize {
    88
}

fn default_buffer_size() -> usize {
    16_384
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SdrSettings {
    pub sample_rate_sps: u32,
    pub gain_db: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemodulationSettings {
    pub symbol_rate_bps: u32,
    pub fsk_deviation_hz: f64,
    pub filter_bandwidth_hz: f64,
    #[serde(default = "default_rrc_alpha")]
    pub rrc_alpha: f64,
    #[serde(default = "default_rrc_num_taps")]
    pub rrc_num_taps: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSettings {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    #[serde(default)]
    pub enable_jammer: bool,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            enable_jammer: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFrequencies {
    pub broadcast_freq: u64,
    pub jammer_1_freq: u64,
    pub jammer_2_freq: u64,
    pub jammer_3_freq: u64,
}

impl TeamFrequencies {
    /// Jammer frequency for level 1..=3, or `None` for level 0 (disabled).
    pub fn jammer_freq(&self, level: u8) -> Option<u64> {
        match level {
            0 => None,
            1 => Some(self.jammer_1_freq),
            2 => Some(self.jammer_2_freq),
            3 => Some(self.jammer_3_freq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyPlan {
    pub red_team_receiving_blue: TeamFrequencies,
    pub blue_team_receiving_red: TeamFrequencies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub receive_team: Team,
    pub my_team: Team,
    pub target_jammer_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    pub driver: String,
    #[serde(default)]
    pub args: String,
}

/// The full, validated configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub sdr_settings: SdrSettings,
    pub demodulation: DemodulationSettings,
    #[serde(default)]
    pub processing: ProcessingSettings,
    pub frequencies: FrequencyPlan,
    pub game_settings: GameSettings,
    pub device: DeviceSettings,
}

impl ChannelConfig {
    /// Samples per symbol, rounded to the nearest integer.
    pub fn samples_per_symbol(&self) -> u32 {
        let sps = self.sdr_settings.sample_rate_sps as f64;
        let bps = self.demodulation.symbol_rate_bps as f64;
        (sps / bps).round() as u32
    }

    /// Validate numeric contracts; fatal at startup on failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sample_rate = self.sdr_settings.sample_rate_sps;
        if sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }

        let symbol_rate = self.demodulation.symbol_rate_bps;
        if symbol_rate == 0 {
            return Err(ConfigError::InvalidSymbolRate(symbol_rate));
        }

        let samples_per_symbol = self.samples_per_symbol();
        if samples_per_symbol < 2 {
            return Err(ConfigError::IncompatibleRates {
                sample_rate_sps: sample_rate,
                symbol_rate_bps: symbol_rate,
                samples_per_symbol,
            });
        }

        if self.demodulation.filter_bandwidth_hz <= 0.0 {
            return Err(ConfigError::InvalidBandwidth(
                self.demodulation.filter_bandwidth_hz,
            ));
        }

        let alpha = self.demodulation.rrc_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::InvalidRrcAlpha(alpha));
        }

        if self.demodulation.rrc_num_taps == 0 {
            return Err(ConfigError::InvalidRrcTaps(self.demodulation.rrc_num_taps));
        }

        Ok(())
    }
}
