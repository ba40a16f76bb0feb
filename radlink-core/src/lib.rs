//! Receiver-side DSP, framing, and payload decoding for a 4-RRC-FSK radar
//! telemetry link. No transmitter, no forward error correction, no
//! visualization: this crate turns IQ samples into decoded records and
//! stops there.

pub mod config;
pub mod crc;
pub mod errors;
pub mod framer;
pub mod frequency_plan;
pub mod logging;
pub mod payload;
pub mod radio;
pub mod receiver;
pub mod signal_processing;

pub use config::ChannelConfig;
pub use errors::{ConfigError, RadioError, RadlinkError, Result};
pub use framer::{Framer, Frame};
pub use frequency_plan::{ChannelSet, ChannelSlot, ChannelTag};
pub use payload::Record;
pub use radio::RadioSource;
pub use receiver::{CancelToken, Decoded, Receiver};
