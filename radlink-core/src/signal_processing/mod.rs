//! DSP chain: filter design plus the per-channel processor built from it.

pub mod channel_processor;
pub mod filters;

pub use channel_processor::{ChannelProcessor, FilterKernels};
pub use filters::{design_lpf, design_rrc, LPF_TAPS};
