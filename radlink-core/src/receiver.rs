//! The acquisition loop: pulls IQ buffers from a `RadioSource`, runs each
//! configured channel through its `ChannelProcessor` and `Framer`, and
//! hands decoded records to the caller in the order they complete.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ChannelConfig;
use crate::errors::Result;
use crate::framer::Framer;
use crate::frequency_plan::{ChannelSet, ChannelTag};
use crate::logging::SignalLogger;
use crate::payload::{self, Record};
use crate::radio::RadioSource;
use crate::signal_processing::{ChannelProcessor, FilterKernels};

/// Cooperative cancellation signal for the acquisition loop. Cloning
/// shares the same underlying flag; there is no global mutable state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One decoded record, tagged with the channel it came from and the
/// frame's `cmd_id` prior to payload decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub channel_tag: ChannelTag,
    pub cmd_id: u16,
    pub record: Record,
}

struct Channel {
    processor: ChannelProcessor,
    framer: Framer,
    offset_hz: f64,
}

/// Owns one `ChannelProcessor` + `Framer` pair per configured channel and
/// drives them from a `RadioSource` until the source ends or cancellation
/// is requested.
pub struct Receiver {
    channels: HashMap<ChannelTag, Channel>,
    logger: SignalLogger,
}

impl Receiver {
    pub fn new(config: &ChannelConfig, channel_set: &ChannelSet, logger: SignalLogger) -> Self {
        let sample_rate_hz = config.sdr_settings.sample_rate_sps as f64;
        let sps = config.samples_per_symbol() as f64;
        let kernels = Arc::new(FilterKernels::design(
            sample_rate_hz,
            config.demodulation.filter_bandwidth_hz,
            sps,
            config.demodulation.rrc_alpha,
            config.demodulation.rrc_num_taps,
        ));

        let mut channels = HashMap::new();
        for slot in &channel_set.slots {
            let processor = ChannelProcessor::new(
                Arc::clone(&kernels),
                sample_rate_hz,
                sps,
                config.demodulation.fsk_deviation_hz,
            );
            channels.insert(
                slot.tag,
                Channel {
                    processor,
                    framer: Framer::new(slot.tag),
                    offset_hz: slot.offset_hz as f64,
                },
            );
        }

        Self { channels, logger }
    }

    /// Run the acquisition loop to completion (source exhaustion or
    /// cancellation), returning every record decoded in arrival order.
    pub fn run<S: RadioSource>(
        &mut self,
        source: &mut S,
        cancel: &CancelToken,
    ) -> Result<Vec<Decoded>> {
        source.open()?;
        let mut decoded = Vec::new();

        while !cancel.is_cancelled() {
            let Some(iq) = source.read_samples()? else {
                break;
            };

            for tag in self.ordered_tags() {
                let channel = self.channels.get_mut(&tag).expect("tag came from self.channels");
                let bits = channel.processor.process(&iq, channel.offset_hz);
                let frames = channel.framer.push_bits(&bits, &self.logger);
                for frame in frames {
                    let record = payload::parse(frame.cmd_id, &frame.payload);
                    decoded.push(Decoded {
                        channel_tag: frame.channel_tag,
                        cmd_id: frame.cmd_id,
                        record,
                    });
                }
            }
        }

        source.close()?;
        Ok(decoded)
    }

    fn ordered_tags(&self) -> Vec<ChannelTag> {
        let mut tags: Vec<ChannelTag> = self.channels.keys().copied().collect();
        tags.sort_by_key(|t| format!("{t:?}"));
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DemodulationSettings, DeviceSettings, FrequencyPlan, GameSettings, ProcessingSettings,
        SdrSettings, Team, TeamFrequencies,
    };
    use crate::frequency_plan::ChannelSlot;
    use crate::radio::NullRadioSource;

    fn test_config() -> ChannelConfig {
        ChannelConfig {
            sdr_settings: SdrSettings {
                sample_rate_sps: 2_000_000,
                gain_db: 30.0,
            },
            demodulation: DemodulationSettings {
                symbol_rate_bps: 50_000,
                fsk_deviation_hz: 37_500.0,
                filter_bandwidth_hz: 150_000.0,
                rrc_alpha: 0.25,
                rrc_num_taps: 88,
            },
            processing: ProcessingSettings::default(),
            frequencies: FrequencyPlan {
                red_team_receiving_blue: TeamFrequencies {
                    broadcast_freq: 2_400_000_000,
                    jammer_1_freq: 2_400_100_000,
                    jammer_2_freq: 2_400_200_000,
                    jammer_3_freq: 2_400_300_000,
                },
                blue_team_receiving_red: TeamFrequencies {
                    broadcast_freq: 2_410_000_000,
                    jammer_1_freq: 2_410_100_000,
                    jammer_2_freq: 2_410_200_000,
                    jammer_3_freq: 2_410_300_000,
                },
            },
            game_settings: GameSettings {
                receive_team: Team::Red,
                my_team: Team::Blue,
                target_jammer_level: 0,
            },
            device: DeviceSettings {
                driver: "test".to_string(),
                args: String::new(),
            },
        }
    }

    #[test]
    fn run_against_empty_source_returns_no_records() {
        let config = test_config();
        let channel_set = ChannelSet {
            center_freq_hz: config.frequencies.red_team_receiving_blue.broadcast_freq,
            slots: vec![ChannelSlot {
                tag: ChannelTag::Broadcast,
                offset_hz: 0,
            }],
        };
        let mut receiver = Receiver::new(&config, &channel_set, SignalLogger::silent());
        let mut source = NullRadioSource;
        let cancel = CancelToken::new();
        let decoded = receiver.run(&mut source, &cancel).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn cancellation_stops_the_loop_without_error() {
        let config = test_config();
        let channel_set = ChannelSet {
            center_freq_hz: config.frequencies.red_team_receiving_blue.broadcast_freq,
            slots: vec![ChannelSlot {
                tag: ChannelTag::Broadcast,
                offset_hz: 0,
            }],
        };
        let mut receiver = Receiver::new(&config, &channel_set, SignalLogger::silent());
        let mut source = NullRadioSource;
        let cancel = CancelToken::new();
        cancel.cancel();
        let decoded = receiver.run(&mut source, &cancel).unwrap();
        assert!(decoded.is_empty());
    }
}
