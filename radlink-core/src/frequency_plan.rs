//! Derivation of the per-channel center frequency and offsets.
//!
//! Not core DSP logic — listed in the external interfaces for
//! completeness — but the acquisition loop needs it to know how many
//! `ChannelProcessor` + `Framer` pairs to run and at what offset from the
//! tuned center frequency.

use crate::config::{FrequencyPlan, GameSettings, ProcessingSettings, Team, TeamFrequencies};

/// A single channel to demodulate: its role and its offset in Hz from the
/// tuned center frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSlot {
    pub tag: ChannelTag,
    pub offset_hz: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelTag {
    Broadcast,
    Jammer,
}

/// The resolved center frequency plus the channels to process at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet {
    pub center_freq_hz: u64,
    pub slots: Vec<ChannelSlot>,
}

impl FrequencyPlan {
    fn team_frequencies(&self, team: Team) -> TeamFrequencies {
        match team {
            Team::Red => self.red_team_receiving_blue,
            Team::Blue => self.blue_team_receiving_red,
        }
    }

    /// Resolve the center frequency and channel offsets for the configured
    /// receive team and jammer level.
    ///
    /// When jamming is disabled (level 0) or the processing settings
    /// disable the jammer channel, broadcast and jammer offsets coincide
    /// and only a single channel is processed.
    pub fn channel_offsets(
        &self,
        game: &GameSettings,
        processing: &ProcessingSettings,
    ) -> ChannelSet {
        let freqs = self.team_frequencies(game.receive_team);
        let broadcast = freqs.broadcast_freq;
        let jammer = if processing.enable_jammer {
            freqs.jammer_freq(game.target_jammer_level)
        } else {
            None
        };

        match jammer {
            None => ChannelSet {
                center_freq_hz: broadcast,
                slots: vec![ChannelSlot {
                    tag: ChannelTag::Broadcast,
                    offset_hz: 0,
                }],
            },
            Some(jammer_freq) => {
                let center = (broadcast + jammer_freq) / 2;
                ChannelSet {
                    center_freq_hz: center,
                    slots: vec![
                        ChannelSlot {
                            tag: ChannelTag::Broadcast,
                            offset_hz: broadcast as i64 - center as i64,
                        },
                        ChannelSlot {
                            tag: ChannelTag::Jammer,
                            offset_hz: jammer_freq as i64 - center as i64,
                        },
                    ],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TeamFrequencies;

    fn plan() -> FrequencyPlan {
        FrequencyPlan {
            red_team_receiving_blue: TeamFrequencies {
                broadcast_freq: 2_400_000_000,
                jammer_1_freq: 2_400_200_000,
                jammer_2_freq: 2_400_400_000,
                jammer_3_freq: 2_400_600_000,
            },
            blue_team_receiving_red: TeamFrequencies {
                broadcast_freq: 2_410_000_000,
                jammer_1_freq: 2_410_200_000,
                jammer_2_freq: 2_410_400_000,
                jammer_3_freq: 2_410_600_000,
            },
        }
    }

    #[test]
    fn jammer_disabled_yields_single_channel_at_broadcast() {
        let game = GameSettings {
            receive_team: Team::Red,
            my_team: Team::Blue,
            target_jammer_level: 0,
        };
        let processing = ProcessingSettings {
            buffer_size: 16_384,
            enable_jammer: true,
        };
        let set = plan().channel_offsets(&game, &processing);
        assert_eq!(set.center_freq_hz, 2_400_000_000);
        assert_eq!(set.slots.len(), 1);
        assert_eq!(set.slots[0].offset_hz, 0);
    }

    #[test]
    fn jammer_enabled_splits_into_two_symmetric_offsets() {
        let game = GameSettings {
            receive_team: Team::Red,
            my_team: Team::Blue,
            target_jammer_level: 1,
        };
        let processing = ProcessingSettings {
            buffer_size: 16_384,
            enable_jammer: true,
        };
        let set = plan().channel_offsets(&game, &processing);
        assert_eq!(set.center_freq_hz, 2_400_100_000);
        assert_eq!(set.slots.len(), 2);
        let broadcast = set
            .slots
            .iter()
            .find(|s| s.tag == ChannelTag::Broadcast)
            .unwrap();
        let jammer = set
            .slots
            .iter()
            .find(|s| s.tag == ChannelTag::Jammer)
            .unwrap();
        assert_eq!(broadcast.offset_hz, -100_000);
        assert_eq!(jammer.offset_hz, 100_000);
    }

    #[test]
    fn processing_disabled_overrides_jammer_level() {
        let game = GameSettings {
            receive_team: Team::Blue,
            my_team: Team::Red,
            target_jammer_level: 2,
        };
        let processing = ProcessingSettings {
            buffer_size: 16_384,
            enable_jammer: false,
        };
        let set = plan().channel_offsets(&game, &processing);
        assert_eq!(set.slots.len(), 1);
    }
}
