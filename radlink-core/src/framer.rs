//! Byte-synchronous, resynchronizing framer.
//!
//! Wire layout: `SOF(1) | data_len:u16 LE (2) | seq(1) | crc8(1) | cmd_id:u16
//! LE (2) | data(data_len) | crc16:u16 LE (2)`. `data_len` counts only the
//! data field, not the 5-byte header, the 2-byte `cmd_id`, or the trailing
//! CRC-16.

use crate::crc::{crc16, crc8};
use crate::frequency_plan::ChannelTag;
use crate::logging::SignalLogger;

const SOF: u8 = 0xA5;
const HEADER_LEN: usize = 5;
const CMD_ID_LEN: usize = 2;
const CRC16_LEN: usize = 2;

/// Upper bound on a single channel's pending byte buffer. Reaching it means
/// no valid frame has been found in 64 KiB of data; the oldest bytes are
/// evicted to keep the scan bounded under sustained garbage input.
const MAX_BUFFER_LEN: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub cmd_id: u16,
    pub payload: Vec<u8>,
    pub channel_tag: ChannelTag,
}

/// Per-channel byte assembler and frame scanner. Owns its own bit leftover
/// and byte buffer; channels never share framer state.
#[derive(Debug)]
pub struct Framer {
    channel_tag: ChannelTag,
    bit_carry: Vec<u8>,
    buffer: Vec<u8>,
}

impl Framer {
    pub fn new(channel_tag: ChannelTag) -> Self {
        Self {
            channel_tag,
            bit_carry: Vec::with_capacity(8),
            buffer: Vec::new(),
        }
    }

    /// Feed newly demodulated bits, returning every frame that becomes
    /// complete as a result. Bits that don't complete a byte are held over
    /// to the next call.
    pub fn push_bits(&mut self, bits: &[u8], logger: &SignalLogger) -> Vec<Frame> {
        self.bit_carry.extend_from_slice(bits);

        let whole_bytes = self.bit_carry.len() / 8;
        for chunk in self.bit_carry[..whole_bytes * 8].chunks_exact(8) {
            let byte = chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1));
            self.buffer.push(byte);
        }
        self.bit_carry.drain(..whole_bytes * 8);

        if self.buffer.len() > MAX_BUFFER_LEN {
            let excess = self.buffer.len() - MAX_BUFFER_LEN;
            self.buffer.drain(..excess);
        }

        self.scan(logger)
    }

    fn scan(&mut self, logger: &SignalLogger) -> Vec<Frame> {
        let mut frames = Vec::new();

        loop {
            if self.buffer.len() < HEADER_LEN {
                break;
            }

            if self.buffer[0] != SOF {
                self.buffer.remove(0);
                continue;
            }

            let header_crc = crc8(&self.buffer[0..4]);
            if header_crc != self.buffer[4] {
                self.buffer.remove(0);
                continue;
            }

            let data_len = u16::from_le_bytes([self.buffer[1], self.buffer[2]]) as usize;
            let total_len = HEADER_LEN + CMD_ID_LEN + data_len + CRC16_LEN;

            if self.buffer.len() < total_len {
                break;
            }

            let candidate = &self.buffer[..total_len];
            let body_crc = crc16(&candidate[..total_len - CRC16_LEN]);
            let recv_crc = u16::from_le_bytes([
                candidate[total_len - 2],
                candidate[total_len - 1],
            ]);

            if body_crc != recv_crc {
                logger.warn(
                    "framer",
                    &format!(
                        "dropping candidate frame on channel {:?}: crc16 mismatch (data_len={data_len})",
                        self.channel_tag
                    ),
                );
                self.buffer.drain(..total_len);
                continue;
            }

            let cmd_id = u16::from_le_bytes([candidate[5], candidate[6]]);
            let payload = candidate[HEADER_LEN + CMD_ID_LEN..total_len - CRC16_LEN].to_vec();
            frames.push(Frame {
                cmd_id,
                payload,
                channel_tag: self.channel_tag,
            });
            self.buffer.drain(..total_len);
        }

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_frame(cmd_id: u16, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(SOF);
        out.extend_from_slice(&(data.len() as u16).to_le_bytes());
        out.push(0); // seq
        let header_crc = crc8(&out[0..4]);
        out.push(header_crc);
        out.extend_from_slice(&cmd_id.to_le_bytes());
        out.extend_from_slice(data);
        let body_crc = crc16(&out);
        out.extend_from_slice(&body_crc.to_le_bytes());
        out
    }

    fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
        let mut bits = Vec::with_capacity(bytes.len() * 8);
        for &b in bytes {
            for shift in (0..8).rev() {
                bits.push((b >> shift) & 1);
            }
        }
        bits
    }

    fn logger() -> SignalLogger {
        SignalLogger::silent()
    }

    #[test]
    fn decodes_single_well_formed_frame() {
        let mut framer = Framer::new(ChannelTag::Broadcast);
        let frame_bytes = encode_frame(0x0A06, b"ABCDEF");
        let frames = framer.push_bits(&bytes_to_bits(&frame_bytes), &logger());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].cmd_id, 0x0A06);
        assert_eq!(frames[0].payload, b"ABCDEF");
    }

    #[test]
    fn resyncs_past_garbage_prefix() {
        let mut framer = Framer::new(ChannelTag::Broadcast);
        let mut stream = vec![0x00, 0xFF, 0xA5, 0x01];
        stream.extend(encode_frame(0x0A01, b"hello!"));
        let frames = framer.push_bits(&bytes_to_bits(&stream), &logger());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload, b"hello!");
    }

    #[test]
    fn idempotent_under_arbitrary_chunking() {
        let frame_bytes = encode_frame(0x0A02, b"0123456789");
        let bits = bytes_to_bits(&frame_bytes);

        let mut whole = Framer::new(ChannelTag::Broadcast);
        let whole_frames = whole.push_bits(&bits, &logger());

        let mut chunked = Framer::new(ChannelTag::Broadcast);
        let mut got = Vec::new();
        for chunk in bits.chunks(3) {
            got.extend(chunked.push_bits(chunk, &logger()));
        }

        assert_eq!(whole_frames, got);
    }

    #[test]
    fn drops_whole_frame_on_crc16_mismatch_and_resyncs() {
        let mut framer = Framer::new(ChannelTag::Broadcast);
        let mut corrupted = encode_frame(0x0A03, b"payload!!!");
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;

        let mut stream = corrupted;
        stream.extend(encode_frame(0x0A04, b"goodframe"));

        let frames = framer.push_bits(&bytes_to_bits(&stream), &logger());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].cmd_id, 0x0A04);
    }

    #[test]
    fn buffer_never_exceeds_cap_under_sustained_garbage() {
        let mut framer = Framer::new(ChannelTag::Broadcast);
        let garbage = vec![0x00u8; 200_000];
        framer.push_bits(&bytes_to_bits(&garbage), &logger());
        assert!(framer.buffer.len() <= MAX_BUFFER_LEN);
    }
}
