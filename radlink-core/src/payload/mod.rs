//! Payload parsing: `cmd_id`-dispatched decoding of a frame's data field
//! into a tagged record.

mod decode;

pub use decode::{BuffBlock, Position, Record};

/// Decode a frame payload given its `cmd_id`. Never fails: payloads that
/// are too short or carry an unrecognized `cmd_id` decode to
/// `Record::Error` / `Record::Unknown` respectively rather than
/// propagating a `Result`, since a malformed payload is an expected
/// condition on a noisy link, not a programming error.
pub fn parse(cmd_id: u16, payload: &[u8]) -> Record {
    match cmd_id {
        0x0A01 => decode::positions(payload),
        0x0A02 => decode::hps(payload),
        0x0A03 => decode::ammo(payload),
        0x0A04 => decode::macro_state(payload),
        0x0A05 => decode::buffs(payload),
        0x0A06 => decode::key(payload),
        _ => Record::Unknown {
            cmd_id,
            raw_hex: hex_encode(payload),
        },
    }
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
