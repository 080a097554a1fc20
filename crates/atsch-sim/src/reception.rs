//! Packet-reception probability from bit-error probability.
//!
//! A packet is received only if every bit survives, so the reception
//! probability of an L-byte packet is `(1 − BER)^(8·L)`. Pure function,
//! no state; the default packet length matches a full 802.15.4 frame of
//! 133 bytes (127-byte PSDU plus synchronisation header).

use atsch_core::link::ReceptionModel;
use serde::{Deserialize, Serialize};

/// Independent-bit packet-reception model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PacketReceptionModel {
    /// Packet length in bytes.
    pub packet_length_bytes: usize,
}

impl Default for PacketReceptionModel {
    fn default() -> Self {
        Self {
            packet_length_bytes: 133,
        }
    }
}

impl ReceptionModel for PacketReceptionModel {
    fn reception(&self, bit_error: f64) -> f64 {
        let bits = (8 * self.packet_length_bytes) as f64;
        (1.0 - bit_error.clamp(0.0, 1.0)).powf(bits)
    }
}
