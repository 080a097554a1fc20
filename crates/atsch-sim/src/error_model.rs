//! Bit-error probability under interference.
//!
//! The receiver sees the transmitter through a log-distance path-loss model
//! and competes against the interference power recorded on the active
//! channel plus a thermal noise floor. The SINR feeds the IEEE 802.15.4
//! O-QPSK DSSS bit-error expression for the 2.4 GHz PHY:
//!
//! ```text
//! BER = 8/15 · 1/16 · Σ_{k=2}^{16} (−1)^k · C(16,k) · exp(20·SINR·(1/k − 1))
//! ```
//!
//! The model is a pure function: interference power in, bit-error
//! probability out. Every constant is configurable, so alternative
//! propagation assumptions slot in without touching the scheduling core.

use atsch_core::link::ErrorModel;
use serde::{Deserialize, Serialize};

/// Binomial coefficients C(16, k) for k = 2..=16.
const BINOMIAL_16: [f64; 15] = [
    120.0, 560.0, 1820.0, 4368.0, 8008.0, 11440.0, 12870.0, 11440.0, 8008.0, 4368.0, 1820.0,
    560.0, 120.0, 16.0, 1.0,
];

/// Log-distance path loss + 802.15.4 O-QPSK bit-error model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BitErrorModel {
    /// Transmit power in dBm.
    pub tx_power_dbm: f64,
    /// Path-loss exponent.
    pub path_loss_exponent: f64,
    /// Transmitter–receiver distance in metres.
    pub distance_m: f64,
    /// Receiver noise floor in dBm.
    pub noise_floor_dbm: f64,
}

impl Default for BitErrorModel {
    fn default() -> Self {
        Self {
            tx_power_dbm: -10.0,
            path_loss_exponent: 3.5,
            distance_m: 3.0,
            noise_floor_dbm: -100.0,
        }
    }
}

impl BitErrorModel {
    /// Received signal power in dBm after path loss.
    pub fn rx_power_dbm(&self) -> f64 {
        self.tx_power_dbm - 10.0 * self.path_loss_exponent * self.distance_m.log10()
    }

    /// Signal-to-interference-plus-noise ratio (linear) for the given
    /// interference power in mW.
    pub fn sinr(&self, interference_mw: f64) -> f64 {
        let rx_mw = dbm_to_mw(self.rx_power_dbm());
        let noise_mw = dbm_to_mw(self.noise_floor_dbm);
        rx_mw / (interference_mw.max(0.0) + noise_mw)
    }
}

impl ErrorModel for BitErrorModel {
    fn bit_error(&self, interference_mw: f64) -> f64 {
        let sinr = self.sinr(interference_mw);
        let mut sum = 0.0;
        for (i, &coeff) in BINOMIAL_16.iter().enumerate() {
            let k = (i + 2) as f64;
            let sign = if (i + 2) % 2 == 0 { 1.0 } else { -1.0 };
            sum += sign * coeff * (20.0 * sinr * (1.0 / k - 1.0)).exp();
        }
        ((8.0 / 15.0) * (1.0 / 16.0) * sum).clamp(0.0, 0.5)
    }
}

#[inline]
fn dbm_to_mw(dbm: f64) -> f64 {
    10.0_f64.powf(dbm / 10.0)
}
