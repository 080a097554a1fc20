//! Per-packet energy consumption of a TSCH node.
//!
//! Energy per successfully delivered packet combines the fixed cost of
//! energy-detection scans with the receive/transmit slot cost scaled by the
//! expected number of attempts (`1 / PRR`):
//!
//! ```text
//! E = (I_ed · n_ed · t_ed + (I_rx · n_rx · t_slot + I_tx · n_tx · t_slot) / PRR) · V_cc
//! ```
//!
//! Defaults model a CC2420-class transceiver at 3.3 V. Schedules without
//! channel sensing (plain TSCH) use [`EnergyModel::without_sensing`].

use serde::{Deserialize, Serialize};

/// Slot-level energy accounting for one delivered packet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnergyModel {
    /// Energy-detection scans per packet.
    pub ed_scans: usize,
    /// Receive slots per packet.
    pub rx_slots: usize,
    /// Transmit slots per packet.
    pub tx_slots: usize,
    /// Energy-detection current draw in A.
    pub ed_current_a: f64,
    /// Receive current draw in A.
    pub rx_current_a: f64,
    /// Transmit current draw in A.
    pub tx_current_a: f64,
    /// Duration of one energy-detection scan in seconds.
    pub ed_duration_s: f64,
    /// Duration of one slot's radio activity in seconds.
    pub slot_duration_s: f64,
    /// Supply voltage in V.
    pub supply_v: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            ed_scans: 3,
            rx_slots: 7,
            tx_slots: 1,
            ed_current_a: 5e-3,
            rx_current_a: 5e-3,
            tx_current_a: 10e-3,
            ed_duration_s: 128e-6,
            slot_duration_s: 3.2e-3,
            supply_v: 3.3,
        }
    }
}

impl EnergyModel {
    /// The same model with energy detection disabled.
    pub fn without_sensing(self) -> Self {
        Self { ed_scans: 0, ..self }
    }

    /// Energy in joules per delivered packet at the given packet-reception
    /// ratio.
    ///
    /// # Panics
    ///
    /// Panics if `prr` is not in (0, 1] — a zero reception ratio means no
    /// packet is ever delivered and the per-packet cost is unbounded.
    pub fn per_packet_j(&self, prr: f64) -> f64 {
        assert!(prr > 0.0 && prr <= 1.0, "PRR {prr} outside (0, 1]");
        let sensing = self.ed_current_a * self.ed_scans as f64 * self.ed_duration_s;
        let listening = self.rx_current_a * self.rx_slots as f64 * self.slot_duration_s;
        let transmitting = self.tx_current_a * self.tx_slots as f64 * self.slot_duration_s;
        (sensing + (listening + transmitting) / prr) * self.supply_v
    }

    /// Convenience: energy in microjoules per delivered packet.
    pub fn per_packet_uj(&self, prr: f64) -> f64 {
        self.per_packet_j(prr) * 1e6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_link_reference_cost() {
        let model = EnergyModel::default();
        // sensing: 5e-3 * 3 * 128e-6 = 1.92e-6
        // rx: 5e-3 * 7 * 3.2e-3 = 1.12e-4, tx: 10e-3 * 1 * 3.2e-3 = 3.2e-5
        // total: (1.92e-6 + 1.44e-4) * 3.3 ≈ 4.82e-4 J
        let energy = model.per_packet_j(1.0);
        assert!((energy - 4.8154e-4).abs() < 1e-7, "energy {energy}");
    }

    #[test]
    fn test_retransmissions_dominate_at_low_prr() {
        let model = EnergyModel::default();
        assert!(model.per_packet_j(0.5) > 1.9 * model.per_packet_j(1.0) * 0.9);
        assert!(model.per_packet_j(0.25) > model.per_packet_j(0.5));
    }

    #[test]
    fn test_sensing_cost_is_removable() {
        let with = EnergyModel::default();
        let without = EnergyModel::default().without_sensing();
        let delta = with.per_packet_j(1.0) - without.per_packet_j(1.0);
        // Exactly the ED term: 5e-3 * 3 * 128e-6 * 3.3
        assert!((delta - 6.336e-6).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "outside (0, 1]")]
    fn test_zero_prr_is_rejected() {
        EnergyModel::default().per_packet_j(0.0);
    }
}
