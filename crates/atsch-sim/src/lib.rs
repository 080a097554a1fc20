//! # TSCH link-level simulation
//!
//! Concrete collaborators behind the capability traits of `atsch-core`:
//! hopping-sequence generation, slot-level interference simulation for the
//! baseline / sensing-assisted / whitelist-restricted TSCH schedules, the
//! 802.15.4 bit-error and packet-reception models, an energy model, and a
//! synthetic interference-recording generator.
//!
//! ## Example
//!
//! ```rust
//! use atsch_core::link::{ErrorModel, LinkSimulator, ReceptionModel};
//! use atsch_sim::error_model::BitErrorModel;
//! use atsch_sim::protocols::{TschConfig, TschSimulator};
//! use atsch_sim::reception::PacketReceptionModel;
//! use atsch_sim::synthetic::{self, SyntheticConfig};
//!
//! let series = synthetic::generate(&SyntheticConfig {
//!     steps: 256,
//!     ..Default::default()
//! });
//! let simulator = TschSimulator::new(TschConfig::default());
//!
//! let (interference, _attribution) = simulator.baseline(&series.as_window_batch());
//! let errors = BitErrorModel::default().apply(&interference);
//! let receptions = PacketReceptionModel::default().apply(&errors);
//! assert_eq!(receptions.slots(), 256);
//! ```

pub mod energy;
pub mod error_model;
pub mod hopping;
pub mod protocols;
pub mod reception;
pub mod synthetic;

pub use energy::EnergyModel;
pub use error_model::BitErrorModel;
pub use hopping::{HopConfig, TschHopper};
pub use protocols::{TschConfig, TschSimulator};
pub use reception::PacketReceptionModel;
pub use synthetic::SyntheticConfig;
