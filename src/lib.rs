//! Selnet - Selectionist Neural Network Engine
//!
//! Selnet simulates small "selectionist" neural networks of the kind used to
//! model operant and respondent (Pavlovian) conditioning. Neurons carry a
//! continuous activation in [0, 1]; connection weights are strengthened or
//! weakened by a learning rule gated by network-wide *discrepancy* signals,
//! the engine's analogue of dopaminergic and hippocampal teaching signals.
//!
//! # Architecture
//!
//! - **Network**: arena owning every neuron and container, the identifier
//!   registry, the structure lock and both broadcast signals
//! - **Neuron kinds**: input, operant, respondent, dopaminergic and
//!   hippocampal units, exposed as typed handles implementing a small
//!   capability hierarchy ([`Axon`] ⊂ [`Neuron`] ⊂ [`OperantNeuron`] ⊂
//!   [`RespondentNeuron`])
//! - **Two-phase activation**: `prepare` computes a pending value from
//!   published inputs, `commit` publishes it
//! - **Containers**: layers, areas and regions fan operations out to every
//!   descendant and grow lazily while the network is unlocked
//! - **Updaters**: synchronous ([`NaturalUpdater`]) or randomized continuous
//!   propagation ([`RandomizedUpdater`])
//!
//! # Example
//!
//! ```
//! use selnet::{Axon, Identifier, Network, OperantNeuron, Result};
//!
//! # fn main() -> Result<()> {
//! let mut net = Network::new();
//! let cs = net.create_input_neuron(Identifier::new("CS")?)?;
//! let us = net.create_input_neuron(Identifier::new("US")?)?;
//! let r = net.create_respondent_neuron(Identifier::new("R")?)?;
//! let d = net.create_dopaminergic_neuron(Identifier::new("D")?)?;
//!
//! cs.send_excitation(&mut net, &r)?;
//! r.send_excitation(&mut net, &d)?;
//! us.send_respondent_excitation(&mut net, &r)?;
//! us.send_respondent_excitation(&mut net, &d)?;
//! net.lock_structure();
//!
//! for step in 0..5 {
//!     cs.set_activation_level(&mut net, 1.0)?;
//!     us.set_activation_level(&mut net, if step == 3 { 1.0 } else { 0.0 })?;
//!     net.update()?;
//! }
//! assert!(r.excitatory_weights(&net)[0] > 0.01);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! A network is driven from a single thread. With the `parallel` feature the
//! natural updater computes every neuron's prepared state concurrently with
//! rayon, then applies and commits serially.

pub mod capability;
pub mod config;
pub mod connection;
pub mod container;
pub mod error;
pub mod identifier;
pub mod learning;
pub mod logistic;
pub mod network;
pub mod neuron;
pub mod recorder;
pub mod snapshot;
pub mod unit_scalar;
pub mod units;
pub mod updater;
pub mod utils;

// Re-exports for convenient access
pub use capability::{Axon, DiscrepancyProducer, Neuron, OperantNeuron, RespondentNeuron};
pub use config::{LearningConfig, SimulationConfig, UpdaterConfig};
pub use connection::{Connection, ConnectionClass, ConnectionKind};
pub use container::{AreaId, ContainerId, LayerId, RegionId};
pub use error::{Result, SelnetError};
pub use identifier::Identifier;
pub use learning::{LearningRule, SelectionRule, SynapseContext};
pub use logistic::Logistic;
pub use network::{Network, NodeRef};
pub use neuron::{NeuronBody, NeuronId, NeuronKind, NeuronNode, SignalKind};
pub use recorder::{ActivationRecorder, ActivationTrace, TimestepRecord};
pub use snapshot::{NetworkState, NeuronState};
pub use unit_scalar::UnitScalar;
pub use units::{DopaminergicUnit, HippocampalUnit, InputUnit, OperantUnit, RespondentUnit};
pub use updater::{NaturalUpdater, RandomizedUpdater, Updater};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name
pub const NAME: &str = "Selnet";

/// Get version string
pub fn version() -> String {
    format!("{} v{}", NAME, VERSION)
}
