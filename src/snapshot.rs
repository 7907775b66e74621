//! Network state snapshots.
//!
//! A [`NetworkState`] captures everything that changes while a locked network
//! runs: activations, operant weights, discrepancies, both broadcast signals
//! and the timestep counter. Topology is not included; a state can only be
//! restored into a network with the same neurons and connections.
//!
//! # Example
//!
//! ```
//! use selnet::{Network, NetworkState};
//!
//! # fn main() -> selnet::Result<()> {
//! let mut net = Network::new();
//! net.create_operant_neuron(None)?;
//! net.lock_structure();
//!
//! let state = net.snapshot();
//! net.update()?;
//! net.restore(&NetworkState::from_bytes(&state.to_bytes()?)?)?;
//! assert_eq!(net.timestep(), 0);
//! # Ok(())
//! # }
//! ```

use crate::connection::ConnectionKind;
use crate::error::{Result, SelnetError};
use crate::network::Network;
use crate::neuron::NeuronKind;
use crate::unit_scalar::UnitScalar;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mutable state of one neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronState {
    pub identifier: Option<String>,
    pub kind: NeuronKind,
    pub activation: f64,
    /// Operant excitatory weights in connection order
    pub excitatory_weights: Vec<f64>,
    /// Operant inhibitory weights in connection order
    pub inhibitory_weights: Vec<f64>,
    pub discrepancy: f64,
}

/// Mutable state of a whole network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub timestep: u64,
    pub dopaminergic_signal: f64,
    pub hippocampal_signal: f64,
    /// Indexed by `NeuronId`
    pub neurons: Vec<NeuronState>,
}

impl NetworkState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

fn to_unit(values: &[f64]) -> Result<Vec<UnitScalar>> {
    values.iter().map(|&v| UnitScalar::new(v)).collect()
}

fn mismatch(index: usize, what: &str) -> SelnetError {
    SelnetError::StateMismatch(format!("neuron {}: {}", index, what))
}

impl Network {
    /// Capture the current mutable state.
    pub fn snapshot(&self) -> NetworkState {
        NetworkState {
            timestep: self.timestep,
            dopaminergic_signal: self.dopaminergic_signal,
            hippocampal_signal: self.hippocampal_signal,
            neurons: self
                .neurons
                .iter()
                .map(|n| NeuronState {
                    identifier: n.identifier().map(|id| id.to_string()),
                    kind: n.kind(),
                    activation: n.body().activation().value(),
                    excitatory_weights: n.body().weights(ConnectionKind::Excitatory),
                    inhibitory_weights: n.body().weights(ConnectionKind::Inhibitory),
                    discrepancy: n.body().discrepancy(),
                })
                .collect(),
        }
    }

    /// Restore a snapshot taken from a network with the same topology.
    ///
    /// Pending activations are set equal to the restored published values.
    ///
    /// # Errors
    ///
    /// - `StateMismatch` if neuron count, kinds, identifiers or connection
    ///   counts differ
    /// - `OutOfRange` if an activation or weight lies outside [0, 1]
    ///
    /// Nothing is changed unless the whole state is valid.
    pub fn restore(&mut self, state: &NetworkState) -> Result<()> {
        if state.neurons.len() != self.neurons.len() {
            return Err(SelnetError::StateMismatch(format!(
                "expected {} neurons, found {}",
                self.neurons.len(),
                state.neurons.len()
            )));
        }

        let mut validated = Vec::with_capacity(state.neurons.len());
        for (index, (node, saved)) in self.neurons.iter().zip(&state.neurons).enumerate() {
            if node.kind() != saved.kind {
                return Err(mismatch(index, "kind differs"));
            }
            if node.identifier().map(|id| id.as_str()) != saved.identifier.as_deref() {
                return Err(mismatch(index, "identifier differs"));
            }
            let body = node.body();
            if body.weights(ConnectionKind::Excitatory).len() != saved.excitatory_weights.len()
                || body.weights(ConnectionKind::Inhibitory).len() != saved.inhibitory_weights.len()
            {
                return Err(mismatch(index, "connection count differs"));
            }
            validated.push((
                UnitScalar::new(saved.activation)?,
                to_unit(&saved.excitatory_weights)?,
                to_unit(&saved.inhibitory_weights)?,
            ));
        }

        for ((node, saved), (activation, excitatory, inhibitory)) in
            self.neurons.iter_mut().zip(&state.neurons).zip(validated)
        {
            let body = node.body_mut();
            body.restore(activation, saved.discrepancy);
            body.restore_weights(ConnectionKind::Excitatory, &excitatory);
            body.restore_weights(ConnectionKind::Inhibitory, &inhibitory);
        }
        self.timestep = state.timestep;
        self.dopaminergic_signal = state.dopaminergic_signal;
        self.hippocampal_signal = state.hippocampal_signal;

        tracing::debug!(
            target: "selnet",
            timestep = state.timestep,
            neurons = state.neurons.len(),
            "network state restored"
        );
        Ok(())
    }
}
