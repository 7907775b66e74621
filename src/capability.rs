//! Neuron capability model.
//!
//! Capabilities nest from least to most capable:
//!
//! - [`Axon`] publishes an activation level and can form outgoing connections.
//! - [`Neuron`] answers presynaptic-connection queries.
//! - [`OperantNeuron`] runs the prepare/commit cycle, learns, and accepts bulk
//!   weight assignment.
//! - [`RespondentNeuron`] additionally accepts fixed-weight respondent inputs
//!   that override the operant pathway while active.
//! - [`DiscrepancyProducer`] marks the dopaminergic and hippocampal units
//!   whose discrepancy feeds the network-wide teaching signals.
//!
//! All state lives in the [`Network`] arena; the traits are implemented by
//! lightweight copyable handles (see [`crate::units`]) and every method takes
//! the owning network explicitly.

use crate::connection::{Connection, ConnectionClass, ConnectionKind};
use crate::error::Result;
use crate::identifier::Identifier;
use crate::network::Network;
use crate::neuron::{NeuronId, SignalKind};
use crate::unit_scalar::UnitScalar;

/// Output-only capability.
pub trait Axon {
    /// Arena index of the neuron behind this handle.
    fn neuron_id(&self) -> NeuronId;

    /// Published activation level.
    fn activation_level(&self, network: &Network) -> UnitScalar {
        network.activation_level(self.neuron_id())
    }

    /// Identifier of the neuron, if it has one.
    fn identifier<'n>(&self, network: &'n Network) -> Option<&'n Identifier> {
        network.neuron(self.neuron_id()).identifier()
    }

    /// Form an operant excitatory connection onto `target`.
    fn send_excitation<T: OperantNeuron>(&self, network: &mut Network, target: &T) -> Result<()> {
        network.connect(
            self.neuron_id(),
            target.neuron_id(),
            ConnectionKind::Excitatory,
            ConnectionClass::Operant,
        )
    }

    /// Form an operant inhibitory connection onto `target`.
    fn send_inhibition<T: OperantNeuron>(&self, network: &mut Network, target: &T) -> Result<()> {
        network.connect(
            self.neuron_id(),
            target.neuron_id(),
            ConnectionKind::Inhibitory,
            ConnectionClass::Operant,
        )
    }

    /// Form a respondent (fixed weight 1.0) excitatory connection onto `target`.
    fn send_respondent_excitation<T: RespondentNeuron>(
        &self,
        network: &mut Network,
        target: &T,
    ) -> Result<()> {
        network.connect(
            self.neuron_id(),
            target.neuron_id(),
            ConnectionKind::Excitatory,
            ConnectionClass::Respondent,
        )
    }

    /// Form a respondent (fixed weight 1.0) inhibitory connection onto `target`.
    fn send_respondent_inhibition<T: RespondentNeuron>(
        &self,
        network: &mut Network,
        target: &T,
    ) -> Result<()> {
        network.connect(
            self.neuron_id(),
            target.neuron_id(),
            ConnectionKind::Inhibitory,
            ConnectionClass::Respondent,
        )
    }
}

/// Presynaptic-query capability.
pub trait Neuron: Axon {
    /// Whether any connection reads from the neuron named `identifier`.
    fn contains_presynaptic_connection(&self, network: &Network, identifier: &str) -> bool {
        self.find_presynaptic_connection(network, identifier).is_some()
    }

    /// First connection reading from the neuron named `identifier`.
    fn find_presynaptic_connection<'n>(
        &self,
        network: &'n Network,
        identifier: &str,
    ) -> Option<&'n Connection> {
        network.find_presynaptic_connection(self.neuron_id(), identifier)
    }
}

/// Two-phase activation and learning capability.
pub trait OperantNeuron: Neuron {
    fn prepare_activation(&self, network: &mut Network) {
        network.prepare_activation(self.neuron_id());
    }

    fn commit_activation(&self, network: &mut Network) {
        network.commit_activation(self.neuron_id());
    }

    fn reset_activation(&self, network: &mut Network) {
        network.reset_activation(self.neuron_id(), false);
    }

    fn learn(&self, network: &mut Network) {
        network.learn(self.neuron_id());
    }

    fn unlearn(&self, network: &mut Network) {
        network.unlearn(self.neuron_id());
    }

    /// Reset only the connections of one kind to the minimum weight.
    fn unlearn_kind(&self, network: &mut Network, kind: ConnectionKind) {
        network.unlearn_kind(self.neuron_id(), kind);
    }

    /// Set every operant excitatory weight; all-or-nothing.
    fn set_excitatory_weights(&self, network: &mut Network, weight: f64) -> Result<()> {
        network.set_excitatory_weights(self.neuron_id(), weight)
    }

    /// Set every operant inhibitory weight; all-or-nothing.
    fn set_inhibitory_weights(&self, network: &mut Network, weight: f64) -> Result<()> {
        network.set_inhibitory_weights(self.neuron_id(), weight)
    }

    fn excitatory_weights(&self, network: &Network) -> Vec<f64> {
        network.excitatory_weights(self.neuron_id())
    }

    fn inhibitory_weights(&self, network: &Network) -> Vec<f64> {
        network.inhibitory_weights(self.neuron_id())
    }

    /// Broadcast signal this neuron learns from.
    fn discrepancy_source(&self, network: &Network) -> SignalKind {
        network.neuron(self.neuron_id()).body().discrepancy_source()
    }

    fn set_discrepancy_source(&self, network: &mut Network, source: SignalKind) {
        network.set_discrepancy_source(self.neuron_id(), source);
    }
}

/// Respondent-input capability.
pub trait RespondentNeuron: OperantNeuron {
    /// Whether the last prepare was decided by an active respondent input.
    fn is_respondent_driven(&self, network: &Network) -> bool {
        network.neuron(self.neuron_id()).body().is_respondent_driven()
    }
}

/// Units whose discrepancy feeds a network-wide teaching signal.
pub trait DiscrepancyProducer: OperantNeuron {
    /// Signal this unit contributes to.
    const SIGNAL: SignalKind;

    /// Committed discrepancy of this unit.
    fn discrepancy_signal(&self, network: &Network) -> f64 {
        network.discrepancy_signal(self.neuron_id())
    }
}
