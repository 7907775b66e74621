//! Connection - one weighted presynaptic input stored on the postsynaptic neuron.

use crate::neuron::NeuronId;
use crate::unit_scalar::UnitScalar;
use serde::{Deserialize, Serialize};

/// Sign of a connection's contribution to net input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Excitatory,
    Inhibitory,
}

/// Pathway a connection belongs to.
///
/// Respondent (unconditioned-stimulus) connections carry a fixed weight of
/// 1.0 and never learn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionClass {
    Operant,
    Respondent,
}

/// A presynaptic input.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    presynaptic: NeuronId,
    weight: UnitScalar,
    kind: ConnectionKind,
    class: ConnectionClass,
    /// Presynaptic activation read by the last prepare
    presynaptic_activation: UnitScalar,
}

impl Connection {
    pub(crate) fn new(
        presynaptic: NeuronId,
        weight: UnitScalar,
        kind: ConnectionKind,
        class: ConnectionClass,
    ) -> Self {
        let weight = match class {
            ConnectionClass::Operant => weight,
            ConnectionClass::Respondent => UnitScalar::ONE,
        };
        Self {
            presynaptic,
            weight,
            kind,
            class,
            presynaptic_activation: UnitScalar::ZERO,
        }
    }

    /// Neuron this connection reads from.
    #[inline]
    pub fn presynaptic(&self) -> NeuronId {
        self.presynaptic
    }

    /// Current weight.
    #[inline]
    pub fn weight(&self) -> UnitScalar {
        self.weight
    }

    /// Excitatory or inhibitory.
    #[inline]
    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    /// Operant or respondent.
    #[inline]
    pub fn class(&self) -> ConnectionClass {
        self.class
    }

    /// Presynaptic activation observed by the last prepare.
    #[inline]
    pub fn presynaptic_activation(&self) -> UnitScalar {
        self.presynaptic_activation
    }

    /// Whether the learning rule may change this weight.
    #[inline]
    pub fn is_learnable(&self) -> bool {
        self.class == ConnectionClass::Operant
    }

    /// `weight * presynaptic_activation`.
    #[inline]
    pub fn weighted_input(&self) -> f64 {
        self.weight.value() * self.presynaptic_activation.value()
    }

    pub(crate) fn set_weight(&mut self, weight: UnitScalar) {
        if self.is_learnable() {
            self.weight = weight;
        }
    }

    pub(crate) fn set_presynaptic_activation(&mut self, activation: UnitScalar) {
        self.presynaptic_activation = activation;
    }
}
