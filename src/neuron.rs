//! Neuron body - the numeric engine behind every concrete neuron kind.
//!
//! Each neuron runs a two-phase cycle:
//!
//! 1. **prepare** reads the *published* activation of every presynaptic
//!    neuron, forms the net input (weighted excitation minus weighted
//!    inhibition, or the respondent override), squashes it through the
//!    logistic function and stores the result as *pending*.
//! 2. **commit** copies pending to published. Nothing downstream observes a
//!    new activation before this point.
//!
//! Discrepancy producers (dopaminergic and hippocampal units) compute their
//! teaching signal during prepare and publish it on commit, alongside the
//! activation. Learning adjusts operant weights from the presynaptic
//! activations stored by the last prepare.
//!
//! The body never touches other neurons directly: preparation takes a lookup
//! closure for presynaptic activations and returns a [`Prepared`] value, so
//! the network can compute many preparations from a shared borrow and apply
//! them afterwards.

use crate::connection::{Connection, ConnectionClass, ConnectionKind};
use crate::container::ContainerId;
use crate::identifier::Identifier;
use crate::learning::{LearningRule, SynapseContext};
use crate::logistic::Logistic;
use crate::unit_scalar::UnitScalar;
use serde::{Deserialize, Serialize};

/// Stable index of a neuron inside its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NeuronId(u32);

impl NeuronId {
    pub(crate) fn new(index: usize) -> Self {
        NeuronId(index as u32)
    }

    /// Create a NeuronId from a raw u32 value (for testing).
    #[doc(hidden)]
    pub fn from_raw(id: u32) -> Self {
        NeuronId(id)
    }

    /// Get the raw value (for indexing).
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Which broadcast discrepancy signal a neuron produces or learns from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Dopaminergic,
    Hippocampal,
}

/// Concrete neuron kinds, from least to most capable.
///
/// | kind          | output | operant cycle | respondent input | produces      |
/// |---------------|--------|---------------|------------------|---------------|
/// | Input         | yes    | no            | no               | -             |
/// | Operant       | yes    | yes           | no               | -             |
/// | Respondent    | yes    | yes           | yes              | -             |
/// | Dopaminergic  | yes    | yes           | yes              | dopaminergic  |
/// | Hippocampal   | yes    | yes           | no               | hippocampal   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeuronKind {
    Input,
    Operant,
    Respondent,
    Dopaminergic,
    Hippocampal,
}

impl NeuronKind {
    /// Human-readable description used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            NeuronKind::Input => "an input neuron",
            NeuronKind::Operant => "an operant neuron",
            NeuronKind::Respondent => "a respondent neuron",
            NeuronKind::Dopaminergic => "a dopaminergic neuron",
            NeuronKind::Hippocampal => "a hippocampal neuron",
        }
    }

    /// Whether the kind runs the prepare/commit/learn cycle.
    #[inline]
    pub fn is_operant(self) -> bool {
        !matches!(self, NeuronKind::Input)
    }

    /// Whether the kind accepts respondent connections.
    #[inline]
    pub fn accepts_respondent(self) -> bool {
        matches!(self, NeuronKind::Respondent | NeuronKind::Dopaminergic)
    }

    /// Signal produced by the kind, if any.
    #[inline]
    pub fn signal(self) -> Option<SignalKind> {
        match self {
            NeuronKind::Dopaminergic => Some(SignalKind::Dopaminergic),
            NeuronKind::Hippocampal => Some(SignalKind::Hippocampal),
            _ => None,
        }
    }

    /// Signal the kind learns from unless reconfigured.
    pub fn default_discrepancy_source(self) -> SignalKind {
        match self {
            NeuronKind::Hippocampal => SignalKind::Hippocampal,
            _ => SignalKind::Dopaminergic,
        }
    }
}

/// Network-wide values a preparation depends on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PrepareContext {
    pub logistic: Logistic,
    pub respondent_threshold: f64,
    pub dopaminergic_signal: f64,
}

/// Result of a prepare computation, not yet applied to the body.
#[derive(Debug, Clone)]
pub(crate) struct Prepared {
    presynaptic: Vec<UnitScalar>,
    activation: UnitScalar,
    discrepancy: f64,
    respondent_driven: bool,
}

/// Activation and learning state of one neuron.
#[derive(Debug, Clone)]
pub struct NeuronBody {
    connections: Vec<Connection>,
    /// Published activation
    activation: UnitScalar,
    /// Computed by prepare, published by commit
    pending: UnitScalar,
    discrepancy: f64,
    pending_discrepancy: f64,
    discrepancy_source: SignalKind,
    respondent_driven: bool,
}

impl NeuronBody {
    pub(crate) fn new(initial: UnitScalar, discrepancy_source: SignalKind) -> Self {
        Self {
            connections: Vec::new(),
            activation: initial,
            pending: initial,
            discrepancy: 0.0,
            pending_discrepancy: 0.0,
            discrepancy_source,
            respondent_driven: false,
        }
    }

    /// Published activation level.
    #[inline]
    pub fn activation(&self) -> UnitScalar {
        self.activation
    }

    /// Activation computed by the last prepare (visible only after commit).
    #[inline]
    pub fn pending_activation(&self) -> UnitScalar {
        self.pending
    }

    /// Committed discrepancy signal (always 0 for non-producers).
    #[inline]
    pub fn discrepancy(&self) -> f64 {
        self.discrepancy
    }

    /// Broadcast signal this neuron's learning reads.
    #[inline]
    pub fn discrepancy_source(&self) -> SignalKind {
        self.discrepancy_source
    }

    /// Whether the last prepare was decided by the respondent pathway.
    #[inline]
    pub fn is_respondent_driven(&self) -> bool {
        self.respondent_driven
    }

    /// All connections in formation order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Operant weights of one kind, in connection order.
    pub fn weights(&self, kind: ConnectionKind) -> Vec<f64> {
        self.operant(kind).map(|c| c.weight().value()).collect()
    }

    fn operant(&self, kind: ConnectionKind) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.is_learnable() && c.kind() == kind)
    }

    pub(crate) fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    pub(crate) fn set_discrepancy_source(&mut self, source: SignalKind) {
        self.discrepancy_source = source;
    }

    /// Set pending and published activation at once (input neurons).
    pub(crate) fn set_activation(&mut self, activation: UnitScalar) {
        self.pending = activation;
        self.activation = activation;
    }

    /// Overwrite published state (snapshot restore).
    pub(crate) fn restore(&mut self, activation: UnitScalar, discrepancy: f64) {
        self.set_activation(activation);
        self.discrepancy = discrepancy;
        self.pending_discrepancy = discrepancy;
    }

    /// Compute the prepared state without mutating anything.
    pub(crate) fn compute<F>(&self, kind: NeuronKind, activation_of: F, ctx: &PrepareContext) -> Prepared
    where
        F: Fn(NeuronId) -> UnitScalar,
    {
        let presynaptic: Vec<UnitScalar> = self
            .connections
            .iter()
            .map(|c| activation_of(c.presynaptic()))
            .collect();

        let mut operant_net = 0.0;
        let mut respondent_net = 0.0;
        let mut respondent_active = false;

        for (conn, x) in self.connections.iter().zip(&presynaptic) {
            let sign = match conn.kind() {
                ConnectionKind::Excitatory => 1.0,
                ConnectionKind::Inhibitory => -1.0,
            };
            match conn.class() {
                ConnectionClass::Operant => operant_net += sign * conn.weight().value() * x.value(),
                ConnectionClass::Respondent => {
                    respondent_net += sign * x.value();
                    respondent_active |= x.value() > ctx.respondent_threshold;
                }
            }
        }

        let respondent_driven = respondent_active && kind.accepts_respondent();
        let net = if respondent_driven {
            respondent_net
        } else {
            operant_net
        };
        let activation = ctx.logistic.apply(net);

        let change = activation.value() - self.activation.value();
        let discrepancy = match kind.signal() {
            Some(SignalKind::Dopaminergic) => change,
            Some(SignalKind::Hippocampal) => {
                (change.abs() + ctx.dopaminergic_signal * (1.0 - self.discrepancy)).clamp(0.0, 1.0)
            }
            None => 0.0,
        };

        Prepared {
            presynaptic,
            activation,
            discrepancy,
            respondent_driven,
        }
    }

    pub(crate) fn apply_prepared(&mut self, prepared: Prepared) {
        for (conn, x) in self.connections.iter_mut().zip(prepared.presynaptic) {
            conn.set_presynaptic_activation(x);
        }
        self.pending = prepared.activation;
        self.pending_discrepancy = prepared.discrepancy;
        self.respondent_driven = prepared.respondent_driven;
    }

    pub(crate) fn commit(&mut self) {
        self.activation = self.pending;
        self.discrepancy = self.pending_discrepancy;
    }

    /// Return pending activation to `resting` and zero the discrepancy.
    pub(crate) fn reset(&mut self, resting: UnitScalar) {
        self.pending = resting;
        self.discrepancy = 0.0;
        self.pending_discrepancy = 0.0;
        self.respondent_driven = false;
    }

    /// Apply the learning rule to every operant connection.
    ///
    /// Available capacity is computed per connection kind before any weight
    /// in that group changes.
    pub(crate) fn learn(&mut self, rule: &dyn LearningRule, signal: f64) {
        let postsynaptic = self.activation.value();
        for kind in [ConnectionKind::Excitatory, ConnectionKind::Inhibitory] {
            let total: f64 = self.operant(kind).map(|c| c.weight().value()).sum();
            let available = (1.0 - total).max(0.0);

            for conn in self
                .connections
                .iter_mut()
                .filter(|c| c.is_learnable() && c.kind() == kind)
            {
                let ctx = SynapseContext {
                    presynaptic: conn.presynaptic_activation().value(),
                    weight: conn.weight().value(),
                    postsynaptic,
                    discrepancy: signal,
                    available,
                };
                let delta = rule.weight_change(&ctx);
                conn.set_weight(conn.weight().saturating_add(delta));
            }
        }
    }

    pub(crate) fn unlearn(&mut self, min_weight: UnitScalar, kind: Option<ConnectionKind>) {
        for conn in self
            .connections
            .iter_mut()
            .filter(|c| kind.map_or(true, |k| c.kind() == k))
        {
            conn.set_weight(min_weight);
        }
    }

    /// Set every operant weight of `kind`. The value is already validated.
    pub(crate) fn set_weights(&mut self, kind: ConnectionKind, weight: UnitScalar) {
        for conn in self.connections.iter_mut().filter(|c| c.kind() == kind) {
            conn.set_weight(weight);
        }
    }

    pub(crate) fn restore_weights(&mut self, kind: ConnectionKind, weights: &[UnitScalar]) {
        let targets = self
            .connections
            .iter_mut()
            .filter(|c| c.is_learnable() && c.kind() == kind);
        for (conn, &w) in targets.zip(weights) {
            conn.set_weight(w);
        }
    }
}

/// A neuron as stored in the network arena.
#[derive(Debug, Clone)]
pub struct NeuronNode {
    identifier: Option<Identifier>,
    environment: Option<ContainerId>,
    kind: NeuronKind,
    body: NeuronBody,
}

impl NeuronNode {
    pub(crate) fn new(
        identifier: Option<Identifier>,
        environment: Option<ContainerId>,
        kind: NeuronKind,
        resting: UnitScalar,
    ) -> Self {
        let initial = if kind.is_operant() {
            resting
        } else {
            UnitScalar::ZERO
        };
        Self {
            identifier,
            environment,
            kind,
            body: NeuronBody::new(initial, kind.default_discrepancy_source()),
        }
    }

    /// Optional identifier.
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// Container the neuron lives in, if any.
    pub fn environment(&self) -> Option<ContainerId> {
        self.environment
    }

    /// Concrete kind.
    pub fn kind(&self) -> NeuronKind {
        self.kind
    }

    /// Activation and learning state.
    pub fn body(&self) -> &NeuronBody {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut NeuronBody {
        &mut self.body
    }

    /// Resting activation for this kind: 0 for inputs, the logistic baseline otherwise.
    pub(crate) fn resting(&self, logistic: &Logistic) -> UnitScalar {
        if self.kind.is_operant() {
            logistic.baseline()
        } else {
            UnitScalar::ZERO
        }
    }
}
