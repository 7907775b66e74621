//! Network - root owner of every neuron and container.
//!
//! The network is an arena: neurons, layers, areas and regions live in
//! vectors and refer to each other through stable integer ids. Presynaptic
//! connections and container "environment" links are plain ids, so the graph
//! has no shared ownership and no reference cycles.
//!
//! # Lifecycle
//!
//! 1. Create the network: `Network::new()` or `Network::with_config(config)?`
//! 2. Create neurons and containers, form connections, set initial weights
//! 3. Freeze topology: `net.lock_structure()`
//! 4. Drive timesteps: set inputs, then `net.update()?` (or `execute(learn)`)
//! 5. Read activations, weights and signals for display or logging
//!
//! # Example
//!
//! ```
//! use selnet::{Axon, Identifier, Network, OperantNeuron, Result};
//!
//! # fn main() -> Result<()> {
//! let mut net = Network::new();
//! let x = net.create_input_neuron(Identifier::new("X")?)?;
//! let s = net.create_operant_neuron(Identifier::new("S")?)?;
//! x.send_excitation(&mut net, &s)?;
//! s.set_excitatory_weights(&mut net, 0.9)?;
//! net.lock_structure();
//!
//! x.set_activation_level(&mut net, 1.0)?;
//! net.execute(false)?;
//! assert!(s.activation_level(&net).value() > 0.9);
//! # Ok(())
//! # }
//! ```

use crate::config::SimulationConfig;
use crate::connection::{Connection, ConnectionClass, ConnectionKind};
use crate::container::{Area, ContainerId, Layer, Region};
use crate::error::{Result, SelnetError};
use crate::identifier::Identifier;
use crate::learning::LearningRule;
use crate::neuron::{NeuronId, NeuronKind, NeuronNode, PrepareContext, Prepared, SignalKind};
use crate::recorder::{ActivationRecorder, ActivationTrace, TimestepRecord};
use crate::unit_scalar::UnitScalar;
use crate::units::{DopaminergicUnit, HippocampalUnit, InputUnit, OperantUnit, RespondentUnit};
use crate::updater::Updater;
use crate::utils::mean;
use std::collections::HashMap;

/// Any addressable node: a neuron or a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Neuron(NeuronId),
    Container(ContainerId),
}

impl From<NeuronId> for NodeRef {
    fn from(id: NeuronId) -> Self {
        NodeRef::Neuron(id)
    }
}

impl From<ContainerId> for NodeRef {
    fn from(id: ContainerId) -> Self {
        NodeRef::Container(id)
    }
}

/// Root owner of a simulated network.
pub struct Network {
    pub(crate) config: SimulationConfig,
    pub(crate) neurons: Vec<NeuronNode>,
    pub(crate) layers: Vec<Layer>,
    pub(crate) areas: Vec<Area>,
    pub(crate) regions: Vec<Region>,

    /// Identifier -> node, for every identified node
    pub(crate) registry: HashMap<Identifier, NodeRef>,

    /// Once set, no node or connection may be created
    pub(crate) structure_locked: bool,

    /// `None` only while the updater is running
    updater: Option<Box<dyn Updater>>,
    rule: Box<dyn LearningRule>,
    learning_enabled: bool,

    pub(crate) dopaminergic_signal: f64,
    pub(crate) hippocampal_signal: f64,
    pub(crate) timestep: u64,

    recorder: Option<ActivationRecorder>,
}

impl Network {
    /// Create an empty network with the default configuration.
    pub fn new() -> Self {
        Self::from_validated(SimulationConfig::default())
    }

    /// Create an empty network from a configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration fails validation.
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: SimulationConfig) -> Self {
        Self {
            updater: Some(config.updater.build()),
            rule: config.learning_rule(),
            learning_enabled: config.learning_enabled,
            config,
            neurons: Vec::new(),
            layers: Vec::new(),
            areas: Vec::new(),
            regions: Vec::new(),
            registry: HashMap::new(),
            structure_locked: false,
            dopaminergic_signal: 0.0,
            hippocampal_signal: 0.0,
            timestep: 0,
            recorder: None,
        }
    }

    /// Configuration the network was built with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Registry and structure lock
    // ------------------------------------------------------------------

    /// Register an existing node under its own identifier.
    ///
    /// # Errors
    ///
    /// - `StructureLocked` after `lock_structure()`
    /// - `MissingIdentifier` if the node is anonymous
    /// - `DuplicateIdentifier` if the identifier is already registered
    pub fn register_node(&mut self, node: NodeRef) -> Result<()> {
        self.ensure_unlocked()?;
        let identifier = self
            .node_identifier(node)
            .cloned()
            .ok_or(SelnetError::MissingIdentifier)?;
        self.check_available(&identifier)?;
        self.registry.insert(identifier, node);
        Ok(())
    }

    /// Whether `identifier` names a registered node.
    pub fn is_registered_node(&self, identifier: &str) -> bool {
        self.registry.contains_key(identifier)
    }

    /// Number of registered nodes.
    pub fn num_registered(&self) -> usize {
        self.registry.len()
    }

    /// Freeze the topology. Idempotent; activations and weights stay mutable.
    pub fn lock_structure(&mut self) {
        if !self.structure_locked {
            self.structure_locked = true;
            tracing::debug!(
                target: "selnet",
                neurons = self.neurons.len(),
                registered = self.registry.len(),
                "network structure locked"
            );
        }
    }

    /// Whether `lock_structure()` has been called.
    pub fn is_structure_locked(&self) -> bool {
        self.structure_locked
    }

    pub(crate) fn ensure_unlocked(&self) -> Result<()> {
        if self.structure_locked {
            Err(SelnetError::StructureLocked)
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_available(&self, identifier: &Identifier) -> Result<()> {
        if self.registry.contains_key(identifier) {
            Err(SelnetError::DuplicateIdentifier(identifier.to_string()))
        } else {
            Ok(())
        }
    }

    /// Identifier of any node.
    pub fn node_identifier(&self, node: NodeRef) -> Option<&Identifier> {
        match node {
            NodeRef::Neuron(id) => self.neurons.get(id.as_usize())?.identifier(),
            NodeRef::Container(c) => self.container_identifier(c),
        }
    }

    /// Container a node lives in, if any.
    pub fn environment_of(&self, node: NodeRef) -> Option<ContainerId> {
        match node {
            NodeRef::Neuron(id) => self.neurons.get(id.as_usize())?.environment(),
            NodeRef::Container(c) => self.container_environment(c),
        }
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub(crate) fn add_neuron(
        &mut self,
        kind: NeuronKind,
        identifier: Option<Identifier>,
        environment: Option<ContainerId>,
    ) -> Result<NeuronId> {
        self.ensure_unlocked()?;
        if let Some(identifier) = &identifier {
            self.check_available(identifier)?;
        }

        let id = NeuronId::new(self.neurons.len());
        if let Some(identifier) = &identifier {
            self.registry.insert(identifier.clone(), NodeRef::Neuron(id));
        }
        let resting = self.config.logistic.baseline();
        self.neurons
            .push(NeuronNode::new(identifier, environment, kind, resting));
        Ok(id)
    }

    /// Create a free-standing input neuron.
    pub fn create_input_neuron(
        &mut self,
        identifier: impl Into<Option<Identifier>>,
    ) -> Result<InputUnit> {
        let id = self.add_neuron(NeuronKind::Input, identifier.into(), None)?;
        Ok(InputUnit::new(id))
    }

    /// Create a free-standing operant neuron.
    pub fn create_operant_neuron(
        &mut self,
        identifier: impl Into<Option<Identifier>>,
    ) -> Result<OperantUnit> {
        let id = self.add_neuron(NeuronKind::Operant, identifier.into(), None)?;
        Ok(OperantUnit::new(id))
    }

    /// Create a free-standing respondent neuron.
    pub fn create_respondent_neuron(
        &mut self,
        identifier: impl Into<Option<Identifier>>,
    ) -> Result<RespondentUnit> {
        let id = self.add_neuron(NeuronKind::Respondent, identifier.into(), None)?;
        Ok(RespondentUnit::new(id))
    }

    /// Create a free-standing dopaminergic unit.
    pub fn create_dopaminergic_neuron(
        &mut self,
        identifier: impl Into<Option<Identifier>>,
    ) -> Result<DopaminergicUnit> {
        let id = self.add_neuron(NeuronKind::Dopaminergic, identifier.into(), None)?;
        Ok(DopaminergicUnit::new(id))
    }

    /// Create a free-standing hippocampal unit.
    pub fn create_hippocampal_neuron(
        &mut self,
        identifier: impl Into<Option<Identifier>>,
    ) -> Result<HippocampalUnit> {
        let id = self.add_neuron(NeuronKind::Hippocampal, identifier.into(), None)?;
        Ok(HippocampalUnit::new(id))
    }

    /// Form a connection from `from` onto `to`.
    ///
    /// Operant connections start at the configured initial weight;
    /// respondent connections are fixed at 1.0.
    ///
    /// # Errors
    ///
    /// - `StructureLocked` after `lock_structure()`
    /// - `IndexOutOfBounds` if either id is not in this network
    /// - `InvalidConnection` if `to` cannot receive this class of connection
    pub fn connect(
        &mut self,
        from: NeuronId,
        to: NeuronId,
        kind: ConnectionKind,
        class: ConnectionClass,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        self.checked_neuron(from)?;
        let target_kind = self.checked_neuron(to)?.kind();

        if !target_kind.is_operant() {
            return Err(SelnetError::InvalidConnection(format!(
                "{} cannot receive connections",
                target_kind.describe()
            )));
        }
        if class == ConnectionClass::Respondent && !target_kind.accepts_respondent() {
            return Err(SelnetError::InvalidConnection(format!(
                "{} does not accept respondent input",
                target_kind.describe()
            )));
        }

        let weight = UnitScalar::new(self.config.initial_weight).map_err(|_| {
            SelnetError::WeightOutOfRange {
                value: self.config.initial_weight,
            }
        })?;
        self.neurons[to.as_usize()]
            .body_mut()
            .add_connection(Connection::new(from, weight, kind, class));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Neuron access and identifier lookup
    // ------------------------------------------------------------------

    /// Neuron behind an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this network.
    pub fn neuron(&self, id: NeuronId) -> &NeuronNode {
        &self.neurons[id.as_usize()]
    }

    fn checked_neuron(&self, id: NeuronId) -> Result<&NeuronNode> {
        self.neurons
            .get(id.as_usize())
            .ok_or(SelnetError::IndexOutOfBounds {
                index: id.as_usize(),
                length: self.neurons.len(),
            })
    }

    /// Number of neurons (all kinds).
    pub fn num_neurons(&self) -> usize {
        self.neurons.len()
    }

    /// All neuron ids in creation order.
    pub fn neuron_ids(&self) -> impl Iterator<Item = NeuronId> + '_ {
        (0..self.neurons.len()).map(NeuronId::new)
    }

    /// Every neuron that runs the prepare/commit cycle, in creation order.
    pub fn operant_neurons(&self) -> Vec<NeuronId> {
        self.neuron_ids()
            .filter(|&id| self.neuron(id).kind().is_operant())
            .collect()
    }

    /// Node registered under `identifier`.
    pub fn find_node(&self, identifier: &str) -> Result<NodeRef> {
        self.registry
            .get(identifier)
            .copied()
            .ok_or_else(|| SelnetError::UnknownIdentifier(identifier.to_string()))
    }

    /// Neuron (of any kind) registered under `identifier`.
    pub fn find_neuron(&self, identifier: &str) -> Result<NeuronId> {
        match self.find_node(identifier)? {
            NodeRef::Neuron(id) => Ok(id),
            NodeRef::Container(c) => Err(SelnetError::WrongNodeKind {
                identifier: identifier.to_string(),
                expected: "a neuron",
                actual: c.describe(),
            }),
        }
    }

    fn find_kind(
        &self,
        identifier: &str,
        expected: &'static str,
        accepts: impl Fn(NeuronKind) -> bool,
    ) -> Result<NeuronId> {
        let id = self.find_neuron(identifier)?;
        let kind = self.neuron(id).kind();
        if accepts(kind) {
            Ok(id)
        } else {
            Err(SelnetError::WrongNodeKind {
                identifier: identifier.to_string(),
                expected,
                actual: kind.describe(),
            })
        }
    }

    pub fn find_input_neuron(&self, identifier: &str) -> Result<InputUnit> {
        self.find_kind(identifier, "an input neuron", |k| k == NeuronKind::Input)
            .map(InputUnit::new)
    }

    /// Any operant-capable neuron (operant, respondent or producer).
    pub fn find_operant_neuron(&self, identifier: &str) -> Result<OperantUnit> {
        self.find_kind(identifier, "an operant neuron", NeuronKind::is_operant)
            .map(OperantUnit::new)
    }

    /// Any respondent-capable neuron (respondent or dopaminergic).
    pub fn find_respondent_neuron(&self, identifier: &str) -> Result<RespondentUnit> {
        self.find_kind(identifier, "a respondent neuron", NeuronKind::accepts_respondent)
            .map(RespondentUnit::new)
    }

    pub fn find_dopaminergic_neuron(&self, identifier: &str) -> Result<DopaminergicUnit> {
        self.find_kind(identifier, "a dopaminergic neuron", |k| {
            k == NeuronKind::Dopaminergic
        })
        .map(DopaminergicUnit::new)
    }

    pub fn find_hippocampal_neuron(&self, identifier: &str) -> Result<HippocampalUnit> {
        self.find_kind(identifier, "a hippocampal neuron", |k| {
            k == NeuronKind::Hippocampal
        })
        .map(HippocampalUnit::new)
    }

    fn checked_kind(
        &self,
        id: NeuronId,
        expected: &'static str,
        accepts: impl Fn(NeuronKind) -> bool,
    ) -> Result<NeuronId> {
        let node = self.checked_neuron(id)?;
        if accepts(node.kind()) {
            Ok(id)
        } else {
            Err(SelnetError::WrongNodeKind {
                identifier: node
                    .identifier()
                    .map_or_else(|| format!("#{}", id.as_usize()), |i| i.to_string()),
                expected,
                actual: node.kind().describe(),
            })
        }
    }

    /// Typed handle for a neuron created through a container.
    pub fn input_unit(&self, id: NeuronId) -> Result<InputUnit> {
        self.checked_kind(id, "an input neuron", |k| k == NeuronKind::Input)
            .map(InputUnit::new)
    }

    pub fn operant_unit(&self, id: NeuronId) -> Result<OperantUnit> {
        self.checked_kind(id, "an operant neuron", NeuronKind::is_operant)
            .map(OperantUnit::new)
    }

    pub fn respondent_unit(&self, id: NeuronId) -> Result<RespondentUnit> {
        self.checked_kind(id, "a respondent neuron", NeuronKind::accepts_respondent)
            .map(RespondentUnit::new)
    }

    pub fn dopaminergic_unit(&self, id: NeuronId) -> Result<DopaminergicUnit> {
        self.checked_kind(id, "a dopaminergic neuron", |k| k == NeuronKind::Dopaminergic)
            .map(DopaminergicUnit::new)
    }

    pub fn hippocampal_unit(&self, id: NeuronId) -> Result<HippocampalUnit> {
        self.checked_kind(id, "a hippocampal neuron", |k| k == NeuronKind::Hippocampal)
            .map(HippocampalUnit::new)
    }

    // ------------------------------------------------------------------
    // Read API
    // ------------------------------------------------------------------

    /// Published activation of a neuron.
    pub fn activation_level(&self, id: NeuronId) -> UnitScalar {
        self.neuron(id).body().activation()
    }

    /// Operant excitatory weights in connection order.
    pub fn excitatory_weights(&self, id: NeuronId) -> Vec<f64> {
        self.neuron(id).body().weights(ConnectionKind::Excitatory)
    }

    /// Operant inhibitory weights in connection order.
    pub fn inhibitory_weights(&self, id: NeuronId) -> Vec<f64> {
        self.neuron(id).body().weights(ConnectionKind::Inhibitory)
    }

    /// Committed discrepancy of a neuron (0 for non-producers).
    pub fn discrepancy_signal(&self, id: NeuronId) -> f64 {
        self.neuron(id).body().discrepancy()
    }

    /// Network-wide dopaminergic signal.
    pub fn dopaminergic_signal(&self) -> f64 {
        self.dopaminergic_signal
    }

    /// Network-wide hippocampal signal.
    pub fn hippocampal_signal(&self) -> f64 {
        self.hippocampal_signal
    }

    /// Broadcast signal of one kind.
    pub fn signal(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::Dopaminergic => self.dopaminergic_signal,
            SignalKind::Hippocampal => self.hippocampal_signal,
        }
    }

    /// Number of completed timesteps.
    pub fn timestep(&self) -> u64 {
        self.timestep
    }

    /// First connection of `id` reading from the neuron named `identifier`.
    pub fn find_presynaptic_connection(&self, id: NeuronId, identifier: &str) -> Option<&Connection> {
        let source = match self.registry.get(identifier)? {
            NodeRef::Neuron(source) => *source,
            NodeRef::Container(_) => return None,
        };
        self.neuron(id)
            .body()
            .connections()
            .iter()
            .find(|c| c.presynaptic() == source)
    }

    /// Distinct presynaptic neurons of `id`, in connection order.
    pub fn presynaptic_neurons(&self, id: NeuronId) -> Vec<NeuronId> {
        let mut sources: Vec<NeuronId> = Vec::new();
        for conn in self.neuron(id).body().connections() {
            if !sources.contains(&conn.presynaptic()) {
                sources.push(conn.presynaptic());
            }
        }
        sources
    }

    /// Whether the connection graph contains a directed cycle.
    pub fn has_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.neurons.len()];
        for start in 0..self.neurons.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::OnStack;
            let mut stack = vec![(start, 0usize)];

            while let Some(&(node, edge)) = stack.last() {
                let connections = self.neurons[node].body().connections();
                if edge < connections.len() {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    let next = connections[edge].presynaptic().as_usize();
                    match marks[next] {
                        Mark::OnStack => return true,
                        Mark::Unvisited => {
                            marks[next] = Mark::OnStack;
                            stack.push((next, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Activation and learning (neurons or whole containers)
    // ------------------------------------------------------------------

    fn prepare_context(&self) -> PrepareContext {
        PrepareContext {
            logistic: self.config.logistic,
            respondent_threshold: self.config.respondent_threshold,
            dopaminergic_signal: self.dopaminergic_signal,
        }
    }

    /// Compute the prepared state of one neuron from published values only.
    pub(crate) fn prepared_state(&self, id: NeuronId) -> Prepared {
        let ctx = self.prepare_context();
        let node = self.neuron(id);
        node.body().compute(
            node.kind(),
            |source| self.neurons[source.as_usize()].body().activation(),
            &ctx,
        )
    }

    fn prepare_one(&mut self, id: NeuronId) {
        let prepared = self.prepared_state(id);
        self.neurons[id.as_usize()].body_mut().apply_prepared(prepared);
    }

    /// Prepare every neuron in `ids` against the same published state.
    pub(crate) fn prepare_many(&mut self, ids: &[NeuronId]) {
        #[cfg(feature = "parallel")]
        let prepared: Vec<Prepared> = {
            use rayon::prelude::*;
            let network = &*self;
            ids.par_iter().map(|&id| network.prepared_state(id)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let prepared: Vec<Prepared> = ids.iter().map(|&id| self.prepared_state(id)).collect();

        for (&id, state) in ids.iter().zip(prepared) {
            self.neurons[id.as_usize()].body_mut().apply_prepared(state);
        }
    }

    pub(crate) fn commit_one(&mut self, id: NeuronId) {
        self.neurons[id.as_usize()].body_mut().commit();
    }

    /// Prepare then immediately commit, so later neurons see the new value.
    pub(crate) fn propagate_one(&mut self, id: NeuronId) {
        self.prepare_one(id);
        self.commit_one(id);
    }

    fn learn_one(&mut self, id: NeuronId) {
        let node = &self.neurons[id.as_usize()];
        let signal = self.signal(node.body().discrepancy_source());
        self.neurons[id.as_usize()]
            .body_mut()
            .learn(self.rule.as_ref(), signal);
    }

    fn operant_targets(&self, node: NodeRef) -> Vec<NeuronId> {
        let mut out = Vec::new();
        self.operant_neurons_in(node, &mut out);
        out
    }

    /// Compute pending activations (not visible until commit).
    pub fn prepare_activation(&mut self, node: impl Into<NodeRef>) {
        let targets = self.operant_targets(node.into());
        self.prepare_many(&targets);
    }

    /// Publish pending activations.
    pub fn commit_activation(&mut self, node: impl Into<NodeRef>) {
        for id in self.operant_targets(node.into()) {
            self.commit_one(id);
        }
    }

    /// Prepare every neuron; with `auto_propagate` each is committed right
    /// after its own prepare, in container order.
    pub fn activate(&mut self, node: impl Into<NodeRef>, auto_propagate: bool) {
        let targets = self.operant_targets(node.into());
        if auto_propagate {
            for id in targets {
                self.propagate_one(id);
            }
        } else {
            self.prepare_many(&targets);
        }
    }

    /// Return pending activations to rest (inputs to 0) and zero
    /// discrepancies; with `auto_propagate` the reset is committed too.
    pub fn reset_activation(&mut self, node: impl Into<NodeRef>, auto_propagate: bool) {
        let mut targets = Vec::new();
        self.collect_neurons(node.into(), &mut targets);
        let logistic = self.config.logistic;
        for id in targets {
            let neuron = &mut self.neurons[id.as_usize()];
            let resting = neuron.resting(&logistic);
            neuron.body_mut().reset(resting);
            if auto_propagate {
                neuron.body_mut().commit();
            }
        }
    }

    /// Apply the learning rule to every operant connection.
    pub fn learn(&mut self, node: impl Into<NodeRef>) {
        for id in self.operant_targets(node.into()) {
            self.learn_one(id);
        }
    }

    /// Reset every operant connection, excitatory and inhibitory, to the
    /// configured minimum weight. Respondent connections keep weight 1.
    pub fn unlearn(&mut self, node: impl Into<NodeRef>) {
        self.unlearn_connections(node.into(), None);
    }

    /// Reset only the operant connections of `kind` to the minimum weight.
    pub fn unlearn_kind(&mut self, node: impl Into<NodeRef>, kind: ConnectionKind) {
        self.unlearn_connections(node.into(), Some(kind));
    }

    fn unlearn_connections(&mut self, node: NodeRef, kind: Option<ConnectionKind>) {
        let min_weight = UnitScalar::clamped(self.config.learning.min_weight);
        for id in self.operant_targets(node) {
            self.neurons[id.as_usize()].body_mut().unlearn(min_weight, kind);
        }
    }

    /// Set every operant excitatory weight. Validates before touching anything.
    pub fn set_excitatory_weights(&mut self, node: impl Into<NodeRef>, weight: f64) -> Result<()> {
        self.set_weights(node.into(), Some(weight), None)
    }

    /// Set every operant inhibitory weight. Validates before touching anything.
    pub fn set_inhibitory_weights(&mut self, node: impl Into<NodeRef>, weight: f64) -> Result<()> {
        self.set_weights(node.into(), None, Some(weight))
    }

    /// Set both kinds at once; neither changes unless both are valid.
    pub fn set_connection_weights(
        &mut self,
        node: impl Into<NodeRef>,
        excitatory: f64,
        inhibitory: f64,
    ) -> Result<()> {
        self.set_weights(node.into(), Some(excitatory), Some(inhibitory))
    }

    fn set_weights(&mut self, node: NodeRef, excitatory: Option<f64>, inhibitory: Option<f64>) -> Result<()> {
        let validate = |value: Option<f64>| -> Result<Option<UnitScalar>> {
            value
                .map(|v| UnitScalar::new(v).map_err(|_| SelnetError::WeightOutOfRange { value: v }))
                .transpose()
        };
        let excitatory = validate(excitatory)?;
        let inhibitory = validate(inhibitory)?;

        for id in self.operant_targets(node) {
            let body = self.neurons[id.as_usize()].body_mut();
            if let Some(w) = excitatory {
                body.set_weights(ConnectionKind::Excitatory, w);
            }
            if let Some(w) = inhibitory {
                body.set_weights(ConnectionKind::Inhibitory, w);
            }
        }
        Ok(())
    }

    /// Choose which broadcast signal drives learning.
    pub fn set_discrepancy_source(&mut self, node: impl Into<NodeRef>, source: SignalKind) {
        for id in self.operant_targets(node.into()) {
            self.neurons[id.as_usize()]
                .body_mut()
                .set_discrepancy_source(source);
        }
    }

    pub(crate) fn set_input_activation(&mut self, id: NeuronId, value: UnitScalar) {
        self.neurons[id.as_usize()].body_mut().set_activation(value);
    }

    // ------------------------------------------------------------------
    // Timestep driver
    // ------------------------------------------------------------------

    /// Replace the update strategy.
    pub fn set_updater(&mut self, updater: Box<dyn Updater>) {
        tracing::debug!(target: "selnet", updater = updater.name(), "updater replaced");
        self.updater = Some(updater);
    }

    /// Name of the configured updater.
    pub fn updater_name(&self) -> Option<&'static str> {
        self.updater.as_ref().map(|u| u.name())
    }

    /// Replace the learning rule.
    pub fn set_learning_rule(&mut self, rule: Box<dyn LearningRule>) {
        self.rule = rule;
    }

    pub fn learning_rule(&self) -> &dyn LearningRule {
        self.rule.as_ref()
    }

    /// Whether `update()` learns after each timestep.
    pub fn is_learning_enabled(&self) -> bool {
        self.learning_enabled
    }

    pub fn set_learning_enabled(&mut self, enabled: bool) {
        self.learning_enabled = enabled;
    }

    /// Advance one timestep, learning if learning is enabled.
    pub fn update(&mut self) -> Result<()> {
        self.execute(self.learning_enabled)
    }

    /// Advance one timestep.
    ///
    /// 1. Run the updater (prepare/commit every operant neuron)
    /// 2. Recompute the network-wide discrepancy signals
    /// 3. Learn on every operant neuron, if `learn` is true
    ///
    /// # Errors
    ///
    /// Returns `UpdaterBusy` if called from inside an updater, or any error
    /// the updater reports.
    pub fn execute(&mut self, learn: bool) -> Result<()> {
        let mut updater = self.updater.take().ok_or(SelnetError::UpdaterBusy)?;
        let outcome = updater.update(self);
        self.updater = Some(updater);
        outcome?;

        self.recompute_discrepancy_signals();
        if learn {
            self.learn_all();
        }
        self.timestep += 1;

        tracing::trace!(
            target: "selnet",
            timestep = self.timestep,
            dopaminergic = self.dopaminergic_signal,
            hippocampal = self.hippocampal_signal,
            learn,
            "timestep complete"
        );
        self.record_current_state();
        Ok(())
    }

    /// Learn on every operant neuron in the network.
    pub fn learn_all(&mut self) {
        for id in self.operant_neurons() {
            self.learn_one(id);
        }
    }

    /// Recompute both broadcast signals as means over their producers.
    pub fn recompute_discrepancy_signals(&mut self) {
        self.dopaminergic_signal = self.producer_mean(NeuronKind::Dopaminergic);
        self.hippocampal_signal = self.producer_mean(NeuronKind::Hippocampal);
    }

    fn producer_mean(&self, kind: NeuronKind) -> f64 {
        mean(
            self.neurons
                .iter()
                .filter(|n| n.kind() == kind)
                .map(|n| n.body().discrepancy()),
        )
    }

    /// Reset and commit every neuron and zero both signals, without learning.
    pub fn inter_trial_interval(&mut self) {
        let logistic = self.config.logistic;
        for neuron in self.neurons.iter_mut() {
            let resting = neuron.resting(&logistic);
            let body = neuron.body_mut();
            body.reset(resting);
            body.commit();
        }
        self.dopaminergic_signal = 0.0;
        self.hippocampal_signal = 0.0;
    }

    /// Test hook: overwrite the dopaminergic signal until the next recomputation.
    #[cfg(any(test, feature = "test-hooks"))]
    pub fn force_dopaminergic_signal(&mut self, value: f64) {
        self.dopaminergic_signal = value;
    }

    /// Test hook: overwrite the hippocampal signal until the next recomputation.
    #[cfg(any(test, feature = "test-hooks"))]
    pub fn force_hippocampal_signal(&mut self, value: f64) {
        self.hippocampal_signal = value;
    }

    // ------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------

    /// Start capturing every neuron's activation after each timestep.
    pub fn start_recording(&mut self) {
        let labels = self
            .neurons
            .iter()
            .map(|n| n.identifier().map(|id| id.to_string()))
            .collect();
        self.recorder = Some(ActivationRecorder::new(labels));
    }

    /// Stop recording and return the trace, if recording was started.
    pub fn stop_recording(&mut self) -> Option<ActivationTrace> {
        self.recorder.take().map(ActivationRecorder::export_trace)
    }

    /// Check if recording is currently active.
    pub fn is_recording(&self) -> bool {
        self.recorder.as_ref().map_or(false, |r| r.is_recording())
    }

    /// Pause recording without losing accumulated data.
    pub fn pause_recording(&mut self) {
        if let Some(recorder) = &mut self.recorder {
            recorder.stop();
        }
    }

    /// Resume recording after pausing.
    pub fn resume_recording(&mut self) {
        if let Some(recorder) = &mut self.recorder {
            recorder.start();
        }
    }

    fn record_current_state(&mut self) {
        if !self.is_recording() {
            return;
        }
        let record = TimestepRecord {
            timestep: self.timestep,
            activations: self
                .neurons
                .iter()
                .map(|n| n.body().activation().value())
                .collect(),
            dopaminergic_signal: self.dopaminergic_signal,
            hippocampal_signal: self.hippocampal_signal,
        };
        if let Some(recorder) = &mut self.recorder {
            recorder.record(record);
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
