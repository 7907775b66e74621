//! Timestep update strategies.
//!
//! An [`Updater`] runs the activation pass of one timestep: it decides the
//! order in which operant neurons prepare and commit. Signal recomputation
//! and learning are handled by [`Network::execute`] after the pass.
//!
//! - [`NaturalUpdater`] prepares every neuron, then commits every neuron.
//!   Each neuron sees only the previous timestep's published values, so the
//!   result is independent of order.
//! - [`RandomizedUpdater`] draws a fresh permutation each timestep and
//!   commits each neuron right after preparing it, so later neurons may see
//!   values published earlier in the same timestep.

use crate::error::Result;
use crate::network::Network;
use crate::neuron::NeuronId;
use crate::utils::shuffle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Debug;

/// Activation pass strategy for one timestep.
pub trait Updater: Debug + Send + Sync {
    /// Run prepare/commit over every operant neuron of `network`.
    fn update(&mut self, network: &mut Network) -> Result<()>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Synchronous prepare-all then commit-all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalUpdater;

impl NaturalUpdater {
    pub fn new() -> Self {
        NaturalUpdater
    }
}

impl Updater for NaturalUpdater {
    fn update(&mut self, network: &mut Network) -> Result<()> {
        let order = network.operant_neurons();
        network.prepare_many(&order);
        for &id in &order {
            network.commit_one(id);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "natural"
    }
}

/// Continuous propagation in a fresh random order every timestep.
///
/// Inherently sequential: never parallelized.
#[derive(Debug, Clone)]
pub struct RandomizedUpdater {
    rng: StdRng,
    last_order: Vec<NeuronId>,
}

impl RandomizedUpdater {
    /// Deterministic updater seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            last_order: Vec::new(),
        }
    }

    /// Updater seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            last_order: Vec::new(),
        }
    }

    /// Order used by the most recent timestep.
    pub fn last_order(&self) -> &[NeuronId] {
        &self.last_order
    }
}

impl Updater for RandomizedUpdater {
    fn update(&mut self, network: &mut Network) -> Result<()> {
        let mut order = network.operant_neurons();
        shuffle(&mut order, &mut self.rng);
        for &id in &order {
            network.propagate_one(id);
        }
        self.last_order = order;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "randomized"
    }
}
