//! Integration tests for update strategies.
//!
//! Tests:
//! - Natural updater order independence
//! - Randomized updater reshuffling and range invariants
//! - Custom updaters and re-entry protection

use proptest::prelude::*;
use selnet::{
    Axon, Identifier, NaturalUpdater, Network, NeuronId, OperantNeuron, RandomizedUpdater, Result,
    SelnetError, Updater,
};

/// Small recurrent network: two inputs feeding a ring of three operant
/// neurons with mixed excitation and inhibition.
fn ring() -> Result<Network> {
    let mut net = Network::new();
    let x = net.create_input_neuron(Identifier::new("X")?)?;
    let y = net.create_input_neuron(Identifier::new("Y")?)?;
    let a = net.create_operant_neuron(Identifier::new("A")?)?;
    let b = net.create_operant_neuron(Identifier::new("B")?)?;
    let c = net.create_respondent_neuron(Identifier::new("C")?)?;

    x.send_excitation(&mut net, &a)?;
    y.send_excitation(&mut net, &b)?;
    a.send_excitation(&mut net, &b)?;
    b.send_excitation(&mut net, &c)?;
    c.send_inhibition(&mut net, &a)?;
    y.send_respondent_excitation(&mut net, &c)?;

    net.set_connection_weights(a, 0.7, 0.4)?;
    net.set_excitatory_weights(b, 0.35)?;
    net.set_excitatory_weights(c, 0.9)?;
    net.lock_structure();

    x.set_activation_level(&mut net, 1.0)?;
    y.set_activation_level(&mut net, 0.4)?;
    Ok(net)
}

fn activations(net: &Network) -> Vec<f64> {
    net.neuron_ids()
        .map(|id| net.activation_level(id).value())
        .collect()
}

#[test]
fn test_natural_updater_is_order_independent() -> Result<()> {
    let mut natural = ring()?;
    let mut manual = ring()?;

    for _ in 0..5 {
        natural.execute(false)?;

        let mut order: Vec<NeuronId> = manual.operant_neurons();
        order.reverse();
        for &id in &order {
            manual.prepare_activation(id);
        }
        order.rotate_left(1);
        for &id in &order {
            manual.commit_activation(id);
        }
    }

    assert_eq!(activations(&natural), activations(&manual));
    Ok(())
}

#[test]
fn test_randomized_updater_reshuffles() -> Result<()> {
    let mut net = ring()?;
    let mut updater = RandomizedUpdater::new(9);

    let mut orders = Vec::new();
    for _ in 0..12 {
        updater.update(&mut net)?;
        orders.push(updater.last_order().to_vec());
    }

    for order in &orders {
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, net.operant_neurons());
    }
    assert!(orders.windows(2).any(|pair| pair[0] != pair[1]));

    Ok(())
}

#[test]
fn test_randomized_updater_is_reproducible() -> Result<()> {
    let mut first = ring()?;
    let mut second = ring()?;
    first.set_updater(Box::new(RandomizedUpdater::new(21)));
    second.set_updater(Box::new(RandomizedUpdater::new(21)));

    for _ in 0..10 {
        first.update()?;
        second.update()?;
    }
    assert_eq!(activations(&first), activations(&second));
    let b = first.find_neuron("B")?;
    assert_eq!(first.excitatory_weights(b), second.excitatory_weights(b));

    Ok(())
}

#[test]
fn test_set_updater_swaps_strategy() -> Result<()> {
    let mut net = ring()?;
    assert_eq!(net.updater_name(), Some("natural"));
    net.set_updater(Box::new(RandomizedUpdater::new(1)));
    assert_eq!(net.updater_name(), Some("randomized"));
    net.set_updater(Box::new(NaturalUpdater::new()));
    assert_eq!(net.updater_name(), Some("natural"));

    Ok(())
}

/// Updater that tries to drive the network from inside its own pass.
#[derive(Debug)]
struct ReentrantUpdater;

impl Updater for ReentrantUpdater {
    fn update(&mut self, network: &mut Network) -> Result<()> {
        match network.update() {
            Err(SelnetError::UpdaterBusy) => Ok(()),
            Err(other) => Err(other),
            Ok(()) => Err(SelnetError::InvalidParameter("nested update ran".into())),
        }
    }

    fn name(&self) -> &'static str {
        "reentrant"
    }
}

#[test]
fn test_reentrant_update_is_rejected() -> Result<()> {
    let mut net = ring()?;
    net.set_updater(Box::new(ReentrantUpdater));
    net.update()?;

    // The updater is back in place after the outer step.
    assert_eq!(net.updater_name(), Some("reentrant"));
    assert_eq!(net.timestep(), 1);

    Ok(())
}

/// Updater that only advances the first operant neuron.
#[derive(Debug)]
struct FirstOnly;

impl Updater for FirstOnly {
    fn update(&mut self, network: &mut Network) -> Result<()> {
        if let Some(&first) = network.operant_neurons().first() {
            network.activate(first, true);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "first-only"
    }
}

#[test]
fn test_custom_updater() -> Result<()> {
    let mut net = ring()?;
    let before = activations(&net);
    net.set_updater(Box::new(FirstOnly));
    net.execute(false)?;

    let after = activations(&net);
    let a = net.find_neuron("A")?.as_usize();
    assert_ne!(before[a], after[a]);
    for (index, (b, c)) in before.iter().zip(&after).enumerate() {
        if index != a {
            assert_eq!(b, c);
        }
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_randomized_keeps_activations_in_range(seed in any::<u64>(), steps in 1usize..20) {
        let mut net = ring().unwrap();
        net.set_updater(Box::new(RandomizedUpdater::new(seed)));
        for _ in 0..steps {
            net.update().unwrap();
            for value in activations(&net) {
                prop_assert!((0.0..=1.0).contains(&value));
            }
            for id in net.operant_neurons() {
                for w in net.excitatory_weights(id).into_iter().chain(net.inhibitory_weights(id)) {
                    prop_assert!((0.0..=1.0).contains(&w));
                }
            }
        }
    }
}
