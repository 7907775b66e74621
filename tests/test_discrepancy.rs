//! Integration tests for discrepancy signals and learning.
//!
//! Tests:
//! - Dopaminergic discrepancy as the activation delta
//! - Hippocampal discrepancy with the dopaminergic term
//! - Network-wide means and the forcing hooks
//! - Discrepancy source selection and weight learning

use approx::assert_abs_diff_eq;
use selnet::{
    Axon, ConnectionKind, DiscrepancyProducer, Identifier, Logistic, Network, OperantNeuron, Result, SignalKind,
};

fn id(text: &str) -> Identifier {
    Identifier::new(text).unwrap()
}

#[test]
fn test_dopaminergic_signal_is_activation_delta() -> Result<()> {
    let mut net = Network::new();
    let us = net.create_input_neuron(id("US"))?;
    let d = net.create_dopaminergic_neuron(id("D"))?;
    us.send_respondent_excitation(&mut net, &d)?;
    net.lock_structure();

    let mut previous = d.activation_level(&net).value();
    for level in [1.0, 1.0, 0.0, 0.0, 1.0] {
        us.set_activation_level(&mut net, level)?;
        net.execute(false)?;
        let current = d.activation_level(&net).value();
        assert_abs_diff_eq!(d.discrepancy_signal(&net), current - previous, epsilon = 1e-12);
        assert_abs_diff_eq!(net.dopaminergic_signal(), current - previous, epsilon = 1e-12);
        previous = current;
    }

    Ok(())
}

#[test]
fn test_signal_is_mean_over_producers() -> Result<()> {
    let mut net = Network::new();
    let us = net.create_input_neuron(None)?;
    let d1 = net.create_dopaminergic_neuron(None)?;
    let d2 = net.create_dopaminergic_neuron(None)?;
    us.send_respondent_excitation(&mut net, &d1)?;
    net.lock_structure();

    us.set_activation_level(&mut net, 1.0)?;
    net.execute(false)?;

    let expected = (d1.discrepancy_signal(&net) + d2.discrepancy_signal(&net)) / 2.0;
    assert!(d1.discrepancy_signal(&net) > 0.9);
    assert_eq!(d2.discrepancy_signal(&net), 0.0);
    assert_abs_diff_eq!(net.dopaminergic_signal(), expected, epsilon = 1e-12);

    Ok(())
}

#[test]
fn test_no_producers_means_zero_signal() -> Result<()> {
    let mut net = Network::new();
    net.create_operant_neuron(None)?;
    net.execute(false)?;
    assert_eq!(net.dopaminergic_signal(), 0.0);
    assert_eq!(net.hippocampal_signal(), 0.0);

    Ok(())
}

#[test]
fn test_forced_signal_holds_until_recomputation() -> Result<()> {
    let mut net = Network::new();
    net.create_dopaminergic_neuron(None)?;
    net.create_hippocampal_neuron(None)?;

    net.force_dopaminergic_signal(0.42);
    net.force_hippocampal_signal(0.17);
    assert_eq!(net.dopaminergic_signal(), 0.42);
    assert_eq!(net.hippocampal_signal(), 0.17);

    net.recompute_discrepancy_signals();
    assert_eq!(net.dopaminergic_signal(), 0.0);
    assert_eq!(net.hippocampal_signal(), 0.0);

    Ok(())
}

#[test]
fn test_hippocampal_discrepancy_formula() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(None)?;
    let h = net.create_hippocampal_neuron(None)?;
    x.send_excitation(&mut net, &h)?;
    h.set_excitatory_weights(&mut net, 0.5)?;
    net.lock_structure();

    // Dopaminergic term with no activation change.
    net.force_dopaminergic_signal(0.3);
    net.execute(false)?;
    let logistic = Logistic::default();
    let change = (logistic.apply(0.0).value() - logistic.baseline().value()).abs();
    assert_abs_diff_eq!(h.discrepancy_signal(&net), change + 0.3, epsilon = 1e-12);
    assert_abs_diff_eq!(net.hippocampal_signal(), h.discrepancy_signal(&net), epsilon = 1e-12);

    // Activation change plus a dopaminergic term scaled by (1 - previous).
    let previous_discrepancy = h.discrepancy_signal(&net);
    let previous_activation = h.activation_level(&net).value();
    x.set_activation_level(&mut net, 1.0)?;
    net.force_dopaminergic_signal(0.2);
    net.execute(false)?;

    let change = (logistic.apply(0.5).value() - previous_activation).abs();
    let expected = (change + 0.2 * (1.0 - previous_discrepancy)).clamp(0.0, 1.0);
    assert_abs_diff_eq!(h.discrepancy_signal(&net), expected, epsilon = 1e-12);

    Ok(())
}

#[test]
fn test_hippocampal_discrepancy_is_bounded() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(None)?;
    let h = net.create_hippocampal_neuron(None)?;
    x.send_excitation(&mut net, &h)?;
    h.set_excitatory_weights(&mut net, 1.0)?;
    net.lock_structure();

    x.set_activation_level(&mut net, 1.0)?;
    net.force_dopaminergic_signal(1.0);
    net.execute(false)?;
    assert_eq!(h.discrepancy_signal(&net), 1.0);

    Ok(())
}

#[test]
fn test_default_discrepancy_sources() -> Result<()> {
    let mut net = Network::new();
    let s = net.create_operant_neuron(None)?;
    let h = net.create_hippocampal_neuron(None)?;
    let d = net.create_dopaminergic_neuron(None)?;

    assert_eq!(s.discrepancy_source(&net), SignalKind::Dopaminergic);
    assert_eq!(d.discrepancy_source(&net), SignalKind::Dopaminergic);
    assert_eq!(h.discrepancy_source(&net), SignalKind::Hippocampal);

    s.set_discrepancy_source(&mut net, SignalKind::Hippocampal);
    assert_eq!(s.discrepancy_source(&net), SignalKind::Hippocampal);

    Ok(())
}

#[test]
fn test_learning_follows_discrepancy_source() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(None)?;
    let dop = net.create_operant_neuron(None)?;
    let hip = net.create_operant_neuron(None)?;
    x.send_excitation(&mut net, &dop)?;
    x.send_excitation(&mut net, &hip)?;
    hip.set_discrepancy_source(&mut net, SignalKind::Hippocampal);
    net.set_excitatory_weights(dop, 0.5)?;
    net.set_excitatory_weights(hip, 0.5)?;
    net.lock_structure();

    x.set_activation_level(&mut net, 1.0)?;
    net.execute(false)?;

    net.force_dopaminergic_signal(0.0);
    net.force_hippocampal_signal(0.8);
    net.learn_all();

    assert!(dop.excitatory_weights(&net)[0] < 0.5);
    assert!(hip.excitatory_weights(&net)[0] > 0.5);

    Ok(())
}

#[test]
fn test_learning_rule_magnitudes() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(None)?;
    let s = net.create_operant_neuron(None)?;
    x.send_excitation(&mut net, &s)?;
    s.set_excitatory_weights(&mut net, 0.2)?;
    net.lock_structure();

    x.set_activation_level(&mut net, 1.0)?;
    net.execute(false)?;
    let a = s.activation_level(&net).value();

    // Acquisition: alpha * d * x * a * (1 - sum of weights)
    net.force_dopaminergic_signal(0.6);
    s.learn(&mut net);
    let grown = 0.2 + 0.5 * 0.6 * 1.0 * a * 0.8;
    assert_abs_diff_eq!(s.excitatory_weights(&net)[0], grown, epsilon = 1e-12);

    // Decay: -beta * w * x * a
    net.force_dopaminergic_signal(0.0);
    s.learn(&mut net);
    let decayed = grown - 0.1 * grown * 1.0 * a;
    assert_abs_diff_eq!(s.excitatory_weights(&net)[0], decayed, epsilon = 1e-12);

    Ok(())
}

#[test]
fn test_silent_presynaptic_input_does_not_learn() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(None)?;
    let s = net.create_operant_neuron(None)?;
    x.send_excitation(&mut net, &s)?;
    s.set_excitatory_weights(&mut net, 0.3)?;
    net.lock_structure();

    net.execute(false)?;
    net.force_dopaminergic_signal(0.9);
    s.learn(&mut net);
    assert_eq!(s.excitatory_weights(&net), vec![0.3]);

    Ok(())
}

#[test]
fn test_unlearn_restores_minimum_weight() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(None)?;
    let s = net.create_operant_neuron(None)?;
    x.send_excitation(&mut net, &s)?;
    x.send_inhibition(&mut net, &s)?;
    net.set_connection_weights(s, 0.8, 0.6)?;

    s.unlearn(&mut net);
    assert_eq!(s.excitatory_weights(&net), vec![0.01]);
    assert_eq!(s.inhibitory_weights(&net), vec![0.01]);

    Ok(())
}

#[test]
fn test_unlearn_one_connection_kind() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(None)?;
    let s = net.create_operant_neuron(None)?;
    x.send_excitation(&mut net, &s)?;
    x.send_inhibition(&mut net, &s)?;
    net.set_connection_weights(s, 0.8, 0.6)?;

    s.unlearn_kind(&mut net, ConnectionKind::Excitatory);
    assert_eq!(s.excitatory_weights(&net), vec![0.01]);
    assert_eq!(s.inhibitory_weights(&net), vec![0.6]);

    Ok(())
}
