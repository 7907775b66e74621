//! Choice between a partially and a continuously reinforced stimulus.
//!
//! Stimulus X is paired with the US on every other trial, stimulus Y on every
//! trial. After training both are presented together and the activations and
//! weights along each path are compared.
//!
//! Usage: `cargo run --example choice_experiment -- [training_pairs] [trace.json]`

use anyhow::Context;
use selnet::{
    Axon, Identifier, InputUnit, Network, NeuronKind, OperantNeuron, OperantUnit, SignalKind,
};

const TRIAL_STEPS: usize = 5;
const US_STEP: usize = 3;

fn run_trial(net: &mut Network, stimuli: &[InputUnit], us: InputUnit, reinforced: bool) -> anyhow::Result<()> {
    net.inter_trial_interval();
    for stimulus in stimuli {
        stimulus.set_activation_level(net, 1.0)?;
    }
    for step in 0..TRIAL_STEPS {
        us.set_activation_level(net, if reinforced && step == US_STEP { 1.0 } else { 0.0 })?;
        net.update()?;
    }
    Ok(())
}

/// Builds one stimulus path and returns its operant units in order
/// sensory, hippocampal, association, motor.
fn build_path(net: &mut Network, index: usize, stimulus: InputUnit, us: InputUnit) -> anyhow::Result<Vec<OperantUnit>> {
    let d = net.find_dopaminergic_neuron("D")?;
    let s = net.create_operant_neuron(Identifier::new(format!("S{index}"))?)?;
    let h = net.create_hippocampal_neuron(Identifier::new(format!("H{index}"))?)?;
    let mm = net.create_operant_neuron(Identifier::new(format!("MM{index}"))?)?;

    // Motor units live in a shared respondent layer.
    let motor = net.find_layer("Motor")?;
    let m = net.neuron_at(motor, index - 1)?;
    let m = net.respondent_unit(m)?;

    stimulus.send_excitation(net, &s)?;
    s.send_excitation(net, &h)?;
    s.send_excitation(net, &mm)?;
    mm.send_excitation(net, &m)?;
    mm.send_excitation(net, &d)?;
    h.send_excitation(net, &d)?;
    us.send_respondent_excitation(net, &m)?;

    s.set_discrepancy_source(net, SignalKind::Hippocampal);
    s.set_excitatory_weights(net, 0.2)?;
    h.set_excitatory_weights(net, 0.2)?;

    Ok(vec![s, h.into(), mm, m.into()])
}

fn report(net: &Network, name: &str, path: &[OperantUnit]) {
    let n = path.len() as f64;
    let activation = path.iter().map(|u| u.activation_level(net).value()).sum::<f64>() / n;
    let weight = path.iter().map(|u| u.excitatory_weights(net)[0]).sum::<f64>() / n;
    println!("Path {name}: mean activation {activation:.3}, mean weight {weight:.3}");
    for unit in path {
        let label = unit.identifier(net).map(|id| id.as_str()).unwrap_or("?");
        println!(
            "  {label:>4}  a={:.3}  w={:.3}",
            unit.activation_level(net).value(),
            unit.excitatory_weights(net)[0]
        );
    }
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let pairs: usize = match args.next() {
        Some(text) => text.parse().context("training_pairs must be a number")?,
        None => 100,
    };
    let trace_path = args.next();

    let mut net = Network::new();
    let x = net.create_input_neuron(Identifier::new("X")?)?;
    let y = net.create_input_neuron(Identifier::new("Y")?)?;
    let us = net.create_input_neuron(Identifier::new("US")?)?;
    let d = net.create_dopaminergic_neuron(Identifier::new("D")?)?;
    us.send_respondent_excitation(&mut net, &d)?;
    net.create_layer(Identifier::new("Motor")?, NeuronKind::Respondent)?;

    let path_x = build_path(&mut net, 1, x, us)?;
    let path_y = build_path(&mut net, 2, y, us)?;
    net.lock_structure();

    println!("=== Training ({pairs} pairs) ===");
    for i in 0..pairs {
        run_trial(&mut net, &[x], us, i % 2 == 0)?;
        run_trial(&mut net, &[y], us, true)?;
        if (i + 1) % 25 == 0 {
            println!(
                "pair {:>4}: S1 w={:.3}  S2 w={:.3}",
                i + 1,
                path_x[0].excitatory_weights(&net)[0],
                path_y[0].excitatory_weights(&net)[0]
            );
        }
    }

    println!("\n=== Choice (X + Y, no US) ===");
    net.start_recording();
    for _ in 0..3 {
        run_trial(&mut net, &[x, y], us, false)?;
    }
    let trace = net.stop_recording().context("recorder was not running")?;

    report(&net, "X", &path_x);
    report(&net, "Y", &path_y);

    if let Some(path) = trace_path {
        trace.to_json_file(&path)?;
        println!("\nWrote {} recorded steps to {path}", trace.total_steps());
    }

    Ok(())
}
