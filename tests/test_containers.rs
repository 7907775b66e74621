//! Integration tests for the container hierarchy.
//!
//! Tests:
//! - Lazy growth and auto-generated identifiers
//! - Growth after the structure lock
//! - Fan-out of activation, weight and learning operations
//! - Depth/width queries and subtree flattening
//! - Failed nested creation leaves the hierarchy untouched

use selnet::{
    Axon, ContainerId, Identifier, Network, NeuronKind, NodeRef, OperantNeuron, Result,
    SelnetError,
};

fn id(text: &str) -> Identifier {
    Identifier::new(text).unwrap()
}

#[test]
fn test_layer_subscript_grows_lazily() -> Result<()> {
    let mut net = Network::new();
    let layer = net.create_layer(id("Motor"), NeuronKind::Respondent)?;
    assert_eq!(net.container_len(layer.into()), 0);

    let third = net.neuron_at(layer, 2)?;
    assert_eq!(net.container_len(layer.into()), 3);
    assert_eq!(net.neuron(third).kind(), NeuronKind::Respondent);
    assert_eq!(net.find_neuron("Motor_2")?, third);
    assert!(net.find_respondent_neuron("Motor_0").is_ok());

    // Subscripting an existing slot does not grow.
    assert_eq!(net.neuron_at(layer, 0)?, net.layer_neurons(layer)[0]);
    assert_eq!(net.container_len(layer.into()), 3);

    Ok(())
}

#[test]
fn test_create_with_explicit_identifier() -> Result<()> {
    let mut net = Network::new();
    let area = net.create_area(id("Sensory"), NeuronKind::Operant)?;
    let s = net.create_neuron_in_area(area, id("S1"), 0, 1)?;

    assert_eq!(net.max_layer_depth(area.into()), 1);
    let layer = net.area_layers(area)[0];
    assert_eq!(net.layer_neurons(layer), &[net.find_neuron("Sensory_0_0")?, s]);
    assert_eq!(net.environment_of(s.into()), Some(ContainerId::Layer(layer)));
    assert_eq!(net.environment_of(layer.into()), Some(ContainerId::Area(area)));

    Ok(())
}

#[test]
fn test_create_rejects_occupied_and_duplicate() -> Result<()> {
    let mut net = Network::new();
    let layer = net.create_layer(None, NeuronKind::Operant)?;
    net.create_neuron_in(layer, id("A"), 0)?;

    assert!(matches!(
        net.create_neuron_in(layer, id("B"), 0),
        Err(SelnetError::SlotOccupied { index: 0 })
    ));
    assert!(matches!(
        net.create_neuron_in(layer, id("A"), 3),
        Err(SelnetError::DuplicateIdentifier(_))
    ));
    // Neither failure grew the layer.
    assert_eq!(net.container_len(layer.into()), 1);

    Ok(())
}

#[test]
fn test_growth_after_lock_fails() -> Result<()> {
    let mut net = Network::new();
    let region = net.create_region(id("R"), NeuronKind::Operant)?;
    net.ensure_len(region, 2)?;
    net.lock_structure();

    assert!(net.area_at(region, 1).is_ok());
    assert!(matches!(
        net.area_at(region, 2),
        Err(SelnetError::IndexOutOfBounds { index: 2, length: 2 })
    ));
    assert!(matches!(
        net.ensure_len(region, 5),
        Err(SelnetError::StructureLocked)
    ));
    assert!(matches!(
        net.create_neuron_in_region(region, None, 0, 0, 0),
        Err(SelnetError::StructureLocked)
    ));

    Ok(())
}

#[test]
fn test_layer_fan_out() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(id("X"))?;
    let layer = net.create_layer(id("L"), NeuronKind::Operant)?;
    net.ensure_len(layer, 3)?;
    for n in net.layer_neurons(layer).to_vec() {
        let unit = net.operant_unit(n)?;
        x.send_excitation(&mut net, &unit)?;
    }
    net.lock_structure();

    net.set_excitatory_weights(layer, 1.0)?;
    for &n in net.layer_neurons(layer) {
        assert_eq!(net.excitatory_weights(n), vec![1.0]);
    }

    x.set_activation_level(&mut net, 1.0)?;
    net.activate(layer, false);
    for &n in net.layer_neurons(layer) {
        assert!(net.activation_level(n).value() < 0.01);
    }
    net.commit_activation(layer);
    for &n in net.layer_neurons(layer) {
        assert!(net.activation_level(n).value() > 0.99);
    }

    net.reset_activation(layer, true);
    for &n in net.layer_neurons(layer) {
        assert_eq!(net.activation_level(n), net.config().logistic.baseline());
    }

    Ok(())
}

#[test]
fn test_fan_out_weight_validation_is_atomic() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(None)?;
    let area = net.create_area(None, NeuronKind::Operant)?;
    let a = net.create_neuron_in_area(area, None, 0, 0)?;
    let b = net.create_neuron_in_area(area, None, 1, 0)?;
    for target in [a, b] {
        let unit = net.operant_unit(target)?;
        x.send_excitation(&mut net, &unit)?;
    }
    assert!(matches!(
        net.respondent_unit(a),
        Err(SelnetError::WrongNodeKind { .. })
    ));

    assert!(net.set_excitatory_weights(area, 1.5).is_err());
    assert_eq!(net.excitatory_weights(a), vec![0.01]);
    assert_eq!(net.excitatory_weights(b), vec![0.01]);

    net.set_excitatory_weights(area, 0.3)?;
    assert_eq!(net.excitatory_weights(b), vec![0.3]);

    Ok(())
}

#[test]
fn test_region_learn_and_unlearn() -> Result<()> {
    let mut net = Network::new();
    let x = net.create_input_neuron(id("X"))?;
    let region = net.create_region(id("R"), NeuronKind::Operant)?;
    let n = net.create_neuron_in_region(region, None, 1, 1, 1)?;
    let unit = net.find_operant_neuron("R_1_1_0")?;
    let target = net.operant_unit(n)?;
    x.send_excitation(&mut net, &target)?;
    x.send_excitation(&mut net, &unit)?;
    net.lock_structure();

    x.set_activation_level(&mut net, 1.0)?;
    net.activate(region, true);
    net.force_dopaminergic_signal(0.9);
    net.learn(region);
    assert!(net.excitatory_weights(n)[0] > 0.01);
    assert!(unit.excitatory_weights(&net)[0] > 0.01);

    net.unlearn(region);
    assert_eq!(net.excitatory_weights(n), vec![0.01]);

    Ok(())
}

#[test]
fn test_depth_width_and_flattening() -> Result<()> {
    let mut net = Network::new();
    let region = net.create_region(None, NeuronKind::Operant)?;
    net.create_neuron_in_region(region, None, 0, 3, 0)?;
    net.create_neuron_in_region(region, None, 2, 0, 5)?;

    assert_eq!(net.max_layer_depth(region.into()), 4);
    assert_eq!(net.max_node_width(region.into()), 6);

    let mut all = Vec::new();
    net.operant_neurons_in(NodeRef::from(region), &mut all);
    assert_eq!(all.len(), 7);
    assert_eq!(all.len(), net.num_neurons());

    Ok(())
}

#[test]
fn test_input_layer_is_skipped_by_fan_out() -> Result<()> {
    let mut net = Network::new();
    let inputs = net.create_layer(None, NeuronKind::Input)?;
    let first = net.neuron_at(inputs, 0)?;
    net.lock_structure();

    net.activate(inputs, true);
    assert_eq!(net.activation_level(first).value(), 0.0);

    let mut out = Vec::new();
    net.operant_neurons_in(inputs.into(), &mut out);
    assert!(out.is_empty());

    Ok(())
}

#[test]
fn test_failed_area_create_leaves_area_unchanged() -> Result<()> {
    let mut net = Network::new();
    let area = net.create_area(id("A"), NeuronKind::Operant)?;

    // "A_0" would name both the grown layer and the new neuron.
    let err = net.create_neuron_in_area(area, id("A_0"), 0, 0).unwrap_err();
    assert!(matches!(err, SelnetError::DuplicateIdentifier(ref name) if name == "A_0"));
    assert!(net.area_layers(area).is_empty());
    assert!(!net.is_registered_node("A_0"));
    assert_eq!(net.num_registered(), 1);

    // A neuron name taken elsewhere is rejected before the layer grows.
    net.create_operant_neuron(id("Taken"))?;
    let err = net.create_neuron_in_area(area, id("Taken"), 2, 1).unwrap_err();
    assert!(matches!(err, SelnetError::DuplicateIdentifier(_)));
    assert!(net.area_layers(area).is_empty());
    assert_eq!(net.num_neurons(), 1);

    // Inner growth colliding with the registry is caught too.
    net.create_operant_neuron(id("A_1_0"))?;
    let err = net.create_neuron_in_area(area, None, 1, 2).unwrap_err();
    assert!(matches!(err, SelnetError::DuplicateIdentifier(ref name) if name == "A_1_0"));
    assert!(net.area_layers(area).is_empty());

    net.create_neuron_in_area(area, None, 0, 1)?;
    assert_eq!(net.area_layers(area).len(), 1);
    assert!(net.is_registered_node("A_0_1"));

    Ok(())
}

#[test]
fn test_failed_region_create_leaves_region_unchanged() -> Result<()> {
    let mut net = Network::new();
    let region = net.create_region(id("R"), NeuronKind::Operant)?;
    net.create_operant_neuron(id("R_0_0_0"))?;

    let err = net.create_neuron_in_region(region, None, 0, 0, 0).unwrap_err();
    assert!(matches!(err, SelnetError::DuplicateIdentifier(ref name) if name == "R_0_0_0"));
    assert!(net.region_areas(region).is_empty());
    assert!(!net.is_registered_node("R_0"));
    assert!(!net.is_registered_node("R_0_0"));

    // Existing levels are walked, only the missing ones are checked.
    net.create_neuron_in_region(region, None, 1, 0, 0)?;
    let before = net.num_registered();
    let err = net
        .create_neuron_in_region(region, id("R_1_1"), 1, 1, 0)
        .unwrap_err();
    assert!(matches!(err, SelnetError::DuplicateIdentifier(ref name) if name == "R_1_1"));
    assert_eq!(net.area_layers(net.region_areas(region)[1]).len(), 1);
    assert_eq!(net.num_registered(), before);

    let err = net.create_neuron_in_region(region, None, 1, 0, 0).unwrap_err();
    assert!(matches!(err, SelnetError::SlotOccupied { index: 0 }));

    net.lock_structure();
    assert!(matches!(
        net.create_neuron_in_region(region, None, 3, 0, 0),
        Err(SelnetError::StructureLocked)
    ));
    assert_eq!(net.region_areas(region).len(), 2);

    Ok(())
}
