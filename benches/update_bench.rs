use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use selnet::{Axon, Identifier, Network, NeuronKind, RandomizedUpdater, Result};
use std::time::Duration;

/// Fully connected layered network: one input layer feeding `depth`
/// operant layers of `width` neurons each.
fn layered(width: usize, depth: usize) -> Result<Network> {
    let mut net = Network::new();
    let inputs = net.create_layer(Identifier::new("In")?, NeuronKind::Input)?;
    net.ensure_len(inputs, width)?;

    let mut previous = net.layer_neurons(inputs).to_vec();
    for d in 0..depth {
        let layer = net.create_layer(Identifier::new(format!("L{d}"))?, NeuronKind::Operant)?;
        net.ensure_len(layer, width)?;
        let current = net.layer_neurons(layer).to_vec();
        for &post in &current {
            let target = net.operant_unit(post)?;
            for &pre in &previous {
                match net.neuron(pre).kind() {
                    NeuronKind::Input => net.input_unit(pre)?.send_excitation(&mut net, &target)?,
                    _ => net.operant_unit(pre)?.send_excitation(&mut net, &target)?,
                }
            }
        }
        net.set_excitatory_weights(layer, 1.0 / width as f64)?;
        previous = current;
    }
    net.lock_structure();

    for id in net.layer_neurons(inputs).to_vec() {
        net.input_unit(id)?.set_activation_level(&mut net, 1.0)?;
    }
    Ok(net)
}

fn build(width: usize, depth: usize) -> Network {
    layered(width, depth).expect("failed to build network")
}

// ============================================================================
// Benchmark: Natural updater step
// ============================================================================

fn bench_natural_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("natural_update");
    group.measurement_time(Duration::from_secs(10));

    for width in [8, 32, 128].iter() {
        let mut net = build(*width, 4);
        group.throughput(Throughput::Elements(net.num_neurons() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), width, |b, _| {
            b.iter(|| {
                net.update().unwrap();
                black_box(net.dopaminergic_signal());
            });
        });
    }
    group.finish();
}

// ============================================================================
// Benchmark: Randomized updater step
// ============================================================================

fn bench_randomized_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomized_update");
    group.measurement_time(Duration::from_secs(10));

    for width in [8, 32, 128].iter() {
        let mut net = build(*width, 4);
        net.set_updater(Box::new(RandomizedUpdater::new(0)));
        group.throughput(Throughput::Elements(net.num_neurons() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), width, |b, _| {
            b.iter(|| {
                net.update().unwrap();
                black_box(net.timestep());
            });
        });
    }
    group.finish();
}

// ============================================================================
// Benchmark: Prepare/commit without learning
// ============================================================================

fn bench_execute_without_learning(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_no_learning");

    for depth in [2, 8, 16].iter() {
        let mut net = build(32, *depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            b.iter(|| {
                net.execute(false).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_natural_update,
    bench_randomized_update,
    bench_execute_without_learning
);
criterion_main!(benches);
