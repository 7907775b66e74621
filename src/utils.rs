//! Utility functions shared across the engine.

use rand::Rng;

/// Shuffle a slice in-place using the Fisher-Yates algorithm.
///
/// # Examples
///
/// ```
/// use selnet::utils::shuffle;
/// use rand::SeedableRng;
///
/// let mut order = vec![0, 1, 2, 3, 4];
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// shuffle(&mut order, &mut rng);
/// order.sort();
/// assert_eq!(order, vec![0, 1, 2, 3, 4]);
/// ```
pub fn shuffle<T, R: Rng>(arr: &mut [T], rng: &mut R) {
    for i in (1..arr.len()).rev() {
        let j = rng.gen_range(0..=i);
        arr.swap(i, j);
    }
}

/// Arithmetic mean, or 0.0 for an empty sequence.
///
/// # Examples
///
/// ```
/// use selnet::utils::mean;
///
/// assert_eq!(mean([0.25, 0.75]), 0.5);
/// assert_eq!(mean(std::iter::empty()), 0.0);
/// ```
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
