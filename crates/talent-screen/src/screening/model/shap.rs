use super::tree::RegressionTree;

/// Largest number of distinct split features a single tree may use for exact enumeration.
pub(crate) const MAX_TREE_FEATURES: usize = 16;

/// Exact Shapley values of one tree's path-dependent expectation function.
///
/// Only the features the tree splits on can receive credit, so the coalition enumeration runs
/// over those alone. Contributions are added into `phi`; the return value is the tree's
/// expectation with no feature observed, so `sum(phi) + expectation == tree.predict(x)`.
pub(crate) fn accumulate_tree_shap(
    tree: &RegressionTree,
    features: &[f64],
    phi: &mut [f64],
) -> Result<f64, usize> {
    let used = tree.split_features();
    let m = used.len();
    if m > MAX_TREE_FEATURES {
        return Err(m);
    }

    let coalitions = 1usize << m;
    let values: Vec<f64> = (0..coalitions)
        .map(|mask| {
            tree.conditional_expectation(features, &|feature| {
                used.binary_search(&feature)
                    .map(|slot| mask & (1 << slot) != 0)
                    .unwrap_or(false)
            })
        })
        .collect();

    let weights = coalition_weights(m);
    for (slot, &feature) in used.iter().enumerate() {
        let bit = 1usize << slot;
        let mut contribution = 0.0;
        for mask in (0..coalitions).filter(|mask| mask & bit == 0) {
            let size = mask.count_ones() as usize;
            contribution += weights[size] * (values[mask | bit] - values[mask]);
        }
        if let Some(target) = phi.get_mut(feature) {
            *target += contribution;
        }
    }

    Ok(values[0])
}

/// `|S|! (m - |S| - 1)! / m!` for every coalition size `|S|` in `0..m`.
fn coalition_weights(m: usize) -> Vec<f64> {
    let factorial = |n: usize| (1..=n).fold(1.0f64, |acc, k| acc * k as f64);
    let total = factorial(m);
    (0..m)
        .map(|size| factorial(size) * factorial(m - size - 1) / total)
        .collect()
}
