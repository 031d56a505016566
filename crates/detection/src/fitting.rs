//! Bounded derivative-free minimization used for smoothing factor fits.

use rand::rngs::StdRng;
use rand::Rng;

const MAX_ITERATIONS: usize = 200;
const COST_TOLERANCE: f64 = 1e-10;
const INITIAL_STEP_FRACTION: f64 = 0.05;

/// Minimizes `objective` over a box and returns the best point found.
///
/// Nelder-Mead with every candidate vertex projected back into the box.
/// The starting point is drawn uniformly from the box, so repeated calls
/// with an identically seeded generator are reproducible.
pub(crate) fn minimize_bounded<F>(objective: F, bounds: &[(f64, f64)], rng: &mut StdRng) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let dims = bounds.len();
    if dims == 0 {
        return Vec::new();
    }

    let start: Vec<f64> = bounds
        .iter()
        .map(|&(low, high)| rng.gen_range(low..=high))
        .collect();

    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dims + 1);
    let start_cost = objective(&start);
    simplex.push((start.clone(), start_cost));
    for dim in 0..dims {
        let (low, high) = bounds[dim];
        let mut vertex = start.clone();
        vertex[dim] = (vertex[dim] + (high - low) * INITIAL_STEP_FRACTION).clamp(low, high);
        let cost = objective(&vertex);
        simplex.push((vertex, cost));
    }

    for _ in 0..MAX_ITERATIONS {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        if (simplex[dims].1 - simplex[0].1).abs() < COST_TOLERANCE {
            break;
        }

        let centroid = centroid_excluding_worst(&simplex, dims);
        let worst = simplex[dims].0.clone();

        let reflected = step_from(&centroid, &worst, 1.0, bounds);
        let reflected_cost = objective(&reflected);

        if reflected_cost < simplex[0].1 {
            let expanded = step_from(&centroid, &worst, 2.0, bounds);
            let expanded_cost = objective(&expanded);
            simplex[dims] = if expanded_cost < reflected_cost {
                (expanded, expanded_cost)
            } else {
                (reflected, reflected_cost)
            };
            continue;
        }

        if reflected_cost < simplex[dims - 1].1 {
            simplex[dims] = (reflected, reflected_cost);
            continue;
        }

        let contracted = step_from(&centroid, &worst, -0.5, bounds);
        let contracted_cost = objective(&contracted);
        if contracted_cost < simplex[dims].1 {
            simplex[dims] = (contracted, contracted_cost);
            continue;
        }

        let anchor = simplex[0].0.clone();
        for entry in simplex.iter_mut().skip(1) {
            for (coord, anchor_coord) in entry.0.iter_mut().zip(anchor.iter()) {
                *coord = anchor_coord + (*coord - anchor_coord) * 0.5;
            }
            entry.1 = objective(&entry.0);
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    simplex.swap_remove(0).0
}

/// `centroid + coefficient * (centroid - worst)`, clamped into the box.
fn step_from(centroid: &[f64], worst: &[f64], coefficient: f64, bounds: &[(f64, f64)]) -> Vec<f64> {
    centroid
        .iter()
        .zip(worst.iter())
        .zip(bounds.iter())
        .map(|((&mid, &far), &(low, high))| (mid + coefficient * (mid - far)).clamp(low, high))
        .collect()
}

fn centroid_excluding_worst(simplex: &[(Vec<f64>, f64)], dims: usize) -> Vec<f64> {
    let mut centroid = vec![0.0; dims];
    for (vertex, _) in &simplex[..dims] {
        for (sum, coord) in centroid.iter_mut().zip(vertex.iter()) {
            *sum += coord;
        }
    }
    for sum in centroid.iter_mut() {
        *sum /= dims as f64;
    }
    centroid
}
