//! Projection operator tests through the public `ConvexSet` interface.
//!
//! Checks idempotence and the variational characterization of the
//! Euclidean projection: for P = Π_C(M) and every X in C,
//! ⟨M − P, X − P⟩ ≤ 0.

use bfcluster_core::{BirkhoffPolytope, ConvexSet, Fantope};
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tolerance on the variational inequality (Dykstra stops at 1e-9)
const VI_TOL: f64 = 1e-6;

fn random_matrix(n: usize, seed: u64, scale: f64) -> DMatrix<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    DMatrix::from_fn(n, n, |_, _| rng.gen_range(-scale..scale))
}

fn check_idempotent(set: &dyn ConvexSet, m: &DMatrix<f64>, tol: f64) {
    let p = set.project(m).unwrap();
    assert!(set.contains(&p, 1e-8), "projection left the set:\n{}", p);
    let pp = set.project(&p).unwrap();
    let diff = (&pp - &p).abs().max();
    assert!(diff < tol, "second projection moved by {}", diff);
}

fn check_variational(set: &dyn ConvexSet, m: &DMatrix<f64>, witnesses: &[DMatrix<f64>]) {
    let p = set.project(m).unwrap();
    let residual = m - &p;
    for x in witnesses {
        assert!(set.contains(x, 1e-12));
        let ip = residual.dot(&(x - &p));
        assert!(ip <= VI_TOL, "⟨M − P, X − P⟩ = {} > 0", ip);
    }
}

/// Cyclic shifts and their reversals.
fn permutation_matrices(n: usize) -> Vec<DMatrix<f64>> {
    let mut out = Vec::new();
    for shift in 0..n {
        out.push(DMatrix::from_fn(n, n, |i, j| if j == (i + shift) % n { 1.0 } else { 0.0 }));
        out.push(DMatrix::from_fn(n, n, |i, j| if j == (n + shift - i % n) % n { 1.0 } else { 0.0 }));
    }
    out
}

/// Diagonal 0/1 projectors of rank k, one per window of consecutive indices.
fn coordinate_projectors(n: usize, k: usize) -> Vec<DMatrix<f64>> {
    (0..n)
        .map(|start| DMatrix::from_fn(n, n, |i, j| if i == j && (i + n - start) % n < k { 1.0 } else { 0.0 }))
        .collect()
}

#[test]
fn test_birkhoff_idempotent() {
    let set = BirkhoffPolytope::new(6);
    for seed in 1..=4 {
        check_idempotent(&set, &random_matrix(6, seed, 1.0), 1e-8);
    }
}

#[test]
fn test_birkhoff_variational_inequality() {
    let n = 5;
    let set = BirkhoffPolytope::new(n);
    let mut witnesses = permutation_matrices(n);
    witnesses.push(DMatrix::from_element(n, n, 1.0 / n as f64));
    for seed in [3, 17, 29] {
        check_variational(&set, &random_matrix(n, seed, 1.0), &witnesses);
    }
}

#[test]
fn test_fantope_idempotent() {
    for k in [1, 3, 6] {
        let set = Fantope::new(6, k);
        for seed in 1..=3 {
            check_idempotent(&set, &random_matrix(6, seed * 7 + k as u64, 2.0), 1e-9);
        }
    }
}

#[test]
fn test_fantope_variational_inequality() {
    let n = 5;
    for k in 1..=4 {
        let set = Fantope::new(n, k);
        let mut witnesses = coordinate_projectors(n, k);
        witnesses.push(DMatrix::identity(n, n) * (k as f64 / n as f64));
        for seed in [5, 13] {
            check_variational(&set, &random_matrix(n, seed, 1.5), &witnesses);
        }
    }
}

#[test]
fn test_sets_report_dimension() {
    let sets: Vec<Box<dyn ConvexSet>> = vec![Box::new(BirkhoffPolytope::new(4)), Box::new(Fantope::new(4, 2))];
    for set in &sets {
        assert_eq!(set.dim(), 4);
        assert!(set.project(&DMatrix::zeros(3, 3)).is_err());
    }
}
