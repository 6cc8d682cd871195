//! COBYLA-style trust-region simplex optimizer.
//!
//! Derivative-free: every step costs one or two objective evaluations,
//! which suits shot-sampled QAOA objectives.

use serde::{Deserialize, Serialize};

use super::{OptimizationResult, Optimizer};

/// COBYLA optimizer configuration.
///
/// The search keeps an `n + 1` point simplex whose steps are clipped to the
/// trust radius `rho`. When the simplex values flatten out the radius is
/// halved and the simplex rebuilt around the best point, until `rhoend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cobyla {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Convergence tolerance on the spread of simplex values.
    pub tol: f64,
    /// Initial trust region radius.
    pub rhobeg: f64,
    /// Final trust region radius.
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 100,
            tol: 1e-6,
            rhobeg: 0.5,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    /// Create a new COBYLA optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set trust region parameters.
    #[must_use]
    pub fn with_trust_region(mut self, rhobeg: f64, rhoend: f64) -> Self {
        self.rhobeg = rhobeg;
        self.rhoend = rhoend;
        self
    }
}

/// A simplex vertex and its objective value.
#[derive(Clone)]
struct Vertex {
    x: Vec<f64>,
    f: f64,
}

struct Search<F> {
    objective: F,
    evaluations: usize,
}

impl<F: FnMut(&[f64]) -> f64> Search<F> {
    fn eval(&mut self, x: Vec<f64>) -> Vertex {
        self.evaluations += 1;
        let f = (self.objective)(&x);
        Vertex { x, f }
    }

    /// `base` plus one vertex offset by `rho` along each axis.
    fn simplex_around(&mut self, base: Vertex, rho: f64) -> Vec<Vertex> {
        let n = base.x.len();
        let mut simplex = Vec::with_capacity(n + 1);
        for i in 0..n {
            let mut x = base.x.clone();
            x[i] += rho;
            simplex.push(self.eval(x));
        }
        simplex.insert(0, base);
        simplex
    }
}

/// `a + t (b - a)`, componentwise.
fn lerp(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    a.iter().zip(b).map(|(a, b)| a + t * (b - a)).collect()
}

impl Optimizer for Cobyla {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        let n = initial_params.len();
        let mut search = Search {
            objective,
            evaluations: 0,
        };

        let start = search.eval(initial_params);
        let mut best_f = start.f;
        let mut history = vec![best_f];
        let mut simplex = search.simplex_around(start, self.rhobeg);
        let mut rho = self.rhobeg;
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.maxiter {
            iterations += 1;
            simplex.sort_by(|a, b| a.f.total_cmp(&b.f));

            let spread = simplex[n].f - simplex[0].f;
            if spread < self.tol {
                if rho <= self.rhoend {
                    converged = true;
                    break;
                }
                rho = (rho * 0.5).max(self.rhoend);
                let best = simplex.swap_remove(0);
                simplex = search.simplex_around(best, rho);
                continue;
            }

            let worst = simplex[n].clone();
            let mut centroid = vec![0.0; n];
            for v in &simplex[..n] {
                for (c, x) in centroid.iter_mut().zip(&v.x) {
                    *c += x / n as f64;
                }
            }

            // Reflect the worst vertex, clipped to the trust radius.
            let reflected: Vec<f64> = centroid
                .iter()
                .zip(&worst.x)
                .map(|(c, w)| {
                    let step = c - w;
                    c + step.clamp(-rho, rho)
                })
                .collect();
            let reflected = search.eval(reflected);

            if reflected.f < simplex[0].f {
                let expanded = search.eval(lerp(&centroid, &reflected.x, 2.0));
                simplex[n] = if expanded.f < reflected.f {
                    expanded
                } else {
                    reflected
                };
            } else if reflected.f < simplex[n - 1].f {
                simplex[n] = reflected;
            } else {
                let contracted = search.eval(lerp(&centroid, &worst.x, 0.5));
                if contracted.f < worst.f {
                    simplex[n] = contracted;
                } else {
                    // Shrink towards the best vertex.
                    let best = simplex[0].x.clone();
                    for i in 1..=n {
                        let x = lerp(&best, &simplex[i].x, 0.5);
                        simplex[i] = search.eval(x);
                    }
                }
            }

            let current = simplex
                .iter()
                .map(|v| v.f)
                .fold(f64::INFINITY, f64::min);
            if current < best_f {
                best_f = current;
                history.push(best_f);
            }
        }

        let best = simplex
            .into_iter()
            .min_by(|a, b| a.f.total_cmp(&b.f))
            .map(|v| (v.x, v.f))
            .unwrap_or_default();

        OptimizationResult {
            optimal_params: best.0,
            optimal_value: best.1,
            num_evaluations: search.evaluations,
            num_iterations: iterations,
            history,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cobyla_simple() {
        let cobyla = Cobyla::new().with_maxiter(200);

        // Minimize (x-1)^2 + (y-2)^2
        let result = cobyla.minimize(
            |params| (params[0] - 1.0).powi(2) + (params[1] - 2.0).powi(2),
            vec![0.0, 0.0],
        );

        assert!(result.optimal_value < 0.01);
        assert!((result.optimal_params[0] - 1.0).abs() < 0.1);
        assert!((result.optimal_params[1] - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_cobyla_rosenbrock_improves() {
        let cobyla = Cobyla::new().with_maxiter(500);

        let result = cobyla.minimize(
            |p| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0].powi(2)).powi(2),
            vec![0.0, 0.0],
        );

        assert!(result.optimal_value < 1.0);
    }

    #[test]
    fn test_counts_every_evaluation() {
        let mut calls = 0;
        let result = Cobyla::new().with_maxiter(30).minimize(
            |p| {
                calls += 1;
                p[0].abs()
            },
            vec![3.0],
        );
        assert_eq!(result.num_evaluations, calls);
        assert!(result.num_iterations <= 30);
    }

    #[test]
    fn test_flat_objective_converges() {
        let result = Cobyla::new().with_maxiter(1000).minimize(|_| 0.5, vec![1.0, 2.0]);
        assert!(result.converged);
        assert_eq!(result.optimal_value, 0.5);
    }
}
