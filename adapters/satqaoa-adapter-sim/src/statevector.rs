//! Statevector simulation engine.
//!
//! Basis index bit `q` holds the value of qubit `q`.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

use satqaoa_ir::{Instruction, InstructionKind, ParameterExpression, StandardGate};

use crate::error::{SimError, SimResult};

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Create the basis state |index⟩.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let mut sv = Self::new(num_qubits);
        sv.amplitudes[0] = Complex64::new(0.0, 0.0);
        sv.amplitudes[index] = Complex64::new(1.0, 0.0);
        sv
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The raw amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Measurement probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Total probability of the basis states accepted by `predicate`.
    pub fn probability_of(&self, predicate: impl Fn(usize) -> bool) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| predicate(*i))
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Apply an instruction to the statevector.
    ///
    /// Measurements and barriers leave the state untouched; sampling happens
    /// separately.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => self.apply_gate(gate, &instruction.qubit_indices()),
            InstructionKind::Measure | InstructionKind::Barrier => Ok(()),
        }
    }

    fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) -> SimResult<()> {
        let angle = |theta: &ParameterExpression| {
            theta.as_f64().ok_or_else(|| SimError::UnboundParameter {
                gate: gate.name().to_string(),
                parameter: theta.to_string(),
            })
        };

        match gate {
            // Single-qubit gates
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], angle(theta)?),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], angle(theta)?),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], angle(theta)?),
            StandardGate::P(theta) => self.apply_phase(qubits[0], angle(theta)?),

            // Controlled gates
            StandardGate::CX => self.apply_mcx(&qubits[..1], qubits[1]),
            StandardGate::CZ => self.apply_mcp(qubits, PI),
            StandardGate::CP(theta) => self.apply_mcp(qubits, angle(theta)?),
            StandardGate::CCX => self.apply_mcx(&qubits[..2], qubits[2]),
            StandardGate::MCX { .. } => {
                let (target, controls) = qubits
                    .split_last()
                    .ok_or_else(|| SimError::UnsupportedInstruction("mcx without target".into()))?;
                self.apply_mcx(controls, *target);
            }
            StandardGate::MCP { theta, .. } => self.apply_mcp(qubits, angle(theta)?),
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        self.apply_mcp(&[qubit], theta);
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Multi-controlled gate implementations
    // =========================================================================

    /// Flip `target` on every basis state where all `controls` are 1.
    fn apply_mcx(&mut self, controls: &[usize], target: usize) {
        let ctrl_mask = controls.iter().fold(0usize, |m, &q| m | (1 << q));
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    /// Multiply by e^{iθ} every basis state where all `qubits` are 1.
    fn apply_mcp(&mut self, qubits: &[usize], theta: f64) {
        let mask = qubits.iter().fold(0usize, |m, &q| m | (1 << q));
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp *= phase;
            }
        }
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Sample a measurement outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        Sampler::new(self).sample(rng)
    }
}

/// Inverse-CDF sampler over a fixed statevector.
///
/// Building it is O(2^n); each draw is a binary search.
pub struct Sampler {
    cumulative: Vec<f64>,
}

impl Sampler {
    /// Precompute the cumulative distribution of `sv`.
    pub fn new(sv: &Statevector) -> Self {
        let mut acc = 0.0;
        let cumulative = sv
            .amplitudes
            .iter()
            .map(|a| {
                acc += a.norm_sqr();
                acc
            })
            .collect();
        Self { cumulative }
    }

    /// Draw one basis index.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r: f64 = rng.r#gen::<f64>() * total;
        // Rounding can leave r >= the last entry; clamp to the final state.
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use satqaoa_ir::QubitId;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn gate(g: StandardGate, qubits: &[u32]) -> Instruction {
        Instruction::gate(g, qubits.iter().map(|&q| QubitId(q)))
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(sv.amplitudes[1..].iter().all(|a| a.norm() < 1e-12));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply(&gate(StandardGate::H, &[0])).unwrap();
        sv.apply(&gate(StandardGate::CX, &[0, 1])).unwrap();

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_mcx_only_fires_on_all_ones() {
        for index in 0..16 {
            let mut sv = Statevector::basis(4, index);
            sv.apply(&gate(StandardGate::MCX { num_controls: 3 }, &[0, 1, 2, 3]))
                .unwrap();
            let expected = if index & 0b0111 == 0b0111 {
                index ^ 0b1000
            } else {
                index
            };
            assert!(approx_eq(sv.amplitudes[expected], Complex64::new(1.0, 0.0)));
        }
    }

    #[test]
    fn test_mcp_phase() {
        let mut sv = Statevector::basis(3, 0b111);
        sv.apply(&gate(
            StandardGate::MCP {
                num_controls: 2,
                theta: ParameterExpression::constant(PI),
            },
            &[0, 1, 2],
        ))
        .unwrap();
        assert!(approx_eq(sv.amplitudes[0b111], Complex64::new(-1.0, 0.0)));

        let mut untouched = Statevector::basis(3, 0b011);
        untouched
            .apply(&gate(
                StandardGate::MCP {
                    num_controls: 2,
                    theta: ParameterExpression::constant(PI),
                },
                &[0, 1, 2],
            ))
            .unwrap();
        assert!(approx_eq(untouched.amplitudes[0b011], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_rx_pi_is_x_up_to_phase() {
        let mut sv = Statevector::new(1);
        sv.apply(&gate(StandardGate::Rx(ParameterExpression::constant(PI)), &[0]))
            .unwrap();
        assert!((sv.probabilities()[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unbound_parameter() {
        let mut sv = Statevector::new(1);
        let result = sv.apply(&gate(StandardGate::P(ParameterExpression::symbol("g")), &[0]));
        assert!(matches!(result, Err(SimError::UnboundParameter { .. })));
    }

    #[test]
    fn test_probability_of() {
        let mut sv = Statevector::new(2);
        sv.apply(&gate(StandardGate::H, &[0])).unwrap();
        sv.apply(&gate(StandardGate::H, &[1])).unwrap();
        let p = sv.probability_of(|i| i & 1 == 1);
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let mut sv = Statevector::new(1);
        sv.apply(&gate(StandardGate::X, &[0])).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(sv.sample(&mut rng), 1);
        }
    }

    #[test]
    fn test_sampler_never_picks_zero_probability_states() {
        let mut sv = Statevector::new(2);
        sv.apply(&gate(StandardGate::H, &[0])).unwrap();
        sv.apply(&gate(StandardGate::CX, &[0, 1])).unwrap();

        let sampler = Sampler::new(&sv);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let outcome = sampler.sample(&mut rng);
            assert!(outcome == 0 || outcome == 3);
        }
    }

    proptest! {
        #[test]
        fn prop_rotations_preserve_norm(
            ops in prop::collection::vec((0u8..4, 0u32..3, -PI..PI), 1..20),
        ) {
            let mut sv = Statevector::new(3);
            for (kind, q, theta) in ops {
                let theta = ParameterExpression::constant(theta);
                let g = match kind {
                    0 => StandardGate::Rx(theta),
                    1 => StandardGate::Ry(theta),
                    2 => StandardGate::Rz(theta),
                    _ => StandardGate::H,
                };
                sv.apply(&gate(g, &[q])).unwrap();
            }
            let norm: f64 = sv.probabilities().iter().sum();
            prop_assert!((norm - 1.0).abs() < 1e-9);
        }
    }
}
