//! Simulator backend implementation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, instrument};

use satqaoa_ir::{Circuit, InstructionKind};

use crate::backend::{Backend, Capabilities};
use crate::error::{SimError, SimResult};
use crate::result::{Counts, ExecutionResult};
use crate::statevector::{Sampler, Statevector};

/// Default qubit limit (2^24 amplitudes, 256 MiB).
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Default shot limit per run.
pub const DEFAULT_MAX_SHOTS: u32 = 1_000_000;

/// Local statevector simulator backend.
///
/// The circuit is evolved once and every shot is drawn from the final
/// distribution, so measurements must be terminal. Shots come from a
/// seedable RNG; two backends built with the same seed return the same
/// counts for the same sequence of runs.
pub struct SimulatorBackend {
    name: String,
    max_qubits: u32,
    max_shots: u32,
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a simulator seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a simulator with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            name: "simulator".into(),
            max_qubits: DEFAULT_MAX_QUBITS,
            max_shots: DEFAULT_MAX_SHOTS,
            rng: Mutex::new(rng),
        }
    }

    /// Override the qubit limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Reseed the shot RNG.
    pub fn reseed(&self, seed: u64) {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *rng = StdRng::seed_from_u64(seed);
    }

    /// Evolve `circuit` from |0…0⟩ and return the final state.
    ///
    /// A gate acting on an already-measured qubit is rejected.
    pub fn simulate(&self, circuit: &Circuit) -> SimResult<Statevector> {
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(SimError::CircuitTooLarge {
                qubits: circuit.num_qubits(),
                max: self.max_qubits,
            });
        }

        let mut sv = Statevector::new(circuit.num_qubits());
        let mut measured = vec![false; circuit.num_qubits()];
        for inst in circuit.instructions() {
            match inst.kind {
                InstructionKind::Measure => {
                    for q in &inst.qubits {
                        measured[q.index()] = true;
                    }
                }
                InstructionKind::Gate(_) if inst.qubits.iter().any(|q| measured[q.index()]) => {
                    return Err(SimError::UnsupportedInstruction(format!(
                        "'{}' after measurement (mid-circuit measurement)",
                        inst.name()
                    )));
                }
                _ => {}
            }
            sv.apply(inst)?;
        }
        Ok(sv)
    }

    #[instrument(skip(self, circuit), fields(qubits = circuit.num_qubits()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> SimResult<ExecutionResult> {
        let start = Instant::now();

        let sv = self.simulate(circuit)?;
        let sampler = Sampler::new(&sv);
        let (width, sources) = clbit_sources(circuit);

        let mut outcomes: BTreeMap<usize, u64> = BTreeMap::new();
        {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            for _ in 0..shots {
                *outcomes.entry(sampler.sample(&mut *rng)).or_insert(0) += 1;
            }
        }

        let counts: Counts = outcomes
            .into_iter()
            .map(|(outcome, n)| (outcome_to_bitstring(outcome, width, &sources), n))
            .collect();

        let elapsed = start.elapsed();
        debug!(
            "Simulation completed in {:?} ({} distinct outcomes)",
            elapsed,
            counts.len()
        );

        Ok(ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::simulator(self.max_qubits, self.max_shots)
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run(&self, circuit: &Circuit, shots: u32) -> SimResult<ExecutionResult> {
        if shots == 0 || shots > self.max_shots {
            return Err(SimError::InvalidShots {
                shots,
                max: self.max_shots,
            });
        }
        self.run_simulation(circuit, shots)
    }
}

/// Register width and, per clbit, the qubit measured into it.
///
/// Without measurements every qubit is read out into the clbit of the same
/// index.
fn clbit_sources(circuit: &Circuit) -> (usize, Vec<Option<usize>>) {
    let mut sources = vec![None; circuit.num_clbits()];
    let mut any = false;
    for inst in circuit.instructions().iter().filter(|i| i.is_measure()) {
        for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
            sources[c.index()] = Some(q.index());
            any = true;
        }
    }
    if any {
        (circuit.num_clbits(), sources)
    } else {
        (circuit.num_qubits(), (0..circuit.num_qubits()).map(Some).collect())
    }
}

/// Render an outcome with clbit 0 as the rightmost character.
fn outcome_to_bitstring(outcome: usize, width: usize, sources: &[Option<usize>]) -> String {
    (0..width)
        .rev()
        .map(|c| match sources[c] {
            Some(q) if (outcome >> q) & 1 == 1 => '1',
            _ => '0',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use satqaoa_ir::{ClbitId, QubitId};

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure_all().unwrap();
        circuit
    }

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::with_seed(0);
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, DEFAULT_MAX_QUBITS);
    }

    #[test]
    fn test_simulator_bell_state() {
        let backend = SimulatorBackend::with_seed(1);
        let result = backend.run(&bell(), 1000).unwrap();
        assert_eq!(result.shots, 1000);

        // Bell state should produce only 00 and 11
        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert!(counts.get("00") > 0 && counts.get("11") > 0);
    }

    #[test]
    fn test_clbit_zero_is_rightmost() {
        let mut circuit = Circuit::with_size("x0", 3, 0);
        circuit.x(QubitId(0)).unwrap();
        circuit.measure_all().unwrap();

        let result = SimulatorBackend::with_seed(0).run(&circuit, 10).unwrap();
        assert_eq!(result.counts.get("001"), 10);
    }

    #[test]
    fn test_partial_measurement_register() {
        let mut circuit = Circuit::with_size("partial", 3, 2);
        circuit.x(QubitId(2)).unwrap();
        circuit.measure(QubitId(2), ClbitId(0)).unwrap();

        let result = SimulatorBackend::with_seed(0).run(&circuit, 5).unwrap();
        assert_eq!(result.counts.get("01"), 5);
    }

    #[test]
    fn test_same_seed_same_counts() {
        let mut circuit = Circuit::with_size("uniform", 3, 0);
        for q in 0..3 {
            circuit.h(QubitId(q)).unwrap();
        }
        circuit.measure_all().unwrap();

        let a = SimulatorBackend::with_seed(42).run(&circuit, 200).unwrap();
        let b = SimulatorBackend::with_seed(42).run(&circuit, 200).unwrap();
        assert_eq!(a.counts, b.counts);
    }

    #[test]
    fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_seed(0).with_max_qubits(5);
        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.run(&circuit, 100);

        assert!(matches!(result, Err(SimError::CircuitTooLarge { .. })));
    }

    #[test]
    fn test_invalid_shots() {
        let backend = SimulatorBackend::with_seed(0);
        assert!(matches!(
            backend.run(&bell(), 0),
            Err(SimError::InvalidShots { shots: 0, .. })
        ));
    }

    #[test]
    fn test_gate_after_measure_rejected() {
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.x(QubitId(0)).unwrap();

        let result = SimulatorBackend::with_seed(0).run(&circuit, 10);
        assert!(matches!(result, Err(SimError::UnsupportedInstruction(_))));
    }
}
