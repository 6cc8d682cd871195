//! QAOA ansatz circuits built from a bitflip oracle.
//!
//! Every variant has the same skeleton:
//! 1. Initial state: |+⟩ on the input qubits, ancillas and result at |0⟩
//! 2. For each layer k:
//!    - Phase separation: [`cost_circuit`] with angle `gamma_k` (or π)
//!    - Mixer on the inputs: `RX(2·beta_k)` or the Grover mixer
//! 3. Measure all qubits

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use satqaoa_ir::{Circuit, ParameterExpression, QubitId};
use satqaoa_sat::Cnf;

use crate::error::{AlgoError, AlgoResult};
use crate::layers::{cost_circuit, grover_mixer, standard_mixer};
use crate::oracle::{BitflipOracle, OracleSynthesis, bitflip_oracle};

/// Layer construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaoaVariant {
    /// Optimized phase `gamma_k`, transverse-field mixer `beta_k`. 2p parameters.
    #[default]
    Standard,
    /// Phase fixed at π (the Grover oracle), transverse-field mixer. p parameters.
    GroverPhase,
    /// Optimized phase `gamma_k`, Grover mixer `beta_k`. 2p parameters.
    GroverMixer,
}

impl QaoaVariant {
    /// All variants.
    pub const ALL: [QaoaVariant; 3] = [
        QaoaVariant::Standard,
        QaoaVariant::GroverPhase,
        QaoaVariant::GroverMixer,
    ];

    /// Short name, also the archive file stem.
    pub fn name(self) -> &'static str {
        match self {
            QaoaVariant::Standard => "standard",
            QaoaVariant::GroverPhase => "grover_phase",
            QaoaVariant::GroverMixer => "grover_mixer",
        }
    }

    /// Whether the phase angles are free parameters.
    pub fn optimizes_phase(self) -> bool {
        !matches!(self, QaoaVariant::GroverPhase)
    }

    /// Free parameters for `p` layers.
    pub fn num_parameters(self, p: usize) -> usize {
        if self.optimizes_phase() { 2 * p } else { p }
    }
}

impl fmt::Display for QaoaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QaoaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|v| v.name() == normalized)
            .ok_or_else(|| {
                format!("unknown variant '{s}' (expected standard, grover_phase or grover_mixer)")
            })
    }
}

/// Symbol for the phase angle of layer `k`.
pub fn gamma_name(k: usize) -> String {
    format!("gamma_{k}")
}

/// Symbol for the mixer angle of layer `k`.
pub fn beta_name(k: usize) -> String {
    format!("beta_{k}")
}

/// A symbolic QAOA circuit for one formula, variant and depth.
#[derive(Debug, Clone)]
pub struct QaoaAnsatz {
    variant: QaoaVariant,
    p: usize,
    num_vars: usize,
    oracle: BitflipOracle,
    circuit: Circuit,
    parameter_names: Vec<String>,
}

impl QaoaAnsatz {
    /// Build the ansatz with the default oracle synthesis.
    pub fn new(cnf: &Cnf, variant: QaoaVariant, p: usize) -> AlgoResult<Self> {
        Self::with_synthesis(cnf, variant, p, OracleSynthesis::default())
    }

    /// Build the ansatz with a chosen oracle synthesis.
    pub fn with_synthesis(
        cnf: &Cnf,
        variant: QaoaVariant,
        p: usize,
        synthesis: OracleSynthesis,
    ) -> AlgoResult<Self> {
        if p == 0 {
            return Err(AlgoError::InvalidDepth);
        }

        let oracle = bitflip_oracle(cnf, synthesis)?;
        let n = oracle.num_inputs;
        let num_qubits = oracle.num_qubits();
        let wires: Vec<QubitId> = (0..num_qubits).map(QubitId::from).collect();
        let inputs = oracle.input_qubits();

        let mut circuit = Circuit::with_size(format!("qaoa_{variant}_p{p}"), num_qubits as u32, 0);
        for &q in &inputs {
            circuit.h(q)?;
        }

        // The fixed-phase cost layer is identical in every layer.
        let fixed_cost = if variant.optimizes_phase() {
            None
        } else {
            Some(cost_circuit(&oracle, PI)?)
        };

        for k in 0..p {
            match &fixed_cost {
                Some(cost) => circuit.append(cost, &wires)?,
                None => circuit.append(
                    &cost_circuit(&oracle, ParameterExpression::symbol(gamma_name(k)))?,
                    &wires,
                )?,
            };

            let beta = ParameterExpression::symbol(beta_name(k));
            let mixer = match variant {
                QaoaVariant::GroverMixer => grover_mixer(n, beta)?,
                QaoaVariant::Standard | QaoaVariant::GroverPhase => standard_mixer(n, beta)?,
            };
            circuit.append(&mixer, &inputs)?;
        }
        circuit.measure_all()?;

        let mut parameter_names = Vec::with_capacity(variant.num_parameters(p));
        if variant.optimizes_phase() {
            parameter_names.extend((0..p).map(gamma_name));
        }
        parameter_names.extend((0..p).map(beta_name));

        Ok(Self {
            variant,
            p,
            num_vars: n,
            oracle,
            circuit,
            parameter_names,
        })
    }

    /// The variant.
    pub fn variant(&self) -> QaoaVariant {
        self.variant
    }

    /// Number of layers.
    pub fn layers(&self) -> usize {
        self.p
    }

    /// Number of formula variables (input qubits).
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// The oracle the cost layers are built from.
    pub fn oracle(&self) -> &BitflipOracle {
        &self.oracle
    }

    /// The symbolic, measured circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Number of free parameters.
    pub fn num_parameters(&self) -> usize {
        self.parameter_names.len()
    }

    /// Parameter symbols in flat-vector order: all gammas, then all betas.
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Bind a flat parameter vector.
    pub fn bind(&self, params: &[f64]) -> AlgoResult<Circuit> {
        if params.len() != self.num_parameters() {
            return Err(AlgoError::ParameterCount {
                expected: self.num_parameters(),
                got: params.len(),
            });
        }
        let values: FxHashMap<String, f64> = self
            .parameter_names
            .iter()
            .cloned()
            .zip(params.iter().copied())
            .collect();
        Ok(self.circuit.bind_parameters(&values)?)
    }
}
