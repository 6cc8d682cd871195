//! Experiment sweep configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with SATQAOA_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file (explicit, or `~/.satqaoa/config.yaml` if present)
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use satqaoa_adapter_sim::{DEFAULT_MAX_QUBITS, DEFAULT_MAX_SHOTS};
use satqaoa_algo::{OptimizerKind, OracleSynthesis, QaoaVariant};
use satqaoa_sat::MAX_ENUMERATION_VARS;

/// A sweep over random 3SAT instances, depths and repetitions.
///
/// ```yaml
/// variants: [standard, grover_phase, grover_mixer]
/// num_vars: 5
/// clause_ratio: 4.26
/// instances: 10
/// depths: [1, 2, 3]
/// shots: 512
/// seed: 42
/// optimizer:
///   method: cobyla
///   maxiter: 100
/// output_dir: results
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Variants to run, one archive each
    #[serde(default = "default_variants")]
    pub variants: Vec<QaoaVariant>,

    /// Variables per formula
    #[serde(default = "default_num_vars")]
    pub num_vars: u32,

    /// Clauses per variable; ignored when `num_clauses` is set
    #[serde(default = "default_clause_ratio")]
    pub clause_ratio: f64,

    /// Explicit clause count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_clauses: Option<usize>,

    /// Number of random instances
    #[serde(default = "default_instances")]
    pub instances: usize,

    /// QAOA depths (p values)
    #[serde(default = "default_depths")]
    pub depths: Vec<usize>,

    /// Shots per circuit evaluation
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Independent optimizations per instance and depth
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,

    /// Base seed; every other seed is derived from it
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Classical optimizer
    #[serde(default)]
    pub optimizer: OptimizerKind,

    /// Oracle synthesis strategy
    #[serde(default)]
    pub synthesis: OracleSynthesis,

    /// Directory for `<variant>.json.gz` archives
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Only keep formulas with at least one solution
    #[serde(default = "default_true")]
    pub require_satisfiable: bool,

    /// Generation attempts per satisfiable instance
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
}

// Default value functions
fn default_variants() -> Vec<QaoaVariant> {
    QaoaVariant::ALL.to_vec()
}

fn default_num_vars() -> u32 {
    5
}

fn default_clause_ratio() -> f64 {
    4.26 // random 3SAT phase transition
}

fn default_instances() -> usize {
    10
}

fn default_depths() -> Vec<usize> {
    vec![1, 2, 3]
}

fn default_shots() -> u32 {
    512
}

fn default_repetitions() -> usize {
    1
}

fn default_seed() -> u64 {
    42
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_true() -> bool {
    true
}

fn default_max_generation_attempts() -> u32 {
    1000
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            variants: default_variants(),
            num_vars: default_num_vars(),
            clause_ratio: default_clause_ratio(),
            num_clauses: None,
            instances: default_instances(),
            depths: default_depths(),
            shots: default_shots(),
            repetitions: default_repetitions(),
            seed: default_seed(),
            optimizer: OptimizerKind::default(),
            synthesis: OracleSynthesis::default(),
            output_dir: default_output_dir(),
            require_satisfiable: true,
            max_generation_attempts: default_max_generation_attempts(),
        }
    }
}

impl ExperimentConfig {
    /// `~/.satqaoa/config.yaml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".satqaoa")
            .join("config.yaml")
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: ExperimentConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml(&contents)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration with the following precedence:
    /// 1. `config_file` if given, else the default path if it exists, else defaults
    /// 2. Environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    ExperimentConfig::default()
                }
            }
        };

        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `SATQAOA_*` environment variables into this configuration.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    ///
    /// Only variables that are present override the current values. Lists
    /// (`SATQAOA_VARIANTS`, `SATQAOA_DEPTHS`) are comma separated.
    pub fn merge_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SATQAOA_VARIANTS") {
            self.variants = parse_list(&v, "SATQAOA_VARIANTS")?;
        }
        if let Some(v) = lookup("SATQAOA_NUM_VARS") {
            self.num_vars = parse_var(&v, "SATQAOA_NUM_VARS")?;
        }
        if let Some(v) = lookup("SATQAOA_CLAUSE_RATIO") {
            self.clause_ratio = parse_var(&v, "SATQAOA_CLAUSE_RATIO")?;
        }
        if let Some(v) = lookup("SATQAOA_NUM_CLAUSES") {
            self.num_clauses = Some(parse_var(&v, "SATQAOA_NUM_CLAUSES")?);
        }
        if let Some(v) = lookup("SATQAOA_INSTANCES") {
            self.instances = parse_var(&v, "SATQAOA_INSTANCES")?;
        }
        if let Some(v) = lookup("SATQAOA_DEPTHS") {
            self.depths = parse_list(&v, "SATQAOA_DEPTHS")?;
        }
        if let Some(v) = lookup("SATQAOA_SHOTS") {
            self.shots = parse_var(&v, "SATQAOA_SHOTS")?;
        }
        if let Some(v) = lookup("SATQAOA_REPETITIONS") {
            self.repetitions = parse_var(&v, "SATQAOA_REPETITIONS")?;
        }
        if let Some(v) = lookup("SATQAOA_SEED") {
            self.seed = parse_var(&v, "SATQAOA_SEED")?;
        }

        // Optimizer: method first so MAXITER applies to the new method
        if let Some(v) = lookup("SATQAOA_OPTIMIZER") {
            self.optimizer = OptimizerKind::from_name(&v).ok_or_else(|| {
                ConfigError::ValidationError(format!("Unknown optimizer in SATQAOA_OPTIMIZER: {v}"))
            })?;
        }
        if let Some(v) = lookup("SATQAOA_MAXITER") {
            self.optimizer = self
                .optimizer
                .with_maxiter(parse_var(&v, "SATQAOA_MAXITER")?);
        }

        if let Some(v) = lookup("SATQAOA_SYNTHESIS") {
            self.synthesis = parse_var(&v, "SATQAOA_SYNTHESIS")?;
        }
        if let Some(v) = lookup("SATQAOA_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }

        Ok(self)
    }

    /// Clauses per formula.
    pub fn clauses_per_instance(&self) -> usize {
        self.num_clauses
            .unwrap_or_else(|| (self.clause_ratio * f64::from(self.num_vars)).round() as usize)
    }

    /// Qubits one circuit needs.
    pub fn qubits_required(&self) -> usize {
        let n = self.num_vars as usize;
        match self.synthesis {
            OracleSynthesis::ClauseAncilla => n + self.clauses_per_instance() + 1,
            _ => n + 1,
        }
    }

    /// Optimizations per variant.
    pub fn runs_per_variant(&self) -> usize {
        self.instances * self.depths.len() * self.repetitions
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.variants.is_empty() {
            return Err(ConfigError::ValidationError(
                "variants must not be empty".to_string(),
            ));
        }
        for (i, variant) in self.variants.iter().enumerate() {
            if self.variants[..i].contains(variant) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate variant: {variant}"
                )));
            }
        }

        if self.num_vars == 0 || self.num_vars > MAX_ENUMERATION_VARS {
            return Err(ConfigError::ValidationError(format!(
                "num_vars must be between 1 and {MAX_ENUMERATION_VARS}, got {}",
                self.num_vars
            )));
        }

        if self.num_clauses.is_none() && !(self.clause_ratio.is_finite() && self.clause_ratio > 0.0)
        {
            return Err(ConfigError::ValidationError(format!(
                "clause_ratio must be positive, got {}",
                self.clause_ratio
            )));
        }
        if self.clauses_per_instance() == 0 {
            return Err(ConfigError::ValidationError(
                "Formulas must have at least one clause".to_string(),
            ));
        }

        let qubits = self.qubits_required();
        if qubits > DEFAULT_MAX_QUBITS as usize {
            return Err(ConfigError::ValidationError(format!(
                "{} synthesis needs {qubits} qubits, simulator supports {DEFAULT_MAX_QUBITS}",
                self.synthesis
            )));
        }

        if self.instances == 0 {
            return Err(ConfigError::ValidationError(
                "instances must be greater than 0".to_string(),
            ));
        }

        if self.depths.is_empty() || self.depths.contains(&0) {
            return Err(ConfigError::ValidationError(
                "depths must be non-empty and every depth at least 1".to_string(),
            ));
        }

        if self.shots == 0 || self.shots > DEFAULT_MAX_SHOTS {
            return Err(ConfigError::ValidationError(format!(
                "shots must be between 1 and {DEFAULT_MAX_SHOTS}, got {}",
                self.shots
            )));
        }

        if self.repetitions == 0 {
            return Err(ConfigError::ValidationError(
                "repetitions must be greater than 0".to_string(),
            ));
        }

        if self.optimizer.maxiter() == 0 {
            return Err(ConfigError::ValidationError(
                "optimizer maxiter must be greater than 0".to_string(),
            ));
        }

        if self.require_satisfiable && self.max_generation_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_generation_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("Invalid value for {name}: {value}")))
}

fn parse_list<T: std::str::FromStr>(value: &str, name: &str) -> Result<Vec<T>, ConfigError> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_var(s, name))
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
