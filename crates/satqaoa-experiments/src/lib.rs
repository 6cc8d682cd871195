//! Experiment sweeps for bitflip-oracle QAOA.
//!
//! A sweep draws random satisfiable 3SAT formulas, optimizes every
//! configured QAOA variant at every depth on each of them, and stores one
//! gzip-compressed JSON archive per variant:
//!
//! ```text
//! results/
//! ├── standard.json.gz
//! ├── grover_phase.json.gz
//! └── grover_mixer.json.gz
//! ```
//!
//! Archives are reproducible: the same configuration yields the same
//! records, apart from the run id and timestamp in the metadata.
//!
//! ```no_run
//! use satqaoa_experiments::{ExperimentConfig, ExperimentSuite, load_archive, summarize};
//!
//! let config = ExperimentConfig::load(None)?;
//! let paths = ExperimentSuite::new(config)?.run(None)?;
//! for path in paths {
//!     for row in summarize(&load_archive(&path)?) {
//!         println!("{} p={} success={:.3}", row.variant, row.p, row.mean_success);
//!     }
//! }
//! # Ok::<(), satqaoa_experiments::ExperimentError>(())
//! ```

pub mod archive;
pub mod config;
pub mod driver;
pub mod error;
pub mod record;
pub mod summary;

pub use archive::{
    ARCHIVE_EXTENSION, ArchiveMetadata, ExperimentArchive, archive_path, load_archive,
    save_archive,
};
pub use config::{ConfigError, ExperimentConfig};
pub use driver::{ExperimentSuite, Instance, generate_instance, run_and_save, run_variant};
pub use error::{ExperimentError, ExperimentResult};
pub use record::ExperimentRecord;
pub use summary::{SummaryRow, summarize, summarize_records};
