//! Gzip-compressed JSON archives, one per variant.

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use satqaoa_algo::QaoaVariant;

use crate::config::ExperimentConfig;
use crate::error::ExperimentResult;
use crate::record::ExperimentRecord;

/// File extension of archives.
pub const ARCHIVE_EXTENSION: &str = "json.gz";

/// Describes how an archive was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    /// Unique id of this run.
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub variant: QaoaVariant,
    /// Version of the producing crate.
    pub version: String,
    /// Full configuration of the sweep.
    pub config: ExperimentConfig,
}

/// All records of one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentArchive {
    pub metadata: ArchiveMetadata,
    pub records: Vec<ExperimentRecord>,
}

impl ExperimentArchive {
    /// Wrap `records` with fresh metadata.
    pub fn new(variant: QaoaVariant, config: ExperimentConfig, records: Vec<ExperimentRecord>) -> Self {
        Self {
            metadata: ArchiveMetadata {
                run_id: Uuid::new_v4(),
                created_at: Utc::now(),
                variant,
                version: env!("CARGO_PKG_VERSION").to_string(),
                config,
            },
            records,
        }
    }

    /// The variant the records belong to.
    pub fn variant(&self) -> QaoaVariant {
        self.metadata.variant
    }
}

/// `<dir>/<variant>.json.gz`.
pub fn archive_path(dir: &Path, variant: QaoaVariant) -> std::path::PathBuf {
    dir.join(format!("{variant}.{ARCHIVE_EXTENSION}"))
}

/// Write `archive` as gzip-compressed JSON, creating parent directories.
pub fn save_archive(path: impl AsRef<Path>, archive: &ExperimentArchive) -> ExperimentResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, archive)?;
    encoder.finish()?.flush()?;

    info!(
        "Saved {} records to {}",
        archive.records.len(),
        path.display()
    );
    Ok(())
}

/// Read an archive written by [`save_archive`].
pub fn load_archive(path: impl AsRef<Path>) -> ExperimentResult<ExperimentArchive> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let archive: ExperimentArchive = serde_json::from_reader(decoder)?;

    info!(
        "Loaded {} records from {}",
        archive.records.len(),
        path.display()
    );
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExperimentError;
    use satqaoa_adapter_sim::Counts;
    use satqaoa_algo::OracleSynthesis;

    fn record(instance: usize, success: f64) -> ExperimentRecord {
        ExperimentRecord {
            variant: QaoaVariant::GroverMixer,
            synthesis: OracleSynthesis::Fprm,
            instance,
            instance_seed: 17,
            num_vars: 2,
            num_clauses: 1,
            p: 1,
            repetition: 0,
            shots: 4,
            dimacs: "p cnf 2 1\n1 2 0\n".into(),
            num_satisfying: 3,
            initial_params: vec![0.1, 0.2],
            best_params: vec![0.3, 0.1 + 0.2],
            best_value: 1.0 - success,
            success_probability: success,
            exact_success_probability: 0.8,
            classical_baseline: 0.75,
            num_evaluations: 12,
            converged: false,
            counts: [("001", 3), ("000", 1)].into_iter().collect::<Counts>(),
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = archive_path(&dir.path().join("nested"), QaoaVariant::GroverMixer);
        assert!(path.ends_with("grover_mixer.json.gz"));

        let archive = ExperimentArchive::new(
            QaoaVariant::GroverMixer,
            ExperimentConfig::default(),
            vec![record(0, 0.75), record(1, 1.0 / 3.0)],
        );
        save_archive(&path, &archive).unwrap();

        let loaded = load_archive(&path).unwrap();
        assert_eq!(loaded, archive);
    }

    #[test]
    fn test_archive_is_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json.gz");
        let archive = ExperimentArchive::new(QaoaVariant::Standard, ExperimentConfig::default(), vec![]);
        save_archive(&path, &archive).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_archive(dir.path().join("missing.json.gz")),
            Err(ExperimentError::Io(_))
        ));

        // valid gzip, not an archive
        let path = dir.path().join("bad.json.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::fast());
        encoder.write_all(b"{\"records\": 3}").unwrap();
        encoder.finish().unwrap();
        assert!(matches!(load_archive(&path), Err(ExperimentError::Json(_))));
    }

    #[test]
    fn test_amplification() {
        assert_eq!(record(0, 0.75).amplification(), Some(1.0));
        let mut unsat = record(0, 0.0);
        unsat.classical_baseline = 0.0;
        assert_eq!(unsat.amplification(), None);
    }
}
