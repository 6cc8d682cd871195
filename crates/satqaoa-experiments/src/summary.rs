//! Per-variant, per-depth statistics over archived records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use satqaoa_algo::QaoaVariant;

use crate::archive::ExperimentArchive;
use crate::record::ExperimentRecord;

/// Aggregate over all records sharing a variant and depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub variant: QaoaVariant,
    pub p: usize,
    /// Number of records aggregated.
    pub count: usize,
    pub mean_success: f64,
    pub min_success: f64,
    pub max_success: f64,
    pub mean_exact_success: f64,
    pub mean_baseline: f64,
    pub mean_evaluations: f64,
    /// `mean_success / mean_baseline`; `None` when no record had a solution.
    pub amplification: Option<f64>,
}

/// Summarize one archive.
pub fn summarize(archive: &ExperimentArchive) -> Vec<SummaryRow> {
    summarize_records(&archive.records)
}

/// Group records by `(variant, p)`, ordered by variant then depth.
pub fn summarize_records<'a>(
    records: impl IntoIterator<Item = &'a ExperimentRecord>,
) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(QaoaVariant, usize), Vec<&ExperimentRecord>> = BTreeMap::new();
    for record in records {
        groups.entry((record.variant, record.p)).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|((variant, p), group)| {
            let n = group.len() as f64;
            let mean = |f: fn(&ExperimentRecord) -> f64| group.iter().map(|r| f(r)).sum::<f64>() / n;
            let success = group.iter().map(|r| r.success_probability);
            let mean_success = mean(|r| r.success_probability);
            let mean_baseline = mean(|r| r.classical_baseline);

            SummaryRow {
                variant,
                p,
                count: group.len(),
                mean_success,
                min_success: success.clone().fold(f64::INFINITY, f64::min),
                max_success: success.fold(f64::NEG_INFINITY, f64::max),
                mean_exact_success: mean(|r| r.exact_success_probability),
                mean_baseline,
                mean_evaluations: mean(|r| r.num_evaluations as f64),
                amplification: (mean_baseline > 0.0).then(|| mean_success / mean_baseline),
            }
        })
        .collect()
}
