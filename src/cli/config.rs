use std::path::PathBuf;

use crate::plan::PlanParams;

/// Validated run configuration, built once from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: Option<PathBuf>,
    /// Target number of items
    pub sample: usize,
    /// Item count above which sampling is launched
    pub threshold: usize,
    /// Combinations with at most this many items are kept whole
    pub minimum: usize,
    /// Column attributes to combine, in order
    pub vars: Vec<String>,
    pub seed: Option<u64>,
}
impl SampleConfig {
    pub fn params(&self, total_items: usize) -> PlanParams {
        PlanParams {
            total_items,
            target_sample: self.sample,
            minimum_per_group: self.minimum,
        }
    }

    /// Files with more items than the threshold are sampled
    pub fn needs_sampling(&self, total_items: usize) -> bool {
        total_items > self.threshold
    }
}
