//! Sample index planning.
//!
//! Items are grouped by their combination of category labels and every group
//! is reduced proportionally to the overall sampling fraction. Groups at or
//! below the configured minimum are kept whole so rare categories survive.

mod combination;
mod sampler;

pub use combination::{group_items, Combination};
pub use sampler::{RandomSampler, Sampler};

use anyhow::Result;
use itertools::Itertools;
use serde::Serialize;

/// Number of items kept from a sampled group whose proportional share falls
/// at or below the configured minimum.
///
/// This floor does not follow `minimum_per_group`: with a minimum of 20 a
/// group of 25 items sampled at 50% keeps 10 items, fewer than the minimum.
pub const SAMPLING_FLOOR: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanParams {
    pub total_items: usize,
    pub target_sample: usize,
    pub minimum_per_group: usize,
}
impl PlanParams {
    /// `ceil(items * target_sample / total_items)` in exact arithmetic
    fn proportional(&self, items: usize) -> usize {
        if self.total_items == 0 {
            return 0;
        }
        let scaled = items as u128 * self.target_sample as u128;
        scaled.div_ceil(self.total_items as u128) as usize
    }

    /// Number of items to keep from a group of `items` and the rule that decided it
    pub fn quota(&self, items: usize) -> (usize, Rule) {
        if items <= self.minimum_per_group {
            return (items, Rule::KeptAll);
        }
        let share = self.proportional(items);
        if share <= self.minimum_per_group {
            (SAMPLING_FLOOR.min(items), Rule::Floored)
        } else {
            (share.min(items), Rule::Proportional)
        }
    }
}

/// How the kept count of a group was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Group at or below the minimum, kept whole
    KeptAll,
    /// Proportional share of the group
    Proportional,
    /// Proportional share raised to [`SAMPLING_FLOOR`]
    Floored,
    /// No grouping, uniform draw over every item
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// `None` when items were not grouped
    pub combination: Option<Combination>,
    pub items: usize,
    pub kept: usize,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    /// Kept item indices, strictly ascending
    pub indices: Vec<usize>,
    pub groups: Vec<GroupSummary>,
}

/// Computes the sorted set of item indices to keep.
///
/// Without label columns (`None` or empty) the plan is a uniform draw of
/// `target_sample` items. Otherwise items are grouped by combination and each
/// group is reduced according to [`PlanParams::quota`].
pub fn plan<S: Sampler + ?Sized>(
    params: &PlanParams,
    labels: Option<&[Vec<String>]>,
    sampler: &mut S,
) -> Result<SamplePlan> {
    match labels {
        Some(columns) if !columns.is_empty() => plan_grouped(params, columns, sampler),
        _ => Ok(plan_random(params, sampler)),
    }
}

fn plan_random<S: Sampler + ?Sized>(params: &PlanParams, sampler: &mut S) -> SamplePlan {
    let indices = finalize(sampler.choose(params.total_items, params.target_sample));
    let summary = GroupSummary {
        combination: None,
        items: params.total_items,
        kept: indices.len(),
        rule: Rule::Random,
    };
    SamplePlan {
        indices,
        groups: vec![summary],
    }
}

fn plan_grouped<S: Sampler + ?Sized>(
    params: &PlanParams,
    columns: &[Vec<String>],
    sampler: &mut S,
) -> Result<SamplePlan> {
    let groups = group_items(columns, params.total_items)?;

    let mut kept = Vec::new();
    let mut summaries = Vec::with_capacity(groups.len());
    for (combination, members) in groups {
        let (quota, rule) = params.quota(members.len());
        if quota == members.len() {
            kept.extend_from_slice(&members);
        } else {
            kept.extend(
                sampler
                    .choose(members.len(), quota)
                    .into_iter()
                    .map(|pos| members[pos]),
            );
        }
        summaries.push(GroupSummary {
            combination: Some(combination),
            items: members.len(),
            kept: quota,
            rule,
        });
    }

    Ok(SamplePlan {
        indices: finalize(kept),
        groups: summaries,
    })
}

/// Sorts ascending and drops duplicates
fn finalize(indices: Vec<usize>) -> Vec<usize> {
    indices.into_iter().sorted_unstable().dedup().collect()
}
