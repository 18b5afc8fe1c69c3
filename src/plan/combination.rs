use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Result};
use itertools::Itertools;

/// One item's values across the chosen attributes, in attribute order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Combination(Vec<String>);
impl Combination {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }
}
impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("|"))
    }
}

/// Partitions `0..total` by combination.
///
/// `columns` holds one label array per attribute, each with `total` entries.
/// Groups are returned in combination order and list their items ascending.
pub fn group_items(columns: &[Vec<String>], total: usize) -> Result<BTreeMap<Combination, Vec<usize>>> {
    if let Some((idx, column)) = columns.iter().find_position(|c| c.len() != total) {
        bail!(
            "Label column {idx} has {} entries but {total} items were expected",
            column.len()
        );
    }

    let mut groups: BTreeMap<Vec<&str>, Vec<usize>> = BTreeMap::new();
    for item in 0..total {
        let key = columns.iter().map(|c| c[item].as_str()).collect();
        groups.entry(key).or_default().push(item);
    }

    Ok(groups
        .into_iter()
        .map(|(key, items)| {
            let values = key.into_iter().map(str::to_owned).collect();
            (Combination::new(values), items)
        })
        .collect())
}
