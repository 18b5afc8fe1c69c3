mod materialize;
mod report;

pub use materialize::{materialize, project};
pub use report::write_report;

use anyhow::Result;
use log::{info, warn};

use crate::cli::{Cli, SampleConfig};
use crate::loom::{Connector, DefaultConnector, LoomSource};
use crate::plan::{plan, RandomSampler, Sampler};

/// What a sampling run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was at or below the threshold and left alone
    Skipped { items: usize },
    /// A sampled file was written
    Written { items: usize, kept: usize },
}

/// Keeps the requested attributes that exist in the file, warning about the others
fn resolve_vars<S: LoomSource>(source: &S, vars: &[String]) -> Result<Vec<String>> {
    let keys = source.col_attr_keys()?;
    let mut valid = Vec::with_capacity(vars.len());
    for name in vars {
        if keys.contains(name) {
            valid.push(name.clone());
        } else {
            warn!("{name} not present in metadata. Will not be used");
        }
    }
    Ok(valid)
}

/// Loads one label column per attribute, skipping attributes that can not be used as categories
fn load_labels<S: LoomSource>(source: &S, vars: &[String]) -> Result<Vec<Vec<String>>> {
    let mut columns = Vec::with_capacity(vars.len());
    for name in vars {
        if let Some(labels) = source.col_attr(name)?.labels() {
            columns.push(labels);
        } else {
            warn!("{name} has more than one value per item. Will not be used");
        }
    }
    Ok(columns)
}

/// Samples `config.input` into `config.output` when it holds more items than the threshold
pub fn sample_file<C, S>(config: &SampleConfig, connector: &C, sampler: &mut S) -> Result<Outcome>
where
    C: Connector,
    S: Sampler + ?Sized,
{
    // metadata probe, released before the main pass
    let (items, vars) = {
        let source = connector.connect(&config.input)?;
        let (_, items) = source.shape();
        (items, resolve_vars(&source, &config.vars)?)
    };

    if !config.needs_sampling(items) {
        info!(
            "{} holds {items} items, at or below the threshold of {}. Nothing to do",
            config.input.display(),
            config.threshold
        );
        return Ok(Outcome::Skipped { items });
    }

    let source = connector.connect(&config.input)?;
    let labels = load_labels(&source, &vars)?;
    if labels.is_empty() {
        info!("List of variables to use is empty. Sampling will be 100% random");
    } else {
        info!("Preserving combinations of: {}", vars.join(", "));
    }

    let plan = plan(&config.params(items), Some(labels.as_slice()), sampler)?;
    info!(
        "Keeping {} of {items} items across {} combinations",
        plan.indices.len(),
        plan.groups.len()
    );

    let matrix = materialize(&source, &plan.indices)?;
    let data = project(&source, matrix, &plan.indices, connector.version())?;
    drop(source);

    connector.create(&config.output, &data)?;
    info!("Wrote {}", config.output.display());

    if let Some(path) = config.report.as_ref() {
        write_report(path, &plan)?;
        info!("Wrote report {}", path.display());
    }

    Ok(Outcome::Written {
        items,
        kept: plan.indices.len(),
    })
}

pub fn run(args: &Cli) -> Result<()> {
    let config = args.config()?;
    let mut sampler = RandomSampler::from_seed(config.seed);
    sample_file(&config, &DefaultConnector::default(), &mut sampler)?;
    Ok(())
}
