use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(next_help_heading = "SAMPLE OPTIONS")]
pub struct SampleArgs {
    /// Number of items to sample
    #[clap(short = 's', long, default_value = "20000")]
    pub sample: usize,

    /// Number of items above which a file is sampled
    #[clap(short = 't', long, default_value = "25000")]
    pub threshold: usize,

    /// Minimum number of items per combination; smaller combinations are kept whole
    #[clap(short = 'm', long, default_value = "10")]
    pub minimum: usize,

    /// Column attributes whose combinations keep their representation, separated by `|`.
    /// Items are sampled fully at random when not given.
    #[clap(short = 'v', long, value_name = "VARS")]
    pub vars: Option<String>,

    /// Seed to use for random sampling [default: random]
    #[clap(short = 'S', long)]
    pub seed: Option<u64>,
}
impl SampleArgs {
    pub fn validate(&self) -> Result<()> {
        if self.sample == 0 {
            anyhow::bail!("Sampling value must be at least 1");
        }
        if self.sample > self.threshold {
            anyhow::bail!(
                "Threshold value ({}) must be greater than sampling value ({})",
                self.threshold,
                self.sample
            );
        }
        Ok(())
    }

    /// Requested attribute names in the order given, skipping empty entries
    pub fn vars(&self) -> Vec<String> {
        self.vars
            .as_deref()
            .map(|vars| {
                vars.split('|')
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
