use anyhow::{bail, Result};
use clap::{
    builder::{
        styling::{AnsiColor, Effects},
        Styles,
    },
    Parser,
};

use super::{InputLoom, OutputLoom, SampleArgs, SampleConfig};

// Configures Clap v3-style help menu colors
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Sample your loom files while preserving the representation of metadata combinations
#[derive(Parser, Debug)]
#[command(styles = STYLES)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub input: InputLoom,

    #[clap(flatten)]
    pub output: OutputLoom,

    #[clap(flatten)]
    pub sample: SampleArgs,
}
impl Cli {
    /// Validates every argument and freezes them into a [`SampleConfig`].
    ///
    /// No file is touched here.
    pub fn config(&self) -> Result<SampleConfig> {
        let input = self.input.path()?;
        let output = self.output.path(&self.input.input)?;
        if input == output {
            bail!(
                "Output file must differ from the input file: {}",
                output.display()
            );
        }
        self.sample.validate()?;

        Ok(SampleConfig {
            input,
            output,
            report: self.output.report(),
            sample: self.sample.sample,
            threshold: self.sample.threshold,
            minimum: self.sample.minimum,
            vars: self.sample.vars(),
            seed: self.sample.seed,
        })
    }
}
