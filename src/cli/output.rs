use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Parser;

use super::formats::{is_loom, light_path};

#[derive(Parser, Debug)]
pub struct OutputLoom {
    #[clap(
        short = 'o',
        long,
        help = "Output loom file [default: input file with a .light.loom extension]"
    )]
    pub output: Option<String>,

    /// Write a tab-separated summary of kept items per combination
    #[clap(short = 'r', long, value_name = "PATH")]
    pub report: Option<String>,
}
impl OutputLoom {
    /// Resolves the output path, deriving it from `input` when not given
    pub fn path(&self, input: &str) -> Result<PathBuf> {
        let path = match self.output.as_ref() {
            Some(path) if is_loom(path) => path.clone(),
            Some(path) => bail!("Output file is not a loom file: {path}"),
            None => light_path(input)
                .ok_or_else(|| anyhow!("Can not derive an output path from {input}"))?,
        };
        Ok(PathBuf::from(path))
    }

    pub fn report(&self) -> Option<PathBuf> {
        self.report.as_ref().map(PathBuf::from)
    }
}
