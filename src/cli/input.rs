use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use super::formats::is_loom;

#[derive(Parser, Debug)]
pub struct InputLoom {
    #[clap(short = 'f', long, help = "Input loom file")]
    pub input: String,
}
impl InputLoom {
    pub fn path(&self) -> Result<PathBuf> {
        if !is_loom(&self.input) {
            bail!("Input file is not a loom file: {}", self.input)
        }
        Ok(PathBuf::from(&self.input))
    }
}
