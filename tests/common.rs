#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use bon::builder;
use tempfile::{NamedTempFile, TempDir};

pub const COMMAND_NAME: &str = env!("CARGO_BIN_EXE_loomsample");

#[builder]
pub fn run_sample(
    input: &str,
    output: Option<&str>,
    sample: Option<&str>,
    threshold: Option<&str>,
    minimum: Option<&str>,
    vars: Option<&str>,
    seed: Option<u64>,
    report: Option<&Path>,
) -> Result<Output> {
    let mut args: Vec<String> = vec!["-f".to_string(), input.to_string()];
    for (flag, value) in [
        ("-o", output),
        ("-s", sample),
        ("-t", threshold),
        ("-m", minimum),
        ("-v", vars),
    ] {
        if let Some(value) = value {
            args.push(flag.to_string());
            args.push(value.to_string());
        }
    }
    if let Some(seed) = seed {
        args.push("-S".to_string());
        args.push(format!("{seed}"));
    }
    if let Some(path) = report {
        args.push("-r".to_string());
        args.push(path.to_str().unwrap().to_string());
    }
    eprintln!("Args: {args:#?}");
    Ok(Command::new(COMMAND_NAME).args(args).output()?)
}

/// Creates a file with fixed contents to check that failed runs leave it alone
pub fn sentinel_file(suffix: &str) -> Result<NamedTempFile> {
    let tempfile = NamedTempFile::with_suffix(suffix)?;
    std::fs::write(tempfile.path(), b"not touched")?;
    Ok(tempfile)
}

pub fn is_untouched(path: &Path) -> Result<bool> {
    Ok(std::fs::read(path)? == b"not touched")
}

/// Lists the file names in a directory
pub fn dir_entries(dir: &TempDir) -> Result<Vec<String>> {
    let mut names = std::fs::read_dir(dir.path())?
        .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
