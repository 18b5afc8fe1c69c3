mod cli;
mod commands;
mod loom;
mod plan;

use cli::Cli;

use anyhow::Result;
use clap::Parser;
use log::trace;

#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {
    // no-op
}

fn main() -> Result<()> {
    reset_sigpipe();

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stdout)
        .parse_env("LOOMSAMPLE_LOG")
        .init();

    let args = Cli::parse();

    trace!("init");
    commands::sample::run(&args)?;
    trace!("done");
    Ok(())
}
