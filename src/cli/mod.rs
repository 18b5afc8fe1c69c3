mod cli;
mod config;
mod formats;
mod input;
mod output;
mod sample;

pub use cli::Cli;
pub use config::SampleConfig;
pub use input::InputLoom;
pub use output::OutputLoom;
pub use sample::SampleArgs;
