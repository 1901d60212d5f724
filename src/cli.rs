//! Command-line interface definitions for the kernel launcher binary.

use std::path::PathBuf;

use clap::Parser;



/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "logtalk-kernel",
    author,
    about = "Jupyter kernel launcher for Logtalk - starts a Prolog backend and relays its output.",
    version
)]
pub struct CLIArgs {
    /// This is the path to the configuration file to use.
    /// If unspecified, this defaults to `./data/configuration.toml`
    /// when that file exists, and to the built-in defaults otherwise.
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        help = "Path to the configuration file to use. Defaults to ./data/configuration.toml \
                when present, built-in defaults otherwise."
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[arg(
        short = 'b',
        long = "backend-id",
        help = "Backend id to start, overriding the configured one for this run."
    )]
    pub backend_id: Option<String>,
}
