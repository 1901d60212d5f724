use std::path::Path;

use clap::Parser;
use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::info;

use crate::{
    backend::{BackendSession, LaunchCommand},
    cli::CLIArgs,
    configuration::{get_server_script_path, Configuration},
    logging::initialize_tracing,
};

mod backend;
mod cli;
mod configuration;
mod logging;


/// Directory the kernel's own log file is placed in.
pub const LOG_DIRECTORY: &str = "logs";

/// File name of the kernel's own log file (created under [`LOG_DIRECTORY`]).
pub const LOG_FILE_NAME: &str = "logtalk-kernel.log";


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    // Load configuration.
    let configuration = match cli_args.configuration_file_path.as_ref() {
        Some(path) => {
            println!("Loading configuration: {}", path.display());
            Configuration::load_from_path(path)
        }
        None => Configuration::load_from_default_path(),
    }
    .wrap_err("Failed to load configuration.")?;

    match configuration.file_path.as_ref() {
        Some(path) => println!("Configuration loaded: {}.", path.display()),
        None => println!("Configuration loaded: built-in defaults."),
    }


    let logging_raii_guard = initialize_tracing(
        configuration.console_output_filter(),
        configuration.log_file_output_filter(),
        Path::new(LOG_DIRECTORY),
        LOG_FILE_NAME,
    )
    .wrap_err("Failed to initialize tracing.")?;

    info!("Tracing initialized.");


    let backend_id = cli_args
        .backend_id
        .as_deref()
        .unwrap_or(&configuration.backend_id)
        .to_string();

    let profile = configuration
        .backend_profile(&backend_id)
        .into_diagnostic()
        .wrap_err("Failed to select a backend profile.")?
        .clone();

    let server_script_path =
        get_server_script_path().wrap_err("Failed to locate the bundled server script.")?;

    let launch_command = LaunchCommand::for_profile(&backend_id, &profile, &server_script_path)
        .into_diagnostic()
        .wrap_err("Failed to expand the backend launch command.")?;

    info!(
        "Starting backend {}: {} {}",
        backend_id,
        launch_command.program,
        launch_command.arguments.join(" ")
    );

    let session = BackendSession::start(&launch_command, profile, configuration.server_logging)
        .wrap_err_with(|| miette!("Failed to start backend {}.", backend_id))?;

    let exit_status = session
        .relay()
        .wrap_err_with(|| miette!("Backend session for {} failed.", backend_id))?;

    if !exit_status.success() {
        return Err(miette!(
            "Backend {} exited with a failure status: {}.",
            backend_id,
            exit_status
        ));
    }

    info!("Backend {} exited cleanly.", backend_id);


    drop(logging_raii_guard);
    Ok(())
}
