use std::{env::current_dir, path::PathBuf};

use miette::{miette, Context, IntoDiagnostic, Result};


/// Returns the default configuration filepath, which is at
/// `{current directory}/data/configuration.toml`.
///
/// The file is not required to exist; the caller decides how to handle
/// a missing one.
pub fn get_default_configuration_file_path() -> Result<PathBuf> {
    let mut configuration_filepath = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    configuration_filepath.push("data/configuration.toml");

    Ok(configuration_filepath)
}


/// Returns the path of the bundled Logtalk server script, which is at
/// `{current directory}/prolog_server/jupyter_server.pl`.
///
/// Built-in launch commands load this script with an absolute path.
pub fn get_server_script_path() -> Result<PathBuf> {
    let mut server_script_path = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    server_script_path.push("prolog_server/jupyter_server.pl");

    Ok(server_script_path)
}
