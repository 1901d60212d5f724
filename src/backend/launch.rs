use std::path::Path;

use crate::configuration::{backend_family, BackendProfile, ConfigurationError, ProgramArguments};


/// A fully-expanded backend launch command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub arguments: Vec<String>,
}

impl LaunchCommand {
    /// Expands a profile's program arguments into a concrete command
    /// line.
    ///
    /// Explicit arguments are used verbatim: the first element is the
    /// program, the rest its arguments. The `"default"` keyword maps
    /// to the built-in launch command of the backend's family, with
    /// the bundled server script loaded via `server_script` (which the
    /// caller resolves to an absolute path).
    pub fn for_profile(
        backend_id: &str,
        profile: &BackendProfile,
        server_script: &Path,
    ) -> Result<Self, ConfigurationError> {
        match &profile.program_arguments {
            ProgramArguments::Explicit(arguments) => {
                let (program, arguments) =
                    arguments
                        .split_first()
                        .ok_or_else(|| ConfigurationError::EmptyProgramArguments {
                            backend_id: backend_id.to_string(),
                        })?;

                Ok(Self {
                    program: program.clone(),
                    arguments: arguments.to_vec(),
                })
            }
            ProgramArguments::Default => Self::built_in(backend_id, server_script),
        }
    }

    /// The built-in launch command of a backend family.
    ///
    /// Only the SWI-Prolog and SICStus families ship one; every other
    /// family requires explicit program arguments.
    fn built_in(backend_id: &str, server_script: &Path) -> Result<Self, ConfigurationError> {
        let server_script = server_script.to_string_lossy().to_string();

        match backend_family(backend_id) {
            "swilgt" => Ok(Self {
                program: "swipl".to_string(),
                arguments: vec![
                    "-l".to_string(),
                    server_script,
                    "-t".to_string(),
                    "jupyter_server_start".to_string(),
                ],
            }),
            "sicstuslgt" => Ok(Self {
                program: "sicstus".to_string(),
                arguments: vec![
                    "-l".to_string(),
                    server_script,
                    "--goal".to_string(),
                    "jupyter_server_start;halt.".to_string(),
                    "--nologo".to_string(),
                ],
            }),
            _ => Err(ConfigurationError::NoDefaultCommand {
                backend_id: backend_id.to_string(),
            }),
        }
    }
}
