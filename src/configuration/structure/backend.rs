use std::path::PathBuf;

use miette::{miette, Context, IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};

use crate::configuration::{error::ConfigurationError, traits::ResolvableConfigurationWithContext};


/// Launch arguments of a backend entry, prior to validation.
///
/// A profile either names the built-in launch command with the keyword
/// `"default"` or spells out the full command line.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub(crate) enum UnresolvedProgramArguments {
    Keyword(String),
    CommandLine(Vec<String>),
}


/// One entry of the `backend_data` table, prior to validation.
///
/// The response strings are required; `kernel_backend_path` is the
/// only optional field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct UnresolvedBackendProfile {
    pub(crate) failure_response: String,

    pub(crate) success_response: String,

    pub(crate) error_prefix: String,

    pub(crate) informational_prefix: String,

    pub(crate) program_arguments: UnresolvedProgramArguments,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) kernel_backend_path: Option<String>,
}


/// How the backend process is started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramArguments {
    /// Use the built-in launch command of the backend's family.
    Default,

    /// Explicit command line: the program followed by its arguments.
    Explicit(Vec<String>),
}


/// The response-formatting and launch profile of one backend
/// integration script.
///
/// The response strings are the contract for parsing the backend's
/// line-oriented output stream: `failure_response` and
/// `success_response` are matched against whole lines, the two
/// prefixes against line starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendProfile {
    /// Output shown when a query fails.
    pub failure_response: String,

    /// Output shown when a query succeeds without variable bindings.
    pub success_response: String,

    /// Prefix of error output lines.
    pub error_prefix: String,

    /// Prefix of informational output lines.
    pub informational_prefix: String,

    pub program_arguments: ProgramArguments,

    /// Absolute path to an override implementation module, if any.
    pub kernel_backend_path: Option<PathBuf>,
}


impl ResolvableConfigurationWithContext for UnresolvedBackendProfile {
    type Resolved = BackendProfile;
    type Context = String;

    /// The context is the backend id this profile belongs to, used to
    /// attribute validation failures.
    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let program_arguments = match self.program_arguments {
            UnresolvedProgramArguments::Keyword(keyword) if keyword == "default" => {
                ProgramArguments::Default
            }
            UnresolvedProgramArguments::Keyword(keyword) => {
                return Err(ConfigurationError::InvalidProgramArguments {
                    backend_id: context,
                    found: keyword,
                })
                .into_diagnostic();
            }
            UnresolvedProgramArguments::CommandLine(arguments) if arguments.is_empty() => {
                return Err(ConfigurationError::EmptyProgramArguments {
                    backend_id: context,
                })
                .into_diagnostic();
            }
            UnresolvedProgramArguments::CommandLine(arguments) => {
                ProgramArguments::Explicit(arguments)
            }
        };

        let kernel_backend_path = match self.kernel_backend_path {
            Some(path) => Some(resolve_kernel_backend_path(&context, path)?),
            None => None,
        };

        Ok(BackendProfile {
            failure_response: self.failure_response,
            success_response: self.success_response,
            error_prefix: self.error_prefix,
            informational_prefix: self.informational_prefix,
            program_arguments,
            kernel_backend_path,
        })
    }
}


/// Validates and canonicalizes a `kernel_backend_path` value: it must
/// be an absolute path to an existing file.
fn resolve_kernel_backend_path(backend_id: &str, path: String) -> Result<PathBuf> {
    let path = PathBuf::from(path);

    if !path.is_absolute() {
        return Err(ConfigurationError::BackendPathNotAbsolute {
            backend_id: backend_id.to_string(),
            path,
        })
        .into_diagnostic();
    }

    if !path.is_file() {
        return Err(ConfigurationError::BackendPathNotFound {
            backend_id: backend_id.to_string(),
            path,
        })
        .into_diagnostic();
    }

    dunce::canonicalize(&path)
        .into_diagnostic()
        .wrap_err_with(|| miette!("Failed to canonicalize kernel_backend_path {}.", path.display()))
}
