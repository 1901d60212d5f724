use std::path::PathBuf;

use thiserror::Error;


/// Errors raised while resolving the kernel configuration.
///
/// All of these are fatal at startup; there is no retry or
/// partial-load behaviour for a broken configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The selected backend id has no entry in `backend_data`.
    #[error("backend id \"{backend_id}\" has no entry in backend_data")]
    UnknownBackend { backend_id: String },

    /// `program_arguments` was a keyword other than `"default"`.
    #[error(
        "backend \"{backend_id}\" has invalid program_arguments: \
         expected the keyword \"default\" or a list of strings, found \"{found}\""
    )]
    InvalidProgramArguments { backend_id: String, found: String },

    /// `program_arguments` was an explicit list, but an empty one.
    #[error("backend \"{backend_id}\" has an empty program_arguments list")]
    EmptyProgramArguments { backend_id: String },

    /// `program_arguments = "default"` was used for a backend family
    /// without a built-in launch command.
    #[error(
        "backend \"{backend_id}\" has no built-in launch command; \
         set program_arguments to an explicit argument list"
    )]
    NoDefaultCommand { backend_id: String },

    /// `kernel_backend_path` was set to a relative path.
    #[error(
        "kernel_backend_path of backend \"{backend_id}\" is not an absolute path: {}",
        .path.display()
    )]
    BackendPathNotAbsolute { backend_id: String, path: PathBuf },

    /// `kernel_backend_path` points at a file that does not exist.
    #[error(
        "kernel_backend_path of backend \"{backend_id}\" does not exist: {}",
        .path.display()
    )]
    BackendPathNotFound { backend_id: String, path: PathBuf },
}
