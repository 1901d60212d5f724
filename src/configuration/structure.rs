use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use miette::{miette, Context, IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use self::backend::UnresolvedBackendProfile;
pub use self::backend::{BackendProfile, ProgramArguments};
use super::defaults::{default_backend_data, process_environment, resolve_default_backend_id};
use super::error::ConfigurationError;
use super::traits::ResolvableConfigurationWithContext;
use super::utilities::get_default_configuration_file_path;

mod backend;


/// The on-disk configuration shape, prior to validation.
///
/// Every field is optional; unset fields fall back to built-in
/// defaults during resolution. The `implementation_id` and
/// `implementation_data` spellings are deprecated aliases of
/// `backend_id` and `backend_data`, accepted on load and normalized
/// away.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct UnresolvedConfiguration {
    /// Raises the kernel's own logging level to DEBUG.
    #[serde(default)]
    pub(crate) jupyter_logging: bool,

    /// Creates a log file of the backend's raw output stream.
    #[serde(default)]
    pub(crate) server_logging: bool,

    /// The id of the backend the server is started with.
    #[serde(
        default,
        alias = "implementation_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) backend_id: Option<String>,

    /// Per-backend profiles, merged over the built-in table.
    #[serde(default, alias = "implementation_data")]
    pub(crate) backend_data: HashMap<String, UnresolvedBackendProfile>,
}


/// The entire kernel configuration, loaded once at startup and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// The file path this configuration was loaded from, or `None`
    /// when running on built-in defaults.
    pub file_path: Option<PathBuf>,

    /// Whether the kernel's own logging level is raised to DEBUG.
    pub jupyter_logging: bool,

    /// Whether a log file of the backend's raw output stream is created.
    pub server_logging: bool,

    /// The id of the backend the server is started with.
    /// Guaranteed to be a key of `backend_data`.
    pub backend_id: String,

    /// Per-backend profiles, keyed by backend id.
    pub backend_data: HashMap<String, BackendProfile>,
}


/// Inputs the resolution step needs besides the file contents.
pub(crate) struct ResolutionContext {
    pub(crate) file_path: Option<PathBuf>,

    /// Backend id used when the configuration does not select one.
    pub(crate) default_backend_id: String,
}

impl ResolutionContext {
    /// Context for the running process: the default backend id is
    /// resolved from the host platform and environment.
    pub(crate) fn for_process(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            default_backend_id: resolve_default_backend_id(
                std::env::consts::OS,
                &process_environment(),
            ),
        }
    }
}


impl ResolvableConfigurationWithContext for UnresolvedConfiguration {
    type Resolved = Configuration;
    type Context = ResolutionContext;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let backend_id = self.backend_id.unwrap_or(context.default_backend_id);

        // A user entry replaces the built-in profile of the same id wholesale.
        let mut backend_data = default_backend_data();
        for (id, unresolved_profile) in self.backend_data {
            let profile = unresolved_profile
                .resolve(id.clone())
                .wrap_err_with(|| miette!("Failed to resolve backend_data entry {}.", id))?;

            backend_data.insert(id, profile);
        }

        if !backend_data.contains_key(&backend_id) {
            return Err(ConfigurationError::UnknownBackend { backend_id }).into_diagnostic();
        }

        Ok(Configuration {
            file_path: context.file_path,
            jupyter_logging: self.jupyter_logging,
            server_logging: self.server_logging,
            backend_id,
            backend_data,
        })
    }
}


impl Configuration {
    /// Load the configuration from a specific file path.
    pub fn load_from_path<S: AsRef<Path>>(configuration_file_path: S) -> Result<Self> {
        // Read the configuration file into memory.
        let configuration_string = fs::read_to_string(configuration_file_path.as_ref())
            .into_diagnostic()
            .wrap_err("Could not read configuration file!")?;


        // Parse the string into the `UnresolvedConfiguration` structure and then resolve it.
        let unresolved_configuration =
            toml::from_str::<UnresolvedConfiguration>(&configuration_string)
                .into_diagnostic()
                .wrap_err("Could not load configuration file!")?;


        let configuration_file_path = dunce::canonicalize(configuration_file_path)
            .into_diagnostic()
            .wrap_err("Could not canonicalize configuration file path!")?;

        let resolved_configuration = unresolved_configuration
            .resolve(ResolutionContext::for_process(Some(configuration_file_path)))
            .wrap_err("Failed to resolve configuration.")?;

        Ok(resolved_configuration)
    }

    /// Load the configuration from the default path
    /// (`./data/configuration.toml`) when such a file exists, falling
    /// back to the built-in defaults otherwise.
    pub fn load_from_default_path() -> Result<Configuration> {
        let default_path = get_default_configuration_file_path()
            .wrap_err("Could not determine the default configuration file path.")?;

        if default_path.exists() {
            Configuration::load_from_path(default_path)
        } else {
            Configuration::built_in_defaults()
        }
    }

    /// The built-in default configuration, equivalent to loading an
    /// empty configuration file.
    pub fn built_in_defaults() -> Result<Configuration> {
        UnresolvedConfiguration::default().resolve(ResolutionContext::for_process(None))
    }

    /// Looks up the profile of a backend id.
    ///
    /// An id absent from `backend_data` is a configuration error;
    /// there is no fallback profile.
    pub fn backend_profile(
        &self,
        backend_id: &str,
    ) -> Result<&BackendProfile, ConfigurationError> {
        self.backend_data
            .get(backend_id)
            .ok_or_else(|| ConfigurationError::UnknownBackend {
                backend_id: backend_id.to_string(),
            })
    }

    /// Console log filter: `RUST_LOG` when set, otherwise derived from
    /// `jupyter_logging`.
    pub fn console_output_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.base_level_filter()))
    }

    /// Log file filter, derived from `jupyter_logging`.
    pub fn log_file_output_filter(&self) -> EnvFilter {
        EnvFilter::new(self.base_level_filter())
    }

    fn base_level_filter(&self) -> &'static str {
        if self.jupyter_logging {
            "debug"
        } else {
            "info"
        }
    }
}


#[cfg(test)]
mod tests {
    use super::backend::UnresolvedProgramArguments;
    use super::*;
    use crate::configuration::defaults::{BACKEND_FAMILIES, BACKEND_SCRIPT_SUFFIXES};

    fn test_context(default_backend_id: &str) -> ResolutionContext {
        ResolutionContext {
            file_path: None,
            default_backend_id: default_backend_id.to_string(),
        }
    }

    fn custom_profile() -> UnresolvedBackendProfile {
        UnresolvedBackendProfile {
            failure_response: "no".to_string(),
            success_response: "yes".to_string(),
            error_prefix: "!! ".to_string(),
            informational_prefix: ";; ".to_string(),
            program_arguments: UnresolvedProgramArguments::CommandLine(vec![
                "mylgt".to_string(),
                "--server".to_string(),
            ]),
            kernel_backend_path: None,
        }
    }

    #[test]
    fn empty_configuration_resolves_to_defaults() {
        let configuration = UnresolvedConfiguration::default()
            .resolve(test_context("swilgt"))
            .unwrap();

        assert!(!configuration.jupyter_logging);
        assert!(!configuration.server_logging);
        assert_eq!(configuration.backend_id, "swilgt");
        assert!(configuration
            .backend_data
            .contains_key(&configuration.backend_id));
        assert_eq!(
            configuration.backend_data.len(),
            BACKEND_FAMILIES.len() * BACKEND_SCRIPT_SUFFIXES.len()
        );
    }

    #[test]
    fn configured_backend_id_overrides_the_default() {
        let unresolved = toml::from_str::<UnresolvedConfiguration>(
            r#"
            backend_id = "yaplgt.sh"
            "#,
        )
        .unwrap();

        let configuration = unresolved.resolve(test_context("swilgt")).unwrap();

        assert_eq!(configuration.backend_id, "yaplgt.sh");
    }

    #[test]
    fn unknown_backend_id_fails_resolution() {
        let unresolved = toml::from_str::<UnresolvedConfiguration>(
            r#"
            backend_id = "gprolog"
            "#,
        )
        .unwrap();

        let result = unresolved.resolve(test_context("swilgt"));

        let message = result.unwrap_err().to_string();
        assert!(message.contains("gprolog"));
    }

    #[test]
    fn deprecated_aliases_load_like_the_canonical_names() {
        let canonical = toml::from_str::<UnresolvedConfiguration>(
            r#"
            backend_id = "tplgt"

            [backend_data.tplgt]
            failure_response = "false"
            success_response = "true"
            error_prefix = "ERROR: "
            informational_prefix = "% "
            program_arguments = ["tplgt", "--no-banner"]
            "#,
        )
        .unwrap();

        let aliased = toml::from_str::<UnresolvedConfiguration>(
            r#"
            implementation_id = "tplgt"

            [implementation_data.tplgt]
            failure_response = "false"
            success_response = "true"
            error_prefix = "ERROR: "
            informational_prefix = "% "
            program_arguments = ["tplgt", "--no-banner"]
            "#,
        )
        .unwrap();

        assert_eq!(canonical, aliased);
    }

    #[test]
    fn user_profiles_merge_over_the_built_in_table() {
        let mut unresolved = UnresolvedConfiguration::default();
        unresolved
            .backend_data
            .insert("swilgt".to_string(), custom_profile());

        let configuration = unresolved.resolve(test_context("swilgt")).unwrap();

        let profile = configuration.backend_profile("swilgt").unwrap();
        assert_eq!(
            profile.program_arguments,
            ProgramArguments::Explicit(vec!["mylgt".to_string(), "--server".to_string()])
        );

        // Built-in entries for other backends are untouched.
        let sicstus_profile = configuration.backend_profile("sicstuslgt").unwrap();
        assert_eq!(sicstus_profile.failure_response, "no");
        assert_eq!(sicstus_profile.program_arguments, ProgramArguments::Default);
    }

    #[test]
    fn user_profiles_may_introduce_new_backend_ids() {
        let mut unresolved = UnresolvedConfiguration::default();
        unresolved.backend_id = Some("mylgt".to_string());
        unresolved
            .backend_data
            .insert("mylgt".to_string(), custom_profile());

        let configuration = unresolved.resolve(test_context("swilgt")).unwrap();

        assert_eq!(configuration.backend_id, "mylgt");
        assert_eq!(
            configuration
                .backend_profile("mylgt")
                .unwrap()
                .failure_response,
            "no"
        );
    }

    #[test]
    fn backend_profile_lookup_fails_for_absent_ids() {
        let configuration = UnresolvedConfiguration::default()
            .resolve(test_context("swilgt"))
            .unwrap();

        let error = configuration.backend_profile("gprolog").unwrap_err();

        assert!(matches!(
            error,
            ConfigurationError::UnknownBackend { backend_id } if backend_id == "gprolog"
        ));
    }

    #[test]
    fn round_trip_preserves_custom_backend_data() {
        let mut profile = custom_profile();
        profile.kernel_backend_path = Some("/opt/kernel/override.pl".to_string());

        let mut unresolved = UnresolvedConfiguration {
            jupyter_logging: true,
            server_logging: false,
            backend_id: Some("mylgt".to_string()),
            backend_data: HashMap::new(),
        };
        unresolved.backend_data.insert("mylgt".to_string(), profile);

        let serialized = toml::to_string(&unresolved).unwrap();
        let reloaded = toml::from_str::<UnresolvedConfiguration>(&serialized).unwrap();

        assert_eq!(unresolved, reloaded);
    }

    #[test]
    fn configuration_file_round_trips_through_load_from_path() {
        let mut unresolved = UnresolvedConfiguration::default();
        unresolved.backend_id = Some("mylgt".to_string());
        unresolved
            .backend_data
            .insert("mylgt".to_string(), custom_profile());

        let mut configuration_file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut configuration_file,
            toml::to_string(&unresolved).unwrap().as_bytes(),
        )
        .unwrap();

        let configuration = Configuration::load_from_path(configuration_file.path()).unwrap();

        assert_eq!(configuration.backend_id, "mylgt");
        assert_eq!(
            configuration.file_path,
            Some(dunce::canonicalize(configuration_file.path()).unwrap())
        );

        let reloaded_profile = configuration.backend_profile("mylgt").unwrap();
        assert_eq!(reloaded_profile.failure_response, "no");
        assert_eq!(reloaded_profile.success_response, "yes");
        assert_eq!(reloaded_profile.error_prefix, "!! ");
        assert_eq!(reloaded_profile.informational_prefix, ";; ");
        assert_eq!(
            reloaded_profile.program_arguments,
            ProgramArguments::Explicit(vec!["mylgt".to_string(), "--server".to_string()])
        );
    }
}
