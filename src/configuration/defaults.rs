//! Built-in configuration defaults: the table of known backend
//! integration scripts and the platform-dependent choice of a default
//! backend id.

use std::collections::HashMap;

use super::structure::{BackendProfile, ProgramArguments};


/// Backend family the kernel falls back to when the configuration does
/// not select one. The concrete script variant (bare, `.sh` or `.ps1`)
/// is decided by [`resolve_default_backend_id`].
pub const DEFAULT_BACKEND_FAMILY: &str = "swilgt";

/// Integration script families, one per supported Prolog system.
pub const BACKEND_FAMILIES: [&str; 6] = [
    "eclipselgt",
    "lvmlgt",
    "sicstuslgt",
    "swilgt",
    "tplgt",
    "yaplgt",
];

/// Script variants each family ships: the bare command, the POSIX
/// shell wrapper and the PowerShell wrapper.
pub const BACKEND_SCRIPT_SUFFIXES: [&str; 3] = ["", ".sh", ".ps1"];


/// Strips the script suffix off a backend id, leaving the integration
/// script family (e.g. `swilgt.ps1` becomes `swilgt`).
pub fn backend_family(backend_id: &str) -> &str {
    backend_id.trim_end_matches(".sh").trim_end_matches(".ps1")
}


/// Takes a snapshot of the process environment as a plain map.
pub fn process_environment() -> HashMap<String, String> {
    std::env::vars().collect()
}


/// Resolves the default backend id for the given platform name and
/// environment.
///
/// On a Windows-family platform the PowerShell integration script is
/// selected. On any other platform the POSIX shell script is selected
/// when `LOGTALKHOME` and `LOGTALKUSER` are both set and exactly
/// equal, matching how the integration scripts themselves are invoked;
/// a partial or differing pair selects the bare backend command.
///
/// This is a pure function over its parameters: callers pass
/// [`std::env::consts::OS`] and a [`process_environment`] snapshot for
/// the real process, or fabricated values in tests.
pub fn resolve_default_backend_id(
    platform_name: &str,
    environment: &HashMap<String, String>,
) -> String {
    if platform_name == "windows" {
        return format!("{}.ps1", DEFAULT_BACKEND_FAMILY);
    }

    let logtalk_home = environment.get("LOGTALKHOME");
    let logtalk_user = environment.get("LOGTALKUSER");

    match (logtalk_home, logtalk_user) {
        (Some(home), Some(user)) if home == user => format!("{}.sh", DEFAULT_BACKEND_FAMILY),
        _ => DEFAULT_BACKEND_FAMILY.to_string(),
    }
}


/// Builds the built-in backend table: one profile per known backend
/// id, covering every family in every script variant.
pub(crate) fn default_backend_data() -> HashMap<String, BackendProfile> {
    let mut backend_data =
        HashMap::with_capacity(BACKEND_FAMILIES.len() * BACKEND_SCRIPT_SUFFIXES.len());

    for family in BACKEND_FAMILIES {
        for suffix in BACKEND_SCRIPT_SUFFIXES {
            backend_data.insert(format!("{}{}", family, suffix), default_profile(family));
        }
    }

    backend_data
}


/// Default response strings for one backend family.
///
/// SICStus reports query outcomes as `yes`/`no` and marks errors with
/// `! `; the other supported systems use SWI-style `true`/`false`
/// toplevel responses.
fn default_profile(family: &str) -> BackendProfile {
    let (failure_response, success_response, error_prefix) = match family {
        "sicstuslgt" => ("no", "yes", "! "),
        _ => ("false", "true", "ERROR: "),
    };

    BackendProfile {
        failure_response: failure_response.to_string(),
        success_response: success_response.to_string(),
        error_prefix: error_prefix.to_string(),
        informational_prefix: "% ".to_string(),
        program_arguments: ProgramArguments::Default,
        kernel_backend_path: None,
    }
}
