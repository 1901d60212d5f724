use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, ExitStatus, Stdio};

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::{debug, warn};

use crate::backend::launch::LaunchCommand;
use crate::configuration::BackendProfile;


/// Classification of one line of backend output against the selected
/// profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// Exactly the profile's failure response: the query failed.
    Failure,

    /// Exactly the profile's success response: the query succeeded
    /// without variable bindings.
    Success,

    /// Starts with the profile's error prefix.
    Error,

    /// Starts with the profile's informational prefix.
    Informational,

    /// Anything else, relayed verbatim.
    Plain,
}


/// Classifies one line of backend output.
///
/// Whole-line matches take precedence over prefix matches; an empty
/// prefix never matches.
pub fn classify_line(profile: &BackendProfile, line: &str) -> OutputKind {
    if line == profile.failure_response {
        OutputKind::Failure
    } else if line == profile.success_response {
        OutputKind::Success
    } else if !profile.error_prefix.is_empty() && line.starts_with(&profile.error_prefix) {
        OutputKind::Error
    } else if !profile.informational_prefix.is_empty()
        && line.starts_with(&profile.informational_prefix)
    {
        OutputKind::Informational
    } else {
        OutputKind::Plain
    }
}


/// A running backend process whose output is relayed to our own
/// standard output.
///
/// The backend inherits our standard input, so queries typed into the
/// kernel's terminal reach it directly; only its standard output is
/// captured for classification.
pub struct BackendSession {
    child: Child,
    profile: BackendProfile,
    server_log: Option<File>,
}

impl BackendSession {
    /// File the backend's raw output stream is logged to when
    /// `server_logging` is enabled.
    pub const SERVER_LOG_FILE_NAME: &'static str = "logtalk_server.log";

    /// Spawns the backend process with its output captured.
    pub fn start(
        command: &LaunchCommand,
        profile: BackendProfile,
        server_logging: bool,
    ) -> Result<Self> {
        let child = Command::new(&command.program)
            .args(&command.arguments)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .spawn()
            .into_diagnostic()
            .wrap_err_with(|| miette!("Failed to start backend process {}.", command.program))?;

        let server_log = if server_logging {
            let log_file = File::create(Self::SERVER_LOG_FILE_NAME)
                .into_diagnostic()
                .wrap_err_with(|| {
                    miette!("Failed to create server log file {}.", Self::SERVER_LOG_FILE_NAME)
                })?;

            Some(log_file)
        } else {
            None
        };

        Ok(Self {
            child,
            profile,
            server_log,
        })
    }

    /// Relays backend output line-by-line until the process exits,
    /// then reports its exit status.
    pub fn relay(mut self) -> Result<ExitStatus> {
        let backend_stdout = self
            .child
            .stdout
            .take()
            .ok_or_else(|| miette!("Backend stdout was not captured."))?;

        let reader = BufReader::new(backend_stdout);
        let mut output = std::io::stdout().lock();

        for line in reader.lines() {
            let line = line
                .into_diagnostic()
                .wrap_err("Failed to read a line of backend output.")?;

            match classify_line(&self.profile, &line) {
                OutputKind::Failure => debug!("Query failed."),
                OutputKind::Success => debug!("Query succeeded without bindings."),
                OutputKind::Error => warn!("Backend error output: {}", line),
                OutputKind::Informational => debug!("Backend informational output: {}", line),
                OutputKind::Plain => {}
            }

            writeln!(output, "{}", line)
                .into_diagnostic()
                .wrap_err("Failed to relay a line of backend output.")?;

            if let Some(server_log) = self.server_log.as_mut() {
                writeln!(server_log, "{}", line)
                    .into_diagnostic()
                    .wrap_err("Failed to write to the server log file.")?;
            }
        }

        let exit_status = self
            .child
            .wait()
            .into_diagnostic()
            .wrap_err("Failed to wait for the backend process.")?;

        Ok(exit_status)
    }
}
