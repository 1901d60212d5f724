//! Tracing initialization for the kernel launcher binary.

use std::path::Path;

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};


/// Initializes the global tracing subscriber with a console layer and
/// a non-blocking file layer.
///
/// Console output goes to standard error; standard output belongs to
/// the relayed backend stream. The returned guard flushes the file
/// writer on drop and must be kept alive for the lifetime of the
/// process.
pub fn initialize_tracing(
    console_output_filter: EnvFilter,
    log_file_output_filter: EnvFilter,
    log_file_output_directory: &Path,
    log_file_name: &str,
) -> Result<WorkerGuard> {
    if !log_file_output_directory.is_dir() {
        std::fs::create_dir_all(log_file_output_directory)
            .into_diagnostic()
            .wrap_err_with(|| {
                miette!(
                    "Failed to create missing log directory at {}.",
                    log_file_output_directory.display()
                )
            })?;
    }

    let file_appender =
        tracing_appender::rolling::never(log_file_output_directory, log_file_name);
    let (non_blocking_file_writer, worker_guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_output_filter);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_file_writer)
        .with_filter(log_file_output_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("Failed to initialize the global tracing subscriber.")?;

    Ok(worker_guard)
}
