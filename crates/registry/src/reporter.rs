//! Status reporting for workflows.

/// Receives user-facing status lines from the workflows.
///
/// Reporting cannot fail from the workflow's point of view.
pub trait Reporter: Send + Sync {
    fn log(&self, message: &str, verbose: bool);
}

/// Forwards status lines to `tracing`: verbose lines at debug, the rest at info.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, message: &str, verbose: bool) {
        if verbose {
            tracing::debug!(target: "kvdeploy", "{message}");
        } else {
            tracing::info!(target: "kvdeploy", "{message}");
        }
    }
}
