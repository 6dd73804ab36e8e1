//! Terminal output for workflow status lines.

use kvdeploy_registry::Reporter;

/// Prints status lines to stdout. Verbose lines are only printed with `--verbose`.
#[derive(Clone, Copy, Debug)]
pub struct StdoutReporter {
    verbose: bool,
}

impl StdoutReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn should_print(&self, verbose: bool) -> bool {
        !verbose || self.verbose
    }
}

impl Reporter for StdoutReporter {
    fn log(&self, message: &str, verbose: bool) {
        if self.should_print(verbose) {
            println!("{message}");
        }
    }
}
