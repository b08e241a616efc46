//! CLI-specific progress handling for nogo-router
//!
//! Shows a spinner while a route request is in flight.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a spinner for an in-flight request
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Failed to create spinner style")
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    pb.set_message(message.to_string());
    pb
}

/// Spinner shown between submit and reply
pub struct RequestSpinner {
    pub pb: ProgressBar,
}

impl RequestSpinner {
    /// Start spinning
    pub fn start(message: &str) -> Self {
        let pb = create_spinner(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    /// Stop and leave a final line behind
    pub fn finish(self, message: &str) {
        self.pb.finish_with_message(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner_template() {
        let pb = create_spinner("Finding route...");
        assert_eq!(pb.message(), "Finding route...");
        pb.finish();
    }

    #[test]
    fn test_request_spinner_finish() {
        let spinner = RequestSpinner::start("Finding route...");
        let pb = spinner.pb.clone();
        spinner.finish("Route found");
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "Route found");
    }
}
