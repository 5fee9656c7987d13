//! Per-region progress reporting.

use std::sync::{Arc, Mutex};

/// Status sink handed to a delegate for one regional task.
///
/// Every update is emitted as a tracing event tagged with the region and kept
/// in order so callers can inspect what a region went through.
#[derive(Debug, Clone)]
pub struct TaskReporter {
    region: String,
    title: String,
    statuses: Arc<Mutex<Vec<String>>>,
}

impl TaskReporter {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        let title = format!("Deploy Alexa skill infrastructure for region \"{}\"", region);
        Self {
            region,
            title,
            statuses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn update_status(&self, status: impl Into<String>) {
        let status = status.into();
        tracing::info!(region = %self.region, task = %self.title, "{}", status);
        if let Ok(mut statuses) = self.statuses.lock() {
            statuses.push(status);
        }
    }

    /// Statuses reported so far, oldest first.
    pub fn statuses(&self) -> Vec<String> {
        self.statuses
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_statuses_in_order() {
        let reporter = TaskReporter::new("EU");
        reporter.update_status("uploading");
        reporter.clone().update_status("creating stack");

        assert_eq!(reporter.statuses(), vec!["uploading", "creating stack"]);
        assert_eq!(
            reporter.title(),
            "Deploy Alexa skill infrastructure for region \"EU\""
        );
    }
}
