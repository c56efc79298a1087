//! Optional diagnostics capture at pipeline checkpoints.
//!
//! Screenshots and page dumps are side effects kept out of the lookup
//! state machine: the scraper invokes a sink at well-defined checkpoints,
//! and the sink decides what to do with the artifact. Diagnostics are
//! never required for correctness; a sink failure is logged and ignored.

use std::fs;
use std::path::PathBuf;

/// Well-defined points in the lookup flow where artifacts are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// The home page finished loading
    HomeLoaded,
    /// The results page finished loading
    ResultsLoaded,
    /// The anti-bot detector tripped
    Blocked,
    /// A navigation or extraction step failed
    Failed,
}

impl Checkpoint {
    fn label(self) -> &'static str {
        match self {
            Self::HomeLoaded => "homepage",
            Self::ResultsLoaded => "results",
            Self::Blocked => "blocked",
            Self::Failed => "failed",
        }
    }
}

/// Receiver for diagnostic artifacts captured during a lookup.
pub trait DiagnosticsSink: Send + Sync {
    /// Receive a PNG screenshot taken at a checkpoint.
    fn capture_screenshot(&self, checkpoint: Checkpoint, png: &[u8]);

    /// Receive the page markup read at a checkpoint.
    fn capture_html(&self, checkpoint: Checkpoint, html: &str);
}

/// Sink that writes artifacts as timestamped files in a directory.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink writing into `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, checkpoint: Checkpoint, extension: &str) -> PathBuf {
        let millis = chrono::Utc::now().timestamp_millis();
        self.dir
            .join(format!("debug-{}-{millis}.{extension}", checkpoint.label()))
    }
}

impl DiagnosticsSink for FileSink {
    fn capture_screenshot(&self, checkpoint: Checkpoint, png: &[u8]) {
        let path = self.path(checkpoint, "png");
        if let Err(e) = fs::write(&path, png) {
            tracing::debug!("failed to write {}: {}", path.display(), e);
        }
    }

    fn capture_html(&self, checkpoint: Checkpoint, html: &str) {
        let path = self.path(checkpoint, "html");
        if let Err(e) = fs::write(&path, html) {
            tracing::debug!("failed to write {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_writes_artifacts() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let sink = FileSink::new(tmp.path());

        sink.capture_screenshot(Checkpoint::HomeLoaded, &[0x89, 0x50, 0x4e, 0x47]);
        sink.capture_html(Checkpoint::ResultsLoaded, "<html></html>");

        let names: Vec<String> = fs::read_dir(tmp.path())
            .expect("read temp dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n.starts_with("debug-homepage-") && n.ends_with(".png")));
        assert!(names.iter().any(|n| n.starts_with("debug-results-") && n.ends_with(".html")));
    }

    #[test]
    fn test_file_sink_swallows_write_errors() {
        let sink = FileSink::new("/nonexistent/diagnostics");
        // Must not panic
        sink.capture_screenshot(Checkpoint::Failed, &[]);
        sink.capture_html(Checkpoint::Failed, "");
    }
}
