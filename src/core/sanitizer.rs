// src/core/sanitizer.rs

use crate::models::SanitizerConfig;

/// Separates the payload of an operation from the log output the node mixes into stdout.
pub trait OutputFilter: Send + Sync {
    /// Must be idempotent: filtering already-filtered text changes nothing.
    fn sanitize(&self, raw_stdout: &str) -> String;
}

/// Line-based filter: a line is dropped when it contains one of the namespace
/// markers or when its trimmed content starts with a severity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLineFilter {
    markers: Vec<String>,
    severities: Vec<String>,
}

impl LogLineFilter {
    /// A filter with explicit markers and severity prefixes.
    pub fn new(markers: Vec<String>, severities: Vec<String>) -> Self {
        // An empty pattern would match every line.
        let keep = |p: &String| !p.is_empty();
        Self {
            markers: markers.into_iter().filter(keep).collect(),
            severities: severities.into_iter().filter(keep).collect(),
        }
    }

    /// A filter using the `[sanitizer]` settings.
    pub fn from_config(config: &SanitizerConfig) -> Self {
        Self::new(config.markers.clone(), config.severities.clone())
    }

    fn is_log_line(&self, line: &str) -> bool {
        let trimmed = line.trim();
        self.markers.iter().any(|m| line.contains(m.as_str()))
            || self.severities.iter().any(|s| trimmed.starts_with(s.as_str()))
    }
}

impl Default for LogLineFilter {
    fn default() -> Self {
        Self::from_config(&SanitizerConfig::default())
    }
}

impl OutputFilter for LogLineFilter {
    fn sanitize(&self, raw_stdout: &str) -> String {
        raw_stdout
            .split('\n')
            .filter(|line| !self.is_log_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
