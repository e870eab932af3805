//! Sinks for the human readable progress stream.

/// Receiver of progress lines.
///
/// `info` carries regular progress (URLs being processed, completion notices); `warn` carries
/// warnings and per-asset errors.
pub trait ProgressSink {
  /// Report a regular progress line.
  fn info(&mut self, line: &str);
  /// Report a warning or a recovered error.
  fn warn(&mut self, line: &str);
}

/// Writes progress to stdout and warnings to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
  fn info(&mut self, line: &str) {
    println!("{line}");
  }

  fn warn(&mut self, line: &str) {
    eprintln!("{line}");
  }
}

/// A single captured progress line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressLine {
  /// Regular progress.
  Info(String),
  /// Warning or recovered error.
  Warn(String),
}

impl ProgressLine {
  /// Text of the line regardless of severity.
  pub fn text(&self) -> &str {
    match self {
      Self::Info(text) | Self::Warn(text) => text,
    }
  }
}

/// Collects progress lines in memory, e.g. for display in a UI.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
  /// Captured lines in arrival order.
  pub lines: Vec<ProgressLine>,
}

impl RecordingSink {
  /// Whether any line contains `needle`.
  pub fn contains(&self, needle: &str) -> bool {
    self.lines.iter().any(|line| line.text().contains(needle))
  }

  /// Captured warnings.
  pub fn warnings(&self) -> impl Iterator<Item = &str> {
    self.lines.iter().filter_map(|line| match line {
      ProgressLine::Warn(text) => Some(text.as_str()),
      ProgressLine::Info(_) => None,
    })
  }
}

impl ProgressSink for RecordingSink {
  fn info(&mut self, line: &str) {
    self.lines.push(ProgressLine::Info(line.to_string()));
  }

  fn warn(&mut self, line: &str) {
    self.lines.push(ProgressLine::Warn(line.to_string()));
  }
}
