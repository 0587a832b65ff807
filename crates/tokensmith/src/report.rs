//! Batch accounting and the final summary report.

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::batch::BatchOptions;

/// Running counters and per-item problems accumulated during a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub collections_created: usize,
    pub collections_updated: usize,
    pub variables_created: usize,
    pub variables_updated: usize,
    pub errors: Vec<String>,
}

impl ProcessingResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a per-item problem and logs it.
    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.errors.push(message);
    }
}

/// The summary handed back to the caller of a batch.
///
/// Only the first [`BatchOptions::max_reported_errors`] messages are kept;
/// the rest are counted in `more_errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub collections_created: usize,
    pub collections_updated: usize,
    pub variables_created: usize,
    pub variables_updated: usize,
    /// The mode added by the flat-map entry point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub error_count: usize,
    pub errors: Vec<String>,
    pub more_errors: usize,
    /// Set when a structural problem stopped the batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl Report {
    pub fn new(result: ProcessingResult, options: &BatchOptions) -> Self {
        let error_count = result.errors.len();
        let shown = error_count.min(options.max_reported_errors);
        let errors = result
            .errors
            .iter()
            .take(shown)
            .map(|e| clip_line(e, options.line_width))
            .collect();

        Self {
            collections_created: result.collections_created,
            collections_updated: result.collections_updated,
            variables_created: result.variables_created,
            variables_updated: result.variables_updated,
            mode: None,
            error_count,
            errors,
            more_errors: error_count - shown,
            aborted: None,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_abort(mut self, reason: impl Into<String>) -> Self {
        self.aborted = Some(reason.into());
        self
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// `true` when the batch completed without any recorded problem.
    pub fn is_clean(&self) -> bool {
        self.aborted.is_none() && self.error_count == 0
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.aborted {
            Some(reason) => writeln!(f, "Sync aborted: {}", reason)?,
            None => writeln!(f, "Sync complete")?,
        }
        writeln!(f)?;

        if let Some(mode) = &self.mode {
            writeln!(f, "• Mode: \"{}\"", mode)?;
        }
        writeln!(
            f,
            "• Collections: {} created, {} updated",
            self.collections_created, self.collections_updated
        )?;
        write!(
            f,
            "• Variables: {} created, {} updated",
            self.variables_created, self.variables_updated
        )?;

        if self.error_count > 0 {
            write!(f, "\n• Warnings ({}):", self.error_count)?;
            for error in &self.errors {
                write!(f, "\n  - {}", error)?;
            }
            if self.more_errors > 0 {
                write!(f, "\n  … +{} more", self.more_errors)?;
            }
        }
        Ok(())
    }
}

/// Clips a message to `max_width` display columns, ending it with `…`.
fn clip_line(message: &str, max_width: usize) -> String {
    if message.width() <= max_width {
        return message.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut clipped = String::new();
    let mut used = 0;
    for c in message.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        clipped.push(c);
        used += w;
    }
    clipped.push('…');
    clipped
}
