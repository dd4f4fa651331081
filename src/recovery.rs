//! Recovery strategies for malformed record blocks.
//!
//! Record text in a bibliography file is edited by hand, so blocks are routinely
//! incomplete. The decoder reports each local problem to a [`RecoveryContext`], which
//! either turns it into an error or records it and lets decoding continue with the
//! next block.

use crate::error::{BibError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Strategy for handling malformed record blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryMode {
    /// Strict mode: the first malformed block aborts the decode
    Strict,
    /// Lenient mode: skip malformed blocks and keep going (default)
    #[default]
    Lenient,
    /// Permissive mode: like lenient, and also keep blocks that were never closed
    Permissive,
}

/// Tally of the record blocks a decode pass skipped.
#[derive(Debug, Default)]
pub struct RecoveryContext {
    /// How skipped blocks are treated
    pub mode: RecoveryMode,
    /// Set once any block has been skipped
    pub has_errors: bool,
    /// One `"<location>: <error>"` entry per skipped block, in input order
    pub recovery_messages: Vec<String>,
}

impl RecoveryContext {
    /// An empty tally for a decode pass in `mode`.
    #[must_use]
    pub fn new(mode: RecoveryMode) -> Self {
        RecoveryContext {
            mode,
            has_errors: false,
            recovery_messages: Vec::new(),
        }
    }

    fn add_message(&mut self, message: String) {
        self.has_errors = true;
        self.recovery_messages.push(message);
    }

    /// Whether unterminated blocks should be kept rather than dropped.
    #[must_use]
    pub fn salvages_unterminated(&self) -> bool {
        self.mode == RecoveryMode::Permissive
    }

    /// Report a malformed block found at `context` (usually `"line N"`).
    ///
    /// # Errors
    ///
    /// Strict mode hands `error` back so the decode stops. The other modes log it,
    /// note it in [`recovery_messages`](Self::recovery_messages) and return `Ok(None)`
    /// so the caller moves on to the next block.
    pub fn recover<T>(&mut self, error: BibError, context: &str) -> Result<Option<T>> {
        match self.mode {
            RecoveryMode::Strict => Err(error),
            RecoveryMode::Lenient | RecoveryMode::Permissive => {
                warn!(%error, context, "skipping malformed record block");
                self.add_message(format!("{context}: {error}"));
                Ok(None)
            },
        }
    }
}
