use crate::{Failure, FailureCategory};

use serde::Serialize;

/// Ordered, message-deduplicated set of user-visible failures.
///
/// This is the single collection the UI renders. Recording moves a repeated
/// message to the back, promoting moves it to the front; a message never
/// appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Failures {
    entries: Vec<Failure>,
}

/// Result of folding one server failure batch into [`Failures`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileBatchOutcome {
    pub fatal: usize,
    pub non_fatal: usize,
}

impl Failures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append as the most recent entry. A repeated message is moved to the
    /// back instead of duplicated; returns `false` in that case.
    pub fn record(&mut self, failure: Failure) -> bool {
        let before = self.entries.len();
        self.entries.retain(|f| f.message != failure.message);
        let is_new = self.entries.len() == before;
        self.entries.push(failure);
        is_new
    }

    /// Move to the front, inserting if absent.
    pub fn promote(&mut self, failure: Failure) {
        self.entries.retain(|f| f.message != failure.message);
        self.entries.insert(0, failure);
    }

    /// Fold a batch of compiler failure messages.
    ///
    /// Messages containing `marker` are fatal and replace every previous
    /// compile error. Everything else is promoted to the front. An empty batch
    /// clears the compile error state.
    pub fn apply_compile_batch(&mut self, messages: &[String], marker: &str) -> CompileBatchOutcome {
        self.entries
            .retain(|f| f.category != FailureCategory::CompileError);

        let mut outcome = CompileBatchOutcome::default();
        for message in messages {
            if message.contains(marker) {
                outcome.fatal += 1;
                self.record(Failure::compile_error(message.as_str()));
            } else {
                outcome.non_fatal += 1;
                self.promote(Failure::unsupported(message.as_str()));
            }
        }
        outcome
    }

    pub fn has_compile_error(&self) -> bool {
        self.entries.iter().any(Failure::is_compile_error)
    }

    /// Whether a recompile could fix anything. Apply errors alone do not
    /// count; recompiling reproduces the same patch.
    pub fn has_unsupported_changes(&self) -> bool {
        self.entries
            .iter()
            .any(|f| f.category == FailureCategory::UnsupportedChange)
    }

    pub fn contains(&self, message: &str) -> bool {
        self.entries.iter().any(|f| f.message == message)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Failure> {
        self.entries.iter()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|f| f.message.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a Failures {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
