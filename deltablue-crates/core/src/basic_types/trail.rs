use std::iter::Rev;
use std::vec::Drain;

use crate::deltablue_assert_simple;

/// An undo log which is divided into checkpoints.
///
/// Entries are only recorded while at least one checkpoint is open; outside of a checkpoint there
/// is nothing to undo to, so [`Trail::push`] discards the entry.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    /// The number of open checkpoints.
    depth: usize,
    /// The length of `entries` at the moment each open checkpoint was taken.
    starts: Vec<usize>,
    entries: Vec<T>,
}

// A derived Default would require `T: Default`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            depth: 0,
            starts: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.depth += 1;
        self.starts.push(self.entries.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.depth
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.depth > 0
    }

    /// Drops every checkpoint above `checkpoint` and returns the entries which were recorded
    /// since, most recent first.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) -> Rev<Drain<'_, T>> {
        deltablue_assert_simple!(checkpoint < self.depth);

        let start = self.starts[checkpoint];
        self.depth = checkpoint;
        self.starts.truncate(checkpoint);
        self.entries.drain(start..).rev()
    }

    /// Closes every checkpoint above `checkpoint` while keeping the recorded entries as part
    /// of the enclosing checkpoint. Committing to checkpoint 0 forgets all entries.
    pub(crate) fn commit(&mut self, checkpoint: usize) {
        deltablue_assert_simple!(checkpoint < self.depth);

        self.depth = checkpoint;
        self.starts.truncate(checkpoint);
        if checkpoint == 0 {
            self.entries.clear();
        }
    }

    pub(crate) fn push(&mut self, entry: T) {
        if self.is_recording() {
            self.entries.push(entry);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
