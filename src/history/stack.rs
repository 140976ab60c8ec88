use std::collections::VecDeque;

use crate::foundation::core::RasterBuffer;

/// Linear undo/redo stack of committed [`RasterBuffer`] snapshots.
///
/// `present` is never part of `past` or `future`.
#[derive(Debug, Default)]
pub struct HistoryStack {
    past: VecDeque<RasterBuffer>,
    present: Option<RasterBuffer>,
    future: Vec<RasterBuffer>,
    revision: u64,
    limit: Option<usize>,
}

impl HistoryStack {
    /// Uncapped, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty history that keeps at most `limit` undo steps. `None` and `Some(0)` are uncapped.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.filter(|&n| n > 0),
            ..Self::default()
        }
    }

    /// Push `next` as the new present, discarding the redo branch.
    pub fn commit(&mut self, next: RasterBuffer) {
        if let Some(prev) = self.present.take() {
            self.past.push_back(prev);
        }
        self.present = Some(next);
        self.future.clear();
        self.evict();
        self.bump();
        tracing::debug!(
            revision = self.revision,
            past = self.past.len(),
            "history commit"
        );
    }

    /// Step back one snapshot; `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop_back() else {
            return false;
        };
        if let Some(cur) = self.present.replace(prev) {
            self.future.push(cur);
        }
        self.bump();
        tracing::debug!(revision = self.revision, "history undo");
        true
    }

    /// Step forward one snapshot; `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        if let Some(cur) = self.present.replace(next) {
            self.past.push_back(cur);
        }
        self.bump();
        tracing::debug!(revision = self.revision, "history redo");
        true
    }

    /// Return `true` when [`HistoryStack::undo`] would succeed.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Return `true` when [`HistoryStack::redo`] would succeed.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// The present snapshot, if any image has been committed.
    pub fn current(&self) -> Option<&RasterBuffer> {
        self.present.as_ref()
    }

    /// Generation counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of snapshots available to undo.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of snapshots available to redo.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.past.clear();
        self.present = None;
        self.future.clear();
        self.bump();
    }

    fn evict(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.past.len() > limit {
            self.past.pop_front();
            tracing::debug!(limit, "history evicted oldest snapshot");
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/stack.rs"]
mod tests;
