use anyhow::{bail, Result};
use serde::Serialize;

use crate::{
    backend::{GrabSequence, GrabTask},
    models::{GrabColor, GrabRequest},
};

/// Pending Task 1 grabs. Insertion order is dispatch order; duplicates are
/// kept as separate steps.
#[derive(Debug, Clone, Default)]
pub struct GrabQueue {
    entries: Vec<GrabRequest>,
    next_seq: u64,
}

/// Snapshot of the queue taken for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabBatch {
    seqs: Vec<u64>,
    pub sequence: GrabSequence,
}

impl GrabBatch {
    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryView {
    pub index: usize,
    pub color: GrabColor,
    pub label: String,
}

/// Full re-render of the queue list; indices are only valid against the
/// most recent view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueView {
    pub entries: Vec<QueueEntryView>,
    pub count: usize,
    pub can_execute: bool,
}

impl GrabQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, color: GrabColor) -> GrabRequest {
        let request = GrabRequest {
            seq: self.next_seq,
            color,
        };
        self.next_seq += 1;
        self.entries.push(request);
        request
    }

    pub fn remove(&mut self, index: usize) -> Result<GrabRequest> {
        if index >= self.entries.len() {
            bail!(
                "grab queue has {} entries, cannot remove #{}",
                self.entries.len(),
                index + 1
            );
        }
        Ok(self.entries.remove(index))
    }

    /// Drops every entry; returns how many were discarded.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GrabRequest] {
        &self.entries
    }

    pub fn colors(&self) -> Vec<GrabColor> {
        self.entries.iter().map(|entry| entry.color).collect()
    }

    /// `None` for an empty queue: nothing may be dispatched.
    pub fn batch(&self) -> Option<GrabBatch> {
        if self.entries.is_empty() {
            return None;
        }
        Some(GrabBatch {
            seqs: self.entries.iter().map(|entry| entry.seq).collect(),
            sequence: GrabSequence {
                tasks: self.entries.iter().map(|entry| GrabTask::from(entry.color)).collect(),
            },
        })
    }

    /// Removes the entries a successful dispatch carried. Entries enqueued
    /// while the batch was in flight stay queued.
    pub fn complete(&mut self, batch: &GrabBatch) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !batch.seqs.contains(&entry.seq));
        before - self.entries.len()
    }

    pub fn view(&self) -> QueueView {
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| QueueEntryView {
                index,
                color: entry.color,
                label: format!(
                    "Grab task {}: {}",
                    index + 1,
                    entry.color.as_str().to_ascii_uppercase()
                ),
            })
            .collect();

        QueueView {
            entries,
            count: self.entries.len(),
            can_execute: !self.entries.is_empty(),
        }
    }
}
