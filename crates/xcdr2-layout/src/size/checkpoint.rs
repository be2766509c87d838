// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Checkpoint trace: per-node reported sizes in pre-order.
//!
//! A slot is reserved when a node opens and filled when it closes, so the
//! trace lists parents before their children even though a parent's size
//! is only known after all of its children.

use crate::error::{LayoutError, Result};

#[derive(Debug, Default, Clone)]
pub(crate) struct CheckpointTrace {
    slots: Vec<Option<usize>>,
}

impl CheckpointTrace {
    /// Reserve the next slot and return its index.
    pub(crate) fn reserve(&mut self) -> usize {
        self.slots.push(None);
        self.slots.len() - 1
    }

    pub(crate) fn fill(&mut self, slot: usize, size: usize) -> Result<()> {
        match self.slots.get_mut(slot) {
            Some(entry @ None) => {
                *entry = Some(size);
                Ok(())
            }
            Some(Some(previous)) => Err(LayoutError::misuse(
                "checkpoint",
                format!("slot {slot} already holds {previous}"),
            )),
            None => Err(LayoutError::misuse(
                "checkpoint",
                format!("slot {slot} was never reserved"),
            )),
        }
    }

    /// Filled sizes in slot order; fails if any slot is still open.
    pub(crate) fn sizes(&self) -> Result<Vec<usize>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(slot, size)| {
                size.ok_or_else(|| {
                    LayoutError::misuse("checkpoint", format!("slot {slot} is still open"))
                })
            })
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
