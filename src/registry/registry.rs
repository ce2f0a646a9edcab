//! Fixed-capacity arena of marker records.
//!
//! Slots are appended in order of first sighting and persist for the life
//! of the process. The registry is the single mutable store of the pose
//! graph; all frame processing happens on one thread, so no locking is
//! needed (see the system module).

use thiserror::Error;

use super::record::MarkerRecord;
use super::types::{MarkerId, SlotId};

#[derive(Debug, Error)]
pub enum RegistryError {
    /// More distinct qualifying markers were sighted than the registry can
    /// hold. The offending detection is rejected; existing slots are
    /// untouched.
    #[error("marker registry full ({capacity} slots)")]
    Full { capacity: usize },
}

/// Fixed-capacity collection of marker records, keyed by marker ID.
#[derive(Debug)]
pub struct MarkerRegistry {
    slots: Vec<MarkerRecord>,
    capacity: usize,
}

impl MarkerRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Frame lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Clear every slot's visibility flag. Called once at frame start.
    pub fn begin_frame(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lookup and allocation
    // ─────────────────────────────────────────────────────────────────────

    /// Find the slot holding the given marker ID.
    pub fn find(&self, id: MarkerId) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|rec| rec.id == id)
            .map(SlotId::new)
    }

    /// Append a new slot for a first-sighted marker.
    pub fn allocate(&mut self, id: MarkerId) -> Result<SlotId, RegistryError> {
        if self.slots.len() >= self.capacity {
            return Err(RegistryError::Full {
                capacity: self.capacity,
            });
        }
        self.slots.push(MarkerRecord::new(id));
        Ok(SlotId::new(self.slots.len() - 1))
    }

    pub fn get(&self, slot: SlotId) -> Option<&MarkerRecord> {
        self.slots.get(slot.index())
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut MarkerRecord> {
        self.slots.get_mut(slot.index())
    }

    /// The slot parented directly to the world frame, if any exists yet.
    pub fn origin(&self) -> Option<SlotId> {
        self.iter()
            .find(|(_, rec)| matches!(rec.parent(), Some(super::record::Parent::World)))
            .map(|(slot, _)| slot)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Iteration
    // ─────────────────────────────────────────────────────────────────────

    /// Iterate over all slots in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &MarkerRecord)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, rec)| (SlotId::new(idx), rec))
    }

    /// Iterate over slots detected in the current frame.
    pub fn active(&self) -> impl Iterator<Item = (SlotId, &MarkerRecord)> {
        self.iter().filter(|(_, rec)| rec.active)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
