mod json;

pub use json::*;

use crate::error::Result;
use crate::types::{PlacedSlot, Timetable, TimetableId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A timetable together with its expanded hour slots, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableDocument {
    pub timetable: Timetable,
    pub slots: Vec<PlacedSlot>,
}

/// Destination for finalised timetables.
///
/// `commit` replaces the timetable's slot set in one transaction: on error
/// nothing of the new state is visible. `activate` is a separate operation
/// (invoked by the caller, never by the generator) that flips `is_active`
/// on exactly one timetable and clears it on all others.
pub trait PersistenceSink {
    fn commit(&self, timetable: &Timetable, slots: &[PlacedSlot]) -> Result<()>;

    fn activate(&self, id: TimetableId) -> Result<()>;

    fn load(&self, id: TimetableId) -> Result<Option<TimetableDocument>>;
}

/// In-memory sink for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<BTreeMap<TimetableId, TimetableDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Vec<TimetableDocument> {
        self.inner.lock().unwrap().values().cloned().collect()
    }
}

impl PersistenceSink for MemoryStore {
    fn commit(&self, timetable: &Timetable, slots: &[PlacedSlot]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(
            timetable.id,
            TimetableDocument {
                timetable: timetable.clone(),
                slots: slots.to_vec(),
            },
        );
        Ok(())
    }

    fn activate(&self, id: TimetableId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.contains_key(&id) {
            anyhow::bail!("timetable {id} does not exist");
        }
        for (other_id, doc) in inner.iter_mut() {
            doc.timetable.is_active = *other_id == id;
        }
        Ok(())
    }

    fn load(&self, id: TimetableId) -> Result<Option<TimetableDocument>> {
        Ok(self.inner.lock().unwrap().get(&id).cloned())
    }
}
