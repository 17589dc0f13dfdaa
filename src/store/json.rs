use super::{PersistenceSink, TimetableDocument};
use crate::error::Result;
use crate::types::{PlacedSlot, Timetable, TimetableId};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed persistence: one JSON document per timetable under a root
/// directory. Commits go through a temp file and an atomic rename, so a
/// failed write never leaves a partial document behind.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: TimetableId) -> PathBuf {
        self.root.join(format!("timetable_{}.json", id.0))
    }

    fn write_document(&self, doc: &TimetableDocument) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating store directory {}", self.root.display()))?;

        let path = self.path_for(doc.timetable.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("renaming into {}", path.display()))?;
        Ok(())
    }

    fn read_document(path: &Path) -> Result<TimetableDocument> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let doc = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(doc)
    }

    /// All persisted timetable documents, sorted by id
    pub fn list(&self) -> Result<Vec<TimetableDocument>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_timetable = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("timetable_") && n.ends_with(".json"))
                .unwrap_or(false);
            if is_timetable {
                docs.push(Self::read_document(&path)?);
            }
        }
        docs.sort_by_key(|d| d.timetable.id);
        Ok(docs)
    }
}

impl PersistenceSink for JsonStore {
    fn commit(&self, timetable: &Timetable, slots: &[PlacedSlot]) -> Result<()> {
        self.write_document(&TimetableDocument {
            timetable: timetable.clone(),
            slots: slots.to_vec(),
        })
    }

    fn activate(&self, id: TimetableId) -> Result<()> {
        let docs = self.list()?;
        if !docs.iter().any(|d| d.timetable.id == id) {
            anyhow::bail!("timetable {id} does not exist in {}", self.root.display());
        }

        for mut doc in docs {
            let should_be_active = doc.timetable.id == id;
            if doc.timetable.is_active != should_be_active {
                doc.timetable.is_active = should_be_active;
                self.write_document(&doc)?;
            }
        }
        Ok(())
    }

    fn load(&self, id: TimetableId) -> Result<Option<TimetableDocument>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_document(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AcademicHalf;

    fn timetable(id: u32) -> Timetable {
        Timetable {
            id: TimetableId(id),
            name: format!("Timetable {id}"),
            semester: "Spring".into(),
            year: 2026,
            academic_half: AcademicHalf::SecondHalf,
            is_active: false,
            generation_metadata: None,
        }
    }

    fn temp_store(tag: &str) -> JsonStore {
        let dir = std::env::temp_dir().join(format!("uni-timetabler-store-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        JsonStore::new(dir)
    }

    #[test]
    fn test_commit_and_load_roundtrip() {
        let store = temp_store("roundtrip");
        store.commit(&timetable(1), &[]).unwrap();

        let doc = store.load(TimetableId(1)).unwrap().unwrap();
        assert_eq!(doc.timetable.name, "Timetable 1");
        assert!(store.load(TimetableId(2)).unwrap().is_none());
    }

    #[test]
    fn test_no_tmp_file_left_after_commit() {
        let store = temp_store("tmpfile");
        store.commit(&timetable(3), &[]).unwrap();

        let leftovers: Vec<_> = fs::read_dir(&store.root)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_activation_clears_others() {
        let store = temp_store("activate");
        store.commit(&timetable(1), &[]).unwrap();
        store.commit(&timetable(2), &[]).unwrap();

        store.activate(TimetableId(1)).unwrap();
        store.activate(TimetableId(2)).unwrap();

        let active: Vec<u32> = store
            .list()
            .unwrap()
            .into_iter()
            .filter(|d| d.timetable.is_active)
            .map(|d| d.timetable.id.0)
            .collect();
        assert_eq!(active, vec![2]);
    }
}
