//! File-backed petition store.
//!
//! Layout: one UTF-8 file containing a JSON array of petitions in creation
//! order. There is no schema version.
//!
//! Each mutation reads the whole array, changes it in memory and writes the
//! whole array back. Mutations hold `write_lock` for the entire
//! read-modify-write, and the new contents are written to a temporary file in
//! the same directory and renamed over the old one, so readers never observe
//! a half-written file. The lock is per process: two processes sharing one
//! file can still overwrite each other's changes.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use petition_store::{PetitionFactory, PetitionStore, StoreError};
use petition_types::{Petition, PetitionId};
use tempfile::NamedTempFile;

use crate::JsonStoreError;

pub struct JsonFileStore {
    path: PathBuf,
    factory: PetitionFactory,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`. The file is created on the first write; its
    /// parent directory is created now.
    pub fn open(path: impl Into<PathBuf>, factory: PetitionFactory) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(JsonStoreError::from)?;
        }
        tracing::debug!(path = %path.display(), "opened petitions file");
        Ok(Self {
            path,
            factory,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every petition. A missing file is an empty store.
    fn read_all(&self) -> Result<Vec<Petition>, JsonStoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Replace the file contents with `petitions`.
    fn write_all(&self, petitions: &[Petition]) -> Result<(), JsonStoreError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, petitions)
                .map_err(JsonStoreError::Encode)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| JsonStoreError::Io(e.error))?;
        Ok(())
    }

    /// Run `f` over the loaded collection under the write lock, persisting
    /// the collection afterwards if `f` succeeds.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Vec<Petition>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| JsonStoreError::Poisoned)?;
        let mut petitions = self.read_all()?;
        let out = f(&mut petitions)?;
        self.write_all(&petitions)?;
        Ok(out)
    }
}

impl PetitionStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Petition>, StoreError> {
        match self.read_all() {
            Ok(petitions) => Ok(petitions),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "cannot read petitions, serving none: {e}");
                Ok(Vec::new())
            }
        }
    }

    fn create(&self, title: &str, description: &str) -> Result<Petition, StoreError> {
        let petition = self.mutate(|petitions| {
            let petition = self.factory.mint(petitions, title, description)?;
            petitions.push(petition.clone());
            Ok(petition)
        })?;
        tracing::info!(petition_id = %petition.id, "petition created");
        Ok(petition)
    }

    fn increment_signature(&self, id: &PetitionId) -> Result<Petition, StoreError> {
        let petition = self.mutate(|petitions| {
            let petition = petitions
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            petition.record_signature();
            Ok(petition.clone())
        })?;
        tracing::info!(
            petition_id = %petition.id,
            signatures = petition.signature_count,
            "petition signed"
        );
        Ok(petition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petition_crypto::IdGenerator;
    use petition_types::SystemClock;
    use std::sync::Arc;

    fn temp_store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let factory = PetitionFactory::new(IdGenerator::new("test"), Arc::new(SystemClock));
        let store = JsonFileStore::open(dir.path().join("petitions.json"), factory).expect("open");
        (dir, store)
    }

    #[test]
    fn missing_file_lists_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn create_persists_to_disk() {
        let (_dir, store) = temp_store();
        let p = store.create("Clean river", "Stop the dumping").unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"signatureCount\": 0"));
        assert!(raw.contains(p.id.as_str()));
    }

    #[test]
    fn reopen_sees_previous_writes() {
        let (dir, store) = temp_store();
        let p = store.create("t", "d").unwrap();
        store.increment_signature(&p.id).unwrap();
        drop(store);

        let factory = PetitionFactory::new(IdGenerator::new("test"), Arc::new(SystemClock));
        let reopened = JsonFileStore::open(dir.path().join("petitions.json"), factory).unwrap();
        let listed = reopened.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].signature_count, 1);
    }

    #[test]
    fn corrupt_file_degrades_list_but_blocks_writes() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), b"{not json").unwrap();
        assert!(store.list().unwrap().is_empty());
        let err = store.create("t", "d").unwrap_err();
        assert!(matches!(err, StoreError::Corruption(_)));
        assert_eq!(fs::read(store.path()).unwrap(), b"{not json");
    }

    #[test]
    fn unknown_id_is_not_found_and_untouched() {
        let (_dir, store) = temp_store();
        store.create("t", "d").unwrap();
        let before = fs::read(store.path()).unwrap();
        let err = store
            .increment_signature(&PetitionId::new("nope").unwrap())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn loads_legacy_short_ids() {
        let (_dir, store) = temp_store();
        fs::write(
            store.path(),
            br#"[{"id":"k3j9x","title":"Old","description":"From before","signatureCount":4,"createdAt":"2024-01-02T03:04:05.678Z"}]"#,
        )
        .unwrap();
        let signed = store
            .increment_signature(&PetitionId::new("k3j9x").unwrap())
            .unwrap();
        assert_eq!(signed.signature_count, 5);
        assert_eq!(signed.title, "Old");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/petitions.json");
        let factory = PetitionFactory::new(IdGenerator::new("k"), Arc::new(SystemClock));
        let store = JsonFileStore::open(&path, factory).unwrap();
        store.create("t", "d").unwrap();
        assert!(path.exists());
    }
}
