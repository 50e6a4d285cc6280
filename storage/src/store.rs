// storage/src/store.rs

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use models::{AuditEntry, ClinicError, ClinicResult};

/// Owns every persisted document. Handlers go through the typed
/// operations on this struct; nothing else touches the trees.
pub struct ClinicStore {
    // Root handle; the trees below are only valid while it is open.
    db: sled::Db,
    pub(crate) users: sled::Tree,
    pub(crate) users_by_national_id: sled::Tree,
    pub(crate) patients: sled::Tree,
    pub(crate) patients_by_national_id: sled::Tree,
    pub(crate) doctors: sled::Tree,
    pub(crate) nurses: sled::Tree,
    pub(crate) rooms: sled::Tree,
    pub(crate) specialties: sled::Tree,
    pub(crate) appointments: sled::Tree,
    // doctor_id|date|time -> appointment id
    pub(crate) appointment_slots: sled::Tree,
    // patient_id -> id of that patient's single pending appointment
    pub(crate) pending_appointments: sled::Tree,
    pub(crate) audit: sled::Tree,
}

pub(crate) fn sled_err(e: sled::Error) -> ClinicError {
    ClinicError::Storage(e.to_string())
}

impl ClinicStore {
    /// Opens (or creates) the database under `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> ClinicResult<Self> {
        let path = path.as_ref();
        info!("Opening clinic store at {:?}", path);
        let db = sled::Config::new()
            .path(path)
            .open()
            .map_err(|e| ClinicError::Storage(format!("failed to open store at {:?}: {}", path, e)))?;

        let tree = |name: &str| db.open_tree(name).map_err(sled_err);
        Ok(ClinicStore {
            users: tree("users")?,
            users_by_national_id: tree("users_by_national_id")?,
            patients: tree("patients")?,
            patients_by_national_id: tree("patients_by_national_id")?,
            doctors: tree("doctors")?,
            nurses: tree("nurses")?,
            rooms: tree("rooms")?,
            specialties: tree("specialties")?,
            appointments: tree("appointments")?,
            appointment_slots: tree("appointment_slots")?,
            pending_appointments: tree("pending_appointments")?,
            audit: tree("audit")?,
            db,
        })
    }

    /// Flushes buffered writes to disk. Called on shutdown; sled also
    /// flushes on its own schedule.
    pub fn flush(&self) -> ClinicResult<()> {
        self.db.flush().map_err(sled_err)?;
        Ok(())
    }

    // --- generic JSON document helpers ---

    pub(crate) fn put_doc<T: Serialize>(
        &self,
        tree: &sled::Tree,
        id: Uuid,
        doc: &T,
    ) -> ClinicResult<()> {
        let bytes = serde_json::to_vec(doc)?;
        tree.insert(id.as_bytes(), bytes).map_err(sled_err)?;
        Ok(())
    }

    pub(crate) fn get_doc<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        id: Uuid,
    ) -> ClinicResult<Option<T>> {
        match tree.get(id.as_bytes()).map_err(sled_err)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn list_docs<T: DeserializeOwned>(&self, tree: &sled::Tree) -> ClinicResult<Vec<T>> {
        let mut docs = Vec::new();
        for item in tree.iter() {
            let (_, bytes) = item.map_err(sled_err)?;
            docs.push(serde_json::from_slice(&bytes)?);
        }
        Ok(docs)
    }

    pub(crate) fn remove_doc(&self, tree: &sled::Tree, id: Uuid) -> ClinicResult<bool> {
        Ok(tree.remove(id.as_bytes()).map_err(sled_err)?.is_some())
    }

    // --- audit trail ---

    /// Appends an entry to the audit tree. Keyed by big-endian timestamp
    /// millis plus the entry id, so reverse iteration yields
    /// most-recent-first without a sort.
    pub fn append_audit(&self, entry: &AuditEntry) -> ClinicResult<()> {
        let mut key = Vec::with_capacity(24);
        key.extend_from_slice(&entry.timestamp.timestamp_millis().to_be_bytes());
        key.extend_from_slice(entry.id.as_bytes());
        let bytes = serde_json::to_vec(entry)?;
        self.audit.insert(key, bytes).map_err(sled_err)?;
        Ok(())
    }

    /// Audit entries newest first.
    pub fn audit_entries_desc(&self) -> impl Iterator<Item = ClinicResult<AuditEntry>> + '_ {
        self.audit.iter().rev().map(|item| {
            let (_, bytes) = item.map_err(sled_err)?;
            Ok(serde_json::from_slice(&bytes)?)
        })
    }
}
