// audit/src/recorder.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::error;
use uuid::Uuid;

use models::{Actor, AuditAction, AuditEntity, AuditEntry};
use storage::ClinicStore;

/// Optional context for a trail record. Snapshots are handed in by the
/// calling handler; the recorder never reads other entities back.
#[derive(Debug, Clone, Default)]
pub struct RecordDetails {
    pub entity_id: Option<Uuid>,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// What a handler wants audited about its own successful mutation.
/// Attached to the response and picked up by the capture layer, which
/// falls back to a synthesized description when a handler leaves it out.
#[derive(Debug, Clone)]
pub struct AuditContext {
    pub action: AuditAction,
    pub entity: AuditEntity,
    pub entity_id: Option<Uuid>,
    pub description: String,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<ClinicStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        AuditRecorder { store }
    }

    /// Records a successful action. Returns the spawned task handle so
    /// tests can await the write; production callers drop it.
    pub fn record(
        &self,
        actor: &Actor,
        action: AuditAction,
        entity: AuditEntity,
        description: impl Into<String>,
        details: RecordDetails,
    ) -> tokio::task::JoinHandle<()> {
        self.dispatch(self.build_entry(actor, action, entity, description.into(), details, true, None))
    }

    /// Records a refused or failed attempt, e.g. a room assignment
    /// declined by the soft-conflict policy.
    pub fn record_failure(
        &self,
        actor: &Actor,
        action: AuditAction,
        entity: AuditEntity,
        description: impl Into<String>,
        error_message: impl Into<String>,
        details: RecordDetails,
    ) -> tokio::task::JoinHandle<()> {
        self.dispatch(self.build_entry(
            actor,
            action,
            entity,
            description.into(),
            details,
            false,
            Some(error_message.into()),
        ))
    }

    fn build_entry(
        &self,
        actor: &Actor,
        action: AuditAction,
        entity: AuditEntity,
        description: String,
        details: RecordDetails,
        succeeded: bool,
        error_message: Option<String>,
    ) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4(),
            actor_id: actor.id,
            actor_name: actor.name.clone(),
            actor_role: actor.role,
            action,
            entity,
            entity_id: details.entity_id,
            description,
            before: details.before,
            after: details.after,
            ip: details.ip,
            user_agent: details.user_agent,
            succeeded,
            error_message,
            timestamp: Utc::now(),
        }
    }

    /// The write happens on a detached task. Failures go to the
    /// operational log only; the caller's response is already decided.
    fn dispatch(&self, entry: AuditEntry) -> tokio::task::JoinHandle<()> {
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.append_audit(&entry) {
                error!(
                    action = %entry.action,
                    entity = %entry.entity,
                    "failed to write audit entry: {}",
                    e
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Role;

    fn actor() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            name: "Alice Smith".into(),
            role: Role::Nurse,
        }
    }

    #[tokio::test]
    async fn should_persist_entry_without_blocking_caller() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ClinicStore::open(dir.path()).unwrap());
        let recorder = AuditRecorder::new(store.clone());

        let handle = recorder.record(
            &actor(),
            AuditAction::Create,
            AuditEntity::Patient,
            "created patient Maria Lopez",
            RecordDetails::default(),
        );
        handle.await.unwrap();

        let entries: Vec<_> = store
            .audit_entries_desc()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].succeeded);
        assert_eq!(entries[0].description, "created patient Maria Lopez");
    }

    #[tokio::test]
    async fn should_record_refused_attempt_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ClinicStore::open(dir.path()).unwrap());
        let recorder = AuditRecorder::new(store.clone());

        recorder
            .record_failure(
                &actor(),
                AuditAction::Update,
                AuditEntity::Doctor,
                "room assignment refused",
                "room is already assigned to another doctor",
                RecordDetails::default(),
            )
            .await
            .unwrap();

        let entries: Vec<_> = store
            .audit_entries_desc()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].succeeded);
        assert!(entries[0].error_message.is_some());
    }
}
