// audit/src/query.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::{AuditAction, AuditEntity, AuditEntry, ClinicResult};
use storage::ClinicStore;

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_STATS_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_TOP_ACTORS: usize = 5;

/// Filter and pagination parameters for the trail listing. The `to`
/// bound is inclusive through end of day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditFilter {
    pub action: Option<AuditAction>,
    pub entity: Option<AuditEntity>,
    pub actor_id: Option<Uuid>,
    pub succeeded: Option<bool>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl AuditFilter {
    fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }
        if let Some(entity) = self.entity {
            if entry.entity != entity {
                return false;
            }
        }
        if let Some(actor_id) = self.actor_id {
            if entry.actor_id != actor_id {
                return false;
            }
        }
        if let Some(succeeded) = self.succeeded {
            if entry.succeeded != succeeded {
                return false;
            }
        }
        let day = entry.timestamp.date_naive();
        if let Some(from) = self.from {
            if day < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if day > to {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Serialize)]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Paginated, filtered listing, most recent first.
pub fn query(store: &ClinicStore, filter: &AuditFilter) -> ClinicResult<AuditPage> {
    let page = filter.page.unwrap_or(1).max(1);
    let per_page = filter
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let mut matched = Vec::new();
    for item in store.audit_entries_desc() {
        let entry = item?;
        if filter.matches(&entry) {
            matched.push(entry);
        }
    }

    let total = matched.len();
    // page is caller-controlled; saturate instead of overflowing.
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    let entries = matched.into_iter().skip(offset).take(per_page).collect();

    Ok(AuditPage {
        entries,
        total,
        page,
        per_page,
    })
}

#[derive(Debug, Serialize)]
pub struct ActorCount {
    pub actor_id: Uuid,
    pub actor_name: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AuditStats {
    pub window_days: i64,
    pub total: usize,
    pub by_action: BTreeMap<String, usize>,
    pub by_entity: BTreeMap<String, usize>,
    pub top_actors: Vec<ActorCount>,
    pub by_day: BTreeMap<String, usize>,
}

/// Aggregate view over a trailing window (default 30 days): counts by
/// action, by entity, top actors, and per day.
pub fn stats(store: &ClinicStore, now: DateTime<Utc>, window_days: i64) -> ClinicResult<AuditStats> {
    let cutoff = now - Duration::days(window_days);

    let mut total = 0usize;
    let mut by_action: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_entity: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_day: BTreeMap<String, usize> = BTreeMap::new();
    let mut actors: BTreeMap<Uuid, (String, usize)> = BTreeMap::new();

    for item in store.audit_entries_desc() {
        let entry = item?;
        // Entries come newest first; everything past the cutoff is older.
        if entry.timestamp < cutoff {
            break;
        }
        total += 1;
        *by_action.entry(entry.action.to_string()).or_default() += 1;
        *by_entity.entry(entry.entity.to_string()).or_default() += 1;
        *by_day
            .entry(entry.timestamp.date_naive().to_string())
            .or_default() += 1;
        let slot = actors
            .entry(entry.actor_id)
            .or_insert_with(|| (entry.actor_name.clone(), 0));
        slot.1 += 1;
    }

    let mut top_actors: Vec<ActorCount> = actors
        .into_iter()
        .map(|(actor_id, (actor_name, count))| ActorCount {
            actor_id,
            actor_name,
            count,
        })
        .collect();
    top_actors.sort_by(|a, b| b.count.cmp(&a.count));
    top_actors.truncate(DEFAULT_TOP_ACTORS);

    Ok(AuditStats {
        window_days,
        total,
        by_action,
        by_entity,
        top_actors,
        by_day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use models::{Actor, Role};

    use crate::recorder::{AuditRecorder, RecordDetails};

    fn actor(name: &str) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            name: name.into(),
            role: Role::Administrator,
        }
    }

    async fn seeded() -> (tempfile::TempDir, Arc<ClinicStore>, Actor, Actor) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ClinicStore::open(dir.path()).unwrap());
        let recorder = AuditRecorder::new(store.clone());
        let alice = actor("Alice Smith");
        let bruno = actor("Bruno Diaz");

        let mut handles = Vec::new();
        for i in 0..3 {
            handles.push(recorder.record(
                &alice,
                AuditAction::Create,
                AuditEntity::Patient,
                format!("created patient {}", i),
                RecordDetails::default(),
            ));
        }
        handles.push(recorder.record(
            &bruno,
            AuditAction::Update,
            AuditEntity::Appointment,
            "confirmed appointment",
            RecordDetails::default(),
        ));
        handles.push(recorder.record_failure(
            &bruno,
            AuditAction::Update,
            AuditEntity::Doctor,
            "room assignment refused",
            "room occupied",
            RecordDetails::default(),
        ));
        for handle in handles {
            handle.await.unwrap();
        }
        (dir, store, alice, bruno)
    }

    #[tokio::test]
    async fn should_filter_by_action_and_actor() {
        let (_dir, store, alice, bruno) = seeded().await;

        let page = query(
            &store,
            &AuditFilter {
                action: Some(AuditAction::Create),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 3);
        assert!(page.entries.iter().all(|e| e.actor_id == alice.id));

        let page = query(
            &store,
            &AuditFilter {
                actor_id: Some(bruno.id),
                succeeded: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.entries[0].entity, AuditEntity::Doctor);
    }

    #[tokio::test]
    async fn should_paginate_most_recent_first() {
        let (_dir, store, _, _) = seeded().await;

        let page = query(
            &store,
            &AuditFilter {
                per_page: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.entries.len(), 2);
        for pair in page.entries.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }

        let last = query(
            &store,
            &AuditFilter {
                per_page: Some(2),
                page: Some(3),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(last.entries.len(), 1);
    }

    #[tokio::test]
    async fn should_return_empty_page_for_huge_page_number() {
        let (_dir, store, _, _) = seeded().await;

        let page = query(
            &store,
            &AuditFilter {
                page: Some(usize::MAX),
                per_page: Some(100),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 5);
        assert!(page.entries.is_empty());
    }

    #[tokio::test]
    async fn should_include_today_in_inclusive_upper_bound() {
        let (_dir, store, _, _) = seeded().await;
        let today = Utc::now().date_naive();
        let page = query(
            &store,
            &AuditFilter {
                from: Some(today),
                to: Some(today),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn should_aggregate_stats_over_window() {
        let (_dir, store, alice, _) = seeded().await;
        let stats = stats(&store, Utc::now(), DEFAULT_STATS_WINDOW_DAYS).unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_action["create"], 3);
        assert_eq!(stats.by_entity["appointment"], 1);
        assert_eq!(stats.top_actors[0].actor_id, alice.id);
        assert_eq!(stats.by_day.values().sum::<usize>(), 5);
    }
}
