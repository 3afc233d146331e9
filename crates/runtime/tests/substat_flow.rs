//! End-to-end substat lifecycle against the in-memory store.

use std::sync::Arc;

use life_core::{STAT_CAP, SubstatError, UserProfile};
use runtime::{InMemoryStore, ProfileStore, ServiceError, StoreError, SubstatService};

fn setup() -> (Arc<InMemoryStore>, SubstatService) {
    let store = Arc::new(InMemoryStore::new());
    let service = SubstatService::new(store.clone() as Arc<dyn ProfileStore>);
    (store, service)
}

async fn insert_profile(store: &Arc<InMemoryStore>) {
    let profile = UserProfile::new("u1", "Tester", "t@example.com", 0);
    ProfileStore::insert(store.as_ref(), profile).await.unwrap();
}

#[tokio::test]
async fn creation_grants_the_parent_and_contributes_live() {
    let (store, service) = setup();
    insert_profile(&store).await;

    let substat = service.add("u1", "Coding", "knowledge", "💻", 0.2).await.unwrap();
    assert_eq!(substat.value, 10.0);

    let profile = ProfileStore::get(store.as_ref(), "u1").await.unwrap().doc;
    assert!(profile.find_substat("Coding").is_some());
    // Two distinct effects: the stored base got the one-time grant...
    assert_eq!(profile.stats.knowledge, 12.0);
    // ...and the displayed total layers the live contribution on top.
    assert_eq!(profile.total_stats().knowledge, 14.0);
}

#[tokio::test]
async fn duplicates_and_bad_input_are_rejected_before_writing() {
    let (store, service) = setup();
    insert_profile(&store).await;

    assert!(matches!(
        service.add("u1", "   ", "knowledge", "💻", 0.2).await,
        Err(ServiceError::Validation(SubstatError::BlankName))
    ));
    assert!(matches!(
        service.add("u1", "Lifting", "strength", "🏋", 0.2).await,
        Err(ServiceError::Validation(SubstatError::UnknownParent(_)))
    ));
    assert!(matches!(
        service.add("u1", "Coding", "knowledge", "💻", 1.5).await,
        Err(ServiceError::Validation(SubstatError::BoostRatioOutOfRange(_)))
    ));

    // Nothing above reached the store.
    let untouched = ProfileStore::get(store.as_ref(), "u1").await.unwrap();
    assert_eq!(untouched.version, 0);

    service.add("u1", "Coding", "knowledge", "💻", 0.2).await.unwrap();
    assert!(matches!(
        service.add("u1", "Coding", "knowledge", "💻", 0.5).await,
        Err(ServiceError::DuplicateSubstat { .. })
    ));
}

#[tokio::test]
async fn removal_keeps_the_creation_grant() {
    let (store, service) = setup();
    insert_profile(&store).await;

    service.add("u1", "Coding", "knowledge", "💻", 0.2).await.unwrap();
    service.remove("u1", "Coding", "knowledge").await.unwrap();

    let profile = ProfileStore::get(store.as_ref(), "u1").await.unwrap().doc;
    assert!(profile.custom_stats.is_empty());
    // Deliberate asymmetry: the one-time grant is not clawed back, the
    // live contribution is simply gone.
    assert_eq!(profile.stats.knowledge, 12.0);
    assert_eq!(profile.total_stats().knowledge, 12.0);

    assert!(matches!(
        service.remove("u1", "Coding", "knowledge").await,
        Err(ServiceError::Store(StoreError::NotFound { kind: "substat", .. }))
    ));
}

#[tokio::test]
async fn value_edits_clamp_and_persist() {
    let (store, service) = setup();
    insert_profile(&store).await;
    service.add("u1", "Coding", "knowledge", "💻", 0.2).await.unwrap();

    assert_eq!(service.set_value("u1", "Coding", 150.0).await.unwrap(), STAT_CAP);
    assert_eq!(service.set_value("u1", "Coding", -3.0).await.unwrap(), 0.0);

    let profile = ProfileStore::get(store.as_ref(), "u1").await.unwrap().doc;
    assert_eq!(profile.custom_stats[0].value, 0.0);
}

#[tokio::test]
async fn profile_documents_round_trip_as_json() {
    let (store, service) = setup();
    insert_profile(&store).await;
    service.add("u1", "Coding", "knowledge", "💻", 0.2).await.unwrap();

    let profile = ProfileStore::get(store.as_ref(), "u1").await.unwrap().doc;
    let json = serde_json::to_value(&profile).unwrap();
    // Vitality flattens into the document the way the original record
    // stored it.
    assert_eq!(json["hp"], 100);
    assert_eq!(json["energy"], 100);
    assert_eq!(json["custom_stats"][0]["boost_ratio"], 0.2);

    let back: UserProfile = serde_json::from_value(json).unwrap();
    assert_eq!(back, profile);
}

/// Store wrapper that rejects the next N writes with a version conflict.
struct ConflictingStore {
    inner: InMemoryStore,
    conflicts_left: std::sync::atomic::AtomicU32,
}

impl ConflictingStore {
    fn new(inner: InMemoryStore, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts_left: std::sync::atomic::AtomicU32::new(conflicts),
        }
    }
}

#[async_trait::async_trait]
impl ProfileStore for ConflictingStore {
    async fn insert(&self, profile: UserProfile) -> runtime::store::Result<()> {
        ProfileStore::insert(&self.inner, profile).await
    }

    async fn get(&self, user_id: &str) -> runtime::store::Result<runtime::Versioned<UserProfile>> {
        ProfileStore::get(&self.inner, user_id).await
    }

    async fn apply(
        &self,
        user_id: &str,
        update: runtime::ProfileUpdate,
    ) -> runtime::store::Result<()> {
        use std::sync::atomic::Ordering;
        if self.conflicts_left.load(Ordering::SeqCst) > 0 {
            self.conflicts_left.fetch_sub(1, Ordering::SeqCst);
            return Err(StoreError::Conflict {
                id: user_id.to_owned(),
                expected: 0,
                actual: 1,
            });
        }
        self.inner.apply(user_id, update).await
    }

    fn subscribe(
        &self,
        user_id: &str,
    ) -> runtime::store::Result<tokio::sync::broadcast::Receiver<UserProfile>> {
        self.inner.subscribe(user_id)
    }
}

#[tokio::test]
async fn transient_conflicts_are_retried_transparently() {
    let store = Arc::new(ConflictingStore::new(InMemoryStore::new(), 1));
    ProfileStore::insert(
        store.as_ref(),
        UserProfile::new("u1", "Tester", "t@example.com", 0),
    )
    .await
    .unwrap();

    let service = SubstatService::new(store.clone() as Arc<dyn ProfileStore>);
    service.add("u1", "Coding", "knowledge", "💻", 0.2).await.unwrap();

    let profile = ProfileStore::get(store.as_ref(), "u1").await.unwrap().doc;
    assert_eq!(profile.custom_stats.len(), 1);
    assert_eq!(profile.stats.knowledge, 12.0);
}

#[tokio::test]
async fn exhausted_conflicts_surface_with_no_partial_write() {
    let store = Arc::new(ConflictingStore::new(InMemoryStore::new(), 10));
    ProfileStore::insert(
        store.as_ref(),
        UserProfile::new("u1", "Tester", "t@example.com", 0),
    )
    .await
    .unwrap();

    let service = SubstatService::new(store.clone() as Arc<dyn ProfileStore>);
    assert!(matches!(
        service.add("u1", "Coding", "knowledge", "💻", 0.2).await,
        Err(ServiceError::ConflictExhausted { .. })
    ));

    let profile = ProfileStore::get(store.as_ref(), "u1").await.unwrap().doc;
    assert!(profile.custom_stats.is_empty());
    assert_eq!(profile.stats.knowledge, 10.0);
}

#[tokio::test]
async fn boost_ratio_defaults_when_absent_from_the_document() {
    let json = serde_json::json!({
        "name": "Coding",
        "value": 10.0,
        "parent": "knowledge",
        "icon": "💻"
    });
    let substat: life_core::Substat = serde_json::from_value(json).unwrap();
    assert_eq!(substat.boost_ratio, life_core::DEFAULT_BOOST_RATIO);
}
