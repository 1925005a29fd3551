//! Session-scoped persistence of generated resumes, keyed by submission id.
//!
//! Results outlive the request that produced them so the result page survives
//! a reload, but only for `RESULT_TTL_SECS`. `AppState` holds an
//! `Arc<dyn DocumentStore>`: Redis when `REDIS_URL` is set, in-memory otherwise.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::resume::document::ResumeDocument;

const REDIS_KEY_PREFIX: &str = "resumechef:result:";
/// Upper bound on the in-memory TTL so expiry arithmetic cannot overflow.
const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Stored document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, submission_id: Uuid, document: &ResumeDocument) -> Result<(), StoreError>;

    /// Returns `None` for unknown or expired ids.
    async fn get(&self, submission_id: Uuid) -> Result<Option<ResumeDocument>, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

struct StoredDocument {
    document: ResumeDocument,
    expires_at: DateTime<Utc>,
}

pub struct InMemoryDocumentStore {
    ttl: Duration,
    documents: RwLock<HashMap<Uuid, StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new(ttl_secs: u64) -> Self {
        // a zero TTL would expire every document as it is stored
        let ttl_secs = i64::try_from(ttl_secs.max(1))
            .map_or(MAX_TTL_SECS, |secs| secs.min(MAX_TTL_SECS));
        Self {
            ttl: Duration::seconds(ttl_secs),
            documents: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(&self, submission_id: Uuid, document: &ResumeDocument) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut documents = self.documents.write().await;
        // expired entries are swept on write so the map cannot grow unbounded
        documents.retain(|_, stored| stored.expires_at > now);
        documents.insert(
            submission_id,
            StoredDocument {
                document: document.clone(),
                expires_at: now + self.ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, submission_id: Uuid) -> Result<Option<ResumeDocument>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&submission_id)
            .filter(|stored| stored.expires_at > Utc::now())
            .map(|stored| stored.document.clone()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisDocumentStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisDocumentStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self {
            client,
            ttl_secs: ttl_secs.max(1),
        }
    }

    fn key(submission_id: Uuid) -> String {
        format!("{REDIS_KEY_PREFIX}{submission_id}")
    }
}

#[async_trait]
impl DocumentStore for RedisDocumentStore {
    async fn put(&self, submission_id: Uuid, document: &ResumeDocument) -> Result<(), StoreError> {
        let payload = serde_json::to_string(document)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(Self::key(submission_id))
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!("Stored result {submission_id} in Redis (ttl {}s)", self.ttl_secs);
        Ok(())
    }

    async fn get(&self, submission_id: Uuid) -> Result<Option<ResumeDocument>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(Self::key(submission_id))
            .query_async(&mut conn)
            .await?;
        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(StoreError::from)
    }
}

/// Picks the backend from configuration.
pub fn build_document_store(
    redis_url: Option<&str>,
    ttl_secs: u64,
) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match redis_url {
        Some(url) => {
            let client = redis::Client::open(url)?;
            Ok(Arc::new(RedisDocumentStore::new(client, ttl_secs)))
        }
        None => Ok(Arc::new(InMemoryDocumentStore::new(ttl_secs))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::document::DocumentPersonalInfo;

    fn sample_document() -> ResumeDocument {
        ResumeDocument {
            personal_info: Some(DocumentPersonalInfo {
                name: Some("John Doe".to_string()),
                ..Default::default()
            }),
            skills: Some(vec!["Python".to_string()]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = InMemoryDocumentStore::new(60);
        let id = Uuid::new_v4();
        store.put(id, &sample_document()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(sample_document()));
    }

    #[tokio::test]
    async fn test_in_memory_unknown_id_is_none() {
        let store = InMemoryDocumentStore::new(60);
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_in_memory_expired_document_is_none() {
        let store = InMemoryDocumentStore::new(60);
        let id = Uuid::new_v4();
        store.put(id, &sample_document()).await.unwrap();
        store.documents.write().await.get_mut(&id).unwrap().expires_at =
            Utc::now() - Duration::seconds(1);
        assert_eq!(store.get(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_in_memory_zero_ttl_still_serves_fresh_result() {
        let store = InMemoryDocumentStore::new(0);
        let id = Uuid::new_v4();
        store.put(id, &sample_document()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(sample_document()));
    }

    #[test]
    fn test_build_without_redis_url_uses_memory() {
        assert!(build_document_store(None, 60).is_ok());
    }

    #[test]
    fn test_redis_key_is_namespaced() {
        let id = Uuid::nil();
        assert_eq!(
            RedisDocumentStore::key(id),
            "resumechef:result:00000000-0000-0000-0000-000000000000"
        );
    }
}
