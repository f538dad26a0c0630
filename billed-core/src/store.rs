use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{BilledError, Result},
    models::{BillRecord, BillStatus},
    upload::AttachmentPayload,
};

/// Phase-1 request: the multipart receipt payload, if one was ever built.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub data: Option<AttachmentPayload>,
    /// Leave the multipart content type (and its boundary) to the transport.
    pub no_content_type: bool,
}

/// Phase-1 response. Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAttachment {
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// Phase-2 request: JSON-encoded bill addressed by the attachment key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub data: String,
    pub selector: Option<String>,
}

/// Bill endpoints of the store. Operations a backend does not expose keep the
/// default body and reject.
#[async_trait]
pub trait BillResource: Send + Sync {
    async fn create(&self, _request: CreateRequest) -> Result<UploadedAttachment> {
        Err(BilledError::Unsupported("bills.create"))
    }

    async fn update(&self, _request: UpdateRequest) -> Result<BillRecord> {
        Err(BilledError::Unsupported("bills.update"))
    }

    async fn list(&self) -> Result<Vec<BillRecord>> {
        Err(BilledError::Unsupported("bills.list"))
    }
}

/// Remote persistence backend.
pub trait Store: Send + Sync {
    fn bills(&self) -> Arc<dyn BillResource>;
}

/// In-memory implementation of the store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    bills: Arc<DashMap<String, (u64, BillRecord)>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `records`. Records without an id get one.
    pub fn with_bills(records: impl IntoIterator<Item = BillRecord>) -> Self {
        let store = Self::new();
        for mut record in records {
            let id = record.id.clone().unwrap_or_else(new_key);
            record.id = Some(id.clone());
            store.insert(id, record);
        }
        store
    }

    pub fn get(&self, id: &str) -> Option<BillRecord> {
        self.bills.get(id).map(|entry| entry.1.clone())
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    fn insert(&self, id: String, record: BillRecord) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.bills.insert(id, (seq, record));
    }
}

fn new_key() -> String {
    Uuid::new_v4().simple().to_string()[..20].to_string()
}

#[async_trait]
impl BillResource for InMemoryStore {
    async fn create(&self, request: CreateRequest) -> Result<UploadedAttachment> {
        let key = new_key();
        let (email, file_name) = match &request.data {
            Some(payload) => (payload.email.clone(), Some(payload.file.name.clone())),
            None => (String::new(), None),
        };
        let file_url = file_name
            .as_ref()
            .map(|name| format!("memory://attachments/{key}/{name}"));

        debug!("creating bill {} with attachment {:?}", key, file_name);
        self.insert(
            key.clone(),
            BillRecord {
                id: Some(key.clone()),
                email,
                file_url: file_url.clone(),
                file_name,
                status: BillStatus::Pending,
                ..Default::default()
            },
        );

        Ok(UploadedAttachment {
            file_url,
            key: Some(key),
        })
    }

    async fn update(&self, request: UpdateRequest) -> Result<BillRecord> {
        let selector = request
            .selector
            .ok_or_else(|| BilledError::Store("Request failed with status 404".to_string()))?;
        let mut record: BillRecord = serde_json::from_str(&request.data)?;
        record.id = Some(selector.clone());

        let mut entry = self
            .bills
            .get_mut(&selector)
            .ok_or_else(|| BilledError::Store("Request failed with status 404".to_string()))?;
        entry.1 = record.clone();
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<BillRecord>> {
        let mut entries: Vec<(u64, BillRecord)> =
            self.bills.iter().map(|entry| entry.value().clone()).collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, record)| record).collect())
    }
}

impl Store for InMemoryStore {
    fn bills(&self) -> Arc<dyn BillResource> {
        Arc::new(self.clone())
    }
}
