use std::sync::Arc;
use tracing::{error, info};

use crate::{
    error::Result,
    form::SelectedFile,
    store::{CreateRequest, Store, UploadedAttachment},
};

/// Multipart body sent in phase 1: the receipt under `file` and the
/// submitter under `email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPayload {
    pub file: SelectedFile,
    pub email: String,
}

impl AttachmentPayload {
    pub fn new(file: SelectedFile, email: impl Into<String>) -> Self {
        Self {
            file,
            email: email.into(),
        }
    }
}

/// Phase 1 of a submission: hands the receipt to the store.
#[derive(Clone)]
pub struct AttachmentUploader {
    store: Arc<dyn Store>,
}

impl AttachmentUploader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Uploads whatever payload exists, including none at all.
    pub async fn upload(&self, payload: Option<&AttachmentPayload>) -> Result<UploadedAttachment> {
        let file_name = payload.map(|p| p.file.name.as_str());
        info!("uploading attachment {:?}", file_name);

        let request = CreateRequest {
            data: payload.cloned(),
            no_content_type: true,
        };

        match self.store.bills().create(request).await {
            Ok(uploaded) => {
                info!(
                    "attachment stored under key {:?} at {:?}",
                    uploaded.key, uploaded.file_url
                );
                Ok(uploaded)
            }
            Err(e) => {
                error!("attachment upload failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BilledError;
    use crate::store::{BillResource, InMemoryStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingResource {
        requests: Mutex<Vec<CreateRequest>>,
    }

    #[async_trait]
    impl BillResource for RecordingResource {
        async fn create(&self, request: CreateRequest) -> Result<UploadedAttachment> {
            self.requests.lock().unwrap().push(request);
            Ok(UploadedAttachment {
                file_url: Some("u".to_string()),
                key: Some("47qAXb6fIm2zOKkLzMro".to_string()),
            })
        }
    }

    struct RecordingStore(Arc<RecordingResource>);

    impl Store for RecordingStore {
        fn bills(&self) -> Arc<dyn BillResource> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn upload_sends_payload_without_content_type() {
        let resource = Arc::new(RecordingResource::default());
        let uploader = AttachmentUploader::new(Arc::new(RecordingStore(resource.clone())));
        let payload =
            AttachmentPayload::new(SelectedFile::new("file.png", None, vec![0u8; 4]), "a@a");

        let uploaded = uploader.upload(Some(&payload)).await.unwrap();

        assert_eq!(uploaded.key.as_deref(), Some("47qAXb6fIm2zOKkLzMro"));
        let requests = resource.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].no_content_type);
        assert_eq!(requests[0].data.as_ref(), Some(&payload));
    }

    #[tokio::test]
    async fn upload_without_payload_still_reaches_store() {
        let resource = Arc::new(RecordingResource::default());
        let uploader = AttachmentUploader::new(Arc::new(RecordingStore(resource.clone())));

        uploader.upload(None).await.unwrap();

        let requests = resource.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].data.is_none());
    }

    #[tokio::test]
    async fn upload_failure_is_returned() {
        struct Failing;

        #[async_trait]
        impl BillResource for Failing {
            async fn create(&self, _request: CreateRequest) -> Result<UploadedAttachment> {
                Err(BilledError::Store("Erreur 500".to_string()))
            }
        }

        struct FailingStore;

        impl Store for FailingStore {
            fn bills(&self) -> Arc<dyn BillResource> {
                Arc::new(Failing)
            }
        }

        let uploader = AttachmentUploader::new(Arc::new(FailingStore));
        let err = uploader.upload(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Erreur 500");
    }

    #[tokio::test]
    async fn in_memory_store_returns_key_and_url() {
        let uploader = AttachmentUploader::new(Arc::new(InMemoryStore::new()));
        let payload = AttachmentPayload::new(SelectedFile::new("scan.jpg", None, vec![1]), "a@a");

        let uploaded = uploader.upload(Some(&payload)).await.unwrap();

        assert!(uploaded.key.is_some());
        assert!(uploaded.file_url.unwrap().ends_with("scan.jpg"));
    }
}
