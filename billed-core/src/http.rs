//! REST client implementation of the store.
//!
//! | Operation | Request |
//! |---|---|
//! | create | `POST {api}/bills`, multipart `file` + `email` |
//! | update | `PATCH {api}/bills/{selector}`, JSON bill |
//! | list | `GET {api}/bills` |

use async_trait::async_trait;
use reqwest::{Response, header::CONTENT_TYPE, multipart};
use std::sync::Arc;
use tracing::debug;

use crate::{
    config::ClientConfig,
    error::{BilledError, Result},
    models::BillRecord,
    store::{BillResource, CreateRequest, Store, UpdateRequest, UploadedAttachment},
};

const USER_AGENT: &str = concat!("billed/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpStore {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| BilledError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Maps non-2xx responses to the message the bills page displays.
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BilledError::Store(format!(
            "Request failed with status {}",
            status.as_u16()
        )))
    }
}

#[async_trait]
impl BillResource for HttpStore {
    async fn create(&self, request: CreateRequest) -> Result<UploadedAttachment> {
        let mut form = multipart::Form::new();
        if let Some(payload) = request.data {
            let mut part = multipart::Part::bytes(payload.file.bytes)
                .file_name(payload.file.name);
            if let Some(mime) = payload.file.content_type.as_deref() {
                part = part.mime_str(mime)?;
            }
            form = form.part("file", part).text("email", payload.email);
        }

        // reqwest sets the multipart content type and boundary itself, which
        // is what `no_content_type` asks for.
        debug!("POST {}", self.config.bills_url());
        let response = self
            .client
            .post(self.config.bills_url())
            .multipart(form)
            .send()
            .await?;
        Ok(check(response)?.json().await?)
    }

    async fn update(&self, request: UpdateRequest) -> Result<BillRecord> {
        let selector = request
            .selector
            .ok_or_else(|| BilledError::Store("Bill update requires a key".to_string()))?;
        let url = format!("{}/{}", self.config.bills_url(), selector);

        debug!("PATCH {}", url);
        let response = self
            .client
            .patch(url)
            .header(CONTENT_TYPE, "application/json")
            .body(request.data)
            .send()
            .await?;
        Ok(check(response)?.json().await?)
    }

    async fn list(&self) -> Result<Vec<BillRecord>> {
        debug!("GET {}", self.config.bills_url());
        let response = self.client.get(self.config.bills_url()).send().await?;
        Ok(check(response)?.json().await?)
    }
}

impl Store for HttpStore {
    fn bills(&self) -> Arc<dyn BillResource> {
        Arc::new(self.clone())
    }
}
