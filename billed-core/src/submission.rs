//! New-bill submission flow.
//!
//! A submission runs in two phases against the store: the receipt is created
//! first (phase 1) and its key then addresses the bill metadata update
//! (phase 2). A phase-1 response without a key still proceeds to phase 2 with
//! no selector; the store decides what that means.
//!
//! The submit control is only toggled by file validation. It stays enabled
//! while a submission is in flight.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    error::{BilledError, SubmissionError},
    form::{BillForm, FormSurface, SelectedFile},
    models::BillRecord,
    routes::{Navigator, Route},
    session::Session,
    store::{Store, UpdateRequest},
    upload::{AttachmentPayload, AttachmentUploader},
    validator::{FileValidator, INVALID_EXTENSION_MESSAGE, Validation},
};

/// Where the current (or last) submission attempt stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Uploading,
    Updating,
    Done,
    Failed(String),
}

/// Receipt accepted by the validator and waiting for the form to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftAttachment {
    pub file_name: String,
    pub payload: AttachmentPayload,
}

/// A form submit event. Handling it always suppresses the default reload.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    pub form: BillForm,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: BillForm) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub struct SubmissionCoordinator {
    session: Session,
    store: Arc<dyn Store>,
    uploader: AttachmentUploader,
    navigator: Arc<dyn Navigator>,
    surface: Arc<dyn FormSurface>,
    validator: FileValidator,
    draft: Option<DraftAttachment>,
    file_url: Option<String>,
    file_name: Option<String>,
    bill_id: Option<String>,
    submit_enabled: bool,
    state: SubmissionState,
}

impl SubmissionCoordinator {
    pub fn new(
        session: Session,
        store: Arc<dyn Store>,
        navigator: Arc<dyn Navigator>,
        surface: Arc<dyn FormSurface>,
    ) -> Self {
        Self {
            session,
            uploader: AttachmentUploader::new(store.clone()),
            store,
            navigator,
            surface,
            validator: FileValidator::new(),
            draft: None,
            file_url: None,
            file_name: None,
            bill_id: None,
            submit_enabled: true,
            state: SubmissionState::Idle,
        }
    }

    pub fn bill_id(&self) -> Option<&str> {
        self.bill_id.as_deref()
    }

    pub fn file_url(&self) -> Option<&str> {
        self.file_url.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn draft(&self) -> Option<&DraftAttachment> {
        self.draft.as_ref()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    /// Handles a new selection in the receipt input.
    pub fn change_file(&mut self, file: SelectedFile) -> Result<Validation, BilledError> {
        let validation = self.validator.validate(&file.name);

        if let Validation::Rejected { extension } = &validation {
            warn!("rejected receipt {:?} with extension {:?}", file.name, extension);
            self.surface.warn(INVALID_EXTENSION_MESSAGE);
            self.surface.clear_file_input();
            self.set_submit_enabled(false);
            self.draft = None;
            self.file_name = None;
            return Ok(validation);
        }

        let email = match self.session.user() {
            Ok(user) => user.email,
            Err(e) => {
                warn!("no session user for receipt {:?}: {}", file.name, e);
                self.set_submit_enabled(false);
                self.draft = None;
                self.file_name = None;
                return Err(e);
            }
        };

        self.set_submit_enabled(true);
        let file_name = file.name.clone();
        info!("receipt {:?} ready for upload", file_name);

        self.draft = Some(DraftAttachment {
            file_name: file_name.clone(),
            payload: AttachmentPayload::new(file, email),
        });
        self.file_name = Some(file_name);

        Ok(validation)
    }

    /// Runs both persistence phases and navigates to the bill list on
    /// success. Failures leave any state set by a completed phase 1 in place.
    pub async fn submit(&mut self, form: BillForm) -> Result<BillRecord, SubmissionError> {
        let result = self.run_phases(form).await;
        if let Err(e) = &result {
            self.state = SubmissionState::Failed(e.to_string());
        }
        result
    }

    /// Submit handler wired to the form: suppresses the default reload,
    /// submits, and only logs a failure.
    pub async fn handle_submit(&mut self, event: &mut SubmitEvent) -> SubmissionState {
        event.prevent_default();

        if let Err(e) = self.submit(event.form.clone()).await {
            error!("bill submission failed: {}", e);
        }
        self.state.clone()
    }

    async fn run_phases(&mut self, form: BillForm) -> Result<BillRecord, SubmissionError> {
        let email = self
            .session
            .user()
            .map_err(SubmissionError::Session)?
            .email;

        let mut bill = form.to_record(&email);
        bill.file_url = self.file_url.clone();
        bill.file_name = self.file_name.clone();

        self.state = SubmissionState::Uploading;
        let payload = self.draft.as_ref().map(|draft| &draft.payload);
        let uploaded = self
            .uploader
            .upload(payload)
            .await
            .map_err(SubmissionError::Upload)?;

        self.bill_id = uploaded.key;
        self.file_url = uploaded.file_url;
        bill.id = self.bill_id.clone();
        bill.file_url = self.file_url.clone();

        self.state = SubmissionState::Updating;
        let request = UpdateRequest {
            data: serde_json::to_string(&bill)?,
            selector: self.bill_id.clone(),
        };
        info!("updating bill {:?}", request.selector);
        let persisted = self
            .store
            .bills()
            .update(request)
            .await
            .map_err(SubmissionError::Update)?;

        self.state = SubmissionState::Done;
        self.navigator.on_navigate(Route::Bills.path());
        Ok(persisted)
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
        self.surface.set_submit_enabled(enabled);
    }
}
