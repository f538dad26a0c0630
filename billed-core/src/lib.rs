pub mod bills;
pub mod config;
pub mod error;
pub mod form;
#[cfg(feature = "http")]
pub mod http;
pub mod models;
pub mod routes;
pub mod session;
pub mod store;
pub mod submission;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use bills::{BillIcon, BillListService, BillRows, BillView, BillsPage, ReceiptViewer};
pub use config::ClientConfig;
pub use error::{BilledError, Result, SubmissionError};
pub use form::{BillForm, FormSurface, SelectedFile};
#[cfg(feature = "http")]
pub use http::HttpStore;
pub use models::{BillRecord, BillStatus};
pub use routes::{Navigator, Route};
pub use session::{Session, SessionUser};
pub use store::{
    BillResource, CreateRequest, InMemoryStore, Store, UpdateRequest, UploadedAttachment,
};
pub use submission::{SubmissionCoordinator, SubmissionState, SubmitEvent};
pub use upload::{AttachmentPayload, AttachmentUploader};
pub use validator::{FileValidator, Validation};
