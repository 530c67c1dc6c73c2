pub mod catalog;
pub mod config;
pub mod error;
pub mod navigation;
pub mod notification;
pub mod request;
pub mod response;
pub mod session;
pub mod user;

// Re-export common error type
pub use error::{Result, SeedlineError};
pub use navigation::{Navigator, Route};
pub use request::{MultipartPayload, OutboundRequest, QueryParams, RequestBody};
pub use response::{ApiOutcome, ApiResponse};
pub use session::{CredentialStore, Session, SessionContext, SessionWriter, StorageKey};
