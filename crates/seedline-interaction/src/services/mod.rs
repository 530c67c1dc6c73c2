//! Feature request services.
//!
//! Each service owns one slice of the backend API and turns gateway results
//! into [`ApiOutcome`](seedline_core::ApiOutcome)s, so callers pattern-match on
//! success, HTTP error, transport error or malformed payload.

mod auth;
mod file;
mod messaging;
mod node;

pub use auth::AuthRequestService;
pub use file::FileRequestService;
pub use messaging::MessagingService;
pub use node::NodeRequestService;
