//! Session state: persistence contract and the explicit session context.

pub mod context;
pub mod store;

pub use context::{Session, SessionContext, SessionWriter};
pub use store::{CredentialStore, InMemoryCredentialStore, StorageKey};
