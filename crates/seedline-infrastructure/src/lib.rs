pub mod paths;
pub mod storage;

pub use crate::paths::{PathError, SeedlinePaths};
pub use crate::storage::{ConfigStorage, FileCredentialStore};
