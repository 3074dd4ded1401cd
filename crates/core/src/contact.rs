//! Administrative contact lookup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Owner of the root group, shown to users who need help.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("root group not found")]
    RootGroupNotFound,

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Result type for directory lookups.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Directory of groups and their owners.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Owner of the singular root-level group.
    async fn root_group_owner(&self) -> Result<Contact>;
}
