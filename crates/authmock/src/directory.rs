use async_trait::async_trait;
use authmock_core::contact::{Contact, ContactDirectory, DirectoryError, Result};

/// Directory backed by a single configured root group owner.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    owner: Option<Contact>,
}

impl StaticDirectory {
    pub fn new(owner: Option<Contact>) -> Self {
        Self { owner }
    }
}

#[async_trait]
impl ContactDirectory for StaticDirectory {
    async fn root_group_owner(&self) -> Result<Contact> {
        self.owner.clone().ok_or(DirectoryError::RootGroupNotFound)
    }
}
