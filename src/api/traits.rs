//! Trait abstraction for the IUMS API to enable mocking in tests

use super::types::{ApiError, CheckResponse, CreateUserPayload, UniqueField};
use crate::state::{CreatedUser, Directorate, OptionItem};
use async_trait::async_trait;

/// Operations the registration wizard needs from the IUMS API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IumsApi: Send + Sync {
    /// Ask whether `value` is already used by another user
    async fn check_unique(
        &self,
        field: UniqueField,
        value: String,
    ) -> Result<CheckResponse, ApiError>;

    /// Register a new internet user
    async fn create_user(&self, payload: CreateUserPayload) -> Result<CreatedUser, ApiError>;

    /// List directorates with their deputy ministry ids
    async fn list_directorates(&self) -> Result<Vec<Directorate>, ApiError>;

    /// List employment types
    async fn list_employment_types(&self) -> Result<Vec<OptionItem>, ApiError>;

    /// List device types
    async fn list_device_types(&self) -> Result<Vec<OptionItem>, ApiError>;

    /// List user groups
    async fn list_groups(&self) -> Result<Vec<OptionItem>, ApiError>;
}
