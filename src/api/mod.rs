//! IUMS REST API access

mod client;
mod traits;
mod types;

pub use client::ApiClient;
pub use traits::IumsApi;
pub use types::{ApiError, CheckResponse, CreateUserPayload, UniqueField};

#[cfg(test)]
pub use traits::MockIumsApi;
