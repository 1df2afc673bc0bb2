pub mod api;
pub mod client;
pub mod scope;

pub use crate::domain::model::{HealthStatus, HomeMessage};
pub use crate::domain::ports::{ConfigProvider, JsonSource};
pub use crate::utils::error::Result;
pub use client::{ApiClient, BaseUrl};
pub use scope::RequestScope;
