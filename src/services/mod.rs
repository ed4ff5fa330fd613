// Backend access
// One module per REST resource, all going through the shared ApiClient

pub mod api;
pub mod error;
pub mod page;

pub mod appointments;
pub mod auth;
pub mod barbers;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod products;
pub mod sales;

pub use api::ApiClient;
pub use error::{ApiError, ApiResult};
pub use page::{ListQuery, Page};
