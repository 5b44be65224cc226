pub mod common;
pub mod host;
pub mod incident;
pub mod provider;
pub mod query;
pub mod team;
pub mod user;

pub use common::{ErrorResponse, HealthResponse};
pub use query::ListQuery;
