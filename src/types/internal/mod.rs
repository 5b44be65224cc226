pub mod auth;
pub mod context;
pub mod pagination;

pub use context::{RequestContext, RequestId};
pub use pagination::{Meta, Page, PageParams};
