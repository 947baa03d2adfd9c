pub mod app;
pub mod config;
pub mod errors;
pub mod item;
pub mod openapi;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod search;
pub mod traits;
pub mod validation;

pub use errors::ApiError;
pub use routes::router;
pub use traits::{CRUDResource, MergeIntoActiveModel};
