pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod recent;
pub mod store;

pub use error::{RestError, Result};
pub use recent::RecentlyViewed;
