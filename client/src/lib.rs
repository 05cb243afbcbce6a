pub use crate::config::ClientConfig;
pub use crate::error::{ClientError, Result};
pub use crate::http::Client;
pub use crate::logger::{LogFacade, Logger};
pub use crate::responses::*;

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod middleware;
pub mod query;
pub mod responses;
