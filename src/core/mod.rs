//! Client infrastructure: command line and error types

pub mod config;
pub mod error;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
