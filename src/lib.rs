pub mod config;
pub mod error;
pub mod server;
pub mod signal;

pub use error::{Error, Result};
